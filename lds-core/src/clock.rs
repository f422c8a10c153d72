//! Monotonic millisecond time source.

use core::cell::Cell;

/// Monotonic clock in milliseconds.
///
/// Implementations must never go backwards. The epoch is arbitrary.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

impl<C: Clock + ?Sized> Clock for &C {
    #[inline]
    fn now_ms(&self) -> u64 {
        (**self).now_ms()
    }
}

/// Clock that only moves when told to.
///
/// Used for host simulation and tests where timing has to be deterministic.
///
/// ```
/// use lds_core::{Clock, ManualClock};
///
/// let clock = ManualClock::new(100);
/// clock.advance(20);
/// assert_eq!(clock.now_ms(), 120);
/// ```
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<u64>,
}

impl ManualClock {
    #[must_use]
    pub const fn new(start_ms: u64) -> Self {
        Self {
            now: Cell::new(start_ms),
        }
    }

    /// Move time forward by `ms`.
    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get().saturating_add(ms));
    }

    /// Jump to `ms`. Earlier values are ignored to keep the clock monotonic.
    pub fn set(&self, ms: u64) {
        if ms > self.now.get() {
            self.now.set(ms);
        }
    }
}

impl Clock for ManualClock {
    #[inline]
    fn now_ms(&self) -> u64 {
        self.now.get()
    }
}
