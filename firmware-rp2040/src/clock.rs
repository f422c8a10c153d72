//! [`Clock`] backed by the embassy time driver.

use embassy_time::Instant;
use lds_core::Clock;

/// Milliseconds since boot.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmbassyClock;

impl Clock for EmbassyClock {
    #[inline]
    fn now_ms(&self) -> u64 {
        Instant::now().as_millis()
    }
}
