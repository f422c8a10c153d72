//! Spin-rate watchdog.

use crate::config::WatchdogConfig;

/// Result of a [`MotorWatchdog::check`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WatchdogCheck {
    /// The interval has not elapsed; nothing was evaluated.
    Pending,
    /// Speed inside the band, or motor disabled. Counter cleared.
    InBand,
    /// Speed outside the band. Carries the consecutive violation count.
    Violation(u32),
}

/// Counts consecutive out-of-band speed readings.
///
/// The fault is advisory: the watchdog never touches the motor, it only
/// reports. Whoever drives the controller decides whether to stop.
pub struct MotorWatchdog {
    config: WatchdogConfig,
    violations: u32,
    last_check_ms: u64,
}

impl MotorWatchdog {
    /// Create a watchdog whose first check is due one interval after `now_ms`.
    #[must_use]
    pub fn new(config: WatchdogConfig, now_ms: u64) -> Self {
        Self {
            config,
            violations: 0,
            last_check_ms: now_ms,
        }
    }

    /// Evaluate the speed if more than one interval has passed since the last
    /// evaluation.
    pub fn check(
        &mut self,
        now_ms: u64,
        motor_enabled: bool,
        setpoint_rpm: f32,
        rpm: f32,
    ) -> WatchdogCheck {
        if now_ms.saturating_sub(self.last_check_ms) <= u64::from(self.config.check_interval_ms) {
            return WatchdogCheck::Pending;
        }
        self.last_check_ms = now_ms;

        let (low, high) = self.band(setpoint_rpm);
        // NaN fails both comparisons and is treated as out of band.
        let in_band = rpm >= low && rpm <= high;

        if motor_enabled && !in_band {
            self.violations = self.violations.saturating_add(1);
            debug!(
                "spin {} RPM outside [{}, {}], violation {}",
                rpm,
                low,
                high,
                self.violations
            );
            if self.violations == self.config.violation_threshold.saturating_add(1) {
                warn!("spin watchdog fault after {} checks", self.violations);
            }
            WatchdogCheck::Violation(self.violations)
        } else {
            self.violations = 0;
            WatchdogCheck::InBand
        }
    }

    /// Allowed speed range for `setpoint_rpm`.
    #[inline]
    #[must_use]
    pub fn band(&self, setpoint_rpm: f32) -> (f32, f32) {
        (
            setpoint_rpm * self.config.low_ratio,
            setpoint_rpm * self.config.high_ratio,
        )
    }

    /// True while the violation count exceeds the threshold.
    #[inline]
    #[must_use]
    pub fn is_faulted(&self) -> bool {
        self.violations > self.config.violation_threshold
    }

    #[inline]
    #[must_use]
    pub fn violations(&self) -> u32 {
        self.violations
    }

    /// Clear the violation count, e.g. when the motor is restarted.
    pub fn reset(&mut self) {
        self.violations = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_WATCHDOG_CONFIG;

    const SETPOINT: f32 = 300.0;

    #[test]
    fn test_pending_until_interval_passes() {
        let mut wd = MotorWatchdog::new(DEFAULT_WATCHDOG_CONFIG, 0);
        assert_eq!(wd.check(100, true, SETPOINT, 0.0), WatchdogCheck::Pending);
        // Exactly one interval is not enough.
        assert_eq!(wd.check(200, true, SETPOINT, 0.0), WatchdogCheck::Pending);
        assert_eq!(wd.check(201, true, SETPOINT, 0.0), WatchdogCheck::Violation(1));
    }

    #[test]
    fn test_band_edges() {
        let wd = MotorWatchdog::new(DEFAULT_WATCHDOG_CONFIG, 0);
        let (low, high) = wd.band(SETPOINT);
        assert!((low - 240.0).abs() < 1e-3);
        assert!((high - 330.0).abs() < 1e-3);
    }

    #[test]
    fn test_in_band_resets_counter() {
        let mut wd = MotorWatchdog::new(DEFAULT_WATCHDOG_CONFIG, 0);
        let mut now = 0;
        for _ in 0..5 {
            now += 201;
            wd.check(now, true, SETPOINT, 100.0);
        }
        assert_eq!(wd.violations(), 5);
        now += 201;
        assert_eq!(wd.check(now, true, SETPOINT, 300.0), WatchdogCheck::InBand);
        assert_eq!(wd.violations(), 0);
    }

    #[test]
    fn test_fault_after_threshold() {
        let mut wd = MotorWatchdog::new(DEFAULT_WATCHDOG_CONFIG, 0);
        let mut now = 0;
        for _ in 0..10 {
            now += 201;
            wd.check(now, true, SETPOINT, 400.0);
            assert!(!wd.is_faulted());
        }
        now += 201;
        assert_eq!(wd.check(now, true, SETPOINT, 400.0), WatchdogCheck::Violation(11));
        assert!(wd.is_faulted());
    }

    #[test]
    fn test_disabled_motor_never_violates() {
        let mut wd = MotorWatchdog::new(DEFAULT_WATCHDOG_CONFIG, 0);
        let mut now = 0;
        for _ in 0..20 {
            now += 201;
            assert_eq!(wd.check(now, false, SETPOINT, 0.0), WatchdogCheck::InBand);
        }
        assert!(!wd.is_faulted());
    }

    #[test]
    fn test_frequent_calls_do_not_change_count() {
        let mut wd = MotorWatchdog::new(DEFAULT_WATCHDOG_CONFIG, 0);
        wd.check(201, true, SETPOINT, 0.0);
        assert_eq!(wd.violations(), 1);
        for t in 202..=401 {
            assert_eq!(wd.check(t, true, SETPOINT, 0.0), WatchdogCheck::Pending);
            assert_eq!(wd.violations(), 1);
        }
        assert_eq!(wd.check(402, true, SETPOINT, 0.0), WatchdogCheck::Violation(2));
    }

    #[test]
    fn test_nan_speed_is_out_of_band() {
        let mut wd = MotorWatchdog::new(DEFAULT_WATCHDOG_CONFIG, 0);
        assert_eq!(
            wd.check(201, true, SETPOINT, f32::NAN),
            WatchdogCheck::Violation(1)
        );
    }
}
