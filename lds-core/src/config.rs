//! Controller configuration and its defaults.

/// Nominal spin rate: 1.8 kHz sample rate / 5 rev/s / 360 = 1 degree per sample.
pub const DEFAULT_TARGET_RPM: f32 = 300.0;

/// Configuration error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// A PID gain is negative or not finite.
    InvalidGain,
    /// Sample period or check interval of zero.
    ZeroPeriod,
    /// Watchdog band with `low_ratio >= high_ratio` or a non-positive bound.
    InvalidBand,
    /// Default target RPM not positive.
    InvalidTargetRpm,
}

/// Spin regulator (PID) settings.
///
/// Gains are in continuous-time units: output per RPM of error (`kp`), per
/// RPM·second (`ki`) and per RPM/second (`kd`).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RegulatorConfig {
    pub kp: f32,
    pub ki: f32,
    pub kd: f32,
    /// Minimum time between two output recomputations.
    pub sample_period_ms: u32,
}

pub const DEFAULT_REGULATOR_CONFIG: RegulatorConfig = RegulatorConfig {
    kp: 3.0e-3,
    ki: 1.0e-3,
    kd: 0.0,
    sample_period_ms: 20,
};

impl RegulatorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_gains(self.kp, self.ki, self.kd)?;
        if self.sample_period_ms == 0 {
            return Err(ConfigError::ZeroPeriod);
        }
        Ok(())
    }
}

impl Default for RegulatorConfig {
    fn default() -> Self {
        DEFAULT_REGULATOR_CONFIG
    }
}

pub(crate) fn validate_gains(kp: f32, ki: f32, kd: f32) -> Result<(), ConfigError> {
    let ok = |g: f32| g.is_finite() && g >= 0.0;
    if ok(kp) && ok(ki) && ok(kd) {
        Ok(())
    } else {
        Err(ConfigError::InvalidGain)
    }
}

/// Spin watchdog settings.
///
/// The acceptable band is `[setpoint * low_ratio, setpoint * high_ratio]`.
/// A fault is reported once more than `violation_threshold` consecutive checks
/// land outside it.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WatchdogConfig {
    pub check_interval_ms: u32,
    pub violation_threshold: u32,
    pub low_ratio: f32,
    pub high_ratio: f32,
}

/// 10 checks of 200 ms: about 2 s of sustained deviation.
pub const DEFAULT_WATCHDOG_CONFIG: WatchdogConfig = WatchdogConfig {
    check_interval_ms: 200,
    violation_threshold: 10,
    low_ratio: 0.8,
    high_ratio: 1.1,
};

impl WatchdogConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.check_interval_ms == 0 {
            return Err(ConfigError::ZeroPeriod);
        }
        if !(self.low_ratio > 0.0 && self.low_ratio < self.high_ratio && self.high_ratio.is_finite())
        {
            return Err(ConfigError::InvalidBand);
        }
        Ok(())
    }
}

impl Default for WatchdogConfig {
    fn default() -> Self {
        DEFAULT_WATCHDOG_CONFIG
    }
}

/// Complete controller configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LidarConfig {
    /// Setpoint used at start-up and whenever a non-positive one is requested.
    pub default_rpm: f32,
    pub regulator: RegulatorConfig,
    pub watchdog: WatchdogConfig,
}

pub const DEFAULT_CONFIG: LidarConfig = LidarConfig {
    default_rpm: DEFAULT_TARGET_RPM,
    regulator: DEFAULT_REGULATOR_CONFIG,
    watchdog: DEFAULT_WATCHDOG_CONFIG,
};

impl LidarConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.default_rpm.is_finite() && self.default_rpm > 0.0) {
            return Err(ConfigError::InvalidTargetRpm);
        }
        self.regulator.validate()?;
        self.watchdog.validate()
    }
}

impl Default for LidarConfig {
    fn default() -> Self {
        DEFAULT_CONFIG
    }
}
