//! Spin-rate PID regulator.
//!
//! Works in `no_std` and does not allocate memory.

use crate::config::{validate_gains, ConfigError, RegulatorConfig, DEFAULT_TARGET_RPM};

const OUTPUT_MIN: f32 = 0.0;
const OUTPUT_MAX: f32 = 1.0;

/// Discrete PID controller producing a normalized motor duty cycle.
///
/// - Recomputes at most once per sample period; calls in between return the
///   previous output.
/// - The integrator is clamped to the output range so a long saturation does
///   not delay recovery once the error changes sign.
/// - The derivative acts on the measurement, so setpoint changes cause no
///   kick.
pub struct SpeedRegulator {
    kp: f32,
    ki: f32,
    kd: f32,
    sample_period_ms: u32,

    setpoint: f32,
    default_setpoint: f32,

    /// Integrator state
    integral: f32,
    /// Measurement at the previous computation
    prev_measurement: f32,
    last_compute_ms: Option<u64>,

    output: f32,
}

impl SpeedRegulator {
    /// Create a regulator at the default setpoint.
    ///
    /// `config` is taken as is; validate it first if it comes from outside.
    #[must_use]
    pub fn new(config: RegulatorConfig) -> Self {
        Self::with_setpoint(config, DEFAULT_TARGET_RPM)
    }

    /// Create a regulator whose default and initial setpoint is `default_rpm`.
    #[must_use]
    pub fn with_setpoint(config: RegulatorConfig, default_rpm: f32) -> Self {
        Self {
            kp: config.kp,
            ki: config.ki,
            kd: config.kd,
            sample_period_ms: config.sample_period_ms.max(1),
            setpoint: default_rpm,
            default_setpoint: default_rpm,
            integral: 0.0,
            prev_measurement: 0.0,
            last_compute_ms: None,
            output: OUTPUT_MIN,
        }
    }

    /// Change the target speed.
    ///
    /// A non-positive or non-finite request falls back to the default setpoint.
    /// Returns the setpoint actually in effect.
    pub fn set_setpoint(&mut self, rpm: f32) -> f32 {
        self.setpoint = if rpm.is_finite() && rpm > 0.0 {
            rpm
        } else {
            warn!("rejected target {} RPM, using {}", rpm, self.default_setpoint);
            self.default_setpoint
        };
        self.setpoint
    }

    #[inline]
    #[must_use]
    pub fn setpoint(&self) -> f32 {
        self.setpoint
    }

    /// Replace the gains. Negative or non-finite gains are rejected.
    pub fn set_tunings(&mut self, kp: f32, ki: f32, kd: f32) -> Result<(), ConfigError> {
        validate_gains(kp, ki, kd)?;
        self.kp = kp;
        self.ki = ki;
        self.kd = kd;
        Ok(())
    }

    #[must_use]
    pub fn tunings(&self) -> (f32, f32, f32) {
        (self.kp, self.ki, self.kd)
    }

    /// Change the sample period. Zero is rejected.
    pub fn set_sample_period(&mut self, period_ms: u32) -> Result<(), ConfigError> {
        if period_ms == 0 {
            return Err(ConfigError::ZeroPeriod);
        }
        self.sample_period_ms = period_ms;
        Ok(())
    }

    #[inline]
    #[must_use]
    pub fn sample_period_ms(&self) -> u32 {
        self.sample_period_ms
    }

    /// Most recently computed output.
    #[inline]
    #[must_use]
    pub fn output(&self) -> f32 {
        self.output
    }

    /// Clear integrator and derivative history. The output drops to 0.
    pub fn reset(&mut self) {
        self.integral = 0.0;
        self.prev_measurement = 0.0;
        self.last_compute_ms = None;
        self.output = OUTPUT_MIN;
    }

    /// Run one controller step if a sample period has elapsed.
    ///
    /// `measured_rpm` is the latest spin speed. Returns the output in effect,
    /// which is unchanged when called too early or with a non-finite
    /// measurement.
    pub fn compute(&mut self, now_ms: u64, measured_rpm: f32) -> f32 {
        if let Some(last) = self.last_compute_ms {
            if now_ms.saturating_sub(last) < u64::from(self.sample_period_ms) {
                return self.output;
            }
        }
        if !measured_rpm.is_finite() {
            return self.output;
        }

        let dt = self.sample_period_ms as f32 / 1000.0;
        let error = self.setpoint - measured_rpm;

        // ----- P term -----
        let p = self.kp * error;

        // ----- I term, clamped for anti-windup -----
        self.integral = (self.integral + self.ki * error * dt).clamp(OUTPUT_MIN, OUTPUT_MAX);

        // ----- D term on measurement -----
        let d = if self.last_compute_ms.is_some() {
            -self.kd * (measured_rpm - self.prev_measurement) / dt
        } else {
            0.0
        };

        self.prev_measurement = measured_rpm;
        self.last_compute_ms = Some(now_ms);
        self.output = (p + self.integral + d).clamp(OUTPUT_MIN, OUTPUT_MAX);
        self.output
    }
}

impl Default for SpeedRegulator {
    fn default() -> Self {
        Self::new(RegulatorConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_REGULATOR_CONFIG;

    fn regulator() -> SpeedRegulator {
        SpeedRegulator::new(DEFAULT_REGULATOR_CONFIG)
    }

    #[test]
    fn test_first_compute_runs_immediately() {
        let mut pid = regulator();
        // error 100 RPM: p = 0.3, i = 1e-3 * 100 * 0.02 = 0.002
        let out = pid.compute(0, 200.0);
        assert!((out - 0.302).abs() < 1e-6);
    }

    #[test]
    fn test_rate_limited_to_sample_period() {
        let mut pid = regulator();
        let first = pid.compute(1000, 200.0);
        assert_eq!(pid.compute(1010, 0.0), first);
        assert_eq!(pid.compute(1019, 0.0), first);
        assert_ne!(pid.compute(1020, 0.0), first);
    }

    #[test]
    fn test_output_clamped_high_and_low() {
        let mut pid = regulator();
        let mut now = 0;
        for _ in 0..1000 {
            let out = pid.compute(now, 0.0);
            assert!((0.0..=1.0).contains(&out));
            now += 20;
        }
        assert_eq!(pid.output(), 1.0);

        for _ in 0..1000 {
            let out = pid.compute(now, 10_000.0);
            assert!((0.0..=1.0).contains(&out));
            now += 20;
        }
        assert_eq!(pid.output(), 0.0);
    }

    #[test]
    fn test_integral_does_not_wind_up() {
        let mut pid = regulator();
        let mut now = 0;
        // Long saturation at full drive.
        for _ in 0..10_000 {
            pid.compute(now, 0.0);
            now += 20;
        }
        // Slightly over speed: with a clamped integrator the output leaves
        // saturation on the very next step.
        let out = pid.compute(now, 310.0);
        assert!(out < 1.0);
    }

    #[test]
    fn test_settles_near_steady_state() {
        let mut pid = regulator();
        pid.compute(0, 300.0);
        // Zero error: only the (empty) integrator remains.
        assert_eq!(pid.output(), 0.0);
    }

    #[test]
    fn test_derivative_on_measurement() {
        let mut pid = SpeedRegulator::new(RegulatorConfig {
            kp: 0.0,
            ki: 0.0,
            kd: 1.0e-3,
            sample_period_ms: 20,
        });
        pid.compute(0, 300.0);
        // Speed dropped by 2 RPM in 20 ms: d = 1e-3 * 2 / 0.02 = 0.1
        let out = pid.compute(20, 298.0);
        assert!((out - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_non_finite_measurement_ignored() {
        let mut pid = regulator();
        let before = pid.compute(0, 250.0);
        assert_eq!(pid.compute(20, f32::NAN), before);
        assert_eq!(pid.compute(40, f32::INFINITY), before);
    }

    #[test]
    fn test_setpoint_rejects_non_positive() {
        let mut pid = regulator();
        assert_eq!(pid.set_setpoint(250.0), 250.0);
        assert_eq!(pid.set_setpoint(0.0), DEFAULT_TARGET_RPM);
        assert_eq!(pid.set_setpoint(-5.0), DEFAULT_TARGET_RPM);
        assert_eq!(pid.set_setpoint(f32::NAN), DEFAULT_TARGET_RPM);
    }

    #[test]
    fn test_tunings_and_period_validation() {
        let mut pid = regulator();
        assert_eq!(pid.set_tunings(1.0, -1.0, 0.0), Err(ConfigError::InvalidGain));
        assert_eq!(pid.tunings(), (3.0e-3, 1.0e-3, 0.0));
        assert_eq!(pid.set_tunings(0.01, 0.0, 0.0), Ok(()));
        assert_eq!(pid.tunings(), (0.01, 0.0, 0.0));

        assert_eq!(pid.set_sample_period(0), Err(ConfigError::ZeroPeriod));
        assert_eq!(pid.sample_period_ms(), 20);
        assert_eq!(pid.set_sample_period(50), Ok(()));

        pid.compute(0, 0.0);
        let held = pid.output();
        assert_eq!(pid.compute(40, 300.0), held);
    }

    #[test]
    fn test_reset_clears_state() {
        let mut pid = regulator();
        pid.compute(0, 0.0);
        pid.reset();
        assert_eq!(pid.output(), 0.0);
        // Runs again straight away after a reset.
        assert!(pid.compute(1, 0.0) > 0.0);
    }
}
