//! Turret motor driven by a PWM channel.
//!
//! The sensor's motor runs off a low-side switch or a small motor driver whose
//! input is connected to one PWM output. Any [`SetDutyCycle`] implementation
//! works; on the Pico this is PWM slice 0, output A.

use embedded_hal::pwm::SetDutyCycle;

/// Errors from the motor driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub enum MotorError {
    /// The PWM peripheral rejected the compare value.
    Pwm,
}

/// Maps a normalized duty cycle onto a PWM compare value.
pub struct PwmMotor<P: SetDutyCycle> {
    pwm: P,
    duty: f32,
}

impl<P: SetDutyCycle> PwmMotor<P> {
    /// Wrap a PWM channel. The motor is switched off.
    pub fn new(pwm: P) -> Result<Self, MotorError> {
        let mut motor = Self { pwm, duty: 0.0 };
        motor.stop()?;
        Ok(motor)
    }

    /// Apply a duty cycle in `[0, 1]`. Values outside are clamped, NaN stops
    /// the motor.
    pub fn set_duty(&mut self, duty: f32) -> Result<(), MotorError> {
        let duty = if duty.is_nan() { 0.0 } else { duty.clamp(0.0, 1.0) };
        let max = self.pwm.max_duty_cycle();
        let compare = ((duty * f32::from(max)) + 0.5) as u16;
        self.pwm
            .set_duty_cycle(compare.min(max))
            .map_err(|_| MotorError::Pwm)?;
        self.duty = duty;
        Ok(())
    }

    pub fn stop(&mut self) -> Result<(), MotorError> {
        self.pwm
            .set_duty_cycle_fully_off()
            .map_err(|_| MotorError::Pwm)?;
        self.duty = 0.0;
        Ok(())
    }

    /// Duty cycle currently applied.
    #[inline]
    #[must_use]
    pub fn duty(&self) -> f32 {
        self.duty
    }
}
