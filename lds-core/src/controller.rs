//! LidarController: ties the decoding pipeline to the spin regulator.

use lds_proto::{decode, FrameAssembler, RawFrame};

use crate::clock::Clock;
use crate::config::{ConfigError, LidarConfig, DEFAULT_CONFIG};
use crate::events::{FrameEvent, LidarEvents};
use crate::regulator::SpeedRegulator;
use crate::watchdog::MotorWatchdog;

/// Frame counters since construction (all wrapping).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FrameStats {
    /// Frames that decoded successfully.
    pub valid_frames: u32,
    /// Frames rejected by the checksum.
    pub checksum_errors: u32,
    /// Frames with a good checksum but an index byte out of range.
    pub index_errors: u32,
    /// Bytes dropped while looking for a start byte.
    pub bytes_discarded: u32,
}

/// Drives one LIDAR: decodes its byte stream and keeps it spinning at the
/// target speed.
///
/// The controller is fully synchronous. Feed it bytes with
/// [`push_byte`](Self::push_byte) as they arrive and call
/// [`tick`](Self::tick) at least once per regulator sample period. All
/// notifications are delivered to `E` from inside those calls.
///
/// Both entry points must be called from one execution context; a host
/// with several tasks has to serialize access.
///
/// # Example
///
/// ```
/// use lds_core::{LidarController, LidarEvents, ManualClock};
/// use lds_proto::{FrameBuilder, Sample};
///
/// #[derive(Default)]
/// struct Count(usize);
///
/// impl LidarEvents for Count {
///     fn on_sample(&mut self, _sample: &Sample) {
///         self.0 += 1;
///     }
/// }
///
/// let clock = ManualClock::new(0);
/// let mut lidar = LidarController::new(&clock, Count::default());
///
/// lidar.push_bytes(FrameBuilder::new(0).rpm(300.0).build().as_bytes());
/// assert_eq!(lidar.events().0, 4);
/// assert_eq!(lidar.rpm(), 300.0);
/// ```
pub struct LidarController<C: Clock, E: LidarEvents> {
    clock: C,
    events: E,

    assembler: FrameAssembler,
    regulator: SpeedRegulator,
    watchdog: MotorWatchdog,

    motor_enabled: bool,
    /// Last decoded spin speed
    rpm: f32,
    /// Duty cycle last reported through `on_motor_pwm`
    emitted_pwm: f32,

    last_rotation_ms: u64,
    rotation_period_ms: u64,

    stats: FrameStats,
}

impl<C: Clock, E: LidarEvents> LidarController<C, E> {
    /// Create a controller with the default configuration. The motor starts
    /// disabled.
    pub fn new(clock: C, events: E) -> Self {
        Self::build(clock, events, DEFAULT_CONFIG)
    }

    /// Create a controller with a custom configuration.
    pub fn with_config(clock: C, events: E, config: LidarConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(clock, events, config))
    }

    fn build(clock: C, events: E, config: LidarConfig) -> Self {
        let now = clock.now_ms();
        Self {
            clock,
            events,
            assembler: FrameAssembler::new(),
            regulator: SpeedRegulator::with_setpoint(config.regulator, config.default_rpm),
            watchdog: MotorWatchdog::new(config.watchdog, now),
            motor_enabled: false,
            rpm: 0.0,
            emitted_pwm: 0.0,
            last_rotation_ms: now,
            rotation_period_ms: 0,
            stats: FrameStats::default(),
        }
    }

    /// Feed one byte from the sensor.
    ///
    /// When the byte completes a frame, the frame is validated and decoded and
    /// the notifications fire before this returns.
    pub fn push_byte(&mut self, byte: u8) {
        if let Some(frame) = self.assembler.push_byte(byte) {
            self.process_frame(&frame);
        }
    }

    /// Feed a run of bytes, in order.
    pub fn push_bytes(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.push_byte(b);
        }
    }

    /// Drop a partially received frame, e.g. after a UART error.
    pub fn reset_input(&mut self) {
        self.assembler.reset();
    }

    fn process_frame(&mut self, frame: &RawFrame) {
        match decode(frame) {
            Ok(decoded) => {
                if decoded.starts_revolution() {
                    let now = self.clock.now_ms();
                    self.rotation_period_ms = now.saturating_sub(self.last_rotation_ms);
                    self.last_rotation_ms = now;
                    trace!("revolution took {} ms", self.rotation_period_ms);
                }
                self.stats.valid_frames = self.stats.valid_frames.wrapping_add(1);

                self.events.on_frame(FrameEvent::Valid {
                    first_angle: decoded.first_angle,
                    frame,
                });

                self.rpm = decoded.rpm();

                for sample in &decoded.samples {
                    self.events.on_sample(sample);
                }
            }
            Err(e) => {
                match e {
                    lds_proto::FrameError::Checksum { .. } => {
                        self.stats.checksum_errors = self.stats.checksum_errors.wrapping_add(1);
                    }
                    lds_proto::FrameError::IndexOutOfRange(_) => {
                        self.stats.index_errors = self.stats.index_errors.wrapping_add(1);
                    }
                }
                debug!("frame rejected: {:?}", e);
                self.events.on_frame(FrameEvent::Invalid(e));
            }
        }
    }

    /// Periodic work: one regulator step (rate limited internally) and one
    /// watchdog check (also rate limited).
    ///
    /// Returns `true` while the watchdog reports a persistent speed fault. The
    /// fault is advisory; call [`enable_motor(false)`](Self::enable_motor) to
    /// act on it. Always `false` while the motor is disabled.
    pub fn tick(&mut self) -> bool {
        let now = self.clock.now_ms();

        if self.motor_enabled {
            let duty = self.regulator.compute(now, self.rpm);
            if duty != self.emitted_pwm {
                self.emit_pwm(duty);
            }
        }

        self.watchdog
            .check(now, self.motor_enabled, self.regulator.setpoint(), self.rpm);

        self.is_faulted()
    }

    /// Start or stop speed regulation.
    ///
    /// Disabling reports a duty cycle of 0 at once. Enabling clears the
    /// watchdog, resumes the regulator where it left off and reports its last
    /// output at once.
    pub fn enable_motor(&mut self, enable: bool) {
        self.motor_enabled = enable;
        if enable {
            self.watchdog.reset();
            info!("motor enabled, target {} RPM", self.regulator.setpoint());
            self.emit_pwm(self.regulator.output());
        } else {
            info!("motor disabled");
            self.emit_pwm(0.0);
        }
    }

    fn emit_pwm(&mut self, duty: f32) {
        self.emitted_pwm = duty;
        self.events.on_motor_pwm(duty);
    }

    /// Set the target spin rate. Non-positive values select the configured
    /// default. Returns the setpoint in effect.
    pub fn set_target_rpm(&mut self, rpm: f32) -> f32 {
        self.regulator.set_setpoint(rpm)
    }

    #[inline]
    #[must_use]
    pub fn target_rpm(&self) -> f32 {
        self.regulator.setpoint()
    }

    /// Replace the PID gains.
    pub fn set_pid_tunings(&mut self, kp: f32, ki: f32, kd: f32) -> Result<(), ConfigError> {
        self.regulator.set_tunings(kp, ki, kd).inspect_err(|e| {
            warn!("PID tunings rejected: {:?}", e);
        })
    }

    /// Change the PID sample period.
    pub fn set_pid_sample_period(&mut self, period_ms: u32) -> Result<(), ConfigError> {
        self.regulator.set_sample_period(period_ms).inspect_err(|e| {
            warn!("PID sample period rejected: {:?}", e);
        })
    }

    /// Spin speed from the most recent valid frame.
    #[inline]
    #[must_use]
    pub fn rpm(&self) -> f32 {
        self.rpm
    }

    #[inline]
    #[must_use]
    pub fn is_motor_enabled(&self) -> bool {
        self.motor_enabled
    }

    /// Duration of the last complete revolution, 0 until one was seen.
    ///
    /// The first value is measured from construction.
    #[inline]
    #[must_use]
    pub fn rotation_period_ms(&self) -> u64 {
        self.rotation_period_ms
    }

    /// Duty cycle last reported to the motor.
    #[inline]
    #[must_use]
    pub fn pwm_output(&self) -> f32 {
        self.emitted_pwm
    }

    /// Same value the last [`tick`](Self::tick) returned, without side effects.
    #[inline]
    #[must_use]
    pub fn is_faulted(&self) -> bool {
        self.motor_enabled && self.watchdog.is_faulted()
    }

    #[inline]
    #[must_use]
    pub fn watchdog_violations(&self) -> u32 {
        self.watchdog.violations()
    }

    #[must_use]
    pub fn stats(&self) -> FrameStats {
        FrameStats {
            bytes_discarded: self.assembler.discarded(),
            ..self.stats
        }
    }

    /// Get a reference to the event sink.
    pub fn events(&self) -> &E {
        &self.events
    }

    /// Get a mutable reference to the event sink.
    pub fn events_mut(&mut self) -> &mut E {
        &mut self.events
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Decompose the controller into its clock and event sink.
    pub fn into_parts(self) -> (C, E) {
        (self.clock, self.events)
    }
}
