//! Notification sinks.
//!
//! The controller reports everything it learns synchronously, from inside the
//! call that produced it, through a [`LidarEvents`] implementation it owns.

use lds_proto::{FrameError, RawFrame, Sample};

/// Outcome of one completed frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameEvent<'a> {
    /// Frame passed validation.
    Valid {
        /// Angle of the first of the frame's four samples.
        first_angle: u16,
        frame: &'a RawFrame,
    },
    /// Frame was rejected; no samples follow.
    Invalid(FrameError),
}

impl FrameEvent<'_> {
    /// First angle of a valid frame, 0 for a rejected one.
    #[inline]
    #[must_use]
    pub fn first_angle(&self) -> u16 {
        match self {
            FrameEvent::Valid { first_angle, .. } => *first_angle,
            FrameEvent::Invalid(_) => 0,
        }
    }

    /// Raw bytes of a valid frame.
    #[inline]
    #[must_use]
    pub fn bytes(&self) -> Option<&[u8]> {
        match self {
            FrameEvent::Valid { frame, .. } => Some(frame.as_bytes()),
            FrameEvent::Invalid(_) => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, FrameEvent::Valid { .. })
    }
}

/// Receiver of controller notifications.
///
/// Every method has an empty default, so implementors only override what they
/// care about. Calls happen in this order for a valid frame: `on_frame`, then
/// `on_sample` four times in ascending angle.
pub trait LidarEvents {
    /// One completed frame, valid or not.
    fn on_frame(&mut self, _event: FrameEvent<'_>) {}

    /// One decoded sample.
    fn on_sample(&mut self, _sample: &Sample) {}

    /// New motor duty cycle in `[0, 1]`.
    fn on_motor_pwm(&mut self, _duty: f32) {}
}

/// Sink that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullEvents;

impl LidarEvents for NullEvents {}

impl<E: LidarEvents + ?Sized> LidarEvents for &mut E {
    fn on_frame(&mut self, event: FrameEvent<'_>) {
        (**self).on_frame(event);
    }

    fn on_sample(&mut self, sample: &Sample) {
        (**self).on_sample(sample);
    }

    fn on_motor_pwm(&mut self, duty: f32) {
        (**self).on_motor_pwm(duty);
    }
}

pub type FrameCallback = fn(FrameEvent<'_>);
pub type SampleCallback = fn(&Sample);
pub type MotorPwmCallback = fn(f32);

/// Up to three plain function callbacks, each optional.
///
/// ```
/// use lds_core::{Callbacks, LidarEvents};
///
/// fn drive_motor(duty: f32) {
///     assert!((0.0..=1.0).contains(&duty));
/// }
///
/// let mut callbacks = Callbacks::new();
/// callbacks.set_motor_pwm_callback(drive_motor);
/// callbacks.on_motor_pwm(0.25);
/// ```
#[derive(Default, Clone, Copy)]
pub struct Callbacks {
    frame: Option<FrameCallback>,
    sample: Option<SampleCallback>,
    motor_pwm: Option<MotorPwmCallback>,
}

impl Callbacks {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            frame: None,
            sample: None,
            motor_pwm: None,
        }
    }

    pub fn set_frame_callback(&mut self, callback: FrameCallback) {
        self.frame = Some(callback);
    }

    pub fn set_sample_callback(&mut self, callback: SampleCallback) {
        self.sample = Some(callback);
    }

    pub fn set_motor_pwm_callback(&mut self, callback: MotorPwmCallback) {
        self.motor_pwm = Some(callback);
    }
}

impl LidarEvents for Callbacks {
    fn on_frame(&mut self, event: FrameEvent<'_>) {
        if let Some(cb) = self.frame {
            cb(event);
        }
    }

    fn on_sample(&mut self, sample: &Sample) {
        if let Some(cb) = self.sample {
            cb(sample);
        }
    }

    fn on_motor_pwm(&mut self, duty: f32) {
        if let Some(cb) = self.motor_pwm {
            cb(duty);
        }
    }
}
