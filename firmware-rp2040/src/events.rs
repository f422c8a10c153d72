//! Controller notifications on the device.
//!
//! Runs inside the controller's lock, so nothing here may block: the motor is
//! updated in place and samples are queued for the sample task.

use defmt::{debug, error};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embedded_hal::pwm::SetDutyCycle;
use lds_core::{FrameEvent, LidarEvents, Sample};
use portable_atomic::{AtomicU32, Ordering};

use crate::motor::PwmMotor;

/// About 35 ms of samples at 1800 samples/s.
pub const SAMPLE_QUEUE_DEPTH: usize = 64;

/// Queue from the controller to the sample consumer.
pub type SampleChannel = Channel<CriticalSectionRawMutex, Sample, SAMPLE_QUEUE_DEPTH>;

static DROPPED_SAMPLES: AtomicU32 = AtomicU32::new(0);

/// Samples discarded because the queue was full.
pub fn dropped_samples() -> u32 {
    DROPPED_SAMPLES.load(Ordering::Relaxed)
}

/// [`LidarEvents`] sink for the firmware.
pub struct FirmwareEvents<P: SetDutyCycle> {
    motor: PwmMotor<P>,
    samples: &'static SampleChannel,
}

impl<P: SetDutyCycle> FirmwareEvents<P> {
    #[must_use]
    pub fn new(motor: PwmMotor<P>, samples: &'static SampleChannel) -> Self {
        Self { motor, samples }
    }

    #[inline]
    #[must_use]
    pub fn motor(&self) -> &PwmMotor<P> {
        &self.motor
    }
}

impl<P: SetDutyCycle> LidarEvents for FirmwareEvents<P> {
    fn on_frame(&mut self, event: FrameEvent<'_>) {
        if let FrameEvent::Invalid(e) = event {
            debug!("Dropped frame: {:?}", e);
        }
    }

    fn on_sample(&mut self, sample: &Sample) {
        if self.samples.try_send(*sample).is_err() {
            DROPPED_SAMPLES.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn on_motor_pwm(&mut self, duty: f32) {
        if let Err(e) = self.motor.set_duty(duty) {
            error!("Motor error: {:?}", e);
        }
    }
}
