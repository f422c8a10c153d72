//! Platform-agnostic controller for the Neato XV / LDS02RR spinning LIDAR.
//!
//! This crate turns the sensor's raw byte stream into frame and sample
//! notifications and keeps the turret spinning at a target speed. It has no
//! platform dependencies: the host supplies bytes, a millisecond clock and
//! an event sink, and applies the duty cycle it is handed to the motor.
//!
//! # Overview
//!
//! - [`controller`]: The orchestrator ([`LidarController`])
//! - [`regulator`]: PID spin regulator ([`SpeedRegulator`])
//! - [`watchdog`]: Spin-rate fault detection ([`MotorWatchdog`])
//! - [`events`]: Notification sinks ([`LidarEvents`], [`Callbacks`])
//! - [`clock`]: Millisecond time source ([`Clock`], [`ManualClock`])
//! - [`config`]: Tunables and their defaults ([`LidarConfig`])
//!
//! Framing, checksum and decoding live in [`lds_proto`]; the types needed to
//! consume notifications are re-exported here.
//!
//! # Example
//!
//! ```rust
//! use lds_core::{Callbacks, LidarController, ManualClock, Sample};
//! use lds_proto::FrameBuilder;
//!
//! fn on_sample(sample: &Sample) {
//!     assert!(sample.angle < 360);
//! }
//!
//! let clock = ManualClock::new(0);
//! let mut callbacks = Callbacks::new();
//! callbacks.set_sample_callback(on_sample);
//!
//! let mut lidar = LidarController::new(&clock, callbacks);
//! lidar.enable_motor(true);
//!
//! lidar.push_bytes(FrameBuilder::new(12).rpm(290.0).build().as_bytes());
//! clock.advance(20);
//! let faulted = lidar.tick();
//! assert!(!faulted);
//! ```
//!
//! # Features
//!
//! - **`std`**: Enable standard library support (for host testing)
//! - **`defmt`**: defmt formatting and logging (for embedded targets)
//! - **`log`**: Log through the `log` facade instead
//!
//! # No-std Support
//!
//! This crate is `#![no_std]` by default and uses no heap allocations.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
extern crate std;

// Must come first so the logging macros are visible in every module.
#[macro_use]
mod fmt;

pub mod clock;
pub mod config;
pub mod controller;
pub mod events;
pub mod regulator;
pub mod watchdog;

// Re-export main types at crate root
pub use clock::{Clock, ManualClock};
pub use config::{
    ConfigError, LidarConfig, RegulatorConfig, WatchdogConfig, DEFAULT_CONFIG,
    DEFAULT_REGULATOR_CONFIG, DEFAULT_TARGET_RPM, DEFAULT_WATCHDOG_CONFIG,
};
pub use controller::{FrameStats, LidarController};
pub use events::{
    Callbacks, FrameCallback, FrameEvent, LidarEvents, MotorPwmCallback, NullEvents,
    SampleCallback,
};
pub use regulator::SpeedRegulator;
pub use watchdog::{MotorWatchdog, WatchdogCheck};

pub use lds_proto::{FrameError, RawFrame, Sample, SampleFlags, FRAME_LEN, LDS_BAUDRATE};
