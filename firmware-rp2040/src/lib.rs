//! LDS LIDAR controller for RP2040.
//!
//! This crate provides the embedded glue around [`lds_core`]: an embassy
//! backed clock, a PWM motor driver and an event sink that hands samples to
//! other tasks.
//!
//! # Overview
//!
//! The firmware runs on a Raspberry Pi Pico (RP2040) and:
//! 1. Receives LIDAR frames over UART (115200 baud, 8N1)
//! 2. Decodes them into one sample per degree
//! 3. Regulates the turret motor to 300 RPM through a PWM output
//! 4. Stops the motor when the spin speed stays out of tolerance
//!
//! # Hardware Configuration
//!
//! | Function | GPIO | Description |
//! |----------|------|-------------|
//! | UART1 TX | 8    | Unused by the sensor |
//! | UART1 RX | 9    | LIDAR data |
//! | PWM0 A   | 16   | Motor driver input, 25 kHz |
//! | LED      | 25   | On-board LED (spin fault indicator) |
//!
//! # Architecture
//!
//! The controller lives behind an embassy [`Mutex`](embassy_sync::mutex::Mutex)
//! shared by three tasks:
//!
//! - **Rx Task**: Reads UART data and feeds the controller
//! - **Control Task**: Ticks the regulator and watchdog every 10 ms
//! - **Sample Task**: Drains the [`SampleChannel`] filled by [`FirmwareEvents`]
//!
//! # Features
//!
//! - **`dev-panic`** (default): Use `panic-probe` for development (prints panic info via RTT)
//! - **`prod-panic`**: Use `panic-reset` for production (silent watchdog reset)

#![no_std]

// Ensure exactly one panic handler
#[cfg(all(feature = "dev-panic", feature = "prod-panic"))]
compile_error!("Cannot enable both `dev-panic` and `prod-panic` features - they install conflicting panic handlers");

// Re-export core types for convenience
pub use lds_core::{
    Clock, ConfigError, FrameEvent, FrameStats, LidarConfig, LidarController, LidarEvents,
    Sample, SampleFlags, DEFAULT_CONFIG, DEFAULT_TARGET_RPM, FRAME_LEN, LDS_BAUDRATE,
};

pub mod clock;
pub mod events;
pub mod motor;

pub use clock::EmbassyClock;
pub use events::{dropped_samples, FirmwareEvents, SampleChannel, SAMPLE_QUEUE_DEPTH};
pub use motor::{MotorError, PwmMotor};
