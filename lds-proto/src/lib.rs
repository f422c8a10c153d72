//! Wire protocol of the Neato XV / LDS02RR spinning LIDAR.
//!
//! The sensor streams 22-byte frames over UART (115200 8N1), 90 frames per
//! revolution, each carrying four consecutive one-degree readings:
//!
//! ```text
//! offset  0     start byte 0xFA
//! offset  1     index 0xA0..=0xF9 (group 0..=89, first angle = group * 4)
//! offset  2-3   speed, RPM * 64, little endian
//! offset  4-19  four quads:
//!                 distance 7:0
//!                 [invalid][warning] distance 13:8
//!                 strength 7:0
//!                 strength 15:8
//! offset 20-21  15-bit checksum, little endian
//! ```
//!
//! - [`FrameAssembler`] - byte-at-a-time framing
//! - [`checksum()`] / [`RawFrame::validate`] - integrity check
//! - [`decode()`] - samples and spin speed from a valid frame
//! - [`FrameBuilder`] - well-formed frames for tests and simulation
//!
//! # Features
//!
//! - **`std`**: Enable standard library support (for host testing)
//! - **`defmt`**: Derive `defmt::Format` on public types
//!
//! # No-std Support
//!
//! This crate is `#![no_std]` by default and uses no heap allocations.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
extern crate std;

pub mod assembler;
pub mod builder;
pub mod checksum;
pub mod decode;
pub mod frame;
pub mod types;

pub use assembler::{AssemblerState, FrameAssembler};
pub use builder::FrameBuilder;
pub use checksum::{checksum, checksum_bytes};
pub use decode::{decode, DecodedFrame};
pub use frame::{
    FrameError, RawFrame, FRAME_LEN, INDEX_MAX, INDEX_MIN, MAX_DISTANCE_MM, SAMPLES_PER_FRAME,
    START_BYTE,
};
pub use types::{Sample, SampleFlags};

/// Baud rate of the sensor's serial output.
pub const LDS_BAUDRATE: u32 = 115_200;
