//! Builder for well-formed frames.
//!
//! Produces frames with a correct checksum, which is what host tests and
//! sensor simulators need.
//!
//! # Example
//!
//! ```
//! use lds_proto::{FrameBuilder, SampleFlags};
//!
//! let frame = FrameBuilder::new(0)
//!     .rpm(300.0)
//!     .sample(0, 1200, 310)
//!     .flags(3, SampleFlags::INVALID_DATA)
//!     .build();
//!
//! assert!(frame.is_checksum_valid());
//! assert_eq!(frame.as_bytes()[..4], [0xFA, 0xA0, 0x00, 0x4B]);
//! ```

use crate::checksum::checksum;
use crate::frame::{
    RawFrame, FRAME_LEN, INDEX_MIN, MAX_DISTANCE_MM, OFFSET_CHECKSUM, OFFSET_INDEX, OFFSET_QUADS,
    OFFSET_SPEED, QUAD_LEN, SAMPLES_PER_FRAME, SPEED_SCALE, START_BYTE,
};
use crate::types::SampleFlags;

#[derive(Debug, Clone, Copy, Default)]
struct QuadSpec {
    distance_mm: u16,
    quality: u16,
    flags: SampleFlags,
}

/// Fluent builder for [`RawFrame`].
///
/// Starts from an all-zero payload for the given group at 0 RPM.
#[derive(Debug, Clone)]
pub struct FrameBuilder {
    index: u8,
    raw_speed: u16,
    quads: [QuadSpec; SAMPLES_PER_FRAME],
}

impl FrameBuilder {
    /// Start a frame for group `group` (`0..=89`, first angle `group * 4`).
    #[must_use]
    pub fn new(group: u8) -> Self {
        Self {
            index: INDEX_MIN.wrapping_add(group),
            raw_speed: 0,
            quads: [QuadSpec::default(); SAMPLES_PER_FRAME],
        }
    }

    /// Override the index byte verbatim, including out-of-range values.
    #[must_use]
    pub fn index_byte(mut self, index: u8) -> Self {
        self.index = index;
        self
    }

    /// Set the spin speed in RPM. Values beyond the 16-bit raw range saturate.
    #[must_use]
    pub fn rpm(mut self, rpm: f32) -> Self {
        self.raw_speed = (rpm * SPEED_SCALE) as u16;
        self
    }

    /// Set the spin speed in raw units (RPM × 64).
    #[must_use]
    pub fn raw_speed(mut self, raw: u16) -> Self {
        self.raw_speed = raw;
        self
    }

    /// Set distance and strength for quad `n`. Distance is truncated to 14 bits.
    ///
    /// Out-of-range `n` is ignored.
    #[must_use]
    pub fn sample(mut self, n: usize, distance_mm: u16, quality: u16) -> Self {
        if let Some(quad) = self.quads.get_mut(n) {
            quad.distance_mm = distance_mm & MAX_DISTANCE_MM;
            quad.quality = quality;
        }
        self
    }

    /// Set the error flags for quad `n`.
    #[must_use]
    pub fn flags(mut self, n: usize, flags: SampleFlags) -> Self {
        if let Some(quad) = self.quads.get_mut(n) {
            quad.flags = flags;
        }
        self
    }

    /// Encode the frame and fill in its checksum.
    #[must_use]
    pub fn build(self) -> RawFrame {
        let mut bytes = [0u8; FRAME_LEN];
        bytes[0] = START_BYTE;
        bytes[OFFSET_INDEX] = self.index;
        bytes[OFFSET_SPEED..OFFSET_SPEED + 2].copy_from_slice(&self.raw_speed.to_le_bytes());

        for (i, quad) in self.quads.iter().enumerate() {
            let base = OFFSET_QUADS + i * QUAD_LEN;
            let [dist_lo, dist_hi] = quad.distance_mm.to_le_bytes();
            let [qual_lo, qual_hi] = quad.quality.to_le_bytes();
            bytes[base] = dist_lo;
            bytes[base + 1] = dist_hi | quad.flags.to_wire();
            bytes[base + 2] = qual_lo;
            bytes[base + 3] = qual_hi;
        }

        let sum = checksum(&RawFrame::new(bytes)).to_le_bytes();
        bytes[OFFSET_CHECKSUM] = sum[0];
        bytes[OFFSET_CHECKSUM + 1] = sum[1];
        RawFrame::new(bytes)
    }
}

impl Default for FrameBuilder {
    fn default() -> Self {
        Self::new(0)
    }
}
