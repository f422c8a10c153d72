//! Frame layout constants and the raw frame container.

use crate::checksum::checksum;

/// Length of one frame on the wire, in bytes.
pub const FRAME_LEN: usize = 22;

/// Start marker, always the first byte of a frame.
pub const START_BYTE: u8 = 0xFA;

/// Index byte of the first group in a revolution (angles 0..=3).
pub const INDEX_MIN: u8 = 0xA0;

/// Index byte of the last group in a revolution (angles 356..=359).
pub const INDEX_MAX: u8 = 0xF9;

/// Samples (quads) carried by one frame.
pub const SAMPLES_PER_FRAME: usize = 4;

/// Number of bytes covered by the checksum.
pub const CHECKSUM_SPAN: usize = 20;

pub const OFFSET_INDEX: usize = 1;
pub const OFFSET_SPEED: usize = 2;
pub const OFFSET_QUADS: usize = 4;
pub const OFFSET_CHECKSUM: usize = 20;

/// Size of one quad.
pub const QUAD_LEN: usize = 4;

/// Largest encodable distance (14 bits).
pub const MAX_DISTANCE_MM: u16 = 0x3FFF;

/// Raw speed units per RPM.
pub const SPEED_SCALE: f32 = 64.0;

/// Reason a completed frame was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Computed checksum does not match bytes 20..22.
    Checksum {
        /// Checksum computed over the first 20 bytes.
        computed: u16,
        /// Checksum carried by the frame.
        received: u16,
    },
    /// Index byte outside `INDEX_MIN..=INDEX_MAX`.
    IndexOutOfRange(u8),
}

/// One complete 22-byte frame as received from the sensor.
///
/// Holding a `RawFrame` says nothing about its integrity; see
/// [`RawFrame::is_checksum_valid`] and [`crate::decode`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawFrame(pub [u8; FRAME_LEN]);

impl RawFrame {
    #[inline]
    #[must_use]
    pub const fn new(bytes: [u8; FRAME_LEN]) -> Self {
        Self(bytes)
    }

    #[inline]
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; FRAME_LEN] {
        &self.0
    }

    #[inline]
    #[must_use]
    pub const fn index_byte(&self) -> u8 {
        self.0[OFFSET_INDEX]
    }

    /// Group number `0..=89`, or `None` if the index byte is out of range.
    #[inline]
    #[must_use]
    pub const fn group(&self) -> Option<u8> {
        let index = self.index_byte();
        if index >= INDEX_MIN && index <= INDEX_MAX {
            Some(index - INDEX_MIN)
        } else {
            None
        }
    }

    /// Absolute angle of the first sample, in degrees.
    #[inline]
    #[must_use]
    pub fn first_angle(&self) -> Option<u16> {
        self.group()
            .map(|g| u16::from(g) * SAMPLES_PER_FRAME as u16)
    }

    /// Spin speed in raw units (RPM × 64).
    #[inline]
    #[must_use]
    pub const fn raw_speed(&self) -> u16 {
        u16::from_le_bytes([self.0[OFFSET_SPEED], self.0[OFFSET_SPEED + 1]])
    }

    /// Spin speed in revolutions per minute.
    #[inline]
    #[must_use]
    pub fn rpm(&self) -> f32 {
        f32::from(self.raw_speed()) / SPEED_SCALE
    }

    /// The 4 bytes of quad `n` (`0..4`).
    #[inline]
    #[must_use]
    pub fn quad(&self, n: usize) -> [u8; QUAD_LEN] {
        let base = OFFSET_QUADS + n * QUAD_LEN;
        [self.0[base], self.0[base + 1], self.0[base + 2], self.0[base + 3]]
    }

    /// Checksum carried in the last two bytes.
    #[inline]
    #[must_use]
    pub const fn received_checksum(&self) -> u16 {
        u16::from_le_bytes([self.0[OFFSET_CHECKSUM], self.0[OFFSET_CHECKSUM + 1]])
    }

    /// Verify the frame checksum.
    #[inline]
    #[must_use]
    pub fn is_checksum_valid(&self) -> bool {
        checksum(self) == self.received_checksum()
    }

    /// Check integrity: checksum first, then the index range.
    pub fn validate(&self) -> Result<(), FrameError> {
        let computed = checksum(self);
        let received = self.received_checksum();
        if computed != received {
            return Err(FrameError::Checksum { computed, received });
        }
        if self.group().is_none() {
            return Err(FrameError::IndexOutOfRange(self.index_byte()));
        }
        Ok(())
    }
}

impl From<[u8; FRAME_LEN]> for RawFrame {
    fn from(bytes: [u8; FRAME_LEN]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for RawFrame {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}
