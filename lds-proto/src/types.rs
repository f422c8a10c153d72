//! Decoded sample types.

use core::ops::{BitOr, BitOrAssign};

/// Per-sample error flags as a 2-bit code.
///
/// On the wire these are the top two bits of the distance MSB
/// (bit 7 = invalid data, bit 6 = strength warning). Here they are shifted
/// down so the code is `0..=3`.
///
/// ```
/// use lds_proto::SampleFlags;
///
/// let flags = SampleFlags::from_distance_msb(0x80 | 0x12);
/// assert!(flags.contains(SampleFlags::INVALID_DATA));
/// assert!(!flags.contains(SampleFlags::STRENGTH_WARNING));
/// assert_eq!(flags.code(), 2);
/// ```
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SampleFlags(u8);

impl SampleFlags {
    pub const NONE: Self = Self(0);
    pub const STRENGTH_WARNING: Self = Self(1 << 0);
    pub const INVALID_DATA: Self = Self(1 << 1);

    /// Mask of the flag bits inside the distance MSB.
    pub const WIRE_MASK: u8 = 0xC0;
    const WIRE_SHIFT: u32 = 6;

    /// Extract the flags from the second byte of a quad.
    #[inline]
    #[must_use]
    pub const fn from_distance_msb(msb: u8) -> Self {
        Self((msb & Self::WIRE_MASK) >> Self::WIRE_SHIFT)
    }

    /// Build from a 2-bit code; higher bits are dropped.
    #[inline]
    #[must_use]
    pub const fn from_code(code: u8) -> Self {
        Self(code & 0b11)
    }

    /// Flags positioned as they appear in the distance MSB.
    #[inline]
    #[must_use]
    pub const fn to_wire(self) -> u8 {
        self.0 << Self::WIRE_SHIFT
    }

    /// The 2-bit error code (`0` = no error).
    #[inline]
    #[must_use]
    pub const fn code(self) -> u8 {
        self.0
    }

    #[inline]
    #[must_use]
    pub const fn contains(self, flag: SampleFlags) -> bool {
        (self.0 & flag.0) == flag.0
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for SampleFlags {
    type Output = Self;

    #[inline]
    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for SampleFlags {
    #[inline]
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// One range reading.
///
/// When `flags` is non-empty the reading is unusable and both `distance_mm`
/// and `quality` are 0.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Sample {
    /// Absolute angle in degrees, `0..=359` for in-range frames.
    pub angle: u16,
    /// Distance in millimetres, `0..=16383`.
    pub distance_mm: u16,
    /// Signal strength.
    pub quality: u16,
    pub flags: SampleFlags,
}

impl Sample {
    /// True when no error flag is set.
    #[inline]
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.flags.is_empty()
    }
}
