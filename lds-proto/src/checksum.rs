//! 15-bit frame checksum.
//!
//! The first 20 bytes are read as 10 little-endian words and folded with a
//! shift-and-add, then the carry above bit 15 is added back in:
//!
//! ```text
//! acc = 0
//! for w in words: acc = (acc << 1) + w
//! sum = ((acc & 0x7FFF) + (acc >> 15)) & 0x7FFF
//! ```
//!
//! The result is sent LSB first in bytes 20 and 21.

use crate::frame::{RawFrame, CHECKSUM_SPAN};

/// Compute the checksum of a frame (bytes 0..20).
#[inline]
#[must_use]
pub fn checksum(frame: &RawFrame) -> u16 {
    checksum_bytes(&frame.as_bytes()[..CHECKSUM_SPAN])
}

/// Compute the checksum of an arbitrary even-length byte span.
///
/// A trailing odd byte is ignored. Frames always pass exactly 20 bytes, which
/// keeps the fold within 26 bits.
#[must_use]
pub fn checksum_bytes(data: &[u8]) -> u16 {
    let acc = data
        .chunks_exact(2)
        .map(|w| u32::from(u16::from_le_bytes([w[0], w[1]])))
        .fold(0u32, |acc, word| acc.wrapping_shl(1).wrapping_add(word));

    let folded = (acc & 0x7FFF) + (acc >> 15);
    (folded & 0x7FFF) as u16
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::FrameBuilder;
    use crate::frame::{FRAME_LEN, OFFSET_CHECKSUM};

    #[test]
    fn test_checksum_zero_payload() {
        assert_eq!(checksum_bytes(&[0u8; CHECKSUM_SPAN]), 0);
    }

    #[test]
    fn test_checksum_known_frame() {
        // FA A0 00 4B, four empty quads.
        // words: 0xA0FA, 0x4B00, then zeros.
        // acc = 0xA0FA << 9 + 0x4B00 << 8 = 0x0141_F400 + 0x004B_0000 = 0x018C_F400
        // sum = (0x7400 + 0x0319) & 0x7FFF = 0x7719
        let mut bytes = [0u8; FRAME_LEN];
        bytes[..4].copy_from_slice(&[0xFA, 0xA0, 0x00, 0x4B]);
        assert_eq!(checksum_bytes(&bytes[..CHECKSUM_SPAN]), 0x7719);
    }

    #[test]
    fn test_checksum_is_15_bit() {
        let payload = [0xFFu8; CHECKSUM_SPAN];
        assert!(checksum_bytes(&payload) <= 0x7FFF);
    }

    #[test]
    fn test_builder_frame_validates() {
        let frame = FrameBuilder::new(12)
            .rpm(301.5)
            .sample(0, 1234, 56)
            .sample(1, 16_383, 65_535)
            .sample(3, 1, 2)
            .build();
        assert!(frame.is_checksum_valid());
    }

    #[test]
    fn test_single_bit_flip_detected() {
        let frame = FrameBuilder::new(7)
            .rpm(290.0)
            .sample(0, 500, 100)
            .sample(1, 510, 110)
            .sample(2, 520, 120)
            .sample(3, 530, 130)
            .build();

        for byte in 0..CHECKSUM_SPAN {
            for bit in 0..8 {
                let mut bytes = *frame.as_bytes();
                bytes[byte] ^= 1 << bit;
                let corrupted = RawFrame::new(bytes);
                assert!(
                    !corrupted.is_checksum_valid(),
                    "flip of byte {} bit {} went undetected",
                    byte,
                    bit
                );
            }
        }
    }

    #[test]
    fn test_corrupted_checksum_bytes_rejected() {
        let mut bytes = *FrameBuilder::new(0).build().as_bytes();
        bytes[OFFSET_CHECKSUM] ^= 0x01;
        assert!(!RawFrame::new(bytes).is_checksum_valid());

        let mut bytes = *FrameBuilder::new(0).build().as_bytes();
        bytes[OFFSET_CHECKSUM + 1] ^= 0x40;
        assert!(!RawFrame::new(bytes).is_checksum_valid());
    }
}
