//! Frame decoding: rotation group, spin speed and the four samples.

use crate::frame::{FrameError, RawFrame, SAMPLES_PER_FRAME};
use crate::types::{Sample, SampleFlags};

/// Contents of a validated frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DecodedFrame {
    /// Group number `0..=89`.
    pub group: u8,
    /// Angle of `samples[0]`, degrees.
    pub first_angle: u16,
    /// Spin speed, RPM × 64.
    pub raw_speed: u16,
    /// Samples in ascending angle order.
    pub samples: [Sample; SAMPLES_PER_FRAME],
}

impl DecodedFrame {
    /// Spin speed in revolutions per minute.
    #[inline]
    #[must_use]
    pub fn rpm(&self) -> f32 {
        f32::from(self.raw_speed) / crate::frame::SPEED_SCALE
    }

    /// True for the frame that opens a revolution (angles 0..=3).
    #[inline]
    #[must_use]
    pub const fn starts_revolution(&self) -> bool {
        self.first_angle == 0
    }
}

/// Validate and decode a complete frame.
///
/// Rejects the frame on checksum mismatch, or when the index byte lies outside
/// `0xA0..=0xF9` even if the checksum matches.
///
/// ```
/// use lds_proto::{decode, FrameBuilder};
///
/// let frame = FrameBuilder::new(1).rpm(300.0).sample(2, 1500, 90).build();
/// let decoded = decode(&frame).unwrap();
/// assert_eq!(decoded.first_angle, 4);
/// assert_eq!(decoded.samples[2].angle, 6);
/// assert_eq!(decoded.samples[2].distance_mm, 1500);
/// assert_eq!(decoded.rpm(), 300.0);
/// ```
pub fn decode(frame: &RawFrame) -> Result<DecodedFrame, FrameError> {
    frame.validate()?;

    let group = frame
        .group()
        .ok_or(FrameError::IndexOutOfRange(frame.index_byte()))?;
    let first_angle = u16::from(group) * SAMPLES_PER_FRAME as u16;

    let mut samples = [Sample::default(); SAMPLES_PER_FRAME];
    for (i, sample) in samples.iter_mut().enumerate() {
        *sample = decode_quad(frame.quad(i), first_angle + i as u16);
    }

    Ok(DecodedFrame {
        group,
        first_angle,
        raw_speed: frame.raw_speed(),
        samples,
    })
}

/// Decode one quad:
///
/// ```text
/// byte 0: distance 7:0
/// byte 1: [invalid][warning] distance 13:8
/// byte 2: strength 7:0
/// byte 3: strength 15:8
/// ```
fn decode_quad(quad: [u8; 4], angle: u16) -> Sample {
    let flags = SampleFlags::from_distance_msb(quad[1]);
    if !flags.is_empty() {
        return Sample {
            angle,
            distance_mm: 0,
            quality: 0,
            flags,
        };
    }

    Sample {
        angle,
        distance_mm: u16::from(quad[0]) | (u16::from(quad[1] & 0x3F) << 8),
        quality: u16::from_le_bytes([quad[2], quad[3]]),
        flags,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::FrameBuilder;
    use crate::checksum::checksum;
    use crate::frame::{FRAME_LEN, OFFSET_CHECKSUM, OFFSET_QUADS};

    fn zero_frame_group0_300rpm() -> RawFrame {
        let mut bytes = [0u8; FRAME_LEN];
        bytes[..4].copy_from_slice(&[0xFA, 0xA0, 0x00, 0x4B]);
        let sum = checksum(&RawFrame::new(bytes)).to_le_bytes();
        bytes[OFFSET_CHECKSUM] = sum[0];
        bytes[OFFSET_CHECKSUM + 1] = sum[1];
        RawFrame::new(bytes)
    }

    #[test]
    fn test_decode_zero_frame() {
        let decoded = decode(&zero_frame_group0_300rpm()).unwrap();
        assert_eq!(decoded.group, 0);
        assert!(decoded.starts_revolution());
        assert_eq!(decoded.rpm(), 300.0);
        for (i, s) in decoded.samples.iter().enumerate() {
            assert_eq!(s.angle, i as u16);
            assert_eq!(s.distance_mm, 0);
            assert_eq!(s.quality, 0);
            assert_eq!(s.flags.code(), 0);
        }
    }

    #[test]
    fn test_decode_angles_increase() {
        let decoded = decode(&FrameBuilder::new(45).build()).unwrap();
        let angles: [u16; 4] = [
            decoded.samples[0].angle,
            decoded.samples[1].angle,
            decoded.samples[2].angle,
            decoded.samples[3].angle,
        ];
        assert_eq!(angles, [180, 181, 182, 183]);
    }

    #[test]
    fn test_decode_last_group() {
        let decoded = decode(&FrameBuilder::new(89).build()).unwrap();
        assert_eq!(decoded.samples[3].angle, 359);
    }

    #[test]
    fn test_decode_distance_and_quality() {
        let frame = FrameBuilder::new(2)
            .sample(0, 0x3FFF, 0xFFFF)
            .sample(1, 0x0123, 0x4567)
            .build();
        let decoded = decode(&frame).unwrap();
        assert_eq!(decoded.samples[0].distance_mm, 16_383);
        assert_eq!(decoded.samples[0].quality, 65_535);
        assert_eq!(decoded.samples[1].distance_mm, 0x0123);
        assert_eq!(decoded.samples[1].quality, 0x4567);
    }

    #[test]
    fn test_flagged_quad_zeroes_distance_and_quality() {
        // Distance and strength bytes are non-zero on the wire but must be
        // suppressed once a flag is present.
        let frame = FrameBuilder::new(10)
            .sample(0, 1000, 200)
            .sample(1, 1000, 200)
            .flags(1, SampleFlags::INVALID_DATA)
            .sample(2, 1000, 200)
            .flags(2, SampleFlags::STRENGTH_WARNING)
            .sample(3, 1000, 200)
            .flags(3, SampleFlags::INVALID_DATA | SampleFlags::STRENGTH_WARNING)
            .build();
        let decoded = decode(&frame).unwrap();

        assert_eq!(decoded.samples[0].quality, 200);
        assert_eq!(decoded.samples[0].flags.code(), 0);

        assert_eq!(decoded.samples[1].flags.code(), 2);
        assert_eq!(decoded.samples[2].flags.code(), 1);
        assert_eq!(decoded.samples[3].flags.code(), 3);
        for s in &decoded.samples[1..] {
            assert_eq!(s.distance_mm, 0);
            assert_eq!(s.quality, 0);
        }
    }

    #[test]
    fn test_quality_independent_of_distance_bits() {
        let frame = FrameBuilder::new(0).sample(0, 0x3F00, 0x1234).build();
        let bytes = frame.as_bytes();
        assert_eq!(bytes[OFFSET_QUADS + 1], 0x3F);
        let decoded = decode(&frame).unwrap();
        assert_eq!(decoded.samples[0].quality, 0x1234);
    }

    #[test]
    fn test_decode_rejects_bad_checksum() {
        let mut bytes = *zero_frame_group0_300rpm().as_bytes();
        bytes[OFFSET_CHECKSUM] = 0;
        bytes[OFFSET_CHECKSUM + 1] = 0;
        assert!(matches!(
            decode(&RawFrame::new(bytes)),
            Err(FrameError::Checksum {
                computed: 0x7719,
                received: 0
            })
        ));
    }

    #[test]
    fn test_decode_rejects_out_of_range_index() {
        let frame = FrameBuilder::new(0).index_byte(0xFA).build();
        assert_eq!(decode(&frame), Err(FrameError::IndexOutOfRange(0xFA)));
    }

    #[test]
    fn test_decode_is_deterministic() {
        let frame = FrameBuilder::new(30)
            .rpm(310.0)
            .sample(0, 800, 40)
            .sample(3, 900, 50)
            .flags(1, SampleFlags::STRENGTH_WARNING)
            .build();
        assert_eq!(decode(&frame), decode(&frame));
    }
}
