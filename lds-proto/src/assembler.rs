//! Byte-at-a-time frame assembly.
//!
//! The assembler only synchronizes on the start byte while idle. Once a frame
//! is being collected every byte, including `0xFA`, is payload; a stream that
//! slips out of alignment produces frames that fail the checksum and the
//! assembler falls back to seeking after each one.

use crate::frame::{RawFrame, FRAME_LEN, START_BYTE};

/// Assembler state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AssemblerState {
    /// Discarding bytes until a start byte arrives.
    SeekingStart,
    /// Collecting the remainder of a frame.
    Accumulating,
}

/// Reassembles fixed-length frames from an unframed byte stream.
///
/// ```
/// use lds_proto::{FrameAssembler, FrameBuilder};
///
/// let frame = FrameBuilder::new(0).rpm(300.0).build();
/// let mut assembler = FrameAssembler::new();
///
/// // Leading noise is skipped.
/// assert!(assembler.push_byte(0x12).is_none());
///
/// let mut out = None;
/// for &b in frame.as_bytes() {
///     out = assembler.push_byte(b);
/// }
/// assert_eq!(out, Some(frame));
/// ```
pub struct FrameAssembler {
    buffer: [u8; FRAME_LEN],
    pos: usize,
    state: AssemblerState,
    discarded: u32,
}

impl FrameAssembler {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            buffer: [0u8; FRAME_LEN],
            pos: 0,
            state: AssemblerState::SeekingStart,
            discarded: 0,
        }
    }

    /// Drop any partial frame and go back to seeking.
    pub fn reset(&mut self) {
        self.buffer = [0u8; FRAME_LEN];
        self.pos = 0;
        self.state = AssemblerState::SeekingStart;
    }

    /// Feed one byte.
    ///
    /// Returns the frame when this byte completes it. The frame is returned
    /// unvalidated and the assembler is reset before returning.
    pub fn push_byte(&mut self, byte: u8) -> Option<RawFrame> {
        match self.state {
            AssemblerState::SeekingStart => {
                if byte == START_BYTE {
                    self.buffer[0] = byte;
                    self.pos = 1;
                    self.state = AssemblerState::Accumulating;
                } else {
                    self.discarded = self.discarded.wrapping_add(1);
                }
                None
            }
            AssemblerState::Accumulating => {
                self.buffer[self.pos] = byte;
                self.pos += 1;

                if self.pos == FRAME_LEN {
                    let frame = RawFrame::new(self.buffer);
                    self.reset();
                    Some(frame)
                } else {
                    None
                }
            }
        }
    }

    #[inline]
    #[must_use]
    pub const fn state(&self) -> AssemblerState {
        self.state
    }

    /// Bytes collected for the frame in progress.
    #[inline]
    #[must_use]
    pub const fn buffered(&self) -> usize {
        self.pos
    }

    /// Total bytes dropped while seeking a start byte (wrapping).
    #[inline]
    #[must_use]
    pub const fn discarded(&self) -> u32 {
        self.discarded
    }
}

impl Default for FrameAssembler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::FrameBuilder;

    fn feed(assembler: &mut FrameAssembler, bytes: &[u8]) -> usize {
        bytes
            .iter()
            .filter(|&&b| assembler.push_byte(b).is_some())
            .count()
    }

    #[test]
    fn test_noise_without_start_byte_yields_nothing() {
        let mut assembler = FrameAssembler::new();
        let noise: [u8; 256] = core::array::from_fn(|i| if i as u8 == START_BYTE { 0 } else { i as u8 });
        assert_eq!(feed(&mut assembler, &noise), 0);
        assert_eq!(assembler.state(), AssemblerState::SeekingStart);
        assert_eq!(assembler.discarded(), 256);
    }

    #[test]
    fn test_start_byte_begins_accumulation() {
        let mut assembler = FrameAssembler::new();
        assert!(assembler.push_byte(START_BYTE).is_none());
        assert_eq!(assembler.state(), AssemblerState::Accumulating);
        assert_eq!(assembler.buffered(), 1);
    }

    #[test]
    fn test_completes_after_exactly_22_bytes() {
        let mut assembler = FrameAssembler::new();
        let frame = FrameBuilder::new(3).build();
        let bytes = frame.as_bytes();
        for &b in &bytes[..FRAME_LEN - 1] {
            assert!(assembler.push_byte(b).is_none());
        }
        assert_eq!(assembler.push_byte(bytes[FRAME_LEN - 1]), Some(frame));
        assert_eq!(assembler.state(), AssemblerState::SeekingStart);
        assert_eq!(assembler.buffered(), 0);
    }

    #[test]
    fn test_start_byte_inside_frame_is_data() {
        let mut assembler = FrameAssembler::new();
        // Distance LSB of quad 0 equals the start byte.
        let frame = FrameBuilder::new(0).sample(0, u16::from(START_BYTE), 0).build();
        assert_eq!(frame.as_bytes()[4], START_BYTE);

        let mut out = None;
        for &b in frame.as_bytes() {
            out = assembler.push_byte(b);
        }
        assert_eq!(out, Some(frame));
    }

    #[test]
    fn test_back_to_back_frames() {
        let mut assembler = FrameAssembler::new();
        let a = FrameBuilder::new(0).build();
        let b = FrameBuilder::new(1).build();
        assert_eq!(feed(&mut assembler, a.as_bytes()), 1);
        assert_eq!(feed(&mut assembler, b.as_bytes()), 1);
    }

    #[test]
    fn test_reset_drops_partial_frame() {
        let mut assembler = FrameAssembler::new();
        let frame = FrameBuilder::new(0).build();
        feed(&mut assembler, &frame.as_bytes()[..10]);
        assembler.reset();
        assert_eq!(assembler.state(), AssemblerState::SeekingStart);
        assert_eq!(feed(&mut assembler, frame.as_bytes()), 1);
    }
}
