//! Frame assembler — turns the raw inbound byte stream into [`Frame`]s.
//!
//! The protocol does not escape the terminator inside payloads, so a stray
//! `0xAA` can split a frame early. Two strategies are offered:
//!
//! - [`FramingStrategy::Delimited`] splits on every terminator and drops any
//!   piece that is not exactly [`FRAME_LEN`] bytes.
//! - [`FramingStrategy::FixedLength`] keeps a sliding window and drops one
//!   byte at a time until byte 14 of the window is the terminator.
//!
//! Either way only bytes satisfying the [`Frame`] invariants are emitted, and
//! at most [`FRAME_LEN`] bytes are held between calls.

use serde::Deserialize;

use crate::frame::{FRAME_LEN, Frame, TERMINATOR};

/// How the assembler finds frame boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FramingStrategy {
    /// Split at each terminator byte.
    #[default]
    Delimited,
    /// Resynchronise on a 15-byte window ending with the terminator.
    FixedLength,
}

/// Incremental frame assembler fed with arbitrary byte chunks.
#[derive(Debug, Default)]
pub struct FrameAssembler {
    strategy: FramingStrategy,
    buffer: Vec<u8>,
    /// Delimited mode only: bytes up to the next terminator belong to an
    /// oversized piece that was already dropped.
    discarding: bool,
}

impl FrameAssembler {
    /// Create an assembler using the given strategy.
    #[must_use]
    pub fn new(strategy: FramingStrategy) -> Self {
        Self {
            strategy,
            buffer: Vec::with_capacity(FRAME_LEN * 4),
            discarding: false,
        }
    }

    /// Append received bytes and return every frame they complete, in
    /// arrival order.
    pub fn push(&mut self, bytes: &[u8]) -> Vec<Frame> {
        self.buffer.extend_from_slice(bytes);
        match self.strategy {
            FramingStrategy::Delimited => self.drain_delimited(),
            FramingStrategy::FixedLength => self.drain_fixed_length(),
        }
    }

    /// Number of bytes waiting for a terminator.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Drop any partial frame, e.g. after the transport reconnects.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.discarding = false;
    }

    fn drain_delimited(&mut self) -> Vec<Frame> {
        let mut frames = Vec::new();
        if self.discarding {
            let Some(pos) = self.buffer.iter().position(|b| *b == TERMINATOR) else {
                self.buffer.clear();
                return frames;
            };
            self.buffer.drain(..=pos);
            self.discarding = false;
        }

        let mut start = 0;
        while let Some(pos) = self.buffer[start..].iter().position(|b| *b == TERMINATOR) {
            let end = start + pos + 1;
            if let Ok(frame) = Frame::try_from(&self.buffer[start..end]) {
                frames.push(frame);
            }
            start = end;
        }
        self.buffer.drain(..start);

        // Without a terminator this piece can no longer be a frame.
        if self.buffer.len() >= FRAME_LEN {
            self.buffer.clear();
            self.discarding = true;
        }
        frames
    }

    fn drain_fixed_length(&mut self) -> Vec<Frame> {
        let mut frames = Vec::new();
        let mut start = 0;
        while self.buffer.len() - start >= FRAME_LEN {
            match Frame::try_from(&self.buffer[start..start + FRAME_LEN]) {
                Ok(frame) => {
                    frames.push(frame);
                    start += FRAME_LEN;
                }
                Err(_) => start += 1,
            }
        }
        self.buffer.drain(..start);
        frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIGHT: &str = "f7200121810000000000000000c3aa";
    const FAN: &str = "f720017181000100000000000014aa";

    fn bytes(hex_str: &str) -> Vec<u8> {
        hex::decode(hex_str).unwrap()
    }

    // ── Delimited ───────────────────────────────────────────────────────

    #[test]
    fn should_emit_frame_split_across_chunks() {
        let mut asm = FrameAssembler::new(FramingStrategy::Delimited);
        let data = bytes(LIGHT);
        assert!(asm.push(&data[..6]).is_empty());
        let frames = asm.push(&data[6..]);
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].to_string(), LIGHT);
        assert_eq!(asm.pending(), 0);
    }

    #[test]
    fn should_emit_back_to_back_frames_in_order() {
        let mut asm = FrameAssembler::new(FramingStrategy::Delimited);
        let mut data = bytes(LIGHT);
        data.extend(bytes(FAN));
        let frames = asm.push(&data);
        let rendered: Vec<_> = frames.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, vec![LIGHT.to_string(), FAN.to_string()]);
    }

    #[test]
    fn should_discard_degenerate_pieces_between_terminators() {
        let mut asm = FrameAssembler::new(FramingStrategy::Delimited);
        let mut data = vec![0xAA, 0xAA, 0x01, 0xAA];
        data.extend(bytes(LIGHT));
        let frames = asm.push(&data);
        assert_eq!(frames.len(), 1);
    }

    #[test]
    fn should_drop_frame_split_by_embedded_terminator() {
        let mut asm = FrameAssembler::new(FramingStrategy::Delimited);
        let mut data = bytes(LIGHT);
        data[7] = 0xAA;
        assert!(asm.push(&data).is_empty());
        assert_eq!(asm.pending(), 0);
    }

    #[test]
    fn should_keep_trailing_partial_bytes() {
        let mut asm = FrameAssembler::new(FramingStrategy::Delimited);
        let mut data = bytes(LIGHT);
        data.extend_from_slice(&[0xF7, 0x20]);
        assert_eq!(asm.push(&data).len(), 1);
        assert_eq!(asm.pending(), 2);
        asm.reset();
        assert_eq!(asm.pending(), 0);
    }

    #[test]
    fn should_bound_buffer_when_terminator_never_arrives() {
        let mut asm = FrameAssembler::new(FramingStrategy::Delimited);
        for _ in 0..100 {
            assert!(asm.push(&[0x01; 64]).is_empty());
            assert!(asm.pending() < FRAME_LEN);
        }

        // The oversized piece ends at the next terminator and is dropped.
        let mut data = bytes(FAN);
        data.extend(bytes(LIGHT));
        let frames = asm.push(&data);
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].to_string(), LIGHT);
    }

    #[test]
    fn should_stop_discarding_after_reset() {
        let mut asm = FrameAssembler::new(FramingStrategy::Delimited);
        asm.push(&[0x01; 20]);
        asm.reset();
        assert_eq!(asm.push(&bytes(LIGHT)).len(), 1);
    }

    // ── Fixed length ────────────────────────────────────────────────────

    #[test]
    fn should_resync_after_leading_garbage() {
        let mut asm = FrameAssembler::new(FramingStrategy::FixedLength);
        let mut data = vec![0x01, 0x02, 0x03];
        data.extend(bytes(FAN));
        let frames = asm.push(&data);
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].to_string(), FAN);
    }

    #[test]
    fn should_tolerate_embedded_terminator_with_fixed_length() {
        let mut asm = FrameAssembler::new(FramingStrategy::FixedLength);
        let mut data = bytes(LIGHT);
        data[7] = 0xAA;
        let frames = asm.push(&data);
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].byte(7), Some(0xAA));
    }

    #[test]
    fn should_wait_for_full_window() {
        let mut asm = FrameAssembler::new(FramingStrategy::FixedLength);
        assert!(asm.push(&bytes(LIGHT)[..14]).is_empty());
        assert_eq!(asm.pending(), 14);
        assert_eq!(asm.push(&[0xAA]).len(), 1);
    }

    // ── Invariant ───────────────────────────────────────────────────────

    #[test]
    fn should_only_emit_valid_frames_for_noisy_input() {
        let noise: Vec<u8> = (0u16..600)
            .map(|i| if i % 7 == 0 { 0xAA } else { (i * 31 % 251) as u8 })
            .collect();
        for strategy in [FramingStrategy::Delimited, FramingStrategy::FixedLength] {
            let mut asm = FrameAssembler::new(strategy);
            for chunk in noise.chunks(13) {
                for frame in asm.push(chunk) {
                    assert_eq!(frame.as_bytes().len(), FRAME_LEN);
                    assert_eq!(frame.byte(FRAME_LEN - 1), Some(TERMINATOR));
                }
            }
        }
    }

    #[test]
    fn should_deserialize_strategy_from_snake_case() {
        #[derive(Deserialize)]
        struct Wrapper {
            framing: FramingStrategy,
        }
        let parsed: Wrapper = toml::from_str(r#"framing = "fixed_length""#).unwrap();
        assert_eq!(parsed.framing, FramingStrategy::FixedLength);
    }
}
