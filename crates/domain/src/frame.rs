//! Wall-pad frame — one fixed-length unit of the RS-485 protocol.
//!
//! ```text
//! +------+--------------------+---------------------+----------+------+
//! | 0xF7 | class / command    | body                | checksum | 0xAA |
//! | [0]  | [1..=4]            | [5..=12]            | [13]     | [14] |
//! +------+--------------------+---------------------+----------+------+
//! ```

use std::fmt;
use std::ops::RangeInclusive;

use crate::error::FrameError;

/// Total frame length, terminator included.
pub const FRAME_LEN: usize = 15;

/// Leader byte of every frame.
pub const LEADER: u8 = 0xF7;

/// Terminator byte of every frame.
pub const TERMINATOR: u8 = 0xAA;

/// Position of the checksum byte in command frames.
pub const CHECKSUM_INDEX: usize = 13;

/// A validated 15-byte frame ending with [`TERMINATOR`].
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Frame([u8; FRAME_LEN]);

impl Frame {
    /// Raw bytes, terminator included.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Whether `prefix` is a byte-for-byte prefix of this frame.
    #[must_use]
    pub fn starts_with(&self, prefix: &[u8]) -> bool {
        self.0.starts_with(prefix)
    }

    /// Whether `pattern` occurs anywhere in this frame.
    ///
    /// An empty pattern never matches.
    #[must_use]
    pub fn contains(&self, pattern: &[u8]) -> bool {
        !pattern.is_empty() && self.0.windows(pattern.len()).any(|window| window == pattern)
    }

    /// Byte at `index`, or `None` past the end of the frame.
    #[must_use]
    pub fn byte(&self, index: usize) -> Option<u8> {
        self.0.get(index).copied()
    }
}

impl TryFrom<&[u8]> for Frame {
    type Error = FrameError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let array: [u8; FRAME_LEN] = bytes.try_into().map_err(|_| FrameError::WrongLength {
            expected: FRAME_LEN,
            actual: bytes.len(),
        })?;
        match array[FRAME_LEN - 1] {
            TERMINATOR => Ok(Self(array)),
            found => Err(FrameError::MissingTerminator { found }),
        }
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Frame({self})")
    }
}

/// Mod-256 sum of `bytes[span]`.
///
/// # Panics
///
/// Panics if `span` reaches past the end of `bytes`.
#[must_use]
pub fn checksum(bytes: &[u8], span: RangeInclusive<usize>) -> u8 {
    bytes[span].iter().fold(0u8, |acc, b| acc.wrapping_add(*b))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn light_status() -> Vec<u8> {
        hex::decode("f7200121810000000000000000c3aa").unwrap()
    }

    #[test]
    fn should_accept_fifteen_bytes_ending_in_terminator() {
        let frame = Frame::try_from(light_status().as_slice()).unwrap();
        assert_eq!(frame.as_bytes()[0], LEADER);
        assert_eq!(frame.byte(14), Some(TERMINATOR));
    }

    #[test]
    fn should_reject_short_sequence() {
        let err = Frame::try_from(&[0xF7, 0xAA][..]).unwrap_err();
        assert_eq!(
            err,
            FrameError::WrongLength {
                expected: 15,
                actual: 2
            }
        );
    }

    #[test]
    fn should_reject_missing_terminator() {
        let mut bytes = light_status();
        bytes[14] = 0x00;
        let err = Frame::try_from(bytes.as_slice()).unwrap_err();
        assert_eq!(err, FrameError::MissingTerminator { found: 0x00 });
    }

    #[test]
    fn should_find_pattern_anywhere_in_frame() {
        let bytes = hex::decode("f7200121 9f0000000000000000 00 aa".replace(' ', "")).unwrap();
        let frame = Frame::try_from(bytes.as_slice()).unwrap();
        assert!(frame.contains(&[0x20, 0x01, 0x21, 0x9f]));
        assert!(!frame.contains(&[0x20, 0x01, 0x31, 0x9f]));
    }

    #[test]
    fn should_never_match_empty_pattern() {
        let frame = Frame::try_from(light_status().as_slice()).unwrap();
        assert!(!frame.contains(&[]));
    }

    #[test]
    fn should_render_as_lowercase_hex() {
        let frame = Frame::try_from(light_status().as_slice()).unwrap();
        assert_eq!(frame.to_string(), "f7200121810000000000000000c3aa");
    }

    #[test]
    fn should_wrap_checksum_modulo_256() {
        let bytes = [0xF7, 0x20, 0x44, 0x01, 0x11, 0x98];
        assert_eq!(checksum(&bytes, 1..=5), 0x0E);
    }
}
