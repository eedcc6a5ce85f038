//! Common error types used across the workspace.
//!
//! [`FrameError`] and [`CommandError`] are returned as-is by the domain
//! operations that produce them. Adapter errors convert into
//! [`HomenetError`] at port boundaries.

use crate::device::DeviceKey;
use crate::property::Property;

/// Top-level error type shared by the application core and its adapters.
#[derive(Debug, thiserror::Error)]
pub enum HomenetError {
    /// The byte-stream transport rejected a write or went away.
    #[error("transport error")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The message bus client rejected a publish.
    #[error("message bus error")]
    Bus(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Reasons a byte sequence is not a valid wall-pad frame.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FrameError {
    /// The sequence is not exactly [`FRAME_LEN`](crate::frame::FRAME_LEN) bytes.
    #[error("frame must be {expected} bytes, got {actual}")]
    WrongLength {
        /// Expected byte count.
        expected: usize,
        /// Actual byte count.
        actual: usize,
    },

    /// The last byte is not the terminator.
    #[error("frame must end with 0xAA, got {found:#04x}")]
    MissingTerminator {
        /// The byte found in the terminator position.
        found: u8,
    },
}

/// Reasons an inbound control message was discarded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    /// The topic does not follow the `<base>/<device><sub>/<property>` layout.
    #[error("unrecognised command topic {0:?}")]
    InvalidTopic(String),

    /// The device segment does not name a known device class.
    #[error("unknown device {0:?}")]
    UnknownDevice(String),

    /// The property segment does not name a known property.
    #[error("unknown property {0:?}")]
    UnknownProperty(String),

    /// The temperature payload is not an integer in `0..=127`.
    #[error("invalid target temperature {0:?}")]
    InvalidTemperature(String),

    /// No command descriptor matches the request.
    #[error("no command for {device}/{property} = {value:?}")]
    NoDescriptor {
        /// Target device.
        device: DeviceKey,
        /// Requested property.
        property: Property,
        /// Requested raw value.
        value: String,
    },
}
