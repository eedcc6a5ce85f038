//! Command descriptors — the frame to send for a requested property value and
//! the acknowledgment that confirms it.

use crate::device::DeviceKey;
use crate::error::CommandError;
use crate::frame::{CHECKSUM_INDEX, FRAME_LEN, Frame, TERMINATOR, checksum};
use crate::property::Property;
use crate::value::StateValue;

/// Byte of a set-temperature command carrying the target temperature.
pub const SET_TEMP_INDEX: usize = 5;

/// Offset added to the target temperature; the high bit doubles as the
/// heating flag.
const SET_TEMP_BIAS: u8 = 128;

/// Header and body bytes summed into a set-temperature checksum.
const SET_TEMP_CHECKSUM_SPAN: std::ops::RangeInclusive<usize> = 1..=5;

/// Highest target temperature that still fits beside the heating flag.
pub const MAX_SET_TEMP: u8 = 127;

/// What a command does to its device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandTarget {
    /// A fixed frame that drives the listed properties to these values.
    Values(Vec<(Property, StateValue)>),
    /// A set-temperature template that must be specialised before use.
    SetTempTemplate,
}

/// A command the gateway can put on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandDescriptor {
    pub key: DeviceKey,
    pub target: CommandTarget,
    /// Full frame for fixed commands, leading bytes for templates.
    pub payload: Vec<u8>,
    /// Byte pattern a later inbound frame contains once the command executed.
    pub ack: Vec<u8>,
}

impl CommandDescriptor {
    /// A fixed command setting one or more property values.
    #[must_use]
    pub fn fixed(
        key: DeviceKey,
        values: &[(Property, StateValue)],
        payload: &[u8],
        ack: &[u8],
    ) -> Self {
        Self {
            key,
            target: CommandTarget::Values(values.to_vec()),
            payload: payload.to_vec(),
            ack: ack.to_vec(),
        }
    }

    /// A set-temperature template made of the command's leading bytes.
    #[must_use]
    pub fn set_temp_template(key: DeviceKey, prefix: &[u8], ack: &[u8]) -> Self {
        Self {
            key,
            target: CommandTarget::SetTempTemplate,
            payload: prefix.to_vec(),
            ack: ack.to_vec(),
        }
    }

    /// Whether this descriptor still needs a target temperature.
    #[must_use]
    pub fn is_parametric(&self) -> bool {
        matches!(self.target, CommandTarget::SetTempTemplate)
    }

    /// The value this command drives `property` to, if it declares one.
    #[must_use]
    pub fn expected(&self, property: Property) -> Option<&StateValue> {
        match &self.target {
            CommandTarget::Values(values) => values
                .iter()
                .find(|(prop, _)| *prop == property)
                .map(|(_, value)| value),
            CommandTarget::SetTempTemplate => None,
        }
    }

    /// Whether a `(property, payload)` request selects this fixed command.
    #[must_use]
    pub fn accepts(&self, property: Property, payload: &str) -> bool {
        self.expected(property)
            .is_some_and(|value| value.matches_payload(payload))
    }

    /// Whether `frame` carries this command's acknowledgment.
    #[must_use]
    pub fn acknowledged_by(&self, frame: &Frame) -> bool {
        frame.contains(&self.ack)
    }

    /// Build the concrete set-temperature command for `degrees`.
    ///
    /// The template is padded to a full frame, byte 5 becomes
    /// `degrees + 128` and byte 13 the mod-256 sum of bytes 1–5.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::InvalidTemperature`] if `degrees` exceeds
    /// [`MAX_SET_TEMP`] or the descriptor is not a template.
    pub fn specialize(&self, degrees: u8) -> Result<Self, CommandError> {
        if !self.is_parametric() || degrees > MAX_SET_TEMP {
            return Err(CommandError::InvalidTemperature(degrees.to_string()));
        }

        let mut payload = [0u8; FRAME_LEN];
        let head = self.payload.len().min(SET_TEMP_INDEX);
        payload[..head].copy_from_slice(&self.payload[..head]);
        payload[SET_TEMP_INDEX] = degrees + SET_TEMP_BIAS;
        payload[CHECKSUM_INDEX] = checksum(&payload, SET_TEMP_CHECKSUM_SPAN);
        payload[FRAME_LEN - 1] = TERMINATOR;

        Ok(Self {
            key: self.key.clone(),
            target: CommandTarget::Values(vec![(
                Property::SetTemp,
                StateValue::Number(i16::from(degrees)),
            )]),
            payload: payload.to_vec(),
            ack: self.ack.clone(),
        })
    }
}
