//! Command synthesizer — resolves a requested `(device, property, value)` into
//! the concrete command to put on the wire.

use crate::command::{CommandDescriptor, MAX_SET_TEMP};
use crate::device::DeviceKey;
use crate::dictionary::ProtocolDictionary;
use crate::error::CommandError;
use crate::property::Property;

/// Resolve a command request.
///
/// Fixed commands are returned as declared. A set-temperature request
/// specialises the device's template with the parsed degrees.
///
/// # Errors
///
/// Returns [`CommandError::InvalidTemperature`] if a set-temperature payload is
/// not a decimal number in `0..=127`, and [`CommandError::NoDescriptor`] if
/// the dictionary has no command for the request.
pub fn synthesize(
    dictionary: &ProtocolDictionary,
    key: &DeviceKey,
    property: Property,
    raw: &str,
) -> Result<CommandDescriptor, CommandError> {
    let no_descriptor = || CommandError::NoDescriptor {
        device: key.clone(),
        property,
        value: raw.to_string(),
    };

    if property.is_parametric() {
        let degrees = parse_temperature(raw)?;
        let template = dictionary
            .match_command(key, property, raw)
            .ok_or_else(no_descriptor)?;
        return template.specialize(degrees);
    }

    dictionary
        .match_command(key, property, raw)
        .cloned()
        .ok_or_else(no_descriptor)
}

/// Parse whole degrees from a decimal payload, dropping any fraction.
///
/// # Errors
///
/// Returns [`CommandError::InvalidTemperature`] for anything that is not a
/// non-negative decimal whose integer part fits in `0..=127`.
pub fn parse_temperature(raw: &str) -> Result<u8, CommandError> {
    let invalid = || CommandError::InvalidTemperature(raw.to_string());
    let trimmed = raw.trim();
    let (whole, fraction) = trimmed.split_once('.').unwrap_or((trimmed, ""));

    if !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    let degrees: u8 = whole.parse().map_err(|_| invalid())?;
    if degrees > MAX_SET_TEMP {
        return Err(invalid());
    }
    Ok(degrees)
}
