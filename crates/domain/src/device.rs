//! Device — a wall-pad controller addressed by class and sub-device id.
//!
//! On the message bus a device is spelled `<Class><sub>` (e.g. `Light1`,
//! `Thermo4`), which is also the form [`DeviceKey`] displays and parses.

use std::fmt;
use std::str::FromStr;

use crate::error::CommandError;

/// Device classes understood by the wall-pad protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DeviceKind {
    Light,
    Thermo,
    Fan,
    Gas,
    Door,
}

impl DeviceKind {
    /// All device classes, in protocol table order.
    pub const ALL: [Self; 5] = [Self::Light, Self::Thermo, Self::Fan, Self::Gas, Self::Door];

    /// The class tag used in bus topics.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "Light",
            Self::Thermo => "Thermo",
            Self::Fan => "Fan",
            Self::Gas => "Gas",
            Self::Door => "Door",
        }
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A device class plus sub-device identifier, e.g. `Thermo` + `"3"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeviceKey {
    pub kind: DeviceKind,
    pub sub_id: String,
}

impl DeviceKey {
    /// Build a key from a class and sub-device id.
    #[must_use]
    pub fn new(kind: DeviceKind, sub_id: impl Into<String>) -> Self {
        Self {
            kind,
            sub_id: sub_id.into(),
        }
    }
}

impl fmt::Display for DeviceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind, self.sub_id)
    }
}

impl FromStr for DeviceKey {
    type Err = CommandError;

    /// Parse the topic spelling: class tag immediately followed by a
    /// non-empty run of ASCII digits.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let split = s
            .find(|c: char| c.is_ascii_digit())
            .ok_or_else(|| CommandError::UnknownDevice(s.to_string()))?;
        let (tag, sub_id) = s.split_at(split);
        if !sub_id.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CommandError::UnknownDevice(s.to_string()));
        }
        let kind = DeviceKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == tag)
            .ok_or_else(|| CommandError::UnknownDevice(s.to_string()))?;
        Ok(Self::new(kind, sub_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_display_class_followed_by_sub_id() {
        let key = DeviceKey::new(DeviceKind::Thermo, "4");
        assert_eq!(key.to_string(), "Thermo4");
    }

    #[test]
    fn should_parse_topic_spelling() {
        let key: DeviceKey = "Light1".parse().unwrap();
        assert_eq!(key, DeviceKey::new(DeviceKind::Light, "1"));
    }

    #[test]
    fn should_parse_multi_digit_sub_id() {
        let key: DeviceKey = "Fan12".parse().unwrap();
        assert_eq!(key.kind, DeviceKind::Fan);
        assert_eq!(key.sub_id, "12");
    }

    #[test]
    fn should_reject_missing_sub_id() {
        let result = "Light".parse::<DeviceKey>();
        assert_eq!(result, Err(CommandError::UnknownDevice("Light".to_string())));
    }

    #[test]
    fn should_reject_unknown_class() {
        assert!("Sauna1".parse::<DeviceKey>().is_err());
    }

    #[test]
    fn should_reject_trailing_garbage_after_digits() {
        assert!("Light1a".parse::<DeviceKey>().is_err());
    }

    #[test]
    fn should_be_case_sensitive_on_class_tag() {
        assert!("light1".parse::<DeviceKey>().is_err());
    }
}
