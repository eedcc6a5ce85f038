//! Property — a named observable or controllable aspect of a device.

use std::fmt;
use std::str::FromStr;

use crate::error::CommandError;

/// Properties exchanged on the bus, spelled the way topics spell them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Property {
    Power,
    Brightness,
    CurTemp,
    SetTemp,
    Speed,
    Open,
}

impl Property {
    const ALL: [Self; 6] = [
        Self::Power,
        Self::Brightness,
        Self::CurTemp,
        Self::SetTemp,
        Self::Speed,
        Self::Open,
    ];

    /// Topic segment for this property.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Power => "power",
            Self::Brightness => "brightness",
            Self::CurTemp => "curTemp",
            Self::SetTemp => "setTemp",
            Self::Speed => "speed",
            Self::Open => "open",
        }
    }

    /// Whether commands for this property are synthesized from a numeric
    /// payload instead of looked up verbatim.
    #[must_use]
    pub fn is_parametric(self) -> bool {
        matches!(self, Self::SetTemp)
    }

    /// Whether this property reports a continuously varying sensor reading
    /// whose publishes are rate-limited.
    #[must_use]
    pub fn is_sensor_reading(self) -> bool {
        matches!(self, Self::CurTemp)
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Property {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|prop| prop.as_str() == s)
            .ok_or_else(|| CommandError::UnknownProperty(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_roundtrip_every_property_through_topic_segment() {
        for prop in Property::ALL {
            assert_eq!(prop.as_str().parse::<Property>(), Ok(prop));
        }
    }

    #[test]
    fn should_keep_camel_case_for_temperatures() {
        assert_eq!(Property::CurTemp.to_string(), "curTemp");
        assert_eq!(Property::SetTemp.to_string(), "setTemp");
    }

    #[test]
    fn should_reject_status_as_command_property() {
        assert_eq!(
            "status".parse::<Property>(),
            Err(CommandError::UnknownProperty("status".to_string()))
        );
    }

    #[test]
    fn should_flag_only_set_temp_as_parametric() {
        let parametric: Vec<_> = Property::ALL
            .into_iter()
            .filter(|p| p.is_parametric())
            .collect();
        assert_eq!(parametric, vec![Property::SetTemp]);
    }

    #[test]
    fn should_flag_only_cur_temp_as_sensor_reading() {
        assert!(Property::CurTemp.is_sensor_reading());
        assert!(!Property::SetTemp.is_sensor_reading());
        assert!(!Property::Power.is_sensor_reading());
    }
}
