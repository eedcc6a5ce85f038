//! State values as they travel over the bus.
//!
//! The wall-pad vocabulary is irregular (`ON`/`OFF` for lights, `ON`/`off`
//! for the fan, `heat`/`off` for thermostats), so textual values keep their
//! exact spelling. Numeric readings are kept as integers.

use std::fmt;

/// A decoded or commanded property value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StateValue {
    /// A literal token such as `ON`, `off`, `heat` or `Middle`.
    Text(&'static str),
    /// An integer reading such as a temperature or brightness level.
    Number(i16),
}

impl StateValue {
    pub const ON: Self = Self::Text("ON");
    pub const OFF: Self = Self::Text("OFF");
    pub const OFF_LOWER: Self = Self::Text("off");
    pub const ON_LOWER: Self = Self::Text("on");
    pub const HEAT: Self = Self::Text("heat");

    /// Whether a raw bus payload spells this value.
    #[must_use]
    pub fn matches_payload(&self, payload: &str) -> bool {
        match self {
            Self::Text(text) => *text == payload,
            Self::Number(n) => payload.parse::<i16>().is_ok_and(|p| p == *n),
        }
    }
}

impl fmt::Display for StateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}
