//! Topic layout — maps device keys and properties to bus topics and back.
//!
//! With the default layout status values go to `homenet/<Dev><sub>/<property>`
//! and commands arrive on the same topics. Optional suffixes move either side
//! to `…/<property>/<suffix>`.

use homenet_domain::device::DeviceKey;
use homenet_domain::error::CommandError;
use homenet_domain::property::Property;

/// Property segment of the acknowledgment topic.
pub const STATUS_SEGMENT: &str = "status";

/// Payload published on the acknowledgment topic.
pub const ACK_PAYLOAD: &str = "success";

/// Base topic and optional per-direction suffixes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicLayout {
    base: String,
    state_suffix: Option<String>,
    command_suffix: Option<String>,
}

impl Default for TopicLayout {
    fn default() -> Self {
        Self::new("homenet")
    }
}

impl TopicLayout {
    /// Layout rooted at `base` without suffixes.
    #[must_use]
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into().trim_end_matches('/').to_string(),
            state_suffix: None,
            command_suffix: None,
        }
    }

    /// Append `suffix` to every published status topic.
    #[must_use]
    pub fn with_state_suffix(mut self, suffix: Option<String>) -> Self {
        self.state_suffix = suffix.filter(|s| !s.is_empty());
        self
    }

    /// Expect `suffix` at the end of every command topic.
    #[must_use]
    pub fn with_command_suffix(mut self, suffix: Option<String>) -> Self {
        self.command_suffix = suffix.filter(|s| !s.is_empty());
        self
    }

    /// Base topic without trailing separator.
    #[must_use]
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Topic carrying the value of `property` for `key`.
    #[must_use]
    pub fn state_topic(&self, key: &DeviceKey, property: Property) -> String {
        self.outbound(key, property.as_str())
    }

    /// Topic carrying command acknowledgments for `key`.
    #[must_use]
    pub fn status_topic(&self, key: &DeviceKey) -> String {
        self.outbound(key, STATUS_SEGMENT)
    }

    /// Subscription filter matching every command topic.
    #[must_use]
    pub fn command_filter(&self) -> String {
        match &self.command_suffix {
            Some(suffix) => format!("{}/+/+/{suffix}", self.base),
            None => format!("{}/+/+", self.base),
        }
    }

    /// Whether status topics fall under [`Self::command_filter`], so the
    /// bus hands every status publish back to the gateway as a command.
    #[must_use]
    pub fn receives_own_state(&self) -> bool {
        self.state_suffix == self.command_suffix
    }

    /// Split a command topic into its device key and property.
    ///
    /// Returns `Ok(None)` for the gateway's own acknowledgment topic, which
    /// the default layout receives back through the command subscription.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::InvalidTopic`] if the topic does not follow the
    /// layout, or the device/property parse error for an unknown segment.
    pub fn parse_command_topic(
        &self,
        topic: &str,
    ) -> Result<Option<(DeviceKey, Property)>, CommandError> {
        let invalid = || CommandError::InvalidTopic(topic.to_string());

        let rest = topic
            .strip_prefix(self.base.as_str())
            .and_then(|rest| rest.strip_prefix('/'))
            .ok_or_else(invalid)?;
        let rest = match &self.command_suffix {
            Some(suffix) => rest
                .strip_suffix(suffix.as_str())
                .and_then(|rest| rest.strip_suffix('/'))
                .ok_or_else(invalid)?,
            None => rest,
        };

        let mut segments = rest.split('/');
        let (Some(device), Some(property), None) =
            (segments.next(), segments.next(), segments.next())
        else {
            return Err(invalid());
        };

        if property == STATUS_SEGMENT {
            return Ok(None);
        }
        Ok(Some((device.parse()?, property.parse()?)))
    }

    fn outbound(&self, key: &DeviceKey, segment: &str) -> String {
        match &self.state_suffix {
            Some(suffix) => format!("{}/{key}/{segment}/{suffix}", self.base),
            None => format!("{}/{key}/{segment}", self.base),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use homenet_domain::device::DeviceKind;

    fn light1() -> DeviceKey {
        DeviceKey::new(DeviceKind::Light, "1")
    }

    #[test]
    fn should_build_default_topics() {
        let layout = TopicLayout::default();
        assert_eq!(
            layout.state_topic(&light1(), Property::Power),
            "homenet/Light1/power"
        );
        assert_eq!(layout.status_topic(&light1()), "homenet/Light1/status");
        assert_eq!(layout.command_filter(), "homenet/+/+");
    }

    #[test]
    fn should_apply_suffixes() {
        let layout = TopicLayout::new("home/")
            .with_state_suffix(Some("state".to_string()))
            .with_command_suffix(Some("command".to_string()));
        assert_eq!(
            layout.state_topic(&DeviceKey::new(DeviceKind::Thermo, "2"), Property::CurTemp),
            "home/Thermo2/curTemp/state"
        );
        assert_eq!(layout.command_filter(), "home/+/+/command");
        assert_eq!(
            layout.parse_command_topic("home/Fan1/speed/command"),
            Ok(Some((DeviceKey::new(DeviceKind::Fan, "1"), Property::Speed)))
        );
    }

    #[test]
    fn should_detect_layout_receiving_own_state() {
        assert!(TopicLayout::default().receives_own_state());
        let split = TopicLayout::default().with_command_suffix(Some("set".to_string()));
        assert!(!split.receives_own_state());
        let both = split.with_state_suffix(Some("set".to_string()));
        assert!(both.receives_own_state());
    }

    #[test]
    fn should_ignore_empty_suffix() {
        let layout = TopicLayout::default().with_state_suffix(Some(String::new()));
        assert_eq!(layout.status_topic(&light1()), "homenet/Light1/status");
    }

    #[test]
    fn should_parse_command_topic() {
        let layout = TopicLayout::default();
        assert_eq!(
            layout.parse_command_topic("homenet/Thermo4/setTemp"),
            Ok(Some((DeviceKey::new(DeviceKind::Thermo, "4"), Property::SetTemp)))
        );
    }

    #[test]
    fn should_skip_own_status_topic() {
        let layout = TopicLayout::default();
        assert_eq!(layout.parse_command_topic("homenet/Light1/status"), Ok(None));
    }

    #[test]
    fn should_reject_foreign_or_malformed_topics() {
        let layout = TopicLayout::default();
        for topic in [
            "other/Light1/power",
            "homenet/Light1",
            "homenet/Light1/power/extra",
            "homenetLight1/power",
        ] {
            assert_eq!(
                layout.parse_command_topic(topic),
                Err(CommandError::InvalidTopic(topic.to_string())),
                "{topic}"
            );
        }
    }

    #[test]
    fn should_report_unknown_segments() {
        let layout = TopicLayout::default();
        assert!(matches!(
            layout.parse_command_topic("homenet/Boiler1/power"),
            Err(CommandError::UnknownDevice(_))
        ));
        assert!(matches!(
            layout.parse_command_topic("homenet/Light1/colour"),
            Err(CommandError::UnknownProperty(_))
        ));
    }

    #[test]
    fn should_require_command_suffix_when_configured() {
        let layout = TopicLayout::default().with_command_suffix(Some("set".to_string()));
        assert!(layout.parse_command_topic("homenet/Light1/power").is_err());
    }
}
