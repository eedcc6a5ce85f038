//! MQTT connection and topic configuration.

use serde::Deserialize;

use homenet_app::topic::TopicLayout;

/// Configuration for the MQTT bus.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MqttConfig {
    /// MQTT broker hostname or IP address.
    pub host: String,
    /// MQTT broker port.
    pub port: u16,
    /// MQTT client identifier.
    pub client_id: String,
    /// Optional broker username; only used together with `password`.
    pub username: Option<String>,
    /// Optional broker password.
    pub password: Option<String>,
    /// Keep-alive interval in seconds.
    pub keep_alive_secs: u16,
    /// Base topic prefix for all homenet MQTT communication.
    pub base_topic: String,
    /// Extra segment appended to published status topics.
    pub state_suffix: Option<String>,
    /// Extra segment expected at the end of command topics.
    pub command_suffix: Option<String>,
}

impl Default for MqttConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 1883,
            client_id: "homenet".to_string(),
            username: None,
            password: None,
            keep_alive_secs: 30,
            base_topic: "homenet".to_string(),
            state_suffix: None,
            command_suffix: None,
        }
    }
}

impl MqttConfig {
    /// Topic layout described by this configuration.
    #[must_use]
    pub fn topic_layout(&self) -> TopicLayout {
        TopicLayout::new(self.base_topic.as_str())
            .with_state_suffix(self.state_suffix.clone())
            .with_command_suffix(self.command_suffix.clone())
    }

    /// Username and password, when both are set.
    #[must_use]
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some((user.as_str(), pass.as_str())),
            _ => None,
        }
    }
}
