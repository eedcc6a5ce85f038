//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `homenet.toml` in the working directory, or the file named by
//! `HOMENET_CONFIG`. Every field has a sensible default so the file is
//! optional. Environment variables take precedence over file values.

use std::time::Duration;

use serde::Deserialize;

use homenet_adapter_mqtt::MqttConfig;
use homenet_adapter_transport::{DEFAULT_TCP_PORT, TransportConfig};
use homenet_app::gateway::GatewaySettings;
use homenet_domain::assembler::FramingStrategy;

/// Default configuration file name.
const DEFAULT_PATH: &str = "homenet.toml";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// MQTT broker and topic settings.
    pub mqtt: MqttConfig,
    /// Link to the wall-pad.
    pub transport: TransportConfig,
    /// Gateway loop tunables.
    pub gateway: GatewayConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// Gateway loop configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Seconds after startup during which control messages are ignored.
    pub grace_period_secs: u64,
    /// Minimum seconds between two current-temperature publishes.
    pub debounce_secs: u64,
    /// How frames are cut out of the byte stream.
    pub framing: FramingStrategy,
    /// Transmissions allowed per command before giving up; unset retries
    /// until acknowledged.
    pub max_attempts: Option<u32>,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

impl Config {
    /// Load configuration from `homenet.toml` or `HOMENET_CONFIG` (if
    /// present) then apply environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("HOMENET_CONFIG").unwrap_or_else(|_| DEFAULT_PATH.to_string());
        let mut config = Self::from_file(&path)?;
        config.apply_overrides(|name| std::env::var(name).ok());
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(val) = var("HOMENET_MQTT_HOST") {
            self.mqtt.host = val;
        }
        if let Some(port) = var("HOMENET_MQTT_PORT").and_then(|val| val.parse().ok()) {
            self.mqtt.port = port;
        }
        if let Some(val) = var("HOMENET_MQTT_USERNAME") {
            self.mqtt.username = Some(val);
        }
        if let Some(val) = var("HOMENET_MQTT_PASSWORD") {
            self.mqtt.password = Some(val);
        }

        let device_host = var("HOMENET_DEVICE_HOST");
        let device_port = var("HOMENET_DEVICE_PORT").and_then(|val| val.parse::<u16>().ok());
        if device_host.is_some() || device_port.is_some() {
            let (current_host, current_port) = match &self.transport {
                TransportConfig::Tcp { host, port } => (host.clone(), *port),
                TransportConfig::Serial { .. } => (String::new(), DEFAULT_TCP_PORT),
            };
            self.transport = TransportConfig::Tcp {
                host: device_host.unwrap_or(current_host),
                port: device_port.unwrap_or(current_port),
            };
        }

        if let Some(val) = var("HOMENET_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.mqtt.port == 0 {
            return Err(ConfigError::Validation(
                "mqtt port must be non-zero".to_string(),
            ));
        }
        let base = self.mqtt.base_topic.trim_matches('/');
        if base.is_empty() || base.contains(['+', '#']) {
            return Err(ConfigError::Validation(
                "mqtt base topic must be non-empty and free of wildcards".to_string(),
            ));
        }
        match &self.transport {
            TransportConfig::Tcp { host, port } => {
                if host.is_empty() {
                    return Err(ConfigError::Validation(
                        "transport host must be set".to_string(),
                    ));
                }
                if *port == 0 {
                    return Err(ConfigError::Validation(
                        "transport port must be non-zero".to_string(),
                    ));
                }
            }
            TransportConfig::Serial { path, baud_rate } => {
                if path.is_empty() {
                    return Err(ConfigError::Validation(
                        "serial path must be set".to_string(),
                    ));
                }
                if *baud_rate == 0 {
                    return Err(ConfigError::Validation(
                        "baud rate must be non-zero".to_string(),
                    ));
                }
            }
        }
        Ok(())
    }
}

impl GatewayConfig {
    /// Convert into the gateway loop settings.
    #[must_use]
    pub fn settings(&self) -> GatewaySettings {
        GatewaySettings {
            grace_period: Duration::from_secs(self.grace_period_secs),
            debounce: Duration::from_secs(self.debounce_secs),
            framing: self.framing,
            max_attempts: self.max_attempts,
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        let settings = GatewaySettings::default();
        Self {
            grace_period_secs: settings.grace_period.as_secs(),
            debounce_secs: settings.debounce.as_secs(),
            framing: settings.framing,
            max_attempts: settings.max_attempts,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "homenetd=info,homenet=info".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
