//! Transport configuration.

use serde::Deserialize;

/// Default TCP port of RS-485-to-Ethernet converters.
pub const DEFAULT_TCP_PORT: u16 = 8899;

/// Default line speed of the wall-pad bus.
pub const DEFAULT_BAUD_RATE: u32 = 9600;

/// How to reach the wall-pad bus.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransportConfig {
    /// An RS-485 to TCP converter.
    Tcp {
        host: String,
        #[serde(default = "default_tcp_port")]
        port: u16,
    },
    /// A local serial device (requires the `serial` feature).
    Serial {
        path: String,
        #[serde(default = "default_baud_rate")]
        baud_rate: u32,
    },
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self::Tcp {
            host: "192.168.0.20".to_string(),
            port: DEFAULT_TCP_PORT,
        }
    }
}

impl TransportConfig {
    /// Human-readable endpoint for logs.
    #[must_use]
    pub fn endpoint(&self) -> String {
        match self {
            Self::Tcp { host, port } => format!("tcp://{host}:{port}"),
            Self::Serial { path, baud_rate } => format!("serial://{path}@{baud_rate}"),
        }
    }
}

fn default_tcp_port() -> u16 {
    DEFAULT_TCP_PORT
}

fn default_baud_rate() -> u32 {
    DEFAULT_BAUD_RATE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_default_to_tcp_converter() {
        let config = TransportConfig::default();
        assert_eq!(config.endpoint(), "tcp://192.168.0.20:8899");
    }

    #[test]
    fn should_deserialize_tcp_with_default_port() {
        let config: TransportConfig = toml::from_str(
            r#"
            kind = "tcp"
            host = "10.0.0.5"
            "#,
        )
        .unwrap();
        assert_eq!(
            config,
            TransportConfig::Tcp {
                host: "10.0.0.5".to_string(),
                port: 8899,
            }
        );
    }

    #[test]
    fn should_deserialize_serial() {
        let config: TransportConfig = toml::from_str(
            r#"
            kind = "serial"
            path = "/dev/ttyUSB0"
            baud_rate = 19200
            "#,
        )
        .unwrap();
        assert_eq!(config.endpoint(), "serial:///dev/ttyUSB0@19200");
    }

    #[test]
    fn should_reject_unknown_kind() {
        let result = toml::from_str::<TransportConfig>(r#"kind = "bluetooth""#);
        assert!(result.is_err());
    }
}
