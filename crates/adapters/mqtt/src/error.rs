//! MQTT adapter error types.

use homenet_domain::error::HomenetError;

/// Errors specific to the MQTT adapter.
#[derive(Debug, thiserror::Error)]
pub enum MqttError {
    /// The rumqttc client rejected a request.
    #[error("MQTT client error")]
    Client(#[source] rumqttc::ClientError),

    /// An incoming payload or topic is not valid UTF-8.
    #[error("MQTT message is not valid UTF-8")]
    Utf8(#[source] std::str::Utf8Error),

    /// The gateway stopped receiving inbound messages.
    #[error("gateway inbound channel closed")]
    ChannelClosed,
}

impl MqttError {
    /// Convert into a [`HomenetError::Bus`] for propagation across port
    /// boundaries.
    #[must_use]
    pub fn into_domain(self) -> HomenetError {
        HomenetError::Bus(Box::new(self))
    }
}

impl From<MqttError> for HomenetError {
    fn from(err: MqttError) -> Self {
        err.into_domain()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_display_channel_closed_error() {
        let err = MqttError::ChannelClosed;
        assert_eq!(err.to_string(), "gateway inbound channel closed");
    }

    #[test]
    fn should_convert_into_bus_error() {
        let err: HomenetError = MqttError::ChannelClosed.into();
        assert!(matches!(err, HomenetError::Bus(_)));
    }

    #[test]
    fn should_keep_utf8_error_as_source() {
        let bytes = vec![0xF7, 0x20];
        let utf8 = std::str::from_utf8(&bytes).unwrap_err();
        let err = MqttError::Utf8(utf8);
        assert!(std::error::Error::source(&err).is_some());
    }
}
