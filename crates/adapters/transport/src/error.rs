//! Transport adapter error types.

use homenet_domain::error::HomenetError;

/// Errors specific to the transport adapter.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Could not reach the configured endpoint.
    #[error("failed to connect to {endpoint}")]
    Connect {
        /// Endpoint as shown in logs.
        endpoint: String,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Reading from or writing to the link failed.
    #[error("transport IO error")]
    Io(#[from] std::io::Error),

    /// The writer task is gone; nothing more can be sent.
    #[error("transport closed")]
    Closed,

    /// The configured transport kind was not compiled in.
    #[error("{0} transport is not supported by this build")]
    Unsupported(&'static str),

    /// The serial port could not be opened or cloned.
    #[cfg(feature = "serial")]
    #[error("serial port error")]
    Serial(#[from] serialport::Error),
}

impl TransportError {
    /// Convert into a [`HomenetError::Transport`] for propagation across port
    /// boundaries.
    #[must_use]
    pub fn into_domain(self) -> HomenetError {
        HomenetError::Transport(Box::new(self))
    }
}

impl From<TransportError> for HomenetError {
    fn from(err: TransportError) -> Self {
        err.into_domain()
    }
}
