//! # homenet-adapter-transport
//!
//! Transport adapter — the byte-stream link to the wall-pad.
//!
//! ## How it works
//!
//! [`open`] connects to the configured endpoint and spawns a reader and a
//! writer task. The reader forwards every chunk it receives into the
//! gateway's inbound channel as [`Inbound::Bytes`] and reports the end of the
//! stream as [`Inbound::TransportClosed`]. The writer drains an unbounded
//! queue fed by [`TransportHandle`], so gateway writes never block on the
//! link.
//!
//! | Kind | Link | Feature |
//! |------|------|---------|
//! | `tcp` | RS-485 to Ethernet converter | always |
//! | `serial` | local RS-485 adapter | `serial` |
//!
//! ## Dependency rule
//!
//! Same as other adapters: depends on `homenet-app` and `homenet-domain`.

mod config;
mod error;
#[cfg(feature = "serial")]
mod serial;
mod tcp;

pub use config::{DEFAULT_BAUD_RATE, DEFAULT_TCP_PORT, TransportConfig};
pub use error::TransportError;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use homenet_app::gateway::Inbound;
use homenet_app::ports::Transport;
use homenet_domain::error::HomenetError;

/// Write side of an open transport.
#[derive(Debug, Clone)]
pub struct TransportHandle {
    outbound: mpsc::UnboundedSender<Vec<u8>>,
}

impl Transport for TransportHandle {
    fn write(&self, bytes: Vec<u8>) -> impl Future<Output = Result<(), HomenetError>> + Send {
        let result = self
            .outbound
            .send(bytes)
            .map_err(|_| TransportError::Closed.into_domain());
        async move { result }
    }
}

/// An open transport and the tasks serving it.
pub struct OpenTransport {
    handle: TransportHandle,
    tasks: Vec<JoinHandle<()>>,
}

impl OpenTransport {
    /// Handle for writing command bytes.
    #[must_use]
    pub fn handle(&self) -> TransportHandle {
        self.handle.clone()
    }

    /// Stop the reader and writer tasks.
    pub fn shutdown(self) {
        for task in self.tasks {
            task.abort();
        }
        tracing::info!("transport closed");
    }
}

/// Connect to the wall-pad and start forwarding inbound bytes.
///
/// # Errors
///
/// Returns [`TransportError::Connect`] (or [`TransportError::Serial`] with the
/// `serial` feature) if the link cannot be opened, and
/// [`TransportError::Unsupported`] for a serial configuration in a build
/// without the `serial` feature.
pub async fn open(
    config: &TransportConfig,
    inbound: mpsc::Sender<Inbound>,
) -> Result<OpenTransport, TransportError> {
    tracing::info!(endpoint = %config.endpoint(), "opening transport");
    match config {
        TransportConfig::Tcp { host, port } => tcp::open(host, *port, inbound).await,
        #[cfg(feature = "serial")]
        TransportConfig::Serial { path, baud_rate } => serial::open(path, *baud_rate, inbound),
        #[cfg(not(feature = "serial"))]
        TransportConfig::Serial { .. } => Err(TransportError::Unsupported("serial")),
    }
}
