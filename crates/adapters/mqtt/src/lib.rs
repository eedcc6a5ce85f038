//! # homenet-adapter-mqtt
//!
//! MQTT adapter — connects the gateway to an MQTT broker.
//!
//! ## How it works
//!
//! [`MqttBus::connect`] creates a rumqttc client and spawns a task polling
//! its event loop. Every `ConnAck` (first connection or reconnect) triggers a
//! subscription to the command filter; every incoming publish is forwarded
//! into the gateway's inbound channel as [`Inbound::Message`].
//!
//! Outbound publishes go through [`MqttPublisher`], which only enqueues the
//! request on the client (`try_publish`) and never waits for the broker.
//!
//! ## Dependency rule
//!
//! Same as other adapters: depends on `homenet-app` and `homenet-domain`.

mod config;
mod error;

pub use config::MqttConfig;
pub use error::MqttError;

use std::time::Duration;

use rumqttc::{AsyncClient, Event, EventLoop, MqttOptions, Packet, QoS};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use homenet_app::gateway::Inbound;
use homenet_app::ports::BusPublisher;
use homenet_domain::error::HomenetError;

/// Capacity of the rumqttc request channel.
const REQUEST_CAPACITY: usize = 64;

/// Pause between reconnection attempts after a connection error.
const RECONNECT_DELAY: Duration = Duration::from_secs(3);

/// A running MQTT connection.
pub struct MqttBus {
    client: AsyncClient,
    handle: JoinHandle<()>,
}

impl MqttBus {
    /// Connect to the broker and start forwarding messages matching
    /// `command_filter` into `inbound`.
    ///
    /// The connection itself is established by the background task; this
    /// returns immediately.
    #[must_use]
    pub fn connect(
        config: &MqttConfig,
        command_filter: String,
        inbound: mpsc::Sender<Inbound>,
    ) -> Self {
        let (client, eventloop) = AsyncClient::new(options(config), REQUEST_CAPACITY);
        tracing::info!(
            host = %config.host,
            port = config.port,
            client_id = %config.client_id,
            filter = %command_filter,
            "connecting to MQTT broker"
        );
        let handle = tokio::spawn(run_event_loop(
            eventloop,
            client.clone(),
            command_filter,
            inbound,
        ));
        Self { client, handle }
    }

    /// Publisher sharing this connection.
    #[must_use]
    pub fn publisher(&self) -> MqttPublisher {
        MqttPublisher {
            client: self.client.clone(),
        }
    }

    /// Send a clean disconnect and stop the event loop task.
    ///
    /// # Errors
    ///
    /// Returns [`MqttError::Client`] if the disconnect request could not be
    /// queued.
    pub async fn disconnect(self) -> Result<(), MqttError> {
        let result = self.client.disconnect().await.map_err(MqttError::Client);
        // Give the event loop a moment to flush the disconnect packet.
        tokio::time::sleep(Duration::from_millis(100)).await;
        self.handle.abort();
        tracing::info!("MQTT connection closed");
        result
    }
}

/// [`BusPublisher`] backed by a rumqttc client.
#[derive(Clone)]
pub struct MqttPublisher {
    client: AsyncClient,
}

impl MqttPublisher {
    /// Wrap an existing client.
    #[must_use]
    pub fn new(client: AsyncClient) -> Self {
        Self { client }
    }
}

impl BusPublisher for MqttPublisher {
    fn publish(
        &self,
        topic: String,
        payload: String,
        retain: bool,
    ) -> impl Future<Output = Result<(), HomenetError>> + Send {
        let result = self
            .client
            .try_publish(topic, QoS::AtLeastOnce, retain, payload)
            .map_err(|err| MqttError::Client(err).into_domain());
        async move { result }
    }
}

fn options(config: &MqttConfig) -> MqttOptions {
    let mut options = MqttOptions::new(config.client_id.as_str(), config.host.as_str(), config.port);
    options.set_keep_alive(Duration::from_secs(u64::from(config.keep_alive_secs)));
    if let Some((username, password)) = config.credentials() {
        options.set_credentials(username, password);
    }
    options
}

async fn run_event_loop(
    mut eventloop: EventLoop,
    client: AsyncClient,
    command_filter: String,
    inbound: mpsc::Sender<Inbound>,
) {
    loop {
        match eventloop.poll().await {
            Ok(Event::Incoming(Packet::ConnAck(_))) => {
                tracing::info!("MQTT connected");
                if let Err(err) = client.try_subscribe(command_filter.as_str(), QoS::AtLeastOnce) {
                    tracing::warn!(error = %err, filter = %command_filter, "failed to subscribe");
                }
            }
            Ok(Event::Incoming(Packet::Publish(publish))) => {
                let message = match decode_message(publish.topic.as_ref(), publish.payload.as_ref())
                {
                    Ok(message) => message,
                    Err(err) => {
                        tracing::warn!(error = %err, "dropping MQTT message");
                        continue;
                    }
                };
                if inbound.send(message).await.is_err() {
                    tracing::debug!("{}", MqttError::ChannelClosed);
                    break;
                }
            }
            Ok(_) => {}
            Err(err) => {
                tracing::warn!(error = %err, "MQTT connection error, retrying");
                tokio::time::sleep(RECONNECT_DELAY).await;
            }
        }
    }
}

fn decode_message(topic: &[u8], payload: &[u8]) -> Result<Inbound, MqttError> {
    let topic = std::str::from_utf8(topic).map_err(MqttError::Utf8)?;
    let payload = std::str::from_utf8(payload).map_err(MqttError::Utf8)?;
    Ok(Inbound::Message {
        topic: topic.to_string(),
        payload: payload.trim().to_string(),
    })
}
