//! Gateway — the single event loop tying the wall-pad to the message bus.
//!
//! Transport bytes and bus messages arrive on one channel and are handled
//! strictly in order. For every assembled frame:
//!
//! 1. a status frame is decoded and each reading offered to the publisher;
//! 2. the frame is checked against the ack pattern of every queued command,
//!    retiring the first match and publishing `success`;
//! 3. a frame that matched no status signature gives the head of the retry
//!    queue its turn on the wire.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use homenet_domain::assembler::{FrameAssembler, FramingStrategy};
use homenet_domain::decoder::decode;
use homenet_domain::dictionary::ProtocolDictionary;
use homenet_domain::error::HomenetError;
use homenet_domain::frame::Frame;
use homenet_domain::time::{Timestamp, now};

use crate::dispatcher::RetryQueue;
use crate::home_status::HomeStatus;
use crate::listener::{BusListener, DEFAULT_GRACE_PERIOD, ListenOutcome};
use crate::ports::{BusPublisher, Transport};
use crate::publisher::{DEFAULT_DEBOUNCE, StatePublisher};
use crate::topic::TopicLayout;

/// Tunables of the gateway loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewaySettings {
    pub grace_period: Duration,
    pub debounce: Duration,
    pub framing: FramingStrategy,
    /// Transmissions allowed per command; `None` retries until acknowledged.
    pub max_attempts: Option<u32>,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            grace_period: DEFAULT_GRACE_PERIOD,
            debounce: DEFAULT_DEBOUNCE,
            framing: FramingStrategy::default(),
            max_attempts: None,
        }
    }
}

/// Everything the adapters feed into the gateway loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    /// Raw bytes read from the transport.
    Bytes(Vec<u8>),
    /// A message received on a subscribed bus topic.
    Message { topic: String, payload: String },
    /// The transport is gone and will not deliver more bytes.
    TransportClosed { reason: String },
}

/// The gateway core. Owns the home status, the retry queue and the assembler.
pub struct Gateway<T, B> {
    dictionary: Arc<ProtocolDictionary>,
    assembler: FrameAssembler,
    status: HomeStatus,
    queue: RetryQueue,
    publisher: StatePublisher<B>,
    listener: BusListener,
    transport: T,
}

impl<T: Transport, B: BusPublisher> Gateway<T, B> {
    /// Create a gateway whose grace period starts at `started_at`.
    pub fn new(
        settings: &GatewaySettings,
        dictionary: Arc<ProtocolDictionary>,
        topics: TopicLayout,
        transport: T,
        bus: B,
        started_at: Timestamp,
    ) -> Self {
        Self {
            assembler: FrameAssembler::new(settings.framing),
            status: HomeStatus::default(),
            queue: RetryQueue::new(settings.max_attempts),
            publisher: StatePublisher::new(bus, topics.clone(), settings.debounce),
            listener: BusListener::new(
                Arc::clone(&dictionary),
                topics,
                started_at,
                settings.grace_period,
            ),
            dictionary,
            transport,
        }
    }

    /// Last published value per device property.
    #[must_use]
    pub fn status(&self) -> &HomeStatus {
        &self.status
    }

    /// Commands waiting for their acknowledgment.
    #[must_use]
    pub fn queue(&self) -> &RetryQueue {
        &self.queue
    }

    /// Feed raw transport bytes and process every frame they complete.
    pub async fn handle_bytes(&mut self, bytes: &[u8], now: Timestamp) {
        for frame in self.assembler.push(bytes) {
            self.handle_frame(&frame, now).await;
        }
    }

    /// Run one frame through decode, ack matching and retransmission.
    pub async fn handle_frame(&mut self, frame: &Frame, now: Timestamp) {
        let is_state = match self.dictionary.match_state(frame) {
            Some(signature) => {
                for state in decode(frame, signature) {
                    self.publisher
                        .publish(&mut self.status, &self.queue, &state, now)
                        .await;
                }
                true
            }
            None => {
                tracing::trace!(%frame, "no state signature");
                false
            }
        };

        if let Some(acked) = self.queue.acknowledge(frame) {
            tracing::debug!(
                device = %acked.command.key,
                attempts = acked.attempts(),
                queued_ms = (now - acked.enqueued_at).num_milliseconds(),
                "command retired"
            );
            self.publisher.publish_ack(&acked.command.key).await;
        }

        if !is_state {
            self.retransmit(now).await;
        }
    }

    /// Handle a control message from the bus.
    ///
    /// Echoes of the gateway's own status publishes are dropped before they
    /// reach the listener.
    pub fn handle_message(&mut self, topic: &str, payload: &str, now: Timestamp) -> ListenOutcome {
        if self.publisher.take_echo(topic, payload) {
            tracing::trace!(topic, payload, "ignoring echo of own status publish");
            return ListenOutcome::Echo;
        }
        self.listener
            .handle(topic, payload, &self.status, &mut self.queue, now)
    }

    /// Process inbound events until the channel closes or the transport goes
    /// away.
    ///
    /// # Errors
    ///
    /// Returns [`HomenetError::Transport`] when the transport reports it was
    /// closed.
    pub async fn run(mut self, mut inbound: mpsc::Receiver<Inbound>) -> Result<(), HomenetError> {
        tracing::info!("gateway loop started");
        while let Some(event) = inbound.recv().await {
            match event {
                Inbound::Bytes(bytes) => self.handle_bytes(&bytes, now()).await,
                Inbound::Message { topic, payload } => {
                    self.handle_message(&topic, &payload, now());
                }
                Inbound::TransportClosed { reason } => {
                    tracing::error!(%reason, pending = self.queue.len(), "transport closed");
                    self.assembler.reset();
                    return Err(HomenetError::Transport(reason.into()));
                }
            }
        }
        tracing::info!("gateway loop stopped");
        Ok(())
    }

    async fn retransmit(&mut self, now: Timestamp) {
        let Some(transmission) = self.queue.rotate() else {
            return;
        };
        tracing::debug!(
            device = %transmission.key,
            attempt = transmission.attempt,
            frame = %hex::encode(&transmission.payload),
            "transmitting command"
        );
        if transmission.exhausted {
            tracing::warn!(
                device = %transmission.key,
                attempts = transmission.attempt,
                queued_ms = (now - transmission.enqueued_at).num_milliseconds(),
                "giving up on unacknowledged command"
            );
        }
        if let Err(err) = self.transport.write(transmission.payload).await {
            tracing::warn!(device = %transmission.key, error = %err, "failed to write command");
        }
    }
}
