//! Bus listener — turns inbound control messages into queued commands.

use std::sync::Arc;
use std::time::Duration;

use chrono::TimeDelta;
use homenet_domain::device::DeviceKey;
use homenet_domain::dictionary::ProtocolDictionary;
use homenet_domain::error::CommandError;
use homenet_domain::synthesizer::synthesize;
use homenet_domain::time::Timestamp;

use crate::dispatcher::RetryQueue;
use crate::home_status::HomeStatus;
use crate::topic::TopicLayout;

/// Default delay before control messages are accepted.
pub const DEFAULT_GRACE_PERIOD: Duration = Duration::from_secs(5);

/// What [`BusListener::handle`] did with a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListenOutcome {
    /// A command for this device was queued.
    Queued(DeviceKey),
    /// The startup grace period is still running.
    NotReady,
    /// The device already reports the requested value.
    AlreadySatisfied,
    /// The message is not a command (own acknowledgment or sensor topic).
    Ignored,
    /// The bus handed back a status value this gateway published.
    Echo,
    /// The message could not be turned into a command.
    Rejected(CommandError),
}

/// Resolves control messages against the protocol dictionary.
pub struct BusListener {
    dictionary: Arc<ProtocolDictionary>,
    topics: TopicLayout,
    ready_at: Timestamp,
}

impl BusListener {
    /// Listener accepting messages once `grace_period` has elapsed after
    /// `started_at`.
    #[must_use]
    pub fn new(
        dictionary: Arc<ProtocolDictionary>,
        topics: TopicLayout,
        started_at: Timestamp,
        grace_period: Duration,
    ) -> Self {
        let grace = TimeDelta::from_std(grace_period).unwrap_or(TimeDelta::MAX);
        let ready_at = started_at
            .checked_add_signed(grace)
            .unwrap_or(chrono::DateTime::<chrono::Utc>::MAX_UTC);
        Self {
            dictionary,
            topics,
            ready_at,
        }
    }

    /// Whether the grace period is over at `now`.
    #[must_use]
    pub fn is_ready(&self, now: Timestamp) -> bool {
        now >= self.ready_at
    }

    /// Resolve `(topic, payload)` and queue the resulting command.
    pub fn handle(
        &self,
        topic: &str,
        payload: &str,
        status: &HomeStatus,
        queue: &mut RetryQueue,
        now: Timestamp,
    ) -> ListenOutcome {
        if !self.is_ready(now) {
            tracing::debug!(topic, "ignoring control message during grace period");
            return ListenOutcome::NotReady;
        }

        let (key, property) = match self.topics.parse_command_topic(topic) {
            Ok(Some(parsed)) => parsed,
            Ok(None) => return ListenOutcome::Ignored,
            Err(err) => {
                tracing::warn!(topic, error = %err, "discarding control message");
                return ListenOutcome::Rejected(err);
            }
        };
        if property.is_sensor_reading() {
            tracing::trace!(topic, "ignoring sensor topic");
            return ListenOutcome::Ignored;
        }

        let command = match synthesize(&self.dictionary, &key, property, payload) {
            Ok(command) => command,
            // Status-only values such as door states have no command.
            Err(err @ CommandError::NoDescriptor { .. }) => {
                tracing::debug!(topic, payload, error = %err, "discarding control message");
                return ListenOutcome::Rejected(err);
            }
            Err(err) => {
                tracing::warn!(topic, payload, error = %err, "discarding control message");
                return ListenOutcome::Rejected(err);
            }
        };

        if let Some(expected) = command.expected(property)
            && status.get(&key, property) == Some(expected)
        {
            tracing::debug!(device = %key, %property, value = %expected, "already in requested state");
            return ListenOutcome::AlreadySatisfied;
        }

        tracing::info!(device = %key, %property, payload, frame = %hex::encode(&command.payload), "queueing command");
        queue.push(command, now);
        ListenOutcome::Queued(key)
    }
}
