//! State publisher — forwards decoded readings to the message bus.
//!
//! A reading is published (retained) unless one of these applies, checked in
//! order:
//! 1. it equals the value last published for the same property;
//! 2. it would revert a command still waiting in the retry queue;
//! 3. it is a sensor reading and its topic was published within the debounce
//!    interval.
//!
//! [`HomeStatus`] and the throttle timestamp only move when a publish happens.
//!
//! When the layout subscribes to its own status topics, every successful
//! publish is remembered until the bus delivers it back, so the gateway can
//! tell those echoes apart from real commands.

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use homenet_domain::decoder::DecodedState;
use homenet_domain::device::DeviceKey;
use homenet_domain::property::Property;
use homenet_domain::time::{Timestamp, within};

use crate::dispatcher::RetryQueue;
use crate::home_status::HomeStatus;
use crate::ports::BusPublisher;
use crate::topic::{ACK_PAYLOAD, TopicLayout};

/// Default minimum spacing between two current-temperature publishes.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_secs(600);

/// Echoes remembered per topic; older ones are forgotten first.
const MAX_PENDING_ECHOES: usize = 8;

/// What [`StatePublisher::publish`] did with a reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    Published,
    Unchanged,
    EchoSuppressed,
    Debounced,
}

/// Publishes readings and acknowledgments through a [`BusPublisher`].
pub struct StatePublisher<B> {
    bus: B,
    topics: TopicLayout,
    debounce: Duration,
    last_published: HashMap<(DeviceKey, Property), Timestamp>,
    echoes: HashMap<String, VecDeque<String>>,
}

impl<B: BusPublisher> StatePublisher<B> {
    /// Create a publisher with the given debounce interval.
    pub fn new(bus: B, topics: TopicLayout, debounce: Duration) -> Self {
        Self {
            bus,
            topics,
            debounce,
            last_published: HashMap::new(),
            echoes: HashMap::new(),
        }
    }

    /// Publish `state` unless it is unchanged, an echo or debounced.
    ///
    /// Bus failures are logged and the reading still counts as published.
    pub async fn publish(
        &mut self,
        status: &mut HomeStatus,
        queue: &RetryQueue,
        state: &DecodedState,
        now: Timestamp,
    ) -> PublishOutcome {
        let outcome = self.check(status, queue, state, now);
        if outcome != PublishOutcome::Published {
            tracing::debug!(
                device = %state.key,
                property = %state.property,
                value = %state.value,
                ?outcome,
                "skipping state publish"
            );
            return outcome;
        }

        status.set(state.key.clone(), state.property, state.value.clone());
        self.last_published
            .insert((state.key.clone(), state.property), now);

        let topic = self.topics.state_topic(&state.key, state.property);
        let payload = state.value.to_string();
        tracing::info!(topic = %topic, value = %payload, "publishing state");
        match self.bus.publish(topic.clone(), payload.clone(), true).await {
            Ok(()) => self.expect_echo(topic, payload),
            Err(err) => {
                tracing::warn!(topic = %topic, error = %err, "failed to publish state");
            }
        }
        PublishOutcome::Published
    }

    /// Consume the pending echo of an earlier status publish matching
    /// `(topic, payload)`. Returns `false` when the message is not one.
    pub fn take_echo(&mut self, topic: &str, payload: &str) -> bool {
        let Some(pending) = self.echoes.get_mut(topic) else {
            return false;
        };
        let Some(index) = pending.iter().position(|sent| sent == payload) else {
            return false;
        };
        pending.remove(index);
        if pending.is_empty() {
            self.echoes.remove(topic);
        }
        true
    }

    fn expect_echo(&mut self, topic: String, payload: String) {
        if !self.topics.receives_own_state() {
            return;
        }
        let pending = self.echoes.entry(topic).or_default();
        if pending.len() == MAX_PENDING_ECHOES {
            pending.pop_front();
        }
        pending.push_back(payload);
    }

    /// Publish the acknowledgment for a command executed on `key`.
    pub async fn publish_ack(&self, key: &DeviceKey) {
        let topic = self.topics.status_topic(key);
        tracing::info!(topic = %topic, "command acknowledged");
        if let Err(err) = self
            .bus
            .publish(topic.clone(), ACK_PAYLOAD.to_string(), true)
            .await
        {
            tracing::warn!(topic = %topic, error = %err, "failed to publish acknowledgment");
        }
    }

    fn check(
        &self,
        status: &HomeStatus,
        queue: &RetryQueue,
        state: &DecodedState,
        now: Timestamp,
    ) -> PublishOutcome {
        if status.get(&state.key, state.property) == Some(&state.value) {
            return PublishOutcome::Unchanged;
        }
        if queue.would_revert(state) {
            return PublishOutcome::EchoSuppressed;
        }
        if state.property.is_sensor_reading() {
            let last = self.last_published.get(&(state.key.clone(), state.property));
            if last.is_some_and(|last| within(*last, now, self.debounce)) {
                return PublishOutcome::Debounced;
            }
        }
        PublishOutcome::Published
    }
}
