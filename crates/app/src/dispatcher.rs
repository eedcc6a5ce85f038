//! Retry queue — commands waiting for their acknowledgment.
//!
//! The wall-pad only accepts a command between its own frames, so commands are
//! (re)transmitted when an inbound frame that is not a status frame arrives:
//! the head of the queue is written and moved to the tail. An entry leaves
//! the queue when a frame carrying its ack pattern is seen, or, with a retry
//! ceiling configured, after its last allowed transmission.
//!
//! ```text
//! Pending ──transmit──▶ Sent { attempts } ──ack──▶ (removed)
//!                          │    ▲
//!                          └────┘ transmit
//! ```

use std::collections::VecDeque;

use homenet_domain::command::CommandDescriptor;
use homenet_domain::decoder::DecodedState;
use homenet_domain::device::DeviceKey;
use homenet_domain::frame::Frame;
use homenet_domain::time::Timestamp;

/// Lifecycle of a queued command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryState {
    /// Queued, never written.
    Pending,
    /// Written `attempts` times without an acknowledgment.
    Sent { attempts: u32 },
}

/// A command waiting in the retry queue.
#[derive(Debug, Clone)]
pub struct QueuedCommand {
    pub command: CommandDescriptor,
    pub state: EntryState,
    pub enqueued_at: Timestamp,
}

impl QueuedCommand {
    /// Number of times this command has been written.
    #[must_use]
    pub fn attempts(&self) -> u32 {
        match self.state {
            EntryState::Pending => 0,
            EntryState::Sent { attempts } => attempts,
        }
    }
}

/// One write produced by [`RetryQueue::rotate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transmission {
    pub key: DeviceKey,
    pub payload: Vec<u8>,
    /// 1 for the first write of this command.
    pub attempt: u32,
    /// Whether the command hit the retry ceiling and left the queue.
    pub exhausted: bool,
    pub enqueued_at: Timestamp,
}

/// FIFO of unacknowledged commands.
#[derive(Debug, Default)]
pub struct RetryQueue {
    entries: VecDeque<QueuedCommand>,
    max_attempts: Option<u32>,
}

impl RetryQueue {
    /// Empty queue; `max_attempts` of `None` retries until acknowledged.
    #[must_use]
    pub fn new(max_attempts: Option<u32>) -> Self {
        Self {
            entries: VecDeque::new(),
            max_attempts: max_attempts.filter(|max| *max > 0),
        }
    }

    /// Append a command. Identical commands are not merged.
    pub fn push(&mut self, command: CommandDescriptor, now: Timestamp) {
        self.entries.push_back(QueuedCommand {
            command,
            state: EntryState::Pending,
            enqueued_at: now,
        });
    }

    /// Remove and return the first entry whose ack pattern occurs in `frame`.
    pub fn acknowledge(&mut self, frame: &Frame) -> Option<QueuedCommand> {
        let index = self
            .entries
            .iter()
            .position(|entry| entry.command.acknowledged_by(frame))?;
        self.entries.remove(index)
    }

    /// Take the head for transmission and move it to the tail.
    ///
    /// An entry reaching the retry ceiling is transmitted one last time and
    /// not re-queued.
    pub fn rotate(&mut self) -> Option<Transmission> {
        let mut entry = self.entries.pop_front()?;
        let attempt = entry.attempts() + 1;
        entry.state = EntryState::Sent { attempts: attempt };

        let exhausted = self.max_attempts.is_some_and(|max| attempt >= max);
        let transmission = Transmission {
            key: entry.command.key.clone(),
            payload: entry.command.payload.clone(),
            attempt,
            exhausted,
            enqueued_at: entry.enqueued_at,
        };
        if !exhausted {
            self.entries.push_back(entry);
        }
        Some(transmission)
    }

    /// Whether publishing `state` would contradict a command still in flight
    /// for the same device property.
    #[must_use]
    pub fn would_revert(&self, state: &DecodedState) -> bool {
        self.entries.iter().any(|entry| {
            entry.command.key == state.key
                && entry
                    .command
                    .expected(state.property)
                    .is_some_and(|expected| *expected != state.value)
        })
    }

    /// Queued entries, head first.
    pub fn iter(&self) -> impl Iterator<Item = &QueuedCommand> {
        self.entries.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
