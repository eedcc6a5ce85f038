//! Protocol dictionary — the immutable lookup tables behind decoding and
//! command resolution.
//!
//! Built once at startup and shared read-only (typically behind an `Arc`).
//! State signatures are kept in declaration order because prefix matching is
//! first-match-wins; commands are keyed by device for exact lookup.

mod builtin;

use std::collections::HashMap;

use crate::command::CommandDescriptor;
use crate::device::DeviceKey;
use crate::frame::Frame;
use crate::property::Property;
use crate::signature::StateSignature;

/// Read-only state signatures and command descriptors.
#[derive(Debug, Clone, Default)]
pub struct ProtocolDictionary {
    states: Vec<StateSignature>,
    commands: HashMap<DeviceKey, Vec<CommandDescriptor>>,
}

impl ProtocolDictionary {
    /// Build a dictionary from signatures (in match priority order) and
    /// command descriptors (in match priority order per device).
    #[must_use]
    pub fn new(states: Vec<StateSignature>, commands: Vec<CommandDescriptor>) -> Self {
        let mut by_key: HashMap<DeviceKey, Vec<CommandDescriptor>> = HashMap::new();
        for command in commands {
            by_key.entry(command.key.clone()).or_default().push(command);
        }
        Self {
            states,
            commands: by_key,
        }
    }

    /// Tables for the supported wall-pad model.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(builtin::states(), builtin::commands())
    }

    /// First signature, in declaration order, whose prefix starts the frame.
    #[must_use]
    pub fn match_state(&self, frame: &Frame) -> Option<&StateSignature> {
        self.states.iter().find(|sig| sig.matches(frame))
    }

    /// Descriptor for `key`/`property`/`value`.
    ///
    /// For a parametric property the device's template is returned whatever
    /// the value; callers must [`specialize`](CommandDescriptor::specialize)
    /// it before use.
    #[must_use]
    pub fn match_command(
        &self,
        key: &DeviceKey,
        property: Property,
        value: &str,
    ) -> Option<&CommandDescriptor> {
        let candidates = self.commands.get(key)?;
        if property.is_parametric() {
            candidates.iter().find(|cmd| cmd.is_parametric())
        } else {
            candidates.iter().find(|cmd| cmd.accepts(property, value))
        }
    }

    /// All state signatures in match order.
    #[must_use]
    pub fn states(&self) -> &[StateSignature] {
        &self.states
    }

    /// Commands declared for `key`, in match order.
    #[must_use]
    pub fn commands_for(&self, key: &DeviceKey) -> &[CommandDescriptor] {
        self.commands.get(key).map_or(&[], Vec::as_slice)
    }

    /// Number of command descriptors across all devices.
    #[must_use]
    pub fn command_count(&self) -> usize {
        self.commands.values().map(Vec::len).sum()
    }
}
