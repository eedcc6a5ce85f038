//! State signatures — how a status frame is recognised and where its values live.

use crate::device::DeviceKind;
use crate::frame::Frame;
use crate::property::Property;
use crate::value::StateValue;

/// One sub-device reported by a status frame and the byte its reading starts at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    pub sub_id: String,
    pub offset: usize,
}

/// Where the values of a matched frame come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Readout {
    /// One reading per sub-device, decoded per device class.
    Slots(Vec<Slot>),
    /// The whole frame stands for a single constant value.
    Constant {
        sub_id: String,
        property: Property,
        value: StateValue,
    },
}

/// A status frame signature: device class, byte prefix and readout layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateSignature {
    pub kind: DeviceKind,
    pub prefix: Vec<u8>,
    pub readout: Readout,
}

impl StateSignature {
    /// Signature whose sub-devices are read at fixed offsets.
    #[must_use]
    pub fn with_slots(kind: DeviceKind, prefix: &[u8], slots: &[(&str, usize)]) -> Self {
        Self {
            kind,
            prefix: prefix.to_vec(),
            readout: Readout::Slots(
                slots
                    .iter()
                    .map(|(sub_id, offset)| Slot {
                        sub_id: (*sub_id).to_string(),
                        offset: *offset,
                    })
                    .collect(),
            ),
        }
    }

    /// Signature matching a whole frame that maps to one constant value.
    #[must_use]
    pub fn constant(
        kind: DeviceKind,
        prefix: &[u8],
        sub_id: &str,
        property: Property,
        value: StateValue,
    ) -> Self {
        Self {
            kind,
            prefix: prefix.to_vec(),
            readout: Readout::Constant {
                sub_id: sub_id.to_string(),
                property,
                value,
            },
        }
    }

    /// Whether the frame starts with this signature's prefix.
    #[must_use]
    pub fn matches(&self, frame: &Frame) -> bool {
        frame.starts_with(&self.prefix)
    }

    /// Sub-device identifiers covered by this signature, in declaration order.
    pub fn sub_ids(&self) -> impl Iterator<Item = &str> {
        let ids: Vec<&str> = match &self.readout {
            Readout::Slots(slots) => slots.iter().map(|slot| slot.sub_id.as_str()).collect(),
            Readout::Constant { sub_id, .. } => vec![sub_id.as_str()],
        };
        ids.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(hex_str: &str) -> Frame {
        Frame::try_from(hex::decode(hex_str).unwrap().as_slice()).unwrap()
    }

    #[test]
    fn should_match_frame_with_same_prefix() {
        let sig = StateSignature::with_slots(
            DeviceKind::Light,
            &[0xF7, 0x20, 0x01, 0x21, 0x81],
            &[("1", 5)],
        );
        assert!(sig.matches(&frame("f7200121810000000000000000c3aa")));
        assert!(!sig.matches(&frame("f7200122810000000000000000c4aa")));
    }

    #[test]
    fn should_not_match_prefix_found_later_in_frame() {
        let sig = StateSignature::with_slots(DeviceKind::Gas, &[0x20, 0x01, 0x11], &[("1", 5)]);
        assert!(!sig.matches(&frame("f7200111810000000000000000b3aa")));
    }

    #[test]
    fn should_list_sub_ids_in_declaration_order() {
        let sig = StateSignature::with_slots(
            DeviceKind::Thermo,
            &[0xF7],
            &[("1", 5), ("2", 7), ("3", 9)],
        );
        assert_eq!(sig.sub_ids().collect::<Vec<_>>(), vec!["1", "2", "3"]);
    }

    #[test]
    fn should_list_single_sub_id_for_constant_signature() {
        let sig = StateSignature::constant(
            DeviceKind::Door,
            &[0xF7],
            "2",
            Property::Open,
            StateValue::ON_LOWER,
        );
        assert_eq!(sig.sub_ids().collect::<Vec<_>>(), vec!["2"]);
    }
}
