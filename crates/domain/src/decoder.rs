//! State decoder — extracts property values from a matched status frame.
//!
//! Per-class rules (offsets are zero-based frame indices):
//!
//! | Class | Byte(s) | Properties |
//! |-------|---------|------------|
//! | Light | `offset` | `power` (`ON`/`OFF`), `brightness` for sub-device `1` only (1–7, above 7 → 8) |
//! | Thermo | `offset`, `offset + 1` | `setTemp` (high bit = heating), `curTemp`, `power` (`heat`/`off`) |
//! | Fan | `offset`, `offset + 2` | `power` (`ON`/`off`), `speed` (`off`/`Low`/`Middle`/`High`) |
//! | Gas | `offset` | `power` (`ON`/`off`) |
//! | Door | whole frame | constant `open` value |

use crate::device::{DeviceKey, DeviceKind};
use crate::frame::Frame;
use crate::property::Property;
use crate::signature::{Readout, StateSignature};
use crate::value::StateValue;

/// Raw set-temperature bytes above this value carry the heating flag.
const HEAT_THRESHOLD: u8 = 100;

/// Offset subtracted from a flagged set-temperature byte.
const HEAT_FLAG: i16 = 128;

/// Light brightness levels above this value are reported as full brightness.
const MAX_DIMMER_STEP: u8 = 7;

/// One decoded reading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedState {
    pub key: DeviceKey,
    pub property: Property,
    pub value: StateValue,
}

/// Decode every reading the signature declares for this frame.
///
/// Readings whose bytes fall outside the frame are skipped.
#[must_use]
pub fn decode(frame: &Frame, signature: &StateSignature) -> Vec<DecodedState> {
    let slots = match &signature.readout {
        Readout::Constant {
            sub_id,
            property,
            value,
        } => {
            return vec![DecodedState {
                key: DeviceKey::new(signature.kind, sub_id.as_str()),
                property: *property,
                value: value.clone(),
            }];
        }
        Readout::Slots(slots) => slots,
    };

    let mut decoded = Vec::new();
    for slot in slots {
        let key = DeviceKey::new(signature.kind, slot.sub_id.as_str());
        for (property, value) in read_slot(signature.kind, &slot.sub_id, frame, slot.offset) {
            decoded.push(DecodedState {
                key: key.clone(),
                property,
                value,
            });
        }
    }
    decoded
}

fn read_slot(
    kind: DeviceKind,
    sub_id: &str,
    frame: &Frame,
    offset: usize,
) -> Vec<(Property, StateValue)> {
    let Some(raw) = frame.byte(offset) else {
        return Vec::new();
    };

    match kind {
        DeviceKind::Light => {
            let power = if raw > 0 { StateValue::ON } else { StateValue::OFF };
            let mut values = vec![(Property::Power, power)];
            if sub_id == "1" {
                let level = if raw > MAX_DIMMER_STEP {
                    MAX_DIMMER_STEP + 1
                } else {
                    raw
                };
                values.push((Property::Brightness, StateValue::Number(i16::from(level))));
            }
            values
        }
        DeviceKind::Thermo => {
            let set_temp = if raw > HEAT_THRESHOLD {
                i16::from(raw) - HEAT_FLAG
            } else {
                i16::from(raw)
            };
            let power = if raw > HEAT_THRESHOLD {
                StateValue::HEAT
            } else {
                StateValue::OFF_LOWER
            };
            let mut values = vec![(Property::SetTemp, StateValue::Number(set_temp))];
            if let Some(cur) = frame.byte(offset + 1) {
                values.push((Property::CurTemp, StateValue::Number(i16::from(cur))));
            }
            values.push((Property::Power, power));
            values
        }
        DeviceKind::Fan => {
            let power = if raw > 0 {
                StateValue::ON
            } else {
                StateValue::OFF_LOWER
            };
            let mut values = vec![(Property::Power, power)];
            if let Some(speed) = frame.byte(offset + 2) {
                let speed = match speed {
                    0 => StateValue::OFF_LOWER,
                    1 => StateValue::Text("Low"),
                    2 => StateValue::Text("Middle"),
                    _ => StateValue::Text("High"),
                };
                values.push((Property::Speed, speed));
            }
            values
        }
        DeviceKind::Gas => {
            let power = if raw > 0 {
                StateValue::ON
            } else {
                StateValue::OFF_LOWER
            };
            vec![(Property::Power, power)]
        }
        // Door states are whole-frame constants; a slotted door signature
        // has nothing to read.
        DeviceKind::Door => Vec::new(),
    }
}
