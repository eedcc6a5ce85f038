//! Tables for the Daelim-style wall-pad.
//!
//! Fixed command frames are spelled out byte for byte as observed on the bus,
//! checksums included, rather than recomputed.

use crate::command::CommandDescriptor;
use crate::device::{DeviceKey, DeviceKind};
use crate::property::Property;
use crate::signature::StateSignature;
use crate::value::StateValue;

const LIGHT_ACK_A: [u8; 4] = [0x20, 0x01, 0x21, 0x9f];
const LIGHT_ACK_B: [u8; 4] = [0x20, 0x01, 0x31, 0x9f];
const FAN_ACK: [u8; 4] = [0x20, 0x01, 0x71, 0x91];
const GAS_ACK: [u8; 4] = [0x20, 0x01, 0x11, 0x91];

/// Number of thermostats addressable through the `0x41..=0x46` class bytes.
const THERMO_COUNT: u8 = 6;

pub(super) fn states() -> Vec<StateSignature> {
    use DeviceKind::{Door, Fan, Gas, Light, Thermo};

    vec![
        StateSignature::with_slots(
            Light,
            &[0xF7, 0x20, 0x01, 0x21, 0x81],
            &[("1", 5), ("2", 6), ("3", 7)],
        ),
        StateSignature::with_slots(Light, &[0xF7, 0x20, 0x01, 0x22, 0x81], &[("4", 5), ("5", 6)]),
        StateSignature::with_slots(Light, &[0xF7, 0x20, 0x01, 0x23, 0x81], &[("6", 5)]),
        StateSignature::with_slots(Light, &[0xF7, 0x20, 0x01, 0x24, 0x81], &[("7", 5)]),
        StateSignature::with_slots(
            Thermo,
            &[0xF7, 0x20, 0x01, 0x4A, 0x81],
            &[("1", 5), ("2", 7), ("3", 9), ("4", 11)],
        ),
        StateSignature::with_slots(Thermo, &[0xF7, 0x20, 0x01, 0x4B, 0x81], &[("5", 5), ("6", 7)]),
        StateSignature::with_slots(Fan, &[0xF7, 0x20, 0x01, 0x71, 0x81], &[("1", 5)]),
        StateSignature::with_slots(Gas, &[0xF7, 0x20, 0x01, 0x11, 0x81], &[("1", 5)]),
        StateSignature::constant(
            Door,
            &[
                0xF7, 0x20, 0xBB, 0x01, 0x11, 0x04, 0x04, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xF5,
            ],
            "1",
            Property::Open,
            StateValue::ON_LOWER,
        ),
        StateSignature::constant(
            Door,
            &[
                0xF7, 0x20, 0xBB, 0x01, 0x11, 0x04, 0x03, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xF4,
            ],
            "1",
            Property::Open,
            StateValue::OFF_LOWER,
        ),
        StateSignature::constant(
            Door,
            &[
                0xF7, 0x20, 0xBB, 0x01, 0x11, 0x04, 0x05, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xF6,
            ],
            "2",
            Property::Open,
            StateValue::ON_LOWER,
        ),
    ]
}

pub(super) fn commands() -> Vec<CommandDescriptor> {
    let mut commands = Vec::new();
    commands.extend(lights());
    for index in 1..=THERMO_COUNT {
        commands.extend(thermostat(index));
    }
    commands.extend(fan());
    commands.extend(gas());
    commands
}

/// A light command: `on` selects the state byte, `checksum` is the wire value.
fn light(
    sub_id: &str,
    group: u8,
    unit: u8,
    on: bool,
    checksum: u8,
    ack: &[u8],
) -> CommandDescriptor {
    let (power, level) = if on {
        (StateValue::ON, 1)
    } else {
        (StateValue::OFF, 0)
    };
    let mut expected = vec![(Property::Power, power)];
    // Only the first light circuit is dimmable.
    if sub_id == "1" {
        expected.push((Property::Brightness, StateValue::Number(level)));
    }
    CommandDescriptor::fixed(
        DeviceKey::new(DeviceKind::Light, sub_id),
        &expected,
        &[
            0xF7,
            0x20,
            group,
            0x01,
            unit,
            u8::from(on),
            0x00,
            0x00,
            0x00,
            0x00,
            0x00,
            0x00,
            0x00,
            checksum,
            0xAA,
        ],
        ack,
    )
}

fn lights() -> Vec<CommandDescriptor> {
    vec![
        light("1", 0x21, 0x11, false, 0x53, &LIGHT_ACK_A),
        light("1", 0x21, 0x11, true, 0x54, &LIGHT_ACK_A),
        light("2", 0x21, 0x12, false, 0x54, &LIGHT_ACK_A),
        light("2", 0x21, 0x12, true, 0x55, &LIGHT_ACK_A),
        light("3", 0x21, 0x13, false, 0x55, &LIGHT_ACK_A),
        light("3", 0x21, 0x13, true, 0x56, &LIGHT_ACK_A),
        light("4", 0x22, 0x11, false, 0x55, &LIGHT_ACK_B),
        light("4", 0x22, 0x11, true, 0x56, &LIGHT_ACK_B),
    ]
}

/// Off, heat and set-temperature commands for thermostat `index` (1-based).
fn thermostat(index: u8) -> Vec<CommandDescriptor> {
    let class = 0x40 + index;
    let key = DeviceKey::new(DeviceKind::Thermo, index.to_string());
    let ack = [0x20, 0x01, class, 0x91];
    let frame = |mode: u8, checksum: u8| {
        [
            0xF7, 0x20, class, 0x01, 0x11, mode, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            checksum, 0xAA,
        ]
    };

    vec![
        CommandDescriptor::fixed(
            key.clone(),
            &[(Property::Power, StateValue::OFF_LOWER)],
            &frame(0x0E, 0x80 + index),
            &ack,
        ),
        CommandDescriptor::fixed(
            key.clone(),
            &[(Property::Power, StateValue::HEAT)],
            &frame(0x8E, index),
            &ack,
        ),
        CommandDescriptor::set_temp_template(key, &[0xF7, 0x20, class, 0x01, 0x11], &ack),
    ]
}

fn fan() -> Vec<CommandDescriptor> {
    let key = DeviceKey::new(DeviceKind::Fan, "1");
    let frame = |power: u8, mode: u8, speed: u8, checksum: u8| {
        [
            0xF7, 0x20, 0x71, 0x01, 0x11, power, mode, speed, 0x00, 0x00, 0x00, 0x00, 0x00,
            checksum, 0xAA,
        ]
    };

    vec![
        CommandDescriptor::fixed(
            key.clone(),
            &[(Property::Power, StateValue::OFF_LOWER)],
            &frame(0x00, 0x00, 0x00, 0xA3),
            &FAN_ACK,
        ),
        CommandDescriptor::fixed(
            key.clone(),
            &[(Property::Power, StateValue::ON)],
            &frame(0x01, 0x01, 0x01, 0xA6),
            &FAN_ACK,
        ),
        CommandDescriptor::fixed(
            key.clone(),
            &[(Property::Speed, StateValue::Text("Low"))],
            &frame(0x01, 0x01, 0x01, 0xA6),
            &FAN_ACK,
        ),
        CommandDescriptor::fixed(
            key.clone(),
            &[(Property::Speed, StateValue::Text("Middle"))],
            &frame(0x01, 0x01, 0x02, 0xA7),
            &FAN_ACK,
        ),
        CommandDescriptor::fixed(
            key,
            &[(Property::Speed, StateValue::Text("High"))],
            &frame(0x01, 0x01, 0x03, 0xA8),
            &FAN_ACK,
        ),
    ]
}

fn gas() -> Vec<CommandDescriptor> {
    vec![CommandDescriptor::fixed(
        DeviceKey::new(DeviceKind::Gas, "1"),
        &[(Property::Power, StateValue::OFF_LOWER)],
        &[
            0xF7, 0x20, 0x11, 0x01, 0x11, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x43,
            0xAA,
        ],
        &GAS_ACK,
    )]
}
