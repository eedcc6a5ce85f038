//! # homenet-domain
//!
//! Pure protocol model for the homenet wall-pad gateway.
//!
//! ## Responsibilities
//! - Foundational types: device keys, properties, values, error conventions, timestamps
//! - Define **Frames** (15-byte wall-pad units) and the **Assembler** that cuts them
//!   out of the raw byte stream
//! - Define the **Protocol Dictionary** (state signatures and command descriptors)
//! - **Decode** status frames into property readings
//! - **Synthesize** commands, including checksummed set-temperature frames
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod time;

pub mod assembler;
pub mod command;
pub mod decoder;
pub mod device;
pub mod dictionary;
pub mod frame;
pub mod property;
pub mod signature;
pub mod synthesizer;
pub mod value;
