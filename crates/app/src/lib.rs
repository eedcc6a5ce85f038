//! # homenet-app
//!
//! Application layer — the gateway core and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `Transport` — write command bytes to the wall-pad
//!   - `BusPublisher` — publish status values on the message bus
//! - Keep the gateway's mutable state:
//!   - `HomeStatus` — last published value per device property
//!   - `RetryQueue` — commands waiting for their acknowledgment
//! - Drive the protocol:
//!   - `StatePublisher` — dedup, anti-echo and debounce of decoded readings
//!   - `BusListener` — resolve control messages into queued commands
//!   - `Gateway` — the single event loop feeding frames and messages through
//!     the above
//!
//! ## Dependency rule
//! Depends on `homenet-domain` only (plus `tokio::sync` for channels).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod dispatcher;
pub mod gateway;
pub mod home_status;
pub mod listener;
pub mod ports;
pub mod publisher;
pub mod topic;
