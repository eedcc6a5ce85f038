//! Port definitions — traits that adapters implement.
//!
//! Ports are the boundaries between the gateway core and the outside world.
//! They are defined here (in `app`) so that both the core and the adapter
//! layer can depend on them without creating circular dependencies.
//!
//! Both ports are fire-and-forget: a returned error means the bytes or the
//! message were not handed over, never that the far end failed to act.

pub mod bus;
pub mod transport;

pub use bus::BusPublisher;
pub use transport::Transport;
