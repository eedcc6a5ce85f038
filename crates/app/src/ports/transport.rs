//! Transport port — the duplex byte stream to the wall-pad.

use std::future::Future;

use homenet_domain::error::HomenetError;

/// Writes raw command bytes to the device bus.
///
/// Inbound bytes are not read through this trait: adapters push them into the
/// gateway's inbound channel.
pub trait Transport {
    /// Queue `bytes` for transmission.
    fn write(&self, bytes: Vec<u8>) -> impl Future<Output = Result<(), HomenetError>> + Send;
}

impl<T: Transport + Send + Sync> Transport for std::sync::Arc<T> {
    fn write(&self, bytes: Vec<u8>) -> impl Future<Output = Result<(), HomenetError>> + Send {
        (**self).write(bytes)
    }
}
