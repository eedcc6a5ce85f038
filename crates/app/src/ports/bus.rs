//! Message bus port — publishes status values and acknowledgments.

use std::future::Future;

use homenet_domain::error::HomenetError;

/// Publishes string payloads on topics of the message bus.
pub trait BusPublisher {
    /// Publish `payload` on `topic`, retained by the broker when `retain` is set.
    fn publish(
        &self,
        topic: String,
        payload: String,
        retain: bool,
    ) -> impl Future<Output = Result<(), HomenetError>> + Send;
}

impl<T: BusPublisher + Send + Sync> BusPublisher for std::sync::Arc<T> {
    fn publish(
        &self,
        topic: String,
        payload: String,
        retain: bool,
    ) -> impl Future<Output = Result<(), HomenetError>> + Send {
        (**self).publish(topic, payload, retain)
    }
}
