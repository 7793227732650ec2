//! EventSink port - Ordered output channel for relay events.
//!
//! The run orchestrator writes events here as soon as they are known and closes
//! the sink exactly once when the call ends. Adapters decide what "writing"
//! means (an HTTP response body, a test recorder).

use async_trait::async_trait;

use crate::domain::relay::RelayEvent;

/// Port for emitting relay events.
///
/// Implementations must preserve emission order and must not batch events
/// they have already accepted. Delivery failures (e.g. a disconnected client)
/// are the adapter's concern; the relay keeps running to a terminal outcome.
#[async_trait]
pub trait EventSink: Send {
    /// Writes one event.
    async fn emit(&mut self, event: RelayEvent);

    /// Signals that no further events will follow.
    async fn close(&mut self);
}
