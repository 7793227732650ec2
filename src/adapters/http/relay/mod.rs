//! HTTP adapter for the relay endpoint.
//!
//! Provides endpoints for:
//! - Relaying a chat message and streaming run progress as NDJSON
//! - Liveness checks

pub mod dto;
pub mod handlers;
pub mod routes;
pub mod streaming;

pub use dto::{ErrorBody, HealthResponse, SendMessageRequest};
pub use handlers::{RelayApiError, RelayAppState};
pub use routes::relay_router;
pub use streaming::ChannelEventSink;
