//! Axum router configuration for the relay endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{health, send_message, RelayAppState};

/// Create the relay router.
///
/// # Routes
///
/// - `POST /api/send-message` - Relay a message, stream run progress as NDJSON
/// - `GET /health` - Liveness check
pub fn relay_router() -> Router<RelayAppState> {
    Router::new()
        .route("/api/send-message", post(send_message))
        .route("/health", get(health))
}
