//! HTTP handlers for the relay endpoint.
//!
//! These handlers validate the inbound request, resolve the upstream
//! credential, then hand the call to the run orchestrator on its own task and
//! answer with a streaming NDJSON body.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::Instrument;
use uuid::Uuid;

use crate::application::{RelayMessageCommand, RunOrchestrator};
use crate::domain::relay::RelayRequest;
use crate::ports::{AssistantClientFactory, CredentialResolver};

use super::dto::{ErrorBody, HealthResponse, SendMessageRequest};
use super::streaming::ChannelEventSink;

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state for relay handlers.
#[derive(Clone)]
pub struct RelayAppState {
    pub credentials: Arc<dyn CredentialResolver>,
    pub clients: Arc<dyn AssistantClientFactory>,
    pub orchestrator: Arc<RunOrchestrator>,
}

impl RelayAppState {
    /// Creates a new RelayAppState.
    pub fn new(
        credentials: Arc<dyn CredentialResolver>,
        clients: Arc<dyn AssistantClientFactory>,
        orchestrator: RunOrchestrator,
    ) -> Self {
        Self {
            credentials,
            clients,
            orchestrator: Arc::new(orchestrator),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// POST /api/send-message
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/send-message - Relay a message and stream run progress.
///
/// A body sent without a JSON content type is read as an empty request, so it
/// reports the missing fields.
///
/// # Errors
/// - 400 Bad Request: Required fields missing or empty, or malformed JSON
/// - 500 Internal Server Error: Credential lookup failed
///
/// Upstream failures after streaming starts arrive as an `error` record.
pub async fn send_message(
    State(state): State<RelayAppState>,
    payload: Result<Json<SendMessageRequest>, JsonRejection>,
) -> Result<Response, RelayApiError> {
    let body = match payload {
        Ok(Json(body)) => body,
        Err(JsonRejection::MissingJsonContentType(_)) => SendMessageRequest::default(),
        Err(rejection) => {
            return Err(RelayApiError::Rejected {
                status: rejection.status(),
                message: rejection.body_text(),
            })
        }
    };

    let request = RelayRequest::validate(
        body.message.as_deref(),
        body.assistant_id.as_deref(),
        body.thread_id.as_deref(),
        body.api_key_name.as_deref(),
        state.credentials.requires_key_name(),
    )
    .map_err(|e| RelayApiError::BadRequest(e.to_string()))?;

    let credential = state
        .credentials
        .resolve(request.api_key_name.as_deref())
        .await
        .map_err(|e| {
            tracing::warn!("Credential resolution failed: {}", e);
            RelayApiError::CredentialUnavailable
        })?;

    let client = state.clients.client_for(&credential);
    let orchestrator = state.orchestrator.clone();
    let (mut sink, response) = ChannelEventSink::with_response();

    let request_id = Uuid::new_v4();
    let span = tracing::info_span!(
        "relay",
        %request_id,
        assistant_id = %request.assistant_id,
        new_thread = request.thread_id.is_none(),
    );

    tokio::spawn(
        async move {
            tracing::info!("Relay started");
            if let Err(e) = orchestrator
                .run(client.as_ref(), RelayMessageCommand::from(request), &mut sink)
                .await
            {
                tracing::debug!("Relay ended with error: {}", e);
            }
        }
        .instrument(span),
    );

    Ok(response)
}

// ════════════════════════════════════════════════════════════════════════════════
// GET /health
// ════════════════════════════════════════════════════════════════════════════════

/// GET /health - Liveness check.
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse { status: "ok" })
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// Errors returned before streaming starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayApiError {
    BadRequest(String),
    Rejected { status: StatusCode, message: String },
    CredentialUnavailable,
}

impl IntoResponse for RelayApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            RelayApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, ErrorBody::new(msg)),
            RelayApiError::Rejected { status, message } => (status, ErrorBody::new(message)),
            RelayApiError::CredentialUnavailable => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody::new("Failed to retrieve API key"),
            ),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn bad_request_maps_to_400_with_message() {
        let response = RelayApiError::BadRequest("Missing required fields: message or assistantId".into())
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: ErrorBody = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.error, "Missing required fields: message or assistantId");
    }

    #[tokio::test]
    async fn extractor_rejection_keeps_its_status() {
        let response = RelayApiError::Rejected {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            message: "invalid type".into(),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], br#"{"error":"invalid type"}"#);
    }

    #[tokio::test]
    async fn credential_failure_maps_to_500_without_detail() {
        let response = RelayApiError::CredentialUnavailable.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], br#"{"error":"Failed to retrieve API key"}"#);
    }
}
