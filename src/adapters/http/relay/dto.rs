//! HTTP DTOs for the relay endpoint.

use serde::{Deserialize, Serialize};

/// Body of `POST /api/send-message`.
///
/// Every field is optional at the wire level so that missing fields produce
/// the relay's own 400 message rather than an extractor rejection.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SendMessageRequest {
    pub message: Option<String>,
    pub assistant_id: Option<String>,
    pub thread_id: Option<String>,
    pub api_key_name: Option<String>,
}

/// Error response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Response body of `GET /health`.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_uses_camel_case_fields() {
        let req: SendMessageRequest = serde_json::from_str(
            r#"{"message":"hi","assistantId":"asst_1","threadId":"t1","apiKeyName":"primary"}"#,
        )
        .unwrap();

        assert_eq!(req.message.as_deref(), Some("hi"));
        assert_eq!(req.assistant_id.as_deref(), Some("asst_1"));
        assert_eq!(req.thread_id.as_deref(), Some("t1"));
        assert_eq!(req.api_key_name.as_deref(), Some("primary"));
    }

    #[test]
    fn request_tolerates_missing_fields() {
        let req: SendMessageRequest = serde_json::from_str("{}").unwrap();
        assert!(req.message.is_none());
        assert!(req.assistant_id.is_none());
    }

    #[test]
    fn error_body_serializes_single_field() {
        let json = serde_json::to_string(&ErrorBody::new("boom")).unwrap();
        assert_eq!(json, r#"{"error":"boom"}"#);
    }
}
