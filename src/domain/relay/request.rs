//! Inbound relay request descriptor and its validation.

use thiserror::Error;

/// What a caller asked the relay to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayRequest {
    /// User message text.
    pub message: String,
    /// Assistant that should answer.
    pub assistant_id: String,
    /// Existing thread to continue, if any.
    pub thread_id: Option<String>,
    /// Name of the credential to look up, for per-request credentials.
    pub api_key_name: Option<String>,
}

/// Rejection of an inbound request before any upstream call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestValidationError {
    /// One or more required fields are absent or empty. Carries the full set
    /// of required field names, in wire spelling.
    #[error("Missing required fields: {}", join_fields(.0))]
    MissingFields(Vec<&'static str>),
}

fn join_fields(fields: &[&'static str]) -> String {
    match fields {
        [] => String::new(),
        [only] => (*only).to_string(),
        [first, second] => format!("{} or {}", first, second),
        [init @ .., last] => format!("{}, or {}", init.join(", "), last),
    }
}

fn present(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}

impl RelayRequest {
    /// Builds a request from raw optional fields.
    ///
    /// `message` and `assistant_id` must be non-empty; `api_key_name` is
    /// required only when `requires_key_name` is set. Values are kept verbatim.
    /// An empty `thread_id` is treated as absent, which starts a new thread.
    pub fn validate(
        message: Option<&str>,
        assistant_id: Option<&str>,
        thread_id: Option<&str>,
        api_key_name: Option<&str>,
        requires_key_name: bool,
    ) -> Result<Self, RequestValidationError> {
        let message = present(message);
        let assistant_id = present(assistant_id);
        let api_key_name = present(api_key_name);
        let key_ok = !requires_key_name || api_key_name.is_some();

        match (message, assistant_id) {
            (Some(message), Some(assistant_id)) if key_ok => Ok(Self {
                message,
                assistant_id,
                thread_id: present(thread_id),
                api_key_name,
            }),
            _ => {
                let mut required = vec!["message", "assistantId"];
                if requires_key_name {
                    required.push("apiKeyName");
                }
                Err(RequestValidationError::MissingFields(required))
            }
        }
    }
}
