//! Assistant API Port - Interface for the upstream conversational API.
//!
//! The relay consumes threads, messages and runs as a black box. This port
//! captures exactly the five operations the run orchestrator needs, so the
//! orchestrator can be driven by a scripted client in tests.
//!
//! # Example
//!
//! ```ignore
//! let thread = api.create_thread().await?;
//! api.create_message(&thread.id, MessageRole::User, "Hello").await?;
//! let run = api.create_run(&thread.id, "asst_123").await?;
//! let run = api.retrieve_run(&thread.id, &run.id).await?;
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use super::ApiCredential;
use crate::domain::relay::RunStatus;

/// Port for upstream assistant API interactions.
#[async_trait]
pub trait AssistantApi: Send + Sync {
    /// Creates an empty conversation thread.
    async fn create_thread(&self) -> Result<Thread, AssistantApiError>;

    /// Appends a message to a thread.
    async fn create_message(
        &self,
        thread_id: &str,
        role: MessageRole,
        content: &str,
    ) -> Result<(), AssistantApiError>;

    /// Starts a run of `assistant_id` on the thread.
    async fn create_run(&self, thread_id: &str, assistant_id: &str)
        -> Result<Run, AssistantApiError>;

    /// Fetches the current state of a run.
    async fn retrieve_run(&self, thread_id: &str, run_id: &str) -> Result<Run, AssistantApiError>;

    /// Lists up to `limit` thread messages in the given order.
    async fn list_messages(
        &self,
        thread_id: &str,
        limit: u32,
        order: SortOrder,
    ) -> Result<Vec<ThreadMessage>, AssistantApiError>;

    /// Human-readable upstream name used in error records (e.g. "OpenAI").
    fn provider_name(&self) -> &str;
}

/// Builds an [`AssistantApi`] bound to one credential.
///
/// Lets a single handler serve both a process-wide credential and credentials
/// resolved per request.
pub trait AssistantClientFactory: Send + Sync {
    /// Returns a client that authenticates with `credential`.
    fn client_for(&self, credential: &ApiCredential) -> Arc<dyn AssistantApi>;
}

/// Upstream conversation thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thread {
    pub id: String,
}

/// Upstream run with its last observed status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Run {
    pub id: String,
    pub status: RunStatus,
}

impl Run {
    /// Creates a run snapshot.
    pub fn new(id: impl Into<String>, status: RunStatus) -> Self {
        Self {
            id: id.into(),
            status,
        }
    }
}

/// A message stored on an upstream thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadMessage {
    /// Who authored the message.
    pub role: MessageRole,
    /// Upstream content structure, never inspected by the relay.
    pub content: Value,
}

impl ThreadMessage {
    /// Creates an assistant-authored message.
    pub fn assistant(content: Value) -> Self {
        Self {
            role: MessageRole::Assistant,
            content,
        }
    }

    /// Creates a user-authored message.
    pub fn user(content: Value) -> Self {
        Self {
            role: MessageRole::User,
            content,
        }
    }
}

/// Role of the message author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        }
    }
}

/// Ordering for message listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// Upstream assistant API errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssistantApiError {
    /// Rate limited by provider.
    #[error("rate limited: {0}")]
    RateLimited(String),

    /// API key rejected.
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Thread, run or assistant does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Request rejected as malformed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Provider returned a server error.
    #[error("provider unavailable: {0}")]
    Unavailable(String),

    /// Transport failure.
    #[error("network error: {0}")]
    Network(String),

    /// Response body did not match the expected shape.
    #[error("parse error: {0}")]
    Parse(String),

    /// Request timed out.
    #[error("request timed out after {timeout_secs}s")]
    Timeout {
        /// Configured timeout.
        timeout_secs: u64,
    },
}

impl AssistantApiError {
    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Creates an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }
}
