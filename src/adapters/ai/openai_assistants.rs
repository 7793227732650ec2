//! OpenAI Assistants - Implementation of AssistantApi for OpenAI's Assistants API.
//!
//! Talks to the v2 threads/messages/runs endpoints over HTTPS with bearer auth.
//!
//! # Configuration
//!
//! ```ignore
//! let config = OpenAIAssistantsConfig::default()
//!     .with_base_url("https://api.openai.com/v1")
//!     .with_timeout(Duration::from_secs(30));
//!
//! let factory = OpenAIAssistantsFactory::new(config);
//! let api = factory.client_for(&ApiCredential::new(api_key));
//! ```

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::ports::{
    ApiCredential, AssistantApi, AssistantApiError, AssistantClientFactory, MessageRole, Run,
    SortOrder, Thread, ThreadMessage,
};

const ASSISTANTS_BETA_HEADER: &str = "OpenAI-Beta";
const ASSISTANTS_BETA_VALUE: &str = "assistants=v2";

/// Configuration shared by every OpenAI Assistants client.
#[derive(Debug, Clone)]
pub struct OpenAIAssistantsConfig {
    /// Base URL for the API (default: https://api.openai.com/v1).
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for OpenAIAssistantsConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            timeout: Duration::from_secs(60),
        }
    }
}

impl OpenAIAssistantsConfig {
    /// Sets the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Builds OpenAI Assistants clients that share one connection pool.
pub struct OpenAIAssistantsFactory {
    config: Arc<OpenAIAssistantsConfig>,
    client: Client,
}

impl OpenAIAssistantsFactory {
    /// Creates a new factory with the given configuration.
    pub fn new(config: OpenAIAssistantsConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            config: Arc::new(config),
            client,
        }
    }
}

impl AssistantClientFactory for OpenAIAssistantsFactory {
    fn client_for(&self, credential: &ApiCredential) -> Arc<dyn AssistantApi> {
        Arc::new(OpenAIAssistantsClient {
            config: Arc::clone(&self.config),
            client: self.client.clone(),
            credential: credential.clone(),
        })
    }
}

/// OpenAI Assistants API client bound to one credential.
pub struct OpenAIAssistantsClient {
    config: Arc<OpenAIAssistantsConfig>,
    client: Client,
    credential: ApiCredential,
}

impl OpenAIAssistantsClient {
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    /// Adds authentication and beta headers.
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .bearer_auth(self.credential.expose())
            .header(ASSISTANTS_BETA_HEADER, ASSISTANTS_BETA_VALUE)
    }

    /// Sends a request, maps transport errors, checks status and decodes JSON.
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, AssistantApiError> {
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AssistantApiError::Timeout {
                        timeout_secs: self.config.timeout.as_secs(),
                    }
                } else if e.is_connect() {
                    AssistantApiError::network(format!("Connection failed: {}", e))
                } else {
                    AssistantApiError::network(e.to_string())
                }
            })?;

        let response = Self::handle_response_status(response).await?;

        response
            .json::<T>()
            .await
            .map_err(|e| AssistantApiError::parse(format!("Failed to parse response: {}", e)))
    }

    /// Maps non-success statuses to port errors.
    async fn handle_response_status(response: Response) -> Result<Response, AssistantApiError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let error_body = response.text().await.unwrap_or_default();
        let message = Self::error_message(&error_body);

        match status.as_u16() {
            401 | 403 => Err(AssistantApiError::AuthenticationFailed(message)),
            404 => Err(AssistantApiError::NotFound(message)),
            429 => Err(AssistantApiError::RateLimited(message)),
            400 | 409 | 422 => Err(AssistantApiError::InvalidRequest(message)),
            500..=599 => Err(AssistantApiError::unavailable(format!(
                "Server error {}: {}",
                status.as_u16(),
                message
            ))),
            _ => Err(AssistantApiError::network(format!(
                "Unexpected status {}: {}",
                status.as_u16(),
                message
            ))),
        }
    }

    /// Extracts `error.message` from an OpenAI error body, falling back to the raw body.
    fn error_message(error_body: &str) -> String {
        serde_json::from_str::<ErrorEnvelope>(error_body)
            .ok()
            .map(|e| e.error.message)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| error_body.trim().to_string())
    }
}

#[async_trait]
impl AssistantApi for OpenAIAssistantsClient {
    async fn create_thread(&self) -> Result<Thread, AssistantApiError> {
        let request = self
            .client
            .post(self.url("/threads"))
            .json(&serde_json::json!({}));
        let thread: ThreadObject = self.send(request).await?;
        Ok(Thread { id: thread.id })
    }

    async fn create_message(
        &self,
        thread_id: &str,
        role: MessageRole,
        content: &str,
    ) -> Result<(), AssistantApiError> {
        let request = self
            .client
            .post(self.url(&format!("/threads/{}/messages", thread_id)))
            .json(&CreateMessageRequest {
                role: role.as_str(),
                content,
            });
        let _: MessageObject = self.send(request).await?;
        Ok(())
    }

    async fn create_run(
        &self,
        thread_id: &str,
        assistant_id: &str,
    ) -> Result<Run, AssistantApiError> {
        let request = self
            .client
            .post(self.url(&format!("/threads/{}/runs", thread_id)))
            .json(&CreateRunRequest { assistant_id });
        let run: RunObject = self.send(request).await?;
        Ok(run.into())
    }

    async fn retrieve_run(&self, thread_id: &str, run_id: &str) -> Result<Run, AssistantApiError> {
        let request = self
            .client
            .get(self.url(&format!("/threads/{}/runs/{}", thread_id, run_id)));
        let run: RunObject = self.send(request).await?;
        Ok(run.into())
    }

    async fn list_messages(
        &self,
        thread_id: &str,
        limit: u32,
        order: SortOrder,
    ) -> Result<Vec<ThreadMessage>, AssistantApiError> {
        let request = self
            .client
            .get(self.url(&format!("/threads/{}/messages", thread_id)))
            .query(&[("limit", limit.to_string()), ("order", order.as_str().to_string())]);
        let list: MessageList = self.send(request).await?;
        Ok(list
            .data
            .into_iter()
            .map(|m| ThreadMessage {
                role: m.role,
                content: m.content,
            })
            .collect())
    }

    fn provider_name(&self) -> &str {
        "OpenAI"
    }
}

// ----- OpenAI API Types -----

#[derive(Debug, Serialize)]
struct CreateMessageRequest<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct CreateRunRequest<'a> {
    assistant_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct ThreadObject {
    id: String,
}

#[derive(Debug, Deserialize)]
struct RunObject {
    id: String,
    status: String,
}

impl From<RunObject> for Run {
    fn from(run: RunObject) -> Self {
        Run::new(run.id, run.status.into())
    }
}

#[derive(Debug, Deserialize)]
struct MessageObject {
    role: MessageRole,
    #[serde(default)]
    content: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct MessageList {
    data: Vec<MessageObject>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::relay::RunStatus;
    use serde_json::json;

    #[test]
    fn config_builder_works() {
        let config = OpenAIAssistantsConfig::default()
            .with_base_url("https://proxy.example.com/v1/")
            .with_timeout(Duration::from_secs(15));

        assert_eq!(config.base_url, "https://proxy.example.com/v1");
        assert_eq!(config.timeout, Duration::from_secs(15));
    }

    #[test]
    fn factory_builds_openai_client() {
        let factory = OpenAIAssistantsFactory::new(OpenAIAssistantsConfig::default());
        let api = factory.client_for(&ApiCredential::new("sk-test"));
        assert_eq!(api.provider_name(), "OpenAI");
    }

    #[test]
    fn error_message_prefers_structured_message() {
        let body = r#"{"error":{"message":"No thread found with id 'thread_x'.","type":"invalid_request_error"}}"#;
        assert_eq!(
            OpenAIAssistantsClient::error_message(body),
            "No thread found with id 'thread_x'."
        );
    }

    #[test]
    fn error_message_falls_back_to_raw_body() {
        assert_eq!(
            OpenAIAssistantsClient::error_message("  upstream exploded \n"),
            "upstream exploded"
        );
    }

    #[test]
    fn run_object_maps_status() {
        let run: RunObject =
            serde_json::from_value(json!({"id": "run_1", "object": "thread.run", "status": "requires_action"}))
                .unwrap();
        assert_eq!(Run::from(run), Run::new("run_1", RunStatus::RequiresAction));
    }

    #[test]
    fn message_list_keeps_content_structure() {
        let list: MessageList = serde_json::from_value(json!({
            "object": "list",
            "data": [{
                "id": "msg_1",
                "role": "assistant",
                "content": [{"type": "text", "text": {"value": "hello", "annotations": []}}]
            }],
            "has_more": false
        }))
        .unwrap();

        assert_eq!(list.data.len(), 1);
        assert_eq!(list.data[0].role, MessageRole::Assistant);
        assert_eq!(list.data[0].content[0]["text"]["value"], "hello");
    }

    #[test]
    fn request_bodies_serialize() {
        let body = serde_json::to_value(CreateMessageRequest {
            role: "user",
            content: "hi",
        })
        .unwrap();
        assert_eq!(body, json!({"role": "user", "content": "hi"}));

        let body = serde_json::to_value(CreateRunRequest {
            assistant_id: "asst_1",
        })
        .unwrap();
        assert_eq!(body, json!({"assistant_id": "asst_1"}));
    }

    mod wire {
        use super::*;
        use axum::extract::{Path, Query};
        use axum::http::{HeaderMap, StatusCode};
        use axum::routing::{get, post};
        use axum::{Json, Router};
        use serde_json::Value;
        use std::collections::HashMap;

        fn authorized(headers: &HeaderMap) -> bool {
            headers.get("authorization").and_then(|v| v.to_str().ok()) == Some("Bearer sk-wire")
                && headers.get(ASSISTANTS_BETA_HEADER).and_then(|v| v.to_str().ok())
                    == Some(ASSISTANTS_BETA_VALUE)
        }

        async fn spawn_fake_openai() -> String {
            let app = Router::new()
                .route(
                    "/v1/threads",
                    post(|headers: HeaderMap| async move {
                        if !authorized(&headers) {
                            return (
                                StatusCode::UNAUTHORIZED,
                                Json(json!({"error": {"message": "Incorrect API key provided"}})),
                            );
                        }
                        (StatusCode::OK, Json(json!({"id": "thread_w", "object": "thread"})))
                    }),
                )
                .route(
                    "/v1/threads/:thread_id/messages",
                    post(|Path(thread_id): Path<String>, Json(body): Json<Value>| async move {
                        Json(json!({"id": "msg_1", "thread_id": thread_id, "role": body["role"], "content": []}))
                    })
                    .get(
                        |Path(_thread_id): Path<String>, Query(q): Query<HashMap<String, String>>| async move {
                            assert_eq!(q.get("limit").map(String::as_str), Some("1"));
                            assert_eq!(q.get("order").map(String::as_str), Some("desc"));
                            Json(json!({"data": [{"role": "assistant", "content": [{"type": "text"}]}]}))
                        },
                    ),
                )
                .route(
                    "/v1/threads/:thread_id/runs",
                    post(|Json(body): Json<Value>| async move {
                        assert_eq!(body["assistant_id"], "asst_w");
                        Json(json!({"id": "run_w", "status": "queued"}))
                    }),
                )
                .route(
                    "/v1/threads/:thread_id/runs/:run_id",
                    get(|Path((thread_id, _run_id)): Path<(String, String)>| async move {
                        if thread_id == "missing" {
                            return (
                                StatusCode::NOT_FOUND,
                                Json(json!({"error": {"message": "No thread found"}})),
                            );
                        }
                        (StatusCode::OK, Json(json!({"id": "run_w", "status": "completed"})))
                    }),
                );

            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            tokio::spawn(async move {
                axum::serve(listener, app).await.unwrap();
            });
            format!("http://{}/v1", addr)
        }

        fn client(base_url: String, key: &str) -> Arc<dyn AssistantApi> {
            OpenAIAssistantsFactory::new(OpenAIAssistantsConfig::default().with_base_url(base_url))
                .client_for(&ApiCredential::new(key))
        }

        #[tokio::test]
        async fn drives_thread_message_run_sequence() {
            let api = client(spawn_fake_openai().await, "sk-wire");

            let thread = api.create_thread().await.unwrap();
            assert_eq!(thread.id, "thread_w");

            api.create_message(&thread.id, MessageRole::User, "hi")
                .await
                .unwrap();

            let run = api.create_run(&thread.id, "asst_w").await.unwrap();
            assert_eq!(run, Run::new("run_w", RunStatus::Queued));

            let run = api.retrieve_run(&thread.id, &run.id).await.unwrap();
            assert_eq!(run.status, RunStatus::Completed);

            let messages = api
                .list_messages(&thread.id, 1, SortOrder::Desc)
                .await
                .unwrap();
            assert_eq!(messages, vec![ThreadMessage::assistant(json!([{"type": "text"}]))]);
        }

        #[tokio::test]
        async fn maps_error_statuses() {
            let base_url = spawn_fake_openai().await;

            let err = client(base_url.clone(), "sk-wrong")
                .create_thread()
                .await
                .unwrap_err();
            assert_eq!(
                err,
                AssistantApiError::AuthenticationFailed("Incorrect API key provided".into())
            );

            let err = client(base_url, "sk-wire")
                .retrieve_run("missing", "run_w")
                .await
                .unwrap_err();
            assert_eq!(err, AssistantApiError::NotFound("No thread found".into()));
        }

        #[tokio::test]
        async fn unreachable_host_is_network_error() {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            drop(listener);

            let err = client(format!("http://{}/v1", addr), "sk-wire")
                .create_thread()
                .await
                .unwrap_err();
            assert!(matches!(err, AssistantApiError::Network(_)));
        }
    }
}
