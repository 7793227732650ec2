//! Per-request credential lookup against a content-management plugin.
//!
//! The plugin exposes an administrative AJAX endpoint. The relay posts a
//! form-encoded `action=gpt_chat_get_api_key&api_key_name=<name>` and expects
//! `{"success": true, "api_key": "..."}` back.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::ports::{ApiCredential, CredentialError, CredentialResolver};

const LOOKUP_ACTION: &str = "gpt_chat_get_api_key";

/// Configuration for the plugin lookup.
#[derive(Debug, Clone)]
pub struct PluginLookupConfig {
    /// Administrative endpoint URL.
    pub url: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl PluginLookupConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: Duration::from_secs(10),
        }
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Looks up the credential named in each request.
pub struct PluginCredentialResolver {
    config: PluginLookupConfig,
    client: Client,
}

impl PluginCredentialResolver {
    pub fn new(config: PluginLookupConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    fn extract_key(response: LookupResponse, key_name: &str) -> Result<ApiCredential, CredentialError> {
        match response.api_key {
            Some(key) if response.success && !key.is_empty() => Ok(ApiCredential::new(key)),
            _ => Err(CredentialError::NotFound(key_name.to_string())),
        }
    }
}

#[async_trait]
impl CredentialResolver for PluginCredentialResolver {
    fn requires_key_name(&self) -> bool {
        true
    }

    async fn resolve(&self, key_name: Option<&str>) -> Result<ApiCredential, CredentialError> {
        let key_name = key_name.ok_or(CredentialError::MissingKeyName)?;

        tracing::debug!("Looking up credential '{}' from {}", key_name, self.config.url);

        let response = self
            .client
            .post(&self.config.url)
            .form(&[("action", LOOKUP_ACTION), ("api_key_name", key_name)])
            .send()
            .await
            .map_err(|e| CredentialError::LookupFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("Credential lookup returned {}", status);
            return Err(CredentialError::LookupFailed(format!(
                "endpoint returned {}",
                status
            )));
        }

        let body: LookupResponse = response.json().await.map_err(|e| {
            tracing::warn!("Failed to parse credential lookup response: {}", e);
            CredentialError::LookupFailed(e.to_string())
        })?;

        Self::extract_key(body, key_name)
    }
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    success: bool,
    api_key: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Form, Json, Router};
    use serde_json::{json, Value};
    use std::collections::HashMap;

    /// Serves a fake plugin endpoint and returns its URL.
    async fn spawn_plugin(keys: HashMap<&'static str, &'static str>) -> String {
        let app = Router::new().route(
            "/wp-admin/admin-ajax.php",
            post(move |Form(form): Form<HashMap<String, String>>| {
                let keys = keys.clone();
                async move {
                    if form.get("action").map(String::as_str) != Some(LOOKUP_ACTION) {
                        return Json(json!({"success": false}));
                    }
                    let name = form.get("api_key_name").cloned().unwrap_or_default();
                    match keys.get(name.as_str()) {
                        Some(key) => Json(json!({"success": true, "api_key": key})),
                        None => Json::<Value>(json!({"success": false, "api_key": ""})),
                    }
                }
            }),
        );

        serve(app).await
    }

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/wp-admin/admin-ajax.php", addr)
    }

    #[tokio::test]
    async fn resolves_named_key() {
        let url = spawn_plugin(HashMap::from([("primary", "sk-from-plugin")])).await;
        let resolver = PluginCredentialResolver::new(PluginLookupConfig::new(url));

        assert!(resolver.requires_key_name());
        let credential = resolver.resolve(Some("primary")).await.unwrap();
        assert_eq!(credential.expose(), "sk-from-plugin");
    }

    #[tokio::test]
    async fn unknown_key_is_not_found() {
        let url = spawn_plugin(HashMap::new()).await;
        let resolver = PluginCredentialResolver::new(PluginLookupConfig::new(url));

        let err = resolver.resolve(Some("missing")).await.unwrap_err();
        assert_eq!(err, CredentialError::NotFound("missing".to_string()));
    }

    #[tokio::test]
    async fn server_error_fails_lookup() {
        let url = serve(Router::new().route(
            "/wp-admin/admin-ajax.php",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "database down") }),
        ))
        .await;
        let resolver = PluginCredentialResolver::new(PluginLookupConfig::new(url));

        let err = resolver.resolve(Some("primary")).await.unwrap_err();
        assert!(matches!(err, CredentialError::LookupFailed(_)));
    }

    #[tokio::test]
    async fn non_json_body_fails_lookup() {
        let url = serve(Router::new().route(
            "/wp-admin/admin-ajax.php",
            post(|| async { "<html>0</html>" }),
        ))
        .await;
        let resolver = PluginCredentialResolver::new(PluginLookupConfig::new(url));

        let err = resolver.resolve(Some("primary")).await.unwrap_err();
        assert!(matches!(err, CredentialError::LookupFailed(_)));
    }

    #[tokio::test]
    async fn missing_key_name_is_rejected_without_lookup() {
        let resolver =
            PluginCredentialResolver::new(PluginLookupConfig::new("http://127.0.0.1:9/unused"));
        assert_eq!(
            resolver.resolve(None).await.unwrap_err(),
            CredentialError::MissingKeyName
        );
    }

    #[tokio::test]
    async fn unreachable_endpoint_fails_lookup() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let resolver = PluginCredentialResolver::new(
            PluginLookupConfig::new(format!("http://{}/admin-ajax.php", addr))
                .with_timeout(Duration::from_secs(2)),
        );
        let err = resolver.resolve(Some("primary")).await.unwrap_err();
        assert!(matches!(err, CredentialError::LookupFailed(_)));
    }

    #[test]
    fn extract_key_requires_success_and_key() {
        let ok = LookupResponse {
            success: true,
            api_key: Some("sk-1".into()),
        };
        assert!(PluginCredentialResolver::extract_key(ok, "n").is_ok());

        let refused = LookupResponse {
            success: false,
            api_key: Some("sk-1".into()),
        };
        assert!(PluginCredentialResolver::extract_key(refused, "n").is_err());

        let empty = LookupResponse {
            success: true,
            api_key: Some(String::new()),
        };
        assert!(PluginCredentialResolver::extract_key(empty, "n").is_err());
    }
}
