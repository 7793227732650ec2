//! OpenAI Assistants configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::{is_http_url, ValidationError};
use crate::adapters::ai::OpenAIAssistantsConfig;
use crate::ports::ApiCredential;

/// OpenAI Assistants configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiConfig {
    /// API key used when credentials come from the environment
    pub api_key: Option<Secret<String>>,

    /// API base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl OpenAiConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check if an API key is configured
    pub fn has_api_key(&self) -> bool {
        self.api_key
            .as_ref()
            .is_some_and(|k| !k.expose_secret().trim().is_empty())
    }

    /// The configured key as a credential
    pub fn credential(&self) -> Option<ApiCredential> {
        self.api_key
            .as_ref()
            .filter(|_| self.has_api_key())
            .map(|k| ApiCredential::new(k.expose_secret().trim()))
    }

    /// Client settings for the assistants adapter
    pub fn client_config(&self) -> OpenAIAssistantsConfig {
        OpenAIAssistantsConfig::default()
            .with_base_url(self.base_url.clone())
            .with_timeout(self.timeout())
    }

    /// Validate OpenAI configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !is_http_url(&self.base_url) {
            return Err(ValidationError::InvalidUrl("openai.base_url"));
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout("openai.timeout_secs"));
        }
        Ok(())
    }
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_timeout() -> u64 {
    60
}
