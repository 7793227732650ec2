//! Credential source configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::{is_http_url, ValidationError};
use crate::adapters::credentials::PluginLookupConfig;

/// Where the upstream API key comes from
#[derive(Debug, Clone, Deserialize)]
pub struct CredentialsConfig {
    /// Credential source
    #[serde(default)]
    pub source: CredentialSource,

    /// Plugin administrative endpoint (required for `plugin`)
    pub lookup_url: Option<String>,

    /// Plugin lookup timeout in seconds
    #[serde(default = "default_lookup_timeout")]
    pub lookup_timeout_secs: u64,
}

/// Credential source variant
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CredentialSource {
    /// One key from `openai.api_key`
    #[default]
    Environment,
    /// Per-request lookup by `apiKeyName`
    Plugin,
}

impl CredentialsConfig {
    /// Lookup settings, when a URL is configured
    pub fn lookup_config(&self) -> Option<PluginLookupConfig> {
        self.lookup_url.as_ref().map(|url| {
            PluginLookupConfig::new(url.clone())
                .with_timeout(Duration::from_secs(self.lookup_timeout_secs))
        })
    }

    /// Validate credential configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.source != CredentialSource::Plugin {
            return Ok(());
        }
        match &self.lookup_url {
            None => Err(ValidationError::MissingRequired("credentials.lookup_url")),
            Some(url) if !is_http_url(url) => {
                Err(ValidationError::InvalidUrl("credentials.lookup_url"))
            }
            Some(_) if self.lookup_timeout_secs == 0 => Err(ValidationError::InvalidTimeout(
                "credentials.lookup_timeout_secs",
            )),
            Some(_) => Ok(()),
        }
    }
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            source: CredentialSource::default(),
            lookup_url: None,
            lookup_timeout_secs: default_lookup_timeout(),
        }
    }
}

fn default_lookup_timeout() -> u64 {
    10
}
