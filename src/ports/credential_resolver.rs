//! Credential Resolver Port - Strategy for obtaining the upstream API key.
//!
//! Two strategies exist: a process-wide key loaded at startup, and a key
//! looked up per request by name from an external credential store.

use async_trait::async_trait;
use secrecy::{ExposeSecret, Secret};
use std::fmt;

/// Upstream API credential. The key never appears in `Debug` output.
#[derive(Clone)]
pub struct ApiCredential {
    key: Secret<String>,
}

impl ApiCredential {
    /// Wraps a raw API key.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: Secret::new(key.into()),
        }
    }

    /// Exposes the key (for building request headers).
    pub fn expose(&self) -> &str {
        self.key.expose_secret()
    }
}

impl fmt::Debug for ApiCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiCredential")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// Port for resolving the credential a relay call should use.
#[async_trait]
pub trait CredentialResolver: Send + Sync {
    /// Whether callers must name the credential (`apiKeyName`) in each request.
    fn requires_key_name(&self) -> bool;

    /// Resolves the credential, optionally by name.
    async fn resolve(&self, key_name: Option<&str>) -> Result<ApiCredential, CredentialError>;
}

/// Credential resolution errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialError {
    /// A key name was required but not supplied.
    #[error("credential name is required")]
    MissingKeyName,

    /// The credential store could not be reached or answered with an error.
    #[error("credential lookup failed: {0}")]
    LookupFailed(String),

    /// The credential store answered but refused or returned no key.
    #[error("credential store returned no key for '{0}'")]
    NotFound(String),
}
