//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `ASSISTANT_RELAY` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use assistant_relay::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {:?}", config.server.socket_addr());
//! ```

mod credentials;
mod error;
mod openai;
mod polling;
mod server;

pub use credentials::{CredentialSource, CredentialsConfig};
pub use error::{ConfigError, ValidationError};
pub use openai::OpenAiConfig;
pub use polling::PollingConfig;
pub use server::{Environment, ServerConfig};

use secrecy::Secret;
use serde::Deserialize;

/// Plain variable consulted when `openai.api_key` is not set
pub const OPENAI_API_KEY_VAR: &str = "OPENAI_API_KEY";

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Upstream assistants API
    #[serde(default)]
    pub openai: OpenAiConfig,

    /// Run polling cadence
    #[serde(default)]
    pub polling: PollingConfig,

    /// Credential source
    #[serde(default)]
    pub credentials: CredentialsConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `ASSISTANT_RELAY` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Falls back to `OPENAI_API_KEY` for the upstream key
    ///
    /// # Environment Variable Format
    ///
    /// - `ASSISTANT_RELAY__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `ASSISTANT_RELAY__POLLING__MAX_ATTEMPTS=120` -> `polling.max_attempts = 120`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let mut config: AppConfig = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("ASSISTANT_RELAY")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        if !config.openai.has_api_key() {
            config.openai.api_key = std::env::var(OPENAI_API_KEY_VAR).ok().map(Secret::new);
        }

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid, or if
    /// the environment credential source has no key.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.openai.validate()?;
        self.polling.validate()?;
        self.credentials.validate()?;

        if self.credentials.source == CredentialSource::Environment && !self.openai.has_api_key() {
            return Err(ValidationError::MissingRequired(OPENAI_API_KEY_VAR));
        }
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
