//! Run polling configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::domain::relay::PollPolicy;

/// How often and how long to poll a run
#[derive(Debug, Clone, Deserialize)]
pub struct PollingConfig {
    /// Delay between status fetches in milliseconds
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    /// Status fetches before giving up
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

impl PollingConfig {
    pub fn policy(&self) -> PollPolicy {
        PollPolicy::new(Duration::from_millis(self.interval_ms), self.max_attempts)
    }

    /// Validate polling configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.interval_ms == 0 {
            return Err(ValidationError::InvalidPollInterval);
        }
        if self.max_attempts == 0 {
            return Err(ValidationError::InvalidPollAttempts);
        }
        Ok(())
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            max_attempts: default_max_attempts(),
        }
    }
}

fn default_interval_ms() -> u64 {
    500
}

fn default_max_attempts() -> u32 {
    60
}
