//! Application layer - Command handlers.
//!
//! This layer orchestrates domain decisions and coordinates between ports.

pub mod handlers;

pub use handlers::{RelayError, RelayMessageCommand, RelayOutcome, RunOrchestrator};
