//! Application handlers.

pub mod relay_message;

pub use relay_message::{RelayError, RelayMessageCommand, RelayOutcome, RunOrchestrator};
