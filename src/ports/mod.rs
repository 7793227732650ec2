//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the relay core and the outside world. Adapters implement these ports.
//!
//! - `AssistantApi` - Upstream thread/message/run operations
//! - `AssistantClientFactory` - Builds an `AssistantApi` for a resolved credential
//! - `CredentialResolver` - Strategy for obtaining the upstream credential
//! - `EventSink` - Ordered output channel for relay events

mod assistant_api;
mod credential_resolver;
mod event_sink;

pub use assistant_api::{
    AssistantApi, AssistantApiError, AssistantClientFactory, MessageRole, Run, SortOrder, Thread,
    ThreadMessage,
};
pub use credential_resolver::{ApiCredential, CredentialError, CredentialResolver};
pub use event_sink::EventSink;
