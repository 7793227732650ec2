//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the relay core to external systems:
//! - `ai` - Assistant API clients (OpenAI Assistants, scripted mock)
//! - `credentials` - Credential resolvers (static, plugin lookup)
//! - `events` - Event sinks (in-memory recorder)
//! - `http` - Axum routes, handlers and NDJSON streaming

pub mod ai;
pub mod credentials;
pub mod events;
pub mod http;

pub use ai::{MockAssistantApi, OpenAIAssistantsConfig, OpenAIAssistantsFactory};
pub use credentials::{PluginCredentialResolver, PluginLookupConfig, StaticCredentialResolver};
pub use events::InMemoryEventSink;
pub use http::{relay_router, RelayAppState};
