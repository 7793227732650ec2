//! Credential resolver adapters.
//!
//! - `StaticCredentialResolver` - One key loaded at startup
//! - `PluginCredentialResolver` - Per-request lookup against a CMS plugin endpoint

mod plugin_lookup;
mod static_credential;

pub use plugin_lookup::{PluginCredentialResolver, PluginLookupConfig};
pub use static_credential::StaticCredentialResolver;
