//! Assistant API Adapters.
//!
//! Implementations of the AssistantApi port.
//!
//! ## Available Adapters
//!
//! - `MockAssistantApi` - Scripted mock for testing
//! - `OpenAIAssistantsClient` - OpenAI Assistants v2 API
//! - `OpenAIAssistantsFactory` - Builds OpenAI clients per credential

mod mock_assistant;
mod openai_assistants;

pub use mock_assistant::{MockAssistantApi, MockCall, MockOperation};
pub use openai_assistants::{OpenAIAssistantsClient, OpenAIAssistantsConfig, OpenAIAssistantsFactory};
