//! Event sink adapters.
//!
//! - `InMemoryEventSink` - Recording sink for tests
//!
//! The HTTP streaming sink lives with the relay HTTP adapter.

mod in_memory;

pub use in_memory::InMemoryEventSink;
