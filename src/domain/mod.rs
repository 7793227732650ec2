//! Domain layer - Pure relay vocabulary.
//!
//! Nothing in here performs I/O. The run orchestrator in the application layer
//! combines these types with the ports.

pub mod foundation;
pub mod relay;
