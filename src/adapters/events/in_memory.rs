//! In-memory event sink implementation for testing.
//!
//! Records every emitted relay event for assertions.
//!
//! # Security Note
//!
//! This adapter is for **testing only** and should not be used in production.
//! It uses `.expect()` on lock operations which will panic if locks are poisoned.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::domain::relay::RelayEvent;
use crate::ports::EventSink;

/// In-memory event sink for testing.
///
/// Clones share the same recording, so a test can keep a handle while the
/// sink itself is moved into a spawned relay task.
///
/// # Example
///
/// ```ignore
/// let mut sink = InMemoryEventSink::new();
/// orchestrator.run(&api, cmd, &mut sink).await?;
///
/// assert_eq!(sink.events().len(), 6);
/// assert_eq!(sink.close_count(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryEventSink {
    recorded: Arc<RwLock<Recording>>,
}

#[derive(Debug, Default)]
struct Recording {
    events: Vec<RelayEvent>,
    emitted_after_close: usize,
    close_count: usize,
}

impl InMemoryEventSink {
    /// Creates a new empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    // === Test Helpers ===

    /// Returns all recorded events in emission order.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn events(&self) -> Vec<RelayEvent> {
        self.recorded
            .read()
            .expect("InMemoryEventSink: lock poisoned")
            .events
            .clone()
    }

    /// Returns the recorded events encoded as NDJSON.
    pub fn ndjson(&self) -> String {
        self.events()
            .iter()
            .filter_map(|e| e.to_json_line().ok())
            .collect()
    }

    /// Returns how many times the sink was closed.
    pub fn close_count(&self) -> usize {
        self.recorded
            .read()
            .expect("InMemoryEventSink: lock poisoned")
            .close_count
    }

    /// Returns how many events arrived after the sink was closed.
    pub fn emitted_after_close(&self) -> usize {
        self.recorded
            .read()
            .expect("InMemoryEventSink: lock poisoned")
            .emitted_after_close
    }
}

#[async_trait]
impl EventSink for InMemoryEventSink {
    async fn emit(&mut self, event: RelayEvent) {
        let mut recorded = self
            .recorded
            .write()
            .expect("InMemoryEventSink: lock poisoned");
        if recorded.close_count > 0 {
            recorded.emitted_after_close += 1;
        }
        recorded.events.push(event);
    }

    async fn close(&mut self) {
        self.recorded
            .write()
            .expect("InMemoryEventSink: lock poisoned")
            .close_count += 1;
    }
}
