//! Records emitted to the caller while a relay call progresses.
//!
//! Each record is written as one JSON object per line. The shapes are a wire
//! contract with existing clients, so the union is encoded by hand instead of
//! through a serde tag: most records discriminate on `status`, the message
//! record on `type`, and the error record has no discriminant at all.

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

use super::RunStatus;

/// A single event in a relay response stream.
#[derive(Debug, Clone, PartialEq)]
pub enum RelayEvent {
    /// A new upstream thread was created for this conversation.
    ThreadCreated { thread_id: String },
    /// A run was started on the thread.
    RunCreated { run_id: String },
    /// Status observed by one poll of the run.
    RunStatus { status: RunStatus },
    /// Latest assistant message, content passed through untouched.
    Message { content: Value },
    /// Terminal failure of the call.
    Error { error: String },
}

impl RelayEvent {
    pub fn thread_created(thread_id: impl Into<String>) -> Self {
        Self::ThreadCreated {
            thread_id: thread_id.into(),
        }
    }

    pub fn run_created(run_id: impl Into<String>) -> Self {
        Self::RunCreated {
            run_id: run_id.into(),
        }
    }

    pub fn run_status(status: RunStatus) -> Self {
        Self::RunStatus { status }
    }

    pub fn message(content: Value) -> Self {
        Self::Message { content }
    }

    pub fn error(error: impl Into<String>) -> Self {
        Self::Error {
            error: error.into(),
        }
    }

    /// Returns true for the terminal error record.
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    /// Encodes the event as a single NDJSON line, newline included.
    pub fn to_json_line(&self) -> Result<String, serde_json::Error> {
        let mut line = serde_json::to_string(self)?;
        line.push('\n');
        Ok(line)
    }
}

impl Serialize for RelayEvent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            RelayEvent::ThreadCreated { thread_id } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("status", "thread_created")?;
                map.serialize_entry("threadId", thread_id)?;
                map.end()
            }
            RelayEvent::RunCreated { run_id } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("status", "run_created")?;
                map.serialize_entry("runId", run_id)?;
                map.end()
            }
            RelayEvent::RunStatus { status } => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("status", status.as_str())?;
                map.end()
            }
            RelayEvent::Message { content } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("type", "message")?;
                map.serialize_entry("content", content)?;
                map.end()
            }
            RelayEvent::Error { error } => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("error", error)?;
                map.end()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn encode(event: &RelayEvent) -> Value {
        serde_json::to_value(event).unwrap()
    }

    #[test]
    fn thread_created_shape() {
        assert_eq!(
            encode(&RelayEvent::thread_created("thread_abc")),
            json!({"status": "thread_created", "threadId": "thread_abc"})
        );
    }

    #[test]
    fn run_created_shape() {
        assert_eq!(
            encode(&RelayEvent::run_created("run_1")),
            json!({"status": "run_created", "runId": "run_1"})
        );
    }

    #[test]
    fn run_status_carries_raw_status_string() {
        assert_eq!(
            encode(&RelayEvent::run_status(RunStatus::InProgress)),
            json!({"status": "in_progress"})
        );
        assert_eq!(
            encode(&RelayEvent::run_status(RunStatus::from("warming_up"))),
            json!({"status": "warming_up"})
        );
    }

    #[test]
    fn message_passes_content_through() {
        let content = json!([{"type": "text", "text": {"value": "hello", "annotations": []}}]);
        assert_eq!(
            encode(&RelayEvent::message(content.clone())),
            json!({"type": "message", "content": content})
        );
    }

    #[test]
    fn error_shape() {
        assert_eq!(
            encode(&RelayEvent::error("Error communicating with OpenAI: boom")),
            json!({"error": "Error communicating with OpenAI: boom"})
        );
        assert!(RelayEvent::error("x").is_error());
        assert!(!RelayEvent::run_created("r").is_error());
    }

    #[test]
    fn json_line_is_newline_terminated_and_single_line() {
        let line = RelayEvent::thread_created("t1").to_json_line().unwrap();
        assert_eq!(line, "{\"status\":\"thread_created\",\"threadId\":\"t1\"}\n");
        assert_eq!(line.matches('\n').count(), 1);
    }
}
