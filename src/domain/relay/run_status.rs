//! Run status as reported by the upstream assistant API.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of an upstream run.
///
/// Unknown strings are kept verbatim so they can be relayed to the caller
/// unchanged and keep the run in the polling loop.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RunStatus {
    Queued,
    InProgress,
    RequiresAction,
    Cancelling,
    Cancelled,
    Failed,
    Completed,
    Incomplete,
    Expired,
    Other(String),
}

impl RunStatus {
    /// Wire representation of the status.
    pub fn as_str(&self) -> &str {
        match self {
            RunStatus::Queued => "queued",
            RunStatus::InProgress => "in_progress",
            RunStatus::RequiresAction => "requires_action",
            RunStatus::Cancelling => "cancelling",
            RunStatus::Cancelled => "cancelled",
            RunStatus::Failed => "failed",
            RunStatus::Completed => "completed",
            RunStatus::Incomplete => "incomplete",
            RunStatus::Expired => "expired",
            RunStatus::Other(s) => s,
        }
    }

    /// Returns true for the successful terminal status.
    pub fn is_success(&self) -> bool {
        matches!(self, RunStatus::Completed)
    }

    /// Returns true for statuses that end the run without a result.
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            RunStatus::Failed | RunStatus::Cancelled | RunStatus::Expired
        )
    }

    /// Returns true if polling should stop on this status.
    pub fn is_terminal(&self) -> bool {
        self.is_success() || self.is_failure()
    }
}

impl From<&str> for RunStatus {
    fn from(s: &str) -> Self {
        match s {
            "queued" => RunStatus::Queued,
            "in_progress" => RunStatus::InProgress,
            "requires_action" => RunStatus::RequiresAction,
            "cancelling" => RunStatus::Cancelling,
            "cancelled" => RunStatus::Cancelled,
            "failed" => RunStatus::Failed,
            "completed" => RunStatus::Completed,
            "incomplete" => RunStatus::Incomplete,
            "expired" => RunStatus::Expired,
            other => RunStatus::Other(other.to_string()),
        }
    }
}

impl From<String> for RunStatus {
    fn from(s: String) -> Self {
        RunStatus::from(s.as_str())
    }
}

impl From<RunStatus> for String {
    fn from(status: RunStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_statuses() {
        assert_eq!(RunStatus::from("queued"), RunStatus::Queued);
        assert_eq!(RunStatus::from("in_progress"), RunStatus::InProgress);
        assert_eq!(RunStatus::from("requires_action"), RunStatus::RequiresAction);
        assert_eq!(RunStatus::from("expired"), RunStatus::Expired);
    }

    #[test]
    fn keeps_unknown_status_verbatim() {
        let status = RunStatus::from("paused_for_review");
        assert_eq!(status, RunStatus::Other("paused_for_review".to_string()));
        assert_eq!(status.to_string(), "paused_for_review");
        assert!(!status.is_terminal());
    }

    #[test]
    fn classifies_terminal_statuses() {
        assert!(RunStatus::Completed.is_success());
        for status in [RunStatus::Failed, RunStatus::Cancelled, RunStatus::Expired] {
            assert!(status.is_failure(), "{status} should be a failure");
            assert!(status.is_terminal());
        }
        for status in [
            RunStatus::Queued,
            RunStatus::InProgress,
            RunStatus::RequiresAction,
            RunStatus::Cancelling,
            RunStatus::Incomplete,
        ] {
            assert!(!status.is_terminal(), "{status} should be re-polled");
        }
    }

    #[test]
    fn serde_uses_plain_string() {
        let status: RunStatus = serde_json::from_str("\"in_progress\"").unwrap();
        assert_eq!(status, RunStatus::InProgress);
        assert_eq!(serde_json::to_string(&RunStatus::Cancelled).unwrap(), "\"cancelled\"");
    }
}
