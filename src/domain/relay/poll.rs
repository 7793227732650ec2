//! Run completion polling as an explicit state machine.
//!
//! `PollPhase::next` is a pure function of the fetched status and the attempt
//! count. The orchestrator owns the suspension between fetches; nothing here
//! knows about timers.

use std::time::Duration;

use super::RunStatus;
use crate::domain::foundation::StateMachine;

/// Cadence and ceiling for run status polling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Minimum delay between two status fetches.
    pub interval: Duration,
    /// Maximum number of status fetches before giving up.
    pub max_attempts: u32,
}

impl PollPolicy {
    pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(500);
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 60;

    /// Creates a policy with the given interval and attempt ceiling.
    pub fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts,
        }
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_INTERVAL, Self::DEFAULT_MAX_ATTEMPTS)
    }
}

/// Where the polling loop stands after a fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollPhase {
    Polling,
    Completed,
    Failed,
    TimedOut,
}

impl PollPhase {
    /// Decides the phase after the `attempt`-th fetch (1-based) returned `status`.
    ///
    /// A terminal status wins over attempt exhaustion, so a run that completes
    /// on the last permitted fetch still succeeds.
    pub fn next(status: &RunStatus, attempt: u32, policy: &PollPolicy) -> Self {
        if status.is_success() {
            PollPhase::Completed
        } else if status.is_failure() {
            PollPhase::Failed
        } else if attempt >= policy.max_attempts {
            PollPhase::TimedOut
        } else {
            PollPhase::Polling
        }
    }
}

impl StateMachine for PollPhase {
    fn can_transition_to(&self, target: &Self) -> bool {
        self.valid_transitions().contains(target)
    }

    fn valid_transitions(&self) -> Vec<Self> {
        match self {
            PollPhase::Polling => vec![
                PollPhase::Polling,
                PollPhase::Completed,
                PollPhase::Failed,
                PollPhase::TimedOut,
            ],
            PollPhase::Completed | PollPhase::Failed | PollPhase::TimedOut => vec![],
        }
    }
}
