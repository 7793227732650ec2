//! Relay message handler.
//!
//! Drives one user message through the upstream assistant: resolve the thread,
//! append the message, start a run, then poll the run until it reaches a
//! terminal status. Progress is written to an [`EventSink`] as it becomes known.

use thiserror::Error;
use tokio::time::sleep;

use crate::domain::foundation::StateMachine;
use crate::domain::relay::{PollPhase, PollPolicy, RelayEvent, RelayRequest, RunStatus};
use crate::ports::{AssistantApi, AssistantApiError, EventSink, MessageRole, SortOrder};

/// Command to relay one user message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayMessageCommand {
    /// Thread to continue; a new one is created when absent.
    pub thread_id: Option<String>,
    /// Assistant that runs on the thread.
    pub assistant_id: String,
    /// User message text.
    pub message: String,
}

impl RelayMessageCommand {
    /// Creates a new relay command.
    pub fn new(
        thread_id: Option<String>,
        assistant_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            thread_id,
            assistant_id: assistant_id.into(),
            message: message.into(),
        }
    }
}

impl From<RelayRequest> for RelayMessageCommand {
    fn from(request: RelayRequest) -> Self {
        Self {
            thread_id: request.thread_id,
            assistant_id: request.assistant_id,
            message: request.message,
        }
    }
}

/// Errors that end a relay call after streaming has started.
#[derive(Debug, Clone, Error)]
pub enum RelayError {
    #[error(transparent)]
    Upstream(#[from] AssistantApiError),

    #[error("Run failed with status: {0}")]
    RunFailed(RunStatus),

    #[error("Run did not complete within the expected time.")]
    TimedOut { attempts: u32 },
}

/// Summary of a successful relay call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayOutcome {
    /// Thread the message was posted to.
    pub thread_id: String,
    /// Run that processed it.
    pub run_id: String,
    /// Number of status fetches performed.
    pub attempts: u32,
    /// Whether an assistant message was emitted.
    pub message_emitted: bool,
}

/// Orchestrates the thread / message / run / poll sequence.
#[derive(Debug, Clone, Default)]
pub struct RunOrchestrator {
    policy: PollPolicy,
}

impl RunOrchestrator {
    /// Creates an orchestrator with the given polling policy.
    pub fn new(policy: PollPolicy) -> Self {
        Self { policy }
    }

    /// Returns the polling policy.
    pub fn policy(&self) -> &PollPolicy {
        &self.policy
    }

    /// Runs the full relay sequence.
    ///
    /// On failure exactly one error event is emitted. The sink is closed exactly
    /// once on every path.
    pub async fn run(
        &self,
        api: &dyn AssistantApi,
        cmd: RelayMessageCommand,
        sink: &mut dyn EventSink,
    ) -> Result<RelayOutcome, RelayError> {
        let result = self.execute(api, &cmd, sink).await;

        match &result {
            Ok(outcome) => {
                tracing::info!(
                    thread_id = %outcome.thread_id,
                    run_id = %outcome.run_id,
                    attempts = outcome.attempts,
                    message_emitted = outcome.message_emitted,
                    "Relay completed"
                );
            }
            Err(err) => {
                match err {
                    RelayError::Upstream(e) => tracing::error!("Upstream call failed: {}", e),
                    RelayError::RunFailed(_) | RelayError::TimedOut { .. } => {
                        tracing::warn!("Run aborted: {}", err)
                    }
                }
                sink.emit(RelayEvent::error(format!(
                    "Error communicating with {}: {}",
                    api.provider_name(),
                    err
                )))
                .await;
            }
        }

        sink.close().await;
        result
    }

    async fn execute(
        &self,
        api: &dyn AssistantApi,
        cmd: &RelayMessageCommand,
        sink: &mut dyn EventSink,
    ) -> Result<RelayOutcome, RelayError> {
        // 1. Resolve thread
        let thread_id = match &cmd.thread_id {
            Some(id) => id.clone(),
            None => {
                let thread = api.create_thread().await?;
                tracing::debug!(thread_id = %thread.id, "Created thread");
                sink.emit(RelayEvent::thread_created(thread.id.clone())).await;
                thread.id
            }
        };

        // 2. Append user message
        api.create_message(&thread_id, MessageRole::User, &cmd.message)
            .await?;

        // 3. Start run
        let run = api.create_run(&thread_id, &cmd.assistant_id).await?;
        tracing::debug!(run_id = %run.id, "Created run");
        sink.emit(RelayEvent::run_created(run.id.clone())).await;

        // 4. Poll until terminal
        let mut phase = PollPhase::Polling;
        let mut attempts = 0;
        let mut status = run.status;

        while !phase.is_terminal() {
            if attempts > 0 {
                sleep(self.policy.interval).await;
            }
            attempts += 1;

            status = api.retrieve_run(&thread_id, &run.id).await?.status;
            tracing::debug!(attempt = attempts, status = %status, "Polled run");
            sink.emit(RelayEvent::run_status(status.clone())).await;

            let next = PollPhase::next(&status, attempts, &self.policy);
            debug_assert!(phase.can_transition_to(&next));
            phase = next;
        }

        match phase {
            PollPhase::Completed => {
                let message_emitted = self.emit_latest_reply(api, &thread_id, sink).await?;
                Ok(RelayOutcome {
                    thread_id,
                    run_id: run.id,
                    attempts,
                    message_emitted,
                })
            }
            PollPhase::Failed => Err(RelayError::RunFailed(status)),
            PollPhase::TimedOut | PollPhase::Polling => Err(RelayError::TimedOut { attempts }),
        }
    }

    /// Emits the newest thread message if the assistant wrote it.
    async fn emit_latest_reply(
        &self,
        api: &dyn AssistantApi,
        thread_id: &str,
        sink: &mut dyn EventSink,
    ) -> Result<bool, RelayError> {
        let latest = api
            .list_messages(thread_id, 1, SortOrder::Desc)
            .await?
            .into_iter()
            .next();

        match latest {
            Some(message) if message.role == MessageRole::Assistant => {
                sink.emit(RelayEvent::message(message.content)).await;
                Ok(true)
            }
            _ => {
                tracing::debug!(thread_id, "Run completed without a trailing assistant message");
                Ok(false)
            }
        }
    }
}
