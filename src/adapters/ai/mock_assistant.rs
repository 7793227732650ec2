//! Mock Assistant API for testing.
//!
//! Provides a scripted implementation of the AssistantApi port, allowing
//! orchestrator and HTTP tests to run without calling the real API.
//!
//! # Features
//!
//! - Configurable thread and run ids
//! - Scripted run status sequence (the last status repeats)
//! - Error injection per operation
//! - Call tracking for verification
//!
//! # Example
//!
//! ```ignore
//! let api = MockAssistantApi::new()
//!     .with_thread("t1")
//!     .with_statuses(vec![RunStatus::Queued, RunStatus::Completed])
//!     .with_messages(vec![ThreadMessage::assistant(json!("hello"))]);
//!
//! orchestrator.run(&api, cmd, &mut sink).await?;
//! assert_eq!(api.count(MockOperation::RetrieveRun), 2);
//! ```

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;

use crate::domain::relay::RunStatus;
use crate::ports::{
    ApiCredential, AssistantApi, AssistantApiError, AssistantClientFactory, MessageRole, Run,
    SortOrder, Thread, ThreadMessage,
};

/// Operations of the AssistantApi port, for error injection and counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MockOperation {
    CreateThread,
    CreateMessage,
    CreateRun,
    RetrieveRun,
    ListMessages,
}

/// A recorded call with its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    CreateThread,
    CreateMessage {
        thread_id: String,
        role: MessageRole,
        content: String,
    },
    CreateRun {
        thread_id: String,
        assistant_id: String,
    },
    RetrieveRun {
        thread_id: String,
        run_id: String,
    },
    ListMessages {
        thread_id: String,
        limit: u32,
        order: SortOrder,
    },
}

impl MockCall {
    fn operation(&self) -> MockOperation {
        match self {
            MockCall::CreateThread => MockOperation::CreateThread,
            MockCall::CreateMessage { .. } => MockOperation::CreateMessage,
            MockCall::CreateRun { .. } => MockOperation::CreateRun,
            MockCall::RetrieveRun { .. } => MockOperation::RetrieveRun,
            MockCall::ListMessages { .. } => MockOperation::ListMessages,
        }
    }
}

/// Mock assistant API for testing.
///
/// Clones share scripts and call history. Also acts as an
/// [`AssistantClientFactory`] that hands out itself and records credentials.
#[derive(Debug, Clone)]
pub struct MockAssistantApi {
    provider_name: String,
    thread_id: String,
    run_id: String,
    statuses: Arc<Mutex<VecDeque<RunStatus>>>,
    messages: Vec<ThreadMessage>,
    failures: Arc<Mutex<HashMap<MockOperation, AssistantApiError>>>,
    delay: Duration,
    calls: Arc<Mutex<Vec<MockCall>>>,
    credentials: Arc<Mutex<Vec<String>>>,
}

impl Default for MockAssistantApi {
    fn default() -> Self {
        Self::new()
    }
}

impl MockAssistantApi {
    /// Creates a mock whose run completes on the first poll.
    pub fn new() -> Self {
        Self {
            provider_name: "mock".to_string(),
            thread_id: "thread_mock".to_string(),
            run_id: "run_mock".to_string(),
            statuses: Arc::new(Mutex::new(VecDeque::from([RunStatus::Completed]))),
            messages: Vec::new(),
            failures: Arc::new(Mutex::new(HashMap::new())),
            delay: Duration::ZERO,
            calls: Arc::new(Mutex::new(Vec::new())),
            credentials: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Sets the name used in error records.
    pub fn with_provider_name(mut self, name: impl Into<String>) -> Self {
        self.provider_name = name.into();
        self
    }

    /// Sets the id returned by `create_thread`.
    pub fn with_thread(mut self, id: impl Into<String>) -> Self {
        self.thread_id = id.into();
        self
    }

    /// Sets the id returned by `create_run`.
    pub fn with_run(mut self, id: impl Into<String>) -> Self {
        self.run_id = id.into();
        self
    }

    /// Scripts the statuses returned by successive `retrieve_run` calls.
    pub fn with_statuses(self, statuses: Vec<RunStatus>) -> Self {
        *self.statuses.lock().unwrap() = statuses.into();
        self
    }

    /// Sets the thread messages, newest first.
    pub fn with_messages(mut self, messages: Vec<ThreadMessage>) -> Self {
        self.messages = messages;
        self
    }

    /// Makes every call to `operation` fail with `error`.
    pub fn with_failure(self, operation: MockOperation, error: AssistantApiError) -> Self {
        self.failures.lock().unwrap().insert(operation, error);
        self
    }

    /// Sets simulated latency per call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Returns all recorded calls.
    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Returns the number of calls made to `operation`.
    pub fn count(&self, operation: MockOperation) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.operation() == operation)
            .count()
    }

    /// Returns the keys of every credential a client was built for.
    pub fn credentials_seen(&self) -> Vec<String> {
        self.credentials.lock().unwrap().clone()
    }

    async fn record(&self, call: MockCall) -> Result<(), AssistantApiError> {
        let operation = call.operation();
        self.calls.lock().unwrap().push(call);

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        match self.failures.lock().unwrap().get(&operation) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn next_status(&self) -> RunStatus {
        let mut statuses = self.statuses.lock().unwrap();
        if statuses.len() > 1 {
            statuses.pop_front().unwrap_or(RunStatus::Completed)
        } else {
            statuses.front().cloned().unwrap_or(RunStatus::Completed)
        }
    }
}

#[async_trait]
impl AssistantApi for MockAssistantApi {
    async fn create_thread(&self) -> Result<Thread, AssistantApiError> {
        self.record(MockCall::CreateThread).await?;
        Ok(Thread {
            id: self.thread_id.clone(),
        })
    }

    async fn create_message(
        &self,
        thread_id: &str,
        role: MessageRole,
        content: &str,
    ) -> Result<(), AssistantApiError> {
        self.record(MockCall::CreateMessage {
            thread_id: thread_id.to_string(),
            role,
            content: content.to_string(),
        })
        .await
    }

    async fn create_run(
        &self,
        thread_id: &str,
        assistant_id: &str,
    ) -> Result<Run, AssistantApiError> {
        self.record(MockCall::CreateRun {
            thread_id: thread_id.to_string(),
            assistant_id: assistant_id.to_string(),
        })
        .await?;
        Ok(Run::new(self.run_id.clone(), RunStatus::Queued))
    }

    async fn retrieve_run(&self, thread_id: &str, run_id: &str) -> Result<Run, AssistantApiError> {
        self.record(MockCall::RetrieveRun {
            thread_id: thread_id.to_string(),
            run_id: run_id.to_string(),
        })
        .await?;
        Ok(Run::new(run_id, self.next_status()))
    }

    async fn list_messages(
        &self,
        thread_id: &str,
        limit: u32,
        order: SortOrder,
    ) -> Result<Vec<ThreadMessage>, AssistantApiError> {
        self.record(MockCall::ListMessages {
            thread_id: thread_id.to_string(),
            limit,
            order,
        })
        .await?;

        let mut messages = self.messages.clone();
        if order == SortOrder::Asc {
            messages.reverse();
        }
        messages.truncate(limit as usize);
        Ok(messages)
    }

    fn provider_name(&self) -> &str {
        &self.provider_name
    }
}

impl AssistantClientFactory for MockAssistantApi {
    fn client_for(&self, credential: &ApiCredential) -> Arc<dyn AssistantApi> {
        self.credentials
            .lock()
            .unwrap()
            .push(credential.expose().to_string());
        Arc::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn last_status_repeats() {
        let api = MockAssistantApi::new().with_statuses(vec![RunStatus::Queued, RunStatus::InProgress]);

        assert_eq!(api.retrieve_run("t", "r").await.unwrap().status, RunStatus::Queued);
        assert_eq!(api.retrieve_run("t", "r").await.unwrap().status, RunStatus::InProgress);
        assert_eq!(api.retrieve_run("t", "r").await.unwrap().status, RunStatus::InProgress);
    }

    #[tokio::test]
    async fn injected_failure_is_returned_and_call_recorded() {
        let api = MockAssistantApi::new()
            .with_failure(MockOperation::CreateRun, AssistantApiError::network("down"));

        let err = api.create_run("t", "a").await.unwrap_err();
        assert_eq!(err, AssistantApiError::network("down"));
        assert_eq!(api.count(MockOperation::CreateRun), 1);
    }

    #[tokio::test]
    async fn list_messages_honours_limit_and_order() {
        let api = MockAssistantApi::new().with_messages(vec![
            ThreadMessage::assistant(json!("newest")),
            ThreadMessage::user(json!("oldest")),
        ]);

        let desc = api.list_messages("t", 1, SortOrder::Desc).await.unwrap();
        assert_eq!(desc, vec![ThreadMessage::assistant(json!("newest"))]);

        let asc = api.list_messages("t", 1, SortOrder::Asc).await.unwrap();
        assert_eq!(asc, vec![ThreadMessage::user(json!("oldest"))]);
    }

    #[test]
    fn factory_records_credentials_and_shares_history() {
        let api = MockAssistantApi::new();
        let client = api.client_for(&ApiCredential::new("sk-test"));

        assert_eq!(api.credentials_seen(), vec!["sk-test".to_string()]);
        assert_eq!(client.provider_name(), "mock");
    }
}
