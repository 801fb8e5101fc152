//! Test doubles for the assistant backend and the notification surface.
//!
//! [`MockAssistant`] returns scripted responses, records every call, and can
//! hold replies back until the test releases them, which lets tests observe
//! the session while a request is still in flight.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use tokio::sync::Semaphore;

use crate::client::{AssistantClient, ChatReply, HealthStatus};
use crate::error::{ChatError, ChatResult};
use crate::notify::{Notification, NotificationSink, Severity};

/// Scripted outcome of a chat call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockResponse {
    /// Reply with the given text
    Reply(String),
    /// Fail as if the connection was refused
    NetworkError(String),
    /// Fail with a non-success HTTP status
    Status(u16),
    /// Succeed at transport level but return an unusable body
    Malformed,
}

impl MockResponse {
    pub fn reply(text: impl Into<String>) -> Self {
        Self::Reply(text.into())
    }

    pub fn network_error(message: impl Into<String>) -> Self {
        Self::NetworkError(message.into())
    }

    fn into_result(self) -> ChatResult<ChatReply> {
        match self {
            Self::Reply(text) => Ok(ChatReply::new(text)),
            Self::NetworkError(message) => Err(ChatError::Transport(message)),
            Self::Status(status) => Err(ChatError::Status {
                status,
                body: "mock status".to_string(),
            }),
            Self::Malformed => Err(ChatError::MalformedReply("missing response field".to_string())),
        }
    }
}

/// Captured call information for verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedCall {
    pub method: String,
    pub message: Option<String>,
}

/// Mock assistant backend for testing.
#[derive(Clone)]
pub struct MockAssistant {
    /// Scripted chat responses, cycled in order.
    responses: Arc<RwLock<Vec<MockResponse>>>,
    /// Index of next response to return.
    response_index: Arc<AtomicUsize>,
    /// Captured calls for verification.
    captured_calls: Arc<RwLock<Vec<CapturedCall>>>,
    /// Error returned by `reset`, if any.
    reset_failure: Arc<RwLock<Option<String>>>,
    /// Whether chat replies wait for `release`.
    held: Arc<AtomicBool>,
    /// Whether `reset` never completes.
    reset_hangs: Arc<AtomicBool>,
    /// One permit per released reply.
    gate: Arc<Semaphore>,
    /// Location reported to the session.
    location: Arc<RwLock<String>>,
}

impl Default for MockAssistant {
    fn default() -> Self {
        Self::new()
    }
}

impl MockAssistant {
    /// Create a new mock assistant that replies "mock reply" to everything.
    pub fn new() -> Self {
        Self {
            responses: Arc::new(RwLock::new(Vec::new())),
            response_index: Arc::new(AtomicUsize::new(0)),
            captured_calls: Arc::new(RwLock::new(Vec::new())),
            reset_failure: Arc::new(RwLock::new(None)),
            held: Arc::new(AtomicBool::new(false)),
            reset_hangs: Arc::new(AtomicBool::new(false)),
            gate: Arc::new(Semaphore::new(0)),
            location: Arc::new(RwLock::new("localhost:5001".to_string())),
        }
    }

    /// Add a response for the next chat call.
    pub fn add_response(self, response: MockResponse) -> Self {
        self.responses.write().push(response);
        self
    }

    /// Set multiple responses.
    pub fn with_responses(self, responses: Vec<MockResponse>) -> Self {
        *self.responses.write() = responses;
        self
    }

    /// Make `reset` fail with the given message.
    pub fn fail_reset(self, message: impl Into<String>) -> Self {
        *self.reset_failure.write() = Some(message.into());
        self
    }

    /// Make `reset` record the call and then never return.
    pub fn hang_reset(self) -> Self {
        self.reset_hangs.store(true, Ordering::SeqCst);
        self
    }

    /// Hold every chat reply until [`MockAssistant::release`] is called.
    pub fn hold_replies(self) -> Self {
        self.held.store(true, Ordering::SeqCst);
        self
    }

    /// Set the reported backend location.
    pub fn with_location(self, location: impl Into<String>) -> Self {
        *self.location.write() = location.into();
        self
    }

    /// Let one held reply through. Held calls are released in arrival order.
    pub fn release(&self) {
        self.gate.add_permits(1);
    }

    /// Get all captured calls.
    pub fn get_calls(&self) -> Vec<CapturedCall> {
        self.captured_calls.read().clone()
    }

    /// Get the number of calls made.
    pub fn call_count(&self) -> usize {
        self.captured_calls.read().len()
    }

    /// Get calls to a specific method.
    pub fn get_method_calls(&self, method: &str) -> Vec<CapturedCall> {
        self.captured_calls
            .read()
            .iter()
            .filter(|c| c.method == method)
            .cloned()
            .collect()
    }

    fn record_call(&self, method: &str, message: Option<&str>) {
        self.captured_calls.write().push(CapturedCall {
            method: method.to_string(),
            message: message.map(str::to_string),
        });
    }

    fn next_response(&self) -> MockResponse {
        let responses = self.responses.read();
        if responses.is_empty() {
            return MockResponse::reply("mock reply");
        }
        let index = self.response_index.fetch_add(1, Ordering::SeqCst);
        responses
            .get(index % responses.len())
            .cloned()
            .unwrap_or_else(|| MockResponse::reply("mock reply"))
    }
}

#[async_trait]
impl AssistantClient for MockAssistant {
    async fn chat(&self, message: &str) -> ChatResult<ChatReply> {
        self.record_call("chat", Some(message));
        let response = self.next_response();

        if self.held.load(Ordering::SeqCst) {
            if let Ok(permit) = self.gate.acquire().await {
                permit.forget();
            }
        }

        response.into_result()
    }

    async fn reset(&self) -> ChatResult<()> {
        self.record_call("reset", None);
        if self.reset_hangs.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        match self.reset_failure.read().clone() {
            Some(message) => Err(ChatError::Transport(message)),
            None => Ok(()),
        }
    }

    async fn health(&self) -> ChatResult<HealthStatus> {
        self.record_call("health", None);
        Ok(HealthStatus {
            status: "healthy".to_string(),
            timestamp: None,
        })
    }

    fn location(&self) -> String {
        self.location.read().clone()
    }
}

/// Notification sink that keeps everything it receives.
#[derive(Clone, Default)]
pub struct RecordingSink {
    received: Arc<RwLock<Vec<Notification>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.received.read().clone()
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.received
            .read()
            .iter()
            .filter(|n| n.severity == severity)
            .count()
    }

    pub fn clear(&self) {
        self.received.write().clear();
    }
}

impl NotificationSink for RecordingSink {
    fn notify(&self, notification: Notification) {
        self.received.write().push(notification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_assistant_sequential_responses() {
        let mock = MockAssistant::new().with_responses(vec![
            MockResponse::reply("first"),
            MockResponse::Status(502),
        ]);

        assert_eq!(mock.chat("a").await.unwrap().response, "first");
        assert!(matches!(
            mock.chat("b").await,
            Err(ChatError::Status { status: 502, .. })
        ));

        let calls = mock.get_method_calls("chat");
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1].message.as_deref(), Some("b"));
    }

    #[tokio::test]
    async fn test_mock_assistant_reset_failure() {
        let mock = MockAssistant::new().fail_reset("connection refused");
        assert!(mock.reset().await.is_err());
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn test_held_reply_waits_for_release() {
        let mock = MockAssistant::new()
            .add_response(MockResponse::reply("late"))
            .hold_replies();

        let (reply, _) = tokio::join!(mock.chat("q"), async {
            tokio::task::yield_now().await;
            mock.release();
        });

        assert_eq!(reply.unwrap().response, "late");
    }

    #[test]
    fn test_recording_sink_counts() {
        let sink = RecordingSink::new();
        sink.notify(Notification::chat_reset());
        sink.notify(Notification::connection_error("localhost:5001"));

        assert_eq!(sink.count(Severity::Info), 1);
        assert_eq!(sink.count(Severity::Error), 1);

        sink.clear();
        assert!(sink.notifications().is_empty());
    }
}
