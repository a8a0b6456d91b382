//! Mock backend for testing
//!
//! Drives the runtime without real I/O, recording every outbound call.

use crate::backend::{
    BackendError, ChatResponse, ChatService, EvaluationRecord, HealthResponse,
};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

/// Record of one outbound call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
    Chat(String),
    Reset,
    Health,
}

/// Mock chat service that returns queued outcomes
pub struct MockChatService {
    replies: Mutex<VecDeque<Result<ChatResponse, BackendError>>>,
    /// Simulated round-trip time before a chat call resolves
    latency: Option<Duration>,
    fail_reset: bool,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockChatService {
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            latency: None,
            fail_reset: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Delay each chat call, keeping a request observably in flight
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Make every reset call fail
    pub fn failing_reset(mut self) -> Self {
        self.fail_reset = true;
        self
    }

    /// Queue a successful reply
    pub fn queue_reply(&self, response: impl Into<String>, evaluation: EvaluationRecord) {
        self.replies.lock().unwrap().push_back(Ok(ChatResponse {
            response: response.into(),
            evaluation,
        }));
    }

    /// Queue a failed reply
    pub fn queue_error(&self, error: BackendError) {
        self.replies.lock().unwrap().push_back(Err(error));
    }

    /// All calls made so far, in order
    pub fn recorded_calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for MockChatService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatService for MockChatService {
    async fn chat(&self, message: &str) -> Result<ChatResponse, BackendError> {
        self.calls
            .lock()
            .unwrap()
            .push(RecordedCall::Chat(message.to_string()));

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(BackendError::network("No mock reply queued")))
    }

    async fn reset(&self) -> Result<(), BackendError> {
        self.calls.lock().unwrap().push(RecordedCall::Reset);
        if self.fail_reset {
            Err(BackendError::server("HTTP 500: mock reset failure"))
        } else {
            Ok(())
        }
    }

    async fn health(&self) -> Result<HealthResponse, BackendError> {
        self.calls.lock().unwrap().push(RecordedCall::Health);
        Ok(HealthResponse {
            status: "healthy".to_string(),
            message: None,
        })
    }
}
