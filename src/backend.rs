//! HTTP boundary to the companion backend
//!
//! Provides a trait seam over the remote service so the runtime can be
//! driven by a mock in tests.

mod client;
mod error;
mod types;

pub use client::HttpBackend;
pub use error::{BackendError, BackendErrorKind};
pub use types::{ChatRequest, ChatResponse, EvaluationRecord, HealthResponse};

use async_trait::async_trait;
use std::sync::Arc;

/// Interface to the remote companion service
#[async_trait]
pub trait ChatService: Send + Sync {
    /// Send one user message, returning the reply and its evaluation
    async fn chat(&self, message: &str) -> Result<ChatResponse, BackendError>;

    /// Ask the backend to drop its conversation history. Advisory: the
    /// caller resets local state whether or not this succeeds.
    async fn reset(&self) -> Result<(), BackendError>;

    /// Reachability probe
    async fn health(&self) -> Result<HealthResponse, BackendError>;
}

#[async_trait]
impl<T: ChatService + ?Sized> ChatService for Arc<T> {
    async fn chat(&self, message: &str) -> Result<ChatResponse, BackendError> {
        (**self).chat(message).await
    }

    async fn reset(&self) -> Result<(), BackendError> {
        (**self).reset().await
    }

    async fn health(&self) -> Result<HealthResponse, BackendError> {
        (**self).health().await
    }
}

/// Logging wrapper for chat services
pub struct LoggingBackend<C> {
    inner: C,
}

impl<C: ChatService> LoggingBackend<C> {
    pub fn new(inner: C) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<C: ChatService> ChatService for LoggingBackend<C> {
    async fn chat(&self, message: &str) -> Result<ChatResponse, BackendError> {
        let start = std::time::Instant::now();
        let result = self.inner.chat(message).await;
        let duration = start.elapsed();

        match &result {
            Ok(reply) => {
                tracing::info!(
                    duration_ms = %duration.as_millis(),
                    reply_chars = reply.response.chars().count(),
                    "Chat request completed"
                );
            }
            Err(e) => {
                tracing::error!(
                    duration_ms = %duration.as_millis(),
                    kind = ?e.kind,
                    error = %e,
                    "Chat request failed"
                );
            }
        }

        result
    }

    async fn reset(&self) -> Result<(), BackendError> {
        let result = self.inner.reset().await;
        match &result {
            Ok(()) => tracing::info!("Remote conversation reset"),
            Err(e) => tracing::warn!(kind = ?e.kind, error = %e, "Remote reset failed"),
        }
        result
    }

    async fn health(&self) -> Result<HealthResponse, BackendError> {
        self.inner.health().await
    }
}
