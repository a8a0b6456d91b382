//! reqwest client for the companion backend

use super::types::{ChatRequest, ChatResponse, HealthResponse};
use super::{BackendError, ChatService};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Client timeout. The backend proxies a local LLM, so replies can take a
/// while; a timeout surfaces as an ordinary failed submission.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// HTTP implementation of [`ChatService`]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn classify_send_error(e: reqwest::Error) -> BackendError {
        if e.is_timeout() {
            BackendError::timeout(format!("Request timeout: {e}"))
        } else if e.is_connect() {
            BackendError::network(format!("Connection failed: {e}"))
        } else {
            BackendError::unknown(format!("Request failed: {e}"))
        }
    }

    fn classify_status(status: StatusCode, body: &str) -> BackendError {
        match status.as_u16() {
            400..=499 => BackendError::invalid_request(format!("HTTP {status}: {body}")),
            500..=599 => BackendError::server(format!("HTTP {status}: {body}")),
            _ => BackendError::unknown(format!("HTTP {status}: {body}")),
        }
    }
}

#[async_trait]
impl ChatService for HttpBackend {
    async fn chat(&self, message: &str) -> Result<ChatResponse, BackendError> {
        let request = ChatRequest {
            message: message.to_string(),
        };

        let response = self
            .client
            .post(self.endpoint("/chat"))
            .json(&request)
            .send()
            .await
            .map_err(Self::classify_send_error)?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| BackendError::network(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            return Err(Self::classify_status(status, &body));
        }

        serde_json::from_str(&body).map_err(|e| {
            BackendError::malformed_body(format!("Failed to parse /chat response: {e}"))
        })
    }

    async fn reset(&self) -> Result<(), BackendError> {
        let response = self
            .client
            .get(self.endpoint("/reset"))
            .send()
            .await
            .map_err(Self::classify_send_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Self::classify_status(status, &body));
        }

        // Response body is ignored.
        Ok(())
    }

    async fn health(&self) -> Result<HealthResponse, BackendError> {
        let response = self
            .client
            .get(self.endpoint("/health"))
            .send()
            .await
            .map_err(Self::classify_send_error)?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| BackendError::network(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            return Err(Self::classify_status(status, &body));
        }

        serde_json::from_str(&body).map_err(|e| {
            BackendError::malformed_body(format!("Failed to parse /health response: {e}"))
        })
    }
}
