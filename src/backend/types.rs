//! Wire types for the companion backend's JSON contract

use serde::{Deserialize, Serialize};

/// Body of `POST /chat`
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub message: String,
}

/// Successful body of `POST /chat`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    pub evaluation: EvaluationRecord,
}

/// Four-dimension assessment the backend attaches to its own reply,
/// describing the therapeutic qualities it detected in that reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationRecord {
    pub asks_questions: bool,
    pub explores_thoughts: bool,
    pub encourages_reflection: bool,
    pub uses_cbt_language: bool,
}

/// Body of `GET /health`
#[derive(Debug, Clone, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
}
