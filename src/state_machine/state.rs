//! Session state types

use crate::backend::EvaluationRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Greeting seeded when the session starts
pub const INITIAL_GREETING: &str = "🌙 Hello! I'm here to help you wind down and prepare for peaceful sleep.\n\nHow has your evening been so far? ✨";

/// Greeting seeded by a reset
pub const RESET_GREETING: &str =
    "🌙 Chat has been reset.\n\nHow has your evening been so far? ✨";

/// Shown in place of a reply when the chat request fails
pub const FALLBACK_MESSAGE: &str = "Sorry, I encountered an error. Please try again.";

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Author {
    User,
    Companion,
}

/// One entry in the conversation log. Immutable once appended; duplicates
/// are allowed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub content: String,
    pub author: Author,
    pub timestamp: DateTime<Utc>,
    /// Present only on companion replies that succeeded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evaluation: Option<EvaluationRecord>,
    /// Marks the fixed fallback message
    #[serde(default)]
    pub is_error: bool,
}

impl Message {
    pub fn user(content: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            content: content.into(),
            author: Author::User,
            timestamp,
            evaluation: None,
            is_error: false,
        }
    }

    pub fn companion(
        content: impl Into<String>,
        timestamp: DateTime<Utc>,
        evaluation: Option<EvaluationRecord>,
    ) -> Self {
        Self {
            content: content.into(),
            author: Author::Companion,
            timestamp,
            evaluation,
            is_error: false,
        }
    }

    /// The fixed fallback reply substituted for any failed submission
    pub fn fallback(timestamp: DateTime<Utc>) -> Self {
        Self {
            content: FALLBACK_MESSAGE.to_string(),
            author: Author::Companion,
            timestamp,
            evaluation: None,
            is_error: true,
        }
    }

    pub fn is_user(&self) -> bool {
        self.author == Author::User
    }
}

/// Whether a chat request is in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// Ready for user input, nothing pending
    #[default]
    Idle,
    /// One chat request dispatched and its outcome not yet folded in
    Sending,
}

/// In-memory conversation state for one page lifetime
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    /// Ordered log, append-only except for wholesale reset
    pub messages: Vec<Message>,
    /// Pending-input buffer
    pub draft: String,
    pub phase: SessionPhase,
    /// Bumped on every reset. Chat outcomes dispatched under an older epoch
    /// are stale and get discarded.
    pub epoch: u64,
}

impl SessionState {
    /// Fresh session with the seeded greeting
    pub fn seeded(now: DateTime<Utc>) -> Self {
        Self {
            messages: vec![Message::companion(INITIAL_GREETING, now, None)],
            draft: String::new(),
            phase: SessionPhase::Idle,
            epoch: 0,
        }
    }

    /// The awaiting-response gate: true iff a request has been dispatched
    /// and neither outcome has been folded into the log yet.
    pub fn awaiting_response(&self) -> bool {
        self.phase == SessionPhase::Sending
    }
}
