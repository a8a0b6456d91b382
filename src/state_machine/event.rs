//! Events that drive the session

use crate::backend::EvaluationRecord;
use chrono::{DateTime, Utc};

/// Events that trigger state transitions.
///
/// Timestamps ride on the events, stamped where the event originates, so the
/// transition function stays pure.
#[derive(Debug, Clone)]
pub enum Event {
    // User events
    DraftChanged {
        text: String,
    },
    SubmitPressed {
        at: DateTime<Utc>,
    },
    ResetRequested {
        at: DateTime<Utc>,
    },

    // Backend events
    ChatSucceeded {
        /// Epoch the request was dispatched under
        epoch: u64,
        reply: String,
        evaluation: EvaluationRecord,
        at: DateTime<Utc>,
    },
    ChatFailed {
        epoch: u64,
        /// Logged only; the user sees the fixed fallback text
        reason: String,
        at: DateTime<Utc>,
    },
}

impl Event {
    pub fn draft_changed(text: impl Into<String>) -> Self {
        Event::DraftChanged { text: text.into() }
    }

    pub fn submit_pressed() -> Self {
        Event::SubmitPressed { at: Utc::now() }
    }

    pub fn reset_requested() -> Self {
        Event::ResetRequested { at: Utc::now() }
    }

    pub fn chat_succeeded(
        epoch: u64,
        reply: impl Into<String>,
        evaluation: EvaluationRecord,
    ) -> Self {
        Event::ChatSucceeded {
            epoch,
            reply: reply.into(),
            evaluation,
            at: Utc::now(),
        }
    }

    pub fn chat_failed(epoch: u64, reason: impl Into<String>) -> Self {
        Event::ChatFailed {
            epoch,
            reason: reason.into(),
            at: Utc::now(),
        }
    }
}
