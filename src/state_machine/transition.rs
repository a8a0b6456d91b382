//! Pure state transition function

use super::effect::Effect;
use super::event::Event;
use super::state::{Message, SessionPhase, SessionState, RESET_GREETING};
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: SessionState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: SessionState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Rejected inputs. The caller treats `SessionBusy` and `EmptyDraft` as
/// no-ops: the state is untouched and no request is dispatched.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("A chat request is already awaiting a response")]
    SessionBusy,
    #[error("Draft is empty or whitespace-only")]
    EmptyDraft,
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
}

/// Pure transition function: given the same state and event it always
/// produces the same result, with no I/O.
pub fn transition(
    state: &SessionState,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    match event {
        // Pending-input buffer updates verbatim, in any phase.
        Event::DraftChanged { text } => {
            let mut next = state.clone();
            next.draft = text;
            Ok(TransitionResult::new(next))
        }

        // The gate is mutual exclusion, not a queue: a submit while one
        // request is in flight is rejected outright.
        Event::SubmitPressed { at } => {
            if state.awaiting_response() {
                return Err(TransitionError::SessionBusy);
            }
            if state.draft.trim().is_empty() {
                return Err(TransitionError::EmptyDraft);
            }

            // Emptiness is judged on the trimmed draft, but the message and
            // the request carry the raw text.
            let text = state.draft.clone();
            let mut next = state.clone();
            next.messages.push(Message::user(text.clone(), at));
            next.draft.clear();
            next.phase = SessionPhase::Sending;

            Ok(TransitionResult::new(next).with_effect(Effect::DispatchChat {
                epoch: state.epoch,
                message: text,
            }))
        }

        // Local reset is unconditional and works in any phase; the remote
        // call is advisory. Bumping the epoch strands any in-flight request.
        Event::ResetRequested { at } => {
            let mut next = state.clone();
            next.messages = vec![Message::companion(RESET_GREETING, at, None)];
            next.phase = SessionPhase::Idle;
            next.epoch += 1;
            Ok(TransitionResult::new(next).with_effect(Effect::DispatchReset))
        }

        Event::ChatSucceeded {
            epoch,
            reply,
            evaluation,
            at,
        } => {
            if epoch != state.epoch {
                // Resolved after a reset; discard without touching the log.
                return Ok(TransitionResult::new(state.clone()));
            }
            match state.phase {
                SessionPhase::Sending => {
                    let mut next = state.clone();
                    next.messages
                        .push(Message::companion(reply, at, Some(evaluation)));
                    next.phase = SessionPhase::Idle;
                    Ok(TransitionResult::new(next))
                }
                SessionPhase::Idle => Err(TransitionError::InvalidTransition(
                    "chat outcome with current epoch while idle".to_string(),
                )),
            }
        }

        Event::ChatFailed { epoch, at, .. } => {
            if epoch != state.epoch {
                return Ok(TransitionResult::new(state.clone()));
            }
            match state.phase {
                SessionPhase::Sending => {
                    let mut next = state.clone();
                    next.messages.push(Message::fallback(at));
                    next.phase = SessionPhase::Idle;
                    Ok(TransitionResult::new(next))
                }
                SessionPhase::Idle => Err(TransitionError::InvalidTransition(
                    "chat outcome with current epoch while idle".to_string(),
                )),
            }
        }
    }
}
