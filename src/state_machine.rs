//! Core conversation state machine
//!
//! Implements the Elm Architecture pattern with pure state transitions.

mod effect;
mod event;
mod state;
mod transition;

#[cfg(test)]
mod proptests;

pub use effect::Effect;
pub use event::Event;
pub use state::{
    Author, Message, SessionPhase, SessionState, FALLBACK_MESSAGE, INITIAL_GREETING,
    RESET_GREETING,
};
pub use transition::{transition, TransitionError, TransitionResult};
