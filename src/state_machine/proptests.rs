//! Property-based tests for the state machine
//!
//! These verify the session invariants hold across arbitrary inputs and
//! event orderings.

use super::state::*;
use super::transition::*;
use super::*;
use crate::backend::EvaluationRecord;
use chrono::Utc;
use proptest::prelude::*;

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_evaluation() -> impl Strategy<Value = EvaluationRecord> {
    (any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>()).prop_map(
        |(asks_questions, explores_thoughts, encourages_reflection, uses_cbt_language)| {
            EvaluationRecord {
                asks_questions,
                explores_thoughts,
                encourages_reflection,
                uses_cbt_language,
            }
        },
    )
}

/// Drafts that contain at least one non-whitespace character
fn arb_nonempty_draft() -> impl Strategy<Value = String> {
    "[ ]{0,3}[a-zA-Z?!.🌙]{1,30}[ ]{0,3}"
}

/// Whitespace-only drafts, including the empty string
fn arb_whitespace_draft() -> impl Strategy<Value = String> {
    "[ \t\n]{0,6}"
}

/// Whether a submission resolves successfully or fails
#[derive(Debug, Clone)]
enum Outcome {
    Success {
        reply: String,
        evaluation: EvaluationRecord,
    },
    Failure {
        reason: String,
    },
}

fn arb_outcome() -> impl Strategy<Value = Outcome> {
    prop_oneof![
        ("[a-zA-Z ?]{1,40}", arb_evaluation())
            .prop_map(|(reply, evaluation)| Outcome::Success { reply, evaluation }),
        "[a-z ]{1,20}".prop_map(|reason| Outcome::Failure { reason }),
    ]
}

fn outcome_event(epoch: u64, outcome: Outcome) -> Event {
    match outcome {
        Outcome::Success { reply, evaluation } => {
            Event::chat_succeeded(epoch, reply, evaluation)
        }
        Outcome::Failure { reason } => Event::chat_failed(epoch, reason),
    }
}

/// One step of a simulated session, from the user's point of view
#[derive(Debug, Clone)]
enum Step {
    Type(String),
    Submit(Outcome),
    Reset,
}

fn arb_step() -> impl Strategy<Value = Step> {
    prop_oneof![
        prop_oneof![arb_nonempty_draft(), arb_whitespace_draft()].prop_map(Step::Type),
        arb_outcome().prop_map(Step::Submit),
        Just(Step::Reset),
    ]
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    /// An accepted submission grows the log by exactly 2, success or failure.
    #[test]
    fn accepted_submission_grows_log_by_two(draft in arb_nonempty_draft(), outcome in arb_outcome()) {
        let mut state = SessionState::seeded(Utc::now());
        state.draft = draft;
        let before = state.messages.len();

        let state = transition(&state, Event::submit_pressed()).unwrap().new_state;
        prop_assert!(state.awaiting_response());
        prop_assert_eq!(state.messages.len(), before + 1);

        let state = transition(&state, outcome_event(state.epoch, outcome)).unwrap().new_state;
        prop_assert!(!state.awaiting_response());
        prop_assert_eq!(state.messages.len(), before + 2);
    }

    /// Whitespace-only submissions never change the session or dispatch.
    #[test]
    fn whitespace_submission_is_a_noop(draft in arb_whitespace_draft()) {
        let mut state = SessionState::seeded(Utc::now());
        state.draft = draft;

        let err = transition(&state, Event::submit_pressed()).unwrap_err();
        prop_assert_eq!(err, TransitionError::EmptyDraft);
    }

    /// Submissions while a request is in flight are always rejected.
    #[test]
    fn busy_submission_is_rejected(first in arb_nonempty_draft(), second in arb_nonempty_draft()) {
        let mut state = SessionState::seeded(Utc::now());
        state.draft = first;
        let mut state = transition(&state, Event::submit_pressed()).unwrap().new_state;
        state.draft = second;

        let err = transition(&state, Event::submit_pressed()).unwrap_err();
        prop_assert_eq!(err, TransitionError::SessionBusy);
    }

    /// Outcomes carrying a stale epoch never change the session.
    #[test]
    fn stale_outcomes_are_discarded(
        draft in arb_nonempty_draft(),
        outcome in arb_outcome(),
        extra_resets in 1u64..4,
    ) {
        let mut state = SessionState::seeded(Utc::now());
        state.draft = draft;
        let mut state = transition(&state, Event::submit_pressed()).unwrap().new_state;
        let dispatched_epoch = state.epoch;

        for _ in 0..extra_resets {
            state = transition(&state, Event::reset_requested()).unwrap().new_state;
        }

        let result = transition(&state, outcome_event(dispatched_epoch, outcome)).unwrap();
        prop_assert_eq!(&result.new_state, &state);
        prop_assert!(result.effects.is_empty());
    }

    /// Across any driver-shaped event sequence: the gate is never left stuck,
    /// the log only ever grows except at a reset, and a reset always leaves
    /// exactly the seeded greeting.
    #[test]
    fn session_invariants_hold_over_any_sequence(steps in prop::collection::vec(arb_step(), 0..30)) {
        let mut state = SessionState::seeded(Utc::now());

        for step in steps {
            let before_len = state.messages.len();
            match step {
                Step::Type(text) => {
                    state = transition(&state, Event::draft_changed(text)).unwrap().new_state;
                    prop_assert_eq!(state.messages.len(), before_len);
                }
                Step::Submit(outcome) => {
                    match transition(&state, Event::submit_pressed()) {
                        Ok(result) => {
                            // Accepted: exactly one dispatch, resolved immediately
                            // by the simulated backend.
                            prop_assert_eq!(result.effects.len(), 1);
                            state = result.new_state;
                            prop_assert!(state.awaiting_response());
                            state = transition(&state, outcome_event(state.epoch, outcome))
                                .unwrap()
                                .new_state;
                            prop_assert_eq!(state.messages.len(), before_len + 2);
                        }
                        Err(TransitionError::EmptyDraft) => {
                            prop_assert!(state.draft.trim().is_empty());
                        }
                        Err(e) => return Err(TestCaseError::fail(format!("unexpected: {e}"))),
                    }
                }
                Step::Reset => {
                    state = transition(&state, Event::reset_requested()).unwrap().new_state;
                    prop_assert_eq!(state.messages.len(), 1);
                    prop_assert_eq!(state.messages[0].content.as_str(), RESET_GREETING);
                }
            }
            // The gate is released at every step boundary.
            prop_assert!(!state.awaiting_response());
        }
    }

    /// Non-reset events preserve the existing log as a prefix.
    #[test]
    fn log_is_append_only_outside_reset(draft in arb_nonempty_draft(), outcome in arb_outcome()) {
        let mut state = SessionState::seeded(Utc::now());
        state.draft = draft;

        let submitted = transition(&state, Event::submit_pressed()).unwrap().new_state;
        prop_assert_eq!(&submitted.messages[..state.messages.len()], &state.messages[..]);

        let resolved = transition(&submitted, outcome_event(submitted.epoch, outcome))
            .unwrap()
            .new_state;
        prop_assert_eq!(&resolved.messages[..submitted.messages.len()], &submitted.messages[..]);
    }
}
