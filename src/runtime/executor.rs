//! Session runtime executor

use crate::backend::ChatService;
use crate::state_machine::{transition, Effect, Event, SessionState, TransitionError};
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};

/// Event channel capacity. Keystrokes are the chattiest source; anything
/// beyond this backpressures the input side.
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Handle used by the UI to drive the session and observe its state
#[derive(Clone)]
pub struct SessionHandle {
    pub event_tx: mpsc::Sender<Event>,
    pub snapshot_rx: watch::Receiver<SessionState>,
}

/// Generic session runtime driven by any [`ChatService`] implementation.
///
/// Applies pure transitions and executes the resulting effects by spawning
/// backend calls whose resolutions come back as events on the same channel.
/// State is therefore mutated sequentially: the user-message append always
/// precedes its request's dispatch, and the awaiting-response gate drops
/// only after the outcome has been folded into the log.
pub struct SessionRuntime<C> {
    state: SessionState,
    client: Arc<C>,
    event_rx: mpsc::Receiver<Event>,
    event_tx: mpsc::Sender<Event>,
    snapshot_tx: watch::Sender<SessionState>,
}

impl<C: ChatService + 'static> SessionRuntime<C> {
    pub fn new(client: C) -> (Self, SessionHandle) {
        let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let state = SessionState::seeded(Utc::now());
        let (snapshot_tx, snapshot_rx) = watch::channel(state.clone());

        let handle = SessionHandle {
            event_tx: event_tx.clone(),
            snapshot_rx,
        };

        let runtime = Self {
            state,
            client: Arc::new(client),
            event_rx,
            event_tx,
            snapshot_tx,
        };

        (runtime, handle)
    }

    /// Process events until every external sender is gone.
    pub async fn run(mut self) {
        tracing::info!("Session runtime started");

        loop {
            tokio::select! {
                Some(event) = self.event_rx.recv() => self.process_event(event),
                // No external senders and the watch side is gone: the UI
                // has shut down.
                _ = self.snapshot_tx.closed() => break,
            }
        }

        tracing::info!("Session runtime stopped");
    }

    fn process_event(&mut self, event: Event) {
        match transition(&self.state, event) {
            Ok(result) => {
                self.state = result.new_state;
                for effect in result.effects {
                    self.execute_effect(effect);
                }
                let _ = self.snapshot_tx.send(self.state.clone());
            }
            Err(e @ (TransitionError::SessionBusy | TransitionError::EmptyDraft)) => {
                // Rejected submission: state untouched, nothing dispatched.
                tracing::debug!(reason = %e, "Submission rejected");
            }
            Err(e @ TransitionError::InvalidTransition(_)) => {
                tracing::error!(error = %e, "Dropping event");
            }
        }
    }

    fn execute_effect(&mut self, effect: Effect) {
        match effect {
            Effect::DispatchChat { epoch, message } => {
                let client = Arc::clone(&self.client);
                let event_tx = self.event_tx.clone();
                tokio::spawn(async move {
                    let event = match client.chat(&message).await {
                        Ok(reply) => {
                            Event::chat_succeeded(epoch, reply.response, reply.evaluation)
                        }
                        Err(e) => Event::chat_failed(epoch, e.to_string()),
                    };
                    let _ = event_tx.send(event).await;
                });
            }

            Effect::DispatchReset => {
                let client = Arc::clone(&self.client);
                tokio::spawn(async move {
                    // Advisory: local state is already reset.
                    if let Err(e) = client.reset().await {
                        tracing::warn!(error = %e, "Remote reset failed");
                    }
                });
            }
        }
    }
}
