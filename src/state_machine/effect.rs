//! Effects produced by state transitions

/// Effects to be executed after a transition. The runtime performs the I/O
/// and feeds each resolution back in as an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// POST the message to the chat endpoint
    DispatchChat {
        /// Epoch at dispatch time, echoed back in the outcome event
        epoch: u64,
        message: String,
    },

    /// Best-effort GET to the reset endpoint. Fire-and-forget: a failure is
    /// logged and never folded back into the session.
    DispatchReset,
}
