//! Runtime for executing the conversation session
//!
//! The runtime task is the single owner of session state; everything else
//! observes snapshots and submits events.

mod executor;

#[cfg(test)]
pub mod testing;

pub use executor::{SessionHandle, SessionRuntime};
