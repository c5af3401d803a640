//! Session error types.

use thiserror::Error;

use crate::session::SessionState;

/// Errors surfaced by the session state machine.
///
/// Nothing here is fatal: every failure degrades to "keep showing the
/// last-known weather" at the engine boundary. Sends are best effort and
/// never retried; a rejected send leaves the owner's pending-refresh flag
/// for the next connection cycle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// A send was attempted outside the `Connected` state.
    #[error("session is not usable in state {state:?}")]
    NotConnected {
        /// State the session was in when the send was rejected.
        state: SessionState,
    },

    /// A send was attempted before peer enumeration found a counterpart.
    #[error("no reachable peer is known")]
    NoPeerReachable,
}
