//! Transport session lifecycle state machine.
//!
//! This module implements the session layer shared by both ends of the
//! weather link: acquiring the transport before any message can move,
//! tolerating suspension, and releasing the transport on every exit path.
//! The companion-side renderer and the primary-side responder drive the
//! same machine.
//!
//! # Architecture: Action-Based State Machine
//!
//! This state machine follows the action pattern:
//! - Handlers mutate state and return `Vec<SessionAction>`
//! - Driver code executes actions (issue the transport connect call,
//!   release the transport, run ready hooks)
//!
//! This enables:
//! - Pure session logic (no transport binding)
//! - Easy testing (no mocking of the transport capability)
//! - One implementation for both sides of the link
//!
//! # State Machine
//!
//! ```text
//! ┌──────┐ connect() ┌────────────┐ on_connected ┌───────────┐
//! │ Idle │──────────>│ Connecting │─────────────>│ Connected │
//! └──────┘           └────────────┘              └───────────┘
//!                         │                        │        ↑
//!                         │ on_failed   on_suspended        │ on_connected
//!                         │                        ↓        │
//!                         │                      ┌───────────┐
//!                         │                      │ Suspended │
//!                         ↓                      └───────────┘
//!                   ┌──────────────┐                   │
//!                   │ Disconnected │<──────────────────┘
//!                   └──────────────┘  on_failed / disconnect()
//! ```
//!
//! # Lifecycle
//!
//! 1. **Idle**: machine created, transport untouched
//! 2. **Connecting**: connect issued, waiting for the completion callback
//! 3. **Connected**: usable; sends permitted once a peer is enumerated
//! 4. **Suspended**: transient outage; recovers on a later `on_connected`
//!    without a re-dial
//! 5. **Disconnected**: terminal for this attempt; a redial happens only on
//!    the owner's next visibility cycle
//!
//! `disconnect()` is permitted from every state and always releases the
//! transport resource, so owners can tear down unconditionally on every
//! exit path, including failure.

use bytes::Bytes;
use sundial_proto::PeerId;
use tracing::{debug, warn};

use crate::error::SessionError;

/// Why a session ended up in [`SessionState::Disconnected`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisconnectReason {
    /// The owner tore the session down deliberately.
    Explicit,
    /// The transport reported the connection attempt or connection as failed.
    Failed(String),
}

/// Actions returned by the session state machine.
///
/// The driver (an engine, or a test double) executes these:
/// - `Dial`: issue the asynchronous transport connect call
/// - `HangUp`: release the underlying transport resource
/// - the `Notify*` actions run the owner's subscription hooks
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    /// Issue the transport connect call.
    Dial,

    /// Release the underlying transport resource.
    HangUp,

    /// The session became usable; the owner should enumerate peers and flush
    /// any pending traffic.
    NotifyReady,

    /// The session entered suspension; no traffic until it recovers.
    NotifySuspended {
        /// Transport-reported cause, for logging only.
        cause: String,
    },

    /// The session is gone for this attempt; the owner decides whether to
    /// redial later.
    NotifyLost {
        /// Why the session ended.
        reason: DisconnectReason,
    },
}

/// Session state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Machine created, transport untouched.
    #[default]
    Idle,
    /// Connect issued, waiting for the completion callback.
    Connecting,
    /// Usable: sends permitted once a peer is known.
    Connected,
    /// Transient outage; no sends, recovery needs no re-dial.
    Suspended,
    /// Terminal for this attempt.
    Disconnected(DisconnectReason),
}

/// A message accepted by [`SessionLink::send`], ready for the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    /// Wire channel the message travels on.
    pub channel: &'static str,
    /// Enumerated peer the message is addressed to.
    pub peer: PeerId,
    /// Raw payload bytes.
    pub payload: Bytes,
}

/// Session lifecycle state machine.
///
/// At most one instance per engine; the handle and its peer identifier are
/// never shared across engines. The peer is populated by a separate
/// enumeration step that must complete before any send is attempted.
#[derive(Debug, Clone, Default)]
pub struct SessionLink {
    state: SessionState,
    peer: Option<PeerId>,
}

impl SessionLink {
    /// Create a session in `Idle` with no peer.
    pub fn new() -> Self {
        Self { state: SessionState::Idle, peer: None }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// True only while `Connected`.
    #[must_use]
    pub fn is_usable(&self) -> bool {
        self.state == SessionState::Connected
    }

    /// Enumerated peer, if the enumeration step has completed.
    #[must_use]
    pub fn peer(&self) -> Option<&PeerId> {
        self.peer.as_ref()
    }

    /// Request a connection.
    ///
    /// Emits `Dial` from `Idle` or `Disconnected`. Idempotent while an
    /// attempt is in flight or live: a second `connect()` during
    /// `Connecting`, `Connected`, or `Suspended` issues no duplicate dial.
    pub fn connect(&mut self) -> Vec<SessionAction> {
        match self.state {
            SessionState::Idle | SessionState::Disconnected(_) => {
                debug!("dialing transport session");
                self.state = SessionState::Connecting;
                self.peer = None;
                vec![SessionAction::Dial]
            },
            SessionState::Connecting | SessionState::Connected | SessionState::Suspended => {
                debug!(state = ?self.state, "connect is a no-op");
                Vec::new()
            },
        }
    }

    /// Transport reported the connection established.
    ///
    /// Completes a pending dial, or recovers from suspension without a
    /// re-dial. A duplicate callback while already `Connected` re-emits
    /// `NotifyReady` so the owner can retry work left pending by an earlier
    /// ready (deduplication is the owner's job). Stale callbacks after
    /// teardown are ignored.
    pub fn on_connected(&mut self) -> Vec<SessionAction> {
        match self.state {
            SessionState::Connecting | SessionState::Suspended => {
                debug!("session connected");
                self.state = SessionState::Connected;
                vec![SessionAction::NotifyReady]
            },
            SessionState::Connected => vec![SessionAction::NotifyReady],
            SessionState::Idle | SessionState::Disconnected(_) => {
                debug!(state = ?self.state, "ignoring stale connected callback");
                Vec::new()
            },
        }
    }

    /// Transport reported a transient suspension.
    ///
    /// Not fatal: the machine stays subscribed and moves back to
    /// `Connected` on a later `on_connected` from the same session.
    pub fn on_suspended(&mut self, cause: &str) -> Vec<SessionAction> {
        if self.state != SessionState::Connected {
            debug!(state = ?self.state, "ignoring suspension outside Connected");
            return Vec::new();
        }
        warn!(cause, "session suspended");
        self.state = SessionState::Suspended;
        vec![SessionAction::NotifySuspended { cause: cause.to_owned() }]
    }

    /// Transport reported the connection (attempt) failed.
    ///
    /// Terminal for this session instance and non-fatal for the owner: the
    /// transport is released here, and the redial is deferred to the next
    /// visibility cycle rather than retried automatically.
    pub fn on_failed(&mut self, reason: impl Into<String>) -> Vec<SessionAction> {
        match self.state {
            SessionState::Connecting | SessionState::Connected | SessionState::Suspended => {
                let reason = DisconnectReason::Failed(reason.into());
                warn!(?reason, "session failed");
                self.state = SessionState::Disconnected(reason.clone());
                self.peer = None;
                vec![SessionAction::NotifyLost { reason }, SessionAction::HangUp]
            },
            SessionState::Idle | SessionState::Disconnected(_) => {
                debug!(state = ?self.state, "ignoring stale failure callback");
                Vec::new()
            },
        }
    }

    /// Tear the session down.
    ///
    /// Permitted from every state and always emits `HangUp`: the transport
    /// resource is released on every exit path, even when the session never
    /// connected.
    pub fn disconnect(&mut self) -> Vec<SessionAction> {
        debug!(state = ?self.state, "disconnecting session");
        self.state = SessionState::Disconnected(DisconnectReason::Explicit);
        self.peer = None;
        vec![SessionAction::HangUp]
    }

    /// Record the peer found by the enumeration step.
    ///
    /// Ignored unless the session is usable; an enumeration result that
    /// arrives after teardown must not resurrect a peer.
    pub fn set_peer(&mut self, peer: PeerId) {
        if self.is_usable() {
            debug!(peer = %peer, "peer enumerated");
            self.peer = Some(peer);
        } else {
            debug!(peer = %peer, state = ?self.state, "dropping peer for unusable session");
        }
    }

    /// Accept a message for sending.
    ///
    /// Fails with [`SessionError::NotConnected`] outside `Connected` and
    /// [`SessionError::NoPeerReachable`] before enumeration has found the
    /// counterpart. On success the caller owns delivery; there is no retry
    /// layer behind this.
    pub fn send(
        &self,
        channel: &'static str,
        payload: Bytes,
    ) -> Result<OutboundMessage, SessionError> {
        if !self.is_usable() {
            return Err(SessionError::NotConnected { state: self.state.clone() });
        }
        let peer = self.peer.clone().ok_or(SessionError::NoPeerReachable)?;
        Ok(OutboundMessage { channel, peer, payload })
    }
}
