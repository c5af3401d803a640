//! Events delivered to the engines.
//!
//! Every callback from the host — lifecycle signals, transport session
//! callbacks, inbound messages, timer fires — arrives as one of these
//! values, serialized onto the owning engine's single event queue. No two
//! handlers run concurrently for the same engine.

use bytes::Bytes;
use sundial_core::scheduler::TickToken;
use sundial_proto::{PeerId, WeatherSnapshot};

/// Events handled by the companion-side [`FaceEngine`](crate::FaceEngine).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FaceEvent {
    /// The watch face became visible or was hidden.
    VisibilityChanged {
        /// New visibility.
        visible: bool,
    },

    /// The display entered or left ambient (power-saving) mode.
    AmbientModeChanged {
        /// New ambient flag.
        ambient: bool,
    },

    /// The host reported display capabilities.
    PropertiesChanged {
        /// Whether the display drops color bits in ambient mode, requiring
        /// anti-aliasing to be disabled there.
        low_bit_ambient: bool,
    },

    /// Host minute tick; fires even in ambient mode.
    TimeTick,

    /// The system time zone changed while we were showing.
    TimeZoneChanged,

    /// Transport session established, or re-established after suspension.
    SessionConnected,

    /// Transport session suspended.
    SessionSuspended {
        /// Transport-reported cause.
        cause: String,
    },

    /// Transport session failed for this attempt.
    SessionFailed {
        /// Transport-reported reason.
        reason: String,
    },

    /// Peer enumeration completed.
    PeersEnumerated {
        /// Reachable peers; the design assumes at most one.
        peers: Vec<PeerId>,
    },

    /// A message arrived on a wire channel.
    MessageReceived {
        /// Channel the message arrived on.
        channel: String,
        /// Peer that sent it.
        sender: PeerId,
        /// Raw payload bytes.
        payload: Bytes,
    },

    /// A scheduled render callback fired.
    RenderTimerFired {
        /// Token issued with the schedule; stale tokens are ignored.
        token: TickToken,
    },
}

/// Events handled by the primary-side
/// [`ForecastResponder`](crate::ForecastResponder).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForecastEvent {
    /// The host service started; bring the session up.
    Started,

    /// The host service is stopping; release the session.
    Stopped,

    /// Transport session established, or re-established after suspension.
    SessionConnected,

    /// Transport session suspended.
    SessionSuspended {
        /// Transport-reported cause.
        cause: String,
    },

    /// Transport session failed for this attempt.
    SessionFailed {
        /// Transport-reported reason.
        reason: String,
    },

    /// Peer enumeration completed.
    PeersEnumerated {
        /// Reachable peers; the design assumes at most one.
        peers: Vec<PeerId>,
    },

    /// A message arrived on a wire channel.
    MessageReceived {
        /// Channel the message arrived on.
        channel: String,
        /// Peer that sent it.
        sender: PeerId,
        /// Raw payload bytes (empty for a refresh request).
        payload: Bytes,
    },

    /// The weather source produced a fresh forecast: a completed gather, or
    /// an unsolicited push from the host's own sync cycle.
    ForecastUpdated {
        /// The new forecast.
        snapshot: WeatherSnapshot,
    },
}
