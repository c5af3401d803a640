//! Actions produced by the engines for a driver to execute.
//!
//! Engines never touch the transport, the timer primitive, or the renderer
//! directly; they return these values and the driver performs the effects.
//! Completions flow back in as events.

use std::time::Duration;

use bytes::Bytes;
use sundial_core::scheduler::TickToken;
use sundial_proto::PeerId;

/// Actions produced by the companion-side [`FaceEngine`](crate::FaceEngine).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FaceAction {
    /// Issue the asynchronous transport connect call.
    Connect,

    /// Release the transport session resource.
    Disconnect,

    /// Kick off asynchronous peer enumeration.
    EnumeratePeers,

    /// Send a message. Best effort: a failed or lost send is logged and
    /// never retried.
    Send {
        /// Wire channel.
        channel: &'static str,
        /// Destination peer.
        peer: PeerId,
        /// Raw payload bytes.
        payload: Bytes,
    },

    /// Arrange a render callback after `delay`.
    ScheduleTick {
        /// Token to hand back when the callback fires.
        token: TickToken,
        /// Delay until the callback.
        delay: Duration,
    },

    /// Cancel the outstanding render callback.
    CancelTick,

    /// Repaint the display from the engine's current [`DisplayState`](crate::DisplayState).
    Repaint,

    /// Toggle anti-aliased text rendering (low-bit ambient displays only).
    SetAntiAlias {
        /// Whether text should be anti-aliased.
        enabled: bool,
    },
}

/// Actions produced by the primary-side
/// [`ForecastResponder`](crate::ForecastResponder).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForecastAction {
    /// Issue the asynchronous transport connect call.
    Connect,

    /// Release the transport session resource.
    Disconnect,

    /// Kick off asynchronous peer enumeration.
    EnumeratePeers,

    /// Send a message. Best effort, never retried.
    Send {
        /// Wire channel.
        channel: &'static str,
        /// Destination peer.
        peer: PeerId,
        /// Raw payload bytes.
        payload: Bytes,
    },

    /// Ask the host weather source for a current forecast. The completion
    /// arrives later as [`ForecastEvent::ForecastUpdated`](crate::ForecastEvent::ForecastUpdated).
    GatherForecast,
}
