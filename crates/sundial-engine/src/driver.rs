//! Driver trait for abstracting platform I/O.
//!
//! The [`Driver`] trait decouples the engines from the transport capability,
//! the scheduled-callback primitive, and the renderer. Each platform
//! implements the trait; the generic [`Runtime`](crate::Runtime) handles
//! orchestration, so the same engine logic runs against a production
//! platform and the deterministic test harness.

use std::time::Duration;

use bytes::Bytes;
use sundial_core::scheduler::TickToken;
use sundial_proto::PeerId;

use crate::event::FaceEvent;

/// Abstracts the companion platform for the face runtime.
///
/// All calls are fire-and-forget from the engine's point of view:
/// completions (connected, suspended, peers enumerated, inbound messages,
/// timer fires) come back through [`Driver::poll_event`] one at a time, which
/// is what keeps the engine single-threaded.
pub trait Driver {
    /// Platform-specific send error.
    type Error: std::error::Error + 'static;

    /// Next queued event, if any.
    fn poll_event(&mut self) -> Option<FaceEvent>;

    /// Issue the asynchronous transport connect call.
    fn connect(&mut self);

    /// Release the transport session resource.
    fn disconnect(&mut self);

    /// Kick off asynchronous peer enumeration.
    fn enumerate_peers(&mut self);

    /// Send bytes to `peer` on `channel`. Best effort.
    ///
    /// # Errors
    ///
    /// Returns an error if the transport refuses the send outright; the
    /// runtime logs it and moves on. There is no retry layer.
    fn send(&mut self, channel: &str, peer: &PeerId, payload: Bytes) -> Result<(), Self::Error>;

    /// Arrange for a [`FaceEvent::RenderTimerFired`] carrying `token` after
    /// `delay`.
    fn schedule_tick(&mut self, token: TickToken, delay: Duration);

    /// Cancel the outstanding scheduled callback, if any.
    fn cancel_tick(&mut self);

    /// Repaint the display from the engine's current state.
    fn repaint(&mut self);

    /// Toggle anti-aliased text rendering.
    fn set_anti_alias(&mut self, enabled: bool);

    /// Current wall-clock time in milliseconds.
    fn now_ms(&self) -> u64;
}
