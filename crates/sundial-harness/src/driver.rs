//! Recording fake driver.

use std::{collections::VecDeque, time::Duration};

use bytes::Bytes;
use sundial_core::scheduler::TickToken;
use sundial_engine::{Driver, FaceEvent};
use sundial_proto::PeerId;
use thiserror::Error;

use crate::clock::VirtualClock;

/// Error returned when the fake driver is told to refuse sends.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("send refused by fake driver")]
pub struct SendRefused;

/// One message the engine handed to the driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    /// Wire channel.
    pub channel: String,
    /// Destination peer.
    pub peer: PeerId,
    /// Raw payload bytes.
    pub payload: Bytes,
}

/// A [`Driver`] double that records every effect and plays back queued
/// events, against a [`VirtualClock`].
#[derive(Debug, Default)]
pub struct FakeDriver {
    clock: VirtualClock,
    events: VecDeque<FaceEvent>,
    connects: usize,
    disconnects: usize,
    enumerations: usize,
    sends: Vec<SentMessage>,
    pending_tick: Option<(TickToken, Duration)>,
    cancels: usize,
    repaints: usize,
    anti_alias: Option<bool>,
    fail_sends: bool,
}

impl FakeDriver {
    /// Create a driver whose clock starts at `now_ms`.
    pub fn new(now_ms: u64) -> Self {
        Self { clock: VirtualClock::new(now_ms), ..Self::default() }
    }

    /// Queue an event for [`Driver::poll_event`].
    pub fn push_event(&mut self, event: FaceEvent) {
        self.events.push_back(event);
    }

    /// Move the clock forward.
    pub fn advance(&mut self, delta_ms: u64) {
        self.clock.advance(delta_ms);
    }

    /// Make subsequent sends fail with [`SendRefused`].
    pub fn refuse_sends(&mut self, refuse: bool) {
        self.fail_sends = refuse;
    }

    /// Number of connect calls issued.
    #[must_use]
    pub fn connects(&self) -> usize {
        self.connects
    }

    /// Number of disconnect calls issued.
    #[must_use]
    pub fn disconnects(&self) -> usize {
        self.disconnects
    }

    /// Number of peer enumerations issued.
    #[must_use]
    pub fn enumerations(&self) -> usize {
        self.enumerations
    }

    /// Every message sent so far (refused sends are not recorded).
    #[must_use]
    pub fn sends(&self) -> &[SentMessage] {
        &self.sends
    }

    /// Number of repaint calls.
    #[must_use]
    pub fn repaints(&self) -> usize {
        self.repaints
    }

    /// Number of cancelled tick schedules.
    #[must_use]
    pub fn cancels(&self) -> usize {
        self.cancels
    }

    /// Last anti-alias toggle, if any.
    #[must_use]
    pub fn anti_alias(&self) -> Option<bool> {
        self.anti_alias
    }

    /// The currently scheduled tick, if any.
    #[must_use]
    pub fn pending_tick(&self) -> Option<(TickToken, Duration)> {
        self.pending_tick
    }

    /// Let the pending tick elapse: advances the clock by its delay and
    /// queues the matching [`FaceEvent::RenderTimerFired`].
    ///
    /// `jitter_ms` models processing delay between the timer elapsing and
    /// the callback being handled. Returns false when nothing was pending.
    pub fn elapse_pending_tick(&mut self, jitter_ms: u64) -> bool {
        let Some((token, delay)) = self.pending_tick.take() else {
            return false;
        };
        self.clock.advance(delay.as_millis() as u64 + jitter_ms);
        self.events.push_back(FaceEvent::RenderTimerFired { token });
        true
    }
}

impl Driver for FakeDriver {
    type Error = SendRefused;

    fn poll_event(&mut self) -> Option<FaceEvent> {
        self.events.pop_front()
    }

    fn connect(&mut self) {
        self.connects += 1;
    }

    fn disconnect(&mut self) {
        self.disconnects += 1;
    }

    fn enumerate_peers(&mut self) {
        self.enumerations += 1;
    }

    fn send(&mut self, channel: &str, peer: &PeerId, payload: Bytes) -> Result<(), SendRefused> {
        if self.fail_sends {
            return Err(SendRefused);
        }
        self.sends.push(SentMessage { channel: channel.to_owned(), peer: peer.clone(), payload });
        Ok(())
    }

    fn schedule_tick(&mut self, token: TickToken, delay: Duration) {
        self.pending_tick = Some((token, delay));
    }

    fn cancel_tick(&mut self) {
        if self.pending_tick.take().is_some() {
            self.cancels += 1;
        }
    }

    fn repaint(&mut self) {
        self.repaints += 1;
    }

    fn set_anti_alias(&mut self, enabled: bool) {
        self.anti_alias = Some(enabled);
    }

    fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }
}
