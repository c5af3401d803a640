//! Companion-side watch face engine.
//!
//! Composes the session state machine, the render scheduler, and the
//! display state into the visibility-driven lifecycle: becoming visible
//! brings the session up and requests one weather refresh; losing
//! visibility tears everything down. Every handler runs on the owner's
//! single serialized event queue, so no locking guards the state here.
//!
//! The refresh request is owed at most once per visibility session: the
//! `pending_refresh` flag is set on the visible transition and cleared when
//! the request is handed to the transport, so repeated ready callbacks
//! (reconnection after suspension) never duplicate it.

use bytes::Bytes;
use tracing::{debug, warn};

use sundial_core::{
    scheduler::{RenderScheduler, SchedulerAction},
    session::{SessionAction, SessionLink, SessionState},
};
use sundial_proto::{PeerId, REFRESH_REQUEST, WEATHER_SNAPSHOT, WeatherSnapshot};

use crate::{action::FaceAction, display::DisplayState, event::FaceEvent};

/// Watch face engine. One instance per rendering surface.
#[derive(Debug)]
pub struct FaceEngine {
    session: SessionLink,
    scheduler: RenderScheduler,
    visible: bool,
    ambient: bool,
    low_bit_ambient: bool,
    pending_refresh: bool,
    display: DisplayState,
    decode_failures: u64,
}

impl FaceEngine {
    /// Create an engine for a freshly created, not-yet-visible face.
    pub fn new() -> Self {
        Self {
            session: SessionLink::new(),
            scheduler: RenderScheduler::new(),
            visible: false,
            ambient: false,
            low_bit_ambient: false,
            // A face just set by the user should pull weather on its first
            // connection even if the visibility callback is delayed.
            pending_refresh: true,
            display: DisplayState::default(),
            decode_failures: 0,
        }
    }

    /// Current display state for the external renderer.
    #[must_use]
    pub fn display(&self) -> &DisplayState {
        &self.display
    }

    /// Session state, for diagnostics.
    #[must_use]
    pub fn session_state(&self) -> &SessionState {
        self.session.state()
    }

    /// Whether the render timer is running.
    #[must_use]
    pub fn timer_running(&self) -> bool {
        self.scheduler.is_running()
    }

    /// Whether a refresh request is still owed for this visibility session.
    #[must_use]
    pub fn refresh_pending(&self) -> bool {
        self.pending_refresh
    }

    /// Number of malformed snapshot payloads dropped so far.
    #[must_use]
    pub fn decode_failures(&self) -> u64 {
        self.decode_failures
    }

    /// Whether the render timer should be ticking: only while the face is
    /// visible and interactive.
    #[must_use]
    pub fn should_run(&self) -> bool {
        self.visible && !self.ambient
    }

    /// Handle one event from the host queue.
    ///
    /// `now_ms` is the current wall-clock time in milliseconds; the engine
    /// holds no clock of its own.
    pub fn handle(&mut self, event: FaceEvent, now_ms: u64) -> Vec<FaceAction> {
        match event {
            FaceEvent::VisibilityChanged { visible } => self.on_visibility(visible),
            FaceEvent::AmbientModeChanged { ambient } => self.on_ambient(ambient),
            FaceEvent::PropertiesChanged { low_bit_ambient } => {
                self.low_bit_ambient = low_bit_ambient;
                Vec::new()
            },
            // The clock state lives with the renderer; both signals just
            // force a redraw.
            FaceEvent::TimeTick | FaceEvent::TimeZoneChanged => vec![FaceAction::Repaint],
            FaceEvent::SessionConnected => {
                let actions = self.session.on_connected();
                self.run_session_actions(actions)
            },
            FaceEvent::SessionSuspended { cause } => {
                let actions = self.session.on_suspended(&cause);
                self.run_session_actions(actions)
            },
            FaceEvent::SessionFailed { reason } => {
                let actions = self.session.on_failed(reason);
                self.run_session_actions(actions)
            },
            FaceEvent::PeersEnumerated { peers } => self.on_peers(peers),
            FaceEvent::MessageReceived { channel, sender, payload } => {
                self.on_message(&channel, &sender, &payload)
            },
            FaceEvent::RenderTimerFired { token } => {
                let should_run = self.should_run();
                Self::map_scheduler(self.scheduler.on_fire(token, now_ms, should_run))
            },
        }
    }

    fn on_visibility(&mut self, visible: bool) -> Vec<FaceAction> {
        self.visible = visible;
        let mut out = Vec::new();
        if visible {
            debug!("face visible; bringing session up");
            // One refresh request per visibility session.
            self.pending_refresh = true;
            let actions = self.session.connect();
            out.extend(self.run_session_actions(actions));
            out.extend(self.retime());
        } else {
            debug!("face hidden; tearing session down");
            out.extend(Self::map_scheduler(self.scheduler.stop()));
            let actions = self.session.disconnect();
            out.extend(self.run_session_actions(actions));
        }
        out
    }

    fn on_ambient(&mut self, ambient: bool) -> Vec<FaceAction> {
        let mut out = Vec::new();
        if self.ambient != ambient {
            self.ambient = ambient;
            if self.low_bit_ambient {
                let enabled = !ambient;
                self.display.anti_alias = enabled;
                out.push(FaceAction::SetAntiAlias { enabled });
            }
            out.push(FaceAction::Repaint);
        }
        out.extend(self.retime());
        out
    }

    /// Restart the tick schedule so the next fire realigns to the current
    /// wall-clock second.
    fn retime(&mut self) -> Vec<FaceAction> {
        let mut out = Self::map_scheduler(self.scheduler.stop());
        let should_run = self.should_run();
        out.extend(Self::map_scheduler(self.scheduler.start(should_run)));
        out
    }

    fn on_peers(&mut self, peers: Vec<PeerId>) -> Vec<FaceAction> {
        let Some(peer) = peers.into_iter().next() else {
            warn!("no reachable peer; refresh stays pending");
            return Vec::new();
        };
        self.session.set_peer(peer);
        if !self.pending_refresh {
            return Vec::new();
        }
        match self.session.send(REFRESH_REQUEST, Bytes::new()) {
            Ok(message) => {
                self.pending_refresh = false;
                debug!(peer = %message.peer, "requesting weather refresh");
                vec![FaceAction::Send {
                    channel: message.channel,
                    peer: message.peer,
                    payload: message.payload,
                }]
            },
            Err(error) => {
                // Session died between enumeration and send; the flag stays
                // set for the next ready.
                warn!(%error, "refresh request not sent");
                Vec::new()
            },
        }
    }

    fn on_message(&mut self, channel: &str, sender: &PeerId, payload: &[u8]) -> Vec<FaceAction> {
        if channel != WEATHER_SNAPSHOT {
            debug!(channel, "ignoring message on unexpected channel");
            return Vec::new();
        }
        match WeatherSnapshot::decode(payload) {
            Ok(snapshot) => {
                debug!(peer = %sender, "snapshot received");
                self.display.apply(snapshot);
                vec![FaceAction::Repaint]
            },
            Err(error) => {
                // The previous snapshot stays on screen untouched.
                self.decode_failures += 1;
                warn!(%error, "dropping malformed snapshot");
                Vec::new()
            },
        }
    }

    fn run_session_actions(&mut self, actions: Vec<SessionAction>) -> Vec<FaceAction> {
        let mut out = Vec::new();
        for action in actions {
            match action {
                SessionAction::Dial => out.push(FaceAction::Connect),
                SessionAction::HangUp => out.push(FaceAction::Disconnect),
                // Peer enumeration must complete before any send; rerun it
                // on every ready so a refresh left pending by an empty
                // enumeration retries.
                SessionAction::NotifyReady => out.push(FaceAction::EnumeratePeers),
                SessionAction::NotifySuspended { cause } => {
                    warn!(%cause, "holding traffic until the session recovers");
                },
                SessionAction::NotifyLost { reason } => {
                    warn!(?reason, "session lost; redial waits for the next visibility");
                },
            }
        }
        out
    }

    fn map_scheduler(actions: Vec<SchedulerAction>) -> Vec<FaceAction> {
        actions
            .into_iter()
            .map(|action| match action {
                SchedulerAction::Repaint => FaceAction::Repaint,
                SchedulerAction::ScheduleTick { token, delay } => {
                    FaceAction::ScheduleTick { token, delay }
                },
                SchedulerAction::CancelTick => FaceAction::CancelTick,
            })
            .collect()
    }
}

impl Default for FaceEngine {
    fn default() -> Self {
        Self::new()
    }
}
