//! Primary-side forecast responder.
//!
//! Listens for refresh requests from the companion, asks the host weather
//! source for a current forecast, and pushes encoded snapshots back over
//! the session. Unsolicited forecast updates from the host's own sync cycle
//! are forwarded the same way, so the companion stays current without
//! asking.
//!
//! A snapshot that cannot go out immediately (session down, peer unknown)
//! is held — at most one, latest wins — and flushed as soon as the session
//! is ready and a peer is enumerated. Requests themselves are never queued:
//! each one triggers a fresh gather, and gathering twice sends twice.

use tracing::{debug, warn};

use sundial_core::{
    error::SessionError,
    session::{SessionAction, SessionLink, SessionState},
};
use sundial_proto::{PeerId, REFRESH_REQUEST, WEATHER_SNAPSHOT, WeatherSnapshot};

use crate::{action::ForecastAction, event::ForecastEvent};

/// Primary-side responder. One instance per companion pairing.
#[derive(Debug, Default)]
pub struct ForecastResponder {
    session: SessionLink,
    /// Latest forecast from the host source.
    forecast: Option<WeatherSnapshot>,
    /// A send is owed once the session and peer become available.
    pending_publish: bool,
}

impl ForecastResponder {
    /// Create a responder with no forecast yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest forecast handed to us by the host source.
    #[must_use]
    pub fn forecast(&self) -> Option<&WeatherSnapshot> {
        self.forecast.as_ref()
    }

    /// Session state, for diagnostics.
    #[must_use]
    pub fn session_state(&self) -> &SessionState {
        self.session.state()
    }

    /// Whether a snapshot send is waiting for the session or peer.
    #[must_use]
    pub fn publish_pending(&self) -> bool {
        self.pending_publish
    }

    /// Handle one event from the host queue.
    pub fn handle(&mut self, event: ForecastEvent) -> Vec<ForecastAction> {
        match event {
            ForecastEvent::Started => {
                let actions = self.session.connect();
                self.run_session_actions(actions)
            },
            ForecastEvent::Stopped => {
                let actions = self.session.disconnect();
                self.run_session_actions(actions)
            },
            ForecastEvent::SessionConnected => {
                let actions = self.session.on_connected();
                self.run_session_actions(actions)
            },
            ForecastEvent::SessionSuspended { cause } => {
                let actions = self.session.on_suspended(&cause);
                self.run_session_actions(actions)
            },
            ForecastEvent::SessionFailed { reason } => {
                let actions = self.session.on_failed(reason);
                self.run_session_actions(actions)
            },
            ForecastEvent::PeersEnumerated { peers } => self.on_peers(peers),
            ForecastEvent::MessageReceived { channel, sender, .. } => {
                self.on_message(&channel, sender)
            },
            ForecastEvent::ForecastUpdated { snapshot } => {
                self.forecast = Some(snapshot);
                self.publish()
            },
        }
    }

    fn on_message(&mut self, channel: &str, sender: PeerId) -> Vec<ForecastAction> {
        if channel != REFRESH_REQUEST {
            debug!(channel, "ignoring message on unexpected channel");
            return Vec::new();
        }
        debug!(peer = %sender, "refresh requested");
        // The request arrived over the live session, so its sender is the
        // peer to answer; no enumeration round-trip needed.
        self.session.set_peer(sender);
        // Idempotent by design: every request triggers a fresh gather, and
        // the gather's completion sends the then-current snapshot.
        vec![ForecastAction::GatherForecast]
    }

    fn on_peers(&mut self, peers: Vec<PeerId>) -> Vec<ForecastAction> {
        let Some(peer) = peers.into_iter().next() else {
            warn!("no reachable peer; forecast stays held");
            return Vec::new();
        };
        self.session.set_peer(peer);
        if self.pending_publish { self.publish() } else { Vec::new() }
    }

    /// Try to push the held forecast to the companion.
    fn publish(&mut self) -> Vec<ForecastAction> {
        let Some(snapshot) = &self.forecast else {
            return Vec::new();
        };
        let payload = match snapshot.encode() {
            Ok(payload) => payload,
            Err(error) => {
                warn!(%error, "forecast not encodable; dropping it");
                return Vec::new();
            },
        };
        match self.session.send(WEATHER_SNAPSHOT, payload) {
            Ok(message) => {
                self.pending_publish = false;
                debug!(peer = %message.peer, "sending weather snapshot");
                vec![ForecastAction::Send {
                    channel: message.channel,
                    peer: message.peer,
                    payload: message.payload,
                }]
            },
            Err(SessionError::NoPeerReachable) => {
                self.pending_publish = true;
                vec![ForecastAction::EnumeratePeers]
            },
            Err(error @ SessionError::NotConnected { .. }) => {
                debug!(%error, "holding forecast until the session is up");
                self.pending_publish = true;
                let actions = self.session.connect();
                self.run_session_actions(actions)
            },
        }
    }

    fn run_session_actions(&mut self, actions: Vec<SessionAction>) -> Vec<ForecastAction> {
        let mut out = Vec::new();
        for action in actions {
            match action {
                SessionAction::Dial => out.push(ForecastAction::Connect),
                SessionAction::HangUp => out.push(ForecastAction::Disconnect),
                SessionAction::NotifyReady => out.push(ForecastAction::EnumeratePeers),
                SessionAction::NotifySuspended { cause } => {
                    warn!(%cause, "holding traffic until the session recovers");
                },
                SessionAction::NotifyLost { reason } => {
                    warn!(?reason, "session lost; reconnect waits for the next start or publish");
                },
            }
        }
        out
    }
}
