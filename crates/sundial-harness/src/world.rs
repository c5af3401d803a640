//! In-memory world pairing one companion with one primary.
//!
//! The world executes both engines' actions against a simulated link:
//! connects complete synchronously (unless disabled), peer enumeration
//! answers with the opposite endpoint, and sends are routed to the other
//! side's message handler, optionally dropped by a seeded RNG. Counters and
//! accessors let tests verify global behavior the way an oracle would.

use bytes::Bytes;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sundial_core::scheduler::TickToken;
use sundial_engine::{
    FaceAction, FaceEngine, FaceEvent, ForecastAction, ForecastEvent, ForecastResponder,
};
use sundial_proto::{PeerId, REFRESH_REQUEST, WEATHER_SNAPSHOT, WeatherSnapshot};

use crate::clock::VirtualClock;

/// World state: one face, one responder, one fallible link between them.
pub struct World {
    clock: VirtualClock,
    face: FaceEngine,
    primary: ForecastResponder,
    /// Forecast the scripted weather source answers gathers with.
    source: WeatherSnapshot,
    companion_id: PeerId,
    primary_id: PeerId,
    auto_connect: bool,
    auto_gather: bool,
    peers_reachable: bool,
    drop_rate: f64,
    rng: ChaCha8Rng,
    pending_tick: Option<(TickToken, u64)>,
    face_dials: usize,
    face_hangups: usize,
    face_repaints: usize,
    primary_dials: usize,
    primary_hangups: usize,
    refresh_requests_sent: usize,
    snapshots_sent: usize,
    gathers: usize,
    dropped: usize,
    anti_alias: Option<bool>,
}

impl World {
    /// Create a world with a seeded RNG, starting at an uneven wall-clock
    /// offset so alignment bugs show up.
    pub fn new(seed: u64) -> Self {
        Self {
            clock: VirtualClock::new(137),
            face: FaceEngine::new(),
            primary: ForecastResponder::new(),
            source: WeatherSnapshot::default(),
            companion_id: PeerId::new("companion"),
            primary_id: PeerId::new("primary"),
            auto_connect: true,
            auto_gather: true,
            peers_reachable: true,
            drop_rate: 0.0,
            rng: ChaCha8Rng::seed_from_u64(seed),
            pending_tick: None,
            face_dials: 0,
            face_hangups: 0,
            face_repaints: 0,
            primary_dials: 0,
            primary_hangups: 0,
            refresh_requests_sent: 0,
            snapshots_sent: 0,
            gathers: 0,
            dropped: 0,
            anti_alias: None,
        }
    }

    /// The companion engine.
    #[must_use]
    pub fn face(&self) -> &FaceEngine {
        &self.face
    }

    /// The primary responder.
    #[must_use]
    pub fn primary(&self) -> &ForecastResponder {
        &self.primary
    }

    /// Current wall-clock milliseconds.
    #[must_use]
    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    /// Script the forecast the weather source will answer gathers with.
    pub fn set_source_forecast(&mut self, snapshot: WeatherSnapshot) {
        self.source = snapshot;
    }

    /// Control whether connect calls complete on their own.
    pub fn set_auto_connect(&mut self, auto: bool) {
        self.auto_connect = auto;
    }

    /// Control whether gathers complete on their own.
    pub fn set_auto_gather(&mut self, auto: bool) {
        self.auto_gather = auto;
    }

    /// Control whether peer enumeration finds the counterpart.
    pub fn set_peers_reachable(&mut self, reachable: bool) {
        self.peers_reachable = reachable;
    }

    /// Probability in `[0, 1]` that any send is silently lost in flight.
    pub fn set_drop_rate(&mut self, rate: f64) {
        self.drop_rate = rate;
    }

    /// Number of transport dials issued by the face.
    #[must_use]
    pub fn face_dials(&self) -> usize {
        self.face_dials
    }

    /// Number of transport releases issued by the face.
    #[must_use]
    pub fn face_hangups(&self) -> usize {
        self.face_hangups
    }

    /// Number of repaints requested by the face.
    #[must_use]
    pub fn face_repaints(&self) -> usize {
        self.face_repaints
    }

    /// Number of transport dials issued by the primary.
    #[must_use]
    pub fn primary_dials(&self) -> usize {
        self.primary_dials
    }

    /// Number of transport releases issued by the primary.
    #[must_use]
    pub fn primary_hangups(&self) -> usize {
        self.primary_hangups
    }

    /// Refresh requests the face handed to the transport.
    #[must_use]
    pub fn refresh_requests_sent(&self) -> usize {
        self.refresh_requests_sent
    }

    /// Snapshots the primary handed to the transport.
    #[must_use]
    pub fn snapshots_sent(&self) -> usize {
        self.snapshots_sent
    }

    /// Gathers the primary asked of the weather source.
    #[must_use]
    pub fn gathers(&self) -> usize {
        self.gathers
    }

    /// Sends lost in flight.
    #[must_use]
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Last anti-alias toggle seen from the face.
    #[must_use]
    pub fn anti_alias(&self) -> Option<bool> {
        self.anti_alias
    }

    /// The scheduled render tick, if one is pending.
    #[must_use]
    pub fn pending_tick(&self) -> Option<(TickToken, u64)> {
        self.pending_tick
    }

    // --- companion-side stimuli ---

    /// The watch face became visible.
    pub fn show_face(&mut self) {
        self.dispatch_face(FaceEvent::VisibilityChanged { visible: true });
    }

    /// The watch face was hidden.
    pub fn hide_face(&mut self) {
        self.dispatch_face(FaceEvent::VisibilityChanged { visible: false });
    }

    /// Ambient mode flipped.
    pub fn set_ambient(&mut self, ambient: bool) {
        self.dispatch_face(FaceEvent::AmbientModeChanged { ambient });
    }

    /// Host reported display properties.
    pub fn set_low_bit_ambient(&mut self, low_bit_ambient: bool) {
        self.dispatch_face(FaceEvent::PropertiesChanged { low_bit_ambient });
    }

    /// Complete an outstanding face-side connect by hand (with
    /// auto-connect off), or deliver a duplicate connected callback.
    pub fn connect_face_session(&mut self) {
        self.dispatch_face(FaceEvent::SessionConnected);
    }

    /// Suspend the face-side session.
    pub fn suspend_face_session(&mut self, cause: &str) {
        self.dispatch_face(FaceEvent::SessionSuspended { cause: cause.to_owned() });
    }

    /// Recover the face-side session from suspension.
    pub fn resume_face_session(&mut self) {
        self.dispatch_face(FaceEvent::SessionConnected);
    }

    /// Fail the face-side session.
    pub fn fail_face_session(&mut self, reason: &str) {
        self.dispatch_face(FaceEvent::SessionFailed { reason: reason.to_owned() });
    }

    /// Deliver raw bytes to the face as if the primary had sent them.
    pub fn inject_face_message(&mut self, channel: &str, payload: Bytes) {
        let sender = self.primary_id.clone();
        self.dispatch_face(FaceEvent::MessageReceived {
            channel: channel.to_owned(),
            sender,
            payload,
        });
    }

    /// Let the pending render tick elapse and be handled `jitter_ms` late.
    ///
    /// Returns false when no tick was pending.
    pub fn fire_render_timer(&mut self, jitter_ms: u64) -> bool {
        let Some((token, fire_at)) = self.pending_tick.take() else {
            return false;
        };
        self.clock.set(fire_at + jitter_ms);
        self.dispatch_face(FaceEvent::RenderTimerFired { token });
        true
    }

    // --- primary-side stimuli ---

    /// Start the primary's host service.
    pub fn start_primary(&mut self) {
        self.dispatch_primary(ForecastEvent::Started);
    }

    /// Stop the primary's host service.
    pub fn stop_primary(&mut self) {
        self.dispatch_primary(ForecastEvent::Stopped);
    }

    /// Push a forecast from the primary's weather source (an unsolicited
    /// sync, or a manual gather completion with auto-gather off).
    pub fn push_forecast(&mut self, snapshot: WeatherSnapshot) {
        self.dispatch_primary(ForecastEvent::ForecastUpdated { snapshot });
    }

    // --- plumbing ---

    fn dispatch_face(&mut self, event: FaceEvent) {
        let now_ms = self.clock.now_ms();
        let actions = self.face.handle(event, now_ms);
        self.run_face_actions(actions);
    }

    fn dispatch_primary(&mut self, event: ForecastEvent) {
        let actions = self.primary.handle(event);
        self.run_primary_actions(actions);
    }

    fn run_face_actions(&mut self, actions: Vec<FaceAction>) {
        for action in actions {
            match action {
                FaceAction::Connect => {
                    self.face_dials += 1;
                    if self.auto_connect {
                        self.dispatch_face(FaceEvent::SessionConnected);
                    }
                },
                FaceAction::Disconnect => self.face_hangups += 1,
                FaceAction::EnumeratePeers => {
                    let peers = if self.peers_reachable {
                        vec![self.primary_id.clone()]
                    } else {
                        Vec::new()
                    };
                    self.dispatch_face(FaceEvent::PeersEnumerated { peers });
                },
                FaceAction::Send { channel, payload, .. } => {
                    if channel == REFRESH_REQUEST {
                        self.refresh_requests_sent += 1;
                    }
                    if self.lost_in_flight() {
                        self.dropped += 1;
                        continue;
                    }
                    let sender = self.companion_id.clone();
                    self.dispatch_primary(ForecastEvent::MessageReceived {
                        channel: channel.to_owned(),
                        sender,
                        payload,
                    });
                },
                FaceAction::ScheduleTick { token, delay } => {
                    let fire_at = self.clock.now_ms() + delay.as_millis() as u64;
                    self.pending_tick = Some((token, fire_at));
                },
                FaceAction::CancelTick => self.pending_tick = None,
                FaceAction::Repaint => self.face_repaints += 1,
                FaceAction::SetAntiAlias { enabled } => self.anti_alias = Some(enabled),
            }
        }
    }

    fn run_primary_actions(&mut self, actions: Vec<ForecastAction>) {
        for action in actions {
            match action {
                ForecastAction::Connect => {
                    self.primary_dials += 1;
                    if self.auto_connect {
                        self.dispatch_primary(ForecastEvent::SessionConnected);
                    }
                },
                ForecastAction::Disconnect => self.primary_hangups += 1,
                ForecastAction::EnumeratePeers => {
                    let peers = if self.peers_reachable {
                        vec![self.companion_id.clone()]
                    } else {
                        Vec::new()
                    };
                    self.dispatch_primary(ForecastEvent::PeersEnumerated { peers });
                },
                ForecastAction::Send { channel, payload, .. } => {
                    if channel == WEATHER_SNAPSHOT {
                        self.snapshots_sent += 1;
                    }
                    if self.lost_in_flight() {
                        self.dropped += 1;
                        continue;
                    }
                    let sender = self.primary_id.clone();
                    self.dispatch_face(FaceEvent::MessageReceived {
                        channel: channel.to_owned(),
                        sender,
                        payload,
                    });
                },
                ForecastAction::GatherForecast => {
                    self.gathers += 1;
                    if self.auto_gather {
                        let snapshot = self.source.clone();
                        self.dispatch_primary(ForecastEvent::ForecastUpdated { snapshot });
                    }
                },
            }
        }
    }

    fn lost_in_flight(&mut self) -> bool {
        let lost = self.drop_rate > 0.0 && self.rng.gen_range(0.0..1.0) < self.drop_rate;
        if lost {
            tracing::debug!("dropping a send in flight");
        }
        lost
    }
}
