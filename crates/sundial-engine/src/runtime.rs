//! Generic orchestration loop.
//!
//! [`Runtime`] owns a [`FaceEngine`] and a [`Driver`], feeds events through
//! the engine one at a time, and executes the resulting actions. This is
//! the single cooperative event queue of the companion: transport
//! callbacks, lifecycle signals, and timer fires all pass through
//! [`Runtime::dispatch`] serially.

use tracing::warn;

use crate::{action::FaceAction, driver::Driver, event::FaceEvent, face::FaceEngine};

/// Orchestration loop binding a [`FaceEngine`] to a platform [`Driver`].
#[derive(Debug)]
pub struct Runtime<D: Driver> {
    driver: D,
    engine: FaceEngine,
}

impl<D: Driver> Runtime<D> {
    /// Create a runtime around a fresh engine.
    pub fn new(driver: D) -> Self {
        Self { driver, engine: FaceEngine::new() }
    }

    /// The engine, for inspecting display and session state.
    #[must_use]
    pub fn engine(&self) -> &FaceEngine {
        &self.engine
    }

    /// The driver.
    #[must_use]
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// The driver, mutably (tests use this to queue events).
    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    /// Feed one event through the engine and execute the resulting actions.
    pub fn dispatch(&mut self, event: FaceEvent) {
        let now_ms = self.driver.now_ms();
        for action in self.engine.handle(event, now_ms) {
            self.execute(action);
        }
    }

    /// Drain the driver's event queue.
    pub fn pump(&mut self) {
        while let Some(event) = self.driver.poll_event() {
            self.dispatch(event);
        }
    }

    fn execute(&mut self, action: FaceAction) {
        match action {
            FaceAction::Connect => self.driver.connect(),
            FaceAction::Disconnect => self.driver.disconnect(),
            FaceAction::EnumeratePeers => self.driver.enumerate_peers(),
            FaceAction::Send { channel, peer, payload } => {
                if let Err(error) = self.driver.send(channel, &peer, payload) {
                    // Best effort: the next visibility cycle is the retry.
                    warn!(%error, channel, "send failed");
                }
            },
            FaceAction::ScheduleTick { token, delay } => self.driver.schedule_tick(token, delay),
            FaceAction::CancelTick => self.driver.cancel_tick(),
            FaceAction::Repaint => self.driver.repaint(),
            FaceAction::SetAntiAlias { enabled } => self.driver.set_anti_alias(enabled),
        }
    }
}
