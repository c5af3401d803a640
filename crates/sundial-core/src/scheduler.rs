//! Second-aligned render scheduler.
//!
//! A cooperative single-timer redraw loop: one scheduled callback
//! outstanding at a time, and every fire realigns the next one to the
//! upcoming wall-clock second boundary. Processing jitter inside a tick
//! therefore never accumulates into drift; each tick lands in its own
//! second regardless of how late the previous one ran (up to the interval).
//!
//! The scheduler never performs I/O. It hands the driver `ScheduleTick` /
//! `CancelTick` actions and expects the driver to call [`RenderScheduler::on_fire`]
//! with the token when the callback lands. Tokens are generation counters,
//! so a callback from a cancelled or superseded schedule is recognized as
//! stale and ignored.

use std::time::Duration;

/// Interval between interactive-mode repaints.
pub const TICK_INTERVAL_MS: u64 = 1_000;

/// Handle identifying one schedule generation.
///
/// `stop()` and every restart invalidate all previously issued tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickToken(u64);

/// Actions returned by the scheduler for the driver to execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerAction {
    /// Repaint the display from current state.
    Repaint,

    /// Arrange for [`RenderScheduler::on_fire`] to be invoked with `token`
    /// after `delay`.
    ScheduleTick {
        /// Token the driver hands back when the callback fires.
        token: TickToken,
        /// Delay until the callback.
        delay: Duration,
    },

    /// Cancel the outstanding scheduled callback, if one is still pending.
    CancelTick,
}

/// Render timer state machine.
///
/// Owned by exactly one engine and mutated only by that engine's
/// visibility/ambient transition handlers, never by the render callback
/// itself.
#[derive(Debug, Clone, Default)]
pub struct RenderScheduler {
    running: bool,
    generation: u64,
    next_fire_at_ms: Option<u64>,
}

impl RenderScheduler {
    /// Create a stopped scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the timer is running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Wall-clock milliseconds of the next aligned fire, once the first
    /// tick has realigned the schedule.
    #[must_use]
    pub fn next_fire_at_ms(&self) -> Option<u64> {
        self.next_fire_at_ms
    }

    /// Start ticking.
    ///
    /// Schedules an immediate callback; alignment to the second boundary
    /// happens on the first fire. A no-op while already running, or while
    /// the owner does not want ticks (`should_run` false).
    pub fn start(&mut self, should_run: bool) -> Vec<SchedulerAction> {
        if self.running || !should_run {
            return Vec::new();
        }
        self.running = true;
        self.generation += 1;
        vec![SchedulerAction::ScheduleTick {
            token: TickToken(self.generation),
            delay: Duration::ZERO,
        }]
    }

    /// Stop ticking. Idempotent.
    ///
    /// Any callback already in flight becomes a no-op: its token no longer
    /// matches the live generation once the scheduler restarts, and a
    /// stopped scheduler ignores fires outright.
    pub fn stop(&mut self) -> Vec<SchedulerAction> {
        if !self.running {
            return Vec::new();
        }
        self.running = false;
        self.next_fire_at_ms = None;
        vec![SchedulerAction::CancelTick]
    }

    /// Handle a fired callback.
    ///
    /// Stale tokens are ignored. A live fire repaints, then — while the
    /// owner still wants ticks — schedules the next callback after
    /// `TICK_INTERVAL_MS - (now_ms % TICK_INTERVAL_MS)`, landing it exactly
    /// on the next wall-clock second boundary.
    pub fn on_fire(
        &mut self,
        token: TickToken,
        now_ms: u64,
        should_run: bool,
    ) -> Vec<SchedulerAction> {
        if !self.running || token != TickToken(self.generation) {
            return Vec::new();
        }

        let mut actions = vec![SchedulerAction::Repaint];
        if should_run {
            let delay = TICK_INTERVAL_MS - (now_ms % TICK_INTERVAL_MS);
            self.next_fire_at_ms = Some(now_ms + delay);
            actions.push(SchedulerAction::ScheduleTick {
                token: TickToken(self.generation),
                delay: Duration::from_millis(delay),
            });
        } else {
            self.running = false;
            self.next_fire_at_ms = None;
        }
        actions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schedule_of(actions: &[SchedulerAction]) -> Option<(TickToken, Duration)> {
        actions.iter().find_map(|action| match action {
            SchedulerAction::ScheduleTick { token, delay } => Some((*token, *delay)),
            _ => None,
        })
    }

    #[test]
    fn start_schedules_an_immediate_tick() {
        let mut scheduler = RenderScheduler::new();
        let actions = scheduler.start(true);
        let (_, delay) = schedule_of(&actions).unwrap();
        assert_eq!(delay, Duration::ZERO);
        assert!(scheduler.is_running());
    }

    #[test]
    fn start_is_a_noop_while_running_or_unwanted() {
        let mut scheduler = RenderScheduler::new();
        assert!(scheduler.start(false).is_empty());
        assert!(!scheduler.is_running());

        scheduler.start(true);
        assert!(scheduler.start(true).is_empty());
    }

    #[test]
    fn fires_realign_to_second_boundaries() {
        let mut scheduler = RenderScheduler::new();
        let (token, _) = schedule_of(&scheduler.start(true)).unwrap();

        // First fire lands mid-second; the next is aligned.
        let actions = scheduler.on_fire(token, 1_234, true);
        assert_eq!(actions[0], SchedulerAction::Repaint);
        let (token, delay) = schedule_of(&actions).unwrap();
        assert_eq!(delay, Duration::from_millis(766));
        assert_eq!(scheduler.next_fire_at_ms(), Some(2_000));

        // A fire exactly on a boundary schedules a full interval.
        let actions = scheduler.on_fire(token, 2_000, true);
        let (_, delay) = schedule_of(&actions).unwrap();
        assert_eq!(delay, Duration::from_millis(1_000));
        assert_eq!(scheduler.next_fire_at_ms(), Some(3_000));
    }

    #[test]
    fn processing_jitter_does_not_accumulate() {
        let mut scheduler = RenderScheduler::new();
        let (mut token, _) = schedule_of(&scheduler.start(true)).unwrap();

        // Each tick is handled up to 500ms late; every next fire must still
        // land on the following second boundary rather than drifting.
        let mut fire_at = 137;
        for jitter in [0, 499, 250, 500, 1, 333, 500, 42] {
            let actions = scheduler.on_fire(token, fire_at + jitter, true);
            let next = scheduler.next_fire_at_ms().unwrap();
            assert_eq!(next % TICK_INTERVAL_MS, 0);
            assert!(next > fire_at + jitter);
            assert!(next <= fire_at + jitter + TICK_INTERVAL_MS);
            token = schedule_of(&actions).unwrap().0;
            fire_at = next;
        }
    }

    #[test]
    fn stop_is_idempotent_and_cancels_in_flight_fires() {
        let mut scheduler = RenderScheduler::new();
        let (token, _) = schedule_of(&scheduler.start(true)).unwrap();

        assert_eq!(scheduler.stop(), vec![SchedulerAction::CancelTick]);
        assert!(scheduler.stop().is_empty());

        // The callback the driver failed to cancel fires anyway: no-op.
        assert!(scheduler.on_fire(token, 5_000, true).is_empty());
    }

    #[test]
    fn restart_invalidates_old_tokens() {
        let mut scheduler = RenderScheduler::new();
        let (stale, _) = schedule_of(&scheduler.start(true)).unwrap();
        scheduler.stop();
        let (live, _) = schedule_of(&scheduler.start(true)).unwrap();

        assert!(scheduler.on_fire(stale, 1_000, true).is_empty());
        assert_eq!(scheduler.on_fire(live, 1_000, true).len(), 2);
    }

    #[test]
    fn fire_without_demand_repaints_once_and_stops() {
        let mut scheduler = RenderScheduler::new();
        let (token, _) = schedule_of(&scheduler.start(true)).unwrap();

        let actions = scheduler.on_fire(token, 1_500, false);
        assert_eq!(actions, vec![SchedulerAction::Repaint]);
        assert!(!scheduler.is_running());
        assert_eq!(scheduler.next_fire_at_ms(), None);
    }
}
