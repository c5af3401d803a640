//! End-to-end refresh cycle tests over the in-memory world.
//!
//! One companion face, one primary responder, a well-behaved link: verify
//! the full pull path (visible -> connect -> enumerate -> request -> gather
//! -> snapshot -> display) and the push path (unsolicited forecast sync).

use sundial_core::classify::{Condition, Theme};
use sundial_harness::World;
use sundial_proto::WeatherSnapshot;

fn forecast(high: &str, low: &str, today: i32, tomorrow: i32) -> WeatherSnapshot {
    WeatherSnapshot {
        today_high: high.to_owned(),
        today_low: low.to_owned(),
        today_condition: today,
        tomorrow_condition: tomorrow,
    }
}

#[test]
fn becoming_visible_pulls_weather_onto_the_face() {
    let mut world = World::new(7);
    world.set_source_forecast(forecast("25\u{00b0}", "16\u{00b0}", 501, 800));

    world.show_face();

    assert_eq!(world.refresh_requests_sent(), 1);
    assert_eq!(world.gathers(), 1);
    assert_eq!(world.snapshots_sent(), 1);
    assert!(!world.face().refresh_pending());

    let display = world.face().display();
    assert_eq!(display.snapshot.today_high, "25\u{00b0}");
    assert_eq!(display.snapshot.today_low, "16\u{00b0}");
    assert_eq!(display.today, Condition::HeavyRain);
    assert_eq!(display.theme, Theme::Rainy);
    assert_eq!(display.tomorrow, Condition::Clear);
    assert!(world.face_repaints() > 0);
}

#[test]
fn repeated_readiness_never_duplicates_the_refresh() {
    let mut world = World::new(7);
    world.show_face();
    assert_eq!(world.refresh_requests_sent(), 1);

    // Duplicate connected callback, then a suspension/resume round trip:
    // readiness is re-announced each time, the request is not.
    world.connect_face_session();
    world.suspend_face_session("radio contention");
    world.resume_face_session();
    assert_eq!(world.refresh_requests_sent(), 1);
    assert_eq!(world.face_dials(), 1);

    // A fresh visibility cycle owes a fresh request.
    world.hide_face();
    world.show_face();
    assert_eq!(world.refresh_requests_sent(), 2);
}

#[test]
fn each_request_triggers_a_fresh_gather_and_send() {
    let mut world = World::new(7);
    world.show_face();
    world.hide_face();
    world.show_face();

    // Two visibility cycles, two requests, two snapshots: the responder is
    // idempotent and simply answers again.
    assert_eq!(world.refresh_requests_sent(), 2);
    assert_eq!(world.gathers(), 2);
    assert_eq!(world.snapshots_sent(), 2);
}

#[test]
fn unsolicited_push_updates_the_face_and_last_write_wins() {
    let mut world = World::new(7);
    world.set_source_forecast(forecast("25\u{00b0}", "16\u{00b0}", 800, 800));
    world.show_face();
    assert_eq!(world.face().display().snapshot.today_condition, 800);

    // The primary's sync cycle pushes without being asked.
    world.push_forecast(forecast("4\u{00b0}", "-3\u{00b0}", 601, 211));

    let display = world.face().display();
    assert_eq!(display.snapshot.today_high, "4\u{00b0}");
    assert_eq!(display.today, Condition::Snow);
    assert_eq!(display.theme, Theme::Rainy);
    assert_eq!(display.tomorrow, Condition::Thunderstorm);
}

#[test]
fn push_before_any_session_brings_the_link_up() {
    let mut world = World::new(7);

    // The primary learns of new weather before anyone connected; it dials,
    // enumerates, and flushes the held forecast on its own.
    world.push_forecast(forecast("10\u{00b0}", "2\u{00b0}", 802, 802));

    assert_eq!(world.snapshots_sent(), 1);
    assert!(!world.primary().publish_pending());
    assert_eq!(world.face().display().snapshot.today_condition, 802);
}

#[test]
fn no_reachable_peer_leaves_the_refresh_pending_until_the_next_ready() {
    let mut world = World::new(7);
    world.set_peers_reachable(false);

    world.show_face();
    assert_eq!(world.refresh_requests_sent(), 0);
    assert!(world.face().refresh_pending());

    // The peer shows up; the next readiness announcement retries.
    world.set_peers_reachable(true);
    world.connect_face_session();
    assert_eq!(world.refresh_requests_sent(), 1);
    assert!(!world.face().refresh_pending());
}

#[test]
fn render_ticks_stay_second_aligned_through_the_world() {
    let mut world = World::new(7);
    world.show_face();

    // Immediate tick, then every subsequent fire is scheduled on a whole
    // second, however late the handler ran (up to 500ms).
    assert!(world.fire_render_timer(0));
    for jitter in [0, 499, 250, 500, 42] {
        let (_, fire_at) = world.pending_tick().expect("tick scheduled");
        assert_eq!(fire_at % 1_000, 0);
        assert!(world.fire_render_timer(jitter));
    }

    // Hiding the face stops the loop.
    world.hide_face();
    assert!(world.pending_tick().is_none());
    assert!(!world.fire_render_timer(0));
}
