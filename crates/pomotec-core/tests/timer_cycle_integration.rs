//! Integration tests for the controller driven through the public API.

use std::sync::Arc;
use std::time::Duration;

use pomotec_core::{
    ChannelSink, Config, Event, MessagePicker, Phase, PermissionGate, PhaseTimer,
    TimerController, TimerStatus,
};
use tempfile::TempDir;
use tokio::time::sleep;

fn short_config(dir: &TempDir) -> Config {
    let path = dir.path().join("config.toml");
    let mut cfg = Config::load_from(&path).unwrap();
    cfg.set("durations.focus_minutes", "2").unwrap();
    cfg.set("durations.break_minutes", "1").unwrap();
    cfg.save_to(&path).unwrap();
    Config::load_from(&path).unwrap()
}

#[tokio::test(start_paused = true)]
async fn configured_durations_drive_several_cycles() {
    let dir = TempDir::new().unwrap();
    let cfg = short_config(&dir);

    let (sink, mut alerts) = ChannelSink::new();
    let gate = PermissionGate::new(sink, cfg.permission());
    let timer = PhaseTimer::with_messages(cfg.durations(), MessagePicker::seeded(5));
    let handle = TimerController::spawn(timer, Arc::new(gate));

    let state = handle.start_focus_session().await.unwrap();
    assert_eq!(state.display, "02:00");

    // Three full focus+break cycles, observed half a second past the end.
    sleep(Duration::from_millis(3 * (120_000 + 60_000) + 500)).await;
    let state = handle.state();
    assert_eq!(state.status(), TimerStatus::FocusRunning);
    assert_eq!(state.display, "02:00");

    let mut phases = Vec::new();
    while let Ok(req) = alerts.try_recv() {
        phases.push(req.phase);
    }
    assert_eq!(
        phases,
        vec![
            Phase::Focus,
            Phase::Break,
            Phase::Focus,
            Phase::Break,
            Phase::Focus,
            Phase::Break,
            Phase::Focus,
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn disabled_notifications_still_cycle() {
    let dir = TempDir::new().unwrap();
    let mut cfg = short_config(&dir);
    cfg.set("notifications.enabled", "false").unwrap();

    let (sink, mut alerts) = ChannelSink::new();
    let gate = PermissionGate::new(sink, cfg.permission());
    let handle = TimerController::spawn(PhaseTimer::new(cfg.durations()), Arc::new(gate));

    handle.start_focus_session().await;
    sleep(Duration::from_millis(120_500)).await;
    assert_eq!(handle.state().phase, Phase::Break);
    assert!(alerts.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn any_handle_clone_can_skip_the_break() {
    let (sink, _alerts) = ChannelSink::new();
    let timer = PhaseTimer::new(Config::default().durations());
    let handle = TimerController::spawn(timer, Arc::new(sink));
    let skip_button = handle.clone();

    handle.start_focus_session().await;
    sleep(Duration::from_millis(25 * 60 * 1000 + 10_500)).await;
    assert_eq!(handle.state().status(), TimerStatus::BreakRunning);

    let state = skip_button.skip_break().await.unwrap();
    assert_eq!(state.status(), TimerStatus::FocusRunning);
    assert_eq!(handle.state().display, "25:00");
}

#[tokio::test(start_paused = true)]
async fn events_serialize_as_json_lines() {
    let (sink, _alerts) = ChannelSink::new();
    let handle = TimerController::spawn(
        PhaseTimer::with_messages(Default::default(), MessagePicker::seeded(1)),
        Arc::new(sink),
    );
    let mut events = handle.events();

    handle.start_focus_session().await;
    sleep(Duration::from_millis(1_500)).await;
    handle.reset_timer().await;

    let mut lines = Vec::new();
    while let Ok(event) = events.try_recv() {
        lines.push(serde_json::to_string(&event).unwrap());
    }
    let kinds: Vec<String> = lines
        .iter()
        .map(|l| {
            let v: serde_json::Value = serde_json::from_str(l).unwrap();
            v["type"].as_str().unwrap().to_string()
        })
        .collect();
    assert_eq!(kinds, ["phase_started", "timer_started", "tick", "timer_reset"]);

    let tick: Event = serde_json::from_str(&lines[2]).unwrap();
    match tick {
        Event::Tick { display, .. } => assert_eq!(display, "24:59"),
        other => panic!("expected tick, got {other:?}"),
    }
}
