//! Integration tests for Telecast Core

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use telecast_core::{
    read_from_value, to_value, AnalyticsEmitter, AnalyticsRelay, EgressKind, Error, LivePlayer,
    MediaEngine, MediaErrorKind, MediaSignal, PlayerEvent, PlayerListener, PlayerState,
    ReconnectPolicy, TelecastVideoPlugin, VideoCategory, VideoCategoryBehavior,
};
use tokio::sync::{mpsc, watch};

// =============================================================================
// Test fixtures
// =============================================================================

const HLS_URL: &str = "https://cdn.example.com/live.m3u8";

fn live_resource(identifier: &str, egress: &[(EgressKind, &str)]) -> telecast_core::LiveResource {
    telecast_core::LiveResource::new(
        identifier,
        HashMap::new(),
        HashMap::new(),
        egress
            .iter()
            .map(|(kind, point)| (*kind, point.to_string()))
            .collect(),
    )
}

#[derive(Default)]
struct EngineInner {
    sources: Vec<String>,
    started: u32,
    paused: u32,
    seeks: Vec<Duration>,
    playing: bool,
    position: Duration,
    duration: Option<Duration>,
}

/// Engine double that records every command and plays back scripted
/// position/duration values.
#[derive(Clone, Default)]
struct RecordingEngine {
    inner: Arc<Mutex<EngineInner>>,
}

impl RecordingEngine {
    fn sources(&self) -> Vec<String> {
        self.inner.lock().unwrap().sources.clone()
    }

    fn started(&self) -> u32 {
        self.inner.lock().unwrap().started
    }

    fn paused(&self) -> u32 {
        self.inner.lock().unwrap().paused
    }

    fn seeks(&self) -> Vec<Duration> {
        self.inner.lock().unwrap().seeks.clone()
    }

    fn set_position(&self, position: Duration) {
        self.inner.lock().unwrap().position = position;
    }

    fn set_duration(&self, duration: Option<Duration>) {
        self.inner.lock().unwrap().duration = duration;
    }
}

impl MediaEngine for RecordingEngine {
    fn set_source(&mut self, source: &str) {
        self.inner.lock().unwrap().sources.push(source.to_string());
    }

    fn start(&mut self) {
        let mut inner = self.inner.lock().unwrap();
        inner.started += 1;
        inner.playing = true;
    }

    fn pause(&mut self) {
        let mut inner = self.inner.lock().unwrap();
        inner.paused += 1;
        inner.playing = false;
    }

    fn seek_to(&mut self, position: Duration) {
        self.inner.lock().unwrap().seeks.push(position);
    }

    fn position(&self) -> Duration {
        self.inner.lock().unwrap().position
    }

    fn duration(&self) -> Option<Duration> {
        self.inner.lock().unwrap().duration
    }

    fn is_playing(&self) -> bool {
        self.inner.lock().unwrap().playing
    }
}

/// Listener double that forwards every callback into a channel.
struct EventLog {
    events: mpsc::UnboundedSender<PlayerEvent>,
}

fn event_log() -> (EventLog, mpsc::UnboundedReceiver<PlayerEvent>) {
    let (events, rx) = mpsc::unbounded_channel();
    (EventLog { events }, rx)
}

impl PlayerListener for EventLog {
    fn on_state_change(&mut self, from: PlayerState, to: PlayerState) {
        let _ = self.events.send(PlayerEvent::StateChange { from, to });
    }

    fn on_preparing(&mut self, duration: Option<Duration>) {
        let _ = self.events.send(PlayerEvent::Preparing { duration });
    }

    fn on_ready(&mut self) {
        let _ = self.events.send(PlayerEvent::Ready);
    }

    fn on_play(&mut self, position: Duration) {
        let _ = self.events.send(PlayerEvent::Play { position });
    }

    fn on_pause(&mut self, position: Duration) {
        let _ = self.events.send(PlayerEvent::Pause { position });
    }

    fn on_end(&mut self, duration: Option<Duration>) {
        let _ = self.events.send(PlayerEvent::End { duration });
    }

    fn on_seek(&mut self, from: Duration, to: Duration) {
        let _ = self.events.send(PlayerEvent::Seek { from, to });
    }

    fn on_buffering_start(&mut self, position: Duration) {
        let _ = self.events.send(PlayerEvent::BufferingStart { position });
    }

    fn on_buffering_complete(&mut self, position: Duration) {
        let _ = self.events.send(PlayerEvent::BufferingComplete { position });
    }

    fn on_touch(&mut self, event: telecast_core::player::TouchEvent) {
        let _ = self.events.send(PlayerEvent::Touch(event));
    }
}

/// Wait until every command submitted so far has been processed. Queries
/// round-trip through the driver task, so a completed query is a barrier.
async fn settle(player: &LivePlayer) {
    let _ = player.position().await;
}

async fn wait_for_state(states: &mut watch::Receiver<PlayerState>, target: PlayerState) {
    while *states.borrow_and_update() != target {
        states.changed().await.unwrap();
    }
}

// =============================================================================
// Configuration Tests
// =============================================================================

fn mixed_document() -> serde_json::Value {
    serde_json::json!({
        "myStream": {
            "type": "LIVE",
            "ingress": { "primary": "rtmp://ingest.example.com/live" },
            "keys": { "primary": "sk-1" },
            "egress": { "hls": HLS_URL }
        },
        "myAsset": {
            "type": "ON_DEMAND",
            "input": "uploads-bucket",
            "output": "renditions-bucket"
        }
    })
}

#[test]
fn test_mixed_document_parses_both_resources() {
    let configuration = read_from_value(&mixed_document()).unwrap();

    assert_eq!(configuration.live_resources().len(), 1);
    assert_eq!(configuration.on_demand_resources().len(), 1);
    assert!(configuration.live_resource("myStream").is_some());
    assert!(configuration.on_demand_resource("myAsset").is_some());
    assert!(configuration.live_resource("myAsset").is_none());
}

#[test]
fn test_unknown_resource_type_is_configuration_error() {
    let document = serde_json::json!({
        "weird": { "type": "HOLOGRAM" }
    });
    assert!(matches!(
        read_from_value(&document).unwrap_err(),
        Error::UnknownResourceType(name) if name == "HOLOGRAM"
    ));
}

#[test]
fn test_configuration_round_trip() {
    let original = read_from_value(&mixed_document()).unwrap();
    let reread = read_from_value(&to_value(&original)).unwrap();
    assert_eq!(original, reread);
}

// =============================================================================
// Category & Plugin Tests
// =============================================================================

fn configured_category() -> VideoCategory {
    let mut category = VideoCategory::new();
    category
        .add_plugin(Box::new(TelecastVideoPlugin::new()))
        .unwrap();
    category
        .configure(&serde_json::json!({
            "plugins": { "telecastVideoPlugin": mixed_document() }
        }))
        .unwrap();
    category
}

#[test]
fn test_category_delegates_to_plugin() {
    let category = configured_category();

    let live = category.live_resources().unwrap();
    assert_eq!(live.len(), 1);
    let resource = category.live_resource("myStream").unwrap().unwrap();
    assert_eq!(resource.egress_point(EgressKind::Hls), Some(HLS_URL));
    assert!(category.on_demand_resource("myAsset").unwrap().is_some());
    assert!(category.live_resource("missing").unwrap().is_none());
}

#[test]
fn test_category_resolves_egress_url() {
    let category = configured_category();
    let url = category.egress_for("myStream").unwrap().unwrap();
    assert_eq!(url.as_str(), HLS_URL);
    assert!(category.egress_for("missing").unwrap().is_none());
}

// =============================================================================
// Player State Machine Tests
// =============================================================================

#[tokio::test]
async fn test_attach_selects_single_configured_egress() {
    let engine = RecordingEngine::default();
    let player = LivePlayer::new(engine.clone());

    player.attach(live_resource("myStream", &[(EgressKind::Cmaf, "x")]));
    settle(&player).await;

    assert_eq!(player.state(), PlayerState::Preparing);
    assert_eq!(engine.sources(), ["x"]);
    assert_eq!(engine.started(), 1);
}

#[tokio::test]
async fn test_attach_prefers_egress_priority_order() {
    let engine = RecordingEngine::default();
    let player = LivePlayer::new(engine.clone());

    player.attach(live_resource(
        "myStream",
        &[
            (EgressKind::Mediastore, "https://store.example.com/live"),
            (EgressKind::Dash, "https://cdn.example.com/live.mpd"),
        ],
    ));
    settle(&player).await;

    assert_eq!(engine.sources(), ["https://cdn.example.com/live.mpd"]);
}

#[tokio::test]
async fn test_attach_without_egress_leaves_source_unset() {
    let engine = RecordingEngine::default();
    let player = LivePlayer::new(engine.clone());

    player.attach(live_resource("silent", &[]));
    settle(&player).await;

    assert_eq!(player.state(), PlayerState::Preparing);
    assert!(engine.sources().is_empty());
    assert_eq!(engine.started(), 0);
}

#[tokio::test]
async fn test_prepared_signal_moves_to_ready() {
    let engine = RecordingEngine::default();
    let player = LivePlayer::new(engine.clone());

    player.attach(live_resource("myStream", &[(EgressKind::Hls, HLS_URL)]));
    player.signal(MediaSignal::Prepared);
    settle(&player).await;

    assert_eq!(player.state(), PlayerState::Ready);
}

#[tokio::test]
async fn test_completion_ends_playback() {
    let engine = RecordingEngine::default();
    engine.set_duration(Some(Duration::from_secs(90)));
    let (log, mut rx) = event_log();
    let player = LivePlayer::new(engine.clone());
    player.add_listener(log);

    player.attach(live_resource("myStream", &[(EgressKind::Hls, HLS_URL)]));
    player.signal(MediaSignal::Completed);
    settle(&player).await;

    assert_eq!(player.state(), PlayerState::Ended);
    loop {
        match rx.recv().await.unwrap() {
            PlayerEvent::End { duration } => {
                assert_eq!(duration, Some(Duration::from_secs(90)));
                break;
            }
            _ => {}
        }
    }
}

#[tokio::test]
async fn test_play_and_pause_ignore_stream_health() {
    let engine = RecordingEngine::default();
    let player = LivePlayer::new(engine.clone());

    player.attach(live_resource("myStream", &[(EgressKind::Hls, HLS_URL)]));
    player.pause();
    settle(&player).await;
    assert_eq!(player.state(), PlayerState::Idle);

    player.play();
    settle(&player).await;
    assert_eq!(player.state(), PlayerState::Playing);

    player.signal(MediaSignal::Completed);
    player.play();
    settle(&player).await;
    assert_eq!(player.state(), PlayerState::Playing);

    player.signal(MediaSignal::BufferingStarted);
    player.pause();
    settle(&player).await;
    assert_eq!(player.state(), PlayerState::Idle);
}

#[tokio::test]
async fn test_seek_commands_engine_and_notifies() {
    let engine = RecordingEngine::default();
    engine.set_position(Duration::from_secs(7));
    let (log, mut rx) = event_log();
    let player = LivePlayer::new(engine.clone());
    player.add_listener(log);

    player.seek(Duration::from_secs(42));
    settle(&player).await;

    assert_eq!(engine.seeks(), [Duration::from_secs(42)]);
    assert_eq!(
        rx.recv().await,
        Some(PlayerEvent::Seek {
            from: Duration::from_secs(7),
            to: Duration::from_secs(42),
        })
    );
    // A seek is a notification, not a transition
    assert_eq!(player.state(), PlayerState::Idle);
}

#[tokio::test]
async fn test_touch_down_toggles_play_pause() {
    use telecast_core::player::{TouchEvent, TouchPhase};

    let engine = RecordingEngine::default();
    let player = LivePlayer::new(engine.clone());

    player.touch(TouchEvent::new(TouchPhase::Down, 10.0, 20.0));
    settle(&player).await;
    assert_eq!(player.state(), PlayerState::Playing);
    assert_eq!(engine.started(), 1);

    player.touch(TouchEvent::new(TouchPhase::Down, 10.0, 20.0));
    settle(&player).await;
    assert_eq!(player.state(), PlayerState::Idle);
    assert_eq!(engine.paused(), 1);

    // Other phases only notify
    player.touch(TouchEvent::new(TouchPhase::Moved, 15.0, 20.0));
    settle(&player).await;
    assert_eq!(engine.started(), 1);
    assert_eq!(engine.paused(), 1);
}

// =============================================================================
// Reconnect Tests
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_buffering_schedules_one_reconnect_after_fixed_delay() {
    let engine = RecordingEngine::default();
    let player = LivePlayer::new(engine.clone());
    let mut states = player.subscribe_state();

    player.attach(live_resource("flaky", &[(EgressKind::Hls, HLS_URL)]));
    player.signal(MediaSignal::BufferingStarted);
    wait_for_state(&mut states, PlayerState::Buffering).await;
    assert_eq!(engine.sources().len(), 1);

    // The retry re-runs the attach sequence with the retained resource
    wait_for_state(&mut states, PlayerState::Preparing).await;
    settle(&player).await;
    assert_eq!(engine.sources().len(), 2);
    assert_eq!(engine.sources()[1], HLS_URL);
}

#[tokio::test(start_paused = true)]
async fn test_double_buffering_start_transitions_once() {
    let engine = RecordingEngine::default();
    let (log, mut rx) = event_log();
    let player = LivePlayer::new(engine.clone());
    player.add_listener(log);

    player.attach(live_resource("flaky", &[(EgressKind::Hls, HLS_URL)]));
    player.signal(MediaSignal::BufferingStarted);
    player.signal(MediaSignal::BufferingStarted);
    player.signal(MediaSignal::Prepared);

    let mut buffering_transitions = 0;
    let mut buffering_events = 0;
    loop {
        match rx.recv().await.unwrap() {
            PlayerEvent::StateChange {
                to: PlayerState::Buffering,
                ..
            } => buffering_transitions += 1,
            PlayerEvent::BufferingStart { .. } => buffering_events += 1,
            PlayerEvent::Ready => break,
            _ => {}
        }
    }
    assert_eq!(buffering_transitions, 1);
    assert_eq!(buffering_events, 1);

    // Both stall signals collapsed into a single pending attempt
    tokio::time::sleep(Duration::from_secs(12)).await;
    settle(&player).await;
    assert_eq!(engine.sources().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_rendering_start_cancels_pending_reconnect() {
    let engine = RecordingEngine::default();
    let player = LivePlayer::new(engine.clone());
    let mut states = player.subscribe_state();

    player.attach(live_resource("flaky", &[(EgressKind::Hls, HLS_URL)]));
    player.signal(MediaSignal::BufferingStarted);
    wait_for_state(&mut states, PlayerState::Buffering).await;

    player.signal(MediaSignal::RenderingStarted);
    settle(&player).await;
    assert_eq!(player.state(), PlayerState::Playing);

    // Well past the retry delay; the cancelled attempt must never run
    tokio::time::sleep(Duration::from_secs(30)).await;
    settle(&player).await;
    assert_eq!(player.state(), PlayerState::Playing);
    assert_eq!(engine.sources().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_rendering_start_after_buffering_completes_buffering() {
    let engine = RecordingEngine::default();
    engine.set_position(Duration::from_secs(21));
    let (log, mut rx) = event_log();
    let player = LivePlayer::new(engine.clone());
    player.add_listener(log);

    player.attach(live_resource("flaky", &[(EgressKind::Hls, HLS_URL)]));
    player.signal(MediaSignal::BufferingStarted);
    player.signal(MediaSignal::RenderingStarted);
    settle(&player).await;

    loop {
        match rx.recv().await.unwrap() {
            PlayerEvent::BufferingComplete { position } => {
                assert_eq!(position, Duration::from_secs(21));
                break;
            }
            _ => {}
        }
    }
    assert_eq!(player.state(), PlayerState::Playing);
}

#[tokio::test(start_paused = true)]
async fn test_io_error_triggers_reconnect_but_other_errors_do_not() {
    let engine = RecordingEngine::default();
    let player = LivePlayer::new(engine.clone());
    let mut states = player.subscribe_state();

    player.attach(live_resource("flaky", &[(EgressKind::Hls, HLS_URL)]));
    player.signal(MediaSignal::Error(MediaErrorKind::Malformed));
    settle(&player).await;
    assert_eq!(player.state(), PlayerState::Preparing);

    tokio::time::sleep(Duration::from_secs(12)).await;
    settle(&player).await;
    assert_eq!(engine.sources().len(), 1);

    player.signal(MediaSignal::Error(MediaErrorKind::Io));
    wait_for_state(&mut states, PlayerState::Buffering).await;
    wait_for_state(&mut states, PlayerState::Preparing).await;
    settle(&player).await;
    assert_eq!(engine.sources().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_exhausted_attempts_end_playback() {
    let engine = RecordingEngine::default();
    let policy = ReconnectPolicy {
        delay: Duration::from_secs(5),
        max_attempts: Some(2),
    };
    let player = LivePlayer::with_policy(engine.clone(), policy);
    let mut states = player.subscribe_state();

    player.attach(live_resource("gone", &[(EgressKind::Hls, HLS_URL)]));

    player.signal(MediaSignal::BufferingStarted);
    wait_for_state(&mut states, PlayerState::Preparing).await;

    player.signal(MediaSignal::BufferingStarted);
    wait_for_state(&mut states, PlayerState::Preparing).await;

    player.signal(MediaSignal::BufferingStarted);
    wait_for_state(&mut states, PlayerState::Ended).await;

    settle(&player).await;
    // The initial attach plus exactly two retries
    assert_eq!(engine.sources().len(), 3);
}

// =============================================================================
// Event & Analytics Tests
// =============================================================================

#[tokio::test]
async fn test_state_change_precedes_specific_event() {
    let engine = RecordingEngine::default();
    let (log, mut rx) = event_log();
    let player = LivePlayer::new(engine.clone());
    player.add_listener(log);

    player.attach(live_resource("myStream", &[(EgressKind::Hls, HLS_URL)]));
    assert!(matches!(
        rx.recv().await,
        Some(PlayerEvent::StateChange {
            from: PlayerState::Idle,
            to: PlayerState::Preparing,
        })
    ));
    assert!(matches!(rx.recv().await, Some(PlayerEvent::Preparing { .. })));

    player.signal(MediaSignal::Prepared);
    assert!(matches!(
        rx.recv().await,
        Some(PlayerEvent::StateChange {
            to: PlayerState::Ready,
            ..
        })
    ));
    assert!(matches!(rx.recv().await, Some(PlayerEvent::Ready)));
}

#[tokio::test]
async fn test_removed_listener_stops_receiving() {
    let engine = RecordingEngine::default();
    let (log, mut rx) = event_log();
    let player = LivePlayer::new(engine.clone());
    let id = player.add_listener(log);

    player.play();
    loop {
        if matches!(rx.recv().await.unwrap(), PlayerEvent::Play { .. }) {
            break;
        }
    }

    player.remove_listener(id);
    player.pause();
    settle(&player).await;
    tokio::task::yield_now().await;
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_player_milestones_reach_analytics_sink() {
    let engine = RecordingEngine::default();
    let emitter = Arc::new(AnalyticsEmitter::new());
    let (log, mut rx) = event_log();
    let player = LivePlayer::new(engine.clone());
    // The relay is registered first, so when the log sees an event the
    // relay has already recorded it.
    player.add_listener(AnalyticsRelay::new(emitter.clone(), "myStream"));
    player.add_listener(log);

    player.attach(live_resource("myStream", &[(EgressKind::Hls, HLS_URL)]));
    player.signal(MediaSignal::Prepared);
    player.signal(MediaSignal::RenderingStarted);

    loop {
        if matches!(rx.recv().await.unwrap(), PlayerEvent::Play { .. }) {
            break;
        }
    }

    let records = emitter.records();
    let names: Vec<_> = records
        .iter()
        .map(|record| record.event.name.as_str())
        .collect();
    assert_eq!(
        names,
        ["LiveStreamPreparing", "LiveStreamReady", "LiveStreamPlay"]
    );
    let sequences: Vec<_> = records.iter().map(|record| record.sequence).collect();
    assert_eq!(sequences, [1, 2, 3]);
}
