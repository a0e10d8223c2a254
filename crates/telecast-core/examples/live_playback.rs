//! Live playback example
//!
//! Demonstrates configuration parsing, the category/plugin registry and
//! the live player state machine with a console-backed media engine.
//!
//! Run with: cargo run -p telecast-core --example live_playback

use std::time::Duration;

use telecast_core::{
    read_from_str, EgressKind, LivePlayer, MediaEngine, MediaSignal, PlayerListener, PlayerState,
    ReconnectPolicy, TelecastVideoPlugin, VideoCategory, VideoCategoryBehavior,
};

const CONFIGURATION: &str = r#"{
    "mylivestream": {
        "type": "LIVE",
        "ingress": { "primary": "rtmp://ingest.example.com/mylivestream" },
        "keys": { "primary": "sk-primary-0001" },
        "egress": {
            "hls": "https://cdn.example.com/mylivestream/index.m3u8",
            "mediastore": "https://store.example.com/mylivestream"
        }
    },
    "myvideoarchive": {
        "type": "ON_DEMAND",
        "input": "uploads-bucket",
        "output": "renditions-bucket",
        "outputUrl": "https://cdn.example.com/vod"
    }
}"#;

/// Engine that prints every command instead of rendering video.
struct ConsoleEngine {
    playing: bool,
}

impl MediaEngine for ConsoleEngine {
    fn set_source(&mut self, source: &str) {
        println!("  engine: source set to {source}");
    }

    fn start(&mut self) {
        println!("  engine: start");
        self.playing = true;
    }

    fn pause(&mut self) {
        println!("  engine: pause");
        self.playing = false;
    }

    fn seek_to(&mut self, position: Duration) {
        println!("  engine: seek to {position:?}");
    }

    fn position(&self) -> Duration {
        Duration::from_secs(42)
    }

    fn duration(&self) -> Option<Duration> {
        None
    }

    fn is_playing(&self) -> bool {
        self.playing
    }
}

struct ConsoleListener;

impl PlayerListener for ConsoleListener {
    fn on_state_change(&mut self, from: PlayerState, to: PlayerState) {
        println!("  listener: {from} -> {to}");
    }

    fn on_buffering_start(&mut self, position: Duration) {
        println!("  listener: stream stalled at {position:?}");
    }

    fn on_buffering_complete(&mut self, position: Duration) {
        println!("  listener: stream recovered at {position:?}");
    }

    fn on_end(&mut self, _duration: Option<Duration>) {
        println!("  listener: playback ended");
    }
}

#[tokio::main]
async fn main() -> telecast_core::Result<()> {
    println!("Telecast Core - Live Playback Example");
    println!("=====================================\n");

    // Parse the configuration document
    let configuration = read_from_str(CONFIGURATION)?;
    println!("Parsed configuration:");
    println!("  - {} live resource(s)", configuration.live_resources().len());
    println!(
        "  - {} on-demand resource(s)\n",
        configuration.on_demand_resources().len()
    );

    // Register and configure the plugin through the category
    let mut category = VideoCategory::new();
    category.add_plugin(Box::new(TelecastVideoPlugin::new()))?;
    let document = serde_json::from_str::<serde_json::Value>(CONFIGURATION)?;
    category.configure(&serde_json::json!({
        "plugins": { (TelecastVideoPlugin::PLUGIN_KEY): document }
    }))?;

    let resource = category
        .live_resource("mylivestream")?
        .ok_or_else(|| telecast_core::Error::Configuration("mylivestream is not configured".into()))?;
    println!("Live resource \"{}\":", resource.identifier());
    for kind in EgressKind::ALL {
        if let Some(point) = resource.egress_point(kind) {
            println!("  - {kind}: {point}");
        }
    }
    if let Some(url) = category.egress_for("mylivestream")? {
        println!("  preferred egress: {url}\n");
    }

    // Drive the player through a stall and recovery
    println!("Playback session:");
    let policy = ReconnectPolicy {
        delay: Duration::from_millis(500),
        max_attempts: Some(3),
    };
    let player = LivePlayer::with_policy(ConsoleEngine { playing: false }, policy);
    player.add_listener(ConsoleListener);

    player.attach(resource);
    player.signal(MediaSignal::Prepared);
    player.signal(MediaSignal::RenderingStarted);
    tokio::time::sleep(Duration::from_millis(100)).await;

    println!("\nStream drops:");
    player.signal(MediaSignal::BufferingStarted);
    tokio::time::sleep(Duration::from_millis(700)).await;

    println!("\nStream comes back:");
    player.signal(MediaSignal::RenderingStarted);
    tokio::time::sleep(Duration::from_millis(100)).await;

    println!("\nBroadcast finishes:");
    player.signal(MediaSignal::Completed);
    tokio::time::sleep(Duration::from_millis(100)).await;

    println!("\nFinal state: {}", player.state());
    println!("\nExample complete!");
    Ok(())
}
