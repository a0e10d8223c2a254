//! Telecast Core - Live/on-demand video client library
//!
//! This crate provides the client side of a Telecast video deployment:
//! - Typed resource model parsed from a small JSON configuration
//! - A category/plugin registry exposing category-wide operations
//! - A live player with a fixed-interval reconnect state machine
//! - Listener fan-out through a single-consumer event dispatcher
//! - Analytics plumbing for playback milestones
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                       Telecast Core                        │
//! ├────────────────────────────────────────────────────────────┤
//! │                                                            │
//! │  ┌──────────────┐   ┌──────────────┐   ┌──────────────┐   │
//! │  │    Config    │   │    Video     │   │    Video     │   │
//! │  │    Reader    ├──▶│    Plugin    │◀──┤   Category   │   │
//! │  └──────────────┘   └──────┬───────┘   └──────────────┘   │
//! │                            │                               │
//! │                     ┌──────┴──────┐                        │
//! │                     │    Live     │                        │
//! │                     │   Player    │                        │
//! │                     └──────┬──────┘                        │
//! │                            │                               │
//! │  ┌──────────────┐   ┌──────┴──────┐   ┌──────────────┐    │
//! │  │  Analytics   │◀──┤    Event    │   │    Media     │    │
//! │  │    Relay     │   │  Dispatcher │   │    Engine    │    │
//! │  └──────────────┘   └─────────────┘   └──────────────┘    │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! The media engine is a seam: the host wraps its platform widget and
//! feeds the widget's callbacks back in as signals. This crate never
//! renders video itself.

pub mod analytics;
pub mod category;
pub mod config;
pub mod error;
pub mod player;
pub mod plugin;
pub mod resources;

pub use analytics::{
    AnalyticsEmitter, AnalyticsEvent, AnalyticsRecord, AnalyticsRelay, AnalyticsSink,
    PropertyValue,
};
pub use category::{VideoCategory, VideoCategoryBehavior};
pub use config::{read_from_str, read_from_value, to_value, PluginConfiguration};
pub use error::{Error, Result};
pub use player::{
    EventDispatcher, ListenerId, LivePlayer, MediaEngine, MediaErrorKind, MediaSignal, PlayerEvent,
    PlayerListener, PlayerState, ReconnectPolicy, TouchEvent, TouchPhase, VideoPlayer,
};
pub use plugin::{TelecastVideoPlugin, VideoPlugin};
pub use resources::{
    EgressKind, IngressKind, InputKind, LiveResource, OnDemandResource, OutputKind, StreamKeyKind,
    VideoResource, VideoResourceType,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the library with default configuration
pub fn init() {
    tracing::info!(version = VERSION, "Telecast Core initialized");
}
