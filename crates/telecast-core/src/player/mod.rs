//! Live video playback
//!
//! The player side of the library:
//! - [`MediaEngine`]: the seam to the host's platform media widget
//! - [`LivePlayer`]: state machine with fixed-interval reconnect
//! - [`EventDispatcher`] / [`PlayerListener`]: ordered listener fan-out
//! - [`ReconnectPolicy`]: retry interval and optional attempt cap

mod dispatch;
mod event;
mod live;
mod media;
mod state;

pub use dispatch::{EventDispatcher, ListenerId};
pub use event::{PlayerEvent, PlayerListener, TouchEvent, TouchPhase};
pub use live::{LivePlayer, ReconnectPolicy};
pub use media::{MediaEngine, MediaErrorKind, MediaSignal};
pub use state::PlayerState;

use crate::resources::VideoResource;
use async_trait::async_trait;
use std::time::Duration;

/// Playback capability set shared by player implementations.
///
/// Commands are fire-and-forget and processed in submission order; queries
/// reflect everything submitted before them.
#[async_trait]
pub trait VideoPlayer: Send + Sync {
    /// Resource type this player plays.
    type Resource: VideoResource;

    /// Attach a resource and connect to it.
    fn attach(&self, resource: Self::Resource);

    /// Begin or resume playback.
    fn play(&self);

    /// Pause playback.
    fn pause(&self);

    /// Seek to a playback position.
    fn seek(&self, position: Duration);

    /// Current playback position.
    async fn position(&self) -> Duration;

    /// Total clip duration, if known.
    async fn duration(&self) -> Option<Duration>;
}
