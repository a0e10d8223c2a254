//! Player events and listeners

use super::PlayerState;
use std::time::Duration;

/// Phases of a touch gesture forwarded from the host widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchPhase {
    Down,
    Up,
    Moved,
    Cancelled,
}

/// A touch on the playback surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchEvent {
    pub phase: TouchPhase,
    /// Widget-local coordinates
    pub x: f32,
    pub y: f32,
}

impl TouchEvent {
    /// Create a new touch event.
    pub fn new(phase: TouchPhase, x: f32, y: f32) -> Self {
        Self { phase, x, y }
    }
}

/// Notifications fanned out to player listeners.
///
/// Every state transition produces a [`StateChange`](PlayerEvent::StateChange)
/// followed by the transition-specific event, in that order.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEvent {
    /// The player entered a new state
    StateChange { from: PlayerState, to: PlayerState },
    /// A resource was attached and the source is being set up
    Preparing { duration: Option<Duration> },
    /// The engine is ready to play
    Ready,
    /// Playback started or resumed
    Play { position: Duration },
    /// Playback was paused
    Pause { position: Duration },
    /// Playback ended
    End { duration: Option<Duration> },
    /// Playback moved to a new position
    Seek { from: Duration, to: Duration },
    /// The stream stalled
    BufferingStart { position: Duration },
    /// The stream recovered
    BufferingComplete { position: Duration },
    /// The playback surface was touched
    Touch(TouchEvent),
}

/// Receives player notifications.
///
/// Every method has a default no-op body; implement only the callbacks you
/// care about. Callbacks run on the dispatch task, in post order, decoupled
/// from whatever produced them.
#[allow(unused_variables)]
pub trait PlayerListener: Send {
    /// The player entered a new state.
    fn on_state_change(&mut self, from: PlayerState, to: PlayerState) {}

    /// A resource was attached.
    fn on_preparing(&mut self, duration: Option<Duration>) {}

    /// The engine is ready to play.
    fn on_ready(&mut self) {}

    /// Playback started or resumed.
    fn on_play(&mut self, position: Duration) {}

    /// Playback was paused.
    fn on_pause(&mut self, position: Duration) {}

    /// Playback ended.
    fn on_end(&mut self, duration: Option<Duration>) {}

    /// Playback moved to a new position.
    fn on_seek(&mut self, from: Duration, to: Duration) {}

    /// The stream stalled.
    fn on_buffering_start(&mut self, position: Duration) {}

    /// The stream recovered.
    fn on_buffering_complete(&mut self, position: Duration) {}

    /// The playback surface was touched.
    fn on_touch(&mut self, event: TouchEvent) {}
}
