//! Platform media engine seam
//!
//! The library drives playback but never renders it. The host wraps its
//! platform widget in a [`MediaEngine`] and feeds the widget's callbacks
//! back in as [`MediaSignal`]s.

use std::time::Duration;

/// Commands the player issues to the host's media widget.
///
/// Commands are fire-and-forget: a widget that fails to act reports it
/// asynchronously through a [`MediaSignal`], never as a return value.
pub trait MediaEngine: Send {
    /// Set the playback source. The string is the configured egress
    /// endpoint; the engine decides how to interpret it.
    fn set_source(&mut self, source: &str);

    /// Start or resume playback of the current source.
    fn start(&mut self);

    /// Pause playback.
    fn pause(&mut self);

    /// Seek to a position.
    fn seek_to(&mut self, position: Duration);

    /// Current playback position.
    fn position(&self) -> Duration;

    /// Total duration of the clip; not useful for live streams.
    fn duration(&self) -> Option<Duration>;

    /// True while the widget is rendering frames.
    fn is_playing(&self) -> bool;
}

/// Callbacks from the platform media widget, delivered by the host via
/// [`LivePlayer::signal`](crate::player::LivePlayer::signal).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaSignal {
    /// The source was loaded and the widget is ready to play
    Prepared,
    /// The widget started rendering frames
    RenderingStarted,
    /// The widget stalled waiting for data
    BufferingStarted,
    /// Playback reached the end of the clip
    Completed,
    /// The widget hit an error
    Error(MediaErrorKind),
}

/// Kinds of engine errors.
///
/// Only [`Io`](MediaErrorKind::Io) participates in the reconnect loop; the
/// other kinds are logged and otherwise ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaErrorKind {
    /// Network or file I/O failure; triggers a reconnect attempt
    Io,
    /// The stream is malformed
    Malformed,
    /// The container or codec is not supported
    Unsupported,
    /// An operation timed out inside the engine
    TimedOut,
    /// Anything the platform does not classify
    Unknown,
}

impl std::fmt::Display for MediaErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaErrorKind::Io => write!(f, "io"),
            MediaErrorKind::Malformed => write!(f, "malformed"),
            MediaErrorKind::Unsupported => write!(f, "unsupported"),
            MediaErrorKind::TimedOut => write!(f, "timed_out"),
            MediaErrorKind::Unknown => write!(f, "unknown"),
        }
    }
}
