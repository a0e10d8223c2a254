//! Player states

use serde::{Deserialize, Serialize};

/// States a player moves through during live playback.
///
/// Initial state is [`Idle`](PlayerState::Idle). There is no terminal state;
/// an [`Ended`](PlayerState::Ended) player can be re-attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerState {
    /// Not playing; also entered on explicit pause
    Idle,
    /// A resource is attached and the source is being set up
    Preparing,
    /// The stream stalled; a reconnect attempt is pending
    Buffering,
    /// The engine reported the source is ready
    Ready,
    /// Frames are rendering
    Playing,
    /// Playback completed or retries were exhausted
    Ended,
}

impl std::fmt::Display for PlayerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlayerState::Idle => write!(f, "idle"),
            PlayerState::Preparing => write!(f, "preparing"),
            PlayerState::Buffering => write!(f, "buffering"),
            PlayerState::Ready => write!(f, "ready"),
            PlayerState::Playing => write!(f, "playing"),
            PlayerState::Ended => write!(f, "ended"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(PlayerState::Idle.to_string(), "idle");
        assert_eq!(PlayerState::Buffering.to_string(), "buffering");
    }
}
