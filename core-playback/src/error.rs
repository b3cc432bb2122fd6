//! # Playback Error Types
//!
//! Error taxonomy for playback sessions.
//!
//! Argument and state-precondition violations are raised synchronously to the
//! caller of the violating operation. Engine-originated asynchronous failures
//! are never surfaced here; they arrive through the registered callback's
//! error channel (see [`crate::events`]).

use bridge_traits::BridgeError;
use thiserror::Error;

/// Errors that can occur during playback operations.
#[derive(Error, Debug)]
pub enum PlaybackError {
    /// An argument violated the operation's contract (e.g. non-positive tone
    /// duration).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Seek was requested on a source that does not support random access.
    #[error("current source is not seekable")]
    NotSeekable,

    /// The session was closed; the handle no longer exists.
    #[error("session closed")]
    SessionClosed,

    /// Opaque failure surfaced from the external engine.
    #[error("engine error: {0}")]
    Engine(String),
}

impl PlaybackError {
    /// `true` for errors callers should fix rather than retry
    /// (use-after-close, contract violations).
    pub fn is_programming_error(&self) -> bool {
        matches!(
            self,
            PlaybackError::SessionClosed | PlaybackError::InvalidArgument(_)
        )
    }

    /// `true` for errors that are recoverable by retrying with a new source.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, PlaybackError::Engine(_))
    }
}

impl From<BridgeError> for PlaybackError {
    fn from(error: BridgeError) -> Self {
        PlaybackError::Engine(error.to_string())
    }
}

/// Result type for playback operations.
pub type Result<T> = std::result::Result<T, PlaybackError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_helpers() {
        assert!(PlaybackError::SessionClosed.is_programming_error());
        assert!(PlaybackError::InvalidArgument("x".into()).is_programming_error());
        assert!(!PlaybackError::Engine("boom".into()).is_programming_error());
        assert!(PlaybackError::Engine("boom".into()).is_recoverable());
        assert!(!PlaybackError::NotSeekable.is_recoverable());
    }

    #[test]
    fn bridge_errors_map_to_engine() {
        let err: PlaybackError = BridgeError::HandleNotFound(3).into();
        assert!(matches!(err, PlaybackError::Engine(_)));
        assert!(err.to_string().contains("handle 3 not found"));
    }
}
