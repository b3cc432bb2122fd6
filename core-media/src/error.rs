//! # Media Session Error Types
//!
//! Error taxonomy for the OS media-session bridge.
//!
//! The distinction that matters most to hosts is [`NotInitialized`] versus
//! [`Creation`]: the former means the host forgot to resolve a window
//! identity before creating a session on a window-bound platform (a fixable
//! initialization-order bug), the latter is a native failure from the backend
//! itself.
//!
//! [`NotInitialized`]: MediaSessionError::NotInitialized
//! [`Creation`]: MediaSessionError::Creation

use bridge_traits::BridgeError;
use thiserror::Error;

/// Errors that can occur while driving an OS media session.
#[derive(Error, Debug)]
pub enum MediaSessionError {
    /// A window identity was required but none has been resolved yet.
    /// Initialization-order bug in the host, not a platform failure.
    #[error("media session prerequisites missing: {0}")]
    NotInitialized(String),

    /// The backend failed to create the native session object.
    #[error("media session creation failed: {0}")]
    Creation(String),

    /// The session was closed; the handle no longer exists.
    #[error("media session closed")]
    SessionClosed,

    /// No window-handle strategy could produce a usable identity.
    #[error("window handle unextractable: {0}")]
    HandleUnextractable(String),

    /// A raw window handle value the platforms treat as "no window".
    #[error("invalid window handle value {0}")]
    InvalidWindowHandle(u64),

    /// Opaque failure surfaced from the platform backend.
    #[error("backend error: {0}")]
    Backend(String),
}

impl From<BridgeError> for MediaSessionError {
    fn from(error: BridgeError) -> Self {
        MediaSessionError::Backend(error.to_string())
    }
}

/// Result type for media-session operations.
pub type Result<T> = std::result::Result<T, MediaSessionError>;
