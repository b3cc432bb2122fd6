//! OS media-session boundary.
//!
//! Covers the platform "now playing" integrations (MPRIS on Linux, SMTC on
//! Windows, Now Playing on macOS). Like the audio engine, the backend owns
//! the native objects and hands out opaque [`MediaSessionHandle`]s; inbound
//! media-key presses arrive as [`MediaControlEvent`]s on backend-owned
//! threads.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Opaque identifier for a live OS media-session object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MediaSessionHandle(u64);

impl MediaSessionHandle {
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn as_raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for MediaSessionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "media-session#{}", self.0)
    }
}

/// Native window identity required by window-bound backends (SMTC).
///
/// Non-zero by construction: a zero handle is an extraction failure, never a
/// usable identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WindowIdentity(u64);

impl WindowIdentity {
    /// Wrap a raw native handle value. Returns `None` for zero, which the
    /// platforms treat as "no window".
    pub fn new(raw: u64) -> Option<Self> {
        (raw != 0).then_some(Self(raw))
    }

    pub fn as_raw(&self) -> u64 {
        self.0
    }
}

/// Creation parameters for a media session.
#[derive(Debug, Clone)]
pub struct MediaSessionConfig {
    /// Bus / registration name (e.g. the MPRIS D-Bus suffix).
    pub session_name: String,
    /// Human-readable player name shown by the OS.
    pub display_name: String,
    /// Window identity, required by backends that report
    /// [`requires_window_identity`](MediaSessionBackend::requires_window_identity).
    pub window: Option<WindowIdentity>,
}

/// Track metadata published to the OS. Last write wins; `None` fields clear
/// the corresponding platform display.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MediaMetadata {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub cover_url: Option<String>,
    pub duration: Option<Duration>,
}

/// Outward playback status shown by the OS widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaPlaybackStatus {
    Playing,
    Paused,
    Stopped,
}

/// Inbound transport command originating from the OS (media keys, the
/// now-playing widget, a remote).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum MediaControlEvent {
    Play,
    Pause,
    Toggle,
    Stop,
    Next,
    Previous,
    /// Relative skip in the platform's default increment.
    Seek { forward: bool },
    /// Relative skip by an explicit amount; negative offsets seek backward.
    SeekBy { offset_secs: f64 },
    /// Absolute reposition.
    SetPosition { position_secs: f64 },
    /// Volume request, nominally in `[0.0, 1.0]`.
    SetVolume { level: f64 },
    OpenUri { uri: String },
    /// Bring the player window to the foreground.
    Raise,
    Quit,
}

/// Receiver for inbound media-control events. Invoked on backend-owned
/// threads; bodies must not block.
pub trait MediaControlCallback: Send + Sync {
    fn on_event(&self, event: MediaControlEvent);
}

/// Handle-keyed operations every media-session backend must provide.
pub trait MediaSessionBackend: Send + Sync {
    /// Whether `create` needs a [`WindowIdentity`] on this platform.
    fn requires_window_identity(&self) -> bool;

    /// Create a media session. Fails with
    /// [`BridgeError::OperationFailed`](crate::BridgeError::OperationFailed)
    /// on native resource errors; the initialization-order check for missing
    /// window identities happens above this boundary.
    fn create(&self, config: &MediaSessionConfig) -> Result<MediaSessionHandle>;

    /// Destroy the session. The handle is invalid afterwards.
    fn destroy(&self, handle: MediaSessionHandle) -> Result<()>;

    /// Register the inbound event callback, replacing any previous one.
    fn attach(
        &self,
        handle: MediaSessionHandle,
        callback: Arc<dyn MediaControlCallback>,
    ) -> Result<()>;

    /// Stop inbound event delivery for the session.
    fn detach(&self, handle: MediaSessionHandle) -> Result<()>;

    /// Publish track metadata.
    fn set_metadata(&self, handle: MediaSessionHandle, metadata: &MediaMetadata) -> Result<()>;

    /// Publish playback status, optionally with a progress marker for
    /// platforms that display a scrubber.
    fn set_playback(
        &self,
        handle: MediaSessionHandle,
        status: MediaPlaybackStatus,
        progress: Option<Duration>,
    ) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_identity_rejects_zero() {
        assert!(WindowIdentity::new(0).is_none());
        assert_eq!(WindowIdentity::new(7).map(|w| w.as_raw()), Some(7));
    }

    #[test]
    fn control_event_serde_tagged_form() {
        let event = MediaControlEvent::SeekBy { offset_secs: -10.0 };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"event\":\"SeekBy\""));
        let back: MediaControlEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
