//! Audio engine boundary.
//!
//! The engine is an external collaborator that owns all decoding, mixing, and
//! network fetching. This core never sees its internals: every operation is
//! keyed by an opaque [`PlaybackHandle`] that the engine resolves in its own
//! registry. Engines serialize operations per handle internally, so callers
//! may invoke these methods from any thread.

use crate::error::Result;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Opaque identifier for a live native playback instance.
///
/// Bound 1:1 to an engine-owned object. A handle is never reused after
/// `destroy_player`, and passing a destroyed handle to any operation yields
/// [`BridgeError::HandleNotFound`](crate::BridgeError::HandleNotFound).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlaybackHandle(u64);

impl PlaybackHandle {
    /// Construct a handle from the raw value allocated by the engine.
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw value to pass back across the boundary.
    pub fn as_raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for PlaybackHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player#{}", self.0)
    }
}

/// Transport state as observed by the engine. This is a report, not a
/// command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// A network-backed source is still connecting or buffering.
    Connecting,
    Playing,
    Paused,
    Stopped,
}

/// Notifications raised by the engine for a single playback instance.
///
/// Invoked from engine-owned threads; implementations must not block and must
/// not call back into the engine from the notification body.
pub trait EngineCallback: Send + Sync {
    /// Observed transport state changed.
    fn on_state(&self, state: EngineState);

    /// A stream metadata pair arrived (e.g. ICY `StreamTitle`).
    fn on_metadata(&self, key: &str, value: &str);

    /// An unrecoverable playback error occurred. The engine stops the
    /// affected instance after raising this.
    fn on_error(&self, message: &str);
}

/// Handle-keyed operations every audio engine must provide.
///
/// Mirrors the surface of the native bindings this core wraps: lifecycle,
/// source loading, transport control, read-only queries, callback
/// registration, and process-wide network trust configuration.
pub trait AudioEngine: Send + Sync {
    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Allocate a new playback instance. Fails only on resource exhaustion
    /// (no audio device, registry full).
    fn create_player(&self) -> Result<PlaybackHandle>;

    /// Destroy a playback instance. The handle is invalid afterwards.
    fn destroy_player(&self, handle: PlaybackHandle) -> Result<()>;

    // ------------------------------------------------------------------
    // Source loading
    // ------------------------------------------------------------------

    /// Start playback of a local file.
    fn play_file(&self, handle: PlaybackHandle, path: &Path, looped: bool) -> Result<()>;

    /// Start playback of a plain HTTP(S) stream.
    fn play_url(&self, handle: PlaybackHandle, url: &str, looped: bool) -> Result<()>;

    /// Start playback of a segmented (HLS) stream.
    fn play_hls(&self, handle: PlaybackHandle, url: &str, looped: bool) -> Result<()>;

    /// Start playback of an internet-radio stream with inline metadata.
    fn play_radio(&self, handle: PlaybackHandle, url: &str) -> Result<()>;

    /// Generate a sine tone. Argument validation happens above this boundary;
    /// the engine may assume a positive frequency and non-zero duration.
    fn play_sine(
        &self,
        handle: PlaybackHandle,
        frequency_hz: f32,
        duration: Duration,
    ) -> Result<()>;

    // ------------------------------------------------------------------
    // Transport control
    // ------------------------------------------------------------------

    fn play(&self, handle: PlaybackHandle) -> Result<()>;

    fn pause(&self, handle: PlaybackHandle) -> Result<()>;

    /// Halt playback, keeping any queued source state.
    fn stop(&self, handle: PlaybackHandle) -> Result<()>;

    /// Halt playback and discard queued source state.
    fn clear(&self, handle: PlaybackHandle) -> Result<()>;

    /// Set the output gain. Values are forwarded as-is; the engine does not
    /// guarantee clamping.
    fn set_volume(&self, handle: PlaybackHandle, volume: f32) -> Result<()>;

    /// Seek to an absolute position. Only valid while the current source is
    /// seekable.
    fn seek(&self, handle: PlaybackHandle, position: Duration) -> Result<()>;

    // ------------------------------------------------------------------
    // Queries (read-only)
    // ------------------------------------------------------------------

    fn position(&self, handle: PlaybackHandle) -> Result<Duration>;

    /// Total duration, or `None` while the engine has not determined it.
    /// Streaming sources may never determine a duration.
    fn duration(&self, handle: PlaybackHandle) -> Result<Option<Duration>>;

    fn is_seekable(&self, handle: PlaybackHandle) -> Result<bool>;

    fn is_paused(&self, handle: PlaybackHandle) -> Result<bool>;

    fn is_empty(&self, handle: PlaybackHandle) -> Result<bool>;

    // ------------------------------------------------------------------
    // Callback registration
    // ------------------------------------------------------------------

    /// Register the notification callback for a playback instance, replacing
    /// any previous one. The engine holds at most one callback per handle.
    fn set_callback(&self, handle: PlaybackHandle, callback: Arc<dyn EngineCallback>)
        -> Result<()>;

    /// Drop the registered callback. After this returns the engine raises no
    /// further notifications for the handle.
    fn clear_callback(&self, handle: PlaybackHandle) -> Result<()>;

    // ------------------------------------------------------------------
    // Process-wide network trust configuration
    // ------------------------------------------------------------------
    // Applies to all subsequent network-backed playback, across every handle.

    /// Accept invalid TLS certificates for subsequent network playback.
    fn set_allow_invalid_certs(&self, allow: bool) -> Result<()>;

    /// Add a trusted root certificate (PEM text) for subsequent network
    /// playback.
    fn add_trusted_root_pem(&self, pem: &str) -> Result<()>;

    /// Remove all previously added trusted roots.
    fn clear_trusted_roots(&self) -> Result<()>;
}
