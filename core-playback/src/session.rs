//! # Player Session
//!
//! Owns one [`PlaybackHandle`] and serializes all transport commands against
//! it. The session is the only holder of its handle: the handle dies with
//! `close()` and is never passed to another owner.
//!
//! Operations may be called from any thread. The session adds no locking of
//! its own around engine calls — the engine serializes per handle — and its
//! internal loops (the dispatch task here, the poller in
//! [`crate::poller`]) only ever read, except for the single committed seek.
//!
//! ## Close discipline
//!
//! `close()` is idempotent and ordered: the engine callback is detached
//! before the handle is destroyed, so no notification can arrive for a dead
//! handle. Every operation invoked after `close()` fails with
//! [`PlaybackError::SessionClosed`] rather than crashing or silently
//! no-op-ing.

use crate::error::{PlaybackError, Result};
use crate::events::{EventBridge, PlaybackCallback};
use bridge_traits::{AudioEngine, PlaybackHandle};
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// A controllable playback session backed by one native engine instance.
pub struct PlayerSession {
    engine: Arc<dyn AudioEngine>,
    handle: PlaybackHandle,
    bridge: Arc<EventBridge>,
    shutdown: CancellationToken,
    closed: AtomicBool,
    /// Bumped on every successful `play_*`; lets observers (the poller)
    /// notice a new playback start and drop cached duration/seekability.
    generation: AtomicU64,
}

impl PlayerSession {
    /// Allocate a native playback instance and wire up event delivery.
    ///
    /// Fails only on engine resource exhaustion. Must be called within a
    /// Tokio runtime: the event dispatch task is spawned here.
    pub fn create(engine: Arc<dyn AudioEngine>) -> Result<Arc<Self>> {
        let handle = engine.create_player()?;
        let (bridge, queue_rx) = EventBridge::new();

        if let Err(e) = engine.set_callback(handle, bridge.clone()) {
            // Don't leak the half-built instance.
            let _ = engine.destroy_player(handle);
            return Err(e.into());
        }

        let shutdown = CancellationToken::new();
        tokio::spawn(EventBridge::dispatch_loop(
            bridge.clone(),
            queue_rx,
            shutdown.child_token(),
        ));

        tracing::debug!(%handle, "player session created");
        Ok(Arc::new(Self {
            engine,
            handle,
            bridge,
            shutdown,
            closed: AtomicBool::new(false),
            generation: AtomicU64::new(0),
        }))
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed.load(Ordering::Acquire) {
            Err(PlaybackError::SessionClosed)
        } else {
            Ok(())
        }
    }

    fn mark_started(&self) {
        self.generation.fetch_add(1, Ordering::AcqRel);
    }

    /// The opaque engine handle this session owns.
    pub fn handle(&self) -> PlaybackHandle {
        self.handle
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// `true` once any `play_*` has succeeded. The poller only samples
    /// sessions that have started at least once.
    pub fn has_started(&self) -> bool {
        self.generation.load(Ordering::Acquire) > 0
    }

    /// Playback start counter; changes whenever a new source begins.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    // ------------------------------------------------------------------
    // Callback registration
    // ------------------------------------------------------------------

    /// Register the event callback, atomically replacing any previous one.
    pub fn set_callback(&self, callback: Arc<dyn PlaybackCallback>) -> Result<()> {
        self.ensure_open()?;
        self.bridge.set_callback(callback);
        Ok(())
    }

    /// Remove the event callback. Guarantees zero deliveries after return.
    pub fn clear_callback(&self) -> Result<()> {
        self.ensure_open()?;
        self.bridge.clear_callback();
        Ok(())
    }

    // ------------------------------------------------------------------
    // Source loading
    // ------------------------------------------------------------------

    /// Start playback of a local file.
    pub fn play_file(&self, path: impl AsRef<Path>, looped: bool) -> Result<()> {
        self.ensure_open()?;
        let path = path.as_ref();
        tracing::debug!(handle = %self.handle, ?path, looped, "play file");
        self.engine.play_file(self.handle, path, looped)?;
        self.mark_started();
        Ok(())
    }

    /// Start playback of an HTTP(S) URL.
    ///
    /// Segmented streams (HLS playlists) are detected from the URL and routed
    /// to the engine's segmented path transparently; callers never choose the
    /// variant themselves.
    pub fn play_url(&self, url: &str, looped: bool) -> Result<()> {
        self.ensure_open()?;
        if is_segmented_stream(url) {
            tracing::debug!(handle = %self.handle, url, looped, "play url (segmented)");
            self.engine.play_hls(self.handle, url, looped)?;
        } else {
            tracing::debug!(handle = %self.handle, url, looped, "play url");
            self.engine.play_url(self.handle, url, looped)?;
        }
        self.mark_started();
        Ok(())
    }

    /// Start playback of an internet-radio stream (inline metadata enabled).
    pub fn play_radio(&self, url: &str) -> Result<()> {
        self.ensure_open()?;
        tracing::debug!(handle = %self.handle, url, "play radio");
        self.engine.play_radio(self.handle, url)?;
        self.mark_started();
        Ok(())
    }

    /// Generate a sine tone.
    ///
    /// `frequency_hz` must be positive and `duration` non-zero, otherwise the
    /// call fails with [`PlaybackError::InvalidArgument`] before reaching the
    /// engine.
    pub fn play_sine(&self, frequency_hz: f32, duration: Duration) -> Result<()> {
        self.ensure_open()?;
        if !frequency_hz.is_finite() || frequency_hz <= 0.0 {
            return Err(PlaybackError::InvalidArgument(format!(
                "sine frequency must be positive, got {frequency_hz}"
            )));
        }
        if duration.is_zero() {
            return Err(PlaybackError::InvalidArgument(
                "sine duration must be greater than zero".into(),
            ));
        }
        tracing::debug!(handle = %self.handle, frequency_hz, ?duration, "play sine");
        self.engine.play_sine(self.handle, frequency_hz, duration)?;
        self.mark_started();
        Ok(())
    }

    // ------------------------------------------------------------------
    // Transport control
    // ------------------------------------------------------------------

    pub fn play(&self) -> Result<()> {
        self.ensure_open()?;
        self.engine.play(self.handle)?;
        Ok(())
    }

    pub fn pause(&self) -> Result<()> {
        self.ensure_open()?;
        self.engine.pause(self.handle)?;
        Ok(())
    }

    /// Halt playback. Queued source state is kept; see [`clear`](Self::clear)
    /// for the idle baseline.
    pub fn stop(&self) -> Result<()> {
        self.ensure_open()?;
        self.engine.stop(self.handle)?;
        Ok(())
    }

    /// Halt playback and discard queued source state, returning the session
    /// to its idle baseline.
    pub fn clear(&self) -> Result<()> {
        self.ensure_open()?;
        self.engine.clear(self.handle)?;
        Ok(())
    }

    /// Set output volume. The recommended range is `[0.0, 1.0]`; out-of-range
    /// values are passed through unclamped and the engine makes no clamping
    /// guarantee either.
    pub fn set_volume(&self, volume: f32) -> Result<()> {
        self.ensure_open()?;
        tracing::debug!(handle = %self.handle, volume, "set volume");
        self.engine.set_volume(self.handle, volume)?;
        Ok(())
    }

    /// Seek to an absolute position.
    ///
    /// Valid only while the current source is seekable; otherwise fails with
    /// [`PlaybackError::NotSeekable`]. Callers driving a scrubber should
    /// debounce through the poller's pending-seek mechanism rather than
    /// issuing a seek per drag tick (at most one outstanding seek per
    /// session).
    pub fn seek_to(&self, position: Duration) -> Result<()> {
        self.ensure_open()?;
        if !self.seekable_lenient() {
            return Err(PlaybackError::NotSeekable);
        }
        tracing::debug!(handle = %self.handle, ?position, "seek");
        self.engine.seek(self.handle, position)?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Best-known playback position.
    pub fn position(&self) -> Result<Duration> {
        self.ensure_open()?;
        Ok(self.engine.position(self.handle)?)
    }

    /// Best-known total duration; `None` until the engine determines it.
    /// Streaming sources may never report one.
    pub fn duration(&self) -> Result<Option<Duration>> {
        self.ensure_open()?;
        Ok(self.engine.duration(self.handle)?)
    }

    /// Whether the current source supports random-access seeks.
    pub fn is_seekable(&self) -> Result<bool> {
        self.ensure_open()?;
        Ok(self.engine.is_seekable(self.handle)?)
    }

    /// Best-effort seekability: a failed query counts as "not seekable"
    /// rather than an error. Used by the poller and by seek validation.
    pub fn seekable_lenient(&self) -> bool {
        !self.is_closed() && self.engine.is_seekable(self.handle).unwrap_or(false)
    }

    pub fn is_paused(&self) -> Result<bool> {
        self.ensure_open()?;
        Ok(self.engine.is_paused(self.handle)?)
    }

    pub fn is_empty(&self) -> Result<bool> {
        self.ensure_open()?;
        Ok(self.engine.is_empty(self.handle)?)
    }

    // ------------------------------------------------------------------
    // Teardown
    // ------------------------------------------------------------------

    /// Close the session and destroy the handle.
    ///
    /// Idempotent: the first call detaches the engine callback, shuts down
    /// event dispatch, then destroys the handle; later calls are no-ops.
    pub fn close(&self) -> Result<()> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Ok(());
        }

        // Detach before destroy: once clear_callback returns, the engine
        // raises nothing further for this handle.
        if let Err(e) = self.engine.clear_callback(self.handle) {
            tracing::warn!(handle = %self.handle, error = %e, "clear_callback failed during close");
        }
        self.bridge.clear_callback();
        self.shutdown.cancel();

        self.engine.destroy_player(self.handle)?;
        tracing::debug!(handle = %self.handle, "player session closed");
        Ok(())
    }
}

impl Drop for PlayerSession {
    fn drop(&mut self) {
        if !self.is_closed() {
            tracing::warn!(handle = %self.handle, "player session dropped without close");
            let _ = self.close();
        }
    }
}

/// Whether a URL points at a segmented (HLS) stream.
///
/// Matches on the playlist extension of the path component, ignoring query
/// and fragment, case-insensitively.
fn is_segmented_stream(url: &str) -> bool {
    let path = url
        .split(|c| c == '?' || c == '#')
        .next()
        .unwrap_or(url)
        .to_ascii_lowercase();
    path.ends_with(".m3u8") || path.ends_with(".m3u")
}
