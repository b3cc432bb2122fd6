//! # Media Control Session
//!
//! Host-facing wrapper around one OS now-playing session.
//!
//! Outbound state (metadata, playback status, progress) is pushed through
//! [`set_metadata`](MediaControlSession::set_metadata) and
//! [`set_playback`](MediaControlSession::set_playback); inbound transport
//! commands (media keys, the OS widget) arrive through the attached
//! [`MediaControlCallback`]. The two directions are independent: a session
//! can publish state without ever attaching a callback.
//!
//! On window-bound platforms, creation requires a resolved
//! [`WindowIdentity`]; see [`crate::window`]. A missing identity fails with
//! [`MediaSessionError::NotInitialized`] before the backend is touched, so
//! hosts can tell their own initialization-order bugs apart from native
//! failures.

use crate::error::{MediaSessionError, Result};
use crate::window::WindowHandleResolver;
use bridge_traits::{
    MediaControlCallback, MediaControlEvent, MediaMetadata, MediaPlaybackStatus,
    MediaSessionBackend, MediaSessionConfig, MediaSessionHandle, WindowIdentity,
};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Single callback slot registered with the backend once. Deliveries run
/// under the slot read lock, so replacing or clearing the callback (write
/// lock) linearizes against in-flight backend-thread deliveries.
#[derive(Default)]
struct ControlSlot {
    slot: RwLock<Option<Arc<dyn MediaControlCallback>>>,
}

impl MediaControlCallback for ControlSlot {
    fn on_event(&self, event: MediaControlEvent) {
        let guard = self.slot.read();
        if let Some(callback) = guard.as_ref() {
            callback.on_event(event);
        }
    }
}

/// One OS media session, owned for its whole lifetime.
pub struct MediaControlSession {
    backend: Arc<dyn MediaSessionBackend>,
    handle: MediaSessionHandle,
    slot: Arc<ControlSlot>,
    forwarder_registered: AtomicBool,
    closed: AtomicBool,
}

impl std::fmt::Debug for MediaControlSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaControlSession")
            .field("handle", &self.handle)
            .field("forwarder_registered", &self.forwarder_registered)
            .field("closed", &self.closed)
            .finish_non_exhaustive()
    }
}

impl MediaControlSession {
    /// Create the native session.
    ///
    /// If the backend is window-bound and `config.window` is empty, the
    /// process-wide identity from [`WindowHandleResolver`] is used; when that
    /// is also empty, creation fails with
    /// [`MediaSessionError::NotInitialized`]. Native failures surface as
    /// [`MediaSessionError::Creation`].
    pub fn create(
        backend: Arc<dyn MediaSessionBackend>,
        mut config: MediaSessionConfig,
    ) -> Result<Self> {
        if backend.requires_window_identity() && config.window.is_none() {
            config.window = Some(Self::required_window_identity()?);
        }

        let handle = backend
            .create(&config)
            .map_err(|e| MediaSessionError::Creation(e.to_string()))?;
        tracing::debug!(%handle, session_name = %config.session_name, "media session created");
        Ok(Self {
            backend,
            handle,
            slot: Arc::new(ControlSlot::default()),
            forwarder_registered: AtomicBool::new(false),
            closed: AtomicBool::new(false),
        })
    }

    fn required_window_identity() -> Result<WindowIdentity> {
        WindowHandleResolver::current().ok_or_else(|| {
            MediaSessionError::NotInitialized(
                "this platform binds media sessions to a window; resolve one with \
                 WindowHandleResolver before creating the session"
                    .into(),
            )
        })
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed.load(Ordering::Acquire) {
            Err(MediaSessionError::SessionClosed)
        } else {
            Ok(())
        }
    }

    pub fn handle(&self) -> MediaSessionHandle {
        self.handle
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Register the inbound event callback, replacing any previous one.
    ///
    /// The previous callback receives nothing after this returns, even for
    /// deliveries already in flight on a backend thread.
    pub fn attach(&self, callback: Arc<dyn MediaControlCallback>) -> Result<()> {
        self.ensure_open()?;
        // The backend sees one forwarder for the session's lifetime;
        // replacement happens in the slot, not at the backend.
        if !self.forwarder_registered.load(Ordering::Acquire) {
            self.backend.attach(self.handle, self.slot.clone())?;
            self.forwarder_registered.store(true, Ordering::Release);
        }
        *self.slot.slot.write() = Some(callback);
        Ok(())
    }

    /// Convenience for closure-based hosts.
    pub fn attach_fn<F>(&self, f: F) -> Result<()>
    where
        F: Fn(MediaControlEvent) + Send + Sync + 'static,
    {
        self.attach(Arc::new(FnCallback(f)))
    }

    /// Stop inbound event delivery. Outbound publishing keeps working, and a
    /// later [`attach`](Self::attach) resumes delivery.
    pub fn detach(&self) -> Result<()> {
        self.ensure_open()?;
        *self.slot.slot.write() = None;
        Ok(())
    }

    /// Publish track metadata. Last write wins; `None` fields clear the
    /// corresponding OS display.
    pub fn set_metadata(&self, metadata: &MediaMetadata) -> Result<()> {
        self.ensure_open()?;
        self.backend.set_metadata(self.handle, metadata)?;
        Ok(())
    }

    /// Publish playback status without a progress marker.
    pub fn set_playback(&self, status: MediaPlaybackStatus) -> Result<()> {
        self.ensure_open()?;
        self.backend.set_playback(self.handle, status, None)?;
        Ok(())
    }

    /// Publish playback status with a progress marker, for platforms that
    /// display a scrubber.
    pub fn set_playback_with_progress(
        &self,
        status: MediaPlaybackStatus,
        progress: Duration,
    ) -> Result<()> {
        self.ensure_open()?;
        self.backend
            .set_playback(self.handle, status, Some(progress))?;
        Ok(())
    }

    /// Close the session and destroy the native object.
    ///
    /// Idempotent: the first call detaches the callback, then destroys the
    /// handle; later calls are no-ops.
    pub fn close(&self) -> Result<()> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        *self.slot.slot.write() = None;
        if let Err(e) = self.backend.detach(self.handle) {
            tracing::warn!(handle = %self.handle, error = %e, "detach failed during close");
        }
        self.backend.destroy(self.handle)?;
        tracing::debug!(handle = %self.handle, "media session closed");
        Ok(())
    }
}

impl Drop for MediaControlSession {
    fn drop(&mut self) {
        if !self.is_closed() {
            tracing::warn!(handle = %self.handle, "media session dropped without close");
            let _ = self.close();
        }
    }
}

struct FnCallback<F>(F);

impl<F> MediaControlCallback for FnCallback<F>
where
    F: Fn(MediaControlEvent) + Send + Sync,
{
    fn on_event(&self, event: MediaControlEvent) {
        (self.0)(event);
    }
}
