//! # Position Poller
//!
//! Periodic transport sampling for progress UIs.
//!
//! The engine has no push notification for position, so consumers that want a
//! moving progress bar sample it. The poller centralizes that: one background
//! task per observed session reads position, duration and seekability every
//! tick and publishes an immutable [`TransportSnapshot`] through a `watch`
//! channel. Consumers subscribe instead of polling the engine themselves.
//!
//! The poller is an observer. It holds the session weakly and never extends
//! its lifetime: when the last strong reference drops, the polling task exits
//! on its next tick.
//!
//! ## Latching
//!
//! Duration and seekability arrive late for network sources. Once observed,
//! both are latched for the remainder of the playback: a transient failed
//! read never flickers a known duration back to unknown. The latch resets
//! when the session's playback generation changes, i.e. when a new source
//! starts.
//!
//! ## Seek debouncing
//!
//! While the user drags a scrubber, the UI calls
//! [`PollerHandle::set_pending_seek_target`] per drag tick; snapshots then
//! show the target instead of the engine position, so the bar tracks the
//! thumb. Releasing the thumb calls [`PollerHandle::commit_seek`], which
//! issues exactly one engine seek for the final target. No seek happens
//! mid-drag.

use crate::error::{PlaybackError, Result};
use crate::session::PlayerSession;
use parking_lot::Mutex;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

/// Default sampling cadence.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(200);

/// One observed transport state, published per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TransportSnapshot {
    /// Current position, clamped to `duration` when one is known. While a
    /// seek is pending this reports the seek target, not the engine read.
    pub position: Duration,
    /// Latched total duration; `None` until the engine determines one.
    pub duration: Option<Duration>,
    /// Latched seekability of the current source.
    pub seekable: bool,
    /// Playback generation the snapshot belongs to; bumps when a new source
    /// starts and the latches reset.
    pub generation: u64,
}

/// Poller tuning.
#[derive(Debug, Clone, Copy)]
pub struct PollerConfig {
    pub interval: Duration,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl PollerConfig {
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }
}

struct PollerShared {
    session: Weak<PlayerSession>,
    /// Debounced scrub target; `Some` while a drag is in progress.
    pending_seek: Mutex<Option<Duration>>,
    snapshot_tx: watch::Sender<TransportSnapshot>,
}

/// Background sampler for one [`PlayerSession`].
pub struct PositionPoller;

impl PositionPoller {
    /// Start sampling `session` on the configured cadence.
    ///
    /// Must be called within a Tokio runtime. The task stops when the handle
    /// is stopped or dropped, or when the session is closed or dropped.
    pub fn spawn(session: &Arc<PlayerSession>, config: PollerConfig) -> PollerHandle {
        let (snapshot_tx, snapshot_rx) = watch::channel(TransportSnapshot::default());
        let shared = Arc::new(PollerShared {
            session: Arc::downgrade(session),
            pending_seek: Mutex::new(None),
            snapshot_tx,
        });
        let cancel = CancellationToken::new();

        tokio::spawn(poll_loop(shared.clone(), config, cancel.child_token()));

        PollerHandle {
            shared,
            cancel,
            snapshot_rx,
        }
    }
}

/// Consumer-side handle: snapshot subscription plus seek debouncing.
///
/// Dropping the handle stops the polling task.
pub struct PollerHandle {
    shared: Arc<PollerShared>,
    cancel: CancellationToken,
    snapshot_rx: watch::Receiver<TransportSnapshot>,
}

impl PollerHandle {
    /// Subscribe to published snapshots. Each receiver sees the latest value
    /// immediately and changes thereafter.
    pub fn snapshots(&self) -> watch::Receiver<TransportSnapshot> {
        self.snapshot_rx.clone()
    }

    /// The most recently published snapshot.
    pub fn latest(&self) -> TransportSnapshot {
        *self.snapshot_rx.borrow()
    }

    /// Record a scrub target. Overwrites any previous target; snapshots show
    /// the target until the seek is committed or cancelled. No engine seek is
    /// issued here.
    pub fn set_pending_seek_target(&self, target: Duration) {
        *self.shared.pending_seek.lock() = Some(target);
    }

    /// Abandon the pending scrub target without seeking.
    pub fn cancel_pending_seek(&self) {
        *self.shared.pending_seek.lock() = None;
    }

    pub fn has_pending_seek(&self) -> bool {
        self.shared.pending_seek.lock().is_some()
    }

    /// Issue the single engine seek for the pending target, if any.
    ///
    /// Returns the committed target, or `None` when no scrub was pending.
    /// The target is consumed either way; a failed seek is not retried.
    pub fn commit_seek(&self) -> Result<Option<Duration>> {
        let Some(target) = self.shared.pending_seek.lock().take() else {
            return Ok(None);
        };
        let session = self
            .shared
            .session
            .upgrade()
            .ok_or(PlaybackError::SessionClosed)?;
        session.seek_to(target)?;
        Ok(Some(target))
    }

    /// Stop the polling task. Snapshots already published stay readable.
    pub fn stop(&self) {
        self.cancel.cancel();
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn poll_loop(shared: Arc<PollerShared>, config: PollerConfig, cancel: CancellationToken) {
    let mut ticker = tokio::time::interval(config.interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    // Latches, reset per playback generation.
    let mut latched_duration: Option<Duration> = None;
    let mut latched_seekable = false;
    let mut seen_generation: u64 = 0;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }

        let Some(session) = shared.session.upgrade() else {
            break;
        };
        if session.is_closed() {
            break;
        }
        if !session.has_started() {
            continue;
        }

        let generation = session.generation();
        if generation != seen_generation {
            latched_duration = None;
            latched_seekable = false;
            seen_generation = generation;
        }

        let position = match session.position() {
            Ok(position) => position,
            Err(e) => {
                // Skip the tick, keep the last snapshot on screen.
                tracing::debug!(error = %e, "position read failed, skipping tick");
                continue;
            }
        };
        if let Ok(Some(duration)) = session.duration() {
            latched_duration = Some(duration);
        }
        if session.seekable_lenient() {
            latched_seekable = true;
        }

        let mut shown = match *shared.pending_seek.lock() {
            Some(target) => target,
            None => position,
        };
        if let Some(duration) = latched_duration {
            shown = shown.min(duration);
        }

        shared.snapshot_tx.send_replace(TransportSnapshot {
            position: shown,
            duration: latched_duration,
            seekable: latched_seekable,
            generation,
        });
    }
    tracing::trace!("position poll loop finished");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_cadence_is_two_hundred_millis() {
        assert_eq!(PollerConfig::default().interval, Duration::from_millis(200));
        assert_eq!(
            PollerConfig::default()
                .with_interval(Duration::from_millis(50))
                .interval,
            Duration::from_millis(50)
        );
    }

    #[test]
    fn snapshot_defaults_are_idle() {
        let snapshot = TransportSnapshot::default();
        assert_eq!(snapshot.position, Duration::ZERO);
        assert_eq!(snapshot.duration, None);
        assert!(!snapshot.seekable);
    }
}
