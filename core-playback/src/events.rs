//! # Event Bridge
//!
//! Marshals engine-originated notifications into an ordered, at-most-one
//! listener callback.
//!
//! The engine raises notifications on threads it owns. The bridge never runs
//! consumer code on those threads: its [`EngineCallback`] implementation only
//! enqueues a signal into a single-consumer channel, and a dispatch task
//! owned by the session drains the queue and invokes whichever callback is
//! registered at delivery time.
//!
//! ```text
//! engine thread ──on_state/on_metadata/on_error──> mpsc queue
//!                                                     │ (FIFO, unbounded)
//!                                dispatch task <──────┘
//!                                      │ slot read lock
//!                                      v
//!                              PlaybackCallback
//! ```
//!
//! ## Replacement semantics
//!
//! The callback lives in a single slot, not a broadcast list. Deliveries
//! happen while the slot's read lock is held, and `set_callback` /
//! `clear_callback` take the write lock, so either call linearizes against
//! any in-flight delivery: once it returns, the previous callback receives
//! nothing further. Signals queued while no callback is registered are
//! dropped, never replayed.
//!
//! ## Ordering
//!
//! One queue, one consumer: events are delivered in the order the engine
//! raised them, one call per signal, with no coalescing. A burst of N
//! metadata pairs is N `on_metadata` calls.

use bridge_traits::{EngineCallback, EngineState};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Observed transport state, as reported to consumers. This mirrors what the
/// engine saw; it is never a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum PlaybackEvent {
    /// A network-backed source is connecting or buffering.
    Connecting,
    Playing,
    Paused,
    Stopped,
}

impl From<EngineState> for PlaybackEvent {
    fn from(state: EngineState) -> Self {
        match state {
            EngineState::Connecting => PlaybackEvent::Connecting,
            EngineState::Playing => PlaybackEvent::Playing,
            EngineState::Paused => PlaybackEvent::Paused,
            EngineState::Stopped => PlaybackEvent::Stopped,
        }
    }
}

/// Consumer-facing notification surface of a playback session.
///
/// At most one callback is active per session. Bodies must return quickly
/// and must not block: delivery for the whole session stalls behind a slow
/// callback.
pub trait PlaybackCallback: Send + Sync {
    /// Observed transport state changed.
    fn on_event(&self, event: PlaybackEvent);

    /// A stream metadata pair arrived.
    fn on_metadata(&self, key: &str, value: &str);

    /// The engine reported an unrecoverable error. A synthesized
    /// [`PlaybackEvent::Stopped`] always follows, so consumers never have to
    /// infer transport state from the error alone.
    fn on_error(&self, message: &str);
}

/// One queued notification, in engine order.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum EngineSignal {
    Event(PlaybackEvent),
    Metadata { key: String, value: String },
    Error { message: String },
}

/// Single-slot callback registry plus the native-side enqueue half.
///
/// Owned by a [`PlayerSession`](crate::session::PlayerSession); the session
/// registers the bridge as the engine callback and spawns
/// [`EventBridge::dispatch_loop`] to drain the queue.
pub struct EventBridge {
    slot: RwLock<Option<Arc<dyn PlaybackCallback>>>,
    queue: mpsc::UnboundedSender<EngineSignal>,
}

impl EventBridge {
    pub(crate) fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<EngineSignal>) {
        let (queue, rx) = mpsc::unbounded_channel();
        let bridge = Arc::new(Self {
            slot: RwLock::new(None),
            queue,
        });
        (bridge, rx)
    }

    /// Replace the active callback. The previous callback receives no events
    /// after this returns.
    pub fn set_callback(&self, callback: Arc<dyn PlaybackCallback>) {
        *self.slot.write() = Some(callback);
    }

    /// Remove the active callback. Zero deliveries occur after this returns,
    /// including for signals already queued.
    pub fn clear_callback(&self) {
        *self.slot.write() = None;
    }

    pub fn has_callback(&self) -> bool {
        self.slot.read().is_some()
    }

    fn deliver(&self, signal: EngineSignal) {
        // Read lock held across the invocation: set/clear_callback block
        // until an in-flight delivery finishes.
        let guard = self.slot.read();
        let Some(callback) = guard.as_ref() else {
            return;
        };
        match signal {
            EngineSignal::Event(event) => callback.on_event(event),
            EngineSignal::Metadata { key, value } => callback.on_metadata(&key, &value),
            EngineSignal::Error { message } => callback.on_error(&message),
        }
    }

    /// Drain the queue until the session shuts down or every enqueue half is
    /// gone.
    pub(crate) async fn dispatch_loop(
        self: Arc<Self>,
        mut rx: mpsc::UnboundedReceiver<EngineSignal>,
        shutdown: CancellationToken,
    ) {
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                signal = rx.recv() => {
                    match signal {
                        Some(signal) => self.deliver(signal),
                        None => break,
                    }
                }
            }
        }
        tracing::trace!("event dispatch loop finished");
    }
}

impl EngineCallback for EventBridge {
    fn on_state(&self, state: EngineState) {
        let _ = self.queue.send(EngineSignal::Event(state.into()));
    }

    fn on_metadata(&self, key: &str, value: &str) {
        let _ = self.queue.send(EngineSignal::Metadata {
            key: key.to_owned(),
            value: value.to_owned(),
        });
    }

    fn on_error(&self, message: &str) {
        tracing::error!(message, "engine reported playback error");
        let _ = self.queue.send(EngineSignal::Error {
            message: message.to_owned(),
        });
        // The engine stops the instance after an unrecoverable error;
        // synthesize the state change so consumers see cause then effect.
        let _ = self.queue.send(EngineSignal::Event(PlaybackEvent::Stopped));
    }
}
