//! # Boundary Traits
//!
//! Contracts between this core and its two external collaborators:
//!
//! - [`engine`] — the audio engine that owns decoding, mixing, and network
//!   fetching, reached only through opaque [`PlaybackHandle`]s.
//! - [`media`] — the OS media-session surface (MPRIS/SMTC/Now Playing),
//!   reached through opaque [`MediaSessionHandle`]s.
//!
//! Both collaborators own their native resources outright. This core only
//! stores the handle values and passes them back; it never dereferences
//! anything on the other side of the boundary. Handles are never shared
//! between two session objects and never reused after destruction.
//!
//! ## Threading
//!
//! All trait objects are `Send + Sync`. Operations may be invoked from any
//! thread; engines and backends serialize per handle internally. Callbacks
//! ([`EngineCallback`], [`MediaControlCallback`]) arrive on threads owned by
//! the native side, so implementations must be non-blocking and must marshal
//! any consumer-visible state change onto their own execution context.
//!
//! ## Error handling
//!
//! All boundary operations return [`BridgeError`]. The core crates translate
//! these into their own domain errors at the seam.

pub mod engine;
pub mod error;
pub mod media;

pub use engine::{AudioEngine, EngineCallback, EngineState, PlaybackHandle};
pub use error::{BridgeError, Result};
pub use media::{
    MediaControlCallback, MediaControlEvent, MediaMetadata, MediaPlaybackStatus,
    MediaSessionBackend, MediaSessionConfig, MediaSessionHandle, WindowIdentity,
};
