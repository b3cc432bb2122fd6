//! # Core Playback Module
//!
//! Playback-session core over an opaque native audio engine.
//!
//! The engine (see [`bridge_traits::AudioEngine`]) owns decoding, mixing, and
//! network fetching; this crate owns everything a host application needs on
//! top of it:
//!
//! - [`PlayerSession`]: handle lifecycle and transport control with
//!   fail-loudly close semantics
//! - [`EventBridge`] / [`PlaybackCallback`]: ordered, single-listener event
//!   delivery off the engine's threads
//! - [`PositionPoller`]: periodic transport snapshots with latched
//!   duration/seekability and debounced scrubbing
//! - [`NetworkTrustPolicy`]: process-wide TLS trust pushed across the
//!   boundary
//!
//! ```no_run
//! # use std::sync::Arc;
//! # use core_playback::{PlayerSession, PollerConfig, PositionPoller};
//! # fn demo(engine: Arc<dyn bridge_traits::AudioEngine>) -> core_playback::Result<()> {
//! let session = PlayerSession::create(engine)?;
//! session.play_url("https://stream.example.com/live.m3u8", false)?;
//! let poller = PositionPoller::spawn(&session, PollerConfig::default());
//! let _snapshot = poller.latest();
//! session.close()?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod events;
pub mod net;
pub mod poller;
pub mod session;

pub use error::{PlaybackError, Result};
pub use events::{EventBridge, PlaybackCallback, PlaybackEvent};
pub use net::NetworkTrustPolicy;
pub use poller::{
    PollerConfig, PollerHandle, PositionPoller, TransportSnapshot, DEFAULT_POLL_INTERVAL,
};
pub use session::PlayerSession;
