//! # Core Media Module
//!
//! Bridge between playback state and the OS "now playing" surface (MPRIS,
//! SMTC, macOS Now Playing).
//!
//! - [`MediaControlSession`]: outbound metadata/status publishing and inbound
//!   media-key delivery over one backend-owned session
//! - [`WindowHandleResolver`]: turns toolkit windows into the
//!   [`WindowIdentity`](bridge_traits::WindowIdentity) that window-bound
//!   platforms demand, via an ordered strategy chain and a process-wide slot
//!
//! The backend itself lives behind
//! [`bridge_traits::MediaSessionBackend`]; this crate never talks to the
//! platforms directly.

pub mod error;
pub mod session;
pub mod window;

pub use error::{MediaSessionError, Result};
pub use session::MediaControlSession;
pub use window::{
    HandleStrategy, NativeAccessor, PeerInspection, RawWindow, WindowHandleResolver, WindowSource,
};
