//! Workspace facade crate.
//!
//! Re-exports the individual workspace crates so host applications can depend
//! on `playbridge-workspace` alone instead of wiring `bridge-traits`,
//! `core-playback`, `core-media`, and `core-runtime` individually.

pub use bridge_traits;
pub use core_media;
pub use core_playback;
pub use core_runtime;
