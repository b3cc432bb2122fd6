//! # Core Runtime Module
//!
//! Foundational infrastructure shared by the workspace crates:
//! - Logging and tracing initialization ([`logging`])
//! - The runtime error type ([`error`])
//!
//! The playback and media-session crates emit through `tracing`; hosts wire
//! the subscriber here once at startup.

pub mod error;
pub mod logging;

pub use error::{Error, Result};
pub use logging::{init_logging, LogFormat, LoggingConfig};
