//! Logging & tracing infrastructure.
//!
//! Configures the `tracing-subscriber` stack used across the workspace.
//! Hosts call [`init_logging`] once at startup; libraries only emit through
//! the `tracing` macros and never install a subscriber themselves.
//!
//! ```ignore
//! use core_runtime::logging::{init_logging, LogFormat, LoggingConfig};
//!
//! init_logging(LoggingConfig::default().with_format(LogFormat::Compact))?;
//! tracing::info!("player core ready");
//! ```

use crate::error::{Error, Result};
use tracing_subscriber::{filter::EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable pretty format with colors.
    Pretty,
    /// Structured JSON format for machine parsing.
    Json,
    /// Compact single-line format for production.
    Compact,
}

impl Default for LogFormat {
    fn default() -> Self {
        #[cfg(debug_assertions)]
        return Self::Pretty;

        #[cfg(not(debug_assertions))]
        return Self::Json;
    }
}

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Output format.
    pub format: LogFormat,
    /// Filter directive string (e.g. `"core_playback=debug,info"`). When
    /// unset, the `RUST_LOG` environment variable applies, defaulting to
    /// `info`.
    pub filter: Option<String>,
    /// Display the target module in log lines.
    pub display_target: bool,
    /// Display thread info (useful when chasing engine-thread callbacks).
    pub display_thread_info: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            filter: None,
            display_target: true,
            display_thread_info: false,
        }
    }
}

impl LoggingConfig {
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn with_thread_info(mut self, enabled: bool) -> Self {
        self.display_thread_info = enabled;
        self
    }
}

/// Install the global tracing subscriber.
///
/// Fails if a subscriber is already installed or the filter string is
/// invalid.
pub fn init_logging(config: LoggingConfig) -> Result<()> {
    let filter = match &config.filter {
        Some(directives) => EnvFilter::try_new(directives)
            .map_err(|e| Error::Config(format!("invalid log filter {directives:?}: {e}")))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(config.display_target)
        .with_thread_ids(config.display_thread_info)
        .with_thread_names(config.display_thread_info);

    let registry = tracing_subscriber::registry().with(filter);

    let result = match config.format {
        LogFormat::Pretty => registry.with(fmt_layer.pretty()).try_init(),
        LogFormat::Json => registry.with(fmt_layer.json()).try_init(),
        LogFormat::Compact => registry.with(fmt_layer.compact()).try_init(),
    };

    result.map_err(|e| Error::Internal(format!("failed to install subscriber: {e}")))
}
