use thiserror::Error;

/// Errors raised at the native-engine and media-session boundaries.
///
/// Boundary implementations convert their platform-specific failures into
/// these variants; the core crates translate them into domain errors at the
/// crate seam.
#[derive(Error, Debug)]
pub enum BridgeError {
    /// The handle does not reference a live native object (already destroyed,
    /// or never allocated by this engine).
    #[error("handle {0} not found")]
    HandleNotFound(u64),

    /// The operation is not supported on this platform or backend.
    #[error("operation not supported: {0}")]
    NotSupported(String),

    /// The native side reported a failure.
    #[error("bridge operation failed: {0}")]
    OperationFailed(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BridgeError>;
