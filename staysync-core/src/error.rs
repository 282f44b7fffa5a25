//! Error types for staysync.

use thiserror::Error;

/// Errors that can occur at the edges of the echo analyzer.
///
/// The analyzer itself never fails; these cover configuration loading,
/// policy validation and caller-side record checks.
#[derive(Error, Debug)]
pub enum StaysyncError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid policy: {0}")]
    InvalidPolicy(String),

    #[error("Invalid record '{id}': {reason}")]
    InvalidRecord { id: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for staysync operations.
pub type StaysyncResult<T> = Result<T, StaysyncError>;
