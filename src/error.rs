//! Error types for snapsweep operations

use thiserror::Error;

/// Main error type for snapsweep operations.
///
/// Only configuration and run-setup problems surface here. Per-item scan,
/// copy, and retention failures are reported as values (`CopyRecord::Failed`,
/// `RetentionDecision::Failed`) so a run can continue past them.
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid configuration: {reason}")]
    Configuration { reason: String },
}

/// Result type alias for snapsweep operations
pub type Result<T> = std::result::Result<T, Error>;
