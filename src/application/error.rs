//! Application-level errors

use std::path::PathBuf;
use thiserror::Error;

/// Application errors cover snapshot ingestion and configuration.
///
/// The domain layer is infallible, so nothing here wraps it.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("invalid snapshot: {message}")]
    InvalidSnapshot { message: String },

    #[error("snapshot not found: {0}")]
    SnapshotNotFound(PathBuf),

    #[error("config error: {message}")]
    Config { message: String },

    #[error("operation failed: {context}")]
    OperationFailed {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
