//! Error types for frame storage.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OutputError {
    /// Stored frame not found.
    #[error("stored frame not found: {path}")]
    NotFound { path: PathBuf },

    /// Failed to create a directory.
    #[error("failed to create {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to open a file for reading or writing.
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Parquet encoding or decoding failed.
    #[error("parquet error in {path}: {message}")]
    Parquet { path: PathBuf, message: String },
}

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, OutputError>;
