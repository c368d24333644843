//! Error types for schema document storage.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur reading or writing schema documents.
#[derive(Debug, Error)]
pub enum StoreError {
    /// File I/O failure.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// File being read or written.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// JSON parsing or serialization failure.
    #[error("JSON error at {path}: {source}")]
    Json {
        /// File being parsed or serialized.
        path: PathBuf,
        /// Underlying error.
        source: serde_json::Error,
    },
}

/// Convenience alias for results with [`StoreError`].
pub type Result<T> = std::result::Result<T, StoreError>;
