//! Error types for source mining.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while fetching or mining a release's sources.
///
/// Only checkout failures abort a release; missing or malformed source
/// files degrade to empty mining results at the call site instead.
#[derive(Debug, Error)]
pub enum MiningError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A git subprocess exited non-zero.
    #[error("git {operation} failed for {tag}: {stderr}")]
    Checkout {
        /// The git operation that failed (e.g. `fetch`).
        operation: &'static str,
        /// Release tag being fetched.
        tag: String,
        /// Captured stderr from the subprocess.
        stderr: String,
    },

    /// A git subprocess exceeded its time budget.
    #[error("git {operation} timed out for {tag}")]
    CheckoutTimeout {
        /// The git operation that timed out.
        operation: &'static str,
        /// Release tag being fetched.
        tag: String,
    },

    /// A local source tree path does not exist.
    #[error("source tree not found: {0}")]
    SourceTreeMissing(PathBuf),
}
