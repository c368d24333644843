//! Loading and idempotently writing schema documents.
//!
//! Writes are whole-document: the serialized text is produced first and
//! written in one call, so no partially-written JSON is ever left behind.
//! A write whose content is byte-identical to the existing file is skipped,
//! which keeps re-runs free of spurious file modifications.

use std::path::Path;

use serde_json::Value;
use tracing::info;

use crate::error::{Result, StoreError};

/// What a [`write_document_if_changed`] call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// No file existed; one was created.
    Created,
    /// The file existed with different content and was rewritten.
    Updated,
    /// The file already held byte-identical content; nothing was written.
    Unchanged,
}

/// Loads a JSON schema document from disk.
pub fn load_document(path: &Path) -> Result<Value> {
    let text = std::fs::read_to_string(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Serializes a document and writes it unless the file already holds
/// byte-identical content. Parent directories are created as needed.
///
/// # Examples
///
/// ```no_run
/// use networkd_schema_store::{WriteOutcome, write_document_if_changed};
/// use serde_json::json;
/// use std::path::Path;
///
/// let doc = json!({ "title": "Example" });
/// let outcome =
///     write_document_if_changed(Path::new("schemas/v257/example.json"), &doc).unwrap();
/// assert_eq!(outcome, WriteOutcome::Created);
/// ```
pub fn write_document_if_changed(path: &Path, document: &Value) -> Result<WriteOutcome> {
    let text = render_document(path, document)?;

    let outcome = match std::fs::read_to_string(path) {
        Ok(existing) if existing == text => {
            info!(" -> Skipping {} (unchanged)", path.display());
            return Ok(WriteOutcome::Unchanged);
        }
        Ok(_) => WriteOutcome::Updated,
        Err(_) => WriteOutcome::Created,
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| StoreError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    std::fs::write(path, &text).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!(" -> Wrote {}", path.display());
    Ok(outcome)
}

fn render_document(path: &Path, document: &Value) -> Result<String> {
    serde_json::to_string_pretty(document).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })
}
