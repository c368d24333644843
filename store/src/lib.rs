//! On-disk layout and idempotent writes for networkd schema documents.
//!
//! The repository keeps three document trees: disposable generated
//! snapshots per release, the hand-curated base documents, and the
//! published curated lineage. [`StoreLayout`] knows where each lives;
//! [`write_document_if_changed`] keeps rebuilds idempotent by skipping
//! byte-identical writes.
//!
//! # Example
//!
//! ```
//! use networkd_schema_core::ConfigKind;
//! use networkd_schema_store::StoreLayout;
//! use std::path::Path;
//!
//! let layout = StoreLayout::new(Path::new("."));
//! let path = layout.published_document("v257", ConfigKind::Network);
//! assert!(path.ends_with("schemas/v257/systemd.network.schema.json"));
//! ```

mod documents;
mod error;
mod layout;

pub use documents::{WriteOutcome, load_document, write_document_if_changed};
pub use error::{Result, StoreError};
pub use layout::{CANONICAL_ID_BASE, StoreLayout};
