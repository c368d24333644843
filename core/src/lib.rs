//! Core data model and schema-node utilities for networkd schema derivation.
//!
//! This crate defines the foundational types shared by the mining, diffing,
//! and storage crates:
//!
//! - [`DocTable`] / [`ParserTable`] — ordered tables of directives mined
//!   from DocBook man pages and gperf parser tables.
//! - [`ConfigKind`] — the four networkd configuration file kinds and their
//!   source locations in a systemd tree.
//! - [`shared_definitions`] — the fixed primitive-type dictionary every
//!   emitted document carries in `definitions`.
//! - [`resolve_object_node`] / [`resolve_object_node_mut`] — the single
//!   combinator-unwrapping resolver used by the differ, the applier, and
//!   the validator.
//! - [`validate_document`] — structural document validation.
//!
//! # Example
//!
//! ```
//! use networkd_schema_core::{resolve_properties, shared_definitions};
//! use serde_json::json;
//!
//! let section = json!({
//!     "oneOf": [
//!         { "type": "array", "items": { "type": "object", "properties": { "Gateway": {} } } },
//!         { "type": "object", "properties": { "Gateway": {} } }
//!     ]
//! });
//! let props = resolve_properties(&section, None).unwrap();
//! assert!(props.contains_key("Gateway"));
//!
//! assert!(shared_definitions().contains_key("ip_address"));
//! ```

mod definitions;
mod node;
mod types;
mod validate;

pub use definitions::{
    DEFINITION_NAMES, SINGLETON_SECTIONS, definition_ref, is_singleton_section, shared_definitions,
};
pub use node::{
    MAX_UNWRAP_DEPTH, document_definitions, resolve_object_node, resolve_object_node_mut,
    resolve_properties, resolve_properties_mut,
};
pub use types::*;
pub use validate::{ValidationIssue, validate_document};
