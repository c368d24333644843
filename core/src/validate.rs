//! Structural validation of assembled schema documents.
//!
//! Catches the invariant violations the rest of the pipeline assumes away:
//! a document must carry `$schema`/`$id`/`title`/`definitions`/`properties`,
//! every section must unwrap to an object node, every `required` key must
//! exist in that node's `properties`, and every `$ref` must point at an
//! existing definition.
//!
//! # Examples
//!
//! ```
//! use networkd_schema_core::validate_document;
//! use serde_json::json;
//!
//! let doc = json!({
//!     "$schema": "http://json-schema.org/draft-07/schema#",
//!     "$id": "https://example.org/s.json",
//!     "title": "Example",
//!     "type": "object",
//!     "definitions": {},
//!     "properties": {
//!         "Match": { "type": "object", "properties": { "Name": {} }, "required": ["Name"] }
//!     }
//! });
//! assert!(validate_document(&doc).is_empty());
//! ```

use serde_json::{Map, Value};
use thiserror::Error;

use crate::node::{document_definitions, resolve_object_node};
use crate::types::SCHEMA_DIALECT;

/// A structural problem found in a schema document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationIssue {
    /// A top-level document field is absent.
    #[error("missing document field: {0}")]
    MissingField(&'static str),
    /// `$schema` names a dialect other than Draft-07.
    #[error("unexpected $schema dialect: {0}")]
    WrongDialect(String),
    /// A section does not unwrap to an object node with `properties`.
    #[error("section {0} is not object-like")]
    SectionNotObject(String),
    /// A `required` entry has no matching key in `properties`.
    #[error("required key {key} missing from properties of {section}")]
    RequiredKeyMissing {
        /// Section (or nested path) carrying the `required` array.
        section: String,
        /// The dangling required key.
        key: String,
    },
    /// A `$ref` points at a definition that does not exist.
    #[error("dangling $ref {reference} at {path}")]
    DanglingRef {
        /// JSON-pointer-ish location of the offending node.
        path: String,
        /// The unresolved reference string.
        reference: String,
    },
}

/// Validates a document, returning every issue found (empty = valid).
pub fn validate_document(document: &Value) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    for field in ["$schema", "$id", "title", "definitions", "properties"] {
        if document.get(field).is_none() {
            issues.push(ValidationIssue::MissingField(field));
        }
    }
    if let Some(dialect) = document.get("$schema").and_then(Value::as_str) {
        if dialect != SCHEMA_DIALECT {
            issues.push(ValidationIssue::WrongDialect(dialect.to_string()));
        }
    }

    let definitions = document_definitions(document);
    if let Some(sections) = document.get("properties").and_then(Value::as_object) {
        for (name, section) in sections {
            match resolve_object_node(section, definitions) {
                Some(node) => check_object_node(name, node, &mut issues),
                None => issues.push(ValidationIssue::SectionNotObject(name.clone())),
            }
        }
    }

    check_refs(document, "#", definitions, &mut issues);

    issues
}

fn check_object_node(path: &str, node: &Value, issues: &mut Vec<ValidationIssue>) {
    let properties = node
        .get("properties")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();

    if let Some(required) = node.get("required").and_then(Value::as_array) {
        for key in required.iter().filter_map(Value::as_str) {
            if !properties.contains_key(key) {
                issues.push(ValidationIssue::RequiredKeyMissing {
                    section: path.to_string(),
                    key: key.to_string(),
                });
            }
        }
    }

    // Nested objects (none today in generated documents, but curated ones
    // are free to introduce them).
    for (key, child) in &properties {
        if child.get("properties").is_some_and(Value::is_object) {
            check_object_node(&format!("{path}.{key}"), child, issues);
        }
    }
}

fn check_refs(
    value: &Value,
    path: &str,
    definitions: Option<&Map<String, Value>>,
    issues: &mut Vec<ValidationIssue>,
) {
    match value {
        Value::Object(map) => {
            if let Some(reference) = map.get("$ref").and_then(Value::as_str) {
                let resolved = reference
                    .strip_prefix("#/definitions/")
                    .and_then(|name| definitions.and_then(|defs| defs.get(name)));
                if resolved.is_none() {
                    issues.push(ValidationIssue::DanglingRef {
                        path: path.to_string(),
                        reference: reference.to_string(),
                    });
                }
            }
            for (key, child) in map {
                check_refs(child, &format!("{path}/{key}"), definitions, issues);
            }
        }
        Value::Array(items) => {
            for (idx, child) in items.iter().enumerate() {
                check_refs(child, &format!("{path}/{idx}"), definitions, issues);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn minimal_doc() -> Value {
        json!({
            "$schema": SCHEMA_DIALECT,
            "$id": "https://example.org/s.json",
            "title": "Test (v257)",
            "type": "object",
            "definitions": { "seconds": { "type": "string" } },
            "properties": {}
        })
    }

    #[test]
    fn test_minimal_document_is_valid() {
        assert!(validate_document(&minimal_doc()).is_empty());
    }

    #[test]
    fn test_missing_fields_reported() {
        let issues = validate_document(&json!({}));
        assert!(issues.contains(&ValidationIssue::MissingField("$schema")));
        assert!(issues.contains(&ValidationIssue::MissingField("properties")));
    }

    #[test]
    fn test_wrong_dialect_reported() {
        let mut doc = minimal_doc();
        doc["$schema"] = json!("https://json-schema.org/draft/2020-12/schema");
        assert!(
            validate_document(&doc)
                .iter()
                .any(|i| matches!(i, ValidationIssue::WrongDialect(_)))
        );
    }

    #[test]
    fn test_required_must_exist_in_properties() {
        let mut doc = minimal_doc();
        doc["properties"] = json!({
            "Match": { "type": "object", "properties": { "Name": {} }, "required": ["Name", "Missing"] }
        });
        let issues = validate_document(&doc);
        assert_eq!(
            issues,
            vec![ValidationIssue::RequiredKeyMissing {
                section: "Match".into(),
                key: "Missing".into(),
            }]
        );
    }

    #[test]
    fn test_one_of_wrapped_section_is_object_like() {
        let mut doc = minimal_doc();
        doc["properties"] = json!({
            "Route": {
                "oneOf": [
                    { "type": "array", "items": { "type": "object", "properties": { "Gateway": {} } } },
                    { "type": "object", "properties": { "Gateway": {} } }
                ]
            }
        });
        assert!(validate_document(&doc).is_empty());
    }

    #[test]
    fn test_scalar_section_reported() {
        let mut doc = minimal_doc();
        doc["properties"] = json!({ "Broken": { "type": "string" } });
        assert_eq!(
            validate_document(&doc),
            vec![ValidationIssue::SectionNotObject("Broken".into())]
        );
    }

    #[test]
    fn test_dangling_ref_reported() {
        let mut doc = minimal_doc();
        doc["properties"] = json!({
            "Match": {
                "type": "object",
                "properties": { "Timeout": { "$ref": "#/definitions/minutes" } }
            }
        });
        let issues = validate_document(&doc);
        assert!(issues.iter().any(|i| matches!(
            i,
            ValidationIssue::DanglingRef { reference, .. } if reference == "#/definitions/minutes"
        )));
    }
}
