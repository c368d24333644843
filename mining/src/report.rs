//! Mining summaries for console reporting.
//!
//! One summary per mined config: section/key/mandatory counts plus a
//! histogram over resolved type categories, so a release's mining quality
//! can be eyeballed from the build log.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::assemble::MinedSection;

/// Counts describing one mined config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MiningSummary {
    /// Config name (e.g. `network`).
    pub config: String,
    /// Number of mined sections.
    pub sections: usize,
    /// Total directives across sections.
    pub keys: usize,
    /// Directives flagged mandatory.
    pub mandatory: usize,
    /// Type-category histogram, descending by count then label.
    pub type_counts: Vec<(String, usize)>,
}

/// Summarizes mined sections for one config.
pub fn summarize(sections: &[MinedSection], config: &str) -> MiningSummary {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    let mut keys = 0;
    let mut mandatory = 0;

    for section in sections {
        keys += section.keys.len();
        for mined in &section.keys {
            if mined.fragment.mandatory {
                mandatory += 1;
            }
            *counts.entry(type_label(&mined.fragment.schema)).or_default() += 1;
        }
    }

    let mut type_counts: Vec<(String, usize)> = counts.into_iter().collect();
    type_counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    MiningSummary {
        config: config.to_string(),
        sections: sections.len(),
        keys,
        mandatory,
        type_counts,
    }
}

/// Human-readable category for a schema fragment.
///
/// # Examples
///
/// ```
/// use networkd_schema_mining::type_label;
/// use serde_json::json;
///
/// assert_eq!(type_label(&json!({ "$ref": "#/definitions/bytes" })), "Ref: bytes");
/// assert_eq!(
///     type_label(&json!({ "type": "array", "items": { "type": "boolean" } })),
///     "Array of Boolean"
/// );
/// assert_eq!(type_label(&json!({ "type": "string", "enum": ["a"] })), "String (Enum)");
/// ```
pub fn type_label(schema: &Value) -> String {
    if let Some(arms) = schema.get("allOf").and_then(Value::as_array) {
        if let Some(first) = arms.first() {
            return type_label(first);
        }
    }
    if let Some(reference) = schema.get("$ref").and_then(Value::as_str) {
        let name = reference.rsplit('/').next().unwrap_or(reference);
        return format!("Ref: {name}");
    }
    let Some(kind) = schema.get("type").and_then(Value::as_str) else {
        return "Unknown/Generic".to_string();
    };
    match kind {
        "array" => {
            let items = schema.get("items").cloned().unwrap_or(Value::Null);
            format!("Array of {}", type_label(&items))
        }
        "string" => {
            if schema.get("enum").is_some() {
                "String (Enum)".to_string()
            } else if schema.get("pattern").is_some() || schema.get("format").is_some() {
                "String (Pattern/Format)".to_string()
            } else {
                "String (Freeform)".to_string()
            }
        }
        "integer" => {
            if schema.get("minimum").is_some() || schema.get("maximum").is_some() {
                "Integer (Range)".to_string()
            } else {
                "Integer".to_string()
            }
        }
        "boolean" => "Boolean".to_string(),
        other => {
            let mut label = other.to_string();
            if let Some(first) = label.get_mut(..1) {
                first.make_ascii_uppercase();
            }
            label
        }
    }
}

impl fmt::Display for MiningSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Summary for {} ---", self.config)?;
        writeln!(f, "Sections: {}", self.sections)?;
        writeln!(f, "Total Items: {}", self.keys)?;
        writeln!(f, "Mandatory Items: {}", self.mandatory)?;
        writeln!(f, "Type Breakdown:")?;
        for (label, count) in &self.type_counts {
            writeln!(f, "  - {label:<25}: {count}")?;
        }
        write!(f, "---------------------------------")
    }
}
