//! Folding mined sections into a JSON Schema document.
//!
//! Sections in the singleton set become plain object schemas; everything
//! else gets the `oneOf[array-of-object, object]` wrapper so both the
//! single-occurrence and repeated-occurrence INI idioms validate. Keys
//! flagged mandatory during inference are promoted into the section's
//! `required` array in first-seen order.

use serde_json::{Map, Value, json};

use networkd_schema_core::{ConfigKind, SCHEMA_DIALECT, is_singleton_section, shared_definitions};

use crate::infer::InferredFragment;

/// One directive ready for assembly.
#[derive(Debug, Clone, PartialEq)]
pub struct MinedKey {
    /// Directive name.
    pub key: String,
    /// Inferred fragment and flags.
    pub fragment: InferredFragment,
}

/// One section's mined directives, in parser-table order.
#[derive(Debug, Clone, PartialEq)]
pub struct MinedSection {
    /// Section name.
    pub name: String,
    /// Directives in first-seen order.
    pub keys: Vec<MinedKey>,
}

/// Assembles mined sections into one Draft-07 schema document.
///
/// The full shared primitive dictionary is always emitted into
/// `definitions`, referenced or not, so `$ref` targets stay stable across
/// releases.
///
/// # Examples
///
/// ```
/// use networkd_schema_core::ConfigKind;
/// use networkd_schema_mining::{InferredFragment, MinedKey, MinedSection, assemble_document};
/// use serde_json::json;
///
/// let sections = vec![MinedSection {
///     name: "Match".into(),
///     keys: vec![MinedKey {
///         key: "Name".into(),
///         fragment: InferredFragment { schema: json!({ "type": "string" }), mandatory: false },
///     }],
/// }];
///
/// let doc = assemble_document(&sections, ConfigKind::Network, "v257");
/// assert_eq!(doc["title"], "Systemd network Configuration (v257)");
/// assert_eq!(doc["properties"]["Match"]["properties"]["Name"], json!({ "type": "string" }));
/// ```
pub fn assemble_document(sections: &[MinedSection], kind: ConfigKind, release: &str) -> Value {
    let mut properties = Map::new();

    for section in sections {
        let mut props = Map::new();
        let mut required: Vec<Value> = Vec::new();
        for mined in &section.keys {
            if mined.fragment.mandatory {
                required.push(json!(mined.key));
            }
            props.insert(mined.key.clone(), mined.fragment.schema.clone());
        }

        let mut section_schema = json!({
            "type": "object",
            "description": format!("[{}] section configuration", section.name),
            "properties": props,
            "additionalProperties": false
        });
        if !required.is_empty() {
            section_schema["required"] = Value::Array(required);
        }

        let value = if is_singleton_section(&section.name) {
            section_schema
        } else {
            json!({
                "oneOf": [
                    { "type": "array", "items": section_schema },
                    section_schema
                ],
                "description": format!("[{}] configuration (Can be repeated)", section.name)
            })
        };
        properties.insert(section.name.clone(), value);
    }

    json!({
        "$schema": SCHEMA_DIALECT,
        "$id": format!("https://systemd.io/schemas/{release}/{}.json", kind.name()),
        "title": format!("Systemd {} Configuration ({release})", kind.name()),
        "type": "object",
        "additionalProperties": false,
        "definitions": shared_definitions(),
        "properties": properties
    })
}
