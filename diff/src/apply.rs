//! Replaying a structural diff onto a curated schema document.
//!
//! Application is non-destructive by construction: only keys named by the
//! diff are touched, and surviving properties keep their hand-curated
//! definitions bit for bit. Removals run before additions at every level;
//! the two operate on disjoint key sets, so the order only affects log
//! readability.
//!
//! Nested instructions whose target key is missing, or does not unwrap to
//! an object node, are skipped silently — the curated schema may have
//! already incorporated that change by hand.

use std::collections::BTreeMap;

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::info;

use networkd_schema_core::resolve_properties_mut;

use crate::structural::{Addition, Removal, StructuralDiff};

/// Errors from diff application.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApplyError {
    /// The curated document has no top-level `properties` map to apply
    /// into. The original tooling silently no-opped here; failing loudly is
    /// deliberate, since a curated document without `properties` is always
    /// a broken input rather than a best-effort case.
    #[error("curated document has no top-level properties map")]
    MissingProperties,
}

/// Applies a structural diff to a curated document, returning a new
/// document. The input is never mutated.
///
/// # Examples
///
/// ```
/// use networkd_schema_diff::{apply, diff};
/// use serde_json::json;
///
/// let base = json!({ "properties": { "A": {} } });
/// let target = json!({ "properties": { "A": {}, "B": { "type": "string" } } });
/// let curated = json!({ "properties": { "A": { "type": "integer" } } });
///
/// let derived = apply(&curated, &diff(&base, &target)).unwrap();
/// assert_eq!(derived["properties"]["A"], json!({ "type": "integer" }));
/// assert_eq!(derived["properties"]["B"], json!({ "type": "string" }));
/// ```
pub fn apply(curated: &Value, delta: &StructuralDiff) -> Result<Value, ApplyError> {
    let mut document = curated.clone();
    let properties = document
        .get_mut("properties")
        .and_then(Value::as_object_mut)
        .ok_or(ApplyError::MissingProperties)?;

    apply_removals(properties, &delta.remove);
    apply_additions(properties, &delta.add);
    Ok(document)
}

fn apply_removals(properties: &mut Map<String, Value>, removals: &BTreeMap<String, Removal>) {
    for (key, removal) in removals {
        match removal {
            Removal::Leaf => {
                // shift_remove keeps the surviving keys in curated order.
                if properties.shift_remove(key).is_some() {
                    info!("- Removing {key}");
                }
            }
            Removal::Nested { remove } => {
                let Some(entry) = properties.get_mut(key) else {
                    continue;
                };
                let Some(sub) = resolve_properties_mut(entry) else {
                    continue;
                };
                apply_removals(sub, remove);
            }
        }
    }
}

fn apply_additions(properties: &mut Map<String, Value>, additions: &BTreeMap<String, Addition>) {
    for (key, addition) in additions {
        match addition {
            Addition::Property { schema } => {
                info!("+ Adding {key}");
                properties.insert(key.clone(), schema.clone());
            }
            Addition::Nested { add } => {
                let Some(entry) = properties.get_mut(key) else {
                    continue;
                };
                let Some(sub) = resolve_properties_mut(entry) else {
                    continue;
                };
                apply_additions(sub, add);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structural::diff;
    use serde_json::json;

    #[test]
    fn test_addition_scenario() {
        let base = json!({ "properties": { "A": {} } });
        let target = json!({ "properties": { "A": {}, "B": { "type": "string" } } });
        let curated = json!({ "properties": { "A": { "type": "integer" } } });

        let derived = apply(&curated, &diff(&base, &target)).unwrap();
        assert_eq!(
            derived["properties"],
            json!({ "A": { "type": "integer" }, "B": { "type": "string" } })
        );
    }

    #[test]
    fn test_removal_scenario() {
        let base = json!({ "properties": { "A": {}, "B": {} } });
        let target = json!({ "properties": { "A": {} } });
        let curated = json!({ "properties": { "A": {}, "B": { "description": "old" } } });

        let derived = apply(&curated, &diff(&base, &target)).unwrap();
        assert_eq!(derived["properties"], json!({ "A": {} }));
    }

    #[test]
    fn test_nested_scenario() {
        // The §8 nested scenario: add Sec.C, remove Sec.B.
        let mut delta = StructuralDiff::default();
        delta.add.insert(
            "Sec".into(),
            Addition::Nested {
                add: BTreeMap::from([(
                    "C".to_string(),
                    Addition::Property {
                        schema: json!({ "type": "string" }),
                    },
                )]),
            },
        );
        delta.remove.insert(
            "Sec".into(),
            Removal::Nested {
                remove: BTreeMap::from([("B".to_string(), Removal::Leaf)]),
            },
        );

        let curated = json!({ "properties": { "Sec": { "properties": { "A": {}, "B": {} } } } });
        let derived = apply(&curated, &delta).unwrap();
        assert_eq!(
            derived["properties"]["Sec"]["properties"],
            json!({ "A": {}, "C": { "type": "string" } })
        );
    }

    #[test]
    fn test_surviving_properties_are_untouched() {
        let base = json!({ "properties": { "Sec": { "properties": { "A": {}, "B": {} } } } });
        let target = json!({ "properties": { "Sec": { "properties": { "A": {}, "C": {} } } } });
        let curated = json!({
            "properties": {
                "Sec": {
                    "type": "object",
                    "description": "hand-written",
                    "properties": {
                        "A": { "type": "boolean", "description": "curated A", "default": true },
                        "B": {}
                    },
                    "additionalProperties": false
                }
            }
        });

        let derived = apply(&curated, &diff(&base, &target)).unwrap();
        let sec = &derived["properties"]["Sec"];
        assert_eq!(sec["description"], "hand-written");
        assert_eq!(
            sec["properties"]["A"],
            json!({ "type": "boolean", "description": "curated A", "default": true })
        );
        assert!(sec["properties"].get("B").is_none());
        assert_eq!(sec["properties"]["C"], json!({}));
    }

    #[test]
    fn test_nested_apply_unwraps_curated_wrapper() {
        // Curated keeps the repeatable-section wrapper; nested additions
        // land inside the first variant exposing properties.
        let section = json!({ "type": "object", "properties": { "A": {} } });
        let curated = json!({
            "properties": {
                "Route": { "oneOf": [ { "type": "array", "items": section }, section ] }
            }
        });

        let mut delta = StructuralDiff::default();
        delta.add.insert(
            "Route".into(),
            Addition::Nested {
                add: BTreeMap::from([(
                    "Metric".to_string(),
                    Addition::Property {
                        schema: json!({ "type": "integer" }),
                    },
                )]),
            },
        );

        let derived = apply(&curated, &delta).unwrap();
        assert_eq!(
            derived["properties"]["Route"]["oneOf"][0]["items"]["properties"]["Metric"],
            json!({ "type": "integer" })
        );
    }

    #[test]
    fn test_missing_targets_skip_silently() {
        let curated = json!({ "properties": { "A": {} } });

        let mut delta = StructuralDiff::default();
        // Nested into a key the curated schema does not have.
        delta.add.insert(
            "Absent".into(),
            Addition::Nested {
                add: BTreeMap::from([(
                    "X".to_string(),
                    Addition::Property { schema: json!({}) },
                )]),
            },
        );
        // Nested into a key that is not object-like.
        delta.remove.insert(
            "A".into(),
            Removal::Nested {
                remove: BTreeMap::from([("X".to_string(), Removal::Leaf)]),
            },
        );
        // Leaf removal of a key that is already gone.
        delta.remove.insert("AlsoAbsent".into(), Removal::Leaf);

        let derived = apply(&curated, &delta).unwrap();
        assert_eq!(derived["properties"], json!({ "A": {} }));
    }

    #[test]
    fn test_missing_properties_fails_loudly() {
        let curated = json!({ "title": "no properties here" });
        assert_eq!(
            apply(&curated, &StructuralDiff::default()),
            Err(ApplyError::MissingProperties)
        );
    }

    #[test]
    fn test_input_document_is_not_mutated() {
        let base = json!({ "properties": {} });
        let target = json!({ "properties": { "B": {} } });
        let curated = json!({ "properties": { "A": {} } });
        let before = curated.clone();

        let _ = apply(&curated, &diff(&base, &target)).unwrap();
        assert_eq!(curated, before);
    }
}
