//! Structural diffing of schema `properties` trees.
//!
//! The diff deliberately compares only the presence and absence of keys in
//! `properties` maps, never `type`/`description`/`enum`/`default`: curated
//! definitions are trusted absolutely, so the only signal worth propagating
//! from one generated snapshot to the next is which directives exist.
//!
//! Both sides are unwrapped independently through the shared resolver, so a
//! section wrapped in `oneOf[array-of-object, object]` on one side compares
//! identically to a bare object on the other.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use networkd_schema_core::{document_definitions, resolve_properties};

/// An instruction to add a key during diff application.
///
/// Tagged explicitly so a literal property whose schema happens to be `{}`
/// or `$ref`-only can never be mistaken for a nested instruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Addition {
    /// Insert this full property definition, lifted verbatim from Target.
    Property {
        /// The property schema exactly as Target defines it.
        schema: Value,
    },
    /// Recurse into a key that exists on both sides.
    Nested {
        /// Additions inside the shared sub-schema.
        add: BTreeMap<String, Addition>,
    },
}

/// An instruction to remove a key during diff application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Removal {
    /// Delete the key outright.
    Leaf,
    /// Recurse into a key that exists on both sides.
    Nested {
        /// Removals inside the shared sub-schema.
        remove: BTreeMap<String, Removal>,
    },
}

/// Add/remove key-set delta between two schemas' `properties` trees.
///
/// Keys are kept in sorted maps so serialization and iteration are
/// deterministic regardless of mined document order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructuralDiff {
    /// Keys to add, or to recurse into for nested additions.
    pub add: BTreeMap<String, Addition>,
    /// Keys to remove, or to recurse into for nested removals.
    pub remove: BTreeMap<String, Removal>,
}

impl StructuralDiff {
    /// `true` when the diff carries no additions and no removals.
    pub fn is_empty(&self) -> bool {
        self.add.is_empty() && self.remove.is_empty()
    }

    /// Number of leaf property additions, recursively.
    pub fn addition_count(&self) -> usize {
        fn count(map: &BTreeMap<String, Addition>) -> usize {
            map.values()
                .map(|a| match a {
                    Addition::Property { .. } => 1,
                    Addition::Nested { add } => count(add),
                })
                .sum()
        }
        count(&self.add)
    }

    /// Number of leaf property removals, recursively.
    pub fn removal_count(&self) -> usize {
        fn count(map: &BTreeMap<String, Removal>) -> usize {
            map.values()
                .map(|r| match r {
                    Removal::Leaf => 1,
                    Removal::Nested { remove } => count(remove),
                })
                .sum()
        }
        count(&self.remove)
    }
}

/// Computes the structural diff between two schema documents.
///
/// `base` and `target` are whole documents; their respective `definitions`
/// maps drive `$ref` unwrapping on their own side only. The result is a
/// pure function of the inputs.
///
/// # Examples
///
/// ```
/// use networkd_schema_diff::{Addition, diff};
/// use serde_json::json;
///
/// let base = json!({ "properties": { "A": {} } });
/// let target = json!({ "properties": { "A": {}, "B": { "type": "string" } } });
///
/// let delta = diff(&base, &target);
/// assert!(delta.remove.is_empty());
/// assert_eq!(
///     delta.add["B"],
///     Addition::Property { schema: json!({ "type": "string" }) },
/// );
/// ```
pub fn diff(base: &Value, target: &Value) -> StructuralDiff {
    let empty = Map::new();
    let base_props = base
        .get("properties")
        .and_then(Value::as_object)
        .unwrap_or(&empty);
    let target_props = target
        .get("properties")
        .and_then(Value::as_object)
        .unwrap_or(&empty);

    diff_properties(
        base_props,
        target_props,
        document_definitions(base),
        document_definitions(target),
    )
}

fn diff_properties(
    base: &Map<String, Value>,
    target: &Map<String, Value>,
    base_defs: Option<&Map<String, Value>>,
    target_defs: Option<&Map<String, Value>>,
) -> StructuralDiff {
    let mut delta = StructuralDiff::default();

    for (key, base_schema) in base {
        let Some(target_schema) = target.get(key) else {
            delta.remove.insert(key.clone(), Removal::Leaf);
            continue;
        };

        let base_sub = resolve_properties(base_schema, base_defs);
        let target_sub = resolve_properties(target_schema, target_defs);
        if let (Some(base_sub), Some(target_sub)) = (base_sub, target_sub) {
            let sub = diff_properties(base_sub, target_sub, base_defs, target_defs);
            if !sub.is_empty() {
                // Record both companions even when one is empty, so the
                // applier always finds the matching remove for a nested add.
                delta.add.insert(key.clone(), Addition::Nested { add: sub.add });
                delta
                    .remove
                    .insert(key.clone(), Removal::Nested { remove: sub.remove });
            }
        }
    }

    for (key, target_schema) in target {
        if !base.contains_key(key) {
            delta.add.insert(
                key.clone(),
                Addition::Property {
                    schema: target_schema.clone(),
                },
            );
        }
    }

    delta
}
