//! Combinator unwrapping for schema nodes.
//!
//! Generated documents wrap repeatable sections in `oneOf[array-of-object,
//! object]`, curated documents sometimes wrap refs in `allOf`, and either
//! may indirect through `$ref`. The differ, the applier, and the validator
//! all need to see through those wrappers to the underlying object node (the
//! one carrying `properties`), so the unwrap logic lives here once.
//!
//! Resolution at each node, in order: a direct `properties` map wins; a
//! `$ref` is chased through the supplied `definitions` map (bounded depth —
//! production schemas are tree-shaped, the bound only guards against
//! accidental cycles); otherwise the first `oneOf`/`allOf` variant exposing
//! `properties` directly or via array `items` is used. Anything else is not
//! object-like and resolves to `None`.

use serde_json::{Map, Value};

/// Maximum `$ref`/combinator chain length followed before giving up.
pub const MAX_UNWRAP_DEPTH: usize = 8;

const REF_PREFIX: &str = "#/definitions/";

/// Resolves a schema node to the node carrying its `properties` map.
///
/// `definitions` enables `$ref` chasing; pass `None` for shape-only
/// unwrapping.
///
/// # Examples
///
/// ```
/// use networkd_schema_core::resolve_object_node;
/// use serde_json::json;
///
/// let bare = json!({ "type": "object", "properties": { "A": {} } });
/// assert!(resolve_object_node(&bare, None).is_some());
///
/// let wrapped = json!({
///     "oneOf": [
///         { "type": "array", "items": { "type": "object", "properties": { "A": {} } } },
///         { "type": "object", "properties": { "A": {} } }
///     ]
/// });
/// let node = resolve_object_node(&wrapped, None).unwrap();
/// assert!(node["properties"].get("A").is_some());
///
/// let scalar = json!({ "type": "string" });
/// assert!(resolve_object_node(&scalar, None).is_none());
/// ```
pub fn resolve_object_node<'a>(
    schema: &'a Value,
    definitions: Option<&'a Map<String, Value>>,
) -> Option<&'a Value> {
    resolve_at_depth(schema, definitions, MAX_UNWRAP_DEPTH)
}

fn resolve_at_depth<'a>(
    schema: &'a Value,
    definitions: Option<&'a Map<String, Value>>,
    depth: usize,
) -> Option<&'a Value> {
    if depth == 0 {
        return None;
    }
    if schema.get("properties").is_some_and(Value::is_object) {
        return Some(schema);
    }
    if let Some(target) = ref_target(schema, definitions) {
        return resolve_at_depth(target, definitions, depth - 1);
    }
    for combinator in ["oneOf", "allOf"] {
        let Some(variants) = schema.get(combinator).and_then(Value::as_array) else {
            continue;
        };
        for variant in variants {
            if variant.get("properties").is_some_and(Value::is_object) {
                return Some(variant);
            }
            if let Some(items) = variant.get("items") {
                if items.get("properties").is_some_and(Value::is_object) {
                    return Some(items);
                }
            }
            if ref_target(variant, definitions).is_some() {
                if let Some(node) = resolve_at_depth(variant, definitions, depth - 1) {
                    return Some(node);
                }
            }
        }
    }
    None
}

fn ref_target<'a>(
    schema: &'a Value,
    definitions: Option<&'a Map<String, Value>>,
) -> Option<&'a Value> {
    let reference = schema.get("$ref")?.as_str()?;
    let name = reference.strip_prefix(REF_PREFIX)?;
    definitions?.get(name)
}

/// Resolves a node and returns its `properties` map.
pub fn resolve_properties<'a>(
    schema: &'a Value,
    definitions: Option<&'a Map<String, Value>>,
) -> Option<&'a Map<String, Value>> {
    resolve_object_node(schema, definitions)?
        .get("properties")
        .and_then(Value::as_object)
}

/// Where inside a combinator wrapper the object node lives.
enum VariantPath {
    Direct(&'static str, usize),
    Items(&'static str, usize),
}

/// Mutable counterpart of [`resolve_object_node`].
///
/// Shape-only: `$ref` chains are not followed, since chasing a ref would
/// alias the document's own `definitions` block. The applier only ever
/// mutates section objects reached through `properties`/`oneOf`/`allOf`
/// wrappers, never through refs.
pub fn resolve_object_node_mut(schema: &mut Value) -> Option<&mut Value> {
    if schema.get("properties").is_some_and(Value::is_object) {
        return Some(schema);
    }

    let mut path = None;
    for combinator in ["oneOf", "allOf"] {
        let Some(variants) = schema.get(combinator).and_then(Value::as_array) else {
            continue;
        };
        for (idx, variant) in variants.iter().enumerate() {
            if variant.get("properties").is_some_and(Value::is_object) {
                path = Some(VariantPath::Direct(combinator, idx));
                break;
            }
            if variant
                .get("items")
                .is_some_and(|items| items.get("properties").is_some_and(Value::is_object))
            {
                path = Some(VariantPath::Items(combinator, idx));
                break;
            }
        }
        if path.is_some() {
            break;
        }
    }

    match path? {
        VariantPath::Direct(combinator, idx) => schema.get_mut(combinator)?.get_mut(idx),
        VariantPath::Items(combinator, idx) => {
            schema.get_mut(combinator)?.get_mut(idx)?.get_mut("items")
        }
    }
}

/// Mutable access to a node's `properties` map, unwrapping combinators.
pub fn resolve_properties_mut(schema: &mut Value) -> Option<&mut Map<String, Value>> {
    resolve_object_node_mut(schema)?
        .get_mut("properties")
        .and_then(Value::as_object_mut)
}

/// Returns the document's `definitions` map, if any.
pub fn document_definitions(document: &Value) -> Option<&Map<String, Value>> {
    document.get("definitions").and_then(Value::as_object)
}
