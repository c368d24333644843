//! Version-token surgery on derived documents.
//!
//! After a diff is applied, three pieces of metadata still carry the base
//! release: the trailing parenthesized token of `title`, the `$id` URL, and
//! any embedded documentation hyperlinks whose path encodes the release
//! number (`…/man/257/…`). Each rewrite is its own small pure function so
//! they are testable independently of the diff engine.

use serde_json::Value;

/// Replaces the trailing parenthesized version token of the document title.
///
/// Titles look like `"Systemd network Configuration (v257)"`. A title
/// without a parenthesized token gets one appended; a missing or
/// non-string title is left alone.
///
/// # Examples
///
/// ```
/// use networkd_schema_diff::retitle;
/// use serde_json::json;
///
/// let mut doc = json!({ "title": "Systemd network Configuration (v257)" });
/// retitle(&mut doc, "v241");
/// assert_eq!(doc["title"], "Systemd network Configuration (v241)");
/// ```
pub fn retitle(document: &mut Value, release: &str) {
    let Some(title) = document.get("title").and_then(Value::as_str) else {
        return;
    };
    let stem = match title.rfind('(') {
        Some(idx) => title[..idx].trim_end(),
        None => title,
    };
    document["title"] = Value::String(format!("{stem} ({release})"));
}

/// Sets the document's `$id` to the caller-supplied canonical URL.
pub fn set_id(document: &mut Value, id_url: &str) {
    if let Some(map) = document.as_object_mut() {
        map.insert("$id".to_string(), Value::String(id_url.to_string()));
    }
}

/// Rewrites embedded documentation hyperlinks from one release's man-page
/// path to another's.
///
/// Only string values under a `documentation` key are candidates, and only
/// the fixed `/man/<version>/` path segment is replaced; `old_version` and
/// `new_version` are bare numeric tokens (`"257"`, `"241"`).
///
/// # Examples
///
/// ```
/// use networkd_schema_diff::rewrite_documentation_links;
/// use serde_json::json;
///
/// let mut doc = json!({
///     "properties": {
///         "Match": {
///             "documentation": "https://www.freedesktop.org/software/systemd/man/257/systemd.network.html"
///         }
///     }
/// });
/// rewrite_documentation_links(&mut doc, "257", "241");
/// assert!(doc["properties"]["Match"]["documentation"]
///     .as_str()
///     .unwrap()
///     .contains("/man/241/"));
/// ```
pub fn rewrite_documentation_links(value: &mut Value, old_version: &str, new_version: &str) {
    let needle = format!("/man/{old_version}/");
    let replacement = format!("/man/{new_version}/");
    rewrite_links(value, &needle, &replacement);
}

fn rewrite_links(value: &mut Value, needle: &str, replacement: &str) {
    match value {
        Value::Object(map) => {
            for (key, child) in map.iter_mut() {
                if key == "documentation" {
                    if let Value::String(url) = child {
                        if url.contains(needle) {
                            *url = url.replace(needle, replacement);
                        }
                        continue;
                    }
                }
                rewrite_links(child, needle, replacement);
            }
        }
        Value::Array(items) => {
            for child in items {
                rewrite_links(child, needle, replacement);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_retitle_replaces_trailing_token() {
        let mut doc = json!({ "title": "Systemd networkd.conf Configuration (v257)" });
        retitle(&mut doc, "v250");
        assert_eq!(doc["title"], "Systemd networkd.conf Configuration (v250)");
    }

    #[test]
    fn test_retitle_appends_when_no_token() {
        let mut doc = json!({ "title": "Systemd network Configuration" });
        retitle(&mut doc, "v241");
        assert_eq!(doc["title"], "Systemd network Configuration (v241)");
    }

    #[test]
    fn test_retitle_without_title_is_noop() {
        let mut doc = json!({ "$id": "x" });
        retitle(&mut doc, "v241");
        assert!(doc.get("title").is_none());
    }

    #[test]
    fn test_set_id() {
        let mut doc = json!({ "$id": "old" });
        set_id(&mut doc, "https://example.org/schemas/v241/systemd.network.schema.json");
        assert_eq!(
            doc["$id"],
            "https://example.org/schemas/v241/systemd.network.schema.json"
        );
    }

    #[test]
    fn test_rewrite_links_deep_and_selective() {
        let mut doc = json!({
            "properties": {
                "Match": {
                    "documentation": "https://host/man/257/systemd.network.html#x",
                    "properties": {
                        "Name": {
                            "documentation": "https://host/man/257/systemd.network.html#Name",
                            "description": "mentions /man/257/ in prose"
                        }
                    }
                }
            }
        });
        rewrite_documentation_links(&mut doc, "257", "241");

        let m = &doc["properties"]["Match"];
        assert_eq!(m["documentation"], "https://host/man/241/systemd.network.html#x");
        assert_eq!(
            m["properties"]["Name"]["documentation"],
            "https://host/man/241/systemd.network.html#Name"
        );
        // Non-documentation strings are never rewritten.
        assert_eq!(
            m["properties"]["Name"]["description"],
            "mentions /man/257/ in prose"
        );
    }

    #[test]
    fn test_rewrite_links_other_versions_untouched() {
        let mut doc = json!({ "documentation": "https://host/man/255/page.html" });
        rewrite_documentation_links(&mut doc, "257", "241");
        assert_eq!(doc["documentation"], "https://host/man/255/page.html");
    }
}
