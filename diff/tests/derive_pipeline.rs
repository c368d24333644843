//! End-to-end properties of the diff/apply pipeline on realistic documents.

use serde_json::{Value, json};

use networkd_schema_diff::{DeriveOptions, derive_release, diff};

/// A cut-down generated document in the shape the assembler emits:
/// singleton sections bare, repeatable sections wrapped.
fn generated(release: &str, sections: &[(&str, &[&str], bool)]) -> Value {
    let mut properties = serde_json::Map::new();
    for (name, keys, singleton) in sections {
        let mut props = serde_json::Map::new();
        for key in *keys {
            props.insert(key.to_string(), json!({ "type": "string" }));
        }
        let section = json!({
            "type": "object",
            "properties": props,
            "additionalProperties": false
        });
        let value = if *singleton {
            section
        } else {
            json!({ "oneOf": [ { "type": "array", "items": section }, section ] })
        };
        properties.insert(name.to_string(), value);
    }
    json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "$id": format!("https://systemd.io/schemas/{release}/network.json"),
        "title": format!("Systemd network Configuration ({release})"),
        "type": "object",
        "definitions": {},
        "properties": properties
    })
}

#[test]
fn self_diff_of_assembled_document_is_empty() {
    let doc = generated(
        "v257",
        &[
            ("Match", &["Name", "Type"], true),
            ("Network", &["DHCP", "Address"], true),
            ("Route", &["Gateway", "Metric"], false),
        ],
    );
    assert!(diff(&doc, &doc).is_empty());
}

#[test]
fn top_level_key_set_follows_added_and_removed() {
    // Inverse property: derived keys = (curated - removed) + added.
    let base = generated(
        "v257",
        &[
            ("Match", &["Name"], true),
            ("Network", &["DHCP"], true),
            ("BridgeFDB", &["MACAddress"], false),
        ],
    );
    let target = generated(
        "v258",
        &[
            ("Match", &["Name"], true),
            ("Network", &["DHCP"], true),
            ("SR-IOV", &["VirtualFunction"], false),
        ],
    );
    let curated = generated(
        "v257",
        &[
            ("Match", &["Name"], true),
            ("Network", &["DHCP"], true),
            ("BridgeFDB", &["MACAddress"], false),
        ],
    );

    let derived = derive_release(
        &curated,
        &base,
        &target,
        &DeriveOptions {
            release: "v258",
            base_release: "v257",
            id_url: "https://example.org/schemas/v258/systemd.network.schema.json",
        },
    )
    .unwrap();

    let keys: Vec<&String> = derived["properties"].as_object().unwrap().keys().collect();
    assert!(keys.iter().any(|k| *k == "Match"));
    assert!(keys.iter().any(|k| *k == "Network"));
    assert!(keys.iter().any(|k| *k == "SR-IOV"));
    assert!(!keys.iter().any(|k| *k == "BridgeFDB"));

    // The added section arrives verbatim from the target snapshot.
    assert_eq!(
        derived["properties"]["SR-IOV"],
        target["properties"]["SR-IOV"]
    );
}

#[test]
fn curated_refinements_survive_wrapped_nested_changes() {
    let base = generated("v257", &[("Route", &["Gateway", "Scope"], false)]);
    let target = generated("v258", &[("Route", &["Gateway", "MTUBytes"], false)]);

    // The curated document simplified the wrapper to a bare object and
    // refined Gateway by hand.
    let curated = json!({
        "title": "Systemd network Configuration (v257)",
        "properties": {
            "Route": {
                "type": "object",
                "properties": {
                    "Gateway": {
                        "allOf": [ { "$ref": "#/definitions/ip_address" } ],
                        "description": "Gateway address, refined by hand."
                    },
                    "Scope": { "type": "string" }
                },
                "additionalProperties": false
            }
        }
    });

    let derived = derive_release(
        &curated,
        &base,
        &target,
        &DeriveOptions {
            release: "v258",
            base_release: "v257",
            id_url: "https://example.org/x.json",
        },
    )
    .unwrap();

    let route = &derived["properties"]["Route"]["properties"];
    assert_eq!(
        route["Gateway"]["description"],
        "Gateway address, refined by hand."
    );
    assert!(route.get("Scope").is_none());
    assert_eq!(route["MTUBytes"], json!({ "type": "string" }));
}

#[test]
fn reapplying_an_empty_diff_is_identity() {
    let snapshot = generated("v257", &[("Match", &["Name"], true)]);
    let curated = generated("v257", &[("Match", &["Name"], true)]);

    let derived = derive_release(
        &curated,
        &snapshot,
        &snapshot,
        &DeriveOptions {
            release: "v257",
            base_release: "v257",
            id_url: "https://systemd.io/schemas/v257/network.json",
        },
    )
    .unwrap();

    assert_eq!(derived["properties"], curated["properties"]);
    assert_eq!(derived["title"], curated["title"]);
}
