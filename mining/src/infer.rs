//! Type inference for mined directives.
//!
//! Each directive's JSON-Schema fragment is resolved from three sources in
//! priority order: the C parser function named in the gperf table, value
//! wording mined from the description, and key-name heuristics. Whenever a
//! clause of the description is successfully mined into structure (an enum,
//! a range, a default, a type restatement), that clause is removed from the
//! prose so the same fact is never stated twice.

use std::path::Path;

use serde_json::{Value, json};

use networkd_schema_core::definition_ref;

use crate::enums::find_enum_values;
use crate::text::{
    DescriptionGuess, RedundantClause, ScalarKind, clean_whitespace, extract_default,
    extract_enum, extract_range, guess_type_from_description, is_mandatory,
    strip_redundant_clause,
};

/// Parser functions whose directives take whitespace-separated lists.
pub const LIST_PARSERS: &[&str] = &[
    "config_parse_strv",
    "config_parse_list",
    "config_parse_dns_servers",
    "config_parse_ntp_servers",
    "config_parse_search_domains",
    "config_parse_syscall_filter",
];

/// `(section, key)` pairs force-rendered as lists regardless of parser
/// function: directives systemd accepts repeatedly or space-separated.
pub const FORCE_LIST_ITEMS: &[(&str, &str)] = &[
    ("Network", "Address"),
    ("Network", "Gateway"),
    ("Network", "DNS"),
    ("Network", "NTP"),
    ("Network", "Domains"),
    ("Network", "BindCarrier"),
    ("Network", "Bridge"),
];

/// Key-name heuristics, tried in order: suffix match → type name.
///
/// `boolean` and `string` resolve to inline types; everything else is a
/// shared-definition reference. `MACAddress` must stay ahead of `Address`.
const KEY_NAME_HEURISTICS: &[(&str, &str)] = &[
    ("MACAddress", "mac_address"),
    ("Address", "ip_address"),
    ("Gateway", "ip_address"),
    ("DNS", "ip_address"),
    ("NTP", "ip_address"),
    ("Destination", "ip_prefix"),
    ("Description", "string"),
];

/// Parser functions whose `argument` names a C enum type with a string
/// table in the sources.
const ENUM_TABLE_PARSERS: &[&str] = &["config_parse_enum", "config_parse_list"];

enum Mapped {
    Inline(Value),
    Ref(&'static str),
}

/// Direct parser-function to constraint mapping.
fn parser_mapped(parser_function: &str) -> Option<Mapped> {
    let mapped = match parser_function {
        "config_parse_bool" | "config_parse_tristate" => Mapped::Inline(json!({"type": "boolean"})),
        "config_parse_unsigned" => Mapped::Inline(json!({"type": "integer", "minimum": 0})),
        "config_parse_int" => Mapped::Inline(json!({"type": "integer"})),
        "config_parse_ip_port" => {
            Mapped::Inline(json!({"type": "integer", "minimum": 0, "maximum": 65535}))
        }
        "config_parse_mtu" => Mapped::Inline(json!({"type": "integer", "minimum": 68})),
        "config_parse_mode" => Mapped::Inline(json!({"type": "string", "pattern": "^[0-7]{3,4}$"})),
        "config_parse_iec_size" | "config_parse_si_size" | "config_parse_bytes_size" => {
            Mapped::Ref("bytes")
        }
        "config_parse_mac_addr" | "config_parse_hwaddr" => Mapped::Ref("mac_address"),
        "config_parse_ipv4_addr" => Mapped::Ref("ipv4_address"),
        "config_parse_ipv6_addr" => Mapped::Ref("ipv6_address"),
        "config_parse_in_addr_non_null" | "config_parse_in_addr_data" => Mapped::Ref("ip_address"),
        "config_parse_in_addr_prefix" => Mapped::Ref("ip_prefix"),
        "config_parse_sec" => Mapped::Ref("seconds"),
        "config_parse_dns_servers" | "config_parse_ntp_servers" => Mapped::Ref("ip_address"),
        _ => return None,
    };
    Some(mapped)
}

/// Identity of one directive during inference.
#[derive(Debug, Clone, Copy)]
pub struct InferenceContext<'a> {
    pub section: &'a str,
    pub key: &'a str,
    pub parser_function: &'a str,
    pub argument: &'a str,
    /// Checked-out source tree for enum string-table scans; `None` skips
    /// that step.
    pub source_root: Option<&'a Path>,
}

/// An inferred fragment plus out-of-band flags.
#[derive(Debug, Clone, PartialEq)]
pub struct InferredFragment {
    /// The JSON-Schema fragment, description and version already attached.
    pub schema: Value,
    /// Promoted to the section's `required` list at assembly time; never
    /// emitted as a schema keyword.
    pub mandatory: bool,
}

/// Resolves one directive to a schema fragment.
///
/// # Examples
///
/// ```
/// use networkd_schema_mining::{InferenceContext, infer_fragment};
/// use serde_json::json;
///
/// let ctx = InferenceContext {
///     section: "Network",
///     key: "IPForward",
///     parser_function: "config_parse_string",
///     argument: "0",
///     source_root: None,
/// };
/// let inferred = infer_fragment(&ctx, "Takes a boolean argument. Defaults to yes.", None);
/// assert_eq!(inferred.schema, json!({ "type": "boolean", "default": true }));
/// assert!(!inferred.mandatory);
/// ```
pub fn infer_fragment(
    ctx: &InferenceContext<'_>,
    description: &str,
    version_added: Option<&str>,
) -> InferredFragment {
    let mut desc = description.to_string();
    let mut ref_name: Option<&str> = None;

    // 1. Direct parser-function mapping.
    let mut schema = match parser_mapped(ctx.parser_function) {
        Some(Mapped::Inline(value)) => Some(value),
        Some(Mapped::Ref(name)) => {
            ref_name = Some(name);
            Some(definition_ref(name))
        }
        None => None,
    };

    let is_list = LIST_PARSERS.contains(&ctx.parser_function)
        || FORCE_LIST_ITEMS.contains(&(ctx.section, ctx.key));

    // 2–3. A generic fragment (absent or plain string) can still be pinned
    // down by the description or the key name.
    let is_generic = match &schema {
        None => true,
        Some(s) => s.get("type").and_then(Value::as_str) == Some("string"),
    };
    if is_generic {
        if let Some((values, cleaned)) = extract_enum(&desc) {
            schema = Some(json!({ "type": "string", "enum": values }));
            desc = cleaned;
        } else {
            let guessed = KEY_NAME_HEURISTICS
                .iter()
                .find(|(suffix, _)| ctx.key.ends_with(suffix))
                .map(|(_, name)| *name)
                .or_else(|| match guess_type_from_description(&desc) {
                    Some(DescriptionGuess::Boolean) => Some("boolean"),
                    Some(DescriptionGuess::Ref(name)) => Some(name),
                    None => None,
                });
            match guessed {
                Some("boolean") => schema = Some(json!({ "type": "boolean" })),
                Some("string") => schema = Some(json!({ "type": "string" })),
                Some(name) => {
                    ref_name = Some(name);
                    schema = Some(definition_ref(name));
                }
                None => {
                    if schema.is_none() {
                        schema = Some(json!({ "type": "string" }));
                    }
                }
            }
        }
    }
    let mut schema = schema.expect("inference always settles on a fragment");

    // 4. Integer-range extraction for numeric or still-generic fragments.
    let range_eligible = schema.get("$ref").is_none()
        && matches!(
            schema.get("type").and_then(Value::as_str),
            None | Some("string") | Some("integer")
        );
    if range_eligible {
        if let Some((minimum, maximum, cleaned)) = extract_range(&desc) {
            schema["type"] = json!("integer");
            schema["minimum"] = json!(minimum);
            schema["maximum"] = json!(maximum);
            desc = cleaned;
        }
    }

    // 5. An exact string table from the sources outranks everything above.
    if ENUM_TABLE_PARSERS.contains(&ctx.parser_function) {
        if let Some(root) = ctx.source_root {
            if let Some(values) = find_enum_values(root, ctx.argument) {
                if !values.is_empty() {
                    schema = json!({ "type": "string", "enum": values });
                    ref_name = None;
                }
            }
        }
    }

    // 6. Default extraction, coerced to the resolved type.
    let kind = match schema.get("type").and_then(Value::as_str) {
        Some("boolean") => ScalarKind::Boolean,
        Some("integer") => ScalarKind::Integer,
        _ => ScalarKind::Other,
    };
    if let Some((default, cleaned)) = extract_default(&desc, kind) {
        schema["default"] = default;
        desc = cleaned;
    }

    // 7. Mandatory-language detection.
    let mandatory = is_mandatory(&desc);

    // 8. List wrapping.
    if is_list {
        schema = json!({ "type": "array", "items": schema });
    }

    // 9. Strip the clause that restates the settled type.
    if schema.get("type").and_then(Value::as_str) == Some("boolean") {
        desc = strip_redundant_clause(&desc, RedundantClause::Boolean);
    } else if let Some(name) = ref_name {
        desc = strip_redundant_clause(&desc, RedundantClause::Ref(name));
    }
    desc = clean_whitespace(&desc);
    // Clause removal can leave bare punctuation behind.
    if !desc.chars().any(|c| c.is_ascii_alphanumeric()) {
        desc.clear();
    }

    // 10. Attach remaining prose; refs get an allOf wrapper so the shared
    // definition itself is never touched.
    if schema.get("$ref").is_some() && (!desc.is_empty() || version_added.is_some()) {
        schema = json!({ "allOf": [schema] });
    }
    if !desc.is_empty() {
        schema["description"] = json!(desc);
    }
    if let Some(version) = version_added {
        schema["version_added"] = json!(version);
    }

    InferredFragment { schema, mandatory }
}
