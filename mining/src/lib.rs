//! Mining systemd sources into generated JSON Schema documents.
//!
//! This crate turns one systemd release's sources into one machine-generated
//! schema document per configuration kind. Three miners feed a type
//! inferencer and an assembler:
//!
//! - [`mine_documentation`] — DocBook man pages → per-section descriptions,
//!   version markers, and a `Global` fallback.
//! - [`mine_parser_table`] — gperf parser tables → the authoritative list of
//!   directives and their C parser functions.
//! - [`find_enum_values`] — C string tables → exact enums for
//!   `config_parse_enum`-style directives.
//! - [`infer_fragment`] — parser-function mapping, description mining, and
//!   key-name heuristics → one JSON-Schema fragment per directive.
//! - [`assemble_document`] — fragments → a Draft-07 document.
//!
//! Generated documents are disposable: they are rebuilt from source every
//! run and only ever consumed by the structural differ.
//!
//! # Example
//!
//! ```
//! use networkd_schema_core::ConfigKind;
//! use networkd_schema_mining::{
//!     InferenceContext, InferredFragment, MinedKey, MinedSection, assemble_document,
//!     infer_fragment, parse_table,
//! };
//!
//! let table = parse_table("Match.Name, config_parse_strv, 0, 0\n");
//! let section = &table.sections[0];
//! let entry = &section.entries[0];
//!
//! let fragment = infer_fragment(
//!     &InferenceContext {
//!         section: &section.name,
//!         key: &entry.key,
//!         parser_function: &entry.parser_function,
//!         argument: &entry.argument,
//!         source_root: None,
//!     },
//!     "A whitespace-separated list of interface names.",
//!     None,
//! );
//!
//! let sections = vec![MinedSection {
//!     name: section.name.clone(),
//!     keys: vec![MinedKey { key: entry.key.clone(), fragment }],
//! }];
//! let doc = assemble_document(&sections, ConfigKind::Network, "v257");
//! assert_eq!(doc["properties"]["Match"]["properties"]["Name"]["type"], "array");
//! ```

mod assemble;
mod checkout;
mod docbook;
mod enums;
mod error;
mod infer;
mod report;
mod tables;
mod text;

pub use assemble::{MinedKey, MinedSection, assemble_document};
pub use checkout::SourceCheckout;
pub use docbook::{mine_documentation, parse_documentation};
pub use enums::find_enum_values;
pub use error::MiningError;
pub use infer::{
    FORCE_LIST_ITEMS, InferenceContext, InferredFragment, LIST_PARSERS, infer_fragment,
};
pub use report::{MiningSummary, summarize, type_label};
pub use tables::{find_parser_table, mine_parser_table, parse_table};
pub use text::{
    DescriptionGuess, RedundantClause, ScalarKind, clean_whitespace, extract_default,
    extract_enum, extract_range, fold_ascii, guess_type_from_description, is_mandatory,
    strip_redundant_clause,
};

use std::path::Path;

use serde_json::Value;

use networkd_schema_core::{ConfigKind, GLOBAL_SECTION};

/// Everything mined for one config kind of one release.
#[derive(Debug, Clone, PartialEq)]
pub struct MinedConfig {
    /// Which configuration file this describes.
    pub kind: ConfigKind,
    /// Sections in parser-table order, documentation-only keys appended.
    pub sections: Vec<MinedSection>,
}

impl MinedConfig {
    /// Console summary for this config.
    pub fn summary(&self) -> MiningSummary {
        summarize(&self.sections, self.kind.name())
    }
}

/// Mines one config kind from a checked-out source tree.
///
/// Returns `None` when no parser table exists in the tree (the config kind
/// predates this release, or the checkout is incomplete) — the caller skips
/// that config and moves on. Missing or malformed documentation never
/// prevents mining; affected directives simply keep their parser-function
/// typing with no prose.
pub fn mine_config(source_root: &Path, kind: ConfigKind) -> Option<MinedConfig> {
    let docs = mine_documentation(&source_root.join(kind.man_page()));
    let table_path = find_parser_table(source_root, kind.parser_table_names())?;
    let table = mine_parser_table(&table_path);
    if table.is_empty() {
        return None;
    }

    let mut sections: Vec<MinedSection> = Vec::new();
    for parser_section in &table.sections {
        let mut keys = Vec::new();
        for entry in &parser_section.entries {
            let doc = docs.lookup(&parser_section.name, &entry.key);
            let description = doc.map(|d| d.description.as_str()).unwrap_or_default();
            let version = doc.and_then(|d| d.version_added.as_deref());

            let fragment = infer_fragment(
                &InferenceContext {
                    section: &parser_section.name,
                    key: &entry.key,
                    parser_function: &entry.parser_function,
                    argument: &entry.argument,
                    source_root: Some(source_root),
                },
                description,
                version,
            );
            keys.push(MinedKey {
                key: entry.key.clone(),
                fragment,
            });
        }
        sections.push(MinedSection {
            name: parser_section.name.clone(),
            keys,
        });
    }

    // Documented directives the parser table misses (typically parsed via
    // indirection the record pattern cannot see) are backfilled with the
    // generic string path, only into sections the table already knows.
    for doc_section in &docs.sections {
        if doc_section.name == GLOBAL_SECTION {
            continue;
        }
        let Some(section) = sections.iter_mut().find(|s| s.name == doc_section.name) else {
            continue;
        };
        for entry in &doc_section.entries {
            if section.keys.iter().any(|k| k.key == entry.key) {
                continue;
            }
            let fragment = infer_fragment(
                &InferenceContext {
                    section: &doc_section.name,
                    key: &entry.key,
                    parser_function: "config_parse_string",
                    argument: "0",
                    source_root: Some(source_root),
                },
                &entry.description,
                entry.version_added.as_deref(),
            );
            section.keys.push(MinedKey {
                key: entry.key.clone(),
                fragment,
            });
        }
    }

    Some(MinedConfig { kind, sections })
}

/// Assembles a mined config into its generated schema document.
pub fn generate_document(config: &MinedConfig, release: &str) -> Value {
    assemble_document(&config.sections, config.kind, release)
}
