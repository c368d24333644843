//! DocBook man-page mining.
//!
//! systemd's man pages document each directive in a definition list inside a
//! `refsect1` whose title carries the section name in brackets
//! (`"[Network] Section Options"`). Every `varlistentry` maps one or more
//! comma-separated `Name=` terms to a shared description, optionally with an
//! XInclude version marker (`xpointer="v211"`) recording the release that
//! introduced the directive.
//!
//! Inline `literal`/`constant`/`option`/`filename` markup is re-quoted with
//! single quotes while flattening to text, so value literals stay
//! recognizable to the enum and default extractors downstream.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use roxmltree::Node;
use tracing::warn;

use networkd_schema_core::{DocEntry, DocTable};

use crate::text::{clean_whitespace, fold_ascii};

static SECTION_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([a-zA-Z0-9]+)\]").expect("static regex must compile"));
static TERM_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Za-z0-9]+)=").expect("static regex must compile"));
static VERSION_POINTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^v(\d+)$").expect("static regex must compile"));

/// Mines a man page into a documentation table.
///
/// A missing file yields an empty table; a document that fails to parse is
/// logged and yields an empty table. Neither is an error — the schema falls
/// back to parser-table information alone.
pub fn mine_documentation(xml_path: &Path) -> DocTable {
    let Ok(source) = std::fs::read_to_string(xml_path) else {
        return DocTable::default();
    };
    match parse_documentation(&source) {
        Ok(table) => table,
        Err(err) => {
            warn!(path = %xml_path.display(), %err, "failed to parse man page XML");
            DocTable::default()
        }
    }
}

/// Parses man-page XML source into a documentation table.
pub fn parse_documentation(source: &str) -> Result<DocTable, roxmltree::Error> {
    let document = roxmltree::Document::parse(source)?;
    let mut table = DocTable::default();

    for refsect in document
        .descendants()
        .filter(|n| n.tag_name().name() == "refsect1")
    {
        let Some(title) = refsect
            .descendants()
            .find(|n| n.tag_name().name() == "title")
        else {
            continue;
        };
        let title_text: String = title
            .descendants()
            .filter(|n| n.is_text())
            .filter_map(|n| n.text())
            .collect::<Vec<_>>()
            .join("");
        let section = SECTION_NAME
            .captures(&title_text)
            .map(|c| c[1].to_string())
            .unwrap_or_else(|| networkd_schema_core::GLOBAL_SECTION.to_string());

        for entry in refsect
            .descendants()
            .filter(|n| n.tag_name().name() == "varlistentry")
        {
            // Entries list alternate names either comma-joined inside one
            // term or as sibling term elements; both collapse to one
            // comma-joined string here.
            let terms: Vec<String> = entry
                .descendants()
                .filter(|n| n.tag_name().name() == "term")
                .map(|t| semantic_text(t).trim().to_string())
                .collect();
            let Some(listitem) = entry
                .descendants()
                .find(|n| n.tag_name().name() == "listitem")
            else {
                continue;
            };
            if terms.is_empty() {
                continue;
            }

            let raw_term = fold_ascii(&terms.join(","));
            let description = listitem_description(listitem);
            let version_added = version_marker(listitem);

            for part in raw_term.split(',') {
                let Some(captures) = TERM_KEY.captures(part) else {
                    continue;
                };
                table.insert(
                    &section,
                    DocEntry {
                        key: captures[1].to_string(),
                        description: description.clone(),
                        version_added: version_added.clone(),
                    },
                );
            }
        }
    }

    Ok(table)
}

/// Flattens an element to text, re-quoting inline value markup.
fn semantic_text(node: Node<'_, '_>) -> String {
    let mut out = String::new();
    for child in node.children() {
        if child.is_text() {
            out.push_str(child.text().unwrap_or_default());
        } else if child.is_element() {
            let inner = semantic_text(child);
            match child.tag_name().name() {
                "literal" | "constant" | "option" | "filename" => {
                    if inner.starts_with('\'') || inner.starts_with('"') {
                        out.push_str(&inner);
                    } else {
                        out.push('\'');
                        out.push_str(&inner);
                        out.push('\'');
                    }
                }
                _ => out.push_str(&inner),
            }
        }
    }
    out
}

fn listitem_description(listitem: Node<'_, '_>) -> String {
    let parts: Vec<String> = listitem
        .descendants()
        .filter(|n| n.tag_name().name() == "para")
        .map(|p| fold_ascii(&semantic_text(p)))
        .collect();
    clean_whitespace(&parts.join(" "))
}

/// Finds an XInclude version marker (`xpointer="v211"`) in a list item.
///
/// Matched by element name alone so the marker survives man pages that bind
/// the XInclude prefix anywhere above the element.
fn version_marker(listitem: Node<'_, '_>) -> Option<String> {
    listitem
        .descendants()
        .filter(|n| n.tag_name().name() == "include")
        .filter_map(|n| n.attribute("xpointer"))
        .find_map(|xpointer| {
            VERSION_POINTER
                .captures(xpointer)
                .map(|c| c[1].to_string())
        })
}
