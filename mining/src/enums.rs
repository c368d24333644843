//! C string-table scanning for enum directives.
//!
//! For directives parsed by `config_parse_enum`/`config_parse_list`, the
//! accepted values live in the C sources as a static string table named
//! after the enum type (`<type>_table[] = { "a", "b", ... }`). Scanning the
//! checked-out tree for that table yields an exact enum, which outranks any
//! description-mined guess.

use std::path::Path;

use regex::Regex;
use walkdir::WalkDir;

/// Source subdirectories searched for string tables, in order.
const SEARCH_DIRS: &[&str] = &["src/network", "src/basic", "src/shared", "src/fundamental"];

/// Scans a source tree for the string table of the named enum type.
///
/// Returns the table's non-empty string values in declaration order, or
/// `None` when no table is found anywhere in the search directories.
pub fn find_enum_values(source_root: &Path, type_name: &str) -> Option<Vec<String>> {
    let table_pattern = Regex::new(&format!(
        r"(?s)static\s+const\s+char\*\s+const\s+{}_table\[\]\s*=\s*\{{([^;]+)\}};",
        regex::escape(type_name)
    ))
    .expect("escaped type name keeps the pattern valid");
    let string_literal = Regex::new(r#""([^"]+)""#).expect("static regex must compile");

    for dir in SEARCH_DIRS {
        let root = source_root.join(dir);
        if !root.is_dir() {
            continue;
        }
        for entry in WalkDir::new(&root).into_iter().filter_map(Result::ok) {
            if !entry.file_type().is_file() {
                continue;
            }
            let is_c_source = entry
                .path()
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|ext| ext == "c" || ext == "h");
            if !is_c_source {
                continue;
            }
            let Ok(source) = std::fs::read_to_string(entry.path()) else {
                continue;
            };
            if let Some(captures) = table_pattern.captures(&source) {
                let values: Vec<String> = string_literal
                    .captures_iter(&captures[1])
                    .map(|c| c[1].to_string())
                    .filter(|v| !v.is_empty())
                    .collect();
                return Some(values);
            }
        }
    }
    None
}
