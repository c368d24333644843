//! gperf parser-table mining.
//!
//! networkd declares every directive it accepts in gperf hash-table sources
//! as line-oriented records of the shape
//! `Section.Key, parser_function, flags, argument`. Only lines matching that
//! shape are records; everything else in the file (comments, blanks, C
//! preprocessor directives, gperf declarations) is ignored.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use walkdir::WalkDir;

use networkd_schema_core::{ParserEntry, ParserTable};

static RECORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^([A-Z][a-zA-Z0-9]+)\.([A-Z][a-zA-Z0-9-]+)\s*,\s*([a-zA-Z0-9_]+)\s*,\s*[^,]+\s*,\s*([a-zA-Z0-9_]+)",
    )
    .expect("static regex must compile")
});

/// Finds the first file under `root` whose name matches one of the
/// candidate parser-table names.
pub fn find_parser_table(root: &Path, names: &[&str]) -> Option<PathBuf> {
    WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .find(|entry| {
            entry.file_type().is_file()
                && entry
                    .file_name()
                    .to_str()
                    .is_some_and(|name| names.contains(&name))
        })
        .map(|entry| entry.into_path())
}

/// Mines a parser-table file into per-section declarations.
///
/// A missing or unreadable file yields an empty table.
pub fn mine_parser_table(path: &Path) -> ParserTable {
    let Ok(source) = std::fs::read_to_string(path) else {
        return ParserTable::default();
    };
    parse_table(&source)
}

/// Parses parser-table text into per-section declarations.
///
/// # Examples
///
/// ```
/// use networkd_schema_mining::parse_table;
///
/// let table = parse_table("\
/// struct ConfigPerfItem;
/// Match.Name,  config_parse_match_ifnames,  0,  offsetof(Network, match.ifname)
/// Network.DHCP, config_parse_dhcp, 0, offsetof(Network, dhcp)
/// ");
/// assert_eq!(table.entry_count(), 2);
/// assert_eq!(
///     table.section("Match").unwrap().find("Name").unwrap().parser_function,
///     "config_parse_match_ifnames"
/// );
/// ```
pub fn parse_table(source: &str) -> ParserTable {
    let mut table = ParserTable::default();
    for line in source.lines() {
        let Some(captures) = RECORD.captures(line.trim()) else {
            continue;
        };
        table.insert(
            &captures[1],
            ParserEntry {
                key: captures[2].to_string(),
                parser_function: captures[3].to_string(),
                argument: captures[4].to_string(),
            },
        );
    }
    table
}
