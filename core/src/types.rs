//! Data model for mined networkd configuration sources.
//!
//! This module defines the intermediate types produced by the source miners
//! and consumed by the type inferencer and schema assembler: documentation
//! tables mined from DocBook man pages, parser tables mined from gperf
//! sources, and the config-kind identifiers that tie one mining run
//! together. All tables preserve first-seen order, which later becomes the
//! order of `properties` and `required` entries in the emitted documents.

use serde::{Deserialize, Serialize};

/// JSON Schema dialect emitted by the assembler.
pub const SCHEMA_DIALECT: &str = "http://json-schema.org/draft-07/schema#";

/// Pseudo-section collecting the first definition of each key across all
/// documented sections, used as a fallback when a parser-table entry has no
/// section-local documentation.
pub const GLOBAL_SECTION: &str = "Global";

/// The four networkd configuration file kinds this tool produces schemas for.
///
/// Each kind maps to one DocBook man page and one or more candidate gperf
/// parser-table file names in the systemd source tree (the netdev table was
/// renamed upstream, hence two candidates).
///
/// # Examples
///
/// ```
/// use networkd_schema_core::ConfigKind;
///
/// assert_eq!(ConfigKind::Network.name(), "network");
/// assert_eq!(ConfigKind::Network.man_page(), "man/systemd.network.xml");
/// assert_eq!(ConfigKind::NetworkdConf.file_stem(), "systemd.networkd.conf");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigKind {
    /// `.network` files (`systemd.network(5)`).
    Network,
    /// `.netdev` files (`systemd.netdev(5)`).
    Netdev,
    /// `.link` files (`systemd.link(5)`).
    Link,
    /// The daemon configuration file (`networkd.conf(5)`).
    NetworkdConf,
}

impl ConfigKind {
    /// All config kinds, in the order they are processed per release.
    pub const ALL: [ConfigKind; 4] = [
        ConfigKind::Network,
        ConfigKind::Netdev,
        ConfigKind::Link,
        ConfigKind::NetworkdConf,
    ];

    /// Short name used in schema titles and `$id` URLs.
    pub fn name(self) -> &'static str {
        match self {
            ConfigKind::Network => "network",
            ConfigKind::Netdev => "netdev",
            ConfigKind::Link => "link",
            ConfigKind::NetworkdConf => "networkd.conf",
        }
    }

    /// File-name stem of emitted schema documents.
    pub fn file_stem(self) -> &'static str {
        match self {
            ConfigKind::Network => "systemd.network",
            ConfigKind::Netdev => "systemd.netdev",
            ConfigKind::Link => "systemd.link",
            ConfigKind::NetworkdConf => "systemd.networkd.conf",
        }
    }

    /// Path of the DocBook man page inside a systemd source tree.
    pub fn man_page(self) -> &'static str {
        match self {
            ConfigKind::Network => "man/systemd.network.xml",
            ConfigKind::Netdev => "man/systemd.netdev.xml",
            ConfigKind::Link => "man/systemd.link.xml",
            ConfigKind::NetworkdConf => "man/networkd.conf.xml",
        }
    }

    /// Candidate gperf parser-table file names, tried in order.
    pub fn parser_table_names(self) -> &'static [&'static str] {
        match self {
            ConfigKind::Network => &["networkd-network-gperf.gperf"],
            ConfigKind::Netdev => &["netdev-gperf.gperf", "networkd-netdev-gperf.gperf"],
            ConfigKind::Link => &["link-config-gperf.gperf"],
            ConfigKind::NetworkdConf => &["networkd-gperf.gperf"],
        }
    }
}

/// One directive's documentation mined from a man page.
///
/// Multiple comma-separated terms in a single DocBook entry all map to the
/// same description, producing one `DocEntry` per term.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocEntry {
    /// Directive name, without the trailing `=`.
    pub key: String,
    /// Plain-text description with inline literals re-quoted.
    pub description: String,
    /// systemd release that introduced the directive (numeric part only,
    /// e.g. `"219"`), when the man page carries a version marker.
    pub version_added: Option<String>,
}

/// All documented directives of one `[Section]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocSection {
    /// Section name as it appears between brackets in the man page.
    pub name: String,
    /// Entries in document order.
    pub entries: Vec<DocEntry>,
}

impl DocSection {
    /// Looks up a directive by key.
    pub fn find(&self, key: &str) -> Option<&DocEntry> {
        self.entries.iter().find(|e| e.key == key)
    }
}

/// Documentation table for one man page: sections in document order plus the
/// [`GLOBAL_SECTION`] fallback.
///
/// # Examples
///
/// ```
/// use networkd_schema_core::{DocEntry, DocTable};
///
/// let mut table = DocTable::default();
/// table.insert("Network", DocEntry {
///     key: "DHCP".into(),
///     description: "Enables DHCPv4 and/or DHCPv6 client support.".into(),
///     version_added: None,
/// });
///
/// assert!(table.lookup("Network", "DHCP").is_some());
/// // Unknown section falls back to the first definition seen anywhere.
/// assert!(table.lookup("DHCPv4", "DHCP").is_some());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocTable {
    /// Sections in document order, including the `Global` pseudo-section.
    pub sections: Vec<DocSection>,
}

impl DocTable {
    /// Returns the section with the given name, if mined.
    pub fn section(&self, name: &str) -> Option<&DocSection> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// Inserts an entry into a section, creating the section on first use.
    ///
    /// Within a section the last entry for a key wins; the `Global`
    /// pseudo-section keeps only the first definition of each key.
    pub fn insert(&mut self, section: &str, entry: DocEntry) {
        let global_has = self
            .section(GLOBAL_SECTION)
            .is_some_and(|s| s.find(&entry.key).is_some());
        if !global_has {
            self.insert_into(GLOBAL_SECTION, entry.clone());
        }
        self.insert_into(section, entry);
    }

    fn insert_into(&mut self, section: &str, entry: DocEntry) {
        let section = match self.sections.iter_mut().find(|s| s.name == section) {
            Some(s) => s,
            None => {
                self.sections.push(DocSection {
                    name: section.to_string(),
                    entries: Vec::new(),
                });
                self.sections.last_mut().expect("just pushed")
            }
        };
        if let Some(existing) = section.entries.iter_mut().find(|e| e.key == entry.key) {
            *existing = entry;
        } else {
            section.entries.push(entry);
        }
    }

    /// Looks up documentation for `(section, key)`, falling back to the
    /// `Global` pseudo-section when the section has no entry for the key.
    pub fn lookup(&self, section: &str, key: &str) -> Option<&DocEntry> {
        self.section(section)
            .and_then(|s| s.find(key))
            .or_else(|| self.section(GLOBAL_SECTION).and_then(|s| s.find(key)))
    }

    /// Total number of mined entries, excluding the `Global` fallback.
    pub fn entry_count(&self) -> usize {
        self.sections
            .iter()
            .filter(|s| s.name != GLOBAL_SECTION)
            .map(|s| s.entries.len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entry_count() == 0
    }
}

/// One directive declaration mined from a gperf parser table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParserEntry {
    /// Directive name.
    pub key: String,
    /// C parser function, e.g. `config_parse_bool`.
    pub parser_function: String,
    /// Fourth record field; names a C enum type for the enum parsers.
    pub argument: String,
}

/// All parser-table declarations of one section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParserSection {
    /// Section name from the `Section.Key` record prefix.
    pub name: String,
    /// Entries in table order, unique per key (last declaration wins).
    pub entries: Vec<ParserEntry>,
}

impl ParserSection {
    /// Looks up a declaration by key.
    pub fn find(&self, key: &str) -> Option<&ParserEntry> {
        self.entries.iter().find(|e| e.key == key)
    }
}

/// Parser table for one config kind: sections in table order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParserTable {
    /// Sections in first-seen order.
    pub sections: Vec<ParserSection>,
}

impl ParserTable {
    /// Returns the section with the given name, if present.
    pub fn section(&self, name: &str) -> Option<&ParserSection> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// Inserts a declaration, replacing any earlier one for the same
    /// `(section, key)` pair in place.
    pub fn insert(&mut self, section: &str, entry: ParserEntry) {
        let section = match self.sections.iter_mut().find(|s| s.name == section) {
            Some(s) => s,
            None => {
                self.sections.push(ParserSection {
                    name: section.to_string(),
                    entries: Vec::new(),
                });
                self.sections.last_mut().expect("just pushed")
            }
        };
        if let Some(existing) = section.entries.iter_mut().find(|e| e.key == entry.key) {
            *existing = entry;
        } else {
            section.entries.push(entry);
        }
    }

    /// Total number of declarations across all sections.
    pub fn entry_count(&self) -> usize {
        self.sections.iter().map(|s| s.entries.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}
