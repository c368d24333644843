//! Directory layout of the schema repository.
//!
//! Three trees under one root:
//!
//! - `src/original/<release>/` — generated snapshots, versioned file names
//!   (`systemd.network.v257.schema.json`), disposable.
//! - `curated/<base>/` — the hand-curated base documents, versioned names.
//! - `schemas/<release>/` — the published curated lineage, unversioned
//!   names (`systemd.network.schema.json`).
//!
//! Canonical `$id` URLs point into the published tree.

use std::path::{Path, PathBuf};

use networkd_schema_core::ConfigKind;

/// Base URL of published documents, used for canonical `$id`s.
pub const CANONICAL_ID_BASE: &str =
    "https://raw.githubusercontent.com/networkd-schema/networkd-schema/main/schemas";

/// Path helper over the repository root.
#[derive(Debug, Clone)]
pub struct StoreLayout {
    root: PathBuf,
}

impl StoreLayout {
    /// Creates a layout rooted at `root`.
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }

    /// Repository root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory of generated snapshots for one release.
    pub fn generated_dir(&self, release: &str) -> PathBuf {
        self.root.join("src/original").join(release)
    }

    /// Generated snapshot for one config kind of one release.
    pub fn generated_document(&self, release: &str, kind: ConfigKind) -> PathBuf {
        self.generated_dir(release)
            .join(format!("{}.{release}.schema.json", kind.file_stem()))
    }

    /// Hand-curated document for the base release.
    pub fn curated_document(&self, base_release: &str, kind: ConfigKind) -> PathBuf {
        self.root
            .join("curated")
            .join(base_release)
            .join(format!("{}.{base_release}.schema.json", kind.file_stem()))
    }

    /// Directory of published curated documents for one release.
    pub fn published_dir(&self, release: &str) -> PathBuf {
        self.root.join("schemas").join(release)
    }

    /// Published curated document for one config kind of one release.
    pub fn published_document(&self, release: &str, kind: ConfigKind) -> PathBuf {
        self.published_dir(release)
            .join(format!("{}.schema.json", kind.file_stem()))
    }

    /// Canonical `$id` URL of a published document.
    pub fn canonical_id(&self, release: &str, kind: ConfigKind) -> String {
        format!(
            "{CANONICAL_ID_BASE}/{release}/{}.schema.json",
            kind.file_stem()
        )
    }

    /// Destination for a man-page XML copied next to the generated
    /// snapshots.
    pub fn copied_man_page(&self, release: &str, kind: ConfigKind) -> PathBuf {
        let file_name = Path::new(kind.man_page())
            .file_name()
            .expect("man page paths always name a file");
        self.generated_dir(release).join(file_name)
    }
}
