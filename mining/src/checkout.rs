//! Sparse, shallow checkout of one systemd release.
//!
//! Only the directories the miners read are checked out: the man pages, the
//! network daemon sources (for the gperf tables), and the shared C trees
//! scanned for enum string tables. Each release gets its own scratch
//! directory that lives as long as the [`SourceCheckout`].
//!
//! A checkout failure is fatal for the release being fetched and nothing
//! else; the batch caller logs it and continues with its remaining
//! releases.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Duration;

use tempfile::TempDir;
use tracing::info;
use wait_timeout::ChildExt;

use crate::error::MiningError;

const UPSTREAM_URL: &str = "https://github.com/systemd/systemd.git";

/// Directories included in the sparse checkout.
const SPARSE_DIRS: &[&str] = &[
    "man",
    "src/network",
    "src/basic",
    "src/shared",
    "src/fundamental",
    "src/libsystemd",
    "src/udev/net",
];

/// Network operations get a generous budget; local ones a short one.
const FETCH_TIMEOUT: Duration = Duration::from_secs(600);
const LOCAL_TIMEOUT: Duration = Duration::from_secs(60);

/// A systemd source tree the miners can read from.
///
/// Either a freshly fetched sparse checkout (scratch directory removed on
/// drop) or a caller-supplied local tree.
#[derive(Debug)]
pub struct SourceCheckout {
    root: PathBuf,
    _scratch: Option<TempDir>,
}

impl SourceCheckout {
    /// Fetches a sparse, shallow, single-tag checkout of the upstream
    /// systemd repository.
    pub fn fetch(tag: &str) -> Result<Self, MiningError> {
        let scratch = TempDir::new()?;
        let root = scratch.path().to_path_buf();
        info!("--- Fetching systemd {tag} (Sparse Checkout) ---");

        run_git(&root, &["init"], "init", tag, LOCAL_TIMEOUT)?;
        run_git(
            &root,
            &["remote", "add", "origin", UPSTREAM_URL],
            "remote add",
            tag,
            LOCAL_TIMEOUT,
        )?;
        run_git(
            &root,
            &["config", "core.sparseCheckout", "true"],
            "config",
            tag,
            LOCAL_TIMEOUT,
        )?;

        let sparse_file = root.join(".git/info/sparse-checkout");
        if let Some(parent) = sparse_file.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut patterns = String::new();
        for dir in SPARSE_DIRS {
            patterns.push_str(dir);
            patterns.push_str("/\n");
        }
        std::fs::write(&sparse_file, patterns)?;

        run_git(
            &root,
            &["fetch", "--depth", "1", "origin", "tag", tag],
            "fetch",
            tag,
            FETCH_TIMEOUT,
        )?;
        run_git(
            &root,
            &["checkout", "FETCH_HEAD"],
            "checkout",
            tag,
            LOCAL_TIMEOUT,
        )?;

        Ok(Self {
            root,
            _scratch: Some(scratch),
        })
    }

    /// Wraps an existing source tree (offline runs and tests).
    pub fn local(path: &Path) -> Result<Self, MiningError> {
        if !path.is_dir() {
            return Err(MiningError::SourceTreeMissing(path.to_path_buf()));
        }
        Ok(Self {
            root: path.to_path_buf(),
            _scratch: None,
        })
    }

    /// Root of the checked-out tree.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

fn run_git(
    cwd: &Path,
    args: &[&str],
    operation: &'static str,
    tag: &str,
    timeout: Duration,
) -> Result<(), MiningError> {
    let mut child = Command::new("git")
        .args(args)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()?;

    let Some(status) = child.wait_timeout(timeout)? else {
        let _ = child.kill();
        let _ = child.wait();
        return Err(MiningError::CheckoutTimeout {
            operation,
            tag: tag.to_string(),
        });
    };

    if status.success() {
        return Ok(());
    }

    let mut stderr = String::new();
    if let Some(mut pipe) = child.stderr.take() {
        let _ = pipe.read_to_string(&mut stderr);
    }
    Err(MiningError::Checkout {
        operation,
        tag: tag.to_string(),
        stderr: stderr.trim().to_string(),
    })
}
