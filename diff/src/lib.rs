//! Structural schema diffing and curated-schema derivation.
//!
//! This crate carries the curated schema lineage from one systemd release to
//! the next. Two machine-generated snapshots are compared structurally —
//! presence and absence of `properties` keys only, with `oneOf`/array/`$ref`
//! wrappers unwrapped at every level — and the resulting delta is replayed
//! onto the hand-curated document for the base release, preserving every
//! human-authored refinement of surviving directives.
//!
//! # Main entry points
//!
//! - [`diff`] — compute a [`StructuralDiff`] between two generated documents.
//! - [`apply`] — replay a diff onto a curated document.
//! - [`derive_release`] — the full step: diff, apply, retitle, relink.
//!
//! # Example
//!
//! ```
//! use networkd_schema_diff::{DeriveOptions, derive_release};
//! use serde_json::json;
//!
//! let generated_base = json!({ "properties": { "Match": { "properties": { "Name": {} } } } });
//! let generated_target = json!({
//!     "properties": { "Match": { "properties": { "Name": {}, "Kind": { "type": "string" } } } }
//! });
//! let curated_base = json!({
//!     "title": "Systemd network Configuration (v257)",
//!     "properties": { "Match": { "type": "object", "properties": {
//!         "Name": { "type": "string", "description": "curated" }
//!     } } }
//! });
//!
//! let derived = derive_release(
//!     &curated_base,
//!     &generated_base,
//!     &generated_target,
//!     &DeriveOptions {
//!         release: "v258",
//!         base_release: "v257",
//!         id_url: "https://example.org/schemas/v258/systemd.network.schema.json",
//!     },
//! )
//! .unwrap();
//!
//! assert_eq!(derived["title"], "Systemd network Configuration (v258)");
//! assert!(derived["properties"]["Match"]["properties"].get("Kind").is_some());
//! assert_eq!(
//!     derived["properties"]["Match"]["properties"]["Name"]["description"],
//!     "curated"
//! );
//! ```

mod apply;
mod relink;
mod structural;

pub use apply::{ApplyError, apply};
pub use relink::{retitle, rewrite_documentation_links, set_id};
pub use structural::{Addition, Removal, StructuralDiff, diff};

use serde_json::Value;

/// Metadata for one derivation step.
#[derive(Debug, Clone, Copy)]
pub struct DeriveOptions<'a> {
    /// Release being derived, e.g. `"v241"`.
    pub release: &'a str,
    /// Release of the curated base document, e.g. `"v257"`.
    pub base_release: &'a str,
    /// Canonical `$id` URL for the derived document.
    pub id_url: &'a str,
}

/// Derives the curated document for a target release.
///
/// Computes the structural diff between the generated snapshots for the
/// base and target releases, applies it to the curated base, then updates
/// the title, `$id`, and embedded documentation links for the target
/// release. The inputs are never mutated.
pub fn derive_release(
    curated_base: &Value,
    generated_base: &Value,
    generated_target: &Value,
    options: &DeriveOptions<'_>,
) -> Result<Value, ApplyError> {
    let delta = diff(generated_base, generated_target);
    tracing::debug!(
        additions = delta.addition_count(),
        removals = delta.removal_count(),
        release = options.release,
        "applying structural diff"
    );

    let mut document = apply(curated_base, &delta)?;
    retitle(&mut document, options.release);
    set_id(&mut document, options.id_url);
    rewrite_documentation_links(
        &mut document,
        version_number(options.base_release),
        version_number(options.release),
    );
    Ok(document)
}

/// Strips the `v` prefix from a release tag (`"v257"` → `"257"`).
fn version_number(release: &str) -> &str {
    release.strip_prefix('v').unwrap_or(release)
}
