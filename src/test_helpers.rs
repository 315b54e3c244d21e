//! Shared test utilities for the mailbench test suite.
//!
//! Provides fixture writers, lookup helpers that panic with the available
//! options on a miss, and a grouping assertion for preview manifests.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let dist = write_dist(&[
//!     ("welcome.default.html", WELCOME_HTML),
//!     ("welcome.default.subject.txt", "Welcome!"),
//! ]);
//! let manifest = build_manifest(dist.path(), "/previews").unwrap();
//!
//! let entry = find_entry(&manifest, "welcome.default.html");
//! assert_eq!(entry.subject.as_deref(), Some("Welcome!"));
//!
//! assert_group_shape(&manifest, &[("welcome", &["default"])]);
//! ```

use std::fs;
use std::path::Path;
use tempfile::TempDir;

use crate::types::{ManifestEntry, PreviewManifest};

/// Compiled artifact with an MJML-style hidden preheader.
pub const WELCOME_HTML: &str = r#"<!doctype html><html><head><style>p{}</style></head><body><div style="display:none;font-size:1px">Hi there, welcome aboard!</div><h1>Welcome</h1><p>Thanks for joining.</p></body></html>"#;

/// Compiled artifact without a hidden block.
pub const RECEIPT_HTML: &str = r#"<html><body><div class="header"><img src="logo.png"></div><p>Your receipt for order 1042.</p><div class="footer">Unsubscribe</div></body></html>"#;

// =========================================================================
// Fixture setup
// =========================================================================

/// Write `(relative path, content)` pairs under `root`, creating directories.
pub fn write_files(root: &Path, files: &[(&str, &str)]) {
    for (rel, content) in files {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
    }
}

/// Create a temp compiled-output root holding `files`.
pub fn write_dist(files: &[(&str, &str)]) -> TempDir {
    let tmp = TempDir::new().unwrap();
    write_files(tmp.path(), files);
    tmp
}

// =========================================================================
// Manifest lookups
// =========================================================================

/// Find an entry by file name. Panics if not found.
pub fn find_entry<'a>(manifest: &'a PreviewManifest, file: &str) -> &'a ManifestEntry {
    manifest
        .items
        .iter()
        .find(|e| e.file == file)
        .unwrap_or_else(|| {
            let files: Vec<&str> = manifest.items.iter().map(|e| e.file.as_str()).collect();
            panic!("entry '{file}' not found. Available: {files:?}")
        })
}

/// All item file names in manifest order.
pub fn item_files(manifest: &PreviewManifest) -> Vec<&str> {
    manifest.items.iter().map(|e| e.file.as_str()).collect()
}

/// Assert that `grouped` matches an expected shape, keys and variants in order.
///
/// ```rust
/// assert_group_shape(&manifest, &[
///     ("reminder", &["default"]),
///     ("welcome", &["default", "vip"]),
/// ]);
/// ```
pub fn assert_group_shape(manifest: &PreviewManifest, expected: &[(&str, &[&str])]) {
    let keys: Vec<&str> = manifest.grouped.keys().collect();
    let expected_keys: Vec<&str> = expected.iter().map(|(k, _)| *k).collect();
    assert_eq!(keys, expected_keys, "grouped keys mismatch");

    for (template, variants) in expected {
        let actual: Vec<&str> = manifest
            .grouped
            .get(template)
            .unwrap_or_else(|| panic!("group '{template}' missing"))
            .iter()
            .map(|e| e.variant.as_str())
            .collect();
        assert_eq!(actual, variants.to_vec(), "variants of '{template}' mismatch");
    }
}
