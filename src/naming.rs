//! Centralized filename parsing for the `<template>.<variant>` convention.
//!
//! Every compiled artifact is named after the template it came from and the
//! data variant it was rendered with:
//!
//! - `welcome.default.html` → template `welcome`, variant `default`
//! - `invoice.eu.2024.html` → template `invoice`, variant `eu.2024`
//! - `digest.html` → template `digest`, variant `default`
//!
//! Sidecar text files share the artifact stem: `welcome.default.subject.txt`
//! and `welcome.default.preheader.txt`.
//!
//! ## Token Artifacts
//!
//! Files whose last stem segment is `tokens` (`welcome.tokens.html`,
//! `welcome.subject.tokens.txt`) hold templates with placeholders intact.
//! They are build by-products, never renderable variants.

use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Reserved stem segment marking tokenized, non-renderable artifacts.
pub const TOKENS_MARKER: &str = "tokens";

/// Variant name used when a file name carries only a template segment.
pub const DEFAULT_VARIANT: &str = "default";

static SEPARATOR_RUN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[-_.]+").unwrap());

/// Result of parsing an artifact file name like `welcome.vip.html`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactName {
    /// File name without the final extension (`welcome.vip`).
    pub stem: String,
    /// Leading dot-segment (`welcome`).
    pub template: String,
    /// Remaining dot-segments joined by `.`, or `default`.
    pub variant: String,
}

/// Parse an artifact file name following the `<template>.<variant>` convention.
///
/// The final extension is dropped first, so both `welcome.vip.html` and a bare
/// stem `welcome.vip` parse the same way.
pub fn parse_artifact_name(file_name: &str) -> ArtifactName {
    let stem = Path::new(file_name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_name.to_string());
    let (template, rest) = stem.split_once('.').unwrap_or((stem.as_str(), ""));
    let variant = if rest.is_empty() {
        DEFAULT_VARIANT.to_string()
    } else {
        rest.to_string()
    };
    ArtifactName {
        template: template.to_string(),
        variant,
        stem,
    }
}

/// Whether a file carries the reserved `tokens` marker as its last stem segment.
pub fn is_token_artifact(file_name: &str) -> bool {
    Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .and_then(|stem| stem.rsplit('.').next())
        .is_some_and(|last| last == TOKENS_MARKER)
}

/// Path of a sidecar text file: `<dir>/<stem>.<kind>.txt`.
pub fn sidecar_path(dir: &Path, stem: &str, kind: &str) -> PathBuf {
    dir.join(format!("{stem}.{kind}.txt"))
}

/// Turn a file stem into a readable subject line.
///
/// Runs of `-`, `_` and `.` become a single space and the first letter of
/// every word is upper-cased:
/// - `welcome.default` → "Welcome Default"
/// - `password_reset-v2` → "Password Reset V2"
pub fn humanize_name(stem: &str) -> String {
    let spaced = SEPARATOR_RUN_RE.replace_all(stem, " ");
    let mut out = String::with_capacity(spaced.len());
    let mut at_word_start = true;
    for c in spaced.chars() {
        let is_word = c.is_alphanumeric() || c == '_';
        if at_word_start && is_word {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        at_word_start = !is_word;
    }
    out
}
