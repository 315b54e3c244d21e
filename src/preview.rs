//! Preview preparation: the manifest assembler.
//!
//! Turns the compiled-output root into a browsable serving directory:
//!
//! ```text
//! public/previews/
//! ├── manifest.json                 # { items, grouped }
//! ├── config.json                   # display labels for the preview UI
//! ├── _overview.html                # static no-JS overview (optional)
//! ├── welcome.default.html          # copied artifacts and sidecars
//! ├── welcome.default.subject.txt
//! └── ...
//! ```
//!
//! ## Order of operations
//!
//! 1. Check the compiled-output root exists. If not, stop before touching
//!    anything.
//! 2. Build the full manifest in memory (subject + preheader per artifact).
//! 3. Delete the serving directory and recreate it.
//! 4. Copy the compiled tree, skipping token artifacts.
//! 5. Write `config.json` and the overview page.
//! 6. Write `manifest.json` atomically.
//!
//! The manifest is derived before the first mutation, so a failure while
//! reading artifacts leaves the previous serving directory intact. Output is
//! deterministic: two runs over the same inputs write byte-identical JSON.

use crate::config::PreviewConfig;
use crate::metadata::{self, ArtifactSource, PreheaderSource};
use crate::naming;
use crate::overview;
use crate::scan::{self, ScanError};
use crate::types::{ManifestEntry, PreviewLabels, PreviewManifest};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

pub const MANIFEST_FILE: &str = "manifest.json";
pub const LABELS_FILE: &str = "config.json";

#[derive(Error, Debug)]
pub enum PreviewError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error("{} not found. Run `mailbench build` first.", .0.display())]
    MissingOutputRoot(PathBuf),
    #[error("serving directory {serving} overlaps compiled output {dist}")]
    Overlap { dist: PathBuf, serving: PathBuf },
}

/// A manifest entry plus the preheader stage that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedArtifact {
    pub entry: ManifestEntry,
    pub preheader_source: PreheaderSource,
}

/// What a preview run produced.
#[derive(Debug)]
pub struct PreviewReport {
    pub manifest: PreviewManifest,
    /// Preheader source per item, parallel to `manifest.items`.
    pub sources: Vec<PreheaderSource>,
    pub serving_dir: PathBuf,
    /// Number of files copied into the serving directory.
    pub copied: usize,
    /// Path of the written overview page, if any.
    pub overview: Option<PathBuf>,
}

/// Resolve every artifact in `dist`, in discovery order.
pub fn resolve_artifacts(
    dist: &Path,
    url_prefix: &str,
) -> Result<Vec<ResolvedArtifact>, PreviewError> {
    if !dist.is_dir() {
        return Err(PreviewError::MissingOutputRoot(dist.to_path_buf()));
    }

    let mut resolved = Vec::new();
    for artifact in scan::discover_artifacts(dist)? {
        let bytes = fs::read(&artifact.path)?;
        let html = String::from_utf8_lossy(&bytes);
        let stem = artifact.name.stem.as_str();

        let subject = metadata::resolve_subject(dist, stem);
        let preheader = metadata::resolve_preheader(&ArtifactSource {
            dir: dist,
            stem,
            html: &html,
        });
        debug!(file = %artifact.file, has_subject = subject.is_some(), "resolved artifact");

        resolved.push(ResolvedArtifact {
            entry: ManifestEntry {
                url: artifact_url(url_prefix, &artifact.file),
                file: artifact.file,
                template: artifact.name.template,
                variant: artifact.name.variant,
                subject,
                preheader: preheader.text,
            },
            preheader_source: preheader.source,
        });
    }
    Ok(resolved)
}

/// Build the manifest for `dist` without writing anything.
pub fn build_manifest(dist: &Path, url_prefix: &str) -> Result<PreviewManifest, PreviewError> {
    let items = resolve_artifacts(dist, url_prefix)?
        .into_iter()
        .map(|r| r.entry)
        .collect();
    Ok(PreviewManifest::new(items))
}

/// Root-relative URL of an artifact under the serving prefix.
pub fn artifact_url(prefix: &str, file: &str) -> String {
    format!("{}/{}", prefix.trim_end_matches('/'), file)
}

/// Run the full preview pass: manifest, serving-dir reset, copy, writes.
pub fn prepare(
    dist: &Path,
    serving: &Path,
    config: &PreviewConfig,
) -> Result<PreviewReport, PreviewError> {
    if !dist.is_dir() {
        return Err(PreviewError::MissingOutputRoot(dist.to_path_buf()));
    }
    check_disjoint(dist, serving)?;

    let resolved = resolve_artifacts(dist, &config.url_prefix)?;
    let (items, sources): (Vec<_>, Vec<_>) = resolved
        .into_iter()
        .map(|r| (r.entry, r.preheader_source))
        .unzip();
    let manifest = PreviewManifest::new(items);
    let labels = PreviewLabels {
        from: config.labels.from.clone(),
        to: config.labels.to.clone(),
    };

    reset_dir(serving)?;
    let copied = copy_artifacts(dist, serving)?;
    info!(copied, serving = %serving.display(), "copied compiled output");

    write_json(&serving.join(LABELS_FILE), &labels)?;
    let overview = write_overview(serving, &config.overview, &manifest, &labels)?;
    write_json(&serving.join(MANIFEST_FILE), &manifest)?;

    Ok(PreviewReport {
        manifest,
        sources,
        serving_dir: serving.to_path_buf(),
        copied,
        overview,
    })
}

/// Refuse to wipe a serving directory that holds (or sits inside) the
/// compiled output.
fn check_disjoint(dist: &Path, serving: &Path) -> Result<(), PreviewError> {
    let dist_abs = std::path::absolute(dist)?;
    let serving_abs = std::path::absolute(serving)?;
    if dist_abs.starts_with(&serving_abs) || serving_abs.starts_with(&dist_abs) {
        return Err(PreviewError::Overlap {
            dist: dist.to_path_buf(),
            serving: serving.to_path_buf(),
        });
    }
    Ok(())
}

fn reset_dir(dir: &Path) -> Result<(), PreviewError> {
    if dir.exists() {
        fs::remove_dir_all(dir)?;
    }
    fs::create_dir_all(dir)?;
    Ok(())
}

/// Mirror `src` into `dst`, skipping token artifacts. Returns files copied.
fn copy_artifacts(src: &Path, dst: &Path) -> Result<usize, PreviewError> {
    let mut copied = 0;
    for entry in WalkDir::new(src).min_depth(1).sort_by_file_name() {
        let entry = entry?;
        let Ok(rel) = entry.path().strip_prefix(src) else {
            continue;
        };
        let target = dst.join(rel);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
            continue;
        }
        if entry
            .file_name()
            .to_str()
            .is_some_and(naming::is_token_artifact)
        {
            continue;
        }
        fs::copy(entry.path(), &target)?;
        copied += 1;
    }
    Ok(copied)
}

fn write_overview(
    serving: &Path,
    name: &str,
    manifest: &PreviewManifest,
    labels: &PreviewLabels,
) -> Result<Option<PathBuf>, PreviewError> {
    if name.is_empty() {
        return Ok(None);
    }
    let path = serving.join(name);
    if path.exists() || name == MANIFEST_FILE || name == LABELS_FILE {
        warn!(page = name, "overview page skipped: name already taken in serving directory");
        return Ok(None);
    }
    let markup = overview::render_overview(manifest, labels);
    fs::write(&path, markup.into_string())?;
    Ok(Some(path))
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), PreviewError> {
    let json = serde_json::to_string_pretty(value)?;
    write_atomic(path, json.as_bytes())
}

/// Write to `<path>.tmp` then rename over `path`.
fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), PreviewError> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    fs::write(&tmp, contents)?;
    fs::rename(&tmp, path)?;
    Ok(())
}
