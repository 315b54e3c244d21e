//! Subject and preheader resolution for compiled artifacts.
//!
//! Each artifact can carry two pieces of inbox metadata, resolved independently:
//!
//! - **Subject**: sibling `<stem>.subject.txt` written by the build stage.
//!   There is no in-HTML fallback; without the file the subject is `None`.
//!
//! - **Preheader**: the preview text an inbox shows next to the subject.
//!   Resolved by an explicit, ordered chain of [`PreheaderSource`] strategies.
//!   Every strategy returns `Option<String>` and the first `Some` wins:
//!
//! ```text
//! 1. SidecarFile   <stem>.preheader.txt, trimmed (authoritative, even if empty)
//! 2. HiddenBlock   first display:none / opacity:0 div|span in the HTML head
//! 3. BodySnippet   visible body text, word-safe cut at 140 chars
//! ```
//!
//! The body snippet always produces a value, so resolution cannot fail. An
//! empty preheader is a valid result; rendering it as "none" is up to the
//! display layer.
//!
//! ## Sidecar reads
//!
//! A missing sidecar is the normal case and silently moves on. A sidecar that
//! exists but cannot be read is logged and treated as missing. Bytes that are
//! not valid UTF-8 are replaced, never dropped.

use crate::html;
use crate::naming::sidecar_path;
use std::path::Path;
use tracing::{debug, warn};

/// Sidecar kind for subject files.
pub const SUBJECT_KIND: &str = "subject";
/// Sidecar kind for preheader files.
pub const PREHEADER_KIND: &str = "preheader";

/// Inputs shared by all strategies for one artifact.
#[derive(Debug, Clone, Copy)]
pub struct ArtifactSource<'a> {
    /// Directory holding the artifact and its sidecars.
    pub dir: &'a Path,
    /// Artifact stem (`welcome.default`).
    pub stem: &'a str,
    /// Full HTML content.
    pub html: &'a str,
}

/// One stage of the preheader chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreheaderSource {
    SidecarFile,
    HiddenBlock,
    BodySnippet,
}

/// Preheader strategies in priority order.
pub const PREHEADER_CHAIN: [PreheaderSource; 3] = [
    PreheaderSource::SidecarFile,
    PreheaderSource::HiddenBlock,
    PreheaderSource::BodySnippet,
];

impl PreheaderSource {
    /// Run this stage alone. `None` hands over to the next stage.
    pub fn attempt(self, artifact: &ArtifactSource<'_>) -> Option<String> {
        match self {
            Self::SidecarFile => {
                read_sidecar(&sidecar_path(artifact.dir, artifact.stem, PREHEADER_KIND))
            }
            Self::HiddenBlock => html::extract_hidden_preheader(artifact.html),
            Self::BodySnippet => Some(html::body_snippet(artifact.html)),
        }
    }

    /// Short label for CLI output.
    pub fn label(self) -> &'static str {
        match self {
            Self::SidecarFile => "sidecar",
            Self::HiddenBlock => "hidden block",
            Self::BodySnippet => "body snippet",
        }
    }
}

/// A resolved preheader and the stage that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preheader {
    pub text: String,
    pub source: PreheaderSource,
}

/// Walk [`PREHEADER_CHAIN`] and return the first stage's result.
pub fn resolve_preheader(artifact: &ArtifactSource<'_>) -> Preheader {
    resolve_preheader_with(&PREHEADER_CHAIN, artifact)
}

/// Walk an arbitrary chain. Falls back to an empty body snippet when no
/// stage answers.
pub fn resolve_preheader_with(
    chain: &[PreheaderSource],
    artifact: &ArtifactSource<'_>,
) -> Preheader {
    let resolved = chain.iter().find_map(|&source| {
        source
            .attempt(artifact)
            .map(|text| Preheader { text, source })
    });
    let preheader = resolved.unwrap_or(Preheader {
        text: String::new(),
        source: PreheaderSource::BodySnippet,
    });
    debug!(
        stem = artifact.stem,
        source = preheader.source.label(),
        "resolved preheader"
    );
    preheader
}

/// Read `<stem>.subject.txt` next to the artifact, trimmed.
pub fn resolve_subject(dir: &Path, stem: &str) -> Option<String> {
    read_sidecar(&sidecar_path(dir, stem, SUBJECT_KIND))
}

/// Read a sidecar text file and trim it. Empty content is kept, and invalid
/// UTF-8 is decoded lossily so an existing file always answers.
pub fn read_sidecar(path: &Path) -> Option<String> {
    if !path.is_file() {
        return None;
    }
    match std::fs::read(path) {
        Ok(bytes) => Some(String::from_utf8_lossy(&bytes).trim().to_string()),
        Err(err) => {
            warn!(path = %path.display(), error = %err, "unreadable sidecar ignored");
            None
        }
    }
}

/// Resolve a value from multiple sources.
///
/// Takes optional values in priority order and returns the first non-None,
/// non-blank one, trimmed.
pub fn resolve(sources: &[Option<&str>]) -> Option<String> {
    sources
        .iter()
        .filter_map(|opt| {
            opt.map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
        })
        .next()
}
