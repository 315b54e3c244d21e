//! Discovery of compiled artifacts.
//!
//! The compiled-output root is flat:
//!
//! ```text
//! dist/
//! ├── welcome.default.html           # artifact
//! ├── welcome.default.subject.txt    # subject sidecar
//! ├── welcome.default.preheader.txt  # preheader sidecar (optional)
//! ├── welcome.vip.html               # artifact
//! ├── welcome.tokens.html            # token artifact, skipped
//! └── welcome.subject.tokens.txt     # token artifact, skipped
//! ```
//!
//! Only `*.html` files directly in the root are artifacts. Discovery order is
//! file-name order, so every run over the same directory sees the same
//! sequence.

use crate::naming::{self, ArtifactName};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),
}

/// A compiled HTML artifact found in the output root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// File name relative to the root (`welcome.vip.html`).
    pub file: String,
    /// Absolute or root-joined path to the file.
    pub path: PathBuf,
    pub name: ArtifactName,
}

const ARTIFACT_EXTENSION: &str = "html";

/// List renderable artifacts in `root`, sorted by file name.
///
/// Token artifacts and non-UTF-8 file names are skipped.
pub fn discover_artifacts(root: &Path) -> Result<Vec<Artifact>, ScanError> {
    if !root.is_dir() {
        return Err(ScanError::NotADirectory(root.to_path_buf()));
    }

    let mut artifacts: Vec<Artifact> = Vec::new();
    for entry in fs::read_dir(root)? {
        let path = entry?.path();
        if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some(ARTIFACT_EXTENSION)
        {
            continue;
        }
        let Some(file) = path.file_name().and_then(|f| f.to_str()).map(String::from) else {
            continue;
        };
        if file.starts_with('.') || naming::is_token_artifact(&file) {
            continue;
        }
        artifacts.push(Artifact {
            name: naming::parse_artifact_name(&file),
            file,
            path,
        });
    }

    artifacts.sort_by(|a, b| a.file.cmp(&b.file));
    Ok(artifacts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::write_files;
    use tempfile::TempDir;

    #[test]
    fn finds_html_artifacts_sorted() {
        let tmp = TempDir::new().unwrap();
        write_files(
            tmp.path(),
            &[
                ("welcome.vip.html", "<p>vip</p>"),
                ("reminder.default.html", "<p>r</p>"),
                ("welcome.default.html", "<p>d</p>"),
            ],
        );

        let files: Vec<String> = discover_artifacts(tmp.path())
            .unwrap()
            .into_iter()
            .map(|a| a.file)
            .collect();
        assert_eq!(
            files,
            vec![
                "reminder.default.html",
                "welcome.default.html",
                "welcome.vip.html"
            ]
        );
    }

    #[test]
    fn skips_tokens_sidecars_and_hidden_files() {
        let tmp = TempDir::new().unwrap();
        write_files(
            tmp.path(),
            &[
                ("welcome.default.html", ""),
                ("welcome.tokens.html", "{{name}}"),
                ("welcome.subject.tokens.txt", "Hi {{name}}"),
                ("welcome.default.subject.txt", "Hi Ada"),
                (".draft.html", ""),
                ("notes.md", ""),
            ],
        );

        let artifacts = discover_artifacts(tmp.path()).unwrap();
        assert_eq!(artifacts.len(), 1);
        assert_eq!(artifacts[0].file, "welcome.default.html");
        assert_eq!(artifacts[0].name.template, "welcome");
        assert_eq!(artifacts[0].name.variant, "default");
    }

    #[test]
    fn ignores_nested_directories() {
        let tmp = TempDir::new().unwrap();
        write_files(
            tmp.path(),
            &[("top.default.html", ""), ("nested/inner.default.html", "")],
        );
        let artifacts = discover_artifacts(tmp.path()).unwrap();
        assert_eq!(artifacts.len(), 1);
    }

    #[test]
    fn missing_root_is_error() {
        let tmp = TempDir::new().unwrap();
        let result = discover_artifacts(&tmp.path().join("dist"));
        assert!(matches!(result, Err(ScanError::NotADirectory(_))));
    }

    #[test]
    fn empty_root_yields_nothing() {
        let tmp = TempDir::new().unwrap();
        assert!(discover_artifacts(tmp.path()).unwrap().is_empty());
    }
}
