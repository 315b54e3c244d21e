//! Pipeline configuration module.
//!
//! Handles loading, validating, and merging `mailbench.toml`. Stock defaults
//! describe the conventional project layout, so a project that follows it needs
//! no config file at all. A user file overrides only the keys it names.
//!
//! ## Project Layout
//!
//! ```text
//! project/
//! ├── mailbench.toml             # Optional, overrides stock defaults
//! ├── src/templates/
//! │   ├── welcome.mjml           # MJML template
//! │   ├── welcome.subject.txt    # Optional Handlebars subject line
//! │   └── welcome.preheader.txt  # Optional Handlebars preheader
//! ├── data/
//! │   ├── welcome.default.json   # One file per variant
//! │   └── welcome.vip.json
//! ├── dist/                      # Compiled output (build stage)
//! └── public/previews/           # Serving directory (preview stage)
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [paths]
//! templates = "src/templates"
//! data = "data"
//! dist = "dist"
//! public = "public"
//!
//! [build]
//! mjml_command = ["mjml"]       # Program (and leading args) for the MJML CLI
//! minify = true
//! keep_comments = true
//! validation_level = "soft"     # strict | soft | skip
//! emit_tokens = true            # Write <name>.tokens.html for ESP hand-off
//!
//! [preview]
//! serving_dir = "previews"      # Directory under paths.public
//! url_prefix = "/previews"
//! overview = "_overview.html"   # Empty string disables the overview page
//!
//! [preview.labels]
//! from = "Mailbench"
//! to = "you@example.com"
//!
//! [smtp]
//! host = "localhost"            # Mailpit defaults
//! port = 1025
//! secure = false
//! # user = "..."
//! # pass = "..."
//!
//! [send]
//! from = "Mailbench <test@localhost>"
//! subject_prefix = ""
//! include = "dist/*.html"
//! exclude = ["dist/*.tokens.html"]
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "mailbench.toml";

const VALIDATION_LEVELS: &[&str] = &["strict", "soft", "skip"];

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Pipeline configuration loaded from `mailbench.toml`.
///
/// All fields have defaults matching the conventional layout. Unknown keys
/// are rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Source, data, compiled-output and public directories.
    pub paths: PathsConfig,
    /// MJML compilation settings.
    pub build: BuildConfig,
    /// Preview manifest and serving directory settings.
    pub preview: PreviewConfig,
    /// SMTP transport settings.
    pub smtp: SmtpConfig,
    /// Defaults for the send commands.
    pub send: SendConfig,
}

impl PipelineConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.smtp.port == 0 {
            return Err(ConfigError::Validation("smtp.port must be non-zero".into()));
        }
        if self.smtp.user.is_some() != self.smtp.pass.is_some() {
            return Err(ConfigError::Validation(
                "smtp.user and smtp.pass must be set together".into(),
            ));
        }
        if !self.preview.url_prefix.starts_with('/') {
            return Err(ConfigError::Validation(
                "preview.url_prefix must start with '/'".into(),
            ));
        }
        let serving = &self.preview.serving_dir;
        if serving.is_empty() || serving == ".." || serving.contains(['/', '\\']) {
            return Err(ConfigError::Validation(
                "preview.serving_dir must be a single directory name".into(),
            ));
        }
        if self.build.mjml_command.is_empty() {
            return Err(ConfigError::Validation(
                "build.mjml_command must not be empty".into(),
            ));
        }
        if !VALIDATION_LEVELS.contains(&self.build.validation_level.as_str()) {
            return Err(ConfigError::Validation(format!(
                "build.validation_level must be one of {}",
                VALIDATION_LEVELS.join(", ")
            )));
        }
        Ok(())
    }

    /// Directory the preview stage resets and fills (`public/previews`).
    pub fn serving_dir(&self) -> PathBuf {
        self.paths.public.join(&self.preview.serving_dir)
    }
}

/// Project directories, relative to the working directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    /// MJML templates and their subject/preheader templates.
    pub templates: PathBuf,
    /// Per-variant JSON data files.
    pub data: PathBuf,
    /// Compiled-output root.
    pub dist: PathBuf,
    /// Public root served to the preview UI.
    pub public: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            templates: PathBuf::from("src/templates"),
            data: PathBuf::from("data"),
            dist: PathBuf::from("dist"),
            public: PathBuf::from("public"),
        }
    }
}

/// MJML compilation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Program plus leading arguments, e.g. `["npx", "mjml"]`.
    pub mjml_command: Vec<String>,
    /// Minify the compiled HTML.
    pub minify: bool,
    /// Keep HTML comments in the compiled output.
    pub keep_comments: bool,
    /// MJML validation level: `strict`, `soft` or `skip`.
    pub validation_level: String,
    /// Also write unrendered `<name>.tokens.html` artifacts.
    pub emit_tokens: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            mjml_command: vec!["mjml".to_string()],
            minify: true,
            keep_comments: true,
            validation_level: "soft".to_string(),
            emit_tokens: true,
        }
    }
}

/// Preview stage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PreviewConfig {
    /// Serving directory name under `paths.public`.
    pub serving_dir: String,
    /// Root-relative URL prefix for manifest entries.
    pub url_prefix: String,
    /// File name of the static overview page. Empty disables it.
    pub overview: String,
    /// Display labels written to `config.json` for the preview UI.
    pub labels: PreviewLabelsConfig,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            serving_dir: "previews".to_string(),
            url_prefix: "/previews".to_string(),
            overview: "_overview.html".to_string(),
            labels: PreviewLabelsConfig::default(),
        }
    }
}

/// Sidebar labels shown by the preview UI.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PreviewLabelsConfig {
    pub from: String,
    pub to: String,
}

impl Default for PreviewLabelsConfig {
    fn default() -> Self {
        Self {
            from: "Mailbench".to_string(),
            to: "you@example.com".to_string(),
        }
    }
}

/// SMTP transport settings. Defaults point at a local Mailpit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    /// Implicit TLS (typically port 465).
    pub secure: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pass: Option<String>,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 1025,
            secure: false,
            user: None,
            pass: None,
        }
    }
}

/// Defaults for `send` and `send-all`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SendConfig {
    /// `From` header.
    pub from: String,
    /// Prepended to every subject, e.g. `"[DEV] "`.
    pub subject_prefix: String,
    /// Glob of HTML files to send.
    pub include: String,
    /// Globs removed from the include set.
    pub exclude: Vec<String>,
}

impl Default for SendConfig {
    fn default() -> Self {
        Self {
            from: "Mailbench <test@localhost>".to_string(),
            subject_prefix: String::new(),
            include: "dist/*.html".to_string(),
            exclude: vec!["dist/*.tokens.html".to_string()],
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer that user overrides are merged on top of.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(PipelineConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but is
/// not valid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.is_file() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<PipelineConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: PipelineConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from the given file path.
///
/// A missing file yields the stock defaults.
pub fn load_config(path: &Path) -> Result<PipelineConfig, ConfigError> {
    resolve_config(stock_defaults_value(), load_raw_config(path)?)
}

/// Returns a fully-commented stock `mailbench.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Mailbench Configuration
# =======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Project directories (relative to the working directory)
# ---------------------------------------------------------------------------
[paths]
# MJML templates, plus optional <name>.subject.txt / <name>.preheader.txt.
templates = "src/templates"
# Variant data files named <template>.<variant>.json.
data = "data"
# Compiled output: <template>.<variant>.html and sidecar text files.
dist = "dist"
# Public root served to the preview UI.
public = "public"

# ---------------------------------------------------------------------------
# Build (MJML -> HTML, then Handlebars with variant data)
# ---------------------------------------------------------------------------
[build]
# Program and leading arguments used to run the MJML CLI.
# Use ["npx", "mjml"] to run a project-local install.
mjml_command = ["mjml"]
minify = true
keep_comments = true
# strict | soft | skip
validation_level = "soft"
# Also write <name>.tokens.html (compiled, placeholders intact).
emit_tokens = true

# ---------------------------------------------------------------------------
# Preview
# ---------------------------------------------------------------------------
[preview]
# Directory under paths.public that is wiped and refilled on every run.
serving_dir = "previews"
# URL prefix used for manifest entries.
url_prefix = "/previews"
# Static overview page written next to manifest.json ("" disables it).
overview = "_overview.html"

# Sidebar labels written to config.json for the preview UI.
[preview.labels]
from = "Mailbench"
to = "you@example.com"

# ---------------------------------------------------------------------------
# SMTP (defaults target a local Mailpit)
# ---------------------------------------------------------------------------
[smtp]
host = "localhost"
port = 1025
# Implicit TLS, usually together with port 465.
secure = false
# Credentials are only used when both are set.
# user = "apikey"
# pass = "secret"

# ---------------------------------------------------------------------------
# Send
# ---------------------------------------------------------------------------
[send]
from = "Mailbench <test@localhost>"
# Prepended to every subject, e.g. "[DEV] ".
subject_prefix = ""
include = "dist/*.html"
exclude = ["dist/*.tokens.html"]
"##
}
