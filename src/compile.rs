//! Build stage: MJML templates + per-variant JSON data → static HTML.
//!
//! ## Inputs and outputs
//!
//! ```text
//! src/templates/                  dist/
//! ├── welcome.mjml           ──►  ├── welcome.default.html
//! ├── welcome.subject.txt    ──►  ├── welcome.default.subject.txt
//! └── welcome.preheader.txt  ──►  ├── welcome.default.preheader.txt
//!                                 ├── welcome.vip.html ...
//! data/                           ├── welcome.tokens.html          (unrendered)
//! ├── welcome.default.json        └── welcome.subject.tokens.txt   (unrendered)
//! └── welcome.vip.json
//! ```
//!
//! Each template is compiled once through an [`MjmlCompiler`], then the
//! compiled HTML is rendered as a Handlebars template against every data
//! variant. Subject and preheader templates next to the `.mjml` file are
//! rendered with the same data and written as sidecars beside the output.
//!
//! HTML escaping is off: data is trusted test fixture content and may carry
//! markup. Registered helpers: the built-in `eq`, plus `json` which prints its
//! argument as compact JSON.

use crate::config::{BuildConfig, PathsConfig};
use crate::metadata::{PREHEADER_KIND, SUBJECT_KIND};
use crate::naming::{self, TOKENS_MARKER};
use handlebars::{Handlebars, RenderError, handlebars_helper};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;
use tracing::{info, warn};

const TEMPLATE_EXTENSION: &str = "mjml";
const DATA_EXTENSION: &str = "json";

#[derive(Error, Debug)]
pub enum CompileError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("templates directory not found: {}", .0.display())]
    MissingDir(PathBuf),
    #[error("template not found: {}", .0.display())]
    MissingTemplate(PathBuf),
    #[error("failed to run MJML command `{program}`: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },
    #[error("MJML failed for {}: {message}", .path.display())]
    Mjml { path: PathBuf, message: String },
    #[error("invalid data file {}: {source}", .path.display())]
    Data {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("render failed for {}: {source}", .path.display())]
    Render {
        path: PathBuf,
        source: Box<RenderError>,
    },
}

// ============================================================================
// MJML compiler seam
// ============================================================================

/// Output of one MJML compilation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompiledMjml {
    pub html: String,
    /// Non-fatal validation messages.
    pub warnings: Vec<String>,
}

/// Turns an `.mjml` file into HTML. The real compiler is an external program.
pub trait MjmlCompiler {
    fn compile(&self, path: &Path) -> Result<CompiledMjml, CompileError>;
}

/// Runs the configured MJML CLI with `--stdout`.
#[derive(Debug, Clone)]
pub struct CommandCompiler {
    command: Vec<String>,
    minify: bool,
    keep_comments: bool,
    validation_level: String,
}

impl CommandCompiler {
    pub fn from_config(config: &BuildConfig) -> Self {
        Self {
            command: config.mjml_command.clone(),
            minify: config.minify,
            keep_comments: config.keep_comments,
            validation_level: config.validation_level.clone(),
        }
    }

    /// Arguments after the program name.
    fn args(&self, path: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = self.command.iter().skip(1).map(OsString::from).collect();
        args.push(path.as_os_str().to_owned());
        args.push("--stdout".into());
        args.push(format!("--config.minify={}", self.minify).into());
        args.push(format!("--config.keepComments={}", self.keep_comments).into());
        args.push(format!("--config.validationLevel={}", self.validation_level).into());
        args
    }
}

impl MjmlCompiler for CommandCompiler {
    fn compile(&self, path: &Path) -> Result<CompiledMjml, CompileError> {
        let Some(program) = self.command.first() else {
            return Err(CompileError::Mjml {
                path: path.to_path_buf(),
                message: "mjml_command is empty".to_string(),
            });
        };

        let output = Command::new(program)
            .args(self.args(path))
            .output()
            .map_err(|source| CompileError::Spawn {
                program: program.clone(),
                source,
            })?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !output.status.success() {
            return Err(CompileError::Mjml {
                path: path.to_path_buf(),
                message: stderr.trim().to_string(),
            });
        }

        Ok(CompiledMjml {
            html: String::from_utf8_lossy(&output.stdout).into_owned(),
            warnings: stderr
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(String::from)
                .collect(),
        })
    }
}

// ============================================================================
// Handlebars rendering
// ============================================================================

handlebars_helper!(json_helper: |value: Json| value.to_string());

/// Handlebars registry configured for email rendering.
pub struct TemplateRenderer {
    registry: Handlebars<'static>,
}

impl Default for TemplateRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRenderer {
    pub fn new() -> Self {
        let mut registry = Handlebars::new();
        registry.register_escape_fn(handlebars::no_escape);
        registry.register_helper("json", Box::new(json_helper));
        Self { registry }
    }

    pub fn render(&self, template: &str, data: &serde_json::Value) -> Result<String, RenderError> {
        self.registry.render_template(template, data)
    }
}

// ============================================================================
// Build
// ============================================================================

/// One rendered variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltArtifact {
    pub variant: String,
    pub output: PathBuf,
    /// Subject/preheader sidecars written beside the output.
    pub sidecars: Vec<PathBuf>,
}

/// Everything produced for one template. No artifacts means no data files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateBuild {
    pub name: String,
    pub warnings: Vec<String>,
    pub artifacts: Vec<BuiltArtifact>,
    /// Unrendered token artifacts.
    pub tokens: Vec<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub templates: Vec<TemplateBuild>,
}

impl BuildReport {
    pub fn artifact_count(&self) -> usize {
        self.templates.iter().map(|t| t.artifacts.len()).sum()
    }
}

/// Subject/preheader templates found next to an `.mjml` file.
struct SidecarTemplates {
    entries: Vec<(&'static str, String)>,
}

impl SidecarTemplates {
    fn load(templates_dir: &Path, name: &str) -> Result<Self, CompileError> {
        let mut entries = Vec::new();
        for kind in [SUBJECT_KIND, PREHEADER_KIND] {
            let path = naming::sidecar_path(templates_dir, name, kind);
            if path.is_file() {
                entries.push((kind, fs::read_to_string(&path)?));
            }
        }
        Ok(Self { entries })
    }

    fn subject(&self) -> Option<&str> {
        self.entries
            .iter()
            .find(|(kind, _)| *kind == SUBJECT_KIND)
            .map(|(_, t)| t.as_str())
    }
}

/// Template names (`*.mjml` stems) in `dir`, sorted.
pub fn discover_templates(dir: &Path) -> Result<Vec<String>, CompileError> {
    if !dir.is_dir() {
        return Err(CompileError::MissingDir(dir.to_path_buf()));
    }
    let mut names: Vec<String> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file())
        .filter(|p| p.extension().and_then(|e| e.to_str()) == Some(TEMPLATE_EXTENSION))
        .filter_map(|p| p.file_stem().and_then(|s| s.to_str()).map(String::from))
        .collect();
    names.sort();
    Ok(names)
}

/// `(variant, path)` for every `<name>.<variant>.json` in `data_dir`, sorted.
///
/// A missing data directory has no variants.
pub fn discover_variants(
    data_dir: &Path,
    name: &str,
) -> Result<Vec<(String, PathBuf)>, CompileError> {
    if !data_dir.is_dir() {
        return Ok(Vec::new());
    }
    let prefix = format!("{name}.");
    let suffix = format!(".{DATA_EXTENSION}");

    let mut variants = Vec::new();
    for entry in fs::read_dir(data_dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let Some(file) = path.file_name().and_then(|f| f.to_str()) else {
            continue;
        };
        let variant = file
            .strip_prefix(&prefix)
            .and_then(|rest| rest.strip_suffix(&suffix))
            .filter(|v| !v.is_empty());
        if let Some(variant) = variant {
            variants.push((variant.to_string(), path.clone()));
        }
    }
    variants.sort();
    Ok(variants)
}

/// Build every template × variant into `paths.dist`.
pub fn build_all(
    paths: &PathsConfig,
    config: &BuildConfig,
    compiler: &dyn MjmlCompiler,
) -> Result<BuildReport, CompileError> {
    let renderer = TemplateRenderer::new();
    let mut report = BuildReport::default();
    fs::create_dir_all(&paths.dist)?;

    for name in discover_templates(&paths.templates)? {
        let variants = discover_variants(&paths.data, &name)?;
        if variants.is_empty() {
            info!(template = %name, "no data files, skipped");
            report.templates.push(TemplateBuild {
                name,
                warnings: Vec::new(),
                artifacts: Vec::new(),
                tokens: Vec::new(),
            });
            continue;
        }

        let mjml_path = paths.templates.join(format!("{name}.{TEMPLATE_EXTENSION}"));
        let compiled = compiler.compile(&mjml_path)?;
        for w in &compiled.warnings {
            warn!(template = %name, "MJML: {w}");
        }
        let sidecars = SidecarTemplates::load(&paths.templates, &name)?;

        let mut artifacts = Vec::new();
        for (variant, data_path) in variants {
            let output = paths.dist.join(format!("{name}.{variant}.html"));
            let written = render_variant(&renderer, &compiled.html, &sidecars, &data_path, &output)?;
            artifacts.push(BuiltArtifact {
                variant,
                output,
                sidecars: written,
            });
        }

        let tokens = if config.emit_tokens {
            write_tokens(&paths.dist, &name, &compiled.html, &sidecars)?
        } else {
            Vec::new()
        };

        report.templates.push(TemplateBuild {
            name,
            warnings: compiled.warnings,
            artifacts,
            tokens,
        });
    }
    Ok(report)
}

/// Single-target mode: one template against one data file.
///
/// Sidecars land beside `out`, named after its stem.
pub fn build_one(
    templates_dir: &Path,
    template: &str,
    data_path: &Path,
    out: &Path,
    compiler: &dyn MjmlCompiler,
) -> Result<TemplateBuild, CompileError> {
    let mjml_path = templates_dir.join(format!("{template}.{TEMPLATE_EXTENSION}"));
    if !mjml_path.is_file() {
        return Err(CompileError::MissingTemplate(mjml_path));
    }
    let compiled = compiler.compile(&mjml_path)?;
    for w in &compiled.warnings {
        warn!(template, "MJML: {w}");
    }
    let sidecars = SidecarTemplates::load(templates_dir, template)?;
    let written = render_variant(
        &TemplateRenderer::new(),
        &compiled.html,
        &sidecars,
        data_path,
        out,
    )?;

    let variant = out
        .file_stem()
        .and_then(|s| s.to_str())
        .map(|stem| naming::parse_artifact_name(&format!("{stem}.html")).variant)
        .unwrap_or_else(|| naming::DEFAULT_VARIANT.to_string());

    Ok(TemplateBuild {
        name: template.to_string(),
        warnings: compiled.warnings,
        artifacts: vec![BuiltArtifact {
            variant,
            output: out.to_path_buf(),
            sidecars: written,
        }],
        tokens: Vec::new(),
    })
}

/// Render HTML and sidecars for one data file. Returns sidecar paths written.
fn render_variant(
    renderer: &TemplateRenderer,
    compiled_html: &str,
    sidecars: &SidecarTemplates,
    data_path: &Path,
    out: &Path,
) -> Result<Vec<PathBuf>, CompileError> {
    let raw = fs::read_to_string(data_path)?;
    let data: serde_json::Value =
        serde_json::from_str(&raw).map_err(|source| CompileError::Data {
            path: data_path.to_path_buf(),
            source,
        })?;

    let render = |template: &str| {
        renderer
            .render(template, &data)
            .map_err(|source| CompileError::Render {
                path: data_path.to_path_buf(),
                source: Box::new(source),
            })
    };

    let html = render(compiled_html)?;
    let dir = out.parent().unwrap_or(Path::new(""));
    if !dir.as_os_str().is_empty() {
        fs::create_dir_all(dir)?;
    }
    fs::write(out, html)?;

    let stem = out.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
    let mut written = Vec::new();
    for (kind, template) in &sidecars.entries {
        let path = naming::sidecar_path(dir, stem, kind);
        fs::write(&path, render(template)?)?;
        written.push(path);
    }
    info!(output = %out.display(), "built");
    Ok(written)
}

/// Write unrendered token artifacts for a template.
fn write_tokens(
    dist: &Path,
    name: &str,
    compiled_html: &str,
    sidecars: &SidecarTemplates,
) -> Result<Vec<PathBuf>, CompileError> {
    let html_path = dist.join(format!("{name}.{TOKENS_MARKER}.html"));
    fs::write(&html_path, compiled_html)?;
    let mut written = vec![html_path];

    if let Some(subject) = sidecars.subject() {
        let path = dist.join(format!("{name}.{SUBJECT_KIND}.{TOKENS_MARKER}.txt"));
        fs::write(&path, subject)?;
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::write_files;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Returns the `.mjml` source unchanged and records every call.
    #[derive(Default)]
    struct PassthroughCompiler {
        calls: Mutex<Vec<PathBuf>>,
        warnings: Vec<String>,
    }

    impl PassthroughCompiler {
        fn calls(&self) -> Vec<PathBuf> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl MjmlCompiler for PassthroughCompiler {
        fn compile(&self, path: &Path) -> Result<CompiledMjml, CompileError> {
            self.calls.lock().unwrap().push(path.to_path_buf());
            Ok(CompiledMjml {
                html: fs::read_to_string(path)?,
                warnings: self.warnings.clone(),
            })
        }
    }

    struct FailingCompiler;

    impl MjmlCompiler for FailingCompiler {
        fn compile(&self, path: &Path) -> Result<CompiledMjml, CompileError> {
            Err(CompileError::Mjml {
                path: path.to_path_buf(),
                message: "Element mj-colum doesn't exist".to_string(),
            })
        }
    }

    fn project(files: &[(&str, &str)]) -> (TempDir, PathsConfig) {
        let tmp = TempDir::new().unwrap();
        write_files(tmp.path(), files);
        let paths = PathsConfig {
            templates: tmp.path().join("src/templates"),
            data: tmp.path().join("data"),
            dist: tmp.path().join("dist"),
            public: tmp.path().join("public"),
        };
        (tmp, paths)
    }

    fn read(path: &Path) -> String {
        fs::read_to_string(path).unwrap()
    }

    // =========================================================================
    // Discovery
    // =========================================================================

    #[test]
    fn discovers_templates_sorted() {
        let (_tmp, paths) = project(&[
            ("src/templates/welcome.mjml", ""),
            ("src/templates/receipt.mjml", ""),
            ("src/templates/welcome.subject.txt", ""),
        ]);
        assert_eq!(
            discover_templates(&paths.templates).unwrap(),
            vec!["receipt", "welcome"]
        );
    }

    #[test]
    fn discovers_variants_by_prefix() {
        let (_tmp, paths) = project(&[
            ("data/welcome.vip.json", "{}"),
            ("data/welcome.default.json", "{}"),
            ("data/welcome.json", "{}"),
            ("data/welcomeback.default.json", "{}"),
            ("data/welcome.eu.large.json", "{}"),
        ]);
        let variants: Vec<String> = discover_variants(&paths.data, "welcome")
            .unwrap()
            .into_iter()
            .map(|(v, _)| v)
            .collect();
        assert_eq!(variants, vec!["default", "eu.large", "vip"]);
    }

    #[test]
    fn missing_data_dir_has_no_variants() {
        let (_tmp, paths) = project(&[]);
        assert!(discover_variants(&paths.data, "welcome").unwrap().is_empty());
    }

    #[test]
    fn missing_templates_dir_is_error() {
        let (_tmp, paths) = project(&[]);
        let result = build_all(&paths, &BuildConfig::default(), &PassthroughCompiler::default());
        assert!(matches!(result, Err(CompileError::MissingDir(_))));
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    #[test]
    fn renderer_does_not_escape() {
        let r = TemplateRenderer::new();
        let out = r
            .render("<p>{{body}}</p>", &serde_json::json!({"body": "<b>hi</b> & bye"}))
            .unwrap();
        assert_eq!(out, "<p><b>hi</b> & bye</p>");
    }

    #[test]
    fn renderer_json_and_eq_helpers() {
        let r = TemplateRenderer::new();
        let data = serde_json::json!({"plan": "vip", "items": [1, 2]});
        assert_eq!(r.render("{{json items}}", &data).unwrap(), "[1,2]");
        assert_eq!(
            r.render("{{#if (eq plan \"vip\")}}gold{{else}}std{{/if}}", &data)
                .unwrap(),
            "gold"
        );
    }

    // =========================================================================
    // build_all
    // =========================================================================

    #[test]
    fn builds_every_variant_with_sidecars() {
        let (_tmp, paths) = project(&[
            ("src/templates/welcome.mjml", "<p>Hello {{name}}</p>"),
            ("src/templates/welcome.subject.txt", "Welcome, {{name}}!\n"),
            ("src/templates/welcome.preheader.txt", "Glad you're here"),
            ("data/welcome.default.json", r#"{"name": "Ada"}"#),
            ("data/welcome.vip.json", r#"{"name": "Grace"}"#),
        ]);
        let compiler = PassthroughCompiler::default();

        let report = build_all(&paths, &BuildConfig::default(), &compiler).unwrap();

        assert_eq!(report.artifact_count(), 2);
        assert_eq!(compiler.calls().len(), 1, "compiled once per template");
        assert_eq!(read(&paths.dist.join("welcome.default.html")), "<p>Hello Ada</p>");
        assert_eq!(read(&paths.dist.join("welcome.vip.html")), "<p>Hello Grace</p>");
        assert_eq!(
            read(&paths.dist.join("welcome.vip.subject.txt")),
            "Welcome, Grace!\n"
        );
        assert_eq!(
            read(&paths.dist.join("welcome.default.preheader.txt")),
            "Glad you're here"
        );
        assert_eq!(report.templates[0].artifacts[0].sidecars.len(), 2);
    }

    #[test]
    fn template_without_data_is_skipped() {
        let (_tmp, paths) = project(&[
            ("src/templates/orphan.mjml", "<p>x</p>"),
            ("src/templates/welcome.mjml", "<p>{{name}}</p>"),
            ("data/welcome.default.json", r#"{"name": "Ada"}"#),
        ]);
        let compiler = PassthroughCompiler::default();

        let report = build_all(&paths, &BuildConfig::default(), &compiler).unwrap();

        assert_eq!(report.templates[0].name, "orphan");
        assert!(report.templates[0].artifacts.is_empty());
        assert_eq!(compiler.calls().len(), 1);
        assert!(!paths.dist.join("orphan.tokens.html").exists());
    }

    #[test]
    fn token_artifacts_hold_unrendered_source() {
        let (_tmp, paths) = project(&[
            ("src/templates/welcome.mjml", "<p>Hello {{name}}</p>"),
            ("src/templates/welcome.subject.txt", "Hi {{name}}"),
            ("data/welcome.default.json", r#"{"name": "Ada"}"#),
        ]);

        let report =
            build_all(&paths, &BuildConfig::default(), &PassthroughCompiler::default()).unwrap();

        assert_eq!(report.templates[0].tokens.len(), 2);
        assert_eq!(read(&paths.dist.join("welcome.tokens.html")), "<p>Hello {{name}}</p>");
        assert_eq!(
            read(&paths.dist.join("welcome.subject.tokens.txt")),
            "Hi {{name}}"
        );
    }

    #[test]
    fn tokens_disabled_by_config() {
        let (_tmp, paths) = project(&[
            ("src/templates/welcome.mjml", "<p>{{name}}</p>"),
            ("data/welcome.default.json", "{}"),
        ]);
        let config = BuildConfig {
            emit_tokens: false,
            ..BuildConfig::default()
        };

        build_all(&paths, &config, &PassthroughCompiler::default()).unwrap();
        assert!(!paths.dist.join("welcome.tokens.html").exists());
    }

    #[test]
    fn warnings_are_reported() {
        let (_tmp, paths) = project(&[
            ("src/templates/welcome.mjml", "<p/>"),
            ("data/welcome.default.json", "{}"),
        ]);
        let compiler = PassthroughCompiler {
            warnings: vec!["Line 3: mj-text has invalid attribute".to_string()],
            ..Default::default()
        };

        let report = build_all(&paths, &BuildConfig::default(), &compiler).unwrap();
        assert_eq!(report.templates[0].warnings.len(), 1);
    }

    #[test]
    fn invalid_json_names_the_file() {
        let (_tmp, paths) = project(&[
            ("src/templates/welcome.mjml", "<p/>"),
            ("data/welcome.default.json", "{ not json"),
        ]);

        let err = build_all(&paths, &BuildConfig::default(), &PassthroughCompiler::default())
            .unwrap_err();
        match err {
            CompileError::Data { path, .. } => assert!(path.ends_with("welcome.default.json")),
            other => panic!("expected Data error, got {other:?}"),
        }
    }

    #[test]
    fn mjml_failure_propagates() {
        let (_tmp, paths) = project(&[
            ("src/templates/welcome.mjml", "<mj-colum/>"),
            ("data/welcome.default.json", "{}"),
        ]);
        let result = build_all(&paths, &BuildConfig::default(), &FailingCompiler);
        assert!(matches!(result, Err(CompileError::Mjml { .. })));
        assert!(!paths.dist.join("welcome.default.html").exists());
    }

    // =========================================================================
    // build_one
    // =========================================================================

    #[test]
    fn single_target_writes_sidecars_beside_out() {
        let (tmp, paths) = project(&[
            ("src/templates/welcome.mjml", "<p>{{name}}</p>"),
            ("src/templates/welcome.subject.txt", "Hi {{name}}"),
            ("fixtures/custom.json", r#"{"name": "Lin"}"#),
        ]);
        let out = tmp.path().join("out/welcome.custom.html");

        let build = build_one(
            &paths.templates,
            "welcome",
            &tmp.path().join("fixtures/custom.json"),
            &out,
            &PassthroughCompiler::default(),
        )
        .unwrap();

        assert_eq!(read(&out), "<p>Lin</p>");
        assert_eq!(read(&tmp.path().join("out/welcome.custom.subject.txt")), "Hi Lin");
        assert_eq!(build.artifacts[0].variant, "custom");
    }

    #[test]
    fn single_target_missing_template() {
        let (tmp, paths) = project(&[("data.json", "{}")]);
        let result = build_one(
            &paths.templates,
            "nope",
            &tmp.path().join("data.json"),
            &tmp.path().join("out.html"),
            &PassthroughCompiler::default(),
        );
        assert!(matches!(result, Err(CompileError::MissingTemplate(_))));
    }

    // =========================================================================
    // CommandCompiler
    // =========================================================================

    #[test]
    fn command_args_follow_config() {
        let config = BuildConfig {
            mjml_command: vec!["npx".to_string(), "mjml".to_string()],
            minify: false,
            ..BuildConfig::default()
        };
        let compiler = CommandCompiler::from_config(&config);
        let args: Vec<String> = compiler
            .args(Path::new("t/welcome.mjml"))
            .into_iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            args,
            vec![
                "mjml",
                "t/welcome.mjml",
                "--stdout",
                "--config.minify=false",
                "--config.keepComments=true",
                "--config.validationLevel=soft",
            ]
        );
    }

    #[test]
    fn missing_program_is_spawn_error() {
        let config = BuildConfig {
            mjml_command: vec!["mailbench-no-such-mjml-binary".to_string()],
            ..BuildConfig::default()
        };
        let result = CommandCompiler::from_config(&config).compile(Path::new("x.mjml"));
        assert!(matches!(result, Err(CompileError::Spawn { .. })));
    }
}
