//! CLI output formatting for all pipeline stages.
//!
//! # Information-First Display
//!
//! The primary display for every entity is its identity (template name and
//! positional index, then the variant); paths and metadata sources are
//! indented context lines underneath.
//!
//! # Output Format
//!
//! ## Build
//!
//! ```text
//! 001 orphan
//!     (no data)
//! 002 welcome
//!     001 default → dist/welcome.default.html
//!         Sidecars: welcome.default.subject.txt
//!     002 vip → dist/welcome.vip.html
//!     Tokens: welcome.tokens.html, welcome.subject.tokens.txt
//!     Warning: Line 3: mj-text has invalid attribute
//!
//! Built 2 emails from 2 templates
//! ```
//!
//! ## Preview
//!
//! ```text
//! 001 welcome
//!     001 default → /previews/welcome.default.html
//!         Subject: Welcome to Acme!
//!         Preheader: Hi there, welcome aboard! [hidden block]
//!     002 vip → /previews/welcome.vip.html
//!         Subject: (none)
//!         Preheader: none [sidecar]
//!
//! ✓ Prepared 2 preview file(s) → public/previews
//!     Overview: public/previews/_overview.html
//! ```
//!
//! ## Send
//!
//! ```text
//! Found 2 HTML file(s). Sending to: a@acme.test, b@acme.test
//! ✓ Sent welcome.default.html  →  <id@mailpit>
//! All emails sent.
//! ```
//!
//! # Architecture
//!
//! Each stage has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure.

use crate::compile::BuildReport;
use crate::mail::{SendPlan, SentEmail};
use crate::metadata::PreheaderSource;
use crate::overview::display_preheader;
use crate::preview::PreviewReport;
use std::collections::HashMap;
use std::path::Path;

const MAILPIT_HINT: &str = "Open Mailpit at http://localhost:8025 to preview.";

// ============================================================================
// Shared entity display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

// ============================================================================
// Build
// ============================================================================

pub fn format_build_output(report: &BuildReport) -> Vec<String> {
    let mut lines = Vec::new();

    for (i, template) in report.templates.iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), template.name));
        if template.artifacts.is_empty() {
            lines.push(format!("{}(no data)", indent(1)));
            continue;
        }
        for (j, artifact) in template.artifacts.iter().enumerate() {
            lines.push(format!(
                "{}{} {} → {}",
                indent(1),
                format_index(j + 1),
                artifact.variant,
                artifact.output.display()
            ));
            if !artifact.sidecars.is_empty() {
                let names: Vec<String> = artifact.sidecars.iter().map(|p| file_name(p)).collect();
                lines.push(format!("{}Sidecars: {}", indent(2), names.join(", ")));
            }
        }
        if !template.tokens.is_empty() {
            let names: Vec<String> = template.tokens.iter().map(|p| file_name(p)).collect();
            lines.push(format!("{}Tokens: {}", indent(1), names.join(", ")));
        }
        for warning in &template.warnings {
            lines.push(format!("{}Warning: {}", indent(1), warning));
        }
    }

    lines.push(String::new());
    lines.push(format!(
        "Built {} from {}",
        plural(report.artifact_count(), "email", "emails"),
        plural(report.templates.len(), "template", "templates")
    ));
    lines
}

pub fn print_build_output(report: &BuildReport) {
    for line in format_build_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Preview
// ============================================================================

pub fn format_preview_output(report: &PreviewReport) -> Vec<String> {
    let sources: HashMap<&str, PreheaderSource> = report
        .manifest
        .items
        .iter()
        .map(|e| e.file.as_str())
        .zip(report.sources.iter().copied())
        .collect();

    let mut lines = Vec::new();
    for (i, (template, entries)) in report.manifest.grouped.iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), template));
        for (j, entry) in entries.iter().enumerate() {
            lines.push(format!(
                "{}{} {} → {}",
                indent(1),
                format_index(j + 1),
                entry.variant,
                entry.url
            ));
            lines.push(format!(
                "{}Subject: {}",
                indent(2),
                entry.subject.as_deref().unwrap_or("(none)")
            ));
            let source = sources
                .get(entry.file.as_str())
                .map(|s| format!(" [{}]", s.label()))
                .unwrap_or_default();
            lines.push(format!(
                "{}Preheader: {}{}",
                indent(2),
                display_preheader(&entry.preheader),
                source
            ));
        }
    }

    if !lines.is_empty() {
        lines.push(String::new());
    }
    lines.push(format!(
        "✓ Prepared {} preview file(s) → {}",
        report.manifest.items.len(),
        report.serving_dir.display()
    ));
    if let Some(overview) = &report.overview {
        lines.push(format!("{}Overview: {}", indent(1), overview.display()));
    }
    lines
}

pub fn print_preview_output(report: &PreviewReport) {
    for line in format_preview_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Send
// ============================================================================

/// Lines printed before delivery. In dry-run mode this is the whole output.
pub fn format_send_plan(plan: &SendPlan, dry_run: bool) -> Vec<String> {
    if plan.emails.is_empty() {
        return vec![format!(
            "No HTML files found to send for pattern(s): {}",
            plan.patterns.join(" ")
        )];
    }

    let mut lines = vec![format!(
        "Found {} HTML file(s). Sending to: {}",
        plan.emails.len(),
        plan.recipients.join(", ")
    )];
    if dry_run {
        for email in &plan.emails {
            lines.push(format!(
                "[dry-run] {}  →  Subject: \"{}\"",
                file_name(&email.path),
                email.subject
            ));
        }
        lines.push("Dry run complete. No emails were sent.".to_string());
    }
    lines
}

pub fn format_sent(sent: &[SentEmail]) -> Vec<String> {
    let mut lines: Vec<String> = sent
        .iter()
        .map(|s| format!("✓ Sent {}  →  {}", file_name(&s.path), s.message_id))
        .collect();
    lines.push("All emails sent.".to_string());
    lines
}

pub fn format_sent_one(sent: &SentEmail) -> Vec<String> {
    vec![
        format!("✓ Sent {}", sent.message_id),
        MAILPIT_HINT.to_string(),
    ]
}

pub fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile::{BuiltArtifact, TemplateBuild};
    use crate::mail::PlannedEmail;
    use crate::types::{ManifestEntry, PreviewManifest};
    use std::path::PathBuf;

    // =========================================================================
    // Helpers
    // =========================================================================

    #[test]
    fn format_index_pads() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(123), "123");
    }

    #[test]
    fn indent_levels() {
        assert_eq!(indent(0), "");
        assert_eq!(indent(2), "        ");
    }

    #[test]
    fn plural_forms() {
        assert_eq!(plural(1, "email", "emails"), "1 email");
        assert_eq!(plural(0, "email", "emails"), "0 emails");
    }

    // =========================================================================
    // Build
    // =========================================================================

    #[test]
    fn build_output_lists_variants_and_skips() {
        let report = BuildReport {
            templates: vec![
                TemplateBuild {
                    name: "orphan".to_string(),
                    warnings: vec![],
                    artifacts: vec![],
                    tokens: vec![],
                },
                TemplateBuild {
                    name: "welcome".to_string(),
                    warnings: vec!["bad attr".to_string()],
                    artifacts: vec![BuiltArtifact {
                        variant: "default".to_string(),
                        output: PathBuf::from("dist/welcome.default.html"),
                        sidecars: vec![PathBuf::from("dist/welcome.default.subject.txt")],
                    }],
                    tokens: vec![PathBuf::from("dist/welcome.tokens.html")],
                },
            ],
        };

        let lines = format_build_output(&report);
        assert_eq!(
            lines,
            vec![
                "001 orphan",
                "    (no data)",
                "002 welcome",
                "    001 default → dist/welcome.default.html",
                "        Sidecars: welcome.default.subject.txt",
                "    Tokens: welcome.tokens.html",
                "    Warning: bad attr",
                "",
                "Built 1 email from 2 templates",
            ]
        );
    }

    // =========================================================================
    // Preview
    // =========================================================================

    fn entry(template: &str, variant: &str, subject: Option<&str>, preheader: &str) -> ManifestEntry {
        let file = format!("{template}.{variant}.html");
        ManifestEntry {
            url: format!("/previews/{file}"),
            file,
            template: template.to_string(),
            variant: variant.to_string(),
            subject: subject.map(String::from),
            preheader: preheader.to_string(),
        }
    }

    #[test]
    fn preview_output_groups_with_sources() {
        let report = PreviewReport {
            manifest: PreviewManifest::new(vec![
                entry("welcome", "default", Some("Welcome!"), "Hi there"),
                entry("welcome", "vip", None, ""),
            ]),
            sources: vec![PreheaderSource::HiddenBlock, PreheaderSource::SidecarFile],
            serving_dir: PathBuf::from("public/previews"),
            copied: 2,
            overview: Some(PathBuf::from("public/previews/_overview.html")),
        };

        let lines = format_preview_output(&report);
        assert_eq!(
            lines,
            vec![
                "001 welcome",
                "    001 default → /previews/welcome.default.html",
                "        Subject: Welcome!",
                "        Preheader: Hi there [hidden block]",
                "    002 vip → /previews/welcome.vip.html",
                "        Subject: (none)",
                "        Preheader: none [sidecar]",
                "",
                "✓ Prepared 2 preview file(s) → public/previews",
                "    Overview: public/previews/_overview.html",
            ]
        );
    }

    #[test]
    fn preview_output_empty() {
        let report = PreviewReport {
            manifest: PreviewManifest::default(),
            sources: vec![],
            serving_dir: PathBuf::from("public/previews"),
            copied: 0,
            overview: None,
        };
        assert_eq!(
            format_preview_output(&report),
            vec!["✓ Prepared 0 preview file(s) → public/previews"]
        );
    }

    // =========================================================================
    // Send
    // =========================================================================

    fn plan(emails: Vec<PlannedEmail>) -> SendPlan {
        SendPlan {
            patterns: vec!["dist/*.html".to_string(), "!dist/*.tokens.html".to_string()],
            recipients: vec!["a@acme.test".to_string(), "b@acme.test".to_string()],
            emails,
        }
    }

    #[test]
    fn send_plan_no_files() {
        assert_eq!(
            format_send_plan(&plan(vec![]), false),
            vec!["No HTML files found to send for pattern(s): dist/*.html !dist/*.tokens.html"]
        );
    }

    #[test]
    fn send_plan_dry_run_lists_subjects() {
        let p = plan(vec![PlannedEmail {
            path: PathBuf::from("dist/welcome.default.html"),
            subject: "[DEV] Welcome".to_string(),
        }]);
        assert_eq!(
            format_send_plan(&p, true),
            vec![
                "Found 1 HTML file(s). Sending to: a@acme.test, b@acme.test",
                "[dry-run] welcome.default.html  →  Subject: \"[DEV] Welcome\"",
                "Dry run complete. No emails were sent.",
            ]
        );
    }

    #[test]
    fn sent_lines() {
        let sent = vec![SentEmail {
            path: PathBuf::from("dist/welcome.default.html"),
            subject: "Welcome".to_string(),
            message_id: "<1@test>".to_string(),
        }];
        assert_eq!(
            format_sent(&sent),
            vec!["✓ Sent welcome.default.html  →  <1@test>", "All emails sent."]
        );
        assert_eq!(format_sent_one(&sent[0])[1], MAILPIT_HINT);
    }
}
