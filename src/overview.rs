//! Static overview page for the serving directory.
//!
//! A no-JavaScript rendition of the preview list: one section per template
//! (sorted by template name), one inbox-style row per variant linking to the
//! copied artifact. Rows follow the same display rules as the preview UI:
//!
//! - missing subject → synthesized `"<template> — <variant>"` label
//! - blank preheader → the literal text `none`

use crate::types::{ManifestEntry, PreviewLabels, PreviewManifest};
use maud::{DOCTYPE, Markup, html};

const CSS: &str = "\
body{font-family:system-ui,sans-serif;margin:2rem auto;max-width:52rem;color:#222}\
h2{font-size:.8rem;letter-spacing:.08em;color:#666;margin-top:2rem}\
a.row{display:block;padding:.6rem .8rem;border-bottom:1px solid #eee;color:inherit;text-decoration:none}\
a.row:hover{background:#f6f6f6}\
.from{font-weight:600}.subject{display:block}.preheader{display:block;color:#777;font-size:.9rem}";

/// Render the overview document.
pub fn render_overview(manifest: &PreviewManifest, labels: &PreviewLabels) -> Markup {
    let mut groups: Vec<(&str, &[ManifestEntry])> = manifest.grouped.iter().collect();
    groups.sort_by(|a, b| a.0.cmp(b.0));

    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { "Email previews" }
                style { (CSS) }
            }
            body {
                h1 { "Email previews" }
                p.to { "To: " (labels.to) }
                @if groups.is_empty() {
                    p { "No compiled emails found." }
                }
                @for (template, entries) in &groups {
                    section {
                        h2 { (group_heading(template)) }
                        @for entry in entries.iter() {
                            (render_row(entry, labels))
                        }
                    }
                }
            }
        }
    }
}

fn render_row(entry: &ManifestEntry, labels: &PreviewLabels) -> Markup {
    html! {
        a.row href=(entry.url) {
            span.from { (labels.from) }
            span.subject { (display_subject(entry)) }
            span.preheader { "Preheader: " (display_preheader(&entry.preheader)) }
        }
    }
}

/// `order_receipt` → `ORDER RECEIPT`.
pub fn group_heading(template: &str) -> String {
    template
        .split(['-', '_'])
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

pub fn display_subject(entry: &ManifestEntry) -> String {
    match &entry.subject {
        Some(subject) => subject.clone(),
        None => format!("{} — {}", entry.template, entry.variant),
    }
}

pub fn display_preheader(preheader: &str) -> &str {
    let trimmed = preheader.trim();
    if trimmed.is_empty() { "none" } else { trimmed }
}
