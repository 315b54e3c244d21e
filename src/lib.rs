//! # Mailbench
//!
//! A build pipeline for MJML email templates. Templates are compiled once,
//! rendered against per-variant JSON data, indexed into a browsable preview
//! manifest, and optionally sent to a local SMTP catcher such as Mailpit.
//!
//! # Architecture: Three-Stage Pipeline
//!
//! ```text
//! 1. Build     src/templates/ + data/  →  dist/              (MJML + Handlebars)
//! 2. Preview   dist/                   →  public/previews/   (manifest.json + copies)
//! 3. Send      dist/*.html             →  SMTP               (one message per file)
//! ```
//!
//! Each stage reads only the previous stage's files, so any stage can be
//! rerun on its own. `dist/` is the contract between them: flat
//! `<template>.<variant>.html` files with optional `.subject.txt` and
//! `.preheader.txt` sidecars, plus token artifacts that later stages ignore.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`compile`] | Stage 1: MJML compilation behind a trait, Handlebars rendering per data variant |
//! | [`preview`] | Stage 2: manifest assembly, serving-directory reset and copy |
//! | [`mail`] | Stage 3: file selection, subject fallback, SMTP delivery behind a trait |
//! | [`metadata`] | Subject resolver and the ordered preheader strategy chain |
//! | [`html`] | Narrow regex heuristics over email markup |
//! | [`scan`] | Discovery of compiled artifacts |
//! | [`naming`] | `<template>.<variant>.html` convention, token marker, sidecar paths |
//! | [`types`] | Serialized manifest types |
//! | [`overview`] | Static HTML overview of the manifest, rendered with Maud |
//! | [`config`] | `mailbench.toml` loading, merging, and validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Heuristics, Not a Parser
//!
//! Preheader extraction works on markup this pipeline produced itself through
//! a known compiler. A handful of bounded regexes over that markup is enough;
//! a full HTML parser would add weight without changing results for these
//! documents. The heuristics live in [`html`] and nowhere else.
//!
//! ## Explicit Fallback Chains
//!
//! Preheader resolution is a list of [`metadata::PreheaderSource`] stages
//! tried in order, each returning `Option<String>`. Every stage can be tested
//! alone, and the preview output reports which one answered.
//!
//! ## Rebuild, Don't Patch
//!
//! The preview manifest is derived from scratch on every run and the serving
//! directory is replaced wholesale. Ordering is fixed by file name, so
//! unchanged inputs give byte-identical output.

pub mod compile;
pub mod config;
pub mod html;
pub mod mail;
pub mod metadata;
pub mod naming;
pub mod output;
pub mod overview;
pub mod preview;
pub mod scan;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
