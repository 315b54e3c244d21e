//! Types serialized into the serving directory for the preview UI.
//!
//! `manifest.json` has the shape
//! `{ "items": [ManifestEntry], "grouped": { "<template>": [ManifestEntry] } }`.
//! `grouped` is a pure re-index of `items`: keys appear in first-seen order
//! and entries keep discovery order within each group.

use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One compiled artifact plus its derived inbox metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// File name relative to the compiled-output root.
    pub file: String,
    /// Root-relative URL under the serving directory.
    pub url: String,
    pub template: String,
    pub variant: String,
    /// `null` when no subject sidecar exists.
    pub subject: Option<String>,
    /// Always present, possibly empty.
    pub preheader: String,
}

/// Entries grouped by template, preserving first-seen key order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateGroups {
    groups: Vec<(String, Vec<ManifestEntry>)>,
}

impl TemplateGroups {
    /// Build the index by walking entries in order and appending each to its
    /// template's group, creating the group on first sight.
    pub fn from_entries(entries: &[ManifestEntry]) -> Self {
        let mut positions: HashMap<&str, usize> = HashMap::new();
        let mut groups: Vec<(String, Vec<ManifestEntry>)> = Vec::new();
        for entry in entries {
            let idx = *positions.entry(entry.template.as_str()).or_insert_with(|| {
                groups.push((entry.template.clone(), Vec::new()));
                groups.len() - 1
            });
            groups[idx].1.push(entry.clone());
        }
        Self { groups }
    }

    /// Template keys in first-seen order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|(k, _)| k.as_str())
    }

    pub fn get(&self, template: &str) -> Option<&[ManifestEntry]> {
        self.groups
            .iter()
            .find(|(k, _)| k == template)
            .map(|(_, v)| v.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[ManifestEntry])> {
        self.groups.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

impl Serialize for TemplateGroups {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.groups.len()))?;
        for (template, entries) in &self.groups {
            map.serialize_entry(template, entries)?;
        }
        map.end()
    }
}

/// The full preview manifest. Rebuilt from scratch on every run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PreviewManifest {
    pub items: Vec<ManifestEntry>,
    pub grouped: TemplateGroups,
}

impl PreviewManifest {
    pub fn new(items: Vec<ManifestEntry>) -> Self {
        let grouped = TemplateGroups::from_entries(&items);
        Self { items, grouped }
    }
}

/// Display labels the preview UI reads from `config.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewLabels {
    pub from: String,
    pub to: String,
}
