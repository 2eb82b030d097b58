//! Manifest Registry
//!
//! The manifest is the authoritative registry mapping template id → case
//! label and applicable dataset references. It is loaded once at startup
//! from a JSON array and is read-only for the rest of the run.
//!
//! Ids are compared as strings regardless of their source representation:
//! `5` and `"5"` address the same entry. When the source collection carries
//! the same id twice, the later entry wins and a warning is logged.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::{debug, warn};

use crate::types::{DocbatchError, Result};

/// One template descriptor from the manifest.
#[derive(Debug, Clone, Deserialize)]
pub struct ManifestEntry {
    /// Template id, normalized to a trimmed string key
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,

    /// Human-readable case label, used for output folder naming
    #[serde(rename = "case")]
    pub case_label: String,

    /// Ordered dataset references to render against this template
    #[serde(default)]
    pub datasets: Vec<String>,
}

/// Id → entry index over the manifest collection.
#[derive(Debug, Default)]
pub struct Registry {
    entries: Vec<ManifestEntry>,
    index: HashMap<String, usize>,
}

impl Registry {
    /// Load the manifest file and build the lookup index.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let entries: Vec<ManifestEntry> =
            serde_json::from_str(&text).map_err(|e| DocbatchError::Parse {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        debug!(count = entries.len(), "manifest loaded");
        Ok(Self::from_entries(entries))
    }

    /// Build a registry from an already-parsed collection.
    pub fn from_entries(entries: Vec<ManifestEntry>) -> Self {
        let mut index = HashMap::with_capacity(entries.len());
        for (position, entry) in entries.iter().enumerate() {
            if let Some(previous) = index.insert(entry.id.clone(), position) {
                // last-write-wins, same as the source collection order
                warn!(
                    id = %entry.id,
                    replaced = previous,
                    "duplicate template id in manifest, later entry wins"
                );
            }
        }
        Self { entries, index }
    }

    /// Look up an entry by id. The key is trimmed before comparison so queue
    /// lines and numeric manifest ids address the same entry.
    pub fn lookup(&self, id: &str) -> Option<&ManifestEntry> {
        self.index
            .get(id.trim())
            .map(|&position| &self.entries[position])
    }

    /// Number of distinct template ids.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

fn deserialize_id<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::String(s) => Ok(s.trim().to_string()),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "template id must be a string or number, got {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_manifest(dir: &TempDir, content: &str) -> std::path::PathBuf {
        let path = dir.path().join("templates.json");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_normalizes_numeric_and_string_ids() {
        let dir = TempDir::new().unwrap();
        let path = write_manifest(
            &dir,
            r#"[
                {"id": 5, "case": "Motion", "datasets": ["alpha"]},
                {"id": " 7 ", "case": "Appeal", "datasets": []}
            ]"#,
        );

        let registry = Registry::load(&path).unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.lookup("5").unwrap().case_label, "Motion");
        assert_eq!(registry.lookup("7").unwrap().case_label, "Appeal");
        assert_eq!(registry.lookup(" 5 ").unwrap().id, "5");
    }

    #[test]
    fn test_lookup_miss_returns_none() {
        let registry = Registry::from_entries(vec![]);
        assert!(registry.lookup("42").is_none());
    }

    #[test]
    fn test_duplicate_ids_last_write_wins() {
        let dir = TempDir::new().unwrap();
        let path = write_manifest(
            &dir,
            r#"[
                {"id": "5", "case": "First", "datasets": ["a"]},
                {"id": 5, "case": "Second", "datasets": ["b"]}
            ]"#,
        );

        let registry = Registry::load(&path).unwrap();
        assert_eq!(registry.len(), 1);
        let entry = registry.lookup("5").unwrap();
        assert_eq!(entry.case_label, "Second");
        assert_eq!(entry.datasets, vec!["b".to_string()]);
    }

    #[test]
    fn test_missing_datasets_field_defaults_to_empty() {
        let dir = TempDir::new().unwrap();
        let path = write_manifest(&dir, r#"[{"id": "9", "case": "Order"}]"#);

        let registry = Registry::load(&path).unwrap();
        assert!(registry.lookup("9").unwrap().datasets.is_empty());
    }

    #[test]
    fn test_malformed_manifest_is_a_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = write_manifest(&dir, "not json");

        let err = Registry::load(&path).unwrap_err();
        assert!(matches!(err, DocbatchError::Parse { .. }));
    }
}
