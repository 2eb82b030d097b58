//! Dataset Resolver
//!
//! A dataset reference names a JSON file in the data directory. Resolution
//! appends the standard extension when missing, reads and parses the file,
//! and flattens legacy wrapped payloads: older data exports carry the record
//! nested under a single `data` key, mirroring the generation request body
//! they were cut from. Downstream code only ever sees the flat record.
//!
//! A missing file is not an error (`Ok(None)`); the caller logs the data
//! miss and moves on. Only unparseable content fails.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::types::{DocbatchError, Result};

/// Standard extension for dataset files.
pub const DATA_EXTENSION: &str = ".json";

/// Wrapper key used by legacy data exports.
const LEGACY_WRAPPER_KEY: &str = "data";

/// Normalize a dataset reference to a file name: append `.json` unless the
/// reference already ends with it (any case). No directory probing happens
/// here; lookup is an exact path match.
pub fn normalize_reference(reference: &str) -> String {
    let trimmed = reference.trim();
    if strip_data_extension(trimmed).len() < trimmed.len() {
        trimmed.to_string()
    } else {
        format!("{trimmed}{DATA_EXTENSION}")
    }
}

/// Remove a trailing `.json` (any case) from a reference, if present.
pub fn strip_data_extension(name: &str) -> &str {
    let len = name.len();
    if len >= DATA_EXTENSION.len()
        && name.is_char_boundary(len - DATA_EXTENSION.len())
        && name[len - DATA_EXTENSION.len()..].eq_ignore_ascii_case(DATA_EXTENSION)
    {
        &name[..len - DATA_EXTENSION.len()]
    } else {
        name
    }
}

/// Path a reference resolves to inside `data_dir`.
pub fn reference_path(data_dir: &Path, reference: &str) -> PathBuf {
    data_dir.join(normalize_reference(reference))
}

/// Resolve a dataset reference to its flat record.
///
/// Returns `Ok(None)` when the backing file does not exist, and a
/// [`DocbatchError::Parse`] when it exists but is not valid JSON. Any
/// well-formed shape is accepted as-is apart from the legacy unwrap.
pub fn resolve(data_dir: &Path, reference: &str) -> Result<Option<Value>> {
    let path = reference_path(data_dir, reference);
    if !path.is_file() {
        return Ok(None);
    }

    let text = fs::read_to_string(&path)?;
    let parsed: Value = serde_json::from_str(&text).map_err(|e| DocbatchError::Parse {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    debug!(path = %path.display(), "dataset resolved");
    Ok(Some(unwrap_legacy(parsed)))
}

/// Flatten a legacy wrapped payload: an object whose only key is the legacy
/// wrapper, with an object inside, is replaced by that inner object. Already
/// flat records pass through unchanged, so the rule is idempotent.
fn unwrap_legacy(mut value: Value) -> Value {
    let inner = match value.as_object_mut() {
        Some(map) if map.len() == 1 => map
            .get_mut(LEGACY_WRAPPER_KEY)
            .filter(|nested| nested.is_object())
            .map(Value::take),
        _ => None,
    };
    inner.unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn write_dataset(dir: &TempDir, name: &str, content: &str) {
        fs::write(dir.path().join(name), content).unwrap();
    }

    #[test]
    fn test_normalize_appends_extension() {
        assert_eq!(normalize_reference("alpha"), "alpha.json");
        assert_eq!(normalize_reference("  alpha "), "alpha.json");
    }

    #[test]
    fn test_normalize_keeps_existing_extension() {
        assert_eq!(normalize_reference("alpha.json"), "alpha.json");
        assert_eq!(normalize_reference("ALPHA.JSON"), "ALPHA.JSON");
    }

    #[test]
    fn test_strip_extension_is_safe_on_short_names() {
        assert_eq!(strip_data_extension("a"), "a");
        assert_eq!(strip_data_extension(""), "");
        assert_eq!(strip_data_extension("alpha.json"), "alpha");
    }

    #[test]
    fn test_missing_file_resolves_to_none() {
        let dir = TempDir::new().unwrap();
        assert!(resolve(dir.path(), "nothing").unwrap().is_none());
    }

    #[test]
    fn test_wrapped_payload_is_unwrapped() {
        let dir = TempDir::new().unwrap();
        write_dataset(&dir, "alpha.json", r#"{ "data": {"x": 1} }"#);

        let record = resolve(dir.path(), "alpha").unwrap().unwrap();
        assert_eq!(record, json!({"x": 1}));
    }

    #[test]
    fn test_flat_payload_passes_through() {
        let dir = TempDir::new().unwrap();
        write_dataset(&dir, "beta.json", r#"{"x": 1}"#);

        let record = resolve(dir.path(), "beta").unwrap().unwrap();
        assert_eq!(record, json!({"x": 1}));
    }

    #[test]
    fn test_wrapper_with_extra_keys_is_not_unwrapped() {
        let dir = TempDir::new().unwrap();
        write_dataset(&dir, "gamma.json", r#"{"data": {"x": 1}, "other": 2}"#);

        let record = resolve(dir.path(), "gamma").unwrap().unwrap();
        assert_eq!(record, json!({"data": {"x": 1}, "other": 2}));
    }

    #[test]
    fn test_wrapper_around_non_object_is_not_unwrapped() {
        let dir = TempDir::new().unwrap();
        write_dataset(&dir, "delta.json", r#"{"data": [1, 2]}"#);

        let record = resolve(dir.path(), "delta").unwrap().unwrap();
        assert_eq!(record, json!({"data": [1, 2]}));
    }

    #[test]
    fn test_invalid_json_is_a_parse_error() {
        let dir = TempDir::new().unwrap();
        write_dataset(&dir, "bad.json", "{ nope");

        let err = resolve(dir.path(), "bad").unwrap_err();
        assert!(matches!(err, DocbatchError::Parse { .. }));
    }
}
