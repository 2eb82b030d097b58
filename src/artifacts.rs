//! Output Organizer
//!
//! Computes safe, collision-free folder and file names per template/dataset
//! pair and persists bytes to disk. Paths are deterministic, so re-running a
//! batch overwrites prior files in place.

use std::fs;
use std::path::{Path, PathBuf};

use crate::dataset::strip_data_extension;
use crate::manifest::ManifestEntry;
use crate::types::Result;

/// Fixed name of the per-template cover file.
pub const COVER_FILE_NAME: &str = "_cover.docx";

/// Characters invalid in common file-system path segments.
const FORBIDDEN: &[char] = &['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

/// Strip path-unsafe characters and surrounding whitespace from a label.
/// No substitution character is inserted.
pub fn sanitize(name: &str) -> String {
    name.chars()
        .filter(|c| !FORBIDDEN.contains(c))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Output folder for a template: `<sanitized case label> - <id>`.
pub fn folder_for(output_dir: &Path, entry: &ManifestEntry) -> PathBuf {
    output_dir.join(format!(
        "{} - {}",
        sanitize(&entry.case_label),
        sanitize(&entry.id)
    ))
}

/// Document file name for a dataset reference: sanitized stem plus the
/// rendering format's extension.
pub fn document_name(reference: &str, format: &str) -> String {
    format!("{}.{}", sanitize(strip_data_extension(reference.trim())), format)
}

/// Write bytes, creating parent directories as needed and overwriting any
/// existing file at the path.
pub fn write(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, bytes)?;
    Ok(())
}

/// Create a directory tree. No error if it already exists.
pub fn ensure_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path)?;
    Ok(())
}
