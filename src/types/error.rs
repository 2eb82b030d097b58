//! Unified Error Type System
//!
//! Centralized error types for the entire application.
//!
//! ## Error Classes
//!
//! - **Fatal**: missing inputs, bad configuration, rejected credentials.
//!   These abort the run before or during session acquisition.
//! - **Recoverable**: parse failures and rendering failures for a single
//!   dataset. The orchestrator contains these at the iteration that produced
//!   them; they never terminate a run.
//!
//! The split is structural: only precondition checks and authentication can
//! surface an error from [`crate::run::execute`]. Everything downstream is
//! folded into per-item outcome values.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocbatchError {
    // -------------------------------------------------------------------------
    // System Errors (auto From impl)
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    // -------------------------------------------------------------------------
    // Domain Errors
    // -------------------------------------------------------------------------
    /// A required input file or directory is absent. Raised before any
    /// network activity.
    #[error("Missing required input: {0}")]
    Precondition(String),

    /// Credentials were rejected, or the login response carried no session
    /// cookie. Always fatal; there is exactly one attempt per run.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// The rendering service answered with a non-success status. Carries the
    /// first ~200 characters of the response body for operator diagnosis.
    #[error("Generation failed (HTTP {status}): {excerpt}")]
    Generation { status: u16, excerpt: String },

    /// A dataset file exists but its content is not valid structured data.
    #[error("Parse error in {path}: {message}")]
    Parse { path: String, message: String },

    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, DocbatchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_error_display_carries_status_and_excerpt() {
        let err = DocbatchError::Generation {
            status: 500,
            excerpt: "Template error: missing field X".to_string(),
        };
        let rendered = err.to_string();
        assert!(rendered.contains("500"));
        assert!(rendered.contains("Template error: missing field X"));
    }

    #[test]
    fn test_parse_error_display_names_the_file() {
        let err = DocbatchError::Parse {
            path: "data/alpha.json".to_string(),
            message: "expected value at line 1".to_string(),
        };
        assert!(err.to_string().contains("data/alpha.json"));
    }
}
