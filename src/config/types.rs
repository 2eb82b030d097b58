//! Configuration Types
//!
//! All configuration structures with sensible defaults.
//! Supports global (~/.config/docbatch/) and project (.docbatch/) level
//! configuration. The loaded [`Config`] is immutable for the lifetime of a
//! run and is passed by reference to every component; nothing reads ambient
//! state after startup.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use url::Url;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Configuration version
    pub version: String,

    /// Rendering service settings
    pub server: ServerConfig,

    /// Run input locations
    pub inputs: InputConfig,

    /// Output layout settings
    pub output: OutputConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            server: ServerConfig::default(),
            inputs: InputConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Config {
    /// Validate configuration values are within acceptable ranges.
    /// Returns `DocbatchError::Config` on validation failure.
    pub fn validate(&self) -> crate::types::Result<()> {
        if let Err(e) = Url::parse(&self.server.base_url) {
            return Err(crate::types::DocbatchError::Config(format!(
                "server.base_url is not a valid URL ({}): {}",
                self.server.base_url, e
            )));
        }

        if self.server.timeout_secs == 0 {
            return Err(crate::types::DocbatchError::Config(
                "server.timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.output.format.is_empty()
            || !self.output.format.chars().all(|c| c.is_ascii_alphanumeric())
        {
            return Err(crate::types::DocbatchError::Config(format!(
                "output.format must be a bare extension like 'docx', got '{}'",
                self.output.format
            )));
        }

        Ok(())
    }
}

// =============================================================================
// Server Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Base URL of the rendering service
    pub base_url: String,

    /// Fixed per-request timeout applied uniformly to all network calls
    pub timeout_secs: u64,

    /// Accept invalid TLS certificates. Opt-in only; the client logs a
    /// warning whenever this is set.
    pub insecure_tls: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: "https://localhost".to_string(),
            timeout_secs: 60,
            insecure_tls: false,
        }
    }
}

// =============================================================================
// Input Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Credentials file ({email, password} JSON record)
    pub credentials: PathBuf,

    /// Manifest file (JSON array of template descriptors)
    pub manifest: PathBuf,

    /// Queue file (newline-delimited template ids, '#' comments)
    pub queue: PathBuf,

    /// Directory holding per-dataset JSON files
    pub data_dir: PathBuf,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            credentials: PathBuf::from("auth.json"),
            manifest: PathBuf::from("templates.json"),
            queue: PathBuf::from("queue.txt"),
            data_dir: PathBuf::from("data"),
        }
    }
}

// =============================================================================
// Output Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Root directory for generated documents
    pub dir: PathBuf,

    /// Rendering format tag, doubles as the output file extension
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("output"),
            format: "docx".to_string(),
        }
    }
}
