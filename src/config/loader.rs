//! Configuration Loader (Figment-based)
//!
//! Loads and merges configuration from multiple sources using Figment:
//! 1. Built-in defaults (Serialized)
//! 2. Global config (~/.config/docbatch/config.toml)
//! 3. Project config (.docbatch/config.toml)
//! 4. Environment variables (DOCBATCH_* prefix, `__` as section separator)

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::types::Config;
use crate::types::{DocbatchError, Result};

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with full resolution chain using Figment:
    /// defaults → global → project → env vars
    pub fn load() -> Result<Config> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            debug!("Loading global config from: {}", global_path.display());
            figment = figment.merge(Toml::file(&global_path));
        }

        let project_path = Self::project_config_path();
        if project_path.exists() {
            debug!("Loading project config from: {}", project_path.display());
            figment = figment.merge(Toml::file(&project_path));
        }

        // e.g. DOCBATCH_SERVER__TIMEOUT_SECS -> server.timeout_secs
        figment = figment.merge(Env::prefixed("DOCBATCH_").split("__").lowercase(true));

        let config: Config = figment
            .extract()
            .map_err(|e| DocbatchError::Config(format!("Configuration error: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a specific file only
    pub fn load_from_file(path: &Path) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path))
            .extract()
            .map_err(|e| DocbatchError::Config(format!("Configuration error: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    // =========================================================================
    // Path Management
    // =========================================================================

    /// Get path to global config directory (~/.config/docbatch/)
    pub fn global_dir() -> Option<PathBuf> {
        env::var("XDG_CONFIG_HOME")
            .ok()
            .map(PathBuf::from)
            .or_else(|| {
                env::var("HOME")
                    .ok()
                    .map(|home| PathBuf::from(home).join(".config"))
            })
            .map(|p| p.join("docbatch"))
    }

    /// Get path to global config file
    pub fn global_config_path() -> Option<PathBuf> {
        Self::global_dir().map(|dir| dir.join("config.toml"))
    }

    /// Get path to project config file
    pub fn project_config_path() -> PathBuf {
        PathBuf::from(".docbatch/config.toml")
    }

    /// Get project data directory
    pub fn project_dir() -> PathBuf {
        PathBuf::from(".docbatch")
    }

    // =========================================================================
    // Config Commands
    // =========================================================================

    /// Show config file path
    pub fn show_path() {
        println!("Configuration paths:");
        println!();

        if let Some(global) = Self::global_config_path() {
            let exists = if global.exists() { "✓" } else { "✗" };
            println!("  Global:  {} {}", exists, global.display());
        } else {
            println!("  Global:  (not available)");
        }

        let project = Self::project_config_path();
        let exists = if project.exists() { "✓" } else { "✗" };
        println!("  Project: {} {}", exists, project.display());
    }

    /// Show current effective configuration
    pub fn show_config(as_json: bool) -> Result<()> {
        let config = Self::load()?;

        if as_json {
            println!("{}", serde_json::to_string_pretty(&config)?);
        } else {
            println!(
                "{}",
                toml::to_string_pretty(&config)
                    .map_err(|e| DocbatchError::Config(e.to_string()))?
            );
        }

        Ok(())
    }

    // =========================================================================
    // Initialization
    // =========================================================================

    /// Initialize global configuration
    pub fn init_global(force: bool) -> Result<PathBuf> {
        let global_dir = Self::global_dir().ok_or_else(|| {
            DocbatchError::Config("Cannot determine global config directory".to_string())
        })?;

        fs::create_dir_all(&global_dir)?;

        let config_path = global_dir.join("config.toml");
        if !config_path.exists() || force {
            fs::write(&config_path, Self::default_global_config())?;
            info!("Created global config: {}", config_path.display());
        } else {
            info!("Global config exists: {}", config_path.display());
        }

        Ok(global_dir)
    }

    /// Initialize project configuration and starter inputs under `root`
    pub fn init_project(root: &Path) -> Result<PathBuf> {
        let project_dir = root.join(".docbatch");
        fs::create_dir_all(&project_dir)?;

        let defaults = Config::default();
        fs::create_dir_all(root.join(&defaults.inputs.data_dir))?;
        fs::create_dir_all(root.join(&defaults.output.dir))?;

        let config_path = project_dir.join("config.toml");
        if !config_path.exists() {
            fs::write(&config_path, Self::default_project_config())?;
            info!("Created project config: {}", config_path.display());
        }

        let queue_path = root.join(&defaults.inputs.queue);
        if !queue_path.exists() {
            fs::write(&queue_path, Self::starter_queue())?;
            info!("Created starter queue: {}", queue_path.display());
        }

        Ok(project_dir)
    }

    /// Check if project is initialized
    pub fn is_project_initialized() -> bool {
        Self::project_dir().exists()
    }

    // =========================================================================
    // Internal
    // =========================================================================

    /// Generate default global config content (TOML)
    fn default_global_config() -> String {
        r#"# docbatch Global Configuration
# User-wide defaults. Project settings in .docbatch/config.toml override these.

version = "1.0"

[server]
base_url = "https://localhost"
timeout_secs = 60
insecure_tls = false
"#
        .to_string()
    }

    /// Generate default project config content (TOML)
    fn default_project_config() -> String {
        r#"# docbatch Project Configuration
# Project-specific settings that override global defaults.

version = "1.0"

[server]
base_url = "https://localhost"
timeout_secs = 60
# Accept self-signed certificates. Leave off unless the service requires it.
insecure_tls = false

[inputs]
credentials = "auth.json"
manifest = "templates.json"
queue = "queue.txt"
data_dir = "data"

[output]
dir = "output"
format = "docx"
"#
        .to_string()
    }

    fn starter_queue() -> String {
        r#"# One template id per line. Blank lines and '#' comments are ignored.
# Duplicate ids are processed once per occurrence.
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_from_missing_file_yields_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = ConfigLoader::load_from_file(&temp_dir.path().join("nope.toml")).unwrap();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.server.timeout_secs, 60);
    }

    #[test]
    fn test_load_from_file_overrides_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(
            &path,
            "[server]\nbase_url = \"https://renderer.internal\"\ntimeout_secs = 10\n",
        )
        .unwrap();

        let config = ConfigLoader::load_from_file(&path).unwrap();
        assert_eq!(config.server.base_url, "https://renderer.internal");
        assert_eq!(config.server.timeout_secs, 10);
        // untouched sections keep their defaults
        assert_eq!(config.output.format, "docx");
    }

    #[test]
    fn test_load_from_file_rejects_invalid_values() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[server]\ntimeout_secs = 0\n").unwrap();

        assert!(ConfigLoader::load_from_file(&path).is_err());
    }

    #[test]
    fn test_init_project_scaffolds_layout() {
        let temp_dir = TempDir::new().unwrap();
        ConfigLoader::init_project(temp_dir.path()).unwrap();

        assert!(temp_dir.path().join(".docbatch/config.toml").exists());
        assert!(temp_dir.path().join("data").is_dir());
        assert!(temp_dir.path().join("output").is_dir());
        assert!(temp_dir.path().join("queue.txt").exists());

        // scaffolded config must itself be loadable
        let config =
            ConfigLoader::load_from_file(&temp_dir.path().join(".docbatch/config.toml")).unwrap();
        assert_eq!(config.inputs.manifest, PathBuf::from("templates.json"));
    }
}
