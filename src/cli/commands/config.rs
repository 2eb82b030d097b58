//! Config Command
//!
//! Inspect and initialize configuration files.

use crate::config::ConfigLoader;
use crate::types::{DocbatchError, Result};

pub fn show(format: &str) -> Result<()> {
    match format {
        "json" => ConfigLoader::show_config(true),
        "toml" | "text" => ConfigLoader::show_config(false),
        other => Err(DocbatchError::Config(format!(
            "Unknown format '{other}'. Valid values: text, toml, json"
        ))),
    }
}

pub fn path() -> Result<()> {
    ConfigLoader::show_path();
    Ok(())
}

pub fn init_global(force: bool) -> Result<()> {
    let dir = ConfigLoader::init_global(force)?;
    println!("Global config ready in {}", dir.display());
    Ok(())
}

pub fn init_project() -> Result<()> {
    let root = std::env::current_dir()?;
    let dir = ConfigLoader::init_project(&root)?;
    println!("Project config ready in {}", dir.display());
    Ok(())
}
