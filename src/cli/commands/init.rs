//! Init Command
//!
//! Scaffold a docbatch project in the current directory.

use crate::cli::Output;
use crate::config::ConfigLoader;
use crate::types::{DocbatchError, Result};

pub fn run(force: bool) -> Result<()> {
    let root = std::env::current_dir()?;

    if root.join(".docbatch").exists() && !force {
        return Err(DocbatchError::Config(
            "Already initialized. Use --force to overwrite.".to_string(),
        ));
    }

    ConfigLoader::init_project(&root)?;

    if let Err(e) = ConfigLoader::init_global(false) {
        tracing::debug!("Global config init skipped: {}", e);
    }

    let out = Output::new();
    out.success("Initialized docbatch in .docbatch/");
    println!();
    println!("Next steps:");
    println!("  1. Put your login in auth.json ({{\"email\": ..., \"password\": ...}})");
    println!("  2. Describe your templates in templates.json");
    println!("  3. List template ids in queue.txt and drop dataset files into data/");
    println!("  4. Run 'docbatch run'");

    Ok(())
}
