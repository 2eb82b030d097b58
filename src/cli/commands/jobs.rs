//! Jobs Command
//!
//! Flat-folder mode: every `*.json` file in the input folder is posted as a
//! complete generation job. No manifest or queue involved.

use std::path::{Path, PathBuf};

use crate::cli::Output;
use crate::client::HttpRenderClient;
use crate::config::ConfigLoader;
use crate::run::jobs::{self, JobOutcome};
use crate::types::Result;

pub async fn run(
    config_path: Option<&Path>,
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    insecure: bool,
) -> Result<()> {
    let mut config = match config_path {
        Some(path) => ConfigLoader::load_from_file(path)?,
        None => ConfigLoader::load()?,
    };
    if insecure {
        config.server.insecure_tls = true;
    }
    config.validate()?;

    let input_dir = input.unwrap_or_else(|| PathBuf::from("scenarios"));
    let output_dir = output.unwrap_or_else(|| config.output.dir.clone());

    let out = Output::new();
    out.info(&format!(
        "Submitting jobs from {} to {}",
        input_dir.display(),
        config.server.base_url
    ));

    let client = HttpRenderClient::new(&config.server)?;
    let report = jobs::execute(&config.inputs.credentials, &input_dir, &output_dir, &client).await?;

    for job in &report.jobs {
        match job {
            JobOutcome::Written { name, path } => {
                out.success(&format!("{name} → {}", path.display()));
            }
            JobOutcome::Failed { name, reason } => {
                out.error(&format!("{name}: {reason}"));
            }
        }
    }

    out.section("Summary");
    out.stat("submitted", report.jobs.len());
    out.stat("written", report.written());
    out.stat("failed", report.failed());
    Ok(())
}
