//! Run Command
//!
//! The canonical batch pipeline: load config, check inputs, authenticate,
//! walk the queue, and print a summary. Per-item failures show up in the
//! summary and the log; only fatal errors propagate out of here.

use std::path::{Path, PathBuf};

use crate::cli::Output;
use crate::client::HttpRenderClient;
use crate::config::{Config, ConfigLoader};
use crate::run::{self, CoverOutcome, DatasetOutcome, ItemOutcome, RunReport};
use crate::types::Result;

/// Command-line overrides applied on top of the loaded configuration.
#[derive(Debug, Default)]
pub struct RunArgs {
    pub manifest: Option<PathBuf>,
    pub queue: Option<PathBuf>,
    pub data_dir: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub format: Option<String>,
    pub insecure: bool,
}

pub async fn run(config_path: Option<&Path>, args: RunArgs) -> Result<()> {
    let config = load_config(config_path, args)?;

    let out = Output::new();
    out.info(&format!("Rendering service: {}", config.server.base_url));

    let client = HttpRenderClient::new(&config.server)?;
    let report = run::execute(&config, &client).await?;

    print_report(&out, &report);
    Ok(())
}

fn load_config(config_path: Option<&Path>, args: RunArgs) -> Result<Config> {
    let mut config = match config_path {
        Some(path) => ConfigLoader::load_from_file(path)?,
        None => ConfigLoader::load()?,
    };

    if let Some(manifest) = args.manifest {
        config.inputs.manifest = manifest;
    }
    if let Some(queue) = args.queue {
        config.inputs.queue = queue;
    }
    if let Some(data_dir) = args.data_dir {
        config.inputs.data_dir = data_dir;
    }
    if let Some(output) = args.output {
        config.output.dir = output;
    }
    if let Some(format) = args.format {
        config.output.format = format;
    }
    if args.insecure {
        config.server.insecure_tls = true;
    }

    config.validate()?;
    Ok(config)
}

fn print_report(out: &Output, report: &RunReport) {
    for item in &report.items {
        match item {
            ItemOutcome::Skipped { id } => {
                out.warning(&format!("{id}: not in manifest, skipped"));
            }
            ItemOutcome::Processed {
                id,
                case_label,
                cover,
                datasets,
            } => {
                out.section(&format!("{case_label} ({id})"));
                if let CoverOutcome::Failed(reason) = cover {
                    out.warning(&format!("cover sheet failed: {reason}"));
                }
                for dataset in datasets {
                    match dataset {
                        DatasetOutcome::Generated { reference, path } => {
                            out.success(&format!("{reference} → {}", path.display()));
                        }
                        DatasetOutcome::Missing { reference } => {
                            out.warning(&format!("{reference}: data file missing"));
                        }
                        DatasetOutcome::Failed { reference, reason } => {
                            out.error(&format!("{reference}: {reason}"));
                        }
                    }
                }
            }
        }
    }

    out.section("Summary");
    out.stat("attempted", report.attempted());
    out.stat("written", report.written());
    out.stat("missing", report.missing());
    out.stat("failed", report.failed());
    out.stat("skipped", report.skipped());
}
