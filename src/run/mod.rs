//! Run Orchestration Pipeline
//!
//! Composes the whole batch: precondition checks → session acquisition →
//! queue iteration. Work proceeds strictly sequentially; every network call
//! and file write is awaited in queue order, then per-entry dataset order.
//!
//! Failure containment is the heart of this module. Only precondition and
//! authentication errors escape [`execute`]; everything that goes wrong for
//! an individual queue item or dataset is folded into the nested outcome
//! values of the [`RunReport`], and the run always reaches the end of the
//! queue.

pub mod jobs;

use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::{error, info, warn};

use crate::artifacts;
use crate::client::{Credentials, GenerationRequest, RenderClient, Session};
use crate::config::Config;
use crate::cover;
use crate::dataset;
use crate::manifest::{ManifestEntry, Registry};
use crate::queue;
use crate::types::{DocbatchError, Result};

pub use jobs::{JobOutcome, JobsReport};

// =============================================================================
// Outcomes
// =============================================================================

/// Aggregated result of one batch run.
#[derive(Debug)]
pub struct RunReport {
    pub items: Vec<ItemOutcome>,
}

impl RunReport {
    /// Queue ids that had no manifest entry.
    pub fn skipped(&self) -> usize {
        self.items
            .iter()
            .filter(|item| matches!(item, ItemOutcome::Skipped { .. }))
            .count()
    }

    /// Datasets whose backing file was absent.
    pub fn missing(&self) -> usize {
        self.dataset_outcomes()
            .filter(|outcome| matches!(outcome, DatasetOutcome::Missing { .. }))
            .count()
    }

    /// Datasets for which a generation attempt failed, including local parse
    /// and write failures.
    pub fn failed(&self) -> usize {
        self.dataset_outcomes()
            .filter(|outcome| matches!(outcome, DatasetOutcome::Failed { .. }))
            .count()
    }

    /// Documents written to disk.
    pub fn written(&self) -> usize {
        self.dataset_outcomes()
            .filter(|outcome| matches!(outcome, DatasetOutcome::Generated { .. }))
            .count()
    }

    /// Datasets the run tried to process at all.
    pub fn attempted(&self) -> usize {
        self.dataset_outcomes().count()
    }

    fn dataset_outcomes(&self) -> impl Iterator<Item = &DatasetOutcome> {
        self.items
            .iter()
            .filter_map(|item| match item {
                ItemOutcome::Skipped { .. } => None,
                ItemOutcome::Processed { datasets, .. } => Some(datasets.iter()),
            })
            .flatten()
    }
}

/// Outcome for one queue id.
#[derive(Debug)]
pub enum ItemOutcome {
    /// Queue id absent from the manifest; nothing was created for it.
    Skipped { id: String },
    /// Entry was processed; per-dataset outcomes inside.
    Processed {
        id: String,
        case_label: String,
        cover: CoverOutcome,
        datasets: Vec<DatasetOutcome>,
    },
}

/// Outcome of the cover sheet attempt. A cover failure never blocks the
/// entry's datasets.
#[derive(Debug)]
pub enum CoverOutcome {
    Written(PathBuf),
    Failed(String),
}

/// Outcome for one dataset reference.
#[derive(Debug)]
pub enum DatasetOutcome {
    /// Backing file absent; the generation endpoint was never called.
    Missing { reference: String },
    /// Document rendered and written.
    Generated { reference: String, path: PathBuf },
    /// Parse, generation, or write failure. `reason` carries the diagnostic.
    Failed { reference: String, reason: String },
}

// =============================================================================
// Pipeline
// =============================================================================

/// Execute the full batch run.
///
/// Returns `Err` only for fatal conditions: a missing input, an unreadable
/// credential/manifest/queue file, or a failed login. Per-item failures are
/// reported through the [`RunReport`].
pub async fn execute(config: &Config, client: &dyn RenderClient) -> Result<RunReport> {
    check_preconditions(config)?;

    let credentials = Credentials::load(&config.inputs.credentials)?;
    let registry = Registry::load(&config.inputs.manifest)?;
    let queue = queue::load_queue(&config.inputs.queue)?;
    info!(
        templates = registry.len(),
        queued = queue.len(),
        "inputs loaded"
    );

    let session = client.authenticate(&credentials).await?;

    let mut items = Vec::with_capacity(queue.len());
    for id in &queue {
        match registry.lookup(id) {
            None => {
                warn!(id = %id, "queue id not found in manifest, skipping");
                items.push(ItemOutcome::Skipped { id: id.clone() });
            }
            Some(entry) => {
                info!(id = %entry.id, case = %entry.case_label, "processing template");
                items.push(process_entry(config, client, &session, entry).await);
            }
        }
    }

    Ok(RunReport { items })
}

fn check_preconditions(config: &Config) -> Result<()> {
    let files = [
        ("credentials file", config.inputs.credentials.as_path()),
        ("manifest file", config.inputs.manifest.as_path()),
        ("queue file", config.inputs.queue.as_path()),
    ];
    for (label, path) in files {
        if !path.is_file() {
            return Err(DocbatchError::Precondition(format!(
                "{label} not found: {}",
                path.display()
            )));
        }
    }
    if !config.inputs.data_dir.is_dir() {
        return Err(DocbatchError::Precondition(format!(
            "data directory not found: {}",
            config.inputs.data_dir.display()
        )));
    }
    Ok(())
}

async fn process_entry(
    config: &Config,
    client: &dyn RenderClient,
    session: &Session,
    entry: &ManifestEntry,
) -> ItemOutcome {
    let folder = artifacts::folder_for(&config.output.dir, entry);
    if let Err(e) = artifacts::ensure_dir(&folder) {
        // per-file writes recreate parents, so this is not terminal
        warn!(folder = %folder.display(), error = %e, "could not create output folder");
    }

    let cover = write_cover(entry, &folder);

    let mut datasets = Vec::with_capacity(entry.datasets.len());
    for reference in &entry.datasets {
        datasets.push(process_dataset(config, client, session, entry, &folder, reference).await);
    }

    ItemOutcome::Processed {
        id: entry.id.clone(),
        case_label: entry.case_label.clone(),
        cover,
        datasets,
    }
}

/// Build and persist the cover sheet. The timestamp is captured here, at
/// build time.
fn write_cover(entry: &ManifestEntry, folder: &Path) -> CoverOutcome {
    let path = folder.join(artifacts::COVER_FILE_NAME);
    let result = cover::build_cover(entry, Local::now())
        .and_then(|bytes| artifacts::write(&path, &bytes));

    match result {
        Ok(()) => {
            info!(path = %path.display(), "cover sheet written");
            CoverOutcome::Written(path)
        }
        Err(e) => {
            warn!(id = %entry.id, error = %e, "cover sheet failed, continuing with datasets");
            CoverOutcome::Failed(e.to_string())
        }
    }
}

async fn process_dataset(
    config: &Config,
    client: &dyn RenderClient,
    session: &Session,
    entry: &ManifestEntry,
    folder: &Path,
    reference: &str,
) -> DatasetOutcome {
    let record = match dataset::resolve(&config.inputs.data_dir, reference) {
        Ok(Some(record)) => record,
        Ok(None) => {
            warn!(id = %entry.id, dataset = %reference, "dataset file missing, skipping");
            return DatasetOutcome::Missing {
                reference: reference.to_string(),
            };
        }
        Err(e) => {
            error!(id = %entry.id, dataset = %reference, error = %e, "dataset unreadable");
            return DatasetOutcome::Failed {
                reference: reference.to_string(),
                reason: e.to_string(),
            };
        }
    };

    let request = GenerationRequest::new(&entry.id, record, config.output.format.clone());
    let bytes = match client.generate(session, &request).await {
        Ok(bytes) => bytes,
        Err(e) => {
            error!(id = %entry.id, dataset = %reference, error = %e, "generation failed");
            return DatasetOutcome::Failed {
                reference: reference.to_string(),
                reason: e.to_string(),
            };
        }
    };

    let path = folder.join(artifacts::document_name(reference, &config.output.format));
    match artifacts::write(&path, &bytes) {
        Ok(()) => {
            info!(path = %path.display(), "document written");
            DatasetOutcome::Generated {
                reference: reference.to_string(),
                path,
            }
        }
        Err(e) => {
            error!(path = %path.display(), error = %e, "write failed");
            DatasetOutcome::Failed {
                reference: reference.to_string(),
                reason: format!("write failed: {e}"),
            }
        }
    }
}
