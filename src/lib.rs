//! docbatch - Batch Document Generation Client
//!
//! Drives a remote document-rendering service through a repeatable,
//! auditable batch run: authenticate once, resolve a queue of template ids
//! against a manifest, submit each (template, dataset) pair, and write the
//! rendered documents into a predictable folder layout with a generated
//! cover sheet per template.
//!
//! ## Core Properties
//!
//! - **Strictly sequential**: requests are issued in queue order, then
//!   per-entry dataset order; nothing runs in parallel
//! - **Partial-failure isolation**: a bad dataset or rejected render skips
//!   that item only; the run always finishes the queue
//! - **Deterministic output**: re-running overwrites the same paths
//!
//! ## Quick Start
//!
//! ```ignore
//! use docbatch::{Config, HttpRenderClient, run};
//!
//! let config = Config::default();
//! let client = HttpRenderClient::new(&config.server)?;
//! let report = run::execute(&config, &client).await?;
//! println!("{} documents written", report.written());
//! ```
//!
//! ## Modules
//!
//! - [`client`]: rendering service trait + HTTP implementation
//! - [`manifest`] / [`queue`] / [`dataset`]: run input resolution
//! - [`cover`]: cover sheet document builder
//! - [`artifacts`]: output naming and persistence
//! - [`run`]: the orchestration pipeline

pub mod artifacts;
pub mod cli;
pub mod client;
pub mod config;
pub mod cover;
pub mod dataset;
pub mod manifest;
pub mod queue;
pub mod run;
pub mod types;

// =============================================================================
// Core Re-exports
// =============================================================================

// Configuration
pub use config::{Config, ConfigLoader, InputConfig, OutputConfig, ServerConfig};

// Error Types
pub use types::error::{DocbatchError, Result};

// Client
pub use client::{Credentials, GenerationRequest, HttpRenderClient, RenderClient, Session};

// Pipeline
pub use manifest::{ManifestEntry, Registry};
pub use run::{CoverOutcome, DatasetOutcome, ItemOutcome, RunReport};
