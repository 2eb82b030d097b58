//! Flat-Folder Job Mode
//!
//! The secondary entry mode: no manifest, no queue. Every `*.json` file in
//! an input folder is a complete job description (template id, data record,
//! and its own format field) and is posted verbatim to the renderer. The
//! rendered document lands next to the job's name in the output folder.
//!
//! Containment matches the canonical pipeline: a bad or rejected job is
//! logged and skipped, and the sweep continues.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{error, info, warn};

use crate::artifacts;
use crate::client::{Credentials, RenderClient, Session};
use crate::dataset::{DATA_EXTENSION, strip_data_extension};
use crate::types::{DocbatchError, Result};

const DEFAULT_FORMAT: &str = "docx";

/// Aggregated result of one flat-folder sweep.
#[derive(Debug)]
pub struct JobsReport {
    pub jobs: Vec<JobOutcome>,
}

impl JobsReport {
    pub fn written(&self) -> usize {
        self.jobs
            .iter()
            .filter(|job| matches!(job, JobOutcome::Written { .. }))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.jobs.len() - self.written()
    }
}

/// Outcome for one job file.
#[derive(Debug)]
pub enum JobOutcome {
    Written { name: String, path: PathBuf },
    Failed { name: String, reason: String },
}

/// Submit every job file in `input_dir` and write the results to
/// `output_dir`. Fatal errors are limited to a missing input folder, an
/// unreadable credentials file, and a failed login.
pub async fn execute(
    credentials_path: &Path,
    input_dir: &Path,
    output_dir: &Path,
    client: &dyn RenderClient,
) -> Result<JobsReport> {
    if !input_dir.is_dir() {
        return Err(DocbatchError::Precondition(format!(
            "job folder not found: {}",
            input_dir.display()
        )));
    }
    if !credentials_path.is_file() {
        return Err(DocbatchError::Precondition(format!(
            "credentials file not found: {}",
            credentials_path.display()
        )));
    }

    let credentials = Credentials::load(credentials_path)?;
    let session = client.authenticate(&credentials).await?;

    let files = job_files(input_dir)?;
    info!(count = files.len(), folder = %input_dir.display(), "job files found");

    let mut jobs = Vec::with_capacity(files.len());
    for path in &files {
        jobs.push(submit_one(client, &session, path, output_dir).await);
    }

    Ok(JobsReport { jobs })
}

/// `*.json` files in the folder, sorted by name for a stable order.
fn job_files(input_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(input_dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| name.to_lowercase().ends_with(DATA_EXTENSION))
        })
        .collect();
    files.sort();
    Ok(files)
}

async fn submit_one(
    client: &dyn RenderClient,
    session: &Session,
    path: &Path,
    output_dir: &Path,
) -> JobOutcome {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("job")
        .to_string();

    let payload: Value = match fs::read_to_string(path)
        .map_err(DocbatchError::from)
        .and_then(|text| {
            serde_json::from_str(&text).map_err(|e| DocbatchError::Parse {
                path: path.display().to_string(),
                message: e.to_string(),
            })
        }) {
        Ok(payload) => payload,
        Err(e) => {
            error!(job = %name, error = %e, "job file unreadable");
            return JobOutcome::Failed {
                name,
                reason: e.to_string(),
            };
        }
    };

    // each job may carry its own format; fall back to the default
    let format = payload
        .get("format")
        .and_then(Value::as_str)
        .unwrap_or(DEFAULT_FORMAT)
        .to_string();

    match client.submit_job(session, &payload).await {
        Ok(bytes) => {
            let out_path =
                output_dir.join(format!("{}.{}", strip_data_extension(&name), format));
            match artifacts::write(&out_path, &bytes) {
                Ok(()) => {
                    info!(path = %out_path.display(), "document written");
                    JobOutcome::Written {
                        name,
                        path: out_path,
                    }
                }
                Err(e) => {
                    error!(path = %out_path.display(), error = %e, "write failed");
                    JobOutcome::Failed {
                        name,
                        reason: format!("write failed: {e}"),
                    }
                }
            }
        }
        Err(e) => {
            warn!(job = %name, error = %e, "job rejected");
            JobOutcome::Failed {
                name,
                reason: e.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;
    use tempfile::TempDir;

    #[derive(Default)]
    struct StubClient {
        jobs: Mutex<Vec<Value>>,
    }

    #[async_trait]
    impl RenderClient for StubClient {
        async fn authenticate(&self, _credentials: &Credentials) -> Result<Session> {
            Ok(Session::new("sid=test"))
        }

        async fn submit_job(&self, _session: &Session, job: &Value) -> Result<Vec<u8>> {
            self.jobs.lock().unwrap().push(job.clone());
            Ok(b"PK bytes".to_vec())
        }
    }

    fn workspace() -> (TempDir, PathBuf, PathBuf, PathBuf) {
        let dir = TempDir::new().unwrap();
        let auth = dir.path().join("auth.json");
        fs::write(&auth, r#"{"email": "a@b.c", "password": "pw"}"#).unwrap();
        let input = dir.path().join("scenarios");
        fs::create_dir(&input).unwrap();
        let output = dir.path().join("out");
        (dir, auth, input, output)
    }

    #[tokio::test]
    async fn test_jobs_are_posted_verbatim_with_their_own_format() {
        let (_dir, auth, input, output) = workspace();
        fs::write(
            input.join("scenario_1.json"),
            r#"{"templateId": 12, "data": {"k": "v"}, "format": "pdf"}"#,
        )
        .unwrap();

        let client = StubClient::default();
        let report = execute(&auth, &input, &output, &client).await.unwrap();

        assert_eq!(report.written(), 1);
        assert!(output.join("scenario_1.pdf").is_file());
        assert_eq!(
            client.jobs.lock().unwrap()[0],
            json!({"templateId": 12, "data": {"k": "v"}, "format": "pdf"})
        );
    }

    #[tokio::test]
    async fn test_job_without_format_falls_back_to_docx() {
        let (_dir, auth, input, output) = workspace();
        fs::write(input.join("plain.json"), r#"{"templateId": 1, "data": {}}"#).unwrap();

        let client = StubClient::default();
        let report = execute(&auth, &input, &output, &client).await.unwrap();

        assert_eq!(report.written(), 1);
        assert!(output.join("plain.docx").is_file());
    }

    #[tokio::test]
    async fn test_bad_job_file_is_contained() {
        let (_dir, auth, input, output) = workspace();
        fs::write(input.join("bad.json"), "{ nope").unwrap();
        fs::write(input.join("good.json"), r#"{"templateId": 2, "data": {}}"#).unwrap();

        let client = StubClient::default();
        let report = execute(&auth, &input, &output, &client).await.unwrap();

        assert_eq!(report.failed(), 1);
        assert_eq!(report.written(), 1);
    }

    #[tokio::test]
    async fn test_non_json_files_are_ignored() {
        let (_dir, auth, input, output) = workspace();
        fs::write(input.join("readme.txt"), "not a job").unwrap();

        let client = StubClient::default();
        let report = execute(&auth, &input, &output, &client).await.unwrap();
        assert!(report.jobs.is_empty());
    }

    #[tokio::test]
    async fn test_missing_input_folder_is_fatal() {
        let (dir, auth, _input, output) = workspace();
        let client = StubClient::default();
        let err = execute(&auth, &dir.path().join("nope"), &output, &client)
            .await
            .unwrap_err();
        assert!(matches!(err, DocbatchError::Precondition(_)));
    }
}
