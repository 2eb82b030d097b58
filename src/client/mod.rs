//! Rendering Service Client Abstraction
//!
//! Defines the [`RenderClient`] trait the orchestrator drives, plus the
//! credential, session, and request types shared by every implementation.
//! The HTTP implementation lives in [`http`]; tests drive the pipeline with
//! stub implementations of the same trait.

mod http;

pub use http::HttpRenderClient;

use std::fs;
use std::path::Path;

use async_trait::async_trait;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::Result;

// =============================================================================
// Credentials
// =============================================================================

/// Login credentials, loaded once from a JSON file.
///
/// The password is never exposed in logs or debug output.
#[derive(Clone, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: SecretString,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl Credentials {
    /// Load credentials from a `{email, password}` JSON record.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}

// =============================================================================
// Session
// =============================================================================

/// Opaque session token obtained once per run and attached to all rendering
/// requests. Created by [`RenderClient::authenticate`], read-only thereafter,
/// discarded at process exit.
#[derive(Debug, Clone)]
pub struct Session {
    cookie: String,
}

impl Session {
    pub fn new(cookie: impl Into<String>) -> Self {
        Self {
            cookie: cookie.into(),
        }
    }

    /// Cookie header value carrying the session.
    pub fn cookie(&self) -> &str {
        &self.cookie
    }
}

// =============================================================================
// Generation Request
// =============================================================================

/// One rendering job: template id, flat dataset record, output format tag.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationRequest {
    /// Template id; a JSON integer when the id parses as one, the raw string
    /// otherwise
    #[serde(rename = "templateId")]
    pub template_id: Value,

    /// Flat dataset record
    pub data: Value,

    /// Output format tag, e.g. "docx"
    pub format: String,
}

impl GenerationRequest {
    pub fn new(template_id: &str, data: Value, format: impl Into<String>) -> Self {
        // the transport expects an integer id; ids that are not numeric are
        // passed through untouched
        let template_id = template_id
            .parse::<i64>()
            .map(Value::from)
            .unwrap_or_else(|_| Value::from(template_id));
        Self {
            template_id,
            data,
            format: format.into(),
        }
    }
}

// =============================================================================
// Render Client Trait
// =============================================================================

/// Client for the remote rendering service.
///
/// One `authenticate` call per run; every job afterwards reuses the session.
/// `submit_job` is the raw transport operation: the payload is posted
/// verbatim, and the success body is returned as opaque bytes.
#[async_trait]
pub trait RenderClient: Send + Sync {
    /// Exchange credentials for a session. Single attempt; failure is fatal
    /// to the whole batch.
    async fn authenticate(&self, credentials: &Credentials) -> Result<Session>;

    /// Post a complete job description and return the rendered document
    /// bytes.
    async fn submit_job(&self, session: &Session, job: &Value) -> Result<Vec<u8>>;

    /// Render one (template, dataset) pair.
    async fn generate(&self, session: &Session, request: &GenerationRequest) -> Result<Vec<u8>> {
        self.submit_job(session, &serde_json::to_value(request)?).await
    }
}
