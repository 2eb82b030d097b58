//! HTTP Render Client
//!
//! Talks to the rendering service over its two endpoints: account login and
//! document generation. The session travels in the cookie channel, exactly
//! as a browser would carry it. Generation responses are always read as raw
//! bytes; the success payload is an opaque document, not text.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{COOKIE, HeaderMap, SET_COOKIE};
use secrecy::ExposeSecret;
use serde_json::Value;
use tracing::{debug, info, warn};
use url::Url;

use super::{Credentials, RenderClient, Session};
use crate::config::ServerConfig;
use crate::types::{DocbatchError, Result};

const LOGIN_PATH: &str = "api/v1/account/login";
const GENERATE_PATH: &str = "api/v2/templates/generatedocument";

/// Upper bound on the diagnostic excerpt taken from failure bodies.
const ERROR_EXCERPT_CHARS: usize = 200;

/// HTTP client for the rendering service.
pub struct HttpRenderClient {
    base_url: Url,
    client: reqwest::Client,
}

impl HttpRenderClient {
    /// Build a client from server settings. TLS validation is strict unless
    /// `insecure_tls` was explicitly set.
    pub fn new(config: &ServerConfig) -> Result<Self> {
        let mut base_url = Url::parse(&config.base_url).map_err(|e| {
            DocbatchError::Config(format!("invalid base URL {}: {}", config.base_url, e))
        })?;
        // joining relative endpoint paths drops the last path segment unless
        // the base ends with a slash
        if !base_url.path().ends_with('/') {
            base_url.set_path(&format!("{}/", base_url.path()));
        }

        let mut builder =
            reqwest::Client::builder().timeout(Duration::from_secs(config.timeout_secs));
        if config.insecure_tls {
            warn!("TLS certificate validation disabled by configuration");
            builder = builder.danger_accept_invalid_certs(true);
        }
        let client = builder.build()?;

        Ok(Self { base_url, client })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| DocbatchError::Config(format!("invalid endpoint {path}: {e}")))
    }
}

#[async_trait]
impl RenderClient for HttpRenderClient {
    async fn authenticate(&self, credentials: &Credentials) -> Result<Session> {
        info!(server = %self.base_url, "authenticating");

        let response = self
            .client
            .post(self.endpoint(LOGIN_PATH)?)
            .json(&serde_json::json!({
                "email": credentials.email,
                "password": credentials.password.expose_secret(),
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DocbatchError::Auth(format!(
                "rejected credentials (HTTP {})",
                status.as_u16()
            )));
        }

        // a 200 without a session cookie is still a failed login
        let session = session_from_headers(response.headers())
            .ok_or_else(|| DocbatchError::Auth("missing session token".to_string()))?;

        debug!("session cookie obtained");
        Ok(Session::new(session))
    }

    async fn submit_job(&self, session: &Session, job: &Value) -> Result<Vec<u8>> {
        let response = self
            .client
            .post(self.endpoint(GENERATE_PATH)?)
            .header(COOKIE, session.cookie())
            .json(job)
            .send()
            .await?;

        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            return Err(DocbatchError::Generation {
                status: status.as_u16(),
                excerpt: body_excerpt(&bytes),
            });
        }

        Ok(bytes.to_vec())
    }
}

/// Assemble the session cookie from the login response: the name=value pair
/// of every `Set-Cookie` header, joined the way a browser would send them
/// back. Returns `None` when the channel is absent.
fn session_from_headers(headers: &HeaderMap) -> Option<String> {
    let pairs: Vec<&str> = headers
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|raw| raw.split(';').next())
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .collect();

    if pairs.is_empty() {
        None
    } else {
        Some(pairs.join("; "))
    }
}

/// First ~200 characters of a failure body, decoded lossily. Diagnostic
/// only; never parsed further.
fn body_excerpt(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes)
        .trim()
        .chars()
        .take(ERROR_EXCERPT_CHARS)
        .collect()
}
