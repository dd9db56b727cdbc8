//! Inventory service client.
//!
//! Submits the codeowners payload for a namespace with a single POST.

use http::StatusCode;
use owners_inventory_core::CodeOwnersPayload;
use reqwest::Url;
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

/// Default inventory service base URL.
pub const DEFAULT_API_URL: &str = "https://api.endorlabs.com";

/// Server-side timeout requested for every submission, in seconds.
pub const REQUEST_TIMEOUT_SECS: &str = "60";

/// Client-side limit for one submission; longer than the server-side one.
const CLIENT_TIMEOUT: Duration = Duration::from_secs(90);

/// Errors that can occur while submitting a payload.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The endpoint URL could not be built.
    #[error("invalid inventory endpoint: {0}")]
    InvalidUrl(String),

    /// The request could not be sent or the response could not be read.
    #[error("request to inventory service failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("inventory service returned {status}: {body}")]
    Status { status: StatusCode, body: String },
}

/// A successful submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    /// Response status.
    pub status: StatusCode,
    /// Response body, as text.
    pub body: String,
}

/// Returns the codeowners endpoint for a namespace.
///
/// The namespace is percent-encoded as a single path segment. Any path on
/// `api_url` is kept as a prefix.
pub fn codeowners_url(api_url: &str, namespace: &str) -> Result<Url, ReportError> {
    if matches!(namespace, "" | "." | "..") {
        return Err(ReportError::InvalidUrl(format!(
            "namespace '{}' is not a valid path segment",
            namespace
        )));
    }

    let mut url = Url::parse(api_url)
        .map_err(|e| ReportError::InvalidUrl(format!("'{}': {}", api_url, e)))?;
    url.path_segments_mut()
        .map_err(|_| ReportError::InvalidUrl(format!("'{}' cannot be a base URL", api_url)))?
        .pop_if_empty()
        .extend(["v1", "namespaces", namespace, "codeowners"]);
    Ok(url)
}

/// Client for the inventory service's codeowners endpoint.
pub struct EndorClient {
    http: reqwest::Client,
    api_url: String,
    token: SecretString,
}

impl EndorClient {
    /// Creates a client for `api_url` authenticating with `token`.
    pub fn new(api_url: impl Into<String>, token: SecretString) -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(CLIENT_TIMEOUT)
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            api_url: api_url.into(),
            token,
        }
    }

    /// Returns the endpoint a payload for `namespace` is sent to.
    pub fn endpoint(&self, namespace: &str) -> Result<Url, ReportError> {
        codeowners_url(&self.api_url, namespace)
    }

    /// Sends the payload for its tenant namespace.
    ///
    /// One attempt, no retries.
    pub async fn submit(&self, payload: &CodeOwnersPayload<'_>) -> Result<Submission, ReportError> {
        let url = self.endpoint(&payload.tenant_meta.namespace)?;
        info!("Posting code owner data to: {}", url);

        let response = self
            .http
            .post(url)
            .bearer_auth(self.token.expose_secret())
            .header("Request-Timeout", REQUEST_TIMEOUT_SECS)
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        debug!("Response status: {}", status);
        debug!("Response body: {}", body);

        if status.is_success() {
            Ok(Submission { status, body })
        } else {
            Err(ReportError::Status { status, body })
        }
    }
}
