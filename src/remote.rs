//! HTTP client for the bridge's own API.
//!
//! Used by the CLI to talk to a running `jira-stories serve`. Configuration is
//! via environment variable:
//! - `JIRA_BRIDGE_URL` - Base URL (default: `http://127.0.0.1:3000/api/jira`)

use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::config::ConnectionConfig;
use crate::models::{ApiResult, Story};

/// Default URL for a locally running server.
pub const DEFAULT_URL: &str = "http://127.0.0.1:3000/api/jira";

/// Bridge client errors.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with `success: false`.
    #[error("{0}")]
    Rejected(String),

    #[error("Server error: {0}")]
    Server(String),

    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),
}

/// HTTP client for the bridge API.
#[derive(Debug, Clone)]
pub struct BridgeClient {
    base_url: String,
    client: Client,
}

impl BridgeClient {
    /// Create client from environment variables.
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("JIRA_BRIDGE_URL").unwrap_or_else(|_| DEFAULT_URL.to_string());
        Self::new(base_url)
    }

    /// Create with explicit base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Append path segments to the base URL, percent-encoding each one.
    fn url(&self, segments: &[&str]) -> Result<Url, BridgeError> {
        let invalid = || BridgeError::InvalidUrl(self.base_url.clone());
        let mut url = Url::parse(&self.base_url).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|_| invalid())?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Decode the `{success, data, error}` envelope regardless of status;
    /// the server uses non-2xx statuses for connect failures too.
    async fn handle_envelope<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<ApiResult<T>, BridgeError> {
        let status = response.status();
        let body = response.text().await?;
        match serde_json::from_str::<ApiResult<T>>(&body) {
            Ok(envelope) => Ok(envelope),
            Err(_) if !status.is_success() => {
                Err(BridgeError::Server(format!("{}: {}", status, body)))
            }
            Err(e) => Err(BridgeError::Server(format!("Unexpected response: {}", e))),
        }
    }

    // ============================================================
    // Operations
    // ============================================================

    /// Send credentials to the server and have it validate them.
    pub async fn connect(&self, config: &ConnectionConfig) -> Result<(), BridgeError> {
        let response = self
            .client
            .post(self.url(&["connect"])?)
            .json(config)
            .send()
            .await?;
        let envelope: ApiResult<()> = self.handle_envelope(response).await?;

        if envelope.success {
            Ok(())
        } else {
            Err(BridgeError::Rejected(
                envelope
                    .error
                    .unwrap_or_else(|| "Failed to connect to Jira".to_string()),
            ))
        }
    }

    pub async fn list_stories(&self) -> Result<Vec<Story>, BridgeError> {
        let response = self.client.get(self.url(&["stories"])?).send().await?;
        self.handle_envelope(response)
            .await?
            .into_result()
            .map_err(BridgeError::Rejected)
    }

    pub async fn get_story(&self, key: &str) -> Result<Story, BridgeError> {
        let response = self
            .client
            .get(self.url(&["stories", key])?)
            .send()
            .await?;
        self.handle_envelope(response)
            .await?
            .into_result()
            .map_err(BridgeError::Rejected)
    }
}

impl Default for BridgeClient {
    fn default() -> Self {
        Self::new(DEFAULT_URL)
    }
}
