//! HTTP client for the Jira REST API.
//!
//! One instance is shared by every request handler. Credentials live behind
//! a lock and are replaced wholesale by [`TrackerClient::configure`]; each
//! operation snapshots them before its first await, so a concurrent
//! reconfigure simply wins for later calls.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;

use super::error::TrackerError;
use super::types::{upstream_message, CurrentUser, RawIssue, SearchResponse};
use crate::config::{ConnectionConfig, TrackerOptions};
use crate::models::{ApiResult, Story};

/// JQL used to list stories, newest first.
const STORY_JQL: &str = "type in (Story) ORDER BY created DESC";

/// Cap on the number of stories returned by one search.
pub const MAX_RESULTS: u32 = 100;

#[derive(Clone)]
struct Connection {
    rest_root: String,
    email: String,
    api_token: String,
}

impl Connection {
    fn is_complete(&self) -> bool {
        !self.rest_root.is_empty() && !self.email.is_empty() && !self.api_token.is_empty()
    }
}

#[derive(Default)]
struct ClientState {
    connection: Option<Connection>,
    last_error: Option<String>,
}

/// Credential-holding client for one Jira site.
///
/// Cheap to clone; clones share the same credentials and last-error slot.
#[derive(Clone)]
pub struct TrackerClient {
    http: Client,
    options: TrackerOptions,
    state: Arc<RwLock<ClientState>>,
}

impl TrackerClient {
    pub fn new(options: TrackerOptions) -> Self {
        Self {
            http: Client::new(),
            options,
            state: Arc::new(RwLock::new(ClientState::default())),
        }
    }

    /// Create a client using tracker options from the environment.
    /// Credentials are not read here; see [`crate::bootstrap`].
    pub fn from_env() -> Self {
        Self::new(TrackerOptions::from_env())
    }

    fn read_state(&self) -> RwLockReadGuard<'_, ClientState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, ClientState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    // ============================================================
    // Configuration
    // ============================================================

    /// Replace the stored credentials and clear the last error.
    pub fn configure(&self, config: &ConnectionConfig) {
        let config = config.normalized();
        let rest_root = if config.base_url.is_empty() {
            String::new()
        } else {
            config.rest_root()
        };

        tracing::info!("Jira client configured for {} as {}", rest_root, config.email);

        let mut state = self.write_state();
        state.connection = Some(Connection {
            rest_root,
            email: config.email,
            api_token: config.api_token,
        });
        state.last_error = None;
    }

    pub fn is_configured(&self) -> bool {
        self.read_state()
            .connection
            .as_ref()
            .is_some_and(Connection::is_complete)
    }

    /// REST root currently in use, e.g. `https://acme.atlassian.net/rest/api/3`.
    pub fn rest_root(&self) -> Option<String> {
        self.read_state()
            .connection
            .as_ref()
            .map(|c| c.rest_root.clone())
    }

    /// Account email currently in use.
    pub fn email(&self) -> Option<String> {
        self.read_state().connection.as_ref().map(|c| c.email.clone())
    }

    /// Most recent failure description, cleared by [`Self::configure`].
    pub fn last_error(&self) -> Option<String> {
        self.read_state().last_error.clone()
    }

    pub fn acceptance_field(&self) -> &str {
        &self.options.acceptance_field
    }

    fn connection(&self) -> Result<Connection, TrackerError> {
        self.read_state()
            .connection
            .clone()
            .filter(Connection::is_complete)
            .ok_or(TrackerError::NotConfigured)
    }

    fn record_error(&self, error: &TrackerError) -> String {
        let message = error.to_string();
        self.write_state().last_error = Some(message.clone());
        message
    }

    // ============================================================
    // Request Plumbing
    // ============================================================

    /// Build an endpoint URL under the REST root. Each segment is
    /// percent-encoded on its own, so a `/` inside an issue key stays in
    /// that segment.
    fn endpoint(connection: &Connection, segments: &[&str]) -> Result<Url, TrackerError> {
        let invalid = || TrackerError::InvalidUrl(connection.rest_root.clone());
        let mut url = Url::parse(&connection.rest_root).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|_| invalid())?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(
        &self,
        connection: &Connection,
        segments: &[&str],
    ) -> Result<RequestBuilder, TrackerError> {
        let url = Self::endpoint(connection, segments)?;
        Ok(self
            .http
            .get(url)
            .basic_auth(&connection.email, Some(&connection.api_token))
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .header("X-Atlassian-Token", "no-check"))
    }

    /// Send a request and decode a successful JSON body.
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, TrackerError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = upstream_message(&body)
                .unwrap_or_else(|| format!("Request failed with status {}", status));
            return Err(TrackerError::from_status(status, message));
        }

        serde_json::from_str(&body)
            .map_err(|e| TrackerError::MalformedResponse(format!("Unexpected Jira response: {}", e)))
    }

    fn story_fields(&self) -> String {
        format!("summary,description,{}", self.options.acceptance_field)
    }

    // ============================================================
    // Operations
    // ============================================================

    /// Look up the authenticated user.
    pub async fn check_connection(&self) -> Result<CurrentUser, TrackerError> {
        let connection = self.connection()?;
        self.send(self.request(&connection, &["myself"])?).await
    }

    /// Validate the stored credentials. Failures are recorded in
    /// [`Self::last_error`], never returned.
    pub async fn test_connection(&self) -> bool {
        match self.check_connection().await {
            Ok(user) => {
                tracing::info!(
                    "Jira connection validated for {}",
                    user.display_name.as_deref().unwrap_or("unknown user")
                );
                true
            }
            Err(e) => {
                let message = self.record_error(&e);
                tracing::error!(status = ?e.status(), "Jira connection validation failed: {}", message);
                false
            }
        }
    }

    /// Search for stories, newest first, capped at [`MAX_RESULTS`].
    pub async fn fetch_stories(&self) -> Result<Vec<Story>, TrackerError> {
        let connection = self.connection()?;
        let fields = self.story_fields();
        let max_results = MAX_RESULTS.to_string();

        let request = self.request(&connection, &["search", "jql"])?.query(&[
            ("jql", STORY_JQL),
            ("fields", fields.as_str()),
            ("maxResults", max_results.as_str()),
        ]);
        let response: SearchResponse = self.send(request).await?;

        let issues = response.issues.ok_or_else(|| {
            TrackerError::MalformedResponse("No issues found in Jira response".to_string())
        })?;

        tracing::debug!("Fetched {} stories from Jira", issues.len());

        Ok(issues
            .into_iter()
            .map(|issue| issue.into_story(self.acceptance_field()))
            .collect())
    }

    /// Fetch one issue by key.
    pub async fn fetch_story(&self, key: &str) -> Result<Story, TrackerError> {
        let connection = self.connection()?;
        let fields = self.story_fields();

        let request = self
            .request(&connection, &["issue", key])?
            .query(&[("fields", fields.as_str())]);
        let issue: RawIssue = self.send(request).await?;

        Ok(issue.into_story(self.acceptance_field()))
    }

    /// [`Self::fetch_stories`] as a result object.
    pub async fn list_stories(&self) -> ApiResult<Vec<Story>> {
        match self.fetch_stories().await {
            Ok(stories) => ApiResult::ok(stories),
            Err(e) => {
                let message = self.record_error(&e);
                tracing::error!(status = ?e.status(), "Error fetching Jira stories: {}", message);
                ApiResult::err(message)
            }
        }
    }

    /// [`Self::fetch_story`] as a result object.
    pub async fn get_story(&self, key: &str) -> ApiResult<Story> {
        match self.fetch_story(key).await {
            Ok(story) => ApiResult::ok(story),
            Err(e) => {
                let message = self.record_error(&e);
                tracing::error!(status = ?e.status(), "Error fetching story {}: {}", key, message);
                ApiResult::err(message)
            }
        }
    }
}

impl Default for TrackerClient {
    fn default() -> Self {
        Self::new(TrackerOptions::default())
    }
}

impl std::fmt::Debug for TrackerClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrackerClient")
            .field("rest_root", &self.rest_root())
            .field("email", &self.email())
            .field("acceptance_field", &self.options.acceptance_field)
            .finish()
    }
}
