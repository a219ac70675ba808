//! Connection and tracker configuration.
//!
//! Environment variables:
//! - `JIRA_API_BASE_URL`, `JIRA_EMAIL`, `JIRA_API_TOKEN` - optional credentials
//!   used to pre-configure the tracker client when the server starts
//! - `JIRA_ACCEPTANCE_FIELD` - custom field holding acceptance criteria
//!   (default: `customfield_10001`)

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const ENV_BASE_URL: &str = "JIRA_API_BASE_URL";
pub const ENV_EMAIL: &str = "JIRA_EMAIL";
pub const ENV_API_TOKEN: &str = "JIRA_API_TOKEN";
pub const ENV_ACCEPTANCE_FIELD: &str = "JIRA_ACCEPTANCE_FIELD";

pub const DEFAULT_ACCEPTANCE_FIELD: &str = "customfield_10001";

/// Path segment of the REST root under a Jira site URL.
pub const REST_API_PATH: &str = "/rest/api/3";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
}

/// Credentials for one Jira site.
///
/// Replaced wholesale on every connect; there is no partial update.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionConfig {
    pub base_url: String,
    pub email: String,
    pub api_token: String,
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("base_url", &self.base_url)
            .field("email", &self.email)
            .field("api_token", &"<redacted>")
            .finish()
    }
}

impl ConnectionConfig {
    pub fn new(
        base_url: impl Into<String>,
        email: impl Into<String>,
        api_token: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            email: email.into(),
            api_token: api_token.into(),
        }
    }

    /// Read credentials from the process environment.
    /// Returns `None` unless all three variables are set and non-blank.
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let config = Self::new(
            lookup(ENV_BASE_URL)?,
            lookup(ENV_EMAIL)?,
            lookup(ENV_API_TOKEN)?,
        );
        config.validate().ok().map(|_| config)
    }

    /// Wire names of the fields that are blank.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("baseUrl", &self.base_url),
            ("email", &self.email),
            ("apiToken", &self.api_token),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let missing = self.missing_fields();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::MissingFields(missing))
        }
    }

    /// Copy with surrounding whitespace, trailing slashes and token quotes
    /// removed.
    pub fn normalized(&self) -> Self {
        Self {
            base_url: normalize_base_url(&self.base_url),
            email: self.email.trim().to_string(),
            api_token: normalize_token(&self.api_token),
        }
    }

    /// REST root derived from the base URL.
    pub fn rest_root(&self) -> String {
        rest_root(&self.base_url)
    }
}

pub fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

/// Append the REST path unless the URL already ends with it.
pub fn rest_root(base_url: &str) -> String {
    let normalized = normalize_base_url(base_url);
    if normalized.to_ascii_lowercase().ends_with(REST_API_PATH) {
        normalized
    } else {
        format!("{}{}", normalized, REST_API_PATH)
    }
}

/// Tokens pasted from shell exports often keep their quotes.
pub fn normalize_token(token: &str) -> String {
    let token = token.trim();
    let token = token.strip_prefix('"').unwrap_or(token);
    token.strip_suffix('"').unwrap_or(token).to_string()
}

/// Tracker settings that are not credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerOptions {
    /// Custom field id that stores acceptance criteria.
    pub acceptance_field: String,
}

impl TrackerOptions {
    pub fn from_env() -> Self {
        let acceptance_field = std::env::var(ENV_ACCEPTANCE_FIELD)
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_ACCEPTANCE_FIELD.to_string());

        Self { acceptance_field }
    }

    pub fn with_acceptance_field(field: impl Into<String>) -> Self {
        Self {
            acceptance_field: field.into(),
        }
    }
}

impl Default for TrackerOptions {
    fn default() -> Self {
        Self::with_acceptance_field(DEFAULT_ACCEPTANCE_FIELD)
    }
}
