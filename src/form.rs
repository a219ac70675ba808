//! Connection form state.
//!
//! Holds the three credential fields, an inline error, and an in-flight flag
//! that blocks a second submission until the first one finishes. The form
//! does not know how credentials are delivered; a [`Connector`] does.

use crate::config::ConnectionConfig;
use crate::jira::TrackerClient;
use crate::remote::BridgeClient;

const CONNECT_FAILED: &str = "Failed to connect to Jira";

/// Something that can accept a set of credentials and report whether they work.
#[allow(async_fn_in_trait)]
pub trait Connector {
    async fn submit_connection(&self, config: &ConnectionConfig) -> Result<(), String>;
}

impl Connector for BridgeClient {
    async fn submit_connection(&self, config: &ConnectionConfig) -> Result<(), String> {
        self.connect(config).await.map_err(|e| e.to_string())
    }
}

impl Connector for TrackerClient {
    async fn submit_connection(&self, config: &ConnectionConfig) -> Result<(), String> {
        self.configure(config);
        if self.test_connection().await {
            Ok(())
        } else {
            Err(self
                .last_error()
                .unwrap_or_else(|| "Invalid Jira credentials".to_string()))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    BaseUrl,
    Email,
    ApiToken,
}

impl FormField {
    pub const ALL: [FormField; 3] = [Self::BaseUrl, Self::Email, Self::ApiToken];

    pub fn label(self) -> &'static str {
        match self {
            Self::BaseUrl => "Jira Base URL",
            Self::Email => "Email Address",
            Self::ApiToken => "API Token",
        }
    }

    pub fn placeholder(self) -> Option<&'static str> {
        match self {
            Self::BaseUrl => Some("https://your-domain.atlassian.net"),
            Self::Email | Self::ApiToken => None,
        }
    }

    /// Whether the value should be masked when displayed.
    pub fn is_secret(self) -> bool {
        matches!(self, Self::ApiToken)
    }
}

/// Result of a submit attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Connected,
    Failed(String),
    /// Required fields were blank; nothing was sent.
    Incomplete(Vec<FormField>),
    /// A submission is already in flight; nothing was sent.
    Busy,
}

#[derive(Debug, Default)]
pub struct ConnectionForm {
    config: ConnectionConfig,
    error: Option<String>,
    connecting: bool,
}

impl ConnectionForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        let value = value.into();
        match field {
            FormField::BaseUrl => self.config.base_url = value,
            FormField::Email => self.config.email = value,
            FormField::ApiToken => self.config.api_token = value,
        }
    }

    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::BaseUrl => &self.config.base_url,
            FormField::Email => &self.config.email,
            FormField::ApiToken => &self.config.api_token,
        }
    }

    /// Inline error from the last attempt, if it failed.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_connecting(&self) -> bool {
        self.connecting
    }

    pub fn submit_label(&self) -> &'static str {
        if self.connecting {
            "Connecting..."
        } else {
            "Connect"
        }
    }

    pub fn missing_fields(&self) -> Vec<FormField> {
        FormField::ALL
            .into_iter()
            .filter(|field| self.value(*field).trim().is_empty())
            .collect()
    }

    /// Start a submission: clears the previous error and marks the form busy.
    ///
    /// Returns the credentials to send, or the outcome that prevented sending.
    pub fn begin_submit(&mut self) -> Result<ConnectionConfig, SubmitOutcome> {
        if self.connecting {
            return Err(SubmitOutcome::Busy);
        }

        let missing = self.missing_fields();
        if !missing.is_empty() {
            let labels: Vec<_> = missing.iter().map(|f| f.label()).collect();
            self.error = Some(format!("Please fill in: {}", labels.join(", ")));
            return Err(SubmitOutcome::Incomplete(missing));
        }

        self.error = None;
        self.connecting = true;
        Ok(self.config.clone())
    }

    /// Finish a submission started with [`Self::begin_submit`].
    pub fn finish_submit(&mut self, result: Result<(), String>) -> SubmitOutcome {
        self.connecting = false;
        match result {
            Ok(()) => SubmitOutcome::Connected,
            Err(message) => {
                let message = if message.trim().is_empty() {
                    CONNECT_FAILED.to_string()
                } else {
                    message
                };
                self.error = Some(message.clone());
                SubmitOutcome::Failed(message)
            }
        }
    }

    pub async fn submit<C: Connector>(&mut self, connector: &C) -> SubmitOutcome {
        let config = match self.begin_submit() {
            Ok(config) => config,
            Err(outcome) => return outcome,
        };
        let result = connector.submit_connection(&config).await;
        self.finish_submit(result)
    }
}
