use reqwest::StatusCode;
use thiserror::Error;

/// Failures talking to the tracker.
///
/// Server-reported variants display the upstream message as-is so it can be
/// shown to the user unchanged.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("Jira configuration not set")]
    NotConfigured,

    /// 401 or 403 from the tracker.
    #[error("{0}")]
    Authentication(String),

    #[error("Invalid Jira URL: {0}")]
    InvalidUrl(String),

    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    /// Success status with a body we could not use.
    #[error("{0}")]
    MalformedResponse(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{message}")]
    Upstream { status: StatusCode, message: String },
}

impl TrackerError {
    /// Classify a non-2xx response.
    pub fn from_status(status: StatusCode, message: String) -> Self {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Self::Authentication(message),
            StatusCode::NOT_FOUND => Self::NotFound(message),
            _ => Self::Upstream { status, message },
        }
    }

    /// Upstream HTTP status, when the tracker answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Upstream { status, .. } => Some(*status),
            Self::Authentication(_) => Some(StatusCode::UNAUTHORIZED),
            Self::NotFound(_) => Some(StatusCode::NOT_FOUND),
            Self::Transport(e) => e.status(),
            Self::NotConfigured | Self::InvalidUrl(_) | Self::MalformedResponse(_) => None,
        }
    }
}
