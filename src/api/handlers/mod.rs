use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use crate::config::ConnectionConfig;
use crate::jira::TrackerClient;
use crate::models::{ApiResult, Story};

// ============================================================
// Error Handling
// ============================================================

type ErrorResponse = (StatusCode, Json<ApiResult<()>>);

fn error_response(status: StatusCode, message: impl Into<String>) -> ErrorResponse {
    (status, Json(ApiResult::err(message)))
}

// ============================================================
// Health
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ============================================================
// Connection
// ============================================================

/// Body of `POST /connect`. Fields are optional so a missing one is reported
/// as a 400 with our envelope rather than a deserialization rejection.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectInput {
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub api_token: Option<String>,
}

impl From<ConnectInput> for ConnectionConfig {
    fn from(input: ConnectInput) -> Self {
        ConnectionConfig::new(
            input.base_url.unwrap_or_default(),
            input.email.unwrap_or_default(),
            input.api_token.unwrap_or_default(),
        )
    }
}

/// Store new credentials and validate them against the tracker.
pub async fn connect(
    State(client): State<TrackerClient>,
    input: Result<Json<ConnectInput>, JsonRejection>,
) -> Result<Json<ApiResult<()>>, ErrorResponse> {
    let Json(input) = input.map_err(|rej| {
        tracing::warn!("Malformed connect request: {}", rej.body_text());
        error_response(StatusCode::BAD_REQUEST, rej.body_text())
    })?;

    let config = ConnectionConfig::from(input);
    if let Err(e) = config.validate() {
        tracing::warn!("Rejected connect request: {}", e);
        return Err(error_response(StatusCode::BAD_REQUEST, e.to_string()));
    }

    // Never log the token.
    tracing::info!("Jira connect attempt: {} as {}", config.base_url, config.email);

    client.configure(&config);
    if client.test_connection().await {
        Ok(Json(ApiResult::ack()))
    } else {
        let message = client
            .last_error()
            .unwrap_or_else(|| "Invalid Jira credentials".to_string());
        Err(error_response(StatusCode::UNAUTHORIZED, message))
    }
}

// ============================================================
// Stories
// ============================================================

pub async fn list_stories(State(client): State<TrackerClient>) -> Json<ApiResult<Vec<Story>>> {
    Json(client.list_stories().await)
}

pub async fn get_story(
    State(client): State<TrackerClient>,
    Path(key): Path<String>,
) -> Json<ApiResult<Story>> {
    Json(client.get_story(&key).await)
}
