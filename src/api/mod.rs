mod handlers;

use std::any::Any;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower::ServiceBuilder;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};

pub use handlers::ConnectInput;

use crate::jira::TrackerClient;
use crate::models::ApiResult;

/// Prefix the tracker routes are mounted under.
pub const JIRA_PREFIX: &str = "/api/jira";

/// Tracker routes, relative to [`JIRA_PREFIX`].
pub fn jira_routes() -> Router<TrackerClient> {
    Router::new()
        .route("/connect", post(handlers::connect))
        .route("/stories", get(handlers::list_stories))
        .route("/stories/{key}", get(handlers::get_story))
}

pub fn create_router(client: TrackerClient) -> Router {
    Router::new()
        .nest(JIRA_PREFIX, jira_routes())
        .route("/api/health", get(handlers::health))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(CatchPanicLayer::custom(handle_panic)),
        )
        .with_state(client)
}

/// Turn a handler panic into a 500 envelope; other requests are unaffected.
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    tracing::error!("Request handler panicked: {}", detail);

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiResult::<()>::err("Internal server error")),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panic_becomes_internal_server_error() {
        let response = handle_panic(Box::new("boom"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn panic_with_owned_message_becomes_internal_server_error() {
        let response = handle_panic(Box::new(String::from("index out of bounds")));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
