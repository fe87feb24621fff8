use crate::startup::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

/// Liveness probe.
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "gemini-proxy",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Readiness probe: not ready until an API key is configured.
pub async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    if state.config.google.api_key.is_some() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}
