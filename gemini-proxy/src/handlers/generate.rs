//! Prompt forwarding handler.
//!
//! Checks run in a fixed order (method, credential, body) and each failure
//! is terminal. On success the upstream JSON is returned untouched.

use crate::services::ProviderError;
use crate::startup::AppState;
use anyhow::anyhow;
use axum::{body::Bytes, extract::State, http::Method, Json};
use serde_json::Value;
use service_core::error::AppError;

/// Extract a non-empty prompt from the raw request body.
///
/// The body must be JSON. Anything other than an object carrying a
/// non-empty `prompt` counts as a missing prompt. Duplicate keys keep the
/// last value.
pub fn parse_prompt(body: &[u8]) -> anyhow::Result<String> {
    let body: Value = serde_json::from_slice(body)?;

    match body.as_object().and_then(|fields| fields.get("prompt")) {
        Some(Value::String(prompt)) if !prompt.is_empty() => Ok(prompt.clone()),
        None | Some(Value::Null) | Some(Value::String(_)) => {
            Err(anyhow!("Prompt is missing from the request body."))
        }
        Some(_) => Err(anyhow!("Prompt must be a string.")),
    }
}

pub async fn call_gemini(
    State(state): State<AppState>,
    method: Method,
    body: Bytes,
) -> Result<Json<Value>, AppError> {
    if method != Method::POST {
        return Err(AppError::MethodNotAllowed(
            "Only POST requests are allowed.".to_string(),
        ));
    }

    let Some(api_key) = state.config.google.api_key.as_ref() else {
        tracing::error!("GEMINI_API_KEY is not configured");
        return Err(AppError::ConfigError(anyhow!(
            "API key is not set on the server."
        )));
    };

    let prompt = parse_prompt(&body)
        .map_err(|e| AppError::BadRequest(anyhow!("Invalid request body: {}", e)))?;

    match state.provider.generate_content(api_key, &prompt).await {
        Ok(data) => Ok(Json(data)),
        Err(ProviderError::Upstream { status, body }) => {
            tracing::error!(
                status = status.as_u16(),
                model = %state.provider.model(),
                error_body = %body,
                "Google API error"
            );
            Err(AppError::Upstream(
                status,
                format!("Failed to fetch from Google API. Status: {}", status.as_u16()),
            ))
        }
        Err(e) => {
            tracing::error!(error = %e, "Error calling Google API");
            Err(AppError::InternalError(anyhow!(
                "An internal error occurred: {}",
                e
            )))
        }
    }
}
