use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Method not allowed: {0}")]
    MethodNotAllowed(String),

    #[error("Bad request: {0}")]
    BadRequest(anyhow::Error),

    #[error("Upstream error ({0}): {1}")]
    Upstream(StatusCode, String),

    #[error("Internal server error: {0}")]
    InternalError(#[from] anyhow::Error),

    #[error("Configuration error: {0}")]
    ConfigError(anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Upstream(status, _) => *status,
            AppError::InternalError(_) | AppError::ConfigError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::ConfigError(anyhow::Error::new(err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalError(anyhow::Error::new(err))
    }
}

/// Every variant renders as `{ "error": "<message>" }`. The message is the
/// inner value only, so callers control the exact wording clients see.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorResponse {
            error: String,
        }

        let status = self.status();
        let error = match self {
            AppError::MethodNotAllowed(msg) | AppError::Upstream(_, msg) => msg,
            AppError::BadRequest(err)
            | AppError::InternalError(err)
            | AppError::ConfigError(err) => err.to_string(),
        };

        (status, Json(ErrorResponse { error })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn render(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read body")
            .to_bytes();
        (status, serde_json::from_slice(&bytes).expect("Body is not JSON"))
    }

    #[tokio::test]
    async fn method_not_allowed_renders_message_verbatim() {
        let (status, body) = render(AppError::MethodNotAllowed("POST only".into())).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body, serde_json::json!({ "error": "POST only" }));
    }

    #[tokio::test]
    async fn upstream_mirrors_status() {
        let (status, body) = render(AppError::Upstream(
            StatusCode::TOO_MANY_REQUESTS,
            "slow down".into(),
        ))
        .await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(body["error"], "slow down");
    }

    #[tokio::test]
    async fn internal_and_config_errors_are_500() {
        let (status, body) =
            render(AppError::InternalError(anyhow::anyhow!("boom"))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "boom");

        let (status, _) = render(AppError::ConfigError(anyhow::anyhow!("missing"))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn error_body_has_only_the_error_field() {
        let (_, body) = render(AppError::BadRequest(anyhow::anyhow!("nope"))).await;
        let object = body.as_object().expect("Body is not an object");
        assert_eq!(object.len(), 1);
        assert_eq!(body["error"], "nope");
    }
}
