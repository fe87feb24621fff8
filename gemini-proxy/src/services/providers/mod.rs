//! Upstream content provider abstraction.
//!
//! The handler talks to a `ContentProvider` rather than to `reqwest`
//! directly, so the Gemini backend can be swapped for a stub in tests.

pub mod gemini;

use async_trait::async_trait;
use reqwest::StatusCode;
use secrecy::Secret;
use thiserror::Error;

/// Error type for provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// The request never produced a response (connect, DNS, TLS, body read).
    #[error("{0}")]
    Network(String),

    /// The upstream answered with a non-success status. `body` is the raw
    /// upstream text, for logs only.
    #[error("Upstream returned {status}")]
    Upstream { status: StatusCode, body: String },

    /// A success response whose body is not JSON.
    #[error("{0}")]
    InvalidResponse(String),
}

/// Trait for prompt-to-content providers (e.g., Gemini).
#[async_trait]
pub trait ContentProvider: Send + Sync {
    /// Send `prompt` upstream and return the success body untouched.
    async fn generate_content(
        &self,
        api_key: &Secret<String>,
        prompt: &str,
    ) -> Result<serde_json::Value, ProviderError>;

    /// Model identifier requests are sent to.
    fn model(&self) -> &str;
}
