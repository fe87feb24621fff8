//! Gemini provider implementation.
//!
//! Calls `models/{model}:generateContent` on Google's Generative Language
//! API with a single-turn, single-part text request.

use super::{ContentProvider, ProviderError};
use crate::config::GoogleConfig;
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::Serialize;

/// Gemini provider. Holds one pooled HTTP client for the process lifetime.
#[derive(Clone)]
pub struct GeminiProvider {
    client: Client,
    api_base_url: String,
    model: String,
}

/// Outbound `generateContent` request body.
#[derive(Debug, Serialize)]
pub struct GenerateContentRequest<'a> {
    pub contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
pub struct Content<'a> {
    pub parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
pub struct Part<'a> {
    pub text: &'a str,
}

impl<'a> GenerateContentRequest<'a> {
    pub fn from_prompt(prompt: &'a str) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        }
    }
}

impl GeminiProvider {
    pub fn new(config: &GoogleConfig) -> Self {
        Self {
            client: Client::new(),
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        }
    }

    /// Endpoint for `method` on the configured model, without the key.
    fn api_url(&self, method: &str) -> String {
        format!("{}/models/{}:{}", self.api_base_url, self.model, method)
    }
}

#[async_trait]
impl ContentProvider for GeminiProvider {
    async fn generate_content(
        &self,
        api_key: &Secret<String>,
        prompt: &str,
    ) -> Result<serde_json::Value, ProviderError> {
        let request = GenerateContentRequest::from_prompt(prompt);

        tracing::debug!(
            model = %self.model,
            prompt_len = prompt.len(),
            "Sending request to Gemini API"
        );

        // The key travels as a query parameter; strip the URL from reqwest
        // errors so it never reaches a response body or log line.
        let response = self
            .client
            .post(self.api_url("generateContent"))
            .query(&[("key", api_key.expose_secret())])
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .map_err(|e| ProviderError::Network(e.without_url().to_string()))?;
            return Err(ProviderError::Upstream { status, body });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ProviderError::Network(e.without_url().to_string()))?;

        serde_json::from_slice(&bytes).map_err(|e| ProviderError::InvalidResponse(e.to_string()))
    }

    fn model(&self) -> &str {
        &self.model
    }
}
