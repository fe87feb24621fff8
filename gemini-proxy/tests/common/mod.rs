use axum::{body::Body, http::Request, Router};
use gemini_proxy::config::{GoogleConfig, ProxyConfig};
use gemini_proxy::startup::{build_router, AppState, Application};
use http_body_util::BodyExt;
use service_core::config::Config as CoreConfig;
use std::time::Duration;
use tower::ServiceExt;

pub const TEST_API_KEY: &str = "test-api-key";
pub const TEST_MODEL: &str = "gemini-test";
pub const GENERATE_PATH: &str = "/v1beta/models/gemini-test:generateContent";

/// Config pointing the provider at `upstream` (a mock server URI).
pub fn test_config(upstream: &str, api_key: Option<&str>) -> ProxyConfig {
    let mut google = GoogleConfig::new(api_key);
    google.api_base_url = format!("{}/v1beta", upstream);
    google.model = TEST_MODEL.to_string();

    ProxyConfig {
        common: CoreConfig {
            port: 0, // Random port for testing
            ..CoreConfig::default()
        },
        google,
    }
}

pub fn router(upstream: &str, api_key: Option<&str>) -> Router {
    build_router(AppState::new(test_config(upstream, api_key)))
}

pub fn post_prompt(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Send one request through the router and decode the JSON body.
pub async fn send(app: Router, request: Request<Body>) -> (u16, serde_json::Value) {
    let response = app.oneshot(request).await.expect("Router failed");
    let status = response.status().as_u16();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to read body")
        .to_bytes();
    let body = serde_json::from_slice(&bytes).expect("Response body is not JSON");
    (status, body)
}

pub struct TestApp {
    pub address: String,
    pub port: u16,
}

impl TestApp {
    pub async fn spawn(upstream: &str, api_key: Option<&str>) -> Self {
        let app = Application::build(test_config(upstream, api_key))
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server to accept connections by polling health.
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }

        TestApp { address, port }
    }
}
