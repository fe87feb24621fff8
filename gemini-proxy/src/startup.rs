//! Application startup and lifecycle management.

use crate::config::ProxyConfig;
use crate::handlers::{
    generate::call_gemini,
    health::{health_check, readiness_check},
};
use crate::services::{ContentProvider, GeminiProvider};
use axum::{
    middleware::from_fn,
    routing::{any, get},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::tracing::{request_id_middleware, request_id_of};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;

/// Shared application state. Immutable after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: ProxyConfig,
    pub provider: Arc<dyn ContentProvider>,
}

impl AppState {
    /// State backed by the real Gemini API.
    pub fn new(config: ProxyConfig) -> Self {
        let provider: Arc<dyn ContentProvider> = Arc::new(GeminiProvider::new(&config.google));
        Self { config, provider }
    }
}

/// Build the HTTP router. Every method is routed to the proxy handler so it
/// can answer non-POST requests with its own 405 body.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/call-gemini", any(call_gemini))
        .route("/.netlify/functions/call-gemini", any(call_gemini))
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "http_request",
                    request_id = %request_id_of(request),
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Build the application with the given configuration.
    pub async fn build(config: ProxyConfig) -> Result<Self, AppError> {
        Self::build_with_state(AppState::new(config)).await
    }

    /// Build around a prepared state (e.g. one pointing at a stub upstream).
    pub async fn build_with_state(state: AppState) -> Result<Self, AppError> {
        if state.config.google.api_key.is_none() {
            tracing::warn!("GEMINI_API_KEY is not set; prompt requests will fail with 500");
        }

        tracing::info!(
            model = %state.provider.model(),
            "Initialized Gemini provider"
        );

        // Port 0 = random port for testing
        let addr = SocketAddr::from(([0, 0, 0, 0], state.config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Gemini proxy listening on port {}", port);

        Ok(Self {
            port,
            listener,
            state,
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run the application until a shutdown signal arrives.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        let router = build_router(self.state);

        axum::serve(self.listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| {
                tracing::error!("HTTP server error: {}", e);
                e
            })
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
