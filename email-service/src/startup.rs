//! Application startup and lifecycle management.

use crate::config::EmailConfig;
use crate::handlers::{
    email::generate_email,
    health::{health_check, readiness_check},
};
use crate::services::providers::openai::{OpenAiConfig, OpenAiProvider};
use crate::services::providers::CompletionProvider;
use crate::services::{load_system_prompt, EmailGenerator};
use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{request_id_middleware, security_headers_middleware};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;

/// Shared application state. Read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub generator: EmailGenerator,
}

impl AppState {
    pub fn new(provider: Arc<dyn CompletionProvider>, system_prompt: Arc<str>) -> Self {
        Self {
            generator: EmailGenerator::new(provider, system_prompt),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .route("/api/email/generate", post(generate_email))
        .layer(from_fn(security_headers_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
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
    ///
    /// Loads the system prompt, creates the completion client and binds the
    /// listener. Any failure here is fatal.
    pub async fn build(config: EmailConfig) -> Result<Self, AppError> {
        let system_prompt = load_system_prompt(&config.prompt.system_prompt_path)?;
        tracing::info!(
            path = %config.prompt.system_prompt_path.display(),
            "Loaded system prompt"
        );

        let model = config.openai.model.clone();
        let provider = OpenAiProvider::new(OpenAiConfig {
            api_key: config.openai.api_key,
            model: config.openai.model,
            base_url: config.openai.base_url,
            timeout: config.openai.timeout,
        })
        .map_err(|e| AppError::ConfigError(anyhow::Error::new(e)))?;
        let provider: Arc<dyn CompletionProvider> = Arc::new(provider);

        tracing::info!(model = %model, "Initialized OpenAI completion provider");

        Self::with_provider(config.common.port, provider, system_prompt).await
    }

    /// Bind the listener around an already-built provider.
    ///
    /// Port 0 picks a random free port.
    pub async fn with_provider(
        port: u16,
        provider: Arc<dyn CompletionProvider>,
        system_prompt: Arc<str>,
    ) -> Result<Self, AppError> {
        let addr = SocketAddr::from(([0, 0, 0, 0], port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Email service: HTTP on port {}", port);

        Ok(Self {
            port,
            listener,
            state: AppState::new(provider, system_prompt),
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
                std::io::Error::other(format!("HTTP server error: {}", e))
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
