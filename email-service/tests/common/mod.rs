//! Test helpers for email-service integration tests.
//!
//! Everything runs in-process against mock or stub completion backends; no
//! external services are needed.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use email_service::services::providers::CompletionProvider;
use email_service::startup::{build_router, AppState, Application};
use std::sync::Arc;
use tower::util::ServiceExt;

pub const TEST_SYSTEM_PROMPT: &str = "You draft short emails.";

/// Router wired to `provider`, ready for `oneshot`.
pub fn router_with(provider: Arc<dyn CompletionProvider>) -> Router {
    build_router(AppState::new(provider, Arc::from(TEST_SYSTEM_PROMPT)))
}

/// POST a raw body to the generate endpoint.
pub async fn post_raw(router: Router, body: &str) -> (StatusCode, axum::http::HeaderMap, serde_json::Value) {
    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/email/generate")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);

    (status, headers, json)
}

/// POST a JSON value to the generate endpoint.
pub async fn post_generate(router: Router, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
    let (status, _, json) = post_raw(router, &body.to_string()).await;
    (status, json)
}

/// Running server bound to a random port.
pub struct TestApp {
    pub address: String,
    pub port: u16,
}

impl TestApp {
    pub async fn spawn(provider: Arc<dyn CompletionProvider>) -> TestApp {
        let app = Application::with_provider(0, provider, Arc::from(TEST_SYSTEM_PROMPT))
            .await
            .expect("Failed to build application");
        Self::run(app)
    }

    pub fn run(app: Application) -> TestApp {
        let port = app.port();
        tokio::spawn(async move {
            let _ = app.run_until_stopped().await;
        });

        TestApp {
            address: format!("http://127.0.0.1:{}", port),
            port,
        }
    }

    pub fn client(&self) -> reqwest::Client {
        reqwest::Client::new()
    }
}
