//! Integration tests for the health and readiness endpoints, served over a real socket.

mod common;

use common::TestApp;
use email_service::services::providers::mock::MockCompletionProvider;
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn health_check_returns_ok() {
    let app = TestApp::spawn(Arc::new(MockCompletionProvider::replying("Hi"))).await;

    let response = app
        .client()
        .get(format!("{}/health", app.address))
        .timeout(Duration::from_secs(5))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "email-service");
}

#[tokio::test]
async fn readiness_check_returns_ok() {
    let app = TestApp::spawn(Arc::new(MockCompletionProvider::replying("Hi"))).await;

    let response = app
        .client()
        .get(format!("{}/ready", app.address))
        .timeout(Duration::from_secs(5))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
}

#[tokio::test]
async fn readiness_check_reports_unusable_provider() {
    let app = TestApp::spawn(Arc::new(MockCompletionProvider::failing("no key"))).await;

    let response = app
        .client()
        .get(format!("{}/ready", app.address))
        .timeout(Duration::from_secs(5))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 503);
}

#[tokio::test]
async fn request_id_is_echoed() {
    let app = TestApp::spawn(Arc::new(MockCompletionProvider::replying("Hi"))).await;

    let response = app
        .client()
        .get(format!("{}/health", app.address))
        .header("x-request-id", "req-42")
        .timeout(Duration::from_secs(5))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.headers()["x-request-id"], "req-42");
}
