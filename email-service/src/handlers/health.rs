use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::startup::AppState;

/// Health check endpoint for Docker/K8s liveness checks.
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "email-service",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Readiness check: the completion provider must be usable.
pub async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    match state.generator.provider().health_check().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Completion provider not ready");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
