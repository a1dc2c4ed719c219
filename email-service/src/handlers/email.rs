//! `POST /api/email/generate`.

use axum::{
    extract::{rejection::JsonRejection, OriginalUri, State},
    http::Method,
    Json,
};
use serde_json::Value;
use service_core::error::{AppError, FieldError};

use crate::dtos::{ApiResponse, EmailRequest, GenerationResult};
use crate::services::validation::{parse_email_request, BODY_FIELD};
use crate::startup::AppState;

/// Caller-facing message for any generation failure.
pub const GENERATION_FAILED_MESSAGE: &str = "Failed to generate email";

/// Validate the request, draft the email, and shape the response.
///
/// This is the only place provider errors are turned into something a
/// caller sees; their detail goes to the log, never into the body.
pub async fn generate_email(
    State(state): State<AppState>,
    method: Method,
    OriginalUri(uri): OriginalUri,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ApiResponse<GenerationResult>>, AppError> {
    let body = match payload {
        Ok(Json(body)) => body,
        Err(rejection) => {
            let issues = vec![FieldError::new(BODY_FIELD, rejection.body_text())];
            tracing::info!(method = %method, path = %uri.path(), "Incoming request");
            log_validation_failure(&issues);
            return Err(AppError::Validation(issues));
        }
    };

    tracing::info!(
        method = %method,
        path = %uri.path(),
        purpose = body.get("purpose").and_then(serde_json::Value::as_str),
        recipient_name = body.get("recipient_name").and_then(serde_json::Value::as_str),
        tone = body.get("tone").and_then(serde_json::Value::as_str),
        "Incoming request"
    );

    let request = parse_email_request(&body).map_err(|errors| {
        let issues = FieldError::from_validation_errors(&errors, &field_order());
        log_validation_failure(&issues);
        AppError::Validation(issues)
    })?;

    let result = state.generator.generate(&request).await.map_err(|e| {
        tracing::error!(
            error = %e,
            recipient_name = %request.recipient_name,
            tone = %request.tone,
            "Email generation failed"
        );
        AppError::ServiceFailure {
            message: GENERATION_FAILED_MESSAGE,
            source: anyhow::Error::new(e),
        }
    })?;

    let response = ApiResponse::ok(result);
    tracing::info!(
        status_code = 200,
        ai_response_time_ms = response.data.response_time_ms,
        email = %response.data.email,
        "Response sent"
    );

    Ok(Json(response))
}

fn field_order() -> [&'static str; 4] {
    let [purpose, recipient_name, tone] = EmailRequest::FIELDS;
    [BODY_FIELD, purpose, recipient_name, tone]
}

fn log_validation_failure(issues: &[FieldError]) {
    let invalid_fields: Vec<&str> = issues.iter().map(|i| i.field.as_str()).collect();
    let detail: Vec<String> = issues
        .iter()
        .map(|i| format!("{}: {}", i.field, i.message))
        .collect();

    tracing::warn!(
        invalid_fields = %invalid_fields.join(","),
        issue_count = issues.len(),
        detail = %detail.join("; "),
        "Validation failed"
    );
}
