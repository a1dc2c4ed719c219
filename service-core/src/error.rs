use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use validator::ValidationErrors;

/// A single rejected input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Flatten `errors` into a list ordered by `field_order`, keeping the
    /// per-field rule order. Fields not named in `field_order` follow in
    /// alphabetical order.
    pub fn from_validation_errors(errors: &ValidationErrors, field_order: &[&str]) -> Vec<Self> {
        let by_field = errors.field_errors();

        let mut remaining: Vec<&str> = by_field
            .keys()
            .map(|k| k.as_ref())
            .filter(|k| !field_order.contains(k))
            .collect();
        remaining.sort_unstable();

        field_order
            .iter()
            .copied()
            .chain(remaining)
            .filter_map(|field| by_field.get(field).map(|errs| (field, errs)))
            .flat_map(|(field, errs)| {
                errs.iter().map(move |err| {
                    let message = err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| err.code.to_string());
                    FieldError::new(field, message)
                })
            })
            .collect()
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation failed: {0:?}")]
    Validation(Vec<FieldError>),

    #[error("Bad request: {0}")]
    BadRequest(anyhow::Error),

    /// A downstream operation failed. Only `message` reaches the caller.
    #[error("{message}: {source}")]
    ServiceFailure {
        message: &'static str,
        #[source]
        source: anyhow::Error,
    },

    #[error("Internal server error: {0}")]
    InternalError(#[from] anyhow::Error),

    #[error("Service Unavailable")]
    ServiceUnavailable,

    #[error("Configuration error: {0}")]
    ConfigError(anyhow::Error),
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

/// Failure envelope shared by every endpoint.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<FieldError>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, errors) = match self {
            AppError::Validation(errors) => (StatusCode::BAD_REQUEST, None, errors),
            AppError::BadRequest(err) => (StatusCode::BAD_REQUEST, Some(err.to_string()), vec![]),
            AppError::ServiceFailure { message, .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Some(message.to_string()),
                vec![],
            ),
            AppError::InternalError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Some("Internal server error".to_string()),
                vec![],
            ),
            AppError::ServiceUnavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                Some("Service unavailable".to_string()),
                vec![],
            ),
            AppError::ConfigError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Some("Configuration error".to_string()),
                vec![],
            ),
        };

        (
            status,
            Json(ErrorResponse {
                success: false,
                message,
                errors,
            }),
        )
            .into_response()
    }
}
