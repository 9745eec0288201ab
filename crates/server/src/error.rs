//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. Route handlers return `Result<T, AppError>` for
//! infrastructure failures only; business-rule outcomes (duplicate user,
//! uncovered region, expired trial, ...) are ordinary response values with
//! `success: false` and never pass through here.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::db::RepositoryError;

/// Application-level error type for the server.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// The request body could not be parsed or validated.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Body of an error response.
///
/// Matches the reference wire shape: client errors carry `message`,
/// server-side failures carry `error`.
#[derive(Debug, Serialize)]
struct ErrorBody {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(self, Self::Database(_) | Self::Internal(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let (status, body) = match self {
            Self::Database(_) | Self::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody {
                    success: false,
                    message: None,
                    // Don't expose internal error details to clients
                    error: Some("internal server error".to_string()),
                },
            ),
            Self::InvalidRequest(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    success: false,
                    message: Some(msg),
                    error: None,
                },
            ),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::InvalidRequest("missing field `telefone`".to_string());
        assert_eq!(err.to_string(), "Invalid request: missing field `telefone`");
    }

    #[test]
    fn test_status_codes() {
        let response = AppError::InvalidRequest("bad".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = AppError::Internal("boom".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = AppError::Database(RepositoryError::NotFound).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_internal_details_are_hidden() {
        let body = ErrorBody {
            success: false,
            message: None,
            error: Some("internal server error".to_string()),
        };
        let json = serde_json::to_string(&body).unwrap();
        assert_eq!(json, r#"{"success":false,"error":"internal server error"}"#);
    }
}
