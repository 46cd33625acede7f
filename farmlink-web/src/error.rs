//! Error types for farmlink-web
//!
//! Maps the shared error taxonomy onto HTTP responses. Page flows redirect
//! unauthenticated callers to the login form; API-style endpoints answer
//! with JSON error bodies.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde_json::json;

use farmlink_common::Error;

/// API error type
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// No valid session; the caller is sent back to the login form
    #[error("Login required")]
    LoginRequired,

    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Shared taxonomy error
    #[error(transparent)]
    Common(#[from] Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::LoginRequired => Redirect::to("/login").into_response(),
            ApiError::BadRequest(message) => error_json(StatusCode::BAD_REQUEST, message),
            ApiError::Common(err) => common_error_response(err),
        }
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

fn error_json(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}

fn common_error_response(err: Error) -> Response {
    match err {
        Error::DuplicateEmail => error_json(StatusCode::CONFLICT, "Email already exists"),
        Error::InvalidCredentials => error_json(StatusCode::UNAUTHORIZED, "Invalid credentials"),
        Error::Unauthorized(reason) => {
            tracing::debug!(reason = %reason, "Rejected unauthorized request");
            error_json(StatusCode::FORBIDDEN, "Unauthorized")
        }
        Error::MissingFile(what) => {
            error_json(StatusCode::BAD_REQUEST, format!("Missing file: {}", what))
        }
        Error::AnalysisFailed(reason) => {
            error_json(StatusCode::BAD_GATEWAY, format!("AI Error: {}", reason))
        }
        Error::DeletionFailed(message) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "status": "error", "message": message })),
        )
            .into_response(),
        Error::NotFound(what) => error_json(StatusCode::NOT_FOUND, what),
        Error::InvalidInput(message) => error_json(StatusCode::BAD_REQUEST, message),
        err @ (Error::Database(_) | Error::Io(_) | Error::Config(_) | Error::Internal(_)) => {
            tracing::error!(error = %err, "Request failed");
            error_json(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }
    }
}
