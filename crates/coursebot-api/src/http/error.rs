//! Application error type mapping to HTTP status codes.
//!
//! Every failure body has the shape `{ "error": "<message>" }`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use coursebot_types::error::ChatError;

/// Text returned for any upstream completion failure. Upstream detail is only
/// ever logged.
pub const UPSTREAM_FAILURE_MESSAGE: &str = "Sorry, I encountered an error.";

/// Text returned when the session token is missing or unknown.
pub const INVALID_SESSION_MESSAGE: &str = "Invalid or missing session token";

#[derive(Debug)]
pub enum AppError {
    /// Missing or unknown session token.
    Unauthorized(String),
    /// Malformed request body.
    Validation(String),
    /// The completion API call failed.
    Upstream,
}

impl From<ChatError> for AppError {
    fn from(e: ChatError) -> Self {
        match e {
            ChatError::InvalidSession => AppError::Unauthorized(INVALID_SESSION_MESSAGE.to_string()),
            ChatError::InvalidMessage(msg) => AppError::Validation(msg),
            ChatError::Upstream => AppError::Upstream,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Upstream => (
                StatusCode::INTERNAL_SERVER_ERROR,
                UPSTREAM_FAILURE_MESSAGE.to_string(),
            ),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
