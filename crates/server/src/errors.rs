use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use common::types::ErrorBody;
use service::account::AccountError;
use thiserror::Error;
use tracing::{debug, error};

/// Error returned by handlers and the auth middleware; renders as
/// `{"message": ...}` with `status`.
#[derive(Debug, Error)]
#[error("{status}: {message}")]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    }
}

impl From<AccountError> for ApiError {
    fn from(e: AccountError) -> Self {
        let (status, message) = match &e {
            AccountError::InvalidEmail => (StatusCode::BAD_REQUEST, "Invalid email format".to_string()),
            AccountError::WeakPassword => {
                (StatusCode::BAD_REQUEST, "Password does not meet security requirements".to_string())
            }
            AccountError::InvalidName(reason) => (StatusCode::BAD_REQUEST, format!("Invalid name: {reason}")),
            AccountError::EmailExists => (StatusCode::CONFLICT, "Email already exists".to_string()),
            AccountError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "Invalid credentials".to_string()),
            AccountError::InvalidToken => (StatusCode::UNAUTHORIZED, "Invalid or expired token".to_string()),
            AccountError::NotFound => (StatusCode::NOT_FOUND, "User not found".to_string()),
            AccountError::Hashing(_) | AccountError::Token(_) | AccountError::Storage(_) => {
                error!(code = e.code(), error = %e, "request failed");
                return Self::internal();
            }
        };
        debug!(code = e.code(), error = %e, "request rejected");
        Self { status, message }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        debug!(reason = %rejection.body_text(), "request body rejected");
        Self::new(StatusCode::BAD_REQUEST, "Invalid request format")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody::new(self.message))).into_response()
    }
}
