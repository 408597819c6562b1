// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};
use thiserror::Error;

use crate::api::format::FormatError;
use crate::auth::AuthError;
use crate::database::DatabaseError;

/// HTTP API error with appropriate status codes and client-friendly messages
#[derive(Debug, Error)]
pub enum ApiError {
    // 400 Bad Request
    #[error("Validation failed")]
    Validation(Vec<String>),

    // 401 Unauthorized
    #[error(transparent)]
    Auth(#[from] AuthError),

    // 404 Not Found
    #[error("{0}")]
    NotFound(String),

    // 405 Method Not Allowed
    #[error("{0}")]
    MethodNotAllowed(String),

    // 406 Not Acceptable
    #[error("{0}")]
    NotAcceptable(String),

    // 415 Unsupported Media Type
    #[error("{0}")]
    UnsupportedMediaType(String),

    // 500 Internal Server Error (record store)
    #[error("Database error")]
    Store { details: Option<String> },

    // 500 Internal Server Error
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Auth(AuthError::TokenGeneration(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Auth(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::NotAcceptable(_) => StatusCode::NOT_ACCEPTABLE,
            ApiError::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ApiError::Store { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get error code for client handling
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "VALIDATION_ERROR",
            ApiError::Auth(AuthError::TokenGeneration(_)) => "INTERNAL_SERVER_ERROR",
            ApiError::Auth(_) => "UNAUTHORIZED",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::MethodNotAllowed(_) => "METHOD_NOT_ALLOWED",
            ApiError::NotAcceptable(_) => "NOT_ACCEPTABLE",
            ApiError::UnsupportedMediaType(_) => "UNSUPPORTED_MEDIA_TYPE",
            ApiError::Store { .. } => "INTERNAL_SERVER_ERROR",
            ApiError::Internal(_) => "INTERNAL_SERVER_ERROR",
        }
    }

    /// Client-safe message. Token signing failures are not described to the caller.
    pub fn message(&self) -> String {
        match self {
            ApiError::Auth(AuthError::TokenGeneration(_)) => "Could not issue token".to_string(),
            ApiError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        let mut body = json!({
            "error": self.message(),
            "code": self.error_code(),
        });

        match self {
            ApiError::Validation(errors) => {
                body["errors"] = json!(errors);
            }
            ApiError::Store { details: Some(details) } => {
                body["details"] = json!(details);
            }
            _ => {}
        }

        body
    }
}

// Static constructor methods
impl ApiError {
    pub fn validation(errors: Vec<String>) -> Self {
        ApiError::Validation(errors)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn student_not_found() -> Self {
        ApiError::not_found("Student not found")
    }

    pub fn method_not_allowed(message: impl Into<String>) -> Self {
        ApiError::MethodNotAllowed(message.into())
    }

    pub fn not_acceptable(message: impl Into<String>) -> Self {
        ApiError::NotAcceptable(message.into())
    }

    pub fn unsupported_media_type(message: impl Into<String>) -> Self {
        ApiError::UnsupportedMediaType(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::Internal(message.into())
    }

    /// Wrap a store failure, keeping its diagnostic text only when `expose_details` is set.
    pub fn store(err: DatabaseError, expose_details: bool) -> Self {
        ApiError::Store {
            details: expose_details.then(|| err.to_string()),
        }
    }
}

impl From<FormatError> for ApiError {
    fn from(err: FormatError) -> Self {
        ApiError::internal(err.to_string())
    }
}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        match &self {
            ApiError::Internal(msg) => tracing::error!("Internal error: {}", msg),
            ApiError::Auth(AuthError::TokenGeneration(msg)) => {
                tracing::error!("Token generation failed: {}", msg)
            }
            _ => {}
        }

        (self.status_code(), Json(self.to_json())).into_response()
    }
}
