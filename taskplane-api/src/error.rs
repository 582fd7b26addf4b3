/// Error handling for the API server
///
/// This module provides a unified error type that maps to HTTP responses.
/// Handlers return `Result<T, ApiError>` which converts to status-coded
/// JSON bodies automatically.
///
/// Login deliberately reports an unknown email and a wrong password the
/// same way (NotFound), so responses do not reveal which check failed.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Bad request (400) - e.g. duplicate registration
    BadRequest(String),

    /// Unauthorized (401) - missing or invalid tokens
    Unauthorized(String),

    /// Not found (404) - unknown email, failed credential check
    NotFound(String),

    /// Unprocessable entity (422) - request validation failures
    ValidationError(Vec<ValidationErrorDetail>),

    /// Internal server error (500)
    InternalError(String),
}

/// Validation error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationErrorDetail {
    /// Field that failed validation
    pub field: String,

    /// Error message
    pub message: String,
}

/// Error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code (e.g. "bad_request", "unauthorized")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Optional validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<ValidationErrorDetail>>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::ValidationError(errors) => {
                write!(f, "Validation failed: {} errors", errors.len())
            }
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message, details) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg, None),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg, None),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),
            ApiError::ValidationError(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "validation_error",
                "Request validation failed".to_string(),
                Some(errors),
            ),
            ApiError::InternalError(msg) => {
                // Log internal errors but don't expose details to clients
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_code.to_string(),
            message,
            details,
        });

        (status, body).into_response()
    }
}

/// Convert sqlx errors to API errors
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".to_string()),
            sqlx::Error::Database(db_err) => {
                // A unique-email violation means a concurrent registration
                // won the race; surface it the same as the pre-check (400).
                if let Some(constraint) = db_err.constraint() {
                    if constraint.contains("email") {
                        return ApiError::BadRequest("User already exists".to_string());
                    }
                }

                ApiError::InternalError(format!("Database error: {}", db_err))
            }
            _ => ApiError::InternalError(format!("Database error: {}", err)),
        }
    }
}

/// Convert request-validation errors to API errors
impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        let errors: Vec<ValidationErrorDetail> = err
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| ValidationErrorDetail {
                    field: field.to_string(),
                    message: error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| "Validation failed".to_string()),
                })
            })
            .collect();

        ApiError::ValidationError(errors)
    }
}

/// Convert auth-middleware errors to API errors
impl From<taskplane_shared::auth::middleware::AuthError> for ApiError {
    fn from(err: taskplane_shared::auth::middleware::AuthError) -> Self {
        use taskplane_shared::auth::middleware::AuthError;

        match err {
            AuthError::MissingCredentials => {
                ApiError::Unauthorized("Missing credentials".to_string())
            }
            AuthError::InvalidFormat(msg) => ApiError::BadRequest(msg),
            AuthError::InvalidToken(msg) => ApiError::Unauthorized(msg),
        }
    }
}

/// Convert password errors to API errors
impl From<taskplane_shared::auth::password::PasswordError> for ApiError {
    fn from(err: taskplane_shared::auth::password::PasswordError) -> Self {
        ApiError::InternalError(format!("Password operation failed: {}", err))
    }
}

/// Convert JWT errors to API errors
impl From<taskplane_shared::auth::jwt::JwtError> for ApiError {
    fn from(err: taskplane_shared::auth::jwt::JwtError) -> Self {
        use taskplane_shared::auth::jwt::JwtError;

        match err {
            JwtError::Expired => ApiError::Unauthorized("Token expired".to_string()),
            JwtError::CreateError(msg) => {
                ApiError::InternalError(format!("Token creation failed: {}", msg))
            }
            _ => ApiError::Unauthorized(format!("Invalid token: {}", err)),
        }
    }
}
