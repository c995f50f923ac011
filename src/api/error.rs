use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::fmt;

use super::ApiResponse;
use super::validation::FieldError;
use crate::db::StoreError;

/// Request-boundary error taxonomy. Domain failures are typed below and
/// mapped to a status + envelope exactly once, in `into_response`; raw
/// storage errors never reach the client.
#[derive(Debug)]
pub enum ApiError {
    ValidationFailed(Vec<FieldError>),

    Duplicate(String),

    CapacityExceeded(String),

    NotFound(String),

    Authentication(String),

    /// Valid token, insufficient role. Reserved while `admin` is the only role.
    Forbidden(String),

    Dependency { service: String, message: String },

    Database(String),

    Internal(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::ValidationFailed(errors) => write!(f, "Validation failed ({})", errors.len()),
            ApiError::Duplicate(msg) => write!(f, "Duplicate: {}", msg),
            ApiError::CapacityExceeded(msg) => write!(f, "Capacity exceeded: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::Authentication(msg) => write!(f, "Authentication: {}", msg),
            ApiError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            ApiError::Dependency { service, message } => {
                write!(f, "{} error: {}", service, message)
            }
            ApiError::Database(msg) => write!(f, "Database error: {}", msg),
            ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::ValidationFailed(errors) => (
                StatusCode::BAD_REQUEST,
                ApiResponse::<()>::validation_failed(errors),
            ),
            ApiError::Duplicate(msg) => (StatusCode::CONFLICT, ApiResponse::<()>::failure(msg)),
            ApiError::CapacityExceeded(msg) => {
                (StatusCode::BAD_REQUEST, ApiResponse::<()>::failure(msg))
            }
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, ApiResponse::<()>::failure(msg)),
            ApiError::Authentication(msg) => {
                (StatusCode::UNAUTHORIZED, ApiResponse::<()>::failure(msg))
            }
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, ApiResponse::<()>::failure(msg)),
            ApiError::Dependency { service, message } => {
                tracing::warn!("{} error: {}", service, message);
                (
                    StatusCode::BAD_GATEWAY,
                    ApiResponse::<()>::failure(format!("{} is unavailable", service)),
                )
            }
            ApiError::Database(msg) => {
                tracing::error!("Database error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiResponse::<()>::failure("A database error occurred"),
                )
            }
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiResponse::<()>::failure("An internal error occurred"),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateEmail => {
                ApiError::Duplicate("An application with this email already exists".to_string())
            }
            StoreError::AlreadyRegistered => {
                ApiError::Duplicate("You are already registered for this event".to_string())
            }
            StoreError::EventFull => ApiError::CapacityExceeded(
                "This event has reached its maximum capacity".to_string(),
            ),
            StoreError::NotFound(what) => {
                ApiError::NotFound(format!("{} not found", capitalize(what)))
            }
            StoreError::UniqueViolation => {
                ApiError::Duplicate("A record with these details already exists".to_string())
            }
            StoreError::ForeignKeyViolation => {
                ApiError::Database("foreign key constraint violated".to_string())
            }
            StoreError::Internal(msg) => ApiError::Internal(msg),
            StoreError::Db(e) => ApiError::Database(e.to_string()),
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl ApiError {
    pub fn not_found(resource: &str) -> Self {
        ApiError::NotFound(format!("{} not found", resource))
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        ApiError::Internal(msg.into())
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    chars.next().map_or_else(String::new, |c| {
        c.to_uppercase().collect::<String>() + chars.as_str()
    })
}
