//! API error handling
//!
//! Every failing endpoint answers with the same envelope:
//! `{"error": true, "message": "..."}`. Expired and invalid tokens are
//! distinguished only by message; clients treat both by forcing re-login.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::jwt::TokenError;
use crate::auth::password::PasswordError;
use crate::auth::repository::RepositoryError;

/// API error response envelope
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    pub error: bool,
    pub message: String,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: true,
            message: message.into(),
        }
    }
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    Unauthorized(String),
    TokenExpired,
    TokenInvalid,
    Forbidden,
    NotFound(String),
    Conflict(String),
    Database(String),
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, ApiError::new(msg)),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, ApiError::new(msg)),
            AppError::TokenExpired => (
                StatusCode::UNAUTHORIZED,
                ApiError::new("JWT token has expired"),
            ),
            AppError::TokenInvalid => {
                (StatusCode::UNAUTHORIZED, ApiError::new("Invalid JWT token"))
            }
            AppError::Forbidden => (StatusCode::FORBIDDEN, ApiError::new("Forbidden")),
            AppError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                ApiError::new(format!("{resource} not found")),
            ),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, ApiError::new(msg)),
            AppError::Database(detail) => {
                // Never leak datastore detail to the client
                tracing::error!("database error: {detail}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiError::new("Database error"),
                )
            }
            AppError::Internal(detail) => {
                tracing::error!("internal error: {detail}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiError::new("Internal server error"),
                )
            }
        };

        (status, Json(error)).into_response()
    }
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired => AppError::TokenExpired,
            TokenError::Invalid => AppError::TokenInvalid,
            TokenError::Encoding(e) => AppError::Internal(format!("Failed to sign token: {e}")),
            TokenError::SystemTime(e) => AppError::Internal(format!("System time error: {e}")),
        }
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Database(msg) => AppError::Database(msg),
            RepositoryError::UserNotFound => AppError::NotFound("User".to_string()),
            RepositoryError::EmailAlreadyExists => {
                AppError::Conflict("User already exists".to_string())
            }
        }
    }
}

impl From<PasswordError> for AppError {
    fn from(err: PasswordError) -> Self {
        AppError::Internal(format!("Password hashing error: {err}"))
    }
}

impl From<cinedb_core::CoreError> for AppError {
    fn from(err: cinedb_core::CoreError) -> Self {
        use cinedb_core::CoreError;

        match err {
            CoreError::NotFound(resource) => AppError::NotFound(resource),
            CoreError::Validation(msg) => AppError::BadRequest(msg),
            CoreError::Database(msg) => AppError::Database(msg),
            CoreError::Config(msg) => AppError::Internal(format!("Configuration error: {msg}")),
            CoreError::Other(err) => AppError::Internal(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_envelope_serialization() {
        let error = ApiError::new("Invalid JWT token");
        let json = serde_json::to_value(&error).unwrap();

        assert_eq!(json["error"], true);
        assert_eq!(json["message"], "Invalid JWT token");
    }

    #[test]
    fn test_token_error_mapping() {
        assert!(matches!(
            AppError::from(TokenError::Expired),
            AppError::TokenExpired
        ));
        assert!(matches!(
            AppError::from(TokenError::Invalid),
            AppError::TokenInvalid
        ));
    }

    #[test]
    fn test_repository_error_mapping() {
        assert!(matches!(
            AppError::from(RepositoryError::EmailAlreadyExists),
            AppError::Conflict(_)
        ));
        assert!(matches!(
            AppError::from(RepositoryError::UserNotFound),
            AppError::NotFound(_)
        ));
        assert!(matches!(
            AppError::from(RepositoryError::Database("boom".to_string())),
            AppError::Database(_)
        ));
    }

    #[test]
    fn test_status_codes() {
        let cases = [
            (AppError::BadRequest("x".into()), StatusCode::BAD_REQUEST),
            (AppError::TokenExpired, StatusCode::UNAUTHORIZED),
            (AppError::TokenInvalid, StatusCode::UNAUTHORIZED),
            (AppError::Forbidden, StatusCode::FORBIDDEN),
            (AppError::NotFound("Movie".into()), StatusCode::NOT_FOUND),
            (AppError::Conflict("x".into()), StatusCode::CONFLICT),
            (
                AppError::Database("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }
}
