//! Authentication API handlers
//!
//! HTTP endpoints for registration, login, token refresh, and logout.
//! Refresh and logout take the refresh token in the body, so neither
//! requires a bearer token.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::audit::{audit_log, extract_ip_address, extract_user_agent, AuditEvent};
use crate::auth::{LoginRequest, LogoutRequest, RefreshRequest, RegisterRequest};
use crate::error::AppError;
use crate::state::AppState;

/// Registration response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegisterResponse {
    pub message: String,
}

/// Logout response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LogoutResponse {
    pub error: bool,
    pub message: String,
}

/// Register a new user account
///
/// # Responses
///
/// * `201 Created` - User successfully registered
/// * `400 Bad Request` - Email or password missing
/// * `409 Conflict` - Email already registered
#[utoipa::path(
    post,
    path = "/user/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created", body = RegisterResponse),
        (status = 400, description = "Incomplete request body", body = crate::error::ApiError),
        (status = 409, description = "User already exists", body = crate::error::ApiError),
        (status = 500, description = "Internal server error", body = crate::error::ApiError),
    )
)]
pub async fn register_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    let auth = state.auth();

    let email = auth.register(request).await?;

    audit_log(&AuditEvent::RegistrationSuccess {
        email,
        ip_address: extract_ip_address(&headers),
        user_agent: extract_user_agent(&headers),
    });

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User created".to_string(),
        }),
    ))
}

/// Login with email and password
///
/// Issues a bearer/refresh token pair. Lifetimes may be overridden via
/// `bearerExpiresInSeconds` / `refreshExpiresInSeconds`.
///
/// # Responses
///
/// * `200 OK` - Token pair issued
/// * `400 Bad Request` - Email or password missing
/// * `401 Unauthorized` - Invalid credentials
#[utoipa::path(
    post,
    path = "/user/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = crate::auth::AuthResponse),
        (status = 400, description = "Incomplete request body", body = crate::error::ApiError),
        (status = 401, description = "Invalid credentials", body = crate::error::ApiError),
        (status = 500, description = "Internal server error", body = crate::error::ApiError),
    )
)]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let auth = state.auth();

    let email = request.email.clone().unwrap_or_default();
    let ip_address = extract_ip_address(&headers);
    let user_agent = extract_user_agent(&headers);

    match auth.login(request).await {
        Ok(response) => {
            audit_log(&AuditEvent::LoginSuccess {
                email,
                ip_address,
                user_agent,
            });
            Ok(Json(response))
        }
        Err(e) => {
            if matches!(e, AppError::Unauthorized(_)) {
                audit_log(&AuditEvent::LoginFailure {
                    email,
                    reason: "Invalid credentials".to_string(),
                    ip_address,
                    user_agent,
                });
            }
            Err(e)
        }
    }
}

/// Exchange a refresh token for a new token pair
///
/// The presented token is not revoked and the revocation list is not
/// consulted; a refreshed token stays valid until its own expiry.
///
/// # Responses
///
/// * `200 OK` - New pair issued
/// * `400 Bad Request` - Refresh token missing
/// * `401 Unauthorized` - Token expired or invalid
#[utoipa::path(
    post,
    path = "/user/refresh",
    tag = "auth",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "Token refreshed", body = crate::auth::AuthResponse),
        (status = 400, description = "Refresh token missing", body = crate::error::ApiError),
        (status = 401, description = "Expired or invalid token", body = crate::error::ApiError),
    )
)]
pub async fn refresh_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RefreshRequest>,
) -> Result<impl IntoResponse, AppError> {
    // Refresh never touches the datastore
    let response = crate::auth::service::refresh_tokens(&state.tokens, request)?;

    Ok(Json(response))
}

/// Revoke a refresh token
///
/// The only state-mutating token operation: the token lands on the
/// revocation list and is never accepted again.
///
/// # Responses
///
/// * `200 OK` - Token invalidated
/// * `400 Bad Request` - Refresh token missing
/// * `401 Unauthorized` - Token expired, invalid, or already revoked
#[utoipa::path(
    post,
    path = "/user/logout",
    tag = "auth",
    request_body = LogoutRequest,
    responses(
        (status = 200, description = "Token invalidated", body = LogoutResponse),
        (status = 400, description = "Refresh token missing", body = crate::error::ApiError),
        (status = 401, description = "Expired, invalid, or revoked token", body = crate::error::ApiError),
        (status = 500, description = "Internal server error", body = crate::error::ApiError),
    )
)]
pub async fn logout_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LogoutRequest>,
) -> Result<impl IntoResponse, AppError> {
    let auth = state.auth();

    auth.logout(request).await?;

    Ok(Json(LogoutResponse {
        error: false,
        message: "Token successfully invalidated".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logout_response_serialization() {
        let response = LogoutResponse {
            error: false,
            message: "Token successfully invalidated".to_string(),
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["error"], false);
        assert_eq!(json["message"], "Token successfully invalidated");
    }

    #[test]
    fn test_register_response_serialization() {
        let response = RegisterResponse {
            message: "User created".to_string(),
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("User created"));
    }
}
