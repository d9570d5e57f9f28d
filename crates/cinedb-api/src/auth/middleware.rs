/// Authentication middleware for protecting routes
///
/// Extracts and validates bearer tokens from the Authorization header.
/// The token service is read from shared application state; nothing here
/// touches the environment or the database.
use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

use super::jwt::TokenError;
use crate::audit::{audit_log, extract_ip_address, extract_user_agent, AuditEvent};
use crate::error::ApiError;
use crate::state::AppState;

/// Authenticated identity extracted from a verified bearer token
///
/// Added to request extensions by the middleware and extracted in
/// handlers with `Extension<AuthenticatedUser>`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub email: String,
}

/// Authentication middleware errors
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Authorization header ('Bearer token') not found")]
    MissingAuthHeader,

    #[error("Authorization header is malformed")]
    InvalidAuthHeader,

    #[error(transparent)]
    InvalidToken(#[from] TokenError),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        (StatusCode::UNAUTHORIZED, Json(ApiError::new(message))).into_response()
    }
}

/// Middleware that requires a valid bearer token.
///
/// Rejects with 401 when the header is absent or malformed, or when
/// verification fails; the body message distinguishes expired from
/// invalid. On success the identity is attached to request extensions.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    let token = bearer_token(&request).ok_or_else(|| match request
        .headers()
        .get(header::AUTHORIZATION)
    {
        None => AuthError::MissingAuthHeader,
        Some(_) => AuthError::InvalidAuthHeader,
    })?;

    let claims = match state.tokens.verify_bearer(token) {
        Ok(claims) => claims,
        Err(e) => {
            audit_log(&AuditEvent::InvalidToken {
                reason: e.to_string(),
                ip_address: extract_ip_address(request.headers()),
                user_agent: extract_user_agent(request.headers()),
            });
            return Err(AuthError::InvalidToken(e));
        }
    };

    request.extensions_mut().insert(AuthenticatedUser {
        email: claims.email,
    });

    Ok(next.run(request).await)
}

/// Optional authentication middleware.
///
/// Attempts the same extraction and verification as [`require_auth`]
/// but proceeds silently without identity on any failure. Used where the
/// response shape depends on whether the caller owns the resource.
pub async fn optional_auth(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    if let Some(token) = bearer_token(&request) {
        if let Ok(claims) = state.tokens.verify_bearer(token) {
            request.extensions_mut().insert(AuthenticatedUser {
                email: claims.email,
            });
        }
    }

    next.run(request).await
}

fn bearer_token(request: &Request<Body>) -> Option<&str> {
    request
        .headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}
