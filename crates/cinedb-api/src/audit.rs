//! Security audit logging for authentication events
//!
//! Structured audit records for logins, registrations, token refreshes,
//! revocations, and rejected tokens. Events are logged at INFO level with
//! the "audit" target so they can be filtered and routed to security
//! monitoring separately from application logs.

use serde::{Deserialize, Serialize};
use tracing::info;

/// Security audit events for authentication and authorization
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum AuditEvent {
    /// Successful user login
    LoginSuccess {
        email: String,
        ip_address: Option<String>,
        user_agent: Option<String>,
    },

    /// Failed login attempt
    LoginFailure {
        email: String,
        reason: String,
        ip_address: Option<String>,
        user_agent: Option<String>,
    },

    /// Successful user registration
    RegistrationSuccess {
        email: String,
        ip_address: Option<String>,
        user_agent: Option<String>,
    },

    /// Token pair refresh
    TokenRefresh { email: String },

    /// Refresh token revoked via logout
    TokenRevoked { email: String },

    /// A presented token failed verification
    InvalidToken {
        reason: String,
        ip_address: Option<String>,
        user_agent: Option<String>,
    },
}

/// Emit an audit event to the "audit" log target.
///
/// Serialization failures are downgraded to a warning; audit logging
/// must never fail a request.
pub fn audit_log(event: &AuditEvent) {
    match serde_json::to_string(event) {
        Ok(json) => info!(target: "audit", event = %json, "audit event"),
        Err(e) => tracing::warn!("failed to serialize audit event: {e}"),
    }
}

/// Best-effort client IP extraction from forwarding headers
pub fn extract_ip_address(headers: &axum::http::HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .or_else(|| headers.get("x-real-ip"))
        .and_then(|v| v.to_str().ok())
        .map(|s| s.split(',').next().unwrap_or(s).trim().to_string())
}

/// User agent extraction
pub fn extract_user_agent(headers: &axum::http::HeaderMap) -> Option<String> {
    headers
        .get(axum::http::header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
}
