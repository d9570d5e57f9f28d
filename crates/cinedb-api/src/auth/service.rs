//! Authentication service layer
//!
//! Business logic for registration, login, token refresh, logout, and
//! profile access. Ties the token service, the user repository, and the
//! revocation list together; handlers stay thin.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use utoipa::ToSchema;

use super::jwt::{TokenPair, TokenService};
use super::models::{OwnerProfile, ProfileView};
use super::password::{hash_password, verify_password};
use super::repository::{RevokedTokenRepository, UserRepository};
use crate::audit::{audit_log, AuditEvent};
use crate::error::AppError;

/// User registration request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// User login request
///
/// Token lifetimes may be overridden per login; defaults come from
/// configuration.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    #[serde(rename = "bearerExpiresInSeconds")]
    pub bearer_expires_in_seconds: Option<u64>,
    #[serde(rename = "refreshExpiresInSeconds")]
    pub refresh_expires_in_seconds: Option<u64>,
}

/// Token refresh request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RefreshRequest {
    #[serde(rename = "refreshToken")]
    pub refresh_token: Option<String>,
    #[serde(rename = "bearerExpiresInSeconds")]
    pub bearer_expires_in_seconds: Option<u64>,
    #[serde(rename = "refreshExpiresInSeconds")]
    pub refresh_expires_in_seconds: Option<u64>,
}

/// Logout request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LogoutRequest {
    #[serde(rename = "refreshToken")]
    pub refresh_token: Option<String>,
}

/// Profile update request; all four fields are required
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateProfileRequest {
    #[serde(rename = "firstName")]
    pub first_name: Option<String>,
    #[serde(rename = "lastName")]
    pub last_name: Option<String>,
    pub dob: Option<String>,
    pub address: Option<String>,
}

/// One signed token on the wire
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenBundle {
    pub token: String,
    pub token_type: String,
    pub expires_in: u64,
}

/// Authentication response carrying a bearer/refresh pair
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    #[serde(rename = "bearerToken")]
    pub bearer_token: TokenBundle,
    #[serde(rename = "refreshToken")]
    pub refresh_token: TokenBundle,
}

impl From<TokenPair> for AuthResponse {
    fn from(pair: TokenPair) -> Self {
        Self {
            bearer_token: TokenBundle {
                token: pair.bearer.token,
                token_type: "Bearer".to_string(),
                expires_in: pair.bearer.expires_in,
            },
            refresh_token: TokenBundle {
                token: pair.refresh.token,
                token_type: "Refresh".to_string(),
                expires_in: pair.refresh.expires_in,
            },
        }
    }
}

const INCOMPLETE_CREDENTIALS: &str = "Request body incomplete - email and password needed";
const INCOMPLETE_REFRESH: &str = "Request body incomplete, refresh token required";
const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Authentication service
#[derive(Debug, Clone)]
pub struct AuthService {
    users: UserRepository,
    revoked: RevokedTokenRepository,
    tokens: TokenService,
}

impl AuthService {
    /// Create a new authentication service over a shared pool
    pub fn new(pool: PgPool, tokens: TokenService) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            revoked: RevokedTokenRepository::new(pool),
            tokens,
        }
    }

    /// Register a new user.
    ///
    /// Returns the registered email. Duplicate registration is a
    /// conflict; there are no password composition rules.
    pub async fn register(&self, request: RegisterRequest) -> Result<String, AppError> {
        let (email, password) = require_credentials(&request.email, &request.password)?;

        let password_hash = hash_password(password)?;
        self.users.create(email, &password_hash).await?;

        Ok(email.to_string())
    }

    /// Login with email and password.
    ///
    /// Unknown email and wrong password are deliberately
    /// indistinguishable in the response.
    pub async fn login(&self, request: LoginRequest) -> Result<AuthResponse, AppError> {
        let (email, password) = require_credentials(&request.email, &request.password)?;

        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::Unauthorized(INVALID_CREDENTIALS.to_string()))?;

        let password_valid = verify_password(password, &user.password_hash)?;
        if !password_valid {
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        let pair = self.tokens.issue(
            email,
            request.bearer_expires_in_seconds,
            request.refresh_expires_in_seconds,
        )?;

        Ok(AuthResponse::from(pair))
    }

    /// Revoke a refresh token.
    ///
    /// Order matters: the revocation list is checked first so that an
    /// already-revoked token is rejected as invalid even if it would
    /// still verify; then signature/expiry; then the insert. This is the
    /// only state-mutating token operation.
    pub async fn logout(&self, request: LogoutRequest) -> Result<(), AppError> {
        let token = require_refresh_token(&request.refresh_token)?;

        if self.revoked.contains(token).await? {
            return Err(AppError::TokenInvalid);
        }

        let claims = self.tokens.verify_refresh(token)?;

        self.revoked.insert(token).await?;
        audit_log(&AuditEvent::TokenRevoked {
            email: claims.email,
        });

        Ok(())
    }

    /// Fetch a profile, shaped by whether `viewer` owns it
    pub async fn profile(
        &self,
        email: &str,
        viewer: Option<&str>,
    ) -> Result<ProfileView, AppError> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::NotFound("User".to_string()))?;

        Ok(ProfileView::for_viewer(&user, viewer))
    }

    /// Update a profile. Only the owner may write; all four fields are
    /// required and dob must be a real date in the past.
    pub async fn update_profile(
        &self,
        email: &str,
        viewer: &str,
        request: UpdateProfileRequest,
    ) -> Result<OwnerProfile, AppError> {
        if viewer != email {
            return Err(AppError::Forbidden);
        }

        let (first_name, last_name, dob, address) = match (
            &request.first_name,
            &request.last_name,
            &request.dob,
            &request.address,
        ) {
            (Some(f), Some(l), Some(d), Some(a)) => (f, l, d, a),
            _ => {
                return Err(AppError::BadRequest(
                    "Request body incomplete: firstName, lastName, dob and address are required."
                        .to_string(),
                ))
            }
        };

        let dob = validate_dob(dob)?;

        // Existence check keeps 404 distinct from the forbidden case
        if self.users.find_by_email(email).await?.is_none() {
            return Err(AppError::NotFound("User".to_string()));
        }

        self.users
            .update_profile(email, first_name, last_name, dob, address)
            .await?;

        Ok(OwnerProfile {
            email: email.to_string(),
            first_name: Some(first_name.clone()),
            last_name: Some(last_name.clone()),
            dob: Some(dob.format("%Y-%m-%d").to_string()),
            address: Some(address.clone()),
        })
    }
}

/// Exchange a refresh token for a new pair.
///
/// Verifies signature and expiry only: the revocation list is not
/// consulted and the presented token is not revoked, so it remains
/// independently valid until its own expiry. Needs no datastore, hence a
/// free function over the token service alone.
pub fn refresh_tokens(
    tokens: &TokenService,
    request: RefreshRequest,
) -> Result<AuthResponse, AppError> {
    let token = require_refresh_token(&request.refresh_token)?;

    let claims = tokens.verify_refresh(token)?;
    let pair = tokens.issue(
        &claims.email,
        request.bearer_expires_in_seconds,
        request.refresh_expires_in_seconds,
    )?;

    audit_log(&AuditEvent::TokenRefresh {
        email: claims.email,
    });

    Ok(AuthResponse::from(pair))
}

fn require_credentials<'a>(
    email: &'a Option<String>,
    password: &'a Option<String>,
) -> Result<(&'a str, &'a str), AppError> {
    match (present(email), present(password)) {
        (Some(email), Some(password)) => Ok((email, password)),
        _ => Err(AppError::BadRequest(INCOMPLETE_CREDENTIALS.to_string())),
    }
}

fn require_refresh_token(token: &Option<String>) -> Result<&str, AppError> {
    present(token).ok_or_else(|| AppError::BadRequest(INCOMPLETE_REFRESH.to_string()))
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Validate a date of birth: `YYYY-MM-DD`, a real calendar date, not in
/// the future.
fn validate_dob(dob: &str) -> Result<NaiveDate, AppError> {
    let well_formed = dob.len() == 10
        && dob.chars().enumerate().all(|(i, c)| match i {
            4 | 7 => c == '-',
            _ => c.is_ascii_digit(),
        });

    let parsed = if well_formed {
        NaiveDate::parse_from_str(dob, "%Y-%m-%d").ok()
    } else {
        None
    };

    let date = parsed.ok_or_else(|| {
        AppError::BadRequest(
            "Invalid input: dob must be a real date in format YYYY-MM-DD.".to_string(),
        )
    })?;

    if date > Utc::now().date_naive() {
        return Err(AppError::BadRequest(
            "Invalid input: dob must be a date in the past.".to_string(),
        ));
    }

    Ok(date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::TokenConfig;

    #[test]
    fn test_require_credentials() {
        assert!(require_credentials(&Some("a@b.com".into()), &Some("pw".into())).is_ok());

        for (email, password) in [
            (None, Some("pw".to_string())),
            (Some("a@b.com".to_string()), None),
            (Some("".to_string()), Some("pw".to_string())),
            (Some("a@b.com".to_string()), Some("   ".to_string())),
        ] {
            assert!(matches!(
                require_credentials(&email, &password),
                Err(AppError::BadRequest(_))
            ));
        }
    }

    #[test]
    fn test_require_refresh_token() {
        assert!(require_refresh_token(&Some("token".into())).is_ok());
        assert!(matches!(
            require_refresh_token(&None),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            require_refresh_token(&Some("  ".into())),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_validate_dob_accepts_real_past_dates() {
        assert_eq!(
            validate_dob("1987-06-05").unwrap(),
            NaiveDate::from_ymd_opt(1987, 6, 5).unwrap()
        );
    }

    #[test]
    fn test_validate_dob_rejects_bad_format() {
        for dob in ["1987/06/05", "05-06-1987", "1987-6-5", "yesterday", ""] {
            let err = validate_dob(dob).unwrap_err();
            assert!(matches!(err, AppError::BadRequest(msg)
                if msg.contains("real date in format YYYY-MM-DD")));
        }
    }

    #[test]
    fn test_validate_dob_rejects_impossible_dates() {
        for dob in ["2023-02-30", "2023-13-01", "2023-00-10"] {
            assert!(validate_dob(dob).is_err());
        }
    }

    #[test]
    fn test_validate_dob_rejects_future_dates() {
        let err = validate_dob("2999-01-01").unwrap_err();
        assert!(matches!(err, AppError::BadRequest(msg)
            if msg.contains("date in the past")));
    }

    #[test]
    fn test_refresh_tokens_issues_new_pair() {
        let tokens = TokenService::new(TokenConfig::default());
        let pair = tokens.issue("a@b.com", None, None).unwrap();

        let response = refresh_tokens(
            &tokens,
            RefreshRequest {
                refresh_token: Some(pair.refresh.token.clone()),
                bearer_expires_in_seconds: Some(42),
                refresh_expires_in_seconds: None,
            },
        )
        .expect("refresh failed");

        assert_eq!(response.bearer_token.expires_in, 42);
        assert_eq!(
            tokens
                .verify_bearer(&response.bearer_token.token)
                .unwrap()
                .email,
            "a@b.com"
        );

        // The presented token is not revoked by refresh
        assert!(tokens.verify_refresh(&pair.refresh.token).is_ok());
    }

    #[test]
    fn test_refresh_tokens_rejects_missing_and_garbage() {
        let tokens = TokenService::new(TokenConfig::default());

        let missing = refresh_tokens(
            &tokens,
            RefreshRequest {
                refresh_token: None,
                bearer_expires_in_seconds: None,
                refresh_expires_in_seconds: None,
            },
        );
        assert!(matches!(missing, Err(AppError::BadRequest(_))));

        let garbage = refresh_tokens(
            &tokens,
            RefreshRequest {
                refresh_token: Some("not.a.jwt".to_string()),
                bearer_expires_in_seconds: None,
                refresh_expires_in_seconds: None,
            },
        );
        assert!(matches!(garbage, Err(AppError::TokenInvalid)));
    }

    #[test]
    fn test_auth_response_wire_shape() {
        let service = TokenService::new(TokenConfig::default());
        let pair = service.issue("a@b.com", None, None).unwrap();
        let response = AuthResponse::from(pair);

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["bearerToken"]["token_type"], "Bearer");
        assert_eq!(json["bearerToken"]["expires_in"], 600);
        assert_eq!(json["refreshToken"]["token_type"], "Refresh");
        assert_eq!(json["refreshToken"]["expires_in"], 86_400);
    }
}
