//! JWT token issuance and validation
//!
//! Implements JWT-based authentication with HMAC-SHA256 signing.
//! Bearer and refresh tokens carry the same claims but are signed with
//! distinct secrets, so a component holding one secret cannot forge the
//! other token type.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

use cinedb_core::AuthConfig;

/// JWT claims carried by both token types
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - the user's email address
    pub email: String,
    /// Issued at timestamp (Unix epoch)
    pub iat: u64,
    /// Expiration timestamp (Unix epoch)
    pub exp: u64,
}

/// Token generation and validation errors
///
/// The `Display` strings double as the client-facing messages: "expired"
/// and "invalid" are the only distinctions callers surface.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Failed to encode JWT: {0}")]
    Encoding(#[source] jsonwebtoken::errors::Error),

    #[error("JWT token has expired")]
    Expired,

    #[error("Invalid JWT token")]
    Invalid,

    #[error("System time error: {0}")]
    SystemTime(#[from] std::time::SystemTimeError),
}

/// Token service configuration
///
/// Built from [`AuthConfig`] and injected at construction; nothing in the
/// token path reads the environment.
#[derive(Debug, Clone)]
pub struct TokenConfig {
    /// HMAC secret for bearer (access) tokens
    pub access_secret: String,
    /// HMAC secret for refresh tokens
    pub refresh_secret: String,
    /// Default bearer token lifetime in seconds
    pub bearer_ttl_secs: u64,
    /// Default refresh token lifetime in seconds
    pub refresh_ttl_secs: u64,
}

impl From<&AuthConfig> for TokenConfig {
    fn from(config: &AuthConfig) -> Self {
        Self {
            access_secret: config.access_secret.clone(),
            refresh_secret: config.refresh_secret.clone(),
            bearer_ttl_secs: config.bearer_ttl_secs,
            refresh_ttl_secs: config.refresh_ttl_secs,
        }
    }
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self::from(&AuthConfig::default())
    }
}

/// A signed token together with the lifetime it was issued for
#[derive(Debug, Clone)]
pub struct SignedToken {
    pub token: String,
    pub expires_in: u64,
}

/// A freshly issued bearer/refresh pair
///
/// Ephemeral - nothing is persisted at issuance time.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub bearer: SignedToken,
    pub refresh: SignedToken,
}

/// Issues and verifies signed bearer/refresh token pairs.
///
/// Issuance and refresh are stateless; revocation lives in the
/// [`RevokedTokenRepository`](super::repository::RevokedTokenRepository)
/// and is only consulted by logout.
#[derive(Debug, Clone)]
pub struct TokenService {
    config: TokenConfig,
}

impl TokenService {
    /// Create a new token service with the given configuration
    pub fn new(config: TokenConfig) -> Self {
        Self { config }
    }

    /// Issue a signed bearer/refresh pair for an authenticated user.
    ///
    /// Callers may override both lifetimes; the defaults come from
    /// configuration. No side effects beyond signing - only called after
    /// password verification (login) or refresh verification succeeds.
    pub fn issue(
        &self,
        email: &str,
        bearer_ttl: Option<u64>,
        refresh_ttl: Option<u64>,
    ) -> Result<TokenPair, TokenError> {
        let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();
        let bearer_ttl = bearer_ttl.unwrap_or(self.config.bearer_ttl_secs);
        let refresh_ttl = refresh_ttl.unwrap_or(self.config.refresh_ttl_secs);

        let bearer = sign(&self.config.access_secret, email, now, bearer_ttl)?;
        let refresh = sign(&self.config.refresh_secret, email, now, refresh_ttl)?;

        Ok(TokenPair {
            bearer: SignedToken {
                token: bearer,
                expires_in: bearer_ttl,
            },
            refresh: SignedToken {
                token: refresh,
                expires_in: refresh_ttl,
            },
        })
    }

    /// Validate a bearer token and extract its claims.
    ///
    /// Checks signature and expiry only. Bearer tokens are not revocable
    /// in this design, so the revocation list is never consulted here.
    pub fn verify_bearer(&self, token: &str) -> Result<Claims, TokenError> {
        verify(&self.config.access_secret, token)
    }

    /// Validate a refresh token and extract its claims.
    ///
    /// Signature and expiry only - the revocation list is a separate
    /// concern owned by the logout path.
    pub fn verify_refresh(&self, token: &str) -> Result<Claims, TokenError> {
        verify(&self.config.refresh_secret, token)
    }
}

fn sign(secret: &str, email: &str, now: u64, ttl: u64) -> Result<String, TokenError> {
    let claims = Claims {
        email: email.to_string(),
        iat: now,
        exp: now + ttl,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(TokenError::Encoding)
}

fn verify(secret: &str, token: &str) -> Result<Claims, TokenError> {
    let mut validation = Validation::new(Algorithm::HS256);
    // Expiry is an exact instant, not a window
    validation.leeway = 0;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::Invalid,
    })?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new(TokenConfig {
            access_secret: "test-access-secret".to_string(),
            refresh_secret: "test-refresh-secret".to_string(),
            bearer_ttl_secs: 600,
            refresh_ttl_secs: 86_400,
        })
    }

    #[test]
    fn test_issue_and_verify_pair() {
        let service = service();
        let pair = service.issue("a@b.com", None, None).expect("issue failed");

        assert_eq!(pair.bearer.expires_in, 600);
        assert_eq!(pair.refresh.expires_in, 86_400);

        let claims = service
            .verify_bearer(&pair.bearer.token)
            .expect("bearer failed to verify");
        assert_eq!(claims.email, "a@b.com");
        assert_eq!(claims.exp, claims.iat + 600);

        let claims = service
            .verify_refresh(&pair.refresh.token)
            .expect("refresh failed to verify");
        assert_eq!(claims.email, "a@b.com");
    }

    #[test]
    fn test_ttl_overrides() {
        let service = service();
        let pair = service
            .issue("a@b.com", Some(60), Some(120))
            .expect("issue failed");

        assert_eq!(pair.bearer.expires_in, 60);
        assert_eq!(pair.refresh.expires_in, 120);
    }

    #[test]
    fn test_token_types_do_not_cross_verify() {
        let service = service();
        let pair = service.issue("a@b.com", None, None).unwrap();

        // A bearer token must not pass refresh verification and vice versa
        assert!(matches!(
            service.verify_refresh(&pair.bearer.token),
            Err(TokenError::Invalid)
        ));
        assert!(matches!(
            service.verify_bearer(&pair.refresh.token),
            Err(TokenError::Invalid)
        ));
    }

    #[test]
    fn test_invalid_token() {
        let service = service();
        assert!(matches!(
            service.verify_bearer("not.a.token"),
            Err(TokenError::Invalid)
        ));
    }

    #[test]
    fn test_wrong_secret() {
        let service = service();
        let other = TokenService::new(TokenConfig {
            access_secret: "different-secret".to_string(),
            ..TokenConfig::default()
        });

        let pair = service.issue("a@b.com", None, None).unwrap();
        assert!(matches!(
            other.verify_bearer(&pair.bearer.token),
            Err(TokenError::Invalid)
        ));
    }

    #[test]
    fn test_expired_token() {
        let service = service();
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs();

        // Hand-sign a token that expired an hour ago
        let claims = Claims {
            email: "a@b.com".to_string(),
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret("test-access-secret".as_bytes()),
        )
        .unwrap();

        assert!(matches!(
            service.verify_bearer(&token),
            Err(TokenError::Expired)
        ));
    }

    #[test]
    fn test_reissue_leaves_original_valid() {
        let service = service();
        let pair = service.issue("a@b.com", None, None).unwrap();

        let claims = service.verify_refresh(&pair.refresh.token).unwrap();
        let renewed = service.issue(&claims.email, Some(30), None).unwrap();

        assert_eq!(renewed.bearer.expires_in, 30);
        assert_eq!(
            service.verify_bearer(&renewed.bearer.token).unwrap().email,
            "a@b.com"
        );

        // Issuing a new pair never invalidates the presented token
        assert!(service.verify_refresh(&pair.refresh.token).is_ok());
    }
}
