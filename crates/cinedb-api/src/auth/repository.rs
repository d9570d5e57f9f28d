//! Authentication repositories over PostgreSQL
//!
//! Database access layer for the two auth-owned tables:
//! - `users`: credential and profile records
//! - `revoked_tokens`: refresh tokens invalidated by logout
//!
//! Both repositories are thin wrappers over a shared `PgPool`.

use chrono::NaiveDate;
use sqlx::PgPool;
use thiserror::Error;

use super::models::User;

/// Repository errors
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("User not found")]
    UserNotFound,

    #[error("Email already exists")]
    EmailAlreadyExists,
}

/// User repository
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new user record.
    ///
    /// The email uniqueness check rides on the primary key: a conflicting
    /// insert affects zero rows and reports `EmailAlreadyExists`.
    pub async fn create(&self, email: &str, password_hash: &str) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (email, password_hash, created_at, updated_at)
            VALUES ($1, $2, NOW(), NOW())
            ON CONFLICT (email) DO NOTHING
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(format!("Failed to create user: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::EmailAlreadyExists);
        }

        Ok(())
    }

    /// Find a user by email
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT email, password_hash, first_name, last_name, dob, address,
                   created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(format!("Failed to fetch user: {e}")))
    }

    /// Replace the profile fields of an existing user
    pub async fn update_profile(
        &self,
        email: &str,
        first_name: &str,
        last_name: &str,
        dob: NaiveDate,
        address: &str,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET first_name = $2, last_name = $3, dob = $4, address = $5,
                updated_at = NOW()
            WHERE email = $1
            "#,
        )
        .bind(email)
        .bind(first_name)
        .bind(last_name)
        .bind(dob)
        .bind(address)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(format!("Failed to update profile: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::UserNotFound);
        }

        Ok(())
    }
}

/// Revocation list repository
///
/// Rows are inserted on logout and never mutated or pruned. A token
/// present here must never again be accepted, regardless of its own
/// expiry state.
#[derive(Debug, Clone)]
pub struct RevokedTokenRepository {
    pool: PgPool,
}

impl RevokedTokenRepository {
    /// Create a new revocation list repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Check whether a refresh token has been revoked
    pub async fn contains(&self, token: &str) -> Result<bool, RepositoryError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM revoked_tokens WHERE token = $1")
                .bind(token)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    RepositoryError::Database(format!("Failed to check revocation list: {e}"))
                })?;

        Ok(count > 0)
    }

    /// Insert a refresh token into the revocation list.
    ///
    /// A single atomic row-insert; the primary key on the token value is
    /// what makes concurrent double-revocation safe.
    pub async fn insert(&self, token: &str) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO revoked_tokens (token, revoked_at)
            VALUES ($1, NOW())
            ON CONFLICT (token) DO NOTHING
            "#,
        )
        .bind(token)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(format!("Failed to revoke token: {e}")))?;

        Ok(())
    }
}
