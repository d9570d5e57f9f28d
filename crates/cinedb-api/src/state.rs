//! Application state management

use cinedb_core::config::AppConfig;
use cinedb_core::{CatalogStore, CoreError};
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use crate::auth::{AuthService, TokenConfig, TokenService};

/// Application state shared across handlers
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,
    /// Server start time
    pub start_time: Instant,
    /// Request counter
    pub request_count: AtomicU64,
    /// Token service (secrets injected at construction)
    pub tokens: TokenService,
    /// Database pool; connects lazily on first use
    pub db_pool: PgPool,
}

impl AppState {
    /// Create new application state with config.
    ///
    /// The pool is created lazily: an unreachable database surfaces as a
    /// per-request datastore error, not a startup failure. Only a
    /// malformed connection URL fails here.
    pub fn new(config: AppConfig) -> Result<Self, CoreError> {
        let db_pool = PgPoolOptions::new()
            .max_connections(config.database.pool_size)
            .acquire_timeout(std::time::Duration::from_secs(3))
            .connect_lazy(&config.database.url)
            .map_err(|e| CoreError::Database(format!("Invalid database URL: {e}")))?;

        let tokens = TokenService::new(TokenConfig::from(&config.auth));

        Ok(Self {
            config,
            start_time: Instant::now(),
            request_count: AtomicU64::new(0),
            tokens,
            db_pool,
        })
    }

    /// Check whether the database answers a trivial query
    pub async fn is_ready(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.db_pool).await.is_ok()
    }

    /// Movie catalog store over the shared pool
    pub fn catalog(&self) -> CatalogStore {
        CatalogStore::from_pool(self.db_pool.clone())
    }

    /// Authentication service over the shared pool
    pub fn auth(&self) -> AuthService {
        AuthService::new(self.db_pool.clone(), self.tokens.clone())
    }

    /// Increment request counter
    pub fn increment_requests(&self) -> u64 {
        self.request_count.fetch_add(1, Ordering::SeqCst)
    }

    /// Get total request count
    pub fn get_request_count(&self) -> u64 {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Get uptime in seconds
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_state_from_default_config() {
        let state = AppState::new(AppConfig::default()).expect("default config is valid");
        assert_eq!(state.get_request_count(), 0);
    }

    #[tokio::test]
    async fn test_request_counter() {
        let state = AppState::new(AppConfig::default()).unwrap();
        state.increment_requests();
        state.increment_requests();
        assert_eq!(state.get_request_count(), 2);
    }
}
