//! cinedb API - REST server
//!
//! HTTP endpoints for the movie database: catalog search and detail
//! reads, account registration/login/logout, bearer/refresh token
//! authentication, and user profiles.

pub mod audit;
pub mod auth;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

use axum::http::HeaderValue;
use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::state::AppState;

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::auth::register_handler,
        handlers::auth::login_handler,
        handlers::auth::refresh_handler,
        handlers::auth::logout_handler,
        handlers::profile::get_profile,
        handlers::profile::update_profile,
        handlers::movies::search_movies,
        handlers::movies::movie_data,
        handlers::people::get_person,
        handlers::health::health_check,
        handlers::health::readiness_check,
        handlers::health::metrics,
    ),
    components(schemas(
        auth::RegisterRequest,
        auth::LoginRequest,
        auth::RefreshRequest,
        auth::LogoutRequest,
        auth::UpdateProfileRequest,
        auth::AuthResponse,
        auth::TokenBundle,
        auth::PublicProfile,
        auth::OwnerProfile,
        handlers::auth::RegisterResponse,
        handlers::auth::LogoutResponse,
        error::ApiError,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Registration, login, and token lifecycle"),
        (name = "profile", description = "User profiles"),
        (name = "movies", description = "Movie catalog"),
        (name = "people", description = "People and filmographies"),
        (name = "health", description = "Service health"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Assemble the full application router
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = if !state.config.server.cors_enabled {
        CorsLayer::new()
    } else if state.config.server.cors_origins.is_empty() {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .server
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    };

    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        .route("/metrics", get(handlers::health::metrics))
        .merge(routes::api_routes(state.clone()))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(axum::middleware::from_fn(
            middleware::security_headers_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Router over default configuration.
///
/// The pool connects lazily, so with no database running the
/// database-backed endpoints answer 500/503 while token issuance,
/// verification, and request validation behave as in production.
pub fn create_router_for_testing() -> Router {
    let state = AppState::new(cinedb_core::config::AppConfig::default())
        .expect("default configuration is valid");
    create_router(Arc::new(state))
}
