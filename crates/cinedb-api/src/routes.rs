//! API route definitions

use crate::auth::middleware::{optional_auth, require_auth};
use crate::handlers::{auth, movies, people, profile};
use crate::state::AppState;
use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

/// Create the API routes
pub fn api_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    // Public routes (no authentication; refresh and logout carry the
    // refresh token in the body)
    let public_routes = Router::new()
        .route("/user/register", post(auth::register_handler))
        .route("/user/login", post(auth::login_handler))
        .route("/user/refresh", post(auth::refresh_handler))
        .route("/user/logout", post(auth::logout_handler))
        .route("/movies/search", get(movies::search_movies))
        .route("/movies/data/:imdb_id", get(movies::movie_data));

    // Response shape depends on whether the caller owns the profile
    let optional_auth_routes = Router::new()
        .route("/user/:email/profile", get(profile::get_profile))
        .layer(middleware::from_fn_with_state(state.clone(), optional_auth));

    // Protected routes (valid bearer token required)
    let protected_routes = Router::new()
        .route("/user/:email/profile", put(profile::update_profile))
        .route("/people/:id", get(people::get_person))
        .layer(middleware::from_fn_with_state(state, require_auth));

    Router::new()
        .merge(public_routes)
        .merge(optional_auth_routes)
        .merge(protected_routes)
}
