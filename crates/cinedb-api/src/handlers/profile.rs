//! User profile handlers
//!
//! The GET route runs behind the optional-auth middleware: the response
//! includes the private fields only when the verified identity matches
//! the requested email. The PUT route requires authentication and is
//! owner-only.

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Extension, Json,
};
use std::sync::Arc;

use crate::auth::{AuthenticatedUser, UpdateProfileRequest};
use crate::error::AppError;
use crate::state::AppState;

/// Get a user's profile
#[utoipa::path(
    get,
    path = "/user/{email}/profile",
    tag = "profile",
    params(
        ("email" = String, Path, description = "Profile owner's email")
    ),
    responses(
        (status = 200, description = "Profile; private fields only for the owner"),
        (status = 404, description = "User not found", body = crate::error::ApiError),
        (status = 500, description = "Internal server error", body = crate::error::ApiError),
    )
)]
pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
    user: Option<Extension<AuthenticatedUser>>,
) -> Result<impl IntoResponse, AppError> {
    let auth = state.auth();

    let viewer = user.as_ref().map(|Extension(u)| u.email.as_str());
    let profile = auth.profile(&email, viewer).await?;

    Ok(Json(profile))
}

/// Update a user's profile
#[utoipa::path(
    put,
    path = "/user/{email}/profile",
    tag = "profile",
    params(
        ("email" = String, Path, description = "Profile owner's email")
    ),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Updated profile", body = crate::auth::OwnerProfile),
        (status = 400, description = "Missing fields or invalid dob", body = crate::error::ApiError),
        (status = 401, description = "Missing or invalid bearer token", body = crate::error::ApiError),
        (status = 403, description = "Not the profile owner", body = crate::error::ApiError),
        (status = 404, description = "User not found", body = crate::error::ApiError),
        (status = 500, description = "Internal server error", body = crate::error::ApiError),
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<impl IntoResponse, AppError> {
    let auth = state.auth();

    let profile = auth.update_profile(&email, &user.email, request).await?;

    Ok(Json(profile))
}
