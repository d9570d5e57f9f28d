//! Person detail handlers
//!
//! The people route sits behind the required-auth middleware; the
//! handler itself only needs the path id.

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use std::collections::HashMap;
use std::sync::Arc;

use cinedb_core::MovieCatalog;

use crate::error::AppError;
use crate::state::AppState;

/// Get a person with their filmography by ID
#[utoipa::path(
    get,
    path = "/people/{id}",
    tag = "people",
    params(
        ("id" = String, Path, description = "Person identifier, e.g. nm0000199")
    ),
    responses(
        (status = 200, description = "Person with filmography"),
        (status = 400, description = "Query parameters supplied", body = crate::error::ApiError),
        (status = 401, description = "Missing or invalid bearer token", body = crate::error::ApiError),
        (status = 404, description = "Person not found", body = crate::error::ApiError),
        (status = 500, description = "Internal server error", body = crate::error::ApiError),
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_person(
    State(state): State<Arc<AppState>>,
    Path(person_id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    state.increment_requests();

    if !query.is_empty() {
        return Err(AppError::BadRequest(
            "Query parameters are not permitted.".to_string(),
        ));
    }

    let catalog = state.catalog();

    let person = catalog
        .person(&person_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Person".to_string()))?;

    Ok(Json(person))
}
