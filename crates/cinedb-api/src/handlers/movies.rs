//! Movie catalog handlers

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use chrono::{Datelike, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use utoipa::IntoParams;

use cinedb_core::MovieCatalog;

use crate::error::AppError;
use crate::state::AppState;

/// Query parameters for movie search
///
/// `year` and `page` arrive as raw strings so malformed values can be
/// rejected with a specific message instead of a generic parse failure.
#[derive(Debug, serde::Deserialize, IntoParams)]
pub struct SearchQuery {
    /// Substring match against the title
    pub title: Option<String>,

    /// Exact release year, format yyyy
    pub year: Option<String>,

    /// Page number (1-indexed, 100 results per page)
    pub page: Option<String>,
}

/// Search movies by title and/or year
#[utoipa::path(
    get,
    path = "/movies/search",
    tag = "movies",
    params(SearchQuery),
    responses(
        (status = 200, description = "One page of matching movies with pagination"),
        (status = 400, description = "Invalid page or year format", body = crate::error::ApiError),
        (status = 500, description = "Internal server error", body = crate::error::ApiError),
    )
)]
pub async fn search_movies(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchQuery>,
) -> Result<impl IntoResponse, AppError> {
    state.increment_requests();

    let page = parse_page(params.page.as_deref())?;
    let year = params.year.as_deref().map(parse_year).transpose()?;
    let title = params
        .title
        .as_deref()
        .filter(|t| !t.is_empty());

    let catalog = state.catalog();

    let results = catalog.search(title, year, page).await?;

    Ok(Json(results))
}

/// Get full movie data by IMDb ID
#[utoipa::path(
    get,
    path = "/movies/data/{imdb_id}",
    tag = "movies",
    params(
        ("imdb_id" = String, Path, description = "IMDb identifier, e.g. tt0113277")
    ),
    responses(
        (status = 200, description = "Movie details with principals and ratings"),
        (status = 400, description = "Query parameters supplied", body = crate::error::ApiError),
        (status = 404, description = "Movie not found", body = crate::error::ApiError),
        (status = 500, description = "Internal server error", body = crate::error::ApiError),
    )
)]
pub async fn movie_data(
    State(state): State<Arc<AppState>>,
    Path(imdb_id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    state.increment_requests();

    if !query.is_empty() {
        return Err(AppError::BadRequest(
            "Query parameters are not permitted.".to_string(),
        ));
    }

    let catalog = state.catalog();

    let movie = catalog
        .movie_details(&imdb_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Movie".to_string()))?;

    Ok(Json(movie))
}

/// Parse and validate the page parameter: a positive integer, default 1
fn parse_page(raw: Option<&str>) -> Result<u32, AppError> {
    match raw {
        None | Some("") => Ok(1),
        Some(raw) => raw
            .parse::<u32>()
            .ok()
            .filter(|&p| p > 0)
            .ok_or_else(|| {
                AppError::BadRequest("Invalid page format. page must be a number.".to_string())
            }),
    }
}

/// Parse and validate the year parameter: yyyy, 1900..=current year
fn parse_year(raw: &str) -> Result<i32, AppError> {
    let well_formed = raw.len() == 4 && raw.chars().all(|c| c.is_ascii_digit());
    let year: i32 = if well_formed { raw.parse().ok() } else { None }.ok_or_else(|| {
        AppError::BadRequest("Invalid year format. Format must be yyyy.".to_string())
    })?;
    let current_year = Utc::now().year();
    if !(1900..=current_year).contains(&year) {
        return Err(AppError::BadRequest(format!(
            "Invalid year. Year must be between 1900 and {current_year}."
        )));
    }

    Ok(year)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_page_defaults_to_one() {
        assert_eq!(parse_page(None).unwrap(), 1);
        assert_eq!(parse_page(Some("")).unwrap(), 1);
        assert_eq!(parse_page(Some("3")).unwrap(), 3);
    }

    #[test]
    fn test_parse_page_rejects_non_positive_integers() {
        for raw in ["abc", "0", "-1", "1.5", "2x"] {
            assert!(matches!(
                parse_page(Some(raw)),
                Err(AppError::BadRequest(_))
            ));
        }
    }

    #[test]
    fn test_parse_year() {
        assert_eq!(parse_year("1995").unwrap(), 1995);

        for raw in ["95", "19955", "abcd", "19a5"] {
            let err = parse_year(raw).unwrap_err();
            assert!(matches!(err, AppError::BadRequest(msg)
                if msg.contains("Format must be yyyy")));
        }

        let err = parse_year("1899").unwrap_err();
        assert!(matches!(err, AppError::BadRequest(msg)
            if msg.contains("between 1900 and")));

        let future = format!("{}", Utc::now().year() + 1);
        assert!(parse_year(&future).is_err());
    }
}
