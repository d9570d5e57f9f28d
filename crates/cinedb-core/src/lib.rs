//! cinedb Core - Domain models, configuration, and catalog store
//!
//! This crate defines the shared pieces of the cinedb system:
//! - Movie, person, and pagination models returned by the catalog
//! - Common error types
//! - Configuration management
//! - The PostgreSQL catalog store

pub mod catalog;
pub mod config;

pub use catalog::{CatalogStore, MovieCatalog};
pub use config::{AppConfig, AuthConfig, ConfigError, DatabaseConfig, ServerConfig};

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Core error types for cinedb operations
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;

// ============================================================================
// Catalog Models
// ============================================================================

/// Number of movies returned per search page
pub const MOVIES_PER_PAGE: u32 = 100;

/// A single row of a movie search result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieSummary {
    pub title: String,
    pub year: Option<i32>,
    #[serde(rename = "imdbID")]
    pub imdb_id: String,
    #[serde(rename = "imdbRating")]
    pub imdb_rating: Option<f64>,
    #[serde(rename = "rottenTomatoesRating")]
    pub rotten_tomatoes_rating: Option<i32>,
    #[serde(rename = "metacriticRating")]
    pub metacritic_rating: Option<i32>,
    pub classification: Option<String>,
}

/// Pagination block attached to search responses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total: i64,
    pub per_page: u32,
    pub current_page: u32,
    pub last_page: u32,
    pub prev_page: Option<u32>,
    pub next_page: Option<u32>,
    pub from: i64,
    pub to: i64,
}

impl Pagination {
    /// Build the pagination block for one page of results.
    ///
    /// `total` is the full result count, `page` is 1-indexed, and
    /// `page_len` is the number of rows actually returned on this page.
    pub fn new(total: i64, page: u32, page_len: usize) -> Self {
        let last_page = (total as f64 / MOVIES_PER_PAGE as f64).ceil() as u32;
        let from = (i64::from(page) - 1) * i64::from(MOVIES_PER_PAGE);

        Self {
            total,
            per_page: MOVIES_PER_PAGE,
            current_page: page,
            last_page,
            prev_page: if page > 1 { Some(page - 1) } else { None },
            next_page: if page < last_page { Some(page + 1) } else { None },
            from,
            to: from + page_len as i64,
        }
    }
}

/// One page of movie search results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoviePage {
    pub data: Vec<MovieSummary>,
    pub pagination: Pagination,
}

/// A rating value as reported by its source
///
/// IMDb ratings are fractional; Rotten Tomatoes and Metacritic report
/// integers. The distinction is preserved on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RatingValue {
    Int(i64),
    Float(f64),
}

/// A single entry of a movie's ratings block
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rating {
    pub source: String,
    pub value: Option<RatingValue>,
}

/// A cast or crew member attached to a movie
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Principal {
    pub id: String,
    pub category: String,
    pub name: String,
    pub characters: Vec<String>,
}

/// Full movie detail record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieDetails {
    pub title: String,
    pub year: Option<i32>,
    pub runtime: Option<i32>,
    pub genres: Vec<String>,
    pub country: Option<String>,
    pub principals: Vec<Principal>,
    pub ratings: Vec<Rating>,
    pub boxoffice: Option<i64>,
    pub poster: Option<String>,
    pub plot: Option<String>,
}

/// One movie credit on a person's filmography
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonRole {
    pub movie_name: String,
    pub movie_id: String,
    pub category: String,
    pub imdb_rating: Option<f64>,
    pub characters: Vec<String>,
}

/// Full person detail record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonDetails {
    pub name: String,
    pub birth_year: Option<i32>,
    pub death_year: Option<i32>,
    pub roles: Vec<PersonRole>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_first_of_many() {
        let p = Pagination::new(250, 1, 100);
        assert_eq!(p.last_page, 3);
        assert_eq!(p.prev_page, None);
        assert_eq!(p.next_page, Some(2));
        assert_eq!(p.from, 0);
        assert_eq!(p.to, 100);
    }

    #[test]
    fn test_pagination_last_partial_page() {
        let p = Pagination::new(250, 3, 50);
        assert_eq!(p.prev_page, Some(2));
        assert_eq!(p.next_page, None);
        assert_eq!(p.from, 200);
        assert_eq!(p.to, 250);
    }

    #[test]
    fn test_pagination_empty_result() {
        let p = Pagination::new(0, 1, 0);
        assert_eq!(p.last_page, 0);
        assert_eq!(p.prev_page, None);
        assert_eq!(p.next_page, None);
        assert_eq!(p.from, 0);
        assert_eq!(p.to, 0);
    }

    #[test]
    fn test_movie_summary_wire_names() {
        let movie = MovieSummary {
            title: "Heat".to_string(),
            year: Some(1995),
            imdb_id: "tt0113277".to_string(),
            imdb_rating: Some(8.3),
            rotten_tomatoes_rating: Some(88),
            metacritic_rating: Some(76),
            classification: Some("R".to_string()),
        };

        let json = serde_json::to_value(&movie).unwrap();
        assert_eq!(json["imdbID"], "tt0113277");
        assert_eq!(json["imdbRating"], 8.3);
        assert_eq!(json["rottenTomatoesRating"], 88);
        assert_eq!(json["metacriticRating"], 76);
    }

    #[test]
    fn test_rating_value_serialization() {
        let imdb = Rating {
            source: "Internet Movie Database".to_string(),
            value: Some(RatingValue::Float(8.3)),
        };
        let rt = Rating {
            source: "Rotten Tomatoes".to_string(),
            value: Some(RatingValue::Int(88)),
        };
        let missing = Rating {
            source: "Metacritic".to_string(),
            value: None,
        };

        assert_eq!(serde_json::to_value(&imdb).unwrap()["value"], 8.3);
        assert_eq!(serde_json::to_value(&rt).unwrap()["value"], 88);
        assert!(serde_json::to_value(&missing).unwrap()["value"].is_null());
    }

    #[test]
    fn test_person_role_wire_names() {
        let role = PersonRole {
            movie_name: "Heat".to_string(),
            movie_id: "tt0113277".to_string(),
            category: "actor".to_string(),
            imdb_rating: Some(8.3),
            characters: vec!["Neil McCauley".to_string()],
        };

        let json = serde_json::to_value(&role).unwrap();
        assert_eq!(json["movieName"], "Heat");
        assert_eq!(json["movieId"], "tt0113277");
        assert_eq!(json["imdbRating"], 8.3);
    }
}
