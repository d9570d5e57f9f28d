//! PostgreSQL movie catalog store
//!
//! Read-only access to the movies, people, and principals tables using
//! SQLx. Schema lives under `migrations/` at the workspace root.

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::FromRow;

use crate::{
    CoreError, MovieDetails, MoviePage, MovieSummary, Pagination, PersonDetails, PersonRole,
    Principal, Rating, RatingValue, Result, MOVIES_PER_PAGE,
};

/// PostgreSQL catalog store
pub struct CatalogStore {
    pool: PgPool,
}

impl CatalogStore {
    /// Create a new catalog store connection
    pub async fn new(database_url: &str, pool_size: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(pool_size)
            .connect(database_url)
            .await
            .map_err(|e| CoreError::Database(format!("PostgreSQL connection failed: {e}")))?;

        Ok(Self { pool })
    }

    /// Create from an existing pool
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Movie search row from database
#[derive(Debug, FromRow)]
struct MovieSummaryRow {
    title: String,
    year: Option<i32>,
    imdb_id: String,
    imdb_rating: Option<f64>,
    rotten_tomatoes_rating: Option<i32>,
    metacritic_rating: Option<i32>,
    classification: Option<String>,
}

impl From<MovieSummaryRow> for MovieSummary {
    fn from(row: MovieSummaryRow) -> Self {
        MovieSummary {
            title: row.title,
            year: row.year,
            imdb_id: row.imdb_id,
            imdb_rating: row.imdb_rating,
            rotten_tomatoes_rating: row.rotten_tomatoes_rating,
            metacritic_rating: row.metacritic_rating,
            classification: row.classification,
        }
    }
}

/// Full movie row from database
#[derive(Debug, FromRow)]
struct MovieRow {
    title: String,
    year: Option<i32>,
    runtime_minutes: Option<i32>,
    genres: Option<String>,
    country: Option<String>,
    imdb_rating: Option<f64>,
    rotten_tomatoes_rating: Option<i32>,
    metacritic_rating: Option<i32>,
    boxoffice: Option<i64>,
    poster: Option<String>,
    plot: Option<String>,
}

/// Principal row from database
#[derive(Debug, FromRow)]
struct PrincipalRow {
    person_id: String,
    category: String,
    name: String,
    characters: String,
}

/// Person row from database
#[derive(Debug, FromRow)]
struct PersonRow {
    name: String,
    birth_year: Option<i32>,
    death_year: Option<i32>,
}

/// Filmography row from database (principals joined with movies)
#[derive(Debug, FromRow)]
struct RoleRow {
    movie_name: String,
    movie_id: String,
    category: String,
    imdb_rating: Option<f64>,
    characters: String,
}

/// Decode the JSON-encoded character list stored on a principals row.
///
/// Rows written before characters were captured hold an empty string;
/// both that and malformed text decode to an empty list.
fn decode_characters(raw: &str) -> Vec<String> {
    serde_json::from_str(raw).unwrap_or_default()
}

/// Trait for catalog read operations
#[async_trait]
pub trait MovieCatalog: Send + Sync {
    /// Search movies by optional title substring and exact year,
    /// returning one fixed-size page of results.
    async fn search(&self, title: Option<&str>, year: Option<i32>, page: u32)
        -> Result<MoviePage>;

    /// Fetch one movie with its principals and ratings block
    async fn movie_details(&self, imdb_id: &str) -> Result<Option<MovieDetails>>;

    /// Fetch one person with their filmography
    async fn person(&self, person_id: &str) -> Result<Option<PersonDetails>>;
}

#[async_trait]
impl MovieCatalog for CatalogStore {
    async fn search(
        &self,
        title: Option<&str>,
        year: Option<i32>,
        page: u32,
    ) -> Result<MoviePage> {
        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM movies
            WHERE ($1::text IS NULL OR title ILIKE '%' || $1 || '%')
              AND ($2::int IS NULL OR year = $2)
            "#,
        )
        .bind(title)
        .bind(year)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| CoreError::Database(format!("Failed to count movies: {e}")))?;

        let offset = (i64::from(page) - 1) * i64::from(MOVIES_PER_PAGE);

        let rows = sqlx::query_as::<_, MovieSummaryRow>(
            r#"
            SELECT title, year, imdb_id, imdb_rating,
                   rotten_tomatoes_rating, metacritic_rating, classification
            FROM movies
            WHERE ($1::text IS NULL OR title ILIKE '%' || $1 || '%')
              AND ($2::int IS NULL OR year = $2)
            ORDER BY imdb_id
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(title)
        .bind(year)
        .bind(i64::from(MOVIES_PER_PAGE))
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| CoreError::Database(format!("Failed to search movies: {e}")))?;

        let pagination = Pagination::new(total, page, rows.len());
        let data = rows.into_iter().map(MovieSummary::from).collect();

        Ok(MoviePage { data, pagination })
    }

    async fn movie_details(&self, imdb_id: &str) -> Result<Option<MovieDetails>> {
        let movie = sqlx::query_as::<_, MovieRow>(
            r#"
            SELECT title, year, runtime_minutes, genres, country, imdb_rating,
                   rotten_tomatoes_rating, metacritic_rating, boxoffice, poster, plot
            FROM movies
            WHERE imdb_id = $1
            "#,
        )
        .bind(imdb_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| CoreError::Database(format!("Failed to fetch movie: {e}")))?;

        let Some(movie) = movie else {
            return Ok(None);
        };

        let principals = sqlx::query_as::<_, PrincipalRow>(
            r#"
            SELECT person_id, category, name, characters
            FROM principals
            WHERE movie_id = $1
            ORDER BY id
            "#,
        )
        .bind(imdb_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| CoreError::Database(format!("Failed to fetch principals: {e}")))?;

        let principals = principals
            .into_iter()
            .map(|p| Principal {
                id: p.person_id,
                category: p.category,
                name: p.name,
                characters: decode_characters(&p.characters),
            })
            .collect();

        let ratings = vec![
            Rating {
                source: "Internet Movie Database".to_string(),
                value: movie.imdb_rating.map(RatingValue::Float),
            },
            Rating {
                source: "Rotten Tomatoes".to_string(),
                value: movie
                    .rotten_tomatoes_rating
                    .map(|v| RatingValue::Int(i64::from(v))),
            },
            Rating {
                source: "Metacritic".to_string(),
                value: movie
                    .metacritic_rating
                    .map(|v| RatingValue::Int(i64::from(v))),
            },
        ];

        Ok(Some(MovieDetails {
            title: movie.title,
            year: movie.year,
            runtime: movie.runtime_minutes,
            genres: movie
                .genres
                .map(|g| g.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or_default(),
            country: movie.country,
            principals,
            ratings,
            boxoffice: movie.boxoffice,
            poster: movie.poster,
            plot: movie.plot,
        }))
    }

    async fn person(&self, person_id: &str) -> Result<Option<PersonDetails>> {
        let person = sqlx::query_as::<_, PersonRow>(
            "SELECT name, birth_year, death_year FROM people WHERE person_id = $1",
        )
        .bind(person_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| CoreError::Database(format!("Failed to fetch person: {e}")))?;

        let Some(person) = person else {
            return Ok(None);
        };

        let roles = sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT m.title AS movie_name, p.movie_id, p.category,
                   m.imdb_rating, p.characters
            FROM principals p
            JOIN movies m ON p.movie_id = m.imdb_id
            WHERE p.person_id = $1
            ORDER BY p.movie_id
            "#,
        )
        .bind(person_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| CoreError::Database(format!("Failed to fetch filmography: {e}")))?;

        let roles = roles
            .into_iter()
            .map(|r| PersonRole {
                movie_name: r.movie_name,
                movie_id: r.movie_id,
                category: r.category,
                imdb_rating: r.imdb_rating,
                characters: decode_characters(&r.characters),
            })
            .collect();

        Ok(Some(PersonDetails {
            name: person.name,
            birth_year: person.birth_year,
            death_year: person.death_year,
            roles,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_characters() {
        assert_eq!(
            decode_characters(r#"["Neil McCauley"]"#),
            vec!["Neil McCauley".to_string()]
        );
        assert!(decode_characters("").is_empty());
        assert!(decode_characters("not json").is_empty());
        assert!(decode_characters("[]").is_empty());
    }
}
