// src/repositories/movie_repository.rs
//
// Movie persistence. Upsert matches on external id when present, else on
// title + year, so bulk-loaded rows and scraped rows converge on one record.

use chrono::{DateTime, Utc};
use rusqlite::{params, Row};
use std::sync::Arc;
use uuid::Uuid;

use crate::db::ConnectionPool;
use crate::domain::movie::Movie;
use crate::error::{AppError, AppResult};

pub trait MovieRepository: Send + Sync {
    /// Insert or update a movie, keyed by imdb_id when present, else by
    /// (title, release_year). Scraped columns on an existing row survive a
    /// metadata re-upsert. Returns the stored record.
    fn upsert(&self, movie: &Movie) -> AppResult<Movie>;

    fn get_by_id(&self, id: Uuid) -> AppResult<Option<Movie>>;

    fn find_by_title_year(&self, title: &str, year: Option<i32>) -> AppResult<Option<Movie>>;

    fn list_all(&self) -> AppResult<Vec<Movie>>;

    /// Record the outcome of an IMDb rating scrape.
    fn update_imdb_data(
        &self,
        id: Uuid,
        imdb_id: &str,
        rating: Option<f64>,
        vote_count: Option<u32>,
        scraped_at: DateTime<Utc>,
    ) -> AppResult<()>;

    /// Record the outcome of a Rotten Tomatoes resolution/score scrape.
    fn update_rt_data(&self, id: Uuid, slug: &str, tomatometer: Option<f64>) -> AppResult<()>;
}

pub struct SqliteMovieRepository {
    pool: Arc<ConnectionPool>,
}

impl SqliteMovieRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    fn row_to_movie(row: &Row) -> Result<Movie, rusqlite::Error> {
        let id_str: String = row.get("id")?;
        let id = Uuid::parse_str(&id_str)
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

        let genres_json: String = row.get("genres")?;
        let genres: Vec<String> = serde_json::from_str(&genres_json)
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

        Ok(Movie {
            id,
            title: row.get("title")?,
            release_year: row.get("release_year")?,
            genres,
            overview: row.get("overview")?,
            runtime: row.get::<_, Option<i64>>("runtime")?.map(|v| v as u32),
            language: row.get("language")?,
            tmdb_rating: row.get("tmdb_rating")?,
            tmdb_vote_count: row
                .get::<_, Option<i64>>("tmdb_vote_count")?
                .map(|v| v as u32),
            popularity: row.get("popularity")?,
            imdb_id: row.get("imdb_id")?,
            imdb_rating: row.get("imdb_rating")?,
            imdb_vote_count: row
                .get::<_, Option<i64>>("imdb_vote_count")?
                .map(|v| v as u32),
            imdb_scraped_at: parse_optional_datetime(row, "imdb_scraped_at")?,
            rt_slug: row.get("rt_slug")?,
            rt_tomatometer: row.get("rt_tomatometer")?,
            created_at: parse_datetime(row, "created_at")?,
            updated_at: parse_datetime(row, "updated_at")?,
        })
    }

    fn find_match(&self, movie: &Movie) -> AppResult<Option<Movie>> {
        if let Some(imdb_id) = &movie.imdb_id {
            let conn = self.pool.get()?;
            let mut stmt = conn.prepare(&format!("{} WHERE imdb_id = ?1", SELECT_MOVIE))?;
            match stmt.query_row(params![imdb_id], Self::row_to_movie) {
                Ok(found) => return Ok(Some(found)),
                Err(rusqlite::Error::QueryReturnedNoRows) => {}
                Err(e) => return Err(AppError::Database(e)),
            }
        }
        self.find_by_title_year(&movie.title, movie.release_year)
    }
}

const SELECT_MOVIE: &str = "SELECT id, title, release_year, genres, overview, runtime, language,
        tmdb_rating, tmdb_vote_count, popularity,
        imdb_id, imdb_rating, imdb_vote_count, imdb_scraped_at,
        rt_slug, rt_tomatometer, created_at, updated_at
 FROM movies";

fn parse_datetime(row: &Row, column: &str) -> Result<DateTime<Utc>, rusqlite::Error> {
    let raw: String = row.get(column)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
}

fn parse_optional_datetime(
    row: &Row,
    column: &str,
) -> Result<Option<DateTime<Utc>>, rusqlite::Error> {
    let raw: Option<String> = row.get(column)?;
    raw.map(|s| {
        DateTime::parse_from_rfc3339(&s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
    })
    .transpose()
}

impl MovieRepository for SqliteMovieRepository {
    fn upsert(&self, movie: &Movie) -> AppResult<Movie> {
        if let Some(existing) = self.find_match(movie)? {
            {
                let conn = self.pool.get()?;
                let genres_json = serde_json::to_string(&movie.genres)?;
                conn.execute(
                    "UPDATE movies SET
                        genres = ?1, overview = COALESCE(?2, overview), runtime = ?3,
                        language = ?4, tmdb_rating = ?5, tmdb_vote_count = ?6,
                        popularity = ?7, updated_at = ?8
                     WHERE id = ?9",
                    params![
                        genres_json,
                        movie.overview,
                        movie.runtime.map(|v| v as i64),
                        movie.language,
                        movie.tmdb_rating,
                        movie.tmdb_vote_count.map(|v| v as i64),
                        movie.popularity,
                        Utc::now().to_rfc3339(),
                        existing.id.to_string(),
                    ],
                )?;
            }
            return self.get_by_id(existing.id)?.ok_or(AppError::NotFound);
        }

        let conn = self.pool.get()?;
        let genres_json = serde_json::to_string(&movie.genres)?;
        conn.execute(
            "INSERT INTO movies (
                id, title, release_year, genres, overview, runtime, language,
                tmdb_rating, tmdb_vote_count, popularity,
                imdb_id, imdb_rating, imdb_vote_count, imdb_scraped_at,
                rt_slug, rt_tomatometer, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18)",
            params![
                movie.id.to_string(),
                movie.title,
                movie.release_year,
                genres_json,
                movie.overview,
                movie.runtime.map(|v| v as i64),
                movie.language,
                movie.tmdb_rating,
                movie.tmdb_vote_count.map(|v| v as i64),
                movie.popularity,
                movie.imdb_id,
                movie.imdb_rating,
                movie.imdb_vote_count.map(|v| v as i64),
                movie.imdb_scraped_at.map(|dt| dt.to_rfc3339()),
                movie.rt_slug,
                movie.rt_tomatometer,
                movie.created_at.to_rfc3339(),
                movie.updated_at.to_rfc3339(),
            ],
        )?;

        Ok(movie.clone())
    }

    fn get_by_id(&self, id: Uuid) -> AppResult<Option<Movie>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(&format!("{} WHERE id = ?1", SELECT_MOVIE))?;
        match stmt.query_row(params![id.to_string()], Self::row_to_movie) {
            Ok(movie) => Ok(Some(movie)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AppError::Database(e)),
        }
    }

    fn find_by_title_year(&self, title: &str, year: Option<i32>) -> AppResult<Option<Movie>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(&format!(
            "{} WHERE title = ?1 AND release_year IS ?2",
            SELECT_MOVIE
        ))?;
        match stmt.query_row(params![title, year], Self::row_to_movie) {
            Ok(movie) => Ok(Some(movie)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AppError::Database(e)),
        }
    }

    fn list_all(&self) -> AppResult<Vec<Movie>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(&format!("{} ORDER BY title", SELECT_MOVIE))?;
        let movies = stmt
            .query_map([], Self::row_to_movie)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(movies)
    }

    fn update_imdb_data(
        &self,
        id: Uuid,
        imdb_id: &str,
        rating: Option<f64>,
        vote_count: Option<u32>,
        scraped_at: DateTime<Utc>,
    ) -> AppResult<()> {
        let conn = self.pool.get()?;
        let rows = conn.execute(
            "UPDATE movies SET
                imdb_id = ?1, imdb_rating = ?2, imdb_vote_count = ?3,
                imdb_scraped_at = ?4, updated_at = ?5
             WHERE id = ?6",
            params![
                imdb_id,
                rating,
                vote_count.map(|v| v as i64),
                scraped_at.to_rfc3339(),
                Utc::now().to_rfc3339(),
                id.to_string(),
            ],
        )?;
        if rows == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    fn update_rt_data(&self, id: Uuid, slug: &str, tomatometer: Option<f64>) -> AppResult<()> {
        let conn = self.pool.get()?;
        let rows = conn.execute(
            "UPDATE movies SET rt_slug = ?1, rt_tomatometer = ?2, updated_at = ?3
             WHERE id = ?4",
            params![
                slug,
                tomatometer,
                Utc::now().to_rfc3339(),
                id.to_string(),
            ],
        )?;
        if rows == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_memory_pool, initialize_database};

    fn repo() -> SqliteMovieRepository {
        let pool = Arc::new(create_memory_pool().unwrap());
        initialize_database(&pool.get().unwrap()).unwrap();
        SqliteMovieRepository::new(pool)
    }

    #[test]
    fn test_upsert_insert_and_lookup() {
        let repo = repo();
        let mut movie = Movie::new("Inception".to_string(), Some(2010));
        movie.genres = vec!["Sci-Fi".to_string(), "Thriller".to_string()];
        movie.tmdb_rating = Some(8.3);

        let stored = repo.upsert(&movie).unwrap();
        assert_eq!(stored.id, movie.id);

        let found = repo
            .find_by_title_year("Inception", Some(2010))
            .unwrap()
            .unwrap();
        assert_eq!(found.genres, movie.genres);
        assert_eq!(found.tmdb_rating, Some(8.3));
    }

    #[test]
    fn test_upsert_updates_metadata_keeps_scraped_data() {
        let repo = repo();
        let movie = Movie::new("Inception".to_string(), Some(2010));
        let stored = repo.upsert(&movie).unwrap();

        repo.update_imdb_data(stored.id, "tt1375666", Some(8.8), Some(2_400_000), Utc::now())
            .unwrap();

        // Re-upsert from the bulk dataset with fresher metadata
        let mut refreshed = Movie::new("Inception".to_string(), Some(2010));
        refreshed.tmdb_rating = Some(8.4);
        let merged = repo.upsert(&refreshed).unwrap();

        // Same row, updated metadata, scraped data intact
        assert_eq!(merged.id, stored.id);
        assert_eq!(merged.tmdb_rating, Some(8.4));
        assert_eq!(merged.imdb_id.as_deref(), Some("tt1375666"));
        assert_eq!(merged.imdb_rating, Some(8.8));
    }

    #[test]
    fn test_find_by_title_without_year() {
        let repo = repo();
        repo.upsert(&Movie::new("Pilot Film".to_string(), None)).unwrap();

        assert!(repo.find_by_title_year("Pilot Film", None).unwrap().is_some());
        assert!(repo.find_by_title_year("Pilot Film", Some(2000)).unwrap().is_none());
    }

    #[test]
    fn test_update_rt_data() {
        let repo = repo();
        let stored = repo
            .upsert(&Movie::new("The Matrix".to_string(), Some(1999)))
            .unwrap();

        repo.update_rt_data(stored.id, "the_matrix", Some(83.0)).unwrap();
        let found = repo.get_by_id(stored.id).unwrap().unwrap();
        assert_eq!(found.rt_slug.as_deref(), Some("the_matrix"));
        assert_eq!(found.rt_tomatometer, Some(83.0));
    }

    #[test]
    fn test_update_missing_movie_is_not_found() {
        let repo = repo();
        let err = repo
            .update_rt_data(Uuid::new_v4(), "nothing", None)
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound));
    }
}
