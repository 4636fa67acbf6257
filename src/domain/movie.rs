// src/domain/movie.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::rating::RatingObservation;

/// A movie as consolidated from all sources.
///
/// The tmdb_* columns come from the bulk dataset the database was seeded
/// with; the imdb_* and rt_* columns are filled in by the scrapers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Movie {
    /// Internal immutable identifier
    pub id: Uuid,

    /// Primary display title
    pub title: String,

    /// Release year (if known)
    pub release_year: Option<i32>,

    /// Genre labels
    pub genres: Vec<String>,

    /// Plot summary
    pub overview: Option<String>,

    /// Runtime in minutes
    pub runtime: Option<u32>,

    /// Original language code (e.g. "en")
    pub language: Option<String>,

    /// Bulk-dataset rating on a 0-10 scale
    pub tmdb_rating: Option<f64>,

    /// Bulk-dataset vote count
    pub tmdb_vote_count: Option<u32>,

    /// Bulk-dataset popularity score
    pub popularity: Option<f64>,

    /// Resolved IMDb identifier (e.g. "tt1375666")
    pub imdb_id: Option<String>,

    /// Live-scraped IMDb rating on a 0-10 scale
    pub imdb_rating: Option<f64>,

    /// Live-scraped IMDb vote count
    pub imdb_vote_count: Option<u32>,

    /// When IMDb data was last scraped
    pub imdb_scraped_at: Option<DateTime<Utc>>,

    /// Resolved Rotten Tomatoes URL slug (e.g. "the_matrix")
    pub rt_slug: Option<String>,

    /// Rotten Tomatoes critics score (0-100)
    pub rt_tomatometer: Option<f64>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Movie {
    /// Create a new Movie with only a title and year; everything else is
    /// filled in by ingestion or scraping.
    pub fn new(title: String, release_year: Option<i32>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title,
            release_year,
            genres: Vec::new(),
            overview: None,
            runtime: None,
            language: None,
            tmdb_rating: None,
            tmdb_vote_count: None,
            popularity: None,
            imdb_id: None,
            imdb_rating: None,
            imdb_vote_count: None,
            imdb_scraped_at: None,
            rt_slug: None,
            rt_tomatometer: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// The title/year pair used for identifier resolution.
    pub fn query(&self) -> MovieQuery {
        MovieQuery {
            title: self.title.clone(),
            year: self.release_year,
        }
    }

    /// Project the movie's stored ratings into observations for
    /// reconciliation. Only the IMDb rating is flagged as live-scraped;
    /// the bulk-dataset rating has no meaningful collection timestamp.
    pub fn rating_observations(&self) -> Vec<RatingObservation> {
        let mut observations = Vec::new();

        if let Some(value) = self.tmdb_rating {
            observations.push(RatingObservation {
                provider: "tmdb".to_string(),
                value,
                vote_count: self.tmdb_vote_count,
                observed_at: None,
                live: false,
            });
        }

        if let Some(value) = self.imdb_rating {
            observations.push(RatingObservation {
                provider: "imdb".to_string(),
                value,
                vote_count: self.imdb_vote_count,
                observed_at: self.imdb_scraped_at,
                live: true,
            });
        }

        if let Some(score) = self.rt_tomatometer {
            // Tomatometer is a 0-100 percentage; convert to the common scale
            observations.push(RatingObservation {
                provider: "rotten_tomatoes".to_string(),
                value: score / 10.0,
                vote_count: None,
                observed_at: None,
                live: false,
            });
        }

        observations
    }
}

/// The input to identifier resolution. Immutable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieQuery {
    pub title: String,
    pub year: Option<i32>,
}

impl MovieQuery {
    pub fn new(title: impl Into<String>, year: Option<i32>) -> Self {
        Self {
            title: title.into(),
            year,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_observations_only_present_providers() {
        let mut movie = Movie::new("Inception".to_string(), Some(2010));
        assert!(movie.rating_observations().is_empty());

        movie.tmdb_rating = Some(8.3);
        movie.tmdb_vote_count = Some(34000);
        let obs = movie.rating_observations();
        assert_eq!(obs.len(), 1);
        assert_eq!(obs[0].provider, "tmdb");
        assert!(!obs[0].live);

        movie.imdb_rating = Some(8.8);
        movie.imdb_scraped_at = Some(Utc::now());
        let obs = movie.rating_observations();
        assert_eq!(obs.len(), 2);
        assert!(obs[1].live);
    }

    #[test]
    fn test_tomatometer_converted_to_common_scale() {
        let mut movie = Movie::new("The Matrix".to_string(), Some(1999));
        movie.rt_tomatometer = Some(83.0);
        let obs = movie.rating_observations();
        assert_eq!(obs.len(), 1);
        assert!((obs[0].value - 8.3).abs() < 1e-9);
    }
}
