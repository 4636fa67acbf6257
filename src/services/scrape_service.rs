// src/services/scrape_service.rs
//
// Scrape Service - per-movie pipeline and batch driver.
//
// RULES:
// - Identifier resolution completes (or definitively fails) before any
//   review extraction starts
// - One movie's failure never aborts the batch; outcomes degrade to
//   "fewer results" and land in the run summary
// - Every (movie, source) attempt is recorded in the scrape log

use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

use crate::domain::movie::Movie;
use crate::domain::rating::{self, ReconciledRating};
use crate::domain::resolution::{ReviewSource, SourceIdentifier};
use crate::events::{
    EventBus, MovieResolved, ResolutionFailed, ReviewsCollected, ScrapeBatchCompleted,
};
use crate::integrations::imdb::ImdbScraper;
use crate::integrations::rotten_tomatoes::RottenTomatoesScraper;
use crate::repositories::{
    MovieRepository, ReviewRepository, ScrapeLogEntry, ScrapeLogRepository, ScrapeStatus,
};

#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    /// Cap on IMDb user reviews per movie
    pub max_imdb_reviews: usize,

    /// Cap on reviews per Rotten Tomatoes listing endpoint
    pub max_reviews_per_endpoint: usize,

    /// Reviews shorter than this are discarded as noise
    pub min_review_chars: usize,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            max_imdb_reviews: 50,
            max_reviews_per_endpoint: 20,
            min_review_chars: 20,
        }
    }
}

/// What happened for one movie.
#[derive(Debug, Clone)]
pub struct MovieScrapeOutcome {
    pub movie_id: Uuid,
    pub imdb: Option<SourceIdentifier>,
    pub rotten_tomatoes: Option<SourceIdentifier>,
    /// Unique reviews obtained across both sources (post-dedup)
    pub reviews_collected: usize,
    pub duplicates_discarded: usize,
    /// Rows actually written (smaller on re-runs)
    pub reviews_stored: usize,
    pub errors: Vec<String>,
}

impl MovieScrapeOutcome {
    fn new(movie_id: Uuid) -> Self {
        Self {
            movie_id,
            imdb: None,
            rotten_tomatoes: None,
            reviews_collected: 0,
            duplicates_discarded: 0,
            reviews_stored: 0,
            errors: Vec::new(),
        }
    }

    pub fn resolved_any(&self) -> bool {
        self.imdb.is_some() || self.rotten_tomatoes.is_some()
    }
}

/// Aggregate counts for a whole batch run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScrapeRunSummary {
    pub total_movies: usize,
    pub resolved: usize,
    pub unresolved: usize,
    pub reviews_collected: usize,
    pub duplicates_discarded: usize,
    pub errors: usize,
    pub duration_ms: u64,
}

pub struct ScrapeService {
    movie_repo: Arc<dyn MovieRepository>,
    review_repo: Arc<dyn ReviewRepository>,
    log_repo: Arc<dyn ScrapeLogRepository>,
    event_bus: Arc<EventBus>,
    config: ScrapeConfig,
}

impl ScrapeService {
    pub fn new(
        movie_repo: Arc<dyn MovieRepository>,
        review_repo: Arc<dyn ReviewRepository>,
        log_repo: Arc<dyn ScrapeLogRepository>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        Self::with_config(
            movie_repo,
            review_repo,
            log_repo,
            event_bus,
            ScrapeConfig::default(),
        )
    }

    pub fn with_config(
        movie_repo: Arc<dyn MovieRepository>,
        review_repo: Arc<dyn ReviewRepository>,
        log_repo: Arc<dyn ScrapeLogRepository>,
        event_bus: Arc<EventBus>,
        config: ScrapeConfig,
    ) -> Self {
        Self {
            movie_repo,
            review_repo,
            log_repo,
            event_bus,
            config,
        }
    }

    /// Run the full pipeline for one movie: resolve each source, extract
    /// and deduplicate its reviews, persist, and log. Errors degrade the
    /// outcome instead of propagating.
    pub async fn scrape_movie(
        &self,
        imdb: &ImdbScraper,
        rotten_tomatoes: &RottenTomatoesScraper,
        movie: &Movie,
    ) -> MovieScrapeOutcome {
        let mut outcome = MovieScrapeOutcome::new(movie.id);
        self.run_imdb(imdb, movie, &mut outcome).await;
        self.run_rotten_tomatoes(rotten_tomatoes, movie, &mut outcome).await;
        outcome
    }

    async fn run_imdb(&self, imdb: &ImdbScraper, movie: &Movie, outcome: &mut MovieScrapeOutcome) {
        let started = Instant::now();
        let query = movie.query();

        let Some(identifier) = imdb.resolve(&query).await else {
            self.event_bus.emit(ResolutionFailed::new(
                movie.id,
                ReviewSource::Imdb.to_string(),
                movie.title.clone(),
            ));
            self.log(
                movie.id,
                ReviewSource::Imdb,
                ScrapeStatus::Failed,
                0,
                started,
                Some("identifier not resolved".to_string()),
            );
            return;
        };
        self.event_bus.emit(MovieResolved::new(movie.id, &identifier));
        let imdb_id = identifier.external_id.clone();
        outcome.imdb = Some(identifier);

        // Rating first: it also pins the external id on the movie row
        match imdb.scrape_rating(&imdb_id).await {
            Ok(observation) => {
                let (rating, votes, observed_at) = match &observation {
                    Some(obs) => (
                        Some(obs.value),
                        obs.vote_count,
                        obs.observed_at.unwrap_or_else(chrono::Utc::now),
                    ),
                    None => (None, None, chrono::Utc::now()),
                };
                if let Err(err) =
                    self.movie_repo
                        .update_imdb_data(movie.id, &imdb_id, rating, votes, observed_at)
                {
                    outcome.errors.push(format!("imdb rating store: {}", err));
                }
            }
            Err(err) => outcome.errors.push(format!("imdb rating: {}", err)),
        }

        let mut stored = 0usize;
        let mut collected = 0usize;
        match imdb
            .scrape_reviews(&imdb_id, self.config.max_imdb_reviews, self.config.min_review_chars)
            .await
        {
            Ok(reviews) => {
                collected = reviews.len();
                match self
                    .review_repo
                    .insert_batch(movie.id, ReviewSource::Imdb, &reviews)
                {
                    Ok(count) => stored = count,
                    Err(err) => outcome.errors.push(format!("imdb review store: {}", err)),
                }
                self.event_bus.emit(ReviewsCollected::new(
                    movie.id,
                    ReviewSource::Imdb.to_string(),
                    collected,
                    0,
                    stored,
                ));
            }
            Err(err) => outcome.errors.push(format!("imdb reviews: {}", err)),
        }
        outcome.reviews_collected += collected;
        outcome.reviews_stored += stored;

        let status = if outcome.errors.is_empty() {
            ScrapeStatus::Success
        } else {
            ScrapeStatus::Partial
        };
        self.log(
            movie.id,
            ReviewSource::Imdb,
            status,
            collected as u32,
            started,
            None,
        );
    }

    async fn run_rotten_tomatoes(
        &self,
        rotten_tomatoes: &RottenTomatoesScraper,
        movie: &Movie,
        outcome: &mut MovieScrapeOutcome,
    ) {
        let started = Instant::now();
        let errors_before = outcome.errors.len();
        let query = movie.query();

        let Some(identifier) = rotten_tomatoes.resolve(&query).await else {
            self.event_bus.emit(ResolutionFailed::new(
                movie.id,
                ReviewSource::RottenTomatoes.to_string(),
                movie.title.clone(),
            ));
            self.log(
                movie.id,
                ReviewSource::RottenTomatoes,
                ScrapeStatus::Failed,
                0,
                started,
                Some("identifier not resolved".to_string()),
            );
            return;
        };
        self.event_bus.emit(MovieResolved::new(movie.id, &identifier));
        let slug = identifier.external_id.clone();
        outcome.rotten_tomatoes = Some(identifier);

        let tomatometer = match rotten_tomatoes.scrape_score(&slug).await {
            Ok(score) => score,
            Err(err) => {
                outcome.errors.push(format!("rt score: {}", err));
                None
            }
        };
        if let Err(err) = self.movie_repo.update_rt_data(movie.id, &slug, tomatometer) {
            outcome.errors.push(format!("rt store: {}", err));
        }

        let mut collected = 0usize;
        match rotten_tomatoes
            .scrape_reviews(
                &slug,
                self.config.max_reviews_per_endpoint,
                self.config.min_review_chars,
            )
            .await
        {
            Ok(harvest) => {
                collected = harvest.reviews.len();
                outcome.duplicates_discarded += harvest.duplicates_discarded;
                let stored = match self.review_repo.insert_batch(
                    movie.id,
                    ReviewSource::RottenTomatoes,
                    &harvest.reviews,
                ) {
                    Ok(count) => count,
                    Err(err) => {
                        outcome.errors.push(format!("rt review store: {}", err));
                        0
                    }
                };
                self.event_bus.emit(ReviewsCollected::new(
                    movie.id,
                    ReviewSource::RottenTomatoes.to_string(),
                    collected,
                    harvest.duplicates_discarded,
                    stored,
                ));
                outcome.reviews_collected += collected;
                outcome.reviews_stored += stored;
            }
            Err(err) => outcome.errors.push(format!("rt reviews: {}", err)),
        }

        let status = if outcome.errors.len() == errors_before {
            ScrapeStatus::Success
        } else {
            ScrapeStatus::Partial
        };
        self.log(
            movie.id,
            ReviewSource::RottenTomatoes,
            status,
            collected as u32,
            started,
            None,
        );
    }

    /// Run a batch of movies sequentially. Each movie is isolated: its
    /// failures are absorbed into its own outcome.
    pub async fn scrape_batch(
        &self,
        imdb: &ImdbScraper,
        rotten_tomatoes: &RottenTomatoesScraper,
        movies: &[Movie],
    ) -> ScrapeRunSummary {
        let started = Instant::now();
        let mut summary = ScrapeRunSummary {
            total_movies: movies.len(),
            ..Default::default()
        };

        for movie in movies {
            let outcome = self.scrape_movie(imdb, rotten_tomatoes, movie).await;
            if outcome.resolved_any() {
                summary.resolved += 1;
            } else {
                summary.unresolved += 1;
            }
            summary.reviews_collected += outcome.reviews_collected;
            summary.duplicates_discarded += outcome.duplicates_discarded;
            summary.errors += outcome.errors.len();
            for error in &outcome.errors {
                log::warn!("'{}': {}", movie.title, error);
            }
        }

        summary.duration_ms = started.elapsed().as_millis() as u64;
        self.event_bus.emit(ScrapeBatchCompleted::new(
            summary.total_movies,
            summary.resolved,
            summary.unresolved,
            summary.reviews_collected,
            summary.errors,
            summary.duration_ms,
        ));
        log::info!(
            "batch done: {}/{} resolved, {} reviews, {} errors in {}ms",
            summary.resolved,
            summary.total_movies,
            summary.reviews_collected,
            summary.errors,
            summary.duration_ms
        );
        summary
    }

    /// Reconcile the movie's stored ratings into one recommendation.
    /// A pure projection of current state; nothing is persisted.
    pub fn reconcile_rating(&self, movie: &Movie) -> ReconciledRating {
        rating::recommend(&movie.rating_observations(), chrono::Utc::now())
    }

    fn log(
        &self,
        movie_id: Uuid,
        source: ReviewSource,
        status: ScrapeStatus,
        items: u32,
        started: Instant,
        error_message: Option<String>,
    ) {
        let entry = ScrapeLogEntry {
            movie_id: Some(movie_id),
            source: source.to_string(),
            status,
            items_collected: items,
            duration_seconds: started.elapsed().as_secs_f64(),
            error_message,
        };
        if let Err(err) = self.log_repo.record(&entry) {
            log::warn!("failed to record scrape log: {}", err);
        }
    }
}
