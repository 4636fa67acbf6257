// src/integrations/imdb/client.rs
//
// IMDb scraping client.
//
// Drives the find-page cascade against the DocumentFetcher port:
//   S0 exact search without year
//   S1 exact search with year (only if S0 failed and a year is known)
//   S2 fuzzy match over the candidates of the last result page
// Exhaustion returns None. Stage-level transport failures are logged and
// cascade to the next stage; nothing escapes resolve().

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

use crate::domain::movie::MovieQuery;
use crate::domain::rating::RatingObservation;
use crate::domain::resolution::{CandidateResult, ReviewSource, SourceIdentifier};
use crate::domain::review::RawReview;
use crate::error::AppResult;
use crate::integrations::http::{fetch_with_retry, RateLimiter};
use crate::integrations::imdb::{extract, search};
use crate::integrations::ports::DocumentFetcher;
use crate::services::title_matcher::{TitleMatcher, DEFAULT_MATCH_THRESHOLD};

pub const BASE_URL: &str = "https://www.imdb.com";

const DEFAULT_RATE_LIMIT: Duration = Duration::from_secs(2);
const DEFAULT_FETCH_ATTEMPTS: u32 = 3;

pub struct ImdbScraper {
    fetcher: Arc<dyn DocumentFetcher>,
    matcher: TitleMatcher,
    rate_limiter: Mutex<RateLimiter>,
    fuzzy_threshold: f64,
    fetch_attempts: u32,
}

impl ImdbScraper {
    pub fn new(fetcher: Arc<dyn DocumentFetcher>) -> Self {
        Self::with_config(fetcher, DEFAULT_RATE_LIMIT, DEFAULT_MATCH_THRESHOLD)
    }

    pub fn with_config(
        fetcher: Arc<dyn DocumentFetcher>,
        rate_limit: Duration,
        fuzzy_threshold: f64,
    ) -> Self {
        Self {
            fetcher,
            matcher: TitleMatcher::new(),
            rate_limiter: Mutex::new(RateLimiter::new(rate_limit)),
            fuzzy_threshold,
            fetch_attempts: DEFAULT_FETCH_ATTEMPTS,
        }
    }

    /// Resolve a title/year to an IMDb id. Returns None when every cascade
    /// stage is exhausted; errors never escape.
    pub async fn resolve(&self, query: &MovieQuery) -> Option<SourceIdentifier> {
        let mut last_page: Option<String> = None;

        // S0: exact search without year
        match self.fetch_find_page(&query.title).await {
            Ok(html) => {
                if let Some(id) = search::parse_first_result(&html, query.year) {
                    log::info!("resolved '{}' exactly: {}", query.title, id);
                    return Some(SourceIdentifier::exact(ReviewSource::Imdb, id));
                }
                last_page = Some(html);
            }
            Err(err) => log::warn!("exact search failed for '{}': {}", query.title, err),
        }

        // S1: exact search with year appended
        if let Some(year) = query.year {
            let with_year = format!("{} {}", query.title, year);
            match self.fetch_find_page(&with_year).await {
                Ok(html) => {
                    if let Some(id) = search::parse_first_result(&html, query.year) {
                        log::info!("resolved '{}' exactly with year: {}", query.title, id);
                        return Some(SourceIdentifier::exact(ReviewSource::Imdb, id));
                    }
                    last_page = Some(html);
                }
                Err(err) => {
                    log::warn!("year search failed for '{}': {}", query.title, err)
                }
            }
        }

        // S2: fuzzy match over whatever result page we managed to fetch
        if let Some(html) = &last_page {
            if let Some(identifier) = self.fuzzy_match(html, query) {
                return Some(identifier);
            }
        }

        log::info!("could not resolve '{}' ({:?})", query.title, query.year);
        None
    }

    fn fuzzy_match(&self, html: &str, query: &MovieQuery) -> Option<SourceIdentifier> {
        let candidates = search::parse_candidates(html);
        if candidates.is_empty() {
            return None;
        }

        let mut best: Option<(f64, bool, &CandidateResult)> = None;

        for candidate in candidates.iter().take(search::MAX_CANDIDATES) {
            let bare_title = search::strip_year_suffix(&candidate.display_title);
            let score = self.matcher.score(&query.title, &bare_title);

            // When a year is known on both sides it must be within one
            if let (Some(wanted), Some(found)) = (query.year, candidate.year) {
                if (wanted - found).abs() > 1 {
                    log::debug!(
                        "  '{}' ({}): {:.2} rejected on year",
                        bare_title,
                        found,
                        score
                    );
                    continue;
                }
            }

            let exact_year = query.year.is_some() && query.year == candidate.year;
            let better = match best {
                None => true,
                // Strictly-greater keeps document order on plain ties;
                // an exact year outranks a +-1 year at the same score
                Some((best_score, best_exact, _)) => {
                    score > best_score || (score == best_score && exact_year && !best_exact)
                }
            };
            if better {
                best = Some((score, exact_year, candidate));
            }
        }

        let (score, _, candidate) = best?;
        if score >= self.fuzzy_threshold {
            log::info!(
                "fuzzy matched '{}' -> '{}' [{:.2}] {}",
                query.title,
                candidate.display_title,
                score,
                candidate.external_id
            );
            Some(SourceIdentifier::fuzzy(
                ReviewSource::Imdb,
                candidate.external_id.clone(),
                score,
            ))
        } else {
            log::info!(
                "best fuzzy score {:.2} below threshold {:.2} for '{}'",
                score,
                self.fuzzy_threshold,
                query.title
            );
            None
        }
    }

    /// Scrape up to `max_reviews` user reviews, following pagination keys.
    pub async fn scrape_reviews(
        &self,
        imdb_id: &str,
        max_reviews: usize,
        min_chars: usize,
    ) -> AppResult<Vec<RawReview>> {
        let reviews_url = format!("{}/title/{}/reviews", BASE_URL, imdb_id);
        let mut reviews: Vec<RawReview> = Vec::new();
        let mut key: Option<String> = None;

        loop {
            let url = match &key {
                Some(k) => format!("{}/_ajax?paginationKey={}", reviews_url, k),
                None => reviews_url.clone(),
            };

            let html = self.throttled_fetch(&url, &[]).await?;
            let remaining = max_reviews - reviews.len();
            let (page_reviews, skipped) = extract::extract_reviews(&html, remaining, min_chars);

            for reason in &skipped {
                log::debug!("skipped review container on {}: {}", imdb_id, reason);
            }
            if page_reviews.is_empty() {
                if reviews.is_empty() {
                    log::warn!(
                        "no review containers found for {}; page structure may have changed",
                        imdb_id
                    );
                }
                break;
            }
            reviews.extend(page_reviews);

            if reviews.len() >= max_reviews {
                break;
            }
            match extract::pagination_key(&html) {
                Some(next) => key = Some(next),
                None => break,
            }
        }

        log::info!("scraped {} reviews from IMDb for {}", reviews.len(), imdb_id);
        Ok(reviews)
    }

    /// Scrape just the aggregate rating from the title page.
    pub async fn scrape_rating(&self, imdb_id: &str) -> AppResult<Option<RatingObservation>> {
        let url = format!("{}/title/{}/", BASE_URL, imdb_id);
        let html = self.throttled_fetch(&url, &[]).await?;

        Ok(extract::parse_rating_jsonld(&html).map(|(value, vote_count)| {
            log::info!(
                "scraped rating for {}: {}/10 ({:?} votes)",
                imdb_id,
                value,
                vote_count
            );
            RatingObservation {
                provider: "imdb".to_string(),
                value,
                vote_count,
                observed_at: Some(chrono::Utc::now()),
                live: true,
            }
        }))
    }

    async fn fetch_find_page(&self, query: &str) -> AppResult<String> {
        let params = vec![
            ("q".to_string(), query.to_string()),
            ("s".to_string(), "tt".to_string()),
            // Feature films only; this keeps TV content out of the
            // candidate list at the source
            ("ttype".to_string(), "ft".to_string()),
        ];
        self.throttled_fetch(&format!("{}/find", BASE_URL), &params).await
    }

    async fn throttled_fetch(&self, url: &str, params: &[(String, String)]) -> AppResult<String> {
        self.rate_limiter.lock().await.wait().await;
        fetch_with_retry(self.fetcher.as_ref(), url, params, self.fetch_attempts).await
    }
}
