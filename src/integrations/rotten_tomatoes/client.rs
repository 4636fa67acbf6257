// src/integrations/rotten_tomatoes/client.rs
//
// Rotten Tomatoes scraping client.
//
// Resolution cascade against the SPA search:
//   S0 search without year
//   S1 search with year (only if S0 found nothing and a year is known)
//   S2 deterministic slug generation from the normalized title
// The slug fallback is returned unvalidated; the first review fetch against
// it validates or refutes the guess.
//
// The browser session is an owned resource: acquired with bounded retries,
// restarted transparently when it breaks mid-run, and closed on every exit
// path before a result propagates.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

use crate::domain::movie::MovieQuery;
use crate::domain::resolution::{ReviewSource, SourceIdentifier};
use crate::domain::review::{RawReview, ReviewCategory};
use crate::error::{AppError, AppResult};
use crate::integrations::http::RateLimiter;
use crate::integrations::ports::{BrowserDriver, BrowserSession};
use crate::integrations::rotten_tomatoes::extract::{self, ExtractOptions};
use crate::services::review_pool::{ReviewHarvest, ReviewPool};
use crate::services::title_matcher::{TitleMatcher, DEFAULT_MATCH_THRESHOLD};

pub const BASE_URL: &str = "https://www.rottentomatoes.com";

/// Review listing endpoints and the provenance category each one implies.
const ENDPOINTS: [(&str, ReviewCategory); 4] = [
    ("/reviews/top-critics", ReviewCategory::TopCritic),
    ("/reviews/all-critics", ReviewCategory::Critic),
    ("/reviews/verified-audience", ReviewCategory::VerifiedAudience),
    ("/reviews/all-audience", ReviewCategory::Audience),
];

const SEARCH_ROW_SELECTOR: &str = "search-page-media-row";
const SEARCH_LINK_SELECTOR: &str = r#"a[data-qa="info-name"]"#;
const SCORE_WRAP_SELECTOR: &str = "div.score-wrap";
const CRITICS_SCORE_SELECTOR: &str = r#"rt-text[slot="criticsScore"]"#;
const AUDIENCE_SCORE_SELECTOR: &str = r#"rt-text[slot="audienceScore"]"#;

const SESSION_INIT_ATTEMPTS: u32 = 3;

#[derive(Debug, Clone)]
pub struct RottenTomatoesConfig {
    pub rate_limit: Duration,
    pub fuzzy_threshold: f64,
    pub session_init_attempts: u32,
    /// SPA search results can take a while to hydrate
    pub search_wait: Duration,
    pub score_wait: Duration,
    pub card_wait: Duration,
    pub scroll_pause: Duration,
    pub session_retry_pause: Duration,
}

impl Default for RottenTomatoesConfig {
    fn default() -> Self {
        Self {
            rate_limit: Duration::from_secs(3),
            fuzzy_threshold: DEFAULT_MATCH_THRESHOLD,
            session_init_attempts: SESSION_INIT_ATTEMPTS,
            search_wait: Duration::from_secs(15),
            score_wait: Duration::from_secs(20),
            card_wait: Duration::from_secs(5),
            scroll_pause: Duration::from_secs(2),
            session_retry_pause: Duration::from_secs(2),
        }
    }
}

impl RottenTomatoesConfig {
    /// All waits zeroed; what tests want.
    pub fn immediate() -> Self {
        Self {
            rate_limit: Duration::ZERO,
            scroll_pause: Duration::ZERO,
            session_retry_pause: Duration::ZERO,
            ..Default::default()
        }
    }
}

pub struct RottenTomatoesScraper {
    driver: Arc<dyn BrowserDriver>,
    matcher: TitleMatcher,
    rate_limiter: Mutex<RateLimiter>,
    config: RottenTomatoesConfig,
}

impl RottenTomatoesScraper {
    pub fn new(driver: Arc<dyn BrowserDriver>) -> Self {
        Self::with_config(driver, RottenTomatoesConfig::default())
    }

    pub fn with_config(driver: Arc<dyn BrowserDriver>, config: RottenTomatoesConfig) -> Self {
        Self {
            driver,
            matcher: TitleMatcher::new(),
            rate_limiter: Mutex::new(RateLimiter::new(config.rate_limit)),
            config,
        }
    }

    /// Resolve a title/year to a movie slug. Never fails: when both search
    /// stages come up empty (or the browser cannot start at all), the slug
    /// generated from the title is returned as an unvalidated guess.
    pub async fn resolve(&self, query: &MovieQuery) -> Option<SourceIdentifier> {
        match self.acquire_session().await {
            Ok(mut session) => {
                let found = self.search_cascade(session.as_mut(), query).await;
                if let Err(err) = session.close().await {
                    log::debug!("session close failed: {}", err);
                }
                if let Some(identifier) = found {
                    return Some(identifier);
                }
            }
            Err(err) => {
                log::warn!("browser unavailable for search, using slug fallback: {}", err);
            }
        }

        let slug = generate_slug(&query.title, None);
        log::info!("generated fallback slug for '{}': {}", query.title, slug);
        Some(SourceIdentifier::generated(
            ReviewSource::RottenTomatoes,
            slug,
        ))
    }

    async fn search_cascade(
        &self,
        session: &mut dyn BrowserSession,
        query: &MovieQuery,
    ) -> Option<SourceIdentifier> {
        // S0: the site's canonical URLs rarely include the year, so the
        // bare title search comes first
        match self.search_once(session, query, false).await {
            Ok(Some(identifier)) => return Some(identifier),
            Ok(None) => {}
            Err(err) => log::warn!("search failed for '{}': {}", query.title, err),
        }

        if query.year.is_some() {
            match self.search_once(session, query, true).await {
                Ok(Some(identifier)) => return Some(identifier),
                Ok(None) => {}
                Err(err) => {
                    log::warn!("year search failed for '{}': {}", query.title, err)
                }
            }
        }

        None
    }

    async fn search_once(
        &self,
        session: &mut dyn BrowserSession,
        query: &MovieQuery,
        include_year: bool,
    ) -> AppResult<Option<SourceIdentifier>> {
        let search_text = if include_year {
            format!("{} {}", query.title, query.year.unwrap_or_default())
        } else {
            query.title.clone()
        };

        self.rate_limiter.lock().await.wait().await;
        let url = format!(
            "{}/search?search={}",
            BASE_URL,
            urlencoding::encode(&search_text)
        );
        session.navigate(&url).await?;

        if !session.wait_for(SEARCH_ROW_SELECTOR, self.config.search_wait).await? {
            // Timeout is a negative search result, not an error
            log::info!("search results never appeared for '{}'", search_text);
            return Ok(None);
        }

        let rows = session.query(SEARCH_ROW_SELECTOR).await?;
        log::debug!("{} search results for '{}'", rows.len(), search_text);

        let mut best: Option<(f64, bool, String)> = None;

        for row in &rows {
            let Some(link) = row.find(SEARCH_LINK_SELECTOR) else {
                continue;
            };
            let Some(href) = link.attr("href") else {
                continue;
            };
            if href.contains("/tv/") {
                log::debug!("skipping tv result: {}", href);
                continue;
            }
            let Some(slug) = slug_from_url(&href) else {
                continue;
            };

            let result_title = link.text().trim().to_string();
            let result_year = row.attr("startyear").and_then(|y| y.parse::<i32>().ok());
            let score = self.matcher.score(&query.title, &result_title);

            if let (Some(wanted), Some(found)) = (query.year, result_year) {
                if (wanted - found).abs() > 1 {
                    log::debug!(
                        "  '{}' ({}): {:.2} rejected on year",
                        result_title,
                        found,
                        score
                    );
                    continue;
                }
            }

            let exact_year = query.year.is_some() && query.year == result_year;
            let better = match &best {
                None => true,
                Some((best_score, best_exact, _)) => {
                    score > *best_score || (score == *best_score && exact_year && !best_exact)
                }
            };
            if better {
                best = Some((score, exact_year, slug));
            }
        }

        match best {
            Some((score, _, slug)) if score >= self.config.fuzzy_threshold => {
                log::info!(
                    "matched '{}' -> {} [{:.2}]",
                    query.title,
                    slug,
                    score
                );
                let identifier = if score >= 1.0 {
                    SourceIdentifier::exact(ReviewSource::RottenTomatoes, slug)
                } else {
                    SourceIdentifier::fuzzy(ReviewSource::RottenTomatoes, slug, score)
                };
                Ok(Some(identifier))
            }
            Some((score, _, slug)) => {
                log::info!(
                    "best match {} scored {:.2}, below threshold {:.2}",
                    slug,
                    score,
                    self.config.fuzzy_threshold
                );
                Ok(None)
            }
            None => Ok(None),
        }
    }

    /// Scrape all review endpoints for a slug, deduplicating across them.
    /// A broken session is restarted transparently (bounded); an endpoint
    /// that still fails is skipped and its siblings continue.
    pub async fn scrape_reviews(
        &self,
        slug: &str,
        max_per_endpoint: usize,
        min_chars: usize,
    ) -> AppResult<ReviewHarvest> {
        let mut session = self.acquire_session().await?;
        let mut pool = ReviewPool::new();
        let mut restarts = 0u32;

        'endpoints: for (path, category) in ENDPOINTS {
            let url = format!("{}/m/{}{}", BASE_URL, slug, path);
            let mut endpoint_attempts = 0u32;

            loop {
                self.rate_limiter.lock().await.wait().await;
                let outcome = self
                    .scrape_endpoint(session.as_mut(), &url, category, max_per_endpoint, min_chars)
                    .await;

                match outcome {
                    Ok(reviews) => {
                        pool.absorb(category, reviews);
                        break;
                    }
                    Err(err) => {
                        log::warn!("endpoint {} failed: {}", url, err);
                        endpoint_attempts += 1;

                        let should_restart = err.is_retryable()
                            && endpoint_attempts < 2
                            && restarts < self.config.session_init_attempts;
                        if !should_restart {
                            break;
                        }

                        restarts += 1;
                        if let Err(close_err) = session.close().await {
                            log::debug!("closing broken session failed: {}", close_err);
                        }
                        match self.acquire_session().await {
                            Ok(fresh) => session = fresh,
                            Err(init_err) => {
                                log::error!("session restart failed: {}", init_err);
                                break 'endpoints;
                            }
                        }
                    }
                }
            }
        }

        if let Err(err) = session.close().await {
            log::debug!("session close failed: {}", err);
        }

        let harvest = pool.into_harvest();
        log::info!(
            "collected {} unique reviews for {} ({} duplicates discarded)",
            harvest.reviews.len(),
            slug,
            harvest.duplicates_discarded
        );
        Ok(harvest)
    }

    async fn scrape_endpoint(
        &self,
        session: &mut dyn BrowserSession,
        url: &str,
        category: ReviewCategory,
        max_reviews: usize,
        min_chars: usize,
    ) -> AppResult<Vec<RawReview>> {
        session.navigate(url).await?;
        let options = ExtractOptions {
            max_reviews,
            min_chars,
            card_wait: self.config.card_wait,
            scroll_pause: self.config.scroll_pause,
            now: chrono::Utc::now(),
        };
        extract::collect_cards(session, category, &options).await
    }

    /// Scrape the critics score for a slug, falling back to the audience
    /// score when critics have not weighed in.
    pub async fn scrape_score(&self, slug: &str) -> AppResult<Option<f64>> {
        let mut session = self.acquire_session().await?;
        let result = self.read_score(session.as_mut(), slug).await;
        if let Err(err) = session.close().await {
            log::debug!("session close failed: {}", err);
        }
        result
    }

    async fn read_score(
        &self,
        session: &mut dyn BrowserSession,
        slug: &str,
    ) -> AppResult<Option<f64>> {
        self.rate_limiter.lock().await.wait().await;
        session
            .navigate(&format!("{}/m/{}", BASE_URL, slug))
            .await?;

        if !session.wait_for(SCORE_WRAP_SELECTOR, self.config.score_wait).await? {
            return Ok(None);
        }

        if let Some(score) = read_percentage(session, CRITICS_SCORE_SELECTOR).await? {
            log::info!("critics score for {}: {}%", slug, score);
            return Ok(Some(score));
        }

        let audience = read_percentage(session, AUDIENCE_SCORE_SELECTOR).await?;
        if let Some(score) = audience {
            log::info!("audience score fallback for {}: {}%", slug, score);
        } else {
            log::warn!("no score of either kind for {}", slug);
        }
        Ok(audience)
    }

    async fn acquire_session(&self) -> AppResult<Box<dyn BrowserSession>> {
        for attempt in 1..=self.config.session_init_attempts {
            match self.driver.open_session().await {
                Ok(session) => return Ok(session),
                Err(err) => {
                    log::warn!(
                        "browser session start {}/{} failed: {}",
                        attempt,
                        self.config.session_init_attempts,
                        err
                    );
                    if attempt < self.config.session_init_attempts {
                        tokio::time::sleep(self.config.session_retry_pause).await;
                    }
                }
            }
        }
        Err(AppError::ResourceInit(format!(
            "browser session failed to start after {} attempts",
            self.config.session_init_attempts
        )))
    }
}

async fn read_percentage(
    session: &mut dyn BrowserSession,
    selector: &str,
) -> AppResult<Option<f64>> {
    let elements = session.query(selector).await?;
    let Some(element) = elements.first() else {
        return Ok(None);
    };
    let text = element.text().trim().to_string();
    if !text.contains('%') {
        return Ok(None);
    }
    Ok(text.trim_end_matches('%').trim().parse().ok())
}

/// Derive a movie slug from the title alone: lowercase, "&" spelled out,
/// punctuation dropped, words joined with underscores, optional year suffix.
pub fn generate_slug(title: &str, year: Option<i32>) -> String {
    let lowered = title.to_lowercase().replace('&', " and ");
    let cleaned: String = lowered
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace())
        .collect();
    let mut slug = cleaned.split_whitespace().collect::<Vec<_>>().join("_");
    if let Some(year) = year {
        slug = format!("{}_{}", slug, year);
    }
    slug
}

fn slug_from_url(href: &str) -> Option<String> {
    let idx = href.find("/m/")?;
    let slug = href[idx + 3..].trim_end_matches('/');
    if slug.is_empty() {
        None
    } else {
        Some(slug.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::resolution::ResolvedVia;
    use crate::integrations::rotten_tomatoes::test_support::{
        review_card, FakeDriver, FakeElement, FakePage,
    };

    fn search_row(title: &str, slug_url: &str, year: Option<i32>) -> FakeElement {
        let link = FakeElement::new(title).with_attr("href", slug_url);
        let mut row = FakeElement::new("").with_child(SEARCH_LINK_SELECTOR, link);
        if let Some(year) = year {
            row = row.with_attr("startyear", &year.to_string());
        }
        row
    }

    fn fast_scraper(driver: Arc<FakeDriver>) -> RottenTomatoesScraper {
        RottenTomatoesScraper::with_config(driver, RottenTomatoesConfig::immediate())
    }

    #[tokio::test]
    async fn test_resolve_exact_from_search() {
        let driver = Arc::new(FakeDriver::new().with_page(
            "/search?search=",
            FakePage::with_elements(
                SEARCH_ROW_SELECTOR,
                vec![search_row(
                    "The Matrix",
                    "https://www.rottentomatoes.com/m/the_matrix",
                    Some(1999),
                )],
            ),
        ));

        let scraper = fast_scraper(Arc::clone(&driver));
        let resolved = scraper
            .resolve(&MovieQuery::new("The Matrix", Some(1999)))
            .await
            .unwrap();

        assert_eq!(resolved.external_id, "the_matrix");
        assert_eq!(resolved.resolved_via, ResolvedVia::Exact);
        assert_eq!(driver.closes(), 1);
    }

    #[tokio::test]
    async fn test_resolve_skips_tv_rows() {
        let driver = Arc::new(FakeDriver::new().with_page(
            "/search?search=",
            FakePage::with_elements(
                SEARCH_ROW_SELECTOR,
                vec![
                    search_row(
                        "The Matrix",
                        "https://www.rottentomatoes.com/tv/the_matrix_series",
                        Some(1999),
                    ),
                    search_row(
                        "The Matrix",
                        "https://www.rottentomatoes.com/m/the_matrix",
                        Some(1999),
                    ),
                ],
            ),
        ));

        let scraper = fast_scraper(driver);
        let resolved = scraper
            .resolve(&MovieQuery::new("The Matrix", Some(1999)))
            .await
            .unwrap();
        assert_eq!(resolved.external_id, "the_matrix");
    }

    #[tokio::test]
    async fn test_resolve_year_tie_break() {
        // Same title twice; the exact-year row must win over the +-1 row
        let driver = Arc::new(FakeDriver::new().with_page(
            "/search?search=",
            FakePage::with_elements(
                SEARCH_ROW_SELECTOR,
                vec![
                    search_row(
                        "Little Women",
                        "https://www.rottentomatoes.com/m/little_women_2018",
                        Some(2018),
                    ),
                    search_row(
                        "Little Women",
                        "https://www.rottentomatoes.com/m/little_women_2019",
                        Some(2019),
                    ),
                ],
            ),
        ));

        let scraper = fast_scraper(driver);
        let resolved = scraper
            .resolve(&MovieQuery::new("Little Women", Some(2019)))
            .await
            .unwrap();
        assert_eq!(resolved.external_id, "little_women_2019");
    }

    #[tokio::test]
    async fn test_resolve_timeout_falls_back_to_generated_slug() {
        // No rows ever appear: both search stages time out
        let driver = Arc::new(
            FakeDriver::new().with_page("/search?search=", FakePage::empty()),
        );

        let scraper = fast_scraper(Arc::clone(&driver));
        let resolved = scraper
            .resolve(&MovieQuery::new("Deadpool & Wolverine", Some(2024)))
            .await
            .unwrap();

        assert_eq!(resolved.external_id, "deadpool_and_wolverine");
        assert_eq!(resolved.resolved_via, ResolvedVia::GeneratedFallback);
        // The session was still closed
        assert_eq!(driver.closes(), 1);
    }

    #[tokio::test]
    async fn test_resolve_closes_session_on_navigation_failure() {
        let driver = Arc::new(FakeDriver::new().failing_navigation_containing("/search"));

        let scraper = fast_scraper(Arc::clone(&driver));
        let resolved = scraper
            .resolve(&MovieQuery::new("The Matrix", None))
            .await
            .unwrap();

        assert_eq!(resolved.resolved_via, ResolvedVia::GeneratedFallback);
        assert_eq!(driver.closes(), 1);
    }

    #[tokio::test]
    async fn test_resolve_without_browser_still_generates_slug() {
        let driver = Arc::new(FakeDriver::new().failing_first_opens(10));

        let scraper = fast_scraper(driver);
        let resolved = scraper
            .resolve(&MovieQuery::new("The Matrix", None))
            .await
            .unwrap();
        assert_eq!(resolved.external_id, "the_matrix");
        assert_eq!(resolved.resolved_via, ResolvedVia::GeneratedFallback);
    }

    #[tokio::test]
    async fn test_scrape_reviews_requires_browser() {
        let driver = Arc::new(FakeDriver::new().failing_first_opens(10));
        let scraper = fast_scraper(Arc::clone(&driver));

        let result = scraper.scrape_reviews("the_matrix", 10, 20).await;
        assert!(matches!(result, Err(AppError::ResourceInit(_))));
        assert_eq!(driver.opens(), 3);
    }

    #[tokio::test]
    async fn test_scrape_reviews_dedups_across_endpoints() {
        let shared = "The same glowing review syndicated across every critics feed.";
        let unique = "A review that appears only in the complete critics listing.";

        let driver = Arc::new(
            FakeDriver::new()
                .with_page(
                    "/reviews/top-critics",
                    FakePage::with_elements("review-card", vec![review_card(shared, None, None)]),
                )
                .with_page(
                    "/reviews/all-critics",
                    FakePage::with_elements(
                        "review-card",
                        vec![
                            review_card(shared, None, None),
                            review_card(unique, None, None),
                        ],
                    ),
                )
                .with_page("/reviews/verified-audience", FakePage::empty())
                .with_page("/reviews/all-audience", FakePage::empty()),
        );

        let scraper = fast_scraper(driver);
        let harvest = scraper.scrape_reviews("the_matrix", 20, 20).await.unwrap();

        assert_eq!(harvest.reviews.len(), 2);
        assert_eq!(harvest.duplicates_discarded, 1);
        let syndicated = harvest
            .reviews
            .iter()
            .find(|r| r.text == shared)
            .unwrap();
        assert_eq!(syndicated.category, ReviewCategory::TopCritic);
    }

    #[tokio::test]
    async fn test_broken_endpoint_degrades_not_fails() {
        let body = "Perfectly fine review text from a healthy endpoint.";
        let driver = Arc::new(
            FakeDriver::new()
                .with_page(
                    "/reviews/top-critics",
                    FakePage::with_elements("review-card", vec![review_card(body, None, None)]),
                )
                .with_page("/reviews/all-critics", FakePage::empty())
                .with_page("/reviews/all-audience", FakePage::empty())
                .failing_navigation_containing("verified-audience"),
        );

        let scraper = fast_scraper(Arc::clone(&driver));
        let harvest = scraper.scrape_reviews("the_matrix", 20, 20).await.unwrap();

        assert_eq!(harvest.reviews.len(), 1);
        // Broken session was restarted once for the retry, and every
        // session that was opened also got closed
        assert!(driver.opens() >= 2);
        assert_eq!(driver.closes(), driver.opens());
    }

    #[tokio::test]
    async fn test_scroll_loop_loads_more_cards() {
        use std::collections::HashMap;

        let bodies = [
            "First card body, present before any scrolling happens.",
            "Second card body, revealed by the first scroll iteration.",
            "Third card body, revealed by the first scroll iteration.",
        ];
        let cards: Vec<FakeElement> =
            bodies.iter().map(|b| review_card(b, None, None)).collect();

        let mut stage0 = HashMap::new();
        stage0.insert("review-card".to_string(), vec![cards[0].clone()]);
        let mut stage1 = HashMap::new();
        stage1.insert("review-card".to_string(), cards);

        let page = FakePage {
            title: String::new(),
            stages: vec![stage0, stage1],
            heights: vec![1000, 2000],
        };

        let driver = Arc::new(
            FakeDriver::new()
                .with_page("/reviews/top-critics", page)
                .with_page("/reviews/all-critics", FakePage::empty())
                .with_page("/reviews/verified-audience", FakePage::empty())
                .with_page("/reviews/all-audience", FakePage::empty()),
        );

        let scraper = fast_scraper(driver);
        let harvest = scraper.scrape_reviews("the_matrix", 20, 20).await.unwrap();
        assert_eq!(harvest.reviews.len(), 3);
    }

    #[tokio::test]
    async fn test_scrape_score_critics_first() {
        let driver = Arc::new(FakeDriver::new().with_page(
            "/m/the_matrix",
            FakePage::with_elements(SCORE_WRAP_SELECTOR, vec![FakeElement::new("")])
                .and_elements(CRITICS_SCORE_SELECTOR, vec![FakeElement::new("83%")])
                .and_elements(AUDIENCE_SCORE_SELECTOR, vec![FakeElement::new("72%")]),
        ));

        let scraper = fast_scraper(driver);
        let score = scraper.scrape_score("the_matrix").await.unwrap();
        assert_eq!(score, Some(83.0));
    }

    #[tokio::test]
    async fn test_scrape_score_audience_fallback() {
        let driver = Arc::new(FakeDriver::new().with_page(
            "/m/obscure_film",
            FakePage::with_elements(SCORE_WRAP_SELECTOR, vec![FakeElement::new("")])
                .and_elements(CRITICS_SCORE_SELECTOR, vec![FakeElement::new("- -")])
                .and_elements(AUDIENCE_SCORE_SELECTOR, vec![FakeElement::new("72%")]),
        ));

        let scraper = fast_scraper(driver);
        let score = scraper.scrape_score("obscure_film").await.unwrap();
        assert_eq!(score, Some(72.0));
    }

    #[tokio::test]
    async fn test_scrape_score_absent() {
        let driver = Arc::new(
            FakeDriver::new().with_page("/m/unknown_film", FakePage::empty()),
        );
        let scraper = fast_scraper(driver);
        let score = scraper.scrape_score("unknown_film").await.unwrap();
        assert_eq!(score, None);
    }

    #[test]
    fn test_generate_slug() {
        assert_eq!(
            generate_slug("Deadpool & Wolverine", None),
            "deadpool_and_wolverine"
        );
        assert_eq!(
            generate_slug("Deadpool & Wolverine", Some(2024)),
            "deadpool_and_wolverine_2024"
        );
        assert_eq!(generate_slug("The Matrix", None), "the_matrix");
        assert_eq!(generate_slug("WALL-E", None), "walle");
    }

    #[test]
    fn test_slug_from_url() {
        assert_eq!(
            slug_from_url("https://www.rottentomatoes.com/m/the_matrix/").as_deref(),
            Some("the_matrix")
        );
        assert_eq!(slug_from_url("/m/the_matrix").as_deref(), Some("the_matrix"));
        assert_eq!(slug_from_url("https://example.com/other"), None);
    }
}
