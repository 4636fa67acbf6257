// src/lib.rs
// CineHub - movie review and rating collection engine
//
// Architecture:
// - Domain-centric: value objects and reconciliation rules live in domain/
// - Ports at the seams: network, browser and persistence are trait
//   boundaries implemented at the edges
// - Explicit: ordered fallback chains, no implicit behavior
// - Resilient: per-record and per-movie failures degrade, never abort
//
// The crate is a library; scheduling and any CLI live in the consumer.

// ============================================================================
// MODULES
// ============================================================================

pub mod db;
pub mod domain;
pub mod error;
pub mod events;
pub mod integrations;
pub mod repositories;
pub mod services;

// ============================================================================
// PUBLIC API - Domain
// ============================================================================

pub use domain::{
    fingerprint_text,
    recommend,
    CandidateResult,
    MatchConfidence,
    // Movie
    Movie,
    MovieQuery,
    RatingObservation,
    RatingSource,
    // Review
    RawReview,
    // Rating
    ReconciledRating,
    ResolvedVia,
    ReviewCategory,
    ReviewSource,
    SkipReason,
    // Resolution
    SourceIdentifier,
    FRESHNESS_WINDOW_DAYS,
};

// ============================================================================
// PUBLIC API - Errors
// ============================================================================

pub use error::{AppError, AppResult};

// ============================================================================
// PUBLIC API - Events
// ============================================================================

pub use events::{
    create_event_bus,
    DomainEvent,
    EventBus,
    MovieResolved,
    ResolutionFailed,
    ReviewsCollected,
    ScrapeBatchCompleted,
};

// ============================================================================
// PUBLIC API - Database
// ============================================================================

pub use db::{
    create_connection_pool, create_connection_pool_at, create_memory_pool, initialize_database,
    ConnectionPool,
};

// ============================================================================
// PUBLIC API - Repositories
// ============================================================================

pub use repositories::{
    MovieRepository,
    ReviewRepository,
    ScrapeLogEntry,
    ScrapeLogRecord,
    ScrapeLogRepository,
    ScrapeStatus,
    SqliteMovieRepository,
    SqliteReviewRepository,
    SqliteScrapeLogRepository,
};

// ============================================================================
// PUBLIC API - Integrations (ports + source clients)
// ============================================================================

pub use integrations::{
    BrowserDriver,
    BrowserSession,
    DocumentFetcher,
    ElementNode,
    HttpFetcher,
    ImdbScraper,
    RateLimiter,
    RottenTomatoesScraper,
};

pub use integrations::rotten_tomatoes::RottenTomatoesConfig;

// ============================================================================
// PUBLIC API - Services
// ============================================================================

pub use services::{
    merge_batches,
    MovieScrapeOutcome,
    ReviewHarvest,
    ReviewPool,
    ScrapeConfig,
    ScrapeRunSummary,
    // Scrape Service (orchestration)
    ScrapeService,
    // Title Matcher
    TitleMatcher,
    DEFAULT_MATCH_THRESHOLD,
    FALLBACK_MATCH_THRESHOLD,
};
