// src/services/mod.rs
//
// Services Module - Orchestration Layer

pub mod review_pool;
pub mod scrape_service;
pub mod title_matcher;


// Re-export all services and their types
pub use review_pool::{merge_batches, ReviewHarvest, ReviewPool};

pub use scrape_service::{
    MovieScrapeOutcome,
    ScrapeConfig,
    ScrapeRunSummary,
    ScrapeService,
};

pub use title_matcher::{
    TitleMatcher,
    DEFAULT_MATCH_THRESHOLD,
    FALLBACK_MATCH_THRESHOLD,
};
