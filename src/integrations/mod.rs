// src/integrations/mod.rs
//
// External source integrations.
//
// ARCHITECTURE:
// - ports: the network/browser abstractions the scraping logic drives
// - http: reqwest-backed fetcher for server-rendered pages
// - imdb / rotten_tomatoes: one scraping client per source
//
// CRITICAL RULES:
// - This is INFRASTRUCTURE, not DOMAIN
// - Clients return domain value objects; they never touch persistence

pub mod http;
pub mod imdb;
pub mod ports;
pub mod rotten_tomatoes;

pub use http::{fetch_with_retry, HttpFetcher, RateLimiter};
pub use imdb::ImdbScraper;
pub use ports::{BrowserDriver, BrowserSession, DocumentFetcher, ElementNode};
pub use rotten_tomatoes::RottenTomatoesScraper;
