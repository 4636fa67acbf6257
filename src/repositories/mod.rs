// src/repositories/mod.rs
//
// Persistence port. Traits are what the services depend on; the Sqlite
// implementations are the only code that touches SQL.

pub mod movie_repository;
pub mod review_repository;
pub mod scrape_log_repository;

pub use movie_repository::{MovieRepository, SqliteMovieRepository};
pub use review_repository::{ReviewRepository, SqliteReviewRepository};
pub use scrape_log_repository::{
    ScrapeLogEntry, ScrapeLogRecord, ScrapeLogRepository, ScrapeStatus, SqliteScrapeLogRepository,
};
