// src/repositories/scrape_log_repository.rs
//
// Run log persistence. One row per (movie, source) scrape attempt; the
// aggregate of recent rows is what diagnoses systemic breakage (e.g. every
// resolution suddenly failing after a site redesign).

use chrono::{DateTime, Utc};
use rusqlite::{params, Row};
use std::sync::Arc;
use uuid::Uuid;

use crate::db::ConnectionPool;
use crate::error::AppResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrapeStatus {
    Success,
    /// Some endpoints or records failed but others were collected
    Partial,
    Failed,
}

impl ScrapeStatus {
    fn parse(raw: &str) -> Self {
        match raw {
            "success" => ScrapeStatus::Success,
            "partial" => ScrapeStatus::Partial,
            _ => ScrapeStatus::Failed,
        }
    }
}

impl std::fmt::Display for ScrapeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScrapeStatus::Success => write!(f, "success"),
            ScrapeStatus::Partial => write!(f, "partial"),
            ScrapeStatus::Failed => write!(f, "failed"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScrapeLogEntry {
    pub movie_id: Option<Uuid>,
    pub source: String,
    pub status: ScrapeStatus,
    pub items_collected: u32,
    pub duration_seconds: f64,
    pub error_message: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ScrapeLogRecord {
    pub id: i64,
    pub movie_id: Option<Uuid>,
    pub source: String,
    pub status: ScrapeStatus,
    pub items_collected: u32,
    pub duration_seconds: f64,
    pub error_message: Option<String>,
    pub logged_at: DateTime<Utc>,
}

pub trait ScrapeLogRepository: Send + Sync {
    fn record(&self, entry: &ScrapeLogEntry) -> AppResult<()>;

    /// Most recent log rows, newest first.
    fn recent(&self, limit: u32) -> AppResult<Vec<ScrapeLogRecord>>;
}

pub struct SqliteScrapeLogRepository {
    pool: Arc<ConnectionPool>,
}

impl SqliteScrapeLogRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    fn row_to_record(row: &Row) -> Result<ScrapeLogRecord, rusqlite::Error> {
        let movie_id_str: Option<String> = row.get("movie_id")?;
        let movie_id = movie_id_str
            .map(|s| {
                Uuid::parse_str(&s)
                    .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
            })
            .transpose()?;

        let status_str: String = row.get("status")?;
        let logged_at_str: String = row.get("logged_at")?;
        let logged_at = DateTime::parse_from_rfc3339(&logged_at_str)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

        Ok(ScrapeLogRecord {
            id: row.get("id")?,
            movie_id,
            source: row.get("source")?,
            status: ScrapeStatus::parse(&status_str),
            items_collected: row.get::<_, i64>("items_collected")? as u32,
            duration_seconds: row.get::<_, Option<f64>>("duration_seconds")?.unwrap_or(0.0),
            error_message: row.get("error_message")?,
            logged_at,
        })
    }
}

impl ScrapeLogRepository for SqliteScrapeLogRepository {
    fn record(&self, entry: &ScrapeLogEntry) -> AppResult<()> {
        let conn = self.pool.get()?;
        conn.execute(
            "INSERT INTO scrape_logs
                (movie_id, source, status, items_collected, duration_seconds,
                 error_message, logged_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                entry.movie_id.map(|id| id.to_string()),
                entry.source,
                entry.status.to_string(),
                entry.items_collected as i64,
                entry.duration_seconds,
                entry.error_message,
                Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    fn recent(&self, limit: u32) -> AppResult<Vec<ScrapeLogRecord>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT id, movie_id, source, status, items_collected,
                    duration_seconds, error_message, logged_at
             FROM scrape_logs
             ORDER BY id DESC
             LIMIT ?1",
        )?;
        let records = stmt
            .query_map(params![limit as i64], Self::row_to_record)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }
}
