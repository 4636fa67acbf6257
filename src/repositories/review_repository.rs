// src/repositories/review_repository.rs
//
// Review persistence. The source_id unique constraint makes inserts
// idempotent: re-running a scrape re-inserts nothing and reports only the
// genuinely new rows.

use chrono::Utc;
use rusqlite::params;
use std::sync::Arc;
use uuid::Uuid;

use crate::db::ConnectionPool;
use crate::domain::resolution::ReviewSource;
use crate::domain::review::RawReview;
use crate::error::AppResult;

/// Rows are written in chunks of this size, each chunk in one transaction.
const INSERT_CHUNK_SIZE: usize = 100;

pub trait ReviewRepository: Send + Sync {
    /// Insert a batch of reviews for a movie. Rows whose source_id already
    /// exists are skipped silently. Returns how many rows were inserted.
    fn insert_batch(
        &self,
        movie_id: Uuid,
        source: ReviewSource,
        reviews: &[RawReview],
    ) -> AppResult<usize>;

    fn count_for_movie(&self, movie_id: Uuid) -> AppResult<i64>;

    fn exists(&self, source_id: &str) -> AppResult<bool>;
}

pub struct SqliteReviewRepository {
    pool: Arc<ConnectionPool>,
}

impl SqliteReviewRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }
}

impl ReviewRepository for SqliteReviewRepository {
    fn insert_batch(
        &self,
        movie_id: Uuid,
        source: ReviewSource,
        reviews: &[RawReview],
    ) -> AppResult<usize> {
        let mut conn = self.pool.get()?;
        let mut inserted = 0usize;

        for chunk in reviews.chunks(INSERT_CHUNK_SIZE) {
            let tx = conn.transaction()?;
            {
                let mut stmt = tx.prepare(
                    "INSERT OR IGNORE INTO reviews (
                        id, movie_id, source, source_id, category, text, rating,
                        title, author, published_at, upvotes, downvotes,
                        length_chars, word_count, scraped_at
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
                )?;

                for review in chunk {
                    let rows = stmt.execute(params![
                        Uuid::new_v4().to_string(),
                        movie_id.to_string(),
                        source.to_string(),
                        review.source_id,
                        review.category.to_string(),
                        review.text,
                        review.rating,
                        review.title,
                        review.author,
                        review.published_at.map(|dt| dt.to_rfc3339()),
                        review.upvotes as i64,
                        review.downvotes as i64,
                        review.length_chars as i64,
                        review.word_count as i64,
                        Utc::now().to_rfc3339(),
                    ])?;
                    inserted += rows;
                }
            }
            tx.commit()?;
        }

        Ok(inserted)
    }

    fn count_for_movie(&self, movie_id: Uuid) -> AppResult<i64> {
        let conn = self.pool.get()?;
        let count = conn.query_row(
            "SELECT COUNT(*) FROM reviews WHERE movie_id = ?1",
            params![movie_id.to_string()],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    fn exists(&self, source_id: &str) -> AppResult<bool> {
        let conn = self.pool.get()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM reviews WHERE source_id = ?1",
            params![source_id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }
}
