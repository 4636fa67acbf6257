// src/db/migrations.rs
//
// Database schema initialization and migrations
//
// PRINCIPLES:
// - Explicit schema versions
// - No automatic migrations
// - Idempotent: safe to call on every startup

use rusqlite::Connection;

use crate::error::{AppError, AppResult};

/// Current schema version
const CURRENT_SCHEMA_VERSION: i32 = 1;

/// Initialize the database schema.
///
/// Checks the recorded schema version and applies the initial schema on a
/// fresh database. Newer-than-supported versions are refused.
pub fn initialize_database(conn: &Connection) -> AppResult<()> {
    let current_version = get_schema_version(conn)?;

    if current_version == 0 {
        apply_initial_schema(conn)?;
        set_schema_version(conn, CURRENT_SCHEMA_VERSION)?;
    } else if current_version < CURRENT_SCHEMA_VERSION {
        return Err(AppError::Other(format!(
            "Schema version {} is outdated. Expected {}. Manual migration required.",
            current_version, CURRENT_SCHEMA_VERSION
        )));
    } else if current_version > CURRENT_SCHEMA_VERSION {
        return Err(AppError::Other(format!(
            "Schema version {} is newer than supported {}. Update the application.",
            current_version, CURRENT_SCHEMA_VERSION
        )));
    }

    Ok(())
}

/// Returns 0 when the version table does not exist yet (fresh database).
fn get_schema_version(conn: &Connection) -> AppResult<i32> {
    let table_exists: bool = conn
        .query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            [],
            |row| row.get(0),
        )
        .map_err(AppError::Database)?;

    if !table_exists {
        return Ok(0);
    }

    conn.query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
        row.get(0)
    })
    .map_err(AppError::Database)
}

fn set_schema_version(conn: &Connection, version: i32) -> AppResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);
         DELETE FROM schema_version;",
    )?;
    conn.execute("INSERT INTO schema_version (version) VALUES (?1)", [version])?;
    Ok(())
}

fn apply_initial_schema(conn: &Connection) -> AppResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS movies (
            id              TEXT PRIMARY KEY,
            title           TEXT NOT NULL,
            release_year    INTEGER,
            genres          TEXT NOT NULL DEFAULT '[]',
            overview        TEXT,
            runtime         INTEGER,
            language        TEXT,
            tmdb_rating     REAL,
            tmdb_vote_count INTEGER,
            popularity      REAL,
            imdb_id         TEXT UNIQUE,
            imdb_rating     REAL,
            imdb_vote_count INTEGER,
            imdb_scraped_at TEXT,
            rt_slug         TEXT,
            rt_tomatometer  REAL,
            created_at      TEXT NOT NULL,
            updated_at      TEXT NOT NULL,
            UNIQUE (title, release_year)
        );
        CREATE INDEX IF NOT EXISTS idx_movies_title ON movies (title);
        CREATE INDEX IF NOT EXISTS idx_movies_year ON movies (release_year);

        CREATE TABLE IF NOT EXISTS reviews (
            id            TEXT PRIMARY KEY,
            movie_id      TEXT NOT NULL REFERENCES movies (id) ON DELETE CASCADE,
            source        TEXT NOT NULL,
            source_id     TEXT NOT NULL UNIQUE,
            category      TEXT NOT NULL,
            text          TEXT NOT NULL,
            rating        REAL,
            title         TEXT,
            author        TEXT,
            published_at  TEXT,
            upvotes       INTEGER NOT NULL DEFAULT 0,
            downvotes     INTEGER NOT NULL DEFAULT 0,
            length_chars  INTEGER NOT NULL,
            word_count    INTEGER NOT NULL,
            scraped_at    TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_reviews_movie ON reviews (movie_id);
        CREATE INDEX IF NOT EXISTS idx_reviews_source ON reviews (source);

        CREATE TABLE IF NOT EXISTS scrape_logs (
            id               INTEGER PRIMARY KEY AUTOINCREMENT,
            movie_id         TEXT,
            source           TEXT NOT NULL,
            status           TEXT NOT NULL,
            items_collected  INTEGER NOT NULL DEFAULT 0,
            duration_seconds REAL,
            error_message    TEXT,
            logged_at        TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_logs_source ON scrape_logs (source);
        ",
    )?;
    Ok(())
}
