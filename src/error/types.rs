// src/error/types.rs
//
// Error taxonomy for the scraping pipeline.
//
// RULES:
// - Transport errors are retryable; everything else is not
// - "No match found" is NOT an error - resolvers return Option for that
// - Per-record extraction failures use domain::review::SkipReason, not AppError

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Pool error: {0}")]
    Pool(String),

    /// Network or timeout failure. Always retryable with bounded attempts.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Expected markup was not found. Never retried against the same
    /// selector; callers fall through to the next selector or stage.
    #[error("Structure mismatch: {0}")]
    StructureMismatch(String),

    /// Browser session could not be started or restarted. Fatal for the
    /// current movie's pipeline only, never for the whole batch.
    #[error("Resource initialization failed: {0}")]
    ResourceInit(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Resource not found")]
    NotFound,

    #[error("Other error: {0}")]
    Other(String),
}

impl AppError {
    /// Whether a bounded retry with backoff is worth attempting.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::Transport(_))
    }
}

impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl From<uuid::Error> for AppError {
    fn from(err: uuid::Error) -> Self {
        AppError::Other(format!("UUID error: {}", err))
    }
}

impl From<chrono::ParseError> for AppError {
    fn from(err: chrono::ParseError) -> Self {
        AppError::Other(format!("Date parse error: {}", err))
    }
}

impl From<r2d2::Error> for AppError {
    fn from(err: r2d2::Error) -> Self {
        AppError::Pool(err.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Transport(err.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_transport_is_retryable() {
        assert!(AppError::Transport("timeout".to_string()).is_retryable());
        assert!(!AppError::StructureMismatch("no container".to_string()).is_retryable());
        assert!(!AppError::ResourceInit("no driver".to_string()).is_retryable());
        assert!(!AppError::NotFound.is_retryable());
    }
}
