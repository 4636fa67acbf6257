// src/domain/review.rs
//
// Review value objects.
//
// A RawReview is immutable once created. Its dedup identity is derived from
// the normalized body text (fingerprint), NOT from source_id: the same text
// published under two listing endpoints must fingerprint identically across
// process runs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Provenance category of a review. Ordinals matter only through
/// `priority()`, which decides which duplicate survives a merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewCategory {
    TopCritic,
    Critic,
    VerifiedAudience,
    Audience,
    Unknown,
}

impl ReviewCategory {
    /// Fixed ordinal table: higher-specificity categories win duplicates.
    /// Unknown/absent categories rank lowest.
    pub fn priority(&self) -> u8 {
        match self {
            ReviewCategory::TopCritic => 4,
            ReviewCategory::Critic => 3,
            ReviewCategory::VerifiedAudience => 2,
            ReviewCategory::Audience => 1,
            ReviewCategory::Unknown => 0,
        }
    }

    pub fn parse(label: &str) -> Self {
        match label {
            "top_critic" => ReviewCategory::TopCritic,
            "critic" => ReviewCategory::Critic,
            "verified_audience" => ReviewCategory::VerifiedAudience,
            "audience" => ReviewCategory::Audience,
            _ => ReviewCategory::Unknown,
        }
    }
}

impl std::fmt::Display for ReviewCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReviewCategory::TopCritic => write!(f, "top_critic"),
            ReviewCategory::Critic => write!(f, "critic"),
            ReviewCategory::VerifiedAudience => write!(f, "verified_audience"),
            ReviewCategory::Audience => write!(f, "audience"),
            ReviewCategory::Unknown => write!(f, "unknown"),
        }
    }
}

/// A single extracted review.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawReview {
    /// Globally unique per source + content (e.g. "imdb_rw123456")
    pub source_id: String,

    /// Cleaned body text; never shorter than the configured minimum
    pub text: String,

    /// Numeric rating if the source provides one (0-10 scale)
    pub rating: Option<f64>,

    /// Review headline, if any
    pub title: Option<String>,

    pub author: Option<String>,

    pub published_at: Option<DateTime<Utc>>,

    pub upvotes: u32,

    pub downvotes: u32,

    pub category: ReviewCategory,

    pub length_chars: usize,

    pub word_count: usize,
}

impl RawReview {
    /// Build a review from cleaned body text, deriving the length metrics.
    pub fn from_text(source_id: String, text: String, category: ReviewCategory) -> Self {
        let length_chars = text.chars().count();
        let word_count = text.split_whitespace().count();
        Self {
            source_id,
            text,
            rating: None,
            title: None,
            author: None,
            published_at: None,
            upvotes: 0,
            downvotes: 0,
            category,
            length_chars,
            word_count,
        }
    }

    /// Content-derived dedup identity: hex SHA-256 over the lowercased,
    /// whitespace-collapsed body text. Stable across process runs.
    pub fn fingerprint(&self) -> String {
        fingerprint_text(&self.text)
    }
}

/// Fingerprint arbitrary review text. Exposed so source clients can derive
/// deterministic source_ids for sources that publish no review id.
pub fn fingerprint_text(text: &str) -> String {
    let normalized = text
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    let digest = Sha256::digest(normalized.as_bytes());
    let mut out = String::with_capacity(digest.len() * 2);
    for byte in digest {
        out.push_str(&format!("{:02x}", byte));
    }
    out
}

/// Why a single review container was discarded during extraction.
/// These never cross the batch boundary as errors; siblings keep parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// No usable body text found under any selector
    BodyMissing,

    /// Body text shorter than the configured minimum
    ContentTooShort { length: usize },

    /// A field was present but unparsable in a way that invalidates the record
    InvalidField(String),
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::BodyMissing => write!(f, "body_missing"),
            SkipReason::ContentTooShort { length } => {
                write!(f, "content_too_short ({} chars)", length)
            }
            SkipReason::InvalidField(field) => write!(f, "invalid_field ({})", field),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_table() {
        assert_eq!(ReviewCategory::TopCritic.priority(), 4);
        assert_eq!(ReviewCategory::Critic.priority(), 3);
        assert_eq!(ReviewCategory::VerifiedAudience.priority(), 2);
        assert_eq!(ReviewCategory::Audience.priority(), 1);
        assert_eq!(ReviewCategory::Unknown.priority(), 0);
    }

    #[test]
    fn test_fingerprint_ignores_whitespace_and_case() {
        let a = RawReview::from_text(
            "a".to_string(),
            "Great  movie,\n\twould watch again".to_string(),
            ReviewCategory::Audience,
        );
        let b = RawReview::from_text(
            "b".to_string(),
            "great movie, would watch AGAIN".to_string(),
            ReviewCategory::Critic,
        );
        assert_eq!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn test_fingerprint_differs_for_different_text() {
        let a = fingerprint_text("one review body here");
        let b = fingerprint_text("another review body here");
        assert_ne!(a, b);
    }

    #[test]
    fn test_from_text_derives_metrics() {
        let review = RawReview::from_text(
            "imdb_rw1".to_string(),
            "short but valid body".to_string(),
            ReviewCategory::Audience,
        );
        assert_eq!(review.length_chars, 20);
        assert_eq!(review.word_count, 4);
    }

    #[test]
    fn test_category_parse_round_trip() {
        for category in [
            ReviewCategory::TopCritic,
            ReviewCategory::Critic,
            ReviewCategory::VerifiedAudience,
            ReviewCategory::Audience,
        ] {
            assert_eq!(ReviewCategory::parse(&category.to_string()), category);
        }
        assert_eq!(ReviewCategory::parse("whatever"), ReviewCategory::Unknown);
    }
}
