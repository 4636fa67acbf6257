// src/events/scrape_events.rs
//
// Scrape lifecycle events.
//
// Events are immutable facts about what the pipeline did. Resolution events
// carry deterministic ids derived from their content so identical outcomes
// across reruns produce identical events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::resolution::SourceIdentifier;

/// Trait all pipeline events implement.
pub trait DomainEvent: std::fmt::Debug + Clone {
    fn event_id(&self) -> Uuid;
    fn occurred_at(&self) -> DateTime<Utc>;
    fn event_type(&self) -> &'static str;
}

// ============================================================================
// RESOLUTION EVENTS
// ============================================================================

/// Emitted when a movie resolves to a source identifier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieResolved {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub movie_id: Uuid,
    pub source: String,
    pub external_id: String,
    pub resolved_via: String,
    pub confidence: f64,
}

impl MovieResolved {
    pub fn new(movie_id: Uuid, identifier: &SourceIdentifier) -> Self {
        // Same movie + same identifier => same event id, so reruns are
        // recognizable as duplicates downstream
        let seed = format!(
            "{}/{}/{}",
            movie_id, identifier.source, identifier.external_id
        );
        Self {
            event_id: Uuid::new_v5(&Uuid::NAMESPACE_OID, seed.as_bytes()),
            occurred_at: Utc::now(),
            movie_id,
            source: identifier.source.to_string(),
            external_id: identifier.external_id.clone(),
            resolved_via: identifier.resolved_via.to_string(),
            confidence: identifier.match_confidence.score(),
        }
    }
}

impl DomainEvent for MovieResolved {
    fn event_id(&self) -> Uuid {
        self.event_id
    }
    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
    fn event_type(&self) -> &'static str {
        "MovieResolved"
    }
}

/// Emitted when a source's resolution cascade exhausts without a match.
/// This is a terminal negative outcome, not an error.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResolutionFailed {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub movie_id: Uuid,
    pub source: String,
    pub title: String,
}

impl ResolutionFailed {
    pub fn new(movie_id: Uuid, source: String, title: String) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            movie_id,
            source,
            title,
        }
    }
}

impl DomainEvent for ResolutionFailed {
    fn event_id(&self) -> Uuid {
        self.event_id
    }
    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
    fn event_type(&self) -> &'static str {
        "ResolutionFailed"
    }
}

// ============================================================================
// COLLECTION EVENTS
// ============================================================================

/// Emitted after reviews from one source were deduplicated and persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReviewsCollected {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub movie_id: Uuid,
    pub source: String,
    pub collected: usize,
    pub duplicates_discarded: usize,
    pub stored: usize,
}

impl ReviewsCollected {
    pub fn new(
        movie_id: Uuid,
        source: String,
        collected: usize,
        duplicates_discarded: usize,
        stored: usize,
    ) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            movie_id,
            source,
            collected,
            duplicates_discarded,
            stored,
        }
    }
}

impl DomainEvent for ReviewsCollected {
    fn event_id(&self) -> Uuid {
        self.event_id
    }
    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
    fn event_type(&self) -> &'static str {
        "ReviewsCollected"
    }
}

/// Emitted once per batch run with the aggregate counts a run report needs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScrapeBatchCompleted {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub total_movies: usize,
    pub resolved: usize,
    pub unresolved: usize,
    pub reviews_collected: usize,
    pub errors: usize,
    pub duration_ms: u64,
}

impl ScrapeBatchCompleted {
    pub fn new(
        total_movies: usize,
        resolved: usize,
        unresolved: usize,
        reviews_collected: usize,
        errors: usize,
        duration_ms: u64,
    ) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            total_movies,
            resolved,
            unresolved,
            reviews_collected,
            errors,
            duration_ms,
        }
    }
}

impl DomainEvent for ScrapeBatchCompleted {
    fn event_id(&self) -> Uuid {
        self.event_id
    }
    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
    fn event_type(&self) -> &'static str {
        "ScrapeBatchCompleted"
    }
}
