// src/domain/resolution.rs
//
// Value objects produced by identifier resolution.
//
// INVARIANTS:
// - All fields are immutable
// - resolved_via records truthfully which cascade stage produced the match
// - CandidateResult is ephemeral and never persisted

use serde::{Deserialize, Serialize};

/// The live sources reviews are scraped from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewSource {
    Imdb,
    RottenTomatoes,
}

impl std::fmt::Display for ReviewSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReviewSource::Imdb => write!(f, "imdb"),
            ReviewSource::RottenTomatoes => write!(f, "rotten_tomatoes"),
        }
    }
}

/// Which cascade stage produced a source identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolvedVia {
    /// Exact search hit on the source's own search
    Exact,

    /// Fuzzy match over the search result candidates
    Fuzzy,

    /// Identifier derived from the title text alone, without a search hit
    GeneratedFallback,
}

impl std::fmt::Display for ResolvedVia {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolvedVia::Exact => write!(f, "exact"),
            ResolvedVia::Fuzzy => write!(f, "fuzzy"),
            ResolvedVia::GeneratedFallback => write!(f, "generated_fallback"),
        }
    }
}

/// Confidence that a resolved identifier really is the queried movie.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MatchConfidence {
    score: f64,
}

impl MatchConfidence {
    /// Creates a new confidence score, clamped to [0.0, 1.0]
    pub fn new(score: f64) -> Self {
        Self {
            score: score.clamp(0.0, 1.0),
        }
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    /// Confidence assigned to exact search hits
    pub fn exact() -> Self {
        Self::new(1.0)
    }

    /// Confidence assigned to generated-fallback identifiers, which are
    /// never validated against a search result
    pub fn fallback() -> Self {
        Self::new(0.3)
    }
}

impl PartialEq for MatchConfidence {
    fn eq(&self, other: &Self) -> bool {
        (self.score - other.score).abs() < f64::EPSILON
    }
}

impl std::fmt::Display for MatchConfidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.score)
    }
}

/// A stable per-source movie identifier, plus how we got it.
/// One per (movie, source); absence means resolution definitively failed,
/// which is a valid terminal outcome rather than an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceIdentifier {
    pub source: ReviewSource,

    /// IMDb title id ("tt1375666") or Rotten Tomatoes slug ("the_matrix")
    pub external_id: String,

    pub match_confidence: MatchConfidence,

    pub resolved_via: ResolvedVia,
}

impl SourceIdentifier {
    pub fn exact(source: ReviewSource, external_id: String) -> Self {
        Self {
            source,
            external_id,
            match_confidence: MatchConfidence::exact(),
            resolved_via: ResolvedVia::Exact,
        }
    }

    pub fn fuzzy(source: ReviewSource, external_id: String, score: f64) -> Self {
        Self {
            source,
            external_id,
            match_confidence: MatchConfidence::new(score),
            resolved_via: ResolvedVia::Fuzzy,
        }
    }

    pub fn generated(source: ReviewSource, external_id: String) -> Self {
        Self {
            source,
            external_id,
            match_confidence: MatchConfidence::fallback(),
            resolved_via: ResolvedVia::GeneratedFallback,
        }
    }
}

/// One row of a search results page, before matching.
/// Ephemeral: lives only while a results page is being scanned.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateResult {
    pub display_title: String,
    pub external_id: String,
    pub year: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_clamping() {
        assert_eq!(MatchConfidence::new(1.5).score(), 1.0);
        assert_eq!(MatchConfidence::new(-0.2).score(), 0.0);
        assert_eq!(MatchConfidence::new(0.72).score(), 0.72);
    }

    #[test]
    fn test_constructors_record_stage_truthfully() {
        let exact = SourceIdentifier::exact(ReviewSource::Imdb, "tt0133093".to_string());
        assert_eq!(exact.resolved_via, ResolvedVia::Exact);
        assert_eq!(exact.match_confidence.score(), 1.0);

        let fuzzy = SourceIdentifier::fuzzy(ReviewSource::Imdb, "tt0133093".to_string(), 0.72);
        assert_eq!(fuzzy.resolved_via, ResolvedVia::Fuzzy);
        assert_eq!(fuzzy.match_confidence.score(), 0.72);

        let generated =
            SourceIdentifier::generated(ReviewSource::RottenTomatoes, "the_matrix".to_string());
        assert_eq!(generated.resolved_via, ResolvedVia::GeneratedFallback);
    }

    #[test]
    fn test_source_display() {
        assert_eq!(ReviewSource::Imdb.to_string(), "imdb");
        assert_eq!(ReviewSource::RottenTomatoes.to_string(), "rotten_tomatoes");
    }
}
