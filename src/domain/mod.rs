// src/domain/mod.rs
//
// Domain Root - The Single Source of Truth for Domain API
//
// This file MUST declare all domain modules and re-export their public API.
// All other modules import from `crate::domain::*`

// ============================================================================
// MODULE DECLARATIONS
// ============================================================================

pub mod movie;
pub mod rating;
pub mod resolution;
pub mod review;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

// Movie Domain
pub use movie::{Movie, MovieQuery};

// Resolution Domain
pub use resolution::{
    CandidateResult, MatchConfidence, ResolvedVia, ReviewSource, SourceIdentifier,
};

// Review Domain
pub use review::{fingerprint_text, RawReview, ReviewCategory, SkipReason};

// Rating Domain
pub use rating::{
    recommend, RatingObservation, RatingSource, ReconciledRating, FRESHNESS_WINDOW_DAYS,
};
