// src/domain/rating.rs
//
// Rating reconciliation.
//
// recommend() is a pure function: same observations + same clock, same
// answer. No I/O, no hidden state. The result is a projection of the current
// observations and is never stored as its own entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A live rating observation is preferred outright when younger than this.
pub const FRESHNESS_WINDOW_DAYS: i64 = 7;

/// Note attached when two providers disagree by more than one point.
pub const NOTE_LARGE_DIFFERENCE: &str = "Large difference - investigate";
pub const NOTE_SIMILAR: &str = "Ratings are similar";

/// One provider's rating for one movie, on a common 0-10 scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingObservation {
    pub provider: String,

    pub value: f64,

    pub vote_count: Option<u32>,

    /// When this value was collected; None for dataset values of
    /// unknown export date
    pub observed_at: Option<DateTime<Utc>>,

    /// Whether this observation was scraped live (eligible for the
    /// freshness override)
    pub live: bool,
}

/// A contributing observation with its derived age, for transparency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingSource {
    pub provider: String,
    pub value: f64,
    pub votes: Option<u32>,
    pub age_days: Option<i64>,
}

/// The reconciled recommendation plus how it was reached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciledRating {
    /// None only when no observation exists at all
    pub recommended: Option<f64>,

    pub sources: Vec<RatingSource>,

    /// Absolute difference between the two observations, present only when
    /// exactly two distinct providers contributed
    pub difference: Option<f64>,

    pub note: Option<String>,
}

/// Compute a single recommended rating from all available observations.
///
/// Policy, in order:
/// 1. A live observation younger than the freshness window wins outright.
/// 2. With two or more observations, a vote-count-weighted average
///    (weight 1 when the vote count is absent or zero), rounded to
///    two decimals.
/// 3. Otherwise the single observation, or no recommendation.
pub fn recommend(observations: &[RatingObservation], now: DateTime<Utc>) -> ReconciledRating {
    let sources: Vec<RatingSource> = observations
        .iter()
        .map(|obs| RatingSource {
            provider: obs.provider.clone(),
            value: obs.value,
            votes: obs.vote_count,
            age_days: obs.observed_at.map(|at| (now - at).num_days()),
        })
        .collect();

    let recommended = fresh_live_value(observations, now).or_else(|| match observations.len() {
        0 => None,
        1 => Some(observations[0].value),
        _ => Some(weighted_average(observations)),
    });

    let (difference, note) = difference_and_note(observations);

    ReconciledRating {
        recommended,
        sources,
        difference,
        note,
    }
}

fn fresh_live_value(observations: &[RatingObservation], now: DateTime<Utc>) -> Option<f64> {
    observations.iter().find_map(|obs| {
        let observed_at = obs.observed_at?;
        if obs.live && (now - observed_at).num_days() < FRESHNESS_WINDOW_DAYS {
            Some(obs.value)
        } else {
            None
        }
    })
}

fn weighted_average(observations: &[RatingObservation]) -> f64 {
    let mut weighted_sum = 0.0;
    let mut total_weight = 0.0;
    for obs in observations {
        let weight = match obs.vote_count {
            Some(count) if count > 0 => count as f64,
            _ => 1.0,
        };
        weighted_sum += obs.value * weight;
        total_weight += weight;
    }
    round2(weighted_sum / total_weight)
}

fn difference_and_note(observations: &[RatingObservation]) -> (Option<f64>, Option<String>) {
    if observations.len() != 2 || observations[0].provider == observations[1].provider {
        return (None, None);
    }

    let difference = round2((observations[0].value - observations[1].value).abs());
    let note = if difference > 1.0 {
        NOTE_LARGE_DIFFERENCE
    } else {
        NOTE_SIMILAR
    };
    (Some(difference), Some(note.to_string()))
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn obs(provider: &str, value: f64, votes: Option<u32>) -> RatingObservation {
        RatingObservation {
            provider: provider.to_string(),
            value,
            vote_count: votes,
            observed_at: None,
            live: false,
        }
    }

    #[test]
    fn test_no_observations_yields_no_recommendation() {
        let result = recommend(&[], Utc::now());
        assert_eq!(result.recommended, None);
        assert!(result.sources.is_empty());
        assert_eq!(result.difference, None);
        assert_eq!(result.note, None);
    }

    #[test]
    fn test_single_observation_returned_directly() {
        let result = recommend(&[obs("tmdb", 7.4, Some(1200))], Utc::now());
        assert_eq!(result.recommended, Some(7.4));
        assert_eq!(result.difference, None);
        assert_eq!(result.note, None);
    }

    #[test]
    fn test_vote_weighted_average() {
        let result = recommend(
            &[obs("tmdb", 7.0, Some(1000)), obs("imdb", 8.0, Some(500))],
            Utc::now(),
        );
        // (7.0*1000 + 8.0*500) / 1500 = 7.333... -> 7.33
        assert_eq!(result.recommended, Some(7.33));
    }

    #[test]
    fn test_missing_vote_count_weighs_one() {
        let result = recommend(&[obs("tmdb", 6.0, None), obs("imdb", 8.0, Some(0))], Utc::now());
        assert_eq!(result.recommended, Some(7.0));
    }

    #[test]
    fn test_difference_boundary_exactly_one_is_similar() {
        let result = recommend(
            &[obs("tmdb", 7.0, Some(1000)), obs("imdb", 8.0, Some(500))],
            Utc::now(),
        );
        assert_eq!(result.difference, Some(1.0));
        assert_eq!(result.note.as_deref(), Some(NOTE_SIMILAR));
    }

    #[test]
    fn test_difference_above_one_flags_investigation() {
        let result = recommend(&[obs("tmdb", 6.2, None), obs("imdb", 7.5, None)], Utc::now());
        assert_eq!(result.difference, Some(1.3));
        assert_eq!(result.note.as_deref(), Some(NOTE_LARGE_DIFFERENCE));
    }

    #[test]
    fn test_fresh_live_observation_overrides_weighted_average() {
        let now = Utc::now();
        let mut live = obs("imdb", 8.8, Some(500));
        live.live = true;
        live.observed_at = Some(now - Duration::days(3));

        let result = recommend(&[obs("tmdb", 7.0, Some(100_000)), live], now);
        // Weighted average would be dragged toward 7.0; freshness wins.
        assert_eq!(result.recommended, Some(8.8));
    }

    #[test]
    fn test_stale_live_observation_falls_back_to_average() {
        let now = Utc::now();
        let mut live = obs("imdb", 8.0, Some(500));
        live.live = true;
        live.observed_at = Some(now - Duration::days(30));

        let result = recommend(&[obs("tmdb", 7.0, Some(1000)), live], now);
        assert_eq!(result.recommended, Some(7.33));
    }

    #[test]
    fn test_recommendation_bounded_by_contributors() {
        let observations = vec![
            obs("tmdb", 5.5, Some(321)),
            obs("imdb", 8.1, Some(7000)),
            obs("rotten_tomatoes", 6.9, None),
        ];
        let result = recommend(&observations, Utc::now());
        let value = result.recommended.unwrap();
        assert!(value >= 5.5 && value <= 8.1);
        // Three providers: no pairwise difference is reported.
        assert_eq!(result.difference, None);
    }

    #[test]
    fn test_pure_and_deterministic() {
        let now = Utc::now();
        let observations = vec![obs("tmdb", 7.0, Some(1000)), obs("imdb", 8.0, Some(500))];
        let first = recommend(&observations, now);
        for _ in 0..10 {
            assert_eq!(recommend(&observations, now), first);
        }
    }

    #[test]
    fn test_sources_carry_derived_age() {
        let now = Utc::now();
        let mut live = obs("imdb", 8.0, Some(500));
        live.observed_at = Some(now - Duration::days(3));
        let result = recommend(&[obs("tmdb", 7.0, Some(1000)), live], now);
        assert_eq!(result.sources[0].age_days, None);
        assert_eq!(result.sources[1].age_days, Some(3));
    }
}
