// src/services/title_matcher.rs
//
// Fuzzy title matching.
//
// Scores two titles on [0.0, 1.0] using several signals and keeps the best.
// The individual formulas (containment penalized by length ratio, sequence
// similarity not) were tuned against real search result pages; keep them
// as documented.
//
// RULES:
// - Deterministic: same pair of titles, same score
// - No dependencies on other components
// - Roman numerals convert only at a trailing word boundary or before a
//   colon/dash; mid-string numerals ("XIV" inside a word) stay untouched

use regex::Regex;
use std::collections::HashSet;

/// Default score a candidate must reach to count as a match.
pub const DEFAULT_MATCH_THRESHOLD: f64 = 0.7;

/// Relaxed threshold used by fallback searches.
pub const FALLBACK_MATCH_THRESHOLD: f64 = 0.6;

pub struct TitleMatcher {
    /// Roman numeral conversions, longest numeral first so "III" never
    /// half-matches as "II"
    roman_patterns: Vec<(Regex, String)>,

    /// Leading article stripper
    article_pattern: Regex,

    /// Everything except letters, digits and spaces
    punct_pattern: Regex,
}

impl Default for TitleMatcher {
    fn default() -> Self {
        let numerals = [
            ("viii", "8"),
            ("xii", "12"),
            ("vii", "7"),
            ("iii", "3"),
            ("xi", "11"),
            ("ix", "9"),
            ("iv", "4"),
            ("vi", "6"),
            ("ii", "2"),
            ("x", "10"),
            ("v", "5"),
            ("i", "1"),
        ];

        let roman_patterns = numerals
            .iter()
            .map(|(roman, digit)| {
                // Trailing word boundary, or immediately before a colon/dash
                let pattern = format!(r"(?i)\b{}(\s*[:\u{{2013}}-]|\s*$)", roman);
                (Regex::new(&pattern).unwrap(), format!("{}$1", digit))
            })
            .collect();

        Self {
            roman_patterns,
            article_pattern: Regex::new(r"(?i)^(the|a|an)\s+").unwrap(),
            punct_pattern: Regex::new(r"[^a-z0-9\s]").unwrap(),
        }
    }
}

impl TitleMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convert trailing roman numerals I-XII to arabic digits.
    ///
    /// "Rocky II" -> "Rocky 2", "Part III: Legacy" -> "Part 3: Legacy".
    /// Numerals embedded mid-word are left alone on purpose.
    pub fn normalize_roman_numerals(&self, title: &str) -> String {
        let mut normalized = title.to_string();
        for (pattern, replacement) in &self.roman_patterns {
            normalized = pattern
                .replace_all(&normalized, replacement.as_str())
                .to_string();
        }
        normalized
    }

    /// Full normalization pipeline: lowercase, roman numerals to digits,
    /// leading article stripped, punctuation removed, whitespace collapsed.
    pub fn normalize(&self, title: &str) -> String {
        let lowered = title.to_lowercase();
        // Numerals first: the colon/dash context is punctuation and would
        // be gone after the strip below
        let converted = self.normalize_roman_numerals(&lowered);
        let without_article = self.article_pattern.replace(&converted, "");
        let without_punct = self.punct_pattern.replace_all(&without_article, "");
        without_punct.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// Score how well two titles match, on [0.0, 1.0].
    ///
    /// Signals, best one wins:
    /// 1. exact equality after normalization -> 1.0
    /// 2. containment of the shorter in the longer -> 0.9 * length ratio
    /// 3. longest-common-subsequence similarity (symmetric)
    /// 4. token-set overlap over max set size
    pub fn score(&self, a: &str, b: &str) -> f64 {
        let norm_a = self.normalize(a);
        let norm_b = self.normalize(b);

        if norm_a.is_empty() && norm_b.is_empty() {
            return 1.0;
        }
        if norm_a.is_empty() || norm_b.is_empty() {
            return 0.0;
        }
        if norm_a == norm_b {
            return 1.0;
        }

        let containment = if norm_a.contains(&norm_b) || norm_b.contains(&norm_a) {
            let shorter = norm_a.len().min(norm_b.len()) as f64;
            let longer = norm_a.len().max(norm_b.len()) as f64;
            0.9 * (shorter / longer)
        } else {
            0.0
        };

        let sequence = lcs_ratio(&norm_a, &norm_b);
        let tokens = token_overlap(&norm_a, &norm_b);

        containment.max(sequence).max(tokens)
    }

    /// Boolean match decision at the given threshold.
    pub fn matches(&self, a: &str, b: &str, threshold: f64) -> bool {
        self.score(a, b) >= threshold
    }
}

/// Symmetric character-level similarity: 2 * LCS / (|a| + |b|).
fn lcs_ratio(a: &str, b: &str) -> f64 {
    let chars_a: Vec<char> = a.chars().collect();
    let chars_b: Vec<char> = b.chars().collect();
    if chars_a.is_empty() || chars_b.is_empty() {
        return 0.0;
    }

    let mut previous = vec![0usize; chars_b.len() + 1];
    let mut current = vec![0usize; chars_b.len() + 1];

    for &ca in &chars_a {
        for (j, &cb) in chars_b.iter().enumerate() {
            current[j + 1] = if ca == cb {
                previous[j] + 1
            } else {
                previous[j + 1].max(current[j])
            };
        }
        std::mem::swap(&mut previous, &mut current);
    }

    let lcs = previous[chars_b.len()] as f64;
    2.0 * lcs / (chars_a.len() + chars_b.len()) as f64
}

/// Token-set overlap: |intersection| / max(|A|, |B|).
fn token_overlap(a: &str, b: &str) -> f64 {
    let set_a: HashSet<&str> = a.split_whitespace().collect();
    let set_b: HashSet<&str> = b.split_whitespace().collect();
    if set_a.is_empty() || set_b.is_empty() {
        return 0.0;
    }
    let intersection = set_a.intersection(&set_b).count() as f64;
    intersection / set_a.len().max(set_b.len()) as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_titles_score_one() {
        let matcher = TitleMatcher::new();
        for title in ["Inception", "The Matrix", "Boyka: Undisputed IV"] {
            assert_eq!(matcher.score(title, title), 1.0);
        }
    }

    #[test]
    fn test_roman_numeral_equivalence() {
        let matcher = TitleMatcher::new();
        assert!(matcher.score("Rocky II", "Rocky 2") >= 0.95);
        assert!(matcher.score("Rocky III", "Rocky 3") >= 0.95);
    }

    #[test]
    fn test_article_stripped() {
        let matcher = TitleMatcher::new();
        assert!(matcher.score("The Matrix", "Matrix") >= 0.85);
    }

    #[test]
    fn test_unrelated_titles_score_low() {
        let matcher = TitleMatcher::new();
        assert!(matcher.score("a", "completely different long string") < 0.3);
    }

    #[test]
    fn test_roman_numeral_before_colon() {
        let matcher = TitleMatcher::new();
        let normalized = matcher.normalize("Part III: Legacy");
        assert!(normalized.contains("part 3"), "got {:?}", normalized);
    }

    #[test]
    fn test_mid_string_numerals_untouched() {
        let matcher = TitleMatcher::new();
        // "IV" inside "XIV" has no word boundary before it
        assert_eq!(matcher.normalize_roman_numerals("XIV"), "XIV");
    }

    #[test]
    fn test_longest_numeral_wins() {
        let matcher = TitleMatcher::new();
        assert_eq!(matcher.normalize_roman_numerals("Rocky VIII"), "Rocky 8");
        assert_eq!(matcher.normalize_roman_numerals("Rocky VII"), "Rocky 7");
    }

    #[test]
    fn test_empty_titles() {
        let matcher = TitleMatcher::new();
        assert_eq!(matcher.score("", ""), 1.0);
        assert_eq!(matcher.score("", "Inception"), 0.0);
        assert_eq!(matcher.score("!!!", "Inception"), 0.0);
    }

    #[test]
    fn test_containment_penalized_by_length() {
        let matcher = TitleMatcher::new();
        // "matrix" is contained in "matrix reloaded" but the length gap
        // keeps the pair below the default threshold via containment alone;
        // the other signals may still lift it
        let score = matcher.score("The Matrix", "The Matrix Reloaded");
        assert!(score < 1.0);
        assert!(score > 0.3);
    }

    #[test]
    fn test_token_overlap_handles_reordered_words() {
        let matcher = TitleMatcher::new();
        let score = matcher.score("Undisputed 4: Boyka", "Boyka: Undisputed IV");
        assert!(score >= DEFAULT_MATCH_THRESHOLD, "got {}", score);
    }

    #[test]
    fn test_matches_respects_threshold() {
        let matcher = TitleMatcher::new();
        let score = matcher.score("Rocky", "Rocky Balboa");
        assert!(score < 0.9);
        assert!(matcher.matches("Rocky", "Rocky Balboa", 0.4));
        assert!(!matcher.matches("Rocky", "Rocky Balboa", 0.95));
    }

    #[test]
    fn test_score_is_symmetric() {
        let matcher = TitleMatcher::new();
        let pairs = [
            ("The Matrix", "Matrix Reloaded"),
            ("Rocky II", "Rocky"),
            ("Inception", "Interstellar"),
        ];
        for (a, b) in pairs {
            assert!((matcher.score(a, b) - matcher.score(b, a)).abs() < f64::EPSILON);
        }
    }
}
