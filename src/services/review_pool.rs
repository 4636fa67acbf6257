// src/services/review_pool.rs
//
// Deduplication with priority-aware merge.
//
// The same review text frequently appears under several listing endpoints
// of one source ("all critics" is a superset of "top critics"). The pool
// keys reviews by content fingerprint and keeps the entry whose category
// has the strictly highest priority; ties keep the first seen.
//
// Merging is commutative and associative over batches, which is what makes
// parallel endpoint extraction safe.

use std::collections::HashMap;

use crate::domain::review::{RawReview, ReviewCategory};

#[derive(Default)]
pub struct ReviewPool {
    entries: HashMap<String, (RawReview, u8)>,
    duplicates_discarded: usize,
}

impl ReviewPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Absorb one batch of reviews collected under a category tag.
    /// The tag overrides each review's own category: the endpoint a review
    /// was listed under decides its provenance.
    pub fn absorb(&mut self, category: ReviewCategory, reviews: Vec<RawReview>) {
        for mut review in reviews {
            review.category = category;
            self.insert(review);
        }
    }

    /// Insert a single review, keeping the higher-priority duplicate.
    pub fn insert(&mut self, review: RawReview) {
        let fingerprint = review.fingerprint();
        let priority = review.category.priority();

        match self.entries.get(&fingerprint) {
            Some((_, existing_priority)) if priority <= *existing_priority => {
                self.duplicates_discarded += 1;
            }
            Some(_) => {
                self.duplicates_discarded += 1;
                self.entries.insert(fingerprint, (review, priority));
            }
            None => {
                self.entries.insert(fingerprint, (review, priority));
            }
        }
    }

    /// Number of duplicate entries discarded (or replaced) so far.
    pub fn duplicates_discarded(&self) -> usize {
        self.duplicates_discarded
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The retained reviews. Iteration order of the underlying map;
    /// callers must not rely on insertion order.
    pub fn into_reviews(self) -> Vec<RawReview> {
        self.entries.into_values().map(|(review, _)| review).collect()
    }

    /// The retained reviews together with the dedup count, for run
    /// reporting.
    pub fn into_harvest(self) -> ReviewHarvest {
        ReviewHarvest {
            duplicates_discarded: self.duplicates_discarded,
            reviews: self
                .entries
                .into_values()
                .map(|(review, _)| review)
                .collect(),
        }
    }
}

/// The deduplicated output of scraping one source's review endpoints.
#[derive(Debug, Clone)]
pub struct ReviewHarvest {
    pub reviews: Vec<RawReview>,
    pub duplicates_discarded: usize,
}

/// Merge batches from several endpoints of one source into a deduplicated
/// review set.
pub fn merge_batches(batches: Vec<(ReviewCategory, Vec<RawReview>)>) -> Vec<RawReview> {
    let mut pool = ReviewPool::new();
    for (category, reviews) in batches {
        pool.absorb(category, reviews);
    }
    pool.into_reviews()
}
