//! Threshold filtering and textual deduplication.
//!
//! Two distinct drop rules run back to back: a score floor from the
//! configuration, then a fuzzy word-overlap check against analyst-confirmed
//! entries so the engine never re-proposes what the team already recorded.
//! Structural matching lives in the policy layer; this stage is purely
//! textual.

use crate::candidate::UnsafeCombination;
use crate::model::ExistingEntry;
use crate::score::tokenize;

/// Candidates whose description overlaps an existing entry's description
/// beyond this ratio are considered already covered.
const SIMILARITY_LIMIT: f64 = 0.8;

// ---------------------------------------------------------------------------
// Threshold filter
// ---------------------------------------------------------------------------

pub fn threshold_filter(
    candidates: Vec<UnsafeCombination>,
    threshold: f64,
) -> Vec<UnsafeCombination> {
    candidates
        .into_iter()
        .filter(|c| c.risk_score >= threshold)
        .collect()
}

// ---------------------------------------------------------------------------
// Textual deduplication
// ---------------------------------------------------------------------------

/// Intersection-over-union of the two texts' word sets. 1.0 means identical
/// vocabulary; 0.0 means disjoint. Empty texts are never similar.
pub(crate) fn word_overlap_similarity(a: &str, b: &str) -> f64 {
    let left = tokenize(a);
    let right = tokenize(b);
    if left.is_empty() || right.is_empty() {
        return 0.0;
    }
    let intersection = left.intersection(&right).count();
    let union = left.union(&right).count();
    intersection as f64 / union as f64
}

pub fn dedup_against_existing(
    candidates: Vec<UnsafeCombination>,
    existing: &[ExistingEntry],
) -> Vec<UnsafeCombination> {
    if existing.is_empty() {
        return candidates;
    }
    candidates
        .into_iter()
        .filter(|c| {
            !existing
                .iter()
                .any(|e| word_overlap_similarity(&c.description, &e.description) > SIMILARITY_LIMIT)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
