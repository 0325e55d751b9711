//! Analyst override layer.
//!
//! The special-interaction policy lets analysts pin candidates the
//! generators cannot know about, and suppress or re-score patterns their
//! domain experience rates differently. Matching is structural (the
//! canonical key), never textual.

use crate::candidate::UnsafeCombination;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

// ---------------------------------------------------------------------------
// SpecialInteractionPolicy
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpecialInteractionPolicy {
    /// Candidates always included, verbatim, regardless of what the
    /// generators produced.
    #[serde(default)]
    pub mandatory: Vec<UnsafeCombination>,
    /// Candidates always removed; matched by canonical structural key.
    #[serde(default)]
    pub excluded: Vec<UnsafeCombination>,
    /// Canonical structural key to score delta. Missing keys read as 0.
    #[serde(default)]
    pub adjustments: BTreeMap<String, f64>,
}

impl SpecialInteractionPolicy {
    pub fn is_empty(&self) -> bool {
        self.mandatory.is_empty() && self.excluded.is_empty() && self.adjustments.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Application
// ---------------------------------------------------------------------------

/// Layer the policy onto the pool: append mandatory candidates, remove
/// excluded structures, then apply keyed score adjustments (clamped).
pub fn apply_policy(
    mut candidates: Vec<UnsafeCombination>,
    policy: &SpecialInteractionPolicy,
) -> Vec<UnsafeCombination> {
    candidates.extend(policy.mandatory.iter().cloned());

    let excluded_keys: HashSet<String> = policy
        .excluded
        .iter()
        .map(UnsafeCombination::structural_key)
        .collect();
    if !excluded_keys.is_empty() {
        candidates.retain(|c| !excluded_keys.contains(&c.structural_key()));
    }

    for candidate in &mut candidates {
        let delta = policy
            .adjustments
            .get(&candidate.structural_key())
            .copied()
            .unwrap_or(0.0);
        candidate.adjust_score(delta);
    }
    candidates
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
