use crate::candidate::UnsafeCombination;
use crate::types::{AbstractionLevel, InteractionType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Candidates at or above this score count as high-risk in statistics and
/// trigger the prioritization recommendation.
pub const HIGH_SCORE_BOUND: f64 = 0.7;

// ---------------------------------------------------------------------------
// Ranking
// ---------------------------------------------------------------------------

/// Stable sort by score, descending. Equal scores keep pipeline order, so
/// identical inputs always rank identically.
pub fn rank(candidates: &mut [UnsafeCombination]) {
    candidates.sort_by(|a, b| b.risk_score.total_cmp(&a.risk_score));
}

// ---------------------------------------------------------------------------
// Statistics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumerationStatistics {
    pub total: usize,
    pub by_interaction: BTreeMap<String, usize>,
    pub by_abstraction: BTreeMap<String, usize>,
    pub high_score: usize,
    pub mean_score: f64,
}

pub fn statistics(candidates: &[UnsafeCombination]) -> EnumerationStatistics {
    let mut by_interaction = BTreeMap::new();
    let mut by_abstraction = BTreeMap::new();
    for candidate in candidates {
        *by_interaction
            .entry(candidate.interaction.as_str().to_string())
            .or_insert(0) += 1;
        *by_abstraction
            .entry(candidate.abstraction.as_str().to_string())
            .or_insert(0) += 1;
    }
    let high_score = candidates
        .iter()
        .filter(|c| c.risk_score >= HIGH_SCORE_BOUND)
        .count();
    let mean_score = if candidates.is_empty() {
        0.0
    } else {
        candidates.iter().map(|c| c.risk_score).sum::<f64>() / candidates.len() as f64
    };
    EnumerationStatistics {
        total: candidates.len(),
        by_interaction,
        by_abstraction,
        high_score,
        mean_score,
    }
}

// ---------------------------------------------------------------------------
// Recommendations
// ---------------------------------------------------------------------------

/// Fixed, rule-triggered guidance for the reviewing analyst.
pub fn recommendations(candidates: &[UnsafeCombination]) -> Vec<String> {
    if candidates.is_empty() {
        return vec![
            "No unsafe combinations cleared the configured threshold. Check the authority \
             model for missing control actions, or lower the score threshold."
                .to_string(),
        ];
    }

    let mut out = Vec::new();

    let high = candidates
        .iter()
        .filter(|c| c.risk_score >= HIGH_SCORE_BOUND)
        .count();
    if high > 0 {
        out.push(format!(
            "{high} high-risk combination(s) scored {HIGH_SCORE_BOUND} or above. Review these \
             first and record the ones the team confirms."
        ));
    }

    if candidates
        .iter()
        .any(|c| c.reason.contains("communication") || c.description.contains("communication"))
    {
        out.push(
            "Communication-failure patterns are present. Define explicit acknowledgement and \
             timeout handling for every controller-to-controller exchange."
                .to_string(),
        );
    }

    if candidates
        .iter()
        .any(|c| c.interaction == InteractionType::TimingOrder)
    {
        out.push(
            "Order-sensitive combinations are present. Consider interlocks or synchronization \
             constraints for actions whose relative timing matters."
                .to_string(),
        );
    }

    if candidates.iter().any(|c| c.description.contains("conflict")) {
        out.push(
            "Shared resources are commanded by multiple controllers. Assign a single authority \
             or an explicit arbitration rule per contended resource."
                .to_string(),
        );
    }

    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
