use crate::types::{AbstractionLevel, InteractionType, TimingTag};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// CombinationElement
// ---------------------------------------------------------------------------

/// One participant of a candidate. `provided = false` is the action-withheld
/// variant of the pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombinationElement {
    pub controller_id: String,
    pub action_id: String,
    pub provided: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timing: Option<TimingTag>,
}

impl CombinationElement {
    pub fn provided(controller_id: impl Into<String>, action_id: impl Into<String>) -> Self {
        Self {
            controller_id: controller_id.into(),
            action_id: action_id.into(),
            provided: true,
            timing: None,
        }
    }

    pub fn withheld(controller_id: impl Into<String>, action_id: impl Into<String>) -> Self {
        Self {
            controller_id: controller_id.into(),
            action_id: action_id.into(),
            provided: false,
            timing: None,
        }
    }

    pub fn with_timing(mut self, timing: TimingTag) -> Self {
        self.timing = Some(timing);
        self
    }
}

// ---------------------------------------------------------------------------
// UnsafeCombination
// ---------------------------------------------------------------------------

/// A candidate unsafe combination of control actions. No single element is
/// necessarily unsafe alone; the pattern as a whole is what the analyst
/// reviews.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnsafeCombination {
    pub interaction: InteractionType,
    pub abstraction: AbstractionLevel,
    pub elements: Vec<CombinationElement>,
    pub description: String,
    pub risk_score: f64,
    pub reason: String,
}

impl UnsafeCombination {
    /// Canonical structural key: element count plus the sorted list of
    /// controller:action:provided triples. Two candidates with the same key
    /// are structurally identical regardless of element order. Timing tags
    /// are not part of the key: exclusion and adjustment match on structure,
    /// not schedule.
    pub fn structural_key(&self) -> String {
        let mut triples: Vec<String> = self
            .elements
            .iter()
            .map(|e| {
                format!(
                    "{}:{}:{}",
                    e.controller_id,
                    e.action_id,
                    if e.provided { "provided" } else { "withheld" }
                )
            })
            .collect();
        triples.sort();
        format!("{}|{}", self.elements.len(), triples.join(","))
    }

    /// Add a score delta and clamp to [0, 1]. Every scoring stage goes
    /// through here so the clamp invariant holds everywhere.
    pub fn adjust_score(&mut self, delta: f64) {
        self.risk_score = (self.risk_score + delta).clamp(0.0, 1.0);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
