//! Symmetry pruning.
//!
//! Analysts may declare controllers interchangeable (redundant crew roles,
//! duplicated channels). Two candidates are equivalent when one is obtained
//! from the other by substituting interchangeable controllers while the
//! multiset of (action, provided/timing) tuples is unchanged; exactly one
//! representative survives per equivalence class. The relation is a pruning
//! device only and never merges real entities.
//!
//! Tie-break: the highest-scoring representative wins, first-seen order
//! breaks score ties, and output preserves first-seen key order.

use crate::candidate::UnsafeCombination;
use crate::model::AuthorityModel;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ---------------------------------------------------------------------------
// InterchangeabilityRelation
// ---------------------------------------------------------------------------

/// Groups of controller ids declared symmetric. A controller appears in at
/// most one group; the group's first listed member is its representative.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterchangeabilityRelation {
    #[serde(default)]
    pub groups: Vec<Vec<String>>,
}

impl InterchangeabilityRelation {
    pub fn new(groups: Vec<Vec<String>>) -> Self {
        Self { groups }
    }

    /// The canonical stand-in for a controller: its group's first member,
    /// or the controller itself when ungrouped.
    pub fn representative<'a>(&'a self, controller_id: &'a str) -> &'a str {
        self.groups
            .iter()
            .find(|g| g.iter().any(|m| m == controller_id))
            .and_then(|g| g.first())
            .map(String::as_str)
            .unwrap_or(controller_id)
    }

    pub fn is_grouped(&self, controller_id: &str) -> bool {
        self.groups
            .iter()
            .any(|g| g.iter().any(|m| m == controller_id))
    }
}

// ---------------------------------------------------------------------------
// Pruning
// ---------------------------------------------------------------------------

/// Equivalence key under the relation. Grouped controllers map to their
/// representative and compare actions by signature (interchangeable roles
/// own symmetric copies of an action, with distinct ids); ungrouped
/// controllers compare actions by id. Identical candidates share a key
/// trivially, so exact duplicates collapse here too.
fn equivalence_key(
    candidate: &UnsafeCombination,
    relation: &InterchangeabilityRelation,
    model: &AuthorityModel,
) -> String {
    let mut parts: Vec<String> = candidate
        .elements
        .iter()
        .map(|e| {
            let action_key = if relation.is_grouped(&e.controller_id) {
                model
                    .action(&e.action_id)
                    .map(|a| a.signature())
                    .unwrap_or_else(|| e.action_id.clone())
            } else {
                e.action_id.clone()
            };
            format!(
                "{}:{}:{}:{}",
                relation.representative(&e.controller_id),
                action_key,
                if e.provided { "provided" } else { "withheld" },
                e.timing.map(|t| t.as_str()).unwrap_or("none"),
            )
        })
        .collect();
    parts.sort();
    format!(
        "{}|{}|{}",
        candidate.interaction,
        candidate.elements.len(),
        parts.join(",")
    )
}

pub fn prune(
    candidates: Vec<UnsafeCombination>,
    relation: &InterchangeabilityRelation,
    model: &AuthorityModel,
) -> Vec<UnsafeCombination> {
    let mut kept: Vec<UnsafeCombination> = Vec::new();
    let mut by_key: HashMap<String, usize> = HashMap::new();

    for candidate in candidates {
        let key = equivalence_key(&candidate, relation, model);
        match by_key.get(&key) {
            None => {
                by_key.insert(key, kept.len());
                kept.push(candidate);
            }
            Some(&idx) => {
                // Strictly greater: on equal scores the first-seen survives.
                if candidate.risk_score > kept[idx].risk_score {
                    kept[idx] = candidate;
                }
            }
        }
    }
    kept
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
