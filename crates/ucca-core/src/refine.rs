//! Abstraction resolution.
//!
//! Class-level candidates are defined over action signature classes; this
//! stage expands each one into every concrete controller substitution the
//! authority model admits, keeping controllers within a candidate distinct.
//! Instance-level candidates pass through unchanged. Interaction type,
//! provided flags, timing tags, and base score are all preserved; only the
//! concrete controller/action references vary.

use crate::candidate::{CombinationElement, UnsafeCombination};
use crate::generate::describe_elements;
use crate::model::AuthorityModel;
use crate::types::AbstractionLevel;

pub fn refine(
    candidates: Vec<UnsafeCombination>,
    model: &AuthorityModel,
) -> Vec<UnsafeCombination> {
    let mut out = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        match candidate.abstraction {
            AbstractionLevel::InstanceLevel => out.push(candidate),
            AbstractionLevel::ClassLevel => expand(candidate, model, &mut out),
        }
    }
    out
}

fn expand(candidate: UnsafeCombination, model: &AuthorityModel, out: &mut Vec<UnsafeCombination>) {
    // Per element: every (controller, action) in the model sharing the
    // element's action signature, in action input order.
    let member_lists: Vec<Vec<(String, String)>> = candidate
        .elements
        .iter()
        .map(|e| {
            let signature = model
                .action(&e.action_id)
                .map(|a| a.signature())
                .unwrap_or_default();
            model
                .actions
                .iter()
                .filter(|a| a.signature() == signature)
                .map(|a| (a.controller_id.clone(), a.id.clone()))
                .collect()
        })
        .collect();

    let mut selection: Vec<(String, String)> = Vec::with_capacity(candidate.elements.len());
    substitute(&candidate, model, &member_lists, &mut selection, out);
}

fn substitute(
    template: &UnsafeCombination,
    model: &AuthorityModel,
    member_lists: &[Vec<(String, String)>],
    selection: &mut Vec<(String, String)>,
    out: &mut Vec<UnsafeCombination>,
) {
    let depth = selection.len();
    if depth == member_lists.len() {
        let elements: Vec<CombinationElement> = template
            .elements
            .iter()
            .zip(selection.iter())
            .map(|(e, (controller_id, action_id))| CombinationElement {
                controller_id: controller_id.clone(),
                action_id: action_id.clone(),
                provided: e.provided,
                timing: e.timing,
            })
            .collect();
        out.push(UnsafeCombination {
            interaction: template.interaction,
            abstraction: AbstractionLevel::InstanceLevel,
            description: describe_elements(model, &elements),
            risk_score: template.risk_score,
            reason: template.reason.clone(),
            elements,
        });
        return;
    }
    for (controller_id, action_id) in &member_lists[depth] {
        // One action per distinct controller, as in base generation.
        if selection.iter().any(|(c, _)| c == controller_id) {
            continue;
        }
        selection.push((controller_id.clone(), action_id.clone()));
        substitute(template, model, member_lists, selection, out);
        selection.pop();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
