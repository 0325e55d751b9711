//! Domain pattern generators.
//!
//! Three independent heuristics over the authority model, each contributing
//! candidates the systematic enumeration would score too low or miss the
//! intent of. They run additively; overlap with systematic output is
//! collapsed later by the pruner and deduplicator, not here.

use crate::candidate::{CombinationElement, UnsafeCombination};
use crate::generate::describe_elements;
use crate::model::{AuthorityModel, ControlAction};
use crate::types::{AbstractionLevel, InteractionType, TimingTag};

const COMMUNICATION_VERBS: &[&str] = &[
    "transmit",
    "receive",
    "announce",
    "report",
    "request",
    "acknowledge",
    "confirm",
];

const CONTROL_VERBS: &[&str] = &[
    "activate",
    "deactivate",
    "engage",
    "disengage",
    "control",
    "operate",
];

const EMERGENCY_TERMS: &[&str] = &[
    "abort", "emergency", "eject", "deploy", "stop", "brake", "alert", "warn",
];

const COMMUNICATION_SCORE: f64 = 0.8;
const RESOURCE_CONFLICT_SCORE: f64 = 0.7;
const EMERGENCY_TIMING_SCORE: f64 = 0.9;

/// Resource conflicts are reported over at most this many contenders; more
/// would not change the review outcome.
const RESOURCE_CONFLICT_MAX_CONTROLLERS: usize = 3;

/// Case-insensitive word-prefix match: "Transmits" matches "transmit".
fn matches_vocab(text: &str, vocab: &[&str]) -> bool {
    text.to_lowercase()
        .split_whitespace()
        .any(|word| vocab.iter().any(|term| word.starts_with(term)))
}

/// All three generators, merged in a fixed order.
pub fn domain_patterns(model: &AuthorityModel) -> Vec<UnsafeCombination> {
    let mut out = communication_failures(model);
    out.extend(resource_conflicts(model));
    out.extend(emergency_timing_conflicts(model));
    out
}

// ---------------------------------------------------------------------------
// Communication failure
// ---------------------------------------------------------------------------

/// For every unordered controller pair where each side owns at least one
/// communication-verb action: one candidate with both actions withheld,
/// modeling an exchange that silently never happens.
pub fn communication_failures(model: &AuthorityModel) -> Vec<UnsafeCombination> {
    let mut out = Vec::new();

    let comm_action = |controller_id: &str| -> Option<&ControlAction> {
        model
            .actions_of(controller_id)
            .iter()
            .filter_map(|id| model.action(id))
            .find(|a| matches_vocab(&a.verb, COMMUNICATION_VERBS))
    };

    for (i, first) in model.controllers.iter().enumerate() {
        let Some(first_action) = comm_action(&first.id) else {
            continue;
        };
        for second in &model.controllers[i + 1..] {
            let Some(second_action) = comm_action(&second.id) else {
                continue;
            };
            let elements = vec![
                CombinationElement::withheld(first.id.clone(), first_action.id.clone()),
                CombinationElement::withheld(second.id.clone(), second_action.id.clone()),
            ];
            out.push(UnsafeCombination {
                interaction: InteractionType::ProvideWithhold,
                abstraction: AbstractionLevel::InstanceLevel,
                description: describe_elements(model, &elements),
                risk_score: COMMUNICATION_SCORE,
                reason: format!(
                    "potential communication failure between {} and {}",
                    first.name, second.name
                ),
                elements,
            });
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Resource conflict
// ---------------------------------------------------------------------------

/// Group control-verb actions by normalized object; any object commanded by
/// more than one controller yields one candidate spanning up to three of
/// them, all actions provided at once.
pub fn resource_conflicts(model: &AuthorityModel) -> Vec<UnsafeCombination> {
    // (normalized object, members) in first-occurrence order.
    let mut objects: Vec<(String, Vec<&ControlAction>)> = Vec::new();
    for action in &model.actions {
        if !matches_vocab(&action.verb, CONTROL_VERBS) {
            continue;
        }
        let object = action.object.trim().to_lowercase();
        match objects.iter_mut().find(|(o, _)| *o == object) {
            Some((_, members)) => members.push(action),
            None => objects.push((object, vec![action])),
        }
    }

    let mut out = Vec::new();
    for (object, members) in &objects {
        // One action per distinct controller, first-seen order.
        let mut contenders: Vec<&ControlAction> = Vec::new();
        for &action in members {
            if contenders
                .iter()
                .any(|a| a.controller_id == action.controller_id)
            {
                continue;
            }
            contenders.push(action);
            if contenders.len() == RESOURCE_CONFLICT_MAX_CONTROLLERS {
                break;
            }
        }
        if contenders.len() < 2 {
            continue;
        }

        let names: Vec<&str> = contenders
            .iter()
            .map(|a| model.controller_name(&a.controller_id))
            .collect();
        let elements: Vec<CombinationElement> = contenders
            .iter()
            .map(|a| CombinationElement::provided(a.controller_id.clone(), a.id.clone()))
            .collect();
        out.push(UnsafeCombination {
            interaction: InteractionType::ProvideWithhold,
            abstraction: AbstractionLevel::InstanceLevel,
            description: format!(
                "{} issue conflicting commands to '{object}' at the same time",
                names.join(" and ")
            ),
            risk_score: RESOURCE_CONFLICT_SCORE,
            reason: format!("resource conflict: '{object}' is commanded by multiple controllers"),
            elements,
        });
    }
    out
}

// ---------------------------------------------------------------------------
// Emergency-timing conflict
// ---------------------------------------------------------------------------

/// Among actions whose verb or object carries emergency vocabulary, every
/// pair owned by different controllers becomes a timing candidate: one side
/// early, the other late.
pub fn emergency_timing_conflicts(model: &AuthorityModel) -> Vec<UnsafeCombination> {
    let emergency: Vec<&ControlAction> = model
        .actions
        .iter()
        .filter(|a| {
            matches_vocab(&a.verb, EMERGENCY_TERMS) || matches_vocab(&a.object, EMERGENCY_TERMS)
        })
        .collect();

    let mut out = Vec::new();
    for (i, first) in emergency.iter().enumerate() {
        for second in &emergency[i + 1..] {
            if first.controller_id == second.controller_id {
                continue;
            }
            let elements = vec![
                CombinationElement::provided(first.controller_id.clone(), first.id.clone())
                    .with_timing(TimingTag::Early),
                CombinationElement::provided(second.controller_id.clone(), second.id.clone())
                    .with_timing(TimingTag::Late),
            ];
            out.push(UnsafeCombination {
                interaction: InteractionType::TimingOrder,
                abstraction: AbstractionLevel::InstanceLevel,
                description: describe_elements(model, &elements),
                risk_score: EMERGENCY_TIMING_SCORE,
                reason: format!(
                    "emergency actions '{} {}' and '{} {}' race across controllers",
                    first.verb, first.object, second.verb, second.object
                ),
                elements,
            });
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Controller;

    fn controller(id: &str, name: &str) -> Controller {
        Controller {
            id: id.to_string(),
            name: name.to_string(),
        }
    }

    fn action(id: &str, controller: &str, verb: &str, object: &str) -> ControlAction {
        ControlAction {
            id: id.to_string(),
            controller_id: controller.to_string(),
            verb: verb.to_string(),
            object: object.to_string(),
            description: String::new(),
        }
    }

    #[test]
    fn vocab_match_is_prefix_and_case_insensitive() {
        assert!(matches_vocab("Transmits", COMMUNICATION_VERBS));
        assert!(matches_vocab("ACKNOWLEDGE", COMMUNICATION_VERBS));
        assert!(matches_vocab("emergency stop", EMERGENCY_TERMS));
        assert!(!matches_vocab("extend", COMMUNICATION_VERBS));
    }

    #[test]
    fn transmit_receive_pair_yields_communication_candidate() {
        let model = AuthorityModel::build(
            vec![controller("c1", "Ground"), controller("c2", "Tower")],
            vec![
                action("a1", "c1", "transmit", "status"),
                action("a2", "c2", "receive", "status"),
            ],
        );
        let out = communication_failures(&model);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].risk_score, 0.8);
        assert_eq!(out[0].interaction, InteractionType::ProvideWithhold);
        assert!(out[0].elements.iter().all(|e| !e.provided));
        assert!(out[0].reason.contains("communication"));
    }

    #[test]
    fn communication_needs_both_sides() {
        let model = AuthorityModel::build(
            vec![controller("c1", "Ground"), controller("c2", "Tower")],
            vec![
                action("a1", "c1", "transmit", "status"),
                action("a2", "c2", "extend", "gear"),
            ],
        );
        assert!(communication_failures(&model).is_empty());
    }

    #[test]
    fn shared_object_yields_one_resource_conflict() {
        let model = AuthorityModel::build(
            vec![
                controller("c1", "Operator A"),
                controller("c2", "Operator B"),
                controller("c3", "Operator C"),
            ],
            vec![
                action("a1", "c1", "activate", "pump"),
                action("a2", "c2", "activate", "pump"),
                action("a3", "c3", "activate", "pump"),
            ],
        );
        let out = resource_conflicts(&model);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].elements.len(), 3);
        assert_eq!(out[0].risk_score, 0.7);
        assert!(out[0].elements.iter().all(|e| e.provided));
        assert!(out[0].description.contains("conflict"));
    }

    #[test]
    fn resource_conflict_caps_at_three_controllers() {
        let controllers: Vec<Controller> = (1..=5)
            .map(|i| controller(&format!("c{i}"), &format!("Operator {i}")))
            .collect();
        let actions: Vec<ControlAction> = (1..=5)
            .map(|i| action(&format!("a{i}"), &format!("c{i}"), "engage", "winch"))
            .collect();
        let model = AuthorityModel::build(controllers, actions);
        let out = resource_conflicts(&model);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].elements.len(), 3);
    }

    #[test]
    fn single_owner_object_is_not_a_conflict() {
        let model = AuthorityModel::build(
            vec![controller("c1", "Operator A")],
            vec![
                action("a1", "c1", "activate", "pump"),
                action("a2", "c1", "deactivate", "pump"),
            ],
        );
        assert!(resource_conflicts(&model).is_empty());
    }

    #[test]
    fn object_text_is_normalized_before_grouping() {
        let model = AuthorityModel::build(
            vec![controller("c1", "Operator A"), controller("c2", "Operator B")],
            vec![
                action("a1", "c1", "activate", " Pump "),
                action("a2", "c2", "activate", "pump"),
            ],
        );
        assert_eq!(resource_conflicts(&model).len(), 1);
    }

    #[test]
    fn emergency_actions_across_controllers_race() {
        let model = AuthorityModel::build(
            vec![controller("c1", "Commander"), controller("c2", "Autopilot")],
            vec![
                action("a1", "c1", "abort", "mission"),
                action("a2", "c2", "emergency", "stop"),
            ],
        );
        let out = emergency_timing_conflicts(&model);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].interaction, InteractionType::TimingOrder);
        assert_eq!(out[0].risk_score, 0.9);
        assert_eq!(out[0].elements[0].timing, Some(TimingTag::Early));
        assert_eq!(out[0].elements[1].timing, Some(TimingTag::Late));
    }

    #[test]
    fn emergency_object_match_counts_too() {
        // "deploy" verb and "brake" object both carry emergency vocabulary.
        let model = AuthorityModel::build(
            vec![controller("c1", "Pilot"), controller("c2", "Copilot")],
            vec![
                action("a1", "c1", "deploy", "chute"),
                action("a2", "c2", "apply", "brake"),
            ],
        );
        assert_eq!(emergency_timing_conflicts(&model).len(), 1);
    }

    #[test]
    fn same_controller_emergency_pair_is_skipped() {
        let model = AuthorityModel::build(
            vec![controller("c1", "Pilot")],
            vec![
                action("a1", "c1", "abort", "mission"),
                action("a2", "c1", "emergency", "stop"),
            ],
        );
        assert!(emergency_timing_conflicts(&model).is_empty());
    }

    #[test]
    fn merged_patterns_keep_generator_order() {
        let model = AuthorityModel::build(
            vec![controller("c1", "Ground"), controller("c2", "Tower")],
            vec![
                action("a1", "c1", "transmit", "status"),
                action("a2", "c2", "receive", "status"),
                action("a3", "c1", "abort", "mission"),
                action("a4", "c2", "emergency", "stop"),
            ],
        );
        let out = domain_patterns(&model);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].interaction, InteractionType::ProvideWithhold);
        assert_eq!(out[1].interaction, InteractionType::TimingOrder);
    }
}
