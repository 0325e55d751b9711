//! Systematic base-candidate generation.
//!
//! Admissibility rule: one action per distinct controller. A candidate models
//! a multi-controller interaction, so no combination ever holds two elements
//! from the same controller. Instance-level enumeration walks k-subsets of
//! controllers in input order and takes the cartesian product of one owned
//! action per chosen controller. Class-level enumeration first collapses
//! actions into normalized (verb, object) signature classes and walks
//! k-subsets of those classes; the refiner expands the result back into
//! concrete candidates.

use crate::candidate::{CombinationElement, UnsafeCombination};
use crate::config::EnumerationConfig;
use crate::error::{Result, UccaError};
use crate::model::AuthorityModel;
use crate::types::{AbstractionLevel, InteractionType, TimingTag};

/// Base score for systematically enumerated candidates. Domain generators
/// and hazard relevance push interesting candidates above this floor.
const SYSTEMATIC_BASE_SCORE: f64 = 0.5;

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Enumerate base candidates for every size from 2 up to the configured
/// maximum. Fails with [`UccaError::BudgetExceeded`] once the combination
/// budget is hit; no partial result escapes.
pub fn generate_base(
    model: &AuthorityModel,
    config: &EnumerationConfig,
) -> Result<Vec<UnsafeCombination>> {
    let mut out = Vec::new();

    if config.enable_instance_level {
        generate_instance_level(model, config, &mut out)?;
    }
    if config.enable_class_level {
        generate_class_level(model, config, &mut out)?;
    }

    Ok(out)
}

// ---------------------------------------------------------------------------
// Instance-level enumeration
// ---------------------------------------------------------------------------

fn generate_instance_level(
    model: &AuthorityModel,
    config: &EnumerationConfig,
    out: &mut Vec<UnsafeCombination>,
) -> Result<()> {
    // Controllers that own at least one action, in input order.
    let eligible: Vec<&str> = model
        .controllers
        .iter()
        .map(|c| c.id.as_str())
        .filter(|id| !model.actions_of(id).is_empty())
        .collect();

    for size in 2..=config.max_combination_size {
        for subset in combinations(&eligible, size) {
            let action_lists: Vec<&[String]> =
                subset.iter().map(|id| model.actions_of(id)).collect();
            let mut selection = Vec::with_capacity(size);
            pick_actions(
                model,
                config,
                &subset,
                &action_lists,
                &mut selection,
                out,
            )?;
        }
    }
    Ok(())
}

/// Walk the cartesian product of one action per selected controller,
/// emitting candidates for each complete tuple.
fn pick_actions(
    model: &AuthorityModel,
    config: &EnumerationConfig,
    controllers: &[&str],
    action_lists: &[&[String]],
    selection: &mut Vec<(String, String)>,
    out: &mut Vec<UnsafeCombination>,
) -> Result<()> {
    let depth = selection.len();
    if depth == controllers.len() {
        emit_variants(model, config, selection, AbstractionLevel::InstanceLevel, out)?;
        return Ok(());
    }
    for action_id in action_lists[depth] {
        selection.push((controllers[depth].to_string(), action_id.clone()));
        pick_actions(model, config, controllers, action_lists, selection, out)?;
        selection.pop();
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Class-level enumeration
// ---------------------------------------------------------------------------

/// An action equivalence class: every action sharing one normalized
/// (verb, object) signature. Member order follows action input order, so
/// the first member is the deterministic representative.
fn action_classes(model: &AuthorityModel) -> Vec<(String, Vec<usize>)> {
    let mut classes: Vec<(String, Vec<usize>)> = Vec::new();
    for (idx, action) in model.actions.iter().enumerate() {
        let sig = action.signature();
        match classes.iter_mut().find(|(s, _)| *s == sig) {
            Some((_, members)) => members.push(idx),
            None => classes.push((sig, vec![idx])),
        }
    }
    classes
}

fn generate_class_level(
    model: &AuthorityModel,
    config: &EnumerationConfig,
    out: &mut Vec<UnsafeCombination>,
) -> Result<()> {
    let classes = action_classes(model);
    let indices: Vec<usize> = (0..classes.len()).collect();

    for size in 2..=config.max_combination_size {
        for subset in combinations(&indices, size) {
            // Representative member per class: first action in input order.
            let selection: Vec<(String, String)> = subset
                .iter()
                .map(|&ci| {
                    let action = &model.actions[classes[ci].1[0]];
                    (action.controller_id.clone(), action.id.clone())
                })
                .collect();
            emit_variants(model, config, &selection, AbstractionLevel::ClassLevel, out)?;
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Variant emission
// ---------------------------------------------------------------------------

fn emit_variants(
    model: &AuthorityModel,
    config: &EnumerationConfig,
    selection: &[(String, String)],
    abstraction: AbstractionLevel,
    out: &mut Vec<UnsafeCombination>,
) -> Result<()> {
    if config.enable_provide_withhold {
        for provided in [true, false] {
            let elements: Vec<CombinationElement> = selection
                .iter()
                .map(|(c, a)| CombinationElement {
                    controller_id: c.clone(),
                    action_id: a.clone(),
                    provided,
                    timing: None,
                })
                .collect();
            push_checked(
                out,
                config,
                UnsafeCombination {
                    interaction: InteractionType::ProvideWithhold,
                    abstraction,
                    description: describe_elements(model, &elements),
                    risk_score: SYSTEMATIC_BASE_SCORE,
                    reason: if provided {
                        "systematic enumeration: jointly provided actions".to_string()
                    } else {
                        "systematic enumeration: jointly withheld actions".to_string()
                    },
                    elements,
                },
            )?;
        }
    }

    if config.enable_timing_order {
        let last = selection.len() - 1;
        let elements: Vec<CombinationElement> = selection
            .iter()
            .enumerate()
            .map(|(i, (c, a))| CombinationElement {
                controller_id: c.clone(),
                action_id: a.clone(),
                provided: true,
                timing: match i {
                    0 => Some(TimingTag::Early),
                    i if i == last => Some(TimingTag::Late),
                    _ => None,
                },
            })
            .collect();
        push_checked(
            out,
            config,
            UnsafeCombination {
                interaction: InteractionType::TimingOrder,
                abstraction,
                description: describe_elements(model, &elements),
                risk_score: SYSTEMATIC_BASE_SCORE,
                reason: "systematic enumeration: order-sensitive actions".to_string(),
                elements,
            },
        )?;
    }

    Ok(())
}

fn push_checked(
    out: &mut Vec<UnsafeCombination>,
    config: &EnumerationConfig,
    candidate: UnsafeCombination,
) -> Result<()> {
    if out.len() >= config.combination_budget {
        return Err(UccaError::BudgetExceeded {
            generated: out.len(),
            budget: config.combination_budget,
        });
    }
    out.push(candidate);
    Ok(())
}

// ---------------------------------------------------------------------------
// Description building
// ---------------------------------------------------------------------------

/// Human-readable account of a concrete element list. Shared with the
/// refiner so expanded candidates read the same way as generated ones.
pub(crate) fn describe_elements(
    model: &AuthorityModel,
    elements: &[CombinationElement],
) -> String {
    let parts: Vec<String> = elements
        .iter()
        .map(|e| {
            let name = model.controller_name(&e.controller_id);
            let phrase = model
                .action(&e.action_id)
                .map(|a| format!("{} {}", a.verb, a.object))
                .unwrap_or_else(|| e.action_id.clone());
            let verb = if e.provided { "provides" } else { "withholds" };
            match e.timing {
                Some(tag) => format!("{name} {verb} '{phrase}' {tag}"),
                None => format!("{name} {verb} '{phrase}'"),
            }
        })
        .collect();
    parts.join(" while ")
}

// ---------------------------------------------------------------------------
// k-subset enumeration
// ---------------------------------------------------------------------------

/// All k-element subsets of `items`, preserving input order within each
/// subset and emitting subsets in lexicographic index order.
pub(crate) fn combinations<T: Clone>(items: &[T], k: usize) -> Vec<Vec<T>> {
    let mut result = Vec::new();
    if k == 0 || k > items.len() {
        return result;
    }
    let mut current = Vec::with_capacity(k);
    fn walk<T: Clone>(items: &[T], k: usize, start: usize, current: &mut Vec<T>, result: &mut Vec<Vec<T>>) {
        if current.len() == k {
            result.push(current.clone());
            return;
        }
        let remaining = k - current.len();
        for i in start..=items.len().saturating_sub(remaining) {
            current.push(items[i].clone());
            walk(items, k, i + 1, current, result);
            current.pop();
        }
    }
    walk(items, k, 0, &mut current, &mut result);
    result
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AuthorityModel, ControlAction, Controller};

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

    fn two_controller_model() -> AuthorityModel {
        AuthorityModel::build(
            vec![controller("c1", "Pilot"), controller("c2", "Copilot")],
            vec![
                action("a1", "c1", "extend", "gear"),
                action("a2", "c2", "retract", "flaps"),
            ],
        )
    }

    fn instance_only() -> EnumerationConfig {
        EnumerationConfig {
            enable_class_level: false,
            ..Default::default()
        }
    }

    #[test]
    fn combinations_enumerates_k_subsets() {
        let items = ["a", "b", "c"];
        assert_eq!(
            combinations(&items, 2),
            vec![vec!["a", "b"], vec!["a", "c"], vec!["b", "c"]]
        );
        assert_eq!(combinations(&items, 3).len(), 1);
        assert!(combinations(&items, 4).is_empty());
    }

    #[test]
    fn pair_of_controllers_yields_three_variants() {
        // One admissible tuple: (a1, a2). Two provide/withhold variants plus
        // one timing variant.
        let model = two_controller_model();
        let out = generate_base(&model, &instance_only()).unwrap();
        assert_eq!(out.len(), 3);
        assert_eq!(
            out.iter()
                .filter(|c| c.interaction == InteractionType::ProvideWithhold)
                .count(),
            2
        );
        assert_eq!(
            out.iter()
                .filter(|c| c.interaction == InteractionType::TimingOrder)
                .count(),
            1
        );
    }

    #[test]
    fn no_candidate_repeats_a_controller() {
        let model = AuthorityModel::build(
            vec![controller("c1", "Pilot"), controller("c2", "Copilot")],
            vec![
                action("a1", "c1", "extend", "gear"),
                action("a2", "c1", "retract", "gear"),
                action("a3", "c2", "arm", "brakes"),
            ],
        );
        let out = generate_base(&model, &instance_only()).unwrap();
        assert!(!out.is_empty());
        for candidate in &out {
            let mut ids: Vec<&str> = candidate
                .elements
                .iter()
                .map(|e| e.controller_id.as_str())
                .collect();
            ids.sort();
            ids.dedup();
            assert_eq!(ids.len(), candidate.elements.len());
        }
    }

    #[test]
    fn element_counts_stay_within_bounds() {
        let model = AuthorityModel::build(
            vec![
                controller("c1", "Pilot"),
                controller("c2", "Copilot"),
                controller("c3", "Autopilot"),
            ],
            vec![
                action("a1", "c1", "extend", "gear"),
                action("a2", "c2", "retract", "flaps"),
                action("a3", "c3", "hold", "altitude"),
            ],
        );
        let config = EnumerationConfig {
            max_combination_size: 3,
            ..instance_only()
        };
        let out = generate_base(&model, &config).unwrap();
        assert!(out
            .iter()
            .all(|c| c.elements.len() >= 2 && c.elements.len() <= 3));
        // Both sizes must actually occur.
        assert!(out.iter().any(|c| c.elements.len() == 2));
        assert!(out.iter().any(|c| c.elements.len() == 3));
    }

    #[test]
    fn outputs_reference_only_model_actions() {
        let model = two_controller_model();
        let out = generate_base(&model, &EnumerationConfig::default()).unwrap();
        for candidate in &out {
            for element in &candidate.elements {
                assert!(model.action(&element.action_id).is_some());
            }
        }
    }

    #[test]
    fn timing_variant_tags_first_and_last() {
        let model = two_controller_model();
        let out = generate_base(&model, &instance_only()).unwrap();
        let timing = out
            .iter()
            .find(|c| c.interaction == InteractionType::TimingOrder)
            .unwrap();
        assert_eq!(timing.elements.first().unwrap().timing, Some(TimingTag::Early));
        assert_eq!(timing.elements.last().unwrap().timing, Some(TimingTag::Late));
    }

    #[test]
    fn class_level_collapses_same_signature_actions() {
        // Three controllers all able to "activate pump" plus one distinct
        // action: two signature classes, so exactly one class pair.
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
                action("a4", "c1", "open", "valve"),
            ],
        );
        let config = EnumerationConfig {
            enable_instance_level: false,
            enable_timing_order: false,
            ..Default::default()
        };
        let out = generate_base(&model, &config).unwrap();
        // One class pair, two provide/withhold variants.
        assert_eq!(out.len(), 2);
        assert!(out
            .iter()
            .all(|c| c.abstraction == AbstractionLevel::ClassLevel));
    }

    #[test]
    fn disabled_levels_produce_nothing() {
        let model = two_controller_model();
        let config = EnumerationConfig {
            enable_class_level: false,
            enable_instance_level: false,
            ..Default::default()
        };
        assert!(generate_base(&model, &config).unwrap().is_empty());
    }

    #[test]
    fn budget_exhaustion_aborts() {
        let model = two_controller_model();
        let config = EnumerationConfig {
            combination_budget: 2,
            ..Default::default()
        };
        let err = generate_base(&model, &config).unwrap_err();
        assert!(matches!(err, UccaError::BudgetExceeded { budget: 2, .. }));
    }

    #[test]
    fn generation_is_deterministic() {
        let model = two_controller_model();
        let config = EnumerationConfig::default();
        let first = generate_base(&model, &config).unwrap();
        let second = generate_base(&model, &config).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn descriptions_use_controller_names() {
        let model = two_controller_model();
        let out = generate_base(&model, &instance_only()).unwrap();
        assert!(out[0].description.contains("Pilot"));
        assert!(out[0].description.contains("extend gear"));
    }
}
