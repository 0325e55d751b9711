use crate::candidate::UnsafeCombination;
use crate::model::Hazard;
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

/// Score added per word shared between a hazard title and a candidate
/// description.
const HAZARD_RELEVANCE_WEIGHT: f64 = 0.1;

/// Words of this length or shorter carry no relevance signal.
const MIN_SIGNIFICANT_LEN: usize = 4;

// ---------------------------------------------------------------------------
// Tokenization
// ---------------------------------------------------------------------------

static WORD_RE: OnceLock<Regex> = OnceLock::new();

fn word_re() -> &'static Regex {
    WORD_RE.get_or_init(|| Regex::new(r"[A-Za-z0-9]+").unwrap())
}

/// Lowercased word set of a text.
pub(crate) fn tokenize(text: &str) -> HashSet<String> {
    word_re()
        .find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .collect()
}

/// Lowercased word set, keeping only words long enough to be meaningful.
pub(crate) fn tokenize_significant(text: &str) -> HashSet<String> {
    word_re()
        .find_iter(text)
        .filter(|m| m.as_str().len() >= MIN_SIGNIFICANT_LEN)
        .map(|m| m.as_str().to_lowercase())
        .collect()
}

// ---------------------------------------------------------------------------
// Hazard relevance
// ---------------------------------------------------------------------------

/// Boost each candidate by its keyword overlap with the hazard list: per
/// hazard, the significant-word intersection between hazard title and
/// candidate description, weighted and summed; the score stays clamped to
/// [0, 1].
pub fn apply_hazard_relevance(candidates: &mut [UnsafeCombination], hazards: &[Hazard]) {
    if hazards.is_empty() {
        return;
    }
    let hazard_tokens: Vec<HashSet<String>> = hazards
        .iter()
        .map(|h| tokenize_significant(&h.title))
        .collect();

    for candidate in candidates {
        let description_tokens = tokenize_significant(&candidate.description);
        let mut delta = 0.0;
        for tokens in &hazard_tokens {
            let overlap = tokens.intersection(&description_tokens).count();
            delta += overlap as f64 * HAZARD_RELEVANCE_WEIGHT;
        }
        if delta > 0.0 {
            candidate.adjust_score(delta);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::CombinationElement;
    use crate::types::{AbstractionLevel, InteractionType};

    fn hazard(title: &str) -> Hazard {
        Hazard {
            id: "h1".to_string(),
            title: title.to_string(),
            description: String::new(),
        }
    }

    fn candidate(description: &str, score: f64) -> UnsafeCombination {
        UnsafeCombination {
            interaction: InteractionType::ProvideWithhold,
            abstraction: AbstractionLevel::InstanceLevel,
            elements: vec![
                CombinationElement::provided("c1", "a1"),
                CombinationElement::provided("c2", "a2"),
            ],
            description: description.to_string(),
            risk_score: score,
            reason: "test".to_string(),
        }
    }

    #[test]
    fn short_words_are_not_significant() {
        let tokens = tokenize_significant("the gear is down");
        assert!(tokens.contains("gear"));
        assert!(tokens.contains("down"));
        assert!(!tokens.contains("the"));
        assert!(!tokens.contains("is"));
    }

    #[test]
    fn tokenize_strips_punctuation_and_case() {
        let tokens = tokenize("Pilot withholds 'Extend Gear'!");
        assert!(tokens.contains("pilot"));
        assert!(tokens.contains("extend"));
        assert!(tokens.contains("gear"));
    }

    #[test]
    fn overlap_boosts_score_by_weight() {
        let mut candidates = vec![candidate("landing gear extends during rollout", 0.5)];
        apply_hazard_relevance(
            &mut candidates,
            &[hazard("Uncommanded landing gear retraction")],
        );
        // Shared significant words: "landing", "gear" -> +0.2.
        assert!((candidates[0].risk_score - 0.7).abs() < 1e-9);
    }

    #[test]
    fn boost_sums_across_hazards() {
        let mut candidates = vec![candidate("engine thrust lost", 0.5)];
        apply_hazard_relevance(
            &mut candidates,
            &[hazard("engine fire"), hazard("thrust asymmetry")],
        );
        assert!((candidates[0].risk_score - 0.7).abs() < 1e-9);
    }

    #[test]
    fn boosted_score_stays_clamped() {
        let mut candidates = vec![candidate(
            "landing gear doors extend during gear retraction sequence",
            0.9,
        )];
        apply_hazard_relevance(
            &mut candidates,
            &[hazard("landing gear doors fail during retraction sequence")],
        );
        assert_eq!(candidates[0].risk_score, 1.0);
    }

    #[test]
    fn no_overlap_leaves_score_untouched() {
        let mut candidates = vec![candidate("pump pressure spike", 0.5)];
        apply_hazard_relevance(&mut candidates, &[hazard("runway incursion")]);
        assert_eq!(candidates[0].risk_score, 0.5);
    }

    #[test]
    fn empty_hazard_list_is_a_no_op() {
        let mut candidates = vec![candidate("anything", 0.4)];
        apply_hazard_relevance(&mut candidates, &[]);
        assert_eq!(candidates[0].risk_score, 0.4);
    }
}
