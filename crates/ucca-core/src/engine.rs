//! Pipeline orchestration.
//!
//! One call runs the whole pipeline over a read-only snapshot: systematic
//! generation, refinement, domain patterns, symmetry pruning, hazard
//! relevance, policy overrides, threshold/dedup filtering, ranking. An error
//! from any stage aborts the run with no partial result, and the caller may
//! retry freely since nothing is mutated.
//!
//! The entry point is async purely for calling-convention consistency with
//! the host's other operations; it never suspends.

use crate::candidate::UnsafeCombination;
use crate::config::EnumerationConfig;
use crate::error::{Result, UccaError};
use crate::filter::{dedup_against_existing, threshold_filter};
use crate::generate::generate_base;
use crate::model::AnalysisSnapshot;
use crate::patterns::domain_patterns;
use crate::policy::apply_policy;
use crate::prune::prune;
use crate::refine::refine;
use crate::report::{rank, recommendations, statistics, EnumerationStatistics};
use crate::score::apply_hazard_relevance;
use crate::types::InteractionType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info};

// ---------------------------------------------------------------------------
// EnumerationResult
// ---------------------------------------------------------------------------

/// Outcome of one enumeration run. Ephemeral: recomputed fully per call,
/// never persisted by the engine. The caller presents the candidates to a
/// human reviewer and records accepted ones through the analysis store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnumerationResult {
    pub candidates: Vec<UnsafeCombination>,
    pub statistics: EnumerationStatistics,
    pub recommendations: Vec<String>,
    pub duration_ms: u64,
    pub generated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Enumerator
// ---------------------------------------------------------------------------

/// The enumeration engine. Holds only configuration, fixed at construction;
/// no state survives a call, so one instance serves any number of runs.
#[derive(Debug, Clone)]
pub struct Enumerator {
    config: EnumerationConfig,
}

impl Enumerator {
    /// Build an enumerator from a configuration, rejecting out-of-range
    /// values up front.
    pub fn new(config: EnumerationConfig) -> Result<Self> {
        Ok(Self {
            config: config.validated()?,
        })
    }

    pub fn config(&self) -> &EnumerationConfig {
        &self.config
    }

    /// Run the full pipeline over a snapshot.
    pub async fn enumerate(&self, snapshot: &AnalysisSnapshot) -> Result<EnumerationResult> {
        self.run(snapshot)
    }

    fn run(&self, snapshot: &AnalysisSnapshot) -> Result<EnumerationResult> {
        let started = Instant::now();
        self.validate_inputs(snapshot)?;

        let model = &snapshot.model;
        let base = generate_base(model, &self.config)?;
        debug!(count = base.len(), "generated base candidates");

        let refined = refine(base, model);
        debug!(count = refined.len(), "refined to concrete candidates");

        let mut pool = refined;
        let domain: Vec<UnsafeCombination> = domain_patterns(model)
            .into_iter()
            .filter(|c| self.interaction_enabled(c.interaction))
            .collect();
        debug!(count = domain.len(), "domain pattern candidates");
        pool.extend(domain);

        // One pruning pass over the merged pool: symmetric duplicates from
        // refinement and systematic/domain overlap collapse together, with
        // the highest-scoring representative surviving.
        let mut pruned = prune(pool, &snapshot.interchangeability, model);
        debug!(count = pruned.len(), "after symmetry pruning");

        if self.config.apply_hazard_relevance {
            apply_hazard_relevance(&mut pruned, &snapshot.hazards);
        }

        let with_policy = apply_policy(pruned, &snapshot.policy);
        debug!(count = with_policy.len(), "after policy application");

        let above_threshold = threshold_filter(with_policy, self.config.score_threshold);
        let mut final_pool = dedup_against_existing(above_threshold, &snapshot.existing_entries);
        debug!(count = final_pool.len(), "after threshold and dedup");

        rank(&mut final_pool);
        let statistics = statistics(&final_pool);
        let recommendations = recommendations(&final_pool);
        let duration_ms = started.elapsed().as_millis() as u64;

        info!(
            total = statistics.total,
            high_score = statistics.high_score,
            duration_ms,
            "enumeration complete"
        );

        Ok(EnumerationResult {
            candidates: final_pool,
            statistics,
            recommendations,
            duration_ms,
            generated_at: Utc::now(),
        })
    }

    fn interaction_enabled(&self, interaction: InteractionType) -> bool {
        match interaction {
            InteractionType::ProvideWithhold => self.config.enable_provide_withhold,
            InteractionType::TimingOrder => self.config.enable_timing_order,
        }
    }

    /// Input validation, before any stage runs: the model must be
    /// internally consistent, and analyst-pinned mandatory candidates must
    /// respect the same invariants generated candidates do.
    fn validate_inputs(&self, snapshot: &AnalysisSnapshot) -> Result<()> {
        snapshot.model.validate()?;

        for candidate in &snapshot.policy.mandatory {
            let count = candidate.elements.len();
            if count < 2 || count > self.config.max_combination_size {
                return Err(UccaError::MandatoryOutOfBounds {
                    description: candidate.description.clone(),
                    count,
                    max: self.config.max_combination_size,
                });
            }
            for element in &candidate.elements {
                if snapshot.model.action(&element.action_id).is_none() {
                    return Err(UccaError::UnknownAction(element.action_id.clone()));
                }
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
