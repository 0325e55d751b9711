//! Read-only analysis snapshot — the engine's entire view of the world.
//!
//! Controllers, control actions, hazards, and analyst-confirmed entries are
//! owned and persisted by the host analysis store. The engine receives them
//! as a value snapshot, reads them, and returns transient candidates; nothing
//! here is ever mutated or written back.

use crate::error::{Result, UccaError};
use crate::policy::SpecialInteractionPolicy;
use crate::prune::InterchangeabilityRelation;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// Controller / ControlAction
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Controller {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlAction {
    pub id: String,
    pub controller_id: String,
    pub verb: String,
    pub object: String,
    #[serde(default)]
    pub description: String,
}

impl ControlAction {
    /// Normalized "verb object" signature. Actions sharing a signature form
    /// one equivalence class for class-level enumeration.
    pub fn signature(&self) -> String {
        format!(
            "{} {}",
            self.verb.trim().to_lowercase(),
            self.object.trim().to_lowercase()
        )
    }
}

// ---------------------------------------------------------------------------
// Hazard / ExistingEntry
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hazard {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// An analyst-confirmed combination already recorded in the store. Only its
/// description participates here, as the dedup reference text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExistingEntry {
    pub id: String,
    pub description: String,
}

// ---------------------------------------------------------------------------
// AuthorityModel
// ---------------------------------------------------------------------------

/// Who may issue which control action. The mapping is keyed by controller id;
/// controllers owning no actions have no entry, and a missing key reads as an
/// empty set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorityModel {
    pub controllers: Vec<Controller>,
    pub actions: Vec<ControlAction>,
    pub authority: BTreeMap<String, Vec<String>>,
}

impl AuthorityModel {
    /// Group actions by owning controller. Pure; never fails on well-formed
    /// input. Ownership consistency is checked separately by [`validate`].
    ///
    /// [`validate`]: AuthorityModel::validate
    pub fn build(controllers: Vec<Controller>, actions: Vec<ControlAction>) -> Self {
        let mut authority: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for action in &actions {
            authority
                .entry(action.controller_id.clone())
                .or_default()
                .push(action.id.clone());
        }
        Self {
            controllers,
            actions,
            authority,
        }
    }

    /// Reject actions whose owning controller is absent. Run before
    /// enumeration begins so no stage ever sees a dangling reference.
    pub fn validate(&self) -> Result<()> {
        for action in &self.actions {
            if !self.controllers.iter().any(|c| c.id == action.controller_id) {
                return Err(UccaError::UnknownController {
                    action: action.id.clone(),
                    controller: action.controller_id.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn controller(&self, id: &str) -> Option<&Controller> {
        self.controllers.iter().find(|c| c.id == id)
    }

    pub fn action(&self, id: &str) -> Option<&ControlAction> {
        self.actions.iter().find(|a| a.id == id)
    }

    /// Action ids owned by the given controller, in input order. Empty slice
    /// for controllers without an authority entry.
    pub fn actions_of(&self, controller_id: &str) -> &[String] {
        self.authority
            .get(controller_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Display name for a controller id, falling back to the id itself.
    pub fn controller_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.controller(id).map(|c| c.name.as_str()).unwrap_or(id)
    }
}

// ---------------------------------------------------------------------------
// AnalysisSnapshot
// ---------------------------------------------------------------------------

/// Everything one enumeration run reads, passed by reference through the
/// pipeline. No stage reaches outside this value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisSnapshot {
    pub model: AuthorityModel,
    #[serde(default)]
    pub hazards: Vec<Hazard>,
    #[serde(default)]
    pub existing_entries: Vec<ExistingEntry>,
    #[serde(default)]
    pub interchangeability: InterchangeabilityRelation,
    #[serde(default)]
    pub policy: SpecialInteractionPolicy,
}

impl AnalysisSnapshot {
    pub fn new(model: AuthorityModel) -> Self {
        Self {
            model,
            hazards: Vec::new(),
            existing_entries: Vec::new(),
            interchangeability: InterchangeabilityRelation::default(),
            policy: SpecialInteractionPolicy::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
