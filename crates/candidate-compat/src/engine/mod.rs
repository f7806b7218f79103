//! Candidate compatibility engine: requirement catalog, candidate fact base,
//! badge qualification, and weighted scoring.
//!
//! Every function here is pure. Callers fetch records, pass them in, and decide
//! what to persist from the returned values.

pub mod badges;
pub mod catalog;
mod config;
pub mod diagnostics;
pub mod domain;
pub mod facts;
mod normalize;
pub mod scoring;

#[cfg(test)]
mod tests;

pub use badges::{
    evaluate_badges, BadgeCatalog, BadgeDefinition, BadgeEvaluation, MatchPattern, Predicate,
    PredicateError,
};
pub use catalog::{
    CatalogEntry, RawRequirement, RejectedRequirement, Requirement, RequirementCatalog,
    RequirementError, RequirementTarget, SkillTarget, UnreadableDefinition,
};
pub use config::EvaluationConfig;
pub use diagnostics::{Diagnostic, DiagnosticKind};
pub use domain::{
    BadgeId, CandidateId, CandidateRecords, CertificationRecord, EducationLevel, LanguageClaim,
    LanguageLevel, Proficiency, ProfileAttributes, RequirementDefinition, RequirementId,
    RequirementType, RequisitionId, SkillCategory, SkillClaim, TargetValue,
};
pub use facts::{CandidateFactBase, CertificationFact};
pub use scoring::{
    score_compatibility, CompatibilityRecord, CompatibilityResult, RequirementOutcome,
};

use std::collections::BTreeSet;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Stateless facade running the whole flow for one or many candidates.
pub struct CompatibilityEngine {
    config: EvaluationConfig,
}

impl CompatibilityEngine {
    pub fn new(config: EvaluationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EvaluationConfig {
        &self.config
    }

    pub fn fact_base(&self, candidate: &CandidateRecords) -> CandidateFactBase {
        CandidateFactBase::build(candidate, &self.config)
    }

    pub fn evaluate(
        &self,
        candidate: &CandidateRecords,
        badges: &BadgeCatalog,
        requirements: &RequirementCatalog,
    ) -> EngineOutcome {
        let facts = self.fact_base(candidate);
        let badge_evaluation = badges.evaluate(&facts);
        let facts = facts.with_qualified_badges(badge_evaluation.qualified.iter().cloned());
        let compatibility = score_compatibility(&facts, requirements);

        let mut diagnostics = badge_evaluation.diagnostics;
        diagnostics.extend(compatibility.diagnostics.iter().cloned());

        EngineOutcome {
            candidate_id: candidate.candidate_id.clone(),
            qualified_badges: badge_evaluation.qualified,
            newly_qualified_badges: badge_evaluation.newly_qualified,
            compatibility,
            diagnostics,
        }
    }

    /// Evaluate independent candidates in parallel against one catalog snapshot.
    /// Output order follows input order.
    pub fn evaluate_batch(
        &self,
        candidates: &[CandidateRecords],
        badges: &BadgeCatalog,
        requirements: &RequirementCatalog,
    ) -> Vec<EngineOutcome> {
        let outcomes: Vec<EngineOutcome> = candidates
            .par_iter()
            .map(|candidate| self.evaluate(candidate, badges, requirements))
            .collect();

        info!(
            requisition = %requirements.requisition_id(),
            candidates = outcomes.len(),
            "batch evaluation complete"
        );

        outcomes
    }
}

/// Everything the engine decided for one candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineOutcome {
    pub candidate_id: CandidateId,
    pub qualified_badges: BTreeSet<BadgeId>,
    pub newly_qualified_badges: BTreeSet<BadgeId>,
    pub compatibility: CompatibilityResult,
    pub diagnostics: Vec<Diagnostic>,
}

impl EngineOutcome {
    pub fn record(&self, evaluated_on: chrono::NaiveDate) -> CompatibilityRecord {
        self.compatibility.to_record(&self.candidate_id, evaluated_on)
    }
}
