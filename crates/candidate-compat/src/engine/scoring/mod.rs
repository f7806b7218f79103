//! Weighted compatibility between a candidate fact base and a requirement catalog.

mod policy;
mod rules;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::catalog::{CatalogEntry, RequirementCatalog};
use super::diagnostics::Diagnostic;
use super::domain::{CandidateId, RequirementId, RequirementType, RequisitionId};
use super::facts::CandidateFactBase;
use policy::aggregate;

/// Per-requirement line of the breakdown, kept for audits and UI display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequirementOutcome {
    pub requirement_id: RequirementId,
    /// `None` when the definition named an unknown kind.
    pub requirement_type: Option<RequirementType>,
    pub mandatory: bool,
    pub weight: u32,
    pub satisfied: bool,
    pub credit_ratio: f64,
    pub contribution: f64,
    pub notes: String,
}

/// Score and breakdown for one candidate against one requisition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompatibilityResult {
    pub requisition_id: RequisitionId,
    pub score: u8,
    pub per_requirement: Vec<RequirementOutcome>,
    pub disqualified: bool,
    pub disqualifying_requirement_ids: Vec<RequirementId>,
    /// Every weight was zero, so no percentage could be formed.
    pub indeterminate: bool,
    pub total_weight: u64,
    pub diagnostics: Vec<Diagnostic>,
}

impl CompatibilityResult {
    pub fn summary(&self) -> String {
        if self.disqualified {
            let ids: Vec<&str> = self
                .disqualifying_requirement_ids
                .iter()
                .map(|id| id.0.as_str())
                .collect();
            format!("disqualified by mandatory requirement(s): {}", ids.join(", "))
        } else if self.indeterminate {
            "indeterminate: requisition carries no weighted requirements".to_string()
        } else {
            let met = self
                .per_requirement
                .iter()
                .filter(|outcome| outcome.satisfied)
                .count();
            format!(
                "{}% compatible ({met}/{} requirements met)",
                self.score,
                self.per_requirement.len()
            )
        }
    }

    /// Snapshot the caller can persist alongside the candidate.
    pub fn to_record(&self, candidate_id: &CandidateId, evaluated_on: NaiveDate) -> CompatibilityRecord {
        CompatibilityRecord {
            candidate_id: candidate_id.clone(),
            requisition_id: self.requisition_id.clone(),
            score: self.score,
            disqualified: self.disqualified,
            evaluated_on,
        }
    }
}

/// Persistence-ready row mirroring the platform's compatibility table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompatibilityRecord {
    pub candidate_id: CandidateId,
    pub requisition_id: RequisitionId,
    pub score: u8,
    pub disqualified: bool,
    pub evaluated_on: NaiveDate,
}

/// Score `facts` against `catalog`. BADGE requirements read the fact base's
/// qualified set, so merge badge evaluation results in first.
pub fn score_compatibility(
    facts: &CandidateFactBase,
    catalog: &RequirementCatalog,
) -> CompatibilityResult {
    let mut diagnostics: Vec<Diagnostic> = catalog.diagnostics().to_vec();
    diagnostics.extend(facts.diagnostics().iter().cloned());

    let per_requirement: Vec<RequirementOutcome> = catalog
        .entries()
        .iter()
        .map(|entry| match entry {
            CatalogEntry::Valid(requirement) => {
                let credit = rules::credit_for(requirement, facts);
                if let Some(missing) = credit.missing_input {
                    diagnostics.push(Diagnostic::input_data(
                        format!("requirement {}", requirement.id),
                        format!("could not be evaluated: {missing}"),
                    ));
                }
                RequirementOutcome {
                    requirement_id: requirement.id.clone(),
                    requirement_type: Some(requirement.requirement_type()),
                    mandatory: requirement.mandatory,
                    weight: requirement.weight,
                    satisfied: credit.ratio > 0.0,
                    credit_ratio: credit.ratio,
                    contribution: f64::from(requirement.weight) * credit.ratio,
                    notes: credit.notes,
                }
            }
            CatalogEntry::Rejected(rejected) => RequirementOutcome {
                requirement_id: rejected.id.clone(),
                requirement_type: rejected.requirement_type,
                mandatory: rejected.mandatory,
                weight: rejected.weight,
                satisfied: false,
                credit_ratio: 0.0,
                contribution: 0.0,
                notes: format!("not evaluated: {}", rejected.error),
            },
        })
        .collect();

    let totals = aggregate(&per_requirement);

    debug!(
        candidate = %facts.candidate_id(),
        requisition = %catalog.requisition_id(),
        score = totals.score,
        disqualified = totals.disqualified,
        "compatibility scored"
    );

    CompatibilityResult {
        requisition_id: catalog.requisition_id().clone(),
        score: totals.score,
        per_requirement,
        disqualified: totals.disqualified,
        disqualifying_requirement_ids: totals.disqualifying_requirement_ids,
        indeterminate: totals.indeterminate,
        total_weight: totals.total_weight,
        diagnostics,
    }
}
