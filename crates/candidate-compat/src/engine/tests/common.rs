use chrono::NaiveDate;

use crate::engine::{
    BadgeCatalog, CandidateFactBase, CandidateId, CandidateRecords, CertificationRecord,
    EvaluationConfig, LanguageClaim, ProfileAttributes, RequirementCatalog, RequirementDefinition,
    RequirementId, RequisitionId, SkillCategory, SkillClaim, TargetValue,
};

pub(super) const REQUISITION: &str = "req-2025-014";

pub(super) fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 1).expect("valid date")
}

pub(super) fn config() -> EvaluationConfig {
    EvaluationConfig::new(as_of())
}

pub(super) fn certification(name: &str) -> CertificationRecord {
    CertificationRecord {
        name: name.to_string(),
        issuer: "Academy".to_string(),
        issued_on: NaiveDate::from_ymd_opt(2023, 5, 12).expect("valid date"),
        expires_on: None,
    }
}

pub(super) fn expired_certification(name: &str) -> CertificationRecord {
    CertificationRecord {
        expires_on: NaiveDate::from_ymd_opt(2024, 12, 31),
        ..certification(name)
    }
}

pub(super) fn profile() -> ProfileAttributes {
    ProfileAttributes {
        skills: vec![
            SkillClaim {
                name: "Rust".to_string(),
                category: SkillCategory::Technical,
                level: Some("advanced".to_string()),
            },
            SkillClaim {
                name: "Teamwork".to_string(),
                category: SkillCategory::Soft,
                level: None,
            },
        ],
        languages: vec![LanguageClaim {
            language: "Inglese".to_string(),
            level: "C1".to_string(),
        }],
        years_of_experience: Some(3.0),
        education: Some("bachelor".to_string()),
        availability: Some(TargetValue::Text("full_time".to_string())),
    }
}

pub(super) fn candidate(certifications: &[&str]) -> CandidateRecords {
    CandidateRecords {
        candidate_id: CandidateId::from("cand-001"),
        certifications: certifications.iter().map(|name| certification(name)).collect(),
        badge_grants: Vec::new(),
        profile: Some(profile()),
    }
}

pub(super) fn facts(records: &CandidateRecords) -> CandidateFactBase {
    CandidateFactBase::build(records, &config())
}

/// Fact base with the standard badge catalog already merged in.
pub(super) fn facts_with_badges(records: &CandidateRecords) -> CandidateFactBase {
    let facts = facts(records);
    let evaluation = BadgeCatalog::standard().evaluate(&facts);
    facts.with_qualified_badges(evaluation.qualified)
}

pub(super) fn requirement(
    id: &str,
    kind: &str,
    mandatory: bool,
    weight: i64,
    target: TargetValue,
) -> RequirementDefinition {
    RequirementDefinition {
        id: RequirementId::from(id),
        requirement_type: kind.to_string(),
        mandatory,
        weight,
        target_value: Some(target),
        applies_to: RequisitionId::from(REQUISITION),
    }
}

pub(super) fn text(value: &str) -> TargetValue {
    TargetValue::Text(value.to_string())
}

pub(super) fn catalog(definitions: Vec<RequirementDefinition>) -> RequirementCatalog {
    RequirementCatalog::build(RequisitionId::from(REQUISITION), definitions)
}
