use super::common::*;
use crate::engine::{
    score_compatibility, BadgeCatalog, CandidateId, CandidateRecords, CompatibilityEngine,
    DiagnosticKind, RequirementId, RequirementType, TargetValue,
};

#[test]
fn unmet_mandatory_certification_disqualifies() {
    let records = candidate(&[]);
    let catalog = catalog(vec![
        requirement("aws", "CERTIFICATION", true, 20, text("AWS Solutions Architect")),
        requirement("rust", "TECHNICAL_SKILL", false, 10, text("rust")),
    ]);

    let result = score_compatibility(&facts(&records), &catalog);

    assert_eq!(result.score, 0);
    assert!(result.disqualified);
    assert_eq!(
        result.disqualifying_requirement_ids,
        vec![RequirementId::from("aws")]
    );
    // The breakdown is still complete for diagnostic display.
    assert_eq!(result.per_requirement.len(), 2);
    assert!(result.per_requirement[1].satisfied);
    assert_eq!(result.per_requirement[1].contribution, 10.0);
}

#[test]
fn optional_weights_produce_weighted_percentage() {
    let records = candidate(&[]);
    let catalog = catalog(vec![
        requirement("go", "TECHNICAL_SKILL", false, 30, text("go")),
        requirement("rust", "TECHNICAL_SKILL", false, 70, text("rust")),
    ]);

    let result = score_compatibility(&facts(&records), &catalog);

    assert_eq!(result.score, 70);
    assert!(!result.disqualified);
    assert!(!result.indeterminate);
    assert_eq!(result.total_weight, 100);
}

#[test]
fn badge_requirement_reads_evaluated_badges() {
    let records = candidate(&["React Developer", "Node.js Backend"]);
    let catalog = catalog(vec![requirement(
        "fs",
        "BADGE",
        true,
        50,
        text("full-stack-senior"),
    )]);

    let without_merge = score_compatibility(&facts(&records), &catalog);
    assert!(without_merge.disqualified);

    let result = score_compatibility(&facts_with_badges(&records), &catalog);
    assert_eq!(result.score, 100);
    assert!(result.per_requirement[0].satisfied);
}

#[test]
fn experience_and_availability_earn_partial_credit() {
    let records = candidate(&[]);
    let catalog = catalog(vec![
        requirement("xp", "EXPERIENCE", false, 60, TargetValue::Number(6.0)),
        requirement("hours", "AVAILABILITY", false, 40, TargetValue::Number(50.0)),
    ]);

    let result = score_compatibility(&facts(&records), &catalog);

    assert_eq!(result.per_requirement[0].credit_ratio, 0.5);
    assert_eq!(result.per_requirement[0].contribution, 30.0);
    assert_eq!(result.per_requirement[1].credit_ratio, 0.8);
    // 30 + 32 of 100
    assert_eq!(result.score, 62);
}

#[test]
fn partial_credit_keeps_mandatory_requirement_satisfied() {
    let records = candidate(&[]);
    let catalog = catalog(vec![requirement(
        "xp",
        "EXPERIENCE",
        true,
        10,
        TargetValue::Number(12.0),
    )]);

    let result = score_compatibility(&facts(&records), &catalog);

    assert!(!result.disqualified);
    assert_eq!(result.score, 25);
}

#[test]
fn levels_are_compared_on_ordinal_scales() {
    let records = candidate(&[]);
    let catalog = catalog(vec![
        requirement("en-b2", "LANGUAGE", false, 1, text("inglese:B2")),
        requirement("en-c2", "LANGUAGE", false, 1, text("inglese:C2")),
        requirement("rust-exp", "TECHNICAL_SKILL", false, 1, text("rust:expert")),
        requirement("team", "SOFT_SKILL", false, 1, text("teamwork")),
        requirement("rust-soft", "SOFT_SKILL", false, 1, text("rust")),
        requirement("bsc", "EDUCATION", false, 1, text("bachelor")),
        requirement("msc", "EDUCATION", false, 1, text("master")),
        requirement("ft", "AVAILABILITY", false, 1, text("part_time")),
    ]);

    let result = score_compatibility(&facts(&records), &catalog);
    let satisfied: Vec<(&str, bool)> = result
        .per_requirement
        .iter()
        .map(|outcome| (outcome.requirement_id.0.as_str(), outcome.satisfied))
        .collect();

    assert_eq!(
        satisfied,
        vec![
            ("en-b2", true),
            ("en-c2", false),
            ("rust-exp", false),
            ("team", true),
            ("rust-soft", false),
            ("bsc", true),
            ("msc", false),
            ("ft", true),
        ]
    );
}

#[test]
fn expired_certification_does_not_satisfy_requirement() {
    let mut records = candidate(&[]);
    records
        .certifications
        .push(expired_certification("Scrum Master"));
    let catalog = catalog(vec![requirement(
        "scrum",
        "CERTIFICATION",
        false,
        10,
        text("scrum master"),
    )]);

    let result = score_compatibility(&facts(&records), &catalog);

    assert_eq!(result.score, 0);
    assert!(result.per_requirement[0].notes.contains("expired"));
}

#[test]
fn malformed_requirements_count_as_unsatisfied() {
    let records = candidate(&[]);
    let catalog = catalog(vec![
        requirement("rust", "TECHNICAL_SKILL", false, 50, text("rust")),
        requirement("salary", "SALARY", false, 50, text("45000")),
    ]);

    let result = score_compatibility(&facts(&records), &catalog);

    assert_eq!(result.score, 50);
    assert_eq!(result.per_requirement[1].requirement_type, None);
    assert!(!result.per_requirement[1].satisfied);
    assert!(result
        .diagnostics
        .iter()
        .any(|diagnostic| diagnostic.kind == DiagnosticKind::Configuration
            && diagnostic.subject == "requirement salary"));
}

#[test]
fn malformed_mandatory_requirement_disqualifies() {
    let records = candidate(&[]);
    let catalog = catalog(vec![
        requirement("rust", "TECHNICAL_SKILL", false, 50, text("rust")),
        requirement("lang", "LANGUAGE", true, 10, text("english")),
    ]);

    let result = score_compatibility(&facts(&records), &catalog);

    assert!(result.disqualified);
    assert_eq!(result.score, 0);
}

#[test]
fn repeated_requirement_id_scores_only_the_first_definition() {
    let records = candidate(&[]);
    let catalog = catalog(vec![
        requirement("rust", "TECHNICAL_SKILL", true, 50, text("rust")),
        requirement("rust", "TECHNICAL_SKILL", true, 50, text("rust:expert")),
    ]);

    let result = score_compatibility(&facts(&records), &catalog);

    assert_eq!(result.score, 100);
    assert!(!result.disqualified);
    assert_eq!(result.total_weight, 50);
    assert_eq!(result.per_requirement.len(), 1);
    assert!(result
        .diagnostics
        .iter()
        .any(|diagnostic| diagnostic.subject == "requirement rust"
            && diagnostic.message.contains("duplicate")));
}

#[test]
fn missing_profile_degrades_to_unsatisfied() {
    let records = CandidateRecords {
        candidate_id: CandidateId::from("cand-bare"),
        certifications: Vec::new(),
        badge_grants: Vec::new(),
        profile: None,
    };
    let catalog = catalog(vec![
        requirement("rust", "TECHNICAL_SKILL", false, 10, text("rust")),
        requirement("xp", "EXPERIENCE", false, 10, TargetValue::Number(2.0)),
    ]);

    let result = score_compatibility(&facts(&records), &catalog);

    assert_eq!(result.score, 0);
    assert!(!result.disqualified);
    let input_issues = result
        .diagnostics
        .iter()
        .filter(|diagnostic| diagnostic.kind == DiagnosticKind::InputData)
        .count();
    // One for the missing profile, one per requirement that needed it.
    assert_eq!(input_issues, 3);
}

#[test]
fn zero_weight_catalog_is_indeterminate() {
    let records = candidate(&[]);
    let catalog = catalog(vec![
        requirement("rust", "TECHNICAL_SKILL", false, 0, text("rust")),
        requirement("go", "TECHNICAL_SKILL", false, 0, text("go")),
    ]);

    let result = score_compatibility(&facts(&records), &catalog);

    assert_eq!(result.score, 0);
    assert!(result.indeterminate);
    assert!(result.summary().starts_with("indeterminate"));
}

#[test]
fn empty_catalog_scores_zero() {
    let result = score_compatibility(&facts(&candidate(&[])), &catalog(Vec::new()));

    assert_eq!(result.score, 0);
    assert!(result.indeterminate);
    assert!(!result.disqualified);
}

#[test]
fn engine_facade_composes_badges_and_scoring() {
    let engine = CompatibilityEngine::new(config());
    let records = candidate(&["C1 Inglese", "React Developer", "Node.js Backend"]);
    let catalog = catalog(vec![
        requirement("fs", "BADGE", true, 40, text("full-stack-senior")),
        requirement("en", "BADGE", false, 30, text("madrelingua-inglese")),
        requirement("xp", "EXPERIENCE", false, 30, TargetValue::Number(3.0)),
    ]);

    let outcome = engine.evaluate(&records, &BadgeCatalog::standard(), &catalog);

    assert_eq!(outcome.candidate_id, records.candidate_id);
    assert_eq!(outcome.compatibility.score, 100);
    assert_eq!(outcome.qualified_badges.len(), 2);
    assert_eq!(outcome.newly_qualified_badges.len(), 2);
    assert!(outcome.diagnostics.is_empty());
    assert_eq!(
        outcome.compatibility.summary(),
        "100% compatible (3/3 requirements met)"
    );

    let record = outcome.record(as_of());
    assert_eq!(record.score, 100);
    assert_eq!(record.requisition_id.0, REQUISITION);
    assert!(outcome
        .compatibility
        .per_requirement
        .iter()
        .all(|line| line.requirement_type != Some(RequirementType::Certification)));
}
