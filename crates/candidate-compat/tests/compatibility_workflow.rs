//! End-to-end scenarios through the public loaders and engine facade, the way a
//! calling service would drive the crate.

use std::io::Cursor;

use candidate_compat::engine::{BadgeId, CandidateId, DiagnosticKind, RequisitionId};
use candidate_compat::import::{
    badge_catalog_from_reader, candidate_from_reader, requirements_from_csv_reader,
    requirements_from_json_reader,
};
use candidate_compat::{
    BadgeCatalog, CandidateRecords, CompatibilityEngine, EvaluationConfig, RequirementCatalog,
};
use chrono::NaiveDate;

fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid date")
}

fn candidate_json(id: &str, certifications: &[&str]) -> String {
    let certifications: Vec<String> = certifications
        .iter()
        .map(|name| {
            format!(r#"{{"name": "{name}", "issuer": "Academy", "issued_on": "2024-01-15"}}"#)
        })
        .collect();

    format!(
        r#"{{
            "candidate_id": "{id}",
            "certifications": [{}],
            "profile": {{
                "skills": [{{"name": "TypeScript", "level": "advanced"}}],
                "languages": [{{"language": "Italiano", "level": "native"}}],
                "years_of_experience": 4,
                "education": "laurea_magistrale",
                "availability": "full_time"
            }}
        }}"#,
        certifications.join(", ")
    )
}

fn candidate(id: &str, certifications: &[&str]) -> CandidateRecords {
    candidate_from_reader(Cursor::new(candidate_json(id, certifications))).expect("candidate parses")
}

fn requisition() -> RequirementCatalog {
    let csv = "id,type,mandatory,weight,target_value,applies_to\n\
               fullstack,BADGE,true,40,full-stack-senior,job-42\n\
               english,BADGE,false,20,madrelingua-inglese,job-42\n\
               ts,TECHNICAL_SKILL,false,20,typescript:intermediate,job-42\n\
               xp,EXPERIENCE,false,20,8,job-42\n";
    let definitions = requirements_from_csv_reader(Cursor::new(csv)).expect("csv parses");
    RequirementCatalog::build(RequisitionId::from("job-42"), definitions)
}

#[test]
fn qualified_candidate_scores_through_badges() {
    let engine = CompatibilityEngine::new(EvaluationConfig::new(as_of()));
    let candidate = candidate("cand-7", &["React Developer", "Node.js Backend", "C1 Inglese"]);

    let outcome = engine.evaluate(&candidate, &BadgeCatalog::standard(), &requisition());

    assert!(!outcome.compatibility.disqualified);
    // 40 + 20 + 20 + 20 * (4 / 8)
    assert_eq!(outcome.compatibility.score, 90);
    assert!(outcome
        .qualified_badges
        .contains(&BadgeId::from("full-stack-senior")));
    assert!(outcome.diagnostics.is_empty());

    let record = outcome.record(as_of());
    assert_eq!(record.candidate_id, CandidateId::from("cand-7"));
    assert_eq!(record.score, 90);
    assert_eq!(record.evaluated_on, as_of());
}

#[test]
fn missing_mandatory_badge_disqualifies_but_keeps_breakdown() {
    let engine = CompatibilityEngine::new(EvaluationConfig::new(as_of()));
    let candidate = candidate("cand-8", &["React Developer", "C2 Inglese"]);

    let outcome = engine.evaluate(&candidate, &BadgeCatalog::standard(), &requisition());

    assert!(outcome.compatibility.disqualified);
    assert_eq!(outcome.compatibility.score, 0);
    assert_eq!(outcome.compatibility.per_requirement.len(), 4);
    assert!(outcome.compatibility.per_requirement[1].satisfied);
    assert!(outcome
        .compatibility
        .summary()
        .contains("fullstack"));
}

#[test]
fn batch_preserves_order_and_matches_single_evaluations() {
    let engine = CompatibilityEngine::new(EvaluationConfig::new(as_of()));
    let badges = BadgeCatalog::standard();
    let catalog = requisition();
    let candidates: Vec<CandidateRecords> = (0..24)
        .map(|index| {
            let certifications: &[&str] = if index % 3 == 0 {
                &["React Developer", "Node.js Backend"]
            } else {
                &["C1 Inglese"]
            };
            candidate(&format!("cand-{index:03}"), certifications)
        })
        .collect();

    let batch = engine.evaluate_batch(&candidates, &badges, &catalog);

    assert_eq!(batch.len(), candidates.len());
    for (candidate, outcome) in candidates.iter().zip(&batch) {
        assert_eq!(outcome.candidate_id, candidate.candidate_id);
        assert_eq!(outcome, &engine.evaluate(candidate, &badges, &catalog));
    }
}

#[test]
fn json_catalogs_report_broken_items_without_aborting() {
    let badges = badge_catalog_from_reader(Cursor::new(
        r#"[
            {"id": "cloud", "name": "Cloud", "qualification_rule": {"has_certification_matching": {"regex": "^aws\\b"}}},
            {"id": "typo", "name": "Typo", "qualification_rule": {"has_any_off": ["pmp"]}}
        ]"#,
    ))
    .expect("badge array parses");
    let definitions = requirements_from_json_reader(Cursor::new(
        r#"[
            {"id": "cloud", "type": "BADGE", "mandatory": false, "weight": 50, "target_value": "cloud", "applies_to": "job-9"},
            {"id": "remote", "type": "REMOTE_WORK", "weight": 50, "target_value": "yes", "applies_to": "job-9"}
        ]"#,
    ))
    .expect("requirements parse");
    let catalog = RequirementCatalog::build(RequisitionId::from("job-9"), definitions);

    let engine = CompatibilityEngine::new(EvaluationConfig::new(as_of()));
    let outcome = engine.evaluate(&candidate("cand-9", &["AWS Developer Associate"]), &badges, &catalog);

    assert_eq!(outcome.compatibility.score, 50);
    let subjects: Vec<&str> = outcome
        .diagnostics
        .iter()
        .filter(|diagnostic| diagnostic.kind == DiagnosticKind::Configuration)
        .map(|diagnostic| diagnostic.subject.as_str())
        .collect();
    assert_eq!(subjects, vec!["badge typo", "requirement remote"]);
}

#[test]
fn unreadable_requirement_items_do_not_sink_the_requisition() {
    let definitions = requirements_from_json_reader(Cursor::new(
        r#"[
            {"id": "fullstack", "type": "BADGE", "weight": 60, "target_value": "full-stack-senior", "applies_to": "job-3"},
            {"id": "xp", "type": "EXPERIENCE", "weight": 7.5, "target_value": 2, "applies_to": "job-3"},
            {"id": "edu", "type": "EDUCATION", "target_value": "master", "applies_to": "job-3"}
        ]"#,
    ))
    .expect("requirement array parses");
    let catalog = RequirementCatalog::build(RequisitionId::from("job-3"), definitions);

    let engine = CompatibilityEngine::new(EvaluationConfig::new(as_of()));
    let outcome = engine.evaluate(
        &candidate("cand-3", &["React Developer", "Node.js Backend"]),
        &BadgeCatalog::standard(),
        &catalog,
    );

    assert_eq!(outcome.compatibility.per_requirement.len(), 3);
    assert_eq!(outcome.compatibility.score, 100);
    let subjects: Vec<&str> = outcome
        .diagnostics
        .iter()
        .map(|diagnostic| diagnostic.subject.as_str())
        .collect();
    assert_eq!(subjects, vec!["requirement xp", "requirement edu"]);
}
