use crate::infra::evaluation_config;
use candidate_compat::config::AppConfig;
use candidate_compat::engine::{
    BadgeEvaluation, CertificationRecord, Diagnostic, LanguageClaim, ProfileAttributes,
    RequirementDefinition, RequisitionId, SkillCategory, SkillClaim, TargetValue,
};
use candidate_compat::error::AppError;
use candidate_compat::import::{load_badge_catalog, load_candidate, load_requirements};
use candidate_compat::{
    BadgeCatalog, CandidateRecords, CompatibilityEngine, EngineOutcome, EvaluationConfig,
    RequirementCatalog,
};
use chrono::NaiveDate;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

const DEMO_REQUISITION: &str = "REQ-DEMO-FS";

#[derive(Args, Debug)]
pub(crate) struct BadgesArgs {
    /// Candidate records as JSON
    #[arg(long)]
    pub(crate) candidate: PathBuf,
    /// Badge catalog as a JSON array (defaults to the built-in catalog)
    #[arg(long)]
    pub(crate) badges: Option<PathBuf>,
    /// Evaluation date (YYYY-MM-DD). Defaults to COMPAT_AS_OF, then today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) as_of: Option<NaiveDate>,
    /// Print the evaluation as JSON instead of a report
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Candidate records as JSON
    #[arg(long)]
    pub(crate) candidate: PathBuf,
    /// Requirement definitions as a JSON array or CSV file
    #[arg(long)]
    pub(crate) requirements: PathBuf,
    /// Requisition the requirements are evaluated for
    #[arg(long)]
    pub(crate) requisition: String,
    /// Badge catalog as a JSON array (defaults to the built-in catalog)
    #[arg(long)]
    pub(crate) badges: Option<PathBuf>,
    /// Evaluation date (YYYY-MM-DD). Defaults to COMPAT_AS_OF, then today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) as_of: Option<NaiveDate>,
    /// Print the full outcome as JSON instead of a report
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Evaluation date (YYYY-MM-DD). Defaults to COMPAT_AS_OF, then today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) as_of: Option<NaiveDate>,
    /// Print the full outcome as JSON instead of a report
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_badges(config: &AppConfig, args: BadgesArgs) -> Result<(), AppError> {
    let BadgesArgs {
        candidate,
        badges,
        as_of,
        json,
    } = args;

    let evaluation_config = evaluation_config(config, as_of);
    let candidate = load_candidate(candidate)?;
    let catalog = load_badges(badges)?;

    let engine = CompatibilityEngine::new(evaluation_config);
    let evaluation = catalog.evaluate(&engine.fact_base(&candidate));

    if json {
        return print_json(&evaluation);
    }

    println!(
        "Badge qualification for {} as of {}",
        candidate.candidate_id, evaluation_config.as_of
    );
    render_badges(&catalog, &evaluation);
    render_diagnostics(&evaluation.diagnostics);
    Ok(())
}

pub(crate) fn run_score(config: &AppConfig, args: ScoreArgs) -> Result<(), AppError> {
    let ScoreArgs {
        candidate,
        requirements,
        requisition,
        badges,
        as_of,
        json,
    } = args;

    let evaluation_config = evaluation_config(config, as_of);
    let candidate = load_candidate(candidate)?;
    let definitions = load_requirements(requirements)?;
    let requirements = RequirementCatalog::build(RequisitionId(requisition), definitions);
    let badges = load_badges(badges)?;

    let engine = CompatibilityEngine::new(evaluation_config);
    let outcome = engine.evaluate(&candidate, &badges, &requirements);
    info!(
        candidate = %outcome.candidate_id,
        requisition = %requirements.requisition_id(),
        score = outcome.compatibility.score,
        "compatibility evaluated"
    );

    if json {
        return print_json(&outcome);
    }

    render_outcome(&badges, &outcome, evaluation_config.as_of);
    Ok(())
}

pub(crate) fn run_demo(config: &AppConfig, args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { as_of, json } = args;
    let evaluation_config = evaluation_config(config, as_of);

    let badges = BadgeCatalog::standard();
    let outcome = demo_outcome(evaluation_config, &badges);

    if json {
        return print_json(&outcome);
    }

    println!("Candidate compatibility demo");
    println!(
        "- built-in badge catalog: {} badges | requisition {DEMO_REQUISITION}",
        badges.len()
    );
    render_outcome(&badges, &outcome, evaluation_config.as_of);
    Ok(())
}

fn load_badges(path: Option<PathBuf>) -> Result<BadgeCatalog, AppError> {
    match path {
        Some(path) => Ok(load_badge_catalog(path)?),
        None => Ok(BadgeCatalog::standard()),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub(crate) fn demo_outcome(config: EvaluationConfig, badges: &BadgeCatalog) -> EngineOutcome {
    let requirements = RequirementCatalog::build(
        RequisitionId::from(DEMO_REQUISITION),
        demo_requirements(),
    );
    CompatibilityEngine::new(config).evaluate(&demo_candidate(), badges, &requirements)
}

fn demo_candidate() -> CandidateRecords {
    let certification = |name: &str, issued: (i32, u32, u32), expires: Option<(i32, u32, u32)>| {
        CertificationRecord {
            name: name.to_string(),
            issuer: "Academy".to_string(),
            issued_on: NaiveDate::from_ymd_opt(issued.0, issued.1, issued.2).unwrap_or_default(),
            expires_on: expires.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
        }
    };

    CandidateRecords {
        candidate_id: "demo-candidate".into(),
        certifications: vec![
            certification("C1 Inglese", (2023, 5, 10), None),
            certification("React Developer", (2022, 11, 3), None),
            certification("Node.js Backend", (2023, 2, 20), None),
            certification("Scrum Master", (2021, 6, 30), Some((2024, 6, 30))),
        ],
        badge_grants: Vec::new(),
        profile: Some(ProfileAttributes {
            skills: vec![
                SkillClaim {
                    name: "TypeScript".to_string(),
                    category: SkillCategory::Technical,
                    level: Some("advanced".to_string()),
                },
                SkillClaim {
                    name: "Comunicazione".to_string(),
                    category: SkillCategory::Soft,
                    level: Some("intermedio".to_string()),
                },
            ],
            languages: vec![
                LanguageClaim {
                    language: "Inglese".to_string(),
                    level: "C1".to_string(),
                },
                LanguageClaim {
                    language: "Italiano".to_string(),
                    level: "madrelingua".to_string(),
                },
            ],
            years_of_experience: Some(5.0),
            education: Some("laurea_triennale".to_string()),
            availability: Some(TargetValue::Text("part_time".to_string())),
        }),
    }
}

fn demo_requirements() -> Vec<RequirementDefinition> {
    let requirement = |id: &str, kind: &str, mandatory: bool, weight: i64, target: TargetValue| {
        RequirementDefinition {
            id: id.into(),
            requirement_type: kind.to_string(),
            mandatory,
            weight,
            target_value: Some(target),
            applies_to: DEMO_REQUISITION.into(),
        }
    };
    let text = |value: &str| TargetValue::Text(value.to_string());

    vec![
        requirement("full-stack", "BADGE", true, 30, text("full-stack-senior")),
        requirement("typescript", "TECHNICAL_SKILL", false, 20, text("typescript:advanced")),
        requirement("english", "LANGUAGE", false, 10, text("inglese:B2")),
        requirement("scrum", "CERTIFICATION", false, 10, text("Scrum Master")),
        requirement("experience", "EXPERIENCE", false, 15, TargetValue::Number(6.0)),
        requirement("availability", "AVAILABILITY", false, 15, text("full_time")),
    ]
}

fn render_badges(catalog: &BadgeCatalog, evaluation: &BadgeEvaluation) {
    if evaluation.qualified.is_empty() {
        println!("- no badges qualified");
        return;
    }

    println!("Qualified badges:");
    for badge in &evaluation.qualified {
        let name = catalog.badge_name(badge).unwrap_or(badge.0.as_str());
        let marker = if evaluation.newly_qualified.contains(badge) {
            " (new)"
        } else {
            ""
        };
        println!("  - {badge}: {name}{marker}");
    }
}

fn render_outcome(badges: &BadgeCatalog, outcome: &EngineOutcome, as_of: NaiveDate) {
    let compatibility = &outcome.compatibility;
    println!(
        "\nCandidate {} vs requisition {} (as of {as_of})",
        outcome.candidate_id, compatibility.requisition_id
    );

    render_badges(
        badges,
        &BadgeEvaluation {
            qualified: outcome.qualified_badges.clone(),
            newly_qualified: outcome.newly_qualified_badges.clone(),
            diagnostics: Vec::new(),
        },
    );

    println!("Requirement breakdown:");
    for line in &compatibility.per_requirement {
        let kind = line
            .requirement_type
            .map(|kind| kind.label())
            .unwrap_or("UNKNOWN");
        println!(
            "  - [{}] {} {} w{}{}: {:.1} pts | {}",
            if line.satisfied { "x" } else { " " },
            line.requirement_id,
            kind,
            line.weight,
            if line.mandatory { " mandatory" } else { "" },
            line.contribution,
            line.notes
        );
    }

    println!("Result: {}", compatibility.summary());
    render_diagnostics(&outcome.diagnostics);
}

fn render_diagnostics(diagnostics: &[Diagnostic]) {
    if diagnostics.is_empty() {
        return;
    }

    println!("Diagnostics:");
    for diagnostic in diagnostics {
        println!("  - {}", diagnostic.summary());
    }
}
