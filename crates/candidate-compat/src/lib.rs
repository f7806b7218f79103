//! Badge qualification and weighted compatibility scoring for candidate profiles.

pub mod config;
pub mod engine;
pub mod error;
pub mod import;
pub mod telemetry;

pub use engine::{
    evaluate_badges, score_compatibility, BadgeCatalog, CandidateFactBase, CandidateRecords,
    CompatibilityEngine, CompatibilityResult, EngineOutcome, EvaluationConfig, RequirementCatalog,
};
