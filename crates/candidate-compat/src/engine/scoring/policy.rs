use super::super::domain::RequirementId;
use super::RequirementOutcome;

pub(crate) struct Aggregate {
    pub score: u8,
    pub disqualified: bool,
    pub disqualifying_requirement_ids: Vec<RequirementId>,
    pub indeterminate: bool,
    pub total_weight: u64,
}

/// Mandatory requirements gate; everything else is a weighted average.
pub(crate) fn aggregate(outcomes: &[RequirementOutcome]) -> Aggregate {
    let disqualifying_requirement_ids: Vec<RequirementId> = outcomes
        .iter()
        .filter(|outcome| outcome.mandatory && !outcome.satisfied)
        .map(|outcome| outcome.requirement_id.clone())
        .collect();

    let total_weight: u64 = outcomes.iter().map(|outcome| u64::from(outcome.weight)).sum();
    let contributed: f64 = outcomes.iter().map(|outcome| outcome.contribution).sum();
    let indeterminate = total_weight == 0;
    let disqualified = !disqualifying_requirement_ids.is_empty();

    let score = if disqualified || indeterminate {
        0
    } else {
        let percentage = (100.0 * contributed / total_weight as f64).round();
        percentage.clamp(0.0, 100.0) as u8
    };

    Aggregate {
        score,
        disqualified,
        disqualifying_requirement_ids,
        indeterminate,
        total_weight,
    }
}
