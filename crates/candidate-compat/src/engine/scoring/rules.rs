use super::super::catalog::{Requirement, RequirementTarget, SkillTarget};
use super::super::domain::SkillCategory;
use super::super::facts::CandidateFactBase;

/// Credit earned by one requirement, with an audit note.
pub(crate) struct Credit {
    pub ratio: f64,
    pub notes: String,
    /// Set when the candidate data needed to judge the requirement is absent.
    pub missing_input: Option<String>,
}

impl Credit {
    fn full(notes: String) -> Self {
        Self {
            ratio: 1.0,
            notes,
            missing_input: None,
        }
    }

    fn none(notes: String) -> Self {
        Self {
            ratio: 0.0,
            notes,
            missing_input: None,
        }
    }

    fn missing(what: &str) -> Self {
        Self {
            ratio: 0.0,
            notes: format!("candidate declares no {what}"),
            missing_input: Some(format!("no {what} declared")),
        }
    }

    fn binary(met: bool, notes: String) -> Self {
        if met {
            Self::full(notes)
        } else {
            Self::none(notes)
        }
    }

    fn partial(ratio: f64, notes: String) -> Self {
        Self {
            ratio: ratio.clamp(0.0, 1.0),
            notes,
            missing_input: None,
        }
    }
}

pub(crate) fn credit_for(requirement: &Requirement, facts: &CandidateFactBase) -> Credit {
    match &requirement.target {
        RequirementTarget::TechnicalSkill(target) => {
            skill_credit(facts, SkillCategory::Technical, target)
        }
        RequirementTarget::SoftSkill(target) => skill_credit(facts, SkillCategory::Soft, target),
        RequirementTarget::Language {
            language,
            min_level,
        } => {
            if !facts.has_profile() {
                return Credit::missing("languages");
            }
            match facts.language_level(language) {
                Some(level) => Credit::binary(
                    level >= *min_level,
                    format!("{language} at {level:?}, required {min_level:?}"),
                ),
                None => Credit::none(format!("{language} not declared")),
            }
        }
        RequirementTarget::Certification { name } => {
            if facts.has_active_certification(name) {
                Credit::full(format!("holds active certification '{name}'"))
            } else if facts
                .certifications()
                .iter()
                .any(|fact| &fact.normalized_name == name)
            {
                Credit::none(format!("certification '{name}' has expired"))
            } else {
                Credit::none(format!("no certification '{name}'"))
            }
        }
        RequirementTarget::Badge(badge) => Credit::binary(
            facts.qualified_badges().contains(badge),
            format!("badge {badge}"),
        ),
        RequirementTarget::Experience { years } => match facts.years_of_experience() {
            Some(declared) => {
                let ratio = if *years <= 0.0 { 1.0 } else { declared / years };
                Credit::partial(
                    ratio,
                    format!("{declared} of {years} required years of experience"),
                )
            }
            None => Credit::missing("years of experience"),
        },
        RequirementTarget::Education(required) => match facts.education() {
            Some(level) => Credit::binary(
                level >= *required,
                format!("education {level:?}, required {required:?}"),
            ),
            None => Credit::missing("education level"),
        },
        RequirementTarget::Availability { hours_per_week } => match facts.availability_hours() {
            Some(hours) => Credit::partial(
                hours / hours_per_week,
                format!("available {hours}h/week of {hours_per_week}h required"),
            ),
            None => Credit::missing("availability"),
        },
    }
}

fn skill_credit(facts: &CandidateFactBase, category: SkillCategory, target: &SkillTarget) -> Credit {
    if !facts.has_profile() {
        return Credit::missing("skills");
    }

    match (facts.skill_level(category, &target.name), target.min_level) {
        (Some(level), Some(required)) => Credit::binary(
            level >= required,
            format!("{} at {level:?}, required {required:?}", target.name),
        ),
        (Some(level), None) => Credit::full(format!("{} at {level:?}", target.name)),
        (None, _) => Credit::none(format!("{} not declared", target.name)),
    }
}
