use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;

use super::config::EvaluationConfig;
use super::diagnostics::Diagnostic;
use super::domain::{
    availability_hours, BadgeId, CandidateId, CandidateRecords, CertificationRecord,
    EducationLevel, LanguageLevel, Proficiency, ProfileAttributes, SkillCategory,
};
use super::normalize::normalize_name;

/// Certification with its canonical name and validity resolved once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificationFact {
    pub normalized_name: String,
    pub active: bool,
    pub record: CertificationRecord,
}

/// Flat, immutable snapshot of one candidate used by both sub-engines.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateFactBase {
    candidate_id: CandidateId,
    as_of: NaiveDate,
    certifications: Vec<CertificationFact>,
    badge_grants: BTreeSet<BadgeId>,
    qualified_badges: BTreeSet<BadgeId>,
    skills: BTreeMap<(SkillCategory, String), Proficiency>,
    languages: BTreeMap<String, LanguageLevel>,
    years_of_experience: Option<f64>,
    education: Option<EducationLevel>,
    availability_hours: Option<f64>,
    has_profile: bool,
    diagnostics: Vec<Diagnostic>,
}

impl CandidateFactBase {
    /// Build the snapshot. The source records are only read.
    pub fn build(records: &CandidateRecords, config: &EvaluationConfig) -> Self {
        let subject = format!("candidate {}", records.candidate_id);
        let mut diagnostics = Vec::new();

        let certifications = records
            .certifications
            .iter()
            .filter_map(|record| {
                let normalized_name = normalize_name(&record.name);
                if normalized_name.is_empty() {
                    diagnostics.push(Diagnostic::input_data(
                        subject.clone(),
                        "certification without a name ignored",
                    ));
                    return None;
                }

                let active = !config.enforce_certification_expiry
                    || record.is_active_on(config.as_of);
                Some(CertificationFact {
                    normalized_name,
                    active,
                    record: record.clone(),
                })
            })
            .collect();

        let badge_grants: BTreeSet<BadgeId> = records.badge_grants.iter().cloned().collect();

        let mut facts = Self {
            candidate_id: records.candidate_id.clone(),
            as_of: config.as_of,
            certifications,
            qualified_badges: badge_grants.clone(),
            badge_grants,
            skills: BTreeMap::new(),
            languages: BTreeMap::new(),
            years_of_experience: None,
            education: None,
            availability_hours: None,
            has_profile: records.profile.is_some(),
            diagnostics,
        };

        match &records.profile {
            Some(profile) => facts.absorb_profile(profile, &subject),
            None => facts.diagnostics.push(Diagnostic::input_data(
                subject,
                "no profile attributes supplied",
            )),
        }

        facts
    }

    fn absorb_profile(&mut self, profile: &ProfileAttributes, subject: &str) {
        for claim in &profile.skills {
            let name = normalize_name(&claim.name);
            if name.is_empty() {
                continue;
            }
            let level = match claim.level.as_deref() {
                None => Proficiency::Basic,
                Some(raw) => match Proficiency::parse(raw) {
                    Some(level) => level,
                    None => {
                        self.diagnostics.push(Diagnostic::input_data(
                            subject,
                            format!("skill '{}' has unknown proficiency '{raw}'", claim.name),
                        ));
                        continue;
                    }
                },
            };
            let slot = self.skills.entry((claim.category, name)).or_insert(level);
            *slot = (*slot).max(level);
        }

        for claim in &profile.languages {
            let language = normalize_name(&claim.language);
            match LanguageLevel::parse(&claim.level) {
                Some(level) if !language.is_empty() => {
                    let slot = self.languages.entry(language).or_insert(level);
                    *slot = (*slot).max(level);
                }
                _ => self.diagnostics.push(Diagnostic::input_data(
                    subject,
                    format!(
                        "language '{}' has unknown level '{}'",
                        claim.language, claim.level
                    ),
                )),
            }
        }

        self.years_of_experience = match profile.years_of_experience {
            Some(years) if years.is_finite() && years >= 0.0 => Some(years),
            Some(years) => {
                self.diagnostics.push(Diagnostic::input_data(
                    subject,
                    format!("years of experience {years} is not a non-negative number"),
                ));
                None
            }
            None => None,
        };

        self.education = profile.education.as_deref().and_then(|raw| {
            let parsed = EducationLevel::parse(raw);
            if parsed.is_none() {
                self.diagnostics.push(Diagnostic::input_data(
                    subject,
                    format!("unknown education level '{raw}'"),
                ));
            }
            parsed
        });

        self.availability_hours = profile.availability.as_ref().and_then(|raw| {
            let parsed = availability_hours(raw);
            if parsed.is_none() {
                self.diagnostics.push(Diagnostic::input_data(
                    subject,
                    format!("unknown availability {raw}"),
                ));
            }
            parsed
        });
    }

    /// Copy of this snapshot whose qualified set also holds `badges`.
    pub fn with_qualified_badges<I>(&self, badges: I) -> Self
    where
        I: IntoIterator<Item = BadgeId>,
    {
        let mut next = self.clone();
        next.qualified_badges.extend(badges);
        next
    }

    pub fn candidate_id(&self) -> &CandidateId {
        &self.candidate_id
    }

    pub fn as_of(&self) -> NaiveDate {
        self.as_of
    }

    pub fn certifications(&self) -> &[CertificationFact] {
        &self.certifications
    }

    pub fn active_certifications(&self) -> impl Iterator<Item = &CertificationFact> {
        self.certifications.iter().filter(|fact| fact.active)
    }

    pub fn has_active_certification(&self, normalized_name: &str) -> bool {
        self.active_certifications()
            .any(|fact| fact.normalized_name == normalized_name)
    }

    pub fn badge_grants(&self) -> &BTreeSet<BadgeId> {
        &self.badge_grants
    }

    pub fn qualified_badges(&self) -> &BTreeSet<BadgeId> {
        &self.qualified_badges
    }

    pub fn skill_level(&self, category: SkillCategory, normalized_name: &str) -> Option<Proficiency> {
        self.skills
            .get(&(category, normalized_name.to_string()))
            .copied()
    }

    pub fn language_level(&self, normalized_language: &str) -> Option<LanguageLevel> {
        self.languages.get(normalized_language).copied()
    }

    pub fn years_of_experience(&self) -> Option<f64> {
        self.years_of_experience
    }

    pub fn education(&self) -> Option<EducationLevel> {
        self.education
    }

    pub fn availability_hours(&self) -> Option<f64> {
        self.availability_hours
    }

    pub fn has_profile(&self) -> bool {
        self.has_profile
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}
