use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identifier wrapper for evaluated candidates.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateId(pub String);

/// Identifier wrapper for badge definitions and grants.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BadgeId(pub String);

/// Identifier wrapper for requisition requirements.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequirementId(pub String);

/// Identifier wrapper for job requisitions.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequisitionId(pub String);

macro_rules! display_id {
    ($($name:ident),+) => {
        $(
            impl fmt::Display for $name {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(&self.0)
                }
            }

            impl From<&str> for $name {
                fn from(value: &str) -> Self {
                    Self(value.to_string())
                }
            }
        )+
    };
}

display_id!(CandidateId, BadgeId, RequirementId, RequisitionId);

/// Certification held by a candidate, as stored by the profile service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificationRecord {
    pub name: String,
    #[serde(default)]
    pub issuer: String,
    pub issued_on: NaiveDate,
    #[serde(default)]
    pub expires_on: Option<NaiveDate>,
}

impl CertificationRecord {
    /// A certification stays valid through its expiry date.
    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        self.expires_on.map(|expiry| expiry >= date).unwrap_or(true)
    }
}

/// Raw bundle handed over by the calling layer for one candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateRecords {
    pub candidate_id: CandidateId,
    #[serde(default)]
    pub certifications: Vec<CertificationRecord>,
    #[serde(default)]
    pub badge_grants: Vec<BadgeId>,
    #[serde(default)]
    pub profile: Option<ProfileAttributes>,
}

/// Self-declared profile attributes. Levels stay textual until the fact base parses them.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProfileAttributes {
    #[serde(default)]
    pub skills: Vec<SkillClaim>,
    #[serde(default)]
    pub languages: Vec<LanguageClaim>,
    #[serde(default)]
    pub years_of_experience: Option<f64>,
    #[serde(default)]
    pub education: Option<String>,
    #[serde(default)]
    pub availability: Option<TargetValue>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillClaim {
    pub name: String,
    #[serde(default)]
    pub category: SkillCategory,
    #[serde(default)]
    pub level: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageClaim {
    pub language: String,
    pub level: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillCategory {
    #[default]
    Technical,
    Soft,
}

/// Requirement definition exactly as authored on the requisition.
///
/// `requirement_type` and `weight` are kept loose so the catalog can report
/// unknown kinds and negative weights per item instead of rejecting the whole list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequirementDefinition {
    pub id: RequirementId,
    #[serde(rename = "type")]
    pub requirement_type: String,
    #[serde(default)]
    pub mandatory: bool,
    pub weight: i64,
    #[serde(default)]
    pub target_value: Option<TargetValue>,
    pub applies_to: RequisitionId,
}

/// Target values arrive as either numbers or strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TargetValue {
    Number(f64),
    Text(String),
}

impl TargetValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            TargetValue::Text(text) => {
                let trimmed = text.trim();
                (!trimmed.is_empty()).then_some(trimmed)
            }
            TargetValue::Number(_) => None,
        }
    }

    /// Numbers, or strings that parse as numbers.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            TargetValue::Number(value) => value.is_finite().then_some(*value),
            TargetValue::Text(text) => text
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite()),
        }
    }
}

impl fmt::Display for TargetValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetValue::Number(value) => write!(f, "{value}"),
            TargetValue::Text(text) => write!(f, "'{text}'"),
        }
    }
}

/// The eight requirement kinds a requisition may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequirementType {
    TechnicalSkill,
    SoftSkill,
    Language,
    Certification,
    Badge,
    Experience,
    Education,
    Availability,
}

impl RequirementType {
    pub const ALL: [RequirementType; 8] = [
        RequirementType::TechnicalSkill,
        RequirementType::SoftSkill,
        RequirementType::Language,
        RequirementType::Certification,
        RequirementType::Badge,
        RequirementType::Experience,
        RequirementType::Education,
        RequirementType::Availability,
    ];

    pub fn parse(value: &str) -> Option<Self> {
        let key = value.trim().to_ascii_uppercase().replace(['-', ' '], "_");
        Self::ALL.into_iter().find(|kind| kind.label() == key)
    }

    pub const fn label(self) -> &'static str {
        match self {
            RequirementType::TechnicalSkill => "TECHNICAL_SKILL",
            RequirementType::SoftSkill => "SOFT_SKILL",
            RequirementType::Language => "LANGUAGE",
            RequirementType::Certification => "CERTIFICATION",
            RequirementType::Badge => "BADGE",
            RequirementType::Experience => "EXPERIENCE",
            RequirementType::Education => "EDUCATION",
            RequirementType::Availability => "AVAILABILITY",
        }
    }

    pub const fn supports_partial_credit(self) -> bool {
        matches!(
            self,
            RequirementType::Experience | RequirementType::Availability
        )
    }
}

impl fmt::Display for RequirementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Proficiency {
    Basic,
    Intermediate,
    Advanced,
    Expert,
}

impl Proficiency {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "basic" | "beginner" | "base" => Some(Self::Basic),
            "intermediate" | "intermedio" => Some(Self::Intermediate),
            "advanced" | "avanzato" => Some(Self::Advanced),
            "expert" | "esperto" => Some(Self::Expert),
            _ => None,
        }
    }
}

/// CEFR scale, with native speakers ranked above C2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LanguageLevel {
    A1,
    A2,
    B1,
    B2,
    C1,
    C2,
    Native,
}

impl LanguageLevel {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "a1" => Some(Self::A1),
            "a2" => Some(Self::A2),
            "b1" => Some(Self::B1),
            "b2" => Some(Self::B2),
            "c1" => Some(Self::C1),
            "c2" => Some(Self::C2),
            "native" | "madrelingua" => Some(Self::Native),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EducationLevel {
    None,
    HighSchool,
    Associate,
    Bachelor,
    Master,
    Doctorate,
}

impl EducationLevel {
    pub fn parse(value: &str) -> Option<Self> {
        let key = value.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match key.as_str() {
            "none" | "nessuno" => Some(Self::None),
            "high_school" | "diploma" => Some(Self::HighSchool),
            "associate" | "its" => Some(Self::Associate),
            "bachelor" | "laurea_triennale" => Some(Self::Bachelor),
            "master" | "laurea_magistrale" => Some(Self::Master),
            "doctorate" | "phd" | "dottorato" => Some(Self::Doctorate),
            _ => None,
        }
    }
}

/// Named availability levels, expressed in hours per week.
pub fn availability_hours(value: &TargetValue) -> Option<f64> {
    if let Some(hours) = value.as_number() {
        return (hours >= 0.0).then_some(hours);
    }

    let key = value.as_text()?.to_ascii_lowercase().replace(['-', ' '], "_");
    match key.as_str() {
        "none" => Some(0.0),
        "occasional" | "occasionale" => Some(8.0),
        "part_time" => Some(20.0),
        "full_time" => Some(40.0),
        _ => None,
    }
}
