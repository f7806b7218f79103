use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use super::diagnostics::Diagnostic;
use super::domain::{
    availability_hours, BadgeId, EducationLevel, LanguageLevel, Proficiency, RequirementDefinition,
    RequirementId, RequirementType, RequisitionId, TargetValue,
};
use super::normalize::normalize_name;

/// Validation failures for a single requirement definition.
#[derive(Debug, Clone, PartialEq, thiserror::Error, Serialize, Deserialize)]
pub enum RequirementError {
    #[error("unknown requirement type '{0}'")]
    UnknownType(String),
    #[error("weight must be a non-negative integer, found {0}")]
    NegativeWeight(i64),
    #[error("weight {0} exceeds the supported maximum")]
    WeightOverflow(i64),
    #[error("missing weight")]
    MissingWeight,
    #[error("weight must be an integer, found {0}")]
    InvalidWeight(String),
    #[error("missing target value for {0} requirement")]
    MissingTarget(RequirementType),
    #[error("target value {found} is not valid for {kind} requirement (expected {expected})")]
    InvalidTarget {
        kind: RequirementType,
        found: String,
        expected: String,
    },
    #[error("duplicate requirement id; only the first definition is scored")]
    DuplicateId,
    #[error("malformed requirement definition: {0}")]
    Malformed(String),
}

/// Identifying fields recovered from a definition that could not be read.
#[derive(Debug, Clone, PartialEq)]
pub struct UnreadableDefinition {
    pub id: RequirementId,
    pub requirement_type: Option<String>,
    pub mandatory: bool,
    /// `None` when the field itself was unreadable; the entry is then kept.
    pub applies_to: Option<RequisitionId>,
    pub error: RequirementError,
}

/// One authored item as handed to the catalog, readable or not.
#[derive(Debug, Clone, PartialEq)]
pub enum RawRequirement {
    Definition(RequirementDefinition),
    Unreadable(UnreadableDefinition),
}

impl RawRequirement {
    /// Parse one JSON item on its own so a bad entry cannot sink the list.
    pub fn from_json_value(index: usize, value: Value) -> Self {
        let id = value
            .get("id")
            .and_then(Value::as_str)
            .map(RequirementId::from)
            .unwrap_or_else(|| RequirementId(format!("#{index}")));
        let requirement_type = value.get("type").and_then(Value::as_str).map(str::to_string);
        let mandatory = value.get("mandatory").and_then(Value::as_bool).unwrap_or(false);
        let applies_to = value
            .get("applies_to")
            .and_then(Value::as_str)
            .map(RequisitionId::from);
        let weight_error = match value.get("weight") {
            None | Some(Value::Null) => Some(RequirementError::MissingWeight),
            Some(weight) if !weight.is_i64() => {
                Some(RequirementError::InvalidWeight(weight.to_string()))
            }
            Some(_) => None,
        };

        match serde_json::from_value::<RequirementDefinition>(value) {
            Ok(definition) => RawRequirement::Definition(definition),
            Err(err) => RawRequirement::Unreadable(UnreadableDefinition {
                id,
                requirement_type,
                mandatory,
                applies_to,
                error: weight_error.unwrap_or_else(|| RequirementError::Malformed(err.to_string())),
            }),
        }
    }

    fn id(&self) -> &RequirementId {
        match self {
            RawRequirement::Definition(definition) => &definition.id,
            RawRequirement::Unreadable(unreadable) => &unreadable.id,
        }
    }

    fn applies_to(&self) -> Option<&RequisitionId> {
        match self {
            RawRequirement::Definition(definition) => Some(&definition.applies_to),
            RawRequirement::Unreadable(unreadable) => unreadable.applies_to.as_ref(),
        }
    }
}

impl From<RequirementDefinition> for RawRequirement {
    fn from(definition: RequirementDefinition) -> Self {
        RawRequirement::Definition(definition)
    }
}

impl From<UnreadableDefinition> for RawRequirement {
    fn from(unreadable: UnreadableDefinition) -> Self {
        RawRequirement::Unreadable(unreadable)
    }
}

/// Skill name plus an optional minimum proficiency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillTarget {
    pub name: String,
    pub min_level: Option<Proficiency>,
}

/// Parsed, type-specific target of a requirement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequirementTarget {
    TechnicalSkill(SkillTarget),
    SoftSkill(SkillTarget),
    Language {
        language: String,
        min_level: LanguageLevel,
    },
    Certification {
        name: String,
    },
    Badge(BadgeId),
    Experience {
        years: f64,
    },
    Education(EducationLevel),
    Availability {
        hours_per_week: f64,
    },
}

impl RequirementTarget {
    pub fn requirement_type(&self) -> RequirementType {
        match self {
            RequirementTarget::TechnicalSkill(_) => RequirementType::TechnicalSkill,
            RequirementTarget::SoftSkill(_) => RequirementType::SoftSkill,
            RequirementTarget::Language { .. } => RequirementType::Language,
            RequirementTarget::Certification { .. } => RequirementType::Certification,
            RequirementTarget::Badge(_) => RequirementType::Badge,
            RequirementTarget::Experience { .. } => RequirementType::Experience,
            RequirementTarget::Education(_) => RequirementType::Education,
            RequirementTarget::Availability { .. } => RequirementType::Availability,
        }
    }
}

/// A validated requirement ready for scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Requirement {
    pub id: RequirementId,
    pub mandatory: bool,
    pub weight: u32,
    pub target: RequirementTarget,
}

impl Requirement {
    pub fn requirement_type(&self) -> RequirementType {
        self.target.requirement_type()
    }
}

/// A definition the catalog could not validate. It still takes part in scoring
/// as an unsatisfied requirement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectedRequirement {
    pub id: RequirementId,
    pub requirement_type: Option<RequirementType>,
    pub mandatory: bool,
    pub weight: u32,
    pub error: RequirementError,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogEntry {
    Valid(Requirement),
    Rejected(RejectedRequirement),
}

impl CatalogEntry {
    pub fn id(&self) -> &RequirementId {
        match self {
            CatalogEntry::Valid(requirement) => &requirement.id,
            CatalogEntry::Rejected(rejected) => &rejected.id,
        }
    }

    pub fn weight(&self) -> u32 {
        match self {
            CatalogEntry::Valid(requirement) => requirement.weight,
            CatalogEntry::Rejected(rejected) => rejected.weight,
        }
    }

    pub fn mandatory(&self) -> bool {
        match self {
            CatalogEntry::Valid(requirement) => requirement.mandatory,
            CatalogEntry::Rejected(rejected) => rejected.mandatory,
        }
    }
}

/// Normalized, immutable requirement list for one requisition.
#[derive(Debug, Clone, PartialEq)]
pub struct RequirementCatalog {
    requisition_id: RequisitionId,
    entries: Vec<CatalogEntry>,
    by_type: BTreeMap<RequirementType, Vec<usize>>,
    by_id: HashMap<RequirementId, usize>,
    diagnostics: Vec<Diagnostic>,
}

impl RequirementCatalog {
    /// Validate raw definitions for `requisition_id`. Definitions addressed to
    /// another requisition and repeated ids are skipped; malformed ones are kept
    /// as rejected entries.
    pub fn build<I>(requisition_id: RequisitionId, definitions: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<RawRequirement>,
    {
        let mut entries = Vec::new();
        let mut by_type: BTreeMap<RequirementType, Vec<usize>> = BTreeMap::new();
        let mut by_id = HashMap::new();
        let mut seen = HashSet::new();
        let mut diagnostics = Vec::new();

        for raw in definitions {
            let raw: RawRequirement = raw.into();
            if let Some(applies_to) = raw.applies_to().filter(|target| **target != requisition_id) {
                diagnostics.push(Diagnostic::configuration(
                    format!("requirement {}", raw.id()),
                    format!("applies to requisition {applies_to}, not {requisition_id}; skipped"),
                ));
                continue;
            }

            if !seen.insert(raw.id().clone()) {
                diagnostics.push(Diagnostic::configuration(
                    format!("requirement {}", raw.id()),
                    RequirementError::DuplicateId,
                ));
                continue;
            }

            let index = entries.len();
            let validated = match raw {
                RawRequirement::Definition(definition) => {
                    validate(&definition).map_err(|error| reject(&definition, error))
                }
                RawRequirement::Unreadable(unreadable) => Err(reject_unreadable(unreadable)),
            };
            match validated {
                Ok(requirement) => {
                    by_type
                        .entry(requirement.requirement_type())
                        .or_default()
                        .push(index);
                    by_id.insert(requirement.id.clone(), index);
                    entries.push(CatalogEntry::Valid(requirement));
                }
                Err(rejected) => {
                    diagnostics.push(rejection_diagnostic(&rejected));
                    by_id.insert(rejected.id.clone(), index);
                    entries.push(CatalogEntry::Rejected(rejected));
                }
            }
        }

        for diagnostic in &diagnostics {
            warn!(requisition = %requisition_id, "{}", diagnostic.summary());
        }

        Self {
            requisition_id,
            entries,
            by_type,
            by_id,
            diagnostics,
        }
    }

    /// Build from a JSON array's items, reading each one independently.
    pub fn from_json_values<I>(requisition_id: RequisitionId, values: I) -> Self
    where
        I: IntoIterator<Item = Value>,
    {
        let raw = values
            .into_iter()
            .enumerate()
            .map(|(index, value)| RawRequirement::from_json_value(index, value));
        Self::build(requisition_id, raw)
    }

    pub fn requisition_id(&self) -> &RequisitionId {
        &self.requisition_id
    }

    /// Every entry, valid or rejected, in definition order.
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn requirements(&self) -> impl Iterator<Item = &Requirement> {
        self.entries.iter().filter_map(|entry| match entry {
            CatalogEntry::Valid(requirement) => Some(requirement),
            CatalogEntry::Rejected(_) => None,
        })
    }

    pub fn rejected(&self) -> impl Iterator<Item = &RejectedRequirement> {
        self.entries.iter().filter_map(|entry| match entry {
            CatalogEntry::Rejected(rejected) => Some(rejected),
            CatalogEntry::Valid(_) => None,
        })
    }

    pub fn of_type(&self, kind: RequirementType) -> impl Iterator<Item = &Requirement> {
        self.by_type
            .get(&kind)
            .map(|indices| indices.as_slice())
            .unwrap_or(&[])
            .iter()
            .filter_map(|&index| match &self.entries[index] {
                CatalogEntry::Valid(requirement) => Some(requirement),
                CatalogEntry::Rejected(_) => None,
            })
    }

    pub fn get(&self, id: &RequirementId) -> Option<&CatalogEntry> {
        self.by_id.get(id).map(|&index| &self.entries[index])
    }

    pub fn total_weight(&self) -> u64 {
        self.entries
            .iter()
            .map(|entry| u64::from(entry.weight()))
            .sum()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn rejection_diagnostic(rejected: &RejectedRequirement) -> Diagnostic {
    Diagnostic::configuration(format!("requirement {}", rejected.id), &rejected.error)
}

fn reject(definition: &RequirementDefinition, error: RequirementError) -> RejectedRequirement {
    RejectedRequirement {
        id: definition.id.clone(),
        requirement_type: RequirementType::parse(&definition.requirement_type),
        mandatory: definition.mandatory,
        // Negative or oversized weights count as zero so the aggregate stays defined.
        weight: u32::try_from(definition.weight).unwrap_or(0),
        error,
    }
}

fn reject_unreadable(unreadable: UnreadableDefinition) -> RejectedRequirement {
    RejectedRequirement {
        requirement_type: unreadable
            .requirement_type
            .as_deref()
            .and_then(RequirementType::parse),
        id: unreadable.id,
        mandatory: unreadable.mandatory,
        weight: 0,
        error: unreadable.error,
    }
}

fn validate(definition: &RequirementDefinition) -> Result<Requirement, RequirementError> {
    let kind = RequirementType::parse(&definition.requirement_type)
        .ok_or_else(|| RequirementError::UnknownType(definition.requirement_type.clone()))?;

    if definition.weight < 0 {
        return Err(RequirementError::NegativeWeight(definition.weight));
    }
    let weight = u32::try_from(definition.weight)
        .map_err(|_| RequirementError::WeightOverflow(definition.weight))?;

    let value = definition
        .target_value
        .as_ref()
        .ok_or(RequirementError::MissingTarget(kind))?;
    let target = parse_target(kind, value)?;

    Ok(Requirement {
        id: definition.id.clone(),
        mandatory: definition.mandatory,
        weight,
        target,
    })
}

fn invalid(kind: RequirementType, value: &TargetValue, expected: &str) -> RequirementError {
    RequirementError::InvalidTarget {
        kind,
        found: value.to_string(),
        expected: expected.to_string(),
    }
}

fn parse_target(
    kind: RequirementType,
    value: &TargetValue,
) -> Result<RequirementTarget, RequirementError> {
    match kind {
        RequirementType::TechnicalSkill => {
            parse_skill(kind, value).map(RequirementTarget::TechnicalSkill)
        }
        RequirementType::SoftSkill => parse_skill(kind, value).map(RequirementTarget::SoftSkill),
        RequirementType::Language => {
            let expected = "'<language>:<CEFR level>'";
            let text = value
                .as_text()
                .ok_or_else(|| invalid(kind, value, expected))?;
            let (language, level) = text
                .split_once(':')
                .ok_or_else(|| invalid(kind, value, expected))?;
            let language = normalize_name(language);
            let min_level =
                LanguageLevel::parse(level).ok_or_else(|| invalid(kind, value, expected))?;
            if language.is_empty() {
                return Err(invalid(kind, value, expected));
            }
            Ok(RequirementTarget::Language {
                language,
                min_level,
            })
        }
        RequirementType::Certification => {
            let name = value
                .as_text()
                .map(normalize_name)
                .ok_or_else(|| invalid(kind, value, "a certification name"))?;
            Ok(RequirementTarget::Certification { name })
        }
        RequirementType::Badge => value
            .as_text()
            .map(|id| RequirementTarget::Badge(BadgeId(id.to_string())))
            .ok_or_else(|| invalid(kind, value, "a badge id")),
        RequirementType::Experience => value
            .as_number()
            .filter(|years| *years >= 0.0)
            .map(|years| RequirementTarget::Experience { years })
            .ok_or_else(|| invalid(kind, value, "a non-negative number of years")),
        RequirementType::Education => value
            .as_text()
            .and_then(EducationLevel::parse)
            .map(RequirementTarget::Education)
            .ok_or_else(|| invalid(kind, value, "an education level code")),
        RequirementType::Availability => availability_hours(value)
            .filter(|hours| *hours > 0.0)
            .map(|hours_per_week| RequirementTarget::Availability { hours_per_week })
            .ok_or_else(|| invalid(kind, value, "hours per week or an availability level")),
    }
}

fn parse_skill(kind: RequirementType, value: &TargetValue) -> Result<SkillTarget, RequirementError> {
    let expected = "'<skill>' or '<skill>:<proficiency>'";
    let text = value
        .as_text()
        .ok_or_else(|| invalid(kind, value, expected))?;

    // Names may contain ':' themselves ("vue:3"), so only a known level suffix splits.
    let (name, min_level) = match text
        .rsplit_once(':')
        .and_then(|(name, level)| Proficiency::parse(level).map(|level| (name, level)))
    {
        Some((name, level)) => (name, Some(level)),
        None => (text, None),
    };

    let name = normalize_name(name);
    if name.is_empty() {
        return Err(invalid(kind, value, expected));
    }

    Ok(SkillTarget { name, min_level })
}
