//! Loaders that turn JSON and CSV fixtures into engine inputs. This is the
//! only module that touches I/O; it is meant for the calling layer.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::engine::badges::BadgeCatalog;
use crate::engine::catalog::{RawRequirement, RequirementError, UnreadableDefinition};
use crate::engine::domain::{
    CandidateRecords, RequirementDefinition, RequirementId, RequisitionId, TargetValue,
};

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid JSON data: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("expected {expected}, found {found}")]
    Shape {
        expected: &'static str,
        found: &'static str,
    },
}

pub fn load_candidate<P: AsRef<Path>>(path: P) -> Result<CandidateRecords, ImportError> {
    let file = File::open(path)?;
    candidate_from_reader(file)
}

pub fn candidate_from_reader<R: Read>(reader: R) -> Result<CandidateRecords, ImportError> {
    Ok(serde_json::from_reader(reader)?)
}

pub fn load_badge_catalog<P: AsRef<Path>>(path: P) -> Result<BadgeCatalog, ImportError> {
    let file = File::open(path)?;
    badge_catalog_from_reader(file)
}

/// Expects a JSON array. Entries that fail to parse become catalog diagnostics.
pub fn badge_catalog_from_reader<R: Read>(reader: R) -> Result<BadgeCatalog, ImportError> {
    match serde_json::from_reader::<_, Value>(reader)? {
        Value::Array(values) => Ok(BadgeCatalog::from_json_values(values)),
        other => Err(ImportError::Shape {
            expected: "an array of badge definitions",
            found: json_kind(&other),
        }),
    }
}

/// Load requirement items, choosing CSV or JSON from the file extension. Items
/// that cannot be read come back as [`RawRequirement::Unreadable`] so the
/// catalog reports them individually.
pub fn load_requirements<P: AsRef<Path>>(path: P) -> Result<Vec<RawRequirement>, ImportError> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        .unwrap_or(false);

    if is_csv {
        requirements_from_csv_reader(file)
    } else {
        requirements_from_json_reader(file)
    }
}

/// Expects a JSON array; each item is parsed on its own.
pub fn requirements_from_json_reader<R: Read>(
    reader: R,
) -> Result<Vec<RawRequirement>, ImportError> {
    match serde_json::from_reader::<_, Value>(reader)? {
        Value::Array(values) => Ok(values
            .into_iter()
            .enumerate()
            .map(|(index, value)| RawRequirement::from_json_value(index, value))
            .collect()),
        other => Err(ImportError::Shape {
            expected: "an array of requirement definitions",
            found: json_kind(&other),
        }),
    }
}

/// Columns: `id,type,mandatory,weight,target_value,applies_to`. Structural CSV
/// errors abort the load; a row whose fields do not fit is kept as unreadable.
pub fn requirements_from_csv_reader<R: Read>(
    reader: R,
) -> Result<Vec<RawRequirement>, ImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let column = |record: &csv::StringRecord, name: &str| {
        headers
            .iter()
            .position(|header| header == name)
            .and_then(|index| record.get(index))
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    };
    let mut requirements = Vec::new();

    for (index, record) in csv_reader.records().enumerate() {
        let record = record?;
        let row = match record.deserialize::<RequirementRow>(Some(&headers)) {
            Ok(row) => row,
            Err(err) => {
                requirements.push(RawRequirement::Unreadable(UnreadableDefinition {
                    id: column(&record, "id")
                        .map(RequirementId)
                        .unwrap_or_else(|| RequirementId(format!("row {}", index + 2))),
                    requirement_type: column(&record, "type"),
                    mandatory: parse_flag(column(&record, "mandatory").as_deref()),
                    applies_to: column(&record, "applies_to").map(RequisitionId),
                    error: RequirementError::Malformed(err.to_string()),
                }));
                continue;
            }
        };
        requirements.push(row.into_requirement());
    }

    Ok(requirements)
}

#[derive(Debug, Deserialize)]
struct RequirementRow {
    id: String,
    #[serde(rename = "type")]
    requirement_type: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    mandatory: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    weight: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    target_value: Option<String>,
    applies_to: String,
}

impl RequirementRow {
    fn into_requirement(self) -> RawRequirement {
        let mandatory = parse_flag(self.mandatory.as_deref());
        let weight = match &self.weight {
            Some(raw) => raw
                .parse::<i64>()
                .map_err(|_| RequirementError::InvalidWeight(raw.clone())),
            None => Err(RequirementError::MissingWeight),
        };

        match weight {
            Ok(weight) => RawRequirement::Definition(RequirementDefinition {
                id: RequirementId(self.id),
                requirement_type: self.requirement_type,
                mandatory,
                weight,
                target_value: self.target_value.map(TargetValue::Text),
                applies_to: RequisitionId(self.applies_to),
            }),
            Err(error) => RawRequirement::Unreadable(UnreadableDefinition {
                id: RequirementId(self.id),
                requirement_type: Some(self.requirement_type),
                mandatory,
                applies_to: Some(RequisitionId(self.applies_to)),
                error,
            }),
        }
    }
}

fn parse_flag(value: Option<&str>) -> bool {
    matches!(
        value.map(|raw| raw.trim().to_ascii_lowercase()).as_deref(),
        Some("true" | "yes" | "y" | "1" | "si" | "sì")
    )
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
