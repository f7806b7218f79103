use std::fmt;

use serde::{Deserialize, Serialize};

/// Distinguishes broken catalog content from gaps in candidate data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    Configuration,
    InputData,
}

impl DiagnosticKind {
    pub const fn label(self) -> &'static str {
        match self {
            DiagnosticKind::Configuration => "configuration",
            DiagnosticKind::InputData => "input data",
        }
    }
}

/// A per-item problem attached to a result instead of aborting evaluation.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub subject: String,
    pub message: String,
}

impl Diagnostic {
    pub fn configuration(subject: impl Into<String>, message: impl fmt::Display) -> Self {
        Self {
            kind: DiagnosticKind::Configuration,
            subject: subject.into(),
            message: message.to_string(),
        }
    }

    pub fn input_data(subject: impl Into<String>, message: impl fmt::Display) -> Self {
        Self {
            kind: DiagnosticKind::InputData,
            subject: subject.into(),
            message: message.to_string(),
        }
    }

    pub fn summary(&self) -> String {
        format!("[{}] {}: {}", self.kind.label(), self.subject, self.message)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}
