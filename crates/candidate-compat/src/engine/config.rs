use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Inputs every evaluation shares. The engine never reads a clock, so the
/// evaluation date travels here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationConfig {
    pub as_of: NaiveDate,
    pub enforce_certification_expiry: bool,
}

impl EvaluationConfig {
    pub fn new(as_of: NaiveDate) -> Self {
        Self {
            as_of,
            enforce_certification_expiry: true,
        }
    }

    pub fn with_expiry_enforcement(mut self, enforce: bool) -> Self {
        self.enforce_certification_expiry = enforce;
        self
    }
}
