use std::env;
use std::fmt;

use chrono::NaiveDate;

use crate::engine::EvaluationConfig;

/// Distinguishes runtime behavior for different stages of deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub telemetry: TelemetryConfig,
    pub evaluation: EvaluationSettings,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let enforce_certification_expiry = match env::var("COMPAT_ENFORCE_EXPIRY") {
            Ok(raw) => parse_bool(&raw).ok_or(ConfigError::InvalidBoolean {
                var: "COMPAT_ENFORCE_EXPIRY",
                value: raw,
            })?,
            Err(_) => true,
        };

        let as_of = match env::var("COMPAT_AS_OF") {
            Ok(raw) if !raw.trim().is_empty() => Some(
                NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
                    .map_err(|source| ConfigError::InvalidDate { value: raw, source })?,
            ),
            _ => None,
        };

        Ok(Self {
            environment,
            telemetry: TelemetryConfig { log_level },
            evaluation: EvaluationSettings {
                enforce_certification_expiry,
                as_of,
            },
        })
    }
}

/// Business-rule switches applied to every evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvaluationSettings {
    pub enforce_certification_expiry: bool,
    /// Pins the evaluation date; callers fall back to today when unset.
    pub as_of: Option<NaiveDate>,
}

impl EvaluationSettings {
    pub fn evaluation_config(&self, today: NaiveDate) -> EvaluationConfig {
        EvaluationConfig::new(self.as_of.unwrap_or(today))
            .with_expiry_enforcement(self.enforce_certification_expiry)
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidBoolean {
        var: &'static str,
        value: String,
    },
    InvalidDate {
        value: String,
        source: chrono::ParseError,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidBoolean { var, value } => {
                write!(f, "{var} must be true or false, found '{value}'")
            }
            ConfigError::InvalidDate { value, .. } => {
                write!(f, "COMPAT_AS_OF must be a YYYY-MM-DD date, found '{value}'")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidBoolean { .. } => None,
            ConfigError::InvalidDate { source, .. } => Some(source),
        }
    }
}
