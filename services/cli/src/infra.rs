use candidate_compat::config::AppConfig;
use candidate_compat::EvaluationConfig;
use chrono::{Local, NaiveDate};

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

/// `--as-of` beats `COMPAT_AS_OF`, which beats the local date.
pub(crate) fn evaluation_config(config: &AppConfig, as_of: Option<NaiveDate>) -> EvaluationConfig {
    let evaluation = config
        .evaluation
        .evaluation_config(Local::now().date_naive());
    match as_of {
        Some(date) => EvaluationConfig::new(date)
            .with_expiry_enforcement(evaluation.enforce_certification_expiry),
        None => evaluation,
    }
}
