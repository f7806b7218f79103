use crate::config::TelemetryConfig;
use std::fmt;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
pub enum TelemetryError {
    EnvFilter { value: String, source: ParseError },
    Subscriber(Box<dyn std::error::Error + Send + Sync>),
}

impl fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryError::EnvFilter { value, .. } => {
                write!(
                    f,
                    "invalid log level/filter '{}': unable to build EnvFilter",
                    value
                )
            }
            TelemetryError::Subscriber(err) => write!(f, "telemetry error: {err}"),
        }
    }
}

impl std::error::Error for TelemetryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TelemetryError::EnvFilter { source, .. } => Some(source),
            TelemetryError::Subscriber(err) => Some(&**err),
        }
    }
}

/// `RUST_LOG` wins over the configured level; `verbose` raises the engine's
/// own target to debug so per-candidate decisions show up.
pub fn build_filter(config: &TelemetryConfig, verbose: bool) -> Result<EnvFilter, TelemetryError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    let directive = if verbose {
        format!("{},candidate_compat=debug", config.log_level)
    } else {
        config.log_level.clone()
    };

    EnvFilter::try_new(&directive).map_err(|source| TelemetryError::EnvFilter {
        value: directive,
        source,
    })
}

/// Logs go to stderr so command output on stdout stays machine-readable.
pub fn init(config: &TelemetryConfig, verbose: bool) -> Result<(), TelemetryError> {
    let env_filter = build_filter(config, verbose)?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .with_ansi(false)
        .try_init()
        .map_err(TelemetryError::Subscriber)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unparseable_levels() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let config = TelemetryConfig {
            log_level: "candidate_compat=loud".to_string(),
        };

        let err = build_filter(&config, false).expect_err("invalid directive");
        assert!(err.to_string().contains("candidate_compat=loud"));
    }

    #[test]
    fn verbose_adds_engine_directive() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let config = TelemetryConfig {
            log_level: "warn".to_string(),
        };

        let filter = build_filter(&config, true).expect("valid directive");
        assert!(filter.to_string().contains("candidate_compat=debug"));
    }
}
