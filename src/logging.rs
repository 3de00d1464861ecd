//! Tracing subscriber setup.
//!
//! Filter comes from `RUST_LOG` (default `foliolab=info`); format from
//! `FOLIOLAB_LOG_FORMAT`, then the `[logging] format` key, then pretty.
//! Everything is written to stderr so stdout stays clean for command output.

use std::str::FromStr;

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::domain::error::FoliolabError;

pub const FORMAT_ENV: &str = "FOLIOLAB_LOG_FORMAT";
const DEFAULT_FILTER: &str = "foliolab=info";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{other}' (expected pretty or json)")),
        }
    }
}

/// Parse the `[logging] format` value.
pub fn config_format(value: &str) -> Result<LogFormat, FoliolabError> {
    value.parse().map_err(|reason| FoliolabError::ConfigInvalid {
        section: "logging".to_string(),
        key: "format".to_string(),
        reason,
    })
}

/// Pick the format: a valid environment value first, then the config value.
/// An unrecognised config value is `ConfigInvalid`; an unrecognised
/// environment value is ignored.
pub fn resolve_format(
    env_value: Option<&str>,
    config_value: Option<&str>,
) -> Result<LogFormat, FoliolabError> {
    if let Some(format) = env_value.and_then(|v| v.parse().ok()) {
        return Ok(format);
    }
    config_value.map_or(Ok(LogFormat::default()), config_format)
}

/// Install the global subscriber. Returns `false` if one is already set.
pub fn init(format: LogFormat) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let registry = tracing_subscriber::registry().with(filter);

    let result = match format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Pretty => registry
            .with(fmt::layer().compact().with_writer(std::io::stderr))
            .try_init(),
    };
    result.is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_formats() {
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("pretty".parse::<LogFormat>().unwrap(), LogFormat::Pretty);
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn env_overrides_config() {
        assert_eq!(resolve_format(Some("json"), Some("pretty")).unwrap(), LogFormat::Json);
        assert_eq!(resolve_format(None, Some("json")).unwrap(), LogFormat::Json);
        assert_eq!(resolve_format(Some("bogus"), Some("json")).unwrap(), LogFormat::Json);
        assert_eq!(resolve_format(None, None).unwrap(), LogFormat::Pretty);
    }

    #[test]
    fn config_value_is_case_insensitive() {
        assert_eq!(resolve_format(None, Some(" JSON ")).unwrap(), LogFormat::Json);
        assert_eq!(config_format("Pretty").unwrap(), LogFormat::Pretty);
    }

    #[test]
    fn unknown_config_value_is_rejected() {
        let err = resolve_format(None, Some("xml")).unwrap_err();
        assert!(matches!(
            err,
            FoliolabError::ConfigInvalid { ref section, ref key, .. }
                if section == "logging" && key == "format"
        ));
        assert!(err.to_string().contains("expected pretty or json"));

        assert_eq!(resolve_format(Some("pretty"), Some("xml")).unwrap(), LogFormat::Pretty);
    }
}
