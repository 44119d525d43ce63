//! Configuration loading from disk.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::GuardConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<GuardConfig, ConfigError> {
    let config: GuardConfig = toml::from_str(content)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<GuardConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_yields_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.error_log.capacity, 50);
        assert_eq!(config.breaker.failure_threshold, 3);
        assert_eq!(config.breaker.cooldown_ms, 30_000);
        assert_eq!(config.notifications.dedup_window_ms, 5_000);
        assert_eq!(config.memory.sample_interval_secs, 30);
    }

    #[test]
    fn test_partial_sections_keep_other_defaults() {
        let config = parse_config(
            r#"
            [breaker]
            cooldown_ms = 5000

            [environment]
            location = "https://app.example/dashboard"
            "#,
        )
        .unwrap();

        assert_eq!(config.breaker.cooldown_ms, 5000);
        assert_eq!(config.breaker.failure_threshold, 3);
        assert_eq!(config.environment.location, "https://app.example/dashboard");
        assert!(config.environment.online);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = parse_config("[error_log]\ncapacity = 0\n").unwrap_err();
        match err {
            ConfigError::Validation(errors) => assert!(!errors.is_empty()),
            other => panic!("expected validation error, got {other}"),
        }
    }

    #[test]
    fn test_syntax_error_is_parse_error() {
        assert!(matches!(parse_config("[breaker"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_config(Path::new("definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
