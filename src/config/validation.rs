//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (capacities > 0, ratios within 0..=1)
//! - Validate addresses
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GuardConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::GuardConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {reason}")]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: String,
}

impl ValidationError {
    fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

/// Check a configuration, collecting every problem found.
pub fn validate_config(config: &GuardConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let log = &config.error_log;
    if log.capacity == 0 {
        errors.push(ValidationError::new("error_log.capacity", "must be greater than 0"));
    }
    if log.pressure_retain > log.capacity {
        errors.push(ValidationError::new(
            "error_log.pressure_retain",
            format!("must not exceed capacity ({})", log.capacity),
        ));
    }
    if log.recent_window == 0 {
        errors.push(ValidationError::new("error_log.recent_window", "must be greater than 0"));
    }

    if config.breaker.failure_threshold == 0 {
        errors.push(ValidationError::new("breaker.failure_threshold", "must be greater than 0"));
    }
    if config.breaker.cooldown_ms == 0 {
        errors.push(ValidationError::new("breaker.cooldown_ms", "must be greater than 0"));
    }

    if config.retries.base_delay_ms > config.retries.max_delay_ms {
        errors.push(ValidationError::new(
            "retries.base_delay_ms",
            "must not exceed retries.max_delay_ms",
        ));
    }

    if config.memory.enabled && config.memory.sample_interval_secs == 0 {
        errors.push(ValidationError::new("memory.sample_interval_secs", "must be greater than 0"));
    }
    let ratio = config.memory.pressure_ratio;
    if !(ratio > 0.0 && ratio <= 1.0) {
        errors.push(ValidationError::new(
            "memory.pressure_ratio",
            format!("must be within (0, 1], got {ratio}"),
        ));
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::new(
            "observability.log_level",
            format!("unknown level '{}'", config.observability.log_level),
        ));
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("invalid socket address '{}'", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&GuardConfig::default()).is_ok());
    }

    #[test]
    fn test_reports_every_problem() {
        let mut config = GuardConfig::default();
        config.error_log.capacity = 0;
        config.breaker.failure_threshold = 0;
        config.memory.pressure_ratio = 1.5;
        config.observability.log_level = "loud".into();

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert!(fields.contains(&"error_log.capacity"));
        assert!(fields.contains(&"error_log.pressure_retain"));
        assert!(fields.contains(&"breaker.failure_threshold"));
        assert!(fields.contains(&"memory.pressure_ratio"));
        assert!(fields.contains(&"observability.log_level"));
    }

    #[test]
    fn test_metrics_address_checked_only_when_enabled() {
        let mut config = GuardConfig::default();
        config.observability.metrics_address = "not-an-address".into();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "observability.metrics_address");
    }
}
