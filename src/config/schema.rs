//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the guard.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration for the runtime guard.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GuardConfig {
    /// Error log sizing.
    pub error_log: ErrorLogConfig,

    /// Circuit breaker thresholds and cooldown.
    pub breaker: BreakerConfig,

    /// Advisory backoff reported when a retry would be attempted.
    pub retries: RetryConfig,

    /// User notification settings.
    pub notifications: NotificationConfig,

    /// Memory pressure sampling.
    pub memory: MemoryConfig,

    /// Host environment attached to every error record.
    pub environment: EnvironmentConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Error log configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ErrorLogConfig {
    /// Maximum number of records kept.
    pub capacity: usize,

    /// Records kept when memory pressure forces a truncation.
    pub pressure_retain: usize,

    /// Records returned as "recent" in the summary.
    pub recent_window: usize,
}

impl Default for ErrorLogConfig {
    fn default() -> Self {
        Self {
            capacity: 50,
            pressure_retain: 20,
            recent_window: 10,
        }
    }
}

/// Circuit breaker configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BreakerConfig {
    /// Consecutive failures that open the breaker.
    pub failure_threshold: u32,

    /// Time an open breaker rejects calls, in milliseconds.
    pub cooldown_ms: u64,

    /// Record rejected calls in the error log.
    pub capture_rejections: bool,
}

impl BreakerConfig {
    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }
}

impl Default for BreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 3,
            cooldown_ms: 30_000,
            capture_rejections: true,
        }
    }
}

/// Retry configuration.
///
/// Nothing is ever re-sent; these values only shape the delay reported in
/// the "would retry" log line.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Base delay for exponential backoff in milliseconds.
    pub base_delay_ms: u64,

    /// Maximum delay for exponential backoff in milliseconds.
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            base_delay_ms: 100,
            max_delay_ms: 2000,
        }
    }
}

/// Notification configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NotificationConfig {
    /// Minimum gap between two dispatched notifications, in milliseconds.
    pub dedup_window_ms: u64,

    /// File holding the last-notified timestamp across sessions.
    /// Kept in memory when unset.
    pub state_path: Option<String>,
}

impl NotificationConfig {
    pub fn dedup_window(&self) -> Duration {
        Duration::from_millis(self.dedup_window_ms)
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            dedup_window_ms: 5_000,
            state_path: None,
        }
    }
}

/// Memory pressure configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// Enable periodic sampling.
    pub enabled: bool,

    /// Sampling interval in seconds.
    pub sample_interval_secs: u64,

    /// Fraction of the limit above which the guard degrades (0.0 - 1.0).
    pub pressure_ratio: f64,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            sample_interval_secs: 30,
            pressure_ratio: 0.8,
        }
    }
}

/// Host environment configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EnvironmentConfig {
    /// Location reported on error records.
    pub location: String,

    /// Environment descriptor (user agent).
    pub user_agent: String,

    /// Connectivity flag reported on error records.
    pub online: bool,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            location: "about:blank".to_string(),
            user_agent: concat!("runtime-guard/", env!("CARGO_PKG_VERSION")).to_string(),
            online: true,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit logs as JSON lines.
    pub json_logs: bool,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
