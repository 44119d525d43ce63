//! Metrics exposition.
//!
//! # Responsibilities
//! - Mirror guard activity into the `metrics` facade
//! - Expose a Prometheus-compatible scrape endpoint when enabled
//!
//! # Metrics
//! - `guard_calls_total` (counter): gated calls by outcome
//! - `guard_call_duration_seconds` (histogram): latency of attempted calls
//! - `guard_errors_total` (counter): captured errors by category
//! - `guard_breaker_transitions_total` (counter): breaker opens and resets
//! - `guard_rejections_total` (counter): calls refused by an open breaker
//! - `guard_notifications_total` (counter): notifications by result
//! - `guard_error_log_size` (gauge): records currently held
//!
//! # Design Decisions
//! - Recording is a no-op until a recorder is installed, so library users
//!   pay nothing unless they opt in
//! - Target URLs are not used as labels to keep cardinality bounded

use std::net::SocketAddr;
use std::time::Duration;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its HTTP listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_call(outcome: &'static str, latency: Duration) {
    metrics::counter!("guard_calls_total", "outcome" => outcome).increment(1);
    metrics::histogram!("guard_call_duration_seconds").record(latency.as_secs_f64());
}

pub fn record_error(category: &str) {
    // Network categories embed the target; collapse them to their prefix.
    let label = category.split(" (").next().unwrap_or(category).to_string();
    metrics::counter!("guard_errors_total", "category" => label).increment(1);
}

pub fn record_breaker_transition(transition: &'static str) {
    metrics::counter!("guard_breaker_transitions_total", "transition" => transition).increment(1);
}

pub fn record_rejection() {
    metrics::counter!("guard_rejections_total").increment(1);
}

pub fn record_notification(result: &'static str) {
    metrics::counter!("guard_notifications_total", "result" => result).increment(1);
}

pub fn record_error_log_size(size: usize) {
    metrics::gauge!("guard_error_log_size").set(size as f64);
}
