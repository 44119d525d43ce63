//! Request gate: the wrapper every outbound call goes through.
//!
//! # Responsibilities
//! - Refuse calls to targets whose breaker is open
//! - Time every attempted call and fold it into the latency mean
//! - On success, forget the target's failure history
//! - On failure, count the attempt and open the breaker at the threshold
//! - Hand the caller's own error back unchanged
//!
//! # Data Flow
//! ```text
//! execute(target, call)
//!     → breakers.is_open(target)? → GateError::CircuitOpen (call never runs)
//!     → call().await (timed)
//!     → Ok  → ledger.reset + breakers.reset
//!     → Err → record_failure → ledger.increment
//!                 → below threshold: log advisory retry
//!                 → at threshold: breakers.open + intake.capture
//! ```
//!
//! # Design Decisions
//! - Composition, not patching: callers pass the call in as a closure
//! - A call dropped mid-flight counts as a failure, same as an error

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::clock::Clock;
use crate::config::{BreakerConfig, RetryConfig};
use crate::error::{ErrorKind, GateError, MessageError};
use crate::intake::{ErrorDetails, ErrorIntake};
use crate::observability::metrics;
use crate::observability::MetricsStore;
use crate::resilience::{network_key, Backoff, BreakerRegistry, RetryLedger};

/// Wraps outbound calls with breaker checks and failure accounting.
#[derive(Debug, Clone)]
pub struct RequestGate {
    breakers: Arc<BreakerRegistry>,
    ledger: Arc<RetryLedger>,
    stats: Arc<MetricsStore>,
    intake: ErrorIntake,
    clock: Arc<dyn Clock>,
    backoff: Backoff,
    failure_threshold: u32,
    capture_rejections: bool,
}

impl RequestGate {
    pub fn new(
        breaker_config: &BreakerConfig,
        retry_config: &RetryConfig,
        breakers: Arc<BreakerRegistry>,
        ledger: Arc<RetryLedger>,
        stats: Arc<MetricsStore>,
        intake: ErrorIntake,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            breakers,
            ledger,
            stats,
            intake,
            clock,
            backoff: Backoff::from_config(retry_config),
            failure_threshold: breaker_config.failure_threshold.max(1),
            capture_rejections: breaker_config.capture_rejections,
        }
    }

    /// Run `call` against `target` unless the target's breaker is open.
    pub async fn execute<T, E, F, Fut>(&self, target: &str, call: F) -> Result<T, GateError<E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: std::error::Error,
    {
        if self.breakers.is_open(target) {
            return Err(self.reject(target));
        }

        let mut in_flight = InFlight {
            gate: self,
            target,
            started: self.clock.monotonic(),
            armed: true,
        };
        let result = call().await;
        in_flight.armed = false;
        let latency = self.clock.monotonic().saturating_sub(in_flight.started);
        self.stats.record_call(latency.as_secs_f64() * 1000.0);

        match result {
            Ok(value) => {
                metrics::record_call("success", latency);
                self.record_success(target);
                Ok(value)
            }
            Err(e) => {
                metrics::record_call("failure", latency);
                self.record_failure(target, &e);
                Err(GateError::Call(e))
            }
        }
    }

    /// Clear the ledger entry and breaker for `target`.
    pub fn record_success(&self, target: &str) {
        self.ledger.reset(&network_key(target));
        self.breakers.reset(target);
    }

    /// Count a failed call and open the breaker once the threshold is reached.
    pub fn record_failure<E: std::error::Error + ?Sized>(&self, target: &str, error: &E) {
        let attempts = self.ledger.increment(&network_key(target));

        if attempts < self.failure_threshold {
            // Counting only; the call is not re-sent.
            let delay = self.backoff.delay(attempts);
            tracing::info!(
                endpoint = %target,
                attempt = attempts,
                threshold = self.failure_threshold,
                suggested_delay_ms = delay.as_millis() as u64,
                error = %error,
                "Call failed, retry would be attempted"
            );
            return;
        }

        self.breakers.open(target);
        self.intake
            .capture_error(error, &ErrorKind::NetworkFailure(target.to_string()));
    }

    pub fn is_open(&self, target: &str) -> bool {
        self.breakers.is_open(target)
    }

    /// Failed attempts currently counted against `target`.
    pub fn attempts(&self, target: &str) -> u32 {
        self.ledger.attempts(&network_key(target))
    }

    fn reject<E>(&self, target: &str) -> GateError<E> {
        tracing::warn!(endpoint = %target, "Call rejected, circuit breaker is open");
        metrics::record_rejection();
        if self.capture_rejections {
            self.intake.capture(
                ErrorDetails::message(format!("Circuit breaker is open for: {target}")),
                &ErrorKind::CircuitOpen(target.to_string()),
            );
        }
        GateError::CircuitOpen {
            target: target.to_string(),
        }
    }
}

/// Runs the failure path if the call future is dropped before it resolves.
struct InFlight<'a> {
    gate: &'a RequestGate,
    target: &'a str,
    started: Duration,
    armed: bool,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let latency = self.gate.clock.monotonic().saturating_sub(self.started);
        self.gate.stats.record_call(latency.as_secs_f64() * 1000.0);
        metrics::record_call("cancelled", latency);
        tracing::warn!(endpoint = %self.target, "Call dropped before completion");
        self.gate.record_failure(
            self.target,
            &MessageError::from("call cancelled before completion"),
        );
    }
}
