//! The guard context object.
//!
//! # Responsibilities
//! - Own every component (log, counters, ledger, breakers, dispatcher)
//! - Expose the gate, the error entry points and the query surface
//! - Apply the memory-pressure safety valve
//!
//! # Design Decisions
//! - Constructed explicitly by the host and passed around; there is no
//!   process-wide instance
//! - Cheap to clone: all clones share the same state

mod builder;
mod wrappers;

pub use builder::GuardBuilder;

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;

use crate::config::GuardConfig;
use crate::error::{ErrorKind, GateError};
use crate::gate::RequestGate;
use crate::health::memory::MemorySample;
use crate::intake::{ErrorDetails, ErrorIntake, ErrorLog, ErrorRecord};
use crate::notifications::{Dispatch, MEMORY_WARNING_MESSAGE};
use crate::observability::{MetricsStore, PerformanceMetrics};
use crate::resilience::BreakerRegistry;

/// Snapshot returned by [`Guard::summary`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuardSummary {
    pub total_errors: usize,
    pub recent_errors: Vec<ErrorRecord>,
    pub metrics: PerformanceMetrics,
    pub open_breaker_targets: Vec<String>,
}

/// Result of evaluating a memory sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressureOutcome {
    /// Usage is below the configured ratio.
    Normal,
    /// Usage is above the ratio; the log was trimmed by `dropped` records.
    Degraded { dropped: usize, notification: Dispatch },
}

#[derive(Debug)]
struct GuardInner {
    config: GuardConfig,
    gate: RequestGate,
    intake: ErrorIntake,
    log: Arc<ErrorLog>,
    stats: Arc<MetricsStore>,
    breakers: Arc<BreakerRegistry>,
}

/// Runtime guard shared by everything that makes outbound calls or
/// reports errors.
#[derive(Debug, Clone)]
pub struct Guard {
    inner: Arc<GuardInner>,
}

impl Guard {
    /// Guard with default collaborators (system clock, log notifier,
    /// configured environment and timestamp store).
    pub fn new(config: GuardConfig) -> Self {
        GuardBuilder::new(config).build()
    }

    pub fn builder(config: GuardConfig) -> GuardBuilder {
        GuardBuilder::new(config)
    }

    pub fn config(&self) -> &GuardConfig {
        &self.inner.config
    }

    pub fn gate(&self) -> &RequestGate {
        &self.inner.gate
    }

    /// Run `call` for `target` through the request gate.
    pub async fn execute<T, E, F, Fut>(&self, target: &str, call: F) -> Result<T, GateError<E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: std::error::Error,
    {
        self.inner.gate.execute(target, call).await
    }

    /// Record an error from any source.
    pub fn capture(&self, details: ErrorDetails, kind: &ErrorKind) -> Dispatch {
        self.inner.intake.capture(details, kind)
    }

    pub fn capture_error<E: std::error::Error + ?Sized>(&self, error: &E, kind: &ErrorKind) -> Dispatch {
        self.inner.intake.capture_error(error, kind)
    }

    pub fn is_open(&self, target: &str) -> bool {
        self.inner.gate.is_open(target)
    }

    /// Failed attempts currently counted against `target`.
    pub fn attempts(&self, target: &str) -> u32 {
        self.inner.gate.attempts(target)
    }

    pub fn metrics(&self) -> PerformanceMetrics {
        self.inner.stats.snapshot()
    }

    /// Every record currently held, oldest first.
    pub fn errors(&self) -> Vec<ErrorRecord> {
        self.inner.log.all()
    }

    pub fn summary(&self) -> GuardSummary {
        GuardSummary {
            total_errors: self.inner.log.len(),
            recent_errors: self.inner.log.recent(self.inner.config.error_log.recent_window),
            metrics: self.inner.stats.snapshot(),
            open_breaker_targets: self.inner.breakers.targets(),
        }
    }

    /// Empty the error log and zero the error counter.
    ///
    /// Breakers, the retry ledger and call statistics are left alone.
    pub fn clear(&self) {
        self.inner.log.clear();
        self.inner.stats.reset_errors();
        tracing::info!("Error log cleared");
    }

    /// Evaluate a memory sample and degrade if usage is too high.
    pub fn check_memory(&self, sample: MemorySample) -> PressureOutcome {
        let ratio = self.inner.config.memory.pressure_ratio;
        if !sample.exceeds(ratio) {
            return PressureOutcome::Normal;
        }

        tracing::warn!(
            used_mb = sample.used_mb(),
            limit_mb = sample.limit_mb(),
            "High memory usage"
        );

        let dropped = self
            .inner
            .log
            .truncate_to_recent(self.inner.config.error_log.pressure_retain);
        if dropped > 0 {
            tracing::info!(dropped, "Trimmed error log under memory pressure");
        }

        let notification = self
            .inner
            .intake
            .dispatcher()
            .notify_warning(MEMORY_WARNING_MESSAGE);

        PressureOutcome::Degraded {
            dropped,
            notification,
        }
    }
}
