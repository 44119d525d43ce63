//! Call and error counters.
//!
//! # Responsibilities
//! - Count gated calls and captured errors
//! - Maintain a running mean of call latency without storing samples
//!
//! # Design Decisions
//! - A single mutex guards all three fields so snapshots are consistent
//! - The mean is updated incrementally: `avg = (avg * (n - 1) + sample) / n`

use serde::{Deserialize, Serialize};
use std::sync::Mutex;

/// Point-in-time copy of the guard's counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    pub call_count: u64,
    pub error_count: u64,
    pub average_latency_ms: f64,
}

/// Thread-safe counters for call volume, error volume and latency.
#[derive(Debug, Default)]
pub struct MetricsStore {
    inner: Mutex<PerformanceMetrics>,
}

impl MetricsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one call and fold its latency into the running average.
    pub fn record_call(&self, latency_ms: f64) {
        let mut m = self.inner.lock().expect("metrics mutex poisoned");
        m.call_count += 1;
        let n = m.call_count as f64;
        m.average_latency_ms = (m.average_latency_ms * (n - 1.0) + latency_ms.max(0.0)) / n;
    }

    pub fn record_error(&self) {
        self.inner.lock().expect("metrics mutex poisoned").error_count += 1;
    }

    /// Zero the error counter. Call counts and latency are kept.
    pub fn reset_errors(&self) {
        self.inner.lock().expect("metrics mutex poisoned").error_count = 0;
    }

    pub fn snapshot(&self) -> PerformanceMetrics {
        *self.inner.lock().expect("metrics mutex poisoned")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_running_average() {
        let store = MetricsStore::new();
        for sample in [10.0, 20.0, 30.0] {
            store.record_call(sample);
        }

        let snap = store.snapshot();
        assert_eq!(snap.call_count, 3);
        assert!((snap.average_latency_ms - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_average_of_uneven_samples() {
        let store = MetricsStore::new();
        for sample in [1.5, 2.5, 100.0, 0.0] {
            store.record_call(sample);
        }
        assert!((store.snapshot().average_latency_ms - 26.0).abs() < 1e-9);
    }

    #[test]
    fn test_reset_errors_keeps_calls() {
        let store = MetricsStore::new();
        store.record_call(5.0);
        store.record_error();
        store.record_error();
        assert_eq!(store.snapshot().error_count, 2);

        store.reset_errors();
        let snap = store.snapshot();
        assert_eq!(snap.error_count, 0);
        assert_eq!(snap.call_count, 1);
        assert!((snap.average_latency_ms - 5.0).abs() < f64::EPSILON);
    }
}
