//! Retry ledger.
//!
//! # Responsibilities
//! - Count consecutive failed attempts per target
//! - Forget a target once it succeeds
//!
//! # Design Decisions
//! - Keys are namespaced (`network_<target>`) so other failure sources can
//!   share the ledger later without colliding
//! - Counting only: nothing here schedules or performs a resend

use dashmap::DashMap;

/// Ledger key for network failures against `target`.
pub fn network_key(target: &str) -> String {
    format!("network_{target}")
}

/// Per-key failure attempt counter.
#[derive(Debug, Default)]
pub struct RetryLedger {
    attempts: DashMap<String, u32>,
}

impl RetryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one more failed attempt and return the new count.
    pub fn increment(&self, key: &str) -> u32 {
        let mut entry = self.attempts.entry(key.to_string()).or_insert(0);
        *entry = entry.saturating_add(1);
        *entry
    }

    /// Current count for `key`; zero when absent.
    pub fn attempts(&self, key: &str) -> u32 {
        self.attempts.get(key).map(|r| *r.value()).unwrap_or(0)
    }

    /// Remove the entry for `key`.
    pub fn reset(&self, key: &str) -> bool {
        self.attempts.remove(key).is_some()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.attempts.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.attempts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attempts.is_empty()
    }
}
