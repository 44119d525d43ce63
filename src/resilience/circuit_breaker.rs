//! Per-target circuit breakers.
//!
//! # States
//! - Closed: no entry for the target, calls pass through
//! - Open: entry present and younger than the cooldown, calls fail fast
//!
//! # State Transitions
//! ```text
//! Closed → Open: failure threshold reached (driven by the request gate)
//! Open → Closed: cooldown elapsed (checked lazily on access)
//! Open → Closed: explicit reset after a successful call
//! ```
//!
//! # Design Decisions
//! - Absence of an entry means closed; entries are never kept "closed"
//! - No background sweeper: expiry is evaluated when a target is queried
//! - After expiry the next call is let through as a probe; the retry ledger
//!   is left alone so a failing probe re-opens the breaker immediately

use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use crate::clock::{elapsed_between, Clock};
use crate::observability::metrics;

/// Stored state of an open breaker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BreakerState {
    pub is_open: bool,
    pub opened_at: SystemTime,
}

/// Registry of breakers keyed by target.
#[derive(Debug)]
pub struct BreakerRegistry {
    breakers: DashMap<String, BreakerState>,
    cooldown: Duration,
    clock: Arc<dyn Clock>,
}

impl BreakerRegistry {
    pub fn new(cooldown: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            breakers: DashMap::new(),
            cooldown,
            clock,
        }
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    /// Returns true if calls to `target` must be rejected.
    ///
    /// An entry whose cooldown has elapsed is removed and reported closed.
    pub fn is_open(&self, target: &str) -> bool {
        let now = self.clock.now();
        let cooldown = self.cooldown;
        let expired = self
            .breakers
            .remove_if(target, |_, state| elapsed_between(state.opened_at, now) >= cooldown);

        if expired.is_some() {
            tracing::info!(endpoint = %target, "Circuit breaker cooldown elapsed, allowing probe");
            metrics::record_breaker_transition("expired");
            return false;
        }

        self.breakers
            .get(target)
            .map(|state| state.is_open)
            .unwrap_or(false)
    }

    /// Open (or re-open) the breaker for `target`, stamping it with now.
    pub fn open(&self, target: &str) {
        let opened_at = self.clock.now();
        self.breakers.insert(
            target.to_string(),
            BreakerState {
                is_open: true,
                opened_at,
            },
        );
        tracing::warn!(
            endpoint = %target,
            cooldown_ms = self.cooldown.as_millis() as u64,
            "Circuit breaker opened"
        );
        metrics::record_breaker_transition("opened");
    }

    /// Drop the breaker for `target`. Returns true if one existed.
    pub fn reset(&self, target: &str) -> bool {
        let existed = self.breakers.remove(target).is_some();
        if existed {
            tracing::info!(endpoint = %target, "Circuit breaker reset after success");
            metrics::record_breaker_transition("reset");
        }
        existed
    }

    /// Stored state for `target`, without evaluating expiry.
    pub fn state(&self, target: &str) -> Option<BreakerState> {
        self.breakers.get(target).map(|r| *r.value())
    }

    /// Targets that currently have a breaker entry, sorted.
    ///
    /// Entries past their cooldown but not yet queried are still listed.
    pub fn targets(&self) -> Vec<String> {
        let mut targets: Vec<String> = self.breakers.iter().map(|r| r.key().clone()).collect();
        targets.sort();
        targets
    }

    pub fn len(&self) -> usize {
        self.breakers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.breakers.is_empty()
    }
}
