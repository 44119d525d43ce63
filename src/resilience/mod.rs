//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Outbound call through the request gate:
//!     → circuit_breaker.rs (reject fast while the target is open)
//!     → On failure: retries.rs (count the attempt)
//!         → below threshold: backoff.rs (advisory delay, logged only)
//!         → at threshold: circuit_breaker.rs opens the target
//!     → On success: ledger entry and breaker are both cleared
//! ```
//!
//! # Design Decisions
//! - Breakers are per target, never global
//! - Nothing here performs a resend; "retry" means counting
//! - Both maps are concurrent so one guard can be shared across tasks

pub mod backoff;
pub mod circuit_breaker;
pub mod retries;

pub use backoff::Backoff;
pub use circuit_breaker::{BreakerRegistry, BreakerState};
pub use retries::{network_key, RetryLedger};
