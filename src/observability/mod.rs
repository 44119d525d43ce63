//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Request gate / error intake produce:
//!     → performance.rs (call count, error count, running latency mean)
//!     → metrics.rs (facade counters, optional Prometheus scrape)
//!     → logging.rs (structured log events)
//! ```
//!
//! # Design Decisions
//! - performance.rs is the source of truth for the public summary
//! - metrics.rs mirrors it for external scraping only

pub mod logging;
pub mod metrics;
pub mod performance;

pub use performance::{MetricsStore, PerformanceMetrics};
