//! HTTP client side.
//!
//! # Data Flow
//! ```text
//! CLI targets
//!     → probe.rs (parse URLs, build reqwest client)
//!     → Guard::execute per target per round
//!     → ProbeReport + Guard::summary
//! ```

pub mod probe;

pub use probe::{parse_targets, ProbeError, ProbeOptions, ProbeOutcome, ProbeReport, Prober};
