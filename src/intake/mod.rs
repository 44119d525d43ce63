//! Error intake subsystem.
//!
//! # Data Flow
//! ```text
//! Uncaught error / rejection / console error / wrapped failure / network failure
//!     → capture.rs (build record with host context)
//!     → log.rs (append, evicting the oldest past capacity)
//!     → observability (error counter)
//!     → notifications (classified, de-duplicated)
//! ```
//!
//! # Design Decisions
//! - Records are immutable and owned by the log
//! - The log is bounded; memory pressure can shrink it further

pub mod capture;
pub mod log;
pub mod record;

pub use capture::ErrorIntake;
pub use log::ErrorLog;
pub use record::{ErrorDetails, ErrorRecord};
