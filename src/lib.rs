//! Runtime error guard library.
//!
//! Wraps outbound calls in per-target circuit breakers, captures failures
//! into a bounded error log, and tells the user about them without
//! repeating itself.

pub mod clock;
pub mod config;
pub mod error;
pub mod gate;
pub mod guard;
pub mod health;
pub mod host;
pub mod http;
pub mod intake;
pub mod lifecycle;
pub mod notifications;
pub mod observability;
pub mod resilience;

pub use config::GuardConfig;
pub use error::{ErrorKind, GateError, MessageError};
pub use guard::{Guard, GuardBuilder, GuardSummary, PressureOutcome};
pub use intake::{ErrorDetails, ErrorRecord};
pub use lifecycle::Shutdown;
pub use notifications::{Dispatch, Notifier, Severity};
