//! Host health subsystem.
//!
//! # Data Flow
//! ```text
//! Memory monitor (memory.rs):
//!     Periodic timer
//!     → Probe host memory
//!     → Guard::check_memory
//!         → above ratio: trim error log, warn the user
//! ```
//!
//! # Design Decisions
//! - Sampling is periodic; nothing is evicted between samples
//! - The probe is a collaborator so hosts can report their own numbers
//! - Stops on the shared shutdown signal

pub mod memory;

pub use memory::{MemoryMonitor, MemoryProbe, MemorySample, ReportedProbe, SysinfoProbe};
