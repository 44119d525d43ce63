//! Lifecycle management.
//!
//! # Data Flow
//! ```text
//! SIGINT / SIGTERM
//!     → signals.rs
//!     → Shutdown::trigger
//!     → memory monitor and probe loops exit
//! ```

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
