//! Host-side collaborators.
//!
//! The guard never reaches into its host directly. Everything it needs to
//! know about the page (location, user agent, connectivity, inserted
//! elements) comes through this module.

pub mod elements;
pub mod environment;

pub use elements::{check_element, ElementSnapshot, ElementWarning};
pub use environment::{ErrorContext, HostEnvironment, StaticEnvironment};
