//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → GuardConfig (validated, immutable)
//!     → handed to Guard::new, which splits it per component
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::BreakerConfig;
pub use schema::EnvironmentConfig;
pub use schema::ErrorLogConfig;
pub use schema::GuardConfig;
pub use schema::MemoryConfig;
pub use schema::NotificationConfig;
pub use schema::ObservabilityConfig;
pub use schema::RetryConfig;
