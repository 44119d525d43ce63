//! Host environment description attached to error records.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use crate::config::EnvironmentConfig;

/// Where an error happened, as seen by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorContext {
    pub location: String,
    pub user_agent: String,
    pub online: bool,
}

/// Supplies the context for new error records.
pub trait HostEnvironment: Send + Sync + std::fmt::Debug {
    fn location(&self) -> String;
    fn user_agent(&self) -> String;
    fn is_online(&self) -> bool;

    fn context(&self) -> ErrorContext {
        ErrorContext {
            location: self.location(),
            user_agent: self.user_agent(),
            online: self.is_online(),
        }
    }
}

/// Environment whose values are set by the host as they change.
#[derive(Debug)]
pub struct StaticEnvironment {
    location: RwLock<String>,
    user_agent: String,
    online: AtomicBool,
}

impl StaticEnvironment {
    pub fn new(location: impl Into<String>, user_agent: impl Into<String>, online: bool) -> Self {
        Self {
            location: RwLock::new(location.into()),
            user_agent: user_agent.into(),
            online: AtomicBool::new(online),
        }
    }

    pub fn from_config(config: &EnvironmentConfig) -> Self {
        Self::new(config.location.clone(), config.user_agent.clone(), config.online)
    }

    /// Record a navigation.
    pub fn set_location(&self, location: impl Into<String>) {
        *self.location.write().expect("environment lock poisoned") = location.into();
    }

    /// Record a connectivity change.
    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::Relaxed);
    }
}

impl Default for StaticEnvironment {
    fn default() -> Self {
        Self::from_config(&EnvironmentConfig::default())
    }
}

impl HostEnvironment for StaticEnvironment {
    fn location(&self) -> String {
        self.location.read().expect("environment lock poisoned").clone()
    }

    fn user_agent(&self) -> String {
        self.user_agent.clone()
    }

    fn is_online(&self) -> bool {
        self.online.load(Ordering::Relaxed)
    }
}
