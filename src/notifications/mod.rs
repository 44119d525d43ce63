//! User notification subsystem.
//!
//! # Data Flow
//! ```text
//! Captured error
//!     → classifier.rs (error text → user-facing message)
//!     → throttle.rs (drop if another notification went out within the window)
//!         → store.rs (last-notified timestamp, optionally persisted)
//!     → Notifier (host collaborator renders it)
//! ```
//!
//! # Design Decisions
//! - Rendering is the host's job; the guard only decides what and when
//! - A failing notifier is logged and otherwise ignored

pub mod classifier;
pub mod store;
pub mod throttle;

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::observability::metrics;

pub use classifier::{Classifier, Rule};
pub use store::{FileTimestampStore, MemoryTimestampStore, StoreError, TimestampStore};
pub use throttle::NotificationThrottle;

/// Message sent when memory pressure forces the guard into degraded mode.
pub const MEMORY_WARNING_MESSAGE: &str =
    "Application is using high memory. Some features may be slowed down.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => f.write_str("error"),
            Severity::Warning => f.write_str("warning"),
        }
    }
}

#[derive(Debug, Error)]
#[error("notification failed: {0}")]
pub struct NotifyError(pub String);

/// Shows a message to the user.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str, severity: Severity) -> Result<(), NotifyError>;
}

/// Notifier that writes to the log. Used when the host supplies none.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, message: &str, severity: Severity) -> Result<(), NotifyError> {
        match severity {
            Severity::Error => tracing::error!(notification = %message, "User notification"),
            Severity::Warning => tracing::warn!(notification = %message, "User notification"),
        }
        Ok(())
    }
}

/// What happened to a notification request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    Sent,
    Suppressed,
    Failed,
}

/// Classifier, throttle and notifier wired together.
pub struct Dispatcher {
    classifier: Classifier,
    throttle: NotificationThrottle,
    notifier: Box<dyn Notifier>,
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("classifier", &self.classifier)
            .field("throttle", &self.throttle)
            .finish_non_exhaustive()
    }
}

impl Dispatcher {
    pub fn new(classifier: Classifier, throttle: NotificationThrottle, notifier: Box<dyn Notifier>) -> Self {
        Self {
            classifier,
            throttle,
            notifier,
        }
    }

    /// Notify about an error, translating its text first.
    pub fn notify_error(&self, error_text: &str) -> Dispatch {
        let message = self.classifier.classify(error_text).to_string();
        self.dispatch(&message, Severity::Error)
    }

    /// Send `message` verbatim as a warning.
    pub fn notify_warning(&self, message: &str) -> Dispatch {
        self.dispatch(message, Severity::Warning)
    }

    fn dispatch(&self, message: &str, severity: Severity) -> Dispatch {
        if !self.throttle.try_acquire() {
            metrics::record_notification("suppressed");
            return Dispatch::Suppressed;
        }

        match self.notifier.notify(message, severity) {
            Ok(()) => {
                metrics::record_notification("sent");
                Dispatch::Sent
            }
            Err(e) => {
                tracing::warn!(error = %e, %severity, "Notifier failed");
                metrics::record_notification("failed");
                Dispatch::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    #[derive(Default, Clone)]
    struct Recorder(Arc<Mutex<Vec<(String, Severity)>>>);

    impl Notifier for Recorder {
        fn notify(&self, message: &str, severity: Severity) -> Result<(), NotifyError> {
            self.0.lock().unwrap().push((message.to_string(), severity));
            Ok(())
        }
    }

    struct Broken;

    impl Notifier for Broken {
        fn notify(&self, _: &str, _: Severity) -> Result<(), NotifyError> {
            Err(NotifyError("no display".into()))
        }
    }

    fn dispatcher(notifier: Box<dyn Notifier>, clock: &ManualClock) -> Dispatcher {
        let throttle = NotificationThrottle::new(
            Duration::from_secs(5),
            Box::new(MemoryTimestampStore::new()),
            Arc::new(clock.clone()),
        );
        Dispatcher::new(Classifier::default(), throttle, notifier)
    }

    #[test]
    fn test_error_is_classified_and_deduped() {
        let clock = ManualClock::at_millis(1_000_000);
        let recorder = Recorder::default();
        let d = dispatcher(Box::new(recorder.clone()), &clock);

        assert_eq!(d.notify_error("request timeout"), Dispatch::Sent);
        clock.advance(Duration::from_millis(1_000));
        assert_eq!(d.notify_error("Failed to fetch"), Dispatch::Suppressed);

        let sent = recorder.0.lock().unwrap().clone();
        assert_eq!(sent, vec![(classifier::TIMEOUT_MESSAGE.to_string(), Severity::Error)]);
    }

    #[test]
    fn test_warning_sent_verbatim() {
        let clock = ManualClock::at_millis(1_000_000);
        let recorder = Recorder::default();
        let d = dispatcher(Box::new(recorder.clone()), &clock);

        assert_eq!(d.notify_warning(MEMORY_WARNING_MESSAGE), Dispatch::Sent);
        let sent = recorder.0.lock().unwrap().clone();
        assert_eq!(sent, vec![(MEMORY_WARNING_MESSAGE.to_string(), Severity::Warning)]);
    }

    #[test]
    fn test_failing_notifier_reported() {
        let clock = ManualClock::at_millis(1_000_000);
        let d = dispatcher(Box::new(Broken), &clock);
        assert_eq!(d.notify_error("boom"), Dispatch::Failed);
    }
}
