//! Error intake: turns any failure into a record, a count and a notification.

use std::sync::Arc;

use crate::clock::Clock;
use crate::error::ErrorKind;
use crate::host::HostEnvironment;
use crate::intake::log::ErrorLog;
use crate::intake::record::{ErrorDetails, ErrorRecord};
use crate::notifications::{Dispatch, Dispatcher};
use crate::observability::metrics;
use crate::observability::MetricsStore;

/// Shared entry point for every error source.
#[derive(Debug, Clone)]
pub struct ErrorIntake {
    log: Arc<ErrorLog>,
    stats: Arc<MetricsStore>,
    dispatcher: Arc<Dispatcher>,
    environment: Arc<dyn HostEnvironment>,
    clock: Arc<dyn Clock>,
}

impl ErrorIntake {
    pub fn new(
        log: Arc<ErrorLog>,
        stats: Arc<MetricsStore>,
        dispatcher: Arc<Dispatcher>,
        environment: Arc<dyn HostEnvironment>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            log,
            stats,
            dispatcher,
            environment,
            clock,
        }
    }

    /// Record `details` under `kind` and notify the user.
    ///
    /// The record is appended before the error counter moves, and both happen
    /// before the notification. A failed notification leaves them in place.
    pub fn capture(&self, details: ErrorDetails, kind: &ErrorKind) -> Dispatch {
        let category = kind.category();
        let record = ErrorRecord::new(
            self.clock.now_millis(),
            category.clone(),
            details,
            self.environment.context(),
        );

        tracing::error!(
            id = %record.id,
            category = %record.category,
            error_message = %record.message,
            stack = record.stack.as_deref().unwrap_or(""),
            location = %record.context.location,
            online = record.context.online,
            "Error caught by runtime guard"
        );

        let text = record.message.clone();
        if let Some(evicted) = self.log.push(record) {
            tracing::debug!(id = %evicted.id, "Evicted oldest error record");
        }

        self.stats.record_error();
        metrics::record_error(&category);

        self.dispatcher.notify_error(&text)
    }

    /// Convenience wrapper for typed errors.
    pub fn capture_error<E: std::error::Error + ?Sized>(&self, error: &E, kind: &ErrorKind) -> Dispatch {
        self.capture(ErrorDetails::from_error(error), kind)
    }

    pub fn log(&self) -> &ErrorLog {
        &self.log
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }
}
