//! Notification de-duplication.
//!
//! A single last-notified timestamp is shared by every notification the
//! guard sends. A notification is suppressed when the previous one went out
//! less than the window ago.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::clock::Clock;
use crate::notifications::store::TimestampStore;

#[derive(Debug)]
pub struct NotificationThrottle {
    window: Duration,
    store: Box<dyn TimestampStore>,
    clock: Arc<dyn Clock>,
    // Serializes the check-then-store so two callers cannot both pass.
    gate: Mutex<()>,
}

impl NotificationThrottle {
    pub fn new(window: Duration, store: Box<dyn TimestampStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            window,
            store,
            clock,
            gate: Mutex::new(()),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Returns true and records now if a notification may be sent.
    pub fn try_acquire(&self) -> bool {
        let _guard = self.gate.lock().expect("throttle mutex poisoned");
        let now = self.clock.now_millis();

        let last = match self.store.load() {
            Ok(last) => last,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read notification timestamp, treating as unset");
                None
            }
        };

        if let Some(last) = last {
            if now.saturating_sub(last) < self.window.as_millis() as u64 {
                tracing::debug!(last_notified_ms = last, now_ms = now, "Notification suppressed");
                return false;
            }
        }

        if let Err(e) = self.store.store(now) {
            tracing::warn!(error = %e, "Failed to persist notification timestamp");
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::notifications::store::MemoryTimestampStore;

    fn throttle() -> (NotificationThrottle, ManualClock) {
        let clock = ManualClock::at_millis(10_000_000);
        let throttle = NotificationThrottle::new(
            Duration::from_millis(5_000),
            Box::new(MemoryTimestampStore::new()),
            Arc::new(clock.clone()),
        );
        (throttle, clock)
    }

    #[test]
    fn test_second_within_window_suppressed() {
        let (throttle, clock) = throttle();
        assert!(throttle.try_acquire());

        clock.advance(Duration::from_millis(4_999));
        assert!(!throttle.try_acquire());

        clock.advance(Duration::from_millis(1));
        assert!(throttle.try_acquire());
    }

    #[test]
    fn test_suppressed_attempt_does_not_extend_window() {
        let (throttle, clock) = throttle();
        assert!(throttle.try_acquire());
        clock.advance(Duration::from_millis(3_000));
        assert!(!throttle.try_acquire());
        clock.advance(Duration::from_millis(2_000));
        assert!(throttle.try_acquire());
    }

    #[test]
    fn test_previous_session_timestamp_respected() {
        let clock = ManualClock::at_millis(50_000);
        let store = MemoryTimestampStore::new();
        store.store(48_000).unwrap();

        let throttle = NotificationThrottle::new(
            Duration::from_millis(5_000),
            Box::new(store),
            Arc::new(clock.clone()),
        );
        assert!(!throttle.try_acquire());
        clock.advance(Duration::from_millis(3_000));
        assert!(throttle.try_acquire());
    }
}
