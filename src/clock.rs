//! Wall-clock abstraction.
//!
//! # Responsibilities
//! - Provide the current time to breaker, throttle and record code
//! - Allow tests to move time forward without sleeping
//!
//! # Design Decisions
//! - Time is absolute (`SystemTime`) because breaker timestamps and the
//!   notification de-dup timestamp outlive a single process
//! - Elapsed computations saturate at zero if the clock steps backwards
//! - Call latency uses [`Clock::monotonic`], which never steps backwards

use std::sync::{Arc, Mutex, OnceLock};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

/// Source of the current time.
pub trait Clock: Send + Sync + std::fmt::Debug {
    fn now(&self) -> SystemTime;

    /// Time since a fixed, clock-specific origin. Never decreases.
    fn monotonic(&self) -> Duration;

    /// Milliseconds since the UNIX epoch.
    fn now_millis(&self) -> u64 {
        to_millis(self.now())
    }
}

/// Convert a timestamp to milliseconds since the UNIX epoch.
pub fn to_millis(time: SystemTime) -> u64 {
    time.duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Time elapsed from `earlier` to `later`, zero if `later` is before `earlier`.
pub fn elapsed_between(earlier: SystemTime, later: SystemTime) -> Duration {
    later.duration_since(earlier).unwrap_or_default()
}

/// The operating system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

static ORIGIN: OnceLock<Instant> = OnceLock::new();

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }

    fn monotonic(&self) -> Duration {
        ORIGIN.get_or_init(Instant::now).elapsed()
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same underlying time, so a test can hand one clone to a
/// [`Guard`](crate::Guard) and advance it through another.
#[derive(Debug, Clone)]
pub struct ManualClock {
    state: Arc<Mutex<ManualState>>,
}

#[derive(Debug)]
struct ManualState {
    wall: SystemTime,
    ticks: Duration,
}

impl ManualClock {
    /// Create a clock frozen at `start`.
    pub fn new(start: SystemTime) -> Self {
        Self {
            state: Arc::new(Mutex::new(ManualState {
                wall: start,
                ticks: Duration::ZERO,
            })),
        }
    }

    /// Create a clock frozen at the given number of milliseconds after the epoch.
    pub fn at_millis(millis: u64) -> Self {
        Self::new(UNIX_EPOCH + Duration::from_millis(millis))
    }

    /// Move the clock forward.
    pub fn advance(&self, by: Duration) {
        let mut state = self.state.lock().expect("manual clock mutex poisoned");
        state.wall += by;
        state.ticks += by;
    }

    /// Jump the wall time to `to`. Monotonic time is not affected.
    pub fn set(&self, to: SystemTime) {
        self.state.lock().expect("manual clock mutex poisoned").wall = to;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> SystemTime {
        self.state.lock().expect("manual clock mutex poisoned").wall
    }

    fn monotonic(&self) -> Duration {
        self.state.lock().expect("manual clock mutex poisoned").ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_advances_shared_clones() {
        let clock = ManualClock::at_millis(1_000);
        let other = clock.clone();

        other.advance(Duration::from_millis(250));
        assert_eq!(clock.now_millis(), 1_250);
    }

    #[test]
    fn test_elapsed_saturates_backwards() {
        let later = UNIX_EPOCH + Duration::from_secs(10);
        let earlier = UNIX_EPOCH + Duration::from_secs(5);
        assert_eq!(elapsed_between(earlier, later), Duration::from_secs(5));
        assert_eq!(elapsed_between(later, earlier), Duration::ZERO);
    }

    #[test]
    fn test_wall_jump_leaves_monotonic_alone() {
        let clock = ManualClock::at_millis(10_000);
        clock.advance(Duration::from_millis(40));
        clock.set(UNIX_EPOCH);

        assert_eq!(clock.now_millis(), 0);
        assert_eq!(clock.monotonic(), Duration::from_millis(40));
    }

    #[test]
    fn test_system_monotonic_never_decreases() {
        let first = SystemClock.monotonic();
        let second = SystemClock.monotonic();
        assert!(second >= first);
    }
}
