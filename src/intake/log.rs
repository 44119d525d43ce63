//! Bounded, insertion-ordered error log.

use std::collections::VecDeque;
use std::sync::Mutex;

use crate::intake::record::ErrorRecord;
use crate::observability::metrics;

/// Ring buffer of error records. The oldest record is evicted first.
#[derive(Debug)]
pub struct ErrorLog {
    records: Mutex<VecDeque<ErrorRecord>>,
    capacity: usize,
}

impl ErrorLog {
    /// Create a log holding at most `capacity` records (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            records: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Append a record, returning the evicted one if the log was full.
    pub fn push(&self, record: ErrorRecord) -> Option<ErrorRecord> {
        let mut records = self.records.lock().expect("error log mutex poisoned");
        records.push_back(record);
        let evicted = if records.len() > self.capacity {
            records.pop_front()
        } else {
            None
        };
        metrics::record_error_log_size(records.len());
        evicted
    }

    /// Keep only the newest `keep` records. Returns how many were dropped.
    pub fn truncate_to_recent(&self, keep: usize) -> usize {
        let mut records = self.records.lock().expect("error log mutex poisoned");
        let excess = records.len().saturating_sub(keep);
        records.drain(..excess);
        metrics::record_error_log_size(records.len());
        excess
    }

    /// The newest `n` records, oldest first.
    pub fn recent(&self, n: usize) -> Vec<ErrorRecord> {
        let records = self.records.lock().expect("error log mutex poisoned");
        let skip = records.len().saturating_sub(n);
        records.iter().skip(skip).cloned().collect()
    }

    /// Every record, oldest first.
    pub fn all(&self) -> Vec<ErrorRecord> {
        self.records.lock().expect("error log mutex poisoned").iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.records.lock().expect("error log mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.records.lock().expect("error log mutex poisoned").clear();
        metrics::record_error_log_size(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::ErrorContext;
    use crate::intake::record::ErrorDetails;

    fn record(n: u64) -> ErrorRecord {
        ErrorRecord::new(
            n,
            "JavaScript Error".into(),
            ErrorDetails::message(format!("error {n}")),
            ErrorContext {
                location: "about:blank".into(),
                user_agent: "test".into(),
                online: true,
            },
        )
    }

    fn timestamps(records: &[ErrorRecord]) -> Vec<u64> {
        records.iter().map(|r| r.timestamp_ms).collect()
    }

    #[test]
    fn test_evicts_oldest_past_capacity() {
        let log = ErrorLog::new(3);
        for n in 1..=3 {
            assert!(log.push(record(n)).is_none());
        }
        let evicted = log.push(record(4)).unwrap();

        assert_eq!(evicted.timestamp_ms, 1);
        assert_eq!(log.len(), 3);
        assert_eq!(timestamps(&log.all()), vec![2, 3, 4]);
    }

    #[test]
    fn test_never_exceeds_capacity() {
        let log = ErrorLog::new(50);
        for n in 0..500 {
            log.push(record(n));
            assert!(log.len() <= 50);
        }
        assert_eq!(log.all().first().map(|r| r.timestamp_ms), Some(450));
    }

    #[test]
    fn test_truncate_keeps_newest() {
        let log = ErrorLog::new(50);
        for n in 0..30 {
            log.push(record(n));
        }
        assert_eq!(log.truncate_to_recent(20), 10);
        assert_eq!(log.len(), 20);
        assert_eq!(log.all().first().map(|r| r.timestamp_ms), Some(10));

        // Already small enough: nothing dropped
        assert_eq!(log.truncate_to_recent(20), 0);
    }

    #[test]
    fn test_recent_returns_tail_in_order() {
        let log = ErrorLog::new(50);
        for n in 0..15 {
            log.push(record(n));
        }
        assert_eq!(timestamps(&log.recent(3)), vec![12, 13, 14]);
        assert_eq!(log.recent(100).len(), 15);
    }

    #[test]
    fn test_zero_capacity_clamped() {
        let log = ErrorLog::new(0);
        assert_eq!(log.capacity(), 1);
        log.push(record(1));
        log.push(record(2));
        assert_eq!(timestamps(&log.all()), vec![2]);
        log.clear();
        assert!(log.is_empty());
    }
}
