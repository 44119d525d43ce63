//! Memory pressure monitoring.
//!
//! # Responsibilities
//! - Periodically sample host memory usage
//! - Hand each sample to the guard, which degrades when usage is too high

use std::sync::Mutex;
use std::time::Duration;
use sysinfo::{Pid, System};
use tokio::sync::broadcast;
use tokio::time;

use crate::config::MemoryConfig;
use crate::guard::{Guard, PressureOutcome};

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Memory in use against the limit the host reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemorySample {
    pub used_bytes: u64,
    pub limit_bytes: u64,
}

impl MemorySample {
    pub fn new(used_bytes: u64, limit_bytes: u64) -> Self {
        Self {
            used_bytes,
            limit_bytes,
        }
    }

    /// True when usage is strictly above `ratio` of the limit.
    /// A zero limit never counts as pressure.
    pub fn exceeds(&self, ratio: f64) -> bool {
        self.limit_bytes > 0 && self.used_bytes as f64 > self.limit_bytes as f64 * ratio
    }

    pub fn used_mb(&self) -> f64 {
        self.used_bytes as f64 / BYTES_PER_MB
    }

    pub fn limit_mb(&self) -> f64 {
        self.limit_bytes as f64 / BYTES_PER_MB
    }
}

/// Host-provided memory reading. `None` when the host cannot tell.
pub trait MemoryProbe: Send {
    fn sample(&mut self) -> Option<MemorySample>;
}

/// Reads this process's resident memory against total system memory.
pub struct SysinfoProbe {
    system: System,
    pid: Pid,
}

impl SysinfoProbe {
    pub fn new() -> Self {
        Self {
            system: System::new(),
            pid: Pid::from_u32(std::process::id()),
        }
    }
}

impl Default for SysinfoProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryProbe for SysinfoProbe {
    fn sample(&mut self) -> Option<MemorySample> {
        self.system.refresh_memory();
        if !self.system.refresh_process(self.pid) {
            return None;
        }
        let used = self.system.process(self.pid)?.memory();
        Some(MemorySample::new(used, self.system.total_memory()))
    }
}

/// Probe returning readings pushed by the host, for hosts that measure
/// memory themselves.
#[derive(Debug, Default)]
pub struct ReportedProbe {
    latest: Mutex<Option<MemorySample>>,
}

impl ReportedProbe {
    pub fn report(&self, sample: MemorySample) {
        *self.latest.lock().expect("probe mutex poisoned") = Some(sample);
    }
}

impl MemoryProbe for std::sync::Arc<ReportedProbe> {
    fn sample(&mut self) -> Option<MemorySample> {
        *self.latest.lock().expect("probe mutex poisoned")
    }
}

pub struct MemoryMonitor<P> {
    guard: Guard,
    probe: P,
    config: MemoryConfig,
}

impl<P: MemoryProbe> MemoryMonitor<P> {
    pub fn new(guard: Guard, probe: P, config: MemoryConfig) -> Self {
        Self { guard, probe, config }
    }

    /// Take one sample and apply it. Returns `None` if the probe had nothing.
    pub fn check_once(&mut self) -> Option<PressureOutcome> {
        let sample = self.probe.sample()?;
        tracing::trace!(used_bytes = sample.used_bytes, limit_bytes = sample.limit_bytes, "Memory sample");
        Some(self.guard.check_memory(sample))
    }

    pub async fn run(mut self, mut shutdown: broadcast::Receiver<()>) {
        if !self.config.enabled {
            tracing::info!("Memory monitoring disabled");
            return;
        }

        tracing::info!(interval_secs = self.config.sample_interval_secs, "Memory monitor starting");

        let mut ticker = time::interval(Duration::from_secs(self.config.sample_interval_secs.max(1)));
        // The first tick completes immediately; skip it so sampling starts one
        // interval after startup.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.check_once();
                }
                _ = shutdown.recv() => {
                    tracing::info!("Memory monitor received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GuardConfig;
    use std::sync::Arc;

    #[test]
    fn test_exceeds_is_strict() {
        assert!(MemorySample::new(801, 1000).exceeds(0.8));
        assert!(!MemorySample::new(800, 1000).exceeds(0.8));
        assert!(!MemorySample::new(10, 0).exceeds(0.8));
    }

    #[test]
    fn test_mb_conversion() {
        let s = MemorySample::new(512 * 1024 * 1024, 1024 * 1024 * 1024);
        assert!((s.used_mb() - 512.0).abs() < f64::EPSILON);
        assert!((s.limit_mb() - 1024.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_check_once_with_reported_probe() {
        let guard = Guard::new(GuardConfig::default());
        let probe = Arc::new(ReportedProbe::default());
        let mut monitor = MemoryMonitor::new(guard, probe.clone(), MemoryConfig::default());

        assert_eq!(monitor.check_once(), None);

        probe.report(MemorySample::new(100, 1000));
        assert_eq!(monitor.check_once(), Some(PressureOutcome::Normal));

        probe.report(MemorySample::new(950, 1000));
        assert!(matches!(monitor.check_once(), Some(PressureOutcome::Degraded { .. })));
    }

    #[test]
    fn test_sysinfo_probe_reads_something() {
        let mut probe = SysinfoProbe::new();
        if let Some(sample) = probe.sample() {
            assert!(sample.limit_bytes > 0);
        }
    }

    #[tokio::test]
    async fn test_run_stops_on_shutdown() {
        let guard = Guard::new(GuardConfig::default());
        let probe = Arc::new(ReportedProbe::default());
        let monitor = MemoryMonitor::new(guard, probe, MemoryConfig::default());

        let (tx, rx) = broadcast::channel(1);
        let handle = tokio::spawn(monitor.run(rx));
        tokio::task::yield_now().await;
        tx.send(()).unwrap();

        time::timeout(Duration::from_secs(2), handle)
            .await
            .expect("monitor did not stop")
            .unwrap();
    }
}
