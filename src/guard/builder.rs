use std::sync::Arc;

use super::{Guard, GuardInner};
use crate::clock::{Clock, SystemClock};
use crate::config::GuardConfig;
use crate::gate::RequestGate;
use crate::host::{HostEnvironment, StaticEnvironment};
use crate::intake::{ErrorIntake, ErrorLog};
use crate::notifications::{
    Classifier, Dispatcher, FileTimestampStore, MemoryTimestampStore, NotificationThrottle, Notifier,
    TimestampStore, TracingNotifier,
};
use crate::observability::MetricsStore;
use crate::resilience::{BreakerRegistry, RetryLedger};

/// Assembles a [`Guard`], swapping in host collaborators where given.
pub struct GuardBuilder {
    config: GuardConfig,
    clock: Option<Arc<dyn Clock>>,
    notifier: Option<Box<dyn Notifier>>,
    environment: Option<Arc<dyn HostEnvironment>>,
    store: Option<Box<dyn TimestampStore>>,
    classifier: Option<Classifier>,
}

impl GuardBuilder {
    pub fn new(config: GuardConfig) -> Self {
        Self {
            config,
            clock: None,
            notifier: None,
            environment: None,
            store: None,
            classifier: None,
        }
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn notifier(mut self, notifier: Box<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn environment(mut self, environment: Arc<dyn HostEnvironment>) -> Self {
        self.environment = Some(environment);
        self
    }

    pub fn timestamp_store(mut self, store: Box<dyn TimestampStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn classifier(mut self, classifier: Classifier) -> Self {
        self.classifier = Some(classifier);
        self
    }

    pub fn build(self) -> Guard {
        let config = self.config;
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let environment = self
            .environment
            .unwrap_or_else(|| Arc::new(StaticEnvironment::from_config(&config.environment)));
        let store = self.store.unwrap_or_else(|| default_store(&config));

        let throttle = NotificationThrottle::new(config.notifications.dedup_window(), store, clock.clone());
        let dispatcher = Arc::new(Dispatcher::new(
            self.classifier.unwrap_or_default(),
            throttle,
            self.notifier.unwrap_or_else(|| Box::new(TracingNotifier)),
        ));

        let log = Arc::new(ErrorLog::new(config.error_log.capacity));
        let stats = Arc::new(MetricsStore::new());
        let breakers = Arc::new(BreakerRegistry::new(config.breaker.cooldown(), clock.clone()));
        let ledger = Arc::new(RetryLedger::new());

        let intake = ErrorIntake::new(log.clone(), stats.clone(), dispatcher, environment, clock.clone());
        let gate = RequestGate::new(
            &config.breaker,
            &config.retries,
            breakers.clone(),
            ledger,
            stats.clone(),
            intake.clone(),
            clock,
        );

        tracing::debug!(
            capacity = config.error_log.capacity,
            failure_threshold = config.breaker.failure_threshold,
            cooldown_ms = config.breaker.cooldown_ms,
            "Runtime guard initialised"
        );

        Guard {
            inner: Arc::new(GuardInner {
                config,
                gate,
                intake,
                log,
                stats,
                breakers,
            }),
        }
    }
}

fn default_store(config: &GuardConfig) -> Box<dyn TimestampStore> {
    match &config.notifications.state_path {
        Some(path) => Box::new(FileTimestampStore::new(path)),
        None => Box::new(MemoryTimestampStore::new()),
    }
}
