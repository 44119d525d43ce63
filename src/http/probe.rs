//! HTTP probing through the request gate.
//!
//! # Responsibilities
//! - Issue GET requests to each target, one gated call per target per round
//! - Run a round's targets concurrently so their calls interleave
//! - Stop between rounds when shutdown is signalled
//!
//! # Design Decisions
//! - Transport errors always count as failures
//! - HTTP error statuses count only when `fail_on_status` is set, matching
//!   how a browser fetch resolves on 404/500 responses

use futures_util::future::join_all;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::broadcast;
use url::Url;

use crate::error::GateError;
use crate::guard::Guard;

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("network error while fetching: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server responded with status {0}")]
    Status(u16),
}

#[derive(Debug, Clone)]
pub struct ProbeOptions {
    pub rounds: u32,
    pub interval: Duration,
    pub timeout: Duration,
    pub fail_on_status: bool,
}

impl Default for ProbeOptions {
    fn default() -> Self {
        Self {
            rounds: 1,
            interval: Duration::from_secs(1),
            timeout: Duration::from_secs(10),
            fail_on_status: false,
        }
    }
}

/// Result of one gated request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    Ok(u16),
    Failed,
    Rejected,
}

/// Counts per outcome across all rounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct ProbeReport {
    pub succeeded: u32,
    pub failed: u32,
    pub rejected: u32,
}

impl ProbeReport {
    fn add(&mut self, outcome: ProbeOutcome) {
        match outcome {
            ProbeOutcome::Ok(_) => self.succeeded += 1,
            ProbeOutcome::Failed => self.failed += 1,
            ProbeOutcome::Rejected => self.rejected += 1,
        }
    }
}

/// Check that every target parses as an absolute http(s) URL.
pub fn parse_targets(raw: &[String]) -> Result<Vec<Url>, String> {
    raw.iter()
        .map(|t| {
            let url = Url::parse(t).map_err(|e| format!("invalid target '{t}': {e}"))?;
            match url.scheme() {
                "http" | "https" => Ok(url),
                other => Err(format!("unsupported scheme '{other}' in '{t}'")),
            }
        })
        .collect()
}

pub struct Prober {
    guard: Guard,
    client: reqwest::Client,
    options: ProbeOptions,
}

impl Prober {
    pub fn new(guard: Guard, options: ProbeOptions) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(options.timeout)
            .user_agent(guard.config().environment.user_agent.clone())
            .build()?;
        Ok(Self {
            guard,
            client,
            options,
        })
    }

    /// Probe a single target once.
    pub async fn probe(&self, target: &Url) -> ProbeOutcome {
        let fail_on_status = self.options.fail_on_status;
        let result = self
            .guard
            .execute(target.as_str(), || async {
                let response = self.client.get(target.clone()).send().await?;
                let status = response.status();
                if fail_on_status && (status.is_client_error() || status.is_server_error()) {
                    return Err(ProbeError::Status(status.as_u16()));
                }
                Ok(status.as_u16())
            })
            .await;

        match result {
            Ok(status) => {
                tracing::debug!(endpoint = %target, status, "Probe succeeded");
                ProbeOutcome::Ok(status)
            }
            Err(GateError::CircuitOpen { .. }) => ProbeOutcome::Rejected,
            Err(GateError::Call(e)) => {
                tracing::debug!(endpoint = %target, error = %e, "Probe failed");
                ProbeOutcome::Failed
            }
        }
    }

    /// Run all rounds, or fewer if shutdown arrives first.
    pub async fn run(&self, targets: &[Url], mut shutdown: broadcast::Receiver<()>) -> ProbeReport {
        let mut report = ProbeReport::default();

        for round in 1..=self.options.rounds {
            let outcomes = join_all(targets.iter().map(|t| self.probe(t))).await;
            for outcome in outcomes {
                report.add(outcome);
            }
            tracing::info!(round, rounds = self.options.rounds, ?report, "Probe round complete");

            if round == self.options.rounds {
                break;
            }
            tokio::select! {
                _ = tokio::time::sleep(self.options.interval) => {}
                _ = shutdown.recv() => {
                    tracing::info!("Probe loop received shutdown signal");
                    break;
                }
            }
        }

        report
    }
}
