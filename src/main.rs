//! Runtime guard command line.
//!
//! Probes HTTP targets through the guard's request gate and prints the
//! resulting error summary, so breaker and notification behaviour can be
//! watched against real endpoints.
//!
//! ```text
//! runtime-guard --config guard.toml probe http://localhost:3000/api --rounds 10
//! runtime-guard check-config guard.toml
//! ```

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};

use runtime_guard::config::{load_config, GuardConfig};
use runtime_guard::health::{MemoryMonitor, SysinfoProbe};
use runtime_guard::http::{parse_targets, ProbeOptions, Prober};
use runtime_guard::lifecycle::{signals, Shutdown};
use runtime_guard::observability::{logging, metrics};
use runtime_guard::Guard;

#[derive(Parser)]
#[command(name = "runtime-guard")]
#[command(about = "Circuit breaking and error capture for outbound calls", long_about = None)]
struct Cli {
    /// Configuration file (TOML). Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send GET requests to targets through the request gate
    Probe {
        /// Target URLs
        #[arg(required = true)]
        targets: Vec<String>,

        /// Number of rounds over all targets
        #[arg(short, long, default_value_t = 5)]
        rounds: u32,

        /// Pause between rounds in milliseconds
        #[arg(short, long, default_value_t = 1000)]
        interval_ms: u64,

        /// Per-request timeout in milliseconds
        #[arg(long, default_value_t = 10_000)]
        timeout_ms: u64,

        /// Treat 4xx/5xx responses as failures
        #[arg(long)]
        fail_on_status: bool,
    },
    /// Validate a configuration file and print the effective settings
    CheckConfig {
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => GuardConfig::default(),
    };

    logging::init_logging(&config.observability);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "runtime-guard starting");

    match cli.command {
        Commands::CheckConfig { path } => {
            let checked = load_config(&path)?;
            println!("{}", toml::to_string_pretty(&checked)?);
        }
        Commands::Probe {
            targets,
            rounds,
            interval_ms,
            timeout_ms,
            fail_on_status,
        } => {
            let targets = parse_targets(&targets)?;

            if config.observability.metrics_enabled {
                match config.observability.metrics_address.parse() {
                    Ok(addr) => metrics::init_metrics(addr),
                    Err(_) => tracing::error!(
                        metrics_address = %config.observability.metrics_address,
                        "Failed to parse metrics address"
                    ),
                }
            }

            let shutdown = Shutdown::new();
            tokio::spawn(signals::shutdown_on_signal(shutdown.clone()));

            let guard = Guard::new(config.clone());

            let monitor = MemoryMonitor::new(guard.clone(), SysinfoProbe::new(), config.memory.clone());
            let monitor_handle = tokio::spawn(monitor.run(shutdown.subscribe()));

            let options = ProbeOptions {
                rounds,
                interval: Duration::from_millis(interval_ms),
                timeout: Duration::from_millis(timeout_ms),
                fail_on_status,
            };
            let prober = Prober::new(guard.clone(), options)?;
            let report = prober.run(&targets, shutdown.subscribe()).await;

            shutdown.trigger();
            let _ = monitor_handle.await;

            let output = serde_json::json!({
                "report": report,
                "summary": guard.summary(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
