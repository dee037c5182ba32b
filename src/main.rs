//! mysql-sentinel
//!
//! A scheduled health-check-and-failover agent for a managed MySQL server.
//!
//! # Architecture Overview
//!
//! ```text
//!   timer tick ──▶ ┌────────┐    ┌──────────┐    ┌───────────────┐
//!                  │ probe  │───▶│ classify │───▶│ state machine │
//!                  │ (sqlx) │    │          │    │ (ServerHealth)│
//!                  └────────┘    └──────────┘    └──────┬────────┘
//!                                                       │ escalate
//!                                                       ▼
//!                                        ┌──────────┐   ┌──────────┐
//!                                        │ failover │──▶│  notify  │
//!                                        │ (mgmt API)│  │ (email)  │
//!                                        └──────────┘   └──────────┘
//! ```
//!
//! Startup fails fast if the target cannot be resolved or authenticated
//! against; after that, every failure is contained within its tick.

use std::path::PathBuf;

use clap::Parser;

use mysql_sentinel::config;
use mysql_sentinel::escalation::{EmailNotifier, RestFailoverClient};
use mysql_sentinel::health::Monitor;
use mysql_sentinel::lifecycle::{self, Shutdown};
use mysql_sentinel::observability;
use mysql_sentinel::probe::MySqlProber;

#[derive(Debug, Parser)]
#[command(name = "mysql-sentinel", about = "Health-check and failover agent for a managed MySQL server")]
struct Args {
    /// Path to a TOML configuration file. Environment variables overlay
    /// whatever the file provides.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Fail fast on bad configuration, before anything else runs.
    let config = config::load_config(args.config.as_deref())?;

    observability::init_logging(&config.observability.log_level);

    tracing::info!("mysql-sentinel v0.1.0 starting");
    tracing::info!(
        server = %config.server.server_name,
        host = %config.server.host(),
        interval_secs = config.schedule.interval_secs,
        max_transient_failures = config.escalation.max_transient_failures,
        "configuration loaded"
    );

    let prober = MySqlProber::new(&config.server, &config.probe);

    // One-time target verification, outside the tick loop.
    lifecycle::verify_target(&prober, &config.server.host(), config.probe.port).await?;

    let failover = RestFailoverClient::new(&config.server, &config.escalation);

    if config.notify.is_partial() {
        tracing::warn!("notify configuration incomplete, alerting disabled");
    }
    let notifier = EmailNotifier::new(config.notify.resolved())?;
    if notifier.is_configured() {
        tracing::info!("operator alerting enabled");
    }

    let shutdown = Shutdown::new();
    let shutdown_rx = shutdown.subscribe();
    tokio::spawn(lifecycle::signals::shutdown_on_signal(shutdown));

    let monitor = Monitor::new(
        prober,
        failover,
        notifier,
        config.server.server_name.clone(),
        config.escalation.max_transient_failures,
        &config.schedule,
    );
    monitor.run(shutdown_rx).await;

    tracing::info!("shutdown complete");
    Ok(())
}
