//! Startup verification of the monitoring target.
//!
//! # Responsibilities
//! - Resolve the target host once, before the tick loop starts
//! - Run one initial probe and fail fast on a fatal (configuration) error
//!
//! # Design Decisions
//! - A transient failure at startup only warns: the server may be in the
//!   middle of the very outage the agent exists to handle
//! - This check runs once; it never repeats inside the tick loop

use thiserror::Error;
use tokio::net::lookup_host;

use crate::health::{classify, FailureClass};
use crate::probe::{ProbeError, Prober};

/// Errors that abort startup.
#[derive(Debug, Error)]
pub enum StartupError {
    /// The target host does not resolve.
    #[error("cannot resolve target host {host}: {source}")]
    Resolve {
        host: String,
        #[source]
        source: std::io::Error,
    },

    /// The target rejected the configured credentials or database.
    #[error("cannot authenticate against target: {0}")]
    FatalProbe(ProbeError),
}

/// Verify the target is resolvable and the credentials are usable.
pub async fn verify_target<P: Prober>(
    prober: &P,
    host: &str,
    port: u16,
) -> Result<(), StartupError> {
    let mut addrs = lookup_host((host, port))
        .await
        .map_err(|e| StartupError::Resolve {
            host: host.to_string(),
            source: e,
        })?;
    if addrs.next().is_none() {
        return Err(StartupError::Resolve {
            host: host.to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no addresses"),
        });
    }

    match prober.probe().await {
        Ok(latency) => {
            tracing::info!(
                host = %host,
                latency_ms = latency.as_millis() as u64,
                "target verified"
            );
        }
        Err(err) => match classify(err.code) {
            FailureClass::Fatal => return Err(StartupError::FatalProbe(err)),
            FailureClass::Transient => {
                tracing::warn!(
                    host = %host,
                    error = %err,
                    "target unreachable at startup, proceeding"
                );
            }
        },
    }

    Ok(())
}
