//! OS signal handling.
//!
//! # Responsibilities
//! - Register signal handlers (SIGTERM, SIGINT)
//! - Translate signals into a shutdown trigger
//!
//! # Design Decisions
//! - Uses Tokio's signal handling (async-safe)
//! - No reload signal: configuration is fixed at process start

use crate::lifecycle::Shutdown;

/// Wait for a termination signal, then trigger shutdown.
///
/// Intended to be spawned alongside the tick loop.
pub async fn shutdown_on_signal(shutdown: Shutdown) {
    wait_for_termination().await;
    tracing::info!("termination signal received, shutting down");
    shutdown.trigger();
}

#[cfg(unix)]
async fn wait_for_termination() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut term = match signal(SignalKind::terminate()) {
        Ok(term) => Some(term),
        Err(e) => {
            tracing::error!(error = %e, "failed to register SIGTERM handler");
            None
        }
    };

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {}
        _ = async {
            match term.as_mut() {
                Some(term) => { term.recv().await; }
                None => std::future::pending::<()>().await,
            }
        } => {}
    }
}

#[cfg(not(unix))]
async fn wait_for_termination() {
    let _ = tokio::signal::ctrl_c().await;
}
