//! MySQL connection prober backed by sqlx.
//!
//! # Responsibilities
//! - Open a fresh connection per probe (no pooling, no reuse across ticks)
//! - Enforce an explicit connect timeout so tick latency stays bounded
//! - Map driver errors to MySQL error numbers for classification

use std::time::{Duration, Instant};

use sqlx::mysql::{MySqlConnectOptions, MySqlDatabaseError, MySqlSslMode};
use sqlx::{ConnectOptions, Connection};
use tokio::time::timeout;

use crate::config::{ProbeConfig, ServerConfig};
use crate::probe::{ProbeError, Prober};

/// Client error number for host unreachable / connect refused.
pub const CR_CONN_HOST_ERROR: u16 = 2003;
/// Client error number for a connection lost mid-handshake (also used for
/// our own connect timeout).
pub const CR_SERVER_LOST: u16 = 2013;
/// Client error number for TLS negotiation failure.
pub const CR_SSL_CONNECTION_ERROR: u16 = 2026;
/// Client error number for a malformed wire packet.
pub const CR_MALFORMED_PACKET: u16 = 2027;

/// Prober that opens a fresh MySQL connection per call.
pub struct MySqlProber {
    options: MySqlConnectOptions,
    connect_timeout: Duration,
    host: String,
}

impl MySqlProber {
    pub fn new(server: &ServerConfig, probe: &ProbeConfig) -> Self {
        let host = server.host();
        let options = MySqlConnectOptions::new()
            .host(&host)
            .port(probe.port)
            .username(&server.admin_name)
            .password(&server.admin_password)
            .ssl_mode(MySqlSslMode::Required);

        Self {
            options,
            connect_timeout: Duration::from_secs(probe.connect_timeout_secs),
            host,
        }
    }

    /// Host the prober connects to.
    pub fn host(&self) -> &str {
        &self.host
    }
}

impl Prober for MySqlProber {
    async fn probe(&self) -> Result<Duration, ProbeError> {
        tracing::debug!(host = %self.host, "establishing new connection");
        let started = Instant::now();

        let connected = timeout(self.connect_timeout, self.options.connect()).await;
        let latency = started.elapsed();

        match connected {
            Ok(Ok(conn)) => {
                tracing::info!(
                    host = %self.host,
                    latency_ms = latency.as_millis() as u64,
                    "connection established"
                );
                // Fresh connection per tick; tear it down immediately.
                if let Err(e) = conn.close().await {
                    tracing::debug!(error = %e, "error closing probe connection");
                }
                Ok(latency)
            }
            Ok(Err(err)) => Err(map_connect_error(&err)),
            Err(_) => Err(ProbeError::new(
                CR_SERVER_LOST,
                format!(
                    "connection attempt timed out after {}s",
                    self.connect_timeout.as_secs()
                ),
            )),
        }
    }
}

/// Reduce a sqlx connect error to a MySQL error number.
///
/// Errors the server itself reported keep their server error number;
/// client-side failures are assigned the client error number for the
/// closest condition, which places them in the transient client range.
fn map_connect_error(err: &sqlx::Error) -> ProbeError {
    match err {
        sqlx::Error::Database(db) => {
            let code = db
                .try_downcast_ref::<MySqlDatabaseError>()
                .map(|e| e.number())
                .unwrap_or(0);
            ProbeError::new(code, db.message())
        }
        sqlx::Error::Io(e) => ProbeError::new(CR_CONN_HOST_ERROR, e.to_string()),
        sqlx::Error::Tls(e) => ProbeError::new(CR_SSL_CONNECTION_ERROR, e.to_string()),
        sqlx::Error::Protocol(msg) => ProbeError::new(CR_MALFORMED_PACKET, msg.clone()),
        other => ProbeError::new(0, other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::{classify, FailureClass};

    #[test]
    fn client_side_codes_classify_as_transient() {
        for code in [
            CR_CONN_HOST_ERROR,
            CR_SERVER_LOST,
            CR_SSL_CONNECTION_ERROR,
            CR_MALFORMED_PACKET,
        ] {
            assert_eq!(classify(code), FailureClass::Transient);
        }
    }

    #[test]
    fn unmapped_errors_classify_as_fatal() {
        // The fallback code 0 sits outside the client error range.
        assert_eq!(classify(0), FailureClass::Fatal);
    }
}
