//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the agent.
//! All types derive Serde traits for deserialization from config files;
//! environment variables overlay the file values in the loader.

use serde::{Deserialize, Serialize};

/// Root configuration for the monitoring agent.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct MonitorConfig {
    /// Target server identity and credentials.
    pub server: ServerConfig,

    /// Connection probe settings.
    pub probe: ProbeConfig,

    /// Timer tick settings.
    pub schedule: ScheduleConfig,

    /// Failover escalation settings.
    pub escalation: EscalationConfig,

    /// Operator alerting settings (optional as a group).
    pub notify: NotifyConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Target server configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    /// Cloud subscription the server lives in.
    pub subscription_id: String,

    /// Resource group containing the server.
    pub resource_group: String,

    /// Managed server name (also the failover target identifier).
    pub server_name: String,

    /// Administrator login name used for probing.
    pub admin_name: String,

    /// Administrator password used for probing.
    pub admin_password: String,

    /// Fully-qualified host to connect to. Defaults to the managed-service
    /// naming convention derived from `server_name` when empty.
    pub fqdn: Option<String>,
}

impl ServerConfig {
    /// The host the prober connects to.
    pub fn host(&self) -> String {
        match &self.fqdn {
            Some(fqdn) if !fqdn.is_empty() => fqdn.clone(),
            _ => format!("{}.mysql.database.azure.com", self.server_name),
        }
    }
}

/// Connection probe configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Server port.
    pub port: u16,

    /// Connection establishment timeout in seconds. Bounds tick latency;
    /// the driver's own timeout may be longer than the scheduler allows.
    pub connect_timeout_secs: u64,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            port: 3306,
            connect_timeout_secs: 5,
        }
    }
}

/// Timer tick configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Seconds between health-check ticks.
    pub interval_secs: u64,

    /// A tick whose scheduled deadline is further in the past than this
    /// grace is treated as past-due and skipped.
    pub past_due_grace_secs: u64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            interval_secs: 60,
            past_due_grace_secs: 5,
        }
    }
}

/// Failover escalation configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EscalationConfig {
    /// Consecutive transient failures tolerated before failover.
    pub max_transient_failures: u32,

    /// Management-plane base endpoint.
    pub management_endpoint: String,

    /// Management API version for the failover call.
    pub api_version: String,

    /// Bearer token for the management API. Credential acquisition is the
    /// operator's concern; the agent only carries the token.
    pub access_token: String,

    /// Failover request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for EscalationConfig {
    fn default() -> Self {
        Self {
            max_transient_failures: 3,
            management_endpoint: "https://management.azure.com".to_string(),
            api_version: "2023-12-30".to_string(),
            access_token: String::new(),
            request_timeout_secs: 10,
        }
    }
}

/// Operator alerting configuration.
///
/// All three values must be present for alerting to be active; a partial
/// group is treated as not configured, never as an error at send time.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct NotifyConfig {
    /// Notification service connection string (`endpoint=...;accesskey=...`).
    pub connection_string: Option<String>,

    /// Sender address for the alert mail.
    pub sender_address: Option<String>,

    /// Recipient address for the alert mail.
    pub recipient_address: Option<String>,
}

/// Fully-resolved alerting settings, present only when the whole group is.
#[derive(Debug, Clone)]
pub struct NotifySettings {
    pub connection_string: String,
    pub sender_address: String,
    pub recipient_address: String,
}

impl NotifyConfig {
    /// Resolve the optional group: `Some` only when all three are set.
    pub fn resolved(&self) -> Option<NotifySettings> {
        match (
            &self.connection_string,
            &self.sender_address,
            &self.recipient_address,
        ) {
            (Some(cs), Some(from), Some(to))
                if !cs.is_empty() && !from.is_empty() && !to.is_empty() =>
            {
                Some(NotifySettings {
                    connection_string: cs.clone(),
                    sender_address: from.clone(),
                    recipient_address: to.clone(),
                })
            }
            _ => None,
        }
    }

    /// True when some but not all of the group is set.
    pub fn is_partial(&self) -> bool {
        let set = [
            self.connection_string.as_deref(),
            self.sender_address.as_deref(),
            self.recipient_address.as_deref(),
        ]
        .iter()
        .filter(|v| v.is_some_and(|s| !s.is_empty()))
        .count();
        set > 0 && set < 3
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level filter (trace, debug, info, warn, error). `RUST_LOG`
    /// overrides this when set.
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
