//! Provider-level failover via the management API.
//!
//! # Responsibilities
//! - Issue the failover request for the monitored server
//! - Treat the call as fire-and-forget: no polling for completion
//! - Surface rejection and transport failures as explicit errors

use std::time::Duration;

use thiserror::Error;

use crate::config::{EscalationConfig, ServerConfig};

/// Errors from the failover capability.
#[derive(Debug, Error)]
pub enum FailoverError {
    /// The management API refused the request.
    #[error("failover rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },

    /// The request never completed.
    #[error("failover request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Capability to trigger a provider failover for one server.
#[allow(async_fn_in_trait)]
pub trait FailoverApi {
    /// Ask the provider to fail the server over. Returns once the request
    /// is accepted; completion is not observed.
    async fn begin_failover(&self, server_name: &str) -> Result<(), FailoverError>;
}

/// Management-API client for flexible-server failover.
pub struct RestFailoverClient {
    client: reqwest::Client,
    endpoint: String,
    subscription_id: String,
    resource_group: String,
    api_version: String,
    access_token: String,
    request_timeout: Duration,
}

impl RestFailoverClient {
    pub fn new(server: &ServerConfig, escalation: &EscalationConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: escalation.management_endpoint.trim_end_matches('/').to_string(),
            subscription_id: server.subscription_id.clone(),
            resource_group: server.resource_group.clone(),
            api_version: escalation.api_version.clone(),
            access_token: escalation.access_token.clone(),
            request_timeout: Duration::from_secs(escalation.request_timeout_secs),
        }
    }

    fn failover_url(&self, server_name: &str) -> String {
        format!(
            "{}/subscriptions/{}/resourceGroups/{}/providers/Microsoft.DBforMySQL/flexibleServers/{}/failover?api-version={}",
            self.endpoint, self.subscription_id, self.resource_group, server_name, self.api_version
        )
    }
}

impl FailoverApi for RestFailoverClient {
    async fn begin_failover(&self, server_name: &str) -> Result<(), FailoverError> {
        let url = self.failover_url(server_name);
        tracing::debug!(url = %url, "requesting failover");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.access_token)
            .timeout(self.request_timeout)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(FailoverError::Rejected {
                status: status.as_u16(),
                body,
            })
        }
    }
}
