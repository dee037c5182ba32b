//! Operator alerting over the notification REST API.
//!
//! # Responsibilities
//! - Send a plain-text + HTML alert mail to one recipient
//! - Report "not configured" as a distinct non-error outcome
//! - Never let a delivery failure escape past the caller's log line

use std::time::Duration;

use serde_json::json;
use thiserror::Error;

use crate::config::NotifySettings;
use crate::escalation::EscalationEvent;

const SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors from the alerting capability.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// The connection string is not of the `endpoint=...;accesskey=...` form.
    #[error("invalid notification connection string: {0}")]
    InvalidConnectionString(String),

    /// The notification service refused the message.
    #[error("notification rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },

    /// The request never completed.
    #[error("notification request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Result of a notify attempt that did not error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyOutcome {
    /// The alert was handed to the notification service.
    Sent,
    /// Alerting is not configured; nothing was attempted.
    NotConfigured,
}

/// Capability to alert an operator about an escalation.
#[allow(async_fn_in_trait)]
pub trait Notifier {
    async fn notify(&self, event: &EscalationEvent) -> Result<NotifyOutcome, NotifyError>;
}

/// Notifier that mails the operator through the notification REST API.
///
/// Built from the optional notify config group; when the group is absent
/// every call is a no-op reporting [`NotifyOutcome::NotConfigured`].
pub struct EmailNotifier {
    destination: Option<Destination>,
    client: reqwest::Client,
}

struct Destination {
    endpoint: String,
    access_key: String,
    sender_address: String,
    recipient_address: String,
}

impl EmailNotifier {
    pub fn new(settings: Option<NotifySettings>) -> Result<Self, NotifyError> {
        let destination = match settings {
            Some(settings) => {
                let (endpoint, access_key) =
                    parse_connection_string(&settings.connection_string)?;
                Some(Destination {
                    endpoint,
                    access_key,
                    sender_address: settings.sender_address,
                    recipient_address: settings.recipient_address,
                })
            }
            None => None,
        };

        Ok(Self {
            destination,
            client: reqwest::Client::new(),
        })
    }

    /// True when a destination is configured.
    pub fn is_configured(&self) -> bool {
        self.destination.is_some()
    }
}

impl Notifier for EmailNotifier {
    async fn notify(&self, event: &EscalationEvent) -> Result<NotifyOutcome, NotifyError> {
        let Some(dest) = &self.destination else {
            return Ok(NotifyOutcome::NotConfigured);
        };

        let timestamp = event.timestamp.to_rfc3339();
        let subject = format!("Failover triggered for server {}", event.server_name);
        let plain = format!(
            "A failover for server {} was triggered at {} after repeated \
             connection failures. Verify the server once the failover completes.",
            event.server_name, timestamp
        );
        let html = format!(
            "<html><body><p>A failover for server <b>{}</b> was triggered at \
             {} after repeated connection failures.</p>\
             <p>Verify the server once the failover completes.</p></body></html>",
            event.server_name, timestamp
        );

        let url = format!("{}/emails:send?api-version=2023-03-31", dest.endpoint);
        let body = json!({
            "senderAddress": dest.sender_address,
            "recipients": { "to": [ { "address": dest.recipient_address } ] },
            "content": {
                "subject": subject,
                "plainText": plain,
                "html": html,
            },
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(&dest.access_key)
            .timeout(SEND_TIMEOUT)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(NotifyOutcome::Sent)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(NotifyError::Rejected {
                status: status.as_u16(),
                body,
            })
        }
    }
}

/// Split an `endpoint=...;accesskey=...` connection string.
fn parse_connection_string(raw: &str) -> Result<(String, String), NotifyError> {
    let mut endpoint = None;
    let mut access_key = None;

    for part in raw.split(';').filter(|p| !p.is_empty()) {
        let Some((key, value)) = part.split_once('=') else {
            return Err(NotifyError::InvalidConnectionString(
                "expected key=value pairs separated by ';'".into(),
            ));
        };
        match key.to_ascii_lowercase().as_str() {
            "endpoint" => {
                let parsed = url::Url::parse(value).map_err(|e| {
                    NotifyError::InvalidConnectionString(format!("bad endpoint: {}", e))
                })?;
                endpoint = Some(parsed.as_str().trim_end_matches('/').to_string());
            }
            "accesskey" => access_key = Some(value.to_string()),
            _ => {}
        }
    }

    match (endpoint, access_key) {
        (Some(endpoint), Some(access_key)) => Ok((endpoint, access_key)),
        _ => Err(NotifyError::InvalidConnectionString(
            "missing endpoint or accesskey".into(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unconfigured_notifier_is_a_noop() {
        let notifier = EmailNotifier::new(None).unwrap();
        assert!(!notifier.is_configured());

        let event = EscalationEvent::new("prod-db");
        let outcome = notifier.notify(&event).await.unwrap();
        assert_eq!(outcome, NotifyOutcome::NotConfigured);
    }

    #[test]
    fn parses_connection_string() {
        let (endpoint, key) =
            parse_connection_string("endpoint=https://n.example.com/;accesskey=s3cret").unwrap();
        assert_eq!(endpoint, "https://n.example.com");
        assert_eq!(key, "s3cret");
    }

    #[test]
    fn connection_string_keys_are_case_insensitive() {
        let (endpoint, key) =
            parse_connection_string("Endpoint=https://n.example.com;AccessKey=k").unwrap();
        assert_eq!(endpoint, "https://n.example.com");
        assert_eq!(key, "k");
    }

    #[test]
    fn rejects_malformed_connection_string() {
        assert!(parse_connection_string("endpoint-only").is_err());
        assert!(parse_connection_string("endpoint=https://n.example.com").is_err());
        let err = EmailNotifier::new(Some(NotifySettings {
            connection_string: "accesskey=k".into(),
            sender_address: "a@example.com".into(),
            recipient_address: "b@example.com".into(),
        }));
        assert!(err.is_err());
    }
}
