//! Webhook payload parsing

use crate::events::*;
use tracing::{debug, warn};

/// Parsed webhook payload
#[derive(Debug)]
pub enum WebhookPayload {
    Installation(InstallationEvent),
    CheckRun(CheckRunEvent),
    PullRequest(PullRequestEvent),
    Ping(PingEvent),
    /// Event type without a dedicated schema, decoded loosely
    Other { event_type: String, event: Event },
}

impl WebhookPayload {
    /// Parse a webhook payload from the event type and body
    pub fn parse(event_type: &str, body: &[u8]) -> Result<Self, serde_json::Error> {
        debug!("Parsing webhook: {}", event_type);

        match event_type {
            "ping" => {
                let event: PingEvent = serde_json::from_slice(body)?;
                Ok(WebhookPayload::Ping(event))
            }
            "installation" => {
                let event: InstallationEvent = serde_json::from_slice(body)?;
                Ok(WebhookPayload::Installation(event))
            }
            "check_run" => {
                let event: CheckRunEvent = serde_json::from_slice(body)?;
                Ok(WebhookPayload::CheckRun(event))
            }
            "pull_request" => {
                let event: PullRequestEvent = serde_json::from_slice(body)?;
                Ok(WebhookPayload::PullRequest(event))
            }
            _ => {
                warn!("No dedicated schema for webhook event type: {}", event_type);
                let event: Event = serde_json::from_slice(body)?;
                Ok(WebhookPayload::Other {
                    event_type: event_type.to_string(),
                    event,
                })
            }
        }
    }

    /// The `X-GitHub-Event` label this payload was parsed as
    pub fn event_type(&self) -> &str {
        match self {
            WebhookPayload::Installation(_) => "installation",
            WebhookPayload::CheckRun(_) => "check_run",
            WebhookPayload::PullRequest(_) => "pull_request",
            WebhookPayload::Ping(_) => "ping",
            WebhookPayload::Other { event_type, .. } => event_type,
        }
    }
}
