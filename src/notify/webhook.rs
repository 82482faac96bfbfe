//! Webhook notifier

use reqwest::StatusCode;
use tracing::debug;

use crate::models::{AlertMessage, MonitorError, MonitorResult};

/// Sends alerts to a webhook endpoint
///
/// An empty webhook URL disables delivery: every call succeeds without
/// touching the network.
#[derive(Clone)]
pub struct WebhookNotifier {
    webhook_url: String,
    http_client: reqwest::Client,
}

impl WebhookNotifier {
    /// Create a notifier for the given webhook URL
    pub fn new(webhook_url: impl Into<String>) -> MonitorResult<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(concat!("volume-monitor/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            webhook_url: webhook_url.into(),
            http_client,
        })
    }

    /// A notifier that never sends anything
    pub fn disabled() -> MonitorResult<Self> {
        Self::new("")
    }

    pub fn is_enabled(&self) -> bool {
        !self.webhook_url.is_empty()
    }

    /// Send an alert for a volume
    ///
    /// Succeeds only when the endpoint answers 204 No Content.
    pub async fn notify(&self, volume: &str, reason: &str, details: &str) -> MonitorResult<()> {
        if !self.is_enabled() {
            return Ok(());
        }

        self.send(&AlertMessage::new(volume, reason, details)).await
    }

    /// Post a prepared alert message
    pub async fn send(&self, alert: &AlertMessage) -> MonitorResult<()> {
        if !self.is_enabled() {
            return Ok(());
        }

        let response = self
            .http_client
            .post(&self.webhook_url)
            .json(&alert.to_payload())
            .send()
            .await
            .map_err(|e| MonitorError::Network(e.to_string()))?;

        let status = response.status();
        if status != StatusCode::NO_CONTENT {
            return Err(MonitorError::WebhookStatus {
                status: status.as_u16(),
            });
        }

        debug!("Alert for volume {} delivered", alert.volume);
        Ok(())
    }
}

impl std::fmt::Debug for WebhookNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookNotifier")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}
