//! Alert messages sent to the webhook

use chrono::{DateTime, Local};
use serde::Serialize;

/// Reason attached to alerts for volumes above the usage threshold
pub const HIGH_DISK_USAGE_REASON: &str = "High disk usage";

/// Timestamp layout used in alert text
pub const ALERT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// An alert about a single volume
#[derive(Debug, Clone)]
pub struct AlertMessage {
    pub volume: String,
    pub reason: String,
    pub details: String,
    pub timestamp: DateTime<Local>,
}

/// JSON body posted to the webhook
#[derive(Debug, Serialize)]
pub struct WebhookPayload {
    pub content: String,
}

impl AlertMessage {
    pub fn new(
        volume: impl Into<String>,
        reason: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            volume: volume.into(),
            reason: reason.into(),
            details: details.into(),
            timestamp: Local::now(),
        }
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Local>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Render the alert as the webhook message text
    pub fn render(&self) -> String {
        format!(
            "🚨 Alert for volume {}\nReason: {}\nDetails: {}\nTime: {}",
            self.volume,
            self.reason,
            self.details,
            self.timestamp.format(ALERT_TIME_FORMAT)
        )
    }

    pub fn to_payload(&self) -> WebhookPayload {
        WebhookPayload {
            content: self.render(),
        }
    }
}

/// Details text for a high usage alert
pub fn high_usage_details(usage_gib: f64) -> String {
    format!("Current usage: {:.2} GB", usage_gib)
}
