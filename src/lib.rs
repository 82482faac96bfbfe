//! Volume Monitor - disk usage alerts for hosted workload volumes
//!
//! Periodically measures every subdirectory of a monitored root and posts
//! an alert to a webhook when one grows past a fixed threshold:
//! - JSON configuration with environment overrides
//! - Pluggable disk usage measurement (`du` or a native walk)
//! - Webhook notifications

pub mod config;
pub mod models;
pub mod notify;
pub mod resources;

// Re-export commonly used types
pub use config::{DiskUsageBackend, Settings};
pub use models::{AlertMessage, MonitorError, MonitorResult, UsageSample, Volume};
pub use notify::WebhookNotifier;
pub use resources::{DiskUsage, DuSampler, ScanReport, VolumeMonitor, WalkSampler};

/// Version of the volume monitor
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
