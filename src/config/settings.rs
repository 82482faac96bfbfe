//! Monitor configuration settings

use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::models::{MonitorError, MonitorResult};

/// Default location of the configuration file
pub const DEFAULT_CONFIG_PATH: &str = "config/config.json";

/// Prefix for environment variable overrides
pub const ENV_PREFIX: &str = "VOLUME_MONITOR";

/// Main monitor configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Root directory whose subdirectories are monitored volumes
    pub containers_directory: String,
    /// Panel base URL, normalized on load
    pub panel_url: String,
    pub admin_api_key: String,
    pub client_api_key: String,
    /// Seconds between scan cycles
    pub check_interval_in_seconds: u64,
    /// Alert destination; empty disables alerts
    pub discord_webhook_url: String,
    /// Disk usage measurement backend
    pub disk_usage_backend: DiskUsageBackend,
}

/// How volume sizes are measured
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiskUsageBackend {
    /// Shell out to `du -sb`
    #[default]
    Du,
    /// Walk the directory tree natively
    Walk,
}

impl std::fmt::Display for DiskUsageBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiskUsageBackend::Du => write!(f, "du"),
            DiskUsageBackend::Walk => write!(f, "walk"),
        }
    }
}

impl Settings {
    /// Load settings from a specific JSON file
    ///
    /// The file is required. Environment variables prefixed with
    /// `VOLUME_MONITOR_` (e.g. `VOLUME_MONITOR_DISCORD_WEBHOOK_URL`)
    /// override values from the file.
    pub fn load_from<P: AsRef<Path>>(path: P) -> MonitorResult<Self> {
        Self::load_with_env(path.as_ref(), env_overrides())
    }

    fn load_with_env(path: &Path, env: Environment) -> MonitorResult<Self> {
        let config_path = path.to_str().ok_or_else(|| {
            MonitorError::Config(format!("config path is not valid UTF-8: {}", path.display()))
        })?;

        let builder = Config::builder()
            .add_source(File::new(config_path, FileFormat::Json).required(true))
            .add_source(env);

        let settings: Settings = builder.build()?.try_deserialize()?;
        Ok(settings.normalized())
    }

    /// Parse settings from a JSON string without environment overrides
    pub fn from_json(json: &str) -> MonitorResult<Self> {
        let settings: Settings = Config::builder()
            .add_source(File::from_str(json, FileFormat::Json))
            .build()?
            .try_deserialize()?;
        Ok(settings.normalized())
    }

    fn normalized(mut self) -> Self {
        self.panel_url = normalize_panel_url(&self.panel_url);
        self
    }

    pub fn containers_path(&self) -> PathBuf {
        PathBuf::from(&self.containers_directory)
    }

    pub fn check_interval(&self) -> Duration {
        Duration::from_secs(self.check_interval_in_seconds)
    }

    pub fn alerts_enabled(&self) -> bool {
        !self.discord_webhook_url.is_empty()
    }
}

/// `VOLUME_MONITOR_<FIELD>` variables, parsed into numbers where they look like one
fn env_overrides() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .try_parsing(true)
}

/// Ensure the panel URL has a scheme and no trailing slash
pub fn normalize_panel_url(url: &str) -> String {
    let mut url = if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("http://{}", url)
    };

    if url.ends_with('/') {
        url.pop();
    }

    url
}
