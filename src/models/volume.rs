//! Volumes and usage samples

use chrono::{DateTime, Local};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Directory name under the monitored root that is never treated as a volume
pub const RESERVED_VOLUME_NAME: &str = ".sftp";

/// Usage above this many GiB triggers an alert
pub const USAGE_THRESHOLD_GIB: u64 = 95;

/// Bytes per GiB (binary)
pub const BYTES_PER_GIB: u64 = 1024 * 1024 * 1024;

/// Usage threshold in bytes; alerts fire strictly above it
pub const USAGE_THRESHOLD_BYTES: u64 = USAGE_THRESHOLD_GIB * BYTES_PER_GIB;

/// A workload volume discovered under the monitored root
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Volume {
    /// Directory name, used as the volume identifier
    pub name: String,
    /// Full path of the volume directory
    pub path: PathBuf,
}

impl Volume {
    pub fn new(root: &Path, name: impl Into<String>) -> Self {
        let name = name.into();
        let path = root.join(&name);
        Self { name, path }
    }
}

/// A single disk usage measurement
#[derive(Debug, Clone, Serialize)]
pub struct UsageSample {
    pub volume: String,
    pub bytes: u64,
    pub sampled_at: DateTime<Local>,
}

impl UsageSample {
    pub fn new(volume: impl Into<String>, bytes: u64) -> Self {
        Self {
            volume: volume.into(),
            bytes,
            sampled_at: Local::now(),
        }
    }

    /// Usage in GiB (1024³ bytes)
    pub fn gib(&self) -> f64 {
        bytes_to_gib(self.bytes)
    }

    /// Whether this sample is above the alert threshold
    pub fn exceeds_threshold(&self) -> bool {
        self.bytes > USAGE_THRESHOLD_BYTES
    }
}

pub fn bytes_to_gib(bytes: u64) -> f64 {
    bytes as f64 / BYTES_PER_GIB as f64
}
