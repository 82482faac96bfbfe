//! Disk usage measurement
//!
//! Volume sizes are measured through the [`DiskUsage`] trait so the `du`
//! based sampler can be swapped for a native walk on hosts without `du`.

use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;
use walkdir::WalkDir;

use crate::config::DiskUsageBackend;
use crate::models::{MonitorError, MonitorResult};

/// Measures the recursive byte size of a path
#[async_trait]
pub trait DiskUsage: Send + Sync {
    /// Total size in bytes of everything below `path`
    async fn measure(&self, path: &Path) -> MonitorResult<u64>;

    /// Short backend name for logging
    fn name(&self) -> &'static str;
}

/// Build the sampler for the configured backend
pub fn sampler_for(backend: DiskUsageBackend) -> Box<dyn DiskUsage> {
    match backend {
        DiskUsageBackend::Du => Box::new(DuSampler::new()),
        DiskUsageBackend::Walk => Box::new(WalkSampler),
    }
}

/// Sampler backed by `du -sb`
#[derive(Debug, Clone)]
pub struct DuSampler {
    program: String,
}

impl DuSampler {
    pub fn new() -> Self {
        Self::with_program("du")
    }

    /// Use a different `du` binary, e.g. an absolute path
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for DuSampler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DiskUsage for DuSampler {
    async fn measure(&self, path: &Path) -> MonitorResult<u64> {
        let output = Command::new(&self.program)
            .arg("-sb")
            .arg(path)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| MonitorError::sampler(path, e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(MonitorError::sampler(
                path,
                format!("{} exited with {}: {}", self.program, output.status, stderr.trim()),
            ));
        }

        parse_du_output(&String::from_utf8_lossy(&output.stdout))
    }

    fn name(&self) -> &'static str {
        "du"
    }
}

/// Parse the byte count from `du -sb` output (`<bytes>\t<path>`)
pub fn parse_du_output(output: &str) -> MonitorResult<u64> {
    let first = output
        .split_whitespace()
        .next()
        .ok_or_else(|| MonitorError::UnexpectedOutput("empty du output".to_string()))?;

    first
        .parse::<u64>()
        .map_err(|e| MonitorError::UnexpectedOutput(format!("{:?}: {}", first, e)))
}

/// Sampler that walks the directory tree and sums file sizes
#[derive(Debug, Clone, Copy, Default)]
pub struct WalkSampler;

#[async_trait]
impl DiskUsage for WalkSampler {
    async fn measure(&self, path: &Path) -> MonitorResult<u64> {
        let root = path.to_path_buf();
        tokio::task::spawn_blocking(move || walk_size(&root))
            .await
            .map_err(|e| MonitorError::sampler(path, e.to_string()))?
    }

    fn name(&self) -> &'static str {
        "walk"
    }
}

fn walk_size(root: &Path) -> MonitorResult<u64> {
    std::fs::symlink_metadata(root).map_err(|e| MonitorError::io(root, e))?;

    let mut total = 0u64;
    for entry in WalkDir::new(root).follow_links(false) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                debug!("Skipping unreadable entry under {}: {}", root.display(), e);
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        match entry.metadata() {
            Ok(metadata) => total = total.saturating_add(metadata.len()),
            Err(e) => debug!("Skipping {}: {}", entry.path().display(), e),
        }
    }

    Ok(total)
}
