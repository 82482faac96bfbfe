//! Volume scan loop

use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use super::disk::DiskUsage;
use crate::config::Settings;
use crate::models::{
    high_usage_details, MonitorError, MonitorResult, UsageSample, Volume,
    HIGH_DISK_USAGE_REASON, RESERVED_VOLUME_NAME,
};
use crate::notify::WebhookNotifier;

/// Outcome of a single scan cycle
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanReport {
    /// Volumes whose usage was measured
    pub volumes_scanned: usize,
    /// Volumes skipped because measurement failed
    pub sample_failures: usize,
    /// Samples above the usage threshold
    pub alerts_triggered: usize,
    /// Alerts that could not be delivered
    pub alert_failures: usize,
}

/// Periodically measures every volume under the monitored root
pub struct VolumeMonitor {
    settings: Arc<Settings>,
    sampler: Box<dyn DiskUsage>,
    notifier: WebhookNotifier,
}

impl VolumeMonitor {
    pub fn new(
        settings: Arc<Settings>,
        sampler: Box<dyn DiskUsage>,
        notifier: WebhookNotifier,
    ) -> Self {
        VolumeMonitor {
            settings,
            sampler,
            notifier,
        }
    }

    /// List the volumes under the monitored root
    ///
    /// Only directories count; the reserved `.sftp` entry is always skipped.
    /// Symlinks are not followed. Results are sorted by name.
    pub async fn list_volumes(&self) -> MonitorResult<Vec<Volume>> {
        list_volumes(&self.settings.containers_path()).await
    }

    /// Run one scan cycle
    pub async fn scan_once(&self) -> ScanReport {
        let mut report = ScanReport::default();

        let volumes = match self.list_volumes().await {
            Ok(volumes) => volumes,
            Err(e) => {
                error!("Error reading directory: {}", e);
                return report;
            }
        };

        for volume in volumes {
            let bytes = match self.sampler.measure(&volume.path).await {
                Ok(bytes) => bytes,
                Err(e) => {
                    warn!("Error getting disk usage for {}: {}", volume.name, e);
                    report.sample_failures += 1;
                    continue;
                }
            };

            report.volumes_scanned += 1;
            let sample = UsageSample::new(&volume.name, bytes);
            info!("Volume {}: {:.2} GB", sample.volume, sample.gib());

            if !sample.exceeds_threshold() {
                continue;
            }

            report.alerts_triggered += 1;
            if let Err(e) = self
                .notifier
                .notify(
                    &sample.volume,
                    HIGH_DISK_USAGE_REASON,
                    &high_usage_details(sample.gib()),
                )
                .await
            {
                error!("Error sending notification for {}: {}", sample.volume, e);
                report.alert_failures += 1;
            }
        }

        debug!("Scan cycle finished: {:?}", report);
        report
    }

    /// Scan on every tick of the configured interval
    ///
    /// The first scan runs one interval after start. Ticks missed while a
    /// cycle overruns are dropped. Only returns on an unusable interval.
    pub async fn run(&self) -> MonitorResult<()> {
        let period = self.settings.check_interval();
        if period.is_zero() {
            return Err(MonitorError::InvalidInterval);
        }
        let start = Instant::now()
            .checked_add(period)
            .ok_or(MonitorError::InvalidInterval)?;

        let mut interval = time::interval_at(start, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            interval.tick().await;
            self.scan_once().await;
        }
    }
}

/// List volume directories under `root`
pub async fn list_volumes(root: &Path) -> MonitorResult<Vec<Volume>> {
    let mut entries = tokio::fs::read_dir(root)
        .await
        .map_err(|e| MonitorError::io(root, e))?;

    let mut volumes = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| MonitorError::io(root, e))?
    {
        let name = entry.file_name().to_string_lossy().into_owned();
        if name == RESERVED_VOLUME_NAME {
            continue;
        }

        match entry.file_type().await {
            Ok(file_type) if file_type.is_dir() => volumes.push(Volume::new(root, name)),
            Ok(_) => {}
            Err(e) => debug!("Skipping {}: {}", entry.path().display(), e),
        }
    }

    volumes.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(volumes)
}

impl std::fmt::Debug for VolumeMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VolumeMonitor")
            .field("containers_directory", &self.settings.containers_directory)
            .field("sampler", &self.sampler.name())
            .field("notifier", &self.notifier)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BYTES_PER_GIB, USAGE_THRESHOLD_BYTES};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::fs;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Reports fixed sizes keyed by volume name; unknown volumes fail
    struct FixedSampler {
        sizes: HashMap<String, u64>,
        calls: Arc<AtomicUsize>,
    }

    impl FixedSampler {
        fn with(sizes: &[(&str, u64)]) -> Self {
            Self {
                sizes: sizes.iter().map(|(n, b)| (n.to_string(), *b)).collect(),
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    #[async_trait]
    impl DiskUsage for FixedSampler {
        async fn measure(&self, path: &Path) -> MonitorResult<u64> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let name = path.file_name().unwrap().to_string_lossy().to_string();
            self.sizes
                .get(&name)
                .copied()
                .ok_or_else(|| MonitorError::sampler(path, "no size"))
        }

        fn name(&self) -> &'static str {
            "fixed"
        }
    }

    fn settings_for(root: &Path, webhook: &str, interval: u64) -> Arc<Settings> {
        Arc::new(Settings {
            containers_directory: root.to_string_lossy().into_owned(),
            check_interval_in_seconds: interval,
            discord_webhook_url: webhook.to_string(),
            ..Default::default()
        })
    }

    fn volume_root(names: &[&str]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for name in names {
            fs::create_dir(dir.path().join(name)).unwrap();
        }
        dir
    }

    fn monitor(settings: Arc<Settings>, sampler: FixedSampler) -> VolumeMonitor {
        let notifier = WebhookNotifier::new(settings.discord_webhook_url.clone()).unwrap();
        VolumeMonitor::new(settings, Box::new(sampler), notifier)
    }

    #[tokio::test]
    async fn test_list_volumes_skips_files_and_sftp() {
        let dir = volume_root(&["b", "a", ".sftp"]);
        fs::write(dir.path().join("notes.txt"), b"hello").unwrap();

        let volumes = list_volumes(dir.path()).await.unwrap();
        let names: Vec<_> = volumes.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(volumes[0].path, dir.path().join("a"));
    }

    #[tokio::test]
    async fn test_list_volumes_skips_sftp_file() {
        let dir = volume_root(&["a"]);
        fs::write(dir.path().join(".sftp"), b"").unwrap();

        let volumes = list_volumes(dir.path()).await.unwrap();
        assert_eq!(volumes.len(), 1);
    }

    #[tokio::test]
    async fn test_scan_skips_cycle_when_root_missing() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings_for(&dir.path().join("missing"), "", 1);
        let sampler = FixedSampler::with(&[]);
        let calls = Arc::clone(&sampler.calls);

        let report = monitor(settings, sampler).scan_once().await;
        assert_eq!(report, ScanReport::default());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_scan_without_webhook_sends_nothing() {
        let dir = volume_root(&["a", "b"]);
        let settings = settings_for(dir.path(), "", 1);
        let sampler = FixedSampler::with(&[("a", 10 * BYTES_PER_GIB), ("b", 120 * BYTES_PER_GIB)]);

        let report = monitor(settings, sampler).scan_once().await;
        assert_eq!(report.volumes_scanned, 2);
        assert_eq!(report.alerts_triggered, 1);
        assert_eq!(report.alert_failures, 0);
    }

    #[tokio::test]
    async fn test_threshold_boundary() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&mock_server)
            .await;

        let dir = volume_root(&["at-limit", "over-limit"]);
        let settings = settings_for(dir.path(), &mock_server.uri(), 1);
        let sampler = FixedSampler::with(&[
            ("at-limit", USAGE_THRESHOLD_BYTES),
            ("over-limit", USAGE_THRESHOLD_BYTES + 1),
        ]);

        let report = monitor(settings, sampler).scan_once().await;
        assert_eq!(report.volumes_scanned, 2);
        assert_eq!(report.alerts_triggered, 1);
        assert_eq!(report.alert_failures, 0);

        let requests = mock_server.received_requests().await.unwrap();
        let body = String::from_utf8_lossy(&requests[0].body);
        assert!(body.contains("over-limit"));
    }

    #[tokio::test]
    async fn test_failed_notification_does_not_stop_scan() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(2)
            .mount(&mock_server)
            .await;

        let dir = volume_root(&["a", "b", "c"]);
        let settings = settings_for(dir.path(), &mock_server.uri(), 1);
        let sampler = FixedSampler::with(&[
            ("a", 100 * BYTES_PER_GIB),
            ("b", 200 * BYTES_PER_GIB),
            ("c", BYTES_PER_GIB),
        ]);

        let report = monitor(settings, sampler).scan_once().await;
        assert_eq!(report.volumes_scanned, 3);
        assert_eq!(report.alerts_triggered, 2);
        assert_eq!(report.alert_failures, 2);
    }

    #[tokio::test]
    async fn test_sampling_error_skips_volume() {
        let dir = volume_root(&["broken", "ok"]);
        let settings = settings_for(dir.path(), "", 1);
        let sampler = FixedSampler::with(&[("ok", 5)]);

        let report = monitor(settings, sampler).scan_once().await;
        assert_eq!(report.volumes_scanned, 1);
        assert_eq!(report.sample_failures, 1);
    }

    #[tokio::test]
    async fn test_run_rejects_zero_interval() {
        let dir = volume_root(&[]);
        let settings = settings_for(dir.path(), "", 0);

        let result = monitor(settings, FixedSampler::with(&[])).run().await;
        assert!(matches!(result, Err(MonitorError::InvalidInterval)));
    }

    #[tokio::test]
    async fn test_run_rejects_overflowing_interval() {
        let dir = volume_root(&[]);
        let settings = settings_for(dir.path(), "", u64::MAX);

        let result = monitor(settings, FixedSampler::with(&[])).run().await;
        assert!(matches!(result, Err(MonitorError::InvalidInterval)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_scans_once_per_tick() {
        let dir = volume_root(&["a"]);
        let settings = settings_for(dir.path(), "", 1);
        let sampler = FixedSampler::with(&[("a", 1)]);
        let calls = Arc::clone(&sampler.calls);
        let monitor = monitor(settings, sampler);

        let result = time::timeout(Duration::from_millis(3500), monitor.run()).await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }
}
