//! Volume Monitor - Main Entry Point
//!
//! Loads configuration and runs the disk usage scan loop.

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use volume_monitor::config::{Settings, DEFAULT_CONFIG_PATH};
use volume_monitor::notify::WebhookNotifier;
use volume_monitor::resources::{sampler_for, VolumeMonitor};

#[derive(Parser)]
#[command(name = "volume-monitor")]
#[command(about = "Disk usage monitor for hosted workload volumes")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "VOLUME_MONITOR_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Run a single scan cycle, print its report as JSON and exit
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // RUST_LOG overrides; default is info for the monitor, warn for dependencies
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,volume_monitor=info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_timer(ChronoLocal::new("%H:%M:%S".to_string()))
                .with_target(false),
        )
        .init();

    let settings = match Settings::load_from(&cli.config) {
        Ok(settings) => Arc::new(settings),
        Err(e) => {
            error!("Error loading config {}: {}", cli.config.display(), e);
            std::process::exit(1);
        }
    };

    info!("Starting volume monitor v{}", volume_monitor::VERSION);
    info!("Checking directory: {}", settings.containers_directory);
    info!(
        "Interval: {}s, disk usage backend: {}, alerts: {}",
        settings.check_interval_in_seconds,
        settings.disk_usage_backend,
        if settings.alerts_enabled() { "enabled" } else { "disabled" }
    );

    let notifier = WebhookNotifier::new(settings.discord_webhook_url.clone())?;
    let sampler = sampler_for(settings.disk_usage_backend);
    let monitor = VolumeMonitor::new(Arc::clone(&settings), sampler, notifier);

    if cli.once {
        let report = monitor.scan_once().await;
        println!("{}", serde_json::to_string(&report)?);
        return Ok(());
    }

    monitor.run().await?;
    Ok(())
}
