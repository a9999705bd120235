use std::sync::Arc;

use anyhow::Result;
use domain::services::GeofenceMonitor;
use tokio::sync::Mutex;
use tracing::info;

use geofence_app::{config, display, feed, logging, notifier, runner, telemetry};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = config::Config::load()?;

    logging::init_logging(&config.logging);

    info!("Starting geofence monitor v{}", env!("CARGO_PKG_VERSION"));

    telemetry::init_metrics(&config.metrics)?;

    let fences = config.seed_fences()?;
    info!(fences = fences.len(), "Seeding region store");
    let monitor = GeofenceMonitor::with_fences(config.monitor.clone(), fences)?;
    let monitor: runner::SharedMonitor = Arc::new(Mutex::new(monitor));

    let dispatcher = notifier::ConsoleNotifier::new(config.notifications.enabled);
    let mut display = display::ConsoleMapDisplay::new(config.display.span_meters);
    let feed = feed::open(&config.feed.source).await?;
    info!(source = %config.feed.source, "Reading location feed");

    tokio::select! {
        summary = runner::run(monitor, feed, &dispatcher, &mut display) => {
            let summary = summary?;
            info!(events = summary.events, "Geofence monitor finished");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
    }

    Ok(())
}
