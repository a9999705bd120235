//! Drives the monitor from a location feed.

use std::sync::Arc;

use domain::services::{GeofenceMonitor, NotificationDispatcher};
use domain::DomainError;
use tokio::io::AsyncBufRead;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::display::ConsoleMapDisplay;
use crate::feed::LocationFeed;

/// Monitor shared between the feed task and any other caller.
///
/// The mutex is what serializes access; the monitor itself is not
/// synchronized.
pub type SharedMonitor = Arc<Mutex<GeofenceMonitor>>;

/// Counters describing one run over a feed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub samples: usize,
    pub rejected: usize,
    pub events: usize,
}

/// Feeds every sample to the monitor until the feed ends.
pub async fn run<R>(
    monitor: SharedMonitor,
    mut feed: LocationFeed<R>,
    dispatcher: &dyn NotificationDispatcher,
    display: &mut ConsoleMapDisplay,
) -> anyhow::Result<RunSummary>
where
    R: AsyncBufRead + Unpin,
{
    let mut summary = RunSummary::default();

    {
        let monitor = monitor.lock().await;
        display.render(&monitor.region_snapshot(), &monitor.active_monitoring_set());
    }

    while let Some(sample) = feed.next_sample().await? {
        summary.samples += 1;

        let mut monitor = monitor.lock().await;
        match monitor.ingest_and_notify(&sample, dispatcher) {
            Ok(events) => summary.events += events.len(),
            Err(err @ DomainError::InvalidSample(_)) => {
                summary.rejected += 1;
                warn!(error = %err, "Location sample rejected");
                continue;
            }
            Err(err) => return Err(err.into()),
        }

        if let Some(location) = monitor.last_known_location() {
            display.center_once(location);
        }
        display.render(&monitor.region_snapshot(), &monitor.active_monitoring_set());
    }

    info!(
        samples = summary.samples,
        rejected = summary.rejected,
        events = summary.events,
        skipped_lines = feed.skipped(),
        "Location feed ended"
    );

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::models::{Containment, Geofence};
    use domain::services::RecordingDispatcher;
    use domain::MonitorConfig;
    use tokio::io::BufReader;

    #[tokio::test]
    async fn test_run_counts_and_centers() {
        let monitor = GeofenceMonitor::with_fences(
            MonitorConfig::default(),
            vec![Geofence::new("1", "Mumbai", 19.0176147, 72.8561644, 200.0).unwrap()],
        )
        .unwrap();
        let monitor = Arc::new(Mutex::new(monitor));

        let mock = tokio_test::io::Builder::new()
            .read(
                b"{\"latitude\": 19.0176147, \"longitude\": 72.8561644, \"accuracy\": 5.0, \"timestamp\": \"2024-10-04T12:00:00Z\"}\n\
                  {\"latitude\": 200.0, \"longitude\": 0.0, \"accuracy\": 5.0}\n",
            )
            .build();
        let feed = LocationFeed::new(BufReader::new(mock));
        let dispatcher = RecordingDispatcher::new();
        let mut display = ConsoleMapDisplay::new(1000.0);

        let summary = run(monitor.clone(), feed, &dispatcher, &mut display)
            .await
            .unwrap();

        assert_eq!(
            summary,
            RunSummary {
                samples: 2,
                rejected: 1,
                events: 1
            }
        );
        assert!(display.viewport().is_some());
        assert_eq!(dispatcher.delivered()[0].content.body, "Welcome to Mumbai");
        assert_eq!(
            monitor.lock().await.containment("1"),
            Some(Containment::Inside)
        );
    }
}
