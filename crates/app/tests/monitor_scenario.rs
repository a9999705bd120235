//! End-to-end scenarios through the public monitor and feed APIs.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use domain::models::{Containment, Geofence, LocationSample, TransitionKind};
use domain::services::{GeofenceMonitor, RecordingDispatcher};
use domain::{DomainError, MonitorConfig};
use geofence_app::display::ConsoleMapDisplay;
use geofence_app::feed::LocationFeed;
use geofence_app::runner;
use tokio::io::BufReader;
use tokio::sync::Mutex;

fn t0() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2024-10-04T12:00:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

fn scenario_monitor() -> GeofenceMonitor {
    GeofenceMonitor::with_fences(
        MonitorConfig::default(),
        vec![
            Geofence::new("A", "Alpha", 0.0, 0.0, 200.0).unwrap(),
            Geofence::new("B", "Bravo", 1.0, 0.0, 200.0).unwrap(),
        ],
    )
    .unwrap()
}

// ============================================================================
// Direct ingest
// ============================================================================

#[test]
fn test_enter_exit_then_inaccurate_sample() {
    let mut monitor = scenario_monitor();

    let events = monitor
        .ingest(&LocationSample::new(0.0, 0.0, 5.0, t0()))
        .unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].fence_id, "A");
    assert_eq!(events[0].kind, TransitionKind::Entered);

    let events = monitor
        .ingest(&LocationSample::new(0.0, 0.01, 5.0, t0() + Duration::seconds(6)))
        .unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].fence_id, "A");
    assert_eq!(events[0].kind, TransitionKind::Exited);

    let events = monitor
        .ingest(&LocationSample::new(0.0, 0.0, 500.0, t0() + Duration::seconds(12)))
        .unwrap();
    assert!(events.is_empty());
    assert_eq!(monitor.containment("A"), Some(Containment::Outside));
}

#[test]
fn test_repeated_sample_within_debounce_emits_once() {
    let mut monitor = scenario_monitor();
    let sample = LocationSample::new(0.0, 0.0, 5.0, t0());

    let first = monitor.ingest(&sample).unwrap();
    let state_after_first = monitor.monitoring_state("A");
    let second = monitor.ingest(&sample).unwrap();

    assert_eq!(first.len(), 1);
    assert!(second.is_empty());
    assert_eq!(monitor.monitoring_state("A"), state_after_first);
}

#[test]
fn test_capacity_two_of_four() {
    // Fences roughly 10, 50, 100 and 500 m east of the origin.
    let meters = |m: f64| m / 111_194.926_644_558_73;
    let config = MonitorConfig {
        monitoring_capacity: 2,
        ..MonitorConfig::default()
    };
    let mut monitor = GeofenceMonitor::with_fences(
        config,
        vec![
            Geofence::new("far", "Far", 0.0, meters(500.0), 20.0).unwrap(),
            Geofence::new("mid", "Mid", 0.0, meters(100.0), 20.0).unwrap(),
            Geofence::new("nearest", "Nearest", 0.0, meters(10.0), 20.0).unwrap(),
            Geofence::new("near", "Near", 0.0, meters(50.0), 20.0).unwrap(),
        ],
    )
    .unwrap();

    monitor
        .ingest(&LocationSample::new(0.0, 0.0, 5.0, t0()))
        .unwrap();

    let ids: Vec<String> = monitor
        .active_monitoring_set()
        .into_iter()
        .map(|f| f.id)
        .collect();
    assert_eq!(ids, vec!["nearest", "near"]);
}

#[test]
fn test_malformed_sample_is_typed_error() {
    let mut monitor = scenario_monitor();
    let sample = LocationSample {
        latitude: 0.0,
        longitude: f64::INFINITY,
        horizontal_accuracy_meters: Some(5.0),
        timestamp: t0(),
    };

    assert!(matches!(
        monitor.ingest(&sample),
        Err(DomainError::InvalidSample(_))
    ));
}

// ============================================================================
// Feed-driven run
// ============================================================================

#[tokio::test]
async fn test_feed_run_delivers_welcome_and_goodbye() {
    let monitor = Arc::new(Mutex::new(scenario_monitor()));
    let mock = tokio_test::io::Builder::new()
        .read(
            b"{\"latitude\": 0.0, \"longitude\": 0.0, \"accuracy\": 5.0, \"timestamp\": \"2024-10-04T12:00:00Z\"}\n\
              {\"latitude\": 0.0, \"longitude\": 0.01, \"accuracy\": 5.0, \"timestamp\": \"2024-10-04T12:00:10Z\"}\n\
              {\"latitude\": 0.0, \"longitude\": 0.0, \"accuracy\": 500.0, \"timestamp\": \"2024-10-04T12:00:20Z\"}\n",
        )
        .build();
    let feed = LocationFeed::new(BufReader::new(mock));
    let dispatcher = RecordingDispatcher::new();
    let mut display = ConsoleMapDisplay::new(1000.0);

    let summary = runner::run(monitor.clone(), feed, &dispatcher, &mut display)
        .await
        .unwrap();

    assert_eq!(summary.samples, 3);
    assert_eq!(summary.events, 2);
    assert_eq!(summary.rejected, 0);

    let bodies: Vec<String> = dispatcher
        .delivered()
        .into_iter()
        .map(|n| n.content.body)
        .collect();
    assert_eq!(bodies, vec!["Welcome to Alpha", "Goodbye from Alpha"]);

    let viewport = display.viewport().unwrap();
    assert_eq!((viewport.latitude, viewport.longitude), (0.0, 0.0));
    assert_eq!(
        monitor.lock().await.containment("A"),
        Some(Containment::Outside)
    );
}
