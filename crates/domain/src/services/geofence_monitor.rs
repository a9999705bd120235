//! Composition of region store, monitoring set manager and transition engine.
//!
//! Data flows one way: the location feed calls [`GeofenceMonitor::ingest`],
//! accepted samples refresh the monitoring set and are then evaluated by the
//! transition engine, and the resulting events go to a
//! [`NotificationDispatcher`]. A map display reads
//! [`GeofenceMonitor::active_monitoring_set`].
//!
//! The monitor is a single-writer object. Callers on different threads must
//! share it behind one mutex or queue.

use geo::Point;
use metrics::counter;
use tracing::{debug, warn};

use crate::config::MonitorConfig;
use crate::error::DomainError;
use crate::models::{Containment, Geofence, LocationSample, MonitoringState, TransitionEvent};
use crate::services::monitoring_set::MonitoringSetManager;
use crate::services::notification::{NotificationDispatcher, NotificationResult};
use crate::services::region_store::RegionStore;
use crate::services::transition_engine::TransitionEngine;

#[derive(Debug, Clone)]
pub struct GeofenceMonitor {
    config: MonitorConfig,
    store: RegionStore,
    monitoring: MonitoringSetManager,
    engine: TransitionEngine,
    last_location: Option<Point<f64>>,
}

impl GeofenceMonitor {
    /// Builds an empty monitor. Fails if the configuration is invalid.
    pub fn new(config: MonitorConfig) -> Result<Self, DomainError> {
        config.validate()?;

        Ok(Self {
            monitoring: MonitoringSetManager::new(&config),
            engine: TransitionEngine::new(config.clone()),
            store: RegionStore::new(),
            last_location: None,
            config,
        })
    }

    /// Builds a monitor seeded with `fences`.
    pub fn with_fences(
        config: MonitorConfig,
        fences: impl IntoIterator<Item = Geofence>,
    ) -> Result<Self, DomainError> {
        let mut monitor = Self::new(config)?;
        for fence in fences {
            monitor.store.upsert(fence);
        }
        monitor.refresh_monitoring();
        Ok(monitor)
    }

    /// Inserts or replaces a fence by id.
    pub fn upsert_fence(&mut self, fence: Geofence) {
        self.store.upsert(fence);
        self.refresh_monitoring();
    }

    /// Removes a fence. Returns false if the id is unknown.
    pub fn remove_fence(&mut self, id: &str) -> bool {
        let removed = self.store.remove(id);
        self.refresh_monitoring();
        removed
    }

    /// Enables or disables a fence. Returns false if the id is unknown.
    pub fn set_fence_enabled(&mut self, id: &str, enabled: bool) -> bool {
        let found = self.store.set_enabled(id, enabled);
        self.refresh_monitoring();
        found
    }

    pub fn fence(&self, id: &str) -> Option<Geofence> {
        self.store.get(id)
    }

    /// Copy of every stored fence, ordered by id.
    pub fn region_snapshot(&self) -> Vec<Geofence> {
        self.store.snapshot()
    }

    /// Copy of the fences currently evaluated against samples, nearest first.
    pub fn active_monitoring_set(&self) -> Vec<Geofence> {
        self.monitoring.active_set().to_vec()
    }

    /// Selection the current store and last known location would produce.
    ///
    /// Does not change what is being monitored.
    pub fn compute_active_set(&self) -> Vec<Geofence> {
        self.monitoring
            .compute_active_set(&self.store.snapshot(), self.last_location)
    }

    /// Containment of a monitored fence; `None` if it is not monitored.
    pub fn containment(&self, fence_id: &str) -> Option<Containment> {
        self.engine.containment(fence_id)
    }

    pub fn monitoring_state(&self, fence_id: &str) -> Option<MonitoringState> {
        self.engine.state(fence_id).cloned()
    }

    /// Position of the last accepted sample.
    pub fn last_known_location(&self) -> Option<Point<f64>> {
        self.last_location
    }

    /// Feeds one location sample and returns the transitions it caused.
    ///
    /// Malformed samples are rejected with [`DomainError::InvalidSample`].
    /// Samples less accurate than the configured threshold are discarded and
    /// yield no events. Neither changes any state.
    pub fn ingest(&mut self, sample: &LocationSample) -> Result<Vec<TransitionEvent>, DomainError> {
        if let Err(err) = sample.validate() {
            warn!(error = %err, "Rejecting location sample");
            counter!("geofence_samples_total", "outcome" => "invalid").increment(1);
            return Err(err);
        }

        if !sample.is_accurate_within(self.config.accuracy_threshold_meters) {
            debug!(
                accuracy = ?sample.horizontal_accuracy_meters,
                threshold = self.config.accuracy_threshold_meters,
                "Discarding inaccurate location sample"
            );
            counter!("geofence_samples_total", "outcome" => "inaccurate").increment(1);
            return Ok(Vec::new());
        }

        counter!("geofence_samples_total", "outcome" => "accepted").increment(1);
        self.last_location = Some(sample.position());
        self.refresh_monitoring();

        Ok(self.engine.evaluate(sample, self.monitoring.active_set()))
    }

    /// Like [`GeofenceMonitor::ingest`], then notifies `dispatcher` of each event.
    ///
    /// Delivery failures are logged and never roll back engine state.
    pub fn ingest_and_notify(
        &mut self,
        sample: &LocationSample,
        dispatcher: &dyn NotificationDispatcher,
    ) -> Result<Vec<TransitionEvent>, DomainError> {
        let events = self.ingest(sample)?;

        for event in &events {
            let fence_name = self
                .monitoring
                .active_set()
                .iter()
                .find(|fence| fence.id == event.fence_id)
                .map(|fence| fence.name.as_str())
                .unwrap_or(event.fence_id.as_str());

            match dispatcher.notify(&event.fence_id, fence_name, event.kind) {
                NotificationResult::Delivered | NotificationResult::Skipped => {}
                NotificationResult::Failed(reason) => {
                    warn!(
                        fence_id = %event.fence_id,
                        kind = %event.kind,
                        reason = %reason,
                        "Failed to deliver geofence notification"
                    );
                }
            }
        }

        Ok(events)
    }

    fn refresh_monitoring(&mut self) {
        if self.monitoring.refresh(&self.store, self.last_location) {
            self.engine
                .sync_active_set(self.monitoring.active_set().iter().map(|f| f.id.as_str()));
        }
    }
}
