//! Capacity-bounded selection of the fences to monitor.
//!
//! Platforms cap how many regions can be monitored at once, so only the
//! nearest `capacity` enabled fences to the last known location are handed
//! to the transition engine. The selection is recomputed when the region
//! store changes or when the device has moved far enough from the point the
//! selection was computed at.

use geo::Point;
use metrics::{counter, gauge};
use tracing::info;

use crate::config::MonitorConfig;
use crate::models::Geofence;
use crate::services::region_store::RegionStore;

/// Movement threshold used when nothing is selected and none is configured.
pub const DEFAULT_REEVALUATION_DISTANCE_METERS: f64 = 500.0;

/// Picks the nearest `capacity` enabled fences to `location`.
///
/// Ties (and every fence, when the location is unknown) are ordered by id.
/// Fences whose distance cannot be computed sort last.
pub fn select_nearest(
    fences: &[Geofence],
    location: Option<Point<f64>>,
    capacity: usize,
) -> Vec<Geofence> {
    let mut candidates: Vec<(f64, &Geofence)> = fences
        .iter()
        .filter(|fence| fence.enabled)
        .map(|fence| {
            let distance = location.map_or(0.0, |at| fence.distance_to(at));
            let distance = if distance.is_nan() { f64::INFINITY } else { distance };
            (distance, fence)
        })
        .collect();

    candidates.sort_by(|(da, a), (db, b)| da.total_cmp(db).then_with(|| a.id.cmp(&b.id)));

    candidates
        .into_iter()
        .take(capacity)
        .map(|(_, fence)| fence.clone())
        .collect()
}

#[derive(Debug, Clone)]
pub struct MonitoringSetManager {
    capacity: usize,
    reevaluation_distance_meters: Option<f64>,
    selection: Vec<Geofence>,
    computed_at: Option<Point<f64>>,
    computed_revision: Option<u64>,
}

impl MonitoringSetManager {
    pub fn new(config: &MonitorConfig) -> Self {
        Self {
            capacity: config.capacity(),
            reevaluation_distance_meters: config.reevaluation_distance_meters,
            selection: Vec::new(),
            computed_at: None,
            computed_revision: None,
        }
    }

    /// Pure selection over a store snapshot; does not touch the current set.
    pub fn compute_active_set(
        &self,
        snapshot: &[Geofence],
        location: Option<Point<f64>>,
    ) -> Vec<Geofence> {
        select_nearest(snapshot, location, self.capacity)
    }

    /// The current selection, nearest first.
    pub fn active_set(&self) -> &[Geofence] {
        &self.selection
    }

    /// How far the device may move before the selection is recomputed.
    pub fn reevaluation_distance(&self) -> f64 {
        self.reevaluation_distance_meters.unwrap_or_else(|| {
            self.selection
                .first()
                .map(|nearest| nearest.radius_meters)
                .filter(|radius| radius.is_finite() && *radius > 0.0)
                .unwrap_or(DEFAULT_REEVALUATION_DISTANCE_METERS)
        })
    }

    /// Whether the store revision or the device position invalidates the selection.
    pub fn needs_refresh(&self, store_revision: u64, location: Option<Point<f64>>) -> bool {
        if self.computed_revision != Some(store_revision) {
            return true;
        }

        match (self.computed_at, location) {
            (_, None) => false,
            (None, Some(_)) => true,
            (Some(at), Some(now)) => {
                shared::geodesy::haversine_distance(at, now) > self.reevaluation_distance()
            }
        }
    }

    /// Recomputes the selection if needed. Returns true when it changed.
    pub fn refresh(&mut self, store: &RegionStore, location: Option<Point<f64>>) -> bool {
        if !self.needs_refresh(store.revision(), location) {
            return false;
        }

        let next = self.compute_active_set(&store.snapshot(), location);
        self.computed_revision = Some(store.revision());
        self.computed_at = location;
        counter!("geofence_monitoring_set_recomputed_total").increment(1);
        gauge!("geofence_active_regions").set(next.len() as f64);

        if next == self.selection {
            return false;
        }

        info!(
            active = next.len(),
            capacity = self.capacity,
            fence_ids = ?next.iter().map(|f| f.id.as_str()).collect::<Vec<_>>(),
            "Monitoring set updated"
        );
        self.selection = next;
        true
    }
}
