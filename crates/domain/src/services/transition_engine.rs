//! Converts location samples into enter/exit transitions.
//!
//! For every monitored fence the engine keeps a [`MonitoringState`]. A sample
//! is classified against each fence with a hysteresis band around the
//! boundary, and an event is emitted only when the stored containment
//! changes and the fence is outside its debounce window.

use std::collections::{BTreeMap, BTreeSet};

use geo::Point;
use metrics::counter;
use tracing::{debug, info, warn};

use crate::config::MonitorConfig;
use crate::models::{
    Containment, Geofence, LocationSample, MonitoringState, TransitionEvent,
};

#[derive(Debug, Clone)]
pub struct TransitionEngine {
    config: MonitorConfig,
    states: BTreeMap<String, MonitoringState>,
}

impl TransitionEngine {
    pub fn new(config: MonitorConfig) -> Self {
        Self {
            config,
            states: BTreeMap::new(),
        }
    }

    /// Aligns tracked fences with the active monitoring set.
    ///
    /// Newly selected fences start in `Unknown`; fences still selected keep
    /// their state; deselected fences are dropped without emitting anything.
    pub fn sync_active_set<'a>(&mut self, fence_ids: impl IntoIterator<Item = &'a str>) {
        let selected: BTreeSet<&str> = fence_ids.into_iter().collect();

        self.states.retain(|id, _| selected.contains(id.as_str()));
        for id in selected {
            self.states
                .entry(id.to_string())
                .or_insert_with(|| MonitoringState::new(id));
        }
    }

    pub fn state(&self, fence_id: &str) -> Option<&MonitoringState> {
        self.states.get(fence_id)
    }

    pub fn containment(&self, fence_id: &str) -> Option<Containment> {
        self.states.get(fence_id).map(|state| state.containment)
    }

    /// Ids of tracked fences in ascending order.
    pub fn tracked_ids(&self) -> impl Iterator<Item = &str> {
        self.states.keys().map(String::as_str)
    }

    /// Evaluates an accepted sample against the active fences.
    ///
    /// Events come out in ascending fence id order. A fence whose geometry
    /// cannot be classified is skipped without affecting the others.
    pub fn evaluate(
        &mut self,
        sample: &LocationSample,
        fences: &[Geofence],
    ) -> Vec<TransitionEvent> {
        let position = sample.position();
        let debounce = self.config.debounce();

        let mut ordered: Vec<&Geofence> = fences.iter().filter(|f| f.enabled).collect();
        ordered.sort_by(|a, b| a.id.cmp(&b.id));

        let mut events = Vec::new();
        for fence in ordered {
            let Some(next) = classify(&self.config, fence, position) else {
                continue;
            };

            let state = self
                .states
                .entry(fence.id.clone())
                .or_insert_with(|| MonitoringState::new(fence.id.as_str()));

            let previous = state.containment;
            if previous == next {
                continue;
            }
            state.containment = next;

            let Some(kind) = previous.transition_to(next) else {
                debug!(
                    fence_id = %fence.id,
                    containment = %next,
                    "Initial containment established"
                );
                continue;
            };

            if let Some(last) = state.last_transition_at {
                if sample.timestamp - last < debounce {
                    debug!(
                        fence_id = %fence.id,
                        kind = %kind,
                        last_transition_at = %last,
                        "Transition suppressed by debounce"
                    );
                    counter!("geofence_transitions_debounced_total").increment(1);
                    continue;
                }
            }

            state.last_transition_at = Some(sample.timestamp);
            info!(
                fence_id = %fence.id,
                fence_name = %fence.name,
                kind = %kind,
                "Geofence transition"
            );
            counter!("geofence_transitions_total", "kind" => kind.as_str()).increment(1);

            events.push(TransitionEvent {
                fence_id: fence.id.clone(),
                kind,
                at: sample.timestamp,
            });
        }

        events
    }
}

/// Classifies `position` against a fence, or `None` inside the dead band.
///
/// Entry requires `distance <= radius - margin` and exit requires
/// `distance >= radius + margin`; anything in between keeps the current state.
fn classify(config: &MonitorConfig, fence: &Geofence, position: Point<f64>) -> Option<Containment> {
    if !fence.has_valid_geometry() {
        warn!(fence_id = %fence.id, "Skipping fence with invalid geometry");
        return None;
    }

    let distance = fence.distance_to(position);
    if distance.is_nan() {
        return None;
    }

    let margin = config.hysteresis_margin(fence.radius_meters);
    if distance <= fence.radius_meters - margin {
        Some(Containment::Inside)
    } else if distance >= fence.radius_meters + margin {
        Some(Containment::Outside)
    } else {
        None
    }
}
