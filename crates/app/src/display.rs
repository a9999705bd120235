//! Console map display.
//!
//! Stands in for a map view: it turns the region store and the active
//! monitoring set into pins and radius overlays and logs them. It never
//! feeds anything back into the monitor.

use std::collections::BTreeSet;

use domain::models::Geofence;
use geo::Point;
use tracing::info;

#[derive(Debug, Clone, PartialEq)]
pub struct Pin {
    pub fence_id: String,
    pub title: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Whether the fence is in the active monitoring set.
    pub monitored: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CircleOverlay {
    pub fence_id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub radius_meters: f64,
}

/// Visible region of the map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub latitude: f64,
    pub longitude: f64,
    pub span_meters: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapFrame {
    pub pins: Vec<Pin>,
    pub overlays: Vec<CircleOverlay>,
}

/// Builds a frame: one pin per stored fence, overlays for enabled fences only.
pub fn build_frame(stored: &[Geofence], active: &[Geofence]) -> MapFrame {
    let monitored: BTreeSet<&str> = active.iter().map(|f| f.id.as_str()).collect();

    let pins = stored
        .iter()
        .map(|fence| Pin {
            fence_id: fence.id.clone(),
            title: fence.name.clone(),
            latitude: fence.latitude,
            longitude: fence.longitude,
            monitored: monitored.contains(fence.id.as_str()),
        })
        .collect();

    let overlays = stored
        .iter()
        .filter(|fence| fence.enabled)
        .map(|fence| CircleOverlay {
            fence_id: fence.id.clone(),
            latitude: fence.latitude,
            longitude: fence.longitude,
            radius_meters: fence.radius_meters,
        })
        .collect();

    MapFrame { pins, overlays }
}

#[derive(Debug, Clone)]
pub struct ConsoleMapDisplay {
    span_meters: f64,
    viewport: Option<Viewport>,
    last_frame: Option<MapFrame>,
}

impl ConsoleMapDisplay {
    pub fn new(span_meters: f64) -> Self {
        Self {
            span_meters,
            viewport: None,
            last_frame: None,
        }
    }

    /// Centers on the user's location the first time one is known.
    ///
    /// Returns true only for the call that actually moved the viewport.
    pub fn center_once(&mut self, location: Point<f64>) -> bool {
        if self.viewport.is_some() {
            return false;
        }

        let viewport = Viewport {
            latitude: location.y(),
            longitude: location.x(),
            span_meters: self.span_meters,
        };
        info!(
            latitude = viewport.latitude,
            longitude = viewport.longitude,
            span_meters = viewport.span_meters,
            "Centering map on user location"
        );
        self.viewport = Some(viewport);
        true
    }

    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    /// Renders the frame if it differs from the last one. Returns true if drawn.
    pub fn render(&mut self, stored: &[Geofence], active: &[Geofence]) -> bool {
        let frame = build_frame(stored, active);
        if self.last_frame.as_ref() == Some(&frame) {
            return false;
        }

        for pin in &frame.pins {
            info!(
                fence_id = %pin.fence_id,
                title = %pin.title,
                latitude = pin.latitude,
                longitude = pin.longitude,
                monitored = pin.monitored,
                "Pin"
            );
        }
        info!(
            pins = frame.pins.len(),
            overlays = frame.overlays.len(),
            monitored = active.len(),
            "Map rendered"
        );

        self.last_frame = Some(frame);
        true
    }
}
