//! Domain models for the geofence monitor.

pub mod geofence;
pub mod geofence_event;
pub mod location;

pub use geofence::Geofence;
pub use geofence_event::{Containment, MonitoringState, TransitionEvent, TransitionKind};
pub use location::LocationSample;
