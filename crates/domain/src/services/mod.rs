//! Domain services for the geofence monitor.
//!
//! Services contain the logic that operates on domain models.

pub mod geofence_monitor;
pub mod monitoring_set;
pub mod notification;
pub mod region_store;
pub mod transition_engine;

pub use geofence_monitor::GeofenceMonitor;
pub use monitoring_set::{
    select_nearest, MonitoringSetManager, DEFAULT_REEVALUATION_DISTANCE_METERS,
};
pub use notification::{
    GeofenceNotification, LogNotificationDispatcher, NotificationContent, NotificationDispatcher,
    NotificationResult, RecordingDispatcher,
};
pub use region_store::RegionStore;
pub use transition_engine::TransitionEngine;
