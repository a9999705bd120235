//! Notification dispatch for geofence transitions.
//!
//! The core only knows the [`NotificationDispatcher`] seam; how a
//! notification reaches the user (local notification, log, webhook) is up to
//! the implementation.

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::TransitionKind;

const NOTIFICATION_TITLE: &str = "Hey there!";

/// User-visible text for a transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationContent {
    pub title: String,
    pub body: String,
}

impl NotificationContent {
    pub fn for_transition(fence_name: &str, kind: TransitionKind) -> Self {
        let body = match kind {
            TransitionKind::Entered => format!("Welcome to {fence_name}"),
            TransitionKind::Exited => format!("Goodbye from {fence_name}"),
        };
        Self {
            title: NOTIFICATION_TITLE.to_string(),
            body,
        }
    }
}

/// A rendered notification ready for delivery.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeofenceNotification {
    pub notification_id: Uuid,
    pub fence_id: String,
    pub fence_name: String,
    pub kind: TransitionKind,
    #[serde(flatten)]
    pub content: NotificationContent,
    pub created_at: DateTime<Utc>,
}

impl GeofenceNotification {
    pub fn new(fence_id: &str, fence_name: &str, kind: TransitionKind) -> Self {
        Self {
            notification_id: Uuid::new_v4(),
            fence_id: fence_id.to_string(),
            fence_name: fence_name.to_string(),
            kind,
            content: NotificationContent::for_transition(fence_name, kind),
            created_at: Utc::now(),
        }
    }
}

/// Result of a notification delivery attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationResult {
    /// Notification was handed to the delivery mechanism.
    Delivered,
    /// Delivery failed; the engine state is unaffected.
    Failed(String),
    /// Delivery was intentionally skipped (e.g. notifications muted).
    Skipped,
}

/// Receives transitions and renders them as user-visible notifications.
///
/// Called synchronously from the single thread that drives the monitor, so
/// implementations must not block for long.
pub trait NotificationDispatcher: Send + Sync {
    fn notify(&self, fence_id: &str, fence_name: &str, kind: TransitionKind) -> NotificationResult;
}

/// Dispatcher that only logs what it would deliver.
#[derive(Debug, Clone, Default)]
pub struct LogNotificationDispatcher {
    /// Whether to simulate failures for testing.
    pub simulate_failure: bool,
}

impl LogNotificationDispatcher {
    pub fn new() -> Self {
        Self {
            simulate_failure: false,
        }
    }

    /// Create a dispatcher that simulates failures.
    pub fn failing() -> Self {
        Self {
            simulate_failure: true,
        }
    }
}

impl NotificationDispatcher for LogNotificationDispatcher {
    fn notify(&self, fence_id: &str, fence_name: &str, kind: TransitionKind) -> NotificationResult {
        if self.simulate_failure {
            tracing::warn!(
                fence_id = %fence_id,
                kind = %kind,
                "Log dispatcher simulating failure"
            );
            return NotificationResult::Failed("Simulated failure".to_string());
        }

        let notification = GeofenceNotification::new(fence_id, fence_name, kind);
        tracing::info!(
            notification_id = %notification.notification_id,
            fence_id = %fence_id,
            title = %notification.content.title,
            body = %notification.content.body,
            "Would deliver geofence notification"
        );

        NotificationResult::Delivered
    }
}

/// Dispatcher that keeps every notification in memory.
#[derive(Debug, Default)]
pub struct RecordingDispatcher {
    delivered: Mutex<Vec<GeofenceNotification>>,
}

impl RecordingDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Notifications delivered so far, oldest first.
    pub fn delivered(&self) -> Vec<GeofenceNotification> {
        match self.delivered.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl NotificationDispatcher for RecordingDispatcher {
    fn notify(&self, fence_id: &str, fence_name: &str, kind: TransitionKind) -> NotificationResult {
        let notification = GeofenceNotification::new(fence_id, fence_name, kind);
        match self.delivered.lock() {
            Ok(mut guard) => guard.push(notification),
            Err(poisoned) => poisoned.into_inner().push(notification),
        }
        NotificationResult::Delivered
    }
}
