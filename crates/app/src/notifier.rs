//! Console notification delivery.

use domain::models::TransitionKind;
use domain::services::{GeofenceNotification, NotificationDispatcher, NotificationResult};
use tracing::info;

/// Prints each notification as one JSON line on stdout.
#[derive(Debug, Clone)]
pub struct ConsoleNotifier {
    enabled: bool,
}

impl ConsoleNotifier {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

impl NotificationDispatcher for ConsoleNotifier {
    fn notify(&self, fence_id: &str, fence_name: &str, kind: TransitionKind) -> NotificationResult {
        if !self.enabled {
            return NotificationResult::Skipped;
        }

        let notification = GeofenceNotification::new(fence_id, fence_name, kind);
        let line = match serde_json::to_string(&notification) {
            Ok(line) => line,
            Err(err) => return NotificationResult::Failed(err.to_string()),
        };

        info!(
            notification_id = %notification.notification_id,
            fence_id = %fence_id,
            kind = %kind,
            "Delivering notification"
        );
        println!("{line}");

        NotificationResult::Delivered
    }
}
