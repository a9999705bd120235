//! Geofence transition events and per-fence monitoring state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Direction of a boundary crossing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionKind {
    Entered,
    Exited,
}

impl TransitionKind {
    /// Convert to string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Entered => "entered",
            Self::Exited => "exited",
        }
    }
}

impl std::fmt::Display for TransitionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A containment change for one fence, produced by a single location sample.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionEvent {
    pub fence_id: String,
    pub kind: TransitionKind,
    pub at: DateTime<Utc>,
}

/// Whether the device is known to be inside a fence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Containment {
    /// No sufficiently accurate sample has been classified yet.
    #[default]
    Unknown,
    Inside,
    Outside,
}

impl Containment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Inside => "inside",
            Self::Outside => "outside",
        }
    }

    /// The event a change from `self` to `next` produces, if any.
    ///
    /// Leaving `Unknown` for `Outside` is silent: a device is never told it
    /// left a region it was never seen inside.
    pub fn transition_to(self, next: Containment) -> Option<TransitionKind> {
        match (self, next) {
            (Self::Unknown | Self::Outside, Self::Inside) => Some(TransitionKind::Entered),
            (Self::Inside, Self::Outside) => Some(TransitionKind::Exited),
            _ => None,
        }
    }
}

impl std::fmt::Display for Containment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Per-fence state owned by the transition engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitoringState {
    pub fence_id: String,
    pub containment: Containment,
    /// Time of the last emitted (not debounced) transition.
    pub last_transition_at: Option<DateTime<Utc>>,
}

impl MonitoringState {
    pub fn new(fence_id: impl Into<String>) -> Self {
        Self {
            fence_id: fence_id.into(),
            containment: Containment::Unknown,
            last_transition_at: None,
        }
    }
}
