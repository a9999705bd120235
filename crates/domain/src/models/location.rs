//! Location sample domain model.

use chrono::{DateTime, Utc};
use geo::Point;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// A single position fix delivered by the location feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationSample {
    pub latitude: f64,
    pub longitude: f64,
    /// Horizontal accuracy radius in meters; `None` when the feed did not report one.
    #[serde(alias = "accuracy")]
    pub horizontal_accuracy_meters: Option<f64>,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

impl LocationSample {
    pub fn new(latitude: f64, longitude: f64, accuracy: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            latitude,
            longitude,
            horizontal_accuracy_meters: Some(accuracy),
            timestamp,
        }
    }

    pub fn position(&self) -> Point<f64> {
        shared::geodesy::point(self.latitude, self.longitude)
    }

    /// Rejects samples that cannot be evaluated at all.
    ///
    /// A sample is malformed when its coordinates are non-finite or out of
    /// range, or when its accuracy is missing, non-finite or negative.
    pub fn validate(&self) -> Result<(), DomainError> {
        if !shared::geodesy::is_valid_coordinate(self.latitude, self.longitude) {
            return Err(DomainError::InvalidSample(format!(
                "coordinates ({}, {}) are not a valid position",
                self.latitude, self.longitude
            )));
        }

        match self.horizontal_accuracy_meters {
            None => Err(DomainError::InvalidSample(
                "horizontal accuracy is missing".to_string(),
            )),
            Some(accuracy) => shared::validation::validate_accuracy(accuracy).map_err(|_| {
                DomainError::InvalidSample(format!("horizontal accuracy {accuracy} is invalid"))
            }),
        }
    }

    /// Whether the fix is precise enough to drive transitions.
    pub fn is_accurate_within(&self, threshold_meters: f64) -> bool {
        self.horizontal_accuracy_meters
            .is_some_and(|accuracy| accuracy <= threshold_meters)
    }
}
