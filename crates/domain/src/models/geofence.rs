//! Geofence domain model.

use geo::Point;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::DomainError;

/// A named circular region used as an enter/exit trigger boundary.
///
/// The definition is immutable once stored; only `enabled` is toggled in
/// place through the region store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Geofence {
    #[validate(length(min = 1, message = "Id must not be empty"))]
    pub id: String,

    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: String,

    #[validate(custom(function = "shared::validation::validate_latitude"))]
    pub latitude: f64,

    #[validate(custom(function = "shared::validation::validate_longitude"))]
    pub longitude: f64,

    #[validate(custom(function = "shared::validation::validate_radius"))]
    pub radius_meters: f64,

    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

/// Default enabled status for new geofences.
fn default_enabled() -> bool {
    true
}

impl Geofence {
    /// Creates an enabled geofence, validating every field.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        latitude: f64,
        longitude: f64,
        radius_meters: f64,
    ) -> Result<Self, DomainError> {
        let fence = Self {
            id: id.into(),
            name: name.into(),
            latitude,
            longitude,
            radius_meters,
            enabled: true,
        };
        fence.validate()?;
        Ok(fence)
    }

    /// Returns a copy with the given enabled flag.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn center(&self) -> Point<f64> {
        shared::geodesy::point(self.latitude, self.longitude)
    }

    /// Great-circle distance from the fence center to `position`, in meters.
    pub fn distance_to(&self, position: Point<f64>) -> f64 {
        shared::geodesy::haversine_distance(self.center(), position)
    }

    /// Whether the geometry can be classified at all.
    ///
    /// Fences built through [`Geofence::new`] always are; fences assembled by
    /// hand may carry NaN coordinates or a non-positive radius.
    pub fn has_valid_geometry(&self) -> bool {
        shared::geodesy::is_valid_coordinate(self.latitude, self.longitude)
            && self.radius_meters.is_finite()
            && self.radius_meters > 0.0
    }
}
