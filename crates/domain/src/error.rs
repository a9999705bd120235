//! Domain error types.

use thiserror::Error;

/// Errors surfaced by the geofence core.
///
/// None of these are retried internally. `InvalidSample` is recoverable (the
/// sample is dropped); the configuration variants are fatal at startup only.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DomainError {
    #[error("Invalid location sample: {0}")]
    InvalidSample(String),

    #[error("Monitoring capacity must be positive, got {0}")]
    CapacityMisconfigured(i64),

    #[error("Invalid configuration value: {0}")]
    InvalidConfig(String),

    #[error("Invalid geofence: {0}")]
    InvalidGeofence(String),
}

impl From<validator::ValidationErrors> for DomainError {
    fn from(errors: validator::ValidationErrors) -> Self {
        DomainError::InvalidGeofence(errors.to_string())
    }
}
