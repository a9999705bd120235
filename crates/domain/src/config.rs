//! Tunables for the transition engine and monitoring set manager.

use chrono::Duration;
use serde::Deserialize;

use crate::error::DomainError;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MonitorConfig {
    /// Samples less accurate than this are discarded.
    #[serde(default = "default_accuracy_threshold")]
    pub accuracy_threshold_meters: f64,

    /// Lower bound of the hysteresis band half-width.
    #[serde(default = "default_hysteresis_min")]
    pub hysteresis_min_meters: f64,

    /// Hysteresis half-width as a fraction of the fence radius.
    #[serde(default = "default_hysteresis_fraction")]
    pub hysteresis_fraction: f64,

    /// Minimum time between emitted events for the same fence.
    #[serde(default = "default_debounce_seconds")]
    pub debounce_seconds: f64,

    /// Maximum number of concurrently monitored fences.
    #[serde(default = "default_monitoring_capacity")]
    pub monitoring_capacity: i64,

    /// Distance the device must move before the active set is recomputed.
    /// When unset, the radius of the nearest selected fence is used (500 m if none).
    #[serde(default)]
    pub reevaluation_distance_meters: Option<f64>,
}

fn default_accuracy_threshold() -> f64 {
    100.0
}
fn default_hysteresis_min() -> f64 {
    10.0
}
fn default_hysteresis_fraction() -> f64 {
    0.05
}
fn default_debounce_seconds() -> f64 {
    5.0
}
fn default_monitoring_capacity() -> i64 {
    20
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            accuracy_threshold_meters: default_accuracy_threshold(),
            hysteresis_min_meters: default_hysteresis_min(),
            hysteresis_fraction: default_hysteresis_fraction(),
            debounce_seconds: default_debounce_seconds(),
            monitoring_capacity: default_monitoring_capacity(),
            reevaluation_distance_meters: None,
        }
    }
}

impl MonitorConfig {
    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.monitoring_capacity <= 0 {
            return Err(DomainError::CapacityMisconfigured(self.monitoring_capacity));
        }

        let non_negative = [
            ("accuracy_threshold_meters", self.accuracy_threshold_meters),
            ("hysteresis_min_meters", self.hysteresis_min_meters),
            ("hysteresis_fraction", self.hysteresis_fraction),
            ("debounce_seconds", self.debounce_seconds),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(DomainError::InvalidConfig(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }

        if let Some(distance) = self.reevaluation_distance_meters {
            if !distance.is_finite() || distance <= 0.0 {
                return Err(DomainError::InvalidConfig(format!(
                    "reevaluation_distance_meters must be positive, got {distance}"
                )));
            }
        }

        Ok(())
    }

    /// Capacity as a count. Only meaningful after [`MonitorConfig::validate`].
    pub fn capacity(&self) -> usize {
        usize::try_from(self.monitoring_capacity).unwrap_or(0)
    }

    pub fn debounce(&self) -> Duration {
        Duration::milliseconds((self.debounce_seconds * 1000.0).round() as i64)
    }

    /// Half-width of the dead band around a fence boundary.
    pub fn hysteresis_margin(&self, radius_meters: f64) -> f64 {
        self.hysteresis_min_meters
            .max(self.hysteresis_fraction * radius_meters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MonitorConfig::default();
        assert_eq!(config.accuracy_threshold_meters, 100.0);
        assert_eq!(config.monitoring_capacity, 20);
        assert_eq!(config.debounce(), Duration::seconds(5));
        assert!(config.reevaluation_distance_meters.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_hysteresis_margin() {
        let config = MonitorConfig::default();
        // 5% of 100 m is below the 10 m floor
        assert_eq!(config.hysteresis_margin(100.0), 10.0);
        assert_eq!(config.hysteresis_margin(200.0), 10.0);
        assert_eq!(config.hysteresis_margin(400.0), 20.0);
    }

    #[test]
    fn test_zero_capacity_is_rejected() {
        let config = MonitorConfig {
            monitoring_capacity: 0,
            ..MonitorConfig::default()
        };
        assert_eq!(config.validate(), Err(DomainError::CapacityMisconfigured(0)));
    }

    #[test]
    fn test_negative_capacity_is_rejected() {
        let config = MonitorConfig {
            monitoring_capacity: -3,
            ..MonitorConfig::default()
        };
        assert_eq!(config.validate(), Err(DomainError::CapacityMisconfigured(-3)));
    }

    #[test]
    fn test_negative_debounce_is_rejected() {
        let config = MonitorConfig {
            debounce_seconds: -1.0,
            ..MonitorConfig::default()
        };
        assert!(matches!(config.validate(), Err(DomainError::InvalidConfig(_))));
    }

    #[test]
    fn test_zero_reevaluation_distance_is_rejected() {
        let config = MonitorConfig {
            reevaluation_distance_meters: Some(0.0),
            ..MonitorConfig::default()
        };
        assert!(matches!(config.validate(), Err(DomainError::InvalidConfig(_))));
    }

    #[test]
    fn test_fractional_debounce() {
        let config = MonitorConfig {
            debounce_seconds: 1.5,
            ..MonitorConfig::default()
        };
        assert_eq!(config.debounce(), Duration::milliseconds(1500));
    }

    #[test]
    fn test_deserialize_partial() {
        let json = r#"{"monitoring_capacity": 2}"#;
        let config: MonitorConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.capacity(), 2);
        assert_eq!(config.hysteresis_fraction, 0.05);
    }
}
