use std::net::SocketAddr;

use domain::models::Geofence;
use domain::MonitorConfig;
use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub logging: LoggingConfig,
    #[serde(default)]
    pub monitor: MonitorConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub notifications: NotificationsConfig,
    /// Geofences loaded into the region store at startup.
    #[serde(default)]
    pub fences: Vec<FenceConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    /// Whether to expose a Prometheus scrape endpoint
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_metrics_listen_addr")]
    pub listen_addr: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    /// Path of a newline-delimited JSON sample file, or "-" for stdin
    #[serde(default = "default_feed_source")]
    pub source: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DisplayConfig {
    /// Width and height of the region shown when centering on the user
    #[serde(default = "default_span_meters")]
    pub span_meters: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NotificationsConfig {
    #[serde(default = "default_notifications_enabled")]
    pub enabled: bool,
}

/// A seed geofence as written in configuration.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct FenceConfig {
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

    #[serde(default = "default_fence_enabled")]
    pub enabled: bool,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            listen_addr: default_metrics_listen_addr(),
        }
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            source: default_feed_source(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            span_meters: default_span_meters(),
        }
    }
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            enabled: default_notifications_enabled(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "pretty".to_string()
}
fn default_metrics_listen_addr() -> String {
    "127.0.0.1:9090".to_string()
}
fn default_feed_source() -> String {
    "-".to_string()
}
fn default_span_meters() -> f64 {
    1000.0
}
fn default_notifications_enabled() -> bool {
    true
}
fn default_fence_enabled() -> bool {
    true
}

/// Configuration validation error
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),

    #[error("Invalid monitor configuration: {0}")]
    Monitor(#[from] domain::DomainError),

    #[error("Invalid geofence '{id}': {source}")]
    Fence {
        id: String,
        source: validator::ValidationErrors,
    },
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Loading order (later sources override earlier):
    /// 1. config/default.toml - base configuration with defaults
    /// 2. config/local.toml - local overrides (optional, not in git)
    /// 3. Environment variables with GEOFENCE__ prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("GEOFENCE").separator("__"))
            .build()?;

        let cfg: Self = config.try_deserialize()?;
        cfg.validate()
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Ok(cfg)
    }

    /// Load configuration for testing with custom overrides.
    ///
    /// Builds the config from embedded defaults so tests do not depend on
    /// the working directory.
    #[cfg(test)]
    pub fn load_for_test(overrides: &[(&str, &str)]) -> Result<Self, config::ConfigError> {
        let defaults = r#"
            [logging]
            level = "info"
            format = "json"

            [monitor]
            accuracy_threshold_meters = 100.0
            hysteresis_min_meters = 10.0
            hysteresis_fraction = 0.05
            debounce_seconds = 5.0
            monitoring_capacity = 20

            [metrics]
            enabled = false
            listen_addr = "127.0.0.1:9090"

            [feed]
            source = "-"

            [[fences]]
            id = "1"
            name = "Mumbai"
            latitude = 19.0176147
            longitude = 72.8561644
            radius_meters = 200.0

            [[fences]]
            id = "4"
            name = "Paris"
            latitude = 48.856788
            longitude = 2.351077
            radius_meters = 400.0
            enabled = false
        "#;

        let mut builder = config::Config::builder()
            .add_source(config::File::from_str(defaults, config::FileFormat::Toml));

        for (key, value) in overrides {
            builder = builder.set_override(*key, *value)?;
        }

        let cfg: Self = builder.build()?.try_deserialize()?;
        // Skip validation in tests to allow partial configs
        Ok(cfg)
    }

    /// Validate configuration values.
    fn validate(&self) -> Result<(), ConfigValidationError> {
        self.monitor.validate()?;

        if !matches!(self.logging.format.as_str(), "json" | "pretty") {
            return Err(ConfigValidationError::InvalidValue(format!(
                "logging.format must be \"json\" or \"pretty\", got \"{}\"",
                self.logging.format
            )));
        }

        if self.metrics.enabled && self.metrics.listen_addr.parse::<SocketAddr>().is_err() {
            return Err(ConfigValidationError::InvalidValue(format!(
                "metrics.listen_addr is not a socket address: {}",
                self.metrics.listen_addr
            )));
        }

        if !self.display.span_meters.is_finite() || self.display.span_meters <= 0.0 {
            return Err(ConfigValidationError::InvalidValue(
                "display.span_meters must be positive".to_string(),
            ));
        }

        for fence in &self.fences {
            fence.validate().map_err(|source| ConfigValidationError::Fence {
                id: fence.id.clone(),
                source,
            })?;
        }

        Ok(())
    }

    /// Seed geofences as domain models.
    ///
    /// Duplicate ids are allowed; the later entry wins when upserted.
    pub fn seed_fences(&self) -> Result<Vec<Geofence>, domain::DomainError> {
        self.fences
            .iter()
            .map(|fence| {
                Geofence::new(
                    fence.id.as_str(),
                    fence.name.as_str(),
                    fence.latitude,
                    fence.longitude,
                    fence.radius_meters,
                )
                .map(|geofence| geofence.with_enabled(fence.enabled))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_load_with_defaults() {
        let config = Config::load_for_test(&[]).expect("Failed to load config");

        assert_eq!(config.logging.level, "info");
        assert_eq!(config.monitor.monitoring_capacity, 20);
        assert_eq!(config.feed.source, "-");
        assert_eq!(config.display.span_meters, 1000.0);
        assert!(config.notifications.enabled);
        assert_eq!(config.fences.len(), 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_override() {
        let config = Config::load_for_test(&[
            ("monitor.monitoring_capacity", "5"),
            ("monitor.reevaluation_distance_meters", "750"),
            ("logging.level", "debug"),
        ])
        .expect("Failed to load config");

        assert_eq!(config.monitor.capacity(), 5);
        assert_eq!(config.monitor.reevaluation_distance_meters, Some(750.0));
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_config_validation_zero_capacity() {
        let config = Config::load_for_test(&[("monitor.monitoring_capacity", "0")])
            .expect("Failed to load config");

        let result = config.validate();
        assert!(matches!(
            result,
            Err(ConfigValidationError::Monitor(
                domain::DomainError::CapacityMisconfigured(0)
            ))
        ));
    }

    #[test]
    fn test_config_validation_bad_log_format() {
        let config = Config::load_for_test(&[("logging.format", "xml")])
            .expect("Failed to load config");

        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("logging.format"));
    }

    #[test]
    fn test_config_validation_bad_metrics_addr() {
        let config = Config::load_for_test(&[
            ("metrics.enabled", "true"),
            ("metrics.listen_addr", "not-an-address"),
        ])
        .expect("Failed to load config");

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_bad_fence() {
        let mut config = Config::load_for_test(&[]).expect("Failed to load config");
        config.fences[0].radius_meters = 0.0;

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("Invalid geofence '1'"));
    }

    #[test]
    fn test_config_validation_accepts_wide_fence() {
        let mut config = Config::load_for_test(&[]).expect("Failed to load config");
        config.fences[0].id = "x".repeat(65);
        config.fences[0].radius_meters = 60_000.0;

        assert!(config.validate().is_ok());
        let fences = config.seed_fences().unwrap();
        assert_eq!(fences[0].radius_meters, 60_000.0);
    }

    #[test]
    fn test_seed_fences_keep_enabled_flag() {
        let config = Config::load_for_test(&[]).expect("Failed to load config");
        let fences = config.seed_fences().unwrap();

        assert_eq!(fences[0].name, "Mumbai");
        assert!(fences[0].enabled);
        assert_eq!(fences[1].name, "Paris");
        assert!(!fences[1].enabled);
    }
}
