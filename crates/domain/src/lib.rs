//! Domain layer for the geofence monitor.
//!
//! This crate contains:
//! - Domain models (Geofence, LocationSample, TransitionEvent)
//! - The region store, transition engine and monitoring set manager
//! - Domain error types and engine configuration
//!
//! None of the types here are safe for unsynchronized concurrent use. The
//! composing application owns a single [`services::GeofenceMonitor`] and
//! serializes every caller through one queue or mutex.

pub mod config;
pub mod error;
pub mod models;
pub mod services;

pub use config::MonitorConfig;
pub use error::DomainError;
