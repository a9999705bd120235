//! Shared utilities for the geofence monitor.
//!
//! This crate provides common functionality used across all other crates:
//! - Great-circle geometry on WGS84 coordinates
//! - Common validation logic

pub mod geodesy;
pub mod validation;
