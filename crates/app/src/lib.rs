pub mod config;
pub mod display;
pub mod feed;
pub mod logging;
pub mod notifier;
pub mod runner;
pub mod telemetry;
