//! Prometheus metrics export.
//!
//! The domain records its counters through the `metrics` facade; this module
//! only decides whether they are exported.

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;
use tracing::info;

use crate::config::MetricsConfig;

/// Installs the Prometheus exporter when enabled. Must run inside a Tokio runtime.
pub fn init_metrics(config: &MetricsConfig) -> anyhow::Result<()> {
    if !config.enabled {
        return Ok(());
    }

    let addr: SocketAddr = config.listen_addr.parse()?;
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    info!(%addr, "Prometheus exporter listening");

    Ok(())
}
