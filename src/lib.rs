//! In-process HTTP request metrics.
//!
//! [`Metrics`] counts requests per status code and keeps a fixed-size ring
//! of recent latencies; [`Metrics::snapshot`] turns both into a [`Data`]
//! aggregate with min / max / average and 90th/95th/99th percentiles.
//! The axum middleware in [`middleware::timing`] wires it to a router.

use std::sync::Arc;
use std::time::Duration;

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod server;

pub use config::ServerConfig;
pub use error::{AggregationError, ConfigError};
pub use metrics::{Aggregator, Data, Metrics, MetricsOptions, RequestData, ResponseData};

/// Shared application state available to every handler via `State<Arc<AppState>>`.
pub struct AppState {
    /// Metrics for the measured routes — middleware records, stats read.
    pub metrics: Arc<Metrics>,

    /// Tick of the SSE stats feed.
    pub stream_interval: Duration,
}

impl AppState {
    pub fn new(metrics: Arc<Metrics>, stream_interval: Duration) -> Self {
        Self {
            metrics,
            stream_interval,
        }
    }
}
