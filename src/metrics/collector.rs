use std::time::Duration;

use parking_lot::RwLock;
use serde::Deserialize;
use tracing::{debug, warn};

use super::counters::CounterSet;
use super::percentiles::{Aggregator, Data, RequestData};
use super::ring_buffer::LatencyRingBuffer;
pub use super::ring_buffer::DEFAULT_CAPACITY;
use super::sampling::SamplingPolicy;
use crate::error::{AggregationError, ConfigError};

// ─── Configuration ───────────────────────────────────────────────

/// Sampling factor used by [`Metrics::new`]: every latency is kept.
pub const DEFAULT_SAMPLING_FACTOR: u32 = 1;

/// The two knobs of a `Metrics` instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MetricsOptions {
    /// Latency ring buffer length. Must be at least 2.
    pub capacity: usize,
    /// Keep one latency in `sampling_factor` on average. Must be at least 1.
    pub sampling_factor: u32,
}

impl MetricsOptions {
    /// Check both bounds. Out-of-range values are rejected, never clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        LatencyRingBuffer::new(self.capacity)?;
        SamplingPolicy::new(self.sampling_factor)?;
        Ok(())
    }
}

impl Default for MetricsOptions {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            sampling_factor: DEFAULT_SAMPLING_FACTOR,
        }
    }
}

// ─── Public types ────────────────────────────────────────────────

/// Thread-safe metrics engine for one measured handler.
/// The timing middleware calls `record()`, the stats endpoints call `snapshot()`.
///
/// Counters are plain atomics and never wait on the buffer lock. The ring
/// buffer sits behind a `RwLock`: `record` takes it exclusively for one
/// insert, `snapshot` takes it shared just long enough to copy the slots.
pub struct Metrics {
    counters: CounterSet,
    latencies: RwLock<LatencyRingBuffer>,
    sampling: SamplingPolicy,
}

// ─── Metrics impl ────────────────────────────────────────────────

impl Metrics {
    /// Capacity 1000, sampling factor 1.
    pub fn new() -> Self {
        Self {
            counters: CounterSet::new(),
            latencies: RwLock::new(LatencyRingBuffer::default()),
            sampling: SamplingPolicy::default(),
        }
    }

    pub fn with_options(options: MetricsOptions) -> Result<Self, ConfigError> {
        let buffer = LatencyRingBuffer::new(options.capacity)?;
        let sampling = SamplingPolicy::new(options.sampling_factor)?;

        debug!(
            capacity = options.capacity,
            sampling_factor = options.sampling_factor,
            "metrics collector created"
        );

        Ok(Self {
            counters: CounterSet::new(),
            latencies: RwLock::new(buffer),
            sampling,
        })
    }

    /// Shorthand for [`Metrics::with_options`].
    pub fn with_capacity(capacity: usize, sampling_factor: u32) -> Result<Self, ConfigError> {
        Self::with_options(MetricsOptions {
            capacity,
            sampling_factor,
        })
    }

    pub fn options(&self) -> MetricsOptions {
        MetricsOptions {
            capacity: self.latencies.read().capacity(),
            sampling_factor: self.sampling.factor(),
        }
    }

    /// Record one finished request. Never fails.
    ///
    /// Counters are bumped unconditionally; the latency reaches the buffer
    /// only if the sampling draw selects it.
    pub fn record(&self, status: u16, latency_secs: f64) {
        self.counters.increment_total();
        self.counters.increment_status(status);

        if self.sampling.should_sample() {
            self.latencies.write().insert(latency_secs);
        }
    }

    pub fn record_duration(&self, status: u16, latency: Duration) {
        self.record(status, latency.as_secs_f64());
    }

    /// Produce a fresh snapshot with the default 90/95/99 ranks.
    pub fn snapshot(&self) -> Result<Data, AggregationError> {
        self.snapshot_with(&Aggregator::default())
    }

    /// Produce a fresh snapshot with caller-chosen percentile ranks.
    ///
    /// Fails as a whole if aggregation fails; state is left untouched.
    pub fn snapshot_with(&self, aggregator: &Aggregator) -> Result<Data, AggregationError> {
        // Copy under the shared lock, aggregate after releasing it
        let values = self.latencies.read().values().to_vec();

        let response = aggregator.aggregate(&values).map_err(|e| {
            warn!(error = %e, "metrics snapshot aggregation failed");
            e
        })?;

        Ok(Data {
            request: RequestData {
                count: self.counters.total(),
                status_count: self.counters.status_counts(),
            },
            response,
        })
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
