pub mod collector;
pub mod counters;
pub mod percentiles;
pub mod ring_buffer;
pub mod sampling;
pub mod stream;

pub use collector::{Metrics, MetricsOptions, DEFAULT_CAPACITY, DEFAULT_SAMPLING_FACTOR};
pub use counters::{CounterSet, TRACKED_STATUSES};
pub use percentiles::{
    percentile, Aggregator, Data, PercentiledTime, RequestData, ResponseData, DEFAULT_RANKS,
};
pub use ring_buffer::LatencyRingBuffer;
pub use sampling::SamplingPolicy;
