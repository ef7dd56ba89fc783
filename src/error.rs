use thiserror::Error;

// ─── Construction errors ─────────────────────────────────────────

/// Rejected `MetricsOptions`. Returned before any instance exists.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("capacity must be greater than or equal to 2 (got {0})")]
    CapacityTooSmall(usize),

    #[error("sampling factor must be greater than 0 (got {0})")]
    SamplingFactorTooSmall(u32),
}

// ─── Snapshot errors ─────────────────────────────────────────────

/// Percentile computation failed. Aborts only the current snapshot.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AggregationError {
    #[error("cannot aggregate an empty latency sample")]
    EmptyInput,

    #[error("percentile rank set is empty")]
    NoRanks,

    #[error("percentile rank {0} is outside [0, 100]")]
    RankOutOfBounds(f64),
}
