//! Server configuration loaded from environment variables.
//!
//! Every variable is optional. A variable that is set but does not parse
//! fails startup instead of falling back to its default.

use anyhow::{anyhow, Context, Result};
use std::time::Duration;

use crate::metrics::MetricsOptions;

pub const BIND_ADDR_VAR: &str = "HTTPSTATS_BIND_ADDR";
pub const CAPACITY_VAR: &str = "HTTPSTATS_CAPACITY";
pub const SAMPLING_FACTOR_VAR: &str = "HTTPSTATS_SAMPLING_FACTOR";
pub const STREAM_INTERVAL_VAR: &str = "HTTPSTATS_STREAM_INTERVAL_MS";

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:9999";
const DEFAULT_STREAM_INTERVAL_MS: u64 = 1000;

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// Listen address for the demo server.
    pub bind_addr: String,

    /// Capacity and sampling factor for the measured handler.
    pub metrics: MetricsOptions,

    /// Tick of the `/stats/stream` SSE feed.
    pub stream_interval: Duration,
}

impl ServerConfig {
    /// Loads and validates configuration from the process environment.
    ///
    /// # Errors
    /// Returns an error naming the variable if a value does not parse, or
    /// the `ConfigError` if capacity / sampling factor are out of range.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ServerConfig::from_env`] with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = MetricsOptions::default();

        let bind_addr = lookup(BIND_ADDR_VAR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let capacity = parse_var(&lookup, CAPACITY_VAR)?.unwrap_or(defaults.capacity);
        let sampling_factor =
            parse_var(&lookup, SAMPLING_FACTOR_VAR)?.unwrap_or(defaults.sampling_factor);
        let interval_ms =
            parse_var(&lookup, STREAM_INTERVAL_VAR)?.unwrap_or(DEFAULT_STREAM_INTERVAL_MS);

        if interval_ms == 0 {
            return Err(anyhow!("{STREAM_INTERVAL_VAR} must be greater than 0"));
        }

        let metrics = MetricsOptions {
            capacity,
            sampling_factor,
        };
        metrics.validate()?;

        Ok(Self {
            bind_addr,
            metrics,
            stream_interval: Duration::from_millis(interval_ms),
        })
    }
}

/// `Ok(None)` when unset, an error naming `key` when set but unparsable.
fn parse_var<F, T>(lookup: &F, key: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .with_context(|| format!("invalid value {raw:?} for {key}"))
        })
        .transpose()
}
