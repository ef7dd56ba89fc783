use std::collections::BTreeMap;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::error::AggregationError;

/// Percentile ranks reported when nothing else is asked for.
pub const DEFAULT_RANKS: [f64; 3] = [90.0, 95.0, 99.0];

// ─── Snapshot types ──────────────────────────────────────────────

/// Point-in-time view of one `Metrics` instance.
/// Serialized straight into the `/stats` JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Data {
    pub request: RequestData,
    pub response: ResponseData,
}

/// Request tallies. All-time for the instance, never windowed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestData {
    /// Every recorded request, whatever its status.
    pub count: u64,
    /// One entry per allowlisted status, zero when unseen.
    pub status_count: BTreeMap<u16, u64>,
}

/// Latency statistics over the current ring buffer contents.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseData {
    pub max_time: f64,
    pub min_time: f64,
    /// Sum over the buffer divided by its full capacity.
    pub average_time: f64,
    pub percentiled_time: PercentiledTime,
}

/// `(rank, seconds)` pairs in the order the ranks were requested.
/// Serializes as a JSON object keyed by rank, e.g. `{"90": 0.12}`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PercentiledTime(Vec<(f64, f64)>);

impl PercentiledTime {
    pub fn get(&self, rank: f64) -> Option<f64> {
        self.0.iter().find(|(r, _)| *r == rank).map(|&(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for PercentiledTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (rank, value) in &self.0 {
            map.serialize_entry(&rank.to_string(), value)?;
        }
        map.end()
    }
}

// ─── Aggregator ──────────────────────────────────────────────────

/// Turns a fixed-length latency sample into min / max / mean / percentiles.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregator {
    ranks: Vec<f64>,
}

impl Aggregator {
    /// Ranks are checked when aggregating, not here.
    pub fn new(ranks: impl Into<Vec<f64>>) -> Self {
        Self { ranks: ranks.into() }
    }

    pub fn ranks(&self) -> &[f64] {
        &self.ranks
    }

    /// Compute the response statistics for `values`.
    ///
    /// Zero-filled slots are ordinary samples here: they count toward the
    /// minimum, the percentiles and the mean's denominator.
    pub fn aggregate(&self, values: &[f64]) -> Result<ResponseData, AggregationError> {
        if values.is_empty() {
            return Err(AggregationError::EmptyInput);
        }
        self.check_ranks()?;

        let (mut min, mut max, mut sum) = (f64::MAX, f64::MIN, 0.0_f64);
        for &v in values {
            sum += v;
            min = min.min(v);
            max = max.max(v);
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let mut percentiled = Vec::with_capacity(self.ranks.len());
        for &rank in &self.ranks {
            percentiled.push((rank, percentile(&sorted, rank)?));
        }

        Ok(ResponseData {
            max_time: max,
            min_time: min,
            average_time: sum / values.len() as f64,
            percentiled_time: PercentiledTime(percentiled),
        })
    }

    fn check_ranks(&self) -> Result<(), AggregationError> {
        if self.ranks.is_empty() {
            return Err(AggregationError::NoRanks);
        }
        match self.ranks.iter().find(|r| !(0.0..=100.0).contains(*r)) {
            Some(&bad) => Err(AggregationError::RankOutOfBounds(bad)),
            None => Ok(()),
        }
    }
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new(DEFAULT_RANKS)
    }
}

/// Linear-interpolation percentile over an ascending slice.
///
/// The rank maps onto the fractional index `rank / 100 * (n - 1)`; the
/// result interpolates between the two neighbouring samples.
pub fn percentile(sorted: &[f64], rank: f64) -> Result<f64, AggregationError> {
    if sorted.is_empty() {
        return Err(AggregationError::EmptyInput);
    }
    if !(0.0..=100.0).contains(&rank) {
        return Err(AggregationError::RankOutOfBounds(rank));
    }

    let pos = rank / 100.0 * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;

    Ok(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn percentile_interpolates_between_neighbours() {
        let sorted = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert!(approx(percentile(&sorted, 0.0).unwrap(), 1.0));
        assert!(approx(percentile(&sorted, 50.0).unwrap(), 3.0));
        assert!(approx(percentile(&sorted, 90.0).unwrap(), 4.6));
        assert!(approx(percentile(&sorted, 100.0).unwrap(), 5.0));
    }

    #[test]
    fn percentile_of_single_sample_is_that_sample() {
        assert!(approx(percentile(&[0.7], 99.0).unwrap(), 0.7));
    }

    #[test]
    fn percentile_rejects_bad_input() {
        assert_eq!(percentile(&[], 50.0), Err(AggregationError::EmptyInput));
        assert_eq!(
            percentile(&[1.0, 2.0], 100.5),
            Err(AggregationError::RankOutOfBounds(100.5))
        );
        assert!(matches!(
            percentile(&[1.0, 2.0], f64::NAN),
            Err(AggregationError::RankOutOfBounds(_))
        ));
    }

    #[test]
    fn aggregate_includes_zero_slots() {
        let stats = Aggregator::default().aggregate(&[0.4, 0.0, 0.2, 0.0]).unwrap();
        assert!(approx(stats.min_time, 0.0));
        assert!(approx(stats.max_time, 0.4));
        // divided by full length, not by the two real samples
        assert!(approx(stats.average_time, 0.15));
    }

    #[test]
    fn aggregate_uniform_buffer() {
        let stats = Aggregator::default().aggregate(&[0.25; 8]).unwrap();
        assert!(approx(stats.min_time, 0.25));
        assert!(approx(stats.max_time, 0.25));
        assert!(approx(stats.average_time, 0.25));
        for (_, v) in stats.percentiled_time.iter() {
            assert!(approx(v, 0.25));
        }
    }

    #[test]
    fn aggregate_reports_requested_ranks_in_order() {
        let values: Vec<f64> = (1..=101).map(|i| i as f64).collect();
        let stats = Aggregator::new([50.0, 99.0]).aggregate(&values).unwrap();

        let ranks: Vec<f64> = stats.percentiled_time.iter().map(|(r, _)| r).collect();
        assert_eq!(ranks, vec![50.0, 99.0]);
        assert!(approx(stats.percentiled_time.get(50.0).unwrap(), 51.0));
        assert!(approx(stats.percentiled_time.get(99.0).unwrap(), 100.0));
        assert_eq!(stats.percentiled_time.get(95.0), None);
    }

    #[test]
    fn aggregate_sorts_before_ranking() {
        let stats = Aggregator::new([100.0]).aggregate(&[3.0, 9.0, 1.0]).unwrap();
        assert!(approx(stats.percentiled_time.get(100.0).unwrap(), 9.0));
    }

    #[test]
    fn aggregate_rejects_empty_rank_set() {
        let agg = Aggregator::new(Vec::new());
        assert_eq!(agg.aggregate(&[1.0, 2.0]), Err(AggregationError::NoRanks));
    }

    #[test]
    fn aggregate_rejects_out_of_range_rank() {
        let agg = Aggregator::new([90.0, -1.0]);
        assert_eq!(
            agg.aggregate(&[1.0, 2.0]),
            Err(AggregationError::RankOutOfBounds(-1.0))
        );
    }

    #[test]
    fn aggregate_rejects_empty_input() {
        assert_eq!(
            Aggregator::default().aggregate(&[]),
            Err(AggregationError::EmptyInput)
        );
    }

    #[test]
    fn percentiled_time_serializes_as_object() {
        let stats = Aggregator::default().aggregate(&[1.0, 1.0]).unwrap();
        let json = serde_json::to_value(&stats.percentiled_time).unwrap();
        assert_eq!(json, serde_json::json!({"90": 1.0, "95": 1.0, "99": 1.0}));
    }
}
