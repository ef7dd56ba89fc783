use std::collections::HashMap;

use http_latency_stats::metrics::TRACKED_STATUSES;
use http_latency_stats::{ConfigError, Metrics, MetricsOptions};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const STATUS_POOL: [u16; 14] = [200, 201, 204, 301, 400, 401, 403, 404, 418, 500, 501, 502, 503, 504];

#[test]
fn counts_match_recorded_calls() {
    let mut rng = StdRng::seed_from_u64(2024);

    for capacity in [2, 7, 100] {
        let m = Metrics::with_capacity(capacity, 1).unwrap();
        let mut expected: HashMap<u16, u64> = HashMap::new();

        let calls = rng.gen_range(0..2_000);
        for _ in 0..calls {
            let code = STATUS_POOL[rng.gen_range(0..STATUS_POOL.len())];
            m.record(code, rng.gen_range(0.0..2.0));
            *expected.entry(code).or_default() += 1;
        }

        let d = m.snapshot().unwrap();
        assert_eq!(d.request.count, calls);
        for code in TRACKED_STATUSES {
            assert_eq!(
                d.request.status_count[&code],
                expected.get(&code).copied().unwrap_or(0),
                "status {code}"
            );
        }
    }
}

#[test]
fn latency_window_holds_only_the_newest_samples() {
    let capacity = 5;
    let m = Metrics::with_capacity(capacity, 1).unwrap();

    // capacity + 3 samples; the first three (100, 200, 300) must be gone
    for v in [100.0, 200.0, 300.0, 1.0, 2.0, 3.0, 4.0, 5.0] {
        m.record(200, v);
    }

    let d = m.snapshot().unwrap();
    assert_eq!(d.response.max_time, 5.0);
    assert_eq!(d.response.min_time, 1.0);
    assert!((d.response.average_time - 3.0).abs() < 1e-9);
    assert_eq!(d.response.percentiled_time.get(99.0).map(|v| v <= 5.0), Some(true));
}

#[test]
fn snapshot_twice_without_records_is_identical() {
    let m = Metrics::with_capacity(16, 1).unwrap();
    for i in 0..40 {
        m.record(if i % 3 == 0 { 502 } else { 200 }, i as f64 / 100.0);
    }

    let first = m.snapshot().unwrap();
    let second = m.snapshot().unwrap();
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn invalid_options_fail_construction() {
    assert_eq!(
        Metrics::with_options(MetricsOptions { capacity: 1, sampling_factor: 1 }).err(),
        Some(ConfigError::CapacityTooSmall(1))
    );
    assert_eq!(
        Metrics::with_options(MetricsOptions { capacity: 2, sampling_factor: 0 }).err(),
        Some(ConfigError::SamplingFactorTooSmall(0))
    );
    assert!(Metrics::with_options(MetricsOptions { capacity: 2, sampling_factor: 1 }).is_ok());
}

#[test]
fn sampled_instance_counts_every_request() {
    let m = Metrics::with_capacity(50, 8).unwrap();

    std::thread::scope(|s| {
        for _ in 0..4 {
            s.spawn(|| {
                for _ in 0..2_500 {
                    m.record(401, 0.02);
                }
            });
        }
    });

    let d = m.snapshot().unwrap();
    assert_eq!(d.request.count, 10_000);
    assert_eq!(d.request.status_count[&401], 10_000);
    // ~1250 samples kept for 50 slots: the window is full of 0.02
    assert!((d.response.average_time - 0.02).abs() < 1e-9);
}
