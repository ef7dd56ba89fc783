//! Lock-free request tallies.
//!
//! All atomics use `Relaxed` ordering: these are statistical counters, and
//! a reader may see a request's total bump without its status bump (or the
//! reverse). Nothing here is used for coordination.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Status codes that get their own bucket. Sorted, so lookups can binary search.
pub const TRACKED_STATUSES: [u16; 10] =
    [200, 400, 401, 403, 404, 500, 501, 502, 503, 504];

/// Bucket index for an allowlisted status, `None` for everything else.
#[inline]
fn slot(status: u16) -> Option<usize> {
    TRACKED_STATUSES.binary_search(&status).ok()
}

/// Total request count plus one counter per allowlisted status.
#[derive(Debug, Default)]
pub struct CounterSet {
    total: AtomicU64,
    by_status: [AtomicU64; TRACKED_STATUSES.len()],
}

impl CounterSet {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn increment_total(&self) {
        self.total.fetch_add(1, Ordering::Relaxed);
    }

    /// Bump the bucket for `status`. Codes off the allowlist are dropped.
    #[inline]
    pub fn increment_status(&self, status: u16) {
        if let Some(i) = slot(status) {
            self.by_status[i].fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn total(&self) -> u64 {
        self.total.load(Ordering::Relaxed)
    }

    /// Current count for `status`; `None` if the code has no bucket.
    pub fn status(&self, status: u16) -> Option<u64> {
        slot(status).map(|i| self.by_status[i].load(Ordering::Relaxed))
    }

    /// Every allowlisted status with its count, zeros included.
    pub fn status_counts(&self) -> BTreeMap<u16, u64> {
        TRACKED_STATUSES
            .iter()
            .zip(self.by_status.iter())
            .map(|(&code, count)| (code, count.load(Ordering::Relaxed)))
            .collect()
    }
}
