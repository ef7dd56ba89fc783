use crate::error::ConfigError;

/// Smallest capacity accepted by [`LatencyRingBuffer::new`].
pub const MIN_CAPACITY: usize = 2;

/// Capacity of a default-constructed buffer.
pub const DEFAULT_CAPACITY: usize = 1000;

/// Fixed-size circular buffer of the most recent latencies (seconds).
///
/// Every slot starts at `0.0`. Until the buffer has wrapped once, those
/// zero slots are part of every snapshot, so early statistics skew low.
/// Not synchronized on its own; the collector puts it behind a lock.
#[derive(Debug, Clone)]
pub struct LatencyRingBuffer {
    slots: Vec<f64>,
    cursor: usize,
}

impl LatencyRingBuffer {
    pub fn new(capacity: usize) -> Result<Self, ConfigError> {
        if capacity < MIN_CAPACITY {
            return Err(ConfigError::CapacityTooSmall(capacity));
        }

        Ok(Self {
            slots: vec![0.0; capacity],
            cursor: 0,
        })
    }

    /// Overwrite the slot under the cursor and advance it by one.
    #[inline]
    pub fn insert(&mut self, latency_secs: f64) {
        self.slots[self.cursor] = latency_secs;
        self.cursor = (self.cursor + 1) % self.slots.len();
    }

    /// All `capacity` slots in storage order, unfilled ones included.
    pub fn values(&self) -> &[f64] {
        &self.slots
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Index the next `insert` will write to. Always `< capacity`.
    pub fn cursor(&self) -> usize {
        self.cursor
    }
}

impl Default for LatencyRingBuffer {
    fn default() -> Self {
        Self {
            slots: vec![0.0; DEFAULT_CAPACITY],
            cursor: 0,
        }
    }
}
