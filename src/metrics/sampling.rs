use rand::Rng;

use crate::error::ConfigError;

/// Decides per request whether its latency goes into the ring buffer.
///
/// With factor `f`, a request is kept with probability `1/f`. Counters are
/// not affected by this; the collector always bumps them.
///
/// Draws come from the calling thread's own generator (`thread_rng`), so
/// concurrent recorders never share RNG state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplingPolicy {
    factor: u32,
}

impl SamplingPolicy {
    pub fn new(factor: u32) -> Result<Self, ConfigError> {
        if factor < 1 {
            return Err(ConfigError::SamplingFactorTooSmall(factor));
        }
        Ok(Self { factor })
    }

    pub fn factor(&self) -> u32 {
        self.factor
    }

    /// Draw for the current request using the thread-local generator.
    #[inline]
    pub fn should_sample(&self) -> bool {
        // factor 1 keeps everything, skip the draw
        if self.factor == 1 {
            return true;
        }
        self.should_sample_with(&mut rand::thread_rng())
    }

    /// Draw from an explicit generator. A uniform integer in `[0, factor)`
    /// equal to zero selects the request.
    pub fn should_sample_with<R: Rng>(&self, rng: &mut R) -> bool {
        rng.gen_range(0..self.factor) == 0
    }
}

impl Default for SamplingPolicy {
    fn default() -> Self {
        Self { factor: 1 }
    }
}
