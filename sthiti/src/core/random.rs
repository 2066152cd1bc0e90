//! Random source used by the particle filter.
//!
//! The filter only needs uniform and Gaussian draws, so it depends on the
//! [`RandomSource`] trait instead of a concrete generator. Tests can plug in
//! a scripted source; deployments use [`NoiseGenerator`].

use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand_distr::{Distribution, StandardNormal, Uniform};

/// Uniform and Gaussian draws.
pub trait RandomSource {
    /// Uniform real in `[low, high)`. Returns `low` for an empty interval.
    fn uniform(&mut self, low: f64, high: f64) -> f64;

    /// Gaussian with the given mean and standard deviation.
    fn gaussian(&mut self, mean: f32, std_dev: f32) -> f32;
}

/// Seedable noise generator backed by [`SmallRng`].
#[derive(Debug, Clone)]
pub struct NoiseGenerator {
    rng: SmallRng,
}

impl NoiseGenerator {
    /// Create a new noise generator.
    ///
    /// If seed is 0, uses random entropy for non-deterministic behavior.
    /// Otherwise, uses the provided seed for reproducible results.
    pub fn new(seed: u64) -> Self {
        let rng = if seed == 0 {
            SmallRng::from_entropy()
        } else {
            SmallRng::seed_from_u64(seed)
        };
        Self { rng }
    }
}

impl RandomSource for NoiseGenerator {
    #[inline]
    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        if !low.is_finite() || !high.is_finite() || high <= low {
            return low;
        }
        Uniform::new(low, high).sample(&mut self.rng)
    }

    #[inline]
    fn gaussian(&mut self, mean: f32, std_dev: f32) -> f32 {
        if std_dev <= 0.0 || !std_dev.is_finite() {
            return mean;
        }
        let n: f32 = StandardNormal.sample(&mut self.rng);
        mean + n * std_dev
    }
}
