use std::ops::RangeBounds;

use rand::RngCore;

/// Seeded pseudo-random source shared by every stochastic step of the simulation.
/// 
/// Wraps a `fastrand::Rng` and exposes it through `rand::RngCore`, so that `rand_distr`
/// distributions (`Normal`, `Poisson`) can be sampled from the very same stream.
/// 
/// Parallel work must never share a `SimRng`: draw one seed per task with [`SimRng::derive_seeds`]
/// (in a fixed order), and let each task build its own generator with [`SimRng::with_seed`].
#[derive(Debug, Clone)]
pub struct SimRng(fastrand::Rng);

impl SimRng {
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self(fastrand::Rng::with_seed(seed))
    }

    /// Uniform float within `[0, 1)`
    pub fn f64(&mut self) -> f64 {
        self.0.f64()
    }

    pub fn bool(&mut self) -> bool {
        self.0.bool()
    }

    pub fn usize(&mut self, range: impl RangeBounds<usize>) -> usize {
        self.0.usize(range)
    }

    pub fn u64(&mut self, range: impl RangeBounds<u64>) -> u64 {
        self.0.u64(range)
    }

    /// Bernoulli trial. A probability of zero never consumes a draw.
    pub fn chance(&mut self, probability: f64) -> bool {
        probability > 0.0 && self.0.f64() < probability
    }

    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        self.0.shuffle(slice);
    }

    /// Draw `n` independent seeds from this stream, e.g. one per parallel trial.
    pub fn derive_seeds(&mut self, n: usize) -> Vec<u64> {
        (0..n).map(|_| self.0.u64(..)).collect()
    }

    /// Spawn an independent generator, seeded from this stream.
    #[must_use]
    pub fn fork(&mut self) -> Self {
        Self::with_seed(self.0.u64(..))
    }
}

impl RngCore for SimRng {
    fn next_u32(&mut self) -> u32 {
        self.0.u32(..)
    }

    fn next_u64(&mut self) -> u64 {
        self.0.u64(..)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(8) {
            let bytes = self.0.u64(..).to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}
