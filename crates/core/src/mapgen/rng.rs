//! Reseedable pseudo-random stream owned by a generation run.

use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::{Rng, SeedableRng};

/// All non-seed randomness of a run (jitter, branch rolls, shuffles, variant
/// picks) comes from one `MapRng`, reseeded at the start of every attempt.
#[derive(Clone, Debug)]
pub struct MapRng {
    inner: ChaCha8Rng,
}

impl MapRng {
    pub fn new(seed: u64) -> Self {
        Self { inner: ChaCha8Rng::seed_from_u64(seed) }
    }

    pub fn reseed(&mut self, seed: u64) {
        self.inner = ChaCha8Rng::seed_from_u64(seed);
    }

    /// Uniform value in `[0, 1)` with 24 bits of precision.
    pub fn unit(&mut self) -> f32 {
        (self.inner.next_u32() >> 8) as f32 * (1.0 / 16_777_216.0)
    }

    pub fn range_f32(&mut self, min: f32, max: f32) -> f32 {
        min + (max - min) * self.unit()
    }

    pub fn chance(&mut self, probability: f32) -> bool {
        self.unit() < probability
    }

    pub fn below_u64(&mut self, bound: u64) -> u64 {
        debug_assert!(bound > 0);
        self.inner.next_u64() % bound
    }

    /// Uniform value in `[min, max)`.
    pub fn range_usize(&mut self, min: usize, max: usize) -> usize {
        debug_assert!(min < max);
        min + self.below_u64((max - min) as u64) as usize
    }
}
