//! Seeded pseudorandom source.
//!
//! Every world and chunk owns its own generator. There is no shared global
//! state, so two generators built from the same seed always replay the same
//! sequence regardless of what else has been drawn elsewhere.

use rand::{rngs::StdRng, Rng, RngCore, SeedableRng};

/// Deterministic pseudorandom generator parameterized by an integer seed.
#[derive(Debug, Clone)]
pub struct SeededRng {
    seed: u64,
    inner: StdRng,
}

impl SeededRng {
    /// Create a generator positioned at the start of the sequence for `seed`.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            inner: StdRng::seed_from_u64(seed),
        }
    }

    /// Seed this generator was created from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Next value in `[0, 1)`.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> f64 {
        self.inner.gen::<f64>()
    }

    /// Next raw 32-bit value, used to seed derived tables.
    pub fn next_u32(&mut self) -> u32 {
        self.inner.next_u32()
    }
}
