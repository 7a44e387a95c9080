//! Coherent noise sampling for terrain and resource generation.
//!
//! A [`NoiseField`] is built from a [`SeededRng`]: it draws from the
//! generator once to seed its permutation tables and never touches the
//! generator again.

use noise::{NoiseFn, Simplex};
use terracell_core::SeededRng;

/// Configuration for multi-octave noise generation.
#[derive(Debug, Clone, PartialEq)]
pub struct NoiseConfig {
    /// Number of octaves (layers of detail)
    pub octaves: u32,
    /// Frequency multiplier between octaves
    pub lacunarity: f64,
    /// Amplitude multiplier between octaves (persistence)
    pub persistence: f64,
    /// Base frequency (scale)
    pub frequency: f64,
}

impl Default for NoiseConfig {
    /// Single octave at unit frequency; callers pre-divide coordinates by
    /// their own scale.
    fn default() -> Self {
        Self {
            octaves: 1,
            lacunarity: 2.0,
            persistence: 0.5,
            frequency: 1.0,
        }
    }
}

/// Deterministic 2D/3D noise sampler.
pub struct NoiseField {
    simplex: Simplex,
    config: NoiseConfig,
}

impl NoiseField {
    /// Build a single-octave field from the next value of `rng`.
    pub fn new(rng: &mut SeededRng) -> Self {
        Self::with_config(rng, NoiseConfig::default())
    }

    /// Build a field with explicit octave configuration.
    pub fn with_config(rng: &mut SeededRng, config: NoiseConfig) -> Self {
        Self {
            simplex: Simplex::new(rng.next_u32()),
            config,
        }
    }

    /// Sample at 2D coordinates.
    ///
    /// Returns value in range [-1.0, 1.0].
    pub fn sample_2d(&self, x: f64, z: f64) -> f64 {
        self.accumulate(|frequency| self.simplex.get([x * frequency, z * frequency]))
    }

    /// Sample at 3D coordinates.
    ///
    /// Returns value in range [-1.0, 1.0].
    pub fn sample_3d(&self, x: f64, y: f64, z: f64) -> f64 {
        self.accumulate(|frequency| {
            self.simplex
                .get([x * frequency, y * frequency, z * frequency])
        })
    }

    fn accumulate(&self, sample: impl Fn(f64) -> f64) -> f64 {
        let mut value = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = self.config.frequency;
        let mut max_value = 0.0;

        for _ in 0..self.config.octaves.max(1) {
            value += sample(frequency) * amplitude;
            max_value += amplitude;

            amplitude *= self.config.persistence;
            frequency *= self.config.lacunarity;
        }

        // Normalize to [-1.0, 1.0]
        (value / max_value).clamp(-1.0, 1.0)
    }
}
