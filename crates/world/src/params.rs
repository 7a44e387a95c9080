//! Generation parameters and their accepted ranges.

use std::fmt;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};
use terracell_core::RegistryError;
use thiserror::Error;

/// Accepted world seeds.
pub const SEED_RANGE: RangeInclusive<u64> = 0..=10_000;
/// Accepted chunk width and height, in blocks.
pub const CHUNK_DIMENSION_RANGE: RangeInclusive<usize> = 8..=128;
/// Accepted terrain noise scale.
pub const TERRAIN_SCALE_RANGE: RangeInclusive<f32> = 10.0..=100.0;
/// Accepted terrain magnitude.
pub const TERRAIN_MAGNITUDE_RANGE: RangeInclusive<f32> = 0.0..=1.0;
/// Accepted terrain offset.
pub const TERRAIN_OFFSET_RANGE: RangeInclusive<f32> = 0.0..=1.0;

/// Errors surfaced by world configuration and edits.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WorldError {
    /// A parameter is outside its accepted range; generation did not run.
    #[error("invalid configuration: {field} = {value} (expected {expected})")]
    InvalidConfiguration {
        field: &'static str,
        value: String,
        expected: String,
    },
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

fn check<T>(field: &'static str, value: T, range: &RangeInclusive<T>) -> Result<(), WorldError>
where
    T: PartialOrd + fmt::Debug,
{
    if range.contains(&value) {
        Ok(())
    } else {
        Err(WorldError::InvalidConfiguration {
            field,
            value: format!("{value:?}"),
            expected: format!("{range:?}"),
        })
    }
}

fn clamp_f32(value: f32, range: &RangeInclusive<f32>) -> f32 {
    if value.is_nan() {
        *range.start()
    } else {
        value.clamp(*range.start(), *range.end())
    }
}

/// Horizontal (x and z) and vertical extent of every chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkSize {
    pub width: usize,
    pub height: usize,
}

impl Default for ChunkSize {
    fn default() -> Self {
        Self {
            width: 64,
            height: 32,
        }
    }
}

impl ChunkSize {
    pub const fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Total cell count per chunk.
    pub fn volume(self) -> usize {
        self.width * self.width * self.height
    }

    /// Reject dimensions outside [`CHUNK_DIMENSION_RANGE`].
    pub fn validate(&self) -> Result<(), WorldError> {
        check("chunk_size.width", self.width, &CHUNK_DIMENSION_RANGE)?;
        check("chunk_size.height", self.height, &CHUNK_DIMENSION_RANGE)
    }
}

/// Heightmap shaping parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainParams {
    /// Horizontal divisor applied before sampling height noise.
    pub scale: f32,
    /// Multiplier on the raw noise value.
    pub magnitude: f32,
    /// Base fraction of the chunk height.
    pub offset: f32,
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self {
            scale: 30.0,
            magnitude: 0.5,
            offset: 0.2,
        }
    }
}

impl TerrainParams {
    /// Reject values outside their accepted ranges.
    pub fn validate(&self) -> Result<(), WorldError> {
        check("terrain.scale", self.scale, &TERRAIN_SCALE_RANGE)?;
        check("terrain.magnitude", self.magnitude, &TERRAIN_MAGNITUDE_RANGE)?;
        check("terrain.offset", self.offset, &TERRAIN_OFFSET_RANGE)
    }
}

/// Everything needed to regenerate a world deterministically.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldParams {
    pub seed: u64,
    pub chunk_size: ChunkSize,
    pub terrain: TerrainParams,
}

impl WorldParams {
    /// Reject any value outside its accepted range.
    pub fn validate(&self) -> Result<(), WorldError> {
        check("seed", self.seed, &SEED_RANGE)?;
        self.chunk_size.validate()?;
        self.terrain.validate()
    }

    /// Copy with every value snapped into its accepted range.
    ///
    /// Editing surfaces (sliders, config files) use this before handing
    /// parameters to [`crate::World::regenerate`].
    pub fn clamped(&self) -> Self {
        let dim = |v: usize| v.clamp(*CHUNK_DIMENSION_RANGE.start(), *CHUNK_DIMENSION_RANGE.end());
        Self {
            seed: self.seed.min(*SEED_RANGE.end()),
            chunk_size: ChunkSize {
                width: dim(self.chunk_size.width),
                height: dim(self.chunk_size.height),
            },
            terrain: TerrainParams {
                scale: clamp_f32(self.terrain.scale, &TERRAIN_SCALE_RANGE),
                magnitude: clamp_f32(self.terrain.magnitude, &TERRAIN_MAGNITUDE_RANGE),
                offset: clamp_f32(self.terrain.offset, &TERRAIN_OFFSET_RANGE),
            },
        }
    }
}
