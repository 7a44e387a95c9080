//! Chunk manager.
//!
//! Owns the fixed 3×3 cluster of chunks around the origin and maps world
//! coordinates onto them.

use std::collections::BTreeMap;
use std::sync::Arc;

use terracell_core::{BlockId, BlockRegistry, BlockType};
use tracing::{debug, info, instrument};

use crate::chunk::{BlockPos, Chunk, ChunkPos, GenerationParams};
use crate::params::{WorldError, WorldParams};

/// Chunk radius of the loaded cluster (1 => 3×3 chunks).
pub const CLUSTER_RADIUS: i32 = 1;

/// Read-only voxel lookup by world coordinate.
///
/// Physics is written against this trait so that hand-built scenes can stand
/// in for generated terrain.
pub trait BlockSource {
    /// Block id at world `(x, y, z)`, or `None` where nothing is loaded.
    fn block(&self, x: i32, y: i32, z: i32) -> Option<BlockId>;
}

/// A world coordinate split into its chunk and chunk-local parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkCoords {
    pub chunk: ChunkPos,
    pub local: BlockPos,
}

/// Split a world coordinate for chunks of the given `width`.
///
/// Uses floor division, so `local.x` and `local.z` always land in
/// `[0, width)`, including for negative inputs. `y` passes through.
pub fn world_to_chunk_coords(width: usize, x: i32, y: i32, z: i32) -> ChunkCoords {
    let width = width as i32;
    ChunkCoords {
        chunk: ChunkPos::new(x.div_euclid(width), z.div_euclid(width)),
        local: BlockPos::new(x.rem_euclid(width), y, z.rem_euclid(width)),
    }
}

/// Seeded voxel world made of independently generated chunks.
pub struct World {
    params: WorldParams,
    registry: Arc<BlockRegistry>,
    chunks: BTreeMap<ChunkPos, Chunk>,
}

impl World {
    /// Create an empty world; call [`World::generate`] to fill it.
    pub fn new(params: WorldParams, registry: Arc<BlockRegistry>) -> Result<Self, WorldError> {
        params.validate()?;
        Ok(Self {
            params,
            registry,
            chunks: BTreeMap::new(),
        })
    }

    /// Shortcut for a world over [`BlockRegistry::standard`].
    pub fn with_standard_blocks(params: WorldParams) -> Result<Self, WorldError> {
        Self::new(params, Arc::new(BlockRegistry::standard()))
    }

    pub fn params(&self) -> &WorldParams {
        &self.params
    }

    pub fn registry(&self) -> &BlockRegistry {
        &self.registry
    }

    /// Rebuild every chunk from the current parameters.
    ///
    /// The new chunk set is built completely before it replaces the old one,
    /// so readers never observe a half-generated world.
    #[instrument(skip(self), fields(seed = self.params.seed))]
    pub fn generate(&mut self) -> Result<(), WorldError> {
        self.params.validate()?;
        let chunks = self.build_chunks()?;
        self.chunks = chunks;
        info!(chunks = self.chunks.len(), "world generated");
        Ok(())
    }

    /// Adopt new parameters and regenerate.
    ///
    /// Invalid parameters are rejected before any work starts and the
    /// previous parameters and chunks stay in place.
    pub fn regenerate(&mut self, params: WorldParams) -> Result<(), WorldError> {
        params.validate()?;
        self.params = params;
        self.generate()
    }

    fn build_chunks(&self) -> Result<BTreeMap<ChunkPos, Chunk>, WorldError> {
        let params = GenerationParams {
            seed: self.params.seed,
            terrain: self.params.terrain,
        };
        let mut chunks = BTreeMap::new();
        for cx in -CLUSTER_RADIUS..=CLUSTER_RADIUS {
            for cz in -CLUSTER_RADIUS..=CLUSTER_RADIUS {
                let pos = ChunkPos::new(cx, cz);
                let mut chunk = Chunk::new(pos, self.params.chunk_size, params);
                chunk.generate(self.params.seed, &self.registry)?;
                debug!(chunk_pos = %pos, origin = %chunk.origin(), "chunk ready");
                chunks.insert(pos, chunk);
            }
        }
        Ok(chunks)
    }

    /// Drop every chunk.
    pub fn clear(&mut self) {
        self.chunks.clear();
    }

    /// Split a world coordinate into chunk and local parts.
    pub fn world_to_chunk_coords(&self, x: i32, y: i32, z: i32) -> ChunkCoords {
        world_to_chunk_coords(self.params.chunk_size.width, x, y, z)
    }

    /// Block id at a world coordinate, or `None` if no chunk covers it.
    pub fn get_block(&self, x: i32, y: i32, z: i32) -> Option<BlockId> {
        let coords = self.world_to_chunk_coords(x, y, z);
        self.chunks
            .get(&coords.chunk)?
            .get_block(coords.local.x, coords.local.y, coords.local.z)
    }

    /// Registry entry for the block at a world coordinate.
    pub fn block_type(&self, x: i32, y: i32, z: i32) -> Option<&BlockType> {
        self.get_block(x, y, z)
            .and_then(|id| self.registry.lookup(id).ok())
    }

    /// Overwrite one block. Returns `Ok(false)` where no chunk covers the
    /// coordinate; unknown ids are rejected.
    pub fn set_block_id(&mut self, x: i32, y: i32, z: i32, id: BlockId) -> Result<bool, WorldError> {
        self.registry.lookup(id)?;
        let coords = self.world_to_chunk_coords(x, y, z);
        Ok(match self.chunks.get_mut(&coords.chunk) {
            Some(chunk) => chunk.set_block_id(coords.local.x, coords.local.y, coords.local.z, id),
            None => false,
        })
    }

    pub fn get_chunk(&self, chunk_x: i32, chunk_z: i32) -> Option<&Chunk> {
        self.chunks.get(&ChunkPos::new(chunk_x, chunk_z))
    }

    /// Chunks in deterministic (x, then z) order.
    pub fn chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.values()
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }
}

impl BlockSource for World {
    fn block(&self, x: i32, y: i32, z: i32) -> Option<BlockId> {
        self.get_block(x, y, z)
    }
}
