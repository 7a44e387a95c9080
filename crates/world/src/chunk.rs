use std::fmt;

use terracell_core::{BlockId, BlockRegistry, BLOCK_EMPTY};
use tracing::{debug, instrument};

use crate::params::{ChunkSize, TerrainParams, WorldError};
use crate::terrain;

/// Chunk-local position (X, Y, Z).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LocalPos {
    pub x: usize,
    pub y: usize,
    pub z: usize,
}

impl LocalPos {
    pub const fn new(x: usize, y: usize, z: usize) -> Self {
        Self { x, y, z }
    }

    /// Convert to a linear index into a grid of `size`.
    pub fn index(self, size: ChunkSize) -> usize {
        debug_assert!(self.x < size.width);
        debug_assert!(self.y < size.height);
        debug_assert!(self.z < size.width);
        (self.y * size.width + self.z) * size.width + self.x
    }
}

/// Integer block coordinate, either world-space or chunk-local.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }
}

impl fmt::Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Chunk coordinate (X,Z) in chunk space.
/// Implements Ord for deterministic iteration in BTreeMap/BTreeSet (sorts by x, then z).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub struct ChunkPos {
    pub x: i32,
    pub z: i32,
}

impl ChunkPos {
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }
}

impl fmt::Display for ChunkPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}

/// Seed and terrain shape a chunk was (or will be) generated with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParams {
    pub seed: u64,
    pub terrain: TerrainParams,
}

/// Dense voxel grid for one chunk column.
///
/// The grid is only ever replaced as a whole by [`Chunk::generate`]; the only
/// in-place edit is [`Chunk::set_block_id`].
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    position: ChunkPos,
    size: ChunkSize,
    params: GenerationParams,
    cells: Vec<BlockId>,
}

impl Chunk {
    /// Allocate a chunk filled with the empty block.
    pub fn new(position: ChunkPos, size: ChunkSize, params: GenerationParams) -> Self {
        Self {
            position,
            size,
            params,
            cells: vec![BLOCK_EMPTY; size.volume()],
        }
    }

    #[inline]
    pub fn position(&self) -> ChunkPos {
        self.position
    }

    #[inline]
    pub fn size(&self) -> ChunkSize {
        self.size
    }

    #[inline]
    pub fn params(&self) -> GenerationParams {
        self.params
    }

    /// World-space offset of local cell (0, 0, 0).
    pub fn origin(&self) -> BlockPos {
        let width = self.size.width as i32;
        BlockPos::new(self.position.x * width, 0, self.position.z * width)
    }

    fn local(&self, x: i32, y: i32, z: i32) -> Option<LocalPos> {
        let in_width = |v: i32| v >= 0 && (v as usize) < self.size.width;
        if in_width(x) && in_width(z) && y >= 0 && (y as usize) < self.size.height {
            Some(LocalPos::new(x as usize, y as usize, z as usize))
        } else {
            None
        }
    }

    /// Block id at a local coordinate, or `None` outside the grid.
    pub fn get_block(&self, x: i32, y: i32, z: i32) -> Option<BlockId> {
        self.local(x, y, z)
            .map(|pos| self.cells[pos.index(self.size)])
    }

    /// Overwrite a cell. Out-of-bounds writes are ignored; returns whether
    /// the write landed.
    pub fn set_block_id(&mut self, x: i32, y: i32, z: i32, id: BlockId) -> bool {
        match self.local(x, y, z) {
            Some(pos) => {
                let idx = pos.index(self.size);
                self.cells[idx] = id;
                true
            }
            None => false,
        }
    }

    /// True when all six neighbours are solid. Neighbours outside this chunk
    /// count as empty, so boundary cells are never obscured.
    pub fn is_obscured(&self, x: i32, y: i32, z: i32) -> bool {
        const NEIGHBOURS: [(i32, i32, i32); 6] = [
            (1, 0, 0),
            (-1, 0, 0),
            (0, 1, 0),
            (0, -1, 0),
            (0, 0, 1),
            (0, 0, -1),
        ];
        NEIGHBOURS.iter().all(|&(dx, dy, dz)| {
            self.get_block(x + dx, y + dy, z + dz)
                .is_some_and(|id| id != BLOCK_EMPTY)
        })
    }

    /// Every cell in index order.
    pub fn iter(&self) -> impl Iterator<Item = (LocalPos, BlockId)> + '_ {
        let size = self.size;
        self.cells.iter().enumerate().map(move |(idx, &id)| {
            let x = idx % size.width;
            let z = (idx / size.width) % size.width;
            let y = idx / (size.width * size.width);
            (LocalPos::new(x, y, z), id)
        })
    }

    /// Non-empty cells with at least one exposed face.
    pub fn visible_blocks(&self) -> impl Iterator<Item = (LocalPos, BlockId)> + '_ {
        self.iter().filter(move |&(pos, id)| {
            id != BLOCK_EMPTY && !self.is_obscured(pos.x as i32, pos.y as i32, pos.z as i32)
        })
    }

    /// Highest non-empty cell in a column.
    pub fn surface_height(&self, x: usize, z: usize) -> Option<usize> {
        (0..self.size.height).rev().find(|&y| {
            self.get_block(x as i32, y as i32, z as i32)
                .is_some_and(|id| id != BLOCK_EMPTY)
        })
    }

    /// Raw grid, laid out as `(y * width + z) * width + x`.
    pub fn cells(&self) -> &[BlockId] {
        &self.cells
    }

    /// Regenerate the whole grid for `seed`.
    ///
    /// The new grid is built aside and swapped in once complete. A size or
    /// terrain shape outside the accepted ranges is rejected and the chunk
    /// is left untouched.
    #[instrument(skip(self, registry), fields(chunk_pos = %self.position))]
    pub fn generate(&mut self, seed: u64, registry: &BlockRegistry) -> Result<(), WorldError> {
        self.size.validate()?;
        self.params.terrain.validate()?;
        debug!("Starting chunk generation");
        let params = GenerationParams {
            seed,
            terrain: self.params.terrain,
        };
        let mut next = Chunk::new(self.position, self.size, params);
        terrain::populate(&mut next, registry);
        *self = next;
        debug!("Chunk generation complete");
        Ok(())
    }
}
