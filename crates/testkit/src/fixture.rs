//! Sparse voxel scenes for collision tests.

use std::collections::BTreeMap;

use terracell_core::{registry::blocks, BlockId};
use terracell_world::{BlockPos, BlockSource};

/// Hand-placed blocks; every other coordinate reads as unloaded.
#[derive(Debug, Clone, Default)]
pub struct VoxelFixture {
    blocks: BTreeMap<BlockPos, BlockId>,
}

impl VoxelFixture {
    /// Scene with no blocks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Place `id` at `(x, y, z)`.
    pub fn with_block(mut self, x: i32, y: i32, z: i32, id: BlockId) -> Self {
        self.set(x, y, z, id);
        self
    }

    /// Place a single dirt block.
    pub fn with_solid(self, x: i32, y: i32, z: i32) -> Self {
        self.with_block(x, y, z, blocks::DIRT)
    }

    /// Fill the square `[min, max]²` at height `y` with dirt.
    pub fn with_floor(mut self, y: i32, min: i32, max: i32) -> Self {
        for x in min..=max {
            for z in min..=max {
                self.set(x, y, z, blocks::DIRT);
            }
        }
        self
    }

    /// Place `id` at `(x, y, z)`, replacing whatever was there.
    pub fn set(&mut self, x: i32, y: i32, z: i32, id: BlockId) {
        self.blocks.insert(BlockPos::new(x, y, z), id);
    }

    /// Number of placed blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// True when nothing has been placed.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

impl BlockSource for VoxelFixture {
    fn block(&self, x: i32, y: i32, z: i32) -> Option<BlockId> {
        self.blocks.get(&BlockPos::new(x, y, z)).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unplaced_cells_are_unloaded() {
        let fixture = VoxelFixture::new().with_solid(0, 0, 0);
        assert_eq!(fixture.block(0, 0, 0), Some(blocks::DIRT));
        assert_eq!(fixture.block(1, 0, 0), None);
    }

    #[test]
    fn floor_covers_square() {
        let fixture = VoxelFixture::new().with_floor(-1, -2, 2);
        assert_eq!(fixture.len(), 25);
        assert_eq!(fixture.block(-2, -1, 2), Some(blocks::DIRT));
        assert_eq!(fixture.block(0, 0, 0), None);
    }
}
