//! Axis-aligned bounds and the integer cell ranges they cover.

use glam::Vec3;
use terracell_world::BlockPos;

use crate::player::Player;

/// Axis-aligned bounding box used for broad-phase queries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner (x, y, z).
    pub min: Vec3,
    /// Maximum corner (x, y, z).
    pub max: Vec3,
}

impl Aabb {
    /// Create a new AABB ensuring min <= max per axis.
    pub fn new(min: Vec3, max: Vec3) -> Self {
        debug_assert!(min.cmple(max).all());
        Self { min, max }
    }

    /// Box enclosing the player's cylinder, from the feet up to the head point.
    pub fn around_player(player: &Player) -> Self {
        let p = player.position;
        let r = player.radius;
        Self::new(
            Vec3::new(p.x - r, p.y - player.height, p.z - r),
            Vec3::new(p.x + r, p.y, p.z + r),
        )
    }

    /// Unit cube occupied by the block at `pos`.
    pub fn block(pos: BlockPos) -> Self {
        let min = Vec3::new(pos.x as f32, pos.y as f32, pos.z as f32);
        Self::new(min, min + Vec3::ONE)
    }

    /// Point of this box nearest to `point`.
    pub fn closest_point(&self, point: Vec3) -> Vec3 {
        point.clamp(self.min, self.max)
    }

    /// Integer cells from `floor(min)` to `ceil(max)`, inclusive on both ends.
    pub fn cells(&self) -> CellRange {
        let min = self.min.floor();
        let max = self.max.ceil();
        CellRange {
            min: BlockPos::new(min.x as i32, min.y as i32, min.z as i32),
            max: BlockPos::new(max.x as i32, max.y as i32, max.z as i32),
        }
    }
}

/// Inclusive box of integer cell coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRange {
    /// Lowest cell on every axis.
    pub min: BlockPos,
    /// Highest cell on every axis.
    pub max: BlockPos,
}

impl CellRange {
    /// Every cell in x, then y, then z order.
    pub fn iter(&self) -> impl Iterator<Item = BlockPos> {
        let (min, max) = (self.min, self.max);
        (min.x..=max.x).flat_map(move |x| {
            (min.y..=max.y).flat_map(move |y| (min.z..=max.z).map(move |z| BlockPos::new(x, y, z)))
        })
    }

    /// Number of cells covered.
    pub fn len(&self) -> usize {
        let span = |lo: i32, hi: i32| (hi - lo + 1).max(0) as usize;
        span(self.min.x, self.max.x) * span(self.min.y, self.max.y) * span(self.min.z, self.max.z)
    }

    /// True when the range covers no cells.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
