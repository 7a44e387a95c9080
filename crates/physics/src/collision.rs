//! Player-versus-voxel collision pipeline.
//!
//! Broad phase collects solid cells inside the player's bounding box, narrow
//! phase measures penetration against each of them, and resolution pushes
//! the player out one contact at a time, deepest first.

use std::cmp::Ordering;

use glam::Vec3;
use serde::Serialize;
use terracell_core::BLOCK_EMPTY;
use terracell_world::{BlockPos, BlockSource};

use crate::bounds::Aabb;
use crate::player::Player;

/// Which way a contact pushes the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CollisionAxis {
    /// Floor or ceiling contact; resolving it grounds the player.
    Vertical,
    /// Wall contact in the XZ plane.
    Horizontal,
}

/// One measured contact between the player and a block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collision {
    /// Block that was hit.
    pub block: BlockPos,
    /// Point of the block closest to the player's midpoint.
    pub contact_point: Vec3,
    /// Unit push-out direction, or zero for degenerate contacts.
    pub normal: Vec3,
    /// Distance to move along `normal` to separate.
    pub depth: f32,
    /// Classification of the contact.
    pub axis: CollisionAxis,
}

/// What the last collision pass saw, kept for debug overlays.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollisionReport {
    /// Solid cells found by the broad phase.
    pub candidates: Vec<BlockPos>,
    /// Contacts measured by the narrow phase, in resolution order.
    pub collisions: Vec<Collision>,
    /// How many contacts actually moved the player.
    pub resolved: usize,
}

/// Solid cells overlapping the player's bounding box.
///
/// Cells the source reports as unloaded are skipped rather than treated as
/// solid.
pub fn broad_phase<S: BlockSource + ?Sized>(player: &Player, source: &S) -> Vec<BlockPos> {
    Aabb::around_player(player)
        .cells()
        .iter()
        .filter(|pos| {
            source
                .block(pos.x, pos.y, pos.z)
                .is_some_and(|id| id != BLOCK_EMPTY)
        })
        .collect()
}

fn sign(v: f32) -> f32 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Measure the contact between the player and one block, if any.
pub fn collide_block(player: &Player, block: BlockPos) -> Option<Collision> {
    let reference = player.center();
    let closest = Aabb::block(block).closest_point(reference);
    if !player.contains_point(closest) {
        return None;
    }

    let d = closest - reference;
    let overlap_vertical = player.height / 2.0 - d.y.abs();
    let overlap_horizontal = player.radius - (d.x * d.x + d.z * d.z).sqrt();

    let collision = if overlap_vertical < overlap_horizontal {
        Collision {
            block,
            contact_point: closest,
            normal: Vec3::new(0.0, -sign(d.y), 0.0),
            depth: overlap_vertical,
            axis: CollisionAxis::Vertical,
        }
    } else {
        Collision {
            block,
            contact_point: closest,
            normal: Vec3::new(-d.x, 0.0, -d.z).normalize_or_zero(),
            depth: overlap_horizontal,
            axis: CollisionAxis::Horizontal,
        }
    };
    Some(collision)
}

/// Contacts for every candidate block that actually overlaps the player.
pub fn narrow_phase(candidates: &[BlockPos], player: &Player) -> Vec<Collision> {
    candidates
        .iter()
        .filter_map(|&block| collide_block(player, block))
        .collect()
}

/// Resolution order: deepest first, ties by block coordinate.
pub fn resolution_order(a: &Collision, b: &Collision) -> Ordering {
    b.depth
        .total_cmp(&a.depth)
        .then_with(|| a.block.cmp(&b.block))
}

/// Push the player out of each contact in [`resolution_order`].
///
/// Contacts that earlier pushes already cleared are skipped. Each applied
/// contact removes the world-space velocity component along its normal.
/// Returns the number of contacts applied.
pub fn resolve_collisions(collisions: &mut [Collision], player: &mut Player) -> usize {
    collisions.sort_by(resolution_order);

    let mut resolved = 0;
    for collision in collisions.iter() {
        if !player.contains_point(collision.contact_point) {
            continue;
        }

        player.position += collision.normal * collision.depth;

        let velocity = player.world_velocity();
        let into_surface = velocity.dot(collision.normal);
        player.set_world_velocity(velocity - collision.normal * into_surface);

        if collision.axis == CollisionAxis::Vertical {
            player.on_ground = true;
        }
        resolved += 1;
    }
    resolved
}

#[cfg(test)]
mod tests {
    use super::*;

    fn standing_player(x: f32, z: f32) -> Player {
        // Feet exactly on top of y = 0 blocks.
        Player::at(Vec3::new(x, 2.75, z))
    }

    #[test]
    fn resting_on_a_floor_is_not_a_collision() {
        let player = standing_player(0.5, 0.5);
        assert_eq!(collide_block(&player, BlockPos::new(0, 0, 0)), None);
    }

    #[test]
    fn shallow_floor_overlap_is_vertical() {
        let player = Player::at(Vec3::new(0.5, 2.65, 0.5));
        let hit = collide_block(&player, BlockPos::new(0, 0, 0)).unwrap();
        assert_eq!(hit.axis, CollisionAxis::Vertical);
        assert_eq!(hit.normal, Vec3::Y);
        assert!((hit.depth - 0.1).abs() < 1e-5);
        assert!(hit.contact_point.abs_diff_eq(Vec3::new(0.5, 1.0, 0.5), 1e-6));
    }

    #[test]
    fn ceiling_overlap_pushes_down() {
        // Head 0.2 into a block whose underside is at y = 3.
        let player = Player::at(Vec3::new(0.5, 3.2, 0.5));
        let hit = collide_block(&player, BlockPos::new(0, 3, 0)).unwrap();
        assert_eq!(hit.axis, CollisionAxis::Vertical);
        assert_eq!(hit.normal, Vec3::NEG_Y);
        assert!((hit.depth - 0.2).abs() < 1e-5);
    }

    #[test]
    fn side_overlap_is_horizontal() {
        let player = standing_player(0.7, 0.5);
        let hit = collide_block(&player, BlockPos::new(1, 1, 0)).unwrap();
        assert_eq!(hit.axis, CollisionAxis::Horizontal);
        assert!(hit.normal.abs_diff_eq(Vec3::NEG_X, 1e-6));
        assert!((hit.depth - 0.2).abs() < 1e-5);
    }

    #[test]
    fn far_blocks_are_discarded() {
        let player = standing_player(0.5, 0.5);
        assert_eq!(collide_block(&player, BlockPos::new(3, 1, 0)), None);
        assert!(narrow_phase(&[BlockPos::new(0, 5, 0)], &player).is_empty());
    }

    #[test]
    fn coincident_centre_yields_no_push() {
        // Midpoint inside a block: horizontal normal is undefined.
        let player = Player::at(Vec3::new(0.5, 1.5 + 0.875, 0.5));
        let hit = collide_block(&player, BlockPos::new(0, 1, 0)).unwrap();
        assert_eq!(hit.axis, CollisionAxis::Horizontal);
        assert_eq!(hit.normal, Vec3::ZERO);

        let mut moved = player.clone();
        resolve_collisions(&mut [hit], &mut moved);
        assert_eq!(moved.position, player.position);
    }

    #[test]
    fn ordering_is_deepest_first_then_by_block() {
        let make = |x: i32, depth: f32| Collision {
            block: BlockPos::new(x, 0, 0),
            contact_point: Vec3::ZERO,
            normal: Vec3::Y,
            depth,
            axis: CollisionAxis::Vertical,
        };
        let mut list = vec![make(3, 0.1), make(1, 0.3), make(2, 0.1), make(0, 0.2)];
        list.sort_by(resolution_order);
        let order: Vec<_> = list.iter().map(|c| c.block.x).collect();
        assert_eq!(order, [1, 0, 2, 3]);
    }

    #[test]
    fn resolution_removes_only_normal_velocity() {
        let mut player = standing_player(0.7, 0.5);
        player.yaw = 0.9;
        player.set_world_velocity(Vec3::new(5.0, 0.0, 3.0));
        let mut hits = vec![collide_block(&player, BlockPos::new(1, 1, 0)).unwrap()];
        assert_eq!(resolve_collisions(&mut hits, &mut player), 1);
        assert!((player.position.x - 0.5).abs() < 1e-5);
        assert!(player
            .world_velocity()
            .abs_diff_eq(Vec3::new(0.0, 0.0, 3.0), 1e-4));
        assert!(!player.on_ground);
    }

    #[test]
    fn cleared_contacts_are_skipped() {
        // Two floor blocks under the same player: the first push clears both.
        let mut player = Player::at(Vec3::new(1.0, 2.65, 0.5));
        let mut hits = narrow_phase(&[BlockPos::new(0, 0, 0), BlockPos::new(1, 0, 0)], &player);
        assert_eq!(hits.len(), 2);
        assert_eq!(resolve_collisions(&mut hits, &mut player), 1);
        assert!((player.position.y - 2.75).abs() < 1e-5);
        assert!(player.on_ground);
    }
}
