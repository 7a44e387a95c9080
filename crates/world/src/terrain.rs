//! Terrain generation passes.
//!
//! A chunk is filled in a fixed order: every cell starts empty, the resource
//! pass scatters resource blocks through the whole grid, and the terrain pass
//! then lays dirt and grass per column. The terrain pass only fills empty
//! cells below the surface but writes the surface and everything above it
//! unconditionally, so resources survive strictly below the column height.

use terracell_core::registry::blocks;
use terracell_core::{BlockRegistry, SeededRng, BLOCK_EMPTY};
use tracing::trace;

use crate::chunk::Chunk;
use crate::noise::NoiseField;
use crate::params::TerrainParams;

/// Run every generation pass over a freshly allocated chunk.
pub(crate) fn populate(chunk: &mut Chunk, registry: &BlockRegistry) {
    let mut rng = SeededRng::new(chunk.params().seed);
    // Both fields come from one sequence; the draw order is part of the output.
    let resource_noise = NoiseField::new(&mut rng);
    let terrain_noise = NoiseField::new(&mut rng);

    generate_resources(chunk, registry, &resource_noise);
    generate_terrain(chunk, &terrain_noise);
}

fn generate_resources(chunk: &mut Chunk, registry: &BlockRegistry, noise: &NoiseField) {
    let size = chunk.size();
    let origin = chunk.origin();
    for resource in registry.resources() {
        let Some(params) = resource.resource else {
            continue;
        };
        let scale = params.noise_scale;
        let mut placed = 0usize;
        for x in 0..size.width as i32 {
            for y in 0..size.height as i32 {
                for z in 0..size.width as i32 {
                    let value = noise.sample_3d(
                        f64::from(origin.x + x) / f64::from(scale.x),
                        f64::from(origin.y + y) / f64::from(scale.y),
                        f64::from(origin.z + z) / f64::from(scale.z),
                    );
                    if value > f64::from(params.scarcity) {
                        chunk.set_block_id(x, y, z, resource.id);
                        placed += 1;
                    }
                }
            }
        }
        trace!(resource = %resource.name, placed, "resource pass");
    }
}

fn generate_terrain(chunk: &mut Chunk, noise: &NoiseField) {
    let size = chunk.size();
    let origin = chunk.origin();
    let terrain = chunk.params().terrain;
    for x in 0..size.width as i32 {
        for z in 0..size.width as i32 {
            let height = column_height(
                noise,
                &terrain,
                size.height,
                origin.x + x,
                origin.z + z,
            ) as i32;
            for y in 0..size.height as i32 {
                if y < height {
                    if chunk.get_block(x, y, z) == Some(BLOCK_EMPTY) {
                        chunk.set_block_id(x, y, z, blocks::DIRT);
                    }
                } else if y == height {
                    chunk.set_block_id(x, y, z, blocks::GRASS);
                } else {
                    chunk.set_block_id(x, y, z, BLOCK_EMPTY);
                }
            }
        }
    }
}

/// Surface height of the column at world `(x, z)`, in `[0, world_height)`.
pub fn column_height(
    noise: &NoiseField,
    terrain: &TerrainParams,
    world_height: usize,
    x: i32,
    z: i32,
) -> usize {
    let scale = f64::from(terrain.scale);
    let value = noise.sample_2d(f64::from(x) / scale, f64::from(z) / scale);
    let scaled = f64::from(terrain.offset) + value * f64::from(terrain.magnitude);
    let height = (world_height as f64 * scaled).floor();
    height.clamp(0.0, world_height.saturating_sub(1) as f64) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::{ChunkPos, GenerationParams};
    use crate::params::ChunkSize;
    use terracell_core::{BlockType, NoiseScale};

    fn chunk_with(terrain: TerrainParams, seed: u64) -> Chunk {
        Chunk::new(
            ChunkPos::new(0, 0),
            ChunkSize::new(16, 16),
            GenerationParams { seed, terrain },
        )
    }

    #[test]
    fn column_height_stays_in_grid() {
        let noise = NoiseField::new(&mut SeededRng::new(3));
        let tall = TerrainParams {
            scale: 10.0,
            magnitude: 1.0,
            offset: 1.0,
        };
        let low = TerrainParams {
            scale: 10.0,
            magnitude: 1.0,
            offset: 0.0,
        };
        for x in -20..20 {
            for z in -20..20 {
                assert!(column_height(&noise, &tall, 16, x, z) <= 15);
                assert!(column_height(&noise, &low, 16, x, z) <= 15);
            }
        }
    }

    #[test]
    fn column_height_of_empty_grid_is_zero() {
        let noise = NoiseField::new(&mut SeededRng::new(3));
        assert_eq!(column_height(&noise, &TerrainParams::default(), 0, 5, -5), 0);
    }

    #[test]
    fn flat_terrain_sits_at_offset() {
        let noise = NoiseField::new(&mut SeededRng::new(3));
        let flat = TerrainParams {
            scale: 30.0,
            magnitude: 0.0,
            offset: 0.5,
        };
        assert_eq!(column_height(&noise, &flat, 32, 5, -9), 16);
    }

    #[test]
    fn flat_world_without_resources_is_layered() {
        let registry = BlockRegistry::new(vec![
            BlockType::simple(blocks::EMPTY, "empty"),
            BlockType::simple(blocks::GRASS, "grass"),
            BlockType::simple(blocks::DIRT, "dirt"),
        ])
        .unwrap();
        let mut chunk = chunk_with(
            TerrainParams {
                scale: 30.0,
                magnitude: 0.0,
                offset: 0.25,
            },
            11,
        );
        populate(&mut chunk, &registry);
        for x in 0..16 {
            for z in 0..16 {
                for y in 0..16 {
                    let expected = match y {
                        0..=3 => blocks::DIRT,
                        4 => blocks::GRASS,
                        _ => BLOCK_EMPTY,
                    };
                    assert_eq!(chunk.get_block(x, y, z), Some(expected));
                }
            }
        }
    }

    #[test]
    fn resources_survive_only_below_surface() {
        // Scarcity 0 with a resource that covers almost everything.
        let registry = BlockRegistry::new(vec![
            BlockType::simple(blocks::EMPTY, "empty"),
            BlockType::simple(blocks::GRASS, "grass"),
            BlockType::simple(blocks::DIRT, "dirt"),
            BlockType::resource(blocks::STONE, "stone", 0.0, NoiseScale::uniform(10.0)),
        ])
        .unwrap();
        let mut chunk = chunk_with(
            TerrainParams {
                scale: 30.0,
                magnitude: 0.0,
                offset: 0.5,
            },
            1,
        );
        populate(&mut chunk, &registry);
        let mut stone_below = 0;
        for x in 0..16 {
            for z in 0..16 {
                assert_eq!(chunk.get_block(x, 8, z), Some(blocks::GRASS));
                for y in 9..16 {
                    assert_eq!(chunk.get_block(x, y, z), Some(BLOCK_EMPTY));
                }
                for y in 0..8 {
                    let id = chunk.get_block(x, y, z).unwrap();
                    assert!(id == blocks::DIRT || id == blocks::STONE);
                    if id == blocks::STONE {
                        stone_below += 1;
                    }
                }
            }
        }
        assert!(stone_below > 0, "some stone should survive underground");
    }

    #[test]
    fn later_resources_overwrite_earlier_ones() {
        // Both resources fire everywhere the noise is positive; the second wins.
        let params = |name: &str, id| BlockType::resource(id, name, 0.0, NoiseScale::uniform(10.0));
        let registry = BlockRegistry::new(vec![
            BlockType::simple(blocks::EMPTY, "empty"),
            BlockType::simple(blocks::GRASS, "grass"),
            BlockType::simple(blocks::DIRT, "dirt"),
            params("stone", blocks::STONE),
            params("coal_ore", blocks::COAL_ORE),
        ])
        .unwrap();
        let mut chunk = chunk_with(
            TerrainParams {
                scale: 30.0,
                magnitude: 0.0,
                offset: 1.0,
            },
            5,
        );
        populate(&mut chunk, &registry);
        assert!(chunk.iter().all(|(_, id)| id != blocks::STONE));
        assert!(chunk.iter().any(|(_, id)| id == blocks::COAL_ORE));
    }
}
