//! Block type catalog.
//!
//! The registry is built once at startup and is immutable afterwards. It holds
//! only domain data (id, name, generation parameters); appearance lookups such
//! as materials and textures belong to the rendering side and key off the id.

use std::collections::{HashMap, HashSet};
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{BlockId, BLOCK_EMPTY};

/// Accepted range for resource scarcity thresholds.
pub const SCARCITY_RANGE: RangeInclusive<f32> = 0.0..=1.0;
/// Accepted range for per-axis resource noise scales.
pub const NOISE_SCALE_RANGE: RangeInclusive<f32> = 10.0..=100.0;

/// Well-known ids of the standard block set.
pub mod blocks {
    use crate::BlockId;

    /// Absence of solid matter.
    pub const EMPTY: BlockId = 0;
    /// Surface layer of every column.
    pub const GRASS: BlockId = 1;
    /// Fill below the surface.
    pub const DIRT: BlockId = 2;
    /// Most common resource.
    pub const STONE: BlockId = 3;
    /// Rare resource.
    pub const COAL_ORE: BlockId = 4;
    /// Rare resource, generated after coal.
    pub const IRON_ORE: BlockId = 5;
}

/// Errors raised while building or querying a [`BlockRegistry`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegistryError {
    /// No block type is registered under this id.
    #[error("unknown block type id {0}")]
    UnknownBlockType(BlockId),
    /// No block type is registered under this name.
    #[error("unknown block type name {0:?}")]
    UnknownBlockName(String),
    /// Two entries share an id.
    #[error("block id {0} registered twice")]
    DuplicateBlockId(BlockId),
    /// Two entries share a name.
    #[error("block name {0:?} registered twice")]
    DuplicateBlockName(String),
    /// Id 0 must be present and must carry no resource parameters.
    #[error("registry must define id 0 as the empty block")]
    MissingEmptyBlock,
    /// Resource parameters outside their accepted ranges.
    #[error("invalid resource parameters for {name:?}: {reason}")]
    InvalidResourceParams {
        /// Name of the offending block type.
        name: String,
        /// Which constraint failed.
        reason: String,
    },
}

/// Per-axis divisor applied to cell coordinates before sampling resource noise.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoiseScale {
    /// X axis scale.
    pub x: f32,
    /// Y axis scale.
    pub y: f32,
    /// Z axis scale.
    pub z: f32,
}

impl NoiseScale {
    /// Same scale on every axis.
    pub const fn uniform(scale: f32) -> Self {
        Self {
            x: scale,
            y: scale,
            z: scale,
        }
    }
}

/// Resource placement parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResourceParams {
    /// Noise threshold in `[0, 1]`; a cell becomes this resource when the
    /// sampled value exceeds it.
    pub scarcity: f32,
    /// Per-axis noise scale in `[10, 100]`.
    pub noise_scale: NoiseScale,
}

impl ResourceParams {
    /// Copy with every value snapped into its accepted range; NaN becomes
    /// the lower bound.
    pub fn clamped(&self) -> Self {
        let clamp = |value: f32, range: &RangeInclusive<f32>| {
            if value.is_nan() {
                *range.start()
            } else {
                value.clamp(*range.start(), *range.end())
            }
        };
        let scale = self.noise_scale;
        Self {
            scarcity: clamp(self.scarcity, &SCARCITY_RANGE),
            noise_scale: NoiseScale {
                x: clamp(scale.x, &NOISE_SCALE_RANGE),
                y: clamp(scale.y, &NOISE_SCALE_RANGE),
                z: clamp(scale.z, &NOISE_SCALE_RANGE),
            },
        }
    }

    /// Check both fields against their accepted ranges.
    pub fn validate(&self, name: &str) -> Result<(), RegistryError> {
        let invalid = |reason: String| RegistryError::InvalidResourceParams {
            name: name.to_string(),
            reason,
        };
        if !SCARCITY_RANGE.contains(&self.scarcity) {
            return Err(invalid(format!(
                "scarcity {} outside {:?}",
                self.scarcity, SCARCITY_RANGE
            )));
        }
        let scale = self.noise_scale;
        for (axis, value) in [("x", scale.x), ("y", scale.y), ("z", scale.z)] {
            if !NOISE_SCALE_RANGE.contains(&value) {
                return Err(invalid(format!(
                    "noise scale {axis}={value} outside {:?}",
                    NOISE_SCALE_RANGE
                )));
            }
        }
        Ok(())
    }
}

/// Definition of one kind of block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockType {
    /// Numeric id stored in voxel cells.
    pub id: BlockId,
    /// Human-readable identifier (e.g., "stone").
    pub name: String,
    /// Present only for blocks placed by the resource pass.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<ResourceParams>,
}

impl BlockType {
    /// Plain block without resource parameters.
    pub fn simple(id: BlockId, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            resource: None,
        }
    }

    /// Block that is scattered through the grid by the resource pass.
    pub fn resource(id: BlockId, name: &str, scarcity: f32, noise_scale: NoiseScale) -> Self {
        Self {
            id,
            name: name.to_string(),
            resource: Some(ResourceParams {
                scarcity,
                noise_scale,
            }),
        }
    }

    /// Whether this type denotes absence of solid matter.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.id == BLOCK_EMPTY
    }
}

/// Immutable mapping id -> [`BlockType`] with a stable iteration order.
#[derive(Debug, Clone)]
pub struct BlockRegistry {
    types: Vec<BlockType>,
    by_id: HashMap<BlockId, usize>,
    by_name: HashMap<String, usize>,
}

impl BlockRegistry {
    /// Build a registry, preserving the order of `types`.
    ///
    /// Resource generation iterates in this order, so later resources win
    /// where two of them claim the same cell.
    pub fn new(types: Vec<BlockType>) -> Result<Self, RegistryError> {
        Self::check(&types)?;
        Ok(Self::indexed(types))
    }

    /// The standard block set: empty, grass, dirt, and three resources.
    pub fn standard() -> Self {
        let types = vec![
            BlockType::simple(blocks::EMPTY, "empty"),
            BlockType::simple(blocks::GRASS, "grass"),
            BlockType::simple(blocks::DIRT, "dirt"),
            BlockType::resource(blocks::STONE, "stone", 0.5, NoiseScale::uniform(20.0)),
            BlockType::resource(blocks::COAL_ORE, "coal_ore", 0.9, NoiseScale::uniform(60.0)),
            BlockType::resource(blocks::IRON_ORE, "iron_ore", 0.9, NoiseScale::uniform(60.0)),
        ];
        debug_assert_eq!(Self::check(&types), Ok(()));
        Self::indexed(types)
    }

    fn check(types: &[BlockType]) -> Result<(), RegistryError> {
        let mut ids = HashSet::with_capacity(types.len());
        let mut names = HashSet::with_capacity(types.len());
        for ty in types {
            if !ids.insert(ty.id) {
                return Err(RegistryError::DuplicateBlockId(ty.id));
            }
            if !names.insert(ty.name.as_str()) {
                return Err(RegistryError::DuplicateBlockName(ty.name.clone()));
            }
            if let Some(params) = &ty.resource {
                params.validate(&ty.name)?;
            }
        }
        match types.iter().find(|ty| ty.id == BLOCK_EMPTY) {
            Some(ty) if ty.resource.is_none() => Ok(()),
            _ => Err(RegistryError::MissingEmptyBlock),
        }
    }

    /// Index already checked entries.
    fn indexed(types: Vec<BlockType>) -> Self {
        let by_id = types
            .iter()
            .enumerate()
            .map(|(index, ty)| (ty.id, index))
            .collect();
        let by_name = types
            .iter()
            .enumerate()
            .map(|(index, ty)| (ty.name.clone(), index))
            .collect();
        Self {
            types,
            by_id,
            by_name,
        }
    }

    /// Return a copy with the resource parameters of `name` replaced.
    ///
    /// Intended for startup configuration; the returned registry is as
    /// immutable as the original.
    pub fn with_resource_params(
        mut self,
        name: &str,
        params: ResourceParams,
    ) -> Result<Self, RegistryError> {
        let index = *self
            .by_name
            .get(name)
            .ok_or_else(|| RegistryError::UnknownBlockName(name.to_string()))?;
        if self.types[index].resource.is_none() {
            return Err(RegistryError::InvalidResourceParams {
                name: name.to_string(),
                reason: "block is not a resource".to_string(),
            });
        }
        params.validate(name)?;
        self.types[index].resource = Some(params);
        Ok(self)
    }

    /// Look up a block type by id.
    pub fn lookup(&self, id: BlockId) -> Result<&BlockType, RegistryError> {
        self.by_id
            .get(&id)
            .map(|&index| &self.types[index])
            .ok_or(RegistryError::UnknownBlockType(id))
    }

    /// Resolve a block type by name.
    pub fn by_name(&self, name: &str) -> Option<&BlockType> {
        self.by_name.get(name).map(|&index| &self.types[index])
    }

    /// Whether `id` has an entry.
    pub fn contains(&self, id: BlockId) -> bool {
        self.by_id.contains_key(&id)
    }

    /// Block types carrying resource parameters, in registry order.
    pub fn resources(&self) -> impl Iterator<Item = &BlockType> {
        self.types.iter().filter(|ty| ty.resource.is_some())
    }

    /// All block types in registry order.
    pub fn iter(&self) -> impl Iterator<Item = &BlockType> {
        self.types.iter()
    }

    /// Number of registered types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Always false for a valid registry, which contains at least the empty block.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl Default for BlockRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_registry_resolves_every_id() {
        let registry = BlockRegistry::standard();
        for id in 0..=5 {
            assert_eq!(registry.lookup(id).unwrap().id, id);
        }
        assert!(registry.lookup(blocks::EMPTY).unwrap().is_empty());
        assert_eq!(registry.lookup(blocks::GRASS).unwrap().name, "grass");
    }

    #[test]
    fn unknown_id_is_a_hard_failure() {
        let registry = BlockRegistry::standard();
        assert_eq!(
            registry.lookup(42),
            Err(RegistryError::UnknownBlockType(42))
        );
    }

    #[test]
    fn resources_keep_registry_order() {
        let registry = BlockRegistry::standard();
        let names: Vec<_> = registry.resources().map(|ty| ty.name.as_str()).collect();
        assert_eq!(names, ["stone", "coal_ore", "iron_ore"]);
    }

    #[test]
    fn standard_registry_passes_validation() {
        let types: Vec<_> = BlockRegistry::standard().iter().cloned().collect();
        assert!(BlockRegistry::new(types).is_ok());
    }

    #[test]
    fn rejects_duplicate_ids() {
        let err = BlockRegistry::new(vec![
            BlockType::simple(0, "empty"),
            BlockType::simple(1, "grass"),
            BlockType::simple(1, "moss"),
        ])
        .unwrap_err();
        assert_eq!(err, RegistryError::DuplicateBlockId(1));
    }

    #[test]
    fn rejects_duplicate_names() {
        let err = BlockRegistry::new(vec![
            BlockType::simple(0, "empty"),
            BlockType::resource(3, "stone", 0.5, NoiseScale::uniform(20.0)),
            BlockType::resource(4, "stone", 0.9, NoiseScale::uniform(60.0)),
        ])
        .unwrap_err();
        assert_eq!(err, RegistryError::DuplicateBlockName("stone".to_string()));
    }

    #[test]
    fn requires_empty_block() {
        let err = BlockRegistry::new(vec![BlockType::simple(1, "grass")]).unwrap_err();
        assert_eq!(err, RegistryError::MissingEmptyBlock);
    }

    #[test]
    fn rejects_out_of_range_resource_params() {
        let err = BlockRegistry::new(vec![
            BlockType::simple(0, "empty"),
            BlockType::resource(3, "stone", 1.5, NoiseScale::uniform(20.0)),
        ])
        .unwrap_err();
        assert!(matches!(err, RegistryError::InvalidResourceParams { .. }));

        let err = BlockRegistry::new(vec![
            BlockType::simple(0, "empty"),
            BlockType::resource(3, "stone", 0.5, NoiseScale::uniform(5.0)),
        ])
        .unwrap_err();
        assert!(matches!(err, RegistryError::InvalidResourceParams { .. }));
    }

    #[test]
    fn resource_override_replaces_params() {
        let params = ResourceParams {
            scarcity: 0.7,
            noise_scale: NoiseScale {
                x: 30.0,
                y: 40.0,
                z: 50.0,
            },
        };
        let registry = BlockRegistry::standard()
            .with_resource_params("coal_ore", params)
            .unwrap();
        assert_eq!(
            registry.lookup(blocks::COAL_ORE).unwrap().resource,
            Some(params)
        );
    }

    #[test]
    fn resource_override_rejects_plain_blocks_and_unknown_names() {
        let params = ResourceParams {
            scarcity: 0.5,
            noise_scale: NoiseScale::uniform(20.0),
        };
        assert!(BlockRegistry::standard()
            .with_resource_params("grass", params)
            .is_err());
        assert_eq!(
            BlockRegistry::standard()
                .with_resource_params("obsidian", params)
                .unwrap_err(),
            RegistryError::UnknownBlockName("obsidian".to_string())
        );
    }

    #[test]
    fn clamped_resource_params_validate() {
        let params = ResourceParams {
            scarcity: 1.7,
            noise_scale: NoiseScale {
                x: 2.0,
                y: f32::NAN,
                z: 500.0,
            },
        };
        let clamped = params.clamped();
        assert_eq!(clamped.scarcity, 1.0);
        assert_eq!(clamped.noise_scale, NoiseScale { x: 10.0, y: 10.0, z: 100.0 });
        assert!(clamped.validate("stone").is_ok());

        let fine = ResourceParams {
            scarcity: 0.3,
            noise_scale: NoiseScale::uniform(25.0),
        };
        assert_eq!(fine.clamped(), fine);
    }

    #[test]
    fn block_type_deserializes_without_resource() {
        let ty: BlockType = serde_json::from_str(r#"{"id":2,"name":"dirt"}"#).unwrap();
        assert_eq!(ty, BlockType::simple(2, "dirt"));
    }
}
