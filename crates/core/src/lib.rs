#![warn(missing_docs)]
//! Core primitives shared across the workspace.

pub mod registry;
pub mod rng;

use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use registry::{BlockRegistry, BlockType, NoiseScale, RegistryError, ResourceParams};
pub use rng::SeededRng;

/// Block identifier referencing the registry.
pub type BlockId = u16;

/// Reserved ID for the absence of solid matter.
pub const BLOCK_EMPTY: BlockId = 0;

/// Fixed simulation step counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SimTick(pub u64);

impl SimTick {
    /// First tick in any deterministic timeline.
    pub const ZERO: Self = Self(0);

    /// Advance by `delta` ticks.
    pub fn advance(self, delta: u64) -> Self {
        Self(self.0 + delta)
    }
}
