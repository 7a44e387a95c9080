//! Stable digests of generated voxel data.
//!
//! Two worlds with identical parameters must produce identical fingerprints;
//! comparing digests keeps determinism tests cheap and their failures short.

use std::fmt;

use blake3::Hasher;
use serde::{Serialize, Serializer};
use terracell_world::{Chunk, World};

/// Blake3 digest over voxel grids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint(pub [u8; 32]);

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl Serialize for Fingerprint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

fn hash_chunk(hasher: &mut Hasher, chunk: &Chunk) {
    let pos = chunk.position();
    let size = chunk.size();
    hasher.update(&pos.x.to_le_bytes());
    hasher.update(&pos.z.to_le_bytes());
    hasher.update(&(size.width as u32).to_le_bytes());
    hasher.update(&(size.height as u32).to_le_bytes());
    for id in chunk.cells() {
        hasher.update(&id.to_le_bytes());
    }
}

/// Fingerprint of a single chunk, including its position and dimensions.
pub fn chunk_fingerprint(chunk: &Chunk) -> Fingerprint {
    let mut hasher = Hasher::new();
    hash_chunk(&mut hasher, chunk);
    Fingerprint(*hasher.finalize().as_bytes())
}

/// Fingerprint of every chunk in a world, visited in chunk-coordinate order.
pub fn world_fingerprint(world: &World) -> Fingerprint {
    let mut hasher = Hasher::new();
    hasher.update(&(world.chunk_count() as u32).to_le_bytes());
    for chunk in world.chunks() {
        hash_chunk(&mut hasher, chunk);
    }
    Fingerprint(*hasher.finalize().as_bytes())
}
