#![warn(missing_docs)]
//! Deterministic testing surfaces (world fingerprints and hand-built voxel scenes).

mod fingerprint;
mod fixture;

pub use fingerprint::*;
pub use fixture::*;
