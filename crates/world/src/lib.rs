mod chunk;
mod noise;
mod params;
mod terrain;
mod world;

pub use chunk::*;
pub use crate::noise::{NoiseConfig, NoiseField};
pub use params::*;
pub use terrain::column_height;
pub use world::*;
