//! Procedural terrain: seeded noise, biome height functions, and the height field.

pub mod biome;
pub mod noise_field;
pub mod terrain;
pub mod voxel;

pub use biome::*;
pub use noise_field::*;
pub use terrain::*;
pub use voxel::*;
