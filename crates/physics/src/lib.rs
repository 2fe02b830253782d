//! Character-versus-terrain collision.

pub mod terrain_collision;

pub use terrain_collision::*;
