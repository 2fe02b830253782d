//! Block occupancy for the voxel world.
//!
//! Uses the 3D side of the shared noise field: a column is ground below a
//! noise-displaced floor, and low-lying pockets where the noise dips are carved
//! out as caverns. Only the occupancy query lives here; chunk meshing is done
//! by the display side.

use crate::noise_field::NoiseField;

/// Shape parameters for voxel occupancy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoxelParams {
    /// Block coordinates are divided by this before sampling noise.
    pub noise_period: f64,
    /// Floor height where noise is zero.
    pub ground_base: f64,
    /// How far noise moves the floor up or down.
    pub ground_amplitude: f64,
    /// Noise below this carves a cavern.
    pub cavern_threshold: f64,
    /// Caverns only form below this height.
    pub cavern_ceiling: f64,
}

impl Default for VoxelParams {
    fn default() -> Self {
        Self {
            noise_period: 50.0,
            ground_base: 5.0,
            ground_amplitude: 5.0,
            cavern_threshold: -0.2,
            cavern_ceiling: 15.0,
        }
    }
}

/// Occupancy query over a borrowed noise field.
#[derive(Debug, Clone, Copy)]
pub struct VoxelField<'a> {
    noise: &'a NoiseField,
    params: VoxelParams,
}

impl<'a> VoxelField<'a> {
    pub fn new(noise: &'a NoiseField) -> Self {
        Self::with_params(noise, VoxelParams::default())
    }

    pub fn with_params(noise: &'a NoiseField, params: VoxelParams) -> Self {
        Self { noise, params }
    }

    /// Raw 3D noise at a block coordinate.
    pub fn density(&self, x: i32, y: i32, z: i32) -> f64 {
        let p = self.params.noise_period;
        self.noise.get3(x as f64 / p, y as f64 / p, z as f64 / p)
    }

    pub fn is_solid(&self, x: i32, y: i32, z: i32) -> bool {
        let n = self.density(x, y, z);
        let y = y as f64;
        let is_ground = y < self.params.ground_base + n * self.params.ground_amplitude;
        let is_cavern = n < self.params.cavern_threshold && y < self.params.cavern_ceiling;
        is_ground && !is_cavern
    }

    /// Highest solid block in the column at or below `max_y`, scanning down to `min_y`.
    pub fn column_top(&self, x: i32, z: i32, min_y: i32, max_y: i32) -> Option<i32> {
        (min_y..=max_y).rev().find(|&y| self.is_solid(x, y, z))
    }
}
