//! Continuous terrain height field and its display grid.
//!
//! **Seed-based determinism:** all noise is derived from `config.seed`, so the
//! same seed always produces the same height at every (world_x, world_z). Height
//! is recomputed on every query; nothing is cached.

use bytemuck::{Pod, Zeroable};
use engine_core::{ConfigError, HeightSource};
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::biome::{biome_height, Biome, BiomeSettings};
use crate::noise_field::NoiseField;

/// Configuration for terrain generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// Size of terrain in world units (square, centered on the origin).
    pub size: f32,
    /// Number of grid cells per side.
    pub segments: u32,
    /// Scale from grid coordinates into noise space.
    pub noise_scale: f64,
    /// World height of a unit biome height.
    pub height_scale: f32,
    /// World seed. Hashed into the noise seed.
    pub seed: String,
    pub biomes: BiomeSettings,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            size: 200.0,
            segments: 100,
            noise_scale: 0.1,
            height_scale: 10.0,
            seed: "31".to_string(),
            biomes: BiomeSettings::default(),
        }
    }
}

impl TerrainConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::require_positive("terrain.size", self.size as f64)?;
        if self.segments == 0 {
            return Err(ConfigError::Invalid {
                field: "terrain.segments",
                reason: "at least one segment is required".into(),
            });
        }
        ConfigError::require_positive("terrain.noise_scale", self.noise_scale)?;
        ConfigError::require_finite("terrain.height_scale", self.height_scale as f64)?;
        self.biomes.validate()
    }

    /// World-space width of one grid cell.
    pub fn cell_size(&self) -> f32 {
        self.size / self.segments as f32
    }

    /// Map a world coordinate into noise space.
    ///
    /// Shifts the terrain corner to zero, converts to grid units, then applies
    /// `noise_scale`. The display grid and collision both go through this.
    #[inline]
    pub fn normalize(&self, coord: f32) -> f64 {
        let size = self.size as f64;
        (coord as f64 + size / 2.0) / (size / self.segments as f64) * self.noise_scale
    }
}

/// Pure height query over seeded biome noise.
#[derive(Debug, Clone)]
pub struct HeightField {
    config: TerrainConfig,
    noise: NoiseField,
}

impl HeightField {
    /// Build a height field whose noise is seeded from `config.seed`.
    pub fn new(config: TerrainConfig) -> Self {
        let noise = NoiseField::from_seed_str(&config.seed);
        Self::with_noise(config, noise)
    }

    /// Build a height field around an existing noise field.
    pub fn with_noise(config: TerrainConfig, noise: NoiseField) -> Self {
        log::debug!(
            "Height field: size {} x {} segments, height scale {}, noise seed {}",
            config.size,
            config.segments,
            config.height_scale,
            noise.seed()
        );
        Self { config, noise }
    }

    pub fn config(&self) -> &TerrainConfig {
        &self.config
    }

    pub fn noise(&self) -> &NoiseField {
        &self.noise
    }

    /// Height in [0, 1] at noise-space coordinates.
    pub fn biome_height(&self, nx: f64, nz: f64) -> f64 {
        biome_height(&self.noise, &self.config.biomes, nx, nz)
    }

    /// World-space terrain elevation at `(x, z)`.
    pub fn terrain_height(&self, x: f32, z: f32) -> f32 {
        let nx = self.config.normalize(x);
        let nz = self.config.normalize(z);
        (self.biome_height(nx, nz) * self.config.height_scale as f64) as f32
    }

    /// Which biome governs world-space `(x, z)`.
    pub fn biome_at(&self, x: f32, z: f32) -> Biome {
        let nx = self.config.normalize(x);
        let nz = self.config.normalize(z);
        self.config.biomes.select(&self.noise, nx, nz)
    }
}

impl HeightSource for HeightField {
    #[inline]
    fn height_at(&self, x: f32, z: f32) -> f32 {
        self.terrain_height(x, z)
    }
}

/// Vertex for the terrain display grid.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct TerrainVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

/// CPU-side terrain grid sampled once from a height field.
#[derive(Debug)]
pub struct TerrainMesh {
    pub vertices: Vec<TerrainVertex>,
    pub indices: Vec<u32>,
    /// Row-major (z then x) world heights, `resolution * resolution` long.
    pub heightmap: Vec<f32>,
    /// Vertices per side (`segments + 1`).
    pub resolution: usize,
    size: f32,
}

impl TerrainMesh {
    /// Sample `field` on its `(segments + 1)^2` grid.
    pub fn build(field: &HeightField) -> Self {
        let config = field.config();
        let res = config.segments.max(1) as usize + 1;
        let step = config.cell_size();
        let half_size = config.size / 2.0;

        let mut vertices = Vec::with_capacity(res * res);
        let mut heightmap = Vec::with_capacity(res * res);

        for z in 0..res {
            for x in 0..res {
                let world_x = x as f32 * step - half_size;
                let world_z = z as f32 * step - half_size;
                let world_y = field.terrain_height(world_x, world_z);
                heightmap.push(world_y);
                vertices.push(TerrainVertex {
                    position: [world_x, world_y, world_z],
                    normal: [0.0, 1.0, 0.0],
                    uv: [x as f32 / (res - 1) as f32, z as f32 / (res - 1) as f32],
                });
            }
        }

        let mut indices = Vec::with_capacity((res - 1) * (res - 1) * 6);
        for z in 0..(res - 1) {
            for x in 0..(res - 1) {
                let top_left = (z * res + x) as u32;
                let top_right = top_left + 1;
                let bottom_left = ((z + 1) * res + x) as u32;
                let bottom_right = bottom_left + 1;

                indices.extend([top_left, bottom_left, top_right]);
                indices.extend([top_right, bottom_left, bottom_right]);
            }
        }

        Self::calculate_normals(&mut vertices, res);

        let mesh = Self {
            vertices,
            indices,
            heightmap,
            resolution: res,
            size: config.size,
        };
        let (lo, hi) = mesh.height_range();
        log::debug!(
            "Terrain mesh: {} vertices, {} triangles, heights {:.2}..{:.2}",
            mesh.vertices.len(),
            mesh.indices.len() / 3,
            lo,
            hi
        );
        mesh
    }

    /// Lowest and highest sampled height.
    pub fn height_range(&self) -> (f32, f32) {
        self.heightmap
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &h| (lo.min(h), hi.max(h)))
    }

    /// Height of the rendered surface at world `(x, z)`, clamped to the grid.
    ///
    /// Interpolates across the triangle the point falls in, matching the index
    /// layout, so it can differ from the continuous field between vertices.
    pub fn sample_height(&self, x: f32, z: f32) -> f32 {
        let res = self.resolution;
        let half_size = self.size / 2.0;
        let step = self.size / (res - 1) as f32;

        let gx = (x + half_size) / step;
        let gz = (z + half_size) / step;

        let x0 = (gx.floor().max(0.0) as usize).min(res - 2);
        let z0 = (gz.floor().max(0.0) as usize).min(res - 2);

        let fx = (gx - x0 as f32).clamp(0.0, 1.0);
        let fz = (gz - z0 as f32).clamp(0.0, 1.0);

        let h00 = self.heightmap[z0 * res + x0];
        let h10 = self.heightmap[z0 * res + x0 + 1];
        let h01 = self.heightmap[(z0 + 1) * res + x0];
        let h11 = self.heightmap[(z0 + 1) * res + x0 + 1];

        // Diagonal runs from (x0, z1) to (x1, z0).
        if fx + fz <= 1.0 {
            h00 + fx * (h10 - h00) + fz * (h01 - h00)
        } else {
            h11 + (1.0 - fx) * (h01 - h11) + (1.0 - fz) * (h10 - h11)
        }
    }

    fn calculate_normals(vertices: &mut [TerrainVertex], resolution: usize) {
        let mut normals: Vec<Vec3> = vec![Vec3::ZERO; vertices.len()];

        for z in 0..(resolution - 1) {
            for x in 0..(resolution - 1) {
                let i0 = z * resolution + x;
                let i1 = i0 + 1;
                let i2 = (z + 1) * resolution + x;
                let i3 = i2 + 1;

                let v0: Vec3 = vertices[i0].position.into();
                let v1: Vec3 = vertices[i1].position.into();
                let v2: Vec3 = vertices[i2].position.into();
                let v3: Vec3 = vertices[i3].position.into();

                let n1 = (v2 - v0).cross(v1 - v0).normalize_or_zero();
                normals[i0] += n1;
                normals[i2] += n1;
                normals[i1] += n1;

                let n2 = (v2 - v1).cross(v3 - v1).normalize_or_zero();
                normals[i1] += n2;
                normals[i2] += n2;
                normals[i3] += n2;
            }
        }

        for (vertex, n) in vertices.iter_mut().zip(normals) {
            vertex.normal = n.try_normalize().unwrap_or(Vec3::Y).to_array();
        }
    }
}
