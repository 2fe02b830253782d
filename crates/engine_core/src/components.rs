//! Common ECS components used across the engine.

use glam::Vec3;

/// Position, velocity and ground contact of a moving agent.
///
/// Owned by whoever drives the agent. The collision resolver takes the
/// position and velocity by value each tick and hands back a fresh state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KinematicState {
    pub position: Vec3,
    pub velocity: Vec3,
    pub on_ground: bool,
    /// Terrain slope under the agent, in radians, from the last resolve.
    pub slope_angle: f32,
}

impl KinematicState {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }
}

impl Default for KinematicState {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            on_ground: false,
            slope_angle: 0.0,
        }
    }
}

/// Tag component for terrain-walking characters.
#[derive(Debug, Clone, Copy, Default)]
pub struct Character;

/// Facing around the Y axis, in radians.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Heading {
    pub yaw: f32,
}

impl Heading {
    pub fn new(yaw: f32) -> Self {
        Self { yaw }
    }

    pub fn turn(&mut self, angle: f32) {
        self.yaw = (self.yaw + angle).rem_euclid(std::f32::consts::TAU);
    }
}
