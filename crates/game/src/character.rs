//! Terrain-walking character controller.

use engine_core::{ConfigError, HeightSource, KinematicState, Vec3};
use physics::{resolve, CollisionParams, CollisionStep, SweepInput};
use serde::{Deserialize, Serialize};

/// Movement tuning for a character.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterParams {
    /// Walk speed in units/s.
    pub speed: f32,
    /// Bounding radius; also sets the collision sub-step length.
    pub radius: f32,
    /// Bounding height.
    pub height: f32,
    /// Upward velocity applied on jump.
    pub jump_force: f32,
}

impl Default for CharacterParams {
    fn default() -> Self {
        Self {
            speed: 25.5,
            radius: 1.0,
            height: 2.0,
            jump_force: 15.0,
        }
    }
}

impl CharacterParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::require_finite("character.speed", self.speed as f64)?;
        ConfigError::require_positive("character.radius", self.radius as f64)?;
        ConfigError::require_positive("character.height", self.height as f64)?;
        ConfigError::require_finite("character.jump_force", self.jump_force as f64)
    }
}

/// Held movement keys for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveIntent {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
    pub jump: bool,
}

impl MoveIntent {
    /// Unit horizontal walk direction for a character facing `yaw`, or zero.
    pub fn direction(&self, yaw: f32) -> Vec3 {
        let (sin, cos) = yaw.sin_cos();
        let forward = Vec3::new(-sin, 0.0, -cos);
        let right = Vec3::new(cos, 0.0, -sin);

        let mut direction = Vec3::ZERO;
        if self.forward {
            direction += forward;
        }
        if self.back {
            direction -= forward;
        }
        if self.left {
            direction -= right;
        }
        if self.right {
            direction += right;
        }
        direction.normalize_or_zero()
    }
}

/// Owns a character's kinematic state and advances it against the terrain.
#[derive(Debug, Clone)]
pub struct CharacterController {
    pub state: KinematicState,
    pub params: CharacterParams,
}

impl CharacterController {
    pub fn new(position: Vec3, params: CharacterParams) -> Self {
        Self {
            state: KinematicState::at(position),
            params,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.state.position
    }

    pub fn is_grounded(&self) -> bool {
        self.state.on_ground
    }

    /// Advance one tick of `dt` seconds.
    ///
    /// Walk input and current velocity form the candidate position; collision
    /// corrects it. A jump is only granted when the corrected state is grounded.
    pub fn tick<H>(
        &mut self,
        terrain: &H,
        collision: &CollisionParams,
        intent: &MoveIntent,
        yaw: f32,
        dt: f32,
    ) -> CollisionStep
    where
        H: HeightSource + ?Sized,
    {
        let walk = intent.direction(yaw) * self.params.speed * dt;
        let old_position = self.state.position;
        let new_position = old_position + walk + self.state.velocity * dt;

        let mut step = resolve(
            terrain,
            collision,
            &SweepInput {
                old_position,
                new_position,
                radius: self.params.radius,
                height: self.params.height,
                velocity: self.state.velocity,
                dt,
            },
        );

        if intent.jump && step.on_ground {
            step.velocity.y = self.params.jump_force;
        }

        self.state = step.into();
        step
    }
}
