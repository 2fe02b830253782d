//! Swept terrain collision for a radius- and height-bounded character.
//!
//! Each call walks the straight line from the old to the candidate position in
//! sub-steps no longer than half the character radius, checks the terrain at
//! every sub-step, snaps onto ground within step height, and stops dead in
//! front of slopes steeper than the climb limit. No state survives between
//! calls.

use engine_core::{ConfigError, HeightSource, KinematicState};
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Tunables for terrain collision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionParams {
    /// Vertical acceleration in units/s² (negative is down).
    pub gravity: f32,
    /// Highest rise the character snaps up onto without being blocked.
    pub step_height: f32,
    /// Steepest walkable slope, in degrees.
    pub max_climb_angle_deg: f32,
    /// Half-width of the central difference used to estimate slope.
    pub slope_probe: f32,
}

impl Default for CollisionParams {
    fn default() -> Self {
        Self {
            gravity: -19.8,
            step_height: 0.5,
            max_climb_angle_deg: 60.0,
            slope_probe: 0.1,
        }
    }
}

impl CollisionParams {
    /// Steepest walkable slope, in radians.
    pub fn max_climb_angle(&self) -> f32 {
        self.max_climb_angle_deg.to_radians()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::require_finite("collision.gravity", self.gravity as f64)?;
        ConfigError::require_finite("collision.step_height", self.step_height as f64)?;
        ConfigError::require_positive("collision.slope_probe", self.slope_probe as f64)?;
        if !(0.0..=90.0).contains(&self.max_climb_angle_deg) {
            return Err(ConfigError::Invalid {
                field: "collision.max_climb_angle_deg",
                reason: format!("{} is outside 0..=90", self.max_climb_angle_deg),
            });
        }
        Ok(())
    }
}

/// One tick's movement request.
///
/// Positions and velocity must be finite; `radius` and `height` must be
/// positive and `dt` non-negative. Non-finite displacement is treated as no
/// movement, but other non-finite input is the caller's problem.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepInput {
    pub old_position: Vec3,
    pub new_position: Vec3,
    pub radius: f32,
    pub height: f32,
    pub velocity: Vec3,
    pub dt: f32,
}

/// Corrected kinematics after a sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionStep {
    pub position: Vec3,
    pub velocity: Vec3,
    pub on_ground: bool,
    /// Slope at the last evaluated sub-step, in radians.
    pub slope_angle: f32,
}

impl From<CollisionStep> for KinematicState {
    fn from(step: CollisionStep) -> Self {
        Self {
            position: step.position,
            velocity: step.velocity,
            on_ground: step.on_ground,
            slope_angle: step.slope_angle,
        }
    }
}

/// Number of sub-steps for a sweep of `distance` by a character of `radius`.
///
/// No sub-step is longer than `radius / 2`. Zero (or degenerate) distance still
/// gets one pass so ground contact is checked where the character stands.
pub fn substep_count(distance: f32, radius: f32) -> u32 {
    if distance > 0.0 && distance.is_finite() {
        ((distance / (radius * 0.5)).ceil() as u32).max(1)
    } else {
        1
    }
}

/// Terrain slope at `(x, z)` in radians, from central differences `probe` apart.
pub fn slope_angle_at<H>(terrain: &H, probe: f32, x: f32, z: f32) -> f32
where
    H: HeightSource + ?Sized,
{
    let dx = terrain.height_at(x + probe, z) - terrain.height_at(x - probe, z);
    let dz = terrain.height_at(x, z + probe) - terrain.height_at(x, z - probe);
    // Rise over the 2 * probe run; y is never zero, so this always normalizes.
    let normal = Vec3::new(dx, 2.0 * probe, dz).normalize();
    normal.dot(Vec3::Y).clamp(-1.0, 1.0).acos()
}

/// Sweep a character from `input.old_position` toward `input.new_position`.
///
/// Gravity is integrated into the velocity once per call. Landing or stepping
/// onto walkable ground snaps the character to `ground + step_height` and zeroes
/// vertical velocity. Hitting an over-steep slope zeroes horizontal velocity and
/// ends the sweep at the last accepted sub-step. Jumps are the caller's job,
/// applied after this returns, based on `on_ground`.
pub fn resolve<H>(terrain: &H, params: &CollisionParams, input: &SweepInput) -> CollisionStep
where
    H: HeightSource + ?Sized,
{
    let delta = input.new_position - input.old_position;
    let length = delta.length();
    let (direction, distance) = if length.is_finite() && length > 0.0 {
        (delta / length, length)
    } else {
        (Vec3::ZERO, 0.0)
    };

    let mut position = input.old_position;
    let mut velocity = input.velocity;
    let mut on_ground = false;
    let mut slope_angle = 0.0;
    let max_climb = params.max_climb_angle();

    velocity.y += params.gravity * input.dt;

    let steps = substep_count(distance, input.radius);
    for i in 1..=steps {
        let travelled = (i as f32 / steps as f32) * distance;
        let mut candidate = input.old_position + direction * travelled;

        let ground = terrain.height_at(candidate.x, candidate.z);
        slope_angle = slope_angle_at(terrain, params.slope_probe, candidate.x, candidate.z);

        if candidate.y <= ground + params.step_height {
            if slope_angle <= max_climb {
                candidate.y = ground + params.step_height;
                on_ground = true;
                velocity.y = 0.0;
            } else {
                log::trace!(
                    "Slope {:.1}° blocks sub-step {}/{} at ({:.2}, {:.2})",
                    slope_angle.to_degrees(),
                    i,
                    steps,
                    candidate.x,
                    candidate.z
                );
                velocity.x = 0.0;
                velocity.z = 0.0;
                break;
            }
        } else if candidate.y > ground + input.height {
            on_ground = false;
        }

        position = candidate;
    }

    CollisionStep {
        position,
        velocity,
        on_ground,
        slope_angle,
    }
}
