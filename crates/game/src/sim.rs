//! Headless simulation: characters wandering over the height field.

use engine_core::{Character, Heading, SimClock, Vec3, World};
use physics::CollisionParams;
use procgen::{Biome, HeightField};
use rand::prelude::*;

use crate::character::{CharacterController, MoveIntent};
use crate::config::SimConfig;

/// Scripted input for a character that walks forward, drifts its heading and
/// jumps now and then.
#[derive(Debug, Clone, Copy)]
pub struct Wander {
    /// Heading change in radians per second.
    pub turn_rate: f32,
    /// Seconds between jump attempts.
    pub jump_interval: f32,
    /// Seconds until the next jump attempt.
    pub jump_timer: f32,
}

impl Wander {
    /// Input for this tick. Counts down the jump timer.
    pub fn intent(&mut self, dt: f32) -> MoveIntent {
        self.jump_timer -= dt;
        let jump = self.jump_timer <= 0.0;
        if jump {
            self.jump_timer += self.jump_interval;
        }
        MoveIntent {
            forward: true,
            jump,
            ..Default::default()
        }
    }
}

/// Per-character snapshot for reporting.
#[derive(Debug, Clone, Copy)]
pub struct CharacterReport {
    pub id: u32,
    pub position: Vec3,
    pub velocity: Vec3,
    pub on_ground: bool,
    pub slope_deg: f32,
    pub biome: Biome,
}

pub struct Simulation {
    world: World,
    terrain: HeightField,
    collision: CollisionParams,
    clock: SimClock,
}

impl Simulation {
    /// Build the height field and spawn characters as described by `config`.
    pub fn new(config: &SimConfig) -> Self {
        let mut sim = Self {
            world: World::new(),
            terrain: HeightField::new(config.terrain.clone()),
            collision: config.collision,
            clock: SimClock::new(config.sim.fixed_hz),
        };
        sim.spawn_characters(config);
        sim
    }

    fn spawn_characters(&mut self, config: &SimConfig) {
        let settings = &config.sim;
        let mut rng = StdRng::seed_from_u64(settings.spawn_seed);
        let r = settings.spawn_radius.abs().max(f32::EPSILON);

        for id in 0..settings.characters {
            let x = rng.gen_range(-r..r);
            let z = rng.gen_range(-r..r);
            let y = self.terrain.terrain_height(x, z) + settings.drop_height;
            let heading = Heading::new(rng.gen_range(0.0..std::f32::consts::TAU));
            let jump_interval = rng.gen_range(1.5..4.0);
            let wander = Wander {
                turn_rate: rng.gen_range(-0.6..0.6),
                jump_interval,
                jump_timer: jump_interval,
            };
            let controller = CharacterController::new(Vec3::new(x, y, z), config.character);

            log::debug!("Spawned character {} at ({:.1}, {:.1}, {:.1})", id, x, y, z);
            self.world.spawn((Character, CharacterId(id), controller, heading, wander));
        }
    }

    pub fn terrain(&self) -> &HeightField {
        &self.terrain
    }

    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    /// Feed one frame of `frame_delta` seconds; returns how many ticks ran.
    pub fn frame(&mut self, frame_delta: f32) -> u32 {
        self.clock.advance(frame_delta);
        let mut ticks = 0;
        while self.clock.should_tick() {
            let dt = self.clock.fixed_timestep_seconds();
            self.tick(dt);
            ticks += 1;
        }
        ticks
    }

    /// Advance every character by one fixed step.
    pub fn tick(&mut self, dt: f32) {
        for (_entity, (controller, heading, wander, _character)) in self
            .world
            .query_mut::<(&mut CharacterController, &mut Heading, &mut Wander, &Character)>()
        {
            heading.turn(wander.turn_rate * dt);
            let intent = wander.intent(dt);
            let was_grounded = controller.is_grounded();
            controller.tick(&self.terrain, &self.collision, &intent, heading.yaw, dt);
            if !was_grounded && controller.is_grounded() {
                log::trace!("Character landed at {:?}", controller.position());
            }
        }
    }

    /// Current state of every character, ordered by id.
    pub fn reports(&self) -> Vec<CharacterReport> {
        let mut reports: Vec<CharacterReport> = self
            .world
            .query::<(&CharacterId, &CharacterController)>()
            .iter()
            .map(|(_entity, (id, controller))| {
                let state = controller.state;
                CharacterReport {
                    id: id.0,
                    position: state.position,
                    velocity: state.velocity,
                    on_ground: state.on_ground,
                    slope_deg: state.slope_angle.to_degrees(),
                    biome: self.terrain.biome_at(state.position.x, state.position.z),
                }
            })
            .collect();
        reports.sort_by_key(|r| r.id);
        reports
    }
}

/// Stable id for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharacterId(pub u32);

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config(characters: u32) -> SimConfig {
        let mut config = SimConfig::default();
        config.sim.characters = characters;
        config.sim.spawn_radius = 20.0;
        config
    }

    #[test]
    fn spawns_requested_characters_above_terrain() {
        let sim = Simulation::new(&small_config(3));
        let reports = sim.reports();
        assert_eq!(reports.len(), 3);
        for r in &reports {
            let ground = sim.terrain().terrain_height(r.position.x, r.position.z);
            assert!((r.position.y - ground - 20.0).abs() < 1e-3);
            assert!(!r.on_ground);
        }
    }

    #[test]
    fn same_seed_same_run() {
        let mut a = Simulation::new(&small_config(2));
        let mut b = Simulation::new(&small_config(2));
        for _ in 0..90 {
            a.frame(1.0 / 50.0);
            b.frame(1.0 / 50.0);
        }
        for (ra, rb) in a.reports().iter().zip(b.reports().iter()) {
            assert_eq!(ra.position, rb.position);
            assert_eq!(ra.velocity, rb.velocity);
        }
    }

    #[test]
    fn frames_release_fixed_ticks() {
        let mut sim = Simulation::new(&small_config(1));
        let mut ticks = 0;
        for _ in 0..50 {
            ticks += sim.frame(1.0 / 50.0);
        }
        // One second of frames at 60 Hz, give or take accumulator rounding.
        assert!((59..=60).contains(&ticks), "ran {} ticks", ticks);
        assert_eq!(sim.clock().tick_count(), ticks as u64);
    }

    #[test]
    fn characters_never_end_below_the_terrain() {
        let mut sim = Simulation::new(&small_config(4));
        for _ in 0..240 {
            sim.tick(1.0 / 60.0);
            for r in sim.reports() {
                assert!(r.position.is_finite());
                let ground = sim.terrain().terrain_height(r.position.x, r.position.z);
                assert!(
                    r.position.y + 1e-3 >= ground,
                    "character {} below terrain: {:?} vs {}",
                    r.id,
                    r.position,
                    ground
                );
            }
        }
    }

    #[test]
    fn wander_jumps_on_its_interval() {
        let mut wander = Wander {
            turn_rate: 0.0,
            jump_interval: 0.5,
            jump_timer: 0.5,
        };
        let jumps = (0..40).filter(|_| wander.intent(0.125).jump).count();
        assert_eq!(jumps, 10);
    }
}
