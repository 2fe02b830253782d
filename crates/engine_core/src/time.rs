//! Fixed-step simulation time.

/// Longest frame delta the clock will absorb at once, in seconds.
/// Longer stalls are truncated so a hitch cannot queue hundreds of ticks.
const MAX_FRAME_DELTA: f32 = 0.25;

/// Accumulates frame deltas and releases them as fixed simulation ticks.
#[derive(Debug, Clone)]
pub struct SimClock {
    /// Fixed timestep in seconds (default 60 Hz).
    fixed_timestep: f32,
    /// Accumulated time not yet consumed by ticks.
    accumulator: f32,
    /// Total simulated time consumed by ticks.
    elapsed: f64,
    /// Ticks consumed since start.
    tick_count: u64,
}

impl Default for SimClock {
    fn default() -> Self {
        Self::new(60.0)
    }
}

impl SimClock {
    /// Create a clock ticking at `hz` ticks per second.
    pub fn new(hz: f64) -> Self {
        Self {
            fixed_timestep: (1.0 / hz) as f32,
            accumulator: 0.0,
            elapsed: 0.0,
            tick_count: 0,
        }
    }

    /// Feed a frame delta (seconds) into the accumulator.
    pub fn advance(&mut self, frame_delta: f32) {
        if frame_delta > MAX_FRAME_DELTA {
            log::debug!("Frame delta {:.3}s truncated to {:.3}s", frame_delta, MAX_FRAME_DELTA);
        }
        self.accumulator += frame_delta.clamp(0.0, MAX_FRAME_DELTA);
    }

    /// Check if a fixed tick should run and consume the time.
    pub fn should_tick(&mut self) -> bool {
        if self.accumulator >= self.fixed_timestep {
            self.accumulator -= self.fixed_timestep;
            self.elapsed += self.fixed_timestep as f64;
            self.tick_count += 1;
            true
        } else {
            false
        }
    }

    /// Get the fixed timestep in seconds.
    pub fn fixed_timestep_seconds(&self) -> f32 {
        self.fixed_timestep
    }

    /// Get total simulated time in seconds.
    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Fraction of a tick left in the accumulator, for interpolation.
    pub fn alpha(&self) -> f32 {
        self.accumulator / self.fixed_timestep
    }
}
