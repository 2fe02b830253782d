//! Simulation configuration. Loaded from `heightwalk.ron` at startup.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use engine_core::ConfigError;
use physics::CollisionParams;
use procgen::TerrainConfig;
use serde::{Deserialize, Serialize};

use crate::character::CharacterParams;

/// Default config file, looked up in the current directory.
pub const DEFAULT_CONFIG_FILE: &str = "heightwalk.ron";

/// Everything the headless run needs. Every section and field is optional in the file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub terrain: TerrainConfig,
    pub collision: CollisionParams,
    pub character: CharacterParams,
    pub sim: RunSettings,
}

/// How many characters to drive and for how long.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSettings {
    /// Characters to spawn.
    #[serde(default = "default_characters")]
    pub characters: u32,
    /// Simulated seconds to run.
    #[serde(default = "default_duration")]
    pub duration_secs: f32,
    /// Physics ticks per second.
    #[serde(default = "default_fixed_hz")]
    pub fixed_hz: f64,
    /// Frames per second fed into the clock (need not match `fixed_hz`).
    #[serde(default = "default_frame_hz")]
    pub frame_hz: f64,
    /// Seed for spawn points and wander behaviour.
    #[serde(default = "default_spawn_seed")]
    pub spawn_seed: u64,
    /// Characters spawn within this distance of the origin on each axis.
    #[serde(default = "default_spawn_radius")]
    pub spawn_radius: f32,
    /// Spawn height above the terrain.
    #[serde(default = "default_drop_height")]
    pub drop_height: f32,
}

fn default_characters() -> u32 {
    4
}
fn default_duration() -> f32 {
    10.0
}
fn default_fixed_hz() -> f64 {
    60.0
}
fn default_frame_hz() -> f64 {
    50.0
}
fn default_spawn_seed() -> u64 {
    31
}
fn default_spawn_radius() -> f32 {
    60.0
}
fn default_drop_height() -> f32 {
    20.0
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            characters: default_characters(),
            duration_secs: default_duration(),
            fixed_hz: default_fixed_hz(),
            frame_hz: default_frame_hz(),
            spawn_seed: default_spawn_seed(),
            spawn_radius: default_spawn_radius(),
            drop_height: default_drop_height(),
        }
    }
}

impl RunSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::require_finite("sim.duration_secs", self.duration_secs as f64)?;
        ConfigError::require_positive("sim.fixed_hz", self.fixed_hz)?;
        ConfigError::require_positive("sim.frame_hz", self.frame_hz)?;
        ConfigError::require_finite("sim.spawn_radius", self.spawn_radius as f64)?;
        ConfigError::require_finite("sim.drop_height", self.drop_height as f64)
    }
}

impl SimConfig {
    /// Parse from RON text.
    pub fn from_ron(text: &str) -> Result<Self> {
        ron::from_str(text).context("could not parse simulation config")
    }

    /// Load config from `path`, or from `heightwalk.ron` if none is given.
    /// A missing file yields defaults; an unreadable or malformed one is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path.map(Path::to_path_buf).unwrap_or_else(config_path);
        if !path.exists() {
            log::info!("No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(&path)
            .with_context(|| format!("could not read config {:?}", path))?;
        let config = Self::from_ron(&data).with_context(|| format!("in {:?}", path))?;
        log::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Save current config to `path` as pretty RON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let text = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .context("could not serialize simulation config")?;
        std::fs::write(path, text).with_context(|| format!("could not write config {:?}", path))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.terrain.validate()?;
        self.collision.validate()?;
        self.character.validate()?;
        self.sim.validate()
    }
}

fn config_path() -> PathBuf {
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(DEFAULT_CONFIG_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = SimConfig::from_ron("()").unwrap();
        assert_eq!(config, SimConfig::default());
        assert_eq!(config.terrain.seed, "31");
        assert_eq!(config.collision.gravity, -19.8);
        assert_eq!(config.character.jump_force, 15.0);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let text = r#"(
            terrain: (seed: "1337", height_scale: 25.0),
            collision: (max_climb_angle_deg: 45.0),
            sim: (characters: 9),
        )"#;
        let config = SimConfig::from_ron(text).unwrap();
        assert_eq!(config.terrain.seed, "1337");
        assert_eq!(config.terrain.height_scale, 25.0);
        assert_eq!(config.terrain.segments, 100);
        assert_eq!(config.collision.max_climb_angle_deg, 45.0);
        assert_eq!(config.collision.step_height, 0.5);
        assert_eq!(config.sim.characters, 9);
        assert_eq!(config.sim.fixed_hz, 60.0);
    }

    #[test]
    fn biome_thresholds_are_configurable() {
        let text = r#"(terrain: (biomes: (thresholds: (low: -0.5, high: 0.2))))"#;
        let config = SimConfig::from_ron(text).unwrap();
        assert_eq!(config.terrain.biomes.thresholds.low, -0.5);
        assert_eq!(config.terrain.biomes.thresholds.high, 0.2);
        assert_eq!(config.terrain.biomes.biome_scale, 0.05);
    }

    #[test]
    fn malformed_text_is_an_error() {
        assert!(SimConfig::from_ron("(terrain: (size: \"big\"))").is_err());
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let path = std::env::temp_dir().join("heightwalk-definitely-missing-config.ron");
        let config = SimConfig::load(Some(&path)).unwrap();
        assert_eq!(config, SimConfig::default());
    }

    #[test]
    fn saved_config_loads_back() {
        let path = std::env::temp_dir().join(format!("heightwalk-save-{}.ron", std::process::id()));
        let mut config = SimConfig::default();
        config.sim.characters = 2;
        config.terrain.seed = "saved".into();
        config.save(&path).unwrap();
        let loaded = SimConfig::load(Some(&path)).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded, config);
    }

    #[test]
    fn validation_reaches_every_section() {
        assert!(SimConfig::default().validate().is_ok());

        let mut config = SimConfig::default();
        config.character.height = -1.0;
        assert!(config.validate().is_err());

        let mut config = SimConfig::default();
        config.sim.fixed_hz = 0.0;
        assert_eq!(
            config.validate(),
            Err(ConfigError::NotPositive { field: "sim.fixed_hz", value: 0.0 })
        );
    }
}
