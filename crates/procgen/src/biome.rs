//! Biome selection and per-biome height functions.
//!
//! A coarse noise sample picks one of three biomes with a hard switch at fixed
//! thresholds. Each biome sums three octaves of the same noise field with its
//! own starting amplitude and frequency. The raw sum is then squashed through
//! a smoothstep over [-1, 1].

use engine_core::ConfigError;
use noise::NoiseFn;
use serde::{Deserialize, Serialize};

/// Height-generating regime at a terrain location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Biome {
    /// Busy, high-frequency rolling hills.
    Hill,
    /// Broad, deep undulation.
    Valley,
    /// Low-frequency, gentle relief.
    Plateau,
}

impl Biome {
    pub fn name(self) -> &'static str {
        match self {
            Biome::Hill => "hill",
            Biome::Valley => "valley",
            Biome::Plateau => "plateau",
        }
    }
}

/// Band edges on the biome selector value.
///
/// Bands are half-open: `selector < low` is hill, `low <= selector < high` is
/// valley, anything else is plateau.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BiomeThresholds {
    pub low: f64,
    pub high: f64,
}

impl Default for BiomeThresholds {
    fn default() -> Self {
        Self { low: -0.3, high: 0.1 }
    }
}

impl BiomeThresholds {
    pub fn select(&self, selector: f64) -> Biome {
        if selector < self.low {
            Biome::Hill
        } else if selector < self.high {
            Biome::Valley
        } else {
            Biome::Plateau
        }
    }
}

/// Fractal sum parameters for one biome.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OctaveProfile {
    /// Amplitude of the first octave.
    pub amplitude: f64,
    /// Frequency of the first octave.
    pub frequency: f64,
    /// Frequency multiplier per octave.
    pub lacunarity: f64,
    /// Amplitude multiplier per octave.
    #[serde(default = "default_persistence")]
    pub persistence: f64,
    #[serde(default = "default_octaves")]
    pub octaves: u32,
}

fn default_persistence() -> f64 {
    0.5
}
fn default_octaves() -> u32 {
    3
}

impl OctaveProfile {
    pub const HILL: Self = Self::new(3.0, 1.5, 1.5);
    pub const VALLEY: Self = Self::new(4.0, 0.5, 2.0);
    pub const PLATEAU: Self = Self::new(2.0, 0.25, 1.5);

    pub const fn new(amplitude: f64, frequency: f64, lacunarity: f64) -> Self {
        Self {
            amplitude,
            frequency,
            lacunarity,
            persistence: 0.5,
            octaves: 3,
        }
    }

    /// Sum the octaves of `noise` at `(x, z)`.
    pub fn sample<N>(&self, noise: &N, x: f64, z: f64) -> f64
    where
        N: NoiseFn<f64, 2> + ?Sized,
    {
        let mut height = 0.0;
        let mut amplitude = self.amplitude;
        let mut frequency = self.frequency;

        for _ in 0..self.octaves {
            height += noise.get([x * frequency, z * frequency]) * amplitude;
            amplitude *= self.persistence;
            frequency *= self.lacunarity;
        }

        height
    }

    /// Largest magnitude `sample` can reach for noise bounded by ±1.
    pub fn amplitude_sum(&self) -> f64 {
        let mut total = 0.0;
        let mut amplitude = self.amplitude;
        for _ in 0..self.octaves {
            total += amplitude;
            amplitude *= self.persistence;
        }
        total
    }

    fn validate(&self, field: &'static str) -> Result<(), ConfigError> {
        ConfigError::require_finite(field, self.amplitude)?;
        ConfigError::require_positive(field, self.frequency)?;
        ConfigError::require_positive(field, self.lacunarity)?;
        ConfigError::require_finite(field, self.persistence)?;
        if self.octaves == 0 {
            return Err(ConfigError::Invalid {
                field,
                reason: "at least one octave is required".into(),
            });
        }
        Ok(())
    }
}

/// Everything that shapes the biome layer of the terrain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BiomeSettings {
    /// Scale applied to coordinates before sampling the biome selector.
    pub biome_scale: f64,
    pub thresholds: BiomeThresholds,
    pub hill: OctaveProfile,
    pub valley: OctaveProfile,
    pub plateau: OctaveProfile,
}

impl Default for BiomeSettings {
    fn default() -> Self {
        Self {
            biome_scale: 0.05,
            thresholds: BiomeThresholds::default(),
            hill: OctaveProfile::HILL,
            valley: OctaveProfile::VALLEY,
            plateau: OctaveProfile::PLATEAU,
        }
    }
}

impl BiomeSettings {
    pub fn profile(&self, biome: Biome) -> &OctaveProfile {
        match biome {
            Biome::Hill => &self.hill,
            Biome::Valley => &self.valley,
            Biome::Plateau => &self.plateau,
        }
    }

    /// Coarse selector value at `(x, z)` in noise space.
    pub fn selector<N>(&self, noise: &N, x: f64, z: f64) -> f64
    where
        N: NoiseFn<f64, 2> + ?Sized,
    {
        noise.get([x * self.biome_scale, z * self.biome_scale])
    }

    pub fn select<N>(&self, noise: &N, x: f64, z: f64) -> Biome
    where
        N: NoiseFn<f64, 2> + ?Sized,
    {
        self.thresholds.select(self.selector(noise, x, z))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::require_positive("biomes.biome_scale", self.biome_scale)?;
        ConfigError::require_finite("biomes.thresholds.low", self.thresholds.low)?;
        ConfigError::require_finite("biomes.thresholds.high", self.thresholds.high)?;
        if self.thresholds.low > self.thresholds.high {
            return Err(ConfigError::Invalid {
                field: "biomes.thresholds",
                reason: format!(
                    "low ({}) must not exceed high ({})",
                    self.thresholds.low, self.thresholds.high
                ),
            });
        }
        self.hill.validate("biomes.hill")?;
        self.valley.validate("biomes.valley")?;
        self.plateau.validate("biomes.plateau")
    }
}

/// Hermite smoothstep of `x` between `edge0` and `edge1`, clamped to [0, 1].
#[inline]
pub fn smoothstep(edge0: f64, edge1: f64, x: f64) -> f64 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Terrain height in [0, 1] at noise-space `(x, z)`.
pub fn biome_height<N>(noise: &N, settings: &BiomeSettings, x: f64, z: f64) -> f64
where
    N: NoiseFn<f64, 2> + ?Sized,
{
    let biome = settings.select(noise, x, z);
    let raw = settings.profile(biome).sample(noise, x, z);
    // Raw sums run well past ±1 and get clipped here. The terrain shape relies on it.
    smoothstep(-1.0, 1.0, raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use noise::Constant;

    /// Returns the x coordinate, so octave sums expose the frequencies used.
    struct XRamp;

    impl NoiseFn<f64, 2> for XRamp {
        fn get(&self, point: [f64; 2]) -> f64 {
            point[0]
        }
    }

    #[test]
    fn thresholds_are_half_open() {
        let t = BiomeThresholds::default();
        assert_eq!(t.select(-0.9), Biome::Hill);
        assert_eq!(t.select(-0.300_001), Biome::Hill);
        assert_eq!(t.select(-0.3), Biome::Valley);
        assert_eq!(t.select(0.0), Biome::Valley);
        assert_eq!(t.select(0.099_999), Biome::Valley);
        assert_eq!(t.select(0.1), Biome::Plateau);
        assert_eq!(t.select(0.9), Biome::Plateau);
    }

    #[test]
    fn octave_sum_halves_amplitude_and_grows_frequency() {
        // 3*1.5 + 1.5*2.25 + 0.75*3.375
        assert_eq!(OctaveProfile::HILL.sample(&XRamp, 1.0, 0.0), 10.40625);
        // 4*0.5 + 2*1.0 + 1*2.0
        assert_eq!(OctaveProfile::VALLEY.sample(&XRamp, 1.0, 0.0), 6.0);
        // 2*0.25 + 1*0.375 + 0.5*0.5625
        assert_eq!(OctaveProfile::PLATEAU.sample(&XRamp, 1.0, 0.0), 1.15625);
    }

    #[test]
    fn amplitude_sums_exceed_unit_range() {
        assert_eq!(OctaveProfile::HILL.amplitude_sum(), 5.25);
        assert_eq!(OctaveProfile::VALLEY.amplitude_sum(), 7.0);
        assert_eq!(OctaveProfile::PLATEAU.amplitude_sum(), 3.5);
    }

    #[test]
    fn smoothstep_clamps_and_eases() {
        assert_eq!(smoothstep(-1.0, 1.0, -5.0), 0.0);
        assert_eq!(smoothstep(-1.0, 1.0, 5.0), 1.0);
        assert_eq!(smoothstep(-1.0, 1.0, 0.0), 0.5);
        assert!(smoothstep(-1.0, 1.0, 0.5) > 0.75);
    }

    #[test]
    fn constant_noise_picks_biome_and_clamps() {
        let settings = BiomeSettings::default();

        // Selector 0.0 is valley; the octave sum is zero, the midpoint of the curve.
        assert_eq!(settings.select(&Constant::new(0.0), 3.0, 4.0), Biome::Valley);
        assert_eq!(biome_height(&Constant::new(0.0), &settings, 3.0, 4.0), 0.5);

        // Selector 0.5 is plateau; 0.5 * 3.5 is past the upper edge.
        assert_eq!(settings.select(&Constant::new(0.5), 3.0, 4.0), Biome::Plateau);
        assert_eq!(biome_height(&Constant::new(0.5), &settings, 3.0, 4.0), 1.0);

        // Selector -0.35 is hill; -0.35 * 5.25 is past the lower edge.
        assert_eq!(settings.select(&Constant::new(-0.35), 3.0, 4.0), Biome::Hill);
        assert_eq!(biome_height(&Constant::new(-0.35), &settings, 3.0, 4.0), 0.0);
    }

    #[test]
    fn small_sums_pass_through_the_curve() {
        let settings = BiomeSettings::default();
        // Valley selector; raw = 0.05 * 7 = 0.35 -> t = 0.675
        let h = biome_height(&Constant::new(0.05), &settings, 0.0, 0.0);
        let t: f64 = (0.05 * 4.0 + 0.05 * 2.0 + 0.05 * 1.0 + 1.0) / 2.0;
        assert!((h - t * t * (3.0 - 2.0 * t)).abs() < 1e-12);
    }

    #[test]
    fn validation_rejects_inverted_thresholds() {
        let mut settings = BiomeSettings::default();
        assert!(settings.validate().is_ok());
        settings.thresholds = BiomeThresholds { low: 0.5, high: -0.5 };
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::Invalid { field: "biomes.thresholds", .. })
        ));
    }

    #[test]
    fn validation_rejects_zero_octaves() {
        let mut settings = BiomeSettings::default();
        settings.valley.octaves = 0;
        assert!(settings.validate().is_err());
    }
}
