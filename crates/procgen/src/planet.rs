//! Planet parameters supplied by the world-parameter generator.
//!
//! The simulation never trusts these values directly: [`PlanetConfig::sanitized`] clamps
//! every number and substitutes defaults for empty lists before generation runs.

use serde::{Deserialize, Serialize};

use crate::biome::{BiomeStyle, DEFAULT_BIOMES};

/// Weather kinds a planet can exhibit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum WeatherKind {
    #[default]
    Clear,
    Rain,
    Snow,
    Sandstorm,
    AcidRain,
    Ashfall,
    Storm,
}

impl WeatherKind {
    pub fn name(self) -> &'static str {
        match self {
            WeatherKind::Clear => "Clear",
            WeatherKind::Rain => "Rain",
            WeatherKind::Snow => "Snow",
            WeatherKind::Sandstorm => "Sandstorm",
            WeatherKind::AcidRain => "Acid Rain",
            WeatherKind::Ashfall => "Ashfall",
            WeatherKind::Storm => "Storm",
        }
    }

    /// Horizontal wind strength this weather pushes at full intensity.
    pub fn wind(self) -> f32 {
        match self {
            WeatherKind::Clear => 0.0,
            WeatherKind::Rain => 0.6,
            WeatherKind::Snow => 0.3,
            WeatherKind::Sandstorm => 2.0,
            WeatherKind::AcidRain => 0.5,
            WeatherKind::Ashfall => 0.4,
            WeatherKind::Storm => 1.6,
        }
    }
}

/// Palette handed over with the planet. RGB in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlanetColors {
    pub sky: [f32; 3],
    pub ground: [f32; 3],
    pub accent: [f32; 3],
    pub foliage: [f32; 3],
}

impl Default for PlanetColors {
    fn default() -> Self {
        Self {
            sky: [0.45, 0.55, 0.75],
            ground: [0.48, 0.40, 0.32],
            accent: [0.85, 0.55, 0.25],
            foliage: [0.30, 0.55, 0.25],
        }
    }
}

impl PlanetColors {
    /// Blue-dominant ground reads as a frozen world.
    pub fn is_cold(&self) -> bool {
        let [r, g, b] = self.ground;
        b > r + 0.05 && b >= g
    }
}

/// Starting configuration for one mission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanetConfig {
    /// Gravity multiplier (1.0 = standard).
    #[serde(default = "default_gravity")]
    pub gravity: f32,
    /// Enemy density in `[0, 1]`; scales squad size, elite odds and health.
    #[serde(default = "default_half")]
    pub enemy_density: f32,
    /// Extra weapon-drop odds in `[0, 1]`.
    #[serde(default)]
    pub rare_loot_chance: f32,
    #[serde(default)]
    pub allowed_biomes: Vec<BiomeStyle>,
    #[serde(default)]
    pub weather_traits: Vec<WeatherKind>,
    /// Vegetation factor in `[0, 1]`.
    #[serde(default = "default_half")]
    pub vegetation_density: f32,
    /// Odds in `[0, 1]` that a clear spell turns into weather.
    #[serde(default = "default_half")]
    pub weather_volatility: f32,
    #[serde(default)]
    pub colors: PlanetColors,
}

fn default_gravity() -> f32 {
    1.0
}
fn default_half() -> f32 {
    0.5
}

impl Default for PlanetConfig {
    fn default() -> Self {
        Self {
            gravity: default_gravity(),
            enemy_density: default_half(),
            rare_loot_chance: 0.0,
            allowed_biomes: DEFAULT_BIOMES.to_vec(),
            weather_traits: vec![WeatherKind::Clear, WeatherKind::Rain],
            vegetation_density: default_half(),
            weather_volatility: default_half(),
            colors: PlanetColors::default(),
        }
    }
}

/// Lowest and highest gravity multipliers the integrator accepts.
pub const GRAVITY_RANGE: (f32, f32) = (0.1, 3.0);

fn clamp_unit(value: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        fallback
    }
}

fn clamp_color(c: [f32; 3]) -> [f32; 3] {
    c.map(|v| clamp_unit(v, 0.5))
}

impl PlanetConfig {
    /// Copy with every field forced into its valid range.
    pub fn sanitized(&self) -> Self {
        let gravity = if self.gravity.is_finite() {
            self.gravity.clamp(GRAVITY_RANGE.0, GRAVITY_RANGE.1)
        } else {
            default_gravity()
        };
        let allowed_biomes = if self.allowed_biomes.is_empty() {
            log::warn!("Planet allows no biome styles, using defaults");
            DEFAULT_BIOMES.to_vec()
        } else {
            self.allowed_biomes.clone()
        };
        let weather_traits = if self.weather_traits.is_empty() {
            vec![WeatherKind::Clear]
        } else {
            self.weather_traits.clone()
        };
        Self {
            gravity,
            enemy_density: clamp_unit(self.enemy_density, default_half()),
            rare_loot_chance: clamp_unit(self.rare_loot_chance, 0.0),
            allowed_biomes,
            weather_traits,
            vegetation_density: clamp_unit(self.vegetation_density, default_half()),
            weather_volatility: clamp_unit(self.weather_volatility, default_half()),
            colors: PlanetColors {
                sky: clamp_color(self.colors.sky),
                ground: clamp_color(self.colors.ground),
                accent: clamp_color(self.colors.accent),
                foliage: clamp_color(self.colors.foliage),
            },
        }
    }

    /// Weather kinds other than clear this planet can roll.
    pub fn active_weather(&self) -> Vec<WeatherKind> {
        self.weather_traits
            .iter()
            .copied()
            .filter(|k| *k != WeatherKind::Clear)
            .collect()
    }
}
