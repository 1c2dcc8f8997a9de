//! Biome styles that shape each terrain chunk.

use serde::{Deserialize, Serialize};

use crate::hazard::HazardKind;

/// Terrain styles a planet can allow. One is picked per chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BiomeStyle {
    /// Gentle random walk.
    Rolling,
    /// Smooth sinusoidal sand waves.
    Dunes,
    /// Broken rock with jittery, noisy steps.
    Crags,
    /// Flat shelves with a step every 15 segments.
    Plateaus,
    /// Sharp alternating spikes.
    Spires,
}

/// Per-style generation parameters.
#[derive(Debug, Clone, Copy)]
pub struct StyleProfile {
    pub style: BiomeStyle,
    /// Largest height change between consecutive samples.
    pub max_delta: f32,
    /// Base chance of a plant per segment before the planet factor.
    pub vegetation_density: f32,
    /// Hazard this style favors when one is rolled.
    pub hazard_bias: Option<HazardKind>,
}

impl BiomeStyle {
    /// Get the generation profile for this style.
    pub fn profile(self) -> StyleProfile {
        match self {
            BiomeStyle::Rolling => StyleProfile {
                style: self,
                max_delta: 6.0,
                vegetation_density: 0.45,
                hazard_bias: None,
            },
            BiomeStyle::Dunes => StyleProfile {
                style: self,
                max_delta: 8.0,
                vegetation_density: 0.15,
                hazard_bias: Some(HazardKind::Acid),
            },
            BiomeStyle::Crags => StyleProfile {
                style: self,
                max_delta: 18.0,
                vegetation_density: 0.25,
                hazard_bias: Some(HazardKind::Lava),
            },
            // Plateau steps are the tallest single change a player has to climb.
            BiomeStyle::Plateaus => StyleProfile {
                style: self,
                max_delta: 40.0,
                vegetation_density: 0.35,
                hazard_bias: Some(HazardKind::Geyser),
            },
            BiomeStyle::Spires => StyleProfile {
                style: self,
                max_delta: 30.0,
                vegetation_density: 0.10,
                hazard_bias: Some(HazardKind::Electric),
            },
        }
    }

    pub fn max_delta(self) -> f32 {
        self.profile().max_delta
    }

    pub fn name(self) -> &'static str {
        match self {
            BiomeStyle::Rolling => "rolling",
            BiomeStyle::Dunes => "dunes",
            BiomeStyle::Crags => "crags",
            BiomeStyle::Plateaus => "plateaus",
            BiomeStyle::Spires => "spires",
        }
    }
}

/// All styles for iteration.
pub const ALL_STYLES: [BiomeStyle; 5] = [
    BiomeStyle::Rolling,
    BiomeStyle::Dunes,
    BiomeStyle::Crags,
    BiomeStyle::Plateaus,
    BiomeStyle::Spires,
];

/// Fallback set used when a planet allows no styles.
pub const DEFAULT_BIOMES: [BiomeStyle; 3] = [
    BiomeStyle::Rolling,
    BiomeStyle::Dunes,
    BiomeStyle::Crags,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_style_has_a_positive_delta() {
        for style in ALL_STYLES {
            assert!(style.max_delta() > 0.0, "{} delta", style.name());
        }
    }

    #[test]
    fn plateaus_allow_the_tallest_step() {
        let tallest = ALL_STYLES
            .iter()
            .map(|s| s.max_delta())
            .fold(0.0_f32, f32::max);
        assert_eq!(tallest, BiomeStyle::Plateaus.max_delta());
    }
}
