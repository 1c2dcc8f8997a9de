//! Environmental hazard strips anchored to the terrain.

use serde::{Deserialize, Serialize};

use crate::planet::PlanetColors;

/// Length of a geyser duty cycle in frame-ticks.
pub const GEYSER_CYCLE: f32 = 300.0;
/// Frame-ticks per cycle a geyser erupts.
pub const GEYSER_ACTIVE: f32 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HazardKind {
    Lava,
    Acid,
    Spikes,
    Ice,
    Geyser,
    Electric,
    None,
}

impl HazardKind {
    pub fn name(self) -> &'static str {
        match self {
            HazardKind::Lava => "lava",
            HazardKind::Acid => "acid",
            HazardKind::Spikes => "spikes",
            HazardKind::Ice => "ice",
            HazardKind::Geyser => "geyser",
            HazardKind::Electric => "electric",
            HazardKind::None => "none",
        }
    }

    /// Pick a hazard from the planet palette when the terrain style has no preference.
    pub fn from_palette(colors: &PlanetColors) -> Self {
        let [r, g, b] = colors.ground;
        if colors.is_cold() {
            HazardKind::Ice
        } else if r > g * 1.3 && r > b {
            HazardKind::Lava
        } else if g > r && g > b {
            HazardKind::Acid
        } else {
            HazardKind::Spikes
        }
    }
}

/// Horizontal hazard strip. Immutable after generation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HazardStrip {
    pub x: f32,
    pub width: f32,
    pub kind: HazardKind,
}

impl HazardStrip {
    pub fn new(x: f32, width: f32, kind: HazardKind) -> Self {
        Self { x, width, kind }
    }

    pub fn end(&self) -> f32 {
        self.x + self.width
    }

    /// Whether `x` lies inside the strip.
    pub fn contains_x(&self, x: f32) -> bool {
        x >= self.x && x <= self.end()
    }

    /// Whether the span `[left, right]` overlaps the strip.
    pub fn overlaps_span(&self, left: f32, right: f32) -> bool {
        left <= self.end() && right >= self.x
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width * 0.5
    }

    /// Geyser eruption phase at mission time `clock` (frames), offset by strip position.
    pub fn is_erupting(&self, clock: f32) -> bool {
        if self.kind != HazardKind::Geyser {
            return false;
        }
        let phase = (clock + self.x).rem_euclid(GEYSER_CYCLE);
        phase < GEYSER_ACTIVE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geyser_duty_cycle_is_one_third() {
        let g = HazardStrip::new(0.0, 40.0, HazardKind::Geyser);
        let on = (0..300).filter(|t| g.is_erupting(*t as f32)).count();
        assert_eq!(on, 100);
    }

    #[test]
    fn geyser_phase_depends_on_position() {
        let a = HazardStrip::new(0.0, 40.0, HazardKind::Geyser);
        let b = HazardStrip::new(150.0, 40.0, HazardKind::Geyser);
        assert!(a.is_erupting(10.0));
        assert!(!b.is_erupting(10.0));
    }

    #[test]
    fn palette_fallback() {
        let mut colors = PlanetColors::default();
        colors.ground = [0.8, 0.3, 0.2];
        assert_eq!(HazardKind::from_palette(&colors), HazardKind::Lava);
        colors.ground = [0.3, 0.7, 0.3];
        assert_eq!(HazardKind::from_palette(&colors), HazardKind::Acid);
        colors.ground = [0.4, 0.5, 0.9];
        assert_eq!(HazardKind::from_palette(&colors), HazardKind::Ice);
        colors.ground = [0.5, 0.5, 0.5];
        assert_eq!(HazardKind::from_palette(&colors), HazardKind::Spikes);
    }
}
