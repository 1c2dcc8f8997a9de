//! Reactive vegetation and static decorations.
//!
//! Plants are decorative but physically reactive: `bend` is a spring-damper driven by
//! nearby movers and wind, integrated once per frame.

use engine_core::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StemShape {
    Straight,
    Curved,
    Segmented,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FoliageShape {
    Frond,
    Bulb,
    Spike,
    Canopy,
}

pub const STEM_SHAPES: [StemShape; 3] = [StemShape::Straight, StemShape::Curved, StemShape::Segmented];
pub const FOLIAGE_SHAPES: [FoliageShape; 4] = [
    FoliageShape::Frond,
    FoliageShape::Bulb,
    FoliageShape::Spike,
    FoliageShape::Canopy,
];

/// Scale applied to titan plants.
pub const TITAN_SCALE: f32 = 2.5;

/// Largest bend magnitude (radians-ish lean) the render layer is asked to draw.
pub const MAX_BEND: f32 = 1.2;

/// Spring-damper parameters for plant bend. Tunable per mission.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringParams {
    /// Pull back toward upright per frame.
    pub stiffness: f32,
    /// Velocity loss per frame.
    pub damping: f32,
}

impl Default for SpringParams {
    fn default() -> Self {
        Self {
            stiffness: 0.08,
            damping: 0.15,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Vegetation {
    /// Stem base, horizontally centered.
    pub x: f32,
    pub base_y: f32,
    pub height: f32,
    pub width: f32,
    pub stem: StemShape,
    pub foliage: FoliageShape,
    pub stem_color: Color,
    pub foliage_color: Color,
    pub sway_speed: f32,
    pub sway_amount: f32,
    pub sway_phase: f32,
    pub titan: bool,
    pub bend: f32,
    pub bend_velocity: f32,
}

impl Vegetation {
    /// Push the plant; positive leans right.
    pub fn apply_force(&mut self, force: f32) {
        if force.is_finite() {
            self.bend_velocity += force;
        }
    }

    /// Integrate one step of the spring-damper.
    pub fn step(&mut self, params: SpringParams, dt: f32) {
        let accel = -params.stiffness * self.bend - params.damping * self.bend_velocity;
        self.bend_velocity += accel * dt;
        self.bend += self.bend_velocity * dt;
        if self.bend.abs() > MAX_BEND {
            self.bend = self.bend.clamp(-MAX_BEND, MAX_BEND);
            self.bend_velocity = 0.0;
        }
        if !self.bend.is_finite() || !self.bend_velocity.is_finite() {
            self.bend = 0.0;
            self.bend_velocity = 0.0;
        }
    }

    /// Idle sway the render layer adds on top of `bend`.
    pub fn sway_offset(&self, time: f32) -> f32 {
        (time * self.sway_speed + self.sway_phase).sin() * self.sway_amount
    }

    /// Horizontal reach used when gathering nearby movers.
    pub fn reach(&self) -> f32 {
        self.width * 0.5 + 24.0
    }

    pub fn top_y(&self) -> f32 {
        self.base_y - self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecorationKind {
    Rock,
    Crystal,
    Bones,
    Pillar,
}

pub const DECORATION_KINDS: [DecorationKind; 4] = [
    DecorationKind::Rock,
    DecorationKind::Crystal,
    DecorationKind::Bones,
    DecorationKind::Pillar,
];

/// Purely cosmetic prop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decoration {
    pub x: f32,
    pub y: f32,
    pub kind: DecorationKind,
    pub scale: f32,
    pub color: Color,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plant() -> Vegetation {
        Vegetation {
            x: 0.0,
            base_y: 400.0,
            height: 40.0,
            width: 12.0,
            stem: StemShape::Straight,
            foliage: FoliageShape::Frond,
            stem_color: [0.3, 0.4, 0.2],
            foliage_color: [0.2, 0.6, 0.2],
            sway_speed: 0.05,
            sway_amount: 0.1,
            sway_phase: 0.0,
            titan: false,
            bend: 0.0,
            bend_velocity: 0.0,
        }
    }

    #[test]
    fn bend_decays_back_toward_upright() {
        let mut p = plant();
        p.apply_force(0.3);
        let params = SpringParams::default();
        let mut peak = 0.0_f32;
        for _ in 0..30 {
            p.step(params, 1.0);
            peak = peak.max(p.bend.abs());
        }
        for _ in 0..600 {
            p.step(params, 1.0);
        }
        assert!(peak > 0.1);
        assert!(p.bend.abs() < 0.01);
    }

    #[test]
    fn bend_is_clamped() {
        let mut p = plant();
        p.apply_force(50.0);
        p.step(SpringParams::default(), 1.0);
        assert!(p.bend.abs() <= MAX_BEND);
    }

    #[test]
    fn zero_dt_leaves_bend_unchanged() {
        let mut p = plant();
        p.bend = 0.4;
        p.bend_velocity = 0.1;
        p.step(SpringParams::default(), 0.0);
        assert_eq!(p.bend, 0.4);
        assert_eq!(p.bend_velocity, 0.1);
    }
}
