//! Environmental hazard effects.
//!
//! [`hazard_effect`] is pure: it reports what a strip does to a body this frame and leaves
//! applying damage (and invulnerability) to the caller. Periodic damage is paced by a
//! [`HazardTicker`] owned by the damaged entity.

use engine_core::Body;
use procgen::{HazardKind, HazardStrip, Terrain};

/// Height above the ground inside which a surface hazard touches a foot.
pub const HAZARD_BAND: f32 = 6.0;
/// Height of a geyser's steam column above its vent.
pub const GEYSER_COLUMN: f32 = 320.0;
/// Upward acceleration per frame inside an erupting column.
pub const GEYSER_LIFT: f32 = 1.4;
pub const SPIKE_BOUNCE: f32 = -8.0;

/// What a hazard does to a body touching it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HazardEffect {
    pub kind: HazardKind,
    pub damage: i32,
    /// Frames between damage ticks; `None` for a one-shot on contact.
    pub interval: Option<f32>,
    /// Horizontal velocity multiplier per frame (1.0 = none).
    pub drag: f32,
    /// Upward acceleration per frame.
    pub lift: f32,
    /// Vertical velocity imposed on contact.
    pub launch: Option<f32>,
    /// Ground friction switches to ice.
    pub icy: bool,
}

impl HazardEffect {
    fn new(kind: HazardKind) -> Self {
        Self {
            kind,
            damage: 0,
            interval: None,
            drag: 1.0,
            lift: 0.0,
            launch: None,
            icy: false,
        }
    }

    fn periodic(mut self, damage: i32, interval: f32) -> Self {
        self.damage = damage;
        self.interval = Some(interval);
        self
    }

    fn drag(mut self, drag: f32) -> Self {
        self.drag = drag;
        self
    }

    /// Fixed behavior table per kind, independent of contact.
    pub fn for_kind(kind: HazardKind) -> Option<Self> {
        let effect = Self::new(kind);
        Some(match kind {
            HazardKind::Lava => effect.periodic(10, 20.0).drag(0.5),
            HazardKind::Acid => effect.periodic(6, 30.0).drag(0.85),
            HazardKind::Spikes => Self {
                damage: 20,
                launch: Some(SPIKE_BOUNCE),
                ..effect
            },
            HazardKind::Geyser => Self {
                lift: GEYSER_LIFT,
                ..effect.periodic(5, 30.0)
            },
            HazardKind::Electric => effect.periodic(8, 25.0).drag(0.7),
            HazardKind::Ice => Self { icy: true, ..effect },
            HazardKind::None => return None,
        })
    }
}

/// Effect of `strip` on `body` at mission time `clock`, or `None` when not in contact.
pub fn hazard_effect(strip: &HazardStrip, body: &Body, terrain: &Terrain, clock: f32) -> Option<HazardEffect> {
    let foot = body.foot();
    let ground = terrain.height_at(foot.x);
    match strip.kind {
        HazardKind::None => None,
        HazardKind::Geyser => {
            let in_column = strip.overlaps_span(body.position.x, body.right())
                && body.bottom() >= ground - GEYSER_COLUMN
                && body.position.y <= ground;
            if in_column && strip.is_erupting(clock) {
                HazardEffect::for_kind(HazardKind::Geyser)
            } else {
                None
            }
        }
        kind => {
            if strip.contains_x(foot.x) && foot.y >= ground - HAZARD_BAND {
                HazardEffect::for_kind(kind)
            } else {
                None
            }
        }
    }
}

/// First hazard in contact with `body`.
pub fn find_hazard(strips: &[HazardStrip], body: &Body, terrain: &Terrain, clock: f32) -> Option<HazardEffect> {
    strips
        .iter()
        .find_map(|strip| hazard_effect(strip, body, terrain, clock))
}

/// Paces hazard damage for one entity.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HazardTicker {
    current: Option<HazardKind>,
    accumulator: f32,
}

impl HazardTicker {
    /// Feed this frame's contact; returns true when damage is due.
    ///
    /// Entering a hazard is due immediately; afterwards every `interval` frames.
    /// One-shot hazards are due only on entry.
    pub fn tick(&mut self, effect: Option<&HazardEffect>, dt: f32) -> bool {
        let Some(effect) = effect.filter(|e| e.damage > 0) else {
            self.current = None;
            self.accumulator = 0.0;
            return false;
        };
        let entering = self.current != Some(effect.kind);
        self.current = Some(effect.kind);
        match effect.interval {
            None => entering,
            Some(interval) => {
                if entering {
                    self.accumulator = 0.0;
                    return true;
                }
                self.accumulator += dt;
                if self.accumulator >= interval {
                    self.accumulator -= interval;
                    true
                } else {
                    false
                }
            }
        }
    }

    pub fn current(&self) -> Option<HazardKind> {
        self.current
    }
}
