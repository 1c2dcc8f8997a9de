//! Axis-aligned boxes and collision filtering.
//!
//! All tests are discrete: one overlap check per pair per frame.

use engine_core::Body;
use glam::Vec2;

/// Padding added around a projectile so fast, thin shots still register.
pub const PROJECTILE_PAD: f32 = 6.0;

/// Which side fired a projectile. Decides what it is allowed to hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Faction {
    /// Player shots hit enemies only.
    Player,
    /// Enemy shots hit the player only.
    Enemy,
}

impl Faction {
    pub fn hits_enemies(self) -> bool {
        self == Faction::Player
    }

    pub fn hits_player(self) -> bool {
        self == Faction::Enemy
    }
}

/// Axis-aligned bounding box in canvas space (`min` is the top-left corner).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(position: Vec2, size: Vec2) -> Self {
        Self {
            min: position,
            max: position + size.max(Vec2::ZERO),
        }
    }

    pub fn from_body(body: &Body) -> Self {
        Self::new(body.position, body.size)
    }

    /// Four-inequality overlap test. Touching edges count as overlap.
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }

    /// Grow by `pad` on every side.
    pub fn inflate(&self, pad: f32) -> Self {
        let pad = Vec2::splat(pad);
        Self {
            min: self.min - pad,
            max: self.max + pad,
        }
    }

    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }
}

/// Plain overlap between two bodies.
pub fn bodies_overlap(a: &Body, b: &Body) -> bool {
    Aabb::from_body(a).intersects(&Aabb::from_body(b))
}

/// Projectile-vs-target test with the projectile box inflated by [`PROJECTILE_PAD`].
pub fn projectile_hits(projectile: &Body, target: &Body) -> bool {
    Aabb::from_body(projectile)
        .inflate(PROJECTILE_PAD)
        .intersects(&Aabb::from_body(target))
}

/// Angle in radians from `from` to `to`; 0 when they coincide.
pub fn aim_angle(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    if d.length_squared() <= f32::EPSILON || !d.is_finite() {
        0.0
    } else {
        d.y.atan2(d.x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(x: f32, y: f32, w: f32, h: f32) -> Body {
        Body::new(Vec2::new(x, y), Vec2::new(w, h))
    }

    #[test]
    fn overlapping_boxes_intersect() {
        let a = Aabb::new(Vec2::ZERO, Vec2::splat(10.0));
        let b = Aabb::new(Vec2::splat(5.0), Vec2::splat(10.0));
        let c = Aabb::new(Vec2::new(20.0, 0.0), Vec2::splat(5.0));
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn inflate_catches_near_misses() {
        let shot = body(0.0, 0.0, 4.0, 4.0);
        let target = body(9.0, 0.0, 20.0, 20.0);
        assert!(!bodies_overlap(&shot, &target));
        assert!(projectile_hits(&shot, &target));
        let far = body(11.0, 0.0, 20.0, 20.0);
        assert!(!projectile_hits(&shot, &far));
    }

    #[test]
    fn zero_length_aim_defaults_to_angle_zero() {
        let p = Vec2::new(3.0, 4.0);
        assert_eq!(aim_angle(p, p), 0.0);
        let down = aim_angle(Vec2::ZERO, Vec2::new(0.0, 10.0));
        assert!((down - std::f32::consts::FRAC_PI_2).abs() < 1e-5);
    }

    #[test]
    fn factions_filter_targets() {
        assert!(Faction::Player.hits_enemies());
        assert!(!Faction::Player.hits_player());
        assert!(Faction::Enemy.hits_player());
    }
}
