//! Body integration against the terrain heightmap.

use engine_core::Body;
use glam::Vec2;
use procgen::Terrain;

/// Downward acceleration per frame at gravity multiplier 1.0.
pub const BASE_GRAVITY: f32 = 0.5;
pub const GROUND_FRICTION: f32 = 0.80;
pub const AIR_FRICTION: f32 = 0.96;
pub const ICE_FRICTION: f32 = 0.995;
/// Terminal fall speed, px/frame.
pub const MAX_FALL_SPEED: f32 = 18.0;

/// Per-body integration settings for one step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionParams {
    /// Planet gravity multiplier (already sanitized).
    pub gravity: f32,
    /// Flyers ignore gravity, take air drag on both axes and are never grounded.
    pub flying: bool,
    /// The caller is steering horizontally this frame; skip horizontal friction.
    pub driven: bool,
    /// Standing on an ice strip.
    pub on_ice: bool,
}

impl MotionParams {
    pub fn walker(gravity: f32) -> Self {
        Self {
            gravity,
            flying: false,
            driven: false,
            on_ice: false,
        }
    }

    pub fn flyer() -> Self {
        Self {
            gravity: 0.0,
            flying: true,
            driven: false,
            on_ice: false,
        }
    }

    pub fn driven(mut self, driven: bool) -> Self {
        self.driven = driven;
        self
    }

    pub fn on_ice(mut self, on_ice: bool) -> Self {
        self.on_ice = on_ice;
        self
    }
}

/// Friction coefficient for the body's current contact.
pub fn friction_coefficient(grounded: bool, on_ice: bool) -> f32 {
    match (grounded, on_ice) {
        (true, true) => ICE_FRICTION,
        (true, false) => GROUND_FRICTION,
        (false, _) => AIR_FRICTION,
    }
}

/// Advance one body by `dt` nominal frames and resolve it against the ground.
pub fn integrate_body(body: &mut Body, params: MotionParams, terrain: &Terrain, dt: f32) {
    if !body.velocity.is_finite() {
        log::debug!("Non-finite velocity reset on body at {:?}", body.position);
        body.velocity = Vec2::ZERO;
    }
    if dt <= 0.0 {
        return;
    }

    if !params.flying {
        body.velocity.y = (body.velocity.y + BASE_GRAVITY * params.gravity * dt).min(MAX_FALL_SPEED);
    }

    if params.flying {
        let drag = AIR_FRICTION.powf(dt);
        if !params.driven {
            body.velocity.x *= drag;
        }
        body.velocity.y *= drag;
    } else if !params.driven {
        body.velocity.x *= friction_coefficient(body.grounded, params.on_ice).powf(dt);
    }

    body.position += body.velocity * dt;

    let ground = terrain.height_at(body.foot().x);
    if params.flying {
        body.grounded = false;
        if body.bottom() > ground {
            body.position.y = ground - body.size.y;
            body.velocity.y = body.velocity.y.min(0.0);
        }
    } else if body.bottom() >= ground {
        body.position.y = ground - body.size.y;
        body.velocity.y = 0.0;
        body.grounded = true;
    } else {
        body.grounded = false;
    }
}

/// Keep a body inside `[0, world_width]` horizontally, killing velocity into the wall.
pub fn clamp_to_world(body: &mut Body, world_width: f32) {
    let max_x = (world_width - body.size.x).max(0.0);
    if body.position.x < 0.0 {
        body.position.x = 0.0;
        body.velocity.x = body.velocity.x.max(0.0);
    } else if body.position.x > max_x {
        body.position.x = max_x;
        body.velocity.x = body.velocity.x.min(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat() -> Terrain {
        Terrain::flat(50, 40.0, 400.0)
    }

    #[test]
    fn falling_body_lands_and_grounds() {
        let terrain = flat();
        let mut body = Body::new(Vec2::new(100.0, 300.0), Vec2::new(20.0, 30.0));
        for _ in 0..120 {
            integrate_body(&mut body, MotionParams::walker(1.0), &terrain, 1.0);
        }
        assert!(body.grounded);
        assert_eq!(body.bottom(), 400.0);
        assert_eq!(body.velocity.y, 0.0);
    }

    #[test]
    fn ground_friction_bleeds_speed() {
        let terrain = flat();
        let mut body = Body::standing_at(100.0, 400.0, Vec2::new(20.0, 30.0));
        body.velocity.x = 5.0;
        integrate_body(&mut body, MotionParams::walker(1.0), &terrain, 1.0);
        assert!((body.velocity.x - 4.0).abs() < 1e-4);
    }

    #[test]
    fn ice_is_nearly_frictionless() {
        let terrain = flat();
        let mut body = Body::standing_at(100.0, 400.0, Vec2::new(20.0, 30.0));
        body.velocity.x = 5.0;
        integrate_body(&mut body, MotionParams::walker(1.0).on_ice(true), &terrain, 1.0);
        assert!(body.velocity.x > 4.9);
    }

    #[test]
    fn friction_scales_with_dt() {
        let terrain = flat();
        let mut a = Body::standing_at(100.0, 400.0, Vec2::new(20.0, 30.0));
        let mut b = a;
        a.velocity.x = 5.0;
        b.velocity.x = 5.0;
        integrate_body(&mut a, MotionParams::walker(1.0), &terrain, 2.0);
        integrate_body(&mut b, MotionParams::walker(1.0), &terrain, 1.0);
        integrate_body(&mut b, MotionParams::walker(1.0), &terrain, 1.0);
        assert!((a.velocity.x - b.velocity.x).abs() < 1e-4);
    }

    #[test]
    fn flyers_never_ground() {
        let terrain = flat();
        let mut body = Body::new(Vec2::new(100.0, 200.0), Vec2::new(20.0, 20.0));
        body.velocity.y = 50.0;
        for _ in 0..20 {
            integrate_body(&mut body, MotionParams::flyer(), &terrain, 1.0);
        }
        assert!(!body.grounded);
        assert!(body.bottom() <= 400.0);
    }

    #[test]
    fn nan_velocity_is_reset() {
        let terrain = flat();
        let mut body = Body::standing_at(100.0, 400.0, Vec2::new(20.0, 30.0));
        body.velocity = Vec2::new(f32::NAN, 1.0);
        integrate_body(&mut body, MotionParams::walker(1.0), &terrain, 1.0);
        assert!(body.velocity.is_finite());
        assert!(body.position.is_finite());
    }

    #[test]
    fn world_clamp_stops_at_edges() {
        let mut body = Body::new(Vec2::new(-30.0, 0.0), Vec2::new(20.0, 20.0));
        body.velocity.x = -3.0;
        clamp_to_world(&mut body, 1000.0);
        assert_eq!(body.position.x, 0.0);
        assert_eq!(body.velocity.x, 0.0);
        body.position.x = 2000.0;
        body.velocity.x = 3.0;
        clamp_to_world(&mut body, 1000.0);
        assert_eq!(body.position.x, 980.0);
    }
}
