//! Side-scrolling follow camera.

use engine_core::Body;
use glam::Vec2;

/// Per-frame follow fraction at dt = 1.
pub const FOLLOW_RATE: f32 = 0.12;
/// How far ahead of the player the camera leads, px.
pub const LOOK_AHEAD: f32 = 120.0;
/// Fraction of the view height above the player.
pub const VERTICAL_ANCHOR: f32 = 0.6;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Top-left corner in world space.
    pub position: Vec2,
    pub view: Vec2,
}

impl Camera {
    pub fn new(view: Vec2) -> Self {
        Self {
            position: Vec2::ZERO,
            view,
        }
    }

    /// Camera snapped straight onto its follow target.
    pub fn focused_on(body: &Body, view: Vec2, world_width: f32) -> Self {
        let mut camera = Self::new(view);
        camera.position = camera.target_for(body, world_width);
        camera
    }

    pub fn center(&self) -> Vec2 {
        self.position + self.view * 0.5
    }

    pub fn left(&self) -> f32 {
        self.position.x
    }

    pub fn right(&self) -> f32 {
        self.position.x + self.view.x
    }

    /// Horizontal distance from the view center.
    pub fn distance_x(&self, x: f32) -> f32 {
        (x - self.center().x).abs()
    }

    fn target_for(&self, body: &Body, world_width: f32) -> Vec2 {
        let center = body.center();
        let lead = body.facing * LOOK_AHEAD;
        let max_x = (world_width - self.view.x).max(0.0);
        Vec2::new(
            (center.x + lead - self.view.x * 0.5).clamp(0.0, max_x),
            center.y - self.view.y * VERTICAL_ANCHOR,
        )
    }

    /// Ease toward the player, leading in the facing direction, clamped to the world.
    pub fn follow(&mut self, body: &Body, world_width: f32, dt: f32) {
        let target = self.target_for(body, world_width);
        if !target.is_finite() {
            return;
        }
        let t = 1.0 - (1.0 - FOLLOW_RATE).powf(dt.max(0.0));
        self.position = self.position.lerp(target, t);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn follow_converges_on_player() {
        let body = Body::standing_at(2000.0, 400.0, Vec2::new(20.0, 34.0));
        let mut cam = Camera::new(Vec2::new(960.0, 540.0));
        for _ in 0..200 {
            cam.follow(&body, 8000.0, 1.0);
        }
        let expected_x = 2000.0 + LOOK_AHEAD - 480.0;
        assert!((cam.position.x - expected_x).abs() < 1.0);
    }

    #[test]
    fn camera_stays_inside_world() {
        let body = Body::standing_at(10.0, 400.0, Vec2::new(20.0, 34.0));
        let cam = Camera::focused_on(&body, Vec2::new(960.0, 540.0), 8000.0);
        assert_eq!(cam.left(), 0.0);
        let far = Body::standing_at(7990.0, 400.0, Vec2::new(20.0, 34.0));
        let cam = Camera::focused_on(&far, Vec2::new(960.0, 540.0), 8000.0);
        assert_eq!(cam.right(), 8000.0);
    }
}
