//! Common components shared by every entity role.
//!
//! Coordinates are canvas-style: `x` grows to the right and `y` grows downward.
//! Velocities are pixels per nominal frame.

use glam::Vec2;

/// Spatial state of a simulated entity. `position` is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub position: Vec2,
    pub velocity: Vec2,
    pub size: Vec2,
    pub grounded: bool,
    /// +1.0 facing right, -1.0 facing left.
    pub facing: f32,
    /// Set during a frame, removed at end-of-frame compaction.
    pub marked_for_deletion: bool,
}

impl Body {
    pub fn new(position: Vec2, size: Vec2) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            size,
            grounded: false,
            facing: 1.0,
            marked_for_deletion: false,
        }
    }

    /// Create a body whose feet rest at `ground_y`, horizontally centered on `x`.
    pub fn standing_at(x: f32, ground_y: f32, size: Vec2) -> Self {
        let mut body = Self::new(Vec2::new(x - size.x * 0.5, ground_y - size.y), size);
        body.grounded = true;
        body
    }

    pub fn center(&self) -> Vec2 {
        self.position + self.size * 0.5
    }

    pub fn bottom(&self) -> f32 {
        self.position.y + self.size.y
    }

    pub fn right(&self) -> f32 {
        self.position.x + self.size.x
    }

    /// Point under the middle of the body, used for ground and hazard sampling.
    pub fn foot(&self) -> Vec2 {
        Vec2::new(self.position.x + self.size.x * 0.5, self.bottom())
    }

    /// Mark for removal at the next compaction.
    pub fn mark(&mut self) {
        self.marked_for_deletion = true;
    }

    pub fn is_live(&self) -> bool {
        !self.marked_for_deletion
    }
}

/// Integer hit points for damageable entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Health {
    pub current: i32,
    pub max: i32,
}

impl Health {
    pub fn new(max: i32) -> Self {
        let max = max.max(1);
        Self { current: max, max }
    }

    /// Subtract damage; never goes below zero.
    pub fn take_damage(&mut self, amount: i32) {
        self.current = (self.current - amount.max(0)).max(0);
    }

    /// Restore health, capped at max.
    pub fn heal(&mut self, amount: i32) {
        self.current = (self.current + amount.max(0)).min(self.max);
    }

    pub fn is_dead(&self) -> bool {
        self.current <= 0
    }
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100)
    }
}

/// Countdown for temporary entities (particles, dropped loot, projectiles).
#[derive(Debug, Clone, Copy)]
pub struct Lifetime {
    pub remaining: f32,
}

impl Lifetime {
    pub fn new(frames: f32) -> Self {
        Self { remaining: frames }
    }

    /// Count down and report expiry.
    pub fn update(&mut self, dt: f32) -> bool {
        self.remaining -= dt;
        self.remaining <= 0.0
    }
}

/// Countdown that never goes below zero (hit flash, invulnerability, cooldowns).
#[inline]
pub fn tick_down(timer: &mut f32, dt: f32) {
    *timer = (*timer - dt).max(0.0);
}

/// Behavior states shared by every enemy archetype. Not all archetypes use all states.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum AiState {
    #[default]
    Idle,
    Alert,
    Chase,
    Attack,
    Charge,
    Flee,
    Phase1,
    Phase2,
}

impl AiState {
    pub fn name(&self) -> &'static str {
        match self {
            AiState::Idle => "idle",
            AiState::Alert => "alert",
            AiState::Chase => "chase",
            AiState::Attack => "attack",
            AiState::Charge => "charge",
            AiState::Flee => "flee",
            AiState::Phase1 => "phase1",
            AiState::Phase2 => "phase2",
        }
    }
}

/// RGB color in `[0, 1]`, consumed by the render layer.
pub type Color = [f32; 3];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_never_negative_and_caps_heal() {
        let mut h = Health::new(100);
        h.take_damage(150);
        assert_eq!(h.current, 0);
        assert!(h.is_dead());
        h.heal(500);
        assert_eq!(h.current, 100);
    }

    #[test]
    fn standing_body_rests_on_ground() {
        let b = Body::standing_at(100.0, 400.0, Vec2::new(20.0, 30.0));
        assert_eq!(b.bottom(), 400.0);
        assert_eq!(b.center().x, 100.0);
        assert!(b.grounded);
    }
}
