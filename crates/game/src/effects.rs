//! Cosmetic particles and floating text.

use engine_core::{Color, Lifetime, RandomSource};
use glam::Vec2;
use physics::BASE_GRAVITY;

use crate::entities::{FloatingText, Particle};

/// Hard cap on live particles; new ones are dropped past it.
pub const MAX_PARTICLES: usize = 600;
pub const TEXT_RISE: f32 = 0.6;

/// Radial burst of sparks or debris.
pub fn spawn_burst(
    particles: &mut Vec<Particle>,
    origin: Vec2,
    count: usize,
    speed: f32,
    color: Color,
    rng: &mut dyn RandomSource,
) {
    let room = MAX_PARTICLES.saturating_sub(particles.len());
    for _ in 0..count.min(room) {
        let angle = rng.range(0.0, std::f32::consts::TAU);
        let velocity = Vec2::from_angle(angle) * speed * rng.range(0.4, 1.0);
        let life = rng.range(20.0, 45.0);
        particles.push(Particle {
            position: origin,
            velocity,
            life: Lifetime::new(life),
            max_life: life,
            size: rng.range(2.0, 5.0),
            color,
            gravity: 0.4,
        });
    }
}

pub fn spawn_text(texts: &mut Vec<FloatingText>, position: Vec2, text: impl Into<String>, color: Color) {
    texts.push(FloatingText {
        position,
        text: text.into(),
        life: Lifetime::new(45.0),
        color,
    });
}

pub fn update_particles(particles: &mut [Particle], gravity: f32, dt: f32) {
    for p in particles.iter_mut() {
        p.velocity.y += BASE_GRAVITY * gravity * p.gravity * dt;
        p.position += p.velocity * dt;
        p.life.update(dt);
    }
}

pub fn update_texts(texts: &mut [FloatingText], dt: f32) {
    for t in texts.iter_mut() {
        t.position.y -= TEXT_RISE * dt;
        t.life.update(dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_core::SequenceRng;

    #[test]
    fn bursts_respect_the_cap() {
        let mut particles = Vec::new();
        let mut rng = SequenceRng::constant(0.5);
        spawn_burst(&mut particles, Vec2::ZERO, MAX_PARTICLES + 50, 3.0, [1.0; 3], &mut rng);
        assert_eq!(particles.len(), MAX_PARTICLES);
        spawn_burst(&mut particles, Vec2::ZERO, 10, 3.0, [1.0; 3], &mut rng);
        assert_eq!(particles.len(), MAX_PARTICLES);
    }

    #[test]
    fn particles_fade_out() {
        let mut particles = Vec::new();
        let mut rng = SequenceRng::constant(0.5);
        spawn_burst(&mut particles, Vec2::ZERO, 4, 3.0, [1.0; 3], &mut rng);
        let start = particles[0].alpha();
        update_particles(&mut particles, 1.0, 10.0);
        assert!(particles[0].alpha() < start);
        update_particles(&mut particles, 1.0, 100.0);
        assert!(particles.iter().all(|p| p.life.remaining <= 0.0));
    }

    #[test]
    fn text_rises() {
        let mut texts = Vec::new();
        spawn_text(&mut texts, Vec2::new(0.0, 100.0), "10", [1.0; 3]);
        update_texts(&mut texts, 10.0);
        assert!(texts[0].position.y < 100.0);
    }
}
