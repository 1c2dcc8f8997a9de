//! Weapon profiles and projectile emission.

use engine_core::{Body, Color, Lifetime, RandomSource};
use glam::Vec2;
use physics::Faction;

use crate::entities::Projectile;

/// Every weapon in the game, player and enemy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeaponType {
    /// Starting sidearm - single accurate bolt.
    Blaster,
    /// Five-pellet fan.
    Scatter,
    /// Fast slug that pierces three targets.
    Rail,
    /// Arcing explosive shell.
    Launcher,
    /// Burst of three piercing needles.
    Needler,
    SentinelBolt,
    GuardianOrb,
    SandwormSpit,
}

/// Weapons that can drop as loot.
pub const PLAYER_WEAPONS: [WeaponType; 5] = [
    WeaponType::Blaster,
    WeaponType::Scatter,
    WeaponType::Rail,
    WeaponType::Launcher,
    WeaponType::Needler,
];

/// Static firing parameters. Times are in frames, speeds in px/frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeaponProfile {
    pub name: &'static str,
    pub damage: i32,
    pub count: u32,
    /// Total fan angle in radians across all projectiles.
    pub spread: f32,
    pub speed: f32,
    pub pierce: u32,
    pub explosive: bool,
    pub gravity_scale: f32,
    pub knockback: f32,
    pub cooldown: f32,
    pub recoil: f32,
    pub lifetime: f32,
    pub size: f32,
    pub color: Color,
}

impl WeaponType {
    pub fn profile(self) -> WeaponProfile {
        let base = WeaponProfile {
            name: "Blaster",
            damage: 10,
            count: 1,
            spread: 0.0,
            speed: 12.0,
            pierce: 0,
            explosive: false,
            gravity_scale: 0.0,
            knockback: 2.0,
            cooldown: 10.0,
            recoil: 0.3,
            lifetime: 90.0,
            size: 6.0,
            color: [0.4, 0.9, 1.0],
        };
        match self {
            WeaponType::Blaster => base,
            WeaponType::Scatter => WeaponProfile {
                name: "Scatter",
                damage: 6,
                count: 5,
                spread: 0.5,
                speed: 11.0,
                knockback: 3.0,
                cooldown: 28.0,
                recoil: 2.0,
                lifetime: 35.0,
                size: 5.0,
                color: [1.0, 0.8, 0.3],
                ..base
            },
            WeaponType::Rail => WeaponProfile {
                name: "Rail",
                damage: 28,
                speed: 20.0,
                pierce: 3,
                knockback: 4.0,
                cooldown: 40.0,
                recoil: 1.5,
                lifetime: 60.0,
                color: [0.7, 0.5, 1.0],
                ..base
            },
            WeaponType::Launcher => WeaponProfile {
                name: "Launcher",
                damage: 40,
                speed: 9.0,
                explosive: true,
                gravity_scale: 0.35,
                knockback: 8.0,
                cooldown: 50.0,
                recoil: 2.5,
                lifetime: 150.0,
                size: 10.0,
                color: [1.0, 0.45, 0.2],
                ..base
            },
            WeaponType::Needler => WeaponProfile {
                name: "Needler",
                damage: 5,
                count: 3,
                spread: 0.12,
                speed: 16.0,
                pierce: 1,
                knockback: 0.5,
                cooldown: 14.0,
                recoil: 0.2,
                lifetime: 60.0,
                size: 4.0,
                color: [0.9, 0.4, 0.9],
                ..base
            },
            WeaponType::SentinelBolt => WeaponProfile {
                name: "sentinel bolt",
                damage: 10,
                speed: 6.0,
                knockback: 0.0,
                cooldown: 90.0,
                recoil: 0.0,
                lifetime: 160.0,
                color: [1.0, 0.3, 0.3],
                ..base
            },
            WeaponType::GuardianOrb => WeaponProfile {
                name: "guardian orb",
                damage: 15,
                count: 5,
                spread: 1.0,
                speed: 5.0,
                knockback: 0.0,
                cooldown: 150.0,
                recoil: 0.0,
                lifetime: 240.0,
                size: 10.0,
                color: [0.8, 0.3, 1.0],
                ..base
            },
            WeaponType::SandwormSpit => WeaponProfile {
                name: "sandworm spit",
                damage: 12,
                speed: 7.0,
                gravity_scale: 0.25,
                knockback: 0.0,
                cooldown: 100.0,
                recoil: 0.0,
                lifetime: 180.0,
                size: 8.0,
                color: [0.7, 0.8, 0.3],
                ..base
            },
        }
    }

    pub fn is_player_weapon(self) -> bool {
        PLAYER_WEAPONS.contains(&self)
    }
}

/// Damage a hit deals: `round(base × multiplier)`, never below 1.
pub fn hit_damage(base: i32, multiplier: f32) -> i32 {
    let multiplier = if multiplier.is_finite() { multiplier.max(0.0) } else { 1.0 };
    ((base as f32 * multiplier).round() as i32).max(1)
}

/// Spawn the projectiles for one trigger pull. Returns the recoil impulse for the shooter.
pub fn fire_weapon(
    projectiles: &mut Vec<Projectile>,
    origin: Vec2,
    angle: f32,
    weapon: WeaponType,
    faction: Faction,
    rng: &mut dyn RandomSource,
) -> Vec2 {
    let profile = weapon.profile();
    let angle = if angle.is_finite() { angle } else { 0.0 };
    let count = profile.count.max(1);
    let size = Vec2::splat(profile.size);

    for i in 0..count {
        let offset = if count > 1 {
            let t = i as f32 / (count - 1) as f32 - 0.5;
            t * profile.spread + rng.range(-0.02, 0.02)
        } else {
            0.0
        };
        let dir = Vec2::from_angle(angle + offset);
        let mut body = Body::new(origin - size * 0.5, size);
        body.velocity = dir * profile.speed;
        body.facing = if dir.x < 0.0 { -1.0 } else { 1.0 };
        projectiles.push(Projectile {
            body,
            weapon,
            faction,
            pierce: profile.pierce,
            explosive: profile.explosive,
            gravity_scale: profile.gravity_scale,
            lifetime: Lifetime::new(profile.lifetime),
            color: profile.color,
            struck: Vec::new(),
        });
    }

    -Vec2::from_angle(angle) * profile.recoil
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_core::SequenceRng;

    #[test]
    fn damage_rounds_with_floor_of_one() {
        assert_eq!(hit_damage(10, 1.0), 10);
        assert_eq!(hit_damage(10, 1.6), 16);
        assert_eq!(hit_damage(10, 1.25), 13);
        assert_eq!(hit_damage(1, 0.1), 1);
        assert_eq!(hit_damage(10, f32::NAN), 10);
    }

    #[test]
    fn scatter_fires_five_fanned_pellets() {
        let mut shots = Vec::new();
        let mut rng = SequenceRng::constant(0.5);
        fire_weapon(&mut shots, Vec2::ZERO, 0.0, WeaponType::Scatter, Faction::Player, &mut rng);
        assert_eq!(shots.len(), 5);
        let first = shots[0].body.velocity.to_angle();
        let last = shots[4].body.velocity.to_angle();
        assert!((last - first - 0.5).abs() < 1e-3);
    }

    #[test]
    fn recoil_opposes_aim() {
        let mut shots = Vec::new();
        let mut rng = SequenceRng::constant(0.5);
        let recoil = fire_weapon(&mut shots, Vec2::ZERO, 0.0, WeaponType::Launcher, Faction::Player, &mut rng);
        assert!(recoil.x < 0.0);
        assert!(shots[0].explosive);
        assert!(shots[0].gravity_scale > 0.0);
    }

    #[test]
    fn rail_pierces_and_projectiles_are_centered() {
        let mut shots = Vec::new();
        let mut rng = SequenceRng::constant(0.5);
        fire_weapon(&mut shots, Vec2::new(50.0, 50.0), 0.0, WeaponType::Rail, Faction::Player, &mut rng);
        assert_eq!(shots[0].pierce, 3);
        assert!((shots[0].body.center() - Vec2::new(50.0, 50.0)).length() < 1e-4);
    }

    #[test]
    fn only_player_weapons_drop() {
        assert!(WeaponType::Needler.is_player_weapon());
        assert!(!WeaponType::GuardianOrb.is_player_weapon());
    }
}
