//! Entity store: the player singleton plus one `Vec` per role.
//!
//! Entities are never removed mid-frame. Systems mark bodies for deletion and every
//! collision pass skips marked entities; [`EntityStore::compact`] removes them once,
//! at the end of the frame.

use engine_core::{tick_down, Body, Color, Health, Lifetime};
use glam::Vec2;
use physics::{Faction, HazardTicker};
use procgen::HazardKind;

use crate::enemy::{Archetype, Enemy};
use crate::weapons::WeaponType;

pub const PLAYER_SIZE: Vec2 = Vec2::new(20.0, 34.0);
pub const BASE_PLAYER_HEALTH: f32 = 100.0;
pub const BASE_PLAYER_FUEL: f32 = 100.0;

/// What last hurt the player, for the game-over reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageSource {
    Hazard(HazardKind),
    Contact(Archetype),
    Projectile(WeaponType),
}

impl DamageSource {
    pub fn describe(self) -> String {
        match self {
            DamageSource::Hazard(kind) => format!("Killed by {}", kind.name()),
            DamageSource::Contact(archetype) => format!("Overrun by a {}", archetype.name()),
            DamageSource::Projectile(weapon) => format!("Shot down by a {}", weapon.profile().name),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Player {
    pub body: Body,
    pub health: Health,
    pub fuel: f32,
    pub max_fuel: f32,
    /// Frames left in which a jump is still allowed after leaving the ground.
    pub coyote: f32,
    pub weapon: WeaponType,
    pub fire_cooldown: f32,
    /// Set by a jump, cleared when the button is released.
    pub jump_latched: bool,
    pub jetpacking: bool,
    pub hazard_ticker: HazardTicker,
    pub last_damage: Option<DamageSource>,
    pub invulnerable: f32,
    pub invulnerability_frames: f32,
    pub hit_flash: f32,
    pub color: Color,
    pub anim_offset: f32,
}

impl Player {
    pub fn new(x: f32, ground_y: f32, max_health: i32, max_fuel: f32, invulnerability_frames: f32) -> Self {
        Self {
            body: Body::standing_at(x, ground_y, PLAYER_SIZE),
            health: Health::new(max_health),
            fuel: max_fuel,
            max_fuel,
            coyote: 0.0,
            weapon: WeaponType::Blaster,
            fire_cooldown: 0.0,
            jump_latched: false,
            jetpacking: false,
            hazard_ticker: HazardTicker::default(),
            last_damage: None,
            invulnerable: 0.0,
            invulnerability_frames,
            hit_flash: 0.0,
            color: [0.85, 0.9, 0.95],
            anim_offset: 0.0,
        }
    }

    /// Apply damage unless invulnerable. Returns whether it landed.
    pub fn hurt(&mut self, amount: i32, source: DamageSource) -> bool {
        if self.invulnerable > 0.0 || self.health.is_dead() {
            return false;
        }
        self.health.take_damage(amount);
        self.invulnerable = self.invulnerability_frames;
        self.hit_flash = 10.0;
        self.last_damage = Some(source);
        true
    }

    pub fn tick_timers(&mut self, dt: f32) {
        tick_down(&mut self.invulnerable, dt);
        tick_down(&mut self.hit_flash, dt);
        tick_down(&mut self.fire_cooldown, dt);
        tick_down(&mut self.coyote, dt);
    }
}

#[derive(Debug, Clone)]
pub struct Projectile {
    pub body: Body,
    pub weapon: WeaponType,
    pub faction: Faction,
    /// Enemies this shot may still pass through.
    pub pierce: u32,
    pub explosive: bool,
    pub gravity_scale: f32,
    pub lifetime: Lifetime,
    pub color: Color,
    /// Enemy ids already hit, so a piercing shot damages each target once.
    pub struck: Vec<u32>,
}

impl Projectile {
    pub fn base_damage(&self) -> i32 {
        self.weapon.profile().damage
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LootKind {
    Core { tier: u32 },
    Weapon(WeaponType),
    Health,
}

#[derive(Debug, Clone)]
pub struct Loot {
    pub body: Body,
    pub kind: LootKind,
    /// `None` for cores, which never expire.
    pub lifetime: Option<Lifetime>,
}

pub const LOOT_SIZE: Vec2 = Vec2::new(16.0, 16.0);

impl Loot {
    pub fn new(center: Vec2, kind: LootKind, lifetime: f32) -> Self {
        let lifetime = match kind {
            LootKind::Core { .. } => None,
            _ => Some(Lifetime::new(lifetime)),
        };
        Self {
            body: Body::new(center - LOOT_SIZE * 0.5, LOOT_SIZE),
            kind,
            lifetime,
        }
    }
}

/// Cosmetic spark, debris or weather particle.
#[derive(Debug, Clone)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    pub life: Lifetime,
    pub max_life: f32,
    pub size: f32,
    pub color: Color,
    /// Fraction of world gravity applied.
    pub gravity: f32,
}

impl Particle {
    pub fn alpha(&self) -> f32 {
        (self.life.remaining / self.max_life.max(1.0)).clamp(0.0, 1.0)
    }
}

/// Rising damage number or callout.
#[derive(Debug, Clone)]
pub struct FloatingText {
    pub position: Vec2,
    pub text: String,
    pub life: Lifetime,
    pub color: Color,
}

/// Every mutable entity of a mission.
#[derive(Debug, Clone)]
pub struct EntityStore {
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    pub loot: Vec<Loot>,
    pub particles: Vec<Particle>,
    pub texts: Vec<FloatingText>,
    next_enemy_id: u32,
}

impl EntityStore {
    pub fn new(player: Player) -> Self {
        Self {
            player,
            enemies: Vec::new(),
            projectiles: Vec::new(),
            loot: Vec::new(),
            particles: Vec::new(),
            texts: Vec::new(),
            next_enemy_id: 1,
        }
    }

    /// Register an enemy and give it a fresh id.
    pub fn add_enemy(&mut self, mut enemy: Enemy) -> u32 {
        let id = self.next_enemy_id;
        self.next_enemy_id = self.next_enemy_id.wrapping_add(1).max(1);
        enemy.id = id;
        self.enemies.push(enemy);
        id
    }

    /// Remove everything marked this frame and every expired cosmetic.
    pub fn compact(&mut self) {
        self.enemies.retain(|e| e.body.is_live());
        self.projectiles.retain(|p| p.body.is_live());
        self.loot.retain(|l| l.body.is_live());
        self.particles.retain(|p| p.life.remaining > 0.0);
        self.texts.retain(|t| t.life.remaining > 0.0);
    }

    pub fn live_enemies(&self) -> impl Iterator<Item = &Enemy> {
        self.enemies.iter().filter(|e| e.body.is_live())
    }

    pub fn boss(&self) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.archetype.is_boss())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enemy::Rarity;
    use engine_core::SequenceRng;

    fn store() -> EntityStore {
        EntityStore::new(Player::new(100.0, 400.0, 100, 100.0, 60.0))
    }

    #[test]
    fn compaction_removes_marked_only() {
        let mut s = store();
        let mut rng = SequenceRng::constant(0.5);
        for x in [100.0, 200.0, 300.0] {
            s.add_enemy(Enemy::spawn(Archetype::Crawler, Rarity::Common, x, 400.0, 0.5, &mut rng));
        }
        s.enemies[1].body.mark();
        assert_eq!(s.live_enemies().count(), 2);
        s.compact();
        assert_eq!(s.enemies.len(), 2);
        assert!(s.enemies.iter().all(|e| e.body.is_live()));
        let ids: Vec<u32> = s.enemies.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn invulnerability_blocks_second_hit() {
        let mut p = Player::new(0.0, 400.0, 100, 100.0, 60.0);
        assert!(p.hurt(15, DamageSource::Contact(Archetype::Crawler)));
        assert_eq!(p.health.current, 85);
        assert_eq!(p.invulnerable, 60.0);
        assert!(!p.hurt(15, DamageSource::Contact(Archetype::Crawler)));
        assert_eq!(p.health.current, 85);
    }

    #[test]
    fn cores_never_expire() {
        let core = Loot::new(Vec2::ZERO, LootKind::Core { tier: 1 }, 900.0);
        let health = Loot::new(Vec2::ZERO, LootKind::Health, 900.0);
        assert!(core.lifetime.is_none());
        assert!(health.lifetime.is_some());
    }

    #[test]
    fn damage_sources_read_naturally() {
        assert_eq!(DamageSource::Hazard(HazardKind::Lava).describe(), "Killed by lava");
        assert_eq!(
            DamageSource::Contact(Archetype::Crawler).describe(),
            "Overrun by a crawler"
        );
    }
}
