//! Enemy archetypes and the enemy entity record.

use engine_core::{tick_down, AiState, Body, Color, Health, RandomSource};
use glam::Vec2;

/// The nine enemy behaviors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Archetype {
    /// Ground chaser that hops over rises.
    Crawler,
    /// Flyer that hangs above the player.
    Hornet,
    /// Ranged turret-walker that keeps its distance.
    Sentinel,
    /// Telegraphs, then dashes.
    Dasher,
    /// Flying boss.
    Guardian,
    /// Alternates a frontal shield with a chase.
    Shielder,
    /// Burrows, surfaces to spit.
    Sandworm,
    /// Stationary contact hazard.
    Spore,
    /// Harmless wildlife.
    Neutral,
}

pub const ALL_ARCHETYPES: [Archetype; 9] = [
    Archetype::Crawler,
    Archetype::Hornet,
    Archetype::Sentinel,
    Archetype::Dasher,
    Archetype::Guardian,
    Archetype::Shielder,
    Archetype::Sandworm,
    Archetype::Spore,
    Archetype::Neutral,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Rarity {
    #[default]
    Common,
    Elite,
}

/// Base stats per archetype, before density and rarity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArchetypeStats {
    pub health: i32,
    pub size: Vec2,
    /// Travel speed, px/frame.
    pub speed: f32,
    pub aggro_range: f32,
    pub contact_damage: i32,
    pub score: u64,
    pub flying: bool,
    pub color: Color,
}

/// Shield hit points of a fresh shielder stance.
pub const SHIELD_HP: i32 = 60;

impl Archetype {
    pub fn stats(self) -> ArchetypeStats {
        let (health, w, h, speed, aggro_range, contact_damage, score, flying, color) = match self {
            Archetype::Crawler => (20, 26.0, 20.0, 2.2, 350.0, 15, 100, false, [0.55, 0.35, 0.25]),
            Archetype::Hornet => (14, 22.0, 18.0, 2.6, 420.0, 10, 150, true, [0.85, 0.75, 0.2]),
            Archetype::Sentinel => (30, 24.0, 40.0, 1.4, 500.0, 10, 200, false, [0.45, 0.5, 0.65]),
            Archetype::Dasher => (24, 30.0, 22.0, 2.0, 400.0, 20, 175, false, [0.75, 0.25, 0.25]),
            Archetype::Guardian => (600, 80.0, 70.0, 3.0, 2000.0, 25, 5000, true, [0.6, 0.2, 0.7]),
            Archetype::Shielder => (40, 30.0, 36.0, 1.2, 380.0, 15, 250, false, [0.35, 0.55, 0.55]),
            Archetype::Sandworm => (50, 40.0, 30.0, 1.5, 380.0, 20, 300, false, [0.7, 0.6, 0.4]),
            Archetype::Spore => (10, 18.0, 18.0, 0.0, 0.0, 8, 50, false, [0.5, 0.8, 0.4]),
            Archetype::Neutral => (12, 24.0, 18.0, 0.8, 0.0, 0, 25, false, [0.6, 0.65, 0.55]),
        };
        ArchetypeStats {
            health,
            size: Vec2::new(w, h),
            speed,
            aggro_range,
            contact_damage,
            score,
            flying,
            color,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Archetype::Crawler => "crawler",
            Archetype::Hornet => "hornet",
            Archetype::Sentinel => "sentinel",
            Archetype::Dasher => "dasher",
            Archetype::Guardian => "Guardian",
            Archetype::Shielder => "shielder",
            Archetype::Sandworm => "sandworm",
            Archetype::Spore => "spore",
            Archetype::Neutral => "wanderer",
        }
    }

    pub fn is_boss(self) -> bool {
        self == Archetype::Guardian
    }

    /// Follows the shared idle → alert → chase → disengage cycle.
    pub fn uses_generic_aggro(self) -> bool {
        !matches!(
            self,
            Archetype::Guardian | Archetype::Spore | Archetype::Neutral
        )
    }

    /// Frames spent in the alert state before giving chase.
    pub fn alert_delay(self) -> f32 {
        match self {
            Archetype::Sandworm => 60.0,
            _ => 30.0,
        }
    }
}

/// Health multiplier from planet enemy density (1.0 at density 0.5).
pub fn density_health_factor(density: f32) -> f32 {
    0.75 + 0.5 * density.clamp(0.0, 1.0)
}

/// Hit points for an archetype at a density and rarity.
pub fn scaled_health(archetype: Archetype, rarity: Rarity, density: f32) -> i32 {
    let common = ((archetype.stats().health as f32 * density_health_factor(density)).round() as i32).max(1);
    match rarity {
        Rarity::Common => common,
        Rarity::Elite => common * 5 / 2,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Enemy {
    /// Assigned by [`crate::entities::EntityStore::add_enemy`]; 0 until then.
    pub id: u32,
    pub body: Body,
    pub health: Health,
    pub archetype: Archetype,
    pub rarity: Rarity,
    pub state: AiState,
    /// Alert delay, telegraph, dash length or shield cycle, per archetype.
    pub state_timer: f32,
    /// Frames until the next shot, summon or dash is allowed.
    pub attack_timer: f32,
    pub target: Vec2,
    pub burrowed: bool,
    pub shield_hp: i32,
    pub contact_damage: i32,
    base_score: u64,
    pub hit_flash: f32,
    pub color: Color,
    pub variant: u8,
    pub anim_offset: f32,
}

impl Enemy {
    /// Spawn standing on `ground_y` (flyers hover 140 px above it).
    pub fn spawn(
        archetype: Archetype,
        rarity: Rarity,
        x: f32,
        ground_y: f32,
        density: f32,
        rng: &mut dyn RandomSource,
    ) -> Self {
        let stats = archetype.stats();
        let size = match rarity {
            Rarity::Common => stats.size,
            Rarity::Elite => stats.size * 1.25,
        };
        let mut body = Body::standing_at(x, ground_y, size);
        if stats.flying {
            body.position.y -= 140.0;
            body.grounded = false;
        }
        let color = match rarity {
            Rarity::Common => stats.color,
            Rarity::Elite => stats.color.map(|c| (c * 1.3).min(1.0)),
        };
        Self {
            id: 0,
            body,
            health: Health::new(scaled_health(archetype, rarity, density)),
            archetype,
            rarity,
            state: AiState::Idle,
            state_timer: 0.0,
            attack_timer: 0.0,
            target: body.center(),
            burrowed: archetype == Archetype::Sandworm,
            shield_hp: if archetype == Archetype::Shielder { SHIELD_HP } else { 0 },
            contact_damage: stats.contact_damage,
            base_score: stats.score,
            hit_flash: 0.0,
            color,
            variant: rng.index(4) as u8,
            anim_offset: rng.range(0.0, std::f32::consts::TAU),
        }
    }

    pub fn stats(&self) -> ArchetypeStats {
        self.archetype.stats()
    }

    pub fn is_elite(&self) -> bool {
        self.rarity == Rarity::Elite
    }

    /// Score awarded on death.
    pub fn score_value(&self) -> u64 {
        match self.rarity {
            Rarity::Common => self.base_score,
            Rarity::Elite => self.base_score * 2,
        }
    }

    /// Live, surfaced enemies can be hit and can touch the player. An enemy
    /// killed earlier this frame stops soaking hits before it is marked.
    pub fn is_targetable(&self) -> bool {
        self.body.is_live() && !self.burrowed && !self.health.is_dead()
    }

    /// Shield raised and intact.
    pub fn shield_up(&self) -> bool {
        self.archetype == Archetype::Shielder && self.state == AiState::Attack && self.shield_hp > 0
    }

    /// A hit travelling with horizontal velocity `vx` strikes the raised shield.
    pub fn blocks(&self, vx: f32) -> bool {
        self.shield_up() && vx * self.body.facing < 0.0
    }

    pub fn tick_timers(&mut self, dt: f32) {
        tick_down(&mut self.state_timer, dt);
        tick_down(&mut self.attack_timer, dt);
        tick_down(&mut self.hit_flash, dt);
    }
}
