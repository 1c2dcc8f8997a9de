//! Hit resolution: projectiles against enemies and the player, explosions,
//! contact damage, deaths and their rewards.

use engine_core::{AiState, RandomSource};
use glam::Vec2;
use physics::{bodies_overlap, projectile_hits, BASE_GRAVITY};
use procgen::Terrain;

use crate::camera::Camera;
use crate::effects::{spawn_burst, spawn_text};
use crate::enemy::{Archetype, Enemy};
use crate::enemy_ai::{FLEE_FRAMES, SHIELD_DOWN_FRAMES};
use crate::entities::{DamageSource, EntityStore, FloatingText, Loot, LootKind, Player, Projectile};
use crate::events::{EventQueue, GameEvent, SoundCue};
use crate::state::MissionProgress;
use crate::weapons::{hit_damage, WeaponType, PLAYER_WEAPONS};

pub const EXPLOSION_RADIUS: f32 = 90.0;
/// Knockback taken by the boss relative to other enemies.
pub const BOSS_KNOCKBACK_SCALE: f32 = 0.1;
/// Projectiles further than this many view widths from the camera are dropped.
pub const PROJECTILE_CULL_VIEWS: f32 = 1.5;
pub const BASE_WEAPON_DROP: f32 = 0.04;
pub const RARE_WEAPON_DROP: f32 = 0.1;
pub const HEALTH_DROP: f32 = 0.08;
pub const ELITE_DROP_MULTIPLIER: f32 = 4.0;
pub const CONTACT_KNOCKBACK: Vec2 = Vec2::new(6.0, -4.0);

/// Per-mission numbers combat needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CombatRules {
    pub gravity: f32,
    /// Upgrade damage multiplier for player shots.
    pub damage_multiplier: f32,
    pub rare_loot_chance: f32,
    pub loot_lifetime: f32,
    pub kill_hit_stop: f32,
}

impl Default for CombatRules {
    fn default() -> Self {
        Self {
            gravity: 1.0,
            damage_multiplier: 1.0,
            rare_loot_chance: 0.0,
            loot_lifetime: 900.0,
            kill_hit_stop: 3.0,
        }
    }
}

/// Explosive shell that went off this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Detonation {
    pub center: Vec2,
    pub weapon: WeaponType,
}

/// Drop chances `(weapon, health)` for a kill.
pub fn drop_chances(rare_loot_chance: f32, elite: bool) -> (f32, f32) {
    let mult = if elite { ELITE_DROP_MULTIPLIER } else { 1.0 };
    let weapon = ((BASE_WEAPON_DROP + RARE_WEAPON_DROP * rare_loot_chance.clamp(0.0, 1.0)) * mult).min(1.0);
    let health = (HEALTH_DROP * mult).min(1.0);
    (weapon, health)
}

/// Move projectiles and drop the ones that expired, left the view or hit the ground.
/// Explosive shells that hit the ground or time out detonate.
pub fn update_projectiles(
    projectiles: &mut [Projectile],
    terrain: &Terrain,
    camera: &Camera,
    gravity: f32,
    dt: f32,
) -> Vec<Detonation> {
    let mut detonations = Vec::new();
    let cull = camera.view.x * PROJECTILE_CULL_VIEWS;
    for p in projectiles.iter_mut().filter(|p| p.body.is_live()) {
        p.body.velocity.y += BASE_GRAVITY * gravity * p.gravity_scale * dt;
        p.body.position += p.body.velocity * dt;
        let center = p.body.center();
        let expired = p.lifetime.update(dt);
        let grounded = center.y >= terrain.height_at(center.x);
        let far = camera.distance_x(center.x) > cull;
        if p.explosive && (grounded || expired) && !far {
            detonations.push(Detonation {
                center,
                weapon: p.weapon,
            });
        }
        if expired || grounded || far {
            p.body.mark();
        }
    }
    detonations
}

/// Knock an enemy away, the boss barely.
fn knock(enemy: &mut Enemy, impulse: Vec2) {
    let scale = if enemy.archetype.is_boss() { BOSS_KNOCKBACK_SCALE } else { 1.0 };
    enemy.body.velocity += impulse * scale;
}

/// Being shot wakes an enemy up; wildlife bolts.
fn provoke(enemy: &mut Enemy) {
    match enemy.archetype {
        Archetype::Neutral => {
            enemy.state = AiState::Flee;
            enemy.state_timer = FLEE_FRAMES;
        }
        Archetype::Guardian | Archetype::Spore => {}
        _ if matches!(enemy.state, AiState::Idle | AiState::Alert) => {
            enemy.state = AiState::Chase;
            enemy.state_timer = if enemy.archetype == Archetype::Shielder {
                SHIELD_DOWN_FRAMES
            } else {
                0.0
            };
        }
        _ => {}
    }
}

/// Apply a landed hit to an enemy.
pub fn damage_enemy(
    enemy: &mut Enemy,
    amount: i32,
    impulse: Vec2,
    texts: &mut Vec<FloatingText>,
    events: &mut EventQueue,
) {
    enemy.health.take_damage(amount);
    enemy.hit_flash = 8.0;
    provoke(enemy);
    knock(enemy, impulse);
    spawn_text(
        texts,
        enemy.body.center() - Vec2::new(0.0, enemy.body.size.y * 0.5 + 6.0),
        amount.to_string(),
        [1.0, 0.9, 0.4],
    );
    events.sound(SoundCue::Hit);
}

/// Area damage around `center`: flat damage and knockback away from the blast.
pub fn detonate(
    store: &mut EntityStore,
    blast: Detonation,
    damage_multiplier: f32,
    events: &mut EventQueue,
    rng: &mut dyn RandomSource,
) -> usize {
    let profile = blast.weapon.profile();
    let damage = hit_damage(profile.damage, damage_multiplier);
    let mut hit = 0;
    for enemy in store.enemies.iter_mut().filter(|e| e.is_targetable()) {
        let offset = enemy.body.center() - blast.center;
        if offset.length() > EXPLOSION_RADIUS {
            continue;
        }
        let away = offset.try_normalize().unwrap_or(Vec2::NEG_Y);
        damage_enemy(enemy, damage, away * profile.knockback, &mut store.texts, events);
        hit += 1;
    }
    spawn_burst(&mut store.particles, blast.center, 24, 5.0, [1.0, 0.55, 0.2], rng);
    events.sound(SoundCue::Explosion);
    hit
}

/// Player shots against live, surfaced enemies.
pub fn resolve_player_shots(
    store: &mut EntityStore,
    rules: &CombatRules,
    events: &mut EventQueue,
    rng: &mut dyn RandomSource,
) {
    let mut detonations = Vec::new();
    let EntityStore {
        enemies,
        projectiles,
        particles,
        texts,
        ..
    } = &mut *store;

    for p in projectiles
        .iter_mut()
        .filter(|p| p.body.is_live() && p.faction.hits_enemies())
    {
        for enemy in enemies.iter_mut() {
            if !enemy.is_targetable() || p.struck.contains(&enemy.id) {
                continue;
            }
            if !projectile_hits(&p.body, &enemy.body) {
                continue;
            }
            let damage = hit_damage(p.base_damage(), rules.damage_multiplier);

            if enemy.blocks(p.body.velocity.x) {
                enemy.shield_hp -= damage;
                p.body.mark();
                spawn_burst(particles, p.body.center(), 6, 3.0, [0.6, 0.9, 1.0], rng);
                events.sound(SoundCue::Blocked);
                break;
            }

            if p.explosive {
                p.body.mark();
                detonations.push(Detonation {
                    center: p.body.center(),
                    weapon: p.weapon,
                });
                break;
            }

            let impulse = p.body.velocity.normalize_or_zero() * p.weapon.profile().knockback;
            damage_enemy(enemy, damage, impulse, texts, events);
            spawn_burst(particles, p.body.center(), 4, 2.5, enemy.color, rng);
            p.struck.push(enemy.id);
            if p.pierce > 0 {
                p.pierce -= 1;
            } else {
                p.body.mark();
                break;
            }
        }
    }

    for blast in detonations {
        detonate(store, blast, rules.damage_multiplier, events, rng);
    }
}

/// Enemy shots only ever test the player. A shot that connects is spent even when
/// invulnerability swallows the damage.
pub fn resolve_enemy_shots(store: &mut EntityStore, events: &mut EventQueue) {
    let player = &mut store.player;
    for p in store
        .projectiles
        .iter_mut()
        .filter(|p| p.body.is_live() && p.faction.hits_player())
    {
        if !projectile_hits(&p.body, &player.body) {
            continue;
        }
        p.body.mark();
        if player.hurt(hit_damage(p.base_damage(), 1.0), DamageSource::Projectile(p.weapon)) {
            events.sound(SoundCue::Hurt);
        }
    }
}

/// Surfaced enemies touching the player deal their contact damage. Returns whether a hit landed.
pub fn apply_contact_damage(store: &mut EntityStore, events: &mut EventQueue) -> bool {
    let player: &mut Player = &mut store.player;
    for enemy in store.enemies.iter() {
        if !enemy.is_targetable() || enemy.contact_damage <= 0 {
            continue;
        }
        if !bodies_overlap(&player.body, &enemy.body) {
            continue;
        }
        if player.hurt(enemy.contact_damage, DamageSource::Contact(enemy.archetype)) {
            let away = if player.body.center().x < enemy.body.center().x { -1.0 } else { 1.0 };
            player.body.velocity = Vec2::new(CONTACT_KNOCKBACK.x * away, CONTACT_KNOCKBACK.y);
            player.body.grounded = false;
            events.sound(SoundCue::Hurt);
            return true;
        }
    }
    false
}

/// Mark dead enemies, pay out score and drops. Returns how many died.
pub fn process_deaths(
    store: &mut EntityStore,
    rules: &CombatRules,
    progress: &mut MissionProgress,
    events: &mut EventQueue,
    rng: &mut dyn RandomSource,
) -> usize {
    let mut deaths = 0;
    for enemy in store.enemies.iter_mut() {
        if !enemy.body.is_live() || !enemy.health.is_dead() {
            continue;
        }
        enemy.body.mark();
        deaths += 1;
        let center = enemy.body.center();
        progress.score += enemy.score_value();
        progress.kills += 1;
        progress.hit_stop = progress.hit_stop.max(rules.kill_hit_stop);

        let (weapon_chance, health_chance) = drop_chances(rules.rare_loot_chance, enemy.is_elite());
        if rng.chance(weapon_chance) {
            let weapon = PLAYER_WEAPONS[1 + rng.index(PLAYER_WEAPONS.len() - 1)];
            store.loot.push(dropped(center, LootKind::Weapon(weapon), rules.loot_lifetime));
        }
        if rng.chance(health_chance) {
            store.loot.push(dropped(center, LootKind::Health, rules.loot_lifetime));
        }

        spawn_burst(&mut store.particles, center, 14, 4.0, enemy.color, rng);
        events.sound(SoundCue::Kill);
        events.push(GameEvent::EnemyKilled {
            archetype: enemy.archetype,
            elite: enemy.is_elite(),
            position: center,
        });
        if enemy.archetype.is_boss() {
            progress.boss_defeated = true;
            log::info!("Guardian destroyed, score {}", progress.score);
        }
    }
    deaths
}

fn dropped(center: Vec2, kind: LootKind, lifetime: f32) -> Loot {
    let mut loot = Loot::new(center, kind, lifetime);
    loot.body.velocity.y = -4.0;
    loot
}

/// Whole combat step: move shots, resolve hits both ways, settle deaths.
#[allow(clippy::too_many_arguments)]
pub fn resolve_combat(
    store: &mut EntityStore,
    terrain: &Terrain,
    camera: &Camera,
    rules: &CombatRules,
    progress: &mut MissionProgress,
    events: &mut EventQueue,
    rng: &mut dyn RandomSource,
    dt: f32,
) {
    let ground_blasts = update_projectiles(&mut store.projectiles, terrain, camera, rules.gravity, dt);
    for blast in ground_blasts {
        detonate(store, blast, rules.damage_multiplier, events, rng);
    }
    resolve_player_shots(store, rules, events, rng);
    resolve_enemy_shots(store, events);
    process_deaths(store, rules, progress, events, rng);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enemy::{Rarity, SHIELD_HP};
    use crate::weapons::fire_weapon;
    use engine_core::SequenceRng;
    use physics::Faction;

    struct Arena {
        store: EntityStore,
        terrain: Terrain,
        camera: Camera,
        rules: CombatRules,
        progress: MissionProgress,
        events: EventQueue,
        rng: SequenceRng,
    }

    impl Arena {
        fn new() -> Self {
            let store = EntityStore::new(Player::new(100.0, 400.0, 100, 100.0, 60.0));
            let camera = Camera::focused_on(&store.player.body, Vec2::new(960.0, 540.0), 8000.0);
            Self {
                store,
                terrain: Terrain::flat(200, 40.0, 400.0),
                camera,
                rules: CombatRules::default(),
                progress: MissionProgress::new(3),
                events: EventQueue::default(),
                // High draws: no drops unless a chance is 1.
                rng: SequenceRng::constant(0.99),
            }
        }

        fn enemy(&mut self, archetype: Archetype, x: f32) -> usize {
            let e = Enemy::spawn(archetype, Rarity::Common, x, 400.0, 0.5, &mut self.rng);
            self.store.add_enemy(e);
            self.store.enemies.len() - 1
        }

        /// A shot sitting on top of the enemy, travelling `dir`.
        fn shot_at(&mut self, index: usize, weapon: WeaponType, dir: f32) {
            let target = self.store.enemies[index].body.center();
            let angle = if dir < 0.0 { std::f32::consts::PI } else { 0.0 };
            fire_weapon(&mut self.store.projectiles, target, angle, weapon, Faction::Player, &mut self.rng);
        }

        fn resolve(&mut self) {
            resolve_player_shots(&mut self.store, &self.rules, &mut self.events, &mut self.rng);
            resolve_enemy_shots(&mut self.store, &mut self.events);
            process_deaths(&mut self.store, &self.rules, &mut self.progress, &mut self.events, &mut self.rng);
            self.store.compact();
        }
    }

    /// Blaster at multiplier 1.0 deals exactly 10 a hit; a 20 hp crawler dies on the second.
    #[test]
    fn blaster_kills_crawler_in_two_hits() {
        let mut a = Arena::new();
        let i = a.enemy(Archetype::Crawler, 400.0);
        assert_eq!(a.store.enemies[i].health.current, 20);
        a.shot_at(i, WeaponType::Blaster, 1.0);
        a.resolve();
        assert_eq!(a.store.enemies[i].health.current, 10);
        assert_eq!(a.store.enemies[i].state, AiState::Chase);
        assert!(a.store.projectiles.is_empty());

        a.shot_at(i, WeaponType::Blaster, 1.0);
        a.resolve();
        assert!(a.store.enemies.is_empty());
        assert_eq!(a.progress.score, 100);
        assert_eq!(a.progress.hit_stop, 3.0);
        assert!(a
            .events
            .iter()
            .any(|e| matches!(e, GameEvent::EnemyKilled { archetype: Archetype::Crawler, .. })));
    }

    #[test]
    fn raised_shield_blocks_frontal_hits_only() {
        let mut a = Arena::new();
        let i = a.enemy(Archetype::Shielder, 400.0);
        let full = a.store.enemies[i].health.current;
        a.store.enemies[i].state = AiState::Attack;
        a.store.enemies[i].body.facing = -1.0;

        // From the left, travelling right, into the faced side.
        a.shot_at(i, WeaponType::Blaster, 1.0);
        a.resolve();
        assert_eq!(a.store.enemies[i].health.current, full);
        assert_eq!(a.store.enemies[i].shield_hp, SHIELD_HP - 10);
        assert!(a.events.iter().any(|e| *e == GameEvent::Sound(SoundCue::Blocked)));

        // From behind.
        a.shot_at(i, WeaponType::Blaster, -1.0);
        a.resolve();
        assert_eq!(a.store.enemies[i].health.current, full - 10);
    }

    #[test]
    fn chasing_shielder_takes_frontal_hits() {
        let mut a = Arena::new();
        let i = a.enemy(Archetype::Shielder, 400.0);
        let full = a.store.enemies[i].health.current;
        a.store.enemies[i].state = AiState::Chase;
        a.store.enemies[i].body.facing = -1.0;
        a.shot_at(i, WeaponType::Blaster, 1.0);
        a.resolve();
        assert_eq!(a.store.enemies[i].health.current, full - 10);
    }

    #[test]
    fn rail_pierces_each_enemy_once() {
        let mut a = Arena::new();
        let first = a.enemy(Archetype::Sentinel, 400.0);
        a.enemy(Archetype::Sentinel, 402.0);
        a.shot_at(first, WeaponType::Rail, 1.0);
        a.resolve();
        a.resolve();
        // 28 damage kills a 30 hp sentinel only on a second hit, which must not happen.
        assert_eq!(a.store.enemies.len(), 2);
        assert!(a.store.enemies.iter().all(|e| e.health.current == 2));
        assert_eq!(a.store.projectiles[0].pierce, 1);
    }

    #[test]
    fn burrowed_and_marked_enemies_are_not_hit() {
        let mut a = Arena::new();
        let worm = a.enemy(Archetype::Sandworm, 400.0);
        a.shot_at(worm, WeaponType::Blaster, 1.0);
        a.resolve();
        assert_eq!(a.store.projectiles.len(), 1);

        let mut b = Arena::new();
        let i = b.enemy(Archetype::Crawler, 400.0);
        b.store.enemies[i].body.mark();
        b.shot_at(i, WeaponType::Blaster, 1.0);
        resolve_player_shots(&mut b.store, &b.rules, &mut b.events, &mut b.rng);
        assert!(b.store.projectiles[0].body.is_live());
        assert_eq!(b.store.enemies[i].health.current, 20);
    }

    #[test]
    fn pellets_pass_a_spore_killed_this_frame() {
        let mut a = Arena::new();
        let spore = a.enemy(Archetype::Spore, 400.0);
        let crawler = a.enemy(Archetype::Crawler, 402.0);
        a.store.enemies[spore].health.current = 1;
        a.shot_at(spore, WeaponType::Scatter, 1.0);
        resolve_player_shots(&mut a.store, &a.rules, &mut a.events, &mut a.rng);
        assert!(a.store.enemies[spore].health.is_dead());
        assert!(a.store.enemies[crawler].health.current < 20);
        let spent = a.store.projectiles.iter().filter(|p| !p.body.is_live()).count();
        assert_eq!(spent, 5);
    }

    #[test]
    fn explosion_hits_everything_in_radius() {
        let mut a = Arena::new();
        let near = a.enemy(Archetype::Crawler, 400.0);
        a.enemy(Archetype::Crawler, 460.0);
        a.enemy(Archetype::Crawler, 700.0);
        a.shot_at(near, WeaponType::Launcher, 1.0);
        a.resolve();
        // Two crawlers inside 90 px die to 40 flat damage, the far one is untouched.
        assert_eq!(a.store.enemies.len(), 1);
        assert_eq!(a.store.enemies[0].health.current, 20);
        assert!(a.events.iter().any(|e| *e == GameEvent::Sound(SoundCue::Explosion)));
    }

    #[test]
    fn neutral_flees_when_shot() {
        let mut a = Arena::new();
        let i = a.enemy(Archetype::Neutral, 400.0);
        a.shot_at(i, WeaponType::Blaster, 1.0);
        a.resolve();
        assert_eq!(a.store.enemies[i].state, AiState::Flee);
    }

    #[test]
    fn enemy_shot_is_spent_even_when_invulnerable() {
        let mut a = Arena::new();
        let center = a.store.player.body.center();
        fire_weapon(&mut a.store.projectiles, center, 0.0, WeaponType::SentinelBolt, Faction::Enemy, &mut a.rng);
        a.resolve();
        assert_eq!(a.store.player.health.current, 90);
        fire_weapon(&mut a.store.projectiles, center, 0.0, WeaponType::SentinelBolt, Faction::Enemy, &mut a.rng);
        a.resolve();
        assert_eq!(a.store.player.health.current, 90);
        assert!(a.store.projectiles.is_empty());
    }

    /// Crawler contact takes 100 to 85, sets invulnerability and blocks the next touch.
    #[test]
    fn crawler_contact_then_invulnerable() {
        let mut a = Arena::new();
        a.enemy(Archetype::Crawler, 100.0);
        assert!(apply_contact_damage(&mut a.store, &mut a.events));
        assert_eq!(a.store.player.health.current, 85);
        assert_eq!(a.store.player.invulnerable, 60.0);
        assert!(!apply_contact_damage(&mut a.store, &mut a.events));
        assert_eq!(a.store.player.health.current, 85);
    }

    #[test]
    fn wildlife_never_hurts() {
        let mut a = Arena::new();
        a.enemy(Archetype::Neutral, 100.0);
        assert!(!apply_contact_damage(&mut a.store, &mut a.events));
        assert_eq!(a.store.player.health.current, 100);
    }

    #[test]
    fn drop_chances_cap_at_one() {
        assert_eq!(drop_chances(0.0, false), (0.04, 0.08));
        let (weapon, health) = drop_chances(1.0, true);
        assert!((weapon - 0.56).abs() < 1e-5);
        assert!((health - 0.32).abs() < 1e-5);
        let (weapon, _) = drop_chances(20.0, true);
        assert!(weapon <= 1.0);
    }

    #[test]
    fn projectiles_leave_when_far_or_grounded() {
        let mut a = Arena::new();
        let far = Vec2::new(a.camera.center().x + 2000.0, 300.0);
        fire_weapon(&mut a.store.projectiles, far, 0.0, WeaponType::Blaster, Faction::Player, &mut a.rng);
        let low = Vec2::new(200.0, 398.0);
        fire_weapon(&mut a.store.projectiles, low, std::f32::consts::FRAC_PI_2, WeaponType::Blaster, Faction::Player, &mut a.rng);
        update_projectiles(&mut a.store.projectiles, &a.terrain, &a.camera, 1.0, 1.0);
        assert!(a.store.projectiles.iter().all(|p| !p.body.is_live()));
    }

    #[test]
    fn launcher_detonates_on_the_ground() {
        let mut a = Arena::new();
        let low = Vec2::new(200.0, 398.0);
        fire_weapon(&mut a.store.projectiles, low, std::f32::consts::FRAC_PI_2, WeaponType::Launcher, Faction::Player, &mut a.rng);
        let blasts = update_projectiles(&mut a.store.projectiles, &a.terrain, &a.camera, 1.0, 1.0);
        assert_eq!(blasts.len(), 1);
    }
}
