//! Enemy placement: mission setup, themed squads ahead of the player, the
//! Guardian and its summons, and culling of stragglers left far behind.
//!
//! Squads trigger on distance travelled rather than time. Each time the player
//! crosses the next threshold a squad themed by the local biome style drops in
//! ahead of the view, and the following threshold is rolled at a gap that
//! shrinks as the planet's enemy density rises.

use engine_core::{pick, AiState, RandomSource};
use glam::Vec2;
use procgen::{BiomeStyle, PlanetConfig, Terrain};

use crate::camera::Camera;
use crate::config::SimTuning;
use crate::enemy::{Archetype, Enemy, Rarity};
use crate::entities::{EntityStore, Loot, LootKind};
use crate::events::{EventQueue, GameEvent, MessageLog, SoundCue};
use crate::state::MissionProgress;

/// Squads land this many view widths ahead of the player.
pub const SQUAD_AHEAD: f32 = 0.7;
/// Horizontal gap between squad members before jitter.
pub const SQUAD_SPACING: f32 = 50.0;
/// Nothing is scattered this close to the mission start.
pub const SAFE_ZONE: f32 = 400.0;
/// World length per scattered spore, at density 0.5.
pub const SPORE_SPACING: f32 = 1500.0;
/// World length per neutral wanderer.
pub const NEUTRAL_SPACING: f32 = 1200.0;
/// Cores float this high above the ground at their site.
pub const CORE_LIFT: f32 = 40.0;
pub const BOSS_AHEAD: f32 = 0.6;
pub const BOSS_HOVER: f32 = 260.0;
/// Frames before the Guardian's first attack.
pub const BOSS_FIRST_ATTACK: f32 = 150.0;
const EDGE_PADDING: f32 = 20.0;

/// Archetypes a squad draws from in each biome style.
pub fn squad_theme(style: BiomeStyle) -> &'static [Archetype] {
    match style {
        BiomeStyle::Rolling => &[
            Archetype::Crawler,
            Archetype::Crawler,
            Archetype::Hornet,
            Archetype::Sentinel,
        ],
        BiomeStyle::Dunes => &[Archetype::Sandworm, Archetype::Crawler, Archetype::Dasher],
        BiomeStyle::Crags => &[Archetype::Dasher, Archetype::Crawler, Archetype::Sentinel],
        BiomeStyle::Plateaus => &[Archetype::Sentinel, Archetype::Hornet, Archetype::Shielder],
        BiomeStyle::Spires => &[Archetype::Hornet, Archetype::Shielder, Archetype::Dasher],
    }
}

pub fn squad_size(density: f32) -> usize {
    3 + (density.clamp(0.0, 1.0) * 3.0).round() as usize
}

pub fn elite_chance(density: f32) -> f32 {
    0.1 + 0.1 * density.clamp(0.0, 1.0)
}

fn roll_rarity(density: f32, rng: &mut dyn RandomSource) -> Rarity {
    if rng.chance(elite_chance(density)) {
        Rarity::Elite
    } else {
        Rarity::Common
    }
}

fn clamp_x(x: f32, terrain: &Terrain) -> f32 {
    x.clamp(EDGE_PADDING, (terrain.world_width() - EDGE_PADDING).max(EDGE_PADDING))
}

/// Distance-triggered squad scheduler.
#[derive(Debug, Clone, PartialEq)]
pub struct SquadSpawner {
    /// Player x that triggers the next squad.
    pub next_threshold: f32,
    pub squads_spawned: u32,
}

impl SquadSpawner {
    /// Schedule the first squad one gap past `start_x`.
    pub fn new(start_x: f32, density: f32, tuning: &SimTuning, rng: &mut dyn RandomSource) -> Self {
        Self {
            next_threshold: start_x + next_gap(density, tuning, rng),
            squads_spawned: 0,
        }
    }

    /// Spawn a squad if the player crossed the threshold. Returns the number of
    /// enemies added.
    pub fn update(
        &mut self,
        store: &mut EntityStore,
        terrain: &Terrain,
        styles: &[BiomeStyle],
        planet: &PlanetConfig,
        tuning: &SimTuning,
        rng: &mut dyn RandomSource,
    ) -> usize {
        let player_x = store.player.body.center().x;
        if player_x < self.next_threshold {
            return 0;
        }
        let x = player_x + SQUAD_AHEAD * tuning.view_width;
        let style = styles
            .get(terrain.segment_at(x))
            .copied()
            .unwrap_or(BiomeStyle::Rolling);
        let count = spawn_squad(store, terrain, style, x, planet.enemy_density, rng);
        self.squads_spawned += 1;
        self.next_threshold = player_x + next_gap(planet.enemy_density, tuning, rng);
        log::debug!(
            "Squad {} ({:?}, {} enemies) at x={:.0}; next at x={:.0}",
            self.squads_spawned,
            style,
            count,
            x,
            self.next_threshold
        );
        count
    }
}

/// Distance to the next squad threshold.
pub fn next_gap(density: f32, tuning: &SimTuning, rng: &mut dyn RandomSource) -> f32 {
    let (lo, hi) = if tuning.squad_gap_min <= tuning.squad_gap_max {
        (tuning.squad_gap_min, tuning.squad_gap_max)
    } else {
        (tuning.squad_gap_max, tuning.squad_gap_min)
    };
    rng.range(lo, hi) / (0.5 + density.clamp(0.0, 1.0))
}

/// Drop a squad themed by `style` around `x`. Returns how many spawned.
pub fn spawn_squad(
    store: &mut EntityStore,
    terrain: &Terrain,
    style: BiomeStyle,
    x: f32,
    density: f32,
    rng: &mut dyn RandomSource,
) -> usize {
    let theme = squad_theme(style);
    let size = squad_size(density);
    for i in 0..size {
        let archetype = pick(rng, theme).copied().unwrap_or(Archetype::Crawler);
        let rarity = roll_rarity(density, rng);
        let jitter = rng.range(-10.0, 10.0);
        let mx = clamp_x(x + i as f32 * SQUAD_SPACING + jitter, terrain);
        let enemy = Enemy::spawn(archetype, rarity, mx, terrain.height_at(mx), density, rng);
        store.add_enemy(enemy);
    }
    size
}

/// Place the mission's cores at their sites and scatter passive life.
pub fn populate_mission(
    store: &mut EntityStore,
    terrain: &Terrain,
    core_sites: &[f32],
    planet: &PlanetConfig,
    rng: &mut dyn RandomSource,
) {
    for (i, &site) in core_sites.iter().enumerate() {
        let x = clamp_x(site, terrain);
        let center = Vec2::new(x, terrain.height_at(x) - CORE_LIFT);
        let tier = (i % 3) as u32 + 1;
        store.loot.push(Loot::new(center, LootKind::Core { tier }, 0.0));
    }

    let width = terrain.world_width();
    let density = planet.enemy_density;
    if width <= SAFE_ZONE + EDGE_PADDING {
        return;
    }
    let spores = ((width / SPORE_SPACING) * (0.5 + density)).round() as usize;
    let neutrals = (width / NEUTRAL_SPACING).round() as usize;
    let passive = std::iter::repeat(Archetype::Spore)
        .take(spores)
        .chain(std::iter::repeat(Archetype::Neutral).take(neutrals));
    for archetype in passive {
        let x = rng.range(SAFE_ZONE, width - EDGE_PADDING);
        let enemy = Enemy::spawn(archetype, Rarity::Common, x, terrain.height_at(x), density, rng);
        store.add_enemy(enemy);
    }
    log::debug!(
        "Mission populated: {} cores, {} spores, {} wanderers",
        core_sites.len(),
        spores,
        neutrals
    );
}

/// Bring in the Guardian once. Returns its id, or `None` if it already came.
#[allow(clippy::too_many_arguments)]
pub fn spawn_boss(
    store: &mut EntityStore,
    terrain: &Terrain,
    view_width: f32,
    density: f32,
    progress: &mut MissionProgress,
    events: &mut EventQueue,
    messages: &mut MessageLog,
    rng: &mut dyn RandomSource,
) -> Option<u32> {
    if progress.boss_spawned {
        return None;
    }
    let x = clamp_x(store.player.body.center().x + BOSS_AHEAD * view_width, terrain);
    let ground = terrain.height_at(x);
    let mut boss = Enemy::spawn(Archetype::Guardian, Rarity::Common, x, ground, density, rng);
    boss.body.position.y = ground - BOSS_HOVER - boss.body.size.y;
    boss.state = AiState::Phase1;
    boss.attack_timer = BOSS_FIRST_ATTACK;
    boss.target = boss.body.center();
    let id = store.add_enemy(boss);

    progress.boss_spawned = true;
    events.push(GameEvent::BossSpawned);
    events.sound(SoundCue::BossRoar);
    messages.warning("Massive signature inbound. The Guardian has awoken.");
    log::info!("Guardian spawned at x={:.0}", x);
    Some(id)
}

/// Summoned reinforcement, already hunting.
pub fn spawn_minion(
    store: &mut EntityStore,
    terrain: &Terrain,
    archetype: Archetype,
    x: f32,
    density: f32,
    rng: &mut dyn RandomSource,
) -> u32 {
    let x = clamp_x(x, terrain);
    let mut minion = Enemy::spawn(archetype, Rarity::Common, x, terrain.height_at(x), density, rng);
    minion.burrowed = false;
    minion.state = AiState::Chase;
    store.add_enemy(minion)
}

/// Mark non-boss enemies left too far behind the camera. No reward is given.
pub fn cull_behind(store: &mut EntityStore, camera: &Camera, cull_views: f32) -> usize {
    let limit = camera.left() - cull_views * camera.view.x;
    let mut culled = 0;
    for enemy in store.enemies.iter_mut() {
        if enemy.body.is_live() && !enemy.archetype.is_boss() && enemy.body.right() < limit {
            enemy.body.mark();
            culled += 1;
        }
    }
    culled
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Player;
    use engine_core::{seeded, SequenceRng};

    fn store_at(x: f32) -> EntityStore {
        EntityStore::new(Player::new(x, 400.0, 100, 100.0, 60.0))
    }

    fn planet(density: f32) -> PlanetConfig {
        PlanetConfig {
            enemy_density: density,
            ..PlanetConfig::default()
        }
    }

    #[test]
    fn squad_size_and_elite_odds_grow_with_density() {
        assert_eq!(squad_size(0.0), 3);
        assert_eq!(squad_size(0.5), 5);
        assert_eq!(squad_size(1.0), 6);
        assert!((elite_chance(0.0) - 0.1).abs() < 1e-6);
        assert!((elite_chance(1.0) - 0.2).abs() < 1e-6);
    }

    /// Dunes squads only ever contain dune dwellers.
    #[test]
    fn squads_follow_the_local_theme() {
        let terrain = Terrain::flat(200, 40.0, 400.0);
        let mut store = store_at(100.0);
        let mut rng = seeded(3);
        let n = spawn_squad(&mut store, &terrain, BiomeStyle::Dunes, 1000.0, 0.5, &mut rng);
        assert_eq!(n, 5);
        assert_eq!(store.enemies.len(), 5);
        for e in &store.enemies {
            assert!(squad_theme(BiomeStyle::Dunes).contains(&e.archetype));
            assert!(e.id > 0);
        }
    }

    #[test]
    fn squad_triggers_only_past_the_threshold() {
        let terrain = Terrain::flat(400, 40.0, 400.0);
        let styles = vec![BiomeStyle::Crags; 400];
        let tuning = SimTuning::default();
        let cfg = planet(0.5);
        let mut rng = SequenceRng::constant(0.5);
        let mut spawner = SquadSpawner::new(100.0, cfg.enemy_density, &tuning, &mut rng);
        // Mid-range gap of 950 at density 0.5.
        assert!((spawner.next_threshold - 1050.0).abs() < 1e-3);

        let mut store = store_at(500.0);
        assert_eq!(spawner.update(&mut store, &terrain, &styles, &cfg, &tuning, &mut rng), 0);
        assert!(store.enemies.is_empty());

        store.player.body.position.x = 1100.0;
        let added = spawner.update(&mut store, &terrain, &styles, &cfg, &tuning, &mut rng);
        assert_eq!(added, 5);
        assert_eq!(spawner.squads_spawned, 1);
        assert!(spawner.next_threshold > 1100.0);
        let player_x = store.player.body.center().x;
        for e in &store.enemies {
            assert!(e.body.center().x > player_x + 0.5 * tuning.view_width);
            assert!(squad_theme(BiomeStyle::Crags).contains(&e.archetype));
        }
    }

    #[test]
    fn denser_planets_space_squads_closer() {
        let tuning = SimTuning::default();
        let sparse = next_gap(0.0, &tuning, &mut SequenceRng::constant(0.5));
        let dense = next_gap(1.0, &tuning, &mut SequenceRng::constant(0.5));
        assert!(dense < sparse);
    }

    #[test]
    fn mission_setup_places_cores_and_keeps_the_start_clear() {
        let terrain = Terrain::flat(600, 40.0, 400.0);
        let sites = [3000.0, 9000.0, 15000.0, 21000.0];
        let mut store = store_at(60.0);
        let mut rng = seeded(11);
        populate_mission(&mut store, &terrain, &sites, &planet(0.5), &mut rng);

        let tiers: Vec<u32> = store
            .loot
            .iter()
            .filter_map(|l| match l.kind {
                LootKind::Core { tier } => Some(tier),
                _ => None,
            })
            .collect();
        assert_eq!(tiers, vec![1, 2, 3, 1]);
        assert!(store.loot.iter().all(|l| l.lifetime.is_none()));
        assert!((store.loot[1].body.center().x - 9000.0).abs() < 1e-3);

        assert!(!store.enemies.is_empty());
        for e in &store.enemies {
            assert!(matches!(e.archetype, Archetype::Spore | Archetype::Neutral));
            assert!(e.body.center().x >= SAFE_ZONE);
        }
    }

    #[test]
    fn boss_spawns_once_ahead_and_airborne() {
        let terrain = Terrain::flat(200, 40.0, 400.0);
        let mut store = store_at(1000.0);
        let mut progress = MissionProgress::new(3);
        let mut events = EventQueue::default();
        let mut log = MessageLog::default();
        let mut rng = seeded(5);

        let id = spawn_boss(&mut store, &terrain, 960.0, 0.5, &mut progress, &mut events, &mut log, &mut rng);
        assert!(id.is_some());
        assert!(spawn_boss(&mut store, &terrain, 960.0, 0.5, &mut progress, &mut events, &mut log, &mut rng).is_none());

        let bosses: Vec<&Enemy> = store.enemies.iter().filter(|e| e.archetype.is_boss()).collect();
        assert_eq!(bosses.len(), 1);
        let boss = bosses[0];
        assert_eq!(boss.state, AiState::Phase1);
        assert_eq!(boss.attack_timer, BOSS_FIRST_ATTACK);
        assert!(boss.body.center().x > store.player.body.center().x);
        assert!((boss.body.bottom() - (400.0 - BOSS_HOVER)).abs() < 1e-3);
        assert!(progress.boss_spawned);
        let spawned = events
            .drain()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::BossSpawned))
            .count();
        assert_eq!(spawned, 1);
    }

    #[test]
    fn minions_arrive_hunting() {
        let terrain = Terrain::flat(200, 40.0, 400.0);
        let mut store = store_at(100.0);
        let id = spawn_minion(&mut store, &terrain, Archetype::Sandworm, 900.0, 0.5, &mut seeded(1));
        let minion = &store.enemies[0];
        assert_eq!(minion.id, id);
        assert_eq!(minion.state, AiState::Chase);
        assert!(!minion.burrowed);
    }

    #[test]
    fn stragglers_are_culled_but_the_boss_stays() {
        let mut store = store_at(100.0);
        let mut rng = seeded(2);
        for x in [100.0, 7000.0] {
            let e = Enemy::spawn(Archetype::Crawler, Rarity::Common, x, 400.0, 0.5, &mut rng);
            store.add_enemy(e);
        }
        let boss = Enemy::spawn(Archetype::Guardian, Rarity::Common, 100.0, 400.0, 0.5, &mut rng);
        store.add_enemy(boss);

        let mut camera = Camera::new(Vec2::new(960.0, 540.0));
        camera.position.x = 1500.0;
        assert_eq!(cull_behind(&mut store, &camera, 2.0), 0);
        camera.position.x = 8000.0;
        assert_eq!(cull_behind(&mut store, &camera, 2.0), 1);
        store.compact();
        assert_eq!(store.enemies.len(), 2);
        assert!(store.enemies.iter().any(|e| e.archetype.is_boss()));
    }
}
