//! The mission frame loop.
//!
//! [`Simulation`] owns one mission: the generated world, its entities, the
//! weather, the progress record and the shared random stream. The outer shell
//! feeds it an [`InputSnapshot`] and a frame delta, then drains events, messages
//! and snapshots for rendering and audio.
//!
//! Each simulated frame runs the systems in a fixed order:
//! weather, vegetation, player, camera, squad spawner, enemies, combat, loot,
//! cosmetics, compaction and finally the terminal checks.

use engine_core::{seeded, tick_down, FrameClock, RandomSource};
use glam::Vec2;
use physics::{clamp_to_world, find_hazard, integrate_body, Faction, MotionParams};
use procgen::{generate, HazardStrip, PlanetConfig, Terrain, WorldLayout};

use crate::combat::{apply_contact_damage, resolve_combat, CombatRules};
use crate::config::SimTuning;
use crate::effects::{update_particles, update_texts};
use crate::enemy::{Archetype, Enemy};
use crate::enemy_ai::{apply_separation, step_enemy, AiEffect, AiView};
use crate::events::{
    BossStatus, EventQueue, GameEvent, GameOverSummary, HudSnapshot, MessageLog, MissionMessage,
    VictorySummary,
};
use crate::flora::update_vegetation;
use crate::input::InputSnapshot;
use crate::loot::{collect_loot, update_loot};
use crate::player::{spawn_player, update_player, PlayerEnv, PlayerUpgrades, UpgradeMultipliers};
use crate::spawner::{cull_behind, populate_mission, spawn_boss, spawn_minion, SquadSpawner};
use crate::state::{MissionOutcome, MissionProgress, WorldState};
use crate::weapons::fire_weapon;
use crate::weather::{WeatherSnapshot, WeatherState};

/// One running mission.
pub struct Simulation {
    planet: PlanetConfig,
    tuning: SimTuning,
    upgrades: UpgradeMultipliers,
    world: WorldState,
    weather: WeatherState,
    progress: MissionProgress,
    spawner: SquadSpawner,
    clock: FrameClock,
    input: InputSnapshot,
    events: EventQueue,
    messages: MessageLog,
    rng: Box<dyn RandomSource>,
}

impl Simulation {
    /// Generate a mission on `planet` from a seed.
    pub fn new(planet: PlanetConfig, upgrades: PlayerUpgrades, tuning: SimTuning, seed: u64) -> Self {
        Self::with_rng(planet, upgrades, tuning, Box::new(seeded(seed)))
    }

    /// Generate a mission drawing from an injected random stream.
    pub fn with_rng(
        planet: PlanetConfig,
        upgrades: PlayerUpgrades,
        tuning: SimTuning,
        mut rng: Box<dyn RandomSource>,
    ) -> Self {
        let planet = planet.sanitized();
        let layout = generate(&planet, tuning.mission_segments, tuning.segment_width, rng.as_mut());
        Self::from_layout(planet, upgrades, tuning, layout, rng)
    }

    /// Start a mission on an already generated layout.
    pub fn from_layout(
        planet: PlanetConfig,
        upgrades: PlayerUpgrades,
        tuning: SimTuning,
        layout: WorldLayout,
        mut rng: Box<dyn RandomSource>,
    ) -> Self {
        let planet = planet.sanitized();
        let upgrades = upgrades.clamped().multipliers();
        let player = spawn_player(&layout.terrain, &upgrades, &tuning);
        let core_sites = layout.core_sites.clone();
        let progress = MissionProgress::new(layout.required_cores);
        let view = Vec2::new(tuning.view_width, tuning.view_height);
        let mut world = WorldState::new(layout, player, view);

        populate_mission(&mut world.store, &world.terrain, &core_sites, &planet, rng.as_mut());
        let weather = WeatherState::new(rng.as_mut());
        let start_x = world.store.player.body.center().x;
        let spawner = SquadSpawner::new(start_x, planet.enemy_density, &tuning, rng.as_mut());

        let mut messages = MessageLog::default();
        messages.info(format!(
            "Touchdown. Recover {} data cores.",
            progress.cores_required
        ));
        log::info!(
            "Mission start: {:.0} px of terrain, {} cores required, density {:.2}",
            world.world_width(),
            progress.cores_required,
            planet.enemy_density
        );

        Self {
            planet,
            clock: FrameClock::new(tuning.max_dt_scale),
            tuning,
            upgrades,
            world,
            weather,
            progress,
            spawner,
            input: InputSnapshot::default(),
            events: EventQueue::default(),
            messages,
            rng,
        }
    }

    // ── Shell interface ─────────────────────────────────────────────────────

    /// Controls used by the following updates.
    pub fn set_input(&mut self, input: InputSnapshot) {
        self.input = input.sanitized();
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.drain()
    }

    pub fn drain_messages(&mut self) -> Vec<MissionMessage> {
        self.messages.drain()
    }

    pub fn hud(&self) -> HudSnapshot {
        let player = &self.world.store.player;
        HudSnapshot {
            health: player.health.current,
            max_health: player.health.max,
            fuel: player.fuel,
            max_fuel: player.max_fuel,
            score: self.progress.score,
            cores_collected: self.progress.cores_collected,
            cores_required: self.progress.cores_required,
            weapon_name: player.weapon.profile().name,
            objective: self.progress.objective(),
        }
    }

    pub fn boss_status(&self) -> BossStatus {
        match self.world.store.boss().filter(|b| b.body.is_live()) {
            Some(boss) => BossStatus {
                active: true,
                hp: boss.health.current,
                max_hp: boss.health.max,
                name: boss.archetype.name(),
            },
            None => BossStatus {
                active: false,
                hp: 0,
                max_hp: 0,
                name: Archetype::Guardian.name(),
            },
        }
    }

    pub fn world(&self) -> &WorldState {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut WorldState {
        &mut self.world
    }

    pub fn weather(&self) -> WeatherSnapshot {
        self.weather.snapshot()
    }

    pub fn progress(&self) -> &MissionProgress {
        &self.progress
    }

    pub fn planet(&self) -> &PlanetConfig {
        &self.planet
    }

    pub fn squads_spawned(&self) -> u32 {
        self.spawner.squads_spawned
    }

    /// Number of `update` calls, including ignored ones.
    pub fn frame_count(&self) -> u64 {
        self.clock.frame_count()
    }

    /// Number of frames that actually advanced the world.
    pub fn ticks(&self) -> u64 {
        self.clock.ticks()
    }

    pub fn is_over(&self) -> bool {
        self.progress.is_resolved()
    }

    // ── Frame loop ──────────────────────────────────────────────────────────

    /// Advance the mission by `raw_dt` nominal frames.
    pub fn update(&mut self, raw_dt: f32) {
        let dt = self.clock.begin_frame(raw_dt);
        if dt <= 0.0 || self.progress.is_resolved() {
            return;
        }
        if self.progress.hit_stop > 0.0 {
            tick_down(&mut self.progress.hit_stop, dt);
            return;
        }
        self.clock.advance(dt);

        self.update_weather(dt);
        self.update_flora(dt);
        self.update_player(dt);
        let width = self.world.world_width();
        self.world.camera.follow(&self.world.store.player.body, width, dt);
        self.update_spawns();
        self.update_enemies(dt);
        self.update_combat(dt);
        self.update_loot(dt);

        let store = &mut self.world.store;
        update_particles(&mut store.particles, self.planet.gravity, dt);
        update_texts(&mut store.texts, dt);
        store.compact();

        self.check_outcome();
    }

    fn update_weather(&mut self, dt: f32) {
        let rng = self.rng.as_mut();
        if let Some(phase) = self.weather.update(&self.planet, dt, rng) {
            log::debug!("Weather {} entered {:?}", self.weather.kind.name(), phase);
            self.events.push(GameEvent::WeatherChanged {
                kind: self.weather.kind,
                phase,
            });
        }
        self.weather
            .spawn_ambient(&mut self.world.store.particles, &self.world.camera, dt, rng);
    }

    fn update_flora(&mut self, dt: f32) {
        let world = &mut self.world;
        let movers = std::iter::once(&world.store.player.body)
            .chain(world.store.enemies.iter().map(|e| &e.body));
        update_vegetation(
            &mut world.vegetation,
            movers,
            self.weather.wind,
            self.tuning.spring(),
            dt,
        );
    }

    fn update_player(&mut self, dt: f32) {
        let world = &mut self.world;
        let env = PlayerEnv {
            terrain: &world.terrain,
            hazards: &world.hazards,
            gravity: self.planet.gravity,
            clock: self.clock.elapsed(),
        };
        update_player(
            &mut world.store.player,
            &self.input,
            &self.upgrades,
            &env,
            &mut world.store.projectiles,
            &mut self.events,
            self.rng.as_mut(),
            dt,
        );
    }

    fn update_spawns(&mut self) {
        let world = &mut self.world;
        self.spawner.update(
            &mut world.store,
            &world.terrain,
            &world.styles,
            &self.planet,
            &self.tuning,
            self.rng.as_mut(),
        );
        let culled = cull_behind(&mut world.store, &world.camera, self.tuning.cull_distance_views);
        if culled > 0 {
            log::debug!("Culled {} stragglers", culled);
        }
    }

    fn update_enemies(&mut self, dt: f32) {
        let world = &mut self.world;
        let rng = self.rng.as_mut();
        let width = world.terrain.world_width();
        let view = AiView {
            player_center: world.store.player.body.center(),
            terrain: &world.terrain,
            clock: self.clock.elapsed(),
            dt,
        };

        let mut pending = Vec::new();
        for enemy in world.store.enemies.iter_mut().filter(|e| e.body.is_live()) {
            let (steering, effects) = step_enemy(enemy, &view, rng);
            let params = enemy_motion(enemy, self.planet.gravity, &world.hazards, &world.terrain, view.clock);
            integrate_body(&mut enemy.body, params.driven(steering), &world.terrain, dt);
            clamp_to_world(&mut enemy.body, width);
            pending.extend(effects);
        }
        apply_separation(
            &mut world.store.enemies,
            self.tuning.separation_radius,
            self.tuning.separation_force,
        );

        for effect in pending {
            match effect {
                AiEffect::Fire { origin, angle, weapon } => {
                    fire_weapon(&mut world.store.projectiles, origin, angle, weapon, Faction::Enemy, rng);
                }
                AiEffect::Summon { archetype, x } => {
                    spawn_minion(&mut world.store, &world.terrain, archetype, x, self.planet.enemy_density, rng);
                }
                AiEffect::AlertMarker { position } => {
                    self.events.push(GameEvent::AlertMarker { position });
                }
                AiEffect::Sound(cue) => self.events.sound(cue),
            }
        }

        apply_contact_damage(&mut world.store, &mut self.events);
    }

    fn update_combat(&mut self, dt: f32) {
        let rules = CombatRules {
            gravity: self.planet.gravity,
            damage_multiplier: self.upgrades.damage,
            rare_loot_chance: self.planet.rare_loot_chance,
            loot_lifetime: self.tuning.loot_lifetime,
            kill_hit_stop: self.tuning.kill_hit_stop,
        };
        let world = &mut self.world;
        resolve_combat(
            &mut world.store,
            &world.terrain,
            &world.camera,
            &rules,
            &mut self.progress,
            &mut self.events,
            self.rng.as_mut(),
            dt,
        );
    }

    fn update_loot(&mut self, dt: f32) {
        let world = &mut self.world;
        update_loot(&mut world.store.loot, &world.terrain, self.planet.gravity, dt);
        collect_loot(&mut world.store, &mut self.progress, &mut self.events, &mut self.messages);
        if self.progress.cores_complete() && !self.progress.boss_spawned {
            spawn_boss(
                &mut world.store,
                &world.terrain,
                self.tuning.view_width,
                self.planet.enemy_density,
                &mut self.progress,
                &mut self.events,
                &mut self.messages,
                self.rng.as_mut(),
            );
        }
    }

    /// Raise defeat or victory, each at most once. Defeat wins a tie.
    fn check_outcome(&mut self) {
        if self.progress.is_resolved() {
            return;
        }
        let player = &self.world.store.player;
        if player.health.is_dead() {
            let reason = player
                .last_damage
                .map(|source| source.describe())
                .unwrap_or_else(|| "Lost in action".to_string());
            let summary = GameOverSummary::new(self.progress.score, self.progress.cores_collected, reason);
            log::info!(
                "Mission failed after {} frames: {} (score {}, salvage {})",
                self.clock.ticks(),
                summary.reason,
                summary.score,
                summary.salvage
            );
            self.messages.warning(format!("Signal lost. {}.", summary.reason));
            self.progress.outcome = Some(MissionOutcome::Defeat);
            self.events.push(GameEvent::GameOver(summary));
        } else if self.progress.boss_defeated {
            let summary = VictorySummary::new(self.progress.score, self.progress.cores_collected);
            log::info!(
                "Mission complete after {} frames: score {}, bonus {}",
                self.clock.ticks(),
                summary.score,
                summary.bonus
            );
            self.messages.success("The Guardian has fallen. Extraction inbound.");
            self.progress.outcome = Some(MissionOutcome::Victory);
            self.events.push(GameEvent::Victory(summary));
        }
    }
}

/// Motion rules for one enemy this frame. Walkers slide on ice like the player
/// does; hazard damage, drag and lift only ever apply to the player.
fn enemy_motion(enemy: &Enemy, gravity: f32, hazards: &[HazardStrip], terrain: &Terrain, clock: f32) -> MotionParams {
    if enemy.stats().flying {
        return MotionParams::flyer();
    }
    let icy = find_hazard(hazards, &enemy.body, terrain, clock).is_some_and(|e| e.icy);
    MotionParams::walker(gravity).on_ice(icy)
}
