//! Enemy behavior.
//!
//! Each archetype has a pure think function that reads the enemy and a view of the
//! world and returns an [`AiDecision`]. [`apply_decision`] is the only place enemy
//! AI state is written. Side effects (shots, summons, alert markers, sounds) are
//! returned as [`AiEffect`]s for the frame loop to carry out.

use std::collections::HashMap;

use engine_core::{pick, AiState, RandomSource};
use glam::Vec2;
use physics::aim_angle;
use procgen::Terrain;

use crate::enemy::{Archetype, Enemy, SHIELD_HP};
use crate::events::SoundCue;
use crate::weapons::WeaponType;

/// Engaged enemies give up beyond this multiple of their aggro range.
pub const DISENGAGE_FACTOR: f32 = 1.5;

pub const HOP_RISE: f32 = 8.0;
pub const HOP_SPEED: f32 = -7.0;

pub const HORNET_HOVER: f32 = 60.0;

pub const SENTINEL_STANDOFF: f32 = 260.0;
pub const SENTINEL_DEAD_ZONE: f32 = 40.0;
pub const SENTINEL_RANGE: f32 = 420.0;
pub const SENTINEL_FIRE_INTERVAL: f32 = 90.0;

pub const DASH_TRIGGER: f32 = 220.0;
pub const DASH_TELEGRAPH: f32 = 30.0;
pub const DASH_TELEGRAPH_JITTER: f32 = 10.0;
pub const DASH_SPEED: f32 = 9.0;
pub const DASH_FRAMES: f32 = 40.0;
pub const DASH_COOLDOWN: f32 = 45.0;

pub const GUARDIAN_HOVER: f32 = 220.0;
pub const GUARDIAN_CYCLE: f32 = 150.0;
pub const GUARDIAN_SUMMONS: usize = 2;
const GUARDIAN_MINIONS: [Archetype; 2] = [Archetype::Crawler, Archetype::Hornet];

pub const SHIELD_UP_FRAMES: f32 = 180.0;
pub const SHIELD_DOWN_FRAMES: f32 = 120.0;

pub const SURFACE_FRAMES: f32 = 300.0;
pub const SPIT_INTERVAL: f32 = 100.0;

pub const FLEE_FRAMES: f32 = 120.0;

/// What an enemy can see this frame.
#[derive(Debug, Clone, Copy)]
pub struct AiView<'a> {
    pub player_center: Vec2,
    pub terrain: &'a Terrain,
    /// Mission clock in frames.
    pub clock: f32,
    pub dt: f32,
}

/// Work the frame loop performs on an enemy's behalf.
#[derive(Debug, Clone, PartialEq)]
pub enum AiEffect {
    Fire {
        origin: Vec2,
        angle: f32,
        weapon: WeaponType,
    },
    Summon { archetype: Archetype, x: f32 },
    AlertMarker { position: Vec2 },
    Sound(SoundCue),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AiDecision {
    pub velocity_delta: Vec2,
    /// The enemy is driving its own horizontal motion; skip ground friction.
    pub steering: bool,
    pub transition: Option<AiState>,
    pub state_timer: Option<f32>,
    pub attack_timer: Option<f32>,
    pub target: Option<Vec2>,
    pub burrowed: Option<bool>,
    pub shield_hp: Option<i32>,
    pub facing: Option<f32>,
    pub effects: Vec<AiEffect>,
}

impl AiDecision {
    fn go(&mut self, state: AiState, timer: Option<f32>) {
        self.transition = Some(state);
        if timer.is_some() {
            self.state_timer = timer;
        }
    }

    fn steer_x(&mut self, enemy: &Enemy, desired: f32, response: f32, dt: f32) {
        self.velocity_delta.x = (desired - enemy.body.velocity.x) * ease(response, dt);
        self.steering = true;
    }

    fn steer(&mut self, enemy: &Enemy, desired: Vec2, response: f32, dt: f32) {
        self.velocity_delta = (desired - enemy.body.velocity) * ease(response, dt);
        self.steering = true;
    }

    fn fire(&mut self, origin: Vec2, target: Vec2, weapon: WeaponType) {
        self.effects.push(AiEffect::Fire {
            origin,
            angle: aim_angle(origin, target),
            weapon,
        });
        self.effects.push(AiEffect::Sound(SoundCue::EnemyShoot));
    }
}

/// Per-frame response scaled to `dt` frames.
fn ease(response: f32, dt: f32) -> f32 {
    1.0 - (1.0 - response.clamp(0.0, 1.0)).powf(dt)
}

fn side(dx: f32, current: f32) -> f32 {
    if dx > 0.5 {
        1.0
    } else if dx < -0.5 {
        -1.0
    } else {
        current
    }
}

fn engaged(state: AiState) -> bool {
    matches!(state, AiState::Chase | AiState::Attack | AiState::Charge)
}

/// Shared idle → alert → chase → disengage cycle. Returns the state to act in.
fn aggro_transition(enemy: &Enemy, dist: f32, d: &mut AiDecision) -> AiState {
    let aggro = enemy.stats().aggro_range;
    match enemy.state {
        AiState::Idle if dist < aggro => {
            d.go(AiState::Alert, Some(enemy.archetype.alert_delay()));
            let top = Vec2::new(enemy.body.center().x, enemy.body.position.y - 12.0);
            d.effects.push(AiEffect::AlertMarker { position: top });
            d.effects.push(AiEffect::Sound(SoundCue::Alert));
            AiState::Alert
        }
        AiState::Alert if enemy.state_timer <= 0.0 => {
            d.go(AiState::Chase, None);
            AiState::Chase
        }
        state if engaged(state) && dist > aggro * DISENGAGE_FACTOR => {
            d.go(AiState::Idle, Some(0.0));
            AiState::Idle
        }
        state => state,
    }
}

/// Decide what `enemy` does this frame.
pub fn think(enemy: &Enemy, view: &AiView, rng: &mut dyn RandomSource) -> AiDecision {
    let mut d = AiDecision::default();
    let center = enemy.body.center();
    let dist = (view.player_center - center).length();
    let state = if enemy.archetype.uses_generic_aggro() {
        aggro_transition(enemy, dist, &mut d)
    } else {
        enemy.state
    };

    match enemy.archetype {
        Archetype::Crawler => crawler(enemy, state, view, &mut d),
        Archetype::Hornet => hornet(enemy, state, view, &mut d),
        Archetype::Sentinel => sentinel(enemy, state, view, dist, &mut d),
        Archetype::Dasher => dasher(enemy, state, view, dist, rng, &mut d),
        Archetype::Guardian => guardian(enemy, view, rng, &mut d),
        Archetype::Shielder => shielder(enemy, state, view, &mut d),
        Archetype::Sandworm => sandworm(enemy, state, view, &mut d),
        Archetype::Spore => {}
        Archetype::Neutral => neutral(enemy, view, rng, &mut d),
    }
    d
}

fn crawler(enemy: &Enemy, state: AiState, view: &AiView, d: &mut AiDecision) {
    let dx = view.player_center.x - enemy.body.center().x;
    match state {
        AiState::Alert => d.facing = Some(side(dx, enemy.body.facing)),
        AiState::Chase => {
            let facing = side(dx, enemy.body.facing);
            d.facing = Some(facing);
            d.steer_x(enemy, facing * enemy.stats().speed, 0.25, view.dt);
            if enemy.body.grounded {
                let ahead = enemy.body.center().x + facing * (enemy.body.size.x * 0.5 + 12.0);
                let rise = enemy.body.bottom() - view.terrain.height_at(ahead);
                if rise > HOP_RISE {
                    d.velocity_delta.y = HOP_SPEED - enemy.body.velocity.y;
                }
            }
        }
        _ => {}
    }
}

fn hornet(enemy: &Enemy, state: AiState, view: &AiView, d: &mut AiDecision) {
    let center = enemy.body.center();
    if engaged(state) {
        let target = view.player_center - Vec2::new(0.0, HORNET_HOVER);
        let desired = (target - center).clamp_length_max(enemy.stats().speed);
        d.target = Some(target);
        d.facing = Some(side(target.x - center.x, enemy.body.facing));
        d.steer(enemy, desired, 0.08, view.dt);
    } else {
        let bob = (view.clock * 0.08 + enemy.anim_offset).sin() * 0.8;
        d.steer(enemy, Vec2::new(0.0, bob), 0.1, view.dt);
    }
}

fn sentinel(enemy: &Enemy, state: AiState, view: &AiView, dist: f32, d: &mut AiDecision) {
    let center = enemy.body.center();
    let dx = view.player_center.x - center.x;
    let facing = side(dx, enemy.body.facing);
    match state {
        AiState::Alert => d.facing = Some(facing),
        AiState::Chase => {
            d.facing = Some(facing);
            if d.transition == Some(AiState::Chase) {
                d.attack_timer = Some(SENTINEL_FIRE_INTERVAL * 0.5);
            }
            let gap = dx.abs();
            let desired = if gap < SENTINEL_STANDOFF - SENTINEL_DEAD_ZONE {
                -facing * enemy.stats().speed
            } else if gap > SENTINEL_STANDOFF + SENTINEL_DEAD_ZONE {
                facing * enemy.stats().speed
            } else {
                0.0
            };
            d.steer_x(enemy, desired, 0.2, view.dt);
            if d.transition.is_none() && enemy.attack_timer <= 0.0 && dist <= SENTINEL_RANGE {
                d.fire(center, view.player_center, WeaponType::SentinelBolt);
                d.attack_timer = Some(SENTINEL_FIRE_INTERVAL);
            }
        }
        _ => {}
    }
}

fn dasher(
    enemy: &Enemy,
    state: AiState,
    view: &AiView,
    dist: f32,
    rng: &mut dyn RandomSource,
    d: &mut AiDecision,
) {
    let center = enemy.body.center();
    let dx = view.player_center.x - center.x;
    match state {
        AiState::Alert => d.facing = Some(side(dx, enemy.body.facing)),
        AiState::Chase => {
            let facing = side(dx, enemy.body.facing);
            d.facing = Some(facing);
            if enemy.attack_timer <= 0.0 && dist < DASH_TRIGGER && enemy.body.grounded {
                let telegraph = DASH_TELEGRAPH + rng.range(0.0, DASH_TELEGRAPH_JITTER);
                d.go(AiState::Charge, Some(telegraph));
                d.target = Some(view.player_center);
                d.steer_x(enemy, 0.0, 0.5, view.dt);
            } else {
                d.steer_x(enemy, facing * enemy.stats().speed, 0.25, view.dt);
            }
        }
        // Telegraph: brace in place, then launch at where the player is now.
        AiState::Charge => {
            let facing = side(dx, enemy.body.facing);
            d.facing = Some(facing);
            if enemy.state_timer <= 0.0 {
                d.go(AiState::Attack, Some(DASH_FRAMES));
                d.target = Some(view.player_center);
                d.steer_x(enemy, facing * DASH_SPEED, 1.0, 1.0);
            } else {
                d.steer_x(enemy, 0.0, 0.5, view.dt);
            }
        }
        // Dash.
        AiState::Attack => {
            let facing = enemy.body.facing;
            let overshot = side(dx, facing) != facing && dx.abs() > 30.0;
            let past_mark = (enemy.target.x - center.x) * facing < -40.0;
            if enemy.state_timer <= 0.0 || overshot || past_mark || dist > DASH_TRIGGER * DISENGAGE_FACTOR {
                d.go(AiState::Chase, Some(0.0));
                d.attack_timer = Some(DASH_COOLDOWN);
                d.steer_x(enemy, 0.0, 0.4, view.dt);
            } else {
                d.steer_x(enemy, facing * DASH_SPEED, 1.0, 1.0);
            }
        }
        _ => {}
    }
}

fn guardian(enemy: &Enemy, view: &AiView, rng: &mut dyn RandomSource, d: &mut AiDecision) {
    let center = enemy.body.center();
    let phase = match enemy.state {
        AiState::Phase1 | AiState::Phase2 => enemy.state,
        _ => {
            d.go(AiState::Phase1, None);
            d.attack_timer = Some(GUARDIAN_CYCLE);
            AiState::Phase1
        }
    };

    let sway = (view.clock * 0.02 + enemy.anim_offset).sin() * 120.0;
    let target = Vec2::new(view.player_center.x + sway, view.player_center.y - GUARDIAN_HOVER);
    let desired = ((target - center) * 0.05).clamp_length_max(enemy.stats().speed);
    d.target = Some(target);
    d.facing = Some(side(view.player_center.x - center.x, enemy.body.facing));
    d.steer(enemy, desired, 0.2, view.dt);

    if d.transition.is_some() || enemy.attack_timer > 0.0 {
        return;
    }
    match phase {
        AiState::Phase1 => {
            d.fire(center, view.player_center, WeaponType::GuardianOrb);
            d.go(AiState::Phase2, None);
        }
        _ => {
            for i in 0..GUARDIAN_SUMMONS {
                let archetype = pick(rng, &GUARDIAN_MINIONS)
                    .copied()
                    .unwrap_or(Archetype::Crawler);
                let offset = if i % 2 == 0 { -90.0 } else { 90.0 };
                d.effects.push(AiEffect::Summon {
                    archetype,
                    x: center.x + offset,
                });
            }
            d.effects.push(AiEffect::Sound(SoundCue::Summon));
            d.go(AiState::Phase1, None);
        }
    }
    d.attack_timer = Some(GUARDIAN_CYCLE);
}

fn shielder(enemy: &Enemy, state: AiState, view: &AiView, d: &mut AiDecision) {
    let dx = view.player_center.x - enemy.body.center().x;
    let facing = side(dx, enemy.body.facing);
    d.facing = Some(facing);
    match state {
        AiState::Chase => {
            if d.transition == Some(AiState::Chase) {
                d.state_timer = Some(SHIELD_DOWN_FRAMES);
            } else if enemy.state_timer <= 0.0 {
                d.go(AiState::Attack, Some(SHIELD_UP_FRAMES));
                d.shield_hp = Some(SHIELD_HP);
                d.steer_x(enemy, 0.0, 0.5, view.dt);
                return;
            }
            d.steer_x(enemy, facing * enemy.stats().speed, 0.2, view.dt);
        }
        // Shield raised: hold ground.
        AiState::Attack => {
            d.steer_x(enemy, 0.0, 0.5, view.dt);
            if enemy.state_timer <= 0.0 || enemy.shield_hp <= 0 {
                d.go(AiState::Chase, Some(SHIELD_DOWN_FRAMES));
            }
        }
        _ => {}
    }
}

fn sandworm(enemy: &Enemy, state: AiState, view: &AiView, d: &mut AiDecision) {
    let center = enemy.body.center();
    let dx = view.player_center.x - center.x;
    let facing = side(dx, enemy.body.facing);
    match state {
        AiState::Idle => {
            if !enemy.burrowed {
                d.effects.push(AiEffect::Sound(SoundCue::Burrow));
            }
            d.burrowed = Some(true);
            d.steer_x(enemy, 0.0, 1.0, view.dt);
        }
        // Burrowed and stationary until it surfaces.
        AiState::Alert => {
            d.burrowed = Some(true);
            d.facing = Some(facing);
            d.steer_x(enemy, 0.0, 1.0, view.dt);
        }
        AiState::Chase => {
            d.facing = Some(facing);
            d.steer_x(enemy, 0.0, 0.5, view.dt);
            if d.transition == Some(AiState::Chase) {
                d.burrowed = Some(false);
                d.state_timer = Some(SURFACE_FRAMES);
                d.attack_timer = Some(SPIT_INTERVAL * 0.5);
                d.effects.push(AiEffect::Sound(SoundCue::Burrow));
            } else if enemy.state_timer <= 0.0 {
                d.go(AiState::Idle, Some(0.0));
                d.burrowed = Some(true);
                d.effects.push(AiEffect::Sound(SoundCue::Burrow));
            } else if enemy.attack_timer <= 0.0 {
                d.fire(center, view.player_center, WeaponType::SandwormSpit);
                d.attack_timer = Some(SPIT_INTERVAL);
            }
        }
        _ => {}
    }
}

fn neutral(enemy: &Enemy, view: &AiView, rng: &mut dyn RandomSource, d: &mut AiDecision) {
    let speed = enemy.stats().speed;
    match enemy.state {
        AiState::Flee => {
            let away = -side(view.player_center.x - enemy.body.center().x, -enemy.body.facing);
            d.facing = Some(away);
            d.steer_x(enemy, away * speed * 2.5, 0.3, view.dt);
            if enemy.state_timer <= 0.0 {
                d.go(AiState::Idle, Some(0.0));
            }
        }
        _ => {
            if enemy.state != AiState::Idle {
                d.go(AiState::Idle, None);
            }
            let mut facing = enemy.body.facing;
            if enemy.state_timer <= 0.0 {
                facing = rng.sign();
                d.facing = Some(facing);
                d.state_timer = Some(rng.range(60.0, 180.0));
            }
            d.steer_x(enemy, facing * speed, 0.2, view.dt);
        }
    }
}

/// Write a decision into the enemy and hand back its effects.
pub fn apply_decision(enemy: &mut Enemy, decision: AiDecision) -> Vec<AiEffect> {
    if decision.velocity_delta.is_finite() {
        enemy.body.velocity += decision.velocity_delta;
    }
    if let Some(state) = decision.transition {
        enemy.state = state;
    }
    if let Some(t) = decision.state_timer {
        enemy.state_timer = t;
    }
    if let Some(t) = decision.attack_timer {
        enemy.attack_timer = t;
    }
    if let Some(target) = decision.target {
        enemy.target = target;
    }
    if let Some(burrowed) = decision.burrowed {
        enemy.burrowed = burrowed;
    }
    if let Some(hp) = decision.shield_hp {
        enemy.shield_hp = hp;
    }
    if let Some(facing) = decision.facing {
        enemy.body.facing = facing;
    }
    decision.effects
}

/// Tick timers, think and apply for one enemy. Returns whether it steered and its effects.
pub fn step_enemy(enemy: &mut Enemy, view: &AiView, rng: &mut dyn RandomSource) -> (bool, Vec<AiEffect>) {
    enemy.tick_timers(view.dt);
    let decision = think(enemy, view, rng);
    let steering = decision.steering;
    (steering, apply_decision(enemy, decision))
}

/// Push overlapping squad-mates apart. Bosses and burrowed enemies are skipped.
/// Uses a bucket grid sized to the radius so only neighbouring cells are compared.
pub fn apply_separation(enemies: &mut [Enemy], radius: f32, force: f32) {
    if radius <= 0.0 {
        return;
    }
    let entries: Vec<(usize, Vec2)> = enemies
        .iter()
        .enumerate()
        .filter(|(_, e)| e.body.is_live() && !e.archetype.is_boss() && !e.burrowed)
        .map(|(i, e)| (i, e.body.center()))
        .collect();
    if entries.len() < 2 {
        return;
    }

    let inv_cell = 1.0 / radius;
    let cell_of = |p: Vec2| ((p.x * inv_cell).floor() as i32, (p.y * inv_cell).floor() as i32);
    let mut grid: HashMap<(i32, i32), Vec<usize>> = HashMap::new();
    for (slot, (_, pos)) in entries.iter().enumerate() {
        grid.entry(cell_of(*pos)).or_default().push(slot);
    }

    let radius_sq = radius * radius;
    let mut pushes = vec![Vec2::ZERO; entries.len()];
    for (slot, (_, pos)) in entries.iter().enumerate() {
        let (cx, cy) = cell_of(*pos);
        let mut push = Vec2::ZERO;
        for gx in cx - 1..=cx + 1 {
            for gy in cy - 1..=cy + 1 {
                let Some(cell) = grid.get(&(gx, gy)) else {
                    continue;
                };
                for &other in cell {
                    if other == slot {
                        continue;
                    }
                    let diff = *pos - entries[other].1;
                    let dist_sq = diff.length_squared();
                    if dist_sq < radius_sq {
                        let dist = dist_sq.sqrt();
                        // Coincident centers split by index so the pair still separates.
                        let dir = diff.try_normalize().unwrap_or(if slot < other { -Vec2::X } else { Vec2::X });
                        push += dir * (1.0 - dist / radius);
                    }
                }
            }
        }
        pushes[slot] = push.clamp_length_max(1.0) * force;
    }

    for (slot, (index, _)) in entries.iter().enumerate() {
        let enemy = &mut enemies[*index];
        if enemy.stats().flying {
            enemy.body.velocity += pushes[slot];
        } else {
            enemy.body.velocity.x += pushes[slot].x;
        }
    }
}
