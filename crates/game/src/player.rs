//! Player controller: run, jump, jetpack, hazards and firing.

use engine_core::RandomSource;
use physics::{clamp_to_world, find_hazard, integrate_body, Faction, MotionParams};
use procgen::{HazardStrip, Terrain};
use serde::{Deserialize, Serialize};

use crate::config::SimTuning;
use crate::entities::{DamageSource, Player, Projectile, BASE_PLAYER_FUEL, BASE_PLAYER_HEALTH};
use crate::events::{EventQueue, SoundCue};
use crate::input::InputSnapshot;
use crate::weapons::fire_weapon;

pub const MAX_UPGRADE_LEVEL: u8 = 10;

pub const RUN_ACCEL: f32 = 0.6;
pub const RUN_SPEED: f32 = 5.0;
pub const JUMP_SPEED: f32 = -10.0;
pub const COYOTE_FRAMES: f32 = 6.0;
pub const JETPACK_THRUST: f32 = 0.9;
pub const JETPACK_MAX_RISE: f32 = -8.0;
pub const JETPACK_BURN: f32 = 1.0;
pub const REFUEL_RATE: f32 = 0.5;
/// Where the player drops in, px from the left edge.
pub const SPAWN_X: f32 = 60.0;

/// Persistent upgrade levels bought between missions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerUpgrades {
    #[serde(default)]
    pub hull: u8,
    #[serde(default)]
    pub weapon: u8,
    #[serde(default)]
    pub thrusters: u8,
    #[serde(default)]
    pub speed: u8,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UpgradeMultipliers {
    pub health: f32,
    pub damage: f32,
    pub fuel: f32,
    pub speed: f32,
}

impl Default for UpgradeMultipliers {
    fn default() -> Self {
        PlayerUpgrades::default().multipliers()
    }
}

impl PlayerUpgrades {
    pub fn clamped(&self) -> Self {
        Self {
            hull: self.hull.min(MAX_UPGRADE_LEVEL),
            weapon: self.weapon.min(MAX_UPGRADE_LEVEL),
            thrusters: self.thrusters.min(MAX_UPGRADE_LEVEL),
            speed: self.speed.min(MAX_UPGRADE_LEVEL),
        }
    }

    pub fn multipliers(&self) -> UpgradeMultipliers {
        let lvl = self.clamped();
        UpgradeMultipliers {
            health: 1.0 + 0.2 * lvl.hull as f32,
            damage: 1.0 + 0.15 * lvl.weapon as f32,
            fuel: 1.0 + 0.25 * lvl.thrusters as f32,
            speed: 1.0 + 0.1 * lvl.speed as f32,
        }
    }
}

/// Fresh player standing at the left edge of the map.
pub fn spawn_player(terrain: &Terrain, upgrades: &UpgradeMultipliers, tuning: &SimTuning) -> Player {
    Player::new(
        SPAWN_X,
        terrain.height_at(SPAWN_X),
        (BASE_PLAYER_HEALTH * upgrades.health).round() as i32,
        BASE_PLAYER_FUEL * upgrades.fuel,
        tuning.invulnerability_frames,
    )
}

/// Static surroundings the controller reads.
#[derive(Debug, Clone, Copy)]
pub struct PlayerEnv<'a> {
    pub terrain: &'a Terrain,
    pub hazards: &'a [HazardStrip],
    pub gravity: f32,
    pub clock: f32,
}

/// Advance the player one step.
#[allow(clippy::too_many_arguments)]
pub fn update_player(
    player: &mut Player,
    input: &InputSnapshot,
    upgrades: &UpgradeMultipliers,
    env: &PlayerEnv,
    projectiles: &mut Vec<Projectile>,
    events: &mut EventQueue,
    rng: &mut dyn RandomSource,
    dt: f32,
) {
    player.tick_timers(dt);
    if player.health.is_dead() {
        return;
    }

    // Run
    let moving = input.moving();
    if moving {
        let max_speed = RUN_SPEED * upgrades.speed;
        player.body.velocity.x =
            (player.body.velocity.x + RUN_ACCEL * input.move_axis * dt).clamp(-max_speed, max_speed);
    }
    player.body.facing = if input.aim_angle.cos() < 0.0 { -1.0 } else { 1.0 };

    // Jump
    if input.jump {
        if !player.jump_latched && (player.body.grounded || player.coyote > 0.0) {
            player.body.velocity.y = JUMP_SPEED;
            player.body.grounded = false;
            player.coyote = 0.0;
            player.jump_latched = true;
            events.sound(SoundCue::Jump);
        }
    } else {
        player.jump_latched = false;
    }

    // Jetpack
    player.jetpacking = input.jetpack && player.fuel > 0.0;
    if player.jetpacking {
        player.body.velocity.y = (player.body.velocity.y - JETPACK_THRUST * dt).max(JETPACK_MAX_RISE);
        player.fuel = (player.fuel - JETPACK_BURN * dt).max(0.0);
    } else if player.body.grounded && !input.jetpack {
        player.fuel = (player.fuel + REFUEL_RATE * dt).min(player.max_fuel);
    }

    // Hazards
    let effect = find_hazard(env.hazards, &player.body, env.terrain, env.clock);
    if let Some(effect) = &effect {
        player.body.velocity.x *= effect.drag.powf(dt);
        player.body.velocity.y -= effect.lift * dt;
    }
    if player.hazard_ticker.tick(effect.as_ref(), dt) {
        if let Some(effect) = &effect {
            if let Some(launch) = effect.launch {
                player.body.velocity.y = launch;
                player.body.grounded = false;
            }
            if player.hurt(effect.damage, DamageSource::Hazard(effect.kind)) {
                events.sound(SoundCue::Hurt);
            }
        }
    }

    let on_ice = effect.map(|e| e.icy).unwrap_or(false);
    let params = MotionParams::walker(env.gravity).driven(moving).on_ice(on_ice);
    integrate_body(&mut player.body, params, env.terrain, dt);
    if player.body.grounded {
        player.coyote = COYOTE_FRAMES;
    }
    clamp_to_world(&mut player.body, env.terrain.world_width());

    // Fire
    if input.fire && player.fire_cooldown <= 0.0 {
        let recoil = fire_weapon(
            projectiles,
            player.body.center(),
            input.aim_angle,
            player.weapon,
            Faction::Player,
            rng,
        );
        player.body.velocity += recoil;
        player.fire_cooldown = player.weapon.profile().cooldown;
        events.sound(SoundCue::Shoot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::GameEvent;
    use engine_core::SequenceRng;
    use procgen::HazardKind;

    struct Rig {
        terrain: Terrain,
        hazards: Vec<HazardStrip>,
        player: Player,
        shots: Vec<Projectile>,
        events: EventQueue,
        rng: SequenceRng,
    }

    impl Rig {
        fn new() -> Self {
            let terrain = Terrain::flat(200, 40.0, 400.0);
            let player = Player::new(400.0, 400.0, 100, 100.0, 60.0);
            Self {
                terrain,
                hazards: Vec::new(),
                player,
                shots: Vec::new(),
                events: EventQueue::default(),
                rng: SequenceRng::constant(0.5),
            }
        }

        fn step(&mut self, input: InputSnapshot, frames: usize) {
            let env = PlayerEnv {
                terrain: &self.terrain,
                hazards: &self.hazards,
                gravity: 1.0,
                clock: 0.0,
            };
            for _ in 0..frames {
                update_player(
                    &mut self.player,
                    &input,
                    &UpgradeMultipliers::default(),
                    &env,
                    &mut self.shots,
                    &mut self.events,
                    &mut self.rng,
                    1.0,
                );
            }
        }
    }

    #[test]
    fn upgrade_levels_clamp_to_ten() {
        let up = PlayerUpgrades {
            hull: 50,
            weapon: 2,
            thrusters: 4,
            speed: 10,
        };
        let m = up.multipliers();
        assert!((m.health - 3.0).abs() < 1e-5);
        assert!((m.damage - 1.3).abs() < 1e-5);
        assert!((m.fuel - 2.0).abs() < 1e-5);
        assert!((m.speed - 2.0).abs() < 1e-5);
    }

    #[test]
    fn running_accelerates_up_to_the_cap() {
        let mut rig = Rig::new();
        let run = InputSnapshot {
            move_axis: 1.0,
            ..Default::default()
        };
        rig.step(run, 3);
        assert!(rig.player.body.velocity.x > 1.0);
        rig.step(run, 60);
        assert!(rig.player.body.velocity.x <= RUN_SPEED + 1e-4);
        assert!(rig.player.body.position.x > 400.0);
    }

    #[test]
    fn held_jump_fires_once() {
        let mut rig = Rig::new();
        rig.step(InputSnapshot::default(), 1);
        let jump = InputSnapshot {
            jump: true,
            ..Default::default()
        };
        rig.step(jump, 1);
        assert!(rig.player.body.velocity.y < 0.0);
        rig.step(jump, 60);
        assert!(rig.player.body.grounded);
        let jumps = rig
            .events
            .iter()
            .filter(|e| **e == GameEvent::Sound(SoundCue::Jump))
            .count();
        assert_eq!(jumps, 1);
    }

    #[test]
    fn coyote_time_allows_late_jump() {
        let mut rig = Rig::new();
        rig.step(InputSnapshot::default(), 1);
        rig.player.body.grounded = false;
        rig.player.body.position.y -= 30.0;
        rig.player.coyote = 3.0;
        rig.step(
            InputSnapshot {
                jump: true,
                ..Default::default()
            },
            1,
        );
        assert!(rig.player.body.velocity.y < -9.0);
    }

    #[test]
    fn jetpack_burns_fuel_and_ground_refuels() {
        let mut rig = Rig::new();
        let thrust = InputSnapshot {
            jetpack: true,
            ..Default::default()
        };
        rig.step(thrust, 20);
        assert!((rig.player.fuel - 80.0).abs() < 1e-3);
        assert!(rig.player.body.bottom() < 400.0);
        rig.step(InputSnapshot::default(), 200);
        assert!(rig.player.body.grounded);
        assert!(rig.player.fuel > 80.0);
    }

    #[test]
    fn empty_tank_gives_no_thrust() {
        let mut rig = Rig::new();
        rig.player.fuel = 0.0;
        rig.step(
            InputSnapshot {
                jetpack: true,
                ..Default::default()
            },
            5,
        );
        assert!(rig.player.body.grounded);
        assert!(!rig.player.jetpacking);
    }

    #[test]
    fn lava_burns_on_entry_then_on_interval() {
        let mut rig = Rig::new();
        rig.hazards.push(HazardStrip::new(300.0, 200.0, HazardKind::Lava));
        rig.player.invulnerability_frames = 0.0;
        rig.step(InputSnapshot::default(), 1);
        assert_eq!(rig.player.health.current, 90);
        assert_eq!(rig.player.last_damage, Some(DamageSource::Hazard(HazardKind::Lava)));
        rig.step(InputSnapshot::default(), 19);
        assert_eq!(rig.player.health.current, 90);
        rig.step(InputSnapshot::default(), 1);
        assert_eq!(rig.player.health.current, 80);
    }

    #[test]
    fn firing_respects_cooldown() {
        let mut rig = Rig::new();
        let fire = InputSnapshot {
            fire: true,
            ..Default::default()
        };
        rig.step(fire, 10);
        assert_eq!(rig.shots.len(), 1);
        rig.step(fire, 1);
        assert_eq!(rig.shots.len(), 2);
        assert_eq!(rig.shots[0].faction, Faction::Player);
    }
}
