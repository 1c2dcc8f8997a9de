//! Dropped loot: falling, expiring and being picked up.

use physics::{bodies_overlap, integrate_body, MotionParams};
use procgen::Terrain;

use crate::effects::spawn_text;
use crate::entities::{EntityStore, Loot, LootKind};
use crate::events::{EventQueue, GameEvent, MessageLog, SoundCue};
use crate::state::MissionProgress;

pub const CORE_SCORE_PER_TIER: u64 = 250;
pub const HEALTH_PICKUP: i32 = 30;

/// Let loot settle on the ground and expire.
pub fn update_loot(loot: &mut [Loot], terrain: &Terrain, gravity: f32, dt: f32) {
    for item in loot.iter_mut().filter(|l| l.body.is_live()) {
        integrate_body(&mut item.body, MotionParams::walker(gravity), terrain, dt);
        if let Some(life) = item.lifetime.as_mut() {
            if life.update(dt) {
                item.body.mark();
            }
        }
    }
}

/// Hand every touched item to the player. Returns true when this call completed
/// the core requirement.
pub fn collect_loot(
    store: &mut EntityStore,
    progress: &mut MissionProgress,
    events: &mut EventQueue,
    messages: &mut MessageLog,
) -> bool {
    let already_complete = progress.cores_complete();
    let player = &mut store.player;
    if player.health.is_dead() {
        return false;
    }

    for item in store.loot.iter_mut() {
        if !item.body.is_live() || !bodies_overlap(&player.body, &item.body) {
            continue;
        }
        item.body.mark();
        let above = item.body.center() - glam::Vec2::new(0.0, 16.0);
        match item.kind {
            LootKind::Core { tier } => {
                progress.cores_collected += 1;
                progress.score += CORE_SCORE_PER_TIER * tier as u64;
                events.sound(SoundCue::CorePickup);
                events.push(GameEvent::CoreCollected {
                    collected: progress.cores_collected,
                    required: progress.cores_required,
                });
                spawn_text(&mut store.texts, above, "DATA CORE", [0.4, 1.0, 0.9]);
                if progress.cores_collected == 1 {
                    messages.success(format!(
                        "Data core recovered. {} more to find.",
                        progress.cores_required.saturating_sub(1)
                    ));
                } else if progress.cores_collected == progress.half_way() {
                    messages.info("Halfway there. Something large is stirring.");
                }
            }
            LootKind::Weapon(weapon) => {
                player.weapon = weapon;
                player.fire_cooldown = 0.0;
                events.sound(SoundCue::Pickup);
                spawn_text(&mut store.texts, above, weapon.profile().name, [1.0, 0.8, 0.3]);
                messages.info(format!("Picked up {}", weapon.profile().name));
            }
            LootKind::Health => {
                player.health.heal(HEALTH_PICKUP);
                events.sound(SoundCue::Pickup);
                spawn_text(&mut store.texts, above, format!("+{}", HEALTH_PICKUP), [0.4, 1.0, 0.4]);
            }
        }
    }

    !already_complete && progress.cores_complete()
}
