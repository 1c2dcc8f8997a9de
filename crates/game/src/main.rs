//! Driftfall headless runner.
//!
//! Plays one mission with a scripted pilot and logs what happens:
//!
//! ```text
//! driftfall [mission.ron]
//! ```
//!
//! Without a mission file a random seed on the default planet is used.

use anyhow::{Context, Result};
use engine_core::Vec2;
use game::{GameEvent, InputSnapshot, MissionFile, SimTuning, Simulation};
use physics::aim_angle;

/// Frames between status lines.
const STATUS_INTERVAL: u64 = 600;

/// Run right, hop every 45 frames, burn the jetpack in short bursts and shoot
/// at whatever is closest.
fn scripted_input(sim: &Simulation, frame: u64) -> InputSnapshot {
    let world = sim.world();
    let me = world.player().body.center();
    let target = world
        .store
        .live_enemies()
        .filter(|e| !e.burrowed)
        .map(|e| e.body.center())
        .min_by(|a, b| a.distance_squared(me).total_cmp(&b.distance_squared(me)));
    let aim = target
        .filter(|t| t.distance(me) < world.camera.view.x * 0.6)
        .map(|t| aim_angle(me, t))
        .unwrap_or(0.0);

    InputSnapshot {
        move_axis: 1.0,
        aim_angle: aim,
        jump: frame % 45 < 4,
        fire: target.is_some(),
        jetpack: frame % 240 >= 200,
    }
}

fn log_event(event: &GameEvent) {
    match event {
        GameEvent::CoreCollected { collected, required } => {
            log::info!("Data core {}/{}", collected, required)
        }
        GameEvent::BossSpawned => log::info!("The Guardian has appeared"),
        GameEvent::EnemyKilled { archetype, elite, position } => log::debug!(
            "Killed {}{} at ({:.0}, {:.0})",
            if *elite { "elite " } else { "" },
            archetype.name(),
            position.x,
            position.y
        ),
        GameEvent::WeatherChanged { kind, phase } => {
            log::debug!("Weather: {} {:?}", kind.name(), phase)
        }
        GameEvent::GameOver(summary) => log::info!(
            "GAME OVER: {} | score {} | cores {} | salvage {}",
            summary.reason,
            summary.score,
            summary.cores_collected,
            summary.salvage
        ),
        GameEvent::Victory(summary) => log::info!(
            "VICTORY | score {} | cores {} | bonus {}",
            summary.score,
            summary.cores_collected,
            summary.bonus
        ),
        GameEvent::Sound(_) | GameEvent::AlertMarker { .. } => {}
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mission = match std::env::args().nth(1) {
        Some(path) => MissionFile::load(&path)
            .with_context(|| format!("failed to load mission file {}", path))?,
        None => MissionFile {
            seed: rand::random(),
            ..MissionFile::default()
        },
    };
    let tuning = SimTuning::load();
    log::info!(
        "Driftfall: seed {:#x}, {} frames, gravity {:.2}",
        mission.seed,
        mission.frames,
        mission.planet.gravity
    );

    let mut sim = Simulation::new(mission.planet, mission.upgrades, tuning, mission.seed);
    for message in sim.drain_messages() {
        log::info!("> {}", message.text);
    }

    for frame in 0..mission.frames as u64 {
        let input = scripted_input(&sim, frame);
        sim.set_input(input);
        sim.update(1.0);

        for event in sim.drain_events() {
            log_event(&event);
        }
        for message in sim.drain_messages() {
            log::info!("> {}", message.text);
        }
        if frame % STATUS_INTERVAL == 0 {
            let hud = sim.hud();
            let weather = sim.weather();
            let at: Vec2 = sim.world().player().body.center();
            log::info!(
                "[{:>6}] x={:.0} hp {}/{} fuel {:.0} score {} | {} | {} {:.0}%",
                frame,
                at.x,
                hud.health,
                hud.max_health,
                hud.fuel,
                hud.score,
                hud.objective,
                weather.kind.name(),
                weather.intensity * 100.0
            );
        }
        if sim.is_over() {
            break;
        }
    }

    let hud = sim.hud();
    let outcome = match sim.progress().outcome {
        Some(outcome) => format!("{:?}", outcome),
        None => "Unresolved".to_string(),
    };
    println!("╔════════════════════════════════════════╗");
    println!("║ Driftfall mission report               ║");
    println!("╠════════════════════════════════════════╣");
    println!("║ outcome : {:<28} ║", outcome);
    println!("║ frames  : {:<28} ║", sim.ticks());
    println!("║ score   : {:<28} ║", hud.score);
    println!("║ cores   : {:<28} ║", format!("{}/{}", hud.cores_collected, hud.cores_required));
    println!("║ kills   : {:<28} ║", sim.progress().kills);
    println!("╚════════════════════════════════════════╝");

    Ok(())
}
