//! Driftfall - side-scrolling planetary salvage missions.
//!
//! The simulation core: player controller, enemy archetypes and their AI,
//! weapons and combat, loot, weather and day-night, vegetation bend, and the
//! [`Simulation`] frame loop that ties them together. Rendering, audio and
//! device input live outside; the shell feeds an [`InputSnapshot`] each frame
//! and drains events and snapshots.

pub mod camera;
pub mod combat;
pub mod config;
pub mod director;
pub mod effects;
pub mod enemy;
pub mod enemy_ai;
pub mod entities;
pub mod events;
pub mod flora;
pub mod input;
pub mod loot;
pub mod player;
pub mod spawner;
pub mod state;
pub mod weapons;
pub mod weather;

pub use config::{ConfigError, MissionFile, SimTuning};
pub use director::Simulation;
pub use enemy::{Archetype, Enemy, Rarity};
pub use events::{BossStatus, GameEvent, GameOverSummary, HudSnapshot, SoundCue, VictorySummary};
pub use input::InputSnapshot;
pub use player::{PlayerUpgrades, UpgradeMultipliers};
pub use state::{MissionOutcome, MissionProgress, WorldState};
pub use weapons::WeaponType;
pub use weather::{WeatherPhase, WeatherSnapshot};
