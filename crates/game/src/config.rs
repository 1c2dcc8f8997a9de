//! Simulation tuning and mission descriptions. Loaded from RON files.

use std::path::{Path, PathBuf};

use procgen::PlanetConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::player::PlayerUpgrades;

/// File name searched in the working directory for tuning overrides.
pub const TUNING_FILE: &str = "driftfall.ron";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid RON in {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
}

fn read_ron<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, ConfigError> {
    let data = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    ron::from_str(&data).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Frame-loop and feel constants. Every field has a default so partial files work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimTuning {
    /// Largest `dt` (in nominal frames) a single update may simulate.
    #[serde(default = "default_max_dt")]
    pub max_dt_scale: f32,
    /// Frames of player invulnerability after any damage.
    #[serde(default = "default_invulnerability")]
    pub invulnerability_frames: f32,
    /// Frames the world freezes after a kill.
    #[serde(default = "default_hit_stop")]
    pub kill_hit_stop: f32,
    #[serde(default = "default_stiffness")]
    pub spring_stiffness: f32,
    #[serde(default = "default_damping")]
    pub spring_damping: f32,
    /// Randomized distance range (px) between squad triggers at density 0.5.
    #[serde(default = "default_gap_min")]
    pub squad_gap_min: f32,
    #[serde(default = "default_gap_max")]
    pub squad_gap_max: f32,
    #[serde(default = "default_view_width")]
    pub view_width: f32,
    #[serde(default = "default_view_height")]
    pub view_height: f32,
    #[serde(default = "default_separation_radius")]
    pub separation_radius: f32,
    #[serde(default = "default_separation_force")]
    pub separation_force: f32,
    /// Frames before non-core loot disappears.
    #[serde(default = "default_loot_lifetime")]
    pub loot_lifetime: f32,
    /// Enemies further than this many view widths behind the camera are culled.
    #[serde(default = "default_cull_views")]
    pub cull_distance_views: f32,
    /// Terrain length of a generated mission.
    #[serde(default = "default_segments")]
    pub mission_segments: usize,
    #[serde(default = "default_segment_width")]
    pub segment_width: f32,
}

fn default_max_dt() -> f32 {
    engine_core::MAX_DT_SCALE
}
fn default_invulnerability() -> f32 {
    60.0
}
fn default_hit_stop() -> f32 {
    3.0
}
fn default_stiffness() -> f32 {
    0.08
}
fn default_damping() -> f32 {
    0.15
}
fn default_gap_min() -> f32 {
    700.0
}
fn default_gap_max() -> f32 {
    1200.0
}
fn default_view_width() -> f32 {
    960.0
}
fn default_view_height() -> f32 {
    540.0
}
fn default_separation_radius() -> f32 {
    28.0
}
fn default_separation_force() -> f32 {
    0.6
}
fn default_loot_lifetime() -> f32 {
    900.0
}
fn default_cull_views() -> f32 {
    2.0
}
fn default_segments() -> usize {
    600
}
fn default_segment_width() -> f32 {
    40.0
}

impl Default for SimTuning {
    fn default() -> Self {
        Self {
            max_dt_scale: default_max_dt(),
            invulnerability_frames: default_invulnerability(),
            kill_hit_stop: default_hit_stop(),
            spring_stiffness: default_stiffness(),
            spring_damping: default_damping(),
            squad_gap_min: default_gap_min(),
            squad_gap_max: default_gap_max(),
            view_width: default_view_width(),
            view_height: default_view_height(),
            separation_radius: default_separation_radius(),
            separation_force: default_separation_force(),
            loot_lifetime: default_loot_lifetime(),
            cull_distance_views: default_cull_views(),
            mission_segments: default_segments(),
            segment_width: default_segment_width(),
        }
    }
}

impl SimTuning {
    /// Load tuning from `driftfall.ron`. If the file is missing or invalid, returns defaults.
    pub fn load() -> Self {
        let path = tuning_path();
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(t) => t,
            Err(e) => {
                log::warn!("{}, using default tuning", e);
                Self::default()
            }
        }
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        read_ron(path.as_ref())
    }

    pub fn spring(&self) -> procgen::SpringParams {
        procgen::SpringParams {
            stiffness: self.spring_stiffness,
            damping: self.spring_damping,
        }
    }
}

fn tuning_path() -> PathBuf {
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(TUNING_FILE)
}

/// A mission handed to the headless runner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionFile {
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Frames to simulate before giving up.
    #[serde(default = "default_frames")]
    pub frames: u32,
    #[serde(default)]
    pub planet: PlanetConfig,
    #[serde(default)]
    pub upgrades: PlayerUpgrades,
}

fn default_seed() -> u64 {
    0x5eed
}
fn default_frames() -> u32 {
    36_000
}

impl Default for MissionFile {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            frames: default_frames(),
            planet: PlanetConfig::default(),
            upgrades: PlayerUpgrades::default(),
        }
    }
}

impl MissionFile {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        read_ron(path.as_ref())
    }
}
