//! Mission state: the static world, its entities and the progress record.

use glam::Vec2;
use procgen::{BiomeStyle, Decoration, HazardStrip, Terrain, Vegetation, WorldLayout};

use crate::camera::Camera;
use crate::entities::{EntityStore, Player};

// ── World ───────────────────────────────────────────────────────────────────

/// Everything the frame loop mutates except weather and progress. Systems take
/// disjoint field borrows of this struct.
#[derive(Debug, Clone)]
pub struct WorldState {
    pub terrain: Terrain,
    pub styles: Vec<BiomeStyle>,
    pub hazards: Vec<HazardStrip>,
    pub decorations: Vec<Decoration>,
    pub vegetation: Vec<Vegetation>,
    pub store: EntityStore,
    pub camera: Camera,
}

impl WorldState {
    pub fn new(layout: WorldLayout, player: Player, view: Vec2) -> Self {
        let camera = Camera::focused_on(&player.body, view, layout.terrain.world_width());
        Self {
            terrain: layout.terrain,
            styles: layout.styles,
            hazards: layout.hazards,
            decorations: layout.decorations,
            vegetation: layout.vegetation,
            store: EntityStore::new(player),
            camera,
        }
    }

    pub fn world_width(&self) -> f32 {
        self.terrain.world_width()
    }

    pub fn ground_at(&self, x: f32) -> f32 {
        self.terrain.height_at(x)
    }

    pub fn style_at(&self, x: f32) -> BiomeStyle {
        self.styles
            .get(self.terrain.segment_at(x))
            .copied()
            .unwrap_or(BiomeStyle::Rolling)
    }

    pub fn player(&self) -> &Player {
        &self.store.player
    }
}

// ── Progress ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissionOutcome {
    Defeat,
    Victory,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MissionProgress {
    pub score: u64,
    pub cores_collected: u32,
    pub cores_required: u32,
    pub boss_spawned: bool,
    pub boss_defeated: bool,
    pub kills: u32,
    /// Frames the world stays frozen after a kill.
    pub hit_stop: f32,
    pub outcome: Option<MissionOutcome>,
}

impl MissionProgress {
    pub fn new(cores_required: u32) -> Self {
        Self {
            score: 0,
            cores_collected: 0,
            cores_required,
            boss_spawned: false,
            boss_defeated: false,
            kills: 0,
            hit_stop: 0.0,
            outcome: None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.outcome.is_some()
    }

    /// Core count that triggers the half-way message.
    pub fn half_way(&self) -> u32 {
        self.cores_required.div_ceil(2)
    }

    pub fn cores_complete(&self) -> bool {
        self.cores_collected >= self.cores_required
    }

    /// HUD objective line for the current stage.
    pub fn objective(&self) -> String {
        if self.boss_defeated {
            "Guardian destroyed. Extraction inbound.".to_string()
        } else if self.boss_spawned {
            "Destroy the Guardian".to_string()
        } else {
            format!(
                "Recover data cores ({}/{})",
                self.cores_collected, self.cores_required
            )
        }
    }
}
