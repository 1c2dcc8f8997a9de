//! Mission world generation: heightmap, hazard strips, vegetation, decorations and core sites.
//!
//! Segments are walked left to right. Every [`CHUNK_LENGTH`] segments a biome style is
//! drawn from the planet's allowed set and drives the height delta rule for that chunk.
//! Every step is clamped to the style's max delta relative to the previous sample, then
//! into the traversable band. Band clamping only ever moves a value toward the previous
//! sample, so no generated wall is steeper than its style allows.

use std::f32::consts::TAU;

use engine_core::{pick, seeded, Color, RandomSource};
use noise::{NoiseFn, Perlin};

use crate::biome::{BiomeStyle, DEFAULT_BIOMES};
use crate::hazard::{HazardKind, HazardStrip};
use crate::planet::PlanetConfig;
use crate::terrain::Terrain;
use crate::vegetation::{
    Decoration, DecorationKind, Vegetation, DECORATION_KINDS, FOLIAGE_SHAPES, STEM_SHAPES, TITAN_SCALE,
};

/// Segments per biome chunk.
pub const CHUNK_LENGTH: usize = 20;
/// Plateau styles step once per this many segments.
pub const PLATEAU_STEP: usize = 15;
/// Segments at each end kept free of hazards.
pub const EDGE_MARGIN: usize = 15;
pub const HAZARD_CHANCE: f32 = 0.06;
/// How far a hazard segment lifts the ground (canvas y, so subtracted).
pub const HAZARD_RAISE: f32 = 6.0;
pub const CRAG_SPIKE_CHANCE: f32 = 0.03;
pub const COLD_SPIRE_ICE_CHANCE: f32 = 0.25;
pub const TITAN_CHANCE: f32 = 0.04;
pub const DECORATION_CHANCE: f32 = 0.12;
pub const DEFAULT_SEGMENT_WIDTH: f32 = 40.0;

/// Vertical band the surface is kept inside, guaranteeing headroom for jumps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TerrainBand {
    /// Highest surface (smallest y).
    pub min_y: f32,
    /// Lowest surface (largest y).
    pub max_y: f32,
    pub start_y: f32,
}

impl Default for TerrainBand {
    fn default() -> Self {
        Self {
            min_y: 300.0,
            max_y: 600.0,
            start_y: 470.0,
        }
    }
}

/// Everything generated for one mission.
#[derive(Debug, Clone)]
pub struct WorldLayout {
    pub terrain: Terrain,
    /// Style that shaped each segment (parallel to the heightmap).
    pub styles: Vec<BiomeStyle>,
    pub hazards: Vec<HazardStrip>,
    pub decorations: Vec<Decoration>,
    pub vegetation: Vec<Vegetation>,
    /// World x positions where data cores are placed.
    pub core_sites: Vec<f32>,
    pub required_cores: u32,
}

impl WorldLayout {
    pub fn heights(&self) -> &[f32] {
        self.terrain.heights()
    }

    pub fn world_width(&self) -> f32 {
        self.terrain.world_width()
    }

    /// Style of the segment containing `x`.
    pub fn style_at(&self, x: f32) -> BiomeStyle {
        self.styles
            .get(self.terrain.segment_at(x))
            .copied()
            .unwrap_or(BiomeStyle::Rolling)
    }
}

/// Number of cores a mission of this length asks for.
pub fn required_core_count(total_segments: usize) -> u32 {
    (total_segments / 100).clamp(3, 8) as u32
}

/// Generate with a seeded standard generator.
pub fn generate_seeded(
    config: &PlanetConfig,
    total_segments: usize,
    segment_width: f32,
    seed: u64,
) -> WorldLayout {
    let mut rng = seeded(seed);
    generate(config, total_segments, segment_width, &mut rng)
}

/// Generate a mission world from a planet config and an injected random source.
pub fn generate(
    config: &PlanetConfig,
    total_segments: usize,
    segment_width: f32,
    rng: &mut dyn RandomSource,
) -> WorldLayout {
    generate_in_band(config, total_segments, segment_width, TerrainBand::default(), rng)
}

pub fn generate_in_band(
    config: &PlanetConfig,
    total_segments: usize,
    segment_width: f32,
    band: TerrainBand,
    rng: &mut dyn RandomSource,
) -> WorldLayout {
    let config = config.sanitized();
    let n = total_segments.max(1);
    let w = if segment_width.is_finite() && segment_width > 0.0 {
        segment_width
    } else {
        DEFAULT_SEGMENT_WIDTH
    };
    let crag_noise = Perlin::new(rng.next_u32());
    let cold = config.colors.is_cold();

    let mut heights: Vec<f32> = Vec::with_capacity(n);
    let mut styles = Vec::with_capacity(n);
    let mut hazards = Vec::new();
    let mut plant_xs: Vec<f32> = Vec::new();
    let mut decor_xs: Vec<f32> = Vec::new();

    let mut style = DEFAULT_BIOMES[0];
    let mut dune_phase = 0.0_f32;

    for i in 0..n {
        if i % CHUNK_LENGTH == 0 {
            style = pick(rng, &config.allowed_biomes).copied().unwrap_or(style);
            dune_phase = rng.range(0.0, TAU);
        }
        let profile = style.profile();
        let max = profile.max_delta;

        let delta = match style {
            BiomeStyle::Rolling => rng.range(-max, max),
            BiomeStyle::Dunes => (i as f32 * 0.35 + dune_phase).sin() * max * 0.9,
            BiomeStyle::Crags => {
                let jitter = crag_noise.get([i as f64 * 0.45, 7.3]) as f32;
                jitter * max * 1.6
            }
            BiomeStyle::Plateaus => {
                if i % PLATEAU_STEP == 0 {
                    rng.range(-max, max)
                } else {
                    0.0
                }
            }
            BiomeStyle::Spires => {
                let dir = if i % 2 == 0 { -1.0 } else { 1.0 };
                dir * rng.range(0.4, 1.0) * max
            }
        };

        let in_playable = i >= EDGE_MARGIN && i + EDGE_MARGIN < n;
        let mut hazard = None;
        if in_playable && rng.chance(HAZARD_CHANCE) {
            hazard = Some(
                profile
                    .hazard_bias
                    .unwrap_or_else(|| HazardKind::from_palette(&config.colors)),
            );
        }

        let height = match heights.last().copied() {
            None => band.start_y.clamp(band.min_y, band.max_y),
            Some(prev) => {
                let raise = if hazard.is_some() { HAZARD_RAISE } else { 0.0 };
                let target = prev + delta - raise;
                target
                    .clamp(prev - max, prev + max)
                    .clamp(band.min_y, band.max_y)
            }
        };
        heights.push(height);
        styles.push(style);

        if hazard.is_none() && in_playable {
            if style == BiomeStyle::Crags && rng.chance(CRAG_SPIKE_CHANCE) {
                hazard = Some(HazardKind::Spikes);
            } else if style == BiomeStyle::Spires && cold && rng.chance(COLD_SPIRE_ICE_CHANCE) {
                hazard = Some(HazardKind::Ice);
            }
        }

        if let Some(kind) = hazard {
            hazards.push(HazardStrip::new(i as f32 * w, w, kind));
            continue;
        }

        let density = profile.vegetation_density * config.vegetation_density;
        if rng.chance(density) {
            plant_xs.push(i as f32 * w + rng.range(0.15, 0.85) * w);
        }
        if rng.chance(DECORATION_CHANCE) {
            decor_xs.push(i as f32 * w + rng.range(0.1, 0.9) * w);
        }
    }

    let terrain = Terrain::new(heights, w);

    let vegetation: Vec<Vegetation> = plant_xs
        .into_iter()
        .map(|x| grow_plant(x, terrain.height_at(x), &config, rng))
        .collect();

    let decorations = decor_xs
        .into_iter()
        .map(|x| place_decoration(x, terrain.height_at(x), &config, rng))
        .collect();

    let required_cores = required_core_count(n);
    let core_sites = place_core_sites(n, w, required_cores, rng);

    log::debug!(
        "Generated {} segments: {} hazards, {} plants, {} cores",
        n,
        hazards.len(),
        vegetation.len(),
        required_cores
    );

    WorldLayout {
        terrain,
        styles,
        hazards,
        decorations,
        vegetation,
        core_sites,
        required_cores,
    }
}

fn jitter_color(base: Color, amount: f32, rng: &mut dyn RandomSource) -> Color {
    base.map(|c| (c + rng.range(-amount, amount)).clamp(0.0, 1.0))
}

fn grow_plant(x: f32, base_y: f32, config: &PlanetConfig, rng: &mut dyn RandomSource) -> Vegetation {
    let titan = rng.chance(TITAN_CHANCE);
    let scale = if titan { TITAN_SCALE } else { 1.0 };
    let stem = pick(rng, &STEM_SHAPES).copied().unwrap_or(STEM_SHAPES[0]);
    let foliage = pick(rng, &FOLIAGE_SHAPES).copied().unwrap_or(FOLIAGE_SHAPES[0]);
    let foliage_color = jitter_color(config.colors.foliage, 0.08, rng);
    Vegetation {
        x,
        base_y,
        height: rng.range(24.0, 70.0) * scale,
        width: rng.range(8.0, 18.0) * scale,
        stem,
        foliage,
        stem_color: foliage_color.map(|c| c * 0.6),
        foliage_color,
        sway_speed: rng.range(0.02, 0.06),
        sway_amount: rng.range(0.03, 0.12),
        sway_phase: rng.range(0.0, TAU),
        titan,
        bend: 0.0,
        bend_velocity: 0.0,
    }
}

fn place_decoration(x: f32, y: f32, config: &PlanetConfig, rng: &mut dyn RandomSource) -> Decoration {
    let kind = pick(rng, &DECORATION_KINDS)
        .copied()
        .unwrap_or(DECORATION_KINDS[0]);
    let base = match kind {
        DecorationKind::Crystal => config.colors.accent,
        _ => config.colors.ground,
    };
    Decoration {
        x,
        y,
        kind,
        scale: rng.range(0.6, 1.6),
        color: jitter_color(base, 0.06, rng),
    }
}

fn place_core_sites(n: usize, w: f32, count: u32, rng: &mut dyn RandomSource) -> Vec<f32> {
    let start = EDGE_MARGIN.min(n / 2) as f32 * w;
    let end = (n.saturating_sub(EDGE_MARGIN)).max(n / 2 + 1) as f32 * w;
    let span = (end - start).max(w);
    let spacing = span / count.max(1) as f32;
    (0..count)
        .map(|k| start + (k as f32 + 0.5) * spacing + rng.range(-0.25, 0.25) * spacing)
        .collect()
}
