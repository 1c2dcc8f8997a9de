//! Weather cycle and day-night clock.
//!
//! Weather walks clear → buildup → active → fading → clear, holding each phase for
//! a randomized number of frames. Intensity ramps toward the phase's direction and
//! drives ambient particles, the overlay and wind.

use engine_core::{pick, Color, Lifetime, RandomSource};
use glam::Vec2;
use procgen::{PlanetConfig, WeatherKind};

use crate::camera::Camera;
use crate::effects::MAX_PARTICLES;
use crate::entities::Particle;

/// Intensity change per frame.
pub const INTENSITY_RATE: f32 = 1.0 / 300.0;
/// Frames in a full day.
pub const DAY_LENGTH: f32 = 7200.0;
pub const START_TIME_OF_DAY: f32 = 0.3;
/// Below this intensity no ambient particles spawn.
pub const AMBIENT_THRESHOLD: f32 = 0.05;
/// Spawn interval at full intensity, frames.
pub const AMBIENT_INTERVAL: f32 = 2.0;
/// Darkness at midnight.
pub const MAX_DARKNESS: f32 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WeatherPhase {
    #[default]
    Clear,
    Buildup,
    Active,
    Fading,
}

impl WeatherPhase {
    /// Randomized hold range in frames.
    pub fn duration_range(self) -> (f32, f32) {
        match self {
            WeatherPhase::Clear => (600.0, 1500.0),
            WeatherPhase::Buildup => (240.0, 420.0),
            WeatherPhase::Active => (600.0, 1200.0),
            WeatherPhase::Fading => (240.0, 420.0),
        }
    }

    fn roll(self, rng: &mut dyn RandomSource) -> f32 {
        let (min, max) = self.duration_range();
        rng.range(min, max)
    }

    /// Intensity rises in these phases and falls otherwise.
    pub fn intensifying(self) -> bool {
        matches!(self, WeatherPhase::Buildup | WeatherPhase::Active)
    }
}

/// What the render layer needs to draw the sky.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeatherSnapshot {
    pub kind: WeatherKind,
    pub phase: WeatherPhase,
    pub intensity: f32,
    pub time_of_day: f32,
    pub darkness: f32,
    pub overlay: f32,
    pub wind: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeatherState {
    pub phase: WeatherPhase,
    pub kind: WeatherKind,
    pub intensity: f32,
    pub phase_timer: f32,
    /// `[0, 1)`; 0 is midnight, 0.5 noon.
    pub time_of_day: f32,
    pub particle_accumulator: f32,
    /// Signed horizontal wind, px/frame.
    pub wind: f32,
    wind_dir: f32,
}

impl WeatherState {
    pub fn new(rng: &mut dyn RandomSource) -> Self {
        Self {
            phase: WeatherPhase::Clear,
            kind: WeatherKind::Clear,
            intensity: 0.0,
            phase_timer: WeatherPhase::Clear.roll(rng),
            time_of_day: START_TIME_OF_DAY,
            particle_accumulator: 0.0,
            wind: 0.0,
            wind_dir: 1.0,
        }
    }

    /// Advance by `dt` frames. Returns the new phase when one began this step.
    pub fn update(&mut self, planet: &PlanetConfig, dt: f32, rng: &mut dyn RandomSource) -> Option<WeatherPhase> {
        if !dt.is_finite() || dt <= 0.0 {
            return None;
        }
        self.time_of_day = (self.time_of_day + dt / DAY_LENGTH).rem_euclid(1.0);

        let step = INTENSITY_RATE * dt;
        self.intensity = if self.phase.intensifying() {
            self.intensity + step
        } else {
            self.intensity - step
        }
        .clamp(0.0, 1.0);
        if self.phase == WeatherPhase::Clear && self.intensity <= 0.0 {
            self.kind = WeatherKind::Clear;
        }

        let target_wind = self.kind.wind() * self.intensity * self.wind_dir;
        self.wind += (target_wind - self.wind) * (1.0 - 0.98f32.powf(dt));

        self.phase_timer -= dt;
        if self.phase_timer > 0.0 {
            return None;
        }

        let next = match self.phase {
            WeatherPhase::Clear => {
                let options = planet.active_weather();
                if options.is_empty() || !rng.chance(planet.weather_volatility) {
                    self.phase_timer = WeatherPhase::Clear.roll(rng);
                    return None;
                }
                self.kind = pick(rng, &options).copied().unwrap_or(WeatherKind::Clear);
                self.wind_dir = rng.sign();
                WeatherPhase::Buildup
            }
            WeatherPhase::Buildup => WeatherPhase::Active,
            WeatherPhase::Active => WeatherPhase::Fading,
            WeatherPhase::Fading => WeatherPhase::Clear,
        };
        log::debug!("Weather {} {:?} -> {:?}", self.kind.name(), self.phase, next);
        self.phase = next;
        self.phase_timer = next.roll(rng);
        Some(next)
    }

    /// Night curve: 0 at noon, [`MAX_DARKNESS`] at midnight.
    pub fn darkness(&self) -> f32 {
        let daylight = 0.5 - 0.5 * (self.time_of_day * std::f32::consts::TAU).cos();
        (1.0 - daylight) * MAX_DARKNESS
    }

    pub fn snapshot(&self) -> WeatherSnapshot {
        WeatherSnapshot {
            kind: self.kind,
            phase: self.phase,
            intensity: self.intensity,
            time_of_day: self.time_of_day,
            darkness: self.darkness(),
            overlay: overlay_opacity(self.kind) * self.intensity,
            wind: self.wind,
        }
    }

    /// Spawn rain, snow, dust or ash around the camera. Returns how many spawned.
    pub fn spawn_ambient(
        &mut self,
        particles: &mut Vec<Particle>,
        camera: &Camera,
        dt: f32,
        rng: &mut dyn RandomSource,
    ) -> usize {
        if self.intensity <= AMBIENT_THRESHOLD || self.kind == WeatherKind::Clear {
            self.particle_accumulator = 0.0;
            return 0;
        }
        let interval = AMBIENT_INTERVAL / self.intensity;
        self.particle_accumulator += dt;
        let mut spawned = 0;
        while self.particle_accumulator >= interval {
            self.particle_accumulator -= interval;
            if particles.len() >= MAX_PARTICLES {
                continue;
            }
            particles.push(self.ambient_particle(camera, rng));
            spawned += 1;
        }
        spawned
    }

    fn ambient_particle(&self, camera: &Camera, rng: &mut dyn RandomSource) -> Particle {
        let x = camera.left() + rng.range(-0.1, 1.1) * camera.view.x;
        let top = camera.position.y - 20.0;
        let (fall, size, color, life): (f32, f32, Color, f32) = match self.kind {
            WeatherKind::Rain | WeatherKind::Storm => (9.0, 2.0, [0.6, 0.7, 0.9], 70.0),
            WeatherKind::AcidRain => (8.0, 2.0, [0.6, 0.9, 0.3], 75.0),
            WeatherKind::Snow => (1.5, 3.0, [0.95, 0.95, 1.0], 360.0),
            WeatherKind::Sandstorm => (0.6, 2.5, [0.8, 0.7, 0.5], 200.0),
            WeatherKind::Ashfall => (1.0, 2.5, [0.45, 0.45, 0.45], 300.0),
            WeatherKind::Clear => (1.0, 1.0, [1.0; 3], 60.0),
        };
        let (position, wind_mult) = match self.kind {
            // Dust blows in from the side rather than falling.
            WeatherKind::Sandstorm => (
                Vec2::new(x, top + rng.range(0.0, camera.view.y)),
                3.0,
            ),
            _ => (Vec2::new(x, top), 1.0),
        };
        Particle {
            position,
            velocity: Vec2::new(self.wind * wind_mult + rng.range(-0.3, 0.3), fall),
            life: Lifetime::new(life),
            max_life: life,
            size,
            color,
            gravity: 0.0,
        }
    }
}

fn overlay_opacity(kind: WeatherKind) -> f32 {
    match kind {
        WeatherKind::Clear => 0.0,
        WeatherKind::Rain => 0.4,
        WeatherKind::Snow => 0.35,
        WeatherKind::Sandstorm => 0.7,
        WeatherKind::AcidRain => 0.45,
        WeatherKind::Ashfall => 0.5,
        WeatherKind::Storm => 0.6,
    }
}
