//! Procedural generation for side-scrolling missions: terrain, hazards, vegetation and decorations.
//!
//! **Seed-based determinism:** every draw goes through an injected
//! [`engine_core::RandomSource`], so the same seed and `PlanetConfig` always produce the
//! same world layout.

pub mod biome;
pub mod generator;
pub mod hazard;
pub mod planet;
pub mod terrain;
pub mod vegetation;

pub use biome::*;
pub use generator::*;
pub use hazard::*;
pub use planet::*;
pub use terrain::*;
pub use vegetation::*;
