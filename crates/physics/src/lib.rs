//! Discrete 2D physics for Driftfall: AABB tests, body integration against the
//! terrain heightmap, and environmental hazard effects.

pub mod collision;
pub mod hazards;
pub mod motion;

pub use collision::*;
pub use hazards::*;
pub use motion::*;
