//! Core engine types and utilities for Driftfall.
//!
//! This crate provides the foundational types used across all simulation systems:
//! - Body, health and timer components
//! - Frame timing (`dt` sanitizing against the nominal frame)
//! - The injectable random source shared by generation and gameplay rolls

pub mod components;
pub mod random;
pub mod time;

pub use components::*;
pub use random::*;
pub use time::*;

// Re-export commonly used types
pub use glam::Vec2;
