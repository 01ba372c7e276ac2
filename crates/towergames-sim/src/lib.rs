//! Simulation engine for the towergames defense mini-game.
//!
//! Owns the entity registry, runs systems at a fixed tick rate, and produces
//! HUD snapshots for the presentation layer.

pub mod economy;
pub mod engine;
pub mod lifecycle;
pub mod physics;
pub mod registry;
pub mod systems;
pub mod waves;
pub mod world_setup;

pub use engine::{Session, SimulationEngine};
pub use physics::{ArcadePhysics, Physics};
pub use towergames_core as core;

#[cfg(test)]
mod tests;
