//! Systems that operate on the registry each tick.
//!
//! Systems are free functions over the registry and whatever session state
//! they need. They do not own state; all state lives in components or in the
//! session.

pub mod cleanup;
pub mod collision;
pub mod enemy_ai;
pub mod movement;
pub mod snapshot;
pub mod turret_fire;
pub mod wave_spawner;
