//! Kinematic integration system.
//!
//! Updates each alive body from its velocity: position += velocity * dt.

use towergames_core::components::{Life, Role};
use towergames_core::config::ArenaLayout;
use towergames_core::types::Body;

use crate::registry::Registry;

/// Integrate every alive body over `dt_ms`. The player is kept inside the
/// arena; everything else may leave it and is discarded by cleanup.
pub fn run(registry: &mut Registry, arena: &ArenaLayout, dt_ms: u64) {
    let dt = dt_ms as f32 / 1000.0;
    let bounds = arena.bounds();
    for (_entity, (role, life, body)) in registry
        .world_mut()
        .query_mut::<(&Role, &Life, &mut Body)>()
    {
        if !life.is_alive() {
            continue;
        }
        body.position += body.velocity * dt;
        if matches!(role, Role::Player) {
            let lo = bounds.center - bounds.half_extents + body.half_extents;
            let hi = bounds.center + bounds.half_extents - body.half_extents;
            body.position = body.position.clamp(lo, hi);
        }
    }
}
