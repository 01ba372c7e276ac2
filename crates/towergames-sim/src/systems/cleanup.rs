//! Cleanup system: finishes dying entities and discards spent projectiles.

use hecs::Entity;
use log::debug;

use towergames_core::components::{Lifetime, Life, Role};
use towergames_core::config::ArenaLayout;
use towergames_core::constants::ARENA_OOB_MARGIN;
use towergames_core::types::{Body, Rect};

use crate::lifecycle;
use crate::registry::Registry;

/// Move `Dying` entities to `Removed`, and retire projectiles that expired
/// or left the arena. Uses a caller-owned buffer to avoid per-tick
/// allocation.
pub fn run(
    registry: &mut Registry,
    arena: &ArenaLayout,
    now_ms: u64,
    despawn_buffer: &mut Vec<Entity>,
) {
    despawn_buffer.clear();

    let bounds = arena.bounds();
    let outer = Rect::new(
        bounds.center,
        bounds.half_extents + glam::Vec2::splat(ARENA_OOB_MARGIN),
    );

    for (entity, (role, life, body, lifetime)) in registry
        .world()
        .query::<(&Role, &Life, &Body, Option<&Lifetime>)>()
        .iter()
    {
        if !life.is_alive() {
            despawn_buffer.push(entity);
            continue;
        }
        if !role.group().is_projectile() {
            continue;
        }
        let expired = lifetime.is_some_and(|l| now_ms >= l.expires_at_ms);
        if expired || !outer.contains(body.position) {
            despawn_buffer.push(entity);
        }
    }

    for entity in despawn_buffer.drain(..) {
        if let Err(err) = lifecycle::finalize(registry, entity) {
            debug!("cleanup skipped {entity:?}: {err}");
        }
    }
}
