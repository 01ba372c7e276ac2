//! Wave spawning system: releases queued enemies into the registry.

use log::debug;

use towergames_core::config::EntityProfiles;
use towergames_core::events::GameEvent;

use crate::registry::Registry;
use crate::waves::WaveScheduler;
use crate::world_setup;

/// Spawn every enemy whose release time has come.
pub fn run(
    registry: &mut Registry,
    scheduler: &mut WaveScheduler,
    profiles: &EntityProfiles,
    events: &mut Vec<GameEvent>,
    now_ms: u64,
) {
    for spawn in scheduler.release_due() {
        world_setup::spawn_enemy(registry, profiles, spawn.kind, spawn.position, now_ms);
        debug!("{:?} enemy released at {}", spawn.kind, spawn.position);
        events.push(GameEvent::EnemySpawned { kind: spawn.kind });
    }
}
