//! HUD snapshot builder.

use hecs::Entity;

use towergames_core::enums::Group;
use towergames_core::events::GameEvent;
use towergames_core::state::{HealthView, HudSnapshot};
use towergames_core::types::SimTime;

use crate::economy::EconomyLedger;
use crate::registry::Registry;
use crate::waves::WaveScheduler;

fn health_view(registry: &Registry, entity: Entity) -> Option<HealthView> {
    if !registry.contains(entity) {
        return None;
    }
    registry.health(entity).map(|h| HealthView {
        current: h.current,
        max: h.max,
    })
}

/// Build the snapshot handed to the HUD after a tick.
pub fn build_snapshot(
    registry: &Registry,
    scheduler: &WaveScheduler,
    ledger: &EconomyLedger,
    time: &SimTime,
    player: Option<Entity>,
    target: Entity,
    events: Vec<GameEvent>,
) -> HudSnapshot {
    let run = scheduler.run();
    HudSnapshot {
        time: *time,
        phase: scheduler.phase(),
        wave_index: run.wave_index,
        wave_total: scheduler.wave_total(),
        wave_elapsed_ms: run.elapsed_ms,
        accuracy_pct: run.accuracy_pct(),
        points: ledger.points(),
        owned: ledger.inventory().clone(),
        player: player.and_then(|p| health_view(registry, p)),
        target: health_view(registry, target),
        turrets: registry
            .members(Group::Turrets)
            .iter()
            .filter_map(|&t| health_view(registry, t))
            .collect(),
        enemies_alive: registry.alive_count(Group::Enemies) as u32,
        enemies_queued: scheduler.queued() as u32,
        last_report: scheduler.last_report(),
        events,
    }
}
