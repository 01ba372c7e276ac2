//! Events emitted by the simulation for the HUD and session collaborators.

use serde::{Deserialize, Serialize};

use crate::enums::*;

/// Report handed to the HUD when a wave clears.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaveReport {
    pub wave_index: usize,
    pub elapsed_ms: u64,
    pub accuracy_pct: u32,
}

/// Final data shared with the surrounding application when a session ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionResult {
    pub outcome: SessionOutcome,
    pub waves_cleared: usize,
    pub waves_total: usize,
    /// Accuracy over every player shot in the session.
    pub accuracy_pct: u32,
    /// Points left in the ledger, folded into the outer scoring flow.
    pub reward_points: u32,
    pub elapsed_ms: u64,
}

/// Everything observable that happened during a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    WaveStarted { wave_index: usize, enemies: u32 },
    EnemySpawned { kind: EnemyKind },
    ShotFired,
    /// A player shot connected with an enemy.
    ShotHit,
    EntityDamaged { group: Group, amount: f64, remaining: f64 },
    EntityDied { group: Group },
    RewardEarned { points: u32 },
    DropCollected { value: u32 },
    Purchased { item: ItemKind, cost: u32 },
    ItemConsumed { item: ItemKind },
    TurretDeployed { kind: TurretKind },
    WaveCleared(WaveReport),
    SessionEnded(SessionResult),
    /// A queued command could not be applied; state is unchanged.
    CommandRejected { reason: String },
}
