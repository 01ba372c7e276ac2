//! HUD snapshot, the complete visible state handed out after each tick.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::{GameEvent, WaveReport};
use crate::types::SimTime;

/// State broadcast to the presentation collaborator after each tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HudSnapshot {
    pub time: SimTime,
    pub phase: WavePhase,
    pub wave_index: usize,
    pub wave_total: usize,
    pub wave_elapsed_ms: u64,
    pub accuracy_pct: u32,
    pub points: u32,
    pub owned: BTreeMap<ItemKind, u32>,
    pub player: Option<HealthView>,
    pub target: Option<HealthView>,
    pub turrets: Vec<HealthView>,
    pub enemies_alive: u32,
    pub enemies_queued: u32,
    /// Report of the most recently cleared wave.
    pub last_report: Option<WaveReport>,
    pub events: Vec<GameEvent>,
}

/// Health bar data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthView {
    pub current: f64,
    pub max: f64,
}
