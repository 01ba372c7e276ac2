//! Wave scheduler: phase machine, spawn timeline and accuracy counters.

use std::collections::VecDeque;

use glam::Vec2;
use log::info;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use towergames_core::config::Wave;
use towergames_core::constants::{BASE_SPAWN_INTERVAL_MS, MIN_SPAWN_INTERVAL_MS};
use towergames_core::enums::{EnemyKind, WavePhase};
use towergames_core::events::WaveReport;
use towergames_core::GameError;

/// Milliseconds between releases at a cadence tier. Higher tiers are never
/// slower than lower ones.
pub fn spawn_interval_ms(cadence_tier: u32) -> u64 {
    (BASE_SPAWN_INTERVAL_MS / u64::from(cadence_tier.max(1))).max(MIN_SPAWN_INTERVAL_MS)
}

/// `round(hits / max(1, fired) * 100)`.
pub fn accuracy_pct(shots_hit: u32, shots_fired: u32) -> u32 {
    (f64::from(shots_hit) / f64::from(shots_fired.max(1)) * 100.0).round() as u32
}

/// An enemy waiting in the spawn queue.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueuedSpawn {
    pub kind: EnemyKind,
    pub release_at_ms: u64,
    pub position: Vec2,
}

/// Counters for the wave in progress.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WaveRunState {
    pub wave_index: usize,
    pub elapsed_ms: u64,
    pub shots_fired: u32,
    pub shots_hit: u32,
}

impl WaveRunState {
    pub fn accuracy_pct(&self) -> u32 {
        accuracy_pct(self.shots_hit, self.shots_fired)
    }
}

/// Returned by a successful `start_new_wave`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaveStart {
    pub wave_index: usize,
    pub enemies: u32,
}

/// Build the release order for a wave: one of each kind per round, in
/// `EnemyKind` order, until every count is exhausted.
pub fn spawn_order(wave: &Wave) -> Vec<EnemyKind> {
    let mut remaining: Vec<(EnemyKind, u32)> =
        EnemyKind::ALL.iter().map(|&k| (k, wave.count(k))).collect();
    let mut order = Vec::with_capacity(wave.total_enemies() as usize);
    while remaining.iter().any(|&(_, n)| n > 0) {
        for (kind, n) in remaining.iter_mut() {
            if *n > 0 {
                order.push(*kind);
                *n -= 1;
            }
        }
    }
    order
}

#[derive(Debug, Clone)]
pub struct WaveScheduler {
    waves: Vec<Wave>,
    seed: u64,
    phase: WavePhase,
    started: Option<usize>,
    cleared: usize,
    queue: VecDeque<QueuedSpawn>,
    run: WaveRunState,
    total_fired: u32,
    total_hit: u32,
    last_report: Option<WaveReport>,
}

impl WaveScheduler {
    pub fn new(waves: Vec<Wave>, seed: u64) -> Self {
        Self {
            waves,
            seed,
            phase: WavePhase::Idle,
            started: None,
            cleared: 0,
            queue: VecDeque::new(),
            run: WaveRunState::default(),
            total_fired: 0,
            total_hit: 0,
            last_report: None,
        }
    }

    pub fn phase(&self) -> WavePhase {
        self.phase
    }

    pub fn wave_total(&self) -> usize {
        self.waves.len()
    }

    pub fn waves_cleared(&self) -> usize {
        self.cleared
    }

    pub fn run(&self) -> &WaveRunState {
        &self.run
    }

    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    pub fn last_report(&self) -> Option<WaveReport> {
        self.last_report
    }

    /// Accuracy over the whole session.
    pub fn session_accuracy_pct(&self) -> u32 {
        accuracy_pct(self.total_hit, self.total_fired)
    }

    /// Leave the purchase window and queue the next wave. Spawn positions
    /// come from an RNG keyed on the session seed and the wave index, so the
    /// same wave always plays out the same way.
    pub fn start_new_wave(&mut self, spawn_points: &[Vec2]) -> Result<WaveStart, GameError> {
        if !self.phase.is_intermission() {
            return Err(GameError::InvalidPhase { phase: self.phase });
        }
        let wave_index = self.started.map_or(0, |i| i + 1);
        let Some(wave) = self.waves.get(wave_index) else {
            return Err(GameError::InvalidPhase { phase: self.phase });
        };
        if spawn_points.is_empty() {
            return Err(GameError::Config("no spawn points".into()));
        }

        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        rng.set_stream(wave_index as u64);
        let interval = spawn_interval_ms(wave.cadence_tier);

        self.queue = spawn_order(wave)
            .into_iter()
            .enumerate()
            .map(|(i, kind)| QueuedSpawn {
                kind,
                release_at_ms: i as u64 * interval,
                position: spawn_points[rng.gen_range(0..spawn_points.len())],
            })
            .collect();
        self.run = WaveRunState {
            wave_index,
            ..Default::default()
        };
        self.started = Some(wave_index);
        self.phase = WavePhase::Spawning;

        let enemies = wave.total_enemies();
        info!(
            "wave {} started: {enemies} enemies every {interval} ms",
            wave_index + 1
        );
        Ok(WaveStart {
            wave_index,
            enemies,
        })
    }

    /// Pop every queued enemy whose release time has come.
    pub fn release_due(&mut self) -> Vec<QueuedSpawn> {
        let mut due = Vec::new();
        if self.phase != WavePhase::Spawning {
            return due;
        }
        while let Some(next) = self.queue.front() {
            if next.release_at_ms > self.run.elapsed_ms {
                break;
            }
            if let Some(spawn) = self.queue.pop_front() {
                due.push(spawn);
            }
        }
        due
    }

    pub fn advance(&mut self, dt_ms: u64) {
        if self.phase == WavePhase::Spawning {
            self.run.elapsed_ms += dt_ms;
        }
    }

    pub fn record_shot(&mut self) {
        self.run.shots_fired += 1;
        self.total_fired += 1;
    }

    pub fn record_hit(&mut self) {
        self.run.shots_hit += 1;
        self.total_hit += 1;
    }

    /// `Spawning -> Cleared` (or `Won` after the last wave) once the queue is
    /// drained and no enemy remains.
    pub fn check_cleared(&mut self, enemies_remaining: usize) -> Option<WaveReport> {
        if self.phase != WavePhase::Spawning || !self.queue.is_empty() || enemies_remaining > 0 {
            return None;
        }
        let report = WaveReport {
            wave_index: self.run.wave_index,
            elapsed_ms: self.run.elapsed_ms,
            accuracy_pct: self.run.accuracy_pct(),
        };
        self.cleared += 1;
        self.last_report = Some(report);
        self.phase = if self.cleared >= self.waves.len() {
            WavePhase::Won
        } else {
            WavePhase::Cleared
        };
        info!(
            "wave {} cleared in {} ms, accuracy {}%",
            report.wave_index + 1,
            report.elapsed_ms,
            report.accuracy_pct
        );
        Some(report)
    }

    /// Enter `Lost`. Returns `true` only on the transition itself.
    pub fn mark_lost(&mut self) -> bool {
        if self.phase.is_terminal() {
            return false;
        }
        self.phase = WavePhase::Lost;
        self.queue.clear();
        info!("defended target destroyed during wave {}", self.run.wave_index + 1);
        true
    }
}
