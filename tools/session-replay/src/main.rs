//! Headless session runner.
//!
//! Usage:
//!   session-replay run [--config FILE] [--waves N] [--seed S]   # autopilot a session
//!   session-replay dump-config                                  # print default config JSON

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use glam::Vec2;
use log::{debug, info};

use towergames_core::commands::PlayerCommand;
use towergames_core::config::SessionConfig;
use towergames_core::enums::{EnemyKind, Group, ItemKind, TurretKind, WavePhase};
use towergames_core::events::GameEvent;
use towergames_sim::SimulationEngine;

#[derive(Parser)]
#[command(name = "session-replay")]
#[command(about = "Run towergames sessions headless")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a session with a simple autopilot and print the result as JSON
    Run {
        /// Session config (JSON); missing fields use built-in defaults
        #[arg(long)]
        config: Option<PathBuf>,
        /// Number of waves to play
        #[arg(long)]
        waves: Option<usize>,
        /// Override the spawn RNG seed
        #[arg(long)]
        seed: Option<u64>,
        /// Give up after this many ticks
        #[arg(long, default_value_t = 200_000)]
        max_ticks: u64,
        /// Ticks between autopilot shots
        #[arg(long, default_value_t = 15)]
        fire_every: u64,
    },
    /// Print the built-in session config as JSON
    DumpConfig,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            waves,
            seed,
            max_ticks,
            fire_every,
        } => run(config, waves, seed, max_ticks, fire_every),
        Commands::DumpConfig => {
            let json = SessionConfig::default().to_json_pretty()?;
            println!("{json}");
            Ok(())
        }
    }
}

fn load_config(
    path: Option<PathBuf>,
    waves: Option<usize>,
    seed: Option<u64>,
) -> Result<SessionConfig> {
    let mut config = match path {
        Some(path) => SessionConfig::load(&path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => SessionConfig::default(),
    };
    if waves.is_some() {
        config.wave_count = waves;
    }
    if let Some(seed) = seed {
        config.seed = seed;
    }
    Ok(config)
}

fn run(
    path: Option<PathBuf>,
    waves: Option<usize>,
    seed: Option<u64>,
    max_ticks: u64,
    fire_every: u64,
) -> Result<()> {
    let config = load_config(path, waves, seed)?;
    let mut engine = SimulationEngine::new(config).context("starting session")?;
    let mut pilot = Autopilot::new(fire_every.max(1));

    for tick in 0..max_ticks {
        pilot.plan(&mut engine, tick);
        let snap = engine.tick();
        for event in &snap.events {
            match event {
                GameEvent::WaveCleared(report) => info!(
                    "wave {} cleared: {} ms, {}% accuracy, {} points",
                    report.wave_index + 1,
                    report.elapsed_ms,
                    report.accuracy_pct,
                    snap.points
                ),
                GameEvent::CommandRejected { reason } => {
                    debug!("autopilot command rejected: {reason}")
                }
                _ => {}
            }
        }
        if let Some(result) = engine.session_result() {
            println!("{}", serde_json::to_string_pretty(&result)?);
            return Ok(());
        }
    }
    bail!("session still running after {max_ticks} ticks")
}

/// Buys turrets between waves, starts the next wave, and shoots at the
/// enemy closest to the defended target.
struct Autopilot {
    fire_every: u64,
    placed: usize,
}

impl Autopilot {
    fn new(fire_every: u64) -> Self {
        Self {
            fire_every,
            placed: 0,
        }
    }

    fn plan(&mut self, engine: &mut SimulationEngine, tick: u64) {
        match engine.phase() {
            WavePhase::Idle | WavePhase::Cleared => self.shop(engine),
            WavePhase::Spawning if tick % self.fire_every == 0 => self.shoot(engine),
            _ => {}
        }
    }

    fn shop(&mut self, engine: &mut SimulationEngine) {
        let session = engine.session();
        let points = session.ledger().points();
        let costs = engine.config().costs;
        let target = session
            .registry()
            .body(session.target())
            .map_or(Vec2::ZERO, |b| b.position);

        let mut commands = Vec::new();
        let kind = if points >= costs.large_turret {
            Some(TurretKind::Large)
        } else if points >= costs.small_turret {
            Some(TurretKind::Small)
        } else {
            None
        };
        if let Some(kind) = kind {
            // Ring the target, one slot per turret placed so far.
            let angle = self.placed as f32 * std::f32::consts::FRAC_PI_3;
            let position = target + Vec2::from_angle(angle) * 96.0;
            commands.push(PlayerCommand::Purchase { item: kind.item() });
            commands.push(PlayerCommand::DeployTurret { kind, position });
            self.placed += 1;
        }
        let player_hurt = session
            .player()
            .and_then(|p| session.registry().health(p))
            .is_some_and(|h| h.ratio() < 0.5);
        if player_hurt {
            commands.push(PlayerCommand::Purchase {
                item: ItemKind::FirstAid,
            });
            commands.push(PlayerCommand::ApplyHeal);
        }
        commands.push(PlayerCommand::StartNewWave);
        engine.queue_commands(commands);
    }

    fn shoot(&self, engine: &mut SimulationEngine) {
        let session = engine.session();
        let registry = session.registry();
        let Some(goal) = registry.body(session.target()).map(|b| b.position) else {
            return;
        };
        let aim = registry
            .members(Group::Enemies)
            .iter()
            .filter(|&&e| registry.is_alive(e))
            .filter_map(|&e| Some((registry.role(e)?.enemy_kind()?, registry.body(e)?)))
            // Ranged enemies stand off, the others are the bigger threat.
            .min_by(|(ka, a), (kb, b)| {
                let weight = |k: &EnemyKind| if *k == EnemyKind::Ranged { 1.5 } else { 1.0 };
                let da = a.position.distance(goal) * weight(ka);
                let db = b.position.distance(goal) * weight(kb);
                da.total_cmp(&db)
            })
            .map(|(_, body)| body.position);
        if let Some(target) = aim {
            engine.queue_command(PlayerCommand::FireShot { target });
        }
    }
}
