//! Simulation engine, the game loop of the mini-game.
//!
//! `SimulationEngine` owns one `Session` (registry, ledger, wave scheduler,
//! collision contacts, clock) at a time, processes queued player commands,
//! runs every system in a fixed order and produces a `HudSnapshot` per tick.
//! Completely headless, so whole sessions can be replayed deterministically.

use std::collections::VecDeque;

use glam::Vec2;
use hecs::Entity;
use log::{info, warn};

use towergames_core::commands::PlayerCommand;
use towergames_core::components::Role;
use towergames_core::config::SessionConfig;
use towergames_core::enums::*;
use towergames_core::events::{GameEvent, SessionResult};
use towergames_core::state::HudSnapshot;
use towergames_core::types::{Body, SimTime};
use towergames_core::GameError;

use crate::economy::EconomyLedger;
use crate::lifecycle;
use crate::physics::{ArcadePhysics, Physics};
use crate::registry::Registry;
use crate::systems;
use crate::systems::collision::{CollisionContext, ContactSet};
use crate::waves::WaveScheduler;
use crate::world_setup;

/// All state of one play session. Replaced wholesale on restart.
pub struct Session {
    registry: Registry,
    ledger: EconomyLedger,
    scheduler: WaveScheduler,
    contacts: ContactSet,
    time: SimTime,
    events: Vec<GameEvent>,
    despawn_buffer: Vec<Entity>,
    player: Option<Entity>,
    target: Entity,
    result: Option<SessionResult>,
}

impl Session {
    /// Build a fresh session: validated wave selection, populated arena,
    /// starting balance.
    pub fn new(config: &SessionConfig) -> Result<Self, GameError> {
        config.validate()?;
        let waves = config.selected_waves()?;
        let mut registry = Registry::new();
        let handles = world_setup::setup_arena(&mut registry, config);
        Ok(Self {
            registry,
            ledger: EconomyLedger::new(config.starting_points),
            scheduler: WaveScheduler::new(waves, config.seed),
            contacts: ContactSet::default(),
            time: SimTime::default(),
            events: Vec::new(),
            despawn_buffer: Vec::new(),
            player: Some(handles.player),
            target: handles.target,
            result: None,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn ledger(&self) -> &EconomyLedger {
        &self.ledger
    }

    pub fn scheduler(&self) -> &WaveScheduler {
        &self.scheduler
    }

    /// The player, while alive.
    pub fn player(&self) -> Option<Entity> {
        self.player.filter(|&p| self.registry.is_alive(p))
    }

    pub fn target(&self) -> Entity {
        self.target
    }

    pub fn result(&self) -> Option<SessionResult> {
        self.result
    }

    fn player_body(&self) -> Result<(Entity, Body), GameError> {
        let player = self.player().ok_or(GameError::NoPlayer)?;
        let body = self.registry.body(player).ok_or(GameError::NoPlayer)?;
        Ok((player, body))
    }

    fn start_wave(&mut self, config: &SessionConfig) -> Result<(), GameError> {
        let start = self.scheduler.start_new_wave(&config.arena.spawn_points)?;
        self.events.push(GameEvent::WaveStarted {
            wave_index: start.wave_index,
            enemies: start.enemies,
        });
        Ok(())
    }

    fn purchase(&mut self, config: &SessionConfig, item: ItemKind) -> Result<(), GameError> {
        let phase = self.scheduler.phase();
        if !phase.is_intermission() {
            return Err(GameError::InvalidPhase { phase });
        }
        let cost = config.costs.cost(item);
        self.ledger.purchase(item, cost)?;
        self.events.push(GameEvent::Purchased { item, cost });
        Ok(())
    }

    fn deploy_turret(
        &mut self,
        config: &SessionConfig,
        kind: TurretKind,
        position: Vec2,
    ) -> Result<(), GameError> {
        let item = kind.item();
        self.ledger.consume(item)?;
        world_setup::spawn_turret(
            &mut self.registry,
            &config.profiles,
            kind,
            position,
            self.time.elapsed_ms,
        );
        self.events.push(GameEvent::ItemConsumed { item });
        self.events.push(GameEvent::TurretDeployed { kind });
        Ok(())
    }

    /// Alive turret missing the most health, with the amount missing.
    /// Registration order breaks ties.
    fn most_damaged_turret(&self) -> Option<(Entity, f64)> {
        let mut best: Option<(Entity, f64)> = None;
        for &turret in self.registry.members(Group::Turrets) {
            if !self.registry.is_alive(turret) {
                continue;
            }
            let Some(health) = self.registry.health(turret) else {
                continue;
            };
            let missing = health.max - health.current;
            if missing > 0.0 && best.map_or(true, |(_, m)| missing > m) {
                best = Some((turret, missing));
            }
        }
        best
    }

    fn repair_turret(&mut self) -> Result<(), GameError> {
        let item = ItemKind::RepairHammer;
        if self.ledger.owned(item) == 0 {
            return Err(GameError::NotOwned { item });
        }
        let (turret, missing) = self
            .most_damaged_turret()
            .ok_or(GameError::NothingToRepair)?;
        self.ledger.consume(item)?;
        lifecycle::heal(&mut self.registry, turret, missing)?;
        self.events.push(GameEvent::ItemConsumed { item });
        Ok(())
    }

    fn apply_heal(&mut self, config: &SessionConfig) -> Result<(), GameError> {
        let item = ItemKind::FirstAid;
        let amount = config.profiles.first_aid_heal;
        let player = self.player().ok_or(GameError::NoPlayer)?;
        if !amount.is_finite() || amount < 0.0 {
            return Err(GameError::InvalidDamage { amount });
        }
        if self.ledger.owned(item) == 0 {
            return Err(GameError::NotOwned { item });
        }
        self.ledger.consume(item)?;
        lifecycle::heal(&mut self.registry, player, amount)?;
        self.events.push(GameEvent::ItemConsumed { item });
        Ok(())
    }

    fn fire_shot(&mut self, config: &SessionConfig, target: Vec2) -> Result<(), GameError> {
        let (_, body) = self.player_body()?;
        let profile = &config.profiles.player;
        let heading = (target - body.position).normalize_or_zero();
        world_setup::spawn_projectile(
            &mut self.registry,
            &config.profiles,
            Role::PlayerProjectile {
                shooter: Shooter::Player,
                damage: profile.shot_damage,
            },
            body.position,
            heading * profile.shot_speed,
            self.time.elapsed_ms,
        );
        self.scheduler.record_shot();
        self.events.push(GameEvent::ShotFired);
        Ok(())
    }

    fn set_player_velocity(
        &mut self,
        config: &SessionConfig,
        velocity: Vec2,
    ) -> Result<(), GameError> {
        let (player, mut body) = self.player_body()?;
        body.velocity = velocity.clamp_length_max(config.profiles.player.speed);
        self.registry.set_body(player, body);
        Ok(())
    }

    /// Record the final result. Only the first call has any effect.
    fn finish(&mut self, outcome: SessionOutcome) {
        if self.result.is_some() {
            return;
        }
        let result = SessionResult {
            outcome,
            waves_cleared: self.scheduler.waves_cleared(),
            waves_total: self.scheduler.wave_total(),
            accuracy_pct: self.scheduler.session_accuracy_pct(),
            reward_points: self.ledger.points(),
            elapsed_ms: self.time.elapsed_ms,
        };
        info!(
            "session {:?}: {}/{} waves, accuracy {}%, {} points",
            outcome,
            result.waves_cleared,
            result.waves_total,
            result.accuracy_pct,
            result.reward_points
        );
        self.events.push(GameEvent::SessionEnded(result));
        self.result = Some(result);
    }
}

/// The simulation engine. Owns the config, the physics collaborator and the
/// current session.
pub struct SimulationEngine<P: Physics = ArcadePhysics> {
    config: SessionConfig,
    physics: P,
    session: Session,
    command_queue: VecDeque<PlayerCommand>,
}

impl SimulationEngine<ArcadePhysics> {
    /// Create an engine with the built-in box physics.
    pub fn new(config: SessionConfig) -> Result<Self, GameError> {
        Self::with_physics(config, ArcadePhysics)
    }
}

impl<P: Physics> SimulationEngine<P> {
    pub fn with_physics(config: SessionConfig, physics: P) -> Result<Self, GameError> {
        let session = Session::new(&config)?;
        info!(
            "session ready: {} waves, seed {}",
            session.scheduler.wave_total(),
            config.seed
        );
        Ok(Self {
            config,
            physics,
            session,
            command_queue: VecDeque::new(),
        })
    }

    /// Queue a player command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance the simulation by one tick and return the resulting snapshot.
    pub fn tick(&mut self) -> HudSnapshot {
        self.process_commands();

        if !self.session.scheduler.phase().is_terminal() {
            self.run_systems();
            self.session.time.advance(self.config.tick_ms);
        }

        let session = &mut self.session;
        let events = std::mem::take(&mut session.events);
        systems::snapshot::build_snapshot(
            &session.registry,
            &session.scheduler,
            &session.ledger,
            &session.time,
            session.player(),
            session.target,
            events,
        )
    }

    /// Throw away the current session and start a new one at wave 0.
    /// The new session is fully built before it replaces the old one.
    pub fn restart(&mut self) -> Result<(), GameError> {
        self.session = Session::new(&self.config)?;
        info!("session restarted");
        Ok(())
    }

    pub fn phase(&self) -> WavePhase {
        self.session.scheduler.phase()
    }

    pub fn time(&self) -> SimTime {
        self.session.time
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Final result once the session is won or lost.
    pub fn session_result(&self) -> Option<SessionResult> {
        self.session.result
    }

    /// Mutable registry access for tests that stage entities directly.
    #[cfg(test)]
    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.session.registry
    }

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            if let Err(err) = self.handle_command(&command) {
                warn!("{command:?} rejected: {err}");
                self.session.events.push(GameEvent::CommandRejected {
                    reason: err.to_string(),
                });
            }
        }
    }

    /// Handle a single player command. Failures leave state unchanged.
    fn handle_command(&mut self, command: &PlayerCommand) -> Result<(), GameError> {
        if let PlayerCommand::Restart = command {
            return self.restart();
        }
        let phase = self.session.scheduler.phase();
        if phase.is_terminal() {
            return Err(GameError::InvalidPhase { phase });
        }

        let config = &self.config;
        let session = &mut self.session;
        match *command {
            PlayerCommand::StartNewWave => session.start_wave(config),
            PlayerCommand::Purchase { item } => session.purchase(config, item),
            PlayerCommand::DeployTurret { kind, position } => {
                session.deploy_turret(config, kind, position)
            }
            PlayerCommand::RepairTurret => session.repair_turret(),
            PlayerCommand::ApplyHeal => session.apply_heal(config),
            PlayerCommand::FireShot { target } => session.fire_shot(config, target),
            PlayerCommand::SetPlayerVelocity { velocity } => {
                session.set_player_velocity(config, velocity)
            }
            PlayerCommand::Restart => Ok(()),
        }
    }

    /// Run all systems in order.
    fn run_systems(&mut self) {
        let config = &self.config;
        let session = &mut self.session;
        let now = session.time.elapsed_ms;

        // 1. Wave spawning
        systems::wave_spawner::run(
            &mut session.registry,
            &mut session.scheduler,
            &config.profiles,
            &mut session.events,
            now,
        );
        // 2. Enemy steering and ranged fire
        systems::enemy_ai::run(
            &mut session.registry,
            &config.profiles,
            Some(session.target),
            now,
        );
        // 3. Turret fire
        systems::turret_fire::run(&mut session.registry, &config.profiles, now);
        // 4. Movement integration
        systems::movement::run(&mut session.registry, &config.arena, config.tick_ms);
        // 5. Collision resolution
        let collisions = {
            let mut ctx = CollisionContext {
                rewards: &config.rewards,
                scheduler: &mut session.scheduler,
                ledger: &mut session.ledger,
                events: &mut session.events,
                now_ms: now,
            };
            systems::collision::run(
                &mut session.registry,
                &self.physics,
                &config.collision,
                &mut session.contacts,
                &mut ctx,
            )
        };
        // 6. Cleanup (dying, expired, out of arena)
        systems::cleanup::run(
            &mut session.registry,
            &config.arena,
            now,
            &mut session.despawn_buffer,
        );
        // 7. Session loss / wave completion
        if collisions.target_destroyed && session.scheduler.mark_lost() {
            session.finish(SessionOutcome::Lost);
        } else if let Some(report) = session
            .scheduler
            .check_cleared(session.registry.count(Group::Enemies))
        {
            session.events.push(GameEvent::WaveCleared(report));
            if session.scheduler.phase() == WavePhase::Won {
                session.finish(SessionOutcome::Won);
            }
        }
        // 8. Wave clock
        session.scheduler.advance(config.tick_ms);
    }
}
