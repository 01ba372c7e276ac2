//! Tests for the simulation engine: command handling, wave flow, economy
//! consumers and session endings.

use std::collections::HashSet;

use glam::Vec2;

use towergames_core::commands::PlayerCommand;
use towergames_core::config::{SessionConfig, Wave};
use towergames_core::enums::*;
use towergames_core::events::GameEvent;
use towergames_core::state::HudSnapshot;
use towergames_core::GameError;

use crate::engine::SimulationEngine;
use crate::lifecycle;

/// Open arena: player on the left, one spawn point next to it, the defended
/// target far to the right.
fn open_arena(waves: Vec<Wave>) -> SessionConfig {
    let mut config = SessionConfig {
        waves,
        ..Default::default()
    };
    config.arena.player_spawn = Vec2::new(100.0, 100.0);
    config.arena.spawn_points = vec![Vec2::new(160.0, 100.0)];
    config.arena.target_position = Vec2::new(800.0, 100.0);
    config.arena.obstacles.clear();
    config
}

fn light_wave(count: u32) -> Wave {
    Wave::new(&[(EnemyKind::Light, count)], 1)
}

fn rejected(snap: &HudSnapshot) -> usize {
    snap.events
        .iter()
        .filter(|e| matches!(e, GameEvent::CommandRejected { .. }))
        .count()
}

// ---- End to end ----

#[test]
fn test_two_shots_clear_single_wave() {
    let mut engine = SimulationEngine::new(open_arena(vec![light_wave(2)])).unwrap();
    engine.queue_command(PlayerCommand::StartNewWave);

    let mut targeted = HashSet::new();
    let mut events = Vec::new();
    for _ in 0..1000 {
        let snap = engine.tick();
        events.extend(snap.events);
        if engine.session_result().is_some() {
            break;
        }
        let registry = engine.session().registry();
        let fresh: Vec<Vec2> = registry
            .members(Group::Enemies)
            .iter()
            .filter(|e| targeted.insert(**e))
            .filter_map(|&e| registry.body(e))
            .map(|b| b.position)
            .collect();
        for target in fresh {
            engine.queue_command(PlayerCommand::FireShot { target });
        }
    }

    let report = events.iter().find_map(|e| match e {
        GameEvent::WaveCleared(r) => Some(*r),
        _ => None,
    });
    let report = report.expect("wave should clear");
    assert_eq!(report.wave_index, 0);
    assert_eq!(report.accuracy_pct, 100);

    let result = engine.session_result().expect("session should end");
    assert_eq!(result.outcome, SessionOutcome::Won);
    assert_eq!(result.accuracy_pct, 100);
    assert_eq!(result.waves_cleared, 1);
    assert_eq!(result.reward_points, 100 + 2 * 30);
    assert_eq!(engine.phase(), WavePhase::Won);

    let ended = events
        .iter()
        .filter(|e| matches!(e, GameEvent::SessionEnded(_)))
        .count();
    assert_eq!(ended, 1);
}

#[test]
fn test_time_stops_after_session_ends() {
    let mut engine = SimulationEngine::new(open_arena(vec![light_wave(1)])).unwrap();
    engine.queue_command(PlayerCommand::StartNewWave);
    // Walk the player into the enemy: contact destroys it.
    engine.queue_command(PlayerCommand::SetPlayerVelocity {
        velocity: Vec2::new(200.0, 0.0),
    });
    for _ in 0..200 {
        engine.tick();
    }
    assert_eq!(engine.phase(), WavePhase::Won);
    let frozen = engine.time();
    engine.tick();
    assert_eq!(engine.time(), frozen);
}

// ---- Waves ----

#[test]
fn test_wave_flow_with_cleared_intermission() {
    let mut engine =
        SimulationEngine::new(open_arena(vec![light_wave(1), light_wave(1)])).unwrap();
    engine.queue_command(PlayerCommand::StartNewWave);
    engine.queue_command(PlayerCommand::SetPlayerVelocity {
        velocity: Vec2::new(200.0, 0.0),
    });
    let mut snap = engine.tick();
    assert_eq!(snap.phase, WavePhase::Spawning);
    for _ in 0..200 {
        snap = engine.tick();
        if snap.phase != WavePhase::Spawning {
            break;
        }
    }
    assert_eq!(snap.phase, WavePhase::Cleared);
    assert_eq!(snap.last_report.map(|r| r.wave_index), Some(0));
    assert_eq!(snap.enemies_alive, 0);

    // Back off from the spawn point; the world keeps running between waves.
    engine.queue_command(PlayerCommand::SetPlayerVelocity {
        velocity: Vec2::new(-200.0, 0.0),
    });
    for _ in 0..20 {
        snap = engine.tick();
    }
    assert_eq!(snap.phase, WavePhase::Cleared);

    engine.queue_commands([
        PlayerCommand::SetPlayerVelocity {
            velocity: Vec2::ZERO,
        },
        PlayerCommand::StartNewWave,
    ]);
    let snap = engine.tick();
    assert_eq!(snap.phase, WavePhase::Spawning);
    assert_eq!(snap.wave_index, 1);
}

#[test]
fn test_start_new_wave_rejected_mid_wave() {
    let mut engine = SimulationEngine::new(open_arena(vec![light_wave(3)])).unwrap();
    engine.queue_command(PlayerCommand::StartNewWave);
    engine.tick();
    engine.queue_command(PlayerCommand::StartNewWave);
    let snap = engine.tick();
    assert_eq!(rejected(&snap), 1);
    assert_eq!(snap.wave_index, 0);
}

#[test]
fn test_wave_count_truncates_sequence() {
    let config = SessionConfig {
        wave_count: Some(3),
        ..Default::default()
    };
    let mut engine = SimulationEngine::new(config).unwrap();
    assert_eq!(engine.tick().wave_total, 3);
}

#[test]
fn test_invalid_wave_count_rejected() {
    let config = SessionConfig {
        wave_count: Some(0),
        ..Default::default()
    };
    assert!(matches!(
        SimulationEngine::new(config),
        Err(GameError::InvalidWaveCount {
            requested: 0,
            available: 11
        })
    ));
}

// ---- Session loss ----

#[test]
fn test_target_loss_ends_session_once() {
    let mut config = open_arena(vec![light_wave(3)]);
    config.profiles.target.max_health = 10.0;
    config.arena.spawn_points = vec![Vec2::new(780.0, 100.0)];
    let mut engine = SimulationEngine::new(config).unwrap();
    engine.queue_command(PlayerCommand::StartNewWave);

    let mut ended = 0;
    for _ in 0..300 {
        let snap = engine.tick();
        ended += snap
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::SessionEnded(_)))
            .count();
    }
    assert_eq!(ended, 1);
    assert_eq!(engine.phase(), WavePhase::Lost);
    let result = engine.session_result().unwrap();
    assert_eq!(result.outcome, SessionOutcome::Lost);
    assert_eq!(result.waves_cleared, 0);

    engine.queue_command(PlayerCommand::StartNewWave);
    assert_eq!(rejected(&engine.tick()), 1);
}

#[test]
fn test_defended_target_has_no_kill_handle() {
    let engine = SimulationEngine::new(SessionConfig::default()).unwrap();
    let session = engine.session();
    assert!(session.registry().killable(session.target()).is_none());
    assert!(session
        .registry()
        .killable(session.player().unwrap())
        .is_some());
}

#[test]
fn test_contact_kill_gives_no_reward() {
    let mut config = open_arena(vec![light_wave(1)]);
    config.arena.spawn_points = vec![Vec2::new(120.0, 100.0)];
    let mut engine = SimulationEngine::new(config).unwrap();
    engine.queue_command(PlayerCommand::StartNewWave);
    engine.tick();

    let session = engine.session();
    assert_eq!(session.ledger().points(), 100);
    let player = session.player().unwrap();
    assert_eq!(session.registry().health(player).unwrap().current, 90.0);
    assert_eq!(engine.phase(), WavePhase::Won);
}

// ---- Economy ----

#[test]
fn test_purchase_only_between_waves() {
    let mut engine = SimulationEngine::new(open_arena(vec![light_wave(3)])).unwrap();
    engine.queue_command(PlayerCommand::Purchase {
        item: ItemKind::FirstAid,
    });
    let snap = engine.tick();
    assert_eq!(snap.points, 60);
    assert_eq!(snap.owned.get(&ItemKind::FirstAid), Some(&1));

    engine.queue_command(PlayerCommand::StartNewWave);
    engine.queue_command(PlayerCommand::Purchase {
        item: ItemKind::FirstAid,
    });
    let snap = engine.tick();
    assert_eq!(rejected(&snap), 1);
    assert_eq!(snap.points, 60);
}

#[test]
fn test_insufficient_funds_leaves_ledger_unchanged() {
    let mut config = open_arena(vec![light_wave(1)]);
    config.starting_points = 40;
    let mut engine = SimulationEngine::new(config).unwrap();
    engine.queue_command(PlayerCommand::Purchase {
        item: ItemKind::RepairHammer,
    });
    let snap = engine.tick();
    assert_eq!(rejected(&snap), 1);
    assert_eq!(snap.points, 40);
    assert!(snap.owned.is_empty());
}

#[test]
fn test_deploy_turret_consumes_inventory() {
    let mut engine = SimulationEngine::new(open_arena(vec![light_wave(1)])).unwrap();
    engine.queue_commands([
        PlayerCommand::Purchase {
            item: ItemKind::SmallTurret,
        },
        PlayerCommand::DeployTurret {
            kind: TurretKind::Small,
            position: Vec2::new(300.0, 300.0),
        },
        PlayerCommand::DeployTurret {
            kind: TurretKind::Small,
            position: Vec2::new(400.0, 300.0),
        },
    ]);
    let snap = engine.tick();
    assert_eq!(snap.turrets.len(), 1);
    assert_eq!(snap.owned.get(&ItemKind::SmallTurret), Some(&0));
    assert_eq!(rejected(&snap), 1);
    assert_eq!(snap.points, 0);
}

#[test]
fn test_repair_restores_most_damaged_turret() {
    let mut config = open_arena(vec![light_wave(1)]);
    config.starting_points = 1000;
    let mut engine = SimulationEngine::new(config).unwrap();
    engine.queue_commands([
        PlayerCommand::Purchase {
            item: ItemKind::SmallTurret,
        },
        PlayerCommand::Purchase {
            item: ItemKind::SmallTurret,
        },
        PlayerCommand::Purchase {
            item: ItemKind::RepairHammer,
        },
        PlayerCommand::DeployTurret {
            kind: TurretKind::Small,
            position: Vec2::new(300.0, 300.0),
        },
        PlayerCommand::DeployTurret {
            kind: TurretKind::Small,
            position: Vec2::new(400.0, 300.0),
        },
    ]);
    engine.tick();

    let turrets = engine.session().registry().members(Group::Turrets).to_vec();
    lifecycle::damage(engine.registry_mut(), turrets[0], 10.0, 0).unwrap();
    lifecycle::damage(engine.registry_mut(), turrets[1], 30.0, 0).unwrap();

    engine.queue_command(PlayerCommand::RepairTurret);
    let snap = engine.tick();
    assert_eq!(rejected(&snap), 0);
    assert_eq!(snap.turrets[0].current, 90.0);
    assert_eq!(snap.turrets[1].current, snap.turrets[1].max);
    assert_eq!(snap.owned.get(&ItemKind::RepairHammer), Some(&0));
}

#[test]
fn test_repair_without_damage_keeps_hammer() {
    let mut engine = SimulationEngine::new(open_arena(vec![light_wave(1)])).unwrap();
    engine.queue_commands([
        PlayerCommand::Purchase {
            item: ItemKind::RepairHammer,
        },
        PlayerCommand::RepairTurret,
    ]);
    let snap = engine.tick();
    assert_eq!(rejected(&snap), 1);
    assert_eq!(snap.owned.get(&ItemKind::RepairHammer), Some(&1));
}

#[test]
fn test_first_aid_heals_player() {
    let mut engine = SimulationEngine::new(open_arena(vec![light_wave(1)])).unwrap();
    let player = engine.session().player().unwrap();
    lifecycle::damage(engine.registry_mut(), player, 70.0, 0).unwrap();

    engine.queue_commands([
        PlayerCommand::Purchase {
            item: ItemKind::FirstAid,
        },
        PlayerCommand::ApplyHeal,
    ]);
    let snap = engine.tick();
    assert_eq!(snap.player.unwrap().current, 80.0);
    assert_eq!(snap.owned.get(&ItemKind::FirstAid), Some(&0));
}

#[test]
fn test_rejected_heal_keeps_first_aid() {
    let mut engine = SimulationEngine::new(open_arena(vec![light_wave(1)])).unwrap();
    let player = engine.session().player().unwrap();
    lifecycle::damage(engine.registry_mut(), player, 100.0, 0).unwrap();

    engine.queue_commands([
        PlayerCommand::Purchase {
            item: ItemKind::FirstAid,
        },
        PlayerCommand::ApplyHeal,
    ]);
    let snap = engine.tick();
    assert_eq!(rejected(&snap), 1);
    assert_eq!(snap.owned.get(&ItemKind::FirstAid), Some(&1));
    assert!(snap.player.is_none());
}

#[test]
fn test_negative_first_aid_config_refused() {
    let mut config = open_arena(vec![light_wave(1)]);
    config.profiles.first_aid_heal = -5.0;
    assert!(matches!(
        SimulationEngine::new(config),
        Err(GameError::Config(_))
    ));
}

#[test]
fn test_heal_without_first_aid_rejected() {
    let mut engine = SimulationEngine::new(open_arena(vec![light_wave(1)])).unwrap();
    engine.queue_command(PlayerCommand::ApplyHeal);
    assert_eq!(rejected(&engine.tick()), 1);
}

// ---- Behaviour systems ----

#[test]
fn test_turret_engages_enemy_without_counting_accuracy() {
    let mut engine = SimulationEngine::new(open_arena(vec![light_wave(1)])).unwrap();
    engine.queue_commands([
        PlayerCommand::Purchase {
            item: ItemKind::SmallTurret,
        },
        PlayerCommand::DeployTurret {
            kind: TurretKind::Small,
            position: Vec2::new(160.0, 150.0),
        },
        PlayerCommand::StartNewWave,
    ]);
    let mut enemy_hit = false;
    for _ in 0..200 {
        let snap = engine.tick();
        enemy_hit |= snap.events.iter().any(|e| {
            matches!(
                e,
                GameEvent::EntityDamaged {
                    group: Group::Enemies,
                    ..
                } | GameEvent::EntityDied {
                    group: Group::Enemies
                }
            )
        });
    }
    assert!(enemy_hit);
    assert_eq!(engine.session().scheduler().run().shots_hit, 0);
}

#[test]
fn test_ranged_enemy_shoots_target() {
    let mut config = open_arena(vec![Wave::new(&[(EnemyKind::Ranged, 1)], 1)]);
    config.arena.spawn_points = vec![Vec2::new(500.0, 100.0)];
    let mut engine = SimulationEngine::new(config).unwrap();
    engine.queue_command(PlayerCommand::StartNewWave);
    let mut snap = engine.tick();
    for _ in 0..100 {
        snap = engine.tick();
    }
    assert_eq!(snap.target.unwrap().current, 490.0);
    assert_eq!(snap.enemies_alive, 1);
}

#[test]
fn test_player_velocity_clamped_to_speed() {
    let mut engine = SimulationEngine::new(open_arena(vec![light_wave(1)])).unwrap();
    engine.queue_command(PlayerCommand::SetPlayerVelocity {
        velocity: Vec2::new(0.0, 10_000.0),
    });
    engine.tick();
    let session = engine.session();
    let body = session
        .registry()
        .body(session.player().unwrap())
        .unwrap();
    assert!((body.velocity.length() - 200.0).abs() < 1e-3);
}

// ---- Restart ----

#[test]
fn test_restart_builds_fresh_session() {
    let mut engine = SimulationEngine::new(open_arena(vec![light_wave(2)])).unwrap();
    engine.queue_commands([
        PlayerCommand::Purchase {
            item: ItemKind::FirstAid,
        },
        PlayerCommand::StartNewWave,
    ]);
    for _ in 0..10 {
        engine.tick();
    }
    assert_eq!(engine.phase(), WavePhase::Spawning);

    engine.queue_command(PlayerCommand::Restart);
    let snap = engine.tick();
    assert_eq!(snap.phase, WavePhase::Idle);
    assert_eq!(snap.points, 100);
    assert!(snap.owned.is_empty());
    assert_eq!(snap.enemies_alive, 0);
    assert_eq!(snap.time.tick, 1);
}
