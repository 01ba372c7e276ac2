#[cfg(test)]
mod tests {
    use glam::Vec2;

    use crate::commands::PlayerCommand;
    use crate::components::{Health, Role};
    use crate::config::*;
    use crate::enums::*;
    use crate::error::GameError;
    use crate::events::{GameEvent, SessionResult, WaveReport};
    use crate::state::HudSnapshot;
    use crate::types::{Body, Rect, SimTime};

    /// Verify all groups round-trip through serde_json.
    #[test]
    fn test_group_serde() {
        for g in Group::ALL {
            let json = serde_json::to_string(&g).unwrap();
            let back: Group = serde_json::from_str(&json).unwrap();
            assert_eq!(g, back);
        }
        assert_eq!(
            serde_json::to_string(&Group::PlayerProjectiles).unwrap(),
            "\"player_projectiles\""
        );
    }

    #[test]
    fn test_group_index_is_dense() {
        for (i, g) in Group::ALL.iter().enumerate() {
            assert_eq!(g.index(), i);
        }
    }

    #[test]
    fn test_role_groups() {
        assert_eq!(Role::Player.group(), Group::Player);
        assert_eq!(Role::Turret(TurretKind::Large).group(), Group::Turrets);
        assert_eq!(Role::Enemy(EnemyKind::Heavy).group(), Group::Enemies);
        assert_eq!(
            Role::PlayerProjectile {
                shooter: Shooter::Player,
                damage: 10.0
            }
            .group(),
            Group::PlayerProjectiles
        );
        assert_eq!(Role::Drop { value: 5 }.group(), Group::Drops);
    }

    #[test]
    fn test_only_defended_target_refuses_forced_removal() {
        assert!(!Role::DefendedTarget.permits_forced_removal());
        assert!(Role::Player.permits_forced_removal());
        assert!(Role::Enemy(EnemyKind::Light).permits_forced_removal());
        assert!(Role::Turret(TurretKind::Small).permits_forced_removal());
    }

    #[test]
    fn test_health_cooldown_window() {
        let mut h = Health::full(100.0, 250);
        assert!(!h.cooling_down(0));
        h.last_damage_at_ms = Some(1000);
        assert!(h.cooling_down(1000));
        assert!(h.cooling_down(1249));
        assert!(!h.cooling_down(1250));
        assert!((h.ratio() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_zero_cooldown_never_blocks() {
        let mut h = Health::full(10.0, 0);
        h.last_damage_at_ms = Some(5);
        assert!(!h.cooling_down(5));
    }

    #[test]
    fn test_sim_time_advance() {
        let mut t = SimTime::default();
        t.advance(16);
        t.advance(16);
        assert_eq!(t.tick, 2);
        assert_eq!(t.elapsed_ms, 32);
    }

    #[test]
    fn test_body_with_velocity() {
        let b = Body::new(Vec2::new(10.0, 20.0), Vec2::new(2.0, 3.0)).with_velocity(Vec2::X);
        assert_eq!(b.velocity, Vec2::X);
        assert_eq!(b.half_extents, Vec2::new(2.0, 3.0));
    }

    #[test]
    fn test_rect_contains_edges() {
        let r = Rect::new(Vec2::ZERO, Vec2::new(5.0, 5.0));
        assert!(r.contains(Vec2::new(5.0, -5.0)));
        assert!(!r.contains(Vec2::new(5.1, 0.0)));
    }

    #[test]
    fn test_command_serde() {
        let cmds = vec![
            PlayerCommand::StartNewWave,
            PlayerCommand::Purchase {
                item: ItemKind::LargeTurret,
            },
            PlayerCommand::DeployTurret {
                kind: TurretKind::Small,
                position: Vec2::new(1.0, 2.0),
            },
            PlayerCommand::RepairTurret,
            PlayerCommand::ApplyHeal,
            PlayerCommand::FireShot {
                target: Vec2::new(3.0, 4.0),
            },
            PlayerCommand::SetPlayerVelocity {
                velocity: Vec2::X,
            },
            PlayerCommand::Restart,
        ];
        for cmd in cmds {
            let json = serde_json::to_string(&cmd).unwrap();
            let back: PlayerCommand = serde_json::from_str(&json).unwrap();
            assert_eq!(cmd, back);
        }
    }

    #[test]
    fn test_command_wire_format() {
        let cmd: PlayerCommand =
            serde_json::from_str(r#"{"type":"Purchase","item":"first_aid"}"#).unwrap();
        assert_eq!(
            cmd,
            PlayerCommand::Purchase {
                item: ItemKind::FirstAid
            }
        );
    }

    #[test]
    fn test_event_serde() {
        let events = vec![
            GameEvent::WaveCleared(WaveReport {
                wave_index: 2,
                elapsed_ms: 12_000,
                accuracy_pct: 75,
            }),
            GameEvent::SessionEnded(SessionResult {
                outcome: SessionOutcome::Lost,
                waves_cleared: 3,
                waves_total: 11,
                accuracy_pct: 40,
                reward_points: 120,
                elapsed_ms: 60_000,
            }),
            GameEvent::EntityDamaged {
                group: Group::DefendedTargets,
                amount: 30.0,
                remaining: 470.0,
            },
        ];
        for e in events {
            let json = serde_json::to_string(&e).unwrap();
            let back: GameEvent = serde_json::from_str(&json).unwrap();
            assert_eq!(e, back);
        }
    }

    #[test]
    fn test_snapshot_default_serializes() {
        let snap = HudSnapshot::default();
        let json = serde_json::to_string(&snap).unwrap();
        let back: HudSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(snap, back);
    }

    // ---- Config ----

    #[test]
    fn test_default_config_round_trip() {
        let config = SessionConfig::default();
        let json = config.to_json_pretty().unwrap();
        let back = SessionConfig::from_json(&json).unwrap();
        assert_eq!(config, back);
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = SessionConfig::from_json(r#"{"seed": 7, "costs": {"first_aid": 5}}"#).unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.costs.first_aid, 5);
        assert_eq!(config.costs.small_turret, CostTable::default().small_turret);
        assert_eq!(config.waves.len(), 11);
        assert_eq!(config.collision.len(), 16);
    }

    #[test]
    fn test_malformed_config_is_config_error() {
        let err = SessionConfig::from_json("{not json").unwrap_err();
        assert!(matches!(err, GameError::Config(_)));
    }

    #[test]
    fn test_zero_tick_rejected() {
        let err = SessionConfig::from_json(r#"{"tick_ms": 0}"#).unwrap_err();
        assert!(matches!(err, GameError::Config(_)));
    }

    #[test]
    fn test_negative_first_aid_rejected() {
        let err =
            SessionConfig::from_json(r#"{"profiles": {"first_aid_heal": -5}}"#).unwrap_err();
        assert!(matches!(err, GameError::Config(_)));
    }

    #[test]
    fn test_invalid_rule_damage_rejected() {
        let text = r#"{"collision": [{
            "a": "hazards",
            "b": "enemies",
            "mode": {"mode": "consuming", "damage": {"kind": "flat", "amount": -1.0}}
        }]}"#;
        assert!(matches!(
            SessionConfig::from_json(text),
            Err(GameError::Config(_))
        ));

        let mut config = SessionConfig::default();
        config.collision[3] = CollisionRule::blocking_with(
            Group::Player,
            Group::Enemies,
            ContactEffect {
                damaged: Side::A,
                damage: DamageSpec::PerEnemy(EnemyTable {
                    light: 10.0,
                    heavy: f64::NAN,
                    ranged: 5.0,
                }),
                destroyed: Some(Side::B),
            },
        );
        assert!(config.validate().is_err());
        assert!(SessionConfig::default().validate().is_ok());
    }

    #[test]
    fn test_default_waves_shape() {
        let waves = default_waves();
        assert_eq!(waves.len(), 11);
        assert_eq!(waves[0].count(EnemyKind::Light), 2);
        assert_eq!(waves[0].total_enemies(), 4);
        assert_eq!(waves[1].count(EnemyKind::Light), 0);
        assert_eq!(waves[10].cadence_tier, 7);
        assert_eq!(waves[10].total_enemies(), 120);
    }

    #[test]
    fn test_selected_waves_truncates_in_order() {
        let config = SessionConfig {
            wave_count: Some(3),
            ..Default::default()
        };
        let waves = config.selected_waves().unwrap();
        assert_eq!(waves.len(), 3);
        assert_eq!(waves[..], config.waves[..3]);
    }

    #[test]
    fn test_selected_waves_none_means_all() {
        let config = SessionConfig::default();
        assert_eq!(config.selected_waves().unwrap().len(), 11);
    }

    #[test]
    fn test_selected_waves_rejects_out_of_range() {
        for requested in [0, 12] {
            let config = SessionConfig {
                wave_count: Some(requested),
                ..Default::default()
            };
            assert_eq!(
                config.selected_waves().unwrap_err(),
                GameError::InvalidWaveCount {
                    requested,
                    available: 11
                }
            );
        }
    }

    #[test]
    fn test_damage_spec_resolution() {
        let heavy = Role::Enemy(EnemyKind::Heavy);
        let shot = Role::EnemyProjectile { damage: 7.0 };
        let table = DamageSpec::PerEnemy(EnemyTable {
            light: 10.0,
            heavy: 20.0,
            ranged: 5.0,
        });
        assert_eq!(table.resolve(&heavy), 20.0);
        assert_eq!(table.resolve(&shot), 0.0);
        assert_eq!(DamageSpec::Carried.resolve(&shot), 7.0);
        assert_eq!(DamageSpec::Carried.resolve(&heavy), 0.0);
        assert_eq!(DamageSpec::Flat { amount: 3.0 }.resolve(&heavy), 3.0);
        assert_eq!(DamageSpec::None.resolve(&heavy), 0.0);
    }

    #[test]
    fn test_default_rule_table_order() {
        let rules = default_collision_rules();
        assert_eq!((rules[0].a, rules[0].b), (Group::Player, Group::Obstacles));
        assert_eq!((rules[3].a, rules[3].b), (Group::Player, Group::Enemies));
        assert_eq!(
            (rules[15].a, rules[15].b),
            (Group::Drops, Group::Player)
        );
        // Every consuming row has a projectile-like or drop group on side A.
        for rule in &rules {
            if let CollisionMode::Consuming { .. } = rule.mode {
                assert!(rule.a.is_projectile() || rule.a == Group::Drops);
            }
        }
    }

    #[test]
    fn test_collision_rule_json_shape() {
        let rule = CollisionRule::consuming(
            Group::EnemyProjectiles,
            Group::Turrets,
            DamageSpec::Flat { amount: 5.0 },
        );
        let json = serde_json::to_value(rule).unwrap();
        assert_eq!(json["mode"]["mode"], "consuming");
        assert_eq!(json["mode"]["damage"]["kind"], "flat");
        let back: CollisionRule = serde_json::from_value(json).unwrap();
        assert_eq!(rule, back);
    }

    #[test]
    fn test_cost_table_lookup() {
        let costs = CostTable::default();
        for item in ItemKind::ALL {
            assert!(costs.cost(item) > 0);
        }
        assert_eq!(costs.cost(TurretKind::Large.item()), costs.large_turret);
    }

    #[test]
    fn test_phase_predicates() {
        assert!(WavePhase::Idle.is_intermission());
        assert!(WavePhase::Cleared.is_intermission());
        assert!(!WavePhase::Spawning.is_intermission());
        assert!(WavePhase::Won.is_terminal());
        assert!(WavePhase::Lost.is_terminal());
        assert!(!WavePhase::Cleared.is_terminal());
    }
}
