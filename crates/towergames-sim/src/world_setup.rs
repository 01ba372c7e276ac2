//! Entity spawn factories.
//!
//! Every role gets its component bundle here, sized and tuned from the
//! session's entity profiles.

use glam::Vec2;
use hecs::Entity;

use towergames_core::components::*;
use towergames_core::config::{EntityProfiles, SessionConfig, WeaponProfile};
use towergames_core::enums::*;
use towergames_core::types::Body;

use crate::registry::Registry;

/// Handles to the unique entities placed at session start.
#[derive(Debug, Clone, Copy)]
pub struct ArenaHandles {
    pub player: Entity,
    pub target: Entity,
}

/// Populate a fresh registry with the arena's static content, the defended
/// target and the player.
pub fn setup_arena(registry: &mut Registry, config: &SessionConfig) -> ArenaHandles {
    let arena = &config.arena;
    let profiles = &config.profiles;

    for rect in &arena.obstacles {
        registry.spawn(Role::Obstacle, Body::new(rect.center, rect.half_extents), ());
    }
    for &position in &arena.hazards {
        registry.spawn(
            Role::Hazard,
            Body::new(position, Vec2::splat(profiles.hazard_half_extent)),
            (),
        );
    }
    for drop in &arena.drops {
        registry.spawn(
            Role::Drop { value: drop.value },
            Body::new(drop.position, Vec2::splat(profiles.drop_half_extent)),
            (),
        );
    }

    let target = spawn_target(registry, profiles, arena.target_position);
    let player = spawn_player(registry, profiles, arena.player_spawn);
    ArenaHandles { player, target }
}

pub fn spawn_player(registry: &mut Registry, profiles: &EntityProfiles, position: Vec2) -> Entity {
    let p = &profiles.player;
    registry.spawn(
        Role::Player,
        Body::new(position, Vec2::splat(p.half_extent)),
        (Health::full(p.max_health, p.cooldown_ms),),
    )
}

pub fn spawn_target(registry: &mut Registry, profiles: &EntityProfiles, position: Vec2) -> Entity {
    let t = &profiles.target;
    registry.spawn(
        Role::DefendedTarget,
        Body::new(position, Vec2::splat(t.half_extent)),
        (Health::full(t.max_health, t.cooldown_ms),),
    )
}

fn weapon(profile: &WeaponProfile, ready_at_ms: u64) -> Weapon {
    Weapon {
        damage: profile.damage,
        range: profile.range,
        interval_ms: profile.interval_ms,
        volley: profile.volley,
        projectile_speed: profile.projectile_speed,
        ready_at_ms,
    }
}

/// Spawn an enemy of `kind`. Ranged enemies carry a weapon that is ready
/// immediately.
pub fn spawn_enemy(
    registry: &mut Registry,
    profiles: &EntityProfiles,
    kind: EnemyKind,
    position: Vec2,
    now_ms: u64,
) -> Entity {
    let p = profiles.enemies.get(kind);
    let body = Body::new(position, Vec2::splat(p.half_extent));
    let core = (Health::full(p.max_health, p.cooldown_ms), Mover { speed: p.speed });
    match &p.weapon {
        Some(w) => registry.spawn(
            Role::Enemy(kind),
            body,
            (core.0, core.1, weapon(w, now_ms)),
        ),
        None => registry.spawn(Role::Enemy(kind), body, core),
    }
}

pub fn spawn_turret(
    registry: &mut Registry,
    profiles: &EntityProfiles,
    kind: TurretKind,
    position: Vec2,
    now_ms: u64,
) -> Entity {
    let p = profiles.turret(kind);
    registry.spawn(
        Role::Turret(kind),
        Body::new(position, Vec2::splat(p.half_extent)),
        (
            Health::full(p.max_health, p.cooldown_ms),
            weapon(&p.weapon, now_ms),
        ),
    )
}

/// Spawn a projectile travelling along `velocity`. The role decides which
/// side fired it.
pub fn spawn_projectile(
    registry: &mut Registry,
    profiles: &EntityProfiles,
    role: Role,
    origin: Vec2,
    velocity: Vec2,
    now_ms: u64,
) -> Entity {
    registry.spawn(
        role,
        Body::new(origin, Vec2::splat(profiles.projectile_half_extent)).with_velocity(velocity),
        (Lifetime {
            expires_at_ms: now_ms + profiles.projectile_lifetime_ms,
        },),
    )
}
