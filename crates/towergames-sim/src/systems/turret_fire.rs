//! Turret fire control: each turret engages the nearest enemy in range when
//! its weapon is ready.

use glam::Vec2;
use hecs::Entity;
use log::trace;

use towergames_core::components::{Role, Weapon};
use towergames_core::config::EntityProfiles;
use towergames_core::constants::VOLLEY_SPREAD;
use towergames_core::enums::{Group, Shooter};

use crate::registry::Registry;
use crate::world_setup;

/// Nearest alive enemy within `range` of `from`. Ties go to the enemy that
/// was registered first.
pub fn nearest_enemy(registry: &Registry, from: Vec2, range: f32) -> Option<(Entity, Vec2)> {
    let mut best: Option<(Entity, Vec2, f32)> = None;
    for &enemy in registry.members(Group::Enemies) {
        if !registry.is_alive(enemy) {
            continue;
        }
        let Some(body) = registry.body(enemy) else {
            continue;
        };
        let dist = from.distance(body.position);
        if dist > range {
            continue;
        }
        if best.map_or(true, |(_, _, d)| dist < d) {
            best = Some((enemy, body.position, dist));
        }
    }
    best.map(|(e, p, _)| (e, p))
}

/// Unit headings for a volley of `count` projectiles fanned around `aim`.
pub fn volley_headings(aim: Vec2, count: u32) -> Vec<Vec2> {
    let base = aim.y.atan2(aim.x);
    let mid = (count.max(1) - 1) as f32 / 2.0;
    (0..count.max(1))
        .map(|i| {
            let angle = base + (i as f32 - mid) * VOLLEY_SPREAD;
            Vec2::from_angle(angle)
        })
        .collect()
}

pub fn run(registry: &mut Registry, profiles: &EntityProfiles, now_ms: u64) {
    let mut shots: Vec<(Role, Vec2, Vec2)> = Vec::new();

    let turrets = registry.members(Group::Turrets).to_vec();
    for turret in turrets {
        if !registry.is_alive(turret) {
            continue;
        }
        let (Some(Role::Turret(kind)), Some(body)) = (registry.role(turret), registry.body(turret))
        else {
            continue;
        };
        let Some(weapon) = registry.world().get::<&Weapon>(turret).ok().map(|w| *w) else {
            continue;
        };
        if now_ms < weapon.ready_at_ms {
            continue;
        }
        let Some((enemy, enemy_pos)) = nearest_enemy(registry, body.position, weapon.range) else {
            continue;
        };

        let aim = enemy_pos - body.position;
        let role = Role::PlayerProjectile {
            shooter: Shooter::Turret(kind),
            damage: weapon.damage,
        };
        for heading in volley_headings(aim, weapon.volley) {
            shots.push((role, body.position, heading * weapon.projectile_speed));
        }
        if let Ok(w) = registry.world_mut().query_one_mut::<&mut Weapon>(turret) {
            w.ready_at_ms = now_ms + w.interval_ms;
        }
        trace!("{kind:?} turret {turret:?} engaging {enemy:?}");
    }

    for (role, origin, velocity) in shots {
        world_setup::spawn_projectile(registry, profiles, role, origin, velocity, now_ms);
    }
}
