//! Enemy behaviour: walk toward the defended target, ranged enemies stop at
//! weapon range and shoot instead.

use glam::Vec2;
use hecs::Entity;

use towergames_core::components::{Life, Mover, Role, Weapon};
use towergames_core::config::EntityProfiles;
use towergames_core::enums::Group;
use towergames_core::types::Body;

use crate::registry::Registry;
use crate::world_setup;

pub fn run(
    registry: &mut Registry,
    profiles: &EntityProfiles,
    target: Option<Entity>,
    now_ms: u64,
) {
    let Some(goal) = target
        .filter(|&t| registry.is_alive(t))
        .and_then(|t| registry.body(t))
        .map(|b| b.position)
    else {
        // Nothing left to walk toward.
        for (_entity, (_mover, body)) in registry.world_mut().query_mut::<(&Mover, &mut Body)>() {
            body.velocity = Vec2::ZERO;
        }
        return;
    };

    let mut shots: Vec<(Vec2, Vec2, f64)> = Vec::new();

    let enemies = registry.members(Group::Enemies).to_vec();
    for entity in enemies {
        let Ok((life, mover, body, weapon)) = registry
            .world_mut()
            .query_one_mut::<(&Life, &Mover, &mut Body, Option<&mut Weapon>)>(entity)
        else {
            continue;
        };
        if !life.is_alive() {
            continue;
        }

        let to_goal = goal - body.position;
        let heading = to_goal.normalize_or_zero();

        match weapon {
            Some(weapon) if to_goal.length() <= weapon.range => {
                body.velocity = Vec2::ZERO;
                if now_ms >= weapon.ready_at_ms {
                    weapon.ready_at_ms = now_ms + weapon.interval_ms;
                    shots.push((
                        body.position,
                        heading * weapon.projectile_speed,
                        weapon.damage,
                    ));
                }
            }
            _ => body.velocity = heading * mover.speed,
        }
    }

    for (origin, velocity, damage) in shots {
        world_setup::spawn_projectile(
            registry,
            profiles,
            Role::EnemyProjectile { damage },
            origin,
            velocity,
            now_ms,
        );
    }
}
