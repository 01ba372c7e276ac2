//! Health and lifecycle transitions: `Alive -> Dying -> Removed`.
//!
//! Every health change in the simulation goes through this module.

use hecs::Entity;
use log::{debug, warn};

use towergames_core::components::{Health, Life, Role};
use towergames_core::enums::{EnemyKind, LifeState};
use towergames_core::GameError;

use crate::registry::{Killable, Registry};

/// Consequence of a role reaching zero health.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeathEffect {
    /// Enemy defeated by damage; the kind determines the reward.
    Reward(EnemyKind),
    /// The defended target fell.
    SessionLoss,
    /// Nothing beyond removal.
    Removal,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DamageOutcome {
    /// Not alive, no health, or inside the cooldown window. Nothing changed.
    Rejected,
    Applied { remaining: f64 },
    /// The hit took health to zero. Returned exactly once per entity.
    Died { effect: DeathEffect },
}

fn death_effect(role: &Role) -> DeathEffect {
    match role {
        Role::Enemy(kind) => DeathEffect::Reward(*kind),
        Role::DefendedTarget => DeathEffect::SessionLoss,
        _ => DeathEffect::Removal,
    }
}

/// Apply `amount` damage at simulation time `now_ms`.
pub fn damage(
    registry: &mut Registry,
    entity: Entity,
    amount: f64,
    now_ms: u64,
) -> Result<DamageOutcome, GameError> {
    if !amount.is_finite() || amount < 0.0 {
        warn!("rejecting damage of {amount} to {entity:?}");
        return Err(GameError::InvalidDamage { amount });
    }

    let (role, life, health) = registry
        .world_mut()
        .query_one_mut::<(&Role, &mut Life, Option<&mut Health>)>(entity)
        .map_err(|_| GameError::StaleEntityReference)?;

    let Some(health) = health else {
        return Ok(DamageOutcome::Rejected);
    };
    if !life.is_alive() {
        debug!("{entity:?} is {:?}, damage ignored", life.state);
        return Ok(DamageOutcome::Rejected);
    }
    if health.cooling_down(now_ms) {
        debug!("{entity:?} cooling down, {amount} damage ignored");
        return Ok(DamageOutcome::Rejected);
    }

    health.current = (health.current - amount).clamp(0.0, health.max);
    health.last_damage_at_ms = Some(now_ms);

    if health.current <= 0.0 {
        life.state = LifeState::Dying;
        let effect = death_effect(role);
        debug!("{entity:?} ({:?}) died: {effect:?}", role.group());
        Ok(DamageOutcome::Died { effect })
    } else {
        Ok(DamageOutcome::Applied {
            remaining: health.current,
        })
    }
}

/// Forced removal. Returns `false` if the entity was already leaving.
pub fn kill(registry: &mut Registry, target: Killable) -> Result<bool, GameError> {
    let life = registry
        .world_mut()
        .query_one_mut::<&mut Life>(target.entity())
        .map_err(|_| GameError::StaleEntityReference)?;
    if !life.is_alive() {
        return Ok(false);
    }
    life.state = LifeState::Dying;
    Ok(true)
}

/// Raise health by `amount`, clamped to max. Returns the amount restored,
/// zero for entities that are not alive or have no health.
pub fn heal(registry: &mut Registry, entity: Entity, amount: f64) -> Result<f64, GameError> {
    if !amount.is_finite() || amount < 0.0 {
        warn!("rejecting heal of {amount} for {entity:?}");
        return Err(GameError::InvalidDamage { amount });
    }
    let (life, health) = registry
        .world_mut()
        .query_one_mut::<(&Life, Option<&mut Health>)>(entity)
        .map_err(|_| GameError::StaleEntityReference)?;
    match health {
        Some(health) if life.is_alive() => {
            let before = health.current;
            health.current = (health.current + amount).min(health.max);
            Ok(health.current - before)
        }
        _ => Ok(0.0),
    }
}

/// `Dying -> Removed`: take the entity out of the registry.
pub fn finalize(registry: &mut Registry, entity: Entity) -> Result<(), GameError> {
    let life = registry
        .world_mut()
        .query_one_mut::<&mut Life>(entity)
        .map_err(|_| GameError::StaleEntityReference)?;
    life.state = LifeState::Removed;
    registry.despawn(entity)
}
