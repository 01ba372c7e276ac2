//! ECS components for hecs entities.
//!
//! Components are plain data. Behaviour lives in the simulation crate's
//! lifecycle module and systems.

use serde::{Deserialize, Serialize};

use crate::enums::*;

/// Role variant of an entity. Determines its primary group, its death
/// effect and whether it can be forcibly removed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Role {
    Player,
    Turret(TurretKind),
    DefendedTarget,
    Enemy(EnemyKind),
    PlayerProjectile { shooter: Shooter, damage: f64 },
    EnemyProjectile { damage: f64 },
    Hazard,
    Drop { value: u32 },
    Obstacle,
}

impl Role {
    /// Primary group for this role.
    pub fn group(&self) -> Group {
        match self {
            Role::Player => Group::Player,
            Role::Turret(_) => Group::Turrets,
            Role::DefendedTarget => Group::DefendedTargets,
            Role::Enemy(_) => Group::Enemies,
            Role::PlayerProjectile { .. } => Group::PlayerProjectiles,
            Role::EnemyProjectile { .. } => Group::EnemyProjectiles,
            Role::Hazard => Group::Hazards,
            Role::Drop { .. } => Group::Drops,
            Role::Obstacle => Group::Obstacles,
        }
    }

    /// Whether `kill()` may remove this entity. The defended target can only
    /// leave `Alive` through damage.
    pub fn permits_forced_removal(&self) -> bool {
        !matches!(self, Role::DefendedTarget)
    }

    pub fn enemy_kind(&self) -> Option<EnemyKind> {
        match self {
            Role::Enemy(kind) => Some(*kind),
            _ => None,
        }
    }

    /// Damage carried by a projectile, if any.
    pub fn carried_damage(&self) -> Option<f64> {
        match self {
            Role::PlayerProjectile { damage, .. } | Role::EnemyProjectile { damage } => {
                Some(*damage)
            }
            _ => None,
        }
    }
}

/// Lifecycle state component, present on every entity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Life {
    pub state: LifeState,
}

impl Life {
    pub fn is_alive(&self) -> bool {
        self.state == LifeState::Alive
    }
}

/// Health of a damageable entity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Health {
    pub current: f64,
    pub max: f64,
    /// Simulation time of the last damage that was applied.
    pub last_damage_at_ms: Option<u64>,
    /// Window after an applied hit during which further hits are rejected.
    pub cooldown_ms: u64,
}

impl Health {
    pub fn full(max: f64, cooldown_ms: u64) -> Self {
        Self {
            current: max,
            max,
            last_damage_at_ms: None,
            cooldown_ms,
        }
    }

    /// Fraction of max health remaining (0.0 - 1.0).
    pub fn ratio(&self) -> f64 {
        if self.max <= 0.0 {
            0.0
        } else {
            self.current / self.max
        }
    }

    /// True while the cooldown window from the last applied hit is open.
    pub fn cooling_down(&self, now_ms: u64) -> bool {
        match self.last_damage_at_ms {
            Some(last) => now_ms.saturating_sub(last) < self.cooldown_ms,
            None => false,
        }
    }
}

/// Automatic weapon carried by turrets and ranged enemies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weapon {
    pub damage: f64,
    pub range: f32,
    pub interval_ms: u64,
    /// Projectiles per volley.
    pub volley: u32,
    pub projectile_speed: f32,
    /// Simulation time at which the weapon may fire again.
    pub ready_at_ms: u64,
}

/// Walking speed for enemies (units per second).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Mover {
    pub speed: f32,
}

/// Simulation time after which a projectile is discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lifetime {
    pub expires_at_ms: u64,
}
