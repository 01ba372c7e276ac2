//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Named partition of entities sharing a collision/role category.
///
/// Every entity belongs to exactly one primary group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Group {
    Player,
    Obstacles,
    Drops,
    PlayerProjectiles,
    EnemyProjectiles,
    Enemies,
    Hazards,
    DefendedTargets,
    Turrets,
}

impl Group {
    pub const COUNT: usize = 9;

    pub const ALL: [Group; Group::COUNT] = [
        Group::Player,
        Group::Obstacles,
        Group::Drops,
        Group::PlayerProjectiles,
        Group::EnemyProjectiles,
        Group::Enemies,
        Group::Hazards,
        Group::DefendedTargets,
        Group::Turrets,
    ];

    /// Dense index for per-group storage.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Groups whose members are consumed on contact.
    pub fn is_projectile(self) -> bool {
        matches!(
            self,
            Group::PlayerProjectiles | Group::EnemyProjectiles | Group::Hazards
        )
    }
}

/// Enemy subtype. Replaces the name-string checks of collision callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyKind {
    /// Fast, fragile melee enemy.
    Light,
    /// Slow, tough melee enemy.
    Heavy,
    /// Keeps its distance and lobs projectiles at the defended target.
    Ranged,
}

impl EnemyKind {
    /// Declaration order, also the round-robin order of spawn queues.
    pub const ALL: [EnemyKind; 3] = [EnemyKind::Light, EnemyKind::Heavy, EnemyKind::Ranged];
}

/// Defensive tower variants sold in the shop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurretKind {
    Small,
    Large,
}

impl TurretKind {
    /// Inventory item consumed when deploying this turret.
    pub fn item(self) -> ItemKind {
        match self {
            TurretKind::Small => ItemKind::SmallTurret,
            TurretKind::Large => ItemKind::LargeTurret,
        }
    }
}

/// Purchasable inventory items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    SmallTurret,
    LargeTurret,
    RepairHammer,
    FirstAid,
}

impl ItemKind {
    pub const ALL: [ItemKind; 4] = [
        ItemKind::SmallTurret,
        ItemKind::LargeTurret,
        ItemKind::RepairHammer,
        ItemKind::FirstAid,
    ];
}

/// Who fired a player-side projectile. Only player shots count toward accuracy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shooter {
    Player,
    Turret(TurretKind),
}

/// Entity lifecycle. `Alive` is initial; nothing re-enters `Alive`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifeState {
    #[default]
    Alive,
    /// Health hit zero or forced removal was requested; awaiting cleanup.
    Dying,
    /// Cleanup ran; the entity is gone from the registry.
    Removed,
}

/// Wave scheduler phase (top-level session state).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WavePhase {
    /// Before the first wave.
    #[default]
    Idle,
    /// Enemies are being released and fought.
    Spawning,
    /// Wave finished; purchase window open until the next `StartNewWave`.
    Cleared,
    /// All configured waves cleared.
    Won,
    /// The defended target was destroyed.
    Lost,
}

impl WavePhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, WavePhase::Won | WavePhase::Lost)
    }

    /// Between waves: the shop is open.
    pub fn is_intermission(self) -> bool {
        matches!(self, WavePhase::Idle | WavePhase::Cleared)
    }
}

/// Final outcome handed to the session collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionOutcome {
    Won,
    Lost,
}

/// Side of a collision rule row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    A,
    B,
}
