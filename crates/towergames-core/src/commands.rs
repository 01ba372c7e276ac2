//! Player commands sent from the HUD/input collaborator to the simulation.
//!
//! Commands are queued and processed at the next tick boundary.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::enums::*;

/// All possible player actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    // --- Wave control ---
    /// Close the purchase window and start the next wave.
    StartNewWave,

    // --- Shop ---
    /// Buy one unit of an item at the configured cost.
    Purchase { item: ItemKind },
    /// Place an owned turret at a world position.
    DeployTurret { kind: TurretKind, position: Vec2 },
    /// Spend a hammer to restore the most damaged turret to full health.
    RepairTurret,
    /// Spend a first-aid charge to heal the player.
    ApplyHeal,

    // --- Combat ---
    /// Fire a player projectile toward a world position.
    FireShot { target: Vec2 },
    /// Set the player's velocity (units per second).
    SetPlayerVelocity { velocity: Vec2 },

    // --- Session ---
    /// Discard the session and start over at wave 0.
    Restart,
}
