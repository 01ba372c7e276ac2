//! Error taxonomy. Nothing here is fatal to a session: every failure leaves
//! state unchanged and is surfaced to the caller.

use thiserror::Error;

use crate::enums::{ItemKind, WavePhase};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GameError {
    /// Negative, NaN or infinite damage amount.
    #[error("invalid damage amount: {amount}")]
    InvalidDamage { amount: f64 },

    #[error("insufficient funds: have {have}, need {cost}")]
    InsufficientFunds { have: u32, cost: u32 },

    #[error("no {item:?} in inventory")]
    NotOwned { item: ItemKind },

    /// The entity was already removed. Callers treat this as a no-op.
    #[error("entity is no longer registered")]
    StaleEntityReference,

    #[error("wave count {requested} outside 1..={available}")]
    InvalidWaveCount { requested: usize, available: usize },

    #[error("not allowed during {phase:?}")]
    InvalidPhase { phase: WavePhase },

    #[error("no damaged turret to repair")]
    NothingToRepair,

    #[error("no player in the session")]
    NoPlayer,

    #[error("invalid session config: {0}")]
    Config(String),
}

impl From<serde_json::Error> for GameError {
    fn from(err: serde_json::Error) -> Self {
        GameError::Config(err.to_string())
    }
}
