//! Error types for the pet game.
//!
//! Every business-rule violation is a `GameError` returned to the caller.
//! None of them leave `ProgressionState` partially updated.

use thiserror::Error;

use super::state::{InstanceId, WorldId};

/// Coarse classification of a failure, for presentation in the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    InsufficientFunds,
    InsufficientCapacity,
    InsufficientIngredients,
    InvalidTarget,
    ConfigurationError,
    AlreadyInProgress,
    FeatureLocked,
    RateLimited,
}

/// Errors raised by game operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GameError {
    /// The balance (resource or rebirth levels) does not cover the cost.
    #[error("insufficient funds: need {needed}, have {available}")]
    InsufficientFunds { needed: f64, available: f64 },

    /// The pet inventory or the equip slots are full.
    #[error("inventory full: {current}/{capacity}")]
    InsufficientCapacity { current: usize, capacity: usize },

    /// Not enough unequipped pets of the required variant to craft.
    #[error("need {needed} unequipped ingredients, have {available}")]
    InsufficientIngredients { needed: usize, available: usize },

    /// Unknown upgrade/world/species/pet, a level cap, or an invalid amount.
    #[error("invalid target: {0}")]
    InvalidTarget(String),

    /// A content table is broken. This is a data error, not a player error.
    #[error(transparent)]
    Configuration(#[from] ConfigError),

    /// A hatch round is already running.
    #[error("a hatch round is already in progress")]
    AlreadyInProgress,

    /// The rebirth-shop perk unlocking this feature has not been bought.
    #[error("feature locked: requires rebirth upgrade `{0}`")]
    FeatureLocked(&'static str),

    /// Input arrived faster than the configured click rate.
    #[error("clicking too fast")]
    RateLimited,
}

impl GameError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GameError::InsufficientFunds { .. } => ErrorKind::InsufficientFunds,
            GameError::InsufficientCapacity { .. } => ErrorKind::InsufficientCapacity,
            GameError::InsufficientIngredients { .. } => ErrorKind::InsufficientIngredients,
            GameError::InvalidTarget(_) => ErrorKind::InvalidTarget,
            GameError::Configuration(_) => ErrorKind::ConfigurationError,
            GameError::AlreadyInProgress => ErrorKind::AlreadyInProgress,
            GameError::FeatureLocked(_) => ErrorKind::FeatureLocked,
            GameError::RateLimited => ErrorKind::RateLimited,
        }
    }

    pub(crate) fn unknown_pet(id: &InstanceId) -> Self {
        GameError::InvalidTarget(format!("unknown pet instance {id}"))
    }
}

/// Errors in static content tables or engine settings.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    /// A reward pool whose weights sum to zero or less.
    #[error("egg pool (world {world}, tier {tier}) has non-positive total weight {total}")]
    EmptyPool { world: WorldId, tier: u32, total: f64 },

    /// A reward pool entry with a negative or non-finite weight.
    #[error("species `{species}` has invalid weight {weight}")]
    InvalidWeight { species: String, weight: f64 },

    /// No egg tier with this id exists in the world.
    #[error("world {world} has no egg tier {tier}")]
    UnknownEggTier { world: WorldId, tier: u32 },

    /// Engine timing constants that would stall the auto-hatch loop.
    #[error("invalid engine settings: {0}")]
    InvalidSettings(String),

    /// A configuration document that failed to parse.
    #[error("malformed configuration document: {0}")]
    Malformed(String),
}

/// Errors while reading or writing a save blob.
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("save serialization failed: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("save document is corrupt: {0}")]
    Corrupt(#[source] serde_json::Error),
}
