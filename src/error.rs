//! Error types
//!
//! Failures here come from malformed data or configuration and surface at
//! load time. The simulation itself never fails.

use std::path::PathBuf;

use thiserror::Error;

use crate::items::Tier;

/// Item and monster data errors
#[derive(Debug, Error)]
pub enum DataError {
    #[error("item '{item}' has no {tier} tier row")]
    MissingTier { item: String, tier: Tier },

    #[error("invalid item '{item}': {reason}")]
    InvalidItem { item: String, reason: String },

    #[error("unknown item '{0}'")]
    UnknownItem(String),

    #[error("unknown monster '{0}'")]
    UnknownMonster(String),

    #[error("duplicate item name '{0}' in loadout")]
    DuplicateName(String),

    #[error("no room for '{item}' at slot {slot}")]
    NoRoom { item: String, slot: usize },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },

    #[error("failed to serialize {what}: {source}")]
    Serialize {
        what: &'static str,
        #[source]
        source: ron::Error,
    },
}

/// Simulation configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}
