//! bazaar-sim - A tick-based auto-battler combat simulator
//!
//! Two boards of items fire on their own cooldowns every 0.1s tick until
//! one side falls. Items carry tiers and enchantments; the engine resolves
//! damage, shields, heals, burn, poison, freeze, slow, haste and the
//! late-fight sandstorm, and batches fights into win-rate analyses.

pub mod combat;
pub mod config;
pub mod data;
pub mod error;
pub mod items;

// Re-export commonly used types
pub use combat::{AnalysisReport, CombatEngine, FightOutcome, Loadout, PlayerStats, Side, Winner};
pub use config::SimConfig;
pub use data::DataManager;
pub use error::{ConfigError, DataError};
pub use items::{Board, Enchantment, Item, ItemTemplate, Stat, Tier};
