//! Combat system

pub mod scheduler;
pub mod side;
pub mod damage;
pub mod status;
pub mod log;
pub mod engine;
pub mod triggers;

pub use damage::{DamageResult, HealOutcome};
pub use engine::{AnalysisReport, CombatEngine, FightOutcome, TriggerCount};
pub use log::{CombatEvent, CombatLog, LogCategory, LogEntry, LogMode, Winner};
pub use scheduler::{seconds_to_ticks, ticks_to_seconds, PendingEffect, StatusKind, TickScheduler};
pub use side::{CombatSide, Loadout, PlayerStats, Side};
pub use triggers::TriggerOutcome;
