//! Combat log
//!
//! Timestamped, categorized feed for presentation, plus internal events
//! for assertions. Out-of-ammo attempts are events only and never reach
//! the feed.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::scheduler::ticks_to_seconds;
use super::side::Side;

/// Whether human-readable feed entries are recorded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LogMode {
    #[default]
    Off,
    Feed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogCategory {
    Default,
    Trigger,
    Damage,
    Heal,
    Shield,
    Poison,
    Burn,
    Freeze,
    State,
    Effect,
}

impl LogCategory {
    pub fn name(&self) -> &'static str {
        match self {
            LogCategory::Default => "default",
            LogCategory::Trigger => "trigger",
            LogCategory::Damage => "damage",
            LogCategory::Heal => "heal",
            LogCategory::Shield => "shield",
            LogCategory::Poison => "poison",
            LogCategory::Burn => "burn",
            LogCategory::Freeze => "freeze",
            LogCategory::State => "state",
            LogCategory::Effect => "effect",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub tick: u64,
    /// Simulated seconds
    pub timestamp: f64,
    pub category: LogCategory,
    pub message: String,
}

/// Structured events, recorded regardless of [`LogMode`]
#[derive(Debug, Clone, PartialEq)]
pub enum CombatEvent {
    Triggered { tick: u64, side: Side, item: String },
    OutOfAmmo { tick: u64, side: Side, item: String },
    Frozen { tick: u64, side: Side, item: String, until: u64 },
    Sandstorm { tick: u64, damage: f64 },
    FightEnded { tick: u64, winner: Winner },
}

/// Result of a single fight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Winner {
    Player,
    Monster,
    Draw,
}

#[derive(Debug, Clone, Default)]
pub struct CombatLog {
    mode: LogMode,
    entries: Vec<LogEntry>,
    events: Vec<CombatEvent>,
}

impl CombatLog {
    pub fn new(mode: LogMode) -> Self {
        Self {
            mode,
            entries: Vec::new(),
            events: Vec::new(),
        }
    }

    pub fn mode(&self) -> LogMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: LogMode) {
        self.mode = mode;
    }

    pub fn is_recording(&self) -> bool {
        self.mode == LogMode::Feed
    }

    /// Add a feed entry (dropped when the feed is off)
    pub fn push(&mut self, tick: u64, category: LogCategory, message: impl Into<String>) {
        if !self.is_recording() {
            return;
        }
        self.entries.push(LogEntry {
            tick,
            timestamp: ticks_to_seconds(tick),
            category,
            message: message.into(),
        });
    }

    pub fn record(&mut self, event: CombatEvent) {
        self.events.push(event);
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn events(&self) -> &[CombatEvent] {
        &self.events
    }

    /// Feed entries grouped by tick, in order
    pub fn grouped(&self) -> BTreeMap<u64, Vec<&LogEntry>> {
        let mut groups: BTreeMap<u64, Vec<&LogEntry>> = BTreeMap::new();
        for entry in &self.entries {
            groups.entry(entry.tick).or_default().push(entry);
        }
        groups
    }

    /// Render the grouped feed as plain text
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (tick, entries) in self.grouped() {
            out.push_str(&format!("[{:>5.1}s]\n", ticks_to_seconds(tick)));
            for entry in entries {
                out.push_str(&format!("  {:<7} {}\n", entry.category.name(), entry.message));
            }
        }
        out
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.events.clear();
    }
}
