//! Combat sides
//!
//! Health, shield, regeneration and DoT accumulators for one side of a
//! fight, together with its board.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::items::{Board, BOARD_SLOTS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Side {
    Player,
    Monster,
}

impl Side {
    pub fn opponent(&self) -> Side {
        match self {
            Side::Player => Side::Monster,
            Side::Monster => Side::Player,
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Side::Player => 0,
            Side::Monster => 1,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Side::Player => "Player",
            Side::Monster => "Monster",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Starting stats for a side
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub health: f64,
    #[serde(default)]
    pub regen: f64,
    #[serde(default)]
    pub shield: f64,
}

impl PlayerStats {
    pub fn new(health: f64) -> Self {
        Self { health, regen: 0.0, shield: 0.0 }
    }
}

impl Default for PlayerStats {
    fn default() -> Self {
        Self::new(250.0)
    }
}

/// A named board plus starting stats
#[derive(Debug, Clone)]
pub struct Loadout {
    pub name: String,
    pub stats: PlayerStats,
    pub board: Board,
}

impl Loadout {
    pub fn new(name: impl Into<String>, stats: PlayerStats, board: Board) -> Self {
        Self { name: name.into(), stats, board }
    }
}

#[derive(Debug, Clone)]
pub struct CombatSide {
    pub side: Side,
    pub name: String,
    pub health: f64,
    pub max_health: f64,
    pub shield: f64,
    pub regen: f64,
    pub burn: f64,
    pub poison: f64,
    pub board: Board,
    /// Slots whose item was already reset this fight
    initialized_slots: HashSet<usize>,
    baseline: PlayerStats,
}

impl CombatSide {
    pub fn new(side: Side, loadout: Loadout) -> Self {
        let stats = loadout.stats;
        Self {
            side,
            name: loadout.name,
            health: stats.health,
            max_health: stats.health,
            shield: stats.shield,
            regen: stats.regen,
            burn: 0.0,
            poison: 0.0,
            board: loadout.board,
            initialized_slots: HashSet::new(),
            baseline: stats,
        }
    }

    pub fn baseline(&self) -> PlayerStats {
        self.baseline
    }

    pub fn is_defeated(&self) -> bool {
        self.health <= 0.0
    }

    /// Restore starting stats and re-initialise every item once
    pub fn reset_for_fight(&mut self) {
        self.health = self.baseline.health;
        self.max_health = self.baseline.health;
        self.shield = self.baseline.shield;
        self.regen = self.baseline.regen;
        self.burn = 0.0;
        self.poison = 0.0;
        self.initialized_slots.clear();

        for slot in 0..BOARD_SLOTS {
            if self.initialized_slots.contains(&slot) {
                continue;
            }
            let Some(id) = self.board.id_at(slot) else {
                continue;
            };
            let Some(range) = self.board.get_placed(id).map(|p| p.occupied_slots()) else {
                continue;
            };
            if let Some(item) = self.board.get_mut(id) {
                item.reset_for_fight();
            }
            self.initialized_slots.extend(range);
        }
    }
}
