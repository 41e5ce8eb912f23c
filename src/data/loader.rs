//! RON data loader
//!
//! Loads item and monster data from external RON files, with fallback to
//! the built-in catalogue, and turns names into placed boards.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::items::{default_item_templates, ItemTemplates};
use super::monsters::{default_monster_templates, BoardEntry, MonsterTemplates};
use crate::combat::{Loadout, PlayerStats};
use crate::error::DataError;
use crate::items::{Board, Enchantment, Item, Tier, BOARD_SLOTS};

/// Directory searched by [`DataManager::new`]
pub const DEFAULT_DATA_DIR: &str = "assets/data";

const ITEMS_FILE: &str = "items.ron";
const MONSTERS_FILE: &str = "monsters.ron";

/// Manages all external game data
#[derive(Debug, Clone)]
pub struct DataManager {
    pub items: ItemTemplates,
    pub monsters: MonsterTemplates,
}

impl DataManager {
    /// Load from the default data directory, or use the built-in catalogue
    pub fn new() -> Self {
        Self::load_from_dir(Path::new(DEFAULT_DATA_DIR)).unwrap_or_else(|e| {
            log::warn!("Failed to load data files: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Load `items.ron` and `monsters.ron` from `dir`. A missing file falls
    /// back to the built-in set; a malformed one is an error.
    pub fn load_from_dir(dir: &Path) -> Result<Self, DataError> {
        let items = Self::load_or_default(&dir.join(ITEMS_FILE), default_item_templates)?;
        let monsters = Self::load_or_default(&dir.join(MONSTERS_FILE), default_monster_templates)?;

        let manager = Self { items, monsters };
        manager.validate()?;
        log::debug!(
            "Loaded {} item templates and {} monsters",
            manager.items.templates.len(),
            manager.monsters.monsters.len()
        );
        Ok(manager)
    }

    fn load_or_default<T: DeserializeOwned>(path: &Path, fallback: fn() -> T) -> Result<T, DataError> {
        if !path.exists() {
            return Ok(fallback());
        }
        let content = fs::read_to_string(path).map_err(|source| DataError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Loading {}", path.display());
        ron::from_str(&content).map_err(|source| DataError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Check every template and every monster's board before any fight
    pub fn validate(&self) -> Result<(), DataError> {
        let mut seen = HashSet::new();
        for template in &self.items.templates {
            template.validate()?;
            if !seen.insert(template.name.to_ascii_lowercase()) {
                return Err(DataError::DuplicateName(template.name.clone()));
            }
        }
        for monster in &self.monsters.monsters {
            self.build_board(&monster.items)?;
        }
        Ok(())
    }

    /// A fresh copy of a template, optionally at a tier and enchanted
    pub fn instantiate(
        &self,
        name: &str,
        tier: Option<Tier>,
        enchantment: Option<Enchantment>,
    ) -> Result<Item, DataError> {
        let template = self
            .items
            .find(name)
            .ok_or_else(|| DataError::UnknownItem(name.to_string()))?;
        let mut item = match tier {
            Some(tier) => Item::with_tier(0, template, tier)?,
            None => Item::new(0, template)?,
        };
        if let Some(enchantment) = enchantment {
            if !item.apply_enchantment(enchantment) {
                return Err(DataError::InvalidItem {
                    item: template.name.clone(),
                    reason: format!("cannot be enchanted {}", enchantment),
                });
            }
        }
        Ok(item)
    }

    /// Place every entry on a new board. Names must be unique.
    pub fn build_board(&self, entries: &[BoardEntry]) -> Result<Board, DataError> {
        let mut board = Board::new();
        let mut names = HashSet::new();

        for entry in entries {
            let item = self.instantiate(&entry.item, entry.tier, entry.enchantment)?;
            if !names.insert(item.name().to_string()) {
                return Err(DataError::DuplicateName(item.name().to_string()));
            }
            let slot = match entry.slot {
                Some(slot) => slot,
                None => board.find_space_for(item.size()).unwrap_or(BOARD_SLOTS),
            };
            let name = item.name().to_string();
            if board.place_at(item, slot).is_none() {
                return Err(DataError::NoRoom { item: name, slot });
            }
        }
        Ok(board)
    }

    pub fn player_loadout(
        &self,
        name: &str,
        stats: PlayerStats,
        entries: &[BoardEntry],
    ) -> Result<Loadout, DataError> {
        Ok(Loadout::new(name, stats, self.build_board(entries)?))
    }

    pub fn monster_loadout(&self, name: &str) -> Result<Loadout, DataError> {
        let monster = self
            .monsters
            .find(name)
            .ok_or_else(|| DataError::UnknownMonster(name.to_string()))?;
        let board = self.build_board(&monster.items)?;
        Ok(Loadout::new(monster.name.clone(), monster.stats(), board))
    }

    /// Write the built-in catalogue to `dir` for editing
    pub fn export_default_data(dir: &Path) -> Result<(), DataError> {
        fs::create_dir_all(dir).map_err(|source| DataError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        write_ron(&dir.join(ITEMS_FILE), &default_item_templates(), "items")?;
        write_ron(&dir.join(MONSTERS_FILE), &default_monster_templates(), "monsters")?;
        Ok(())
    }
}

impl Default for DataManager {
    fn default() -> Self {
        Self {
            items: default_item_templates(),
            monsters: default_monster_templates(),
        }
    }
}

fn write_ron<T: Serialize>(path: &Path, value: &T, what: &'static str) -> Result<(), DataError> {
    let content = ron::ser::to_string_pretty(value, ron::ser::PrettyConfig::default())
        .map_err(|source| DataError::Serialize { what, source })?;
    fs::write(path, content).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })
}
