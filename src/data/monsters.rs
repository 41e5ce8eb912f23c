//! Monster templates
//!
//! A monster is a fixed loadout: starting stats plus a list of board entries.

use serde::{Deserialize, Serialize};

use crate::combat::PlayerStats;
use crate::error::DataError;
use crate::items::{Enchantment, Tier};

/// One item to place on a board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardEntry {
    /// Template name
    pub item: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tier: Option<Tier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enchantment: Option<Enchantment>,
    /// First slot; the first free space when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slot: Option<usize>,
}

impl BoardEntry {
    pub fn new(item: impl Into<String>) -> Self {
        Self {
            item: item.into(),
            tier: None,
            enchantment: None,
            slot: None,
        }
    }

    pub fn tier(mut self, tier: Tier) -> Self {
        self.tier = Some(tier);
        self
    }

    pub fn enchanted(mut self, enchantment: Enchantment) -> Self {
        self.enchantment = Some(enchantment);
        self
    }

    pub fn at(mut self, slot: usize) -> Self {
        self.slot = Some(slot);
        self
    }

    /// Parse `Name[:Tier[:Enchantment]]`
    pub fn parse(spec: &str) -> Result<Self, DataError> {
        let mut parts = spec.split(':').map(str::trim);
        let name = parts.next().unwrap_or_default();
        if name.is_empty() {
            return Err(DataError::UnknownItem(spec.to_string()));
        }
        let mut entry = BoardEntry::new(name);

        if let Some(tier) = parts.next().filter(|s| !s.is_empty()) {
            let tier = Tier::from_name(tier).ok_or_else(|| DataError::InvalidItem {
                item: name.to_string(),
                reason: format!("unknown tier '{}'", tier),
            })?;
            entry = entry.tier(tier);
        }
        if let Some(enchantment) = parts.next().filter(|s| !s.is_empty()) {
            let enchantment = Enchantment::from_name(enchantment).ok_or_else(|| DataError::InvalidItem {
                item: name.to_string(),
                reason: format!("unknown enchantment '{}'", enchantment),
            })?;
            entry = entry.enchanted(enchantment);
        }
        Ok(entry)
    }
}

/// A template for an opponent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonsterTemplate {
    pub name: String,
    pub health: f64,
    #[serde(default)]
    pub regen: f64,
    #[serde(default)]
    pub shield: f64,
    #[serde(default)]
    pub items: Vec<BoardEntry>,
    #[serde(default)]
    pub description: Option<String>,
}

impl MonsterTemplate {
    pub fn stats(&self) -> PlayerStats {
        PlayerStats {
            health: self.health,
            regen: self.regen,
            shield: self.shield,
        }
    }
}

/// Collection of monster templates
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MonsterTemplates {
    pub monsters: Vec<MonsterTemplate>,
}

impl MonsterTemplates {
    /// Find a monster by name (case-insensitive)
    pub fn find(&self, name: &str) -> Option<&MonsterTemplate> {
        self.monsters
            .iter()
            .find(|m| m.name.eq_ignore_ascii_case(name))
    }
}

/// Create default monster templates (hardcoded fallback)
pub fn default_monster_templates() -> MonsterTemplates {
    MonsterTemplates {
        monsters: vec![
            MonsterTemplate {
                name: "Training Dummy".to_string(),
                health: 50.0,
                regen: 0.0,
                shield: 0.0,
                items: Vec::new(),
                description: Some("Stands still and takes it.".to_string()),
            },
            MonsterTemplate {
                name: "Bandit".to_string(),
                health: 150.0,
                regen: 0.0,
                shield: 0.0,
                items: vec![
                    BoardEntry::new("Rusty Sword").tier(Tier::Silver),
                    BoardEntry::new("Buckler"),
                    BoardEntry::new("Bandage"),
                ],
                description: Some("Hits hard, patches up between swings.".to_string()),
            },
            MonsterTemplate {
                name: "Frost Wraith".to_string(),
                health: 200.0,
                regen: 0.0,
                shield: 0.0,
                items: vec![
                    BoardEntry::new("Ice Cube").tier(Tier::Silver),
                    BoardEntry::new("Frost Potion"),
                    BoardEntry::new("Venom Fang").enchanted(Enchantment::Icy),
                ],
                description: Some("Locks down small items and lets poison do the rest.".to_string()),
            },
            MonsterTemplate {
                name: "Reef Guardian".to_string(),
                health: 250.0,
                regen: 2.0,
                shield: 0.0,
                items: vec![
                    BoardEntry::new("Sea Shell").tier(Tier::Silver),
                    BoardEntry::new("Starfish"),
                    BoardEntry::new("Fishing Net"),
                    BoardEntry::new("Twin Daggers").enchanted(Enchantment::Toxic),
                ],
                description: Some("Shields scale with the tide.".to_string()),
            },
            MonsterTemplate {
                name: "Siege Engine".to_string(),
                health: 300.0,
                regen: 0.0,
                shield: 20.0,
                items: vec![
                    BoardEntry::new("Crossbow").tier(Tier::Gold),
                    BoardEntry::new("Bolas").enchanted(Enchantment::Heavy),
                    BoardEntry::new("War Banner").tier(Tier::Silver),
                    BoardEntry::new("Buckler").tier(Tier::Silver),
                ],
                description: Some("Slow to start, impossible to stop.".to_string()),
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_entry() {
        assert_eq!(BoardEntry::parse("Rusty Sword").unwrap(), BoardEntry::new("Rusty Sword"));
        assert_eq!(
            BoardEntry::parse("Rusty Sword:gold:obsidian").unwrap(),
            BoardEntry::new("Rusty Sword").tier(Tier::Gold).enchanted(Enchantment::Obsidian)
        );
        assert_eq!(
            BoardEntry::parse("Buckler::Radiant").unwrap(),
            BoardEntry::new("Buckler").enchanted(Enchantment::Radiant)
        );
        assert!(BoardEntry::parse("Buckler:Platinum").is_err());
        assert!(BoardEntry::parse("").is_err());
    }

    #[test]
    fn test_find_monster() {
        let monsters = default_monster_templates();
        let dummy = monsters.find("training dummy").unwrap();
        assert_eq!(dummy.stats().health, 50.0);
        assert!(dummy.items.is_empty());
        assert!(monsters.find("Dragon").is_none());
    }
}
