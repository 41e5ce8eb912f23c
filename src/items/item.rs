//! Item definitions
//!
//! Combat items, tiers, tags and the flat attribute record the engine reads.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use super::enchantment::{Enchantment, EnchantmentEffect};
use crate::combat::scheduler::seconds_to_ticks;
use crate::error::DataError;

/// Unique item ID for tracking placed copies
pub type ItemId = u64;

/// Item quality tiers, ordered from lowest to highest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tier {
    Bronze,
    Silver,
    Gold,
    Diamond,
}

impl Tier {
    pub const ALL: [Tier; 4] = [Tier::Bronze, Tier::Silver, Tier::Gold, Tier::Diamond];

    pub fn name(&self) -> &'static str {
        match self {
            Tier::Bronze => "Bronze",
            Tier::Silver => "Silver",
            Tier::Gold => "Gold",
            Tier::Diamond => "Diamond",
        }
    }

    /// Parse a tier from user input (case-insensitive)
    pub fn from_name(name: &str) -> Option<Tier> {
        Tier::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Category tags (an item may carry several)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ItemTag {
    Weapon,
    Friend,
    Aquatic,
    Food,
    Loot,
    Tool,
    Apparel,
    Potion,
    Reagent,
    Property,
    Toy,
}

/// Number of board slots an item occupies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemSize {
    Small,
    Medium,
    Large,
}

impl ItemSize {
    pub fn slots(&self) -> usize {
        match self {
            ItemSize::Small => 1,
            ItemSize::Medium => 2,
            ItemSize::Large => 3,
        }
    }

    pub fn from_slots(slots: usize) -> Option<ItemSize> {
        match slots {
            1 => Some(ItemSize::Small),
            2 => Some(ItemSize::Medium),
            3 => Some(ItemSize::Large),
            _ => None,
        }
    }
}

/// Numeric fields an item can carry.
///
/// Tier rows, enchantment bundles and scaling directives all address
/// fields through this key, so overlays stay typed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Stat {
    Cost,
    Value,
    /// Cooldown in seconds
    Cooldown,
    Damage,
    DamageMultiplier,
    Shield,
    Heal,
    Burn,
    Poison,
    MaxAmmo,
    Multicast,
    /// Crit chance in 0.0..=1.0
    Crit,
    /// Damage multiplier on a crit (2.0 when absent)
    CritDamage,
    FreezeTargets,
    /// Freeze duration in seconds
    FreezeDuration,
    SlowTargets,
    SlowDuration,
    HasteTargets,
    /// Cooldown reduction in seconds
    HasteDuration,
    ShieldPerAquatic,
    /// Shield granted to every shielded item after a trigger
    ShieldBonus,
    /// Regeneration added to the owner when a regen potion fires
    RegenAmount,
}

impl Stat {
    pub fn name(&self) -> &'static str {
        match self {
            Stat::Cost => "cost",
            Stat::Value => "value",
            Stat::Cooldown => "cooldown",
            Stat::Damage => "damage",
            Stat::DamageMultiplier => "damageMultiplier",
            Stat::Shield => "shield",
            Stat::Heal => "heal",
            Stat::Burn => "burn",
            Stat::Poison => "poison",
            Stat::MaxAmmo => "maxAmmo",
            Stat::Multicast => "multicast",
            Stat::Crit => "crit",
            Stat::CritDamage => "critDamage",
            Stat::FreezeTargets => "freezeTargets",
            Stat::FreezeDuration => "freezeDuration",
            Stat::SlowTargets => "slowTargets",
            Stat::SlowDuration => "slowDuration",
            Stat::HasteTargets => "hasteTargets",
            Stat::HasteDuration => "hasteDuration",
            Stat::ShieldPerAquatic => "shieldPerAquatic",
            Stat::ShieldBonus => "shieldBonus",
            Stat::RegenAmount => "regenAmount",
        }
    }
}

/// Immunity flags (granted by Radiant)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Immunities {
    #[serde(default)]
    pub freeze: bool,
    #[serde(default)]
    pub slow: bool,
    #[serde(default)]
    pub destroy: bool,
}

impl Immunities {
    pub fn all() -> Self {
        Self { freeze: true, slow: true, destroy: true }
    }

    pub fn merge(&mut self, other: Immunities) {
        self.freeze |= other.freeze;
        self.slow |= other.slow;
        self.destroy |= other.destroy;
    }
}

/// A flat set of item fields.
///
/// Used for the template root, for every tier row, for enchantment bundles
/// and for the resolved record the combat engine reads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Attributes {
    #[serde(default)]
    pub stats: BTreeMap<Stat, f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub freeze_size: Option<ItemSize>,
    #[serde(default)]
    pub immunities: Immunities,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter used by the item catalogue
    pub fn with(mut self, stat: Stat, value: f64) -> Self {
        self.stats.insert(stat, value);
        self
    }

    pub fn with_freeze_size(mut self, size: ItemSize) -> Self {
        self.freeze_size = Some(size);
        self
    }

    pub fn with_immunities(mut self, immunities: Immunities) -> Self {
        self.immunities = immunities;
        self
    }

    /// Value of a field (0 when absent)
    pub fn get(&self, stat: Stat) -> f64 {
        self.stats.get(&stat).copied().unwrap_or(0.0)
    }

    pub fn get_opt(&self, stat: Stat) -> Option<f64> {
        self.stats.get(&stat).copied()
    }

    /// True when the field is present and nonzero
    pub fn has(&self, stat: Stat) -> bool {
        self.get(stat) != 0.0
    }

    /// Field read as a count (targets, ammo, multicast)
    pub fn count(&self, stat: Stat) -> u32 {
        self.get(stat).max(0.0).round() as u32
    }

    pub fn set(&mut self, stat: Stat, value: f64) {
        self.stats.insert(stat, value);
    }

    pub fn remove(&mut self, stat: Stat) -> Option<f64> {
        self.stats.remove(&stat)
    }

    /// Copy every field of `other` on top of this record
    pub fn overlay(&mut self, other: &Attributes) {
        for (&stat, &value) in &other.stats {
            self.stats.insert(stat, value);
        }
        if other.freeze_size.is_some() {
            self.freeze_size = other.freeze_size;
        }
        self.immunities.merge(other.immunities);
    }
}

/// Closed set of special trigger behaviors, keyed by a stable kind rather
/// than by display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Behavior {
    /// Default effects driven by the item's fields
    #[default]
    Standard,
    /// Deals damage equal to the highest shield value on its own board
    HighestShieldDamage,
    /// Shields its side for `shieldPerAquatic` per Aquatic item on the board
    AquaticCountShield,
    /// After triggering, adds `shieldBonus` to every shielded item on its board
    ShieldBoost,
    /// Refills one ammo on every item of its side and adds regeneration
    InfinitePotion,
    /// Freezes items on the opposing board
    FrostPotion,
}

/// Declarative item record (read-only template)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemTemplate {
    pub name: String,
    #[serde(default)]
    pub kind: Behavior,
    pub tags: BTreeSet<ItemTag>,
    pub size: ItemSize,
    /// Economy-only items never trigger and are never targeted
    #[serde(default)]
    pub non_combat: bool,
    /// Root attributes shared by every tier
    #[serde(default)]
    pub base: Attributes,
    /// Tier rows; empty for untiered items
    #[serde(default)]
    pub tiers: BTreeMap<Tier, Attributes>,
    /// Tier a fresh copy starts at (defaults to the lowest row)
    #[serde(default)]
    pub starting_tier: Option<Tier>,
    #[serde(default)]
    pub enchantments: BTreeMap<Enchantment, EnchantmentEffect>,
}

impl ItemTemplate {
    pub fn new(name: impl Into<String>, size: ItemSize) -> Self {
        Self {
            name: name.into(),
            kind: Behavior::Standard,
            tags: BTreeSet::new(),
            size,
            non_combat: false,
            base: Attributes::new(),
            tiers: BTreeMap::new(),
            starting_tier: None,
            enchantments: BTreeMap::new(),
        }
    }

    /// Tier a fresh copy starts at
    pub fn default_tier(&self) -> Tier {
        self.starting_tier
            .or_else(|| self.tiers.keys().next().copied())
            .unwrap_or(Tier::Bronze)
    }

    /// Check the record is usable before any copy is placed
    pub fn validate(&self) -> Result<(), DataError> {
        if self.name.trim().is_empty() {
            return Err(DataError::InvalidItem {
                item: self.name.clone(),
                reason: "name is empty".to_string(),
            });
        }
        if self.tags.is_empty() {
            return Err(DataError::InvalidItem {
                item: self.name.clone(),
                reason: "item has no category tags".to_string(),
            });
        }
        if let Some(tier) = self.starting_tier {
            if !self.tiers.contains_key(&tier) {
                return Err(DataError::MissingTier {
                    item: self.name.clone(),
                    tier,
                });
            }
        }
        if !self.non_combat && self.cooldown_for(self.default_tier()) <= 0.0 {
            return Err(DataError::InvalidItem {
                item: self.name.clone(),
                reason: "combat item has no cooldown".to_string(),
            });
        }
        Ok(())
    }

    fn cooldown_for(&self, tier: Tier) -> f64 {
        self.tiers
            .get(&tier)
            .and_then(|row| row.get_opt(Stat::Cooldown))
            .unwrap_or_else(|| self.base.get(Stat::Cooldown))
    }
}

/// Per-item trigger state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ItemPhase {
    /// Waiting for the cooldown to elapse
    #[default]
    Idle,
    /// Executing its effects this tick
    Triggering,
    /// Suspended until the unfreeze tick
    Frozen,
}

/// Combat-scoped runtime fields, rebuilt at the start of every fight
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriggerState {
    pub phase: ItemPhase,
    pub cooldown_ticks: u64,
    pub next_trigger_tick: u64,
    pub next_unfreeze_tick: Option<u64>,
    /// Scratch values set before the main trigger and cleared after it
    pub calculated_damage: Option<f64>,
    pub calculated_shield: Option<f64>,
    pub ammo: u32,
    pub out_of_ammo_reported: bool,
    pub trigger_count: u64,
}

/// A placed copy of an item template
#[derive(Debug, Clone)]
pub struct Item {
    pub id: ItemId,
    template: ItemTemplate,
    tier: Tier,
    pub(crate) enchantment: Option<Enchantment>,
    /// Multicast before any enchantment touched it
    pub(crate) base_multicast: Option<f64>,
    /// Resolved attributes: template root, then tier row, then enchantment
    pub attrs: Attributes,
    pub state: TriggerState,
}

impl Item {
    /// Create a copy of a template at its default tier
    pub fn new(id: ItemId, template: &ItemTemplate) -> Result<Self, DataError> {
        Self::with_tier(id, template, template.default_tier())
    }

    /// Create a copy of a template at a specific tier
    pub fn with_tier(id: ItemId, template: &ItemTemplate, tier: Tier) -> Result<Self, DataError> {
        if !template.tiers.is_empty() && !template.tiers.contains_key(&tier) {
            return Err(DataError::MissingTier {
                item: template.name.clone(),
                tier,
            });
        }
        let mut item = Self {
            id,
            template: template.clone(),
            tier,
            enchantment: None,
            base_multicast: None,
            attrs: Attributes::new(),
            state: TriggerState::default(),
        };
        item.refresh_attributes();
        Ok(item)
    }

    pub fn name(&self) -> &str {
        &self.template.name
    }

    pub fn template(&self) -> &ItemTemplate {
        &self.template
    }

    pub fn behavior(&self) -> Behavior {
        self.template.kind
    }

    pub fn size(&self) -> ItemSize {
        self.template.size
    }

    pub fn has_tag(&self, tag: ItemTag) -> bool {
        self.template.tags.contains(&tag)
    }

    pub fn is_non_combat(&self) -> bool {
        self.template.non_combat
    }

    pub fn tier(&self) -> Tier {
        self.tier
    }

    pub fn enchantment(&self) -> Option<Enchantment> {
        self.enchantment
    }

    /// Raw row for the active tier (None for untiered items)
    pub fn tier_row(&self) -> Option<&Attributes> {
        self.template.tiers.get(&self.tier)
    }

    /// Rebuild the resolved record from the template root, the active tier
    /// row and the active enchantment.
    pub fn refresh_attributes(&mut self) {
        let mut attrs = self.template.base.clone();
        if let Some(row) = self.template.tiers.get(&self.tier) {
            attrs.overlay(row);
        }
        self.attrs = attrs;
        if let Some(enchantment) = self.enchantment {
            if let Some(effect) = self.template.enchantments.get(&enchantment).cloned() {
                self.overlay_effect(&effect);
            }
        }
    }

    /// Move to the next tier present in the table
    pub fn upgrade_tier(&mut self) -> bool {
        let next = self.template.tiers.keys().copied().find(|&t| t > self.tier);
        self.change_tier(next)
    }

    /// Move to the previous tier present in the table
    pub fn downgrade_tier(&mut self) -> bool {
        let prev = self.template.tiers.keys().copied().rev().find(|&t| t < self.tier);
        self.change_tier(prev)
    }

    fn change_tier(&mut self, tier: Option<Tier>) -> bool {
        match tier {
            Some(tier) => {
                log::debug!("{}: tier {} -> {}", self.name(), self.tier, tier);
                self.tier = tier;
                self.refresh_attributes();
                true
            }
            None => false,
        }
    }

    pub fn cooldown_secs(&self) -> f64 {
        self.attrs.get(Stat::Cooldown)
    }

    /// Damage dealt per cast before crits
    pub fn trigger_damage(&self) -> f64 {
        let damage = self.attrs.get(Stat::Damage);
        match self.attrs.get_opt(Stat::DamageMultiplier) {
            Some(multiplier) => damage * multiplier,
            None => damage,
        }
    }

    /// Times the default effect sequence runs per trigger (at least once)
    pub fn multicast(&self) -> u32 {
        self.attrs.count(Stat::Multicast).max(1)
    }

    /// 0 means unlimited charges
    pub fn max_ammo(&self) -> u32 {
        self.attrs.count(Stat::MaxAmmo)
    }

    pub fn has_spare_ammo_capacity(&self) -> bool {
        let max = self.max_ammo();
        max > 0 && self.state.ammo < max
    }

    pub fn is_frozen(&self, tick: u64) -> bool {
        self.state.next_unfreeze_tick.is_some_and(|until| tick < until)
    }

    pub fn phase(&self, tick: u64) -> ItemPhase {
        if self.is_frozen(tick) {
            ItemPhase::Frozen
        } else {
            self.state.phase
        }
    }

    /// Cooldown elapsed and not frozen
    pub fn is_ready(&self, tick: u64) -> bool {
        !self.is_non_combat() && tick >= self.state.next_trigger_tick && !self.is_frozen(tick)
    }

    /// Reset attributes and runtime fields for a new fight
    pub fn reset_for_fight(&mut self) {
        self.refresh_attributes();
        let cooldown_ticks = seconds_to_ticks(self.cooldown_secs());
        self.state = TriggerState {
            cooldown_ticks,
            next_trigger_tick: cooldown_ticks,
            ammo: self.max_ammo(),
            ..TriggerState::default()
        };
    }
}
