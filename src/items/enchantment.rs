//! Enchantments
//!
//! Named modifier bundles overlaid onto an item's resolved attributes.
//! At most one is active; applying another fully reverts the previous one.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::item::{Attributes, Immunities, Item, Stat};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Enchantment {
    Heavy,
    Icy,
    Turbo,
    Shielded,
    Restorative,
    Toxic,
    Fiery,
    Shiny,
    Deadly,
    Radiant,
    Obsidian,
}

impl Enchantment {
    pub const ALL: [Enchantment; 11] = [
        Enchantment::Heavy,
        Enchantment::Icy,
        Enchantment::Turbo,
        Enchantment::Shielded,
        Enchantment::Restorative,
        Enchantment::Toxic,
        Enchantment::Fiery,
        Enchantment::Shiny,
        Enchantment::Deadly,
        Enchantment::Radiant,
        Enchantment::Obsidian,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Enchantment::Heavy => "Heavy",
            Enchantment::Icy => "Icy",
            Enchantment::Turbo => "Turbo",
            Enchantment::Shielded => "Shielded",
            Enchantment::Restorative => "Restorative",
            Enchantment::Toxic => "Toxic",
            Enchantment::Fiery => "Fiery",
            Enchantment::Shiny => "Shiny",
            Enchantment::Deadly => "Deadly",
            Enchantment::Radiant => "Radiant",
            Enchantment::Obsidian => "Obsidian",
        }
    }

    pub fn from_name(name: &str) -> Option<Enchantment> {
        Enchantment::ALL
            .into_iter()
            .find(|e| e.name().eq_ignore_ascii_case(name))
    }

    /// Standard bundle for this enchantment, used by the built-in catalogue
    pub fn default_effect(&self) -> EnchantmentEffect {
        let (description, effect, scaling) = match self {
            Enchantment::Heavy => (
                "Slow 1 item for 1 second",
                Attributes::new()
                    .with(Stat::SlowTargets, 1.0)
                    .with(Stat::SlowDuration, 1.0),
                None,
            ),
            Enchantment::Icy => (
                "Freeze 1 item for 1 second",
                Attributes::new()
                    .with(Stat::FreezeTargets, 1.0)
                    .with(Stat::FreezeDuration, 1.0),
                None,
            ),
            Enchantment::Turbo => (
                "Haste 1 item for 1 second",
                Attributes::new()
                    .with(Stat::HasteTargets, 1.0)
                    .with(Stat::HasteDuration, 1.0),
                None,
            ),
            Enchantment::Shielded => (
                "Shield equal to this item's damage",
                Attributes::new().with(Stat::Shield, 0.0),
                Some(Scaling::equal(Stat::Damage)),
            ),
            Enchantment::Restorative => (
                "Heal equal to this item's damage",
                Attributes::new().with(Stat::Heal, 0.0),
                Some(Scaling::equal(Stat::Damage)),
            ),
            Enchantment::Toxic => (
                "Poison equal to 10% of this item's damage",
                Attributes::new().with(Stat::Poison, 0.0),
                Some(Scaling::percentage(Stat::Damage, 0.1)),
            ),
            Enchantment::Fiery => (
                "Burn equal to 10% of this item's damage",
                Attributes::new().with(Stat::Burn, 0.0),
                Some(Scaling::percentage(Stat::Damage, 0.1)),
            ),
            Enchantment::Shiny => (
                "Multicast 2",
                Attributes::new().with(Stat::Multicast, 2.0),
                None,
            ),
            Enchantment::Deadly => (
                "+50% crit chance",
                Attributes::new().with(Stat::Crit, 0.5),
                None,
            ),
            Enchantment::Radiant => (
                "Cannot be frozen, slowed or destroyed",
                Attributes::new().with_immunities(Immunities::all()),
                None,
            ),
            Enchantment::Obsidian => (
                "Double damage",
                Attributes::new().with(Stat::DamageMultiplier, 2.0),
                None,
            ),
        };
        EnchantmentEffect {
            name: format!("{} ({})", self.name(), description),
            effect,
            scaling,
        }
    }
}

impl fmt::Display for Enchantment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScalingType {
    Equal,
    Percentage,
    Multiplier,
}

/// Derives one placeholder field of the bundle from another field of the item
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scaling {
    pub scaling_type: ScalingType,
    pub scaler: Stat,
    #[serde(default)]
    pub scaling_value: Option<f64>,
}

impl Scaling {
    pub fn equal(scaler: Stat) -> Self {
        Self { scaling_type: ScalingType::Equal, scaler, scaling_value: None }
    }

    pub fn percentage(scaler: Stat, value: f64) -> Self {
        Self { scaling_type: ScalingType::Percentage, scaler, scaling_value: Some(value) }
    }

    pub fn multiplier(scaler: Stat, value: f64) -> Self {
        Self { scaling_type: ScalingType::Multiplier, scaler, scaling_value: Some(value) }
    }

    pub fn compute(&self, base: f64) -> f64 {
        let factor = self.scaling_value.unwrap_or(1.0);
        match self.scaling_type {
            ScalingType::Equal => base,
            ScalingType::Percentage | ScalingType::Multiplier => base * factor,
        }
    }
}

/// An item's entry for one enchantment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnchantmentEffect {
    pub name: String,
    #[serde(default)]
    pub effect: Attributes,
    #[serde(default)]
    pub scaling: Option<Scaling>,
}

/// Fields cleared on removal in addition to the ones the bundle declared
pub const DERIVED_STATS: [Stat; 13] = [
    Stat::Poison,
    Stat::Burn,
    Stat::Shield,
    Stat::Heal,
    Stat::DamageMultiplier,
    Stat::SlowTargets,
    Stat::SlowDuration,
    Stat::FreezeTargets,
    Stat::FreezeDuration,
    Stat::HasteTargets,
    Stat::HasteDuration,
    Stat::Crit,
    Stat::CritDamage,
];

impl Item {
    /// Apply an enchantment from this item's table, replacing any active one.
    /// Returns false when the item has no entry for it.
    pub fn apply_enchantment(&mut self, enchantment: Enchantment) -> bool {
        let Some(effect) = self.template().enchantments.get(&enchantment).cloned() else {
            log::debug!("{} cannot take the {} enchantment", self.name(), enchantment);
            return false;
        };

        if self.enchantment.is_some() {
            self.remove_enchantment();
        }

        if self.base_multicast.is_none() {
            self.base_multicast = Some(self.attrs.get(Stat::Multicast));
        }

        // Compose against canonical tier values, not leftover overrides
        if let Some(row) = self.tier_row().cloned() {
            for (&stat, &value) in &row.stats {
                self.attrs.set(stat, value);
            }
        }

        self.overlay_effect(&effect);
        self.enchantment = Some(enchantment);
        log::debug!("{} enchanted with {}", self.name(), enchantment);
        true
    }

    /// Remove the active enchantment. Returns false when none is active.
    pub fn remove_enchantment(&mut self) -> bool {
        let Some(enchantment) = self.enchantment.take() else {
            return false;
        };

        let declared: Vec<Stat> = self
            .template()
            .enchantments
            .get(&enchantment)
            .map(|e| e.effect.stats.keys().copied().collect())
            .unwrap_or_default();

        let mut stripped: Vec<Stat> = declared.clone();
        stripped.extend(DERIVED_STATS.iter().copied().filter(|s| !declared.contains(s)));
        for &stat in &stripped {
            self.attrs.remove(stat);
        }
        self.attrs.immunities = Immunities::default();
        self.attrs.freeze_size = None;

        self.restore_canonical(&stripped);

        if declared.contains(&Stat::Multicast) {
            match self.base_multicast.unwrap_or(0.0) {
                m if m > 0.0 => self.attrs.set(Stat::Multicast, m),
                _ => {
                    self.attrs.remove(Stat::Multicast);
                }
            }
        }

        log::debug!("{} lost the {} enchantment", self.name(), enchantment);
        true
    }

    /// Write the bundle's fields onto the resolved record, computing the
    /// scaled placeholder if the bundle carries a scaling directive.
    pub(crate) fn overlay_effect(&mut self, effect: &EnchantmentEffect) {
        let derived = effect
            .scaling
            .map(|scaling| scaling.compute(self.scaler_value(scaling.scaler)));

        for (&stat, &value) in &effect.effect.stats {
            let value = match derived {
                Some(derived) if value == 0.0 => derived,
                _ => value,
            };
            self.attrs.set(stat, value);
        }
        if let Some(size) = effect.effect.freeze_size {
            self.attrs.freeze_size = Some(size);
        }
        self.attrs.immunities.merge(effect.effect.immunities);
    }

    /// Current value of the scaler field, tier row first
    fn scaler_value(&self, stat: Stat) -> f64 {
        self.tier_row()
            .and_then(|row| row.get_opt(stat))
            .unwrap_or_else(|| self.attrs.get(stat))
    }

    /// Put back the template/tier values of stripped fields
    fn restore_canonical(&mut self, stripped: &[Stat]) {
        let base = self.template().base.clone();
        let row = self.tier_row().cloned();

        for &stat in stripped {
            let canonical = row
                .as_ref()
                .and_then(|r| r.get_opt(stat))
                .or_else(|| base.get_opt(stat));
            if let Some(value) = canonical {
                self.attrs.set(stat, value);
            }
        }

        let mut immunities = base.immunities;
        let mut freeze_size = base.freeze_size;
        if let Some(row) = &row {
            immunities.merge(row.immunities);
            freeze_size = row.freeze_size.or(freeze_size);
        }
        self.attrs.immunities = immunities;
        self.attrs.freeze_size = freeze_size;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::item::{ItemSize, ItemTag, ItemTemplate, Tier};

    fn enchantable_sword() -> ItemTemplate {
        let mut template = ItemTemplate::new("Test Sword", ItemSize::Medium);
        template.tags.insert(ItemTag::Weapon);
        template.base = Attributes::new().with(Stat::Cooldown, 5.0);
        template.tiers.insert(Tier::Bronze, Attributes::new().with(Stat::Damage, 10.0));
        template.tiers.insert(
            Tier::Silver,
            Attributes::new().with(Stat::Damage, 20.0).with(Stat::Poison, 3.0),
        );
        for enchantment in Enchantment::ALL {
            template.enchantments.insert(enchantment, enchantment.default_effect());
        }
        template
    }

    #[test]
    fn test_obsidian_doubles_damage() {
        let mut item = Item::new(1, &enchantable_sword()).unwrap();
        assert!(item.apply_enchantment(Enchantment::Obsidian));
        assert_eq!(item.trigger_damage(), 20.0);

        assert!(item.remove_enchantment());
        assert_eq!(item.trigger_damage(), 10.0);
    }

    #[test]
    fn test_round_trip_restores_every_field() {
        for enchantment in Enchantment::ALL {
            let mut item = Item::with_tier(1, &enchantable_sword(), Tier::Silver).unwrap();
            let before = item.attrs.clone();

            assert!(item.apply_enchantment(enchantment));
            assert!(item.remove_enchantment());
            assert_eq!(item.attrs, before, "{} did not round-trip", enchantment);
            assert_eq!(item.enchantment(), None);
        }
    }

    #[test]
    fn test_scaling_equal_and_percentage() {
        let mut item = Item::new(1, &enchantable_sword()).unwrap();
        item.apply_enchantment(Enchantment::Shielded);
        assert_eq!(item.attrs.get(Stat::Shield), 10.0);

        item.apply_enchantment(Enchantment::Toxic);
        assert!((item.attrs.get(Stat::Poison) - 1.0).abs() < 1e-9);
        // Previous bundle fully reverted
        assert!(!item.attrs.has(Stat::Shield));
    }

    #[test]
    fn test_scaler_reads_tier_row() {
        let mut item = Item::new(1, &enchantable_sword()).unwrap();
        // Stale root value must not leak into the derived field
        item.attrs.set(Stat::Damage, 999.0);
        item.apply_enchantment(Enchantment::Restorative);
        assert_eq!(item.attrs.get(Stat::Heal), 10.0);
        assert_eq!(item.attrs.get(Stat::Damage), 10.0);
    }

    #[test]
    fn test_multiplier_scaling() {
        let scaling = Scaling::multiplier(Stat::Damage, 3.0);
        assert_eq!(scaling.compute(4.0), 12.0);
        assert_eq!(Scaling::equal(Stat::Damage).compute(4.0), 4.0);
    }

    #[test]
    fn test_multicast_restored_to_base() {
        let mut template = enchantable_sword();
        template.base.set(Stat::Multicast, 1.0);
        let mut item = Item::new(1, &template).unwrap();

        item.apply_enchantment(Enchantment::Shiny);
        assert_eq!(item.multicast(), 2);
        item.apply_enchantment(Enchantment::Deadly);
        assert_eq!(item.attrs.get(Stat::Multicast), 1.0);
        assert_eq!(item.base_multicast, Some(1.0));
    }

    #[test]
    fn test_remove_without_enchantment() {
        let mut item = Item::new(1, &enchantable_sword()).unwrap();
        assert!(!item.remove_enchantment());
    }

    #[test]
    fn test_unknown_enchantment_rejected() {
        let mut template = enchantable_sword();
        template.enchantments.remove(&Enchantment::Radiant);
        let mut item = Item::new(1, &template).unwrap();
        assert!(!item.apply_enchantment(Enchantment::Radiant));
        assert_eq!(item.enchantment(), None);
    }

    #[test]
    fn test_radiant_grants_immunities() {
        let mut item = Item::new(1, &enchantable_sword()).unwrap();
        item.apply_enchantment(Enchantment::Radiant);
        assert!(item.attrs.immunities.freeze);
        item.remove_enchantment();
        assert_eq!(item.attrs.immunities, Immunities::default());
    }

    #[test]
    fn test_enchantment_survives_tier_change() {
        let mut item = Item::new(1, &enchantable_sword()).unwrap();
        item.apply_enchantment(Enchantment::Shielded);
        assert!(item.upgrade_tier());
        assert_eq!(item.attrs.get(Stat::Shield), 20.0);
        assert!(item.downgrade_tier());
        assert_eq!(item.attrs.get(Stat::Shield), 10.0);
    }
}
