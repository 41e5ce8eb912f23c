//! Item catalogue
//!
//! Built-in item templates. These are the fallback when no `items.ron`
//! exists and the source for `export`.

use serde::{Deserialize, Serialize};

use crate::items::{
    Attributes, Behavior, Enchantment, ItemSize, ItemTag, ItemTemplate, Stat, Tier,
};
use Tier::{Bronze, Diamond, Gold, Silver};

/// Collection of item templates
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemTemplates {
    pub templates: Vec<ItemTemplate>,
}

impl ItemTemplates {
    /// Find a template by name (case-insensitive)
    pub fn find(&self, name: &str) -> Option<&ItemTemplate> {
        self.templates
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(name))
    }

    pub fn with_tag(&self, tag: ItemTag) -> Vec<&ItemTemplate> {
        self.templates.iter().filter(|t| t.tags.contains(&tag)).collect()
    }

    pub fn with_behavior(&self, kind: Behavior) -> Vec<&ItemTemplate> {
        self.templates.iter().filter(|t| t.kind == kind).collect()
    }
}

/// Start a template with its tags
fn item(name: &str, size: ItemSize, tags: &[ItemTag]) -> ItemTemplate {
    let mut template = ItemTemplate::new(name, size);
    template.tags.extend(tags.iter().copied());
    template
}

/// One row per tier, each setting the same stat
fn scaled(template: &mut ItemTemplate, stat: Stat, values: &[(Tier, f64)]) {
    for &(tier, value) in values {
        template.tiers.entry(tier).or_default().set(stat, value);
    }
}

/// Give the template the standard enchantment table
fn enchantable(mut template: ItemTemplate) -> ItemTemplate {
    for enchantment in Enchantment::ALL {
        template
            .enchantments
            .insert(enchantment, enchantment.default_effect());
    }
    template
}

fn with_economy(template: &mut ItemTemplate, base_cost: f64) {
    for (step, tier) in Tier::ALL.into_iter().enumerate() {
        if let Some(row) = template.tiers.get_mut(&tier) {
            let cost = base_cost * 2f64.powi(step as i32);
            row.set(Stat::Cost, cost);
            row.set(Stat::Value, (cost / 2.0).max(1.0));
        }
    }
}

/// Create default item templates (hardcoded fallback)
pub fn default_item_templates() -> ItemTemplates {
    let mut templates = Vec::new();

    // === Weapons ===
    let mut sword = item("Rusty Sword", ItemSize::Medium, &[ItemTag::Weapon]);
    sword.base = Attributes::new().with(Stat::Cooldown, 5.0);
    scaled(&mut sword, Stat::Damage, &[(Bronze, 10.0), (Silver, 20.0), (Gold, 30.0), (Diamond, 40.0)]);
    with_economy(&mut sword, 4.0);
    templates.push(enchantable(sword));

    let mut daggers = item("Twin Daggers", ItemSize::Small, &[ItemTag::Weapon]);
    daggers.base = Attributes::new()
        .with(Stat::Cooldown, 5.0)
        .with(Stat::Multicast, 2.0);
    scaled(&mut daggers, Stat::Damage, &[(Silver, 6.0), (Gold, 10.0), (Diamond, 15.0)]);
    with_economy(&mut daggers, 6.0);
    templates.push(enchantable(daggers));

    let mut crossbow = item("Crossbow", ItemSize::Medium, &[ItemTag::Weapon, ItemTag::Tool]);
    crossbow.base = Attributes::new()
        .with(Stat::Cooldown, 3.0)
        .with(Stat::MaxAmmo, 3.0);
    scaled(&mut crossbow, Stat::Damage, &[(Bronze, 20.0), (Silver, 30.0), (Gold, 45.0), (Diamond, 60.0)]);
    with_economy(&mut crossbow, 5.0);
    templates.push(enchantable(crossbow));

    let mut claw = item("Fire Claw", ItemSize::Small, &[ItemTag::Weapon]);
    claw.base = Attributes::new().with(Stat::Cooldown, 4.0).with(Stat::Damage, 5.0);
    scaled(&mut claw, Stat::Burn, &[(Bronze, 3.0), (Silver, 5.0), (Gold, 8.0), (Diamond, 12.0)]);
    with_economy(&mut claw, 3.0);
    templates.push(enchantable(claw));

    let mut fang = item("Venom Fang", ItemSize::Small, &[ItemTag::Weapon, ItemTag::Reagent]);
    fang.base = Attributes::new().with(Stat::Cooldown, 6.0).with(Stat::Damage, 4.0);
    scaled(&mut fang, Stat::Poison, &[(Bronze, 2.0), (Silver, 4.0), (Gold, 6.0), (Diamond, 8.0)]);
    with_economy(&mut fang, 3.0);
    templates.push(enchantable(fang));

    let mut bolas = item("Bolas", ItemSize::Small, &[ItemTag::Weapon]);
    bolas.base = Attributes::new()
        .with(Stat::Cooldown, 6.0)
        .with(Stat::SlowTargets, 1.0)
        .with(Stat::SlowDuration, 2.0);
    scaled(&mut bolas, Stat::Damage, &[(Bronze, 5.0), (Silver, 10.0), (Gold, 15.0)]);
    with_economy(&mut bolas, 2.0);
    templates.push(enchantable(bolas));

    let mut bash = item("Shield Bash", ItemSize::Medium, &[ItemTag::Weapon, ItemTag::Apparel]);
    bash.kind = Behavior::HighestShieldDamage;
    scaled(&mut bash, Stat::Cooldown, &[(Silver, 7.0), (Gold, 6.0), (Diamond, 5.0)]);
    with_economy(&mut bash, 8.0);
    templates.push(enchantable(bash));

    // === Defense and sustain ===
    let mut buckler = item("Buckler", ItemSize::Small, &[ItemTag::Apparel]);
    buckler.base = Attributes::new().with(Stat::Cooldown, 6.0);
    scaled(&mut buckler, Stat::Shield, &[(Bronze, 15.0), (Silver, 25.0), (Gold, 35.0), (Diamond, 45.0)]);
    with_economy(&mut buckler, 3.0);
    templates.push(enchantable(buckler));

    let mut bandage = item("Bandage", ItemSize::Small, &[ItemTag::Tool]);
    bandage.base = Attributes::new().with(Stat::Cooldown, 5.0);
    scaled(&mut bandage, Stat::Heal, &[(Bronze, 10.0), (Silver, 20.0), (Gold, 30.0), (Diamond, 40.0)]);
    with_economy(&mut bandage, 2.0);
    templates.push(enchantable(bandage));

    let mut banner = item("War Banner", ItemSize::Large, &[ItemTag::Tool, ItemTag::Property]);
    banner.kind = Behavior::ShieldBoost;
    banner.base = Attributes::new().with(Stat::Cooldown, 8.0);
    scaled(&mut banner, Stat::ShieldBonus, &[(Silver, 5.0), (Gold, 10.0), (Diamond, 15.0)]);
    with_economy(&mut banner, 8.0);
    templates.push(enchantable(banner));

    // === Aquatic ===
    let mut shell = item("Sea Shell", ItemSize::Small, &[ItemTag::Aquatic]);
    shell.kind = Behavior::AquaticCountShield;
    shell.base = Attributes::new().with(Stat::Cooldown, 6.0);
    scaled(&mut shell, Stat::ShieldPerAquatic, &[(Bronze, 10.0), (Silver, 15.0), (Gold, 20.0), (Diamond, 25.0)]);
    with_economy(&mut shell, 2.0);
    templates.push(enchantable(shell));

    let mut starfish = item("Starfish", ItemSize::Small, &[ItemTag::Aquatic, ItemTag::Friend]);
    starfish.base = Attributes::new().with(Stat::Cooldown, 4.0);
    scaled(&mut starfish, Stat::Heal, &[(Bronze, 5.0), (Silver, 10.0), (Gold, 15.0)]);
    with_economy(&mut starfish, 2.0);
    templates.push(enchantable(starfish));

    let mut net = item("Fishing Net", ItemSize::Medium, &[ItemTag::Aquatic, ItemTag::Tool]);
    net.base = Attributes::new()
        .with(Stat::Cooldown, 7.0)
        .with(Stat::FreezeTargets, 1.0)
        .with_freeze_size(ItemSize::Medium);
    scaled(&mut net, Stat::FreezeDuration, &[(Bronze, 1.0), (Silver, 1.5), (Gold, 2.0)]);
    with_economy(&mut net, 4.0);
    templates.push(enchantable(net));

    // === Control ===
    let mut ice = item("Ice Cube", ItemSize::Small, &[ItemTag::Food]);
    ice.base = Attributes::new()
        .with(Stat::Cooldown, 7.0)
        .with(Stat::FreezeTargets, 1.0)
        .with(Stat::FreezeDuration, 1.0)
        .with_freeze_size(ItemSize::Small);
    scaled(&mut ice, Stat::Cooldown, &[(Bronze, 7.0), (Silver, 6.0), (Gold, 5.0), (Diamond, 4.0)]);
    with_economy(&mut ice, 2.0);
    templates.push(enchantable(ice));

    let mut watch = item("Pocket Watch", ItemSize::Small, &[ItemTag::Tool]);
    watch.base = Attributes::new()
        .with(Stat::Cooldown, 5.0)
        .with(Stat::HasteTargets, 1.0);
    scaled(&mut watch, Stat::HasteDuration, &[(Bronze, 1.0), (Silver, 2.0), (Gold, 3.0)]);
    with_economy(&mut watch, 3.0);
    templates.push(enchantable(watch));

    // === Potions ===
    let mut infinite = item("Infinite Potion", ItemSize::Small, &[ItemTag::Potion]);
    infinite.kind = Behavior::InfinitePotion;
    infinite.base = Attributes::new().with(Stat::Cooldown, 10.0);
    scaled(&mut infinite, Stat::RegenAmount, &[(Gold, 2.0), (Diamond, 4.0)]);
    with_economy(&mut infinite, 10.0);
    templates.push(infinite);

    let mut frost = item("Frost Potion", ItemSize::Small, &[ItemTag::Potion]);
    frost.kind = Behavior::FrostPotion;
    frost.base = Attributes::new()
        .with(Stat::Cooldown, 9.0)
        .with(Stat::FreezeDuration, 2.0);
    scaled(&mut frost, Stat::FreezeTargets, &[(Bronze, 1.0), (Silver, 2.0), (Gold, 3.0)]);
    with_economy(&mut frost, 4.0);
    templates.push(frost);

    // === Economy ===
    let mut coin = item("Gold Coin", ItemSize::Small, &[ItemTag::Loot]);
    coin.non_combat = true;
    scaled(&mut coin, Stat::Value, &[(Bronze, 1.0)]);
    coin.tiers.entry(Bronze).or_default().set(Stat::Cost, 1.0);
    templates.push(coin);

    ItemTemplates { templates }
}
