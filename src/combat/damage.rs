//! Damage, healing and shielding
//!
//! Shared routines used by default item effects, special behaviors and
//! periodic effects alike.

use rand::Rng;

use super::log::{CombatLog, LogCategory};
use super::side::CombatSide;
use crate::items::{Attributes, Stat};

/// Crit multiplier when an item sets no `critDamage`
pub const DEFAULT_CRIT_MULTIPLIER: f64 = 2.0;

/// How an incoming hit was split between shield and health
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DamageResult {
    pub absorbed: f64,
    pub health_lost: f64,
}

impl DamageResult {
    pub fn total(&self) -> f64 {
        self.absorbed + self.health_lost
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HealOutcome {
    Healed(f64),
    /// Healing at full health is reported, not silently ignored
    AlreadyFull,
}

impl CombatSide {
    /// Shield absorbs first; the remainder comes off health (which may go negative)
    pub fn take_damage(&mut self, amount: f64) -> DamageResult {
        if amount <= 0.0 {
            return DamageResult::default();
        }
        let absorbed = amount.min(self.shield.max(0.0));
        let health_lost = amount - absorbed;
        self.shield -= absorbed;
        self.health -= health_lost;
        DamageResult { absorbed, health_lost }
    }

    /// Damage straight to health, ignoring shield
    pub fn take_unblockable(&mut self, amount: f64) -> f64 {
        if amount <= 0.0 {
            return 0.0;
        }
        self.health -= amount;
        amount
    }

    /// Heal up to max health
    pub fn heal(&mut self, amount: f64) -> HealOutcome {
        if self.health >= self.max_health {
            return HealOutcome::AlreadyFull;
        }
        let actual = amount.max(0.0).min(self.max_health - self.health);
        self.health += actual;
        HealOutcome::Healed(actual)
    }

    pub fn gain_shield(&mut self, amount: f64) {
        if amount > 0.0 {
            self.shield += amount;
        }
    }
}

/// Deal damage through shield then health and report both portions
pub fn apply_damage(
    target: &mut CombatSide,
    amount: f64,
    source: &str,
    tick: u64,
    log: &mut CombatLog,
) -> DamageResult {
    let result = target.take_damage(amount);
    if result.total() > 0.0 && log.is_recording() {
        if result.absorbed > 0.0 {
            log.push(
                tick,
                LogCategory::Shield,
                format!("{} absorbed {:.1} from {} ({:.1} shield left)", target.name, result.absorbed, source, target.shield),
            );
        }
        if result.health_lost > 0.0 {
            log.push(
                tick,
                LogCategory::Damage,
                format!("{} took {:.1} damage from {} ({:.1} health left)", target.name, result.health_lost, source, target.health),
            );
        }
    }
    result
}

pub fn apply_heal(
    target: &mut CombatSide,
    amount: f64,
    source: &str,
    tick: u64,
    log: &mut CombatLog,
) -> HealOutcome {
    let outcome = target.heal(amount);
    match outcome {
        HealOutcome::Healed(actual) => log.push(
            tick,
            LogCategory::Heal,
            format!("{} healed {:.1} from {} ({:.1}/{:.1})", target.name, actual, source, target.health, target.max_health),
        ),
        HealOutcome::AlreadyFull => log.push(
            tick,
            LogCategory::Heal,
            format!("{} is already at full health; {} had no effect", target.name, source),
        ),
    }
    outcome
}

pub fn apply_shield(target: &mut CombatSide, amount: f64, source: &str, tick: u64, log: &mut CombatLog) {
    if amount <= 0.0 {
        return;
    }
    target.gain_shield(amount);
    log.push(
        tick,
        LogCategory::Shield,
        format!("{} gained {:.1} shield from {} ({:.1} total)", target.name, amount, source, target.shield),
    );
}

/// Roll for a crit; returns the multiplier to apply
pub fn roll_crit(attrs: &Attributes, rng: &mut impl Rng) -> Option<f64> {
    let chance = attrs.get(Stat::Crit).clamp(0.0, 1.0);
    if chance <= 0.0 || !rng.gen_bool(chance) {
        return None;
    }
    Some(attrs.get_opt(Stat::CritDamage).unwrap_or(DEFAULT_CRIT_MULTIPLIER))
}
