//! Status effects
//!
//! Periodic burn/poison, the sandstorm, and freeze/slow/haste targeting.

use rand::seq::SliceRandom;
use rand::Rng;

use super::damage::{apply_damage, DamageResult};
use super::log::{CombatEvent, CombatLog, LogCategory};
use super::scheduler::{seconds_to_ticks, ticks_to_seconds};
use super::side::{CombatSide, Side};
use crate::items::{Board, Enchantment, ItemId, ItemSize};

/// Burn resolves every half second
pub const BURN_INTERVAL_TICKS: u64 = 5;
/// Poison resolves every second
pub const POISON_INTERVAL_TICKS: u64 = 10;
/// Sandstorm hits every 0.2 seconds once active
pub const SANDSTORM_INTERVAL_TICKS: u64 = 2;
/// Slow multiplies the remaining cooldown
pub const SLOW_FACTOR: f64 = 1.5;

/// Deal the current burn value through shield, then decay it by 1
pub fn burn_tick(side: &mut CombatSide, tick: u64, log: &mut CombatLog) -> Option<DamageResult> {
    if side.burn <= 0.0 {
        return None;
    }
    let amount = side.burn;
    let result = apply_damage(side, amount, "burn", tick, log);
    side.burn = (side.burn - 1.0).max(0.0);
    log.push(
        tick,
        LogCategory::Burn,
        format!("{} burned for {:.1} (burn now {:.1})", side.name, amount, side.burn),
    );
    Some(result)
}

/// Deal the current poison value straight to health; poison never decays
pub fn poison_tick(side: &mut CombatSide, tick: u64, log: &mut CombatLog) -> f64 {
    if side.poison <= 0.0 {
        return 0.0;
    }
    let dealt = side.take_unblockable(side.poison);
    log.push(
        tick,
        LogCategory::Poison,
        format!("{} took {:.1} poison damage ({:.1} health left)", side.name, dealt, side.health),
    );
    dealt
}

/// Escalating environmental damage applied to both sides
#[derive(Debug, Clone, PartialEq)]
pub struct Sandstorm {
    start_tick: u64,
    next_damage: f64,
}

impl Sandstorm {
    pub fn new(start_secs: f64) -> Self {
        Self {
            start_tick: seconds_to_ticks(start_secs),
            next_damage: 1.0,
        }
    }

    pub fn start_tick(&self) -> u64 {
        self.start_tick
    }

    pub fn reset(&mut self) {
        self.next_damage = 1.0;
    }

    /// Damage due this tick, if any; escalates by 1 after every application
    pub fn tick(&mut self, tick: u64) -> Option<f64> {
        if tick < self.start_tick || (tick - self.start_tick) % SANDSTORM_INTERVAL_TICKS != 0 {
            return None;
        }
        let damage = self.next_damage;
        self.next_damage += 1.0;
        Some(damage)
    }
}

/// Parameters of one freeze application
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FreezeParams {
    pub targets: u32,
    pub duration_ticks: u64,
    /// Only items of exactly this size are eligible
    pub size: Option<ItemSize>,
}

/// Freeze up to `targets` distinct random items on `board`.
/// Returns how many were frozen.
pub fn apply_freeze(
    board: &mut Board,
    owner: Side,
    params: FreezeParams,
    tick: u64,
    rng: &mut impl Rng,
    log: &mut CombatLog,
) -> usize {
    if params.targets == 0 || params.duration_ticks == 0 {
        return 0;
    }
    let eligible: Vec<ItemId> = board
        .items()
        .filter(|item| {
            !item.is_non_combat()
                && item.enchantment() != Some(Enchantment::Radiant)
                && !item.attrs.immunities.freeze
                && params.size.map_or(true, |size| item.size() == size)
        })
        .map(|item| item.id)
        .collect();

    let chosen: Vec<ItemId> = eligible
        .choose_multiple(rng, params.targets as usize)
        .copied()
        .collect();

    for &id in &chosen {
        let Some(item) = board.get_mut(id) else { continue };
        let until = tick + params.duration_ticks;
        // Overlapping freezes only extend by the part not already covered
        let covered_until = item.state.next_unfreeze_tick.filter(|&t| t > tick).unwrap_or(tick);
        let extension = until.saturating_sub(covered_until);
        item.state.next_trigger_tick += extension;
        item.state.next_unfreeze_tick = Some(until.max(covered_until));

        log.push(
            tick,
            LogCategory::Freeze,
            format!("{}'s {} frozen for {:.1}s", owner, item.name(), ticks_to_seconds(params.duration_ticks)),
        );
        log.record(CombatEvent::Frozen {
            tick,
            side: owner,
            item: item.name().to_string(),
            until: until.max(covered_until),
        });
    }
    chosen.len()
}

/// Slow the first `targets` items in board order. Returns how many were slowed.
pub fn apply_slow(board: &mut Board, owner: Side, targets: u32, tick: u64, log: &mut CombatLog) -> usize {
    if targets == 0 {
        return 0;
    }
    let chosen: Vec<ItemId> = board
        .items()
        .filter(|item| !item.is_non_combat() && !item.attrs.immunities.slow)
        .take(targets as usize)
        .map(|item| item.id)
        .collect();

    for &id in &chosen {
        let Some(item) = board.get_mut(id) else { continue };
        let remaining = item.state.next_trigger_tick.saturating_sub(tick);
        let slowed = (remaining as f64 * SLOW_FACTOR).round() as u64;
        item.state.next_trigger_tick = tick + slowed;
        log.push(
            tick,
            LogCategory::Effect,
            format!("{}'s {} slowed ({} -> {} ticks remaining)", owner, item.name(), remaining, slowed),
        );
    }
    chosen.len()
}

/// Pull random items' next trigger forward by `haste_ticks`, never into the past.
/// Returns how many were hasted.
pub fn apply_haste(
    board: &mut Board,
    owner: Side,
    targets: u32,
    haste_ticks: u64,
    tick: u64,
    rng: &mut impl Rng,
    log: &mut CombatLog,
) -> usize {
    if targets == 0 || haste_ticks == 0 {
        return 0;
    }
    let eligible: Vec<ItemId> = board
        .items()
        .filter(|item| !item.is_non_combat() && item.cooldown_secs() > 0.0)
        .map(|item| item.id)
        .collect();

    let chosen: Vec<ItemId> = eligible
        .choose_multiple(rng, targets as usize)
        .copied()
        .collect();

    for &id in &chosen {
        let Some(item) = board.get_mut(id) else { continue };
        let before = item.state.next_trigger_tick;
        item.state.next_trigger_tick = before.saturating_sub(haste_ticks).max(tick);
        log.push(
            tick,
            LogCategory::Effect,
            format!(
                "{}'s {} hasted by {} ticks",
                owner,
                item.name(),
                before.saturating_sub(item.state.next_trigger_tick)
            ),
        );
    }
    chosen.len()
}
