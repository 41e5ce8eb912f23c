//! Item triggers
//!
//! Each ready item runs pre → main → post hooks. Special behaviors replace
//! or wrap the default effect sequence; everything else is driven by the
//! item's resolved attributes.

use super::damage::{apply_damage, apply_heal, apply_shield, roll_crit};
use super::engine::{CombatEngine, Parts};
use super::log::{CombatEvent, LogCategory};
use super::scheduler::seconds_to_ticks;
use super::side::Side;
use super::status::{apply_freeze, apply_haste, apply_slow, FreezeParams};
use crate::items::{Attributes, Behavior, ItemId, ItemPhase, ItemTag, Stat};

/// What happened when an item was asked to trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerOutcome {
    Fired,
    NotReady,
    Frozen,
    OutOfAmmo,
    Missing,
}

/// Damage and shield for one cast after pre-trigger overrides
#[derive(Debug, Clone, Copy)]
struct CastValues {
    damage: f64,
    shield: f64,
}

fn freeze_params(attrs: &Attributes) -> FreezeParams {
    FreezeParams {
        targets: attrs.count(Stat::FreezeTargets),
        duration_ticks: seconds_to_ticks(attrs.get(Stat::FreezeDuration)),
        size: attrs.freeze_size,
    }
}

impl CombatEngine {
    /// Fire every ready item on `side`, in board order
    pub(super) fn run_triggers(&mut self, side: Side, tick: u64) {
        for id in self.side(side).board.ordered_ids() {
            self.try_trigger(side, id, tick);
        }
    }

    /// Attempt to fire one item at `tick`
    pub fn try_trigger(&mut self, side: Side, id: ItemId, tick: u64) -> TriggerOutcome {
        let Parts { own, log, .. } = self.parts(side);
        let Some(item) = own.board.get_mut(id) else {
            return TriggerOutcome::Missing;
        };
        if item.is_frozen(tick) {
            return TriggerOutcome::Frozen;
        }
        if !item.is_ready(tick) {
            return TriggerOutcome::NotReady;
        }

        if item.max_ammo() > 0 {
            if item.state.ammo == 0 {
                // Stays ready and retries every tick until refilled
                if !item.state.out_of_ammo_reported {
                    item.state.out_of_ammo_reported = true;
                    log::trace!("{}'s {} is out of ammo", side, item.name());
                    log.record(CombatEvent::OutOfAmmo {
                        tick,
                        side,
                        item: item.name().to_string(),
                    });
                }
                return TriggerOutcome::OutOfAmmo;
            }
            item.state.ammo -= 1;
        }

        item.state.phase = ItemPhase::Triggering;
        item.state.trigger_count += 1;
        let name = item.name().to_string();
        log.record(CombatEvent::Triggered {
            tick,
            side,
            item: name.clone(),
        });
        log.push(tick, LogCategory::Trigger, format!("{}'s {} triggered", side, name));

        self.pre_trigger(side, id);
        self.main_trigger(side, id, tick);
        self.post_trigger(side, id, tick);

        if let Some(item) = self.side_mut(side).board.get_mut(id) {
            let cooldown_ticks = seconds_to_ticks(item.cooldown_secs()).max(1);
            item.state.cooldown_ticks = cooldown_ticks;
            item.state.next_trigger_tick = tick + cooldown_ticks;
            item.state.phase = ItemPhase::Idle;
        }
        TriggerOutcome::Fired
    }

    fn pre_trigger(&mut self, side: Side, id: ItemId) {
        let board = &mut self.side_mut(side).board;
        let Some(behavior) = board.get(id).map(|item| item.behavior()) else {
            return;
        };

        match behavior {
            Behavior::HighestShieldDamage => {
                let highest = board
                    .items()
                    .map(|item| item.attrs.get(Stat::Shield))
                    .fold(0.0, f64::max);
                if let Some(item) = board.get_mut(id) {
                    item.state.calculated_damage = Some(highest);
                }
            }
            Behavior::AquaticCountShield => {
                let aquatic = board.items().filter(|item| item.has_tag(ItemTag::Aquatic)).count();
                if let Some(item) = board.get_mut(id) {
                    let per = item.attrs.get(Stat::ShieldPerAquatic);
                    item.state.calculated_shield = Some(aquatic as f64 * per);
                }
            }
            _ => {}
        }
    }

    fn main_trigger(&mut self, side: Side, id: ItemId, tick: u64) {
        let Some(item) = self.side(side).board.get(id) else {
            return;
        };
        let behavior = item.behavior();
        let name = item.name().to_string();
        let attrs = item.attrs.clone();
        let multicast = item.multicast();
        let cast = CastValues {
            damage: match item.state.calculated_damage {
                Some(damage) => damage * attrs.get_opt(Stat::DamageMultiplier).unwrap_or(1.0),
                None => item.trigger_damage(),
            },
            shield: item
                .state
                .calculated_shield
                .unwrap_or_else(|| attrs.get(Stat::Shield)),
        };

        match behavior {
            Behavior::InfinitePotion => self.refill_and_regen(side, &name, &attrs, tick),
            Behavior::FrostPotion => {
                let Parts { foe, log, rng, .. } = self.parts(side);
                apply_freeze(&mut foe.board, side.opponent(), freeze_params(&attrs), tick, rng, log);
            }
            _ => {
                for _ in 0..multicast {
                    self.default_effects(side, &name, &attrs, cast, tick);
                }
            }
        }
    }

    fn post_trigger(&mut self, side: Side, id: ItemId, tick: u64) {
        let Parts { own, log, .. } = self.parts(side);
        let Some(item) = own.board.get(id) else {
            return;
        };

        if item.behavior() == Behavior::ShieldBoost {
            let bonus = item.attrs.get(Stat::ShieldBonus);
            let source = item.name().to_string();
            for other in own.board.ordered_ids() {
                let Some(target) = own.board.get_mut(other) else { continue };
                let shield = target.attrs.get(Stat::Shield);
                if shield > 0.0 {
                    target.attrs.set(Stat::Shield, shield + bonus);
                    log.push(
                        tick,
                        LogCategory::Shield,
                        format!("{} raised {}'s shield to {:.1}", source, target.name(), shield + bonus),
                    );
                }
            }
        }

        if let Some(item) = own.board.get_mut(id) {
            item.state.calculated_damage = None;
            item.state.calculated_shield = None;
        }
    }

    /// The attribute-driven effect sequence, run once per cast
    fn default_effects(&mut self, side: Side, source: &str, attrs: &Attributes, cast: CastValues, tick: u64) {
        let Parts { own, foe, log, rng } = self.parts(side);

        if cast.damage > 0.0 {
            let mut damage = cast.damage;
            if let Some(multiplier) = roll_crit(attrs, rng) {
                damage *= multiplier;
                log.push(tick, LogCategory::Damage, format!("{} critically hit for {:.1}", source, damage));
            }
            apply_damage(foe, damage, source, tick, log);
        }

        let freeze = freeze_params(attrs);
        if freeze.targets > 0 {
            apply_freeze(&mut foe.board, side.opponent(), freeze, tick, rng, log);
        }

        let slow_targets = attrs.count(Stat::SlowTargets);
        if slow_targets > 0 {
            apply_slow(&mut foe.board, side.opponent(), slow_targets, tick, log);
        }

        let haste_targets = attrs.count(Stat::HasteTargets);
        if haste_targets > 0 {
            let haste_ticks = seconds_to_ticks(attrs.get(Stat::HasteDuration));
            apply_haste(&mut own.board, side, haste_targets, haste_ticks, tick, rng, log);
        }

        if cast.shield > 0.0 {
            apply_shield(own, cast.shield, source, tick, log);
        }

        let heal = attrs.get(Stat::Heal);
        if heal > 0.0 {
            apply_heal(own, heal, source, tick, log);
        }

        let poison = attrs.get(Stat::Poison);
        if poison > 0.0 {
            foe.poison += poison;
            log.push(
                tick,
                LogCategory::Poison,
                format!("{} poisoned {} for {:.1} (poison now {:.1})", source, foe.name, poison, foe.poison),
            );
        }

        let burn = attrs.get(Stat::Burn);
        if burn > 0.0 {
            foe.burn += burn;
            log.push(
                tick,
                LogCategory::Burn,
                format!("{} burned {} for {:.1} (burn now {:.1})", source, foe.name, burn, foe.burn),
            );
        }
    }

    fn refill_and_regen(&mut self, side: Side, source: &str, attrs: &Attributes, tick: u64) {
        let Parts { own, log, .. } = self.parts(side);

        let mut refilled = 0;
        for id in own.board.ordered_ids() {
            let Some(item) = own.board.get_mut(id) else { continue };
            if item.has_spare_ammo_capacity() {
                item.state.ammo += 1;
                item.state.out_of_ammo_reported = false;
                refilled += 1;
            }
        }

        let regen = attrs.get(Stat::RegenAmount);
        own.regen += regen;
        log.push(
            tick,
            LogCategory::Effect,
            format!(
                "{} refilled {} item(s) and raised {}'s regeneration to {:.1}",
                source, refilled, own.name, own.regen
            ),
        );
    }
}
