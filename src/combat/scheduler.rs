//! Tick scheduler
//!
//! Discrete clock plus a deferred-effect queue keyed by absolute tick.
//! Knows nothing about items or combat rules.

use std::collections::BTreeMap;

use super::side::Side;
use crate::items::ItemSize;

/// Simulated seconds per tick
pub const TICK_SECONDS: f64 = 0.1;

/// Ticks per simulated second
pub const TICKS_PER_SECOND: u64 = 10;

pub fn seconds_to_ticks(seconds: f64) -> u64 {
    (seconds / TICK_SECONDS).round().max(0.0) as u64
}

/// Inverse of [`seconds_to_ticks`], rounded to one decimal
pub fn ticks_to_seconds(ticks: u64) -> f64 {
    (ticks as f64 * TICK_SECONDS * 10.0).round() / 10.0
}

/// Status effects are returned raw for the caller to re-dispatch
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StatusKind {
    Burn,
    Poison,
    Freeze { duration_ticks: u64, size: Option<ItemSize> },
    Slow,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EffectKind {
    Damage,
    Heal,
    Shield,
    Status(StatusKind),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingEffect {
    pub kind: EffectKind,
    /// Amount, or target count for freeze/slow
    pub value: f64,
    pub target: Side,
}

impl PendingEffect {
    pub fn heal(target: Side, value: f64) -> Self {
        Self { kind: EffectKind::Heal, value, target }
    }

    pub fn damage(target: Side, value: f64) -> Self {
        Self { kind: EffectKind::Damage, value, target }
    }

    pub fn shield(target: Side, value: f64) -> Self {
        Self { kind: EffectKind::Shield, value, target }
    }

    pub fn status(target: Side, status: StatusKind, value: f64) -> Self {
        Self { kind: EffectKind::Status(status), value, target }
    }
}

/// Net damage/heal/shield due for one side this tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EffectTotals {
    pub damage: f64,
    pub heal: f64,
    pub shield: f64,
}

impl EffectTotals {
    pub fn is_empty(&self) -> bool {
        self.damage == 0.0 && self.heal == 0.0 && self.shield == 0.0
    }
}

/// Everything that came due on one tick
#[derive(Debug, Clone, Default)]
pub struct DueEffects {
    totals: [EffectTotals; 2],
    pub statuses: Vec<PendingEffect>,
}

impl DueEffects {
    pub fn totals(&self, side: Side) -> EffectTotals {
        self.totals[side.index()]
    }

    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty() && self.totals.iter().all(EffectTotals::is_empty)
    }
}

#[derive(Debug, Clone, Default)]
pub struct TickScheduler {
    current_tick: u64,
    pending: BTreeMap<u64, Vec<PendingEffect>>,
}

impl TickScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_tick(&self) -> u64 {
        self.current_tick
    }

    /// Current simulated time in seconds
    pub fn current_time(&self) -> f64 {
        ticks_to_seconds(self.current_tick)
    }

    /// Queue an effect `delay_ticks` after the current tick
    pub fn schedule_effect(&mut self, delay_ticks: u64, effect: PendingEffect) {
        let due = self.current_tick + delay_ticks;
        self.pending.entry(due).or_default().push(effect);
    }

    /// Drain everything due at the current tick, summing damage/heal/shield
    /// per target side.
    pub fn process_tick(&mut self) -> DueEffects {
        let mut due = DueEffects::default();
        let Some(effects) = self.pending.remove(&self.current_tick) else {
            return due;
        };

        for effect in effects {
            let totals = &mut due.totals[effect.target.index()];
            match effect.kind {
                EffectKind::Damage => totals.damage += effect.value,
                EffectKind::Heal => totals.heal += effect.value,
                EffectKind::Shield => totals.shield += effect.value,
                EffectKind::Status(_) => due.statuses.push(effect),
            }
        }
        due
    }

    pub fn advance(&mut self) {
        self.current_tick += 1;
    }

    pub fn reset(&mut self) {
        self.current_tick = 0;
        self.pending.clear();
    }

    /// Number of queued effects not yet due
    pub fn pending_count(&self) -> usize {
        self.pending.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_conversion() {
        assert_eq!(seconds_to_ticks(5.0), 50);
        assert_eq!(seconds_to_ticks(0.5), 5);
        assert_eq!(seconds_to_ticks(1.04), 10);
        assert_eq!(seconds_to_ticks(-1.0), 0);
        assert_eq!(ticks_to_seconds(250), 25.0);
        assert_eq!(ticks_to_seconds(302), 30.2);
    }

    #[test]
    fn test_effects_fire_on_due_tick_only() {
        let mut scheduler = TickScheduler::new();
        scheduler.schedule_effect(2, PendingEffect::heal(Side::Player, 5.0));

        assert!(scheduler.process_tick().is_empty());
        scheduler.advance();
        assert!(scheduler.process_tick().is_empty());
        scheduler.advance();

        let due = scheduler.process_tick();
        assert_eq!(due.totals(Side::Player).heal, 5.0);
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[test]
    fn test_same_tick_effects_are_summed_per_side() {
        let mut scheduler = TickScheduler::new();
        scheduler.schedule_effect(1, PendingEffect::damage(Side::Monster, 3.0));
        scheduler.schedule_effect(1, PendingEffect::damage(Side::Monster, 4.0));
        scheduler.schedule_effect(1, PendingEffect::shield(Side::Player, 2.0));
        scheduler.schedule_effect(1, PendingEffect::status(Side::Monster, StatusKind::Burn, 6.0));
        scheduler.advance();

        let due = scheduler.process_tick();
        assert_eq!(due.totals(Side::Monster).damage, 7.0);
        assert_eq!(due.totals(Side::Player).shield, 2.0);
        assert_eq!(due.totals(Side::Player).damage, 0.0);
        assert_eq!(due.statuses.len(), 1);
        assert_eq!(due.statuses[0].kind, EffectKind::Status(StatusKind::Burn));
    }

    #[test]
    fn test_reset_clears_queue() {
        let mut scheduler = TickScheduler::new();
        scheduler.schedule_effect(10, PendingEffect::heal(Side::Player, 1.0));
        scheduler.advance();
        scheduler.reset();

        assert_eq!(scheduler.current_tick(), 0);
        assert_eq!(scheduler.pending_count(), 0);
    }
}
