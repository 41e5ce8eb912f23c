//! Fight driver
//!
//! Runs one fight tick by tick until a side falls, and batches fights into
//! an analysis. Within a tick the order is fixed:
//!
//! 1. burn (player, then monster)
//! 2. poison (player, then monster)
//! 3. sandstorm
//! 4. scheduled effects (summed damage/heal/shield, then statuses)
//! 5. regeneration re-arm
//! 6. item triggers (player board, then monster board, in slot order)
//! 7. end-of-tick bookkeeping

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

use super::damage::{apply_damage, apply_heal, apply_shield};
use super::log::{CombatEvent, CombatLog, LogCategory, LogMode, Winner};
use super::scheduler::{
    ticks_to_seconds, EffectKind, PendingEffect, StatusKind, TickScheduler, TICKS_PER_SECOND,
};
use super::side::{CombatSide, Loadout, Side};
use super::status::{
    apply_freeze, apply_slow, burn_tick, poison_tick, FreezeParams, Sandstorm, BURN_INTERVAL_TICKS,
    POISON_INTERVAL_TICKS,
};
use crate::config::SimConfig;

/// Outcome of one fight
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FightOutcome {
    pub winner: Winner,
    /// Tick on which the fight ended
    pub ticks: u64,
    pub duration_secs: f64,
    pub player_health: f64,
    pub monster_health: f64,
    /// Ended by the safety cap rather than by a defeat
    pub timed_out: bool,
}

/// Per-item trigger totals across an analysis
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TriggerCount {
    pub side: Side,
    pub item: String,
    pub triggers: u64,
}

/// Aggregate result of many fights
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub runs: u32,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub win_rate: f64,
    pub average_ticks: f64,
    pub trigger_counts: Vec<TriggerCount>,
}

/// Mutable views of the engine split by side
pub(super) struct Parts<'a> {
    pub own: &'a mut CombatSide,
    pub foe: &'a mut CombatSide,
    pub log: &'a mut CombatLog,
    pub rng: &'a mut StdRng,
}

pub struct CombatEngine {
    config: SimConfig,
    pub(super) player: CombatSide,
    pub(super) monster: CombatSide,
    scheduler: TickScheduler,
    sandstorm: Sandstorm,
    pub(super) rng: StdRng,
    pub(super) log: CombatLog,
}

impl CombatEngine {
    pub fn new(player: Loadout, monster: Loadout, config: SimConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut engine = Self {
            sandstorm: Sandstorm::new(config.sandstorm_start_secs),
            log: CombatLog::new(config.log_mode),
            player: CombatSide::new(Side::Player, player),
            monster: CombatSide::new(Side::Monster, monster),
            scheduler: TickScheduler::new(),
            rng,
            config,
        };
        engine.reset();
        engine
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn side(&self, side: Side) -> &CombatSide {
        match side {
            Side::Player => &self.player,
            Side::Monster => &self.monster,
        }
    }

    pub fn side_mut(&mut self, side: Side) -> &mut CombatSide {
        match side {
            Side::Player => &mut self.player,
            Side::Monster => &mut self.monster,
        }
    }

    pub(super) fn parts(&mut self, side: Side) -> Parts<'_> {
        let (own, foe) = match side {
            Side::Player => (&mut self.player, &mut self.monster),
            Side::Monster => (&mut self.monster, &mut self.player),
        };
        Parts {
            own,
            foe,
            log: &mut self.log,
            rng: &mut self.rng,
        }
    }

    pub fn log(&self) -> &CombatLog {
        &self.log
    }

    pub fn set_log_mode(&mut self, mode: LogMode) {
        self.log.set_mode(mode);
    }

    pub fn current_tick(&self) -> u64 {
        self.scheduler.current_tick()
    }

    /// Queue an effect relative to the current tick
    pub fn schedule_effect(&mut self, delay_ticks: u64, effect: PendingEffect) {
        self.scheduler.schedule_effect(delay_ticks, effect);
    }

    /// Return every side, item and queue to its pre-fight state
    pub fn reset(&mut self) {
        self.scheduler.reset();
        self.sandstorm.reset();
        self.log.clear();
        self.player.reset_for_fight();
        self.monster.reset_for_fight();
    }

    /// Run one fight to completion from a clean state
    pub fn run_single_fight(&mut self) -> FightOutcome {
        self.reset();
        log::debug!("Fight start: {} vs {}", self.player.name, self.monster.name);

        loop {
            if let Some(winner) = self.step() {
                return self.finish(winner, false);
            }
            if self.current_tick() > self.config.max_ticks {
                log::warn!("Fight hit the {} tick cap; declaring a draw", self.config.max_ticks);
                return self.finish(Winner::Draw, true);
            }
        }
    }

    /// Execute the current tick. Returns the winner if the fight ended on it,
    /// otherwise advances the clock.
    pub fn step(&mut self) -> Option<Winner> {
        let tick = self.current_tick();

        self.resolve_periodic(tick);
        self.resolve_sandstorm(tick);
        self.resolve_scheduled(tick);
        self.rearm_regen();
        self.run_triggers(Side::Player, tick);
        self.run_triggers(Side::Monster, tick);

        log::trace!(
            "tick {}: player {:.1}hp/{:.1}sh, monster {:.1}hp/{:.1}sh",
            tick,
            self.player.health,
            self.player.shield,
            self.monster.health,
            self.monster.shield
        );

        let winner = self.check_winner();
        if winner.is_none() {
            self.scheduler.advance();
        }
        winner
    }

    fn check_winner(&self) -> Option<Winner> {
        match (self.player.is_defeated(), self.monster.is_defeated()) {
            (true, true) => Some(Winner::Draw),
            (false, true) => Some(Winner::Player),
            (true, false) => Some(Winner::Monster),
            (false, false) => None,
        }
    }

    fn finish(&mut self, winner: Winner, timed_out: bool) -> FightOutcome {
        let tick = self.current_tick();
        self.log.record(CombatEvent::FightEnded { tick, winner });
        let summary = match winner {
            Winner::Player => format!("{} wins", self.player.name),
            Winner::Monster => format!("{} wins", self.monster.name),
            Winner::Draw if timed_out => "Out of time; the fight is a draw".to_string(),
            Winner::Draw => "Both sides fell; the fight is a draw".to_string(),
        };
        self.log.push(tick, LogCategory::State, summary);
        log::debug!("Fight over at tick {}: {:?}", tick, winner);

        FightOutcome {
            winner,
            ticks: tick,
            duration_secs: ticks_to_seconds(tick),
            player_health: self.player.health,
            monster_health: self.monster.health,
            timed_out,
        }
    }

    fn resolve_periodic(&mut self, tick: u64) {
        if tick == 0 {
            return;
        }
        if tick % BURN_INTERVAL_TICKS == 0 {
            burn_tick(&mut self.player, tick, &mut self.log);
            burn_tick(&mut self.monster, tick, &mut self.log);
        }
        if tick % POISON_INTERVAL_TICKS == 0 {
            poison_tick(&mut self.player, tick, &mut self.log);
            poison_tick(&mut self.monster, tick, &mut self.log);
        }
    }

    fn resolve_sandstorm(&mut self, tick: u64) {
        let Some(damage) = self.sandstorm.tick(tick) else {
            return;
        };
        if tick == self.sandstorm.start_tick() {
            self.log.push(tick, LogCategory::State, "The sandstorm begins");
        }
        apply_damage(&mut self.player, damage, "the sandstorm", tick, &mut self.log);
        apply_damage(&mut self.monster, damage, "the sandstorm", tick, &mut self.log);
        self.log.record(CombatEvent::Sandstorm { tick, damage });
    }

    fn resolve_scheduled(&mut self, tick: u64) {
        let due = self.scheduler.process_tick();
        if due.is_empty() {
            return;
        }

        for side in [Side::Player, Side::Monster] {
            let totals = due.totals(side);
            let target = match side {
                Side::Player => &mut self.player,
                Side::Monster => &mut self.monster,
            };
            if totals.damage > 0.0 {
                apply_damage(target, totals.damage, "delayed damage", tick, &mut self.log);
            }
            if totals.heal > 0.0 {
                apply_heal(target, totals.heal, "regeneration", tick, &mut self.log);
            }
            if totals.shield > 0.0 {
                apply_shield(target, totals.shield, "delayed shield", tick, &mut self.log);
            }
        }

        for effect in due.statuses {
            let EffectKind::Status(status) = effect.kind else {
                continue;
            };
            let target = effect.target;
            let parts = self.parts(target);
            match status {
                StatusKind::Burn => parts.own.burn += effect.value,
                StatusKind::Poison => parts.own.poison += effect.value,
                StatusKind::Freeze { duration_ticks, size } => {
                    let params = FreezeParams {
                        targets: effect.value.max(0.0).round() as u32,
                        duration_ticks,
                        size,
                    };
                    apply_freeze(&mut parts.own.board, target, params, tick, parts.rng, parts.log);
                }
                StatusKind::Slow => {
                    let targets = effect.value.max(0.0).round() as u32;
                    apply_slow(&mut parts.own.board, target, targets, tick, parts.log);
                }
            }
        }
    }

    /// Every tick with positive regen queues a heal of that size a second ahead
    fn rearm_regen(&mut self) {
        for side in [Side::Player, Side::Monster] {
            let amount = self.side(side).regen;
            if amount > 0.0 {
                self.scheduler
                    .schedule_effect(TICKS_PER_SECOND, PendingEffect::heal(side, amount));
            }
        }
    }

    /// Run `runs` independent fights and aggregate the results
    pub fn simulate_fight(&mut self, runs: u32) -> AnalysisReport {
        let mut report = AnalysisReport {
            runs,
            ..AnalysisReport::default()
        };
        let mut counts: BTreeMap<(Side, String), u64> = BTreeMap::new();
        let mut total_ticks: u64 = 0;

        for _ in 0..runs {
            let outcome = self.run_single_fight();
            match outcome.winner {
                Winner::Player => report.wins += 1,
                Winner::Monster => report.losses += 1,
                Winner::Draw => report.draws += 1,
            }
            total_ticks += outcome.ticks;

            for side in [Side::Player, Side::Monster] {
                for item in self.side(side).board.items() {
                    *counts.entry((side, item.name().to_string())).or_default() +=
                        item.state.trigger_count;
                }
            }
        }

        if runs > 0 {
            report.win_rate = report.wins as f64 / runs as f64;
            report.average_ticks = total_ticks as f64 / runs as f64;
        }
        report.trigger_counts = counts
            .into_iter()
            .map(|((side, item), triggers)| TriggerCount { side, item, triggers })
            .collect();

        log::info!(
            "Analysis of {} fights: {} wins, {} losses, {} draws ({:.1}% win rate)",
            runs,
            report.wins,
            report.losses,
            report.draws,
            report.win_rate * 100.0
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::side::PlayerStats;
    use crate::items::Board;

    fn empty_engine(player_health: f64, monster_health: f64) -> CombatEngine {
        let config = SimConfig {
            seed: Some(1),
            log_mode: LogMode::Feed,
            ..SimConfig::default()
        };
        CombatEngine::new(
            Loadout::new("Player", PlayerStats::new(player_health), Board::new()),
            Loadout::new("Dummy", PlayerStats::new(monster_health), Board::new()),
            config,
        )
    }

    #[test]
    fn test_sandstorm_ends_empty_fights() {
        let mut engine = empty_engine(10.0, 20.0);
        let outcome = engine.run_single_fight();
        assert_eq!(outcome.winner, Winner::Monster);
        assert!(outcome.ticks >= 300);
        assert!(!outcome.timed_out);
    }

    #[test]
    fn test_simultaneous_defeat_is_draw() {
        let mut engine = empty_engine(10.0, 10.0);
        let outcome = engine.run_single_fight();
        assert_eq!(outcome.winner, Winner::Draw);
    }

    #[test]
    fn test_tick_cap_declares_draw() {
        let mut engine = empty_engine(1000.0, 1000.0);
        engine.config.max_ticks = 50;
        let outcome = engine.run_single_fight();
        assert_eq!(outcome.winner, Winner::Draw);
        assert!(outcome.timed_out);
    }

    #[test]
    fn test_regen_rearms_every_tick() {
        let mut engine = empty_engine(100.0, 100.0);
        engine.player.regen = 1.0;
        engine.player.health = 50.0;

        for _ in 0..10 {
            engine.step();
        }
        // First heal, queued at tick 0, lands at tick 10
        assert_eq!(engine.player.health, 50.0);
        engine.step();
        assert_eq!(engine.player.health, 51.0);
        for _ in 0..9 {
            engine.step();
        }
        assert_eq!(engine.player.health, 60.0);
    }

    #[test]
    fn test_regen_increase_lands_a_second_later() {
        let mut engine = empty_engine(100.0, 100.0);
        engine.player.regen = 1.0;
        engine.player.health = 50.0;

        for _ in 0..5 {
            engine.step();
        }
        engine.player.regen = 3.0;
        // Ticks 10..14 carry the old rate, ticks 15..19 the new one
        for _ in 0..15 {
            engine.step();
        }
        assert_eq!(engine.player.health, 50.0 + 5.0 * 1.0 + 5.0 * 3.0);
    }

    #[test]
    fn test_scheduled_statuses_are_dispatched() {
        let mut engine = empty_engine(100.0, 100.0);
        engine.schedule_effect(1, PendingEffect::status(Side::Monster, StatusKind::Poison, 2.0));
        engine.schedule_effect(1, PendingEffect::damage(Side::Monster, 4.0));
        engine.schedule_effect(1, PendingEffect::status(Side::Player, StatusKind::Burn, 3.0));
        engine.step();
        engine.step();
        assert_eq!(engine.monster.poison, 2.0);
        assert_eq!(engine.player.burn, 3.0);
        assert_eq!(engine.monster.health, 96.0);
    }

    #[test]
    fn test_reset_between_runs() {
        let mut engine = empty_engine(10.0, 20.0);
        let first = engine.run_single_fight();
        let second = engine.run_single_fight();
        assert_eq!(first, second);
        assert!(engine.log().events().iter().any(|e| matches!(e, CombatEvent::FightEnded { .. })));
    }
}
