//! End-to-end fight scenarios

use bazaar_sim::combat::{CombatEngine, CombatEvent, Loadout, LogMode, PlayerStats, Side, Winner};
use bazaar_sim::config::SimConfig;
use bazaar_sim::data::{BoardEntry, DataManager};
use bazaar_sim::items::{Board, Enchantment, ItemId, Stat};

fn config(seed: u64) -> SimConfig {
    SimConfig {
        seed: Some(seed),
        log_mode: LogMode::Feed,
        ..SimConfig::default()
    }
}

fn dummy(health: f64) -> Loadout {
    Loadout::new("Dummy", PlayerStats::new(health), Board::new())
}

fn player(data: &DataManager, entries: &[BoardEntry]) -> Loadout {
    data.player_loadout("Player", PlayerStats::default(), entries).unwrap()
}

fn item_id(engine: &CombatEngine, side: Side, name: &str) -> ItemId {
    engine
        .side(side)
        .board
        .items()
        .find(|item| item.name() == name)
        .map(|item| item.id)
        .unwrap()
}

fn triggers_of(engine: &CombatEngine, name: &str) -> usize {
    engine
        .log()
        .events()
        .iter()
        .filter(|e| matches!(e, CombatEvent::Triggered { item, .. } if item == name))
        .count()
}

#[test]
fn test_single_sword_kills_dummy_at_25_seconds() {
    let data = DataManager::default();
    let monster = data.monster_loadout("Training Dummy").unwrap();
    let mut engine = CombatEngine::new(player(&data, &[BoardEntry::new("Rusty Sword")]), monster, config(1));

    for _ in 0..=50 {
        engine.step();
    }
    assert_eq!(engine.side(Side::Monster).health, 40.0);
    for _ in 51..100 {
        engine.step();
    }
    assert_eq!(engine.side(Side::Monster).health, 40.0);

    let outcome = engine.run_single_fight();
    assert_eq!(outcome.winner, Winner::Player);
    assert_eq!(outcome.ticks, 250);
    assert_eq!(outcome.duration_secs, 25.0);
    assert_eq!(outcome.monster_health, 0.0);
    assert_eq!(triggers_of(&engine, "Rusty Sword"), 5);
}

#[test]
fn test_obsidian_doubles_damage_until_removed() {
    let data = DataManager::default();
    let mut sword = data.instantiate("Rusty Sword", None, None).unwrap();
    assert_eq!(sword.trigger_damage(), 10.0);

    assert!(sword.apply_enchantment(Enchantment::Obsidian));
    assert_eq!(sword.trigger_damage(), 20.0);
    assert!(sword.remove_enchantment());
    assert_eq!(sword.trigger_damage(), 10.0);
    assert!(!sword.attrs.has(Stat::DamageMultiplier));

    let entries = [BoardEntry::new("Rusty Sword").enchanted(Enchantment::Obsidian)];
    let mut engine = CombatEngine::new(player(&data, &entries), dummy(50.0), config(1));
    let outcome = engine.run_single_fight();
    assert_eq!(outcome.winner, Winner::Player);
    assert_eq!(outcome.ticks, 150);
}

#[test]
fn test_sea_shell_counts_aquatic_items() {
    let data = DataManager::default();
    let entries = [
        BoardEntry::new("Sea Shell"),
        BoardEntry::new("Starfish"),
        BoardEntry::new("Fishing Net"),
        BoardEntry::new("Rusty Sword"),
    ];
    let mut engine = CombatEngine::new(player(&data, &entries), dummy(500.0), config(1));
    let shell = item_id(&engine, Side::Player, "Sea Shell");

    engine.try_trigger(Side::Player, shell, 60);
    assert_eq!(engine.side(Side::Player).shield, 30.0);
}

#[test]
fn test_same_tick_freezes_do_not_stack() {
    let data = DataManager::default();
    let mut player_board = Board::new();
    for _ in 0..2 {
        let ice = data.instantiate("Ice Cube", None, None).unwrap();
        player_board.add_item(ice).unwrap();
    }
    let mut monster_board = Board::new();
    monster_board
        .add_item(data.instantiate("Rusty Sword", None, None).unwrap())
        .unwrap();
    monster_board
        .add_item(data.instantiate("Buckler", None, None).unwrap())
        .unwrap();

    let mut engine = CombatEngine::new(
        Loadout::new("Player", PlayerStats::default(), player_board),
        Loadout::new("Monster", PlayerStats::new(500.0), monster_board),
        config(4),
    );
    let buckler = item_id(&engine, Side::Monster, "Buckler");
    let sword = item_id(&engine, Side::Monster, "Rusty Sword");

    // Buckler fires at 6.0s and is next due at 12.0s; both cubes fire at 7.0s
    for _ in 0..=70 {
        engine.step();
    }
    let frozen = engine.side(Side::Monster).board.get(buckler).unwrap();
    assert_eq!(frozen.state.next_trigger_tick, 130);
    assert_eq!(frozen.state.next_unfreeze_tick, Some(80));

    let untouched = engine.side(Side::Monster).board.get(sword).unwrap();
    assert_eq!(untouched.state.next_unfreeze_tick, None);

    let freezes = engine
        .log()
        .events()
        .iter()
        .filter(|e| matches!(e, CombatEvent::Frozen { side: Side::Monster, .. }))
        .count();
    assert_eq!(freezes, 2);
}

#[test]
fn test_sandstorm_escalates_on_both_sides() {
    let mut engine = CombatEngine::new(dummy(1000.0), dummy(1000.0), config(5));

    for _ in 0..300 {
        engine.step();
    }
    assert_eq!(engine.side(Side::Player).health, 1000.0);

    let mut expected = 1000.0;
    for hit in 1..=5 {
        engine.step();
        expected -= hit as f64;
        assert_eq!(engine.side(Side::Player).health, expected);
        assert_eq!(engine.side(Side::Monster).health, expected);
        engine.step();
    }

    let sandstorm_hits: Vec<f64> = engine
        .log()
        .events()
        .iter()
        .filter_map(|e| match e {
            CombatEvent::Sandstorm { damage, .. } => Some(*damage),
            _ => None,
        })
        .collect();
    assert_eq!(sandstorm_hits, vec![1.0, 2.0, 3.0, 4.0, 5.0]);
}

#[test]
fn test_ammo_limits_triggers_and_stays_out_of_feed() {
    let data = DataManager::default();
    let mut engine = CombatEngine::new(player(&data, &[BoardEntry::new("Crossbow")]), dummy(5000.0), config(2));
    let outcome = engine.run_single_fight();

    assert_eq!(outcome.winner, Winner::Monster);
    assert_eq!(triggers_of(&engine, "Crossbow"), 3);
    let out_of_ammo = engine
        .log()
        .events()
        .iter()
        .filter(|e| matches!(e, CombatEvent::OutOfAmmo { .. }))
        .count();
    assert_eq!(out_of_ammo, 1);
    assert!(engine
        .log()
        .entries()
        .iter()
        .all(|entry| !entry.message.to_lowercase().contains("ammo")));
}

#[test]
fn test_infinite_potion_refills_ammo() {
    let data = DataManager::default();
    let entries = [BoardEntry::new("Crossbow"), BoardEntry::new("Infinite Potion")];
    let mut engine = CombatEngine::new(player(&data, &entries), dummy(5000.0), config(2));
    engine.run_single_fight();

    assert!(triggers_of(&engine, "Crossbow") > 3);
    assert!(triggers_of(&engine, "Infinite Potion") >= 3);
}

#[test]
fn test_state_does_not_leak_between_fights() {
    let data = DataManager::default();
    let entries = [
        BoardEntry::new("Buckler"),
        BoardEntry::new("War Banner"),
        BoardEntry::new("Rusty Sword"),
        BoardEntry::new("Crossbow"),
    ];
    let bandit = data.monster_loadout("Bandit").unwrap();
    let mut engine = CombatEngine::new(player(&data, &entries), bandit, config(3));

    let first = engine.run_single_fight();
    let first_events = engine.log().events().to_vec();
    let second = engine.run_single_fight();

    assert_eq!(first, second);
    assert_eq!(first_events, engine.log().events());

    let buckler = item_id(&engine, Side::Player, "Buckler");
    engine.reset();
    let item = engine.side(Side::Player).board.get(buckler).unwrap();
    assert_eq!(item.attrs.get(Stat::Shield), 15.0);
    assert_eq!(item.state.trigger_count, 0);
    assert_eq!(engine.side(Side::Player).shield, 0.0);
}

#[test]
fn test_same_seed_same_fight() {
    let data = DataManager::default();
    let entries = [
        BoardEntry::new("Twin Daggers").enchanted(Enchantment::Deadly),
        BoardEntry::new("Venom Fang"),
        BoardEntry::new("Pocket Watch"),
    ];
    let run = |seed| {
        let monster = data.monster_loadout("Frost Wraith").unwrap();
        let mut engine = CombatEngine::new(player(&data, &entries), monster, config(seed));
        let outcome = engine.run_single_fight();
        (outcome, engine.log().events().to_vec())
    };

    assert_eq!(run(42), run(42));
}

#[test]
fn test_analysis_aggregates_runs() {
    let data = DataManager::default();
    let monster = data.monster_loadout("Training Dummy").unwrap();
    let mut engine = CombatEngine::new(player(&data, &[BoardEntry::new("Rusty Sword")]), monster, config(9));
    engine.set_log_mode(LogMode::Off);

    let report = engine.simulate_fight(20);
    assert_eq!(report.runs, 20);
    assert_eq!(report.wins, 20);
    assert_eq!(report.losses + report.draws, 0);
    assert_eq!(report.win_rate, 1.0);
    assert_eq!(report.average_ticks, 250.0);

    let sword = report
        .trigger_counts
        .iter()
        .find(|c| c.item == "Rusty Sword")
        .unwrap();
    assert_eq!(sword.side, Side::Player);
    assert_eq!(sword.triggers, 100);
    assert!(engine.log().entries().is_empty());
}

#[test]
fn test_burn_and_poison_finish_a_fight() {
    let data = DataManager::default();
    let entries = [BoardEntry::new("Fire Claw"), BoardEntry::new("Venom Fang")];
    let mut engine = CombatEngine::new(player(&data, &entries), dummy(120.0), config(6));
    let outcome = engine.run_single_fight();

    assert_eq!(outcome.winner, Winner::Player);
    assert!(outcome.ticks < 300);
    assert!(engine.side(Side::Monster).burn >= 0.0);
    assert!(engine.side(Side::Monster).poison > 0.0);
}
