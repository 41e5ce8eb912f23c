//! Fight throughput benchmarks: single fights and batched analyses.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion, Throughput};

use bazaar_sim::combat::{CombatEngine, LogMode, PlayerStats};
use bazaar_sim::config::SimConfig;
use bazaar_sim::data::{BoardEntry, DataManager};
use bazaar_sim::items::{Enchantment, Tier};

fn engine(data: &DataManager, monster: &str) -> CombatEngine {
    let entries = [
        BoardEntry::new("Rusty Sword").tier(Tier::Gold).enchanted(Enchantment::Fiery),
        BoardEntry::new("Crossbow"),
        BoardEntry::new("Sea Shell"),
        BoardEntry::new("Ice Cube").enchanted(Enchantment::Deadly),
        BoardEntry::new("Infinite Potion"),
        BoardEntry::new("Pocket Watch"),
    ];
    let player = data
        .player_loadout("Player", PlayerStats::default(), &entries)
        .expect("bench loadout is valid");
    let monster = data.monster_loadout(monster).expect("bench monster exists");
    let config = SimConfig {
        seed: Some(42),
        log_mode: LogMode::Off,
        ..SimConfig::default()
    };
    CombatEngine::new(player, monster, config)
}

fn bench_single_fight(c: &mut Criterion) {
    let data = DataManager::default();
    let mut group = c.benchmark_group("fight");
    group.throughput(Throughput::Elements(1));

    for monster in ["Bandit", "Siege Engine"] {
        group.bench_function(monster, |b| {
            b.iter_batched(
                || engine(&data, monster),
                |mut engine| black_box(engine.run_single_fight()),
                BatchSize::SmallInput,
            )
        });
    }

    group.bench_function("with_feed", |b| {
        let mut engine = engine(&data, "Reef Guardian");
        engine.set_log_mode(LogMode::Feed);
        b.iter(|| black_box(engine.run_single_fight()))
    });
    group.finish();
}

fn bench_analysis(c: &mut Criterion) {
    let data = DataManager::default();
    let runs = 100u32;

    let mut group = c.benchmark_group("analysis");
    group.sample_size(20);
    group.throughput(Throughput::Elements(runs as u64));
    group.bench_function("frost_wraith_x100", |b| {
        let mut engine = engine(&data, "Frost Wraith");
        b.iter(|| black_box(engine.simulate_fight(runs)))
    });
    group.finish();
}

criterion_group!(benches, bench_single_fight, bench_analysis);
criterion_main!(benches);
