//! bazaar-sim - Entry Point
//!
//! Runs fight analyses from the command line, lists the catalogue and
//! exports it as editable RON.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use bazaar_sim::combat::scheduler::TICK_SECONDS;
use bazaar_sim::combat::{CombatEngine, LogMode, PlayerStats};
use bazaar_sim::config::SimConfig;
use bazaar_sim::data::{BoardEntry, DataManager, DEFAULT_DATA_DIR};

const USAGE: &str = "usage: bazaar-sim <simulate|list|export> [options]

  simulate [--runs N] [--seed S] [--monster NAME] [--items A,B,...]
           [--health H] [--regen R] [--shield S] [--log] [--json]
           items are written Name[:Tier[:Enchantment]]
  list
  export [DIR]";

const DEFAULT_MONSTER: &str = "Training Dummy";
const DEFAULT_ITEMS: &str = "Rusty Sword";

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();
    match args.get(1).map(String::as_str) {
        Some("simulate") => simulate(&args[2..]),
        Some("list") => list(),
        Some("export") => export(args.get(2)),
        _ => {
            eprintln!("{}", USAGE);
            std::process::exit(2);
        }
    }
}

/// Options for the `simulate` command
struct SimulateArgs {
    runs: Option<u32>,
    seed: Option<u64>,
    monster: String,
    items: Vec<BoardEntry>,
    stats: PlayerStats,
    show_log: bool,
    json: bool,
}

fn parse_simulate_args(args: &[String]) -> Result<SimulateArgs> {
    let mut parsed = SimulateArgs {
        runs: None,
        seed: None,
        monster: DEFAULT_MONSTER.to_string(),
        items: Vec::new(),
        stats: PlayerStats::default(),
        show_log: false,
        json: false,
    };
    let mut items = DEFAULT_ITEMS.to_string();

    let mut iter = args.iter();
    while let Some(flag) = iter.next() {
        let mut value = || {
            iter.next()
                .cloned()
                .with_context(|| format!("{} needs a value", flag))
        };
        match flag.as_str() {
            "--runs" => parsed.runs = Some(value()?.parse().context("--runs must be a number")?),
            "--seed" => parsed.seed = Some(value()?.parse().context("--seed must be a number")?),
            "--monster" => parsed.monster = value()?,
            "--items" => items = value()?,
            "--health" => parsed.stats.health = value()?.parse().context("--health must be a number")?,
            "--regen" => parsed.stats.regen = value()?.parse().context("--regen must be a number")?,
            "--shield" => parsed.stats.shield = value()?.parse().context("--shield must be a number")?,
            "--log" => parsed.show_log = true,
            "--json" => parsed.json = true,
            other => bail!("unknown option '{}'\n{}", other, USAGE),
        }
    }

    parsed.items = items
        .split(',')
        .filter(|s| !s.trim().is_empty())
        .map(BoardEntry::parse)
        .collect::<Result<_, _>>()?;
    Ok(parsed)
}

fn simulate(args: &[String]) -> Result<()> {
    let args = parse_simulate_args(args)?;
    let mut config = SimConfig::discover().context("failed to load simulation config")?;
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    let runs = args.runs.unwrap_or(config.runs);

    let data = DataManager::new();
    let player = data
        .player_loadout("Player", args.stats, &args.items)
        .context("failed to build the player board")?;
    let monster = data
        .monster_loadout(&args.monster)
        .with_context(|| format!("failed to build monster '{}'", args.monster))?;

    log::info!("Simulating {} fights: {} vs {}", runs, player.name, monster.name);
    let mut engine = CombatEngine::new(player, monster, config);
    engine.set_log_mode(LogMode::Off);
    let report = engine.simulate_fight(runs);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report).context("failed to serialize report")?);
    } else {
        println!("Runs:      {}", report.runs);
        println!("Wins:      {}", report.wins);
        println!("Losses:    {}", report.losses);
        println!("Draws:     {}", report.draws);
        println!("Win rate:  {:.1}%", report.win_rate * 100.0);
        println!("Avg fight: {:.1}s", report.average_ticks * TICK_SECONDS);
        println!("Triggers:");
        for count in &report.trigger_counts {
            println!("  {:<8} {:<16} {}", count.side.name(), count.item, count.triggers);
        }
    }

    if args.show_log {
        engine.set_log_mode(LogMode::Feed);
        let outcome = engine.run_single_fight();
        println!();
        print!("{}", engine.log().render());
        println!("Winner: {:?} after {:.1}s", outcome.winner, outcome.duration_secs);
    }
    Ok(())
}

fn list() -> Result<()> {
    let data = DataManager::new();
    println!("Items:");
    for template in &data.items.templates {
        let tiers: Vec<&str> = template.tiers.keys().map(|t| t.name()).collect();
        println!(
            "  {:<16} {:?} {:?} [{}]{}",
            template.name,
            template.size,
            template.kind,
            tiers.join(", "),
            if template.non_combat { " (non-combat)" } else { "" }
        );
    }
    println!("Monsters:");
    for monster in &data.monsters.monsters {
        let items: Vec<&str> = monster.items.iter().map(|e| e.item.as_str()).collect();
        println!("  {:<16} {:>5.0} hp  {}", monster.name, monster.health, items.join(", "));
    }
    Ok(())
}

fn export(dir: Option<&String>) -> Result<()> {
    let dir = dir.map(PathBuf::from).unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));
    DataManager::export_default_data(&dir)
        .with_context(|| format!("failed to export data to {}", dir.display()))?;
    log::info!("Exported default data to {}", dir.display());
    Ok(())
}
