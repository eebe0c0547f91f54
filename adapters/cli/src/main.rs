#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a headless Wave Defence round.

mod demo;

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;
use wave_defence_core::Event;
use wave_defence_simulation::{Difficulty, SessionConfig, Simulation};

use crate::demo::DefencePlan;

/// Headless Wave Defence runner.
#[derive(Debug, Parser)]
#[command(name = "wave-defence")]
#[command(about = "Runs a scripted Wave Defence round and prints a summary")]
struct Cli {
    /// TOML file with session settings.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Number of ticks to simulate.
    #[arg(long, default_value_t = 7_200)]
    ticks: u64,
    /// Time scale multiplier applied to every tick.
    #[arg(long)]
    time_scale: Option<f32>,
    /// Difficulty preset.
    #[arg(long, value_enum)]
    difficulty: Option<DifficultyArg>,
    /// Seed for the weighted enemy choice.
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum DifficultyArg {
    Easy,
    Medium,
    Hard,
}

impl From<DifficultyArg> for Difficulty {
    fn from(arg: DifficultyArg) -> Self {
        match arg {
            DifficultyArg::Easy => Difficulty::Easy,
            DifficultyArg::Medium => Difficulty::Medium,
            DifficultyArg::Hard => Difficulty::Hard,
        }
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
struct RoundTally {
    ticks: u64,
    kills: u32,
    leaks: u32,
    shots: u32,
}

impl RoundTally {
    fn record(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::EnemyKilled { .. } => self.kills += 1,
                Event::EnemyLeaked { .. } => self.leaks += 1,
                Event::ProjectileFired { .. } => self.shots += 1,
                _ => {}
            }
        }
    }
}

fn load_config(cli: &Cli) -> Result<SessionConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let content = fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            toml::from_str(&content)
                .with_context(|| format!("failed to parse config {}", path.display()))?
        }
        None => SessionConfig::default(),
    };

    if let Some(time_scale) = cli.time_scale {
        config.time_scale = time_scale;
    }
    if let Some(difficulty) = cli.difficulty {
        config.difficulty = difficulty.into();
    }
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    Ok(config)
}

fn run(config: &SessionConfig, ticks: u64) -> Result<(Simulation, RoundTally, usize)> {
    let path = demo::demo_path().context("demo path is malformed")?;
    let mut simulation = Simulation::new(path, config);
    let mut plan = DefencePlan::default();
    let mut tally = RoundTally::default();

    for _ in 0..ticks {
        plan.step(&mut simulation);
        let report = simulation.tick(1.0);
        tally.record(&report.events);
        tally.ticks += 1;
        if report.round_over {
            tracing::info!(tick = tally.ticks, "round over");
            break;
        }
    }

    let towers = plan.towers_placed();
    Ok((simulation, tally, towers))
}

/// Entry point for the Wave Defence command-line interface.
fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let (simulation, tally, towers) = run(&config, cli.ticks)?;
    let snapshot = simulation.snapshot();

    println!("ticks      {}", tally.ticks);
    println!("wave       {} ({:?})", snapshot.wave.wave_number, snapshot.wave.phase);
    println!("gold       {}", snapshot.economy.gold);
    println!("score      {}", snapshot.economy.score);
    println!("lives      {}", snapshot.economy.lives);
    println!("towers     {towers}");
    println!("shots      {}", tally.shots);
    println!("kills      {}", tally.kills);
    println!("leaks      {}", tally.leaks);
    if snapshot.is_round_over() {
        println!("result     defeat");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::parse_from([
            "wave-defence",
            "--difficulty",
            "hard",
            "--seed",
            "9",
            "--time-scale",
            "2",
        ]);

        let config = load_config(&cli).expect("config loads");

        assert_eq!(config.difficulty, Difficulty::Hard);
        assert_eq!(config.seed, 9);
        assert_eq!(config.time_scale, 2.0);
        assert_eq!(config.starting_gold, 400);
        assert_eq!(cli.ticks, 7_200);
    }

    #[test]
    fn missing_config_file_reports_path() {
        let cli = Cli::parse_from(["wave-defence", "--config", "/nonexistent/wave.toml"]);

        let error = load_config(&cli).expect_err("missing file must fail");

        assert!(error.to_string().contains("/nonexistent/wave.toml"));
    }

    #[test]
    fn scripted_round_kills_enemies() {
        let (simulation, tally, towers) =
            run(&SessionConfig::default(), 1_500).expect("round runs");

        assert!(towers >= 1);
        assert!(tally.shots > 0);
        assert!(tally.kills > 0);
        assert_eq!(tally.ticks, 1_500);
        assert!(simulation.snapshot().economy.score > 0);
    }
}
