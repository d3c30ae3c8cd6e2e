//! # flocksim runner
//!
//! Runs a flock headless for a number of ticks and logs progress.
//!
//! ```text
//! flocksim --population 500 --ticks 1000 --report-every 100
//! flocksim --config flock.json --seed 7 --appearance rainbow
//! flocksim --random-start --write-config flock.json --ticks 0
//! ```
//!
//! `RUST_LOG` takes precedence over `--log-level`.

use anyhow::{Context, Result};
use clap::Parser;
use flocksim::{Appearance, FlockConfig, Simulation, TickClock};
use std::path::PathBuf;
use tracing::info;

/// Headless flocking simulation
#[derive(Parser)]
#[command(name = "flocksim")]
#[command(version, about, long_about = None)]
struct Cli {
    /// JSON configuration file (defaults apply when omitted)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Number of ticks to run
    #[arg(short, long, default_value_t = 600)]
    ticks: u64,

    /// Override the number of agents
    #[arg(short, long)]
    population: Option<usize>,

    /// Override the random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Override the colour scheme
    #[arg(long, value_name = "NAME")]
    appearance: Option<Appearance>,

    /// Spawn agents anywhere in the volume instead of at the origin
    #[arg(long)]
    random_start: bool,

    /// Log a progress line every N ticks (0 disables)
    #[arg(long, default_value_t = 60, value_name = "N")]
    report_every: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Write the effective configuration to FILE before running
    #[arg(long, value_name = "FILE")]
    write_config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level)?;

    let config = build_config(&cli)?;
    if let Some(path) = &cli.write_config {
        config
            .save(path)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;
        info!(path = %path.display(), "configuration written");
    }

    let mut sim = Simulation::new(config).context("Invalid configuration")?;
    info!(
        population = sim.agents().len(),
        seed = sim.seed(),
        ticks = cli.ticks,
        "starting"
    );

    let mut clock = TickClock::new();
    for _ in 0..cli.ticks {
        let stats = sim.tick();
        clock.tick();

        if cli.report_every > 0 && stats.frame % cli.report_every == 0 {
            info!(
                frame = stats.frame,
                indexed = stats.indexed,
                dropped = stats.dropped,
                isolated = stats.isolated,
                tree_nodes = stats.tree_nodes,
                tree_depth = stats.tree_depth,
                tps = %format!("{:.1}", clock.tps()),
                "progress"
            );
        }
    }

    let agents = sim.agents();
    let mean_speed = if agents.is_empty() {
        0.0
    } else {
        agents.iter().map(|a| a.speed()).sum::<f32>() / agents.len() as f32
    };
    info!(
        frames = sim.frame(),
        elapsed_ms = clock.elapsed().as_millis() as u64,
        mean_tick_ms = %format!("{:.3}", clock.mean_tick_secs() * 1000.0),
        mean_speed = %format!("{mean_speed:.2}"),
        "done"
    );

    Ok(())
}

/// Load the base configuration and apply command-line overrides.
fn build_config(cli: &Cli) -> Result<FlockConfig> {
    let mut config = match &cli.config {
        Some(path) => FlockConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => FlockConfig::default(),
    };

    if let Some(population) = cli.population {
        config.population = population;
    }
    if let Some(seed) = cli.seed {
        config.seed = Some(seed);
    }
    if let Some(appearance) = cli.appearance {
        config.appearance = appearance;
    }
    if cli.random_start {
        config.start_centered = false;
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn init_logging(level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(level))
        .context("Failed to create log filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();

    Ok(())
}
