//! Headless weather simulation
//!
//! Plays the host runtime: owns the tick clock, drives the scheduler on its
//! check cadence and prints every trigger. Two runs with the same seed and
//! config print the same timeline.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;
use weather_scheduler_core_rs::{
    SchedulerConfig, TickDriver, TriggerRecord, VariantId, WeatherScheduler,
};

#[derive(Parser)]
#[command(name = "weather-sim")]
#[command(about = "Run the deterministic weather scheduler headless")]
#[command(version)]
struct Cli {
    /// Shared RNG seed (overrides the config file)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Simulated seconds to run
    #[arg(long, default_value_t = 3600.0)]
    seconds: f64,

    /// JSON config file; absent fields take defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Game speed (overrides the config file)
    #[arg(long)]
    ticks_per_second: Option<u32>,

    /// Emit one JSON object per trigger instead of text
    #[arg(long)]
    json: bool,
}

fn load_config(cli: &Cli) -> Result<SchedulerConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            SchedulerConfig::from_json_str(&raw)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => SchedulerConfig::default(),
    };

    if let Some(seed) = cli.seed {
        config.rng_seed = seed;
    }
    if let Some(tps) = cli.ticks_per_second {
        config.ticks_per_second = tps;
    }
    config.validate()?;
    Ok(config)
}

fn print_trigger(record: &TriggerRecord, ticks_per_second: u32, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(record)?);
    } else {
        println!(
            "[tick {:>8}] {:<14} magnitude {:.3}  next in {:>6.1}s",
            record.tick,
            record.variant,
            record.magnitude,
            record.gap_seconds(ticks_per_second)
        );
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("weather_scheduler_core_rs=info".parse()?)
                .add_directive("weather_sim=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let ticks_per_second = config.ticks_per_second;

    let scheduler = WeatherScheduler::builder(config)
        .effect_consumer(Box::new(|variant: &VariantId, magnitude: f64| {
            info!(%variant, magnitude, "Applying weather effects");
        }))
        .build(0)?;

    info!(config_hash = scheduler.config_hash(), "Starting headless run");

    let mut driver = TickDriver::starting_at_zero(scheduler);
    let triggers = driver.run_seconds(cli.seconds);

    for record in &triggers {
        print_trigger(record, ticks_per_second, cli.json)?;
    }

    let scheduler = driver.scheduler();
    info!(
        triggers = triggers.len(),
        final_tick = driver.clock().current_tick(),
        state_digest = %scheduler.state_digest()?,
        "Run complete"
    );

    Ok(())
}
