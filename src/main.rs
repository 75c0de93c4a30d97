mod simulation;
mod visual;

#[cfg(feature = "ui")]
mod ui;

use anyhow::{Context, Result};
use clap::Parser;

use simulation::{SimConfig, SimWorld};

#[derive(Parser)]
#[command(name = "stoplight_sim")]
#[command(about = "Single-lane stoplight simulation with optional UI")]
struct Cli {
    /// Run with the Bevy UI
    #[arg(long)]
    ui: bool,

    /// Simulated seconds to run
    #[arg(long, default_value = "120")]
    sim_time: f32,

    /// Seconds each red and each green phase lasts
    #[arg(long, default_value = "6")]
    period: f32,

    /// Number of crossing slots (lanes)
    #[arg(long, default_value = "1")]
    capacity: usize,

    /// Seconds a car takes to clear the intersection
    #[arg(long, default_value = "1.2")]
    cross_time: f32,

    /// RNG seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = SimConfig {
        light_period: cli.period,
        capacity: cli.capacity,
        cross_time: cli.cross_time,
        sim_time: cli.sim_time,
        ..SimConfig::default()
    };
    config.validate().context("rejected run parameters")?;

    if cli.ui {
        #[cfg(feature = "ui")]
        {
            run_with_ui(config, cli.seed);
        }
        #[cfg(not(feature = "ui"))]
        {
            eprintln!("Error: UI feature is not enabled. Rebuild with --features ui");
            std::process::exit(1);
        }
    } else {
        run_headless(config, cli.seed)?;
    }
    Ok(())
}

/// Run the event core with no visual layer, printing checkpoints
fn run_headless(config: SimConfig, seed: Option<u64>) -> Result<()> {
    env_logger::init();

    println!("Running stoplight simulation in headless mode...");
    println!(
        "Period: {}s, Capacity: {}, Crossing: {}s, Sim time: {}s",
        config.light_period, config.capacity, config.cross_time, config.sim_time
    );
    println!();

    let mut world = match seed {
        Some(seed) => SimWorld::with_seed(config.clone(), seed)?,
        None => SimWorld::new(config.clone())?,
    };
    world.start();

    // checkpoint every 10 simulated seconds
    let checkpoint = 10.0_f32;
    let mut next = 0.0_f32;
    while next < config.sim_time {
        next = (next + checkpoint).min(config.sim_time);
        world.advance_to(next);
        println!("--- t = {:.1}s ---", world.now());
        world.print_summary();
        println!();
    }

    println!("=== Final State ===");
    world.print_summary();
    let stats = world.stats();
    println!(
        "{} cars waited an average of {:.2} seconds",
        stats.completed,
        stats.average_wait()
    );
    Ok(())
}

#[cfg(feature = "ui")]
fn run_with_ui(config: SimConfig, seed: Option<u64>) {
    use bevy::log::LogPlugin;
    use bevy::prelude::*;

    println!("Starting Stoplight Sim UI...");
    println!();

    App::new()
        .add_plugins(
            DefaultPlugins
                .set(LogPlugin {
                    filter: "warn,stoplight_sim=debug".to_string(),
                    level: bevy::log::Level::DEBUG,
                    ..default()
                })
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Stoplight Sim".into(),
                        resolution: (640, 360).into(),
                        ..default()
                    }),
                    ..default()
                }),
        )
        .add_plugins(ui::StoplightUiPlugin { config, seed })
        .run();
}
