use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::info;

use traffic_light::simulation::{LightConfig, Phase, Supervisor, TrafficLight};

#[derive(Clone, Copy, ValueEnum)]
enum InitialPhase {
    Red,
    Green,
}

impl From<InitialPhase> for Phase {
    fn from(value: InitialPhase) -> Self {
        match value {
            InitialPhase::Red => Phase::Red,
            InitialPhase::Green => Phase::Green,
        }
    }
}

#[derive(Parser)]
#[command(name = "traffic_light")]
#[command(about = "Traffic light with vehicles waiting for green")]
struct Cli {
    /// Length of one time unit in milliseconds
    #[arg(long, default_value = "1000")]
    time_unit_ms: u64,

    /// Shortest light cycle, in time units
    #[arg(long, default_value = "4")]
    min_cycle: u32,

    /// Longest light cycle, in time units
    #[arg(long, default_value = "6")]
    max_cycle: u32,

    /// Deadline polling interval in milliseconds
    #[arg(long, default_value = "1")]
    poll_ms: u64,

    /// Number of vehicles waiting at the light
    #[arg(long, default_value = "3")]
    vehicles: usize,

    /// Number of times each vehicle waits for green
    #[arg(long, default_value = "2")]
    crossings: usize,

    /// Seed for reproducible cycle durations
    #[arg(long)]
    seed: Option<u64>,

    /// Maximum number of unread phase values kept by the light
    #[arg(long, default_value = "16")]
    queue_limit: usize,

    /// Phase the light starts in
    #[arg(long, value_enum, default_value = "red")]
    initial_phase: InitialPhase,
}

impl Cli {
    fn light_config(&self) -> LightConfig {
        LightConfig {
            time_unit: Duration::from_millis(self.time_unit_ms),
            min_cycle_units: self.min_cycle,
            max_cycle_units: self.max_cycle,
            poll_interval: Duration::from_millis(self.poll_ms),
            initial_phase: self.initial_phase.into(),
            queue_limit: self.queue_limit,
            seed: self.seed,
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    run_headless(&cli)
}

/// Run one light with a set of vehicles until every vehicle has crossed
fn run_headless(cli: &Cli) -> Result<()> {
    let light = TrafficLight::new_with_config(cli.light_config())?;
    info!(
        "Running traffic light {}: {} vehicles, {} crossings each, cycle {:?}..={:?}",
        light.id(),
        cli.vehicles,
        cli.crossings,
        light.config().min_cycle(),
        light.config().max_cycle()
    );

    let mut supervisor = Supervisor::new();
    supervisor.start(&light)?;

    let started = Instant::now();
    let crossings = thread::scope(|scope| -> Result<usize> {
        let mut vehicles = Vec::with_capacity(cli.vehicles);
        for vehicle in 0..cli.vehicles {
            let light = &light;
            let handle = thread::Builder::new()
                .name(format!("vehicle-{}", vehicle))
                .spawn_scoped(scope, move || {
                    for crossing in 1..=cli.crossings {
                        light.wait_for_green();
                        info!(
                            "Vehicle {} crossed on green ({}/{})",
                            vehicle, crossing, cli.crossings
                        );
                    }
                    cli.crossings
                })
                .context("Failed to spawn vehicle thread")?;
            vehicles.push(handle);
        }

        let mut total = 0;
        for handle in vehicles {
            total += handle
                .join()
                .map_err(|_| anyhow::anyhow!("Vehicle thread panicked"))?;
        }
        Ok(total)
    })?;

    supervisor.shutdown();

    info!("=== SIMULATION COMPLETE ===");
    info!("Elapsed time: {:.2}s", started.elapsed().as_secs_f32());
    info!("Total crossings: {}", crossings);
    info!("Light cycles completed: {}", light.cycles_completed());
    info!("Final phase: {}", light.current_phase());
    Ok(())
}
