use anyhow::{Context, Result};
use clap::Parser;
use env_logger::{Builder, Env};
use flock_engine::output::{save_final_states, save_snapshots};
use flock_engine::{FlockConfig, FlockSimulation, FrameLog};
use log::{debug, error, info, trace, warn};
use std::path::PathBuf;
use std::time::Instant;

/// Headless boids flocking run: steps the flock, records snapshots, writes them out.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the TOML configuration
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Number of ticks to run (overrides timing.total_ticks)
    #[arg(long)]
    ticks: Option<u32>,

    /// RNG seed for the initial population (overrides initial_conditions.seed)
    #[arg(long)]
    seed: Option<u64>,

    /// Update agents on the rayon thread pool
    #[arg(long)]
    parallel: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // RUST_LOG wins; otherwise info.
    Builder::from_env(Env::default().default_filter_or("info")).init();

    info!("Starting Flock Engine...");

    // --- Load Configuration ---
    let mut config = FlockConfig::load(&args.config)
        .with_context(|| format!("Could not load configuration from '{}'", args.config.display()))?;
    if let Some(ticks) = args.ticks {
        config.timing.total_ticks = ticks;
    }
    if let Some(seed) = args.seed {
        config.initial_conditions.seed = Some(seed);
    }
    if args.parallel {
        config.runtime.parallel = true;
    }
    if config.runtime.parallel {
        info!("Using {} Rayon threads.", rayon::current_num_threads());
    }

    // --- Initialize Flock ---
    let mut sim = FlockSimulation::new(config)?;
    info!("Flock initialized with {} agents.", sim.current_agent_count());
    debug!("Flock parameters: {:#?}", sim.params());

    let total_ticks = sim.config().timing.total_ticks;
    let record_interval = sim.config().timing.record_interval_ticks.max(1);
    info!("Recording snapshot every {} ticks.", record_interval);

    info!("Starting flock loop for {} ticks...", total_ticks);
    let start_time = Instant::now();
    let mut previous_print_time = start_time;
    let mut frames = FrameLog::default();

    // --- Initial Snapshot (tick 0) ---
    sim.record_snapshot();

    for tick in 0..total_ticks {
        let tick_start = Instant::now();
        if let Err(e) = sim.advance_and_render(&mut frames) {
            error!("Render sink failed at tick {}: {}", tick + 1, e);
            anyhow::bail!("Frame delivery failed.");
        }
        let tick_duration = tick_start.elapsed();

        let now = Instant::now();
        let should_print_status = now.duration_since(previous_print_time).as_secs_f64() >= 5.0;
        let is_record_tick = (tick + 1) % record_interval == 0;
        let is_last_tick = tick + 1 == total_ticks;

        if is_record_tick || is_last_tick {
            sim.record_snapshot();
        }

        if should_print_status || is_last_tick {
            info!(
                "Tick [{}/{}] | Agents: {} | Tick Time: {:6.3} ms | Elapsed: {:.2} s",
                tick + 1,
                total_ticks,
                sim.current_agent_count(),
                tick_duration.as_secs_f64() * 1000.0,
                start_time.elapsed().as_secs_f64()
            );
            previous_print_time = now;
        } else {
            trace!(
                "Tick [{}/{}] completed in {:.3} ms",
                tick + 1,
                total_ticks,
                tick_duration.as_secs_f64() * 1000.0
            );
        }
    }

    let total_duration = start_time.elapsed();
    info!(
        "Flock run finished in {:.3} seconds ({} frames delivered).",
        total_duration.as_secs_f64(),
        frames.frames_seen()
    );

    // --- Save Recorded Data ---
    let output = sim.config().output.clone();
    if output.save_stats {
        save_snapshots(sim.recorded_snapshots(), &output)?;
    } else {
        info!("Skipping saving snapshots as per config (save_stats is false).");
    }

    if output.save_final_states {
        save_final_states(sim.population(), &output)?;
    } else {
        info!("Skipping saving final states as per config.");
    }

    if sim.population().iter().any(|a| !a.position.is_finite()) {
        warn!("Some agents ended with non-finite positions; check rule factors.");
    }

    info!("Flock Run Complete.");
    Ok(())
}
