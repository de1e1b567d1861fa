//! universe — run a population of wandering agents on a torus.
//!
//! Every agent carries a ring of range sensors, sees the nearest neighbour
//! in each angular bin, and steers with the small `Wanderer` policy below.
//! With a tick cap (`-u`) the final pose of every agent is printed to stdout
//! as `x <x> y <y> a <heading>`; logs go to stderr (`RUST_LOG=debug`).
//!
//! ```text
//! universe -p 500 -u 1000 -z 0 -t 4
//! universe -p 500 -u 1000 -z 0 -t 4 --processes --csv out --snapshot-every 100
//! ```

use std::io;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use tracing::info;

use uni_behavior::{SenseContext, Speed};
use uni_core::{AgentId, UniConfig};
use uni_output::{CsvWriter, SimOutputObserver, TextWriter};
use uni_sim::{SimBuilder, Substrate};

// ── Command line ──────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "universe",
    version,
    about = "Discrete-time multi-agent simulator on a toroidal world",
    disable_help_flag = true
)]
struct Cli {
    /// Population size.
    #[arg(short = 'p', default_value_t = 100)]
    population: usize,

    /// Side length of the square world.
    #[arg(short = 's', default_value_t = 1.0)]
    world_size: f64,

    /// Sensor range.
    #[arg(short = 'r', default_value_t = 0.1)]
    range: f64,

    /// Sensor field of view, in degrees.
    #[arg(short = 'f', default_value_t = 270.0)]
    fov: f64,

    /// Number of sensor pixels (angular bins).
    #[arg(short = 'c', default_value_t = 8)]
    pixels: usize,

    /// Stop after this many ticks and print the final poses; 0 runs forever.
    #[arg(short = 'u', default_value_t = 0)]
    tick_cap: u64,

    /// Sleep this many milliseconds after every tick.
    #[arg(short = 'z', default_value_t = 50)]
    pacing_ms: u64,

    /// Number of workers.
    #[arg(short = 't', default_value_t = 1)]
    workers: usize,

    /// Initial window size in pixels, for viewers.
    #[arg(short = 'w', default_value_t = 600)]
    window_size: u32,

    /// Disable the sensor overlay in viewers.
    #[arg(short = 'd')]
    no_overlay: bool,

    /// Run workers as forked processes instead of threads.
    #[arg(long)]
    processes: bool,

    /// Seed for the initial placement.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Write pose snapshots and final poses as CSV into this directory.
    #[arg(long, value_name = "DIR")]
    csv: Option<PathBuf>,

    /// Ticks between CSV pose snapshots.
    #[arg(long, default_value_t = 1, value_name = "N")]
    snapshot_every: u64,

    /// Print help.
    #[arg(short = '?', long = "help", action = ArgAction::Help)]
    help: Option<bool>,
}

impl Cli {
    fn config(&self) -> UniConfig {
        UniConfig {
            population_size:     self.population,
            world_size:          self.world_size,
            range:               self.range,
            fov_degrees:         self.fov,
            pixel_count:         self.pixels,
            tick_cap:            self.tick_cap,
            pacing_ms:           self.pacing_ms,
            workers:             self.workers,
            seed:                self.seed,
            window_size:         self.window_size,
            show_sensor_overlay: !self.no_overlay,
        }
    }

    fn substrate(&self) -> Substrate {
        if self.processes { Substrate::Processes } else { Substrate::Threads }
    }
}

// ── Controller ────────────────────────────────────────────────────────────────

/// Cruise along a gentle curve; veer away from the nearest neighbour and slow
/// down as it gets closer.
struct Wanderer;

impl uni_behavior::Controller for Wanderer {
    fn control(&self, agent: AgentId, ctx: &SenseContext<'_>) -> Speed {
        const CRUISE: f64 = 0.005;
        const TURN:   f64 = 0.1;

        match ctx.nearest() {
            None => {
                let drift = if agent.0 % 2 == 0 { 0.02 } else { -0.02 };
                Speed::new(CRUISE, drift)
            }
            Some((bin, pixel)) => {
                let left = bin >= ctx.pixels.len() / 2;
                let closeness = 1.0 - (pixel.range / ctx.params.range).min(1.0);
                let v = CRUISE * (1.0 - 0.8 * closeness);
                Speed::new(v, if left { -TURN } else { TURN })
            }
        }
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .try_init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = cli.config();

    let mut sim = SimBuilder::new(config, Wanderer)
        .substrate(cli.substrate())
        .build()
        .context("invalid simulation parameters")?;
    info!(
        population  = sim.world().population(),
        sectors     = sim.world().params().geometry.num_sectors,
        window_size = sim.config.window_size,
        overlay     = sim.config.show_sensor_overlay,
        "universe ready"
    );

    let csv = match &cli.csv {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("creating output directory {}", dir.display()))?;
            Some(CsvWriter::new(dir)?)
        }
        None => None,
    };
    let snapshot_every = if csv.is_some() { cli.snapshot_every } else { 0 };
    let writer = (TextWriter::new(io::stdout()), csv);
    let mut obs = SimOutputObserver::new(writer, snapshot_every);

    let t0 = Instant::now();
    let summary = sim.run(&mut obs)?;
    info!(
        ticks   = summary.ticks,
        reason  = %summary.reason,
        seconds = t0.elapsed().as_secs_f64(),
        "simulation complete"
    );

    if let Some(e) = obs.take_error() {
        return Err(e).context("writing output");
    }
    Ok(())
}
