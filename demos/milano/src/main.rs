//! milano: bike-share contention on a slice of the BikeMi network.
//!
//! Loads a city-bikes network document, keeps the first `--stations`
//! stations, and lets `--riders` concurrent riders each complete `--paths`
//! trips between randomly chosen stations.  Prints the aggregate wait time
//! and path count, plus the final dock counts.
//!
//! ```text
//! cargo run --release -p milano -- --riders 50 --paths 10
//! RUST_LOG=debug cargo run -p milano -- --goal b5262607c8a44db673b2f9acd3ddeede
//! cargo run -p milano -- --deadline-ms 2000 --output ./output
//! cargo run -p milano -- --config demos/milano/data/fast.json --stations 10
//! ```

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cb_core::SimConfig;
use cb_output::{CsvWriter, StepLogObserver};
use cb_rider::{StepObserver, TracingObserver};
use cb_sim::{SimBuilder, SimReport, Simulation};
use cb_station::{StationSet, load_city_path};

// ── Constants ─────────────────────────────────────────────────────────────────

const DEFAULT_CITY:     &str  = concat!(env!("CARGO_MANIFEST_DIR"), "/data/milano.json");
const DEFAULT_STATIONS: usize = 4;
const DEFAULT_RIDERS:   usize = 50;
const DEFAULT_PATHS:    u32   = 10;
const SEED:             u64   = 42;

// ── CLI ───────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "milano",
    version,
    about = "Simulate concurrent riders competing for bikes and docks"
)]
struct Args {
    /// City-bikes network JSON document
    #[arg(long, default_value = DEFAULT_CITY)]
    city: PathBuf,

    /// Use only the first N stations of the network
    #[arg(long, default_value_t = DEFAULT_STATIONS)]
    stations: usize,

    /// Number of concurrent riders
    #[arg(long, default_value_t = DEFAULT_RIDERS)]
    riders: usize,

    /// Paths each rider completes
    #[arg(long, default_value_t = DEFAULT_PATHS)]
    paths: u32,

    /// Stop the whole run when any rider docks at this station id
    #[arg(long)]
    goal: Option<String>,

    /// JSON run configuration (`seed`, `num_threads`, `wait_delay_ms`,
    /// `step_delay_ms`); the flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Run seed for the riders' station choices [default: 42]
    #[arg(long)]
    seed: Option<u64>,

    /// Delay after a failed take or return, in milliseconds [default: 100]
    #[arg(long)]
    wait_ms: Option<u64>,

    /// Delay after a successful take or return, in milliseconds [default: 100]
    #[arg(long)]
    step_ms: Option<u64>,

    /// Worker threads, at least one per rider [default: one per rider]
    #[arg(long)]
    threads: Option<usize>,

    /// Raise the stop signal after this many milliseconds
    #[arg(long)]
    deadline_ms: Option<u64>,

    /// Write steps.csv and riders.csv to this directory
    #[arg(long)]
    output: Option<PathBuf>,
}

// ── Main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    println!("=== concurrent_bikes: milano ===");

    // 1. Stations
    let city = load_city_path(&args.city)
        .with_context(|| format!("loading {}", args.city.display()))?;
    println!(
        "Network '{}': {} stations, using the first {}",
        city.id(),
        city.network.stations.len(),
        args.stations.min(city.network.stations.len()),
    );
    let stations = StationSet::from_city(city).subset(0..args.stations);
    print_stations("Initial", &stations);

    // 2. Simulation
    let config = load_config(&args)?;
    tracing::info!(?config, "run configuration");
    let sim = SimBuilder::new(config, stations)
        .riders(args.riders)
        .paths_per_rider(args.paths)
        .maybe_goal(args.goal.as_deref())
        .build()?;
    println!(
        "Riders: {}  Paths/rider: {}  Workers: {}",
        args.riders,
        args.paths,
        sim.config().worker_threads(args.riders),
    );

    // 3. Run
    let deadline = args.deadline_ms.map(Duration::from_millis);
    let report = match &args.output {
        Some(dir) => {
            let observer = StepLogObserver::new(
                CsvWriter::new(dir).with_context(|| format!("creating {}", dir.display()))?,
            );
            let report = run_with_deadline(&sim, &observer, deadline)?;
            observer.finish().context("writing CSV output")?;
            println!("Output written to {}", dir.display());
            report
        }
        None => run_with_deadline(&sim, &TracingObserver, deadline)?,
    };

    // 4. Report
    println!();
    println!("{report}");
    println!();
    print_stations("Final", sim.stations());

    Ok(())
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// `--config` file (or defaults), then individual flag overrides.
fn load_config(args: &Args) -> Result<SimConfig> {
    let mut config: SimConfig = match &args.config {
        Some(path) => {
            let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
            serde_json::from_reader(BufReader::new(file))
                .with_context(|| format!("parsing {}", path.display()))?
        }
        None => SimConfig { seed: SEED, ..SimConfig::default() },
    };

    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(threads) = args.threads {
        config.num_threads = Some(threads);
    }
    if let Some(ms) = args.wait_ms {
        config.wait_delay_ms = ms;
    }
    if let Some(ms) = args.step_ms {
        config.step_delay_ms = ms;
    }
    config.validate()?;
    Ok(config)
}

/// Run `sim`, raising its stop signal if it is still going after `deadline`.
fn run_with_deadline<O: StepObserver>(
    sim:      &Simulation,
    observer: &O,
    deadline: Option<Duration>,
) -> Result<SimReport> {
    let Some(deadline) = deadline else {
        return Ok(sim.run(observer)?);
    };

    let stop = sim.stop_handle();
    let (done_tx, done_rx) = mpsc::channel::<()>();
    thread::scope(|scope| {
        scope.spawn(move || {
            if let Err(RecvTimeoutError::Timeout) = done_rx.recv_timeout(deadline) {
                if stop.raise() {
                    tracing::warn!(deadline_ms = deadline.as_millis() as u64, "deadline reached, stopping riders");
                }
            }
        });
        let report = sim.run(observer);
        drop(done_tx);
        Ok(report?)
    })
}

fn print_stations(label: &str, stations: &StationSet) {
    println!("{label} docks:");
    println!("  {:<24} {:>6} {:>6}", "station", "bikes", "slots");
    for station in stations.iter() {
        let counts = station.counts();
        println!(
            "  {:<24} {:>6} {:>6}",
            station.name(),
            counts.free_bikes,
            counts.free_slots
        );
    }
    println!(
        "  {:<24} {:>6} {:>6}",
        "total",
        stations.total_free_bikes(),
        stations.total_capacity() - stations.total_free_bikes()
    );
}
