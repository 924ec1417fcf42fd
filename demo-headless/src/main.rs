use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;
use wildfire_ca_core::{run_ensemble, Position, WildfireCA, WildfireParams};

/// Wildfire cellular automaton demo with configurable parameters
#[derive(Parser, Debug)]
#[command(name = "wildfire-ca-demo")]
#[command(about = "Stochastic wildfire spread on a 2D grid", long_about = None)]
struct Args {
    /// Grid width in cells
    #[arg(long, default_value_t = 20)]
    width: i32,

    /// Grid height in cells
    #[arg(long, default_value_t = 20)]
    height: i32,

    /// Number of steps to run (0 = until the fire goes out)
    #[arg(short, long, default_value_t = 2)]
    steps: u32,

    /// Random seed (omit for a fresh entropy seed)
    #[arg(long)]
    seed: Option<u64>,

    /// JSON file with model parameters (defaults to the Spetses 1990 calibration)
    #[arg(short, long)]
    params: Option<PathBuf>,

    /// Override wind speed in m/s
    #[arg(short, long)]
    wind_speed: Option<f32>,

    /// Override wind direction in degrees (0=North, 90=East)
    #[arg(long)]
    wind_direction: Option<f32>,

    /// Disable ember spotting
    #[arg(long)]
    no_spotting: bool,

    /// Ignition point as x,y (repeatable; defaults to 0,1 and 4,4)
    #[arg(short, long = "ignite", value_parser = parse_position)]
    ignite: Vec<Position>,

    /// Run this many independent replicas and print the burn-frequency map
    #[arg(short, long)]
    replicas: Option<usize>,

    /// Step cap per replica, and for single runs with --steps 0
    #[arg(long, default_value_t = 10_000)]
    max_steps: u32,
}

fn parse_position(s: &str) -> Result<Position, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected x,y, got '{s}'"))?;
    let x = x.trim().parse().map_err(|e| format!("bad x in '{s}': {e}"))?;
    let y = y.trim().parse().map_err(|e| format!("bad y in '{s}': {e}"))?;
    Ok(Position::new(x, y))
}

fn load_params(args: &Args) -> Result<WildfireParams, Box<dyn Error>> {
    let mut params = match &args.params {
        Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
        None => WildfireParams::spetses_1990(),
    };
    if let Some(speed) = args.wind_speed {
        params.wind_speed = speed;
    }
    if let Some(degrees) = args.wind_direction {
        params.wind_angle = degrees.to_radians();
    }
    if args.no_spotting {
        params.spotting_enabled = false;
    }
    params.validate()?;
    Ok(params)
}

fn build(
    args: &Args,
    params: WildfireParams,
    seed: Option<u64>,
) -> wildfire_ca_core::Result<WildfireCA> {
    let mut ca = match seed {
        Some(seed) => WildfireCA::with_seed(args.width, args.height, params, seed)?,
        None => WildfireCA::new(args.width, args.height, params)?,
    };
    for &pos in &args.ignite {
        ca.add_fire_spot(pos);
    }
    Ok(ca)
}

fn run_single(args: &Args, params: WildfireParams) -> Result<(), Box<dyn Error>> {
    let mut ca = build(args, params, args.seed)?;
    println!("Initial grid:\n{ca}");

    let limit = if args.steps == 0 { args.max_steps } else { args.steps };
    for _ in 0..limit {
        if ca.is_exhausted() {
            println!("Fire is out after {} steps", ca.step_count());
            break;
        }
        let burning = ca.step_and_collect()?;
        println!(
            "Step {} ({} cells were burning):\n{ca}",
            ca.step_count(),
            burning.len()
        );
    }

    let stats = ca.statistics();
    println!(
        "Burning: {}, burned down: {}, unburnt: {}, no fuel: {}",
        stats.burning, stats.burned_down, stats.not_ignited, stats.no_fuel
    );
    println!("Area reached: {:.1} ha", stats.burned_area_ha);
    Ok(())
}

fn run_replicas(
    args: &Args,
    params: WildfireParams,
    replicas: usize,
) -> Result<(), Box<dyn Error>> {
    let base_seed = args.seed.unwrap_or(0);
    let summary = run_ensemble(replicas, base_seed, args.max_steps, |seed| {
        build(args, params, Some(seed))
    })?;

    println!("Burn frequency over {replicas} runs (0-9, tenths):");
    for row in summary.burn_frequency.chunks(summary.width as usize) {
        let line: Vec<String> = row
            .iter()
            .map(|f| ((f * 10.0).floor() as u8).min(9).to_string())
            .collect();
        println!("{}", line.join(" "));
    }
    println!("Mean area reached: {:.1} ha", summary.mean_burned_area_ha());
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut args = Args::parse();
    if args.ignite.is_empty() {
        args.ignite = vec![Position::new(0, 1), Position::new(4, 4)];
    }

    println!("=== Wildfire Cellular Automaton Demo ===\n");
    let params = load_params(&args)?;
    info!(?params, "Loaded parameters");

    match args.replicas {
        Some(replicas) => run_replicas(&args, params, replicas),
        None => run_single(&args, params),
    }
}
