//! patrol-run: headless driver for patrol simulations.
//!
//! Usage:
//!   patrol-run run --config sim.json --ticks 20000 --tours tours/RANDOM_missions
//!   patrol-run grid --config sim.json

use std::path::PathBuf;
use std::process;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use patrol_core::config::SimConfig;
use patrol_grid::all_centers;
use patrol_sim::{FixedStart, HandcraftedPaths, PathProvider, PatrolEngine, TourFile};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    match args[1].as_str() {
        "run" => cmd_run(&args[2..]),
        "grid" => cmd_grid(&args[2..]),
        "help" | "--help" | "-h" => print_usage(),
        other => {
            eprintln!("Unknown command: {other}");
            print_usage();
            process::exit(1);
        }
    }
}

fn print_usage() {
    eprintln!(
        "patrol-run: headless patrol simulation driver\n\
         \n\
         Commands:\n\
         \n\
         run       Run a simulation and log target freshness\n\
         \n\
           --config <path>    JSON config (optional, defaults otherwise)\n\
           --ticks <N>        Stop after N ticks (default: the configured duration)\n\
           --tours <prefix>   Load tours from <prefix><seed>.json\n\
           --snapshot <path>  Write the final snapshot as JSON (optional)\n\
         \n\
         grid      Print every grid cell with its center\n\
         \n\
           --config <path>    JSON config (optional)\n\
         \n\
         Without --tours, units follow the built-in demo tours, or move freely\n\
         when the config sets free_movement_start.\n\
         \n\
         Set RUST_LOG=debug for per-tick events.\n"
    );
}

fn parse_flag(args: &[String], flag: &str) -> Option<String> {
    for i in 0..args.len() {
        if args[i] == flag && i + 1 < args.len() {
            return Some(args[i + 1].clone());
        }
    }
    None
}

fn load_config(args: &[String]) -> SimConfig {
    let Some(path) = parse_flag(args, "--config") else {
        return SimConfig::default();
    };
    match SimConfig::load(&path) {
        Ok(config) => config,
        Err(e) => {
            error!("{e}");
            process::exit(1);
        }
    }
}

fn cmd_run(args: &[String]) {
    let config = load_config(args);

    let ticks = match parse_flag(args, "--ticks").map(|t| t.parse::<u64>()) {
        None => config.duration_ticks,
        Some(Ok(t)) => t,
        Some(Err(_)) => {
            eprintln!("Error: --ticks expects a non-negative integer");
            process::exit(1);
        }
    };

    let tours = parse_flag(args, "--tours");
    let provider: Box<dyn PathProvider> = match (tours, config.free_movement_start) {
        (Some(prefix), _) => match TourFile::load_for_seed(&prefix, config.seed) {
            Ok(tours) => Box::new(tours),
            Err(e) => {
                error!("{e}");
                process::exit(1);
            }
        },
        (None, Some(start)) => Box::new(FixedStart(start)),
        (None, None) => Box::new(HandcraftedPaths),
    };

    let name = config.simulation_name();
    let mut engine = match PatrolEngine::new(config, provider.as_ref()) {
        Ok(engine) => engine,
        Err(e) => {
            error!("{e}");
            process::exit(1);
        }
    };

    info!(simulation = %name, ticks, "running");
    let mut snapshot = engine.snapshot();
    for _ in 0..ticks {
        if engine.is_finished() {
            break;
        }
        snapshot = engine.tick();
    }

    info!(
        tick = snapshot.time.tick,
        elapsed_secs = snapshot.time.elapsed_secs,
        events = snapshot.valid_events.len(),
        "run complete"
    );
    for target in &snapshot.targets {
        info!(
            target = %target.id,
            x = target.coords.x,
            y = target.coords.y,
            age_secs = target.age_of_information,
            residual = target.residual_of_information,
            "freshness"
        );
    }
    for unit in &snapshot.units {
        let cell = engine
            .current_cell(unit.id.id)
            .ok()
            .flatten()
            .map(|(index, _)| index);
        info!(
            unit = %unit.id,
            x = unit.coords.x,
            y = unit.coords.y,
            buffer = unit.buffer_len,
            cell = ?cell,
            "final position"
        );
    }

    if let Some(path) = parse_flag(args, "--snapshot").map(PathBuf::from) {
        let written = serde_json::to_string_pretty(&snapshot)
            .map_err(|e| e.to_string())
            .and_then(|json| std::fs::write(&path, json).map_err(|e| e.to_string()));
        match written {
            Ok(()) => info!(path = %path.display(), "snapshot written"),
            Err(e) => {
                error!(path = %path.display(), "failed to write snapshot: {e}");
                process::exit(1);
            }
        }
    }
}

fn cmd_grid(args: &[String]) {
    let config = load_config(args);
    let cell_size = config.grid_cell_size();
    if cell_size <= 0.0 {
        eprintln!("Grid disabled (grid_cells = 0)");
        process::exit(1);
    }

    println!("cell size: {cell_size} m");
    for ((index, cell), center) in all_centers(config.width, config.height, cell_size) {
        println!(
            "{index:>4}  ({:>3}, {:>3})  center ({:.1}, {:.1})",
            cell.cx, cell.cy, center.x, center.y
        );
    }
}
