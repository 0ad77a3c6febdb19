// Scenario Runner - Load and execute sweep scenario YAML files
//
// Usage:
//   cargo run --bin scenario_runner scenarios/flaky_ci.yaml
//   cargo run --bin scenario_runner scenarios/  (runs all .yaml files in directory)
//   cargo run --bin scenario_runner scenarios/flaky_ci.yaml --seed 0x1234...

use std::path::Path;

use clap::{value_parser, Arg, Command};
use log::{error, info, LevelFilter};
use simple_logger::SimpleLogger;

use merge_queue_sim::mq_scenario::scenario_files;
use merge_queue_sim::mq_sweep::parse_seed_hex;
use merge_queue_sim::{LogTableSink, ScenarioFile, SimError, Sweep};

fn main() {
    let matches = Command::new("scenario_runner")
        .about("Run merge queue sweeps described by YAML scenario files.")
        .arg(
            Arg::new("path")
                .required(true)
                .value_parser(value_parser!(String))
                .help("Scenario file, or a directory of .yaml/.yml files"),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .value_parser(value_parser!(String))
                .help("Hex seed overriding the scenario's own"),
        )
        .get_matches();

    SimpleLogger::new().with_level(LevelFilter::Info).init().unwrap();

    let result = matches
        .get_one::<String>("seed")
        .map(|s| parse_seed_hex(s))
        .transpose()
        .and_then(|seed| {
            let path = matches
                .get_one::<String>("path")
                .map(Path::new)
                .ok_or_else(|| SimError::InvalidParameter("missing scenario path".to_string()))?;
            run_path(path, seed)
        });

    if let Err(e) = result {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn run_path(path: &Path, seed: Option<[u8; 32]>) -> Result<(), SimError> {
    if path.is_file() {
        run_scenario_file(path, seed)
    } else if path.is_dir() {
        run_scenario_directory(path, seed)
    } else {
        Err(SimError::InvalidParameter(format!(
            "path does not exist: {}",
            path.display()
        )))
    }
}

fn run_scenario_directory(dir: &Path, seed: Option<[u8; 32]>) -> Result<(), SimError> {
    let scenarios = scenario_files(dir)?;
    if scenarios.is_empty() {
        return Err(SimError::InvalidParameter(format!(
            "no .yaml files found in {}",
            dir.display()
        )));
    }

    info!("Found {} scenario(s) to run", scenarios.len());

    for (i, scenario_path) in scenarios.iter().enumerate() {
        info!("");
        info!("{}/{} Running: {}", i + 1, scenarios.len(), scenario_path.display());
        run_scenario_file(scenario_path, seed)?;
    }

    info!("All scenarios complete");
    Ok(())
}

fn run_scenario_file(path: &Path, seed: Option<[u8; 32]>) -> Result<(), SimError> {
    let scenario = ScenarioFile::load(path)?;

    match scenario.meta.name {
        Some(ref name) => info!("Scenario: {}", name),
        None => info!("Scenario: {}", path.display()),
    }
    if let Some(ref desc) = scenario.meta.description {
        info!("{}", desc);
    }

    let sweep = Sweep::new(scenario.sweep_config(seed)?)?;
    sweep.run_with(&mut LogTableSink::new())?;
    Ok(())
}
