//! Merge queue throughput simulator
//!
//! Run with:
//!   cargo run --bin merge_queue_sim -- --job-duration 30 --failure-probability 0.1
//!   cargo run --bin merge_queue_sim -- --job-duration 30 --failure-probability 0.1 \
//!       --jobs-waiting-to-enter 5 --jobs-waiting-to-enter-probability 0.25 --csv out.csv

use std::fs::File;
use std::io::BufWriter;

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use log::{error, LevelFilter};
use simple_logger::SimpleLogger;

use merge_queue_sim::mq_sweep::parse_seed_hex;
use merge_queue_sim::{CsvSink, FanoutSink, LogTableSink, SimError, Sweep, SweepConfig};

fn main() {
    let matches = command().get_matches();

    let level = if matches.get_flag("verbose") {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    SimpleLogger::new().with_level(level).init().unwrap();

    if let Err(e) = run(&matches) {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn command() -> Command {
    Command::new("merge_queue_sim")
        .about("Merge queue throughput simulator.")
        .arg(
            Arg::new("job-duration")
                .long("job-duration")
                .required(true)
                .value_parser(value_parser!(u64))
                .help("Job duration in minutes."),
        )
        .arg(
            Arg::new("failure-probability")
                .long("failure-probability")
                .required(true)
                .value_parser(value_parser!(f64))
                .help("Job failure probability expressed as a number between 0 and 1."),
        )
        .arg(
            Arg::new("max-queue-size")
                .long("max-queue-size")
                .default_value("10")
                .value_parser(value_parser!(u64))
                .help("Maximum queue size to simulate."),
        )
        .arg(
            Arg::new("min-queue-size")
                .long("min-queue-size")
                .default_value("1")
                .value_parser(value_parser!(u64))
                .help("Minimum queue size to simulate."),
        )
        .arg(
            Arg::new("sim-duration")
                .long("sim-duration")
                .default_value("10000")
                .value_parser(value_parser!(u64))
                .help("Simulation duration in hours."),
        )
        .arg(
            Arg::new("jobs-waiting-to-enter")
                .long("jobs-waiting-to-enter")
                .alias("jobs_waiting_to_enter")
                .default_value("0")
                .value_parser(value_parser!(u64))
                .help(
                    "Number of jobs waiting to enter the queue simulating a queue being full \
                     and jobs waiting.",
                ),
        )
        .arg(
            Arg::new("jobs-waiting-to-enter-probability")
                .long("jobs-waiting-to-enter-probability")
                .alias("jobs_waiting_to_enter_probability")
                .default_value("0")
                .value_parser(value_parser!(f64))
                .help(
                    "Probability that jobs are waiting to enter the queue in a round, \
                     expressed as a number between 0 and 1.",
                ),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .value_parser(value_parser!(String))
                .help("Random seed as hex (up to 32 bytes); random when omitted."),
        )
        .arg(
            Arg::new("csv")
                .long("csv")
                .value_parser(value_parser!(String))
                .help("Also write the results table to this CSV file."),
        )
        .arg(
            Arg::new("no-losses")
                .long("no-losses")
                .action(ArgAction::SetTrue)
                .help("Leave the jobs lost column out of the report."),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .action(ArgAction::SetTrue)
                .help("Log every simulation run."),
        )
}

fn run(matches: &ArgMatches) -> Result<(), SimError> {
    let seed = matches
        .get_one::<String>("seed")
        .map(|s| parse_seed_hex(s))
        .transpose()?;

    let config = SweepConfig {
        min_queue_size: arg(matches, "min-queue-size")?,
        max_queue_size: arg(matches, "max-queue-size")?,
        sim_duration_hours: arg(matches, "sim-duration")?,
        job_duration: arg(matches, "job-duration")?,
        failure_probability: arg(matches, "failure-probability")?,
        overflow_count: arg(matches, "jobs-waiting-to-enter")?,
        overflow_probability: arg(matches, "jobs-waiting-to-enter-probability")?,
        seed,
        report_losses: !matches.get_flag("no-losses"),
    };

    // rejected configurations never reach the report
    let sweep = Sweep::new(config)?;

    let mut sinks = FanoutSink::new();
    sinks.push(Box::new(LogTableSink::new()));
    if let Some(path) = matches.get_one::<String>("csv") {
        let file = File::create(path)?;
        sinks.push(Box::new(CsvSink::new(BufWriter::new(file))));
    }

    sweep.run_with(&mut sinks)?;
    Ok(())
}

/// Value of an argument that is required or has a default
fn arg<T: Clone + Send + Sync + 'static>(matches: &ArgMatches, id: &str) -> Result<T, SimError> {
    matches
        .get_one::<T>(id)
        .cloned()
        .ok_or_else(|| SimError::InvalidParameter(format!("missing value for --{}", id)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> ArgMatches {
        let argv = std::iter::once("merge_queue_sim").chain(args.iter().copied());
        command().try_get_matches_from(argv).unwrap()
    }

    #[test]
    fn test_command_is_well_formed() {
        command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let matches = parse(&["--job-duration", "30", "--failure-probability", "0.1"]);
        assert_eq!(arg::<u64>(&matches, "min-queue-size").unwrap(), 1);
        assert_eq!(arg::<u64>(&matches, "max-queue-size").unwrap(), 10);
        assert_eq!(arg::<u64>(&matches, "sim-duration").unwrap(), 10_000);
        assert_eq!(arg::<u64>(&matches, "jobs-waiting-to-enter").unwrap(), 0);
        assert_eq!(arg::<f64>(&matches, "jobs-waiting-to-enter-probability").unwrap(), 0.0);
        assert!(!matches.get_flag("no-losses"));
    }

    #[test]
    fn test_requires_job_model() {
        assert!(command()
            .try_get_matches_from(["merge_queue_sim", "--job-duration", "30"])
            .is_err());
    }

    #[test]
    fn test_underscore_aliases() {
        let matches = parse(&[
            "--job-duration",
            "30",
            "--failure-probability",
            "0.1",
            "--jobs_waiting_to_enter",
            "4",
            "--jobs_waiting_to_enter_probability",
            "0.5",
        ]);
        assert_eq!(arg::<u64>(&matches, "jobs-waiting-to-enter").unwrap(), 4);
        assert_eq!(arg::<f64>(&matches, "jobs-waiting-to-enter-probability").unwrap(), 0.5);
    }

    #[test]
    fn test_absent_argument_is_an_error() {
        let matches = parse(&["--job-duration", "30", "--failure-probability", "0.1"]);
        assert!(matches!(
            arg::<String>(&matches, "csv"),
            Err(SimError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_out_of_range_probability_fails_run() {
        let matches = parse(&["--job-duration", "30", "--failure-probability", "1.5"]);
        let err = run(&matches).unwrap_err();
        assert!(err.is_configuration());
    }
}
