//! # merge_queue_sim - Merge Queue Throughput Simulator
//!
//! Estimates the steady-state throughput and time to merge of a
//! capacity-limited merge queue by Monte Carlo simulation of discrete rounds.
//!
//! ## Model
//!
//! Every round lasts one job duration. The queue is scanned front to back and
//! the first failing job bounces itself and everything behind it, so a round
//! merges a prefix of the queue. Rounds that merge at least one job produce a
//! wait-time sample from Little's Law, optionally counting extra jobs waiting
//! to enter a full queue.
//!
//! ## Core Components
//!
//! - **mq_round**: the per-round failure process and the lazy round sequence
//! - **mq_stats**: folding rounds into totals, mean/median and hourly rates
//! - **mq_simulator**: one run for one queue size on an owned random stream
//! - **mq_sweep**: validated sweep over a range of queue sizes
//! - **mq_report**: log table, CSV and in-memory report sinks
//! - **mq_scenario**: YAML scenario files
//!
//! ```no_run
//! use merge_queue_sim::{LogTableSink, Sweep, SweepConfig};
//!
//! let config = SweepConfig {
//!     job_duration: 30,
//!     failure_probability: 0.1,
//!     ..Default::default()
//! };
//! let sweep = Sweep::new(config)?;
//! let rows = sweep.run_with(&mut LogTableSink::new())?;
//! # Ok::<(), merge_queue_sim::SimError>(())
//! ```

pub mod mq_error;
pub mod mq_interface;
pub mod mq_report;
pub mod mq_round;
pub mod mq_scenario;
pub mod mq_simulator;
pub mod mq_stats;
pub mod mq_sweep;

// Re-export commonly used types
pub use mq_error::SimError;
pub use mq_interface::{JobCount, Minutes, RoundOutcome, SimParams, SimResult, SweepRow};
pub use mq_report::{CollectingSink, CsvSink, FanoutSink, LogTableSink, ReportSink};
pub use mq_scenario::ScenarioFile;
pub use mq_simulator::{simulate, Simulator};
pub use mq_sweep::{Sweep, SweepConfig};
