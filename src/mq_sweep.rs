//! Queue size sweep
//!
//! Runs one simulation per queue size in `min_queue_size..=max_queue_size`,
//! in ascending order, and hands every row to a [`ReportSink`]. Each row gets
//! its own random stream derived from the sweep seed, so a sweep is
//! reproducible and no two rows share draws.

use log::{debug, warn};
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

use crate::mq_error::SimError;
use crate::mq_interface::{JobCount, Minutes, SimParams, SweepRow};
use crate::mq_report::{CollectingSink, ReportSink};
use crate::mq_simulator::Simulator;

/// Parameters for a whole sweep, as supplied on the command line
#[derive(Debug, Clone, PartialEq)]
pub struct SweepConfig {
    /// Smallest queue size simulated
    pub min_queue_size: JobCount,

    /// Largest queue size simulated (inclusive)
    pub max_queue_size: JobCount,

    /// Simulated hours per queue size
    pub sim_duration_hours: u64,

    /// Minutes per round
    pub job_duration: Minutes,

    /// Per-slot failure chance in [0, 1]
    pub failure_probability: f64,

    /// Jobs waiting to enter a full queue when overflow occurs
    pub overflow_count: JobCount,

    /// Per-round overflow chance in [0, 1]
    pub overflow_probability: f64,

    /// Random seed (None = generate random)
    pub seed: Option<[u8; 32]>,

    /// Include the jobs lost column in reports
    pub report_losses: bool,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            min_queue_size: 1,
            max_queue_size: 10,
            sim_duration_hours: 10_000,
            job_duration: 30,
            failure_probability: 0.1,
            overflow_count: 0,
            overflow_probability: 0.0,
            seed: None,
            report_losses: true,
        }
    }
}

impl SweepConfig {
    /// Check every parameter before anything is simulated
    pub fn validate(&self) -> Result<(), SimError> {
        check_probability("failure probability", self.failure_probability)?;
        check_probability("overflow probability", self.overflow_probability)?;

        if self.job_duration == 0 {
            return Err(SimError::InvalidParameter(
                "job duration must be at least one minute".to_string(),
            ));
        }
        if self.sim_duration_hours == 0 {
            return Err(SimError::InvalidParameter(
                "simulation duration must be at least one hour".to_string(),
            ));
        }
        if self.min_queue_size == 0 {
            return Err(SimError::InvalidParameter(
                "minimum queue size must be at least 1".to_string(),
            ));
        }
        if self.sim_duration_hours.checked_mul(60).is_none() {
            return Err(SimError::InvalidParameter(format!(
                "simulation duration of {} hours is too large",
                self.sim_duration_hours
            )));
        }
        if self.max_queue_size.checked_add(self.overflow_count).is_none() {
            return Err(SimError::InvalidParameter(format!(
                "{} jobs waiting to enter a queue of {} is too large",
                self.overflow_count, self.max_queue_size
            )));
        }
        if self.min_queue_size > self.max_queue_size {
            return Err(SimError::InvalidParameter(format!(
                "minimum queue size {} exceeds maximum queue size {}",
                self.min_queue_size, self.max_queue_size
            )));
        }
        Ok(())
    }

    /// Get or generate seed
    pub fn resolve_seed(&self) -> [u8; 32] {
        self.seed.unwrap_or_else(|| {
            let mut temp_rng = StdRng::from_entropy();
            let mut seed = [0u8; 32];
            temp_rng.fill_bytes(&mut seed);
            seed
        })
    }

    /// Simulation parameters for one queue size
    pub fn params_for(&self, queue_size: JobCount) -> SimParams {
        SimParams::new(
            queue_size,
            self.sim_duration_hours.saturating_mul(60),
            self.job_duration,
            self.failure_probability,
        )
        .with_overflow(self.overflow_count, self.overflow_probability)
    }
}

fn check_probability(name: &'static str, value: f64) -> Result<(), SimError> {
    // NaN fails the range check too
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(SimError::InvalidProbability { name, value })
    }
}

/// A validated sweep with its resolved seed
#[derive(Debug)]
pub struct Sweep {
    config: SweepConfig,
    seed: [u8; 32],
}

impl Sweep {
    /// Validate `config` and fix the seed
    pub fn new(config: SweepConfig) -> Result<Self, SimError> {
        config.validate()?;
        let seed = config.resolve_seed();
        Ok(Self { config, seed })
    }

    pub fn config(&self) -> &SweepConfig {
        &self.config
    }

    pub fn seed(&self) -> [u8; 32] {
        self.seed
    }

    /// Run the sweep and collect its rows
    pub fn run(&self) -> Result<Vec<SweepRow>, SimError> {
        let mut sink = CollectingSink::default();
        self.run_with(&mut sink)
    }

    /// Run the sweep, reporting each row as soon as it is computed
    ///
    /// A queue size that produces no wait-time samples aborts the sweep. Rows
    /// reported before it stay reported.
    pub fn run_with(&self, sink: &mut dyn ReportSink) -> Result<Vec<SweepRow>, SimError> {
        let mut master = StdRng::from_seed(self.seed);
        let mut rows = Vec::new();

        sink.begin(&self.config, &self.seed)?;

        for queue_size in self.config.min_queue_size..=self.config.max_queue_size {
            let params = self.config.params_for(queue_size);
            let mut simulator = Simulator::new(master.gen());

            let result = simulator.run(&params).map_err(|e| {
                warn!("sweep aborted at queue size {}: {}", queue_size, e);
                e
            })?;
            debug!(
                "q={} throughput={} mean_wait={}",
                queue_size, result.throughput_per_hour, result.mean_wait_minutes
            );

            let row = SweepRow { queue_size, result };
            sink.row(&row)?;
            rows.push(row);
        }

        sink.finish()?;
        Ok(rows)
    }
}

/// Render a seed as lowercase hex
pub fn seed_hex(seed: &[u8; 32]) -> String {
    seed.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Parse a hex seed, with or without `0x`; short input is zero padded
pub fn parse_seed_hex(hex: &str) -> Result<[u8; 32], SimError> {
    let hex = hex.strip_prefix("0x").unwrap_or(hex);
    if hex.len() > 64 || hex.len() % 2 != 0 {
        return Err(SimError::InvalidParameter(format!(
            "seed must be an even number of hex digits, at most 64: {}",
            hex
        )));
    }

    let mut seed = [0u8; 32];
    for (i, chunk) in hex.as_bytes().chunks(2).enumerate() {
        let byte_str = std::str::from_utf8(chunk)
            .map_err(|_| SimError::InvalidParameter(format!("invalid hex seed: {}", hex)))?;
        seed[i] = u8::from_str_radix(byte_str, 16)
            .map_err(|e| SimError::InvalidParameter(format!("invalid hex seed {}: {}", hex, e)))?;
    }
    Ok(seed)
}
