//! Shared types for the merge queue simulator.
//!
//! A simulation is a pure function from [`SimParams`] to [`SimResult`]: the
//! per-round [`RoundOutcome`]s only live for the duration of one call.

/// Simulated time in whole minutes
pub type Minutes = u64;

/// Number of jobs (queue slots, completions, losses)
pub type JobCount = u64;

/// Minutes per hour, used to turn per-run totals into hourly rates
pub const MINUTES_PER_HOUR: f64 = 60.0;

/// Parameters for one simulation run at a fixed queue size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimParams {
    /// Capacity of the queue, evaluated slot by slot every round
    pub queue_size: JobCount,

    /// Total simulated minutes the run may consume
    pub sim_duration: Minutes,

    /// Minutes consumed by every round
    pub job_duration: Minutes,

    /// Chance in [0, 1] that a slot fails and blocks every slot behind it
    pub failure_probability: f64,

    /// Extra jobs waiting outside the queue when overflow occurs
    pub overflow_count: JobCount,

    /// Chance in [0, 1] that overflow occurs in a round
    pub overflow_probability: f64,
}

impl SimParams {
    /// Parameters without any overflow modelling
    pub fn new(
        queue_size: JobCount,
        sim_duration: Minutes,
        job_duration: Minutes,
        failure_probability: f64,
    ) -> Self {
        Self {
            queue_size,
            sim_duration,
            job_duration,
            failure_probability,
            overflow_count: 0,
            overflow_probability: 0.0,
        }
    }

    /// Attach an overflow model to these parameters
    pub fn with_overflow(mut self, overflow_count: JobCount, overflow_probability: f64) -> Self {
        self.overflow_count = overflow_count;
        self.overflow_probability = overflow_probability;
        self
    }

    /// Number of rounds a run with these parameters executes
    pub fn expected_rounds(&self) -> u64 {
        self.sim_duration.div_ceil(self.job_duration)
    }
}

/// What happened to the queue during a single round
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundOutcome {
    /// Slots that completed before the first failure
    pub jobs_completed: JobCount,

    /// Slots at or behind the first failure
    pub jobs_lost: JobCount,

    /// Little's Law wait estimate, absent when nothing completed
    pub wait_sample: Option<f64>,
}

/// Summary statistics for one simulation run
#[derive(Debug, Clone, PartialEq)]
pub struct SimResult {
    /// Completed jobs per hour, one decimal
    pub throughput_per_hour: f64,

    /// Lost jobs per hour, one decimal
    pub jobs_lost_per_hour: f64,

    /// Mean time to merge in minutes, one decimal
    pub mean_wait_minutes: f64,

    /// Median time to merge in minutes, one decimal
    pub median_wait_minutes: f64,

    /// Rounds executed
    pub rounds: u64,

    /// Total simulated minutes consumed
    pub elapsed_minutes: Minutes,

    /// Jobs completed over the whole run
    pub jobs_completed: JobCount,

    /// Jobs lost over the whole run
    pub jobs_lost: JobCount,

    /// Number of wait-time samples the statistics were computed from
    pub wait_samples: usize,
}

/// One line of a queue size sweep
#[derive(Debug, Clone, PartialEq)]
pub struct SweepRow {
    pub queue_size: JobCount,
    pub result: SimResult,
}
