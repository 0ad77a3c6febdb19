//! Aggregation of round outcomes into summary statistics

use crate::mq_error::SimError;
use crate::mq_interface::{JobCount, Minutes, RoundOutcome, SimResult, MINUTES_PER_HOUR};

/// Running totals for one simulation run
///
/// Built by folding the round sequence: `rounds.fold(Tally::new(d), Tally::record)`.
#[derive(Debug, Clone, Default)]
pub struct Tally {
    job_duration: Minutes,
    rounds: u64,
    elapsed: Minutes,
    jobs_completed: JobCount,
    jobs_lost: JobCount,
    wait_samples: Vec<f64>,
}

impl Tally {
    pub fn new(job_duration: Minutes) -> Self {
        Self {
            job_duration,
            ..Default::default()
        }
    }

    /// Account for one more round
    pub fn record(mut self, outcome: RoundOutcome) -> Self {
        self.rounds += 1;
        self.elapsed = self.elapsed.saturating_add(self.job_duration);
        self.jobs_completed += outcome.jobs_completed;
        self.jobs_lost += outcome.jobs_lost;
        if let Some(sample) = outcome.wait_sample {
            self.wait_samples.push(sample);
        }
        self
    }

    pub fn rounds(&self) -> u64 {
        self.rounds
    }

    pub fn elapsed(&self) -> Minutes {
        self.elapsed
    }

    pub fn wait_samples(&self) -> &[f64] {
        &self.wait_samples
    }

    /// Turn the totals into a result, failing when no round completed a job
    pub fn finish(mut self, queue_size: JobCount) -> Result<SimResult, SimError> {
        let rounds = self.rounds;
        let no_samples = || SimError::NoWaitSamples { queue_size, rounds };
        let mean_wait = mean(&self.wait_samples).ok_or_else(no_samples)?;
        let median_wait = median(&mut self.wait_samples).ok_or_else(no_samples)?;

        let hours = self.elapsed as f64 / MINUTES_PER_HOUR;

        Ok(SimResult {
            throughput_per_hour: round1(self.jobs_completed as f64 / hours),
            jobs_lost_per_hour: round1(self.jobs_lost as f64 / hours),
            mean_wait_minutes: round1(mean_wait),
            median_wait_minutes: round1(median_wait),
            rounds: self.rounds,
            elapsed_minutes: self.elapsed,
            jobs_completed: self.jobs_completed,
            jobs_lost: self.jobs_lost,
            wait_samples: self.wait_samples.len(),
        })
    }
}

/// Round to one decimal place on the exact decimal value, ties to even
///
/// Scaling by ten first would round 0.35 (stored as 0.3499...) up to 0.4.
pub fn round1(value: f64) -> f64 {
    format!("{:.1}", value).parse().unwrap_or(value)
}

/// Arithmetic mean, `None` for an empty sample
pub fn mean(samples: &[f64]) -> Option<f64> {
    if samples.is_empty() {
        return None;
    }
    Some(samples.iter().sum::<f64>() / samples.len() as f64)
}

/// Median, averaging the two middle values for an even count
///
/// Sorts `samples` in place.
pub fn median(samples: &mut [f64]) -> Option<f64> {
    if samples.is_empty() {
        return None;
    }
    samples.sort_by(f64::total_cmp);
    let mid = samples.len() / 2;
    if samples.len() % 2 == 1 {
        Some(samples[mid])
    } else {
        Some((samples[mid - 1] + samples[mid]) / 2.0)
    }
}
