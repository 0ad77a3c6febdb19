//! The per-round failure process
//!
//! Every round scans the queue front to back. The first slot that fails
//! bounces itself and every job behind it, so a round completes a prefix of
//! the queue. Rounds that complete anything also yield a wait-time sample from
//! Little's Law (`W = L / λ`), where the population `L` may be inflated by
//! jobs waiting to enter a full queue.

use rand::Rng;

use crate::mq_interface::{JobCount, Minutes, RoundOutcome, SimParams};

/// Play a single round against `rng`
pub fn play_round<R: Rng + ?Sized>(params: &SimParams, rng: &mut R) -> RoundOutcome {
    let jobs_completed = completed_prefix(params.queue_size, params.failure_probability, rng);
    let jobs_lost = params.queue_size - jobs_completed;

    // nothing merged means no rate to divide by
    let wait_sample = if jobs_completed > 0 {
        let population = population(params, rng);
        Some(littles_law_wait(population, jobs_completed, params.job_duration))
    } else {
        None
    };

    RoundOutcome {
        jobs_completed,
        jobs_lost,
        wait_sample,
    }
}

/// Count slots that complete before the first failure
fn completed_prefix<R: Rng + ?Sized>(
    queue_size: JobCount,
    failure_probability: f64,
    rng: &mut R,
) -> JobCount {
    let mut completed = 0;
    for _ in 0..queue_size {
        if rng.gen::<f64>() <= failure_probability {
            break;
        }
        completed += 1;
    }
    completed
}

/// Jobs in line this round, with one overflow draw per round
fn population<R: Rng + ?Sized>(params: &SimParams, rng: &mut R) -> f64 {
    let queue_size = params.queue_size as f64;
    if rng.gen::<f64>() <= params.overflow_probability {
        queue_size + params.overflow_count as f64
    } else {
        queue_size
    }
}

/// Wait time in minutes: population over completion rate (jobs per minute)
pub fn littles_law_wait(population: f64, jobs_completed: JobCount, job_duration: Minutes) -> f64 {
    population / (jobs_completed as f64 / job_duration as f64)
}

/// Lazy sequence of round outcomes, ending once the time budget is spent
pub struct Rounds<'a, R: Rng + ?Sized> {
    params: SimParams,
    rng: &'a mut R,
    elapsed: Minutes,
}

impl<'a, R: Rng + ?Sized> Rounds<'a, R> {
    pub fn new(params: SimParams, rng: &'a mut R) -> Self {
        Self {
            params,
            rng,
            elapsed: 0,
        }
    }

    /// Simulated minutes consumed so far
    pub fn elapsed(&self) -> Minutes {
        self.elapsed
    }
}

impl<R: Rng + ?Sized> Iterator for Rounds<'_, R> {
    type Item = RoundOutcome;

    fn next(&mut self) -> Option<RoundOutcome> {
        if self.elapsed >= self.params.sim_duration {
            return None;
        }
        self.elapsed = self.elapsed.saturating_add(self.params.job_duration);
        Some(play_round(&self.params, self.rng))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::from_seed([7u8; 32])
    }

    #[test]
    fn test_round_conserves_queue_size() {
        let params = SimParams::new(8, 10_000, 10, 0.2);
        let mut rng = rng();
        for outcome in Rounds::new(params, &mut rng) {
            assert_eq!(outcome.jobs_completed + outcome.jobs_lost, 8);
        }
    }

    #[test]
    fn test_no_failures_completes_whole_queue() {
        let params = SimParams::new(5, 600, 10, 0.0);
        let mut rng = rng();
        let outcomes: Vec<_> = Rounds::new(params, &mut rng).collect();

        assert_eq!(outcomes.len(), 60);
        for outcome in outcomes {
            assert_eq!(outcome.jobs_completed, 5);
            assert_eq!(outcome.jobs_lost, 0);
            assert_eq!(outcome.wait_sample, Some(10.0));
        }
    }

    #[test]
    fn test_certain_failure_completes_nothing() {
        let params = SimParams::new(4, 300, 10, 1.0);
        let mut rng = rng();
        for outcome in Rounds::new(params, &mut rng) {
            assert_eq!(outcome.jobs_completed, 0);
            assert_eq!(outcome.jobs_lost, 4);
            assert_eq!(outcome.wait_sample, None);
        }
    }

    #[test]
    fn test_round_count_is_ceiling_of_budget() {
        let params = SimParams::new(3, 95, 10, 0.3);
        let mut rng = rng();
        let mut rounds = Rounds::new(params, &mut rng);
        let count = rounds.by_ref().count() as u64;

        assert_eq!(count, 10);
        assert_eq!(count, params.expected_rounds());
        assert_eq!(rounds.elapsed(), count * 10);
    }

    #[test]
    fn test_completed_prefix_stops_at_first_failure() {
        let mut rng = rng();
        for _ in 0..1_000 {
            let completed = completed_prefix(6, 0.5, &mut rng);
            assert!(completed <= 6);
        }
        // p = 0.5 makes a full queue of 6 rare but an empty one common
        let empties = (0..1_000)
            .filter(|_| completed_prefix(6, 0.5, &mut rng) == 0)
            .count();
        assert!(empties > 350 && empties < 650, "empties = {}", empties);
    }

    #[test]
    fn test_certain_overflow_inflates_population() {
        let params = SimParams::new(4, 100, 10, 0.0).with_overflow(4, 1.0);
        let mut rng = rng();
        for outcome in Rounds::new(params, &mut rng) {
            // (4 + 4) jobs / (4 jobs / 10 min)
            let sample = outcome.wait_sample.unwrap();
            assert!((sample - 20.0).abs() < 1e-9, "sample = {}", sample);
        }
    }

    #[test]
    fn test_overflow_population_beyond_u64_range() {
        let params = SimParams::new(3, 10, 10, 0.0).with_overflow(u64::MAX, 1.0);
        let mut rng = rng();
        let population = population(&params, &mut rng);
        assert_eq!(population, 3.0 + u64::MAX as f64);
    }

    #[test]
    fn test_littles_law_single_slot() {
        assert_eq!(littles_law_wait(1.0, 1, 10), 10.0);
        assert_eq!(littles_law_wait(10.0, 5, 30), 60.0);
    }
}
