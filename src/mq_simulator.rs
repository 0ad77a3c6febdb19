//! Simulation of one queue configuration

use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::mq_error::SimError;
use crate::mq_interface::{SimParams, SimResult};
use crate::mq_round::Rounds;
use crate::mq_stats::Tally;

/// Run one simulation, drawing every random value from `rng`
///
/// Parameters are assumed valid (see `SweepConfig::validate`); the only error
/// is a run in which no round completed a single job.
pub fn simulate<R: Rng + ?Sized>(params: &SimParams, rng: &mut R) -> Result<SimResult, SimError> {
    let tally = Rounds::new(*params, rng).fold(Tally::new(params.job_duration), Tally::record);
    debug!(
        "q={} rounds={} samples={}",
        params.queue_size,
        tally.rounds(),
        tally.wait_samples().len()
    );
    tally.finish(params.queue_size)
}

/// Simulator owning a seeded random stream
pub struct Simulator {
    rng: StdRng,
    seed: [u8; 32],
}

impl Simulator {
    pub fn new(seed: [u8; 32]) -> Self {
        Self {
            rng: StdRng::from_seed(seed),
            seed,
        }
    }

    /// Seed the stream was created from
    pub fn seed(&self) -> [u8; 32] {
        self.seed
    }

    /// Run `params` on this simulator's stream
    pub fn run(&mut self, params: &SimParams) -> Result<SimResult, SimError> {
        simulate(params, &mut self.rng)
    }
}
