//! Repeated simulation of a fixture to estimate each side's chances.

use tinyrand::{Rand, StdRand};
use tracing::debug;

use crate::sim::{Config, Format, Lineup, SimulationError, Simulator};

pub const DEFAULT_TRIALS: u64 = 1_000;

/// Counts of each result over a number of simulated matches. Wins are indexed by the order of
/// the lineups passed to [MonteCarloEngine::simulate].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Tally {
    pub trials: u64,
    pub wins: [u64; 2],
    pub ties: u64,
    pub draws: u64,
    pub first_innings_runs: u64,
}
impl Tally {
    fn ratio(&self, count: u64) -> f64 {
        if self.trials == 0 {
            0.0
        } else {
            count as f64 / self.trials as f64
        }
    }

    pub fn win_probability(&self, side: usize) -> f64 {
        self.ratio(self.wins[side])
    }

    pub fn tie_probability(&self) -> f64 {
        self.ratio(self.ties)
    }

    pub fn draw_probability(&self) -> f64 {
        self.ratio(self.draws)
    }

    pub fn first_innings_runs_mean(&self) -> f64 {
        self.ratio(self.first_innings_runs)
    }
}

pub struct MonteCarloEngine<R: Rand> {
    trials: u64,
    config: Config,
    rand: R,
}
impl Default for MonteCarloEngine<StdRand> {
    fn default() -> Self {
        Self {
            trials: DEFAULT_TRIALS,
            config: Config::default(),
            rand: StdRand::default(),
        }
    }
}
impl<R: Rand> MonteCarloEngine<R> {
    pub fn with_trials(mut self, trials: u64) -> Self {
        self.trials = trials;
        self
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn with_rand<S: Rand>(self, rand: S) -> MonteCarloEngine<S> {
        MonteCarloEngine {
            trials: self.trials,
            config: self.config,
            rand,
        }
    }

    pub fn trials(&self) -> u64 {
        self.trials
    }

    pub fn simulate(&mut self, lineups: &[Lineup; 2], format: Format) -> Result<Tally, SimulationError> {
        let simulator = Simulator::try_from(self.config.clone())?;
        let mut tally = Tally {
            trials: self.trials,
            ..Tally::default()
        };
        for _ in 0..self.trials {
            let simulation = simulator.simulate(lineups, format, &mut self.rand)?;
            match simulation.winner() {
                Some(winner) if winner == lineups[0].team => tally.wins[0] += 1,
                Some(_) => tally.wins[1] += 1,
                None if simulation.is_draw() => tally.draws += 1,
                None => tally.ties += 1,
            }
            tally.first_innings_runs += simulation.inning_runs(0) as u64;
        }
        debug!(
            "{} vs {} over {} trials: {tally:?}",
            lineups[0].team, lineups[1].team, self.trials
        );
        Ok(tally)
    }
}
