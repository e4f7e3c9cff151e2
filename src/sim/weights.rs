//! Hand-tuned outcome weights and the cumulative draw used to sample them.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};
use thiserror::Error;
use tinyrand::Rand;

use crate::ball::DismissalKind;

#[derive(Debug, Error, PartialEq)]
pub enum InvalidConfig {
    #[error("weight of {name} must be a finite, non-negative number, got {value}")]
    InvalidWeight { name: String, value: f64 },

    #[error("{0} weights must not all be zero")]
    EmptyDistribution(String),

    #[error("{0} weights must allow for a legal delivery")]
    NoLegalDelivery(String),
}

/// What can happen off a single delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum BallOutcome {
    Dot,
    One,
    Two,
    Three,
    Four,
    Six,
    Wide,
    NoBall,
    Bye,
    LegBye,
    Wicket,
}
impl BallOutcome {
    pub fn batter_runs(&self) -> u32 {
        match self {
            BallOutcome::One => 1,
            BallOutcome::Two => 2,
            BallOutcome::Three => 3,
            BallOutcome::Four => 4,
            BallOutcome::Six => 6,
            _ => 0,
        }
    }

    pub fn extras(&self) -> u32 {
        match self {
            BallOutcome::Wide | BallOutcome::NoBall | BallOutcome::Bye | BallOutcome::LegBye => 1,
            _ => 0,
        }
    }

    pub fn total(&self) -> u32 {
        self.batter_runs() + self.extras()
    }

    /// Wides and no-balls must be bowled again.
    pub fn is_legal(&self) -> bool {
        !matches!(self, BallOutcome::Wide | BallOutcome::NoBall)
    }

    /// The batters cross when they run an odd number, whether off the bat or as byes.
    pub fn rotates_strike(&self) -> bool {
        matches!(
            self,
            BallOutcome::One | BallOutcome::Three | BallOutcome::Bye | BallOutcome::LegBye
        )
    }

    pub fn is_boundary(&self) -> bool {
        matches!(self, BallOutcome::Four | BallOutcome::Six)
    }
}

#[inline]
pub fn random_f64(rand: &mut impl Rand) -> f64 {
    rand.next_u64() as f64 / u64::MAX as f64
}

/// Picks an index in `0..len` uniformly. `len` must be positive.
pub fn pick(rand: &mut impl Rand, len: usize) -> usize {
    debug_assert!(len > 0);
    ((random_f64(rand) * len as f64) as usize).min(len - 1)
}

/// Draws from a set of weighted entries in proportion to their weights. Entries with a zero
/// weight are never drawn.
pub fn draw<T: Copy, const N: usize>(entries: &[(T, f64); N], rand: &mut impl Rand) -> T {
    let total: f64 = entries.iter().map(|(_, weight)| weight).sum();
    let random = random_f64(rand) * total;
    let mut cumulative = 0.0;
    let mut last = 0;
    for (index, &(_, weight)) in entries.iter().enumerate() {
        if weight > 0.0 {
            cumulative += weight;
            last = index;
            if random < cumulative {
                return entries[index].0;
            }
        }
    }
    entries[last].0
}

fn validate_weights<T: ToString, const N: usize>(
    entries: &[(T, f64); N],
    distribution: &str,
) -> Result<(), InvalidConfig> {
    for (name, weight) in entries {
        if !weight.is_finite() || *weight < 0.0 {
            return Err(InvalidConfig::InvalidWeight {
                name: format!("{distribution}.{}", name.to_string()),
                value: *weight,
            });
        }
    }
    if entries.iter().all(|(_, weight)| *weight == 0.0) {
        return Err(InvalidConfig::EmptyDistribution(distribution.into()));
    }
    Ok(())
}

/// Relative weights of each [BallOutcome]. They need not sum to one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Distribution {
    pub dot: f64,
    pub one: f64,
    pub two: f64,
    pub three: f64,
    pub four: f64,
    pub six: f64,
    pub wide: f64,
    pub no_ball: f64,
    pub bye: f64,
    pub leg_bye: f64,
    pub wicket: f64,
}
impl Distribution {
    pub fn entries(&self) -> [(BallOutcome, f64); 11] {
        [
            (BallOutcome::Dot, self.dot),
            (BallOutcome::One, self.one),
            (BallOutcome::Two, self.two),
            (BallOutcome::Three, self.three),
            (BallOutcome::Four, self.four),
            (BallOutcome::Six, self.six),
            (BallOutcome::Wide, self.wide),
            (BallOutcome::NoBall, self.no_ball),
            (BallOutcome::Bye, self.bye),
            (BallOutcome::LegBye, self.leg_bye),
            (BallOutcome::Wicket, self.wicket),
        ]
    }

    pub fn weight(&self, outcome: BallOutcome) -> f64 {
        match outcome {
            BallOutcome::Dot => self.dot,
            BallOutcome::One => self.one,
            BallOutcome::Two => self.two,
            BallOutcome::Three => self.three,
            BallOutcome::Four => self.four,
            BallOutcome::Six => self.six,
            BallOutcome::Wide => self.wide,
            BallOutcome::NoBall => self.no_ball,
            BallOutcome::Bye => self.bye,
            BallOutcome::LegBye => self.leg_bye,
            BallOutcome::Wicket => self.wicket,
        }
    }

    fn weight_mut(&mut self, outcome: BallOutcome) -> &mut f64 {
        match outcome {
            BallOutcome::Dot => &mut self.dot,
            BallOutcome::One => &mut self.one,
            BallOutcome::Two => &mut self.two,
            BallOutcome::Three => &mut self.three,
            BallOutcome::Four => &mut self.four,
            BallOutcome::Six => &mut self.six,
            BallOutcome::Wide => &mut self.wide,
            BallOutcome::NoBall => &mut self.no_ball,
            BallOutcome::Bye => &mut self.bye,
            BallOutcome::LegBye => &mut self.leg_bye,
            BallOutcome::Wicket => &mut self.wicket,
        }
    }

    pub fn scale(&mut self, outcomes: &[BallOutcome], factor: f64) {
        for &outcome in outcomes {
            *self.weight_mut(outcome) *= factor;
        }
    }

    pub fn total(&self) -> f64 {
        self.entries().iter().map(|(_, weight)| weight).sum()
    }

    /// The probability of each outcome, in the order of [Self::entries].
    pub fn probabilities(&self) -> [f64; 11] {
        let total = self.total();
        self.entries().map(|(_, weight)| weight / total)
    }

    pub fn sample(&self, rand: &mut impl Rand) -> BallOutcome {
        draw(&self.entries(), rand)
    }

    /// Besides checking each weight, requires some chance of a legal delivery, without which
    /// an over never ends.
    pub fn validate(&self, name: &str) -> Result<(), InvalidConfig> {
        validate_weights(&self.entries(), name)?;
        let legal = self
            .entries()
            .iter()
            .any(|(outcome, weight)| outcome.is_legal() && *weight > 0.0);
        if !legal {
            return Err(InvalidConfig::NoLegalDelivery(name.into()));
        }
        Ok(())
    }
}

/// Relative weights of the ways a simulated batter can be dismissed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DismissalWeights {
    pub bowled: f64,
    pub lbw: f64,
    pub caught: f64,
    pub caught_and_bowled: f64,
    pub stumped: f64,
    pub run_out: f64,
}
impl DismissalWeights {
    pub fn entries(&self) -> [(DismissalKind, f64); 6] {
        [
            (DismissalKind::Bowled, self.bowled),
            (DismissalKind::Lbw, self.lbw),
            (DismissalKind::Caught, self.caught),
            (DismissalKind::CaughtAndBowled, self.caught_and_bowled),
            (DismissalKind::Stumped, self.stumped),
            (DismissalKind::RunOut, self.run_out),
        ]
    }

    pub fn sample(&self, rand: &mut impl Rand) -> DismissalKind {
        draw(&self.entries(), rand)
    }

    pub fn validate(&self) -> Result<(), InvalidConfig> {
        validate_weights(&self.entries(), "dismissals")
    }
}
impl Default for DismissalWeights {
    fn default() -> Self {
        Self {
            bowled: 0.18,
            lbw: 0.13,
            caught: 0.56,
            caught_and_bowled: 0.03,
            stumped: 0.03,
            run_out: 0.07,
        }
    }
}

/// The weights for each phase of an inning, plus the dismissal weights. Loadable from JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub powerplay: Distribution,
    pub middle: Distribution,
    pub death: Distribution,
    #[serde(default)]
    pub dismissals: DismissalWeights,
}
impl Config {
    pub fn validate(&self) -> Result<(), InvalidConfig> {
        self.powerplay.validate("powerplay")?;
        self.middle.validate("middle")?;
        self.death.validate("death")?;
        self.dismissals.validate()
    }
}
impl Default for Config {
    fn default() -> Self {
        Self {
            powerplay: Distribution {
                dot: 0.42,
                one: 0.28,
                two: 0.06,
                three: 0.005,
                four: 0.12,
                six: 0.035,
                wide: 0.03,
                no_ball: 0.005,
                bye: 0.004,
                leg_bye: 0.015,
                wicket: 0.045,
            },
            middle: Distribution {
                dot: 0.36,
                one: 0.38,
                two: 0.07,
                three: 0.005,
                four: 0.085,
                six: 0.04,
                wide: 0.025,
                no_ball: 0.004,
                bye: 0.003,
                leg_bye: 0.012,
                wicket: 0.045,
            },
            death: Distribution {
                dot: 0.30,
                one: 0.32,
                two: 0.09,
                three: 0.004,
                four: 0.11,
                six: 0.08,
                wide: 0.035,
                no_ball: 0.006,
                bye: 0.003,
                leg_bye: 0.01,
                wicket: 0.075,
            },
            dismissals: DismissalWeights::default(),
        }
    }
}
