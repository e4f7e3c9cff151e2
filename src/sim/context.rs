//! The state of play that conditions each simulated delivery.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

use crate::sim::weights::{BallOutcome, Config, Distribution};

const BOUNDARIES: [BallOutcome; 2] = [BallOutcome::Four, BallOutcome::Six];

/// Boundary weights shrink by this much for each wicket down.
const WICKET_DAMPING: f64 = 0.05;
const MIN_WICKET_FACTOR: f64 = 0.5;

/// Required rate per over above which a chasing side starts taking risks.
const PRESSURE_RATE: f64 = 8.0;
const MAX_PRESSURE_FACTOR: f64 = 2.0;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
pub enum Format {
    #[strum(serialize = "T20")]
    #[serde(rename = "T20")]
    T20,

    #[strum(serialize = "ODI")]
    #[serde(rename = "ODI")]
    Odi,

    #[strum(serialize = "Test")]
    #[serde(rename = "Test")]
    Test,
}
impl Format {
    /// The over limit of each inning, if there is one.
    pub fn overs(&self) -> Option<u32> {
        match self {
            Format::T20 => Some(20),
            Format::Odi => Some(50),
            Format::Test => None,
        }
    }

    pub fn innings(&self) -> usize {
        match self {
            Format::Test => 4,
            _ => 2,
        }
    }

    /// Overs bowled while the fielding restrictions (or, in a Test, the new ball) favour the
    /// batters.
    pub fn powerplay_overs(&self) -> u32 {
        match self {
            Format::T20 => 6,
            Format::Odi | Format::Test => 10,
        }
    }

    pub fn death_from(&self) -> Option<u32> {
        match self {
            Format::T20 => Some(15),
            Format::Odi => Some(40),
            Format::Test => None,
        }
    }

    /// The most overs a bowler may bowl in an inning.
    pub fn bowler_cap(&self) -> Option<u32> {
        self.overs().map(|overs| overs / 5)
    }

    fn condition(&self, distribution: &mut Distribution) {
        match self {
            Format::Test => {
                distribution.scale(&BOUNDARIES, 0.6);
                distribution.scale(&[BallOutcome::Dot], 1.4);
                distribution.scale(&[BallOutcome::Wicket], 0.6);
            }
            Format::Odi => {
                distribution.scale(&BOUNDARIES, 0.85);
                distribution.scale(&[BallOutcome::Wicket], 0.8);
            }
            Format::T20 => {}
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Serialize, Deserialize)]
pub enum Phase {
    Powerplay,
    Middle,
    Death,
}
impl Phase {
    /// The phase that a zero-based `over` falls in.
    pub fn of(format: Format, over: u32) -> Self {
        if over < format.powerplay_overs() {
            Phase::Powerplay
        } else if format.death_from().map_or(false, |death| over >= death) {
            Phase::Death
        } else {
            Phase::Middle
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Context {
    pub format: Format,
    pub phase: Phase,
    pub wickets: u32,
    pub runs: u32,
    /// Legal balls left in the inning, where it has an over limit.
    pub balls_remaining: Option<u32>,
    /// Runs needed to win, when chasing.
    pub target: Option<u32>,
}
impl Context {
    /// Runs required per over to reach the target, when chasing in a limited-overs inning.
    pub fn required_rate(&self) -> Option<f64> {
        let (target, balls) = self.target.zip(self.balls_remaining)?;
        if balls == 0 {
            return None;
        }
        let required = target.saturating_sub(self.runs);
        Some(required as f64 * 6.0 / balls as f64)
    }

    /// The phase weights, adjusted for the format, the wickets down and the pressure of a chase.
    pub fn condition(&self, config: &Config) -> Distribution {
        let mut distribution = match self.phase {
            Phase::Powerplay => config.powerplay.clone(),
            Phase::Middle => config.middle.clone(),
            Phase::Death => config.death.clone(),
        };
        self.format.condition(&mut distribution);

        if self.wickets > 0 {
            let factor = (1.0 - WICKET_DAMPING * self.wickets as f64).max(MIN_WICKET_FACTOR);
            distribution.scale(&BOUNDARIES, factor);
        }

        if let Some(required_rate) = self.required_rate() {
            if required_rate > PRESSURE_RATE {
                distribution.scale(&BOUNDARIES, (required_rate / PRESSURE_RATE).min(MAX_PRESSURE_FACTOR));
            }
        }
        distribution
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use assert_float_eq::*;

    use super::*;

    fn context(format: Format, over: u32) -> Context {
        Context {
            format,
            phase: Phase::of(format, over),
            wickets: 0,
            runs: 0,
            balls_remaining: None,
            target: None,
        }
    }

    #[test]
    fn phases() {
        assert_eq!(Phase::Powerplay, Phase::of(Format::T20, 5));
        assert_eq!(Phase::Middle, Phase::of(Format::T20, 6));
        assert_eq!(Phase::Middle, Phase::of(Format::T20, 14));
        assert_eq!(Phase::Death, Phase::of(Format::T20, 15));
        assert_eq!(Phase::Powerplay, Phase::of(Format::Odi, 9));
        assert_eq!(Phase::Middle, Phase::of(Format::Odi, 39));
        assert_eq!(Phase::Death, Phase::of(Format::Odi, 40));
        assert_eq!(Phase::Powerplay, Phase::of(Format::Test, 9));
        assert_eq!(Phase::Middle, Phase::of(Format::Test, 10));
        assert_eq!(Phase::Middle, Phase::of(Format::Test, 400));
    }

    #[test]
    fn formats() {
        assert_eq!(Format::Odi, Format::from_str("ODI").unwrap());
        assert_eq!("Test", Format::Test.to_string());
        assert_eq!(Some(4), Format::T20.bowler_cap());
        assert_eq!(Some(10), Format::Odi.bowler_cap());
        assert_eq!(None, Format::Test.bowler_cap());
        assert_eq!(4, Format::Test.innings());
    }

    #[test]
    fn unconditioned_t20() {
        let config = Config::default();
        assert_eq!(config.powerplay, context(Format::T20, 0).condition(&config));
        assert_eq!(config.death, context(Format::T20, 19).condition(&config));
    }

    #[test]
    fn format_factors() {
        let config = Config::default();
        let test = context(Format::Test, 20).condition(&config);
        assert_float_absolute_eq!(0.36 * 1.4, test.dot, 1e-9);
        assert_float_absolute_eq!(0.085 * 0.6, test.four, 1e-9);
        assert_float_absolute_eq!(0.045 * 0.6, test.wicket, 1e-9);
        assert_float_absolute_eq!(0.38, test.one, 1e-9);

        let odi = context(Format::Odi, 20).condition(&config);
        assert_float_absolute_eq!(0.04 * 0.85, odi.six, 1e-9);
        assert_float_absolute_eq!(0.045 * 0.8, odi.wicket, 1e-9);
    }

    #[test]
    fn wickets_damp_boundaries() {
        let config = Config::default();
        let mut ctx = context(Format::T20, 8);
        ctx.wickets = 4;
        let conditioned = ctx.condition(&config);
        assert_float_absolute_eq!(0.085 * 0.8, conditioned.four, 1e-9);
        assert_float_absolute_eq!(0.04 * 0.8, conditioned.six, 1e-9);
        assert_float_absolute_eq!(0.36, conditioned.dot, 1e-9);

        ctx.wickets = 9;
        let conditioned = ctx.condition(&config);
        assert_float_absolute_eq!(0.085 * 0.55, conditioned.four, 1e-9);

        // floored once the damping would take boundaries below half
        for wickets in [10, 12] {
            ctx.wickets = wickets;
            let conditioned = ctx.condition(&config);
            assert_float_absolute_eq!(0.085 * 0.5, conditioned.four, 1e-9);
            assert_float_absolute_eq!(0.04 * 0.5, conditioned.six, 1e-9);
        }
    }

    #[test]
    fn chase_pressure() {
        let config = Config::default();
        let mut ctx = context(Format::T20, 16);
        ctx.target = Some(100);
        ctx.runs = 70;
        ctx.balls_remaining = Some(18);
        // 30 off 3 overs
        assert_float_absolute_eq!(10.0, ctx.required_rate().unwrap(), 1e-9);
        let conditioned = ctx.condition(&config);
        assert_float_absolute_eq!(0.11 * 1.25, conditioned.four, 1e-9);

        ctx.runs = 10;
        let conditioned = ctx.condition(&config);
        assert_float_absolute_eq!(0.08 * 2.0, conditioned.six, 1e-9);

        ctx.runs = 90;
        assert_eq!(config.death, ctx.condition(&config));

        ctx.balls_remaining = Some(0);
        assert_eq!(None, ctx.required_rate());
    }
}
