//! A single delivery and the wickets that fell on it.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

use crate::cricsheet::{Delivery, WicketData};
use crate::error::ScoringError;
use crate::roles::{Batter, Bowler};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
pub enum DismissalKind {
    #[strum(serialize = "bowled")]
    #[serde(rename = "bowled")]
    Bowled,

    #[strum(serialize = "lbw")]
    #[serde(rename = "lbw")]
    Lbw,

    #[strum(serialize = "caught")]
    #[serde(rename = "caught")]
    Caught,

    #[strum(serialize = "caught and bowled")]
    #[serde(rename = "caught and bowled")]
    CaughtAndBowled,

    #[strum(serialize = "stumped")]
    #[serde(rename = "stumped")]
    Stumped,

    #[strum(serialize = "run out")]
    #[serde(rename = "run out")]
    RunOut,

    #[strum(serialize = "retired hurt")]
    #[serde(rename = "retired hurt")]
    RetiredHurt,

    #[strum(serialize = "retired not out")]
    #[serde(rename = "retired not out")]
    RetiredNotOut,

    #[strum(serialize = "hit wicket")]
    #[serde(rename = "hit wicket")]
    HitWicket,

    #[strum(serialize = "obstructing the field")]
    #[serde(rename = "obstructing the field")]
    ObstructingTheField,

    #[strum(serialize = "timed out")]
    #[serde(rename = "timed out")]
    TimedOut,

    #[strum(serialize = "handled the ball")]
    #[serde(rename = "handled the ball")]
    HandledTheBall,
}
impl DismissalKind {
    /// Dismissals credited to the bowler.
    pub fn is_bowling(&self) -> bool {
        matches!(
            self,
            DismissalKind::Bowled
                | DismissalKind::Lbw
                | DismissalKind::Caught
                | DismissalKind::CaughtAndBowled
                | DismissalKind::Stumped
                | DismissalKind::HitWicket
        )
    }

    /// Retirements end a batter's stay at the crease without costing a wicket.
    pub fn is_retirement(&self) -> bool {
        matches!(self, DismissalKind::RetiredHurt | DismissalKind::RetiredNotOut)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wicket {
    pub mode: DismissalKind,
    pub batter: String,
    pub bowler: String,
    /// Fielder names, each flagged if they were on as a substitute.
    #[serde(default)]
    pub fielders: Vec<(String, bool)>,
}
impl Wicket {
    pub fn from_data(data: &WicketData, bowler: &str) -> Result<Self, ScoringError> {
        let mode = DismissalKind::from_str(&data.kind)
            .map_err(|_| ScoringError::UnknownDismissal(data.kind.clone()))?;
        Ok(Self {
            mode,
            batter: data.player_out.clone(),
            bowler: bowler.into(),
            fielders: data
                .fielders
                .iter()
                .map(|fielder| (fielder.name.clone(), fielder.substitute))
                .collect(),
        })
    }
}

/// A delivery, along with a snapshot of the players and the inning immediately after it was bowled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    /// Position of the delivery within its over, counting illegal deliveries.
    pub index: usize,
    /// Number of legal deliveries bowled in the over before this one.
    pub abs_index: usize,
    pub index_str: String,
    pub batter: Batter,
    pub non_striker: Batter,
    pub bowler: Bowler,
    pub value: String,
    /// Runs scored off the bat.
    pub runs: u32,
    /// Runs added to the batting team's total.
    pub batting_runs: u32,
    pub boundary: bool,
    pub no_balls: u32,
    pub wides: u32,
    pub leg_byes: u32,
    pub byes: u32,
    pub penalty: u32,
    pub dismissals: Vec<Wicket>,
    #[serde(default)]
    pub score: String,
    #[serde(default)]
    pub partnership: String,
}
impl Ball {
    pub fn from_delivery(
        delivery: &Delivery,
        over: usize,
        index: usize,
        abs_index: usize,
        batter: Batter,
        non_striker: Batter,
        bowler: Bowler,
    ) -> Result<Self, ScoringError> {
        let extras = &delivery.extras;
        let dismissals = delivery
            .wickets
            .iter()
            .map(|wicket| Wicket::from_data(wicket, &delivery.bowler))
            .collect::<Result<Vec<_>, _>>()?;
        let batting_runs = delivery.runs.total;
        let mut ball = Self {
            index,
            abs_index,
            index_str: format!("{over}.{}", abs_index + 1),
            batter,
            non_striker,
            bowler,
            value: String::new(),
            runs: delivery.runs.batter,
            batting_runs,
            boundary: matches!(batting_runs, 4 | 6) && !delivery.runs.non_boundary,
            no_balls: u32::from(extras.noballs.is_some()),
            wides: extras.wides.unwrap_or(0),
            leg_byes: extras.legbyes.unwrap_or(0),
            byes: extras.byes.unwrap_or(0),
            penalty: extras.penalty.unwrap_or(0),
            dismissals,
            score: String::new(),
            partnership: String::new(),
        };
        ball.value = ball.notation();
        Ok(ball)
    }

    pub fn bowling_extras(&self) -> u32 {
        self.no_balls + self.wides
    }

    pub fn fielding_extras(&self) -> u32 {
        self.leg_byes + self.byes + self.penalty
    }

    pub fn extras(&self) -> u32 {
        self.bowling_extras() + self.fielding_extras()
    }

    /// Runs conceded by the bowler.
    pub fn bowling_runs(&self) -> u32 {
        self.batting_runs.saturating_sub(self.fielding_extras())
    }

    pub fn bowling_wickets(&self) -> u32 {
        self.dismissals
            .iter()
            .filter(|wicket| wicket.mode.is_bowling())
            .count() as u32
    }

    /// Wickets that count against the batting team.
    pub fn wickets(&self) -> u32 {
        self.dismissals
            .iter()
            .filter(|wicket| !wicket.mode.is_retirement())
            .count() as u32
    }

    /// A legal delivery counts towards the six balls of an over.
    pub fn is_legal(&self) -> bool {
        self.bowling_extras() == 0
    }

    fn notation(&self) -> String {
        let mut value = if self.wides > 0 {
            format!("{}wd", self.wides - 1)
        } else if self.leg_byes > 0 {
            format!("{}lb", self.leg_byes)
        } else if self.byes > 0 {
            format!("{}b", self.byes)
        } else {
            self.batting_runs.to_string()
        };

        if self.no_balls > 0 {
            if self.leg_byes > 0 || self.byes > 0 {
                value.push('+');
            }
            value.push_str("nb");
        }

        if let Some(first) = self.dismissals.first() {
            if !first.mode.is_retirement() {
                if first.mode == DismissalKind::RunOut {
                    value.push_str("+W");
                } else if self.wides > 0 {
                    value.push_str("/W");
                } else {
                    value = "W".into();
                }
            }
        }

        if self.penalty > 0 {
            value.push_str(&format!("{}p", self.penalty));
        }

        value
    }
}

impl Display for Ball {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}
