//! Simulation of fictitious matches, one delivery at a time.
//!
//! Each delivery's outcome is drawn from hand-tuned weights for the phase of the inning, adjusted
//! for the format, the wickets down and the pressure of a chase. The simulator writes its
//! deliveries in the Cricsheet format, so a simulated match is scored by the same code that
//! scores a real one.

use std::collections::BTreeMap;
use std::mem;

use chrono::Local;
use thiserror::Error;
use tinyrand::Rand;
use tracing::{debug, trace};

use crate::ball::DismissalKind;
use crate::cricinfo::{CricinfoData, PlayerInfo, TeamInfo};
use crate::cricsheet::{
    By, Delivery, Extras, FielderData, Info, InningData, MatchData, Meta, Outcome, OverData, Runs,
    Target, Toss, WicketData,
};
use crate::error::ScoringError;
use crate::game::Match;
use crate::over::BALLS_PER_OVER;
use crate::roster::short_name;

pub mod context;
pub mod weights;

pub use context::{Context, Format, Phase};
pub use weights::{BallOutcome, Config, DismissalWeights, Distribution, InvalidConfig};

use weights::{pick, random_f64};

pub const XI: usize = 11;

/// Where the keeper stands in an artificial XI, and the fallback for a real XI whose keeper
/// is not known.
pub const DEFAULT_KEEPER: usize = 5;

/// Bowlers are drawn from the tail of the batting order.
pub const BOWLING_POOL: usize = 5;

/// Five days of ninety overs.
pub const TEST_OVERS: u32 = 450;

pub const SIMULATED_VENUE: &str = "Simulation";
const DATA_VERSION: &str = "1.1.0";
const ALL_OUT: u32 = 10;

#[derive(Debug, Error, PartialEq)]
pub enum SimulationError {
    #[error("{0}")]
    Config(#[from] InvalidConfig),

    #[error("{0}")]
    Scoring(#[from] ScoringError),

    #[error("{team} has {players} players, expected {XI}")]
    IncompleteTeam { team: String, players: usize },

    #[error("keeper index {keeper} is outside the XI of {team}")]
    InvalidKeeper { team: String, keeper: usize },

    #[error("a match needs two teams, got {0}")]
    TeamCount(usize),
}

/// A team's XI in batting order, with the index of its keeper.
#[derive(Debug, Clone, PartialEq)]
pub struct Lineup {
    pub team: String,
    pub players: Vec<PlayerInfo>,
    pub keeper: usize,
}
impl Lineup {
    /// An XI of made-up players named `"{team} Player 1"` through `"{team} Player 11"`.
    pub fn artificial(team: &str) -> Self {
        let players = (1..=XI)
            .map(|number| {
                let name = format!("{team} Player {number}");
                PlayerInfo {
                    known_as: name.clone(),
                    card_long: name,
                    card_short: Some(format!("Player {number}")),
                    mobile_name: format!("Player {number}"),
                    ..PlayerInfo::default()
                }
            })
            .collect();
        Self {
            team: team.into(),
            players,
            keeper: DEFAULT_KEEPER,
        }
    }

    /// The two XIs of a real match, enriched with Cricinfo metadata where it is available.
    pub fn from_match(
        data: &MatchData,
        cricinfo: Option<&CricinfoData>,
    ) -> Result<[Self; 2], SimulationError> {
        let teams = &data.info.teams;
        let [first, second] = teams.as_slice() else {
            return Err(SimulationError::TeamCount(teams.len()));
        };
        let players_info = cricinfo.map(CricinfoData::players_info).unwrap_or_default();
        let lineup = |team: &String| {
            let names = data.info.players.get(team).map(Vec::as_slice).unwrap_or_default();
            if names.len() < XI {
                return Err(SimulationError::IncompleteTeam {
                    team: team.clone(),
                    players: names.len(),
                });
            }
            let known = players_info.get(team);
            let players: Vec<_> = names[..XI]
                .iter()
                .map(|name| {
                    known
                        .and_then(|known| known.get(name))
                        .cloned()
                        .unwrap_or_else(|| named_player(name))
                })
                .collect();
            let keeper = players
                .iter()
                .position(|player| player.keeper)
                .unwrap_or(DEFAULT_KEEPER);
            Ok(Self {
                team: team.clone(),
                players,
                keeper,
            })
        };
        Ok([lineup(first)?, lineup(second)?])
    }

    pub fn names(&self) -> Vec<String> {
        self.players.iter().map(|player| player.card_long.clone()).collect()
    }

    pub fn name(&self, index: usize) -> &str {
        &self.players[index].card_long
    }

    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.players.len() != XI {
            return Err(SimulationError::IncompleteTeam {
                team: self.team.clone(),
                players: self.players.len(),
            });
        }
        if self.keeper >= XI {
            return Err(SimulationError::InvalidKeeper {
                team: self.team.clone(),
                keeper: self.keeper,
            });
        }
        Ok(())
    }

    fn team_info(&self) -> TeamInfo {
        TeamInfo {
            team_name: self.team.clone(),
            player: self
                .players
                .iter()
                .enumerate()
                .map(|(index, player)| PlayerInfo {
                    keeper: index == self.keeper,
                    ..player.clone()
                })
                .collect(),
        }
    }
}

fn named_player(name: &str) -> PlayerInfo {
    PlayerInfo {
        known_as: name.into(),
        card_long: name.into(),
        mobile_name: short_name(name),
        ..PlayerInfo::default()
    }
}

/// A simulated match in Cricsheet form, together with the player metadata needed to score it.
#[derive(Debug, Clone, PartialEq)]
pub struct Simulation {
    pub data: MatchData,
    pub players: CricinfoData,
}
impl Simulation {
    pub fn score(&self, index: u64) -> Result<Match, ScoringError> {
        Match::score(index, &self.data, Some(&self.players))
    }

    pub fn winner(&self) -> Option<&str> {
        self.data.info.outcome.winner.as_deref()
    }

    pub fn is_tie(&self) -> bool {
        self.data.info.outcome.result.as_deref() == Some("tie")
    }

    pub fn is_draw(&self) -> bool {
        self.data.info.outcome.result.as_deref() == Some("draw")
    }

    pub fn inning_runs(&self, index: usize) -> u32 {
        self.data
            .innings
            .get(index)
            .map(|inning| {
                inning
                    .overs
                    .iter()
                    .flat_map(|over| &over.deliveries)
                    .map(|delivery| delivery.runs.total)
                    .sum()
            })
            .unwrap_or(0)
    }
}

/// The result of simulating one inning.
#[derive(Debug)]
struct Played {
    data: InningData,
    runs: u32,
    wickets: u32,
    overs: u32,
    /// All out or the target reached, as opposed to running out of overs.
    complete: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Simulator {
    config: Config,
}
impl Simulator {
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Simulates a match between two XIs, the first of which is listed first in the output. The
    /// toss decides who bats first.
    pub fn simulate(
        &self,
        lineups: &[Lineup; 2],
        format: Format,
        rand: &mut impl Rand,
    ) -> Result<Simulation, SimulationError> {
        for lineup in lineups {
            lineup.validate()?;
        }
        let toss_winner = pick(rand, 2);
        let bat = random_f64(rand) < 0.5;
        let first = if bat { toss_winner } else { 1 - toss_winner };
        let order = [first, 1 - first];

        let mut budget = match format {
            Format::Test => Some(TEST_OVERS),
            _ => None,
        };
        let mut played: Vec<Played> = Vec::with_capacity(format.innings());
        for index in 0..format.innings() {
            let runs = |inning: usize| played.get(inning).map_or(0, |played| played.runs);
            let target = match (format, index) {
                (Format::Test, 3) if runs(0) + runs(2) < runs(1) => break,
                (Format::Test, 3) => Some(runs(0) + runs(2) - runs(1) + 1),
                (Format::Test, _) => None,
                (_, 1) => Some(runs(0) + 1),
                _ => None,
            };
            let limit = format.overs().or(budget);
            if limit == Some(0) {
                break;
            }
            let batting = order[index % 2];
            let inning = self.play_inning(
                &lineups[batting],
                &lineups[1 - batting],
                format,
                limit,
                target,
                rand,
            );
            trace!(
                "{} scored {}-{} in {} overs",
                lineups[batting].team,
                inning.runs,
                inning.wickets,
                inning.overs
            );
            if let Some(budget) = budget.as_mut() {
                *budget = budget.saturating_sub(inning.overs);
            }
            let out_of_time = format == Format::Test && !inning.complete;
            played.push(inning);
            if out_of_time {
                break;
            }
        }

        let outcome = decide(format, [&lineups[order[0]].team, &lineups[order[1]].team], &played);
        let today = Local::now().date_naive().format("%Y-%m-%d").to_string();
        let data = MatchData {
            meta: Meta {
                data_version: DATA_VERSION.into(),
                created: today.clone(),
                revision: 1,
            },
            info: Info {
                balls_per_over: BALLS_PER_OVER as u8,
                dates: vec![today],
                gender: "male".into(),
                match_type: format.to_string(),
                outcome,
                overs: format.overs(),
                players: lineups
                    .iter()
                    .map(|lineup| (lineup.team.clone(), lineup.names()))
                    .collect::<BTreeMap<_, _>>(),
                team_type: "international".into(),
                teams: lineups.iter().map(|lineup| lineup.team.clone()).collect(),
                toss: Toss {
                    uncontested: None,
                    decision: (if bat { "bat" } else { "field" }).into(),
                    winner: lineups[toss_winner].team.clone(),
                },
                venue: SIMULATED_VENUE.into(),
                ..Info::default()
            },
            innings: played.into_iter().map(|inning| inning.data).collect(),
        };
        debug!(
            "simulated {} vs {}: {:?}",
            lineups[0].team, lineups[1].team, data.info.outcome
        );
        Ok(Simulation {
            data,
            players: CricinfoData {
                team: lineups.iter().map(Lineup::team_info).collect(),
                substitute: vec![],
            },
        })
    }

    /// Plays until the batting side is all out, the over `limit` is reached or the `target` is
    /// passed.
    fn play_inning(
        &self,
        batting: &Lineup,
        fielding: &Lineup,
        format: Format,
        limit: Option<u32>,
        target: Option<u32>,
        rand: &mut impl Rand,
    ) -> Played {
        let reached = |runs: u32| target.map_or(false, |target| runs >= target);
        let cap = format.bowler_cap();
        let mut bowled = [0u32; XI];
        let mut last_bowler = None;
        let (mut striker, mut non_striker, mut next_in) = (0, 1, 2);
        let (mut runs, mut wickets, mut legal) = (0, 0, 0);
        let mut overs = vec![];
        let mut over = 0;

        while wickets < ALL_OUT && !reached(runs) && limit.map_or(true, |limit| over < limit) {
            let bowler = choose_bowler(fielding.keeper, &bowled, last_bowler, cap, rand);
            let mut deliveries = vec![];
            let mut over_legal = 0;
            while over_legal < BALLS_PER_OVER {
                let context = Context {
                    format,
                    phase: Phase::of(format, over),
                    wickets,
                    runs,
                    balls_remaining: format.overs().map(|overs| overs * BALLS_PER_OVER as u32 - legal),
                    target,
                };
                let outcome = context.condition(&self.config).sample(rand);
                let mut delivery = delivery(
                    outcome,
                    batting.name(striker),
                    fielding.name(bowler),
                    batting.name(non_striker),
                );
                if outcome.is_legal() {
                    over_legal += 1;
                    legal += 1;
                }
                runs += outcome.total();
                if outcome == BallOutcome::Wicket {
                    let kind = self.config.dismissals.sample(rand);
                    delivery.wickets.push(WicketData {
                        player_out: batting.name(striker).into(),
                        kind: kind.to_string(),
                        fielders: fielders(kind, fielding, bowler, rand),
                    });
                    deliveries.push(delivery);
                    wickets += 1;
                    if wickets == ALL_OUT {
                        break;
                    }
                    striker = next_in;
                    next_in += 1;
                } else {
                    deliveries.push(delivery);
                    if outcome.rotates_strike() {
                        mem::swap(&mut striker, &mut non_striker);
                    }
                }
                if reached(runs) {
                    break;
                }
            }
            if over_legal == BALLS_PER_OVER {
                mem::swap(&mut striker, &mut non_striker);
            }
            overs.push(OverData { over, deliveries });
            bowled[bowler] += 1;
            last_bowler = Some(bowler);
            over += 1;
        }

        Played {
            data: InningData {
                team: batting.team.clone(),
                overs,
                target: target.map(|runs| Target {
                    overs: format.overs().map(f64::from),
                    runs: Some(runs),
                }),
                ..InningData::default()
            },
            runs,
            wickets,
            overs: over,
            complete: wickets == ALL_OUT || reached(runs),
        }
    }
}

impl TryFrom<Config> for Simulator {
    type Error = InvalidConfig;

    fn try_from(config: Config) -> Result<Self, Self::Error> {
        config.validate()?;
        Ok(Self { config })
    }
}

/// Chooses the bowler of the next over from the last [BOWLING_POOL] players of the XI. Nobody
/// bowls consecutive overs, and nobody exceeds the cap while anyone else can bowl. Part-timers
/// are called upon only when the pool is exhausted. The keeper never bowls.
fn choose_bowler(
    keeper: usize,
    bowled: &[u32; XI],
    last: Option<usize>,
    cap: Option<u32>,
    rand: &mut impl Rand,
) -> usize {
    let eligible = |index: &usize| *index != keeper && Some(*index) != last;
    let under_cap = |index: &usize| cap.map_or(true, |cap| bowled[*index] < cap);
    let pool = XI - BOWLING_POOL..XI;

    let mut candidates: Vec<_> = pool.clone().filter(eligible).filter(under_cap).collect();
    if candidates.is_empty() {
        candidates = (0..XI).filter(eligible).filter(under_cap).collect();
    }
    if candidates.is_empty() {
        candidates = pool.filter(eligible).collect();
    }
    candidates[pick(rand, candidates.len())]
}

fn fielders(kind: DismissalKind, fielding: &Lineup, bowler: usize, rand: &mut impl Rand) -> Vec<FielderData> {
    let fielder = |index: usize| {
        vec![FielderData {
            name: fielding.name(index).into(),
            substitute: false,
        }]
    };
    match kind {
        DismissalKind::Caught => {
            let catchers: Vec<_> = (0..XI).filter(|&index| index != bowler).collect();
            fielder(catchers[pick(rand, catchers.len())])
        }
        DismissalKind::CaughtAndBowled => fielder(bowler),
        DismissalKind::Stumped => fielder(fielding.keeper),
        DismissalKind::RunOut => fielder(pick(rand, XI)),
        _ => vec![],
    }
}

fn delivery(outcome: BallOutcome, batter: &str, bowler: &str, non_striker: &str) -> Delivery {
    let extra = Some(1);
    let extras = match outcome {
        BallOutcome::Wide => Extras {
            wides: extra,
            ..Extras::default()
        },
        BallOutcome::NoBall => Extras {
            noballs: extra,
            ..Extras::default()
        },
        BallOutcome::Bye => Extras {
            byes: extra,
            ..Extras::default()
        },
        BallOutcome::LegBye => Extras {
            legbyes: extra,
            ..Extras::default()
        },
        _ => Extras::default(),
    };
    Delivery {
        batter: batter.into(),
        bowler: bowler.into(),
        non_striker: non_striker.into(),
        runs: Runs {
            batter: outcome.batter_runs(),
            extras: outcome.extras(),
            total: outcome.total(),
            non_boundary: false,
        },
        extras,
        ..Delivery::default()
    }
}

/// Works out the result from the innings played, `teams` being in batting order.
fn decide(format: Format, teams: [&String; 2], played: &[Played]) -> Outcome {
    let runs = |inning: usize| played.get(inning).map_or(0, |played| played.runs);
    let won = |side: usize, by: By| Outcome {
        winner: Some(teams[side].clone()),
        by: Some(by),
        ..Outcome::default()
    };
    let by_runs = |runs| By {
        runs: Some(runs),
        ..By::default()
    };
    let by_wickets = |played: &Played| By {
        wickets: Some(ALL_OUT - played.wickets),
        ..By::default()
    };
    let result = |result: &str| Outcome {
        result: Some(result.into()),
        ..Outcome::default()
    };

    match (format, played) {
        (Format::Test, [_, _, third]) if third.complete && runs(0) + runs(2) < runs(1) => won(
            1,
            By {
                innings: Some(1),
                runs: Some(runs(1) - runs(0) - runs(2)),
                ..By::default()
            },
        ),
        (Format::Test, [_, _, _, fourth]) => {
            let target = runs(0) + runs(2) - runs(1) + 1;
            if fourth.runs >= target {
                won(1, by_wickets(fourth))
            } else if !fourth.complete {
                result("draw")
            } else if fourth.runs + 1 == target {
                result("tie")
            } else {
                won(0, by_runs(target - 1 - fourth.runs))
            }
        }
        (Format::Test, _) => result("draw"),
        (_, [first, second]) => {
            if second.runs > first.runs {
                won(1, by_wickets(second))
            } else if first.runs > second.runs {
                won(0, by_runs(first.runs - second.runs))
            } else {
                result("tie")
            }
        }
        _ => result("no result"),
    }
}

#[cfg(test)]
mod tests;
