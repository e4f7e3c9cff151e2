//! Replays the deliveries of an inning, building up the scorecard one ball at a time.

use std::fmt::{Display, Formatter};

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::ball::Ball;
use crate::cricsheet::{Delivery, InningData, OverData};
use crate::display::overs_decimal;
use crate::error::ScoringError;
use crate::over::{Over, BALLS_PER_OVER};
use crate::roles::{describe_dismissal, Batter, Bowler, Fielder, NOT_OUT};
use crate::roster::Roster;

#[cfg(test)]
mod tests;

const RETIRED_HURT: &str = "retired hurt";
const ABSENT_HURT: &str = "absent hurt";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub runs: u32,
    pub wickets: u32,
}

impl Display for Score {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.runs, self.wickets)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inning {
    pub index: usize,
    pub batting_team: String,
    pub fielding_team: String,
    pub super_over: bool,
    pub overs: Vec<Over>,
    pub batters: Vec<Batter>,
    pub bowlers: Vec<Bowler>,
    pub fielders: Vec<Fielder>,
    pub fow: Vec<String>,
    pub declared: bool,
    /// Partnerships that have ended, through a wicket or a retirement.
    pub completed_partnerships: Vec<String>,
    pub total: Score,
}
impl Inning {
    /// Scores an inning from its Cricsheet deliveries. Unknown fielders are added to the
    /// fielding squad as substitutes.
    pub fn replay(index: usize, data: &InningData, roster: &mut Roster) -> Result<Self, ScoringError> {
        let fielding_team = roster.opponent(&data.team)?.to_string();
        let keeper = roster.keeper(&fielding_team).map(String::from);
        let fielders = roster
            .playing_xi(&fielding_team)?
            .into_iter()
            .map(|player| Fielder::new(player, keeper.as_deref() == Some(player.name.as_str()), false))
            .collect();
        let inning = Self {
            index,
            batting_team: data.team.clone(),
            fielding_team,
            super_over: data.super_over,
            overs: vec![],
            batters: vec![],
            bowlers: vec![],
            fielders,
            fow: vec![],
            declared: false,
            completed_partnerships: vec![],
            total: Score::default(),
        };

        let mut replay = Replay {
            inning,
            roster,
            crease: vec![],
            partnership: Partnership::default(),
            batter_indexes: FxHashMap::default(),
            bowler_indexes: FxHashMap::default(),
        };
        let penalty_runs = data.penalty_runs.clone().unwrap_or_default();
        replay.inning.total.runs += penalty_runs.pre.unwrap_or(0);
        for over in &data.overs {
            replay.over(over)?;
        }
        replay.inning.declared = data.declared;
        for name in &data.absent_hurt {
            replay.absent_batter(name)?;
        }
        replay.inning.total.runs += penalty_runs.post.unwrap_or(0);
        trace!(
            "replayed {} innings: {}",
            replay.inning.batting_team,
            replay.inning.score()
        );
        Ok(replay.inning)
    }

    pub fn title(&self) -> String {
        if self.super_over {
            format!("{} Super Over", self.batting_team)
        } else {
            let ordinal = if self.index < 2 { "1st" } else { "2nd" };
            format!("{} {ordinal} Innings", self.batting_team)
        }
    }

    pub fn score(&self) -> String {
        format!("{}{}", self.total, if self.declared { "d" } else { "" })
    }

    /// The score as shown on a batting card: runs alone once the side is all out.
    pub fn total_display(&self) -> String {
        if self.total.wickets == 10 {
            self.total.runs.to_string()
        } else {
            self.score()
        }
    }

    pub fn legal_balls(&self) -> usize {
        self.overs.iter().map(Over::legal_balls).sum()
    }

    pub fn overs_str(&self) -> String {
        match self.overs.last() {
            None => "0 ov".into(),
            Some(last) => {
                let legal = last.legal_balls();
                if legal % BALLS_PER_OVER == 0 {
                    format!("{} ov", last.index + legal / BALLS_PER_OVER)
                } else {
                    format!("{}.{legal} ov", last.index)
                }
            }
        }
    }

    pub fn run_rate(&self) -> f64 {
        let overs = match self.overs.last() {
            None => 0.0,
            Some(last) => last.index as f64 + overs_decimal(last.legal_balls() as u32),
        };
        if overs == 0.0 {
            0.0
        } else {
            self.total.runs as f64 / overs
        }
    }

    pub fn extras(&self) -> u32 {
        let batter_runs: u32 = self.batters.iter().map(|batter| batter.runs).sum();
        self.total.runs.saturating_sub(batter_runs)
    }

    pub fn last_ball(&self) -> Option<&Ball> {
        self.overs.iter().rev().find_map(|over| over.balls.last())
    }

    /// Every partnership of the inning, including the current one.
    pub fn partnerships(&self) -> Vec<String> {
        let mut partnerships = self.completed_partnerships.clone();
        if let Some(ball) = self.last_ball() {
            if partnerships.last() != Some(&ball.partnership) {
                partnerships.push(ball.partnership.clone());
            }
        }
        partnerships
    }

    pub fn batter(&self, name: &str) -> Option<&Batter> {
        self.batters.iter().find(|batter| batter.name == name)
    }

    pub fn bowler(&self, name: &str) -> Option<&Bowler> {
        self.bowlers.iter().find(|bowler| bowler.name == name)
    }

    pub fn fielder(&self, name: &str) -> Option<&Fielder> {
        self.fielders.iter().find(|fielder| fielder.name == name)
    }

    /// The top `n` batters as (long name, score) pairs.
    pub fn best_batters(&self, n: usize) -> Vec<(String, String)> {
        let mut batters: Vec<_> = self.batters.iter().collect();
        batters.sort_by(|a, b| b.ranking(a));
        batters
            .into_iter()
            .take(n)
            .map(|batter| (batter.long_name.clone(), batter.score()))
            .collect()
    }

    /// The top `n` bowlers as (long name, score) pairs.
    pub fn best_bowlers(&self, n: usize) -> Vec<(String, String)> {
        let mut bowlers: Vec<_> = self.bowlers.iter().collect();
        bowlers.sort_by(|a, b| b.ranking(a));
        bowlers
            .into_iter()
            .take(n)
            .map(|bowler| (bowler.long_name.clone(), bowler.score()))
            .collect()
    }
}

/// Runs and balls of the current partnership, split by crease position.
#[derive(Debug, Default)]
struct Partnership {
    shares: [(u32, u32); 2],
    runs: u32,
    balls: u32,
}

struct Replay<'a> {
    inning: Inning,
    roster: &'a mut Roster,
    /// Indexes of the batters at the crease, in order of arrival.
    crease: Vec<usize>,
    partnership: Partnership,
    /// Positions in the batting and bowling cards, by player name.
    batter_indexes: FxHashMap<String, usize>,
    bowler_indexes: FxHashMap<String, usize>,
}
impl<'a> Replay<'a> {
    fn over(&mut self, data: &OverData) -> Result<(), ScoringError> {
        let index = self.inning.overs.len();
        let start_score = self.inning.score();
        self.inning.overs.push(Over::new(index, start_score));
        for delivery in &data.deliveries {
            self.delivery(index, delivery)?;
        }
        self.credit_maiden();
        Ok(())
    }

    fn delivery(&mut self, over_index: usize, delivery: &Delivery) -> Result<(), ScoringError> {
        let bowler = self.bowler(&delivery.bowler)?;
        let striker = self.batter(&delivery.batter)?;
        let non_striker = self.batter(&delivery.non_striker)?;
        let over = self.current_over()?;
        let (index, abs_index) = (over.len(), over.legal_balls());

        let mut ball = Ball::from_delivery(
            delivery,
            over_index,
            index,
            abs_index,
            self.inning.batters[striker].clone(),
            self.inning.batters[non_striker].clone(),
            self.inning.bowlers[bowler].clone(),
        )?;
        self.inning.batters[striker].update(&ball);
        self.inning.bowlers[bowler].update(&ball);
        self.score_ball(&ball, striker)?;
        ball.score = self.inning.score();
        ball.partnership = self.render_partnership(ball.wickets() == 0);

        if !ball.dismissals.is_empty() {
            self.dismiss(&ball, bowler)?;
        }

        ball.batter = self.inning.batters[striker].clone();
        ball.non_striker = self.inning.batters[non_striker].clone();
        ball.bowler = self.inning.bowlers[bowler].clone();
        self.current_over()?.balls.push(ball);
        Ok(())
    }

    fn current_over(&mut self) -> Result<&mut Over, ScoringError> {
        self.inning.overs.last_mut().ok_or(ScoringError::NoOver)
    }

    /// Resolves the bowler of a delivery, opening a new spell unless they are continuing from
    /// the same end as two overs ago.
    fn bowler(&mut self, name: &str) -> Result<usize, ScoringError> {
        let index = match self.bowler_indexes.get(name).copied() {
            Some(index) => index,
            None => {
                let player = self.roster.player(&self.inning.fielding_team, name)?;
                self.inning.bowlers.push(Bowler::new(player));
                let index = self.inning.bowlers.len() - 1;
                self.bowler_indexes.insert(name.into(), index);
                index
            }
        };

        let overs = &self.inning.overs;
        let continuing =
            overs.len() >= 3 && overs[overs.len() - 3].last_bowler() == Some(name);
        let over = self.inning.overs.last_mut().ok_or(ScoringError::NoOver)?;
        if !over.bowlers.iter().any(|bowler| bowler == name) {
            if !over.bowlers.is_empty() || !continuing {
                self.inning.bowlers[index].start_spell();
            }
            over.bowlers.push(name.into());
        }
        Ok(index)
    }

    /// Resolves a batter, bringing them to the crease if they are new or returning from
    /// retirement.
    fn batter(&mut self, name: &str) -> Result<usize, ScoringError> {
        match self.batter_indexes.get(name).copied() {
            Some(index) => {
                let batter = &mut self.inning.batters[index];
                if batter.dismissal == RETIRED_HURT {
                    trace!("{name} resumes their innings");
                    batter.dismissal = NOT_OUT.into();
                    self.crease.push(index);
                }
                Ok(index)
            }
            None => {
                let index = self.new_batter(name)?;
                self.crease.push(index);
                Ok(index)
            }
        }
    }

    fn absent_batter(&mut self, name: &str) -> Result<(), ScoringError> {
        if !self.batter_indexes.contains_key(name) {
            let index = self.new_batter(name)?;
            self.inning.batters[index].dismissal = ABSENT_HURT.into();
        }
        Ok(())
    }

    fn new_batter(&mut self, name: &str) -> Result<usize, ScoringError> {
        let team = &self.inning.batting_team;
        let player = self.roster.player(team, name)?;
        let position = self.inning.batters.len();
        let true_position = self.roster.sheet_position(team, name).unwrap_or(position);
        self.inning
            .batters
            .push(Batter::new(player, position, true_position));
        self.batter_indexes.insert(name.into(), position);
        Ok(position)
    }

    fn fielder(&mut self, name: &str, substitute: bool) -> Result<usize, ScoringError> {
        if let Some(index) = self.inning.fielders.iter().position(|fielder| fielder.name == name) {
            return Ok(index);
        }
        let team = &self.inning.fielding_team;
        let player = self.roster.fielder(team, name)?;
        let keeper = self.roster.keeper(team) == Some(name);
        self.inning
            .fielders
            .push(Fielder::new(&player, keeper, substitute));
        Ok(self.inning.fielders.len() - 1)
    }

    fn score_ball(&mut self, ball: &Ball, striker: usize) -> Result<(), ScoringError> {
        let position = self
            .crease
            .iter()
            .position(|&index| index == striker)
            .ok_or_else(|| ScoringError::NotAtCrease(self.inning.batters[striker].name.clone()))?;
        let faced = u32::from(ball.wides == 0);
        if let Some((runs, balls)) = self.partnership.shares.get_mut(position) {
            *runs += ball.runs;
            *balls += faced;
        }
        self.partnership.runs += ball.batting_runs;
        self.partnership.balls += faced;
        self.inning.total.runs += ball.batting_runs;
        self.inning.total.wickets += ball.wickets();
        Ok(())
    }

    fn render_partnership(&self, unbroken: bool) -> String {
        let name = |position: usize| {
            self.crease
                .get(position)
                .map(|&index| self.inning.batters[index].short_name.as_str())
                .unwrap_or_default()
        };
        let partnership = &self.partnership;
        let [(runs_1, balls_1), (runs_2, balls_2)] = partnership.shares;
        format!(
            "{}{} ({}) ({} {runs_1} ({balls_1}), {} {runs_2} ({balls_2}))",
            partnership.runs,
            if unbroken { "*" } else { "" },
            partnership.balls,
            name(0),
            name(1)
        )
    }

    fn dismiss(&mut self, ball: &Ball, bowler: usize) -> Result<(), ScoringError> {
        for wicket in &ball.dismissals {
            let out = self.batter(&wicket.batter)?;
            let fielders = wicket
                .fielders
                .iter()
                .map(|(name, substitute)| self.fielder(name, *substitute))
                .collect::<Result<Vec<_>, _>>()?;

            let description = {
                let fielders: Vec<_> = fielders.iter().map(|&index| &self.inning.fielders[index]).collect();
                describe_dismissal(wicket.mode, &self.inning.bowlers[bowler], &fielders)?
            };
            self.inning.batters[out].dismissal = description;
            for &index in &fielders {
                self.inning.fielders[index].update(wicket.mode);
            }

            let retired = wicket.mode.is_retirement();
            let partnership = self.render_partnership(retired);
            self.inning.completed_partnerships.push(partnership);
            self.crease.retain(|&index| index != out);
            self.partnership = Partnership::default();

            if !retired {
                self.inning.fow.push(format!(
                    "{} ({}, {} ov)",
                    ball.score, self.inning.batters[out].long_name, ball.index_str
                ));
            }
        }
        Ok(())
    }

    /// Maidens are credited once the over is complete.
    fn credit_maiden(&mut self) {
        let Some(over) = self.inning.overs.last_mut() else {
            return;
        };
        if !over.maiden() {
            return;
        }
        let Some(name) = over.last_bowler() else {
            return;
        };
        if let Some(bowler) = self.inning.bowlers.iter_mut().find(|bowler| bowler.name == name) {
            bowler.credit_maiden();
            if let Some(ball) = over.balls.last_mut() {
                ball.bowler = bowler.clone();
            }
        }
    }
}
