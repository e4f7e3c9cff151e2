//! Per-inning statistics of the players in their batting, bowling and fielding roles.

use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::ball::{Ball, DismissalKind};
use crate::display::{overs_display, per_cent};
use crate::error::ScoringError;
use crate::roster::Player;

pub const NOT_OUT: &str = "not out";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Batter {
    pub name: String,
    pub long_name: String,
    pub short_name: String,
    pub style: Option<String>,
    /// Order in which the batter came to the crease.
    pub position: usize,
    /// Position on the team sheet.
    pub true_position: usize,
    pub runs: u32,
    pub balls: u32,
    pub fours: u32,
    pub sixes: u32,
    pub dismissal: String,
}
impl Batter {
    pub fn new(player: &Player, position: usize, true_position: usize) -> Self {
        Self {
            name: player.name.clone(),
            long_name: player.long_name.clone(),
            short_name: player.short_name.clone(),
            style: player.batting_style.clone(),
            position,
            true_position,
            runs: 0,
            balls: 0,
            fours: 0,
            sixes: 0,
            dismissal: NOT_OUT.into(),
        }
    }

    pub fn out(&self) -> bool {
        self.dismissal != NOT_OUT
    }

    pub fn score(&self) -> String {
        format!(
            "{}{} ({})",
            self.runs,
            if self.out() { "" } else { "*" },
            self.balls
        )
    }

    pub fn strike_rate(&self) -> String {
        format!("{:.2}", per_cent(self.runs, self.balls))
    }

    pub fn update(&mut self, ball: &Ball) {
        self.runs += ball.runs;
        if ball.wides == 0 {
            self.balls += 1;
        }
        if ball.boundary {
            match ball.runs {
                4 => self.fours += 1,
                6 => self.sixes += 1,
                _ => {}
            }
        }
    }

    /// Ranks batters by runs, then not-out ahead of out, then fewer balls faced. Batters
    /// yet to face are ranked by balls alone.
    pub fn ranking(&self, other: &Self) -> Ordering {
        if self.balls > 0 && other.balls > 0 {
            self.runs
                .cmp(&other.runs)
                .then_with(|| other.out().cmp(&self.out()))
                .then_with(|| other.balls.cmp(&self.balls))
        } else {
            self.balls.cmp(&other.balls)
        }
    }
}

impl Display for Batter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.short_name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spell {
    pub balls: u32,
    pub maidens: u32,
    pub runs: u32,
    pub wickets: u32,
}
impl Spell {
    pub fn overs(&self) -> String {
        overs_display(self.balls)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bowler {
    pub name: String,
    pub long_name: String,
    pub short_name: String,
    pub style: Option<String>,
    pub balls: u32,
    pub maidens: u32,
    pub runs: u32,
    pub wickets: u32,
    pub extras: u32,
    pub spells: Vec<Spell>,
}
impl Bowler {
    pub fn new(player: &Player) -> Self {
        Self {
            name: player.name.clone(),
            long_name: player.long_name.clone(),
            short_name: player.short_name.clone(),
            style: player.bowling_style.clone(),
            balls: 0,
            maidens: 0,
            runs: 0,
            wickets: 0,
            extras: 0,
            spells: vec![],
        }
    }

    pub fn overs(&self) -> String {
        overs_display(self.balls)
    }

    pub fn economy(&self) -> String {
        let economy = if self.balls == 0 {
            0.0
        } else {
            self.runs as f64 / (self.balls as f64 / 6.0)
        };
        format!("{economy:.2}")
    }

    pub fn score(&self) -> String {
        format!("{}-{} ({})", self.wickets, self.runs, self.overs())
    }

    pub fn start_spell(&mut self) {
        self.spells.push(Spell::default());
    }

    pub fn update(&mut self, ball: &Ball) {
        let legal = u32::from(ball.is_legal());
        let runs = ball.bowling_runs();
        let wickets = ball.bowling_wickets();
        self.balls += legal;
        self.runs += runs;
        self.wickets += wickets;
        self.extras += ball.bowling_extras();
        let spell = self.current_spell();
        spell.balls += legal;
        spell.runs += runs;
        spell.wickets += wickets;
    }

    pub fn credit_maiden(&mut self) {
        self.maidens += 1;
        self.current_spell().maidens += 1;
    }

    fn current_spell(&mut self) -> &mut Spell {
        if self.spells.is_empty() {
            self.start_spell();
        }
        let last = self.spells.len() - 1;
        &mut self.spells[last]
    }

    /// Ranks bowlers by wickets, then fewer runs conceded, then balls bowled. Bowlers yet to
    /// bowl rank below those that have.
    pub fn ranking(&self, other: &Self) -> Ordering {
        if self.balls > 0 && other.balls > 0 {
            self.wickets
                .cmp(&other.wickets)
                .then_with(|| other.runs.cmp(&self.runs))
                .then_with(|| self.balls.cmp(&other.balls))
        } else {
            self.balls.cmp(&other.balls)
        }
    }
}

impl Display for Bowler {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.short_name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fielder {
    pub name: String,
    pub long_name: String,
    pub short_name: String,
    pub keeper: bool,
    pub substitute: bool,
    pub catches: u32,
    pub stumpings: u32,
    pub run_outs: u32,
}
impl Fielder {
    pub fn new(player: &Player, keeper: bool, substitute: bool) -> Self {
        Self {
            name: player.name.clone(),
            long_name: player.long_name.clone(),
            short_name: player.short_name.clone(),
            keeper,
            substitute,
            catches: 0,
            stumpings: 0,
            run_outs: 0,
        }
    }

    pub fn update(&mut self, mode: DismissalKind) {
        match mode {
            DismissalKind::Caught | DismissalKind::CaughtAndBowled => self.catches += 1,
            DismissalKind::Stumped => self.stumpings += 1,
            DismissalKind::RunOut => self.run_outs += 1,
            _ => {}
        }
    }
}

impl Display for Fielder {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.substitute {
            write!(f, "sub ({})", self.short_name)
        } else if self.keeper {
            write!(f, "†{}", self.short_name)
        } else {
            write!(f, "{}", self.short_name)
        }
    }
}

/// Renders the scorecard description of a dismissal.
pub fn describe_dismissal(
    mode: DismissalKind,
    bowler: &Bowler,
    fielders: &[&Fielder],
) -> Result<String, ScoringError> {
    let first_fielder = || {
        fielders
            .first()
            .ok_or_else(|| ScoringError::MissingFielder(mode.to_string()))
    };
    let description = match mode {
        DismissalKind::Bowled => format!("b {bowler}"),
        DismissalKind::Lbw => format!("lbw b {bowler}"),
        DismissalKind::Caught => format!("c {} b {bowler}", first_fielder()?),
        DismissalKind::CaughtAndBowled => format!("c & b {bowler}"),
        DismissalKind::Stumped => format!("st {} b {bowler}", first_fielder()?),
        DismissalKind::RunOut if fielders.is_empty() => "run out".into(),
        DismissalKind::RunOut => {
            let names: Vec<_> = fielders.iter().map(ToString::to_string).collect();
            format!("run out ({})", names.join("/"))
        }
        DismissalKind::RetiredHurt | DismissalKind::RetiredNotOut => "retired hurt".into(),
        DismissalKind::HitWicket => format!("hit wicket b {bowler}"),
        DismissalKind::ObstructingTheField => "obstructing the field".into(),
        DismissalKind::TimedOut => "timed out".into(),
        DismissalKind::HandledTheBall => "handled the ball".into(),
    };
    Ok(description)
}
