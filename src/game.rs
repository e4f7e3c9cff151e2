//! A complete match: its setting, the two rosters and every inning, scored ball by ball.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cricinfo::CricinfoData;
use crate::cricsheet::{Event, MatchData, Outcome, Toss};
use crate::display::date_range;
use crate::error::ScoringError;
use crate::inning::Inning;
use crate::roster::Roster;

pub const SUMMARY_WINDOW: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub index: u64,
    pub team_type: String,
    pub format: String,
    pub venue: String,
    pub dates: String,
    pub event: String,
    pub teams: Vec<String>,
    pub roster: Roster,
    pub toss: String,
    pub outcome: String,
    pub innings: Vec<Inning>,
}
impl Match {
    /// Replays every inning of a Cricsheet match, enriching players with Cricinfo metadata
    /// where it is available.
    pub fn score(
        index: u64,
        data: &MatchData,
        cricinfo: Option<&CricinfoData>,
    ) -> Result<Self, ScoringError> {
        let info = &data.info;
        let mut roster = Roster::from_sources(info, cricinfo);
        let innings = data
            .innings
            .iter()
            .enumerate()
            .map(|(inning_index, inning)| Inning::replay(inning_index, inning, &mut roster))
            .collect::<Result<Vec<_>, _>>()?;
        let scored = Self {
            index,
            team_type: info.team_type.clone(),
            format: info.match_type.clone(),
            venue: info.venue.clone(),
            dates: date_range(&info.dates)?,
            event: event_str(info.event.as_ref()),
            teams: info.teams.clone(),
            roster,
            toss: toss_str(&info.toss),
            outcome: outcome_str(&info.outcome),
            innings,
        };
        debug!("scored {}", scored.description());
        Ok(scored)
    }

    pub fn description(&self) -> String {
        format!(
            "{}: {} at {}, {}",
            self.event,
            self.teams.join(" vs "),
            self.venue,
            self.dates
        )
    }

    pub fn heading(&self) -> String {
        self.teams.join(" vs ")
    }

    /// The customary match summary: each inning's total followed by its leading batters and
    /// bowlers, side by side. Fewer performers are listed as more innings are played.
    pub fn summary(&self, window: usize) -> Vec<(String, String)> {
        let rows = window.saturating_sub(self.innings.len());
        let mut summary = vec![];
        for inning in &self.innings {
            summary.push((String::new(), String::new()));
            summary.push((
                inning.title(),
                format!("{:>40}", format!("{} ({})", inning.total_display(), inning.overs_str())),
            ));
            let batters = inning.best_batters(rows);
            let bowlers = inning.best_bowlers(rows);
            for row in 0..batters.len().max(bowlers.len()) {
                let cell = |performers: &[(String, String)]| {
                    performers
                        .get(row)
                        .map(|(name, score)| format!("{name:25}{score:>15}"))
                        .unwrap_or_default()
                };
                summary.push((cell(&batters), cell(&bowlers)));
            }
        }
        summary
    }
}

pub fn event_str(event: Option<&Event>) -> String {
    let Some(event) = event else {
        return String::new();
    };
    let mut rendered = event.name.clone();
    if let Some(sub_name) = &event.sub_name {
        rendered.push_str(&format!(", {sub_name}"));
    }
    if let Some(stage) = &event.stage {
        rendered.push_str(&format!(" {stage}"));
    }
    if let Some(group) = &event.group {
        rendered.push_str(&format!(" Group {group}"));
    }
    if let Some(match_number) = &event.match_number {
        rendered.push_str(&format!(" Match {match_number}"));
    }
    rendered
}

pub fn toss_str(toss: &Toss) -> String {
    format!("{} won the toss and chose to {}", toss.winner, toss.decision)
}

fn plural(count: u32, unit: &str) -> String {
    if count == 1 {
        format!("{count} {unit}")
    } else {
        format!("{count} {unit}s")
    }
}

pub fn outcome_str(outcome: &Outcome) -> String {
    let mut rendered = match (&outcome.winner, outcome.result.as_deref()) {
        (Some(winner), _) => match &outcome.by {
            Some(by) if by.innings.is_some() => {
                format!("{winner} won by an innings and {}", plural(by.runs.unwrap_or(0), "run"))
            }
            Some(by) if by.runs.is_some() => {
                format!("{winner} won by {}", plural(by.runs.unwrap_or(0), "run"))
            }
            Some(by) if by.wickets.is_some() => {
                format!("{winner} won by {}", plural(by.wickets.unwrap_or(0), "wicket"))
            }
            _ => format!("{winner} won"),
        },
        (None, Some("tie")) => "Match tied".into(),
        (None, Some("draw")) => "Match drawn".into(),
        (None, Some("no result")) => "No result".into(),
        (None, Some(result)) => result.into(),
        (None, None) => String::new(),
    };
    if let Some(eliminator) = &outcome.eliminator {
        rendered.push_str(&format!(" ({eliminator} won the eliminator)"));
    }
    if let Some(bowl_out) = &outcome.bowl_out {
        rendered.push_str(&format!(" ({bowl_out} won the bowl-out)"));
    }
    if let Some(method) = &outcome.method {
        rendered.push_str(&format!(" ({method})"));
    }
    rendered
}
