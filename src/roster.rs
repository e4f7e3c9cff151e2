//! Players, squads and the two playing XIs of a match.

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::cricinfo::{CricinfoData, PlayerInfo, PlayersInfo};
use crate::cricsheet::Info;
use crate::error::ScoringError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// The name Cricsheet refers to the player by. Unique within a match.
    pub name: String,
    pub long_name: String,
    pub short_name: String,
    pub id: Option<u64>,
    pub batting_style: Option<String>,
    pub bowling_style: Option<String>,
    pub team: String,
}
impl Player {
    pub fn from_info(info: &PlayerInfo, team: &str) -> Self {
        Self {
            name: info.card_long.clone(),
            long_name: info.known_as.clone(),
            short_name: info.mobile_name.clone(),
            id: info.object_id,
            batting_style: info.batting_style.clone(),
            bowling_style: info.bowling_style.clone(),
            team: team.into(),
        }
    }

    /// A player known only by their Cricsheet name.
    pub fn named(name: &str, team: &str) -> Self {
        Self {
            name: name.into(),
            long_name: name.into(),
            short_name: short_name(name),
            id: None,
            batting_style: None,
            bowling_style: None,
            team: team.into(),
        }
    }
}

impl PartialEq for Player {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Display for Player {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.short_name)
    }
}

/// Derives a scorecard name from a Cricsheet name by dropping the leading initials, e.g.
/// `"AB de Villiers"` becomes `"de Villiers"`. Names without initials keep their last word.
pub fn short_name(name: &str) -> String {
    let words: Vec<_> = name.split_whitespace().collect();
    let initials = words.iter().take_while(|word| is_initials(word)).count();
    match (initials, words.len()) {
        (_, 0) => String::new(),
        (initials, len) if initials > 0 && initials < len => words[initials..].join(" "),
        (_, len) => words[len - 1].to_string(),
    }
}

fn is_initials(word: &str) -> bool {
    word.len() <= 3 && word.chars().all(|c| c.is_ascii_uppercase())
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Squad {
    pub team: String,
    players: Vec<Player>,
}
impl Squad {
    pub fn new(team: impl Into<String>) -> Self {
        Self {
            team: team.into(),
            players: vec![],
        }
    }

    pub fn add_player(&mut self, player: Player) -> &Player {
        let index = match self.position(&player.name) {
            Some(index) => {
                self.players[index] = player;
                index
            }
            None => {
                self.players.push(player);
                self.players.len() - 1
            }
        };
        &self.players[index]
    }

    pub fn get(&self, name: &str) -> Option<&Player> {
        self.players.iter().find(|player| player.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Player> {
        self.players.iter()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Returns the names of the playing XI, adding any players not yet in the squad. Metadata
    /// from `info` is preferred; unseen players without metadata are derived from their names.
    pub fn playing(
        &mut self,
        names: &[String],
        info: Option<&BTreeMap<String, PlayerInfo>>,
    ) -> Vec<String> {
        for name in names {
            if !self.contains(name) {
                let player = match info.and_then(|info| info.get(name)) {
                    Some(player_info) => Player::from_info(player_info, &self.team),
                    None => Player::named(name, &self.team),
                };
                self.add_player(player);
            }
        }
        names.to_vec()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.players.iter().position(|player| player.name == name)
    }
}

impl Display for Squad {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.team)
    }
}

/// The squads, playing XIs and keepers of both teams.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Roster {
    pub teams: Vec<String>,
    pub squads: BTreeMap<String, Squad>,
    pub playing: BTreeMap<String, Vec<String>>,
    pub keepers: BTreeMap<String, Option<String>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    substitutes: Vec<PlayerInfo>,
}
impl Roster {
    pub fn from_sources(info: &Info, cricinfo: Option<&CricinfoData>) -> Self {
        let players_info: PlayersInfo = cricinfo.map(CricinfoData::players_info).unwrap_or_default();
        let keepers = cricinfo.map(CricinfoData::keeper_names).unwrap_or_default();
        let mut roster = Self {
            teams: info.teams.clone(),
            substitutes: cricinfo
                .map(|cricinfo| cricinfo.substitute.clone())
                .unwrap_or_default(),
            ..Self::default()
        };
        for team in &info.teams {
            let mut squad = Squad::new(team.as_str());
            let names = info.players.get(team).cloned().unwrap_or_default();
            let playing = squad.playing(&names, players_info.get(team));
            roster.squads.insert(team.clone(), squad);
            roster.playing.insert(team.clone(), playing);
            roster
                .keepers
                .insert(team.clone(), keepers.get(team).cloned().flatten());
        }
        roster
    }

    pub fn opponent(&self, team: &str) -> Result<&str, ScoringError> {
        match self.teams.iter().position(|candidate| candidate == team) {
            Some(index) if self.teams.len() == 2 => Ok(&self.teams[1 - index]),
            _ => Err(ScoringError::UnknownTeam(team.into())),
        }
    }

    pub fn squad(&self, team: &str) -> Result<&Squad, ScoringError> {
        self.squads
            .get(team)
            .ok_or_else(|| ScoringError::UnknownTeam(team.into()))
    }

    pub fn player(&self, team: &str, name: &str) -> Result<&Player, ScoringError> {
        self.squad(team)?
            .get(name)
            .ok_or_else(|| ScoringError::UnknownPlayer {
                team: team.into(),
                name: name.into(),
            })
    }

    /// The playing XI of a team, in batting-order of the team sheet.
    pub fn playing_xi(&self, team: &str) -> Result<Vec<&Player>, ScoringError> {
        let names = self
            .playing
            .get(team)
            .ok_or_else(|| ScoringError::UnknownTeam(team.into()))?;
        names.iter().map(|name| self.player(team, name)).collect()
    }

    /// Position of a player on the team sheet, if they are in the XI.
    pub fn sheet_position(&self, team: &str, name: &str) -> Option<usize> {
        self.playing
            .get(team)
            .and_then(|names| names.iter().position(|candidate| candidate == name))
    }

    pub fn keeper(&self, team: &str) -> Option<&str> {
        self.keepers.get(team).and_then(Option::as_deref)
    }

    /// Resolves a fielder, adding them to the squad as a substitute if they are not already in it.
    pub fn fielder(&mut self, team: &str, name: &str) -> Result<Player, ScoringError> {
        if let Ok(player) = self.player(team, name) {
            return Ok(player.clone());
        }
        let player = match self.substitutes.iter().find(|info| info.card_long == name) {
            Some(info) => Player::from_info(info, team),
            None => Player::named(name, team),
        };
        trace!("adding substitute {name} to {team}");
        let squad = self
            .squads
            .get_mut(team)
            .ok_or_else(|| ScoringError::UnknownTeam(team.into()))?;
        Ok(squad.add_player(player).clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;

    #[test]
    fn short_names() {
        assert_eq!("Root", short_name("JE Root"));
        assert_eq!("de Villiers", short_name("AB de Villiers"));
        assert_eq!("Rizwan", short_name("Mohammad Rizwan"));
        assert_eq!("Babar", short_name("Babar"));
        assert_eq!("", short_name(""));
    }

    #[test]
    fn squad_playing_adds_unseen() {
        let mut squad = Squad::new("Alpha");
        squad.add_player(Player::named("ZZ Reserve", "Alpha"));
        let names = vec!["AB Archer".to_string(), "ZZ Reserve".to_string()];
        let playing = squad.playing(&names, None);
        assert_eq!(names, playing);
        assert_eq!(2, squad.len());
        assert_eq!("Archer", squad.get("AB Archer").unwrap().short_name);
    }

    #[test]
    fn roster_from_sample() {
        let data = testing::sample_match_data();
        let roster = Roster::from_sources(&data.info, None);
        assert_eq!("Beta", roster.opponent("Alpha").unwrap());
        assert_eq!(
            ScoringError::UnknownTeam("Gamma".into()),
            roster.opponent("Gamma").unwrap_err()
        );
        assert_eq!(11, roster.playing_xi("Beta").unwrap().len());
        assert_eq!(Some(3), roster.sheet_position("Alpha", "GH Dixon"));
        assert_eq!(None, roster.keeper("Alpha"));
        assert_eq!(
            ScoringError::UnknownPlayer {
                team: "Alpha".into(),
                name: "XX Ghost".into()
            },
            roster.player("Alpha", "XX Ghost").unwrap_err()
        );
    }

    #[test]
    fn roster_with_cricinfo() {
        let data = testing::sample_match_data();
        let cricinfo = testing::sample_cricinfo();
        let mut roster = Roster::from_sources(&data.info, Some(&cricinfo));
        assert_eq!(Some("BB Mason"), roster.keeper("Beta"));
        assert_eq!("Bob Mason", roster.player("Beta", "BB Mason").unwrap().long_name);

        let substitute = roster.fielder("Beta", "SS Sub").unwrap();
        assert_eq!("Sub", substitute.short_name);
        assert_eq!(12, roster.squad("Beta").unwrap().len());
        assert_eq!(11, roster.playing_xi("Beta").unwrap().len());
    }
}
