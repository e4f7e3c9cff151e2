//! Typed model of the [Cricsheet](https://cricsheet.org/format/json/) JSON match format.
//!
//! Everything Cricsheet publishes is represented, including fields the scorer does not currently
//! consume (officials, reviews, replacements), so that a [MatchData] can be written back out
//! without loss.

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::file;
use crate::file::{LoadError, ReadJsonFile};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchData {
    pub meta: Meta,
    pub info: Info,
    #[serde(default)]
    pub innings: Vec<InningData>,
}

impl FromStr for MatchData {
    type Err = serde_json::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Meta {
    pub data_version: String,
    pub created: String,
    pub revision: u32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Info {
    #[serde(default = "default_balls_per_over")]
    pub balls_per_over: u8,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bowl_out: Vec<BowlOut>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    pub dates: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<Event>,
    #[serde(default)]
    pub gender: String,
    pub match_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_type_number: Option<u32>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub missing: BTreeMap<String, serde_json::Value>,
    #[serde(default, skip_serializing_if = "Officials::is_empty")]
    pub officials: Officials,
    #[serde(default)]
    pub outcome: Outcome,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overs: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub player_of_match: Vec<String>,
    pub players: BTreeMap<String, Vec<String>>,
    #[serde(default, skip_serializing_if = "Registry::is_empty")]
    pub registry: Registry,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season: Option<Label>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub supersubs: BTreeMap<String, String>,
    #[serde(default)]
    pub team_type: String,
    pub teams: Vec<String>,
    pub toss: Toss,
    #[serde(default)]
    pub venue: String,
}

fn default_balls_per_over() -> u8 {
    6
}

/// A value that Cricsheet encodes as either a number or a string, e.g. a group `"A"` or `1`, or
/// a season `2023` or `"2022/23"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Label {
    Number(u64),
    Text(String),
}

impl Display for Label {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Label::Number(number) => write!(f, "{number}"),
            Label::Text(text) => write!(f, "{text}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BowlOut {
    pub bowler: String,
    pub outcome: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Event {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_number: Option<Label>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<Label>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Officials {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub match_referees: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reserve_umpires: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tv_umpires: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub umpires: Vec<String>,
}
impl Officials {
    pub fn is_empty(&self) -> bool {
        self.match_referees.is_empty()
            && self.reserve_umpires.is_empty()
            && self.tv_umpires.is_empty()
            && self.umpires.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Outcome {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub by: Option<By>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eliminator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bowl_out: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct By {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub innings: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runs: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wickets: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Registry {
    #[serde(default)]
    pub people: BTreeMap<String, String>,
}
impl Registry {
    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Toss {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uncontested: Option<bool>,
    pub decision: String,
    pub winner: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InningData {
    pub team: String,
    #[serde(default)]
    pub overs: Vec<OverData>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub absent_hurt: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub penalty_runs: Option<PenaltyRuns>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub declared: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub forfeited: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub powerplays: Vec<Powerplay>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub miscounted_overs: BTreeMap<String, MiscountedOver>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<Target>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub super_over: bool,
}

fn is_false(flag: &bool) -> bool {
    !*flag
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PenaltyRuns {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pre: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Powerplay {
    pub from: f64,
    pub to: f64,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MiscountedOver {
    pub balls: u32,
    pub umpire: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overs: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runs: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OverData {
    pub over: u32,
    pub deliveries: Vec<Delivery>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Delivery {
    pub batter: String,
    pub bowler: String,
    pub non_striker: String,
    pub runs: Runs,
    #[serde(default, skip_serializing_if = "Extras::is_empty")]
    pub extras: Extras,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub wickets: Vec<WicketData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replacements: Option<Replacements>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review: Option<Review>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Runs {
    pub batter: u32,
    pub extras: u32,
    pub total: u32,
    #[serde(default, skip_serializing_if = "is_false")]
    pub non_boundary: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Extras {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub byes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legbyes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub noballs: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub penalty: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wides: Option<u32>,
}
impl Extras {
    pub fn is_empty(&self) -> bool {
        self.byes.is_none()
            && self.legbyes.is_none()
            && self.noballs.is_none()
            && self.penalty.is_none()
            && self.wides.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WicketData {
    pub player_out: String,
    pub kind: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fielders: Vec<FielderData>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FielderData {
    pub name: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub substitute: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Replacements {
    #[serde(default, rename = "match", skip_serializing_if = "Vec::is_empty")]
    pub in_match: Vec<MatchReplacement>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub role: Vec<RoleReplacement>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchReplacement {
    #[serde(rename = "in")]
    pub player_in: String,
    #[serde(rename = "out")]
    pub player_out: String,
    pub reason: String,
    pub team: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleReplacement {
    #[serde(default, rename = "in", skip_serializing_if = "Option::is_none")]
    pub player_in: Option<String>,
    #[serde(default, rename = "out", skip_serializing_if = "Option::is_none")]
    pub player_out: Option<String>,
    pub reason: String,
    pub role: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batter: Option<String>,
    pub by: String,
    pub decision: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub umpire: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub umpires_call: Option<bool>,
}

/// Reads a single Cricsheet match file.
pub fn read_match(path: impl AsRef<Path>) -> Result<MatchData, LoadError> {
    MatchData::read_json_file(path)
}

#[derive(Debug)]
pub enum Predicate {
    MatchType { match_type: String },
    TeamType { team_type: String },
    Team { team: String },
}
impl Predicate {
    pub fn closure(self) -> impl FnMut(&MatchData) -> bool {
        move |data| match &self {
            Predicate::MatchType { match_type } => &data.info.match_type == match_type,
            Predicate::TeamType { team_type } => &data.info.team_type == team_type,
            Predicate::Team { team } => data.info.teams.contains(team),
        }
    }
}

pub type PredicateClosure = Box<dyn FnMut(&MatchData) -> bool>;

pub struct PredicateClosures {
    closures: Vec<PredicateClosure>,
}

impl<P: Into<PredicateClosure>> From<Vec<P>> for PredicateClosures {
    fn from(closurelikes: Vec<P>) -> Self {
        Self {
            closures: closurelikes.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<PredicateClosures> for PredicateClosure {
    fn from(mut predicates: PredicateClosures) -> Self {
        Box::new(move |data| predicates.closures.iter_mut().all(|closure| closure(data)))
    }
}

impl From<Predicate> for PredicateClosure {
    fn from(predicate: Predicate) -> Self {
        Box::new(predicate.closure())
    }
}

#[derive(Debug)]
pub struct MatchFile {
    pub data: MatchData,
    pub file: PathBuf,
}

/// Loads every `.json` match beneath `path` that satisfies the given predicate.
pub fn read_from_dir(
    path: impl AsRef<Path>,
    closurelike: impl Into<PredicateClosure>,
) -> Result<Vec<MatchFile>, LoadError> {
    let mut files = vec![];
    file::recurse_dir(path.as_ref().into(), &mut files, &mut |ext| ext == "json")?;
    let mut matches = Vec::with_capacity(files.len());
    let mut closure = closurelike.into();
    for file in files {
        let data = read_match(&file)?;
        if closure(&data) {
            matches.push(MatchFile { data, file });
        }
    }
    Ok(matches)
}
