//! The master list of matches available from Cricsheet, assembled from the README that
//! accompanies each archive, and filters for selecting matches from it.

use std::fmt::{Display, Formatter};
use std::fs;
use std::path::Path;
use std::str::FromStr;

use chrono::{Local, NaiveDate};
use strum::IntoEnumIterator;
use thiserror::Error;
use tracing::debug;

use crate::csv::{CsvReader, CsvWriter};
use crate::download::Archive;
use crate::file::LoadError;

pub const TEAM_TYPES: [&str; 2] = ["international", "club"];
pub const MATCH_FORMATS: [&str; 3] = ["Test", "ODI", "T20"];
pub const CLUB_COMPETITIONS: [&str; 2] = ["IPL", "HND"];
pub const TEST_NATIONS: [&str; 9] = [
    "England",
    "Australia",
    "South Africa",
    "West Indies",
    "New Zealand",
    "India",
    "Pakistan",
    "Sri Lanka",
    "Bangladesh",
];

pub const MASTER_LIST: &str = "MASTER_README.csv";
const COLUMNS: [&str; 7] = [
    "match id",
    "date",
    "team type",
    "match type",
    "gender",
    "team 1",
    "team 2",
];

/// All match types: the international formats followed by the club competitions.
pub fn match_types() -> Vec<&'static str> {
    MATCH_FORMATS.iter().chain(CLUB_COMPETITIONS.iter()).copied().collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    pub match_id: u64,
    pub date: NaiveDate,
    pub team_type: String,
    pub match_type: String,
    pub gender: String,
    pub teams: [String; 2],
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("not a listing: '{0}'")]
pub struct ParseListingError(String);

/// Parses a README line of the form
/// `2023-07-14 - international - T20 - male - 1389389 - England vs Australia`.
impl FromStr for Listing {
    type Err = ParseListingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseListingError(s.into());
        let parts: Vec<_> = s.trim_end().split(" - ").collect();
        let &[date, team_type, match_type, gender, match_id, teams] = parts.as_slice() else {
            return Err(err());
        };
        let (team_1, team_2) = teams.split_once(" vs ").ok_or_else(err)?;
        Ok(Self {
            match_id: match_id.parse().map_err(|_| err())?,
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| err())?,
            team_type: team_type.into(),
            match_type: match_type.into(),
            gender: gender.into(),
            teams: [team_1.into(), team_2.into()],
        })
    }
}

impl Display for Listing {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} - {} - {} - {} - {} - {} vs {}",
            self.date.format("%Y-%m-%d"),
            self.team_type,
            self.match_type,
            self.gender,
            self.match_id,
            self.teams[0],
            self.teams[1]
        )
    }
}

/// Extracts the listings from the contents of an archive README. Listings are read from the
/// bottom up, stopping at the first line that is not a listing.
pub fn parse_readme(contents: &str) -> Vec<Listing> {
    contents
        .lines()
        .rev()
        .map_while(|line| line.parse().ok())
        .collect()
}

pub fn read_readme(path: impl AsRef<Path>) -> Result<Vec<Listing>, LoadError> {
    Ok(parse_readme(&fs::read_to_string(path)?))
}

/// Gathers the listings from the README of every archive extracted into `dir`. Archives whose
/// README is absent are skipped.
pub fn build_master_list(dir: impl AsRef<Path>) -> Result<Vec<Listing>, LoadError> {
    let mut listings = vec![];
    for archive in Archive::iter() {
        let readme = dir.as_ref().join(archive.readme_name());
        if !readme.exists() {
            debug!("no {} in {}", archive.readme_name(), dir.as_ref().display());
            continue;
        }
        let found = read_readme(&readme)?;
        debug!("{} lists {} matches", readme.display(), found.len());
        listings.extend(found);
    }
    Ok(listings)
}

/// Writes the master list, most recent matches first.
pub fn write_master_list(path: impl AsRef<Path>, listings: &[Listing]) -> Result<(), LoadError> {
    let mut sorted: Vec<_> = listings.iter().collect();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));
    let mut writer = CsvWriter::create(path)?;
    writer.append(COLUMNS)?;
    for listing in sorted {
        writer.append([
            listing.match_id.to_string(),
            listing.date.format("%Y-%m-%d").to_string(),
            listing.team_type.clone(),
            listing.match_type.clone(),
            listing.gender.clone(),
            listing.teams[0].clone(),
            listing.teams[1].clone(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

pub fn read_master_list(path: impl AsRef<Path>) -> Result<Vec<Listing>, LoadError> {
    let mut reader = CsvReader::open(path)?;
    let header = match reader.read() {
        None => return Ok(vec![]),
        Some(header) => header?,
    };
    let columns = COLUMNS
        .iter()
        .map(|&column| {
            header
                .iter()
                .position(|label| label == column)
                .ok_or_else(|| LoadError::MissingColumn(column.into()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut listings = vec![];
    for (index, record) in reader.enumerate() {
        let record = record?;
        let malformed = || LoadError::MalformedLine {
            line: index + 2,
            content: record.join(","),
        };
        let field = |column: usize| record.get(columns[column]).cloned().ok_or_else(malformed);
        listings.push(Listing {
            match_id: field(0)?.parse().map_err(|_| malformed())?,
            date: NaiveDate::parse_from_str(&field(1)?, "%Y-%m-%d").map_err(|_| malformed())?,
            team_type: field(2)?,
            match_type: field(3)?,
            gender: field(4)?,
            teams: [field(5)?, field(6)?],
        });
    }
    Ok(listings)
}

/// Selects matches by team type, match type, date and the teams involved.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub team_types: Vec<String>,
    pub match_types: Vec<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Both teams must belong to this set, if specified.
    pub teams_superset: Option<Vec<String>>,
    /// At least one team must belong to this set, if specified.
    pub teams_subset: Option<Vec<String>>,
}
impl Default for Filter {
    fn default() -> Self {
        Self {
            team_types: to_strings(&TEAM_TYPES),
            match_types: to_strings(&match_types()),
            start_date: NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or_default(),
            end_date: Local::now().date_naive(),
            teams_superset: None,
            teams_subset: None,
        }
    }
}
impl Filter {
    /// Internationals in the three formats between the Test-playing nations.
    pub fn international() -> Self {
        Self {
            team_types: to_strings(&TEAM_TYPES[..1]),
            match_types: to_strings(&MATCH_FORMATS),
            teams_superset: Some(to_strings(&TEST_NATIONS)),
            ..Self::default()
        }
    }

    pub fn matches(&self, listing: &Listing) -> bool {
        let in_set = |set: &Vec<String>, team: &String| set.contains(team);
        self.start_date <= listing.date
            && listing.date <= self.end_date
            && self.team_types.contains(&listing.team_type)
            && self.match_types.contains(&listing.match_type)
            && self
                .teams_superset
                .as_ref()
                .map_or(true, |set| listing.teams.iter().all(|team| in_set(set, team)))
            && self
                .teams_subset
                .as_ref()
                .map_or(true, |set| listing.teams.iter().any(|team| in_set(set, team)))
    }

    pub fn apply<'a>(&self, listings: &'a [Listing]) -> Vec<&'a Listing> {
        listings.iter().filter(|listing| self.matches(listing)).collect()
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|&item| item.into()).collect()
}
