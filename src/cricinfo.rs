//! Player metadata in the shape published by Cricinfo's match engine JSON. Only the fields that
//! enrich a Cricsheet scorecard are modelled: display names, playing styles and keeper flags.

use std::collections::BTreeMap;

use serde::de::Error;
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CricinfoData {
    #[serde(default)]
    pub team: Vec<TeamInfo>,
    #[serde(default)]
    pub substitute: Vec<PlayerInfo>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TeamInfo {
    pub team_name: String,
    #[serde(default)]
    pub player: Vec<PlayerInfo>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PlayerInfo {
    #[serde(default, deserialize_with = "lenient_id")]
    pub object_id: Option<u64>,
    pub known_as: String,
    pub card_long: String,
    #[serde(default)]
    pub card_short: Option<String>,
    pub mobile_name: String,
    #[serde(default)]
    pub batting_style: Option<String>,
    #[serde(default)]
    pub batting_style_long: Option<String>,
    #[serde(default)]
    pub bowling_pacespin: Option<String>,
    #[serde(default)]
    pub bowling_style: Option<String>,
    #[serde(default)]
    pub bowling_style_long: Option<String>,
    #[serde(default)]
    pub player_primary_role: Option<String>,
    #[serde(default, deserialize_with = "lenient_flag")]
    pub captain: bool,
    #[serde(default, deserialize_with = "lenient_flag")]
    pub keeper: bool,
}

/// Team name → (card name → player info).
pub type PlayersInfo = BTreeMap<String, BTreeMap<String, PlayerInfo>>;

impl CricinfoData {
    pub fn players_info(&self) -> PlayersInfo {
        self.team
            .iter()
            .map(|team| {
                (
                    team.team_name.clone(),
                    team.player
                        .iter()
                        .map(|player| (player.card_long.clone(), player.clone()))
                        .collect(),
                )
            })
            .collect()
    }

    pub fn substitute(&self, name: &str) -> Option<&PlayerInfo> {
        self.substitute.iter().find(|info| info.card_long == name)
    }

    pub fn keeper_names(&self) -> BTreeMap<String, Option<String>> {
        self.team
            .iter()
            .map(|team| {
                (
                    team.team_name.clone(),
                    team.player
                        .iter()
                        .find(|player| player.keeper)
                        .map(|player| player.card_long.clone()),
                )
            })
            .collect()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Lenient {
    Bool(bool),
    Number(u64),
    Text(String),
    Null,
}

fn lenient_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
    match Lenient::deserialize(deserializer)? {
        Lenient::Number(number) => Ok(Some(number)),
        Lenient::Text(text) if text.is_empty() => Ok(None),
        Lenient::Text(text) => text.parse().map(Some).map_err(D::Error::custom),
        Lenient::Null => Ok(None),
        Lenient::Bool(_) => Err(D::Error::custom("player ID cannot be a boolean")),
    }
}

fn lenient_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    match Lenient::deserialize(deserializer)? {
        Lenient::Bool(flag) => Ok(flag),
        Lenient::Number(number) => Ok(number != 0),
        Lenient::Text(text) => Ok(!text.is_empty() && text != "0"),
        Lenient::Null => Ok(false),
    }
}
