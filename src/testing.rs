//! Testing helpers.

use assert_float_eq::*;

use crate::cricinfo::CricinfoData;
use crate::cricsheet::{Delivery, FielderData, MatchData, OverData, Runs, WicketData};

const SAMPLE_MATCH: &str = include_str!("../resources/test/sample_t20.json");

const SAMPLE_CRICINFO: &str = r#"{
    "team": [
        {
            "team_name": "Alpha",
            "player": [
                { "object_id": 1, "known_as": "Abe Archer", "card_long": "AB Archer", "mobile_name": "Archer", "batting_style": "lhb" }
            ]
        },
        {
            "team_name": "Beta",
            "player": [
                { "object_id": 1001, "known_as": "Bob Mason", "card_long": "BB Mason", "mobile_name": "Mason", "keeper": 1 },
                { "object_id": 1002, "known_as": "Alan Lamb", "card_long": "AA Lamb", "mobile_name": "Lamb" }
            ]
        }
    ],
    "substitute": [
        { "object_id": 2001, "known_as": "Sam Sub", "card_long": "SS Sub", "mobile_name": "Sub" }
    ]
}"#;

/// A two-over-a-side T20 between Alpha and Beta.
pub fn sample_match_data() -> MatchData {
    SAMPLE_MATCH.parse().unwrap()
}

/// Player metadata for a few of the sample players, naming Beta's keeper and a substitute.
pub fn sample_cricinfo() -> CricinfoData {
    serde_json::from_str(SAMPLE_CRICINFO).unwrap()
}

pub fn delivery(batter: &str, bowler: &str, non_striker: &str, runs: u32) -> Delivery {
    Delivery {
        batter: batter.into(),
        bowler: bowler.into(),
        non_striker: non_striker.into(),
        runs: Runs {
            batter: runs,
            extras: 0,
            total: runs,
            non_boundary: false,
        },
        ..Delivery::default()
    }
}

pub fn wicket(player_out: &str, kind: &str, fielders: &[(&str, bool)]) -> WicketData {
    WicketData {
        player_out: player_out.into(),
        kind: kind.into(),
        fielders: fielders
            .iter()
            .map(|&(name, substitute)| FielderData {
                name: name.into(),
                substitute,
            })
            .collect(),
    }
}

pub fn over(over: u32, deliveries: Vec<Delivery>) -> OverData {
    OverData { over, deliveries }
}

pub fn assert_slice_f64_relative(expected: &[f64], actual: &[f64], epsilon: f64) {
    assert_eq!(
        expected.len(),
        actual.len(),
        "lengths do not match: {} ≠ {}",
        expected.len(),
        actual.len()
    );
    for (index, &expected) in expected.iter().enumerate() {
        let actual = actual[index];
        if actual != expected {
            assert_float_relative_eq!(expected, actual, epsilon);
        }
    }
}
