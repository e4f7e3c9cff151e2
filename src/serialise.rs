//! JSON encoding of scored matches, so that a scorecard can be stored and reloaded without
//! replaying its deliveries.

use crate::game::Match;

pub fn encode_match(scored: &Match) -> Result<String, serde_json::Error> {
    serde_json::to_string(scored)
}

pub fn encode_match_pretty(scored: &Match) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(scored)
}

pub fn decode_match(encoded: &str) -> Result<Match, serde_json::Error> {
    serde_json::from_str(encoded)
}
