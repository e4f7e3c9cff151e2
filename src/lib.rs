//! Ball-by-ball cricket scoring from Cricsheet data. Replays each delivery of a match to build
//! batting and bowling cards, partnerships, fall of wickets and match summaries. Also simulates
//! fictitious matches from context-weighted outcome probabilities, scoring them the same way.

#![allow(clippy::too_many_arguments)]

pub mod ball;
pub mod cricinfo;
pub mod cricsheet;
pub mod csv;
pub mod display;
pub mod download;
pub mod error;
pub mod file;
pub mod game;
pub mod inning;
pub mod listing;
pub mod mc;
pub mod over;
pub mod print;
pub mod register;
pub mod roles;
pub mod roster;
pub mod serialise;
pub mod sim;

#[cfg(test)]
pub(crate) mod testing;

#[doc = include_str!("../README.md")]
#[cfg(doc)]
fn readme() {}
