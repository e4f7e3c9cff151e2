//! Rendering of overs, rates and dates.

use chrono::{Datelike, NaiveDate};

use crate::error::ScoringError;

/// Overs in the customary `O.B` form, omitting the balls of a completed over.
pub fn overs_display(balls: u32) -> String {
    match balls % 6 {
        0 => format!("{}", balls / 6),
        part => format!("{}.{part}", balls / 6),
    }
}

/// Overs as a decimal quantity, e.g. 2.2 overs is 2⅓.
pub fn overs_decimal(balls: u32) -> f64 {
    balls as f64 / 6.0
}

pub fn per_cent(numerator: u32, denominator: u32) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64 * 100.0
    }
}

pub fn parse_date(date: &str) -> Result<NaiveDate, ScoringError> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| ScoringError::MalformedDate(date.into()))
}

/// Renders the span of dates a match was played over, e.g. `"Jul 14-18 2023"`.
pub fn date_range(dates: &[String]) -> Result<String, ScoringError> {
    const FULL: &str = "%b %d %Y";
    let (first, last) = match dates {
        [] => return Ok(String::new()),
        [only] => return Ok(parse_date(only)?.format(FULL).to_string()),
        [first, .., last] => (parse_date(first)?, parse_date(last)?),
    };
    let range = if first.year() == last.year() && first.month() == last.month() {
        format!("{} {}-{} {}", first.format("%b"), first.day(), last.day(), first.year())
    } else if first.year() == last.year() {
        format!("{}-{} {}", first.format("%b %d"), last.format("%b %d"), first.year())
    } else {
        format!("{}-{}", first.format(FULL), last.format(FULL))
    };
    Ok(range)
}
