use stanza::style::HAlign::Left;
use stanza::style::{HAlign, Header, MinWidth, Separator, Styles};
use stanza::table::{Cell, Col, Row, Table};

use crate::game::Match;
use crate::inning::Inning;
use crate::listing::Listing;
use crate::mc::Tally;

const NAME_WIDTH: usize = 25;

fn name_col() -> Col {
    Col::new(Styles::default().with(MinWidth(NAME_WIDTH)).with(Left))
}

fn numeric_col(width: usize) -> Col {
    Col::new(Styles::default().with(MinWidth(width)).with(HAlign::Right))
}

fn header_row(cells: Vec<Cell>) -> Row {
    Row::new(Styles::default().with(Header(true)), cells)
}

fn total_cells(inning: &Inning) -> Vec<Cell> {
    vec![
        "Total".into(),
        "".into(),
        "".into(),
        inning.total_display().into(),
        inning.overs_str().into(),
        format!("RR: {:.2}", inning.run_rate()).into(),
        format!("Extras: {}", inning.extras()).into(),
    ]
}

pub fn tabulate_batting(inning: &Inning) -> Table {
    let mut table = Table::default()
        .with_cols(vec![
            name_col(),
            Col::new(Styles::default().with(MinWidth(30)).with(Left)),
            numeric_col(5),
            numeric_col(5),
            numeric_col(5),
            numeric_col(5),
            numeric_col(8),
        ])
        .with_row(header_row(vec![
            inning.title().into(),
            "".into(),
            "R".into(),
            "B".into(),
            "4s".into(),
            "6s".into(),
            "S/R".into(),
        ]));
    for batter in &inning.batters {
        table.push_row(Row::new(
            Styles::default(),
            vec![
                batter.long_name.clone().into(),
                batter.dismissal.clone().into(),
                batter.runs.to_string().into(),
                batter.balls.to_string().into(),
                batter.fours.to_string().into(),
                batter.sixes.to_string().into(),
                batter.strike_rate().into(),
            ],
        ));
    }
    table.push_row(Row::new(
        Styles::default().with(Separator(true)),
        total_cells(inning),
    ));
    table
}

pub fn tabulate_bowling(inning: &Inning) -> Table {
    let mut table = Table::default()
        .with_cols(vec![
            name_col(),
            numeric_col(5),
            numeric_col(5),
            numeric_col(5),
            numeric_col(5),
            numeric_col(8),
            numeric_col(8),
        ])
        .with_row(header_row(vec![
            inning.fielding_team.clone().into(),
            "O".into(),
            "M".into(),
            "R".into(),
            "W".into(),
            "Extras".into(),
            "Econ".into(),
        ]));
    for bowler in &inning.bowlers {
        table.push_row(Row::new(
            Styles::default(),
            vec![
                bowler.long_name.clone().into(),
                bowler.overs().into(),
                bowler.maidens.to_string().into(),
                bowler.runs.to_string().into(),
                bowler.wickets.to_string().into(),
                bowler.extras.to_string().into(),
                bowler.economy().into(),
            ],
        ));
    }
    table.push_row(Row::new(
        Styles::default().with(Separator(true)),
        total_cells(inning),
    ));
    table
}

pub fn tabulate_spells(inning: &Inning) -> Table {
    let mut table = Table::default()
        .with_cols(vec![
            name_col(),
            numeric_col(5),
            numeric_col(5),
            numeric_col(5),
            numeric_col(5),
            numeric_col(5),
        ])
        .with_row(header_row(vec![
            "Bowler".into(),
            "Spell".into(),
            "O".into(),
            "M".into(),
            "R".into(),
            "W".into(),
        ]));
    for bowler in &inning.bowlers {
        for (index, spell) in bowler.spells.iter().enumerate() {
            let name = if index == 0 { bowler.long_name.clone() } else { String::new() };
            table.push_row(Row::new(
                Styles::default(),
                vec![
                    name.into(),
                    (index + 1).to_string().into(),
                    spell.overs().into(),
                    spell.maidens.to_string().into(),
                    spell.runs.to_string().into(),
                    spell.wickets.to_string().into(),
                ],
            ));
        }
    }
    table
}

/// The ball-by-ball card: one row per over, with a column for each delivery.
pub fn tabulate_overs(inning: &Inning) -> Table {
    let deliveries = inning
        .overs
        .iter()
        .map(|over| over.len())
        .max()
        .unwrap_or(0)
        .max(6);
    let mut table = Table::default()
        .with_cols({
            let mut cols = vec![numeric_col(5), name_col()];
            for _ in 0..deliveries {
                cols.push(numeric_col(5));
            }
            cols.push(numeric_col(8));
            cols
        })
        .with_row(header_row({
            let mut header_cells = vec!["Over".into(), "Bowler".into()];
            for ball in 0..deliveries {
                header_cells.push((ball + 1).to_string().into());
            }
            header_cells.push("Score".into());
            header_cells
        }));
    for over in &inning.overs {
        let bowlers: Vec<_> = over
            .bowlers
            .iter()
            .map(|name| {
                inning
                    .bowler(name)
                    .map(|bowler| bowler.long_name.as_str())
                    .unwrap_or(name.as_str())
            })
            .collect();
        let mut row_cells = vec![(over.index + 1).to_string().into(), bowlers.join("/").into()];
        for ball in 0..deliveries {
            let value = over.balls.get(ball).map(|ball| ball.value.clone()).unwrap_or_default();
            row_cells.push(value.into());
        }
        row_cells.push(over.score().to_string().into());
        table.push_row(Row::new(Styles::default(), row_cells));
    }
    table
}

pub fn tabulate_fow(inning: &Inning) -> Table {
    let mut table = Table::default()
        .with_cols(vec![numeric_col(3), Col::new(Styles::default().with(MinWidth(40)).with(Left))])
        .with_row(header_row(vec!["".into(), "Fall of wickets".into()]));
    for (index, fall) in inning.fow.iter().enumerate() {
        table.push_row(Row::new(
            Styles::default(),
            vec![(index + 1).to_string().into(), fall.clone().into()],
        ));
    }
    table
}

pub fn tabulate_partnerships(inning: &Inning) -> Table {
    let mut table = Table::default()
        .with_cols(vec![numeric_col(3), Col::new(Styles::default().with(MinWidth(50)).with(Left))])
        .with_row(header_row(vec!["".into(), "Partnerships".into()]));
    for (index, partnership) in inning.partnerships().into_iter().enumerate() {
        table.push_row(Row::new(
            Styles::default(),
            vec![(index + 1).to_string().into(), partnership.into()],
        ));
    }
    table
}

pub fn tabulate_summary(scored: &Match, window: usize) -> Table {
    let mut table = Table::default()
        .with_cols(vec![
            Col::new(Styles::default().with(MinWidth(40)).with(Left)),
            Col::new(Styles::default().with(MinWidth(40)).with(Left)),
        ])
        .with_row(header_row(vec![scored.heading().into(), scored.dates.clone().into()]));
    for (left, right) in scored.summary(window) {
        table.push_row(Row::new(Styles::default(), vec![left.into(), right.into()]));
    }
    table.push_row(Row::new(
        Styles::default().with(Separator(true)),
        vec![scored.outcome.clone().into(), scored.toss.clone().into()],
    ));
    table
}

pub fn tabulate_tally(tally: &Tally, teams: &[String; 2]) -> Table {
    let mut table = Table::default()
        .with_cols(vec![name_col(), numeric_col(10), numeric_col(12)])
        .with_row(header_row(vec![
            "Outcome".into(),
            "Count".into(),
            "Probability".into(),
        ]));
    for (side, team) in teams.iter().enumerate() {
        table.push_row(Row::new(
            Styles::default(),
            vec![
                format!("{team} win").into(),
                tally.wins[side].to_string().into(),
                format!("{:.6}", tally.win_probability(side)).into(),
            ],
        ));
    }
    table.push_row(Row::new(
        Styles::default(),
        vec![
            "Tie".into(),
            tally.ties.to_string().into(),
            format!("{:.6}", tally.tie_probability()).into(),
        ],
    ));
    if tally.draws > 0 {
        table.push_row(Row::new(
            Styles::default(),
            vec![
                "Draw".into(),
                tally.draws.to_string().into(),
                format!("{:.6}", tally.draw_probability()).into(),
            ],
        ));
    }
    table.push_row(Row::new(
        Styles::default().with(Separator(true)),
        vec![
            "Mean 1st innings runs".into(),
            "".into(),
            format!("{:.2}", tally.first_innings_runs_mean()).into(),
        ],
    ));
    table
}

pub fn tabulate_listings(listings: &[&Listing]) -> Table {
    let mut table = Table::default()
        .with_cols(vec![
            numeric_col(10),
            Col::new(Styles::default().with(MinWidth(10))),
            Col::new(Styles::default().with(MinWidth(13))),
            Col::new(Styles::default().with(MinWidth(5))),
            name_col(),
            name_col(),
        ])
        .with_row(header_row(vec![
            "Match".into(),
            "Date".into(),
            "Team type".into(),
            "Type".into(),
            "Team 1".into(),
            "Team 2".into(),
        ]));
    for listing in listings {
        table.push_row(Row::new(
            Styles::default(),
            vec![
                listing.match_id.to_string().into(),
                listing.date.format("%Y-%m-%d").to_string().into(),
                listing.team_type.clone().into(),
                listing.match_type.clone().into(),
                listing.teams[0].clone().into(),
                listing.teams[1].clone().into(),
            ],
        ));
    }
    table
}
