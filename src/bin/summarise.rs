use std::env;
use std::error::Error;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::anyhow;
use clap::Parser;
use tracing::{debug, info, warn};

use googly::cricsheet;
use googly::cricsheet::{Predicate, PredicateClosures};
use googly::csv::CsvWriter;
use googly::file::match_id;
use googly::game::Match;

const COLUMNS: [&str; 8] = [
    "match id",
    "match type",
    "team 1",
    "team 2",
    "innings",
    "first innings",
    "second innings",
    "outcome",
];

#[derive(Debug, clap::Parser, Clone)]
struct Args {
    /// directory to source the Cricsheet matches from
    dir: Option<PathBuf>,

    /// where to write the CSV to
    out: Option<PathBuf>,

    /// match type (T20, ODI, Test, ...)
    #[clap(short = 'm', long)]
    match_type: Option<String>,

    /// team type (international or club)
    #[clap(short = 'y', long)]
    team_type: Option<String>,

    /// only matches involving this team
    #[clap(short = 't', long)]
    team: Option<String>,
}
impl Args {
    fn validate(&self) -> anyhow::Result<()> {
        self.dir.as_ref().ok_or(anyhow!("data directory must be specified"))?;
        self.out.as_ref().ok_or(anyhow!("output file must be specified"))?;
        Ok(())
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    if env::var("RUST_BACKTRACE").is_err() {
        env::set_var("RUST_BACKTRACE", "full")
    }
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info")
    }
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    args.validate()?;
    debug!("args: {args:?}");

    let start_time = Instant::now();
    let dir = args.dir.ok_or(anyhow!("data directory must be specified"))?;
    let out = args.out.ok_or(anyhow!("output file must be specified"))?;

    let mut predicates = vec![];
    if let Some(match_type) = args.match_type {
        predicates.push(Predicate::MatchType { match_type });
    }
    if let Some(team_type) = args.team_type {
        predicates.push(Predicate::TeamType { team_type });
    }
    if let Some(team) = args.team {
        predicates.push(Predicate::Team { team });
    }
    let matches = cricsheet::read_from_dir(dir, PredicateClosures::from(predicates))?;

    let mut csv = CsvWriter::create(&out)?;
    csv.append(COLUMNS)?;
    let mut scored_matches = 0;
    for (index, match_file) in matches.iter().enumerate() {
        let id = match_id(&match_file.file).unwrap_or_default();
        debug!("scoring {} ({} of {})", match_file.file.display(), index + 1, matches.len());
        let scored = match Match::score(id, &match_file.data, None) {
            Ok(scored) => scored,
            Err(err) => {
                warn!("skipping {}: {err}", match_file.file.display());
                continue;
            }
        };
        let total = |inning: usize| {
            scored
                .innings
                .get(inning)
                .map(|inning| format!("{} ({})", inning.total_display(), inning.overs_str()))
                .unwrap_or_default()
        };
        csv.append([
            id.to_string(),
            scored.format.clone(),
            scored.teams.first().cloned().unwrap_or_default(),
            scored.teams.get(1).cloned().unwrap_or_default(),
            scored.innings.len().to_string(),
            total(0),
            total(1),
            scored.outcome.clone(),
        ])?;
        scored_matches += 1;
    }
    csv.flush()?;

    let elapsed = start_time.elapsed();
    info!(
        "summarised {scored_matches} of {} matches into {} in {:.3}s",
        matches.len(),
        out.display(),
        elapsed.as_secs_f64()
    );
    Ok(())
}
