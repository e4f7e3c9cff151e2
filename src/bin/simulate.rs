use std::env;
use std::error::Error;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::bail;
use clap::Parser;
use stanza::renderer::console::Console;
use stanza::renderer::Renderer;
use tinyrand::{Seeded, StdRand};
use tracing::{debug, info};

use googly::cricinfo::CricinfoData;
use googly::cricsheet;
use googly::file::{ReadJsonFile, WriteJsonFile};
use googly::game::SUMMARY_WINDOW;
use googly::print::{tabulate_batting, tabulate_bowling, tabulate_fow, tabulate_overs, tabulate_summary};
use googly::sim::{Config, Format, Lineup, Simulator};

#[derive(Debug, clap::Parser, Clone)]
struct Args {
    /// match format: T20, ODI or Test
    #[clap(short = 'f', long, default_value = "T20")]
    format: Format,

    /// names of the two teams, when playing artificial squads
    #[clap(short = 't', long, num_args = 2, default_values = ["Home", "Away"])]
    teams: Vec<String>,

    /// Cricsheet match file to take both playing XIs from
    #[clap(short = 'm', long)]
    squads: Option<PathBuf>,

    /// Cricinfo player metadata for the squads
    #[clap(short = 'c', long)]
    cricinfo: Option<PathBuf>,

    /// JSON file of outcome weights, overriding the built-in ones
    #[clap(long)]
    config: Option<PathBuf>,

    /// seed for the random number generator
    #[clap(short = 's', long)]
    seed: Option<u64>,

    /// also print the ball-by-ball cards
    #[clap(short = 'v', long)]
    verbose: bool,

    /// write the simulated match, in Cricsheet form, to this file
    #[clap(short = 'o', long)]
    out: Option<PathBuf>,
}
impl Args {
    fn validate(&self) -> anyhow::Result<()> {
        if self.teams.len() != 2 {
            bail!("exactly two team names must be given");
        }
        if self.teams[0] == self.teams[1] {
            bail!("team names must differ");
        }
        if self.cricinfo.is_some() && self.squads.is_none() {
            bail!("Cricinfo metadata applies only to squads taken from a match file");
        }
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

    let lineups = match &args.squads {
        Some(path) => {
            let data = cricsheet::read_match(path)?;
            let cricinfo = match &args.cricinfo {
                Some(path) => Some(CricinfoData::read_json_file(path)?),
                None => None,
            };
            Lineup::from_match(&data, cricinfo.as_ref())?
        }
        None => [Lineup::artificial(&args.teams[0]), Lineup::artificial(&args.teams[1])],
    };
    let config = match &args.config {
        Some(path) => Config::read_json_file(path)?,
        None => Config::default(),
    };
    let simulator = Simulator::try_from(config)?;

    let seed = match args.seed {
        Some(seed) => seed,
        None => SystemTime::now().duration_since(UNIX_EPOCH)?.as_nanos() as u64,
    };
    info!("simulating {} vs {} ({}), seed {seed}", lineups[0].team, lineups[1].team, args.format);
    let mut rand = StdRand::seed(seed);
    let simulation = simulator.simulate(&lineups, args.format, &mut rand)?;
    let scored = simulation.score(seed)?;

    let console = Console::default();
    for inning in &scored.innings {
        info!("\n{}", console.render(&tabulate_batting(inning)));
        info!("\n{}", console.render(&tabulate_bowling(inning)));
        info!("\n{}", console.render(&tabulate_fow(inning)));
        if args.verbose {
            info!("\n{}", console.render(&tabulate_overs(inning)));
        }
    }
    info!("\n{}", console.render(&tabulate_summary(&scored, SUMMARY_WINDOW)));
    info!("{}", scored.outcome);

    if let Some(out) = &args.out {
        simulation.data.write_json_file(out)?;
        info!("wrote {}", out.display());
    }
    Ok(())
}
