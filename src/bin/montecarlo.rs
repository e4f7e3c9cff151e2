use std::env;
use std::error::Error;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::bail;
use clap::Parser;
use stanza::renderer::console::Console;
use stanza::renderer::Renderer;
use tinyrand::{Seeded, StdRand};
use tracing::{debug, info};

use googly::cricinfo::CricinfoData;
use googly::cricsheet;
use googly::file::ReadJsonFile;
use googly::mc::{MonteCarloEngine, DEFAULT_TRIALS};
use googly::print::tabulate_tally;
use googly::sim::{Config, Format, Lineup};

#[derive(Debug, clap::Parser, Clone)]
struct Args {
    /// match format: T20, ODI or Test
    #[clap(short = 'f', long, default_value = "T20")]
    format: Format,

    /// number of simulated matches
    #[clap(short = 'n', long, default_value_t = DEFAULT_TRIALS)]
    trials: u64,

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
}
impl Args {
    fn validate(&self) -> anyhow::Result<()> {
        if self.trials == 0 {
            bail!("at least one trial must be run");
        }
        if self.teams.len() != 2 || self.teams[0] == self.teams[1] {
            bail!("two distinct team names must be given");
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
    let rand = match args.seed {
        Some(seed) => StdRand::seed(seed),
        None => StdRand::default(),
    };
    let mut engine = MonteCarloEngine::default()
        .with_trials(args.trials)
        .with_config(config)
        .with_rand(rand);

    let start_time = Instant::now();
    let tally = engine.simulate(&lineups, args.format)?;
    let elapsed = start_time.elapsed();
    info!(
        "simulated {} {} matches in {:.3}s",
        engine.trials(),
        args.format,
        elapsed.as_secs_f64()
    );

    let teams = [lineups[0].team.clone(), lineups[1].team.clone()];
    info!("\n{}", Console::default().render(&tabulate_tally(&tally, &teams)));
    Ok(())
}
