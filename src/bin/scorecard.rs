use std::env;
use std::error::Error;
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context};
use clap::Parser;
use stanza::renderer::console::Console;
use stanza::renderer::Renderer;
use tracing::{debug, info};

use googly::cricinfo::CricinfoData;
use googly::cricsheet;
use googly::file::{match_id, ReadJsonFile};
use googly::game::{Match, SUMMARY_WINDOW};
use googly::print::{
    tabulate_batting, tabulate_bowling, tabulate_fow, tabulate_overs, tabulate_partnerships,
    tabulate_spells, tabulate_summary,
};
use googly::serialise::encode_match_pretty;

#[derive(Debug, clap::Parser, Clone)]
struct Args {
    /// Cricsheet match file to score
    file: Option<PathBuf>,

    /// Cricinfo player metadata for the match
    #[clap(short = 'c', long)]
    cricinfo: Option<PathBuf>,

    /// also print the ball-by-ball card, spells and partnerships
    #[clap(short = 'v', long)]
    verbose: bool,

    /// write the scored match as JSON to this file
    #[clap(short = 'j', long)]
    json: Option<PathBuf>,

    /// number of leading performers shown per inning in the summary, less the innings played
    #[clap(short = 'w', long, default_value_t = SUMMARY_WINDOW)]
    window: usize,
}
impl Args {
    fn validate(&self) -> anyhow::Result<()> {
        if self.file.is_none() {
            bail!("match file must be specified");
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

    let file = args.file.as_ref().ok_or(anyhow!("match file must be specified"))?;
    let data = cricsheet::read_match(file).with_context(|| format!("reading {}", file.display()))?;
    let cricinfo = match &args.cricinfo {
        Some(path) => Some(
            CricinfoData::read_json_file(path).with_context(|| format!("reading {}", path.display()))?,
        ),
        None => None,
    };
    let scored = Match::score(match_id(file).unwrap_or_default(), &data, cricinfo.as_ref())?;
    info!("{}", scored.description());

    let console = Console::default();
    for inning in &scored.innings {
        info!("\n{}", console.render(&tabulate_batting(inning)));
        info!("\n{}", console.render(&tabulate_bowling(inning)));
        info!("\n{}", console.render(&tabulate_fow(inning)));
        if args.verbose {
            info!("\n{}", console.render(&tabulate_spells(inning)));
            info!("\n{}", console.render(&tabulate_partnerships(inning)));
            info!("\n{}", console.render(&tabulate_overs(inning)));
        }
    }
    info!("\n{}", console.render(&tabulate_summary(&scored, args.window)));

    if let Some(json) = &args.json {
        std::fs::write(json, encode_match_pretty(&scored)?)?;
        info!("wrote {}", json.display());
    }
    Ok(())
}
