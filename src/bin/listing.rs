use std::env;
use std::error::Error;
use std::path::PathBuf;

use anyhow::{anyhow, bail};
use chrono::NaiveDate;
use clap::Parser;
use stanza::renderer::console::Console;
use stanza::renderer::Renderer;
use tracing::{debug, info};

use googly::listing::{build_master_list, read_master_list, write_master_list, Filter, MASTER_LIST};
use googly::print::tabulate_listings;

#[derive(Debug, clap::Parser, Clone)]
struct Args {
    /// directory holding the README_*.txt files of the extracted archives
    #[clap(short = 'd', long, default_value = "data")]
    dir: PathBuf,

    /// rebuild the master list from the README files
    #[clap(short = 'b', long)]
    build: bool,

    /// only internationals between the Test-playing nations
    #[clap(short = 'i', long)]
    international: bool,

    /// earliest match date (YYYY-MM-DD)
    #[clap(long)]
    from: Option<NaiveDate>,

    /// latest match date (YYYY-MM-DD)
    #[clap(long)]
    to: Option<NaiveDate>,

    /// only matches involving at least one of these teams
    #[clap(short = 't', long)]
    team: Vec<String>,

    /// how many of the most recent listings to print
    #[clap(short = 'n', long, default_value_t = 20)]
    limit: usize,
}
impl Args {
    fn validate(&self) -> anyhow::Result<()> {
        if let (Some(from), Some(to)) = (self.from, self.to) {
            if from > to {
                bail!("start date {from} is after end date {to}");
            }
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

    let master = args.dir.join(MASTER_LIST);
    if args.build || !master.exists() {
        let listings = build_master_list(&args.dir)?;
        if listings.is_empty() {
            return Err(anyhow!("no listings found in {}", args.dir.display()).into());
        }
        write_master_list(&master, &listings)?;
        info!("wrote {} listings to {}", listings.len(), master.display());
    }

    let listings = read_master_list(&master)?;
    let mut filter = if args.international {
        Filter::international()
    } else {
        Filter::default()
    };
    if let Some(from) = args.from {
        filter.start_date = from;
    }
    if let Some(to) = args.to {
        filter.end_date = to;
    }
    if !args.team.is_empty() {
        filter.teams_subset = Some(args.team.clone());
    }
    let selected = filter.apply(&listings);
    info!("{} of {} listings selected", selected.len(), listings.len());

    let shown = &selected[..selected.len().min(args.limit)];
    info!("\n{}", Console::default().render(&tabulate_listings(shown)));
    Ok(())
}
