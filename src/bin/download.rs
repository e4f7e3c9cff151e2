use std::env;
use std::error::Error;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::bail;
use clap::Parser;
use strum::IntoEnumIterator;
use tracing::{debug, info, warn};

use googly::download::{Archive, Downloader, BASE_URL};
use googly::listing::{build_master_list, write_master_list, MASTER_LIST};

#[derive(Debug, clap::Parser, Clone)]
struct Args {
    /// directory to download and extract into
    #[clap(short = 'd', long, default_value = "data")]
    dir: PathBuf,

    /// fetch the people register CSVs
    #[clap(short = 'r', long)]
    register: bool,

    /// archives to fetch (Test, ODI, T20, IPL, HND); all of them when given as 'all'
    #[clap(short = 'a', long, value_parser = parse_archives)]
    archives: Option<Archives>,

    /// alternative mirror of the Cricsheet site
    #[clap(long, default_value = BASE_URL)]
    base_url: String,
}
impl Args {
    fn validate(&self) -> anyhow::Result<()> {
        if !self.register && self.archives.is_none() {
            bail!("at least one of the -r or -a flags must be specified");
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
struct Archives(Vec<Archive>);

fn parse_archives(s: &str) -> anyhow::Result<Archives> {
    if s.eq_ignore_ascii_case("all") {
        return Ok(Archives(Archive::iter().collect()));
    }
    let archives = s
        .split(',')
        .map(|label| Archive::from_str(label.trim()))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Archives(archives))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
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

    tokio::fs::create_dir_all(&args.dir).await?;
    let downloader = Downloader::with_base_url(&args.base_url)?;
    if args.register {
        let files = downloader.download_register(&args.dir).await?;
        debug!("register files: {files:?}");
    }
    if let Some(Archives(archives)) = &args.archives {
        for &archive in archives {
            let extracted = downloader.download_archive(archive, &args.dir).await?;
            if extracted.readme.is_none() {
                warn!("the {archive} archive has no README");
            }
        }
        let listings = build_master_list(&args.dir)?;
        let master = args.dir.join(MASTER_LIST);
        write_master_list(&master, &listings)?;
        info!("wrote {} listings to {}", listings.len(), master.display());
    }
    Ok(())
}
