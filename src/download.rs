//! Fetching of the Cricsheet register and match archives.

use std::fs;
use std::fs::File;
use std::io;
use std::io::{Cursor, Read, Seek};
use std::path::{Path, PathBuf};
use std::time::Duration;

use bytes::Bytes;
use strum_macros::{Display, EnumIter, EnumString};
use thiserror::Error;
use tracing::{debug, info, warn};
use zip::ZipArchive;

use crate::register::REGISTER_FILES;

pub const BASE_URL: &str = "https://cricsheet.org/";
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("{0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("GET {url} returned {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
}

/// The ball-by-ball archives published for men's matches, one per match type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
pub enum Archive {
    #[strum(serialize = "Test")]
    Test,
    #[strum(serialize = "ODI")]
    Odi,
    #[strum(serialize = "T20")]
    T20,
    #[strum(serialize = "IPL")]
    Ipl,
    #[strum(serialize = "HND")]
    Hundred,
}
impl Archive {
    /// Short name of the archive, also naming the directory its matches are extracted into.
    pub fn slug(&self) -> &'static str {
        match self {
            Archive::Test => "tests",
            Archive::Odi => "odis",
            Archive::T20 => "t20s",
            Archive::Ipl => "ipl",
            Archive::Hundred => "hnd",
        }
    }

    /// Path of the archive relative to [BASE_URL].
    pub fn path(&self) -> String {
        format!("downloads/{}_male_json.zip", self.slug())
    }

    pub fn file_name(&self) -> String {
        format!("{}_male_json.zip", self.slug())
    }

    /// The name under which the archive's README is kept once extracted, so that the READMEs of
    /// different archives can sit side by side.
    pub fn readme_name(&self) -> String {
        format!("README_{}.txt", self.to_string().to_uppercase())
    }
}

/// Where the contents of an archive ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extracted {
    pub readme: Option<PathBuf>,
    pub matches_dir: PathBuf,
    pub matches: usize,
}

const ARCHIVE_README: &str = "README.txt";

/// Unpacks a zipped archive into `dir`. The README is renamed after the archive and kept in `dir`
/// itself, while every other entry goes into a subdirectory named by [Archive::slug].
pub fn extract_archive(
    reader: impl Read + Seek,
    archive: Archive,
    dir: impl AsRef<Path>,
) -> Result<Extracted, DownloadError> {
    let dir = dir.as_ref();
    let mut zip = ZipArchive::new(reader)?;
    let matches_dir = dir.join(archive.slug());
    fs::create_dir_all(&matches_dir)?;

    let mut extracted = Extracted {
        readme: None,
        matches_dir,
        matches: 0,
    };
    for index in 0..zip.len() {
        let mut entry = zip.by_index(index)?;
        if entry.is_dir() {
            continue;
        }
        let Some(name) = entry.enclosed_name().map(Path::to_path_buf) else {
            warn!("skipping unsafe entry {} in the {archive} archive", entry.name());
            continue;
        };
        let target = if name == Path::new(ARCHIVE_README) {
            let readme = dir.join(archive.readme_name());
            extracted.readme = Some(readme.clone());
            readme
        } else {
            if name.extension().is_some_and(|extension| extension == "json") {
                extracted.matches += 1;
            }
            extracted.matches_dir.join(name)
        };
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        io::copy(&mut entry, &mut File::create(&target)?)?;
    }
    Ok(extracted)
}

pub struct Downloader {
    client: reqwest::Client,
    base_url: String,
}
impl Downloader {
    pub fn new() -> Result<Self, DownloadError> {
        Self::with_base_url(BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, DownloadError> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    pub async fn fetch(&self, path: &str) -> Result<Bytes, DownloadError> {
        let url = self.url(path);
        debug!("fetching {url}");
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::Status { url, status });
        }
        Ok(response.bytes().await?)
    }

    /// Fetches the resource at `path` (relative to the base URL) and writes it to `file`.
    pub async fn download_url(&self, path: &str, file: impl AsRef<Path>) -> Result<usize, DownloadError> {
        let body = self.fetch(path).await?;
        tokio::fs::write(file.as_ref(), &body).await?;
        debug!("wrote {} bytes to {}", body.len(), file.as_ref().display());
        Ok(body.len())
    }

    /// Saves `names.csv` and `people.csv` into `dir`.
    pub async fn download_register(&self, dir: impl AsRef<Path>) -> Result<Vec<PathBuf>, DownloadError> {
        let mut files = Vec::with_capacity(REGISTER_FILES.len());
        for name in REGISTER_FILES {
            let file = dir.as_ref().join(name);
            self.download_url(&format!("register/{name}"), &file).await?;
            info!("downloaded {}", file.display());
            files.push(file);
        }
        Ok(files)
    }

    /// Fetches the zipped archive for the given match type and extracts it into `dir`.
    pub async fn download_archive(&self, archive: Archive, dir: impl AsRef<Path>) -> Result<Extracted, DownloadError> {
        let body = self.fetch(&archive.path()).await?;
        info!("downloaded {} ({} bytes)", archive.file_name(), body.len());
        let dir = dir.as_ref().to_path_buf();
        let extracted =
            tokio::task::spawn_blocking(move || extract_archive(Cursor::new(body), archive, dir)).await??;
        info!(
            "extracted {} {archive} matches to {}",
            extracted.matches,
            extracted.matches_dir.display()
        );
        Ok(extracted)
    }
}
