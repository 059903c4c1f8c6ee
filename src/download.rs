//! Fetching resolved assets and recording the outcome.

use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
};

use tokio::{fs, io::AsyncWriteExt};
use tracing::{debug, info, warn};

use crate::{
    error::DownloadError,
    media::{MediaReference, ResolvedAsset, resolve},
};

/// Which target URLs of a batch were saved and which were not.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadReport {
    pub succeeded: Vec<String>,
    pub failed: Vec<String>,
}

/// Downloads the highest-resolution variant of each reference, one at a time.
pub struct Downloader {
    client: reqwest::Client,
}

impl Downloader {
    /// Creates a downloader that identifies itself with `user_agent`.
    pub fn new(user_agent: &str) -> Result<Self, DownloadError> {
        let client = reqwest::Client::builder().user_agent(user_agent).build()?;
        Ok(Self { client })
    }

    /// Downloads every reference into `destination`.
    ///
    /// References are deduplicated and sorted first so the iteration and log
    /// order are reproducible. A failed asset is recorded and skipped; it is
    /// not retried and does not stop the batch.
    pub async fn download_all<'a, I>(&self, refs: I, destination: &Path) -> DownloadReport
    where
        I: IntoIterator<Item = &'a MediaReference>,
    {
        let unique: BTreeSet<&MediaReference> = refs.into_iter().collect();
        info!(
            count = unique.len(),
            folder = %destination.display(),
            "Found unique images to download"
        );

        let mut report = DownloadReport::default();
        for reference in unique {
            let asset = resolve(reference);
            debug!(filename = %asset.filename, "Downloading");
            match self.fetch(&asset, destination).await {
                Ok(path) => {
                    debug!(path = %path.display(), "Saved");
                    report.succeeded.push(asset.target_url);
                }
                Err(e) => {
                    warn!(url = %asset.target_url, error = %e, "Error downloading image");
                    report.failed.push(asset.target_url);
                }
            }
        }

        info!(
            succeeded = report.succeeded.len(),
            failed = report.failed.len(),
            "Finished downloading for board"
        );
        report
    }

    async fn fetch(&self, asset: &ResolvedAsset, destination: &Path) -> Result<PathBuf, DownloadError> {
        let url = url::Url::parse(&asset.target_url).map_err(|source| DownloadError::InvalidUrl {
            url: asset.target_url.clone(),
            source,
        })?;
        if asset.filename.is_empty() {
            return Err(DownloadError::NoFilename(asset.target_url.clone()));
        }

        let bytes = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        let path = destination.join(&asset.filename);
        fs::write(&path, &bytes).await?;
        Ok(path)
    }
}

/// The pair of append-only URL logs shared by the whole run.
#[derive(Debug, Clone)]
pub struct DownloadLog {
    succeeded: PathBuf,
    failed: PathBuf,
}

impl DownloadLog {
    pub fn new(succeeded: impl Into<PathBuf>, failed: impl Into<PathBuf>) -> Self {
        Self {
            succeeded: succeeded.into(),
            failed: failed.into(),
        }
    }

    /// Appends both lists of a report to their files.
    pub async fn record(&self, report: &DownloadReport) -> std::io::Result<()> {
        append_lines(&self.succeeded, &report.succeeded).await?;
        append_lines(&self.failed, &report.failed).await
    }
}

/// Appends `lines` to `path`, one per line. Writes nothing for an empty batch.
pub async fn append_lines(path: &Path, lines: &[String]) -> std::io::Result<()> {
    if lines.is_empty() {
        return Ok(());
    }

    let mut batch = lines.join("\n");
    batch.push('\n');

    let mut file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await?;
    file.write_all(batch.as_bytes()).await?;
    file.flush().await
}
