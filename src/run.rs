//! End-to-end run over every board of the logged-in user.

use std::path::PathBuf;

use tracing::{error, info, warn};

use crate::{
    config::Config,
    download::{DownloadLog, Downloader},
    error::{Error, Result},
    harvest::{HarvestParams, harvest_board},
    layout::{board_folder_name, ensure_directory},
    session::SessionDriver,
};

/// Outcome for one board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardReport {
    pub name: String,
    pub folder: PathBuf,
    /// Unique references collected while scrolling.
    pub found: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Set when the board was abandoned after scraping, e.g. its folder
    /// could not be created or the logs could not be written.
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub boards: Vec<BoardReport>,
}

impl RunSummary {
    pub fn total_succeeded(&self) -> usize {
        self.boards.iter().map(|b| b.succeeded).sum()
    }

    pub fn total_failed(&self) -> usize {
        self.boards.iter().map(|b| b.failed).sum()
    }
}

pub struct Runner {
    downloader: Downloader,
    log: DownloadLog,
    params: HarvestParams,
    output_root: PathBuf,
}

impl Runner {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            downloader: Downloader::new(&config.browser.user_agent)?,
            log: DownloadLog::new(config.downloaded_log_path(), config.not_downloaded_log_path()),
            params: config.harvest.clone(),
            output_root: config.output_root.clone(),
        })
    }

    /// Logs in, harvests and downloads every board, then closes the session.
    ///
    /// Failures inside a board are logged and the run moves on to the next
    /// one. Failing to log in, reach the profile or list the boards ends the
    /// run. The session is quit on every path.
    pub async fn run<S>(&self, mut session: S, base_name: &str) -> Result<RunSummary>
    where
        S: SessionDriver,
    {
        let result = self.run_boards(&mut session, base_name).await;
        if let Err(e) = &result {
            error!(error = %e, "Run aborted");
        }

        if let Err(e) = session.quit().await {
            warn!(error = %e, "Could not close the browser");
        }
        result
    }

    async fn run_boards<S>(&self, session: &mut S, base_name: &str) -> Result<RunSummary>
    where
        S: SessionDriver,
    {
        session.login().await?;
        session.navigate_to_profile().await?;
        let boards = session.list_board_names().await?;

        let mut summary = RunSummary::default();
        for name in boards {
            let folder = self.output_root.join(board_folder_name(base_name, &name));
            let mut report = BoardReport {
                name: name.clone(),
                folder: folder.clone(),
                found: 0,
                succeeded: 0,
                failed: 0,
                error: None,
            };

            if let Err(e) = self.process_board(session, &mut report).await {
                warn!(board = %name, error = %e, "Board failed, continuing with the next one");
                report.error = Some(e.to_string());
            }
            summary.boards.push(report);
        }

        info!(
            boards = summary.boards.len(),
            succeeded = summary.total_succeeded(),
            failed = summary.total_failed(),
            "Run finished"
        );
        Ok(summary)
    }

    async fn process_board<S>(&self, session: &mut S, report: &mut BoardReport) -> Result<()>
    where
        S: SessionDriver,
    {
        ensure_directory(&report.folder).await.map_err(Error::Io)?;

        let refs = harvest_board(session, &report.name, &self.params).await;
        report.found = refs.len();
        if refs.is_empty() {
            info!(board = %report.name, "No images found or scraped");
            return Ok(());
        }

        let outcome = self.downloader.download_all(&refs, &report.folder).await;
        report.succeeded = outcome.succeeded.len();
        report.failed = outcome.failed.len();
        self.log.record(&outcome).await?;
        Ok(())
    }
}
