//! # Board Harvest
//!
//! A library for downloading every image from a user's Pinterest boards.
//!
//! Boards load their pins lazily while the page is scrolled, so a plain
//! HTTP fetch only sees the first screenful. This crate drives a real
//! browser through WebDriver instead:
//!
//! 1. **Harvesting** - Log in, list the profile's boards, then scroll each
//!    board until its height stops growing, collecting the `srcset` of every
//!    image that appeared along the way.
//!
//! 2. **Downloading** - Resolve each `srcset` to its highest-resolution URL
//!    and save it into a per-board folder, appending the saved and failed
//!    URLs to `downloaded.txt` and `downloaded_not.txt`.
//!
//! ## Example
//!
//! ```no_run
//! use board_harvest::{Config, Runner, WebDriverSession};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     let runner = Runner::new(&config)?;
//!     let session = WebDriverSession::connect(&config).await?;
//!
//!     let summary = runner.run(session, "trip").await?;
//!     println!("Downloaded {} images", summary.total_succeeded());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod download;
pub mod error;
pub mod extract;
pub mod harvest;
pub mod layout;
pub mod media;
pub mod pacing;
pub mod prompt;
pub mod run;
pub mod session;

pub use config::Config;
pub use download::{DownloadLog, DownloadReport, Downloader};
pub use error::{ConfigError, DownloadError, Error, Result, SessionError};
pub use extract::extract;
pub use harvest::{HarvestParams, HarvestState, harvest, harvest_board};
pub use media::{MediaReference, ResolvedAsset, resolve};
pub use pacing::Pause;
pub use run::{BoardReport, RunSummary, Runner};
pub use session::{PagePrimitives, SessionDriver, WebDriverSession};
