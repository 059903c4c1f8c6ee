//! Error types for configuration, the browser session and downloads.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Top-level failure of a harvest run.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Download(#[from] DownloadError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required setting {0}")]
    Missing(&'static str),

    #[error("invalid value for {key}: {value:?} ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Failure while driving the live browser session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("WebDriver error: {0}")]
    WebDriver(#[from] thirtyfour::error::WebDriverError),

    #[error("board {name:?} not found: {reason}")]
    BoardNotFound { name: String, reason: String },

    #[error("unexpected script result: {0}")]
    Script(String),

    #[error("invalid selector {selector:?}: {reason}")]
    Selector { selector: String, reason: String },
}

/// Failure of a single asset download.
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("malformed URL {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("no filename in URL {0:?}")]
    NoFilename(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
