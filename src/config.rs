//! Startup configuration.
//!
//! Everything the run needs is gathered into one [`Config`] value when the
//! process starts and handed to constructors from there. Credentials are
//! required; every other setting has a default.

use std::{path::PathBuf, str::FromStr, time::Duration};

use tracing::info;

use crate::{error::ConfigError, harvest::HarvestParams, pacing::Pause};

pub const USERNAME_VAR: &str = "PINTEREST_USERNAME";
pub const PASSWORD_VAR: &str = "PINTEREST_PASSWORD";

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/140.0.3029.110 Safari/537.36";

/// Name of the log file listing successfully downloaded URLs.
pub const DOWNLOADED_LOG: &str = "downloaded.txt";
/// Name of the log file listing URLs that could not be downloaded.
pub const NOT_DOWNLOADED_LOG: &str = "downloaded_not.txt";

#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// CSS selectors and element ids used to drive the site.
#[derive(Debug, Clone)]
pub struct Selectors {
    pub login_button: String,
    pub email_input_id: String,
    pub password_input_id: String,
    pub avatar: String,
    pub board_title: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            login_button: "div[data-test-id='simple-login-button']".to_string(),
            email_input_id: "email".to_string(),
            password_input_id: "password".to_string(),
            avatar: "div[data-test-id='gestalt-avatar-svg']".to_string(),
            board_title: "div[data-test-id='board-card-title'] h2".to_string(),
        }
    }
}

/// Browser-side settings for the WebDriver session.
#[derive(Debug, Clone)]
pub struct BrowserConfig {
    pub webdriver_url: String,
    pub base_url: String,
    pub user_agent: String,
    pub window_size: (u32, u32),
    /// Upper bound for explicit waits on login and profile elements.
    pub wait_timeout: Duration,
    /// How long plain element lookups keep retrying before failing.
    pub implicit_wait: Duration,
    /// Settle time after login steps.
    pub short_pause: Pause,
    /// Settle time after opening a board or navigating back.
    pub medium_pause: Pause,
    pub selectors: Selectors,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            webdriver_url: "http://127.0.0.1:4444".to_string(),
            base_url: "https://www.pinterest.com".to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            window_size: (1200, 800),
            wait_timeout: Duration::from_secs(20),
            implicit_wait: Duration::from_secs(10),
            short_pause: Pause::between(Duration::from_secs(2), Duration::from_secs(4)),
            medium_pause: Pause::between(Duration::from_secs(3), Duration::from_secs(5)),
            selectors: Selectors::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub credentials: Credentials,
    pub browser: BrowserConfig,
    pub harvest: HarvestParams,
    /// Directory that receives the board folders and the two log files.
    pub output_root: PathBuf,
}

impl Config {
    /// Builds a config with default settings around the given credentials.
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            browser: BrowserConfig::default(),
            harvest: HarvestParams::default(),
            output_root: PathBuf::from("."),
        }
    }

    /// Loads `.env` if present, then reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(key))
        };

        let credentials = Credentials {
            username: required(USERNAME_VAR)?,
            password: required(PASSWORD_VAR)?,
        };

        let mut config = Self::new(credentials);

        if let Some(url) = lookup("WEBDRIVER_URL") {
            config.browser.webdriver_url = url;
        }
        if let Some(url) = lookup("HARVEST_BASE_URL") {
            config.browser.base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(agent) = lookup("HARVEST_USER_AGENT") {
            config.browser.user_agent = agent;
        }
        let implicit_ms = parse_or(
            &lookup,
            "HARVEST_IMPLICIT_WAIT_MS",
            millis(config.browser.implicit_wait),
        )?;
        config.browser.implicit_wait = Duration::from_millis(implicit_ms);
        if let Some(dir) = lookup("HARVEST_OUTPUT_DIR") {
            config.output_root = PathBuf::from(dir);
        }

        let harvest = &mut config.harvest;
        harvest.scroll_step = parse_or(&lookup, "HARVEST_SCROLL_STEP", harvest.scroll_step)?;
        harvest.max_stable_iterations = parse_or(
            &lookup,
            "HARVEST_STABLE_ITERATIONS",
            harvest.max_stable_iterations,
        )?;
        if harvest.max_stable_iterations == 0 {
            return Err(ConfigError::Invalid {
                key: "HARVEST_STABLE_ITERATIONS",
                value: "0".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        let pause_ms = parse_or(&lookup, "HARVEST_PAUSE_MS", millis(harvest.pause.base))?;
        let jitter_ms = parse_or(&lookup, "HARVEST_JITTER_MS", millis(harvest.pause.jitter))?;
        harvest.pause = Pause::new(
            Duration::from_millis(pause_ms),
            Duration::from_millis(jitter_ms),
        );

        Ok(config)
    }

    pub fn downloaded_log_path(&self) -> PathBuf {
        self.output_root.join(DOWNLOADED_LOG)
    }

    pub fn not_downloaded_log_path(&self) -> PathBuf {
        self.output_root.join(NOT_DOWNLOADED_LOG)
    }

    /// Logs the effective settings without revealing the password.
    pub fn log_summary(&self) {
        info!(
            username = %self.credentials.username,
            webdriver = %self.browser.webdriver_url,
            base_url = %self.browser.base_url,
            output_root = %self.output_root.display(),
            scroll_step = self.harvest.scroll_step,
            max_stable_iterations = self.harvest.max_stable_iterations,
            pause_ms = millis(self.harvest.pause.base),
            jitter_ms = millis(self.harvest.pause.jitter),
            "Config loaded"
        );
    }
}

fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            value: raw,
            reason: e.to_string(),
        }),
    }
}
