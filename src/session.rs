//! The browser session the harvester drives.
//!
//! [`PagePrimitives`] is the narrow view the scroll loop needs of a live
//! document. [`SessionDriver`] adds the navigation steps around it. Both are
//! traits so tests can substitute a scripted document for a real browser.

use async_trait::async_trait;
use thirtyfour::{
    By, DesiredCapabilities, Key, WebDriver,
    common::capabilities::firefox::FirefoxPreferences, prelude::ElementQueryable,
};
use tracing::{debug, info};

use crate::{
    config::{BrowserConfig, Config, Credentials},
    error::SessionError,
    extract::board_titles,
};

/// Read/scroll access to the currently displayed document.
#[async_trait]
pub trait PagePrimitives: Send {
    /// Current scroll height of the document body, in pixels.
    async fn current_document_height(&mut self) -> Result<u64, SessionError>;

    /// Scrolls the viewport by `delta` pixels. Returns once the instruction
    /// is issued, not once new content has loaded.
    async fn scroll_by(&mut self, delta: i64) -> Result<(), SessionError>;

    /// Serialized markup of the document as it currently stands.
    async fn current_snapshot(&mut self) -> Result<String, SessionError>;
}

#[async_trait]
pub trait SessionDriver: PagePrimitives {
    async fn login(&mut self) -> Result<(), SessionError>;

    /// Moves from the landing page to the user's profile listing.
    async fn navigate_to_profile(&mut self) -> Result<(), SessionError>;

    /// Board titles on the profile listing, in display order.
    async fn list_board_names(&mut self) -> Result<Vec<String>, SessionError>;

    /// Opens the board with the given title from the profile listing.
    async fn open_board(&mut self, name: &str) -> Result<(), SessionError>;

    /// Returns to the previous page (the profile listing after `open_board`).
    async fn go_back(&mut self) -> Result<(), SessionError>;

    /// Closes the browser.
    async fn quit(self) -> Result<(), SessionError>
    where
        Self: Sized;
}

/// A [`SessionDriver`] backed by a WebDriver-controlled Firefox.
///
/// Requires geckodriver to be reachable at the configured WebDriver URL.
pub struct WebDriverSession {
    driver: WebDriver,
    browser: BrowserConfig,
    credentials: Credentials,
}

impl WebDriverSession {
    /// Starts a browser session with the configured user agent and window size.
    ///
    /// # Errors
    ///
    /// Returns an error if the WebDriver connection fails.
    pub async fn connect(config: &Config) -> Result<Self, SessionError> {
        let browser = config.browser.clone();

        let mut caps = DesiredCapabilities::firefox();
        let mut prefs = FirefoxPreferences::new();
        prefs.set_user_agent(browser.user_agent.clone())?;
        prefs.set("dom.webnotifications.enabled", false)?;
        caps.set_preferences(prefs)?;

        info!(webdriver = %browser.webdriver_url, "Starting browser session");
        let driver = WebDriver::new(browser.webdriver_url.as_str(), caps).await?;

        let (width, height) = browser.window_size;
        driver
            .set_window_rect(0, 0, width.into(), height.into())
            .await?;
        // Element lookups retry until this elapses, so a board title that
        // renders late after navigating back is still found.
        driver
            .set_implicit_wait_timeout(browser.implicit_wait)
            .await?;

        Ok(Self {
            driver,
            browser,
            credentials: config.credentials.clone(),
        })
    }

    async fn execute_number(&self, script: &str) -> Result<u64, SessionError> {
        let ret = self.driver.execute(script, vec![]).await?;
        let value = ret.json();
        value
            .as_u64()
            .or_else(|| value.as_f64().map(|f| f.max(0.0) as u64))
            .ok_or_else(|| SessionError::Script(format!("expected a number, got {value}")))
    }
}

#[async_trait]
impl PagePrimitives for WebDriverSession {
    async fn current_document_height(&mut self) -> Result<u64, SessionError> {
        self.execute_number("return document.body.scrollHeight").await
    }

    async fn scroll_by(&mut self, delta: i64) -> Result<(), SessionError> {
        let args = vec![serde_json::json!(delta)];
        self.driver
            .execute("window.scrollBy(0, arguments[0]);", args)
            .await?;
        Ok(())
    }

    async fn current_snapshot(&mut self) -> Result<String, SessionError> {
        Ok(self.driver.source().await?)
    }
}

#[async_trait]
impl SessionDriver for WebDriverSession {
    async fn login(&mut self) -> Result<(), SessionError> {
        let selectors = &self.browser.selectors;
        let timeout = self.browser.wait_timeout;
        let poll = std::time::Duration::from_millis(500);

        info!(url = %self.browser.base_url, "Logging in");
        self.driver.goto(self.browser.base_url.as_str()).await?;

        let login_button = self
            .driver
            .query(By::Css(selectors.login_button.as_str()))
            .wait(timeout, poll)
            .and_clickable()
            .first()
            .await?;
        login_button.click().await?;
        self.browser.short_pause.sleep().await;

        let email = self
            .driver
            .query(By::Id(selectors.email_input_id.as_str()))
            .wait(timeout, poll)
            .first()
            .await?;
        email.send_keys(self.credentials.username.as_str()).await?;

        let password = self
            .driver
            .find(By::Id(selectors.password_input_id.as_str()))
            .await?;
        password.send_keys(self.credentials.password.as_str()).await?;
        tokio::time::sleep(std::time::Duration::from_secs(1)).await;
        password.send_keys(Key::Enter).await?;

        // The avatar only renders for an authenticated user.
        self.driver
            .query(By::Css(selectors.avatar.as_str()))
            .wait(timeout, poll)
            .and_clickable()
            .first()
            .await?;
        info!("Login successful");
        self.browser.short_pause.sleep().await;

        Ok(())
    }

    async fn navigate_to_profile(&mut self) -> Result<(), SessionError> {
        info!("Navigating to profile page");
        let avatar = self
            .driver
            .query(By::Css(self.browser.selectors.avatar.as_str()))
            .wait(self.browser.wait_timeout, std::time::Duration::from_millis(500))
            .and_clickable()
            .first()
            .await?;
        avatar.click().await?;
        self.browser.short_pause.sleep().await;
        Ok(())
    }

    async fn list_board_names(&mut self) -> Result<Vec<String>, SessionError> {
        let source = self.driver.source().await?;
        let names = board_titles(&source, &self.browser.selectors.board_title)?;
        info!(count = names.len(), boards = ?names, "Found boards");
        Ok(names)
    }

    async fn open_board(&mut self, name: &str) -> Result<(), SessionError> {
        let xpath = format!("//h2[text()={}]", xpath_literal(name));
        debug!(%xpath, "Opening board");

        let link = self
            .driver
            .find(By::XPath(xpath.as_str()))
            .await
            .map_err(|e| SessionError::BoardNotFound {
                name: name.to_string(),
                reason: e.to_string(),
            })?;
        link.click().await?;
        self.browser.medium_pause.sleep().await;
        Ok(())
    }

    async fn go_back(&mut self) -> Result<(), SessionError> {
        self.driver.back().await?;
        self.browser.medium_pause.sleep().await;
        Ok(())
    }

    async fn quit(self) -> Result<(), SessionError> {
        info!("Closing the browser");
        self.driver.quit().await?;
        Ok(())
    }
}

/// Quotes `value` as an XPath 1.0 string literal.
///
/// XPath has no escape sequences, so a value containing both quote kinds is
/// spliced together with `concat()`.
fn xpath_literal(value: &str) -> String {
    if !value.contains('\'') {
        format!("'{value}'")
    } else if !value.contains('"') {
        format!("\"{value}\"")
    } else {
        let parts: Vec<String> = value
            .split('\'')
            .map(|part| format!("'{part}'"))
            .collect();
        format!("concat({})", parts.join(", \"'\", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xpath_literal_plain() {
        assert_eq!(xpath_literal("My Favorites"), "'My Favorites'");
    }

    #[test]
    fn test_xpath_literal_with_apostrophe() {
        assert_eq!(xpath_literal("Mom's recipes"), "\"Mom's recipes\"");
    }

    #[test]
    fn test_xpath_literal_with_both_quotes() {
        assert_eq!(
            xpath_literal(r#"it's "fine""#),
            r#"concat('it', "'", 's "fine"')"#
        );
    }
}
