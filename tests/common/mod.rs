#![allow(dead_code)]

use std::{
    path::Path,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use axum::{Router, http::HeaderMap, routing::get};
use board_harvest::{
    Config, HarvestParams, Pause, PagePrimitives, SessionDriver, SessionError,
    config::Credentials,
};
use tower_http::services::ServeDir;

/// A document whose height and markup are scripted per scroll.
///
/// `heights[k]` and `snapshots[k]` describe the page after `k` scrolls; past
/// the end of either list the last entry holds.
pub struct ScriptedPage {
    heights: Vec<u64>,
    snapshots: Vec<String>,
    fail_on_scroll: Option<usize>,
    pub scrolls: usize,
}

impl ScriptedPage {
    pub fn new(heights: &[u64]) -> Self {
        Self {
            heights: heights.to_vec(),
            snapshots: Vec::new(),
            fail_on_scroll: None,
            scrolls: 0,
        }
    }

    pub fn with_snapshots(mut self, snapshots: Vec<String>) -> Self {
        self.snapshots = snapshots;
        self
    }

    /// Makes the `n`th scroll (1-based) fail.
    pub fn failing_on_scroll(mut self, n: usize) -> Self {
        self.fail_on_scroll = Some(n);
        self
    }

    fn clamped<T>(items: &[T], index: usize) -> Option<&T> {
        items.get(index.min(items.len().saturating_sub(1)))
    }
}

#[async_trait]
impl PagePrimitives for ScriptedPage {
    async fn current_document_height(&mut self) -> Result<u64, SessionError> {
        Ok(Self::clamped(&self.heights, self.scrolls).copied().unwrap_or(0))
    }

    async fn scroll_by(&mut self, _delta: i64) -> Result<(), SessionError> {
        if self.fail_on_scroll == Some(self.scrolls + 1) {
            return Err(SessionError::Script("page went away".to_string()));
        }
        self.scrolls += 1;
        Ok(())
    }

    async fn current_snapshot(&mut self) -> Result<String, SessionError> {
        Ok(Self::clamped(&self.snapshots, self.scrolls)
            .cloned()
            .unwrap_or_default())
    }
}

pub type Journal = Arc<Mutex<Vec<String>>>;

pub enum FakeBoard {
    Page(ScriptedPage),
    /// The board title is listed but clicking it fails.
    Unopenable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    Landing,
    Profile,
    Board(usize),
}

/// A session over scripted boards that records every navigation step.
///
/// Navigation is a browser-style history stack: `go_back` pops one entry,
/// wherever that leads.
pub struct FakeSession {
    boards: Vec<(String, FakeBoard)>,
    history: Vec<Location>,
    login_fails: bool,
    journal: Journal,
}

impl FakeSession {
    pub fn new(boards: Vec<(&str, FakeBoard)>) -> Self {
        Self {
            boards: boards
                .into_iter()
                .map(|(name, board)| (name.to_string(), board))
                .collect(),
            history: vec![Location::Landing],
            login_fails: false,
            journal: Journal::default(),
        }
    }

    pub fn with_failing_login(mut self) -> Self {
        self.login_fails = true;
        self
    }

    pub fn journal(&self) -> Journal {
        self.journal.clone()
    }

    fn record(&self, event: impl Into<String>) {
        self.journal.lock().unwrap().push(event.into());
    }

    pub fn location(&self) -> Location {
        self.history.last().copied().unwrap_or(Location::Landing)
    }

    fn page(&mut self) -> Result<&mut ScriptedPage, SessionError> {
        let Location::Board(index) = self.location() else {
            return Err(SessionError::Script("no board open".to_string()));
        };
        match &mut self.boards[index].1 {
            FakeBoard::Page(page) => Ok(page),
            FakeBoard::Unopenable => Err(SessionError::Script("no board open".to_string())),
        }
    }
}

#[async_trait]
impl PagePrimitives for FakeSession {
    async fn current_document_height(&mut self) -> Result<u64, SessionError> {
        self.page()?.current_document_height().await
    }

    async fn scroll_by(&mut self, delta: i64) -> Result<(), SessionError> {
        self.page()?.scroll_by(delta).await
    }

    async fn current_snapshot(&mut self) -> Result<String, SessionError> {
        self.page()?.current_snapshot().await
    }
}

#[async_trait]
impl SessionDriver for FakeSession {
    async fn login(&mut self) -> Result<(), SessionError> {
        self.record("login");
        if self.login_fails {
            return Err(SessionError::Script("login form not found".to_string()));
        }
        Ok(())
    }

    async fn navigate_to_profile(&mut self) -> Result<(), SessionError> {
        self.record("profile");
        self.history.push(Location::Profile);
        Ok(())
    }

    async fn list_board_names(&mut self) -> Result<Vec<String>, SessionError> {
        Ok(self.boards.iter().map(|(name, _)| name.clone()).collect())
    }

    async fn open_board(&mut self, name: &str) -> Result<(), SessionError> {
        self.record(format!("open:{name}"));
        if self.location() != Location::Profile {
            return Err(SessionError::Script(format!(
                "not on the profile page, on {:?}",
                self.location()
            )));
        }
        let index = self
            .boards
            .iter()
            .position(|(n, _)| n == name)
            .ok_or_else(|| SessionError::BoardNotFound {
                name: name.to_string(),
                reason: "no such title".to_string(),
            })?;
        if let FakeBoard::Unopenable = self.boards[index].1 {
            return Err(SessionError::BoardNotFound {
                name: name.to_string(),
                reason: "element not clickable".to_string(),
            });
        }
        self.history.push(Location::Board(index));
        Ok(())
    }

    async fn go_back(&mut self) -> Result<(), SessionError> {
        self.record("back");
        if self.history.len() > 1 {
            self.history.pop();
        }
        Ok(())
    }

    async fn quit(self) -> Result<(), SessionError> {
        self.record("quit");
        Ok(())
    }
}

/// Markup with one `<img>` per srcset value.
pub fn page_with(srcsets: &[&str]) -> String {
    let imgs: String = srcsets
        .iter()
        .map(|s| format!(r#"<img src="thumb.jpg" srcset="{s}">"#))
        .collect();
    format!("<html><body><div class=\"grid\">{imgs}</div></body></html>")
}

/// Serves `dir` on an ephemeral local port and returns its base URL.
///
/// `/agent.jpg` answers with the request's User-Agent header.
pub async fn serve_assets(dir: &Path) -> String {
    let app = Router::new()
        .route(
            "/agent.jpg",
            get(|headers: HeaderMap| async move {
                headers
                    .get("user-agent")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string()
            }),
        )
        .fallback_service(ServeDir::new(dir.to_path_buf()));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// Config writing into `root` with no pacing delays.
pub fn test_config(root: &Path, max_stable_iterations: u32) -> Config {
    let mut config = Config::new(Credentials {
        username: "me@example.com".to_string(),
        password: "secret".to_string(),
    });
    config.output_root = root.to_path_buf();
    config.harvest = HarvestParams {
        max_stable_iterations,
        scroll_step: 1000,
        pause: Pause::none(),
    };
    config
}

pub fn quick_params(max_stable_iterations: u32) -> HarvestParams {
    HarvestParams {
        max_stable_iterations,
        scroll_step: 1000,
        pause: Pause::none(),
    }
}
