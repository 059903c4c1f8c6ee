//! The scroll-and-collect loop.
//!
//! Boards load their pins lazily as the viewport approaches the bottom of
//! the page. The harvester scrolls in fixed steps, waits, snapshots the
//! document and collects every image reference seen so far. It stops once
//! the document height has stayed unchanged for a configured number of
//! consecutive scrolls.

use std::collections::HashSet;

use tracing::{debug, info, warn};

use crate::{
    error::SessionError,
    extract::extract,
    media::MediaReference,
    pacing::Pause,
    session::{PagePrimitives, SessionDriver},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarvestParams {
    /// Consecutive no-growth scrolls required before the board counts as exhausted.
    pub max_stable_iterations: u32,
    /// Pixels scrolled per iteration.
    pub scroll_step: i64,
    /// Wait between scrolling and snapshotting.
    pub pause: Pause,
}

impl Default for HarvestParams {
    fn default() -> Self {
        Self {
            max_stable_iterations: 5,
            scroll_step: 1000,
            pause: Pause::default(),
        }
    }
}

/// State of one board's harvest. Never outlives the [`harvest`] call.
#[derive(Debug, Default)]
pub struct HarvestState {
    accumulated: HashSet<MediaReference>,
    last_height: u64,
    stable_iterations: u32,
}

impl HarvestState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds references; the set never shrinks.
    pub fn absorb(&mut self, refs: impl IntoIterator<Item = MediaReference>) {
        self.accumulated.extend(refs);
    }

    /// Records one scroll's height change and returns whether the loop is done.
    pub fn observe(&mut self, before: u64, after: u64, threshold: u32) -> bool {
        if after == before {
            self.stable_iterations += 1;
        } else {
            self.stable_iterations = 0;
        }
        self.last_height = after;
        self.stable_iterations >= threshold
    }

    pub fn stable_iterations(&self) -> u32 {
        self.stable_iterations
    }

    pub fn last_height(&self) -> u64 {
        self.last_height
    }

    pub fn len(&self) -> usize {
        self.accumulated.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accumulated.is_empty()
    }

    pub fn into_references(self) -> HashSet<MediaReference> {
        self.accumulated
    }
}

/// Scrolls the current document until it stops growing and returns every
/// reference seen along the way.
///
/// A single unchanged height is treated as a stall, not the end: only
/// `max_stable_iterations` consecutive unchanged observations stop the loop.
pub async fn harvest<P>(
    page: &mut P,
    params: &HarvestParams,
) -> Result<HashSet<MediaReference>, SessionError>
where
    P: PagePrimitives + ?Sized,
{
    let mut state = HarvestState::new();
    let mut iteration = 0u64;

    loop {
        iteration += 1;
        let before = page.current_document_height().await?;
        page.scroll_by(params.scroll_step).await?;
        params.pause.sleep().await;

        let snapshot = page.current_snapshot().await?;
        state.absorb(extract(&snapshot));

        let after = page.current_document_height().await?;
        let done = state.observe(before, after, params.max_stable_iterations);

        debug!(
            iteration,
            unique = state.len(),
            before,
            after,
            "Scrolled"
        );
        if after == before {
            info!(
                stable = state.stable_iterations(),
                threshold = params.max_stable_iterations,
                "No new content loaded"
            );
        }
        if done {
            break;
        }
    }

    info!(
        iterations = iteration,
        unique = state.len(),
        height = state.last_height(),
        "Reached the end of the board"
    );
    Ok(state.into_references())
}

/// Opens a board, harvests it and returns to the profile listing.
///
/// Any session failure abandons the board and yields an empty set, so one
/// broken board never ends the run. Once the board has been opened, the
/// profile listing is restored on every path because the next board is
/// located from it. A board that fails to open never left the listing.
pub async fn harvest_board<S>(
    session: &mut S,
    name: &str,
    params: &HarvestParams,
) -> HashSet<MediaReference>
where
    S: SessionDriver + ?Sized,
{
    info!(board = name, "Starting scrape");

    if let Err(e) = session.open_board(name).await {
        // Still on the profile listing; going back would leave it.
        warn!(board = name, error = %e, "Could not open board");
        return HashSet::new();
    }

    let refs = match harvest(&mut *session, params).await {
        Ok(refs) => {
            info!(board = name, unique = refs.len(), "Collected image references");
            refs
        }
        Err(e) => {
            warn!(board = name, error = %e, "Could not scrape board");
            HashSet::new()
        }
    };

    debug!(board = name, "Returning to profile page");
    if let Err(e) = session.go_back().await {
        warn!(board = name, error = %e, "Could not return to profile page");
    }

    refs
}
