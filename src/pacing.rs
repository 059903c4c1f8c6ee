//! Randomized pauses between browser actions.

use std::time::Duration;

use rand::Rng;

/// A randomized delay of `base + uniform(0, jitter)`.
///
/// Used between scrolls to give lazily loaded content time to arrive, and
/// after navigation to let the page settle. The value is a heuristic: the
/// site exposes no reliable "content loaded" signal to wait on instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pause {
    pub base: Duration,
    pub jitter: Duration,
}

impl Pause {
    pub const fn new(base: Duration, jitter: Duration) -> Self {
        Self { base, jitter }
    }

    /// A pause drawn uniformly from `min..=max`.
    pub fn between(min: Duration, max: Duration) -> Self {
        Self {
            base: min,
            jitter: max.saturating_sub(min),
        }
    }

    pub const fn none() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    /// Draws one delay from the distribution.
    pub fn sample(&self) -> Duration {
        let jitter_ms = u64::try_from(self.jitter.as_millis()).unwrap_or(u64::MAX);
        let extra = rand::rng().random_range(0..=jitter_ms);
        self.base + Duration::from_millis(extra)
    }

    pub async fn sleep(&self) {
        let delay = self.sample();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

impl Default for Pause {
    fn default() -> Self {
        Self::new(Duration::from_millis(2500), Duration::from_millis(1000))
    }
}
