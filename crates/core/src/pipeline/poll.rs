use std::future::Future;
use std::time::Duration;

use tracing::debug;

use crate::Error;

/// Result of one poll attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome<T> {
    Ready(T),
    Pending,
}

/// Fixed-interval, bounded polling.
///
/// Each attempt sleeps first, then polls. Sleeping goes through
/// `tokio::time`, so a paused test runtime runs the whole schedule instantly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(1_500),
            max_attempts: 20,
        }
    }
}

impl PollPolicy {
    pub fn new(interval: Duration, max_attempts: u32) -> Self {
        Self { interval, max_attempts }
    }

    /// Longest time `run` can wait before timing out
    pub fn budget(&self) -> Duration {
        self.interval * self.max_attempts
    }

    /// Polls `op` until it is ready, fails, or the attempts run out.
    ///
    /// `op` receives the 1-based attempt number. An error from `op` stops
    /// polling immediately.
    pub async fn run<T, F, Fut>(&self, mut op: F) -> crate::Result<T>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = crate::Result<PollOutcome<T>>>,
    {
        for attempt in 1..=self.max_attempts {
            tokio::time::sleep(self.interval).await;
            match op(attempt).await? {
                PollOutcome::Ready(value) => return Ok(value),
                PollOutcome::Pending => debug!(attempt, max = self.max_attempts, "still pending"),
            }
        }

        Err(Error::ConfirmationTimeout {
            attempts: self.max_attempts,
        })
    }
}
