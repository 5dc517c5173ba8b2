//! Polling engine shared by every interaction primitive

use crate::error::Result;
use std::future::Future;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::trace;

/// Default timeout for locator waits
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default polling interval
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Timeout and polling cadence of a wait
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub timeout: Duration,
    pub poll_interval: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl Timeouts {
    pub fn new(timeout: Duration, poll_interval: Duration) -> Self {
        Self {
            timeout,
            poll_interval,
        }
    }

    /// Same poll interval, different timeout
    pub fn with_timeout(self, timeout: Duration) -> Self {
        Self { timeout, ..self }
    }

    /// Poll `check` until it yields a value or the timeout elapses.
    ///
    /// Returns `Ok(None)` on timeout. Transient errors from the check count
    /// as "not yet"; any other error ends the wait immediately. The check is
    /// always run at least once and once more at the deadline, so a timed-out
    /// wait lasts at least `timeout` and at most `timeout + poll_interval`.
    pub async fn poll<T, F, Fut>(&self, mut check: F) -> Result<Option<T>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<Option<T>>>,
    {
        let deadline = Instant::now() + self.timeout;

        loop {
            match check().await {
                Ok(Some(value)) => return Ok(Some(value)),
                Ok(None) => {}
                Err(e) if e.is_transient() => {
                    trace!("Transient fault while polling: {}", e);
                }
                Err(e) => return Err(e),
            }

            let now = Instant::now();
            if now >= deadline {
                return Ok(None);
            }
            sleep(self.poll_interval.min(deadline - now)).await;
        }
    }
}
