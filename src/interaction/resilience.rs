//! Click retries for transient faults

use super::Interactor;
use crate::error::{Error, Result, TransientFault};
use crate::Locator;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info, instrument, warn};

/// How often a click is retried after a transient fault
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Extra attempts after the first one
    pub retries: u32,
    /// Pause between attempts
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: 2,
            backoff: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    pub fn new(retries: u32, backoff: Duration) -> Self {
        Self { retries, backoff }
    }

    /// No retries at all
    pub fn none() -> Self {
        Self::new(0, Duration::ZERO)
    }

    pub fn max_attempts(&self) -> u32 {
        self.retries + 1
    }
}

/// Result of [`Interactor::safe_click`]
#[derive(Debug)]
pub enum ClickOutcome {
    /// The click landed
    Clicked { attempts: u32 },
    /// Every attempt hit a transient fault
    Exhausted {
        attempts: u32,
        last_fault: TransientFault,
        last_error: Error,
    },
    /// The element never became clickable, or a non-transient error occurred
    Failed { attempts: u32, error: Error },
}

impl ClickOutcome {
    pub fn is_clicked(&self) -> bool {
        matches!(self, ClickOutcome::Clicked { .. })
    }

    /// Click attempts made, faulted ones included
    pub fn attempts(&self) -> u32 {
        match self {
            ClickOutcome::Clicked { attempts }
            | ClickOutcome::Exhausted { attempts, .. }
            | ClickOutcome::Failed { attempts, .. } => *attempts,
        }
    }

    /// Turn a non-success into an error for callers that must not go on
    pub fn into_result(self, locator: &Locator) -> Result<()> {
        match self {
            ClickOutcome::Clicked { .. } => Ok(()),
            ClickOutcome::Exhausted {
                attempts,
                last_fault,
                last_error,
            } => Err(Error::not_clickable(
                locator.to_string(),
                format!("{} after {} attempts: {}", last_fault, attempts, last_error),
            )),
            ClickOutcome::Failed { error, .. } => Err(error),
        }
    }
}

impl Interactor {
    /// Click, re-resolving the locator and retrying on transient faults.
    ///
    /// Never fails: the outcome says whether the click landed and why not.
    #[instrument(skip_all, fields(locator = %locator))]
    pub async fn safe_click(&self, locator: &Locator) -> ClickOutcome {
        let policy = self.retry_policy();
        let max_attempts = policy.max_attempts();
        let mut attempt = 0;

        loop {
            attempt += 1;
            let error = match self.click_once(locator).await {
                Ok(()) => {
                    if attempt > 1 {
                        info!("Click on {} succeeded on attempt {}", locator, attempt);
                    }
                    return ClickOutcome::Clicked { attempts: attempt };
                }
                Err(e) => e,
            };

            let Some(fault) = error.transient_fault() else {
                warn!("Click on {} failed: {}", locator, error);
                return ClickOutcome::Failed {
                    attempts: attempt,
                    error,
                };
            };

            if attempt >= max_attempts {
                error!(
                    "Click on {} failed after {} attempts: {}",
                    locator, attempt, error
                );
                return ClickOutcome::Exhausted {
                    attempts: attempt,
                    last_fault: fault,
                    last_error: error,
                };
            }

            warn!(
                "Attempt {}/{} to click {} hit {}: {}",
                attempt, max_attempts, locator, fault, error
            );
            sleep(policy.backoff).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::{MockDriver, MockFault, MockNode};
    use crate::session::Session;
    use crate::wait::Timeouts;
    use std::sync::Arc;

    const BUTTON: Locator = Locator::css("button.cart");

    fn interactor(driver: &MockDriver, retry: RetryPolicy) -> (Session, Interactor) {
        let session = Session::start(Arc::new(driver.clone()));
        let ui = Interactor::new(session.handle(), Timeouts::default(), retry);
        (session, ui)
    }

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.retries, 2);
        assert_eq!(policy.backoff, Duration::from_millis(500));
        assert_eq!(policy.max_attempts(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_driver_fault_is_retried() {
        let driver = MockDriver::new();
        driver.insert(MockNode::new(BUTTON).fail_clicks([MockFault::Driver, MockFault::Intercepted]));
        let (_session, ui) = interactor(&driver, RetryPolicy::default());

        let outcome = ui.safe_click(&BUTTON).await;
        assert!(outcome.is_clicked());
        assert_eq!(outcome.attempts(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_retry_policy_gives_single_attempt() {
        let driver = MockDriver::new();
        driver.insert(MockNode::new(BUTTON).fail_clicks([MockFault::Stale]));
        let (_session, ui) = interactor(&driver, RetryPolicy::none());

        let outcome = ui.safe_click(&BUTTON).await;
        assert!(matches!(
            outcome,
            ClickOutcome::Exhausted {
                attempts: 1,
                last_fault: TransientFault::StaleElement,
                ..
            }
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_disabled_element_fails_without_retry() {
        let driver = MockDriver::new();
        driver.insert(MockNode::new(BUTTON).disabled());
        let (_session, ui) = interactor(&driver, RetryPolicy::default());

        let outcome = ui.within(Duration::from_secs(1)).safe_click(&BUTTON).await;
        assert_eq!(outcome.attempts(), 1);
        assert!(matches!(
            outcome.into_result(&BUTTON),
            Err(Error::NotClickable { .. })
        ));
        assert_eq!(driver.click_attempts(&BUTTON), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_click_converts_to_not_clickable() {
        let driver = MockDriver::new();
        driver.insert(MockNode::new(BUTTON).always_fail(MockFault::Intercepted));
        let (_session, ui) = interactor(&driver, RetryPolicy::default());

        let result = ui.click(&BUTTON).await;
        match result {
            Err(Error::NotClickable { reason, .. }) => {
                assert!(reason.contains("click intercepted"));
                assert!(reason.contains("3 attempts"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
