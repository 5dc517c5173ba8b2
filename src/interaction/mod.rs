//! Interaction primitives
//!
//! Every primitive resolves its locator through the polling engine, so page
//! objects never see a half-loaded page: they either get a ready element or a
//! typed error once the timeout has elapsed.

mod resilience;

pub use resilience::{ClickOutcome, RetryPolicy};

use crate::diagnostics::DiagnosticSnapshot;
use crate::driver::{scripts, ElementHandle, ScriptArg, WebDriver};
use crate::error::{Error, Result};
use crate::session::SessionHandle;
use crate::wait::Timeouts;
use crate::Locator;
use chrono::Utc;
use serde_json::Value;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Readiness {
    Present,
    Visible,
    Clickable,
}

/// Locator-driven operations against one session
#[derive(Debug, Clone)]
pub struct Interactor {
    session: SessionHandle,
    timeouts: Timeouts,
    retry: RetryPolicy,
}

impl Interactor {
    pub fn new(session: SessionHandle, timeouts: Timeouts, retry: RetryPolicy) -> Self {
        Self {
            session,
            timeouts,
            retry,
        }
    }

    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    pub fn timeouts(&self) -> Timeouts {
        self.timeouts
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// Copy of this interactor whose waits use `timeout`
    pub fn within(&self, timeout: Duration) -> Self {
        Self {
            timeouts: self.timeouts.with_timeout(timeout),
            ..self.clone()
        }
    }

    /// Copy of this interactor with a different click retry policy
    pub fn with_retry(&self, retry: RetryPolicy) -> Self {
        Self {
            retry,
            ..self.clone()
        }
    }

    fn driver(&self) -> Result<&dyn WebDriver> {
        self.session.driver()
    }

    fn timeout_ms(&self) -> u64 {
        self.timeouts.timeout.as_millis() as u64
    }

    async fn check(&self, locator: &Locator, readiness: Readiness) -> Result<Option<ElementHandle>> {
        let elements = self.driver()?.find_elements(locator).await?;
        for element in elements {
            let ready = match readiness {
                Readiness::Present => true,
                Readiness::Visible => element.is_displayed().await?,
                Readiness::Clickable => {
                    element.is_displayed().await? && element.is_enabled().await?
                }
            };
            if ready {
                return Ok(Some(element));
            }
        }
        Ok(None)
    }

    async fn wait_for(&self, locator: &Locator, readiness: Readiness) -> Result<Option<ElementHandle>> {
        self.timeouts.poll(move || self.check(locator, readiness)).await
    }

    /// Wait until the locator matches an element attached to the document
    #[instrument(skip_all, fields(locator = %locator))]
    pub async fn find_present(&self, locator: &Locator) -> Result<ElementHandle> {
        debug!("Waiting for presence");
        self.wait_for(locator, Readiness::Present)
            .await?
            .ok_or_else(|| Error::not_found(locator.to_string(), self.timeout_ms()))
    }

    /// Wait until the locator matches a rendered element
    #[instrument(skip_all, fields(locator = %locator))]
    pub async fn find_visible(&self, locator: &Locator) -> Result<ElementHandle> {
        debug!("Waiting for visibility");
        self.wait_for(locator, Readiness::Visible)
            .await?
            .ok_or_else(|| Error::not_found(locator.to_string(), self.timeout_ms()))
    }

    /// Every element the locator matches once at least one is present.
    ///
    /// Returns an empty vector when nothing shows up within the timeout.
    #[instrument(skip_all, fields(locator = %locator))]
    pub async fn find_all(&self, locator: &Locator) -> Result<Vec<ElementHandle>> {
        let found = self
            .timeouts
            .poll(|| async move {
                let elements = self.driver()?.find_elements(locator).await?;
                Ok((!elements.is_empty()).then_some(elements))
            })
            .await?;

        match found {
            Some(elements) => {
                debug!("Found {} elements", elements.len());
                Ok(elements)
            }
            None => {
                debug!("No elements found within {}ms", self.timeout_ms());
                Ok(Vec::new())
            }
        }
    }

    /// Wait until one of `locators` is visible and return its index
    pub async fn wait_for_any(&self, locators: &[Locator]) -> Result<usize> {
        let found = self
            .timeouts
            .poll(|| async move {
                for (index, locator) in locators.iter().enumerate() {
                    if self.check(locator, Readiness::Visible).await?.is_some() {
                        return Ok(Some(index));
                    }
                }
                Ok(None)
            })
            .await?;

        found.ok_or_else(|| {
            let names: Vec<String> = locators.iter().map(|l| l.to_string()).collect();
            Error::not_found(names.join(" | "), self.timeout_ms())
        })
    }

    /// Wait until no rendered element matches the locator
    #[instrument(skip_all, fields(locator = %locator))]
    pub async fn wait_until_gone(&self, locator: &Locator) -> Result<bool> {
        let gone = self
            .timeouts
            .poll(|| async move {
                let visible = self.check(locator, Readiness::Visible).await?;
                Ok(visible.is_none().then_some(()))
            })
            .await?;
        Ok(gone.is_some())
    }

    /// Wait until the locator matches a rendered, enabled element
    async fn find_clickable(&self, locator: &Locator) -> Result<ElementHandle> {
        self.wait_for(locator, Readiness::Clickable)
            .await?
            .ok_or_else(|| {
                Error::not_clickable(
                    locator.to_string(),
                    format!("not visible and enabled within {}ms", self.timeout_ms()),
                )
            })
    }

    /// One resolve-then-click round, no retries
    async fn click_once(&self, locator: &Locator) -> Result<()> {
        let element = self.find_clickable(locator).await?;
        element.click().await
    }

    /// Click with the retry policy applied; fails with `Error::NotClickable`
    /// once the budget is spent
    pub async fn click(&self, locator: &Locator) -> Result<()> {
        self.safe_click(locator).await.into_result(locator)
    }

    /// Replace the content of an input with `text`
    pub async fn type_text(&self, locator: &Locator, text: &str) -> Result<()> {
        self.type_text_with(locator, text, true).await
    }

    #[instrument(skip_all, fields(locator = %locator))]
    pub async fn type_text_with(&self, locator: &Locator, text: &str, clear_first: bool) -> Result<()> {
        let element = self.find_visible(locator).await?;
        if clear_first {
            element.clear().await?;
        }
        debug!("Typing {} characters", text.chars().count());
        element.send_keys(text).await
    }

    /// Trimmed text of the first visible match
    #[instrument(skip_all, fields(locator = %locator))]
    pub async fn read_text(&self, locator: &Locator) -> Result<String> {
        let element = self.find_visible(locator).await?;
        let text = element.text().await?;
        Ok(text.trim().to_string())
    }

    /// Trimmed, non-empty texts of every match
    pub async fn read_texts(&self, locator: &Locator) -> Result<Vec<String>> {
        let mut texts = Vec::new();
        for element in self.find_all(locator).await? {
            match element.text().await {
                Ok(text) if !text.trim().is_empty() => texts.push(text.trim().to_string()),
                Ok(_) => {}
                Err(e) if e.is_transient() => debug!("Skipping element: {}", e),
                Err(e) => return Err(e),
            }
        }
        Ok(texts)
    }

    pub async fn read_attribute(&self, locator: &Locator, name: &str) -> Result<Option<String>> {
        self.find_present(locator).await?.attribute(name).await
    }

    /// Whether the locator becomes visible within the timeout. Never fails.
    pub async fn is_visible(&self, locator: &Locator) -> bool {
        match self.find_visible(locator).await {
            Ok(_) => true,
            Err(Error::NotFound { .. }) => false,
            Err(e) => {
                debug!("Visibility check for {} failed: {}", locator, e);
                false
            }
        }
    }

    /// Whether the locator becomes present within the timeout. Never fails.
    pub async fn is_present(&self, locator: &Locator) -> bool {
        match self.find_present(locator).await {
            Ok(_) => true,
            Err(Error::NotFound { .. }) => false,
            Err(e) => {
                debug!("Presence check for {} failed: {}", locator, e);
                false
            }
        }
    }

    pub async fn is_selected(&self, locator: &Locator) -> Result<bool> {
        self.find_present(locator).await?.is_selected().await
    }

    /// Center the element in the viewport
    pub async fn scroll_into_view(&self, locator: &Locator) -> Result<()> {
        let element = self.find_present(locator).await?;
        self.driver()?
            .execute_script(scripts::SCROLL_INTO_VIEW, vec![ScriptArg::Element(element)])
            .await?;
        Ok(())
    }

    /// Move the pointer over the element, dispatching synthetic hover
    /// events when native input fails
    pub async fn hover(&self, locator: &Locator) -> Result<()> {
        let element = self.find_visible(locator).await?;
        if let Err(e) = element.hover().await {
            if matches!(e, Error::SessionClosed) {
                return Err(e);
            }
            debug!("Native hover over {} failed ({}), using script", locator, e);
            self.driver()?
                .execute_script(scripts::HOVER, vec![ScriptArg::Element(element)])
                .await?;
        }
        Ok(())
    }

    #[instrument(skip_all, fields(locator = %locator))]
    pub async fn select_by_value(&self, locator: &Locator, value: &str) -> Result<()> {
        self.find_visible(locator).await?.select_by_value(value).await
    }

    /// Attach a local file to a file input
    pub async fn upload_file(&self, locator: &Locator, path: impl AsRef<Path>) -> Result<()> {
        let absolute = tokio::fs::canonicalize(path.as_ref()).await?;
        let absolute = absolute.to_string_lossy().into_owned();
        info!("Uploading {} via {}", absolute, locator);
        self.find_present(locator).await?.set_files(&[absolute]).await
    }

    pub async fn execute_script(&self, script: &str, args: Vec<ScriptArg>) -> Result<Value> {
        self.driver()?.execute_script(script, args).await
    }

    pub async fn scroll_to_top(&self) -> Result<()> {
        self.execute_script(scripts::SCROLL_TO_TOP, Vec::new()).await?;
        Ok(())
    }

    pub async fn scroll_to_bottom(&self) -> Result<()> {
        self.execute_script(scripts::SCROLL_TO_BOTTOM, Vec::new()).await?;
        Ok(())
    }

    /// Vertical scroll offset of the window in pixels
    pub async fn scroll_offset(&self) -> Result<i64> {
        let value = self.execute_script(scripts::SCROLL_OFFSET, Vec::new()).await?;
        Ok(value.as_f64().map_or(0, |v| v as i64))
    }

    #[instrument(skip(self))]
    pub async fn navigate_to(&self, url: &str) -> Result<()> {
        info!("Navigating to {}", url);
        self.driver()?.navigate(url).await
    }

    pub async fn current_url(&self) -> Result<String> {
        self.driver()?.current_url().await
    }

    /// PNG of the viewport; empty when the driver cannot produce one
    pub async fn take_screenshot(&self) -> Vec<u8> {
        let shot = match self.driver() {
            Ok(driver) => driver.screenshot().await,
            Err(e) => Err(e),
        };
        shot.unwrap_or_else(|e| {
            warn!("Screenshot failed: {}", e);
            Vec::new()
        })
    }

    /// Serialized DOM of the current document
    pub async fn page_source(&self) -> Result<String> {
        match self.execute_script(scripts::PAGE_SOURCE, Vec::new()).await? {
            Value::String(html) => Ok(html),
            other => Err(Error::ScriptExecutionFailed(format!(
                "Page source script returned {}",
                other
            ))),
        }
    }

    /// URL, screenshot and page source of the current page. Never fails.
    pub async fn capture_snapshot(&self) -> DiagnosticSnapshot {
        let url = match self.current_url().await {
            Ok(url) => Some(url),
            Err(e) => {
                warn!("Could not read current URL for snapshot: {}", e);
                None
            }
        };
        let page_source = match self.page_source().await {
            Ok(html) => Some(html),
            Err(e) => {
                warn!("Could not read page source for snapshot: {}", e);
                None
            }
        };
        DiagnosticSnapshot {
            session_id: self.session.id().to_string(),
            url,
            screenshot: self.take_screenshot().await,
            page_source,
            captured_at: Utc::now(),
        }
    }

    /// Text of the open alert; `AlertNotPresent` when none is open
    pub async fn alert_text(&self) -> Result<String> {
        self.driver()?
            .alert_text()
            .await?
            .ok_or(Error::AlertNotPresent)
    }

    /// Whether an alert is open. Never raises.
    pub async fn is_alert_present(&self) -> bool {
        match self.driver() {
            Ok(driver) => matches!(driver.alert_text().await, Ok(Some(_))),
            Err(_) => false,
        }
    }

    /// Wait for an alert to open and return its text
    pub async fn wait_for_alert(&self) -> Result<String> {
        self.timeouts
            .poll(|| async move { self.driver()?.alert_text().await })
            .await?
            .ok_or(Error::AlertNotPresent)
    }

    /// Wait for an alert, accept it and return its text
    pub async fn accept_alert(&self) -> Result<String> {
        let text = self.wait_for_alert().await?;
        self.driver()?.accept_alert().await?;
        info!("Accepted alert: {}", text);
        Ok(text)
    }

    /// Wait for an alert, dismiss it and return its text
    pub async fn dismiss_alert(&self) -> Result<String> {
        let text = self.wait_for_alert().await?;
        self.driver()?.dismiss_alert().await?;
        info!("Dismissed alert: {}", text);
        Ok(text)
    }
}
