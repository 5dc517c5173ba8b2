//! Driver capability traits
//!
//! The page-object layer only ever talks to a browser through these two
//! traits. Backends: [`crate::cdp::CdpDriver`] for a live Chrome and
//! [`crate::driver::MockDriver`] for in-memory tests.

use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// Shared handle to a resolved element
pub type ElementHandle = Arc<dyn WebElement>;

/// Argument passed to [`WebDriver::execute_script`], exposed to the script as
/// `arguments[i]`
#[derive(Debug, Clone)]
pub enum ScriptArg {
    Value(Value),
    Element(ElementHandle),
}

impl From<ElementHandle> for ScriptArg {
    fn from(element: ElementHandle) -> Self {
        ScriptArg::Element(element)
    }
}

impl From<Value> for ScriptArg {
    fn from(value: Value) -> Self {
        ScriptArg::Value(value)
    }
}

/// Browser-level capability
#[async_trait]
pub trait WebDriver: Send + Sync + std::fmt::Debug {
    /// Load a URL in the current tab
    async fn navigate(&self, url: &str) -> Result<()>;

    /// URL of the current document
    async fn current_url(&self) -> Result<String>;

    /// Resolve every element currently matching the locator.
    ///
    /// An empty vector means "nothing matches right now", never an error.
    async fn find_elements(&self, locator: &crate::Locator) -> Result<Vec<ElementHandle>>;

    /// Run a script with positional arguments and return its JSON result
    async fn execute_script(&self, script: &str, args: Vec<ScriptArg>) -> Result<Value>;

    /// PNG screenshot of the viewport
    async fn screenshot(&self) -> Result<Vec<u8>>;

    /// Text of the open alert, `None` when no alert is open
    async fn alert_text(&self) -> Result<Option<String>>;

    /// Accept the open alert; `Error::AlertNotPresent` when there is none
    async fn accept_alert(&self) -> Result<()>;

    /// Dismiss the open alert; `Error::AlertNotPresent` when there is none
    async fn dismiss_alert(&self) -> Result<()>;

    /// Release the browser session
    async fn quit(&self) -> Result<()>;
}

/// Element-level capability
#[async_trait]
pub trait WebElement: Send + Sync + std::fmt::Debug {
    /// Backend-specific reference of this element
    fn element_id(&self) -> &str;

    async fn is_displayed(&self) -> Result<bool>;

    async fn is_enabled(&self) -> Result<bool>;

    async fn is_selected(&self) -> Result<bool>;

    async fn click(&self) -> Result<()>;

    /// Move the pointer over the element with native input events
    async fn hover(&self) -> Result<()>;

    async fn clear(&self) -> Result<()>;

    async fn send_keys(&self, text: &str) -> Result<()>;

    /// Rendered text of the element
    async fn text(&self) -> Result<String>;

    async fn attribute(&self, name: &str) -> Result<Option<String>>;

    /// Choose the `<option>` with the given value of a `<select>`
    async fn select_by_value(&self, value: &str) -> Result<()>;

    /// Attach local files to an `<input type="file">`
    async fn set_files(&self, paths: &[String]) -> Result<()>;
}
