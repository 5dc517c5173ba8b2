//! [`WebDriver`] backend speaking CDP to an already running Chrome

use super::client::CdpClient;
use super::connection::CdpWebSocketConnection;
use super::js::{self, JsArg};
use super::traits::CdpConnection;
use super::types::TargetDescriptor;
use crate::driver::{ElementHandle, ScriptArg, WebDriver, WebElement};
use crate::error::{Error, Result};
use crate::Locator;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

/// Open JavaScript dialog, tracked from `Page.javascriptDialog*` events
type DialogState = watch::Receiver<Option<String>>;

/// Tab opened through the DevTools HTTP endpoint; closed again on quit
#[derive(Debug, Clone)]
struct OwnedTarget {
    http_endpoint: String,
    id: String,
}

#[derive(Debug)]
pub struct CdpDriver {
    client: CdpClient,
    dialog: DialogState,
    target: Option<OwnedTarget>,
    closed: AtomicBool,
    event_task: std::sync::Mutex<Option<JoinHandle<()>>>,
}

fn http_endpoint(endpoint: &str) -> String {
    endpoint
        .trim_end_matches('/')
        .replace("ws://", "http://")
        .replace("wss://", "https://")
}

fn http_client() -> Result<reqwest::Client> {
    // DevTools endpoints are local; never route them through a proxy
    reqwest::Client::builder()
        .no_proxy()
        .build()
        .map_err(|e| Error::internal(format!("Failed to create HTTP client: {}", e)))
}

impl CdpDriver {
    /// Open a new tab on the Chrome listening at `endpoint`
    /// (e.g. `http://127.0.0.1:9222`) and drive it.
    #[instrument]
    pub async fn connect(endpoint: &str) -> Result<Self> {
        let http_endpoint = http_endpoint(endpoint);
        let url = format!("{}/json/new?about:blank", http_endpoint);
        debug!("Opening new target via {}", url);

        let target: TargetDescriptor = http_client()?
            .put(&url)
            .send()
            .await
            .map_err(|e| Error::driver(format!("Failed to reach browser at {}: {}", http_endpoint, e)))?
            .json()
            .await
            .map_err(|e| Error::driver(format!("Failed to parse new target: {}", e)))?;

        let ws_url = target
            .web_socket_debugger_url
            .clone()
            .ok_or_else(|| Error::driver(format!("Target {} has no WebSocket URL", target.id)))?;
        info!("Opened target {} ({})", target.id, target.target_type);

        let connection = CdpWebSocketConnection::new(ws_url).await?;
        let mut driver = Self::from_connection(connection).await?;
        driver.target = Some(OwnedTarget {
            http_endpoint,
            id: target.id,
        });
        Ok(driver)
    }

    /// Drive an existing target by its WebSocket debugger URL
    pub async fn attach(ws_url: &str) -> Result<Self> {
        let connection = CdpWebSocketConnection::new(ws_url).await?;
        Self::from_connection(connection).await
    }

    /// Drive the target behind an established connection
    pub async fn from_connection(connection: Arc<dyn CdpConnection>) -> Result<Self> {
        let client = CdpClient::new(connection);

        // Subscribe before enabling so no dialog event is missed
        let mut events = client.listen_events().await?;
        let (dialog_tx, dialog_rx) = watch::channel(None);
        let event_task = tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                match event.method.as_str() {
                    "Page.javascriptDialogOpening" => {
                        let message = event
                            .params
                            .get("message")
                            .and_then(Value::as_str)
                            .unwrap_or_default()
                            .to_string();
                        debug!("Dialog opened: {}", message);
                        dialog_tx.send_replace(Some(message));
                    }
                    "Page.javascriptDialogClosed" => {
                        dialog_tx.send_replace(None);
                    }
                    _ => {}
                }
            }
        });

        client.enable_domain("Page").await?;
        client.enable_domain("Runtime").await?;

        Ok(Self {
            client,
            dialog: dialog_rx,
            target: None,
            closed: AtomicBool::new(false),
            event_task: std::sync::Mutex::new(Some(event_task)),
        })
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(Error::SessionClosed);
        }
        Ok(())
    }

    /// Let the browser save downloads into `dir` without prompting
    pub async fn set_download_dir(&self, dir: &Path) -> Result<()> {
        self.ensure_open()?;
        let dir = if dir.is_absolute() {
            dir.to_path_buf()
        } else {
            std::env::current_dir()?.join(dir)
        };
        let params = json!({
            "behavior": "allow",
            "downloadPath": dir.to_string_lossy(),
        });

        if let Err(e) = self
            .client
            .call_method("Browser.setDownloadBehavior", params.clone())
            .await
        {
            debug!("Browser.setDownloadBehavior unavailable ({}), using Page domain", e);
            self.client
                .call_method("Page.setDownloadBehavior", params)
                .await?;
        }
        info!("Downloads go to {}", dir.display());
        Ok(())
    }

    async fn handle_dialog(&self, accept: bool) -> Result<()> {
        self.ensure_open()?;
        if self.dialog.borrow().is_none() {
            return Err(Error::AlertNotPresent);
        }
        self.client
            .call_method("Page.handleJavaScriptDialog", json!({ "accept": accept }))
            .await?;
        Ok(())
    }
}

#[async_trait]
impl WebDriver for CdpDriver {
    async fn navigate(&self, url: &str) -> Result<()> {
        self.ensure_open()?;
        self.client.navigate(url).await
    }

    async fn current_url(&self) -> Result<String> {
        self.ensure_open()?;
        let href = self.client.evaluate(js::LOCATION).await?;
        Ok(href.as_str().unwrap_or_default().to_string())
    }

    async fn find_elements(&self, locator: &Locator) -> Result<Vec<ElementHandle>> {
        self.ensure_open()?;
        let prefix = format!("pom-{}-", uuid::Uuid::new_v4().simple());
        let tags = self.client.evaluate(&js::tag_matches(locator, &prefix)).await?;

        let elements: Vec<ElementHandle> = tags
            .as_array()
            .map(|tags| {
                tags.iter()
                    .filter_map(Value::as_str)
                    .map(|reference| {
                        Arc::new(CdpElement {
                            client: self.client.clone(),
                            reference: reference.to_string(),
                            dialog: self.dialog.clone(),
                        }) as ElementHandle
                    })
                    .collect()
            })
            .unwrap_or_default();
        Ok(elements)
    }

    async fn execute_script(&self, script: &str, args: Vec<ScriptArg>) -> Result<Value> {
        self.ensure_open()?;
        let args: Vec<JsArg> = args
            .into_iter()
            .map(|arg| match arg {
                ScriptArg::Value(value) => JsArg::Value(value),
                ScriptArg::Element(element) => JsArg::Element(element.element_id().to_string()),
            })
            .collect();

        let result = self.client.evaluate(&js::call_script(script, &args)).await?;
        js::unwrap_envelope(result, "script argument")
    }

    async fn screenshot(&self) -> Result<Vec<u8>> {
        self.ensure_open()?;
        self.client.screenshot().await
    }

    async fn alert_text(&self) -> Result<Option<String>> {
        self.ensure_open()?;
        Ok(self.dialog.borrow().clone())
    }

    async fn accept_alert(&self) -> Result<()> {
        self.handle_dialog(true).await
    }

    async fn dismiss_alert(&self) -> Result<()> {
        self.handle_dialog(false).await
    }

    async fn quit(&self) -> Result<()> {
        if self.closed.swap(true, Ordering::SeqCst) {
            debug!("CDP driver already quit");
            return Ok(());
        }
        info!("Quitting CDP driver");

        if let Some(task) = self
            .event_task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            task.abort();
        }
        let closed = self.client.connection().close().await;

        if let Some(target) = &self.target {
            let url = format!("{}/json/close/{}", target.http_endpoint, target.id);
            match http_client()?.get(&url).send().await {
                Ok(_) => debug!("Closed target {}", target.id),
                Err(e) => warn!("Failed to close target {}: {}", target.id, e),
            }
        }
        closed
    }
}

/// Resolves once a dialog is open; never when the event stream has ended
async fn dialog_opened(dialog: &mut DialogState) {
    if dialog.wait_for(Option::is_some).await.is_err() {
        std::future::pending::<()>().await;
    }
}

/// Element tagged in the page with a `data-pom-ref` attribute
#[derive(Debug)]
pub struct CdpElement {
    client: CdpClient,
    reference: String,
    dialog: DialogState,
}

impl CdpElement {
    async fn run(&self, body: &str) -> Result<Value> {
        let result = self.client.evaluate(&js::on_element(&self.reference, body)).await?;
        js::unwrap_envelope(result, &self.reference)
    }

    async fn mouse_event(&self, kind: &str, x: f64, y: f64) -> Result<()> {
        self.client
            .call_method(
                "Input.dispatchMouseEvent",
                json!({
                    "type": kind,
                    "x": x,
                    "y": y,
                    "button": "left",
                    "clickCount": 1,
                }),
            )
            .await
            .map(|_| ())
    }
}

#[async_trait]
impl WebElement for CdpElement {
    fn element_id(&self) -> &str {
        &self.reference
    }

    async fn is_displayed(&self) -> Result<bool> {
        Ok(self.run(js::IS_DISPLAYED).await?.as_bool().unwrap_or(false))
    }

    async fn is_enabled(&self) -> Result<bool> {
        Ok(self.run(js::IS_ENABLED).await?.as_bool().unwrap_or(false))
    }

    async fn is_selected(&self) -> Result<bool> {
        Ok(self.run(js::IS_SELECTED).await?.as_bool().unwrap_or(false))
    }

    async fn click(&self) -> Result<()> {
        let target = self.run(js::CLICK_TARGET).await?;
        if let Some(blocker) = target.get("intercepted").and_then(Value::as_str) {
            return Err(Error::intercepted(format!(
                "{} would receive the click on {}",
                blocker, self.reference
            )));
        }
        let (Some(x), Some(y)) = (
            target.get("x").and_then(Value::as_f64),
            target.get("y").and_then(Value::as_f64),
        ) else {
            return Err(Error::driver(format!("No click point for {}", self.reference)));
        };

        self.mouse_event("mouseMoved", x, y).await?;
        self.mouse_event("mousePressed", x, y).await?;

        // A dialog opened by the click blocks the release until it is handled
        let mut dialog = self.dialog.clone();
        tokio::select! {
            released = self.mouse_event("mouseReleased", x, y) => released,
            _ = dialog_opened(&mut dialog) => {
                debug!("Click on {} opened a dialog", self.reference);
                Ok(())
            }
        }
    }

    async fn hover(&self) -> Result<()> {
        let target = self.run(js::POINTER_TARGET).await?;
        let (Some(x), Some(y)) = (
            target.get("x").and_then(Value::as_f64),
            target.get("y").and_then(Value::as_f64),
        ) else {
            return Err(Error::driver(format!("No pointer position for {}", self.reference)));
        };
        self.client
            .call_method(
                "Input.dispatchMouseEvent",
                json!({ "type": "mouseMoved", "x": x, "y": y, "button": "none" }),
            )
            .await
            .map(|_| ())
    }

    async fn clear(&self) -> Result<()> {
        self.run(js::CLEAR).await.map(|_| ())
    }

    async fn send_keys(&self, text: &str) -> Result<()> {
        self.run(js::FOCUS).await?;
        self.client
            .call_method("Input.insertText", json!({ "text": text }))
            .await
            .map(|_| ())
    }

    async fn text(&self) -> Result<String> {
        let text = self.run(js::TEXT).await?;
        Ok(text.as_str().unwrap_or_default().to_string())
    }

    async fn attribute(&self, name: &str) -> Result<Option<String>> {
        let value = self.run(&js::attribute(name)).await?;
        Ok(value.as_str().map(str::to_string))
    }

    async fn select_by_value(&self, value: &str) -> Result<()> {
        let found = self.run(&js::select_by_value(value)).await?;
        if found.as_bool().unwrap_or(false) {
            Ok(())
        } else {
            Err(Error::driver(format!(
                "No option with value {:?} in {}",
                value, self.reference
            )))
        }
    }

    async fn set_files(&self, paths: &[String]) -> Result<()> {
        let document = self
            .client
            .call_method("DOM.getDocument", json!({ "depth": 0 }))
            .await?;
        let root = document
            .pointer("/root/nodeId")
            .and_then(Value::as_i64)
            .ok_or_else(|| Error::cdp("DOM.getDocument returned no root node"))?;

        let selector = format!("[{}=\"{}\"]", js::REF_ATTRIBUTE, self.reference);
        let node = self
            .client
            .call_method(
                "DOM.querySelector",
                json!({ "nodeId": root, "selector": selector }),
            )
            .await?
            .get("nodeId")
            .and_then(Value::as_i64)
            .unwrap_or(0);
        if node == 0 {
            return Err(Error::stale(format!(
                "{} is no longer attached to the document",
                self.reference
            )));
        }

        self.client
            .call_method(
                "DOM.setFileInputFiles",
                json!({ "files": paths, "nodeId": node }),
            )
            .await
            .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_endpoint_normalisation() {
        assert_eq!(http_endpoint("ws://127.0.0.1:9222/"), "http://127.0.0.1:9222");
        assert_eq!(http_endpoint("http://localhost:9222"), "http://localhost:9222");
    }
}
