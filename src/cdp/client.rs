//! Typed CDP client over one connection

use super::js;
use super::traits::{CdpConnection, CdpEvent};
use super::types::EvaluateResponse;
use crate::error::{Error, Result};
use crate::wait::Timeouts;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

/// How long `navigate` waits for `document.readyState == "complete"`
const LOAD_TIMEOUT: Duration = Duration::from_secs(30);
const LOAD_POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone)]
pub struct CdpClient {
    connection: Arc<dyn CdpConnection>,
    load_timeouts: Timeouts,
}

impl CdpClient {
    pub fn new(connection: Arc<dyn CdpConnection>) -> Self {
        Self {
            connection,
            load_timeouts: Timeouts::new(LOAD_TIMEOUT, LOAD_POLL_INTERVAL),
        }
    }

    pub fn connection(&self) -> Arc<dyn CdpConnection> {
        Arc::clone(&self.connection)
    }

    /// Call a raw CDP method and return its `result`
    pub async fn call_method(&self, method: &str, params: Value) -> Result<Value> {
        let response = self.connection.send_command(method, params).await?;
        Ok(response.result.unwrap_or(Value::Null))
    }

    /// Enable a domain, e.g. `"Page"`
    pub async fn enable_domain(&self, domain: &str) -> Result<()> {
        self.call_method(&format!("{}.enable", domain), Value::Null)
            .await
            .map(|_| ())
    }

    pub async fn listen_events(&self) -> Result<mpsc::Receiver<CdpEvent>> {
        self.connection.listen_events().await
    }

    /// Evaluate an expression in the page and return its value by JSON.
    ///
    /// Promises are awaited; `undefined` comes back as `null`.
    pub async fn evaluate(&self, expression: &str) -> Result<Value> {
        let result = self
            .call_method(
                "Runtime.evaluate",
                json!({
                    "expression": expression,
                    "returnByValue": true,
                    "awaitPromise": true,
                }),
            )
            .await?;

        let response: EvaluateResponse = serde_json::from_value(result)
            .map_err(|e| Error::cdp(format!("Failed to parse Runtime.evaluate result: {}", e)))?;
        if let Some(exception) = response.exception_details {
            return Err(Error::script_execution_failed(exception.message()));
        }
        Ok(response.result.value.unwrap_or(Value::Null))
    }

    /// Navigate and wait for the document to finish loading
    #[instrument(skip(self))]
    pub async fn navigate(&self, url: &str) -> Result<()> {
        info!("Navigating to {}", url);
        let result = self.call_method("Page.navigate", json!({ "url": url })).await?;

        if let Some(error_text) = result
            .get("errorText")
            .and_then(Value::as_str)
            .filter(|text| !text.is_empty())
        {
            return Err(Error::navigation_failed(format!("{}: {}", url, error_text)));
        }

        // The old document may answer (or vanish) until the new one commits
        let loaded = self
            .load_timeouts
            .poll(|| async move {
                match self.evaluate(js::READY_STATE).await {
                    Ok(state) if state == "complete" => Ok(Some(())),
                    Ok(state) => {
                        debug!("Document ready state: {}", state);
                        Ok(None)
                    }
                    Err(e) => {
                        debug!("Ready state not readable yet: {}", e);
                        Ok(None)
                    }
                }
            })
            .await?;

        if loaded.is_none() {
            warn!("Page load polling timed out for {}, continuing anyway", url);
        }
        Ok(())
    }

    /// PNG screenshot of the viewport
    pub async fn screenshot(&self) -> Result<Vec<u8>> {
        debug!("Capturing screenshot");
        let result = self
            .call_method("Page.captureScreenshot", json!({ "format": "png" }))
            .await?;

        let data = result
            .get("data")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::cdp("Page.captureScreenshot returned no data"))?;
        BASE64
            .decode(data)
            .map_err(|e| Error::cdp(format!("Invalid screenshot data: {}", e)))
    }
}
