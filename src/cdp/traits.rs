//! CDP transport seam

use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::mpsc;

/// CDP event representation
#[derive(Debug, Clone)]
pub struct CdpEvent {
    /// Event method (e.g., "Page.javascriptDialogOpening")
    pub method: String,
    pub params: Value,
    /// Session ID (for multi-session targets)
    pub session_id: Option<String>,
}

/// CDP response representation
#[derive(Debug, Clone)]
pub struct CdpResponse {
    /// Matches the request ID
    pub id: u64,
    pub result: Option<Value>,
    pub error: Option<CdpError>,
}

/// CDP error representation
#[derive(Debug, Clone)]
pub struct CdpError {
    pub code: i32,
    pub message: String,
    pub data: Option<Value>,
}

/// Connection to one Chrome DevTools Protocol target
#[async_trait]
pub trait CdpConnection: Send + Sync + std::fmt::Debug {
    /// Send a CDP command and wait for its response.
    ///
    /// A protocol-level error reply is returned as `Error::Cdp`.
    async fn send_command(&self, method: &str, params: Value) -> Result<CdpResponse>;

    /// Subscribe to every event received from now on
    async fn listen_events(&self) -> Result<mpsc::Receiver<CdpEvent>>;

    async fn close(&self) -> Result<()>;

    fn is_active(&self) -> bool;
}
