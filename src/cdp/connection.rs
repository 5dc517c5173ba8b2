//! CDP WebSocket connection implementation

use super::traits::{CdpConnection, CdpError as CdpErrorResponse, CdpEvent, CdpResponse};
use super::types::{CdpNotification, CdpRequest, CdpRpcResponse};
use crate::error::{Error, Result};
use async_trait::async_trait;
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, PoisonError};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot, Mutex};
use tokio::task::JoinHandle;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};
use tracing::{debug, error, info, trace, warn};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type PendingMap = Arc<Mutex<HashMap<u64, PendingCommand>>>;
type Subscribers = Arc<Mutex<Vec<mpsc::UnboundedSender<CdpEvent>>>>;

/// Per-command response timeouts
#[derive(Debug, Clone)]
struct CdpTimeoutConfig {
    default_timeout_secs: u64,
    screenshot_timeout_secs: u64,
    navigation_timeout_secs: u64,
    execution_timeout_secs: u64,
}

impl Default for CdpTimeoutConfig {
    fn default() -> Self {
        Self {
            default_timeout_secs: 30,
            screenshot_timeout_secs: 90,
            navigation_timeout_secs: 60,
            execution_timeout_secs: 30,
        }
    }
}

impl CdpTimeoutConfig {
    fn timeout_for(&self, method: &str) -> Duration {
        let method = method.to_lowercase();

        let secs = if method.contains("screenshot") {
            self.screenshot_timeout_secs
        } else if method.contains("navigate") || method.contains("reload") {
            self.navigation_timeout_secs
        } else if method.starts_with("runtime.evaluate") || method.starts_with("runtime.call") {
            self.execution_timeout_secs
        } else {
            self.default_timeout_secs
        };
        Duration::from_secs(secs)
    }
}

#[derive(Debug)]
struct PendingCommand {
    sender: oneshot::Sender<CdpResponse>,
    /// For logging
    method: String,
}

/// CDP connection over a WebSocket.
///
/// Writes go through the sink half under a lock; a spawned reader task owns
/// the stream half and routes responses to their waiting command and events
/// to every subscriber.
pub struct CdpWebSocketConnection {
    url: String,
    sink: Mutex<Option<SplitSink<WsStream, Message>>>,
    next_id: AtomicU64,
    pending: PendingMap,
    subscribers: Subscribers,
    is_active: Arc<AtomicBool>,
    timeout_config: CdpTimeoutConfig,
    reader: std::sync::Mutex<Option<JoinHandle<()>>>,
}

impl fmt::Debug for CdpWebSocketConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CdpWebSocketConnection")
            .field("url", &self.url)
            .field("next_id", &self.next_id)
            .field("is_active", &self.is_active)
            .finish_non_exhaustive()
    }
}

impl CdpWebSocketConnection {
    /// Connect to a target, e.g. `ws://localhost:9222/devtools/page/ABC123`
    pub async fn new<S: Into<String>>(url: S) -> Result<Arc<Self>> {
        let url = url.into();
        info!("Connecting to CDP target {}", url);

        let (ws_stream, _) = connect_async(url.as_str())
            .await
            .map_err(|e| Error::websocket(format!("Failed to connect to {}: {}", url, e)))?;
        let (sink, stream) = ws_stream.split();

        let connection = Arc::new(Self {
            url,
            sink: Mutex::new(Some(sink)),
            next_id: AtomicU64::new(1),
            pending: Arc::new(Mutex::new(HashMap::new())),
            subscribers: Arc::new(Mutex::new(Vec::new())),
            is_active: Arc::new(AtomicBool::new(true)),
            timeout_config: CdpTimeoutConfig::default(),
            reader: std::sync::Mutex::new(None),
        });

        let reader = tokio::spawn(Self::read_loop(
            stream,
            Arc::clone(&connection.pending),
            Arc::clone(&connection.subscribers),
            Arc::clone(&connection.is_active),
        ));
        *connection
            .reader
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(reader);

        info!("CDP WebSocket connection established");
        Ok(connection)
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn read_loop(
        mut stream: SplitStream<WsStream>,
        pending: PendingMap,
        subscribers: Subscribers,
        is_active: Arc<AtomicBool>,
    ) {
        debug!("CDP message loop started");

        while let Some(message) = stream.next().await {
            match message {
                Ok(Message::Text(text)) => Self::handle_message(&text, &pending, &subscribers).await,
                Ok(Message::Close(_)) => {
                    info!("WebSocket close frame received");
                    break;
                }
                Ok(_) => {}
                Err(e) => {
                    warn!("WebSocket error, stopping message loop: {}", e);
                    break;
                }
            }
        }

        is_active.store(false, Ordering::SeqCst);
        // Dropping the senders wakes every waiting command with an error
        let orphaned = std::mem::take(&mut *pending.lock().await);
        if !orphaned.is_empty() {
            warn!("{} CDP commands left without a response", orphaned.len());
        }
        debug!("CDP message loop exited");
    }

    async fn handle_message(text: &str, pending: &PendingMap, subscribers: &Subscribers) {
        trace!("Received message: {}", text);

        if let Ok(response) = serde_json::from_str::<CdpRpcResponse>(text) {
            Self::handle_response(response, pending).await;
        } else if let Ok(notification) = serde_json::from_str::<CdpNotification>(text) {
            Self::handle_notification(notification, subscribers).await;
        } else {
            warn!("Unknown message format: {}", text);
        }
    }

    async fn handle_response(response: CdpRpcResponse, pending: &PendingMap) {
        let Some(command) = pending.lock().await.remove(&response.id) else {
            debug!("Response for unknown or abandoned command {}", response.id);
            return;
        };
        trace!("Response for command {}: {}", response.id, command.method);

        let response = CdpResponse {
            id: response.id,
            result: Some(response.result),
            error: response.error.map(|e| CdpErrorResponse {
                code: e.code,
                message: e.message,
                data: e.data,
            }),
        };
        // The waiter may have given up already
        let _ = command.sender.send(response);
    }

    async fn handle_notification(notification: CdpNotification, subscribers: &Subscribers) {
        debug!("Received event: {}", notification.method);

        let event = CdpEvent {
            method: notification.method,
            params: notification.params,
            session_id: notification.session_id,
        };
        subscribers
            .lock()
            .await
            .retain(|sender| sender.send(event.clone()).is_ok());
    }

    async fn send_message(&self, message: Message) -> Result<()> {
        let mut sink = self.sink.lock().await;
        let sink = sink
            .as_mut()
            .ok_or_else(|| Error::websocket("WebSocket sink not available"))?;

        sink.send(message)
            .await
            .map_err(|e| Error::websocket(format!("Failed to send message: {}", e)))
    }
}

#[async_trait]
impl CdpConnection for CdpWebSocketConnection {
    async fn send_command(&self, method: &str, params: Value) -> Result<CdpResponse> {
        if !self.is_active() {
            return Err(Error::websocket("Connection is not active"));
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let request = CdpRequest {
            id,
            method: method.to_string(),
            params: if params.is_null() { None } else { Some(params) },
            session_id: None,
        };
        let json = serde_json::to_string(&request)?;
        debug!("Sending CDP command {}: {}", id, method);

        let (sender, receiver) = oneshot::channel();
        self.pending.lock().await.insert(
            id,
            PendingCommand {
                sender,
                method: method.to_string(),
            },
        );

        if let Err(e) = self.send_message(Message::Text(json)).await {
            self.pending.lock().await.remove(&id);
            return Err(e);
        }

        let timeout = self.timeout_config.timeout_for(method);
        match tokio::time::timeout(timeout, receiver).await {
            Ok(Ok(response)) => {
                if let Some(error) = &response.error {
                    return Err(Error::cdp(format!(
                        "{} failed: {} (code: {}){}",
                        method,
                        error.message,
                        error.code,
                        error.data.as_ref().map_or(String::new(), |d| format!(" {}", d))
                    )));
                }
                Ok(response)
            }
            Ok(Err(_)) => Err(Error::websocket(format!(
                "Connection closed while waiting for {}",
                method
            ))),
            Err(_) => {
                self.pending.lock().await.remove(&id);
                error!("CDP command {} ({}) timed out after {:?}", id, method, timeout);
                Err(Error::timeout(format!("CDP command {} timed out", method)))
            }
        }
    }

    async fn listen_events(&self) -> Result<mpsc::Receiver<CdpEvent>> {
        let (sender, receiver) = mpsc::channel(100);
        let (unbounded_sender, mut unbounded_receiver) = mpsc::unbounded_channel();
        self.subscribers.lock().await.push(unbounded_sender);

        tokio::spawn(async move {
            while let Some(event) = unbounded_receiver.recv().await {
                if sender.send(event).await.is_err() {
                    break;
                }
            }
        });

        Ok(receiver)
    }

    async fn close(&self) -> Result<()> {
        if !self.is_active.swap(false, Ordering::SeqCst) {
            debug!("CDP connection already closed");
        }
        info!("Closing CDP WebSocket connection");

        let result = match self.sink.lock().await.take() {
            Some(mut sink) => sink
                .close()
                .await
                .map_err(|e| Error::websocket(format!("Failed to close WebSocket: {}", e))),
            None => Ok(()),
        };

        if let Some(reader) = self
            .reader
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            reader.abort();
        }
        result
    }

    fn is_active(&self) -> bool {
        self.is_active.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_per_method() {
        let config = CdpTimeoutConfig::default();
        assert_eq!(config.timeout_for("Page.captureScreenshot"), Duration::from_secs(90));
        assert_eq!(config.timeout_for("Page.navigate"), Duration::from_secs(60));
        assert_eq!(config.timeout_for("Runtime.evaluate"), Duration::from_secs(30));
        assert_eq!(config.timeout_for("DOM.getDocument"), Duration::from_secs(30));
    }

    #[tokio::test]
    async fn test_connect_refused() {
        let result = CdpWebSocketConnection::new("ws://127.0.0.1:1/devtools/page/none").await;
        assert!(matches!(result, Err(Error::WebSocket(_))));
    }
}
