//! Unified error types for the storefront page-object framework

use crate::diagnostics::AssertionFailure;
use std::fmt;
use thiserror::Error;

/// Unified Result type
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type
#[derive(Error, Debug)]
pub enum Error {
    /// Locator did not resolve to a present (or visible) element in time
    #[error("Element not found: {locator} (waited {timeout_ms}ms)")]
    NotFound { locator: String, timeout_ms: u64 },

    /// Element never became clickable, or kept failing past the retry budget
    #[error("Element not clickable: {locator}: {reason}")]
    NotClickable { locator: String, reason: String },

    /// Element handle is no longer attached to the document
    #[error("Stale element: {0}")]
    StaleElement(String),

    /// Another element would receive the click
    #[error("Click intercepted: {0}")]
    ClickIntercepted(String),

    /// Generic driver communication fault
    #[error("Driver error: {0}")]
    Driver(String),

    /// Alert operation requested while no alert is open
    #[error("No alert is present")]
    AlertNotPresent,

    /// Operation on a session that has already been quit
    #[error("Session is closed")]
    SessionClosed,

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// WebSocket errors
    #[error("WebSocket error: {0}")]
    WebSocket(String),

    /// CDP protocol errors
    #[error("CDP error: {0}")]
    Cdp(String),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Timeout
    #[error("Operation timeout: {0}")]
    Timeout(String),

    /// Navigation failed
    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    /// Script execution failed
    #[error("Script execution failed: {0}")]
    ScriptExecutionFailed(String),

    /// Verification failed
    #[error("{0}")]
    Assertion(Box<AssertionFailure>),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Interaction faults that are worth retrying.
///
/// These never escape the resilience wrapper on their own: a click either
/// recovers from them or reports the last one inside its outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransientFault {
    StaleElement,
    ClickIntercepted,
    DriverCommunication,
}

impl fmt::Display for TransientFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransientFault::StaleElement => "stale element",
            TransientFault::ClickIntercepted => "click intercepted",
            TransientFault::DriverCommunication => "driver communication fault",
        };
        f.write_str(name)
    }
}

impl Error {
    /// Create a new not found error
    pub fn not_found<S: Into<String>>(locator: S, timeout_ms: u64) -> Self {
        Error::NotFound {
            locator: locator.into(),
            timeout_ms,
        }
    }

    /// Create a new not clickable error
    pub fn not_clickable<L: Into<String>, R: Into<String>>(locator: L, reason: R) -> Self {
        Error::NotClickable {
            locator: locator.into(),
            reason: reason.into(),
        }
    }

    /// Create a new stale element error
    pub fn stale<S: Into<String>>(msg: S) -> Self {
        Error::StaleElement(msg.into())
    }

    /// Create a new click intercepted error
    pub fn intercepted<S: Into<String>>(msg: S) -> Self {
        Error::ClickIntercepted(msg.into())
    }

    /// Create a new driver error
    pub fn driver<S: Into<String>>(msg: S) -> Self {
        Error::Driver(msg.into())
    }

    /// Create a new WebSocket error
    pub fn websocket<S: Into<String>>(msg: S) -> Self {
        Error::WebSocket(msg.into())
    }

    /// Create a new CDP error
    pub fn cdp<S: Into<String>>(msg: S) -> Self {
        Error::Cdp(msg.into())
    }

    /// Create a new timeout error
    pub fn timeout<S: Into<String>>(msg: S) -> Self {
        Error::Timeout(msg.into())
    }

    /// Create a new navigation failed error
    pub fn navigation_failed<S: Into<String>>(msg: S) -> Self {
        Error::NavigationFailed(msg.into())
    }

    /// Create a new script execution failed error
    pub fn script_execution_failed<S: Into<String>>(msg: S) -> Self {
        Error::ScriptExecutionFailed(msg.into())
    }

    /// Create a new configuration error
    pub fn configuration<S: Into<String>>(msg: S) -> Self {
        Error::Configuration(msg.into())
    }

    /// Create a new internal error
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Error::Internal(msg.into())
    }

    /// Classify this error as a retryable interaction fault, if it is one
    pub fn transient_fault(&self) -> Option<TransientFault> {
        match self {
            Error::StaleElement(_) => Some(TransientFault::StaleElement),
            Error::ClickIntercepted(_) => Some(TransientFault::ClickIntercepted),
            Error::Driver(_) | Error::Cdp(_) => Some(TransientFault::DriverCommunication),
            _ => None,
        }
    }

    /// Whether polling or retrying may make this error go away
    pub fn is_transient(&self) -> bool {
        self.transient_fault().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert_eq!(
            Error::stale("gone").transient_fault(),
            Some(TransientFault::StaleElement)
        );
        assert_eq!(
            Error::intercepted("overlay").transient_fault(),
            Some(TransientFault::ClickIntercepted)
        );
        assert_eq!(
            Error::cdp("target crashed").transient_fault(),
            Some(TransientFault::DriverCommunication)
        );
        assert!(!Error::SessionClosed.is_transient());
        assert!(!Error::AlertNotPresent.is_transient());
        assert!(!Error::not_found("css=.x", 10).is_transient());
        assert!(!Error::websocket("closed").is_transient());
    }

    #[test]
    fn test_not_found_message_names_locator() {
        let err = Error::not_found("id=subscribe", 10_000);
        let text = err.to_string();
        assert!(text.contains("id=subscribe"));
        assert!(text.contains("10000ms"));
    }
}
