//! Browser session lifecycle
//!
//! A [`Session`] owns the driver and is the only thing that can quit it.
//! Page objects, components and the navigator hold a [`SessionHandle`]: a
//! cheap clone that can use the session but never end it. [`with_session`]
//! is the scoped acquisition every test body runs inside.

use crate::driver::WebDriver;
use crate::error::{Error, Result};
use futures::FutureExt;
use std::future::Future;
use std::panic::{resume_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

#[derive(Debug)]
struct SessionInner {
    id: String,
    driver: Arc<dyn WebDriver>,
    closed: AtomicBool,
}

/// Shared, non-owning reference to a live session
#[derive(Debug, Clone)]
pub struct SessionHandle {
    inner: Arc<SessionInner>,
}

impl SessionHandle {
    pub fn id(&self) -> &str {
        &self.inner.id
    }

    /// The driver, or `Error::SessionClosed` once the session has been quit
    pub fn driver(&self) -> Result<&dyn WebDriver> {
        if self.is_closed() {
            return Err(Error::SessionClosed);
        }
        Ok(self.inner.driver.as_ref())
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::SeqCst)
    }

    /// Whether both handles refer to the same session
    pub fn same_session(&self, other: &SessionHandle) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

/// Owner of a browser session
#[derive(Debug)]
pub struct Session {
    handle: SessionHandle,
}

impl Session {
    /// Take ownership of a connected driver
    pub fn start(driver: Arc<dyn WebDriver>) -> Self {
        let id = Uuid::new_v4().to_string();
        info!("Starting browser session {}", id);
        Self {
            handle: SessionHandle {
                inner: Arc::new(SessionInner {
                    id,
                    driver,
                    closed: AtomicBool::new(false),
                }),
            },
        }
    }

    pub fn handle(&self) -> SessionHandle {
        self.handle.clone()
    }

    pub fn id(&self) -> &str {
        self.handle.id()
    }

    /// Quit the browser. Only the first call reaches the driver.
    pub async fn quit(&self) -> Result<()> {
        let inner = &self.handle.inner;
        if inner.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }

        info!("Quitting browser session {}", inner.id);
        inner.driver.quit().await.map_err(|e| {
            error!("Failed to quit session {}: {}", inner.id, e);
            e
        })
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        let inner = &self.handle.inner;
        if inner.closed.swap(true, Ordering::SeqCst) {
            return;
        }

        warn!("Session {} dropped without quit", inner.id);
        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                let driver = Arc::clone(&inner.driver);
                let id = inner.id.clone();
                runtime.spawn(async move {
                    if let Err(e) = driver.quit().await {
                        error!("Background quit of session {} failed: {}", id, e);
                    }
                });
            }
            Err(_) => warn!("No runtime available to quit session {}", inner.id),
        }
    }
}

/// Run `body` with a fresh session and quit it afterwards, whether the body
/// returns, fails or panics.
///
/// A panic is resumed once the session has been quit. A body error wins over
/// a quit error; the quit error is still logged.
pub async fn with_session<F, Fut, T>(driver: Arc<dyn WebDriver>, body: F) -> Result<T>
where
    F: FnOnce(SessionHandle) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let session = Session::start(driver);
    let outcome = AssertUnwindSafe(body(session.handle()))
        .catch_unwind()
        .await;
    let quit = session.quit().await;

    match outcome {
        Err(panic) => resume_unwind(panic),
        Ok(Err(e)) => Err(e),
        Ok(Ok(value)) => quit.map(|_| value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::MockDriver;

    #[tokio::test]
    async fn test_quit_is_idempotent() {
        let driver = MockDriver::new();
        let session = Session::start(Arc::new(driver.clone()));

        session.quit().await.unwrap();
        session.quit().await.unwrap();

        assert_eq!(driver.quit_calls(), 1);
        assert!(matches!(session.handle().driver(), Err(Error::SessionClosed)));
    }

    #[tokio::test]
    async fn test_handles_share_one_session() {
        let session = Session::start(Arc::new(MockDriver::new()));
        let a = session.handle();
        let b = session.handle();
        assert!(a.same_session(&b));
        assert_eq!(a.id(), session.id());
        session.quit().await.unwrap();
        assert!(b.is_closed());
    }

    #[tokio::test]
    async fn test_with_session_quits_on_error() {
        let driver = MockDriver::new();
        let result: Result<()> = with_session(Arc::new(driver.clone()), |_handle| async {
            Err(Error::not_found("id=missing", 10))
        })
        .await;

        assert!(matches!(result, Err(Error::NotFound { .. })));
        assert_eq!(driver.quit_calls(), 1);
    }

    #[tokio::test]
    async fn test_with_session_quits_on_panic() {
        let driver = MockDriver::new();
        let observer = driver.clone();

        let joined = tokio::spawn(async move {
            let _: Result<()> = with_session(Arc::new(driver), |handle| async move {
                if !handle.is_closed() {
                    panic!("assertion inside test body");
                }
                Ok(())
            })
            .await;
        })
        .await;

        assert!(joined.is_err());
        assert_eq!(observer.quit_calls(), 1);
    }

    #[tokio::test]
    async fn test_dropped_session_is_quit_in_background() {
        let driver = MockDriver::new();
        {
            let _session = Session::start(Arc::new(driver.clone()));
        }
        for _ in 0..10 {
            if driver.quit_calls() > 0 {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert_eq!(driver.quit_calls(), 1);
    }
}
