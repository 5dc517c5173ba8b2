//! Test verifications that attach a diagnostic snapshot on failure

use crate::diagnostics::AssertionFailure;
use crate::error::{Error, Result};
use crate::interaction::Interactor;
use std::fmt::Debug;
use tracing::{error, info};

async fn fail(
    message: &str,
    expected: Option<String>,
    actual: Option<String>,
    interactor: Option<&Interactor>,
) -> Error {
    let snapshot = match interactor {
        Some(ui) => Some(ui.capture_snapshot().await),
        None => None,
    };
    let failure = AssertionFailure {
        message: message.to_string(),
        expected,
        actual,
        snapshot,
    };
    error!("{}", failure);
    Error::Assertion(Box::new(failure))
}

/// Fail with `message` unless `condition` holds
pub async fn ensure(condition: bool, message: &str, interactor: Option<&Interactor>) -> Result<()> {
    if condition {
        return Ok(());
    }
    Err(fail(message, None, None, interactor).await)
}

/// Fail unless `actual` contains `expected`
pub async fn ensure_contains(
    actual: &str,
    expected: &str,
    message: &str,
    interactor: Option<&Interactor>,
) -> Result<()> {
    if actual.contains(expected) {
        info!("Verified text contains {:?}", expected);
        return Ok(());
    }
    Err(fail(
        message,
        Some(expected.to_string()),
        Some(actual.to_string()),
        interactor,
    )
    .await)
}

/// Fail unless `actual == expected`
pub async fn ensure_eq<T: PartialEq + Debug>(
    actual: T,
    expected: T,
    message: &str,
    interactor: Option<&Interactor>,
) -> Result<()> {
    if actual == expected {
        return Ok(());
    }
    Err(fail(
        message,
        Some(format!("{:?}", expected)),
        Some(format!("{:?}", actual)),
        interactor,
    )
    .await)
}
