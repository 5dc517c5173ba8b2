//! Failure diagnostics
//!
//! A [`DiagnosticSnapshot`] is what a failed step leaves behind: where the
//! browser was and what it showed. The reporting collaborator consumes it;
//! this crate only captures and saves it.

use crate::error::Result;
use chrono::{DateTime, Utc};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::info;

/// Current URL, screenshot and markup of a session at one instant
#[derive(Debug, Clone)]
pub struct DiagnosticSnapshot {
    pub session_id: String,
    /// `None` when the URL could not be read
    pub url: Option<String>,
    /// PNG bytes; empty when no screenshot could be taken
    pub screenshot: Vec<u8>,
    /// Serialized DOM; `None` when it could not be read
    pub page_source: Option<String>,
    pub captured_at: DateTime<Utc>,
}

impl DiagnosticSnapshot {
    pub fn has_screenshot(&self) -> bool {
        !self.screenshot.is_empty()
    }

    fn file_stem(&self) -> String {
        let short_id: String = self.session_id.chars().take(8).collect();
        format!("{}_{}", self.captured_at.format("%Y%m%d_%H%M%S_%3f"), short_id)
    }

    /// Write `<stem>.png` and `<stem>.html` (when captured) and
    /// `<stem>.url.txt` into `dir`. Returns the path of the URL file.
    pub async fn save(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let dir = dir.as_ref();
        tokio::fs::create_dir_all(dir).await?;
        let stem = self.file_stem();

        if self.has_screenshot() {
            tokio::fs::write(dir.join(format!("{}.png", stem)), &self.screenshot).await?;
        }
        if let Some(html) = &self.page_source {
            tokio::fs::write(dir.join(format!("{}.html", stem)), html).await?;
        }

        let url_path = dir.join(format!("{}.url.txt", stem));
        tokio::fs::write(&url_path, self.url.as_deref().unwrap_or("<unknown>")).await?;

        info!("Saved diagnostic snapshot to {}", url_path.display());
        Ok(url_path)
    }
}

/// A failed verification together with what the browser showed
#[derive(Debug)]
pub struct AssertionFailure {
    pub message: String,
    pub expected: Option<String>,
    pub actual: Option<String>,
    pub snapshot: Option<DiagnosticSnapshot>,
}

impl AssertionFailure {
    /// Expected-versus-actual block for reports
    pub fn comparison(&self) -> Option<String> {
        match (&self.expected, &self.actual) {
            (Some(expected), Some(actual)) => Some(format!(
                "EXPECTED:\n{}\n\nACTUAL:\n{}",
                expected, actual
            )),
            _ => None,
        }
    }
}

impl fmt::Display for AssertionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Assertion failed: {}", self.message)?;
        if let (Some(expected), Some(actual)) = (&self.expected, &self.actual) {
            write!(f, " (expected {:?}, actual {:?})", expected, actual)?;
        }
        if let Some(url) = self.snapshot.as_ref().and_then(|s| s.url.as_deref()) {
            write!(f, " at {}", url)?;
        }
        Ok(())
    }
}
