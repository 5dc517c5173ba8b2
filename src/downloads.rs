//! Waiting for browser downloads to land on disk

use crate::error::{Error, Result};
use crate::wait::Timeouts;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, instrument};

/// How often the download directory is listed
pub const DOWNLOAD_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Suffixes Chrome and Firefox give to downloads still in progress
const PARTIAL_SUFFIXES: [&str; 3] = [".crdownload", ".tmp", ".part"];

fn is_partial(name: &str) -> bool {
    PARTIAL_SUFFIXES.iter().any(|suffix| name.ends_with(suffix))
}

async fn find_completed(dir: &Path, name_contains: &str) -> Result<Option<PathBuf>> {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        // The browser creates the directory on first download
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name.contains(name_contains) && !is_partial(&name) && entry.file_type().await?.is_file() {
            return Ok(Some(entry.path()));
        }
    }
    Ok(None)
}

/// Wait until a finished file whose name contains `name_contains` appears
/// in `dir`.
#[instrument(skip(dir), fields(dir = %dir.display()))]
pub async fn wait_for_download(dir: &Path, name_contains: &str, timeout: Duration) -> Result<PathBuf> {
    debug!("Waiting for download");
    let timeouts = Timeouts::new(timeout, DOWNLOAD_POLL_INTERVAL);
    match timeouts.poll(|| find_completed(dir, name_contains)).await? {
        Some(path) => {
            info!("Download complete: {}", path.display());
            Ok(path)
        }
        None => Err(Error::timeout(format!(
            "no file containing {:?} in {} after {}ms",
            name_contains,
            dir.display(),
            timeout.as_millis()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("storefront-downloads-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_partial_files_are_recognised() {
        assert!(is_partial("invoice.txt.crdownload"));
        assert!(is_partial("invoice.tmp"));
        assert!(!is_partial("invoice.txt"));
    }

    #[tokio::test]
    async fn test_finds_completed_download() {
        let dir = scratch_dir();
        std::fs::write(dir.join("invoice.txt.crdownload"), b"partial").unwrap();
        std::fs::write(dir.join("invoice.txt"), b"Hi, your total purchase amount is 500").unwrap();

        let path = wait_for_download(&dir, "invoice", Duration::from_secs(2)).await.unwrap();
        assert_eq!(path, dir.join("invoice.txt"));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn test_times_out_on_partial_only() {
        let dir = scratch_dir();
        std::fs::write(dir.join("invoice.txt.crdownload"), b"partial").unwrap();

        let result = wait_for_download(&dir, "invoice", Duration::from_millis(200)).await;
        assert!(matches!(result, Err(Error::Timeout(_))));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn test_missing_directory_is_not_an_error_until_timeout() {
        let dir = std::env::temp_dir().join(format!("storefront-missing-{}", uuid::Uuid::new_v4()));
        let result = wait_for_download(&dir, "invoice", Duration::from_millis(100)).await;
        assert!(matches!(result, Err(Error::Timeout(_))));
    }
}
