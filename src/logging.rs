//! Process-wide logging setup
//!
//! Console output follows the configured level. When a log directory is
//! given, a second layer writes crate debug output to a daily rotating
//! `test_run.<date>.log`, keeping the last five files.

use crate::error::{Error, Result};
use std::path::Path;
use std::sync::Once;
use tracing::Level;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::Targets;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, registry, EnvFilter};

static INIT: Once = Once::new();

pub const LOG_FILE_PREFIX: &str = "test_run";
pub const MAX_LOG_FILES: usize = 5;

/// Install the console subscriber. `RUST_LOG` wins over `level`.
///
/// Safe to call any number of times; only the first call has an effect, and
/// a subscriber installed by someone else is left in place.
pub fn init(level: &str) {
    install(level, None);
}

/// Like [`init`], plus the rotating debug log under `dir`. An empty `dir`
/// leaves the file log off.
pub fn init_with_file(level: &str, dir: impl AsRef<Path>) -> Result<()> {
    let dir = dir.as_ref();
    if INIT.is_completed() || dir.as_os_str().is_empty() {
        init(level);
        return Ok(());
    }
    install(level, Some(file_appender(dir)?));
    Ok(())
}

/// Rotating writer for the debug log, creating `dir` if needed
pub fn file_appender(dir: &Path) -> Result<RollingFileAppender> {
    std::fs::create_dir_all(dir)?;
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .filename_suffix("log")
        .max_log_files(MAX_LOG_FILES)
        .build(dir)
        .map_err(|e| Error::configuration(format!("Cannot open log in {}: {}", dir.display(), e)))
}

fn install(level: &str, file: Option<RollingFileAppender>) {
    INIT.call_once(|| {
        let console_filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(level))
            .unwrap_or_else(|_| EnvFilter::new("info"));
        let console = fmt::layer().with_target(false).with_filter(console_filter);

        let file = file.map(|appender| {
            fmt::layer()
                .with_ansi(false)
                .with_writer(appender)
                .with_filter(
                    Targets::new()
                        .with_target("storefront_pom", Level::DEBUG)
                        .with_default(Level::INFO),
                )
        });

        if registry().with(console).with(file).try_init().is_err() {
            tracing::debug!("Global subscriber already installed");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_init_is_idempotent() {
        init("debug");
        init("warn");
        init("not a level");
        assert!(INIT.is_completed());
        init_with_file("info", "").unwrap();
    }

    #[test]
    fn test_file_appender_creates_log_file() {
        let dir = std::env::temp_dir()
            .join(format!("storefront-logs-{}", uuid::Uuid::new_v4()))
            .join("logs");

        let mut appender = file_appender(&dir).unwrap();
        writeln!(appender, "Clicking a#cart").unwrap();
        appender.flush().unwrap();

        let logs: Vec<String> = std::fs::read_dir(&dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|name| name.starts_with("test_run.") && name.ends_with(".log"))
            .collect();
        assert_eq!(logs.len(), 1, "{:?}", logs);
        let written = std::fs::read_to_string(dir.join(&logs[0])).unwrap();
        assert!(written.contains("Clicking a#cart"));

        std::fs::remove_dir_all(dir.parent().unwrap()).unwrap();
    }
}
