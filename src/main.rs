//! # storefront-smoke
//!
//! Smoke check against a live storefront: attaches to a running Chrome,
//! opens the site and verifies the home page. Leaves a diagnostic snapshot
//! in `artifacts_dir` when the check fails.
//!
//! ## Environment variables
//! - `STOREFRONT_ENV`: config environment (default: dev)
//! - `STOREFRONT_BASE_URL`, `STOREFRONT_CDP_ENDPOINT`, ...: override any key
//! - `RUST_LOG`: log filter, wins over `log_level`

use anyhow::{bail, Context};
use std::path::Path;
use std::sync::Arc;
use storefront_pom::{cdp::CdpDriver, logging, with_session, Config, Navigator};
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("loading configuration")?;
    logging::init_with_file(&config.log_level, &config.log_dir)
        .with_context(|| format!("opening log directory {}", config.log_dir))?;

    info!("storefront-smoke v{}", storefront_pom::VERSION);
    info!(
        "Target {} via {} ({}, headless={})",
        config.base_url, config.cdp_endpoint, config.browser, config.headless
    );

    let driver = CdpDriver::connect(&config.cdp_endpoint)
        .await
        .with_context(|| format!("attaching to Chrome at {}", config.cdp_endpoint))?;
    driver
        .set_download_dir(Path::new(&config.downloads_dir))
        .await
        .context("configuring downloads")?;

    let passed = with_session(Arc::new(driver), |session| async {
        let navigator = Navigator::from_config(session, &config);
        let home = navigator.open_site().await?;

        if home.is_home_page_visible().await {
            info!("Home page is visible");
            return Ok(true);
        }

        error!("Home page is not visible");
        let snapshot = navigator.interactor().capture_snapshot().await;
        snapshot.save(&config.artifacts_dir).await?;
        Ok(false)
    })
    .await
    .context("running smoke check")?;

    if !passed {
        bail!("smoke check failed, see {}", config.artifacts_dir);
    }
    info!("Smoke check passed");
    Ok(())
}
