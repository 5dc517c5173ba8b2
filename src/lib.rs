//! Storefront POM: page-object end-to-end test framework for an e-commerce
//! storefront.
//!
//! Tests drive the application through a [`Navigator`], which hands out page
//! objects. Page objects act through an [`Interactor`] whose primitives wait
//! for elements and retry transient click faults, so test code never sleeps.
//! Browsers are reached through the [`driver::WebDriver`] trait: a live Chrome
//! via [`cdp::CdpDriver`], or the in-memory [`driver::MockDriver`].
//!
//! ```rust,no_run
//! use storefront_pom::{cdp::CdpDriver, with_session, Config, Navigator};
//! use std::sync::Arc;
//!
//! # async fn example() -> storefront_pom::Result<()> {
//! let config = Config::load()?;
//! let driver = Arc::new(CdpDriver::connect(&config.cdp_endpoint).await?);
//! with_session(driver, |session| async move {
//!     let home = Navigator::from_config(session, &config).open_site().await?;
//!     assert!(home.is_home_page_visible().await);
//!     Ok(())
//! })
//! .await
//! # }
//! ```

pub mod config;
pub mod error;
pub mod logging;

pub mod data;
pub mod diagnostics;
pub mod downloads;
pub mod locator;
pub mod verify;
pub mod wait;

pub mod cdp;
pub mod driver;
pub mod interaction;
pub mod session;

pub mod components;
pub mod flows;
pub mod navigator;
pub mod pages;

// Re-exports
pub use config::Config;
pub use diagnostics::{AssertionFailure, DiagnosticSnapshot};
pub use error::{Error, Result, TransientFault};
pub use interaction::{ClickOutcome, Interactor, RetryPolicy};
pub use locator::{xpath_literal, By, Locator};
pub use navigator::Navigator;
pub use pages::{AnyPage, Page, PageContext, PageId};
pub use session::{with_session, Session, SessionHandle};
pub use wait::Timeouts;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
