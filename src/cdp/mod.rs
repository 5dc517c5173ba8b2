//! # Chrome DevTools Protocol backend
//!
//! Drives an already running Chrome (started with `--remote-debugging-port`)
//! over the DevTools WebSocket protocol.
//!
//! ## Module structure
//! - `traits`: the connection seam and event/response types
//! - `types`: wire types
//! - `connection`: WebSocket transport
//! - `client`: typed commands (navigate, evaluate, screenshot)
//! - `js`: JavaScript generated for locator queries and element operations
//! - `driver`: [`CdpDriver`], the [`crate::driver::WebDriver`] implementation
//!
//! ## Usage
//! ```rust,no_run
//! use storefront_pom::cdp::CdpDriver;
//! use storefront_pom::driver::WebDriver;
//!
//! # async fn example() -> storefront_pom::Result<()> {
//! let driver = CdpDriver::connect("http://127.0.0.1:9222").await?;
//! driver.navigate("https://automationexercise.com").await?;
//! driver.quit().await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod connection;
pub mod driver;
pub mod js;
pub mod traits;
pub mod types;

pub use client::CdpClient;
pub use connection::CdpWebSocketConnection;
pub use driver::{CdpDriver, CdpElement};
pub use traits::{CdpConnection, CdpError, CdpEvent, CdpResponse};
