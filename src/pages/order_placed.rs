//! Order confirmation and invoice download

use super::{HomePage, Page, PageContext, PageId};
use crate::downloads::wait_for_download;
use crate::error::Result;
use crate::Locator;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

/// Confirmation sentence under the title
pub const ORDER_CONFIRMED: &str = "Congratulations! Your order has been confirmed!";

#[derive(Debug, Clone)]
pub struct OrderPlacedPage {
    ctx: PageContext,
}

impl OrderPlacedPage {
    pub const TITLE: Locator = Locator::xpath("//b[normalize-space()='Order Placed!']");
    pub const CONFIRMATION: Locator =
        Locator::xpath("//p[normalize-space()='Congratulations! Your order has been confirmed!']");
    pub const CONTINUE: Locator = Locator::xpath("//a[normalize-space()='Continue']");
    pub const DOWNLOAD_INVOICE: Locator = Locator::xpath("//a[normalize-space()='Download Invoice']");

    pub async fn is_order_placed_visible(&self) -> bool {
        self.is_open().await
    }

    pub async fn confirmation_message(&self) -> Result<String> {
        self.ctx.ui().read_text(&Self::CONFIRMATION).await
    }

    /// Click "Download Invoice" and wait for the file to land in `dir`
    pub async fn download_invoice(&self, dir: &Path, timeout: Duration) -> Result<PathBuf> {
        info!("Downloading invoice into {}", dir.display());
        self.ctx.ui().click(&Self::DOWNLOAD_INVOICE).await?;
        wait_for_download(dir, "invoice", timeout).await
    }

    pub async fn click_continue(&self) -> Result<HomePage> {
        self.ctx.ui().click(&Self::CONTINUE).await?;
        Ok(self.ctx.navigator().home_page())
    }
}

impl Page for OrderPlacedPage {
    const ID: PageId = PageId::OrderPlaced;

    fn new(ctx: PageContext) -> Self {
        Self { ctx }
    }

    fn context(&self) -> &PageContext {
        &self.ctx
    }

    fn landmark(&self) -> Locator {
        Self::TITLE
    }
}
