//! Floating scroll-to-top arrow

use crate::error::Result;
use crate::pages::PageContext;
use crate::Locator;
use tracing::info;

#[derive(Debug, Clone)]
pub struct ScrollUp {
    ctx: PageContext,
}

impl ScrollUp {
    pub const BUTTON: Locator = Locator::id("scrollUp");

    pub fn new(ctx: PageContext) -> Self {
        Self { ctx }
    }

    pub async fn is_visible(&self) -> bool {
        self.ctx.ui().is_visible(&Self::BUTTON).await
    }

    pub async fn click(&self) -> Result<()> {
        info!("Clicking the scroll-up arrow");
        self.ctx.ui().click(&Self::BUTTON).await
    }
}
