use super::{HomePage, Page, PageContext, PageId};
use crate::error::Result;
use crate::Locator;
use tracing::info;

#[derive(Debug, Clone)]
pub struct AccountCreatedPage {
    ctx: PageContext,
}

impl AccountCreatedPage {
    pub const TITLE: Locator = Locator::xpath("//b[normalize-space()='Account Created!']");
    pub const CONTINUE: Locator = Locator::xpath("//a[normalize-space()='Continue']");

    pub async fn account_created_message(&self) -> Result<String> {
        self.ctx.ui().read_text(&Self::TITLE).await
    }

    pub async fn click_continue(&self) -> Result<HomePage> {
        info!("Continuing after account creation");
        self.ctx.ui().click(&Self::CONTINUE).await?;
        Ok(self.ctx.navigator().home_page())
    }
}

impl Page for AccountCreatedPage {
    const ID: PageId = PageId::AccountCreated;

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
