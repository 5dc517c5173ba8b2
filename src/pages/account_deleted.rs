use super::{HomePage, Page, PageContext, PageId};
use crate::error::Result;
use crate::Locator;
use tracing::info;

#[derive(Debug, Clone)]
pub struct AccountDeletedPage {
    ctx: PageContext,
}

impl AccountDeletedPage {
    pub const TITLE: Locator = Locator::xpath("//b[contains(text(),'Account Deleted!')]");
    pub const CONTINUE: Locator = Locator::xpath("//a[@data-qa='continue-button']");

    pub async fn account_deleted_message(&self) -> Result<String> {
        self.ctx.ui().read_text(&Self::TITLE).await
    }

    pub async fn click_continue(&self) -> Result<HomePage> {
        info!("Continuing after account deletion");
        self.ctx.ui().click(&Self::CONTINUE).await?;
        Ok(self.ctx.navigator().home_page())
    }
}

impl Page for AccountDeletedPage {
    const ID: PageId = PageId::AccountDeleted;

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
